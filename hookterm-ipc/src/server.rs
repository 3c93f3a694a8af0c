//! Unix-socket server loop.
//!
//! Runs on a current-thread runtime inside a `LocalSet`: handlers touch
//! single-threaded script state, so each connection is a `spawn_local` task.

use crate::error::IpcError;
use crate::wire::{WireRequest, WireResponse, decode_request, encode_line};
use std::path::Path;
use std::rc::Rc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{UnixListener, UnixStream};

/// Request handler shared by every connection.
pub type RequestHandler = Rc<dyn Fn(WireRequest) -> WireResponse>;

/// Bind `path`, replacing a stale socket file left by an earlier process.
///
/// Must be called from within a tokio runtime.
pub fn bind_listener(path: &Path) -> Result<UnixListener, IpcError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    if path.exists() {
        log::debug!("Removing stale socket {}", path.display());
        std::fs::remove_file(path)?;
    }
    let listener = UnixListener::bind(path)?;
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
    }
    log::info!("IPC listening on {}", path.display());
    Ok(listener)
}

/// Accept connections until the listener fails. Must run inside a `LocalSet`.
pub async fn serve(listener: UnixListener, handler: RequestHandler) {
    loop {
        match listener.accept().await {
            Ok((stream, _)) => {
                let handler = handler.clone();
                tokio::task::spawn_local(async move {
                    if let Err(e) = handle_connection(stream, handler).await {
                        log::warn!("IPC connection error: {}", e);
                    }
                });
            }
            Err(e) => {
                log::error!("IPC accept failed: {}", e);
                break;
            }
        }
    }
}

async fn handle_connection(stream: UnixStream, handler: RequestHandler) -> Result<(), IpcError> {
    let (read_half, mut write_half) = stream.into_split();
    let mut reader = BufReader::new(read_half);
    let mut line = String::new();
    if reader.read_line(&mut line).await? == 0 {
        return Ok(());
    }

    let response = match decode_request(&line) {
        Ok(request) => {
            log::debug!("IPC {:?} '{}' dest={:?}", request.kind, request.name, request.dest);
            handler(request)
        }
        Err(e) => WireResponse::failure(e.to_string()),
    };

    write_half.write_all(encode_line(&response)?.as_bytes()).await?;
    write_half.flush().await?;
    Ok(())
}
