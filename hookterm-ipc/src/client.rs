//! Blocking client used by `--signal` and `--call`.

use crate::error::IpcError;
use crate::wire::{WireRequest, WireResponse, decode_response, encode_line};
use std::io::{BufRead, BufReader, Write};
use std::net::Shutdown;
use std::os::unix::net::UnixStream;
use std::path::Path;

/// Send one request and wait for the single-line response.
pub fn send_request(path: &Path, request: &WireRequest) -> Result<WireResponse, IpcError> {
    let mut stream = UnixStream::connect(path)?;
    stream.write_all(encode_line(request)?.as_bytes())?;
    stream.flush()?;
    stream.shutdown(Shutdown::Write)?;

    let mut line = String::new();
    let read = BufReader::new(stream).read_line(&mut line)?;
    if read == 0 {
        return Err(IpcError::Io(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            "server closed the connection without a response",
        )));
    }
    decode_response(&line)
}
