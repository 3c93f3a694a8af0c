//! Command-line front-end.
//!
//! Parses arguments against the schema, handles `--help` and `--version`,
//! and turns `--signal` / `--call` into a one-shot IPC client request.

use hookterm_config::paths::CONTEXT_ID_ENV;
use hookterm_config::{CliOptions, MetaRegistry, OptionError, ParsedArgs, parse_args};
use hookterm_ipc::{IpcValue, WireRequest, WireResponse};
use std::ffi::OsString;

/// Result of CLI processing
pub enum CliResult {
    /// Continue with normal startup
    Continue(ParsedArgs),
    /// Exit with the given code (help, version, or a finished client request)
    Exit(i32),
}

/// Process the process arguments.
pub fn process_cli(meta: &MetaRegistry) -> CliResult {
    process_args(std::env::args_os(), meta)
}

pub fn process_args<I, T>(argv: I, meta: &MetaRegistry) -> CliResult
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let args = match parse_args(argv, meta) {
        Ok(args) => args,
        Err(OptionError::Help(text)) => {
            println!("{}", text.trim_end());
            return CliResult::Exit(0);
        }
        Err(OptionError::Invalid(msg)) => {
            eprintln!("{}", msg.trim_end());
            return CliResult::Exit(1);
        }
    };

    if args.options.version {
        println!("hookterm {}", crate::VERSION);
        return CliResult::Exit(0);
    }

    let env_id = std::env::var(CONTEXT_ID_ENV).ok();
    match client_request(&args.options, env_id.as_deref()) {
        Some(request) => CliResult::Exit(run_client(&request)),
        None => CliResult::Continue(args),
    }
}

/// Build the request for `--signal` / `--call`, if one was asked for.
///
/// Without `--dest` the id exported by the enclosing terminal is used; with
/// neither, the request is broadcast.
pub fn client_request(options: &CliOptions, env_id: Option<&str>) -> Option<WireRequest> {
    let dest = options
        .dest
        .or_else(|| env_id.and_then(|s| s.trim().parse().ok()));
    let params = IpcValue::from_params(options.params.clone());
    if let Some(name) = &options.signal {
        Some(WireRequest::signal(name, dest, params))
    } else {
        options
            .call
            .as_ref()
            .map(|name| WireRequest::method(name, dest, params))
    }
}

/// Exit code and output for a response.
pub fn report_response(request: &WireRequest, response: &WireResponse) -> i32 {
    if !response.ok {
        eprintln!(
            "hookterm: {}",
            response.error.as_deref().unwrap_or("request failed")
        );
        return 1;
    }
    if let Some(result) = &response.result
        && request.kind == hookterm_ipc::RequestKind::Method
    {
        println!("{result}");
    }
    0
}

#[cfg(unix)]
fn run_client(request: &WireRequest) -> i32 {
    let socket = hookterm_config::paths::socket_path();
    match hookterm_ipc::send_request(&socket, request) {
        Ok(response) => report_response(request, &response),
        Err(e) => {
            eprintln!("hookterm: cannot reach {}: {}", socket.display(), e);
            1
        }
    }
}

#[cfg(not(unix))]
fn run_client(_request: &WireRequest) -> i32 {
    eprintln!("hookterm: --signal and --call need Unix domain sockets");
    1
}
