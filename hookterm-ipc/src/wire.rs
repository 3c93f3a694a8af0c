//! JSON-line wire format.
//!
//! A client writes one request object terminated by `\n`, the server answers
//! with one response object terminated by `\n` and closes the connection.

use crate::error::IpcError;
use crate::value::IpcValue;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestKind {
    Signal,
    Method,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireRequest {
    pub kind: RequestKind,
    pub name: String,
    /// Target context id; absent means every live context.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dest: Option<u64>,
    #[serde(default)]
    pub params: IpcValue,
}

impl WireRequest {
    pub fn signal(name: &str, dest: Option<u64>, params: IpcValue) -> Self {
        Self {
            kind: RequestKind::Signal,
            name: name.to_string(),
            dest,
            params,
        }
    }

    pub fn method(name: &str, dest: Option<u64>, params: IpcValue) -> Self {
        Self {
            kind: RequestKind::Method,
            name: name.to_string(),
            dest,
            params,
        }
    }

    pub fn is_broadcast(&self) -> bool {
        self.dest.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireResponse {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<IpcValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl WireResponse {
    pub fn success(result: IpcValue) -> Self {
        Self {
            ok: true,
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            result: None,
            error: Some(message.into()),
        }
    }
}

/// Serialize `msg` as a single newline-terminated line.
pub fn encode_line<T: Serialize>(msg: &T) -> Result<String, IpcError> {
    let mut line = serde_json::to_string(msg)?;
    line.push('\n');
    Ok(line)
}

pub fn decode_request(line: &str) -> Result<WireRequest, IpcError> {
    Ok(serde_json::from_str(line.trim())?)
}

pub fn decode_response(line: &str) -> Result<WireResponse, IpcError> {
    Ok(serde_json::from_str(line.trim())?)
}
