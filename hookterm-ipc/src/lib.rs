//! Inter-process signals and methods for hookterm.
//!
//! Requests arrive as JSON lines on a Unix socket, are decoded into
//! [`WireRequest`]s and dispatched by an [`IpcRouter`] to one context or to
//! every context in a [`ContextRegistry`].

#[cfg(unix)]
pub mod client;
pub mod error;
pub mod registry;
pub mod router;
#[cfg(unix)]
pub mod server;
pub mod value;
pub mod wire;

#[cfg(unix)]
pub use client::send_request;
pub use error::IpcError;
pub use registry::ContextRegistry;
pub use router::{ContextDirectory, Invocation, IpcRouter, RouterBuilder, select_targets};
#[cfg(unix)]
pub use server::{RequestHandler, bind_listener, serve};
pub use value::IpcValue;
pub use wire::{RequestKind, WireRequest, WireResponse};
