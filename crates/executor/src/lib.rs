//! Command dispatch layer for the Shoal array server.
//!
//! The transport hands each inbound request to [`Registry::dispatch`] as a
//! command name plus an argument payload. Dispatch parses the payload into
//! an [`ArgBundle`] and routes to the registered handler. Every execution
//! error becomes a tagged error [`Reply`]: no error raised inside a
//! handler escapes to the transport, and no failed handler leaves a
//! half-registered symbol-table entry behind.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod args;
pub mod handlers;
pub mod registry;

pub use args::ArgBundle;
pub use registry::{Context, Handler, Registry};
