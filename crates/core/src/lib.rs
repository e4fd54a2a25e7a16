//! Core types for the Shoal array server.
//!
//! This crate defines the foundational types used throughout the system:
//! - Dtype: the closed set of array element types
//! - ShoalError: the error taxonomy shared by every layer
//! - Reply: the tagged success/error reply returned to the transport
//! - ServerConfig: startup configuration

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod dtype;
pub mod error;
pub mod reply;

pub use config::ServerConfig;
pub use dtype::Dtype;
pub use error::{Result, ShoalError};
pub use reply::Reply;
