//! Error types for command execution.
//!
//! All errors from command execution are represented by the [`ShoalError`]
//! enum. These errors are:
//! - **Structured**: each variant has typed fields for error details
//! - **Serializable**: can be converted to/from JSON
//! - **Recoverable at the dispatch boundary**: every variant is converted
//!   into an error reply; none aborts the server
//!
//! Only startup misconfiguration (duplicate command registration, an
//! unresolvable memory limit) is fatal, and that is surfaced as a panic or
//! process exit before the server accepts requests, never through this enum.

use serde::{Deserialize, Serialize};

/// Result alias used throughout the engine.
pub type Result<T> = std::result::Result<T, ShoalError>;

/// Command execution errors.
///
/// # Categories
///
/// | Category | Variants | Description |
/// |----------|----------|-------------|
/// | Type | `TypeError`, `NotImplemented` | Dtype mismatch or unsupported dtype combination |
/// | Validation | `ValueError`, `MalformedArguments` | Structural constraint violated, bad argument bundle |
/// | Resolution | `UnknownSymbol`, `UnknownCommand` | Name has no live binding |
/// | Resources | `MemoryLimitExceeded` | Admission control rejected the operation |
/// | System | `Io`, `Internal` | Infrastructure errors |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
pub enum ShoalError {
    // ==================== Type Errors ====================
    /// An operand's element type does not match a structural requirement.
    #[error("type error: {reason}")]
    TypeError { reason: String },

    /// The dtype combination has no registered implementation for this command.
    #[error("{cmd} not implemented for dtype(s) {dtypes}")]
    NotImplemented { cmd: String, dtypes: String },

    // ==================== Validation Errors ====================
    /// A structural or size constraint is violated.
    #[error("value error: {reason}")]
    ValueError { reason: String },

    /// The argument bundle could not be parsed into the expected shape.
    #[error("malformed arguments: {reason}")]
    MalformedArguments { reason: String },

    // ==================== Resolution Errors ====================
    /// A referenced name is absent from the symbol table.
    #[error("unknown symbol: {name}")]
    UnknownSymbol { name: String },

    /// No handler is registered under this command name.
    #[error("unknown command: {cmd}")]
    UnknownCommand { cmd: String },

    // ==================== Resource Errors ====================
    /// Admission control rejected the prospective allocation. `used` is
    /// the usage at the time of the check, before the rejected request.
    #[error("memory limit exceeded: {requested} requested with {used} of {limit} bytes in use")]
    MemoryLimitExceeded {
        requested: u64,
        used: u64,
        limit: u64,
    },

    // ==================== System Errors ====================
    /// I/O error
    #[error("I/O error: {reason}")]
    Io { reason: String },

    /// Internal error (bug or invariant violation)
    #[error("internal error: {reason}")]
    Internal { reason: String },
}

impl ShoalError {
    /// Construct a `TypeError`.
    pub fn type_error(reason: impl Into<String>) -> Self {
        ShoalError::TypeError {
            reason: reason.into(),
        }
    }

    /// Construct a `ValueError`.
    pub fn value_error(reason: impl Into<String>) -> Self {
        ShoalError::ValueError {
            reason: reason.into(),
        }
    }

    /// Construct a `MalformedArguments` error.
    pub fn malformed(reason: impl Into<String>) -> Self {
        ShoalError::MalformedArguments {
            reason: reason.into(),
        }
    }

    /// Construct an `Internal` error.
    pub fn internal(reason: impl Into<String>) -> Self {
        ShoalError::Internal {
            reason: reason.into(),
        }
    }

    /// Construct a `NotImplemented` error for a command and dtype list.
    pub fn not_implemented(cmd: impl Into<String>, dtypes: impl Into<String>) -> Self {
        ShoalError::NotImplemented {
            cmd: cmd.into(),
            dtypes: dtypes.into(),
        }
    }
}

impl From<std::io::Error> for ShoalError {
    fn from(e: std::io::Error) -> Self {
        ShoalError::Io {
            reason: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_context() {
        let e = ShoalError::UnknownSymbol {
            name: "id_7".into(),
        };
        assert_eq!(e.to_string(), "unknown symbol: id_7");

        let e = ShoalError::not_implemented("intersect1d", "float64/float64");
        assert_eq!(
            e.to_string(),
            "intersect1d not implemented for dtype(s) float64/float64"
        );
    }

    #[test]
    fn serializes_with_fields() {
        let e = ShoalError::MemoryLimitExceeded {
            requested: 8,
            used: 10,
            limit: 5,
        };
        let json = serde_json::to_string(&e).unwrap();
        let back: ShoalError = serde_json::from_str(&json).unwrap();
        assert_eq!(back, e);
    }
}
