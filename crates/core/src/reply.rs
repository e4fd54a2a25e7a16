//! The tagged reply returned to the transport layer.
//!
//! Callers must branch on the tag, never infer success from message
//! content. On `Normal`, the message conventionally reads
//! `"created <name> (<dtype>, <size>)"` for commands that register a new
//! array; on `Error`, the message is a human-readable diagnostic carrying
//! the command name and implicated symbols.

use serde::{Deserialize, Serialize};

use crate::error::ShoalError;

/// Reply to a single command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "message")]
pub enum Reply {
    /// The command succeeded; the message describes the result.
    Normal(String),
    /// The command failed; the message is a diagnostic.
    Error(String),
}

impl Reply {
    /// Build an error reply from a command name and an execution error.
    pub fn from_error(cmd: &str, err: &ShoalError) -> Self {
        Reply::Error(format!("{}: {}", cmd, err))
    }

    /// True if this reply carries the error tag.
    pub fn is_error(&self) -> bool {
        matches!(self, Reply::Error(_))
    }

    /// The message text, regardless of tag.
    pub fn message(&self) -> &str {
        match self {
            Reply::Normal(m) | Reply::Error(m) => m,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_tag_distinguishes_variants() {
        let ok = Reply::Normal("created id_0 (int64, 5)".into());
        let json = serde_json::to_string(&ok).unwrap();
        assert!(json.contains("\"Normal\""));
        let back: Reply = serde_json::from_str(&json).unwrap();
        assert!(!back.is_error());

        let err = Reply::from_error(
            "intersect1d",
            &ShoalError::UnknownSymbol { name: "x".into() },
        );
        assert!(err.is_error());
        assert_eq!(err.message(), "intersect1d: unknown symbol: x");
    }
}
