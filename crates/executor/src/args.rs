//! Argument bundle parsing.
//!
//! A command's arguments arrive as one JSON object together with the
//! declared argument count. The bundle is parsed once per invocation and
//! is immutable for the duration of the call; every shape violation is a
//! `MalformedArguments` error naming the offending key.

use serde_json::{Map, Value};
use shoal_core::{Result, ShoalError};

/// The parsed, immutable argument bundle of one command invocation.
#[derive(Debug)]
pub struct ArgBundle {
    cmd: String,
    args: Map<String, Value>,
}

impl ArgBundle {
    /// Parse an argument payload. `arg_size` is the argument count the
    /// client declared; a mismatch with the payload is malformed.
    pub fn parse(cmd: &str, payload: &Value, arg_size: usize) -> Result<Self> {
        let args = payload
            .as_object()
            .ok_or_else(|| ShoalError::malformed("argument payload is not an object"))?;
        if args.len() != arg_size {
            return Err(ShoalError::malformed(format!(
                "declared {} arguments but payload carries {}",
                arg_size,
                args.len()
            )));
        }
        Ok(ArgBundle {
            cmd: cmd.to_string(),
            args: args.clone(),
        })
    }

    /// The command name this bundle was submitted with.
    pub fn cmd(&self) -> &str {
        &self.cmd
    }

    fn raw(&self, key: &str) -> Result<&Value> {
        self.args.get(key).ok_or_else(|| {
            ShoalError::malformed(format!("{}: missing argument '{}'", self.cmd, key))
        })
    }

    /// A required string argument.
    pub fn str_arg(&self, key: &str) -> Result<&str> {
        self.raw(key)?.as_str().ok_or_else(|| {
            ShoalError::malformed(format!("{}: argument '{}' must be a string", self.cmd, key))
        })
    }

    /// A required array-name reference. Same wire shape as a string; kept
    /// separate so call sites read as name resolution.
    pub fn symbol(&self, key: &str) -> Result<&str> {
        self.str_arg(key)
    }

    /// An optional array-name reference.
    pub fn opt_symbol(&self, key: &str) -> Result<Option<&str>> {
        match self.args.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(v) => v.as_str().map(Some).ok_or_else(|| {
                ShoalError::malformed(format!(
                    "{}: argument '{}' must be a string",
                    self.cmd, key
                ))
            }),
        }
    }

    /// A required integer argument.
    pub fn int_arg(&self, key: &str) -> Result<i64> {
        self.raw(key)?.as_i64().ok_or_else(|| {
            ShoalError::malformed(format!(
                "{}: argument '{}' must be an integer",
                self.cmd, key
            ))
        })
    }

    /// A required non-negative size argument.
    pub fn size_arg(&self, key: &str) -> Result<usize> {
        let v = self.int_arg(key)?;
        usize::try_from(v).map_err(|_| {
            ShoalError::malformed(format!(
                "{}: argument '{}' must be non-negative, got {}",
                self.cmd, key, v
            ))
        })
    }

    /// A boolean argument, defaulting when absent.
    pub fn bool_or(&self, key: &str, default: bool) -> Result<bool> {
        match self.args.get(key) {
            None => Ok(default),
            Some(v) => v.as_bool().ok_or_else(|| {
                ShoalError::malformed(format!(
                    "{}: argument '{}' must be a boolean",
                    self.cmd, key
                ))
            }),
        }
    }

    /// A required list argument, returned as raw JSON values for the
    /// handler to interpret per dtype.
    pub fn list_arg(&self, key: &str) -> Result<&Vec<Value>> {
        self.raw(key)?.as_array().ok_or_else(|| {
            ShoalError::malformed(format!("{}: argument '{}' must be a list", self.cmd, key))
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parses_typed_arguments() {
        let payload = json!({"a": "id_0", "n": 5, "flag": true});
        let bundle = ArgBundle::parse("test", &payload, 3).unwrap();
        assert_eq!(bundle.symbol("a").unwrap(), "id_0");
        assert_eq!(bundle.int_arg("n").unwrap(), 5);
        assert!(bundle.bool_or("flag", false).unwrap());
        assert!(!bundle.bool_or("absent", false).unwrap());
    }

    #[test]
    fn declared_count_mismatch_is_malformed() {
        let payload = json!({"a": 1});
        let err = ArgBundle::parse("test", &payload, 2).unwrap_err();
        assert!(matches!(err, ShoalError::MalformedArguments { .. }));
    }

    #[test]
    fn non_object_payload_is_malformed() {
        let err = ArgBundle::parse("test", &json!([1, 2]), 2).unwrap_err();
        assert!(matches!(err, ShoalError::MalformedArguments { .. }));
    }

    #[test]
    fn wrong_types_name_the_key() {
        let payload = json!({"n": "five"});
        let bundle = ArgBundle::parse("test", &payload, 1).unwrap();
        let err = bundle.int_arg("n").unwrap_err();
        assert!(err.to_string().contains("'n'"));
        let err = bundle.size_arg("n").unwrap_err();
        assert!(matches!(err, ShoalError::MalformedArguments { .. }));
    }

    #[test]
    fn negative_size_is_malformed() {
        let payload = json!({"size": -3});
        let bundle = ArgBundle::parse("test", &payload, 1).unwrap();
        assert!(bundle.size_arg("size").is_err());
    }
}
