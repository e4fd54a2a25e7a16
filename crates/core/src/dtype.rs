//! The closed set of array element types.
//!
//! Every distributed array carries exactly one of these tags. The set is
//! fixed at design time; commands dispatch on it with exhaustive matches
//! and reject unsupported combinations rather than coercing.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ShoalError;

/// Element type tag for a distributed array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dtype {
    /// 64-bit signed integer
    Int64,
    /// 64-bit unsigned integer
    UInt64,
    /// 64-bit IEEE-754 float
    Float64,
    /// Boolean
    Bool,
    /// Segmented string array (offsets + byte payload)
    Str,
}

impl Dtype {
    /// Bytes per element occupied by this dtype's backing storage.
    ///
    /// For `Str` this is the per-offset cost; the byte payload is
    /// accounted separately by the entry that owns it.
    pub fn itemsize(&self) -> usize {
        match self {
            Dtype::Int64 | Dtype::UInt64 | Dtype::Float64 => 8,
            Dtype::Bool => 1,
            Dtype::Str => 8,
        }
    }

    /// The dtype name as written in client requests and replies.
    pub fn name(&self) -> &'static str {
        match self {
            Dtype::Int64 => "int64",
            Dtype::UInt64 => "uint64",
            Dtype::Float64 => "float64",
            Dtype::Bool => "bool",
            Dtype::Str => "str",
        }
    }
}

impl fmt::Display for Dtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Dtype {
    type Err = ShoalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "int64" => Ok(Dtype::Int64),
            "uint64" => Ok(Dtype::UInt64),
            "float64" => Ok(Dtype::Float64),
            "bool" => Ok(Dtype::Bool),
            "str" => Ok(Dtype::Str),
            other => Err(ShoalError::TypeError {
                reason: format!("unknown dtype '{}'", other),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn itemsize_matches_backing_width() {
        assert_eq!(Dtype::Int64.itemsize(), 8);
        assert_eq!(Dtype::UInt64.itemsize(), 8);
        assert_eq!(Dtype::Float64.itemsize(), 8);
        assert_eq!(Dtype::Bool.itemsize(), 1);
    }

    #[test]
    fn display_parse_round_trip() {
        for dt in [
            Dtype::Int64,
            Dtype::UInt64,
            Dtype::Float64,
            Dtype::Bool,
            Dtype::Str,
        ] {
            assert_eq!(dt.name().parse::<Dtype>().unwrap(), dt);
        }
    }

    #[test]
    fn unknown_dtype_is_type_error() {
        let err = "int32".parse::<Dtype>().unwrap_err();
        assert!(matches!(err, ShoalError::TypeError { .. }));
    }
}
