//! The type-erased handle over one distributed array.
//!
//! One variant per dtype in the closed set; the concrete backing storage
//! is reached only through the checked accessors, which verify the tag at
//! every access site and report a type error on mismatch. `dtype` and
//! `size` are fixed at construction.

use shoal_core::{Dtype, Result, ShoalError};
use shoal_array::{DistVec, SegString};

/// A distributed array of exactly one concrete element type.
#[derive(Debug, Clone)]
pub enum GenericEntry {
    /// Int64 array
    Int64(DistVec<i64>),
    /// UInt64 array
    UInt64(DistVec<u64>),
    /// Float64 array
    Float64(DistVec<f64>),
    /// Bool array
    Bool(DistVec<bool>),
    /// Segmented string array
    Str(SegString),
}

impl GenericEntry {
    /// The element type tag.
    pub fn dtype(&self) -> Dtype {
        match self {
            GenericEntry::Int64(_) => Dtype::Int64,
            GenericEntry::UInt64(_) => Dtype::UInt64,
            GenericEntry::Float64(_) => Dtype::Float64,
            GenericEntry::Bool(_) => Dtype::Bool,
            GenericEntry::Str(_) => Dtype::Str,
        }
    }

    /// Element count.
    pub fn len(&self) -> usize {
        match self {
            GenericEntry::Int64(v) => v.len(),
            GenericEntry::UInt64(v) => v.len(),
            GenericEntry::Float64(v) => v.len(),
            GenericEntry::Bool(v) => v.len(),
            GenericEntry::Str(s) => s.len(),
        }
    }

    /// True if the array holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bytes per element.
    pub fn itemsize(&self) -> usize {
        self.dtype().itemsize()
    }

    /// Bytes attributed to the backing storage.
    pub fn size_bytes(&self) -> u64 {
        match self {
            GenericEntry::Int64(v) => v.size_bytes(),
            GenericEntry::UInt64(v) => v.size_bytes(),
            GenericEntry::Float64(v) => v.size_bytes(),
            GenericEntry::Bool(v) => v.size_bytes(),
            GenericEntry::Str(s) => s.size_bytes(),
        }
    }

    /// Downcast to the Int64 backing storage.
    pub fn as_int64(&self) -> Result<&DistVec<i64>> {
        match self {
            GenericEntry::Int64(v) => Ok(v),
            other => Err(Self::mismatch(Dtype::Int64, other.dtype())),
        }
    }

    /// Downcast to the UInt64 backing storage.
    pub fn as_uint64(&self) -> Result<&DistVec<u64>> {
        match self {
            GenericEntry::UInt64(v) => Ok(v),
            other => Err(Self::mismatch(Dtype::UInt64, other.dtype())),
        }
    }

    /// Downcast to the Float64 backing storage.
    pub fn as_float64(&self) -> Result<&DistVec<f64>> {
        match self {
            GenericEntry::Float64(v) => Ok(v),
            other => Err(Self::mismatch(Dtype::Float64, other.dtype())),
        }
    }

    /// Downcast to the Bool backing storage.
    pub fn as_bool(&self) -> Result<&DistVec<bool>> {
        match self {
            GenericEntry::Bool(v) => Ok(v),
            other => Err(Self::mismatch(Dtype::Bool, other.dtype())),
        }
    }

    /// Downcast to the segmented string backing storage.
    pub fn as_str(&self) -> Result<&SegString> {
        match self {
            GenericEntry::Str(s) => Ok(s),
            other => Err(Self::mismatch(Dtype::Str, other.dtype())),
        }
    }

    fn mismatch(expected: Dtype, actual: Dtype) -> ShoalError {
        ShoalError::type_error(format!("expected {}, got {}", expected, actual))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use shoal_array::Fabric;

    use super::*;

    #[test]
    fn tag_guards_every_downcast() {
        let f = Arc::new(Fabric::with_physical_memory(2, 1 << 30));
        let e = GenericEntry::Int64(DistVec::from_vec(&f, vec![1i64, 2, 3]));
        assert_eq!(e.dtype(), Dtype::Int64);
        assert_eq!(e.len(), 3);
        assert_eq!(e.itemsize(), 8);
        assert_eq!(e.size_bytes(), 24);
        assert!(e.as_int64().is_ok());
        let err = e.as_float64().unwrap_err();
        assert_eq!(
            err,
            ShoalError::type_error("expected float64, got int64")
        );
    }
}
