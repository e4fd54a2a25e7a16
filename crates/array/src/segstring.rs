//! Segmented string arrays.
//!
//! Variable-length strings are stored as one flat byte payload plus an
//! `i64` start offset per string. This keeps the dtype set closed without
//! giving strings element-wise fixed width; the set and broadcast
//! algorithms do not operate on them.

use shoal_core::{Result, ShoalError};

/// An array of strings stored as offsets into a flat byte payload.
#[derive(Debug, Clone)]
pub struct SegString {
    offsets: Vec<i64>,
    bytes: Vec<u8>,
}

impl SegString {
    /// Build from owned strings.
    pub fn from_strings<S: AsRef<str>>(strings: &[S]) -> Self {
        let mut offsets = Vec::with_capacity(strings.len());
        let mut bytes = Vec::new();
        for s in strings {
            offsets.push(bytes.len() as i64);
            bytes.extend_from_slice(s.as_ref().as_bytes());
        }
        SegString { offsets, bytes }
    }

    /// Number of strings.
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    /// True if the array holds no strings.
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Read one string by index.
    pub fn get(&self, index: usize) -> Result<&str> {
        if index >= self.offsets.len() {
            return Err(ShoalError::value_error(format!(
                "string index {} out of bounds for array of size {}",
                index,
                self.offsets.len()
            )));
        }
        let start = self.offsets[index] as usize;
        let end = self
            .offsets
            .get(index + 1)
            .map(|&o| o as usize)
            .unwrap_or(self.bytes.len());
        std::str::from_utf8(&self.bytes[start..end])
            .map_err(|_| ShoalError::internal("non-UTF-8 payload in segmented string"))
    }

    /// Bytes occupied by offsets and payload together.
    pub fn size_bytes(&self) -> u64 {
        (self.offsets.len() * 8 + self.bytes.len()) as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_strings() {
        let s = SegString::from_strings(&["alpha", "", "gamma"]);
        assert_eq!(s.len(), 3);
        assert_eq!(s.get(0).unwrap(), "alpha");
        assert_eq!(s.get(1).unwrap(), "");
        assert_eq!(s.get(2).unwrap(), "gamma");
        assert!(s.get(3).is_err());
    }

    #[test]
    fn size_counts_offsets_and_payload() {
        let s = SegString::from_strings(&["ab", "cd"]);
        assert_eq!(s.size_bytes(), 2 * 8 + 4);
    }
}
