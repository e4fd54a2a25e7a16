//! Segment broadcast.
//!
//! Expands one value per segment over that segment's index span, with an
//! optional permutation that returns a result computed in grouped order to
//! the caller's original element order.

use shoal_core::{Result, ShoalError};
use shoal_array::DistVec;

/// Broadcast `values[i]` over the span of segment `i`.
///
/// `segments` holds the monotonically non-decreasing start offset of each
/// segment, beginning at 0; segment `i` spans `segments[i]..segments[i+1]`
/// (the last runs to `size`). If `permutation` is supplied its length must
/// equal `size`, and output index `permutation[j]` receives the value that
/// would otherwise land at position `j`.
pub fn broadcast<T: Copy>(
    segments: &DistVec<i64>,
    values: &DistVec<T>,
    size: usize,
    permutation: Option<&DistVec<i64>>,
) -> Result<DistVec<T>> {
    if segments.len() != values.len() {
        return Err(ShoalError::value_error(format!(
            "segments size {} != values size {}",
            segments.len(),
            values.len()
        )));
    }
    if size > 0 && segments.is_empty() {
        return Err(ShoalError::value_error(format!(
            "cannot broadcast to size {} with no segments",
            size
        )));
    }
    if let Some(perm) = permutation {
        if perm.len() != size {
            return Err(ShoalError::value_error(format!(
                "permutation length {} != size {}",
                perm.len(),
                size
            )));
        }
    }

    let offsets = segments.to_vec();
    let vals = values.to_vec();
    let mut expanded = Vec::with_capacity(size);
    for (i, &value) in vals.iter().enumerate() {
        let start = offsets[i];
        let end = offsets.get(i + 1).copied().unwrap_or(size as i64);
        if i == 0 && start != 0 {
            return Err(ShoalError::value_error("segments must start at offset 0"));
        }
        if start > end || end > size as i64 {
            return Err(ShoalError::value_error(format!(
                "segment offsets must be non-decreasing and within size {}: [{}, {})",
                size, start, end
            )));
        }
        for _ in start..end {
            expanded.push(value);
        }
    }
    if expanded.len() != size {
        return Err(ShoalError::internal(format!(
            "broadcast expanded {} elements for size {}",
            expanded.len(),
            size
        )));
    }

    let out = DistVec::from_vec(segments.fabric(), expanded);
    match permutation {
        Some(perm) => out.scatter(perm),
        None => Ok(out),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use shoal_array::Fabric;

    use super::*;

    fn f() -> Arc<Fabric> {
        Arc::new(Fabric::with_physical_memory(2, 1 << 30))
    }

    #[test]
    fn expands_segment_values_over_spans() {
        let f = f();
        let segs = DistVec::from_vec(&f, vec![0i64, 3, 5]);
        let vals = DistVec::from_vec(&f, vec![10i64, 20, 30]);
        let out = broadcast(&segs, &vals, 7, None).unwrap();
        assert_eq!(out.to_vec(), vec![10, 10, 10, 20, 20, 30, 30]);
    }

    #[test]
    fn permutation_scatters_to_original_order() {
        let f = f();
        let segs = DistVec::from_vec(&f, vec![0i64, 3, 5]);
        let vals = DistVec::from_vec(&f, vec![10i64, 20, 30]);
        let perm = DistVec::from_vec(&f, vec![6i64, 5, 4, 3, 2, 1, 0]);
        let out = broadcast(&segs, &vals, 7, Some(&perm)).unwrap();
        // out[perm[j]] = expanded[j]
        assert_eq!(out.to_vec(), vec![30, 30, 20, 20, 10, 10, 10]);
    }

    #[test]
    fn empty_segment_contributes_nothing() {
        let f = f();
        let segs = DistVec::from_vec(&f, vec![0i64, 2, 2]);
        let vals = DistVec::from_vec(&f, vec![1i64, 2, 3]);
        let out = broadcast(&segs, &vals, 4, None).unwrap();
        assert_eq!(out.to_vec(), vec![1, 1, 3, 3]);
    }

    #[test]
    fn length_mismatches_are_value_errors() {
        let f = f();
        let segs = DistVec::from_vec(&f, vec![0i64, 3]);
        let vals = DistVec::from_vec(&f, vec![10i64]);
        assert!(broadcast(&segs, &vals, 5, None).is_err());

        let vals = DistVec::from_vec(&f, vec![10i64, 20]);
        let short_perm = DistVec::from_vec(&f, vec![0i64, 1]);
        assert!(matches!(
            broadcast(&segs, &vals, 5, Some(&short_perm)),
            Err(ShoalError::ValueError { .. })
        ));
    }

    #[test]
    fn decreasing_offsets_are_rejected() {
        let f = f();
        let segs = DistVec::from_vec(&f, vec![0i64, 4, 2]);
        let vals = DistVec::from_vec(&f, vec![1i64, 2, 3]);
        assert!(broadcast(&segs, &vals, 6, None).is_err());
    }

    #[test]
    fn empty_broadcast_is_empty() {
        let f = f();
        let segs = DistVec::from_vec(&f, vec![]);
        let vals = DistVec::from_vec(&f, vec![0i64; 0]);
        let out = broadcast(&segs, &vals, 0, None).unwrap();
        assert!(out.is_empty());
    }
}
