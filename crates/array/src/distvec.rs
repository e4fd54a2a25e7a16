//! Block-distributed vectors.
//!
//! A `DistVec<T>` owns one shard per locale; shard boundaries follow the
//! fabric's block distribution. Elements are addressed by their global
//! index. Bulk reordering goes through `gather`/`scatter` with an `i64`
//! permutation array, which is how sort results are applied and how
//! grouped results return to a caller's original element order.

use std::sync::Arc;

use shoal_core::{Result, ShoalError};

use crate::fabric::Fabric;

/// A vector block-distributed over the fabric's locales.
#[derive(Debug, Clone)]
pub struct DistVec<T> {
    fabric: Arc<Fabric>,
    shards: Vec<Vec<T>>,
    len: usize,
}

impl<T: Copy> DistVec<T> {
    /// Distribute a flat vector over the fabric.
    pub fn from_vec(fabric: &Arc<Fabric>, data: Vec<T>) -> Self {
        let len = data.len();
        let shards = fabric
            .block_ranges(len)
            .into_iter()
            .map(|r| data[r].to_vec())
            .collect();
        DistVec {
            fabric: Arc::clone(fabric),
            shards,
            len,
        }
    }

    /// Global element count.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if the vector holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The fabric this vector is distributed over.
    pub fn fabric(&self) -> &Arc<Fabric> {
        &self.fabric
    }

    /// One locale's shard.
    pub fn shard(&self, locale: usize) -> &[T] {
        &self.shards[locale]
    }

    /// Read one element by global index.
    pub fn get(&self, index: usize) -> Option<T> {
        if index >= self.len {
            return None;
        }
        let mut rest = index;
        for shard in &self.shards {
            if rest < shard.len() {
                return Some(shard[rest]);
            }
            rest -= shard.len();
        }
        None
    }

    /// Collect all shards into one flat vector, in global index order.
    pub fn to_vec(&self) -> Vec<T> {
        let mut out = Vec::with_capacity(self.len);
        for shard in &self.shards {
            out.extend_from_slice(shard);
        }
        out
    }

    /// Iterate elements in global index order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.shards.iter().flat_map(|s| s.iter())
    }

    /// Bytes occupied by the backing storage.
    pub fn size_bytes(&self) -> u64 {
        (self.len * std::mem::size_of::<T>()) as u64
    }

    /// Bulk read by permutation: `out[i] = self[perm[i]]`.
    ///
    /// Every entry of `perm` must index into `self`.
    pub fn gather(&self, perm: &DistVec<i64>) -> Result<DistVec<T>> {
        let flat = self.to_vec();
        let mut out = Vec::with_capacity(perm.len());
        for &p in perm.iter() {
            let idx = usize::try_from(p).ok().filter(|&i| i < flat.len()).ok_or_else(|| {
                ShoalError::value_error(format!(
                    "gather index {} out of bounds for array of size {}",
                    p,
                    flat.len()
                ))
            })?;
            out.push(flat[idx]);
        }
        Ok(DistVec::from_vec(&self.fabric, out))
    }

    /// Bulk write by permutation: `out[perm[i]] = self[i]`, with
    /// `|out| == |self|`. `perm` must be a permutation of `0..len`; an
    /// out-of-range entry is a value error, a duplicate entry silently
    /// takes the last write.
    pub fn scatter(&self, perm: &DistVec<i64>) -> Result<DistVec<T>> {
        if perm.len() != self.len {
            return Err(ShoalError::value_error(format!(
                "scatter permutation length {} != array length {}",
                perm.len(),
                self.len
            )));
        }
        let flat = self.to_vec();
        let mut out = flat.clone();
        for (i, &p) in perm.iter().enumerate() {
            let idx = usize::try_from(p).ok().filter(|&j| j < self.len).ok_or_else(|| {
                ShoalError::value_error(format!(
                    "scatter index {} out of bounds for array of size {}",
                    p, self.len
                ))
            })?;
            out[idx] = flat[i];
        }
        Ok(DistVec::from_vec(&self.fabric, out))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fabric() -> Arc<Fabric> {
        Arc::new(Fabric::with_physical_memory(3, 1 << 30))
    }

    #[test]
    fn from_vec_blocks_and_flattens_back() {
        let f = fabric();
        let v = DistVec::from_vec(&f, vec![1i64, 2, 3, 4, 5, 6, 7]);
        assert_eq!(v.len(), 7);
        assert_eq!(v.shard(0), &[1, 2, 3]);
        assert_eq!(v.shard(1), &[4, 5]);
        assert_eq!(v.shard(2), &[6, 7]);
        assert_eq!(v.to_vec(), vec![1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(v.get(4), Some(5));
        assert_eq!(v.get(7), None);
    }

    #[test]
    fn gather_applies_permutation() {
        let f = fabric();
        let v = DistVec::from_vec(&f, vec![10i64, 20, 30]);
        let perm = DistVec::from_vec(&f, vec![2i64, 0, 1]);
        assert_eq!(v.gather(&perm).unwrap().to_vec(), vec![30, 10, 20]);
    }

    #[test]
    fn scatter_inverts_gather() {
        let f = fabric();
        let v = DistVec::from_vec(&f, vec![10i64, 20, 30, 40]);
        let perm = DistVec::from_vec(&f, vec![3i64, 1, 0, 2]);
        let scattered = v.scatter(&perm).unwrap();
        assert_eq!(scattered.to_vec(), vec![30, 20, 40, 10]);
        assert_eq!(scattered.gather(&perm).unwrap().to_vec(), v.to_vec());
    }

    #[test]
    fn out_of_range_index_is_value_error() {
        let f = fabric();
        let v = DistVec::from_vec(&f, vec![1i64, 2]);
        let perm = DistVec::from_vec(&f, vec![0i64, 5]);
        assert!(v.gather(&perm).is_err());
        assert!(v.scatter(&perm).is_err());
    }
}
