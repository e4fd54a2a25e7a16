//! Distributed array substrate for the Shoal array server.
//!
//! This crate provides:
//! - Fabric: the fixed set of locales arrays are partitioned over
//! - DistVec: a block-distributed vector with gather/scatter by permutation
//! - radix_sort: the stable LSD radix sort primitive and its memory estimator
//! - SegString: segmented string arrays (offsets + byte payload)
//!
//! The fabric is created once at startup; every array is carved into one
//! shard per locale using a block distribution. Algorithms above this
//! crate treat the sort as their sole ordering primitive.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod distvec;
pub mod fabric;
pub mod segstring;
pub mod sort;

pub use distvec::DistVec;
pub use fabric::Fabric;
pub use segstring::SegString;
pub use sort::{radix_sort, radix_sort_mem_estimate, RadixKey, BITS_PER_DIGIT};
