//! The locale fabric.
//!
//! A fabric is a fixed set of locales created at startup. Every
//! distributed array owns one shard per locale; shard boundaries come from
//! the block distribution computed here. Each locale also knows its
//! physical memory, which the admission controller turns into a byte
//! budget.

use std::ops::Range;

use shoal_core::{Result, ShoalError};

/// One partition of the compute fabric.
#[derive(Debug, Clone)]
struct Locale {
    physical_memory: u64,
}

/// The fixed set of locales arrays are partitioned over.
#[derive(Debug)]
pub struct Fabric {
    locales: Vec<Locale>,
}

impl Fabric {
    /// Build a fabric of `num_locales` partitions, querying physical
    /// memory from the host and splitting it evenly between locales.
    ///
    /// Fails if the physical memory of the host cannot be resolved;
    /// callers treat that as startup-fatal.
    pub fn detect(num_locales: usize) -> Result<Self> {
        if num_locales == 0 {
            return Err(ShoalError::value_error("fabric needs at least one locale"));
        }
        let total = host_physical_memory()?;
        Ok(Self::with_physical_memory(num_locales, total / num_locales as u64))
    }

    /// Build a fabric with an explicit per-locale physical memory figure.
    /// Used by tests and by deployments that pin the budget in config.
    pub fn with_physical_memory(num_locales: usize, bytes_per_locale: u64) -> Self {
        assert!(num_locales > 0, "fabric needs at least one locale");
        Fabric {
            locales: vec![
                Locale {
                    physical_memory: bytes_per_locale,
                };
                num_locales
            ],
        }
    }

    /// Number of locales in the fabric.
    pub fn num_locales(&self) -> usize {
        self.locales.len()
    }

    /// Physical memory of one locale in bytes.
    pub fn physical_memory(&self, locale: usize) -> u64 {
        self.locales[locale].physical_memory
    }

    /// Block-distribution shard boundaries for an array of `len` elements:
    /// one contiguous range per locale, remainder elements going to the
    /// leading locales.
    pub fn block_ranges(&self, len: usize) -> Vec<Range<usize>> {
        let n = self.locales.len();
        let base = len / n;
        let rem = len % n;
        let mut ranges = Vec::with_capacity(n);
        let mut start = 0;
        for l in 0..n {
            let size = base + usize::from(l < rem);
            ranges.push(start..start + size);
            start += size;
        }
        ranges
    }
}

/// Total physical memory of the host in bytes.
///
/// Reads `/proc/meminfo` on Linux. There is no portable stdlib query, and
/// the figure is only needed once at startup, so an unreadable source is
/// reported as an error for the caller to treat as fatal.
fn host_physical_memory() -> Result<u64> {
    let text = std::fs::read_to_string("/proc/meminfo").map_err(|e| ShoalError::Io {
        reason: format!("cannot read /proc/meminfo: {}", e),
    })?;
    for line in text.lines() {
        if let Some(rest) = line.strip_prefix("MemTotal:") {
            let kb: u64 = rest
                .trim()
                .trim_end_matches("kB")
                .trim()
                .parse()
                .map_err(|_| ShoalError::internal("unparseable MemTotal in /proc/meminfo"))?;
            return Ok(kb * 1024);
        }
    }
    Err(ShoalError::internal("MemTotal missing from /proc/meminfo"))
}
