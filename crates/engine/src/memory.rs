//! Memory admission control.
//!
//! Tracks per-locale memory attributed to live arrays against a budget
//! derived from each locale's physical memory, and accepts or rejects a
//! prospective allocation before any distributed storage is touched. The
//! accounting is a budget heuristic, not a hard allocator: estimates are
//! conservative upper bounds, and the check-and-reserve step is atomic so
//! two concurrent admissions cannot both pass against stale usage.

use std::sync::Arc;

use parking_lot::Mutex;
use shoal_core::{Result, ShoalError};
use shoal_array::Fabric;
use tracing::{debug, info};

/// Per-locale usage counters plus the monotonic peak.
#[derive(Debug)]
struct Accounting {
    used: Vec<u64>,
    high_water: u64,
}

/// The admission controller for one server instance.
#[derive(Debug)]
pub struct MemoryAdmission {
    limits: Vec<u64>,
    state: Mutex<Accounting>,
}

impl MemoryAdmission {
    /// Build the controller from the fabric and the configured percentage
    /// of physical memory available to arrays.
    pub fn new(fabric: &Fabric, mem_max_pct: u8) -> Result<Self> {
        if mem_max_pct == 0 || mem_max_pct > 100 {
            return Err(ShoalError::value_error(format!(
                "memory percentage must be in 1..=100, got {}",
                mem_max_pct
            )));
        }
        let limits: Vec<u64> = (0..fabric.num_locales())
            .map(|l| fabric.physical_memory(l) / 100 * u64::from(mem_max_pct))
            .collect();
        info!(
            locales = limits.len(),
            total_limit = limits.iter().sum::<u64>(),
            "memory admission configured"
        );
        Ok(MemoryAdmission {
            limits,
            state: Mutex::new(Accounting {
                used: vec![0; fabric.num_locales()],
                high_water: 0,
            }),
        })
    }

    /// Conservative bound for an operation reading several operands of
    /// unknown relative cost: the maximum over per-operand estimates, not
    /// the sum, because operands are processed largely independently
    /// before being combined.
    pub fn estimate_max(estimates: impl IntoIterator<Item = u64>) -> u64 {
        estimates.into_iter().max().unwrap_or(0)
    }

    /// Check a prospective allocation against the aggregate budget and
    /// reserve it. Fails with `MemoryLimitExceeded` before anything is
    /// allocated; on success the returned [`Reservation`] holds the bytes
    /// until dropped.
    pub fn admit(self: &Arc<Self>, bytes: u64) -> Result<Reservation> {
        let mut state = self.state.lock();
        let used: u64 = state.used.iter().sum();
        let limit: u64 = self.limits.iter().sum();
        let prospective = used.saturating_add(bytes);
        if prospective > limit {
            return Err(ShoalError::MemoryLimitExceeded {
                requested: bytes,
                used,
                limit,
            });
        }
        self.add_locked(&mut state, bytes);
        debug!(bytes, total = prospective, "admission reserved");
        Ok(Reservation {
            admission: Arc::clone(self),
            bytes,
        })
    }

    /// Attribute bytes to a live entry. Not a check: the admission that
    /// gated the operation already covered at least this much.
    pub fn charge(&self, bytes: u64) {
        let mut state = self.state.lock();
        self.add_locked(&mut state, bytes);
    }

    /// Release bytes previously reserved or charged.
    pub fn release(&self, bytes: u64) {
        let mut state = self.state.lock();
        let n = state.used.len() as u64;
        for (l, u) in state.used.iter_mut().enumerate() {
            *u = u.saturating_sub(Self::locale_share(bytes, n, l as u64));
        }
    }

    /// Aggregate bytes currently attributed across all locales.
    pub fn used(&self) -> u64 {
        self.state.lock().used.iter().sum()
    }

    /// Aggregate byte budget across all locales.
    pub fn limit(&self) -> u64 {
        self.limits.iter().sum()
    }

    /// Monotonic peak of aggregate usage. Informational.
    pub fn high_water(&self) -> u64 {
        self.state.lock().high_water
    }

    fn add_locked(&self, state: &mut Accounting, bytes: u64) {
        let n = state.used.len() as u64;
        for (l, u) in state.used.iter_mut().enumerate() {
            *u += Self::locale_share(bytes, n, l as u64);
        }
        let total: u64 = state.used.iter().sum();
        if total > state.high_water {
            state.high_water = total;
            info!(high_water = total, "new memory high-water mark");
        }
    }

    // Even split, remainder to the leading locales.
    fn locale_share(bytes: u64, num_locales: u64, locale: u64) -> u64 {
        bytes / num_locales + u64::from(locale < bytes % num_locales)
    }
}

/// An admitted-but-not-yet-committed allocation.
///
/// Dropping the reservation releases its bytes, so a command that fails
/// after admission leaves no accounting residue. Commands that register a
/// result charge the entry's bytes separately through the symbol table and
/// then drop the reservation.
#[derive(Debug)]
pub struct Reservation {
    admission: Arc<MemoryAdmission>,
    bytes: u64,
}

impl Reservation {
    /// Bytes held by this reservation.
    pub fn bytes(&self) -> u64 {
        self.bytes
    }
}

impl Drop for Reservation {
    fn drop(&mut self) {
        self.admission.release(self.bytes);
    }
}
