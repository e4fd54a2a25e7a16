//! The distributed symbol table.
//!
//! An ownership registry mapping string names to generic entries. Entries
//! are published only once fully built, so a concurrent lookup never sees
//! a partially-constructed array; mutations on the same name serialize
//! through the map's per-key locking while lookups on unrelated names
//! proceed concurrently. The table also owns the memory accounting of its
//! entries: registering charges the entry's bytes, removing or replacing
//! releases them.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use shoal_core::{Result, ShoalError};
use tracing::debug;

use crate::entry::GenericEntry;
use crate::memory::MemoryAdmission;

/// Name → entry registry for one server instance.
#[derive(Debug)]
pub struct SymbolTable {
    entries: DashMap<String, Arc<GenericEntry>>,
    next_id: AtomicU64,
    admission: Arc<MemoryAdmission>,
}

impl SymbolTable {
    /// Build an empty table that charges and releases entry memory
    /// through `admission`.
    pub fn new(admission: Arc<MemoryAdmission>) -> Self {
        SymbolTable {
            entries: DashMap::new(),
            next_id: AtomicU64::new(0),
            admission,
        }
    }

    /// Mint a fresh name. Never collides with a prior or concurrently
    /// issued name; user-supplied names cannot race the counter.
    pub fn next_name(&self) -> String {
        format!("id_{}", self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Insert or replace the mapping for `name`. The entry must be fully
    /// built before this call; replacement releases ownership (and memory
    /// accounting) of any previous entry under that name.
    pub fn add_entry(&self, name: &str, entry: GenericEntry) -> Arc<GenericEntry> {
        let bytes = entry.size_bytes();
        let entry = Arc::new(entry);
        self.admission.charge(bytes);
        let previous = self.entries.insert(name.to_string(), Arc::clone(&entry));
        if let Some(old) = previous {
            self.admission.release(old.size_bytes());
        }
        debug!(name, dtype = %entry.dtype(), size = entry.len(), "registered entry");
        entry
    }

    /// Resolve a name to its live entry.
    pub fn lookup(&self, name: &str) -> Result<Arc<GenericEntry>> {
        self.entries
            .get(name)
            .map(|r| Arc::clone(r.value()))
            .ok_or_else(|| ShoalError::UnknownSymbol {
                name: name.to_string(),
            })
    }

    /// Remove a name, releasing its entry's memory accounting.
    pub fn delete(&self, name: &str) -> Result<()> {
        match self.entries.remove(name) {
            Some((_, old)) => {
                self.admission.release(old.size_bytes());
                Ok(())
            }
            None => Err(ShoalError::UnknownSymbol {
                name: name.to_string(),
            }),
        }
    }

    /// Human-readable descriptor for replies: `"name (dtype, size)"`.
    /// Observability only, never control flow.
    pub fn attrib(&self, name: &str) -> Result<String> {
        let entry = self.lookup(name)?;
        Ok(format!("{} ({}, {})", name, entry.dtype(), entry.len()))
    }

    /// Drop every entry, releasing all accounting.
    pub fn clear(&self) {
        self.entries.retain(|_, entry| {
            self.admission.release(entry.size_bytes());
            false
        });
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no entries are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use shoal_array::{DistVec, Fabric};

    use super::*;

    fn table() -> (Arc<Fabric>, SymbolTable) {
        let fabric = Arc::new(Fabric::with_physical_memory(2, 1 << 30));
        let admission = Arc::new(MemoryAdmission::new(&fabric, 50).unwrap());
        (fabric.clone(), SymbolTable::new(admission))
    }

    fn int_entry(f: &Arc<Fabric>, data: Vec<i64>) -> GenericEntry {
        GenericEntry::Int64(DistVec::from_vec(f, data))
    }

    #[test]
    fn fresh_names_are_distinct() {
        let (_, tab) = table();
        let names: std::collections::HashSet<String> =
            (0..100).map(|_| tab.next_name()).collect();
        assert_eq!(names.len(), 100);
    }

    #[test]
    fn lookup_unknown_fails() {
        let (_, tab) = table();
        assert_eq!(
            tab.lookup("nonexistent").unwrap_err(),
            ShoalError::UnknownSymbol {
                name: "nonexistent".into()
            }
        );
    }

    #[test]
    fn attrib_describes_entry() {
        let (f, tab) = table();
        tab.add_entry("a", int_entry(&f, vec![1, 2, 3, 4, 5]));
        assert_eq!(tab.attrib("a").unwrap(), "a (int64, 5)");
    }

    #[test]
    fn replace_releases_old_accounting() {
        let (f, tab) = table();
        tab.add_entry("a", int_entry(&f, vec![0; 100]));
        assert_eq!(tab.admission.used(), 800);
        tab.add_entry("a", int_entry(&f, vec![0; 10]));
        assert_eq!(tab.admission.used(), 80);
        tab.delete("a").unwrap();
        assert_eq!(tab.admission.used(), 0);
        assert!(tab.delete("a").is_err());
    }

    #[test]
    fn clear_empties_table_and_accounting() {
        let (f, tab) = table();
        tab.add_entry("a", int_entry(&f, vec![1, 2]));
        tab.add_entry("b", int_entry(&f, vec![3]));
        tab.clear();
        assert!(tab.is_empty());
        assert_eq!(tab.admission.used(), 0);
    }

    #[test]
    fn concurrent_minting_stays_unique() {
        use std::collections::HashSet;
        use std::thread;

        let (_, tab) = table();
        let tab = Arc::new(tab);
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let tab = Arc::clone(&tab);
                thread::spawn(move || (0..250).map(|_| tab.next_name()).collect::<Vec<_>>())
            })
            .collect();
        let mut seen = HashSet::new();
        for h in handles {
            for name in h.join().unwrap() {
                assert!(seen.insert(name));
            }
        }
        assert_eq!(seen.len(), 1000);
    }
}
