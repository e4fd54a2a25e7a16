//! Engine state for the Shoal array server.
//!
//! This crate holds the shared mutable state a running server is built
//! around, plus the algorithms commands dispatch to:
//! - MemoryAdmission: per-locale usage accounting with a check-and-reserve
//!   admission protocol
//! - GenericEntry: the type-erased handle over one distributed array
//! - SymbolTable: the ownership registry mapping names to entries
//! - setops / broadcast: the sort-based multiset and segment-broadcast
//!   algorithms
//!
//! All state is explicitly passed (no ambient globals); the executor crate
//! wires it together per server instance.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod broadcast;
pub mod entry;
pub mod memory;
pub mod setops;
pub mod symtab;

pub use broadcast::broadcast;
pub use entry::GenericEntry;
pub use memory::{MemoryAdmission, Reservation};
pub use symtab::SymbolTable;
