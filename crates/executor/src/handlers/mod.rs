//! Command handlers.
//!
//! One small function per command, uniform shape: resolve operands
//! through the symbol table, estimate and admit memory, branch on the
//! operand dtypes with a closed match, run the algorithm, register the
//! result under a fresh name, and echo its descriptor.

use shoal_core::Result;
use shoal_engine::GenericEntry;

use crate::registry::Context;

pub mod broadcast;
pub mod create;
pub mod generic;
pub mod setops;

/// Register a freshly-built result entry and produce the conventional
/// `"created <name> (<dtype>, <size>)"` reply message. Called only after
/// every fallible step has succeeded, so an erroring handler never leaves
/// a half-registered entry.
pub(crate) fn register_created(ctx: &Context, entry: GenericEntry) -> Result<String> {
    let name = ctx.symtab.next_name();
    ctx.symtab.add_entry(&name, entry);
    Ok(format!("created {}", ctx.symtab.attrib(&name)?))
}
