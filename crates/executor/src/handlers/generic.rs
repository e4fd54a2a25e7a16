//! Inspection and lifecycle handlers: info, delete, tolist, memory, clear.

use serde_json::{json, Value};
use shoal_core::{Result, ShoalError};
use shoal_engine::GenericEntry;

use crate::args::ArgBundle;
use crate::registry::Context;

/// Largest array `tolist` will serialize into a reply message. Bulk reads
/// belong to a binary transfer path, not the command reply channel.
const TOLIST_MAX: usize = 10_000;

/// `info(name)`: the entry's descriptor.
pub fn info_cmd(ctx: &Context, args: &ArgBundle) -> Result<String> {
    ctx.symtab.attrib(args.symbol("name")?)
}

/// `delete(name)`: remove the entry and release its memory accounting.
pub fn delete_cmd(ctx: &Context, args: &ArgBundle) -> Result<String> {
    let name = args.symbol("name")?;
    ctx.symtab.delete(name)?;
    Ok(format!("deleted {}", name))
}

/// `tolist(name)`: the array's elements as a JSON list, for small arrays.
pub fn tolist_cmd(ctx: &Context, args: &ArgBundle) -> Result<String> {
    let name = args.symbol("name")?;
    let entry = ctx.symtab.lookup(name)?;
    if entry.len() > TOLIST_MAX {
        return Err(ShoalError::value_error(format!(
            "{} has {} elements, tolist is limited to {}",
            name,
            entry.len(),
            TOLIST_MAX
        )));
    }
    let list: Vec<Value> = match entry.as_ref() {
        GenericEntry::Int64(v) => v.iter().map(|&x| json!(x)).collect(),
        GenericEntry::UInt64(v) => v.iter().map(|&x| json!(x)).collect(),
        GenericEntry::Float64(v) => v.iter().map(|&x| json!(x)).collect(),
        GenericEntry::Bool(v) => v.iter().map(|&x| json!(x)).collect(),
        GenericEntry::Str(s) => (0..s.len())
            .map(|i| s.get(i).map(|x| json!(x)))
            .collect::<Result<Vec<_>>>()?,
    };
    serde_json::to_string(&list).map_err(|e| ShoalError::internal(e.to_string()))
}

/// `memory()`: aggregate usage report across all locales.
pub fn memory_cmd(ctx: &Context, _args: &ArgBundle) -> Result<String> {
    Ok(format!(
        "memory used {} of {} bytes (high water {})",
        ctx.admission.used(),
        ctx.admission.limit(),
        ctx.admission.high_water()
    ))
}

/// `clear()`: drop every entry in the symbol table.
pub fn clear_cmd(ctx: &Context, _args: &ArgBundle) -> Result<String> {
    let dropped = ctx.symtab.len();
    ctx.symtab.clear();
    Ok(format!("cleared {} entries", dropped))
}
