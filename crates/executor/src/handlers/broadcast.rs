//! Segment-broadcast command handler.

use shoal_core::{Result, ShoalError};
use shoal_engine::{broadcast, GenericEntry};

use crate::args::ArgBundle;
use crate::registry::Context;

use super::register_created;

/// `broadcast(segments, values, size[, permutation])`.
///
/// Structural requirements, checked before any allocation: `segments`
/// must be Int64; a supplied `permutation` must be Int64 with length equal
/// to `size`; the value dtype is dispatched across Int64, UInt64, Float64
/// and Bool, and anything else is a type error.
pub fn broadcast_cmd(ctx: &Context, args: &ArgBundle) -> Result<String> {
    let segments = ctx.symtab.lookup(args.symbol("segments")?)?;
    let values = ctx.symtab.lookup(args.symbol("values")?)?;
    let size = args.size_arg("size")?;
    let permutation = match args.opt_symbol("permutation")? {
        Some(name) => Some(ctx.symtab.lookup(name)?),
        None => None,
    };

    // The transient cost is the expanded output (twice when a permutation
    // forces a scatter copy).
    let copies = if permutation.is_some() { 2 } else { 1 };
    let _reserved = ctx
        .admission
        .admit(copies * size as u64 * values.itemsize() as u64)?;

    let segs = segments.as_int64()?;
    let perm = match &permutation {
        Some(p) => Some(p.as_int64()?),
        None => None,
    };

    let result = match values.as_ref() {
        GenericEntry::Int64(v) => GenericEntry::Int64(broadcast(segs, v, size, perm)?),
        GenericEntry::UInt64(v) => GenericEntry::UInt64(broadcast(segs, v, size, perm)?),
        GenericEntry::Float64(v) => GenericEntry::Float64(broadcast(segs, v, size, perm)?),
        GenericEntry::Bool(v) => GenericEntry::Bool(broadcast(segs, v, size, perm)?),
        GenericEntry::Str(_) => {
            return Err(ShoalError::type_error(format!(
                "broadcast does not support {} values",
                values.dtype()
            )))
        }
    };
    register_created(ctx, result)
}
