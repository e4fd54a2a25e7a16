//! Multiset command handlers.
//!
//! All five commands share the same skeleton: resolve both operands,
//! admit the larger of the two sort estimates, then dispatch on the
//! operand dtype pair. Int64/Int64 and UInt64/UInt64 are the supported
//! combinations; anything else is `NotImplemented` and never touches the
//! symbol table.
//!
//! The `assume_unique` flag skips the internal de-duplication pass. It is
//! an optimization contract: wrongly asserting it for non-unique input
//! gives implementation-defined results, not an error.

use shoal_core::{Result, ShoalError};
use shoal_array::{radix_sort_mem_estimate, DistVec};
use shoal_engine::memory::Reservation;
use shoal_engine::{setops, GenericEntry, MemoryAdmission};

use crate::args::ArgBundle;
use crate::registry::Context;

use super::register_created;

/// Admit the transient cost of sorting the named operands: the maximum of
/// the per-operand sort estimates, taken before any allocation.
fn admit_sorts(ctx: &Context, operands: &[&GenericEntry]) -> Result<Reservation> {
    let estimate = MemoryAdmission::estimate_max(
        operands
            .iter()
            .map(|e| radix_sort_mem_estimate(e.len() as u64, e.itemsize() as u64)),
    );
    ctx.admission.admit(estimate)
}

fn unsupported(cmd: &str, a: &GenericEntry, b: &GenericEntry) -> ShoalError {
    ShoalError::not_implemented(cmd, format!("{}/{}", a.dtype(), b.dtype()))
}

/// Shared skeleton of the binary set operations that take `assume_unique`.
fn binary_setop(
    ctx: &Context,
    args: &ArgBundle,
    op_i64: fn(&DistVec<i64>, &DistVec<i64>, bool) -> DistVec<i64>,
    op_u64: fn(&DistVec<u64>, &DistVec<u64>, bool) -> DistVec<u64>,
) -> Result<String> {
    let a = ctx.symtab.lookup(args.symbol("a")?)?;
    let b = ctx.symtab.lookup(args.symbol("b")?)?;
    let assume_unique = args.bool_or("assume_unique", false)?;

    let _reserved = admit_sorts(ctx, &[&a, &b])?;
    let result = match (a.as_ref(), b.as_ref()) {
        (GenericEntry::Int64(x), GenericEntry::Int64(y)) => {
            GenericEntry::Int64(op_i64(x, y, assume_unique))
        }
        (GenericEntry::UInt64(x), GenericEntry::UInt64(y)) => {
            GenericEntry::UInt64(op_u64(x, y, assume_unique))
        }
        _ => return Err(unsupported(args.cmd(), &a, &b)),
    };
    register_created(ctx, result)
}

/// `intersect1d(a, b, assume_unique)`: elements present in both.
pub fn intersect1d_cmd(ctx: &Context, args: &ArgBundle) -> Result<String> {
    binary_setop(ctx, args, setops::intersect1d, setops::intersect1d)
}

/// `setxor1d(a, b, assume_unique)`: elements in exactly one.
pub fn setxor1d_cmd(ctx: &Context, args: &ArgBundle) -> Result<String> {
    binary_setop(ctx, args, setops::setxor1d, setops::setxor1d)
}

/// `setdiff1d(a, b, assume_unique)`: elements in `a` not in `b`.
pub fn setdiff1d_cmd(ctx: &Context, args: &ArgBundle) -> Result<String> {
    binary_setop(ctx, args, setops::setdiff1d, setops::setdiff1d)
}

/// `union1d(a, b)`: elements present in either, deduplicated.
pub fn union1d_cmd(ctx: &Context, args: &ArgBundle) -> Result<String> {
    let a = ctx.symtab.lookup(args.symbol("a")?)?;
    let b = ctx.symtab.lookup(args.symbol("b")?)?;

    let _reserved = admit_sorts(ctx, &[&a, &b])?;
    let result = match (a.as_ref(), b.as_ref()) {
        (GenericEntry::Int64(x), GenericEntry::Int64(y)) => {
            GenericEntry::Int64(setops::union1d(x, y))
        }
        (GenericEntry::UInt64(x), GenericEntry::UInt64(y)) => {
            GenericEntry::UInt64(setops::union1d(x, y))
        }
        _ => return Err(unsupported(args.cmd(), &a, &b)),
    };
    register_created(ctx, result)
}

/// `in1d(a, b, invert)`: Bool array of length `|a|` marking which
/// elements of `a` occur in `b`.
pub fn in1d_cmd(ctx: &Context, args: &ArgBundle) -> Result<String> {
    let a = ctx.symtab.lookup(args.symbol("a")?)?;
    let b = ctx.symtab.lookup(args.symbol("b")?)?;
    let invert = args.bool_or("invert", false)?;

    let _reserved = admit_sorts(ctx, &[&a, &b])?;
    let result = match (a.as_ref(), b.as_ref()) {
        (GenericEntry::Int64(x), GenericEntry::Int64(y)) => {
            GenericEntry::Bool(setops::in1d(x, y, invert))
        }
        (GenericEntry::UInt64(x), GenericEntry::UInt64(y)) => {
            GenericEntry::Bool(setops::in1d(x, y, invert))
        }
        _ => return Err(unsupported(args.cmd(), &a, &b)),
    };
    register_created(ctx, result)
}
