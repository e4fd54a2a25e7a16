//! Array creation handlers.
//!
//! These exist so clients (and tests) can materialize operands without a
//! file codec: `create` builds an array from a literal list, `arange`
//! from a range, `randint` from a uniform distribution.

use rand::Rng;
use serde_json::Value;
use shoal_core::{Dtype, Result, ShoalError};
use shoal_array::{DistVec, SegString};
use shoal_engine::GenericEntry;

use crate::args::ArgBundle;
use crate::registry::Context;

use super::register_created;

/// `create(dtype, values)`: build an array from a literal JSON list.
pub fn create_cmd(ctx: &Context, args: &ArgBundle) -> Result<String> {
    let dtype: Dtype = args.str_arg("dtype")?.parse()?;
    let values = args.list_arg("values")?;

    let _reserved = ctx
        .admission
        .admit(values.len() as u64 * dtype.itemsize() as u64)?;

    let entry = match dtype {
        Dtype::Int64 => GenericEntry::Int64(DistVec::from_vec(
            &ctx.fabric,
            parse_list(args, values, "int64", Value::as_i64)?,
        )),
        Dtype::UInt64 => GenericEntry::UInt64(DistVec::from_vec(
            &ctx.fabric,
            parse_list(args, values, "uint64", Value::as_u64)?,
        )),
        Dtype::Float64 => GenericEntry::Float64(DistVec::from_vec(
            &ctx.fabric,
            parse_list(args, values, "float64", Value::as_f64)?,
        )),
        Dtype::Bool => GenericEntry::Bool(DistVec::from_vec(
            &ctx.fabric,
            parse_list(args, values, "bool", Value::as_bool)?,
        )),
        Dtype::Str => {
            let strings = values
                .iter()
                .map(|v| v.as_str().map(str::to_string))
                .collect::<Option<Vec<_>>>()
                .ok_or_else(|| list_element_error(args, "str"))?;
            GenericEntry::Str(SegString::from_strings(&strings))
        }
    };
    register_created(ctx, entry)
}

/// `arange(start, stop, stride)`: Int64 range with a positive stride.
pub fn arange_cmd(ctx: &Context, args: &ArgBundle) -> Result<String> {
    let start = args.int_arg("start")?;
    let stop = args.int_arg("stop")?;
    let stride = args.int_arg("stride")?;
    if stride <= 0 {
        return Err(ShoalError::value_error(format!(
            "arange stride must be positive, got {}",
            stride
        )));
    }

    // wrapping_sub keeps the span exact even when stop - start exceeds
    // i64::MAX; for stop > start the difference always fits in u64.
    let count = if stop > start {
        let span = stop.wrapping_sub(start) as u64;
        let stride = stride as u64;
        span / stride + u64::from(span % stride != 0)
    } else {
        0
    };
    let _reserved = ctx.admission.admit(count.saturating_mul(8))?;

    let data: Vec<i64> = (0..count).map(|i| start + i as i64 * stride).collect();
    register_created(ctx, GenericEntry::Int64(DistVec::from_vec(&ctx.fabric, data)))
}

/// `randint(low, high, size, dtype)`: uniform samples in `[low, high)`.
/// Bool arrays ignore the bounds; the string dtype is unsupported.
pub fn randint_cmd(ctx: &Context, args: &ArgBundle) -> Result<String> {
    let low = args.int_arg("low")?;
    let high = args.int_arg("high")?;
    let size = args.size_arg("size")?;
    let dtype: Dtype = args.str_arg("dtype")?.parse()?;
    if dtype != Dtype::Bool && high <= low {
        return Err(ShoalError::value_error(format!(
            "randint requires low < high, got [{}, {})",
            low, high
        )));
    }

    let _reserved = ctx.admission.admit(size as u64 * dtype.itemsize() as u64)?;

    let mut rng = rand::thread_rng();
    let entry = match dtype {
        Dtype::Int64 => GenericEntry::Int64(DistVec::from_vec(
            &ctx.fabric,
            (0..size).map(|_| rng.gen_range(low..high)).collect(),
        )),
        Dtype::UInt64 => {
            let (lo, hi) = (
                u64::try_from(low).map_err(|_| {
                    ShoalError::value_error("randint bounds must be non-negative for uint64")
                })?,
                u64::try_from(high).map_err(|_| {
                    ShoalError::value_error("randint bounds must be non-negative for uint64")
                })?,
            );
            GenericEntry::UInt64(DistVec::from_vec(
                &ctx.fabric,
                (0..size).map(|_| rng.gen_range(lo..hi)).collect(),
            ))
        }
        Dtype::Float64 => GenericEntry::Float64(DistVec::from_vec(
            &ctx.fabric,
            (0..size)
                .map(|_| rng.gen_range(low as f64..high as f64))
                .collect(),
        )),
        Dtype::Bool => GenericEntry::Bool(DistVec::from_vec(
            &ctx.fabric,
            (0..size).map(|_| rng.gen_bool(0.5)).collect(),
        )),
        Dtype::Str => {
            return Err(ShoalError::not_implemented("randint", Dtype::Str.name()))
        }
    };
    register_created(ctx, entry)
}

fn parse_list<T>(
    args: &ArgBundle,
    values: &[Value],
    dtype: &str,
    get: impl Fn(&Value) -> Option<T>,
) -> Result<Vec<T>> {
    values
        .iter()
        .map(|v| get(v))
        .collect::<Option<Vec<T>>>()
        .ok_or_else(|| list_element_error(args, dtype))
}

fn list_element_error(args: &ArgBundle, dtype: &str) -> ShoalError {
    ShoalError::malformed(format!(
        "{}: 'values' elements must all be {}",
        args.cmd(),
        dtype
    ))
}
