#![forbid(unsafe_code)]

use crate::aggregation::{AggregationKind, AggregationSpec, ScanValue};
use crate::builder;
use crate::kernel::{scan_into, ScanMode};
use crate::nulls::{self, NullHandling};
use colonnade_columnar::{AllocationError, BitVec, Column, ColumnData, TypeCategory};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScanError {
    /// The {kind × type category × mode} combination has no defined
    /// semantics. Not retryable; pick a valid combination.
    #[error("{message}")]
    UnsupportedOperation { message: String },

    /// A result buffer could not be obtained. The call returns nothing.
    #[error(transparent)]
    Allocation(#[from] AllocationError),
}

impl ScanError {
    fn unsupported_string_scan() -> Self {
        ScanError::UnsupportedOperation {
            message: "String types support only inclusive min/max scan".to_owned(),
        }
    }
}

/// Compute the running aggregate of `input` as a new column.
///
/// The input is borrowed read-only; the result is freshly allocated and
/// exclusively owned by the caller. Numeric columns support every
/// {aggregation × mode} combination; string columns support inclusive
/// min/max only. See [`NullHandling`] for how nulls shape the output.
///
/// # Errors
///
/// [`ScanError::UnsupportedOperation`] if the combination is rejected at
/// dispatch, [`ScanError::Allocation`] if a result buffer cannot be
/// obtained. No partial result is ever returned.
pub fn scan(
    input: &Column,
    agg: &AggregationSpec,
    mode: ScanMode,
    nulls: NullHandling,
) -> Result<Column, ScanError> {
    if !agg.supports(input.category(), mode) {
        debug_assert_eq!(input.category(), TypeCategory::Utf8);
        return Err(ScanError::unsupported_string_scan());
    }

    macro_rules! numeric_arm {
        ($values:expr, $variant:ident) => {
            scan_numeric($values, input.validity(), agg, mode, nulls, ColumnData::$variant)
        };
    }

    match input.data() {
        ColumnData::Int8(values) => numeric_arm!(values, Int8),
        ColumnData::Int16(values) => numeric_arm!(values, Int16),
        ColumnData::Int32(values) => numeric_arm!(values, Int32),
        ColumnData::Int64(values) => numeric_arm!(values, Int64),
        ColumnData::UInt8(values) => numeric_arm!(values, UInt8),
        ColumnData::UInt16(values) => numeric_arm!(values, UInt16),
        ColumnData::UInt32(values) => numeric_arm!(values, UInt32),
        ColumnData::UInt64(values) => numeric_arm!(values, UInt64),
        ColumnData::Float32(values) => numeric_arm!(values, Float32),
        ColumnData::Float64(values) => numeric_arm!(values, Float64),
        ColumnData::Utf8(values) => scan_utf8(values, input.validity(), agg, nulls),
    }
}

/// The monomorphized numeric scan: substitute nulls with the identity, run
/// one uniform prefix pass, derive the output validity, assemble.
fn scan_numeric<T, C>(
    values: &[T],
    validity: Option<&BitVec>,
    agg: &AggregationSpec,
    mode: ScanMode,
    nulls: NullHandling,
    wrap: C,
) -> Result<Column, ScanError>
where
    T: ScanValue,
    C: FnOnce(Vec<T>) -> ColumnData,
{
    let identity = T::identity(agg.kind());
    let combine = T::combine_fn(agg.kind());

    let substituted = nulls::substitute(values, validity, identity);
    let mut out = builder::alloc_values(values.len(), identity)?;
    scan_into(&substituted, &mut out, identity, &combine, mode);

    let out_validity = nulls::output_validity(validity, nulls, mode)?;
    Ok(builder::assemble(wrap(out), out_validity))
}

fn lexicographic_min(a: Arc<str>, b: Arc<str>) -> Arc<str> {
    if b.as_ref() < a.as_ref() {
        b
    } else {
        a
    }
}

fn lexicographic_max(a: Arc<str>, b: Arc<str>) -> Arc<str> {
    if b.as_ref() > a.as_ref() {
        b
    } else {
        a
    }
}

/// The string scan: inclusive min/max only.
///
/// There is no finite string that compares above every other string, so
/// instead of a sentinel identity the values are lifted into
/// `Option<Arc<str>>` with `None` as the operator's identity, the same
/// identity-substitution that keeps the kernel branch-free on the numeric
/// path. Rows whose running aggregate has seen no valid value yet surface
/// the empty string; such rows are only reachable when they were null in the
/// input, so they are never exposed as valid.
fn scan_utf8(
    values: &[Arc<str>],
    validity: Option<&BitVec>,
    agg: &AggregationSpec,
    nulls: NullHandling,
) -> Result<Column, ScanError> {
    let pick: fn(Arc<str>, Arc<str>) -> Arc<str> = match agg.kind() {
        AggregationKind::Min => lexicographic_min,
        AggregationKind::Max => lexicographic_max,
        AggregationKind::Sum | AggregationKind::Product => {
            return Err(ScanError::unsupported_string_scan());
        }
    };
    let combine = move |a: Option<Arc<str>>, b: Option<Arc<str>>| match (a, b) {
        (None, x) | (x, None) => x,
        (Some(a), Some(b)) => Some(pick(a, b)),
    };

    let substituted: Vec<Option<Arc<str>>> = values
        .iter()
        .enumerate()
        .map(|(i, v)| match validity {
            Some(bitmap) if !bitmap.get(i) => None,
            _ => Some(v.clone()),
        })
        .collect();

    let mut out: Vec<Option<Arc<str>>> = builder::alloc_values(values.len(), None)?;
    scan_into(
        &substituted,
        &mut out,
        None,
        &combine,
        ScanMode::Inclusive,
    );

    let filled: Vec<Arc<str>> = out
        .into_iter()
        .map(|v| v.unwrap_or_else(|| Arc::<str>::from("")))
        .collect();

    let out_validity = nulls::output_validity(validity, nulls, ScanMode::Inclusive)?;
    Ok(builder::assemble(ColumnData::Utf8(filled), out_validity))
}
