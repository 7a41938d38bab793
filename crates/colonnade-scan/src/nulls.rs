#![forbid(unsafe_code)]

use crate::kernel::{scan_into, ScanMode};
use colonnade_columnar::{try_filled_vec, AllocationError, BitVec};
use std::borrow::Cow;

/// How null rows shape the output's validity.
///
/// Under either policy an invalid row feeds the operator's identity into the
/// scan, so the running aggregate is never corrupted; the policies differ
/// only in which output rows are exposed as valid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum NullHandling {
    /// Output validity is an exact copy of the input's: a null row stays
    /// null, and the value stored there is the running aggregate up to the
    /// most recent valid row.
    #[default]
    Exclude,
    /// Validity propagates forward: once a null is seen, every subsequent
    /// row is null. The stored values are identical to [`Self::Exclude`].
    Include,
}

/// Replace invalid rows with `identity` so the scan kernel can run uniformly
/// over every row. Borrows the input untouched when there is nothing to
/// substitute.
pub(crate) fn substitute<'a, T: Copy>(
    values: &'a [T],
    validity: Option<&BitVec>,
    identity: T,
) -> Cow<'a, [T]> {
    match validity {
        Some(bitmap) if !bitmap.all_true() => Cow::Owned(
            values
                .iter()
                .enumerate()
                .map(|(i, &v)| if bitmap.get(i) { v } else { identity })
                .collect(),
        ),
        _ => Cow::Borrowed(values),
    }
}

/// Derive the output validity bitmap.
///
/// Returns `None` when no output row can be invalid (input had no nulls).
/// Under [`NullHandling::Include`] the bitmap is the AND-prefix of the input
/// bits, computed by the same scan kernel as the value pass so both prefixes
/// share one parallel execution model.
pub(crate) fn output_validity(
    validity: Option<&BitVec>,
    nulls: NullHandling,
    mode: ScanMode,
) -> Result<Option<BitVec>, AllocationError> {
    let Some(bitmap) = validity else {
        return Ok(None);
    };
    if bitmap.all_true() {
        return Ok(None);
    }

    match nulls {
        NullHandling::Exclude => Ok(Some(bitmap.clone())),
        NullHandling::Include => {
            let bits = bitmap.to_bools();
            let mut scanned = try_filled_vec(bits.len(), true)?;
            scan_into(&bits, &mut scanned, true, &|a, b| a && b, mode);
            Ok(Some(BitVec::from_bools(&scanned)))
        }
    }
}
