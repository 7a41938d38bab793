#![forbid(unsafe_code)]

use colonnade_columnar::{try_filled_vec, AllocationError, BitVec, Column, ColumnData};

/// Allocate the output value buffer for a scan of `len` rows.
///
/// All result-buffer allocation funnels through here so exhaustion surfaces
/// as [`AllocationError`] and the call returns no partial result.
pub(crate) fn alloc_values<T: Clone>(len: usize, fill: T) -> Result<Vec<T>, AllocationError> {
    try_filled_vec(len, fill)
}

/// Assemble the scan's value buffer and derived validity into an owned
/// result column.
///
/// The caller guarantees both parts describe the same row count (the value
/// buffer was allocated to the input's length and the bitmap, when present,
/// was derived from the input's); `Column::new` re-asserts that invariant.
pub(crate) fn assemble(data: ColumnData, validity: Option<BitVec>) -> Column {
    Column::new(data, validity)
}
