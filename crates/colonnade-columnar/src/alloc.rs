#![forbid(unsafe_code)]

use std::collections::TryReserveError;
use thiserror::Error;

/// Failure to obtain a result buffer.
///
/// Output buffers are the one place the engine allocates on behalf of the
/// caller, so exhaustion there is reported as an error rather than an abort;
/// no partially built column is ever returned.
#[derive(Debug, Error)]
#[error("failed to allocate a column buffer of {requested} elements")]
pub struct AllocationError {
    requested: usize,
    #[source]
    source: TryReserveError,
}

impl AllocationError {
    pub fn requested(&self) -> usize {
        self.requested
    }
}

/// Allocate a `Vec` of `len` copies of `fill`, reporting failure instead of
/// aborting the process.
pub fn try_filled_vec<T: Clone>(len: usize, fill: T) -> Result<Vec<T>, AllocationError> {
    let mut out = Vec::new();
    out.try_reserve_exact(len)
        .map_err(|source| AllocationError {
            requested: len,
            source,
        })?;
    out.resize(len, fill);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocates_and_fills() {
        let v = try_filled_vec(5, 7i32).expect("small allocation succeeds");
        assert_eq!(v, vec![7; 5]);
    }

    #[test]
    fn zero_length_is_fine() {
        let v: Vec<u8> = try_filled_vec(0, 0).expect("empty allocation succeeds");
        assert!(v.is_empty());
    }

    #[test]
    fn absurd_request_reports_instead_of_aborting() {
        let err = try_filled_vec(usize::MAX / 2, 0u64).unwrap_err();
        assert_eq!(err.requested(), usize::MAX / 2);
    }
}
