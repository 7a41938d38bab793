#![forbid(unsafe_code)]

/// Whether position `i` of the output includes the input at `i`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScanMode {
    /// `out[i] = v[0] ⊕ … ⊕ v[i]`
    Inclusive,
    /// `out[0] = identity`, `out[i] = v[0] ⊕ … ⊕ v[i-1]`
    Exclusive,
}

/// Rows per block below which the blocked pass stops paying for itself.
#[cfg(feature = "parallel")]
const MIN_BLOCK_LEN: usize = 2048;

/// Prefix-scan `values` into `out` with an associative `combine` operator.
///
/// `identity` must be neutral for `combine` (`combine(identity, v) == v`);
/// it seeds the exclusive output and the per-block carries. Large inputs run
/// as a blocked, work-efficient parallel scan on the crate-local pool:
/// 1. one parallel pass reduces each block to its total,
/// 2. an exclusive scan of the block totals yields each block's carry-in,
/// 3. a second parallel pass rewrites every block as a local scan seeded by
///    its carry.
/// Short inputs fall back to the sequential path, as do builds without the
/// `parallel` feature or hosts where no pool could be created.
///
/// A zero-length input is legal and leaves `out` (also zero-length) as is.
pub fn scan_into<T, F>(values: &[T], out: &mut [T], identity: T, combine: &F, mode: ScanMode)
where
    T: Clone + Send + Sync,
    F: Fn(T, T) -> T + Sync,
{
    assert_eq!(
        values.len(),
        out.len(),
        "scan output length must match the input"
    );
    if values.is_empty() {
        return;
    }

    #[cfg(feature = "parallel")]
    if values.len() >= 2 * MIN_BLOCK_LEN {
        if let Some(pool) = crate::parallel::pool() {
            pool.install(|| scan_blocked(values, out, identity, combine, mode));
            return;
        }
    }

    scan_sequential(values, out, identity, combine, mode);
}

fn scan_sequential<T, F>(values: &[T], out: &mut [T], identity: T, combine: &F, mode: ScanMode)
where
    T: Clone,
    F: Fn(T, T) -> T,
{
    let mut running = identity;
    match mode {
        ScanMode::Inclusive => {
            for (slot, value) in out.iter_mut().zip(values) {
                running = combine(running, value.clone());
                *slot = running.clone();
            }
        }
        ScanMode::Exclusive => {
            for (slot, value) in out.iter_mut().zip(values) {
                *slot = running.clone();
                running = combine(running, value.clone());
            }
        }
    }
}

#[cfg(feature = "parallel")]
fn scan_blocked<T, F>(values: &[T], out: &mut [T], identity: T, combine: &F, mode: ScanMode)
where
    T: Clone + Send + Sync,
    F: Fn(T, T) -> T + Sync,
{
    use rayon::prelude::*;

    let threads = rayon::current_num_threads().max(1);
    let block_len = (values.len() / (threads * 4)).max(MIN_BLOCK_LEN);

    // Pass 1: reduce each block to its total.
    let totals: Vec<T> = values
        .par_chunks(block_len)
        .map(|block| {
            block
                .iter()
                .cloned()
                .fold(identity.clone(), |acc, v| combine(acc, v))
        })
        .collect();

    // Exclusive scan of the totals: carries[b] aggregates every block
    // before b. The totals vector is tiny (one entry per block), so this
    // stays sequential.
    let mut carries = Vec::with_capacity(totals.len());
    let mut running = identity;
    for total in totals {
        carries.push(running.clone());
        running = combine(running, total);
    }

    // Pass 2: local scan per block, seeded by the block's carry.
    out.par_chunks_mut(block_len)
        .zip(values.par_chunks(block_len))
        .zip(carries)
        .for_each(|((out_block, in_block), carry)| {
            let mut running = carry;
            match mode {
                ScanMode::Inclusive => {
                    for (slot, value) in out_block.iter_mut().zip(in_block) {
                        running = combine(running, value.clone());
                        *slot = running.clone();
                    }
                }
                ScanMode::Exclusive => {
                    for (slot, value) in out_block.iter_mut().zip(in_block) {
                        *slot = running.clone();
                        running = combine(running, value.clone());
                    }
                }
            }
        });
}
