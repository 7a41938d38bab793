#![forbid(unsafe_code)]

#[cfg(feature = "parallel")]
use rayon::ThreadPool;
#[cfg(feature = "parallel")]
use std::sync::OnceLock;

/// Best-effort crate-local rayon pool for the scan kernels.
///
/// Rayon normally uses a global pool. Under heavy resource pressure (many
/// test binaries on one host) global pool initialization can fail and rayon
/// panics on first use, so the engine builds its own pool and falls back to
/// sequential execution when even that cannot be created.
#[cfg(feature = "parallel")]
static SCAN_POOL: OnceLock<Option<ThreadPool>> = OnceLock::new();

#[cfg(feature = "parallel")]
fn desired_threads() -> usize {
    let from_env = std::env::var("RAYON_NUM_THREADS")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .filter(|&n| n > 0);
    from_env.unwrap_or_else(|| {
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    })
}

#[cfg(feature = "parallel")]
fn build_pool() -> Option<ThreadPool> {
    let requested = desired_threads().max(1);
    let try_build = |n| rayon::ThreadPoolBuilder::new().num_threads(n).build();

    match try_build(requested) {
        Ok(pool) => Some(pool),
        Err(_) if requested > 1 => try_build(1).ok(),
        Err(_) => None,
    }
}

/// The scan pool, if one could be created.
#[cfg(feature = "parallel")]
pub(crate) fn pool() -> Option<&'static ThreadPool> {
    SCAN_POOL.get_or_init(build_pool).as_ref()
}
