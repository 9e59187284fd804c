//! Worker pool sizing strategies.
//!
//! The tree builder owns its worker pool: a fresh [`rayon::ThreadPool`] is
//! built for every scan and dropped once the scan returns. This module
//! decides how many threads that pool gets.
//!
//! # Strategies
//! - `Default`: twice the CPU count, capped at 32 (scanning is I/O bound)
//! - `Fixed`: an explicit number of threads
//! - `NumCpusMinus1`: number of CPUs minus 1 (leaves one CPU free)
//! - `IOHeavy`: twice the CPU count, uncapped

use anyhow::Result;
use clap::ValueEnum;

/// Upper bound for the default strategy.
pub const MAX_DEFAULT_WORKERS: usize = 32;

/// Thread pool configuration strategies.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
pub enum ThreadPoolStrategy {
    /// min(32, 2 x CPU count)
    Default,
    /// Use a fixed number of threads
    Fixed,
    /// Use number of CPUs minus 1 (leaves one CPU free)
    NumCpusMinus1,
    /// Optimized for I/O-heavy workloads (2x CPU count)
    IOHeavy,
}

impl ThreadPoolStrategy {
    /// Returns a string representation of the strategy for display purposes.
    pub fn as_str(&self) -> &'static str {
        match self {
            ThreadPoolStrategy::Default => "Default",
            ThreadPoolStrategy::Fixed => "Fixed",
            ThreadPoolStrategy::NumCpusMinus1 => "NumCpusMinus1",
            ThreadPoolStrategy::IOHeavy => "IOHeavy",
        }
    }
}

/// Resolves the number of worker threads for a strategy.
///
/// # Arguments
/// * `strategy` - The thread pool strategy to use
/// * `n_threads` - Number of threads (used by `Fixed`, ignored by the others)
///
/// # Errors
/// `Fixed` with `n_threads == 0`.
///
/// # Examples
/// ```rust
/// use size_scanner::thread_pool::{worker_count, ThreadPoolStrategy};
///
/// assert_eq!(worker_count(ThreadPoolStrategy::Fixed, 4).unwrap(), 4);
/// assert!(worker_count(ThreadPoolStrategy::Default, 0).unwrap() >= 1);
/// ```
pub fn worker_count(strategy: ThreadPoolStrategy, n_threads: usize) -> Result<usize> {
    worker_count_for(strategy, n_threads, num_cpus::get())
}

fn worker_count_for(strategy: ThreadPoolStrategy, n_threads: usize, cpus: usize) -> Result<usize> {
    let cpus = cpus.max(1);
    let workers = match strategy {
        ThreadPoolStrategy::Default => std::cmp::min(MAX_DEFAULT_WORKERS, cpus * 2),
        ThreadPoolStrategy::Fixed => {
            if n_threads == 0 {
                anyhow::bail!("Fixed strategy requires n_threads > 0");
            }
            n_threads
        }
        ThreadPoolStrategy::NumCpusMinus1 => std::cmp::max(1, cpus - 1),
        ThreadPoolStrategy::IOHeavy => cpus * 2,
    };
    Ok(workers)
}

/// Default worker count used when nothing is configured.
pub fn default_workers() -> usize {
    std::cmp::min(MAX_DEFAULT_WORKERS, num_cpus::get().max(1) * 2)
}

/// Builds a dedicated pool with `n_threads` workers.
pub fn build_pool(n_threads: usize) -> Result<rayon::ThreadPool, rayon::ThreadPoolBuildError> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(n_threads.max(1))
        .thread_name(|i| format!("scan-worker-{i}"))
        .build()
}
