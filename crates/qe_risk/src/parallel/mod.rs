//! Rayon-based chunking for the Monte Carlo path loop.
//!
//! Paths are split into fixed-size chunks. The chunk layout depends only on
//! the path count and batch size, never on the thread count, so running the
//! chunks sequentially or on the rayon pool gives identical output.

use rayon::prelude::*;

/// Paths per chunk.
pub const DEFAULT_BATCH_SIZE: usize = 1024;

/// Path count at which chunks move onto the rayon pool.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 4096;

/// Configuration for parallel execution.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParallelConfig {
    /// Paths per chunk
    pub batch_size: usize,
    /// Minimum paths before using parallelism
    pub parallel_threshold: usize,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

impl ParallelConfig {
    /// Creates a new parallel configuration. A zero batch size becomes 1.
    pub fn new(batch_size: usize, parallel_threshold: usize) -> Self {
        Self {
            batch_size: batch_size.max(1),
            parallel_threshold,
        }
    }

    /// Configuration that never leaves the calling thread.
    pub fn sequential() -> Self {
        Self::new(DEFAULT_BATCH_SIZE, usize::MAX)
    }

    /// Returns whether to use parallel processing for the given item count.
    #[inline]
    pub fn should_parallelize(&self, n_items: usize) -> bool {
        n_items >= self.parallel_threshold
    }

    /// Splits `0..n_items` into `(chunk_index, start, len)` triples.
    pub fn chunks(&self, n_items: usize) -> Vec<(usize, usize, usize)> {
        let batch = self.batch_size.max(1);
        (0..n_items.div_ceil(batch))
            .map(|i| {
                let start = i * batch;
                (i, start, batch.min(n_items - start))
            })
            .collect()
    }
}

/// Runs `work` over every chunk of `0..n_items` and returns the results in
/// chunk order, stopping at the first error.
///
/// Chunks go to the rayon pool when `config.should_parallelize(n_items)`.
///
/// # Examples
///
/// ```
/// use qe_risk::parallel::{map_chunks, ParallelConfig};
///
/// let config = ParallelConfig::new(4, 0);
/// let sums: Result<Vec<usize>, ()> =
///     map_chunks(&config, 10, |_, start, len| Ok((start..start + len).sum()));
/// assert_eq!(sums.unwrap(), vec![6, 22, 17]);
/// ```
pub fn map_chunks<R, E, F>(config: &ParallelConfig, n_items: usize, work: F) -> Result<Vec<R>, E>
where
    R: Send,
    E: Send,
    F: Fn(usize, usize, usize) -> Result<R, E> + Sync + Send,
{
    let chunks = config.chunks(n_items);
    if config.should_parallelize(n_items) {
        chunks
            .into_par_iter()
            .map(|(index, start, len)| work(index, start, len))
            .collect()
    } else {
        chunks
            .into_iter()
            .map(|(index, start, len)| work(index, start, len))
            .collect()
    }
}
