use mk_matrix::{MatrixError, Result};

/// Configuration for a [`WorkerPool`].
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Number of worker threads. 0 lets rayon pick (one per logical CPU,
    /// or `RAYON_NUM_THREADS` if set).
    pub num_threads: usize,
    /// Prefix for worker thread names; the worker index is appended.
    pub thread_name: String,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            num_threads: 0,
            thread_name: "mk-worker".to_string(),
        }
    }
}

/// A bounded fork-join pool for the data-parallel strategies.
///
/// The parallel strategies run on whichever rayon pool is current. Without a
/// `WorkerPool` that is rayon's global pool; inside [`WorkerPool::install`]
/// it is this one.
#[derive(Debug)]
pub struct WorkerPool {
    pool: rayon::ThreadPool,
}

impl WorkerPool {
    /// Build a pool with `num_threads` workers (0 = rayon default).
    ///
    /// # Errors
    /// Returns `MatrixError::Other` if the threads cannot be spawned.
    pub fn new(num_threads: usize) -> Result<Self> {
        Self::with_config(&PoolConfig {
            num_threads,
            ..PoolConfig::default()
        })
    }

    pub fn with_config(config: &PoolConfig) -> Result<Self> {
        let prefix = config.thread_name.clone();
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.num_threads)
            .thread_name(move |i| format!("{prefix}-{i}"))
            .build()
            .map_err(|e| MatrixError::Other(format!("failed to build worker pool: {e}")))?;
        log::debug!(
            "worker pool '{}' ready with {} threads",
            config.thread_name,
            pool.current_num_threads()
        );
        Ok(Self { pool })
    }

    pub fn num_threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Run `op` with this pool as the current pool, blocking until it and
    /// every task it forks have finished.
    pub fn install<R, F>(&self, op: F) -> R
    where
        F: FnOnce() -> R + Send,
        R: Send,
    {
        self.pool.install(op)
    }
}
