//! Bounded pool over a mutex-guarded stack.

use parking_lot::Mutex;

use crate::buffer::{self, Buffer};
use crate::config::{PoolConfig, PoolOption};
use crate::error::Result;
use crate::pool::{BufferPool, ResettablePool};

/// Free list backed by a `Mutex<Vec<_>>` used as a LIFO stack.
///
/// The most recently returned buffer is handed out first, which favours
/// buffers still warm in cache. Each operation is a single short critical
/// section; oversized buffers are rejected before the lock is taken.
///
/// # Example
///
/// ```
/// use bufpool::{BufferPool, LockPool, PoolOption, ResettablePool};
///
/// let pool = LockPool::new([PoolOption::BufferSize(1024), PoolOption::MaxSize(8192)])?;
///
/// let buf = pool.get();
/// assert!(buf.capacity() >= 1024);
/// pool.put(buf);
///
/// pool.reset();
/// assert!(pool.is_empty());
/// # Ok::<(), bufpool::PoolError>(())
/// ```
#[derive(Debug)]
pub struct LockPool {
    free: Mutex<Vec<Buffer>>,
    config: PoolConfig,
}

impl LockPool {
    /// Creates a pool from an ordered list of options.
    pub fn new<I>(options: I) -> Result<Self>
    where
        I: IntoIterator<Item = PoolOption>,
    {
        Self::with_config(PoolConfig::from_options(options)?)
    }

    /// Creates a pool from an existing configuration, validating it first.
    pub fn with_config(config: PoolConfig) -> Result<Self> {
        config.validate()?;
        tracing::debug!(
            strategy = "lock",
            retained_count = config.retained_count(),
            default_size = config.default_size(),
            max_keep_size = config.max_keep_size(),
            "buffer pool created"
        );
        Ok(Self::from_valid(config))
    }

    fn from_valid(config: PoolConfig) -> Self {
        Self {
            free: Mutex::new(Vec::with_capacity(config.retained_count())),
            config,
        }
    }

    /// Returns the configuration this pool was built with.
    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Number of idle buffers currently held.
    pub fn len(&self) -> usize {
        self.free.lock().len()
    }

    /// Returns `true` if no idle buffers are held.
    pub fn is_empty(&self) -> bool {
        self.free.lock().is_empty()
    }

    /// Maximum number of idle buffers the pool retains.
    pub fn capacity(&self) -> usize {
        self.config.retained_count()
    }
}

impl Default for LockPool {
    fn default() -> Self {
        Self::from_valid(PoolConfig::default())
    }
}

impl BufferPool for LockPool {
    #[inline]
    fn get(&self) -> Buffer {
        // Guard is released at the end of the statement.
        let popped = self.free.lock().pop();
        popped.unwrap_or_else(|| buffer::allocate(self.config.default_size()))
    }

    #[inline]
    fn put(&self, buf: Buffer) {
        let Some(buf) = buffer::recycle(buf, &self.config) else {
            return;
        };

        let mut free = self.free.lock();
        if free.len() >= self.config.retained_count() {
            drop(free);
            buffer::discard(buf, "full");
            return;
        }
        free.push(buf);
    }
}

impl ResettablePool for LockPool {
    fn reset(&self) {
        let mut free = self.free.lock();
        let dropped = free.len();
        free.clear();
        drop(free);
        tracing::debug!(strategy = "lock", dropped, "buffer pool reset");
    }
}
