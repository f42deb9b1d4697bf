//! Bounded lock-free pool over a fixed-capacity FIFO queue.

use crossbeam_queue::ArrayQueue;

use crate::buffer::{self, Buffer};
use crate::config::{PoolConfig, PoolOption};
use crate::error::Result;
use crate::pool::{BufferPool, ResettablePool};

/// Free list backed by a fixed-capacity concurrent queue.
///
/// The queue holds at most `retained_count` buffers, so retained memory never
/// exceeds `retained_count * max_keep_size`. When the queue is empty `get`
/// allocates instead of waiting, and when it is full `put` drops the buffer
/// instead of waiting.
///
/// # Example
///
/// ```
/// use bufpool::{BufferPool, ChannelPool, PoolOption};
///
/// let pool = ChannelPool::new([PoolOption::PoolSize(25)])?;
///
/// let mut buf = pool.get();
/// buf.extend_from_slice(b"request body");
/// pool.put(buf);
///
/// assert_eq!(pool.len(), 1);
/// # Ok::<(), bufpool::PoolError>(())
/// ```
#[derive(Debug)]
pub struct ChannelPool {
    queue: ArrayQueue<Buffer>,
    config: PoolConfig,
}

impl ChannelPool {
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
            strategy = "channel",
            retained_count = config.retained_count(),
            default_size = config.default_size(),
            max_keep_size = config.max_keep_size(),
            "buffer pool created"
        );
        Ok(Self::from_valid(config))
    }

    fn from_valid(config: PoolConfig) -> Self {
        Self {
            queue: ArrayQueue::new(config.retained_count()),
            config,
        }
    }

    /// Returns the configuration this pool was built with.
    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Number of idle buffers currently held.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns `true` if no idle buffers are held.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Maximum number of idle buffers the pool retains.
    pub fn capacity(&self) -> usize {
        self.queue.capacity()
    }
}

impl Default for ChannelPool {
    fn default() -> Self {
        Self::from_valid(PoolConfig::default())
    }
}

impl BufferPool for ChannelPool {
    #[inline]
    fn get(&self) -> Buffer {
        self.queue
            .pop()
            .unwrap_or_else(|| buffer::allocate(self.config.default_size()))
    }

    #[inline]
    fn put(&self, buf: Buffer) {
        let Some(buf) = buffer::recycle(buf, &self.config) else {
            return;
        };

        if let Err(buf) = self.queue.push(buf) {
            buffer::discard(buf, "full");
        }
    }
}

impl ResettablePool for ChannelPool {
    fn reset(&self) {
        let mut dropped = 0usize;
        while self.queue.pop().is_some() {
            dropped += 1;
        }
        tracing::debug!(strategy = "channel", dropped, "buffer pool reset");
    }
}
