//! Pool strategies.
//!
//! Every strategy implements [`BufferPool`]: `get` hands out an empty buffer,
//! either recycled or freshly allocated, and `put` takes one back or drops
//! it. Neither call blocks on another caller and neither can fail.
//!
//! | Strategy            | Free list                     | Bounded    | `reset` |
//! |---------------------|-------------------------------|------------|---------|
//! | [`ChannelPool`]     | lock-free fixed-capacity FIFO | yes        | yes     |
//! | [`LockPool`]        | mutex-guarded LIFO stack      | yes        | yes     |
//! | [`ThreadCachePool`] | per-thread stacks             | per thread | no      |
//! | [`NullPool`]        | none                          | n/a        | no      |

mod channel;
mod lock;
mod null;
#[cfg(feature = "thread-cache")]
mod thread_cache;

pub use channel::ChannelPool;
pub use lock::LockPool;
pub use null::NullPool;
#[cfg(feature = "thread-cache")]
pub use thread_cache::ThreadCachePool;

use std::fmt;

use crate::buffer::{Buffer, PooledBuffer};
use crate::config::PoolOption;
use crate::error::Result;

/// A free list of reusable byte buffers.
pub trait BufferPool: Send + Sync {
    /// Returns an empty buffer whose capacity is at least the configured
    /// default size. Never blocks.
    fn get(&self) -> Buffer;

    /// Hands `buf` back to the pool. Buffers that grew past the keep-size
    /// threshold, or that do not fit in a full free list, are dropped.
    fn put(&self, buf: Buffer);

    /// Returns a guard that puts the buffer back when dropped.
    fn get_pooled(&self) -> PooledBuffer<'_, Self>
    where
        Self: Sized,
    {
        PooledBuffer::new(self)
    }
}

/// A pool whose retained buffers can be released eagerly.
pub trait ResettablePool: BufferPool {
    /// Drops every buffer currently held in the free list.
    ///
    /// Long-running programs rarely need this; it exists for deliberate
    /// release of retained memory.
    fn reset(&self);
}

/// Selects a pool strategy at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// [`ChannelPool`].
    Channel,
    /// [`LockPool`].
    Lock,
    /// [`ThreadCachePool`].
    #[cfg(feature = "thread-cache")]
    ThreadCache,
    /// [`NullPool`].
    Null,
}

impl Strategy {
    /// Every available strategy, in a stable order.
    pub const ALL: &'static [Strategy] = &[
        Strategy::Channel,
        Strategy::Lock,
        #[cfg(feature = "thread-cache")]
        Strategy::ThreadCache,
        Strategy::Null,
    ];

    /// Builds a pool of this strategy from `options`.
    ///
    /// # Example
    ///
    /// ```
    /// use bufpool::{PoolOption, Strategy};
    ///
    /// for strategy in Strategy::ALL {
    ///     let pool = strategy.build([PoolOption::BufferSize(512)])?;
    ///     let buf = pool.get();
    ///     assert!(buf.capacity() >= 512);
    ///     pool.put(buf);
    /// }
    /// # Ok::<(), bufpool::PoolError>(())
    /// ```
    pub fn build<I>(self, options: I) -> Result<Box<dyn BufferPool>>
    where
        I: IntoIterator<Item = PoolOption>,
    {
        Ok(match self {
            Strategy::Channel => Box::new(ChannelPool::new(options)?),
            Strategy::Lock => Box::new(LockPool::new(options)?),
            #[cfg(feature = "thread-cache")]
            Strategy::ThreadCache => Box::new(ThreadCachePool::new(options)?),
            Strategy::Null => Box::new(NullPool::new(options)?),
        })
    }

    /// Short lowercase name, used in logs and benchmark ids.
    pub fn name(self) -> &'static str {
        match self {
            Strategy::Channel => "channel",
            Strategy::Lock => "lock",
            #[cfg(feature = "thread-cache")]
            Strategy::ThreadCache => "thread-cache",
            Strategy::Null => "null",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
