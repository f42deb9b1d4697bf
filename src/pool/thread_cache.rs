//! Thread-local buffer cache for low-contention reuse.

use std::fmt;
use std::ptr;

use parking_lot::Mutex;
use thread_local::ThreadLocal;

use crate::buffer::{self, Buffer};
use crate::config::{PoolConfig, PoolOption};
use crate::error::Result;
use crate::pool::BufferPool;

type Factory = Box<dyn Fn() -> Buffer + Send + Sync>;
type Slot = Mutex<Vec<Buffer>>;

/// Free list split into one stack per thread.
///
/// `put` always pushes onto the calling thread's stack and `get` pops from it
/// first, so a get/put pair on the same thread only takes an uncontended
/// lock. When the calling thread's stack is empty, `get` takes a buffer from
/// another thread's stack before falling back to the factory. Stacks that are
/// busy are skipped rather than waited on.
///
/// Each thread's stack holds at most `retained_count` buffers; surplus
/// returns are dropped. There is no `reset`: cached buffers are freed when
/// the pool is dropped.
///
/// # Example
///
/// ```
/// use bufpool::{BufferPool, PoolOption, ThreadCachePool};
///
/// let pool = ThreadCachePool::new([PoolOption::BufferSize(2048)])?;
///
/// let buf = pool.get();
/// let ptr = buf.as_ptr();
/// pool.put(buf);
///
/// // Same thread: the cached buffer comes back.
/// assert_eq!(pool.get().as_ptr(), ptr);
/// # Ok::<(), bufpool::PoolError>(())
/// ```
pub struct ThreadCachePool {
    cache: ThreadLocal<Slot>,
    factory: Factory,
    config: PoolConfig,
}

impl ThreadCachePool {
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
            strategy = "thread-cache",
            per_thread_count = config.retained_count(),
            default_size = config.default_size(),
            max_keep_size = config.max_keep_size(),
            "buffer pool created"
        );
        Ok(Self::from_valid(config))
    }

    fn from_valid(config: PoolConfig) -> Self {
        let default_size = config.default_size();
        Self {
            cache: ThreadLocal::new(),
            factory: Box::new(move || buffer::allocate(default_size)),
            config,
        }
    }

    /// Returns the configuration this pool was built with.
    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Number of idle buffers held across every thread's stack.
    pub fn len(&self) -> usize {
        self.cache.iter().map(|slot| slot.lock().len()).sum()
    }

    /// Returns `true` if no thread holds an idle buffer.
    pub fn is_empty(&self) -> bool {
        self.cache.iter().all(|slot| slot.lock().is_empty())
    }

    fn local(&self) -> &Slot {
        self.cache.get_or_default()
    }

    /// Takes a buffer from any other thread's stack that is not busy.
    fn take_foreign(&self, local: &Slot) -> Option<Buffer> {
        self.cache
            .iter()
            .filter(|slot| !ptr::eq(*slot, local))
            .find_map(|slot| slot.try_lock()?.pop())
    }
}

impl Default for ThreadCachePool {
    fn default() -> Self {
        Self::from_valid(PoolConfig::default())
    }
}

impl fmt::Debug for ThreadCachePool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThreadCachePool")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl BufferPool for ThreadCachePool {
    #[inline]
    fn get(&self) -> Buffer {
        let local = self.local();
        // Guard is released at the end of the statement.
        let cached = local.lock().pop();
        cached
            .or_else(|| self.take_foreign(local))
            .unwrap_or_else(|| (self.factory)())
    }

    #[inline]
    fn put(&self, buf: Buffer) {
        let Some(buf) = buffer::recycle(buf, &self.config) else {
            return;
        };

        let mut stack = self.local().lock();
        if stack.len() >= self.config.retained_count() {
            drop(stack);
            buffer::discard(buf, "full");
            return;
        }
        stack.push(buf);
    }
}
