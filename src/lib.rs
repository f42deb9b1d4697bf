//! bufpool
//!
//! Free-list pools of reusable byte buffers.
//!
//! `bufpool` hands out growable byte buffers to concurrent callers and takes
//! them back for reuse, so hot paths stop paying for a fresh allocation on
//! every request. Several strategies share one contract:
//!
//! - [`ChannelPool`]: bounded lock-free FIFO
//! - [`LockPool`]: bounded mutex-guarded LIFO
//! - [`ThreadCachePool`]: per-thread stacks, shared on a miss
//! - [`NullPool`]: never recycles (baseline)
//!
//! Every strategy follows the same rules:
//! - `get` never blocks; an empty free list means a fresh allocation
//! - `put` never blocks; a full free list means the buffer is dropped
//! - buffers that grew past the keep-size threshold are dropped, not kept,
//!   judged by the whole allocation rather than the space left after a split
//! - recycled buffers always come back with length zero and at least the
//!   default capacity
//!
//! Only construction can fail.
//!
//! # Example
//!
//! ```
//! use bufpool::{BufferPool, ChannelPool, PoolError, PoolOption};
//!
//! fn main() -> Result<(), PoolError> {
//!     let pool = ChannelPool::new([
//!         PoolOption::PoolSize(64),
//!         PoolOption::BufferSize(4096),
//!         PoolOption::MaxSize(16 * 1024),
//!     ])?;
//!
//!     std::thread::scope(|s| {
//!         for _ in 0..4 {
//!             s.spawn(|| {
//!                 for _ in 0..100 {
//!                     let mut buf = pool.get();
//!                     buf.extend_from_slice(b"payload");
//!                     pool.put(buf);
//!                 }
//!             });
//!         }
//!     });
//!
//!     assert!(pool.len() <= 64);
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod buffer;
mod config;
mod error;
mod pool;

//
// Public surface
//

pub use buffer::{Buffer, PooledBuffer};
pub use config::{
    DEFAULT_BUFFER_SIZE, DEFAULT_MAX_KEEP_SIZE, DEFAULT_POOL_SIZE, PoolConfig, PoolOption,
};
pub use error::{PoolError, Result};
#[cfg(feature = "thread-cache")]
pub use pool::ThreadCachePool;
pub use pool::{BufferPool, ChannelPool, LockPool, NullPool, ResettablePool, Strategy};
