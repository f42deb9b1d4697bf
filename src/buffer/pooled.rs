//! Scoped buffer that returns itself to its pool on drop.

use std::ops::{Deref, DerefMut};

use crate::buffer::Buffer;
use crate::pool::BufferPool;

/// RAII guard around a buffer taken from a pool.
///
/// Dereferences to the underlying [`Buffer`]. When the guard is dropped the
/// buffer is handed back through [`BufferPool::put`], so the usual
/// oversize and capacity rules still apply.
///
/// # Example
///
/// ```
/// use bufpool::{BufferPool, LockPool};
///
/// let pool = LockPool::default();
/// {
///     let mut buf = pool.get_pooled();
///     buf.extend_from_slice(b"hello");
/// }
/// assert_eq!(pool.len(), 1);
/// ```
pub struct PooledBuffer<'a, P: BufferPool + ?Sized> {
    pool: &'a P,
    buf: Buffer,
}

impl<'a, P: BufferPool + ?Sized> PooledBuffer<'a, P> {
    /// Takes a buffer from `pool`.
    pub fn new(pool: &'a P) -> Self {
        Self {
            pool,
            buf: pool.get(),
        }
    }

    /// Detaches the buffer. It will not be returned to the pool.
    pub fn into_inner(mut self) -> Buffer {
        let buf = std::mem::take(&mut self.buf);
        // Nothing left to release; skip the put in `Drop`.
        std::mem::forget(self);
        buf
    }
}

impl<P: BufferPool + ?Sized> Deref for PooledBuffer<'_, P> {
    type Target = Buffer;

    fn deref(&self) -> &Self::Target {
        &self.buf
    }
}

impl<P: BufferPool + ?Sized> DerefMut for PooledBuffer<'_, P> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.buf
    }
}

impl<P: BufferPool + ?Sized> Drop for PooledBuffer<'_, P> {
    fn drop(&mut self) {
        self.pool.put(std::mem::take(&mut self.buf));
    }
}
