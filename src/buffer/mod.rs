//! Buffer type and the small helpers every pool strategy shares.
//!
//! Pools never look at buffer contents. They size up the allocation behind a
//! returned buffer to decide whether it is worth keeping and clear the length
//! before a buffer goes back on a free list.

mod pooled;

pub use pooled::PooledBuffer;

use bytes::BytesMut;

use crate::config::PoolConfig;

/// The growable byte container handed out by every pool.
pub type Buffer = BytesMut;

/// Allocates an empty buffer with room for `size` bytes.
#[inline]
pub(crate) fn allocate(size: usize) -> Buffer {
    BytesMut::with_capacity(size)
}

/// Prepares a returned buffer for a free list.
///
/// Returns the cleared buffer when it may be kept, with its full allocation
/// available again. Returns `None` after discarding it otherwise:
///
/// - `oversized`: the allocation behind it is larger than `max_keep_size`
/// - `undersized`: fewer than `default_size` bytes can be reclaimed
///
/// `capacity()` only reports the space past the cursor, so a buffer that was
/// `split()` or `advance()`d can report zero while owning a large block.
/// `try_reclaim` looks at the whole allocation instead.
#[inline]
pub(crate) fn recycle(mut buf: Buffer, config: &PoolConfig) -> Option<Buffer> {
    buf.clear();

    if buf.try_reclaim(config.max_keep_size().saturating_add(1)) {
        discard(buf, "oversized");
        return None;
    }
    if !buf.try_reclaim(config.default_size()) {
        discard(buf, "undersized");
        return None;
    }
    Some(buf)
}

/// Logs a buffer that is dropped instead of being recycled.
#[inline]
pub(crate) fn discard(buf: Buffer, reason: &'static str) {
    tracing::trace!(reason, capacity = buf.capacity(), "discarding buffer");
    drop(buf);
}
