// Integration tests for the pool strategies
// Tests cover: get/put contract, free-list bounds, construction, concurrency

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, mpsc};

use bufpool::{
    Buffer, BufferPool, ChannelPool, DEFAULT_BUFFER_SIZE, LockPool, NullPool, PoolConfig, PoolError,
    PoolOption, ResettablePool, Strategy, ThreadCachePool,
};

const SMALL: [PoolOption; 3] = [
    PoolOption::PoolSize(8),
    PoolOption::BufferSize(64),
    PoolOption::MaxSize(256),
];

/// Bounded pools, observed through their free-list length.
trait Bounded: ResettablePool {
    fn retained(&self) -> usize;
    fn bound(&self) -> usize;
}

impl Bounded for ChannelPool {
    fn retained(&self) -> usize {
        self.len()
    }
    fn bound(&self) -> usize {
        self.capacity()
    }
}

impl Bounded for LockPool {
    fn retained(&self) -> usize {
        self.len()
    }
    fn bound(&self) -> usize {
        self.capacity()
    }
}

fn bounded_pools(options: &[PoolOption]) -> Vec<(&'static str, Box<dyn Bounded>)> {
    let channel: Box<dyn Bounded> = Box::new(ChannelPool::new(options.iter().copied()).unwrap());
    let lock: Box<dyn Bounded> = Box::new(LockPool::new(options.iter().copied()).unwrap());
    vec![("channel", channel), ("lock", lock)]
}

// ============================================================================
// Get/Put Contract
// ============================================================================

#[test]
fn test_get_respects_default_size() {
    for strategy in Strategy::ALL {
        let pool = strategy.build(SMALL).unwrap();
        for _ in 0..4 {
            let mut buf = pool.get();
            assert!(buf.is_empty(), "{strategy}: buffer must be empty");
            assert!(
                buf.capacity() >= 64,
                "{strategy}: capacity below default size"
            );
            buf.extend_from_slice(&[1u8; 32]);
            pool.put(buf);
        }
    }
}

#[test]
fn test_default_options_use_default_size() {
    for strategy in Strategy::ALL {
        let pool = strategy.build(std::iter::empty()).unwrap();
        assert!(pool.get().capacity() >= DEFAULT_BUFFER_SIZE);
    }
}

#[test]
fn test_idle_pool_returns_same_buffer() {
    for (name, pool) in bounded_pools(&SMALL) {
        let mut buf = pool.get();
        buf.extend_from_slice(b"some bytes");
        let ptr = buf.as_ptr();
        pool.put(buf);

        let buf = pool.get();
        assert_eq!(buf.as_ptr(), ptr, "{name}: buffer was not recycled");
        assert!(buf.is_empty(), "{name}: recycled buffer not reset");
    }
}

#[test]
fn test_oversized_put_does_not_grow_free_list() {
    for (name, pool) in bounded_pools(&SMALL) {
        let kept = pool.get();
        pool.put(kept);
        assert_eq!(pool.retained(), 1);

        let mut big = bytes::BytesMut::with_capacity(64);
        big.extend_from_slice(&[0u8; 1024]);
        pool.put(big);
        assert_eq!(pool.retained(), 1, "{name}: oversized buffer retained");
    }
}

#[test]
fn test_buffer_at_threshold_is_kept() {
    for (name, pool) in bounded_pools(&SMALL) {
        pool.put(bytes::BytesMut::with_capacity(256));
        assert_eq!(pool.retained(), 1, "{name}: threshold buffer dropped");
    }
}

#[test]
fn test_split_buffer_not_retained() {
    let options = [
        PoolOption::PoolSize(8),
        PoolOption::BufferSize(16),
        PoolOption::MaxSize(64),
    ];

    fn grow_and_split(mut buf: Buffer) -> Buffer {
        buf.resize(1 << 20, 0);
        let frame = buf.split().freeze();
        assert_eq!(frame.len(), 1 << 20);
        drop(frame);
        buf
    }

    for strategy in Strategy::ALL {
        let pool = strategy.build(options).unwrap();
        let buf = grow_and_split(pool.get());
        assert!(buf.capacity() <= 64);
        pool.put(buf);

        let buf = pool.get();
        assert!(
            (16..=64).contains(&buf.capacity()),
            "{strategy}: handed out a {} byte buffer",
            buf.capacity()
        );
    }

    for (name, pool) in bounded_pools(&options) {
        pool.put(grow_and_split(pool.get()));
        assert_eq!(pool.retained(), 0, "{name}: split buffer retained");
    }
}

#[test]
fn test_max_equal_to_default_recycles() {
    let options = [PoolOption::BufferSize(32), PoolOption::MaxSize(32)];
    for (name, pool) in bounded_pools(&options) {
        pool.put(Buffer::with_capacity(8));
        assert_eq!(pool.retained(), 0, "{name}: undersized buffer retained");

        let buf = pool.get();
        let ptr = buf.as_ptr();
        assert_eq!(buf.capacity(), 32);
        pool.put(buf);
        assert_eq!(pool.retained(), 1, "{name}: default-size buffer dropped");
        assert_eq!(pool.get().as_ptr(), ptr);
    }
}

#[test]
fn test_retained_capped_at_pool_size() {
    let options = [
        PoolOption::PoolSize(2),
        PoolOption::BufferSize(10),
        PoolOption::MaxSize(10),
    ];
    for (name, pool) in bounded_pools(&options) {
        let bufs = [pool.get(), pool.get(), pool.get()];
        for buf in bufs {
            assert_eq!(buf.capacity(), 10);
            pool.put(buf);
        }
        assert_eq!(pool.retained(), 2, "{name}: third put should be dropped");
    }
}

#[test]
fn test_reset_releases_everything() {
    for (name, pool) in bounded_pools(&SMALL) {
        let bufs: Vec<_> = (0..8).map(|_| pool.get()).collect();
        for buf in bufs {
            pool.put(buf);
        }
        assert_eq!(pool.retained(), pool.bound());

        pool.reset();
        assert_eq!(pool.retained(), 0, "{name}: reset left buffers behind");
    }
}

#[test]
fn test_null_pool_never_retains() {
    let pool = NullPool::new(SMALL).unwrap();
    let mut buf = pool.get();
    buf.extend_from_slice(&[9u8; 200]);
    pool.put(buf);

    // Fresh allocation every time, never the grown buffer.
    let buf = pool.get();
    assert!(buf.is_empty());
    assert_eq!(buf.capacity(), 64);
}

#[test]
fn test_pooled_guard_through_trait_object() {
    let pool: Arc<dyn BufferPool> = Arc::new(LockPool::new(SMALL).unwrap());
    {
        let mut buf = bufpool::PooledBuffer::new(pool.as_ref());
        buf.extend_from_slice(b"guarded");
    }
    assert!(pool.get().is_empty());
}

// ============================================================================
// Construction
// ============================================================================

#[test]
fn test_construction_rejects_zero() {
    let cases = [
        (PoolOption::PoolSize(0), PoolError::InvalidPoolSize { size: 0 }),
        (
            PoolOption::BufferSize(0),
            PoolError::InvalidBufferSize { size: 0 },
        ),
        (PoolOption::MaxSize(0), PoolError::InvalidMaxSize { size: 0 }),
    ];
    for (option, expected) in cases {
        for strategy in Strategy::ALL {
            let err = strategy.build([option]).err().unwrap();
            assert_eq!(err, expected, "{strategy}");
        }
    }
}

#[test]
fn test_construction_rejects_max_below_default() {
    for strategy in Strategy::ALL {
        let err = strategy
            .build([PoolOption::BufferSize(100), PoolOption::MaxSize(99)])
            .err()
            .unwrap();
        assert_eq!(
            err,
            PoolError::MaxSmallerThanDefault {
                max_keep_size: 99,
                default_size: 100,
            }
        );
        assert!(err.to_string().contains("99"));
        assert!(err.to_string().contains("100"));
    }
}

#[test]
fn test_construction_accepts_ordered_values() {
    for (pool_size, default, max) in [(1, 1, 1), (3, 10, 10), (100, 4096, 16384), (7, 1, 1 << 20)] {
        for strategy in Strategy::ALL {
            let result = strategy.build([
                PoolOption::PoolSize(pool_size),
                PoolOption::BufferSize(default),
                PoolOption::MaxSize(max),
            ]);
            assert!(result.is_ok(), "{strategy}: ({pool_size}, {default}, {max})");
        }
    }
}

#[test]
fn test_with_config_shares_validation() {
    let bad = PoolConfig::default().with_buffer_size(32 * 1024);
    assert!(ChannelPool::with_config(bad).is_err());
    assert!(LockPool::with_config(bad).is_err());
    assert!(ThreadCachePool::with_config(bad).is_err());
    assert!(NullPool::with_config(bad).is_err());
}

// ============================================================================
// Concurrency
// ============================================================================

#[test]
fn test_ruthless_flood_respects_bound() {
    const WRITERS: usize = 64;
    const ROUNDS: usize = 2_000;

    let options = [
        PoolOption::PoolSize(16),
        PoolOption::BufferSize(32),
        PoolOption::MaxSize(128),
    ];

    for (name, pool) in bounded_pools(&options) {
        let pool: &dyn Bounded = pool.as_ref();
        let done = AtomicBool::new(false);

        std::thread::scope(|s| {
            let sampler = s.spawn(|| {
                let mut max_seen = 0;
                while !done.load(Ordering::Relaxed) {
                    max_seen = max_seen.max(pool.retained());
                    std::thread::yield_now();
                }
                max_seen
            });

            let writers: Vec<_> = (0..WRITERS)
                .map(|_| {
                    s.spawn(|| {
                        for i in 0..ROUNDS {
                            let mut oversized = bytes::BytesMut::with_capacity(32);
                            oversized.extend_from_slice(&[0xEE; 512]);
                            pool.put(oversized);
                            pool.put(bytes::BytesMut::with_capacity(32 + i % 96));
                        }
                    })
                })
                .collect();
            for writer in writers {
                writer.join().unwrap();
            }

            done.store(true, Ordering::Relaxed);
            let max_seen = sampler.join().unwrap();
            assert!(max_seen <= 16, "{name}: saw {max_seen} retained buffers");
        });

        assert_eq!(pool.retained(), pool.bound(), "{name}: pool should be full");
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_many_concurrent_callers() {
    const CALLERS: usize = 1024;
    const LOOPS: usize = 1024;

    for strategy in Strategy::ALL {
        let pool: Arc<dyn BufferPool> = Arc::from(strategy.build(SMALL).unwrap());

        let tasks: Vec<_> = (0..CALLERS)
            .map(|caller| {
                let pool = Arc::clone(&pool);
                tokio::spawn(async move {
                    let tag = (caller % 251) as u8;
                    for j in 0..LOOPS {
                        let mut buf = pool.get();
                        assert!(buf.is_empty());
                        assert!(buf.capacity() >= 64);

                        // Every 8th iteration grows past the keep-size threshold.
                        let fill = if j % 8 == 0 { 320 } else { 16 + j % 48 };
                        buf.resize(fill, tag);

                        if j % 64 == 0 {
                            tokio::task::yield_now().await;
                        }

                        assert!(
                            buf.iter().all(|&b| b == tag),
                            "buffer shared between callers"
                        );
                        pool.put(buf);
                    }
                })
            })
            .collect();

        for task in tasks {
            task.await.unwrap();
        }
    }
}

#[test]
fn test_thread_cache_across_threads() {
    let pool = ThreadCachePool::new(SMALL).unwrap();

    std::thread::scope(|s| {
        for t in 0..16u8 {
            let pool = &pool;
            s.spawn(move || {
                for _ in 0..500 {
                    let mut buf = pool.get();
                    buf.resize(48, t);
                    assert!(buf.iter().all(|&b| b == t));
                    pool.put(buf);
                }
            });
        }
    });

    assert!(!pool.is_empty());
    assert!(pool.len() <= 16 * 8);
}

#[test]
fn test_thread_cache_handoff_reuses_buffers() {
    const FRAMES: usize = 10_000;

    let pool = ThreadCachePool::new(SMALL).unwrap();
    let (outbox, inbox) = mpsc::channel::<Buffer>();
    let (ack, acked) = mpsc::channel::<()>();
    let mut seen = HashSet::new();

    std::thread::scope(|s| {
        // Consumer: every buffer it receives goes back on its own stack.
        s.spawn(|| {
            for buf in inbox {
                pool.put(buf);
                ack.send(()).unwrap();
            }
        });

        for i in 0..FRAMES {
            let mut buf = pool.get();
            seen.insert(buf.as_ptr() as usize);
            buf.extend_from_slice(&i.to_le_bytes());
            outbox.send(buf).unwrap();
            acked.recv().unwrap();
        }
        drop(outbox);
    });

    assert_eq!(seen.len(), 1, "producer kept allocating");
    assert_eq!(pool.len(), 1);
}
