#![no_main]

use bufpool::{Buffer, BufferPool, ChannelPool, LockPool, PoolOption, ResettablePool, ThreadCachePool};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let [a, b, c, ops @ ..] = data else {
        return;
    };

    let pool_size = 1 + (*a as usize % 16);
    let default_size = 1 + (*b as usize % 64);
    let max_keep_size = default_size + *c as usize;
    let options = [
        PoolOption::PoolSize(pool_size),
        PoolOption::BufferSize(default_size),
        PoolOption::MaxSize(max_keep_size),
    ];

    let channel = ChannelPool::new(options).unwrap();
    let lock = LockPool::new(options).unwrap();
    let cache = ThreadCachePool::new(options).unwrap();

    let pools: [&dyn BufferPool; 3] = [&channel, &lock, &cache];
    let mut held: Vec<Vec<Buffer>> = vec![Vec::new(); pools.len()];

    for pair in ops.chunks(2) {
        let op = pair[0] % 4;
        let arg = pair.get(1).copied().unwrap_or(0) as usize;

        for (pool, held) in pools.iter().zip(held.iter_mut()) {
            match op {
                0 => {
                    let buf = pool.get();
                    // Verify: every buffer is empty and big enough
                    assert!(buf.is_empty());
                    assert!(buf.capacity() >= default_size);
                    held.push(buf);
                }
                1 => {
                    if let Some(mut buf) = held.pop() {
                        buf.resize(arg * 4, 0xAB);
                        pool.put(buf);
                    }
                }
                2 => pool.put(Buffer::with_capacity(arg * 2)),
                _ => {}
            }
        }

        if op == 3 {
            channel.reset();
            lock.reset();
        }

        // Verify: bounded free lists never exceed the retained count
        assert!(channel.len() <= pool_size);
        assert!(lock.len() <= pool_size);
        // Single thread: the thread cache holds one stack
        assert!(cache.len() <= pool_size);
    }
});
