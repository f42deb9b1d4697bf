//! Many workers sharing one pool.
//!
//! Run with:
//!     RUST_LOG=bufpool=debug cargo run --example concurrent_writers -- lock
//!
//! The optional argument picks the strategy: channel (default), lock,
//! thread-cache or null.

use std::time::Instant;

use bufpool::{BufferPool, DEFAULT_BUFFER_SIZE, DEFAULT_POOL_SIZE, Strategy};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let name = std::env::args().nth(1).unwrap_or_else(|| "channel".into());
    let strategy = Strategy::ALL
        .iter()
        .copied()
        .find(|s| s.name() == name)
        .ok_or_else(|| format!("unknown strategy: {name}"))?;

    let pool = strategy.build(std::iter::empty())?;
    let workers = 4 * DEFAULT_POOL_SIZE;

    println!("{workers} workers x 1000 cycles on the {strategy} pool...\n");

    let start = Instant::now();
    std::thread::scope(|s| {
        for _ in 0..workers {
            let pool: &dyn BufferPool = pool.as_ref();
            s.spawn(move || {
                for _ in 0..1000 {
                    let mut buf = pool.get();
                    // Triples the default size; the grown buffer still fits the keep-size.
                    for k in 0..3 * DEFAULT_BUFFER_SIZE {
                        buf.extend_from_slice(&[(k % 256) as u8]);
                    }
                    pool.put(buf);
                }
            });
        }
    });

    println!("Done in {:?}", start.elapsed());
    Ok(())
}
