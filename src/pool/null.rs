//! Pool that never recycles.

use crate::buffer::{self, Buffer};
use crate::config::{PoolConfig, PoolOption};
use crate::error::Result;
use crate::pool::BufferPool;

/// Allocates on every `get` and drops on every `put`.
///
/// Baseline for comparing the other strategies: a pool has to beat this to
/// be worth its bookkeeping.
#[derive(Debug, Clone, Default)]
pub struct NullPool {
    config: PoolConfig,
}

impl NullPool {
    /// Creates a pool from an ordered list of options.
    ///
    /// Options are validated like any other pool, so the same option list
    /// can be reused across strategies.
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
            strategy = "null",
            default_size = config.default_size(),
            "buffer pool created"
        );
        Ok(Self { config })
    }

    /// Returns the configuration this pool was built with.
    pub fn config(&self) -> &PoolConfig {
        &self.config
    }
}

impl BufferPool for NullPool {
    #[inline]
    fn get(&self) -> Buffer {
        buffer::allocate(self.config.default_size())
    }

    #[inline]
    fn put(&self, _buf: Buffer) {}
}
