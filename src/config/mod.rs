//! Configuration for buffer pools.
//!
//! Every pool strategy is built from the same three tunables:
//!
//! - retained count: how many idle buffers a bounded pool keeps
//! - default size: capacity of freshly allocated buffers
//! - max keep-size: capacity above which a returned buffer is dropped
//!
//! Tunables are supplied as an ordered list of [`PoolOption`]s or through the
//! [`PoolConfig`] builder.
//!
//! # Example
//!
//! ```
//! use bufpool::{PoolConfig, PoolOption};
//!
//! // Ordered options, validated as a whole
//! let config = PoolConfig::from_options([
//!     PoolOption::PoolSize(25),
//!     PoolOption::BufferSize(1024),
//! ])?;
//! assert_eq!(config.retained_count(), 25);
//!
//! // Builder, validated explicitly
//! let config = PoolConfig::default().with_max_size(32 * 1024);
//! config.validate()?;
//! # Ok::<(), bufpool::PoolError>(())
//! ```

use crate::error::{PoolError, Result};

/// Default number of buffers a bounded free list retains.
pub const DEFAULT_POOL_SIZE: usize = 100;

/// Default capacity of newly allocated buffers (4 KiB).
pub const DEFAULT_BUFFER_SIZE: usize = 4 * 1024;

/// Default capacity above which returned buffers are discarded (16 KiB).
pub const DEFAULT_MAX_KEEP_SIZE: usize = 16 * 1024;

/// Validated pool tunables.
///
/// A `PoolConfig` handed to a pool always satisfies
/// `max_keep_size >= default_size` with every value non-zero. Each pool keeps
/// its own copy and never mutates it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PoolConfig {
    /// Maximum number of idle buffers held by bounded pools.
    retained_count: usize,

    /// Capacity of freshly allocated buffers.
    default_size: usize,

    /// Largest capacity a returned buffer may have and still be kept.
    max_keep_size: usize,
}

impl PoolConfig {
    /// Creates a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`PoolError`] if any value is zero or if
    /// `max_keep_size < default_size`.
    ///
    /// # Example
    ///
    /// ```
    /// use bufpool::PoolConfig;
    ///
    /// let config = PoolConfig::new(10, 1024, 4096)?;
    /// assert_eq!(config.default_size(), 1024);
    ///
    /// assert!(PoolConfig::new(10, 4096, 1024).is_err());
    /// # Ok::<(), bufpool::PoolError>(())
    /// ```
    pub fn new(retained_count: usize, default_size: usize, max_keep_size: usize) -> Result<Self> {
        if retained_count == 0 {
            return Err(PoolError::InvalidPoolSize {
                size: retained_count,
            });
        }

        if default_size == 0 {
            return Err(PoolError::InvalidBufferSize { size: default_size });
        }

        if max_keep_size == 0 {
            return Err(PoolError::InvalidMaxSize {
                size: max_keep_size,
            });
        }

        if max_keep_size < default_size {
            return Err(PoolError::MaxSmallerThanDefault {
                max_keep_size,
                default_size,
            });
        }

        Ok(Self {
            retained_count,
            default_size,
            max_keep_size,
        })
    }

    /// Applies `options` in order, starting from the defaults.
    ///
    /// The first failing option aborts and its error is returned. The
    /// size ordering is checked once all options have been applied, so
    /// `[MaxSize(64), BufferSize(32)]` and `[BufferSize(32), MaxSize(64)]`
    /// are both accepted.
    pub fn from_options<I>(options: I) -> Result<Self>
    where
        I: IntoIterator<Item = PoolOption>,
    {
        let mut scratch = Self::default();
        for option in options {
            option.apply(&mut scratch)?;
        }
        scratch.validate()?;
        Ok(scratch)
    }

    /// Sets the retained count.
    ///
    /// Note: This does not validate the configuration. Use
    /// [`PoolConfig::validate`] to check it.
    pub fn with_pool_size(mut self, size: usize) -> Self {
        self.retained_count = size;
        self
    }

    /// Sets the default allocation size.
    ///
    /// Note: This does not validate the configuration. Use
    /// [`PoolConfig::validate`] to check it.
    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.default_size = size;
        self
    }

    /// Sets the maximum keep-size.
    ///
    /// Note: This does not validate the configuration. Use
    /// [`PoolConfig::validate`] to check it.
    ///
    /// # Example
    ///
    /// ```
    /// use bufpool::PoolConfig;
    ///
    /// let config = PoolConfig::default().with_max_size(1);
    /// assert!(config.validate().is_err());
    /// ```
    pub fn with_max_size(mut self, size: usize) -> Self {
        self.max_keep_size = size;
        self
    }

    /// Returns the maximum number of idle buffers bounded pools retain.
    pub fn retained_count(&self) -> usize {
        self.retained_count
    }

    /// Returns the capacity of newly allocated buffers.
    pub fn default_size(&self) -> usize {
        self.default_size
    }

    /// Returns the largest capacity a returned buffer may have and be kept.
    pub fn max_keep_size(&self) -> usize {
        self.max_keep_size
    }

    /// Validates the current configuration.
    pub fn validate(&self) -> Result<()> {
        Self::new(self.retained_count, self.default_size, self.max_keep_size).map(|_| ())
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            retained_count: DEFAULT_POOL_SIZE,
            default_size: DEFAULT_BUFFER_SIZE,
            max_keep_size: DEFAULT_MAX_KEEP_SIZE,
        }
    }
}

/// A single construction option.
///
/// Options are accepted by every pool constructor and applied in the order
/// given. Each option rejects zero on its own; the ordering between
/// `BufferSize` and `MaxSize` is checked after the whole list has applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PoolOption {
    /// Number of idle buffers to retain.
    PoolSize(usize),

    /// Capacity of newly allocated buffers.
    BufferSize(usize),

    /// Maximum capacity of buffers kept when returned. Larger buffers are
    /// dropped and their memory released.
    MaxSize(usize),
}

impl PoolOption {
    /// Validates this option and writes it into `config`.
    ///
    /// `config` is left untouched when the option is rejected.
    pub fn apply(self, config: &mut PoolConfig) -> Result<()> {
        match self {
            PoolOption::PoolSize(size) => {
                if size == 0 {
                    return Err(PoolError::InvalidPoolSize { size });
                }
                config.retained_count = size;
            }
            PoolOption::BufferSize(size) => {
                if size == 0 {
                    return Err(PoolError::InvalidBufferSize { size });
                }
                config.default_size = size;
            }
            PoolOption::MaxSize(size) => {
                if size == 0 {
                    return Err(PoolError::InvalidMaxSize { size });
                }
                config.max_keep_size = size;
            }
        }
        Ok(())
    }
}
