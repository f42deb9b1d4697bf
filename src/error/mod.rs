//! Error types for bufpool.

use std::fmt;

/// Errors that can occur while building a pool.
///
/// Only construction can fail. Once a pool exists, `get` and `put` are total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolError {
    /// The retained-count limit was zero.
    InvalidPoolSize {
        /// The rejected value.
        size: usize,
    },

    /// The default allocation size was zero.
    InvalidBufferSize {
        /// The rejected value.
        size: usize,
    },

    /// The maximum keep-size was zero.
    InvalidMaxSize {
        /// The rejected value.
        size: usize,
    },

    /// The maximum keep-size is smaller than the default allocation size.
    MaxSmallerThanDefault {
        /// The configured maximum keep-size.
        max_keep_size: usize,
        /// The configured default allocation size.
        default_size: usize,
    },
}

impl fmt::Display for PoolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PoolError::InvalidPoolSize { size } => {
                write!(f, "pool size must be greater than 0: {}", size)
            }
            PoolError::InvalidBufferSize { size } => {
                write!(f, "default buffer size must be greater than 0: {}", size)
            }
            PoolError::InvalidMaxSize { size } => {
                write!(f, "max buffer size must be greater than 0: {}", size)
            }
            PoolError::MaxSmallerThanDefault {
                max_keep_size,
                default_size,
            } => write!(
                f,
                "max buffer size must be greater or equal to default buffer size: {}, {}",
                max_keep_size, default_size
            ),
        }
    }
}

impl std::error::Error for PoolError {}

/// Result alias for pool construction.
pub type Result<T> = std::result::Result<T, PoolError>;
