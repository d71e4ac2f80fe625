//! Byte LRU - A byte-budgeted recency cache
//!
//! Admits entries until a configured byte budget is exceeded, then evicts
//! the least recently used entries until the budget holds again.
//!
//! The cache is single-threaded. Wrap it in a lock or shard the keyspace
//! across several instances when shared access is needed.

pub mod cache;
pub mod config;
pub mod error;

pub use cache::{ByteSize, EvictionCache, UNBOUNDED};
pub use config::CacheConfig;
pub use error::{CacheError, Result};
