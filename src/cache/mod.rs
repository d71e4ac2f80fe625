//! Cache Module
//!
//! Provides the byte-accounted LRU eviction engine.

mod entry;
mod order;
mod store;


// Re-export public types
pub use entry::ByteSize;
pub use store::{EvictionCache, EvictionCallback, Iter};

// == Public Constants ==
/// Capacity sentinel that disables eviction entirely.
pub const UNBOUNDED: usize = 0;
