//! Error types for the cache
//!
//! The core operations are infallible; errors only come from the opt-in
//! admission check in `EvictionCache::try_add`.

use thiserror::Error;

// == Cache Error Enum ==
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Entry would not fit even in an empty cache
    #[error("Entry '{key}' needs {size} bytes, capacity is {capacity}")]
    Oversized {
        key: String,
        size: usize,
        capacity: usize,
    },
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_oversized_message() {
        let err = CacheError::Oversized {
            key: "blob".to_string(),
            size: 120,
            capacity: 64,
        };
        assert_eq!(
            err.to_string(),
            "Entry 'blob' needs 120 bytes, capacity is 64"
        );
    }
}
