//! Configuration Module
//!
//! Handles loading cache sizing parameters from environment variables or
//! from an embedding application's own configuration.

use std::env;
use std::str::FromStr;

use serde::Deserialize;
use tracing::warn;

/// Default byte budget: 64 MiB
pub const DEFAULT_CAPACITY_BYTES: usize = 64 * 1024 * 1024;

/// Default number of slots reserved up front
pub const DEFAULT_INDEX_CAPACITY_HINT: usize = 10;

/// Cache sizing parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum bytes the cache may hold, 0 = unbounded
    pub capacity_bytes: usize,
    /// Entries to reserve room for before the index has to grow
    pub index_capacity_hint: usize,
}

impl CacheConfig {
    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_CAPACITY_BYTES` - Byte budget, 0 disables eviction (default: 67108864)
    /// - `CACHE_INDEX_HINT` - Initial index reservation (default: 10)
    ///
    /// Values that fail to parse are logged and replaced by the default.
    pub fn from_env() -> Self {
        Self {
            capacity_bytes: env_or("CACHE_CAPACITY_BYTES", DEFAULT_CAPACITY_BYTES),
            index_capacity_hint: env_or("CACHE_INDEX_HINT", DEFAULT_INDEX_CAPACITY_HINT),
        }
    }

    /// Returns true if this configuration disables eviction.
    pub fn is_unbounded(&self) -> bool {
        self.capacity_bytes == crate::cache::UNBOUNDED
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity_bytes: DEFAULT_CAPACITY_BYTES,
            index_capacity_hint: DEFAULT_INDEX_CAPACITY_HINT,
        }
    }
}

fn env_or<T>(name: &str, default: T) -> T
where
    T: FromStr + std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => parse_or(name, &raw, default),
        Err(_) => default,
    }
}

fn parse_or<T>(name: &str, raw: &str, default: T) -> T
where
    T: FromStr + std::fmt::Display,
{
    match raw.trim().parse() {
        Ok(value) => value,
        Err(_) => {
            warn!("Ignoring invalid {}='{}', using {}", name, raw, default);
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = CacheConfig::default();
        assert_eq!(config.capacity_bytes, 64 * 1024 * 1024);
        assert_eq!(config.index_capacity_hint, 10);
        assert!(!config.is_unbounded());
    }

    #[test]
    fn test_config_from_env() {
        // Single test touches the environment to avoid races between tests
        env::remove_var("CACHE_CAPACITY_BYTES");
        env::remove_var("CACHE_INDEX_HINT");

        let config = CacheConfig::from_env();
        assert_eq!(config, CacheConfig::default());

        env::set_var("CACHE_CAPACITY_BYTES", "0");
        env::set_var("CACHE_INDEX_HINT", "not-a-number");

        let config = CacheConfig::from_env();
        assert!(config.is_unbounded());
        assert_eq!(config.index_capacity_hint, DEFAULT_INDEX_CAPACITY_HINT);

        env::remove_var("CACHE_CAPACITY_BYTES");
        env::remove_var("CACHE_INDEX_HINT");
    }

    #[test]
    fn test_parse_or_trims_whitespace() {
        assert_eq!(parse_or("X", " 2048\n", 1usize), 2048);
    }

    #[test]
    fn test_parse_or_falls_back() {
        assert_eq!(parse_or("X", "-5", 7usize), 7);
        assert_eq!(parse_or("X", "", 7usize), 7);
    }
}
