//! Cache Store Module
//!
//! Eviction engine pairing a HashMap index with the recency order and a
//! running byte total.

use std::collections::HashMap;
use std::fmt;

use tracing::{debug, trace, warn};

use super::entry::{ByteSize, Entry};
use super::order::{self, Handle, RecencyList};
use super::UNBOUNDED;
use crate::config::CacheConfig;
use crate::error::{CacheError, Result};

// == Eviction Callback ==
/// Hook invoked with every entry evicted under capacity pressure.
///
/// Runs synchronously inside [`EvictionCache::add`] or
/// [`EvictionCache::remove_oldest`], after the entry is gone from the index
/// and the order and its bytes have been released.
///
/// The hook must be `Send` so the cache can be moved into a `Mutex` shared
/// across threads. A single-threaded sink therefore needs
/// `Arc<Mutex<_>>` or a channel sender rather than `Rc<RefCell<_>>`.
pub type EvictionCallback<V> = Box<dyn FnMut(String, V) + Send>;

// == Eviction Cache ==
/// Byte-budgeted LRU cache.
///
/// Every entry is charged `key.len() + value.byte_size()` bytes. Once the
/// total exceeds `capacity`, entries are evicted from the least recently
/// used end until it fits again. A capacity of [`UNBOUNDED`] disables
/// eviction.
///
/// The cache itself is not synchronized. It is `Send` whenever `V` is,
/// because the eviction callback is required to be `Send` (see
/// [`EvictionCallback`]); wrap it in a lock to share it.
pub struct EvictionCache<V> {
    /// Key to position in `order`
    index: HashMap<String, Handle>,
    /// Entries, least recently used first
    order: RecencyList<Entry<V>>,
    /// Bytes charged to current entries
    used_bytes: usize,
    /// Byte budget, 0 = unbounded
    capacity: usize,
    /// Optional eviction hook
    on_evicted: Option<EvictionCallback<V>>,
}

impl<V: ByteSize> EvictionCache<V> {
    // == Constructor ==
    /// Creates an empty cache with the given byte budget and no eviction
    /// callback.
    ///
    /// # Arguments
    /// * `capacity` - Maximum bytes held, or [`UNBOUNDED`]
    pub fn new(capacity: usize) -> Self {
        Self::with_index_hint(capacity, CacheConfig::default().index_capacity_hint)
    }

    /// Creates an empty cache that reports every eviction to `on_evicted`.
    ///
    /// # Arguments
    /// * `capacity` - Maximum bytes held, or [`UNBOUNDED`]
    /// * `on_evicted` - Receives each evicted key and value
    pub fn with_eviction_callback<F>(capacity: usize, on_evicted: F) -> Self
    where
        F: FnMut(String, V) + Send + 'static,
    {
        let mut cache = Self::new(capacity);
        cache.on_evicted = Some(Box::new(on_evicted));
        cache
    }

    /// Creates an empty cache sized from configuration.
    pub fn from_config(config: &CacheConfig) -> Self {
        Self::with_index_hint(config.capacity_bytes, config.index_capacity_hint)
    }

    fn with_index_hint(capacity: usize, hint: usize) -> Self {
        Self {
            index: HashMap::with_capacity(hint),
            order: RecencyList::with_capacity(hint),
            used_bytes: 0,
            capacity,
            on_evicted: None,
        }
    }

    // == Eviction Callback ==
    /// Installs or replaces the eviction callback.
    pub fn set_eviction_callback<F>(&mut self, on_evicted: F)
    where
        F: FnMut(String, V) + Send + 'static,
    {
        self.on_evicted = Some(Box::new(on_evicted));
    }

    // == Get ==
    /// Looks up a key and marks it as most recently used.
    ///
    /// A miss changes nothing.
    pub fn get(&mut self, key: &str) -> Option<&V> {
        let handle = *self.index.get(key)?;
        self.order.move_to_back(handle);
        self.order.get(handle).map(|entry| &entry.value)
    }

    // == Peek ==
    /// Looks up a key without touching its recency.
    pub fn peek(&self, key: &str) -> Option<&V> {
        let handle = *self.index.get(key)?;
        self.order.get(handle).map(|entry| &entry.value)
    }

    /// Returns true if the key is cached. Does not touch recency.
    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    // == Add ==
    /// Inserts or replaces a value and marks the key as most recently used.
    ///
    /// Replacing a value adjusts the byte total by the difference in value
    /// size; the previous value is dropped without invoking the callback.
    /// If the total then exceeds the budget, least recently used entries
    /// are evicted until it fits or the cache is empty. A single entry
    /// larger than the whole budget is therefore admitted and evicted again
    /// before this returns. Use [`try_add`](Self::try_add) to refuse such
    /// entries instead.
    ///
    /// # Arguments
    /// * `key` - The key to store
    /// * `value` - The value to store
    pub fn add(&mut self, key: impl Into<String>, value: V) {
        let key = key.into();

        let existing = self
            .index
            .get(&key)
            .copied()
            .and_then(|handle| self.order.get_mut(handle).map(|entry| (handle, entry)));

        let charge = if let Some((handle, entry)) = existing {
            let old = std::mem::replace(&mut entry.value, value);
            let charge = entry.charge();
            self.used_bytes = self
                .used_bytes
                .saturating_sub(old.byte_size())
                .saturating_add(entry.value.byte_size());
            self.order.move_to_back(handle);
            trace!("Updated key '{}', {} bytes in use", key, self.used_bytes);
            charge
        } else {
            let entry = Entry::new(key.clone(), value);
            let charge = entry.charge();
            let handle = self.order.push_back(entry);
            self.index.insert(key.clone(), handle);
            self.used_bytes = self.used_bytes.saturating_add(charge);
            trace!("Inserted key '{}', {} bytes in use", key, self.used_bytes);
            charge
        };

        if self.capacity != UNBOUNDED && charge > self.capacity {
            warn!(
                "Entry '{}' charges {} bytes, over the {} byte capacity; it will be evicted",
                key, charge, self.capacity
            );
        }

        let mut evicted = 0usize;
        while self.over_budget() {
            if !self.remove_oldest() {
                break;
            }
            evicted += 1;
        }

        if evicted > 0 {
            debug!(
                "Evicted {} entries after adding '{}', {} of {} bytes in use",
                evicted, key, self.used_bytes, self.capacity
            );
        }
    }

    // == Try Add ==
    /// Like [`add`](Self::add), but refuses an entry whose own charge
    /// exceeds a bounded capacity.
    ///
    /// A refused entry leaves the cache untouched, including any value
    /// already stored under the same key.
    pub fn try_add(&mut self, key: impl Into<String>, value: V) -> Result<()> {
        let key = key.into();
        let size = key.len().saturating_add(value.byte_size());

        if self.capacity != UNBOUNDED && size > self.capacity {
            return Err(CacheError::Oversized {
                key,
                size,
                capacity: self.capacity,
            });
        }

        self.add(key, value);
        Ok(())
    }

    // == Remove Oldest ==
    /// Evicts the least recently used entry and hands it to the eviction
    /// callback, if one is set.
    ///
    /// Returns false if the cache was empty.
    pub fn remove_oldest(&mut self) -> bool {
        let Some(entry) = self.order.pop_front() else {
            return false;
        };

        self.index.remove(&entry.key);
        let freed = entry.charge();
        self.used_bytes = self.used_bytes.saturating_sub(freed);

        debug!(
            "Evicted key '{}' ({} bytes), {} bytes in use",
            entry.key, freed, self.used_bytes
        );

        if let Some(on_evicted) = self.on_evicted.as_mut() {
            on_evicted(entry.key, entry.value);
        }
        true
    }

    fn over_budget(&self) -> bool {
        self.capacity != UNBOUNDED && self.used_bytes > self.capacity
    }
}

impl<V> EvictionCache<V> {
    // == Length ==
    /// Returns the current number of entries.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Returns the bytes currently charged to entries.
    pub fn used_bytes(&self) -> usize {
        self.used_bytes
    }

    /// Returns the byte budget, [`UNBOUNDED`] if eviction is disabled.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the next eviction candidate without removing it.
    pub fn peek_oldest(&self) -> Option<(&str, &V)> {
        self.order
            .front()
            .map(|entry| (entry.key.as_str(), &entry.value))
    }

    /// Iterates over entries from least to most recently used without
    /// touching recency.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            inner: self.order.iter(),
        }
    }
}

impl<V: fmt::Debug> fmt::Debug for EvictionCache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EvictionCache")
            .field("capacity", &self.capacity)
            .field("used_bytes", &self.used_bytes)
            .field("len", &self.order.len())
            .field("on_evicted", &self.on_evicted.is_some())
            .finish()
    }
}

impl<'a, V> IntoIterator for &'a EvictionCache<V> {
    type Item = (&'a str, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// == Iterator ==
/// Iterator over `(key, value)` pairs, least recently used first.
#[derive(Debug)]
pub struct Iter<'a, V> {
    inner: order::Iter<'a, Entry<V>>,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a str, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|entry| (entry.key.as_str(), &entry.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}
