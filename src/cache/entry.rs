//! Cache Entry Module
//!
//! Defines the size capability values must report and the entry record
//! owned by the recency order.

use std::sync::Arc;

// == Byte Size ==
/// Reports how many bytes a value occupies for accounting purposes.
///
/// The cache never looks inside a value; this number is all it knows.
/// Implementations must be stable: a value must report the same size for
/// as long as it lives in the cache.
///
/// Any `usize` is accepted. Charges and the cache's running total clamp at
/// `usize::MAX` instead of overflowing, so totals past that point are no
/// longer exact.
pub trait ByteSize {
    /// Returns the number of bytes charged for this value.
    fn byte_size(&self) -> usize;
}

impl ByteSize for str {
    fn byte_size(&self) -> usize {
        self.len()
    }
}

impl ByteSize for String {
    fn byte_size(&self) -> usize {
        self.len()
    }
}

impl ByteSize for [u8] {
    fn byte_size(&self) -> usize {
        self.len()
    }
}

impl ByteSize for Vec<u8> {
    fn byte_size(&self) -> usize {
        self.len()
    }
}

impl<const N: usize> ByteSize for [u8; N] {
    fn byte_size(&self) -> usize {
        N
    }
}

impl<T: ByteSize + ?Sized> ByteSize for &T {
    fn byte_size(&self) -> usize {
        (**self).byte_size()
    }
}

impl<T: ByteSize + ?Sized> ByteSize for Box<T> {
    fn byte_size(&self) -> usize {
        (**self).byte_size()
    }
}

// Shared payloads are charged in full to every cache holding them.
impl<T: ByteSize + ?Sized> ByteSize for Arc<T> {
    fn byte_size(&self) -> usize {
        (**self).byte_size()
    }
}

// == Cache Entry ==
/// A single key/value pair as stored in the recency order.
#[derive(Debug, Clone)]
pub(crate) struct Entry<V> {
    /// The lookup key
    pub key: String,
    /// The stored value
    pub value: V,
}

impl<V: ByteSize> Entry<V> {
    // == Constructor ==
    pub fn new(key: String, value: V) -> Self {
        Self { key, value }
    }

    // == Charge ==
    /// Bytes held against the budget for this entry: key length plus the
    /// value's reported size, clamped at `usize::MAX`.
    pub fn charge(&self) -> usize {
        self.key.len().saturating_add(self.value.byte_size())
    }
}
