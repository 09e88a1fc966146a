//! Immutable byte values handed out by the cache.

use std::fmt;

use bytes::Bytes;

/// An immutable view over a cached value.
///
/// Cloning shares the underlying refcounted buffer; nothing handed to a
/// caller can mutate what the cache holds. Use [`ByteView::to_vec`] for an
/// owned copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ByteView {
    bytes: Bytes,
}

impl ByteView {
    /// Length of the value in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Borrows the raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns an owned copy of the value.
    pub fn to_vec(&self) -> Vec<u8> {
        self.bytes.to_vec()
    }

    /// Consumes the view, yielding the shared buffer.
    pub fn into_bytes(self) -> Bytes {
        self.bytes
    }
}

impl From<Bytes> for ByteView {
    fn from(bytes: Bytes) -> Self {
        Self { bytes }
    }
}

impl From<Vec<u8>> for ByteView {
    fn from(bytes: Vec<u8>) -> Self {
        Self {
            bytes: Bytes::from(bytes),
        }
    }
}

impl From<&str> for ByteView {
    fn from(value: &str) -> Self {
        Self {
            bytes: Bytes::copy_from_slice(value.as_bytes()),
        }
    }
}

impl fmt::Display for ByteView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.bytes))
    }
}
