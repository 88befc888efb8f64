//! Growable output buffer owned by a single `pack` call

use metapack_format::constants::LENGTH_PREFIX_LEN;
use metapack_format::{MetaPackError, Result};
use tracing::trace;

/// Output region for the encoder.
///
/// Capacity is tracked explicitly: when a write would not fit, the region
/// grows to `capacity * 2 + pending` and the written bytes are copied over.
#[derive(Debug)]
pub struct OutputBuffer {
    buf: Vec<u8>,
    capacity: usize,
}

impl OutputBuffer {
    /// Create an empty buffer with the given initial capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Bytes written so far
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether nothing has been written
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Current capacity of the backing region
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Written bytes
    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    fn ensure(&mut self, pending: usize) {
        if self.buf.len() + pending <= self.capacity {
            return;
        }
        let new_capacity = self.capacity.saturating_mul(2).saturating_add(pending);
        trace!(
            from = self.capacity,
            to = new_capacity,
            written = self.buf.len(),
            "growing output buffer"
        );
        let mut grown = Vec::with_capacity(new_capacity);
        grown.extend_from_slice(&self.buf);
        self.buf = grown;
        self.capacity = new_capacity;
    }

    /// Append raw bytes
    pub fn put_slice(&mut self, bytes: &[u8]) {
        self.ensure(bytes.len());
        self.buf.extend_from_slice(bytes);
    }

    /// Append one byte
    pub fn put_u8(&mut self, v: u8) {
        self.ensure(1);
        self.buf.push(v);
    }

    /// Append a big-endian u32
    pub fn put_u32(&mut self, v: u32) {
        self.put_slice(&v.to_be_bytes());
    }

    /// Append a 4-byte big-endian length, failing if `len` does not fit
    pub fn put_len(&mut self, len: usize) -> Result<()> {
        let len = u32::try_from(len).map_err(|_| MetaPackError::LengthOverflow(len))?;
        self.put_u32(len);
        Ok(())
    }

    /// Append a length prefix followed by `bytes`
    pub fn put_len_prefixed(&mut self, bytes: &[u8]) -> Result<()> {
        self.ensure(LENGTH_PREFIX_LEN + bytes.len());
        self.put_len(bytes.len())?;
        self.buf.extend_from_slice(bytes);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writes_within_capacity_do_not_grow() {
        let mut out = OutputBuffer::with_capacity(8);
        out.put_u32(0x0102_0304);
        out.put_u8(5);
        assert_eq!(out.capacity(), 8);
        assert_eq!(out.as_slice(), &[1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_growth_doubles_plus_pending() {
        let mut out = OutputBuffer::with_capacity(4);
        out.put_slice(&[1, 2, 3]);
        out.put_slice(&[4, 5, 6]);
        // 4 * 2 + 3
        assert_eq!(out.capacity(), 11);
        assert_eq!(out.as_slice(), &[1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_zero_capacity_grows() {
        let mut out = OutputBuffer::with_capacity(0);
        assert!(out.is_empty());
        out.put_u8(9);
        assert_eq!(out.capacity(), 1);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn test_len_prefixed_layout() {
        let mut out = OutputBuffer::with_capacity(2);
        out.put_len_prefixed(b"abc").unwrap();
        assert_eq!(out.as_slice(), &[0, 0, 0, 3, b'a', b'b', b'c']);
        assert_eq!(out.capacity(), 2 * 2 + 7);
    }
}
