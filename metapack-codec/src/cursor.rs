//! Bounds-checked read cursor owned by a single `unpack` call

use metapack_format::{MetaPackError, Result};

/// Forward-only reader over a payload
#[derive(Debug)]
pub struct ReadCursor<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> ReadCursor<'a> {
    /// Start reading at the beginning of `data`
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    /// Current position
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Bytes left to read
    pub fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    /// Consume `n` bytes
    pub fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if n > self.remaining() {
            return Err(MetaPackError::OutOfBounds {
                offset: self.offset,
                needed: n,
                remaining: self.remaining(),
            });
        }
        let bytes = &self.data[self.offset..self.offset + n];
        self.offset += n;
        Ok(bytes)
    }

    /// Consume exactly `N` bytes into an array
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    /// Read a 4-byte big-endian length
    pub fn read_len(&mut self) -> Result<usize> {
        let raw = u32::from_be_bytes(self.read_array::<4>()?);
        usize::try_from(raw).map_err(|_| MetaPackError::LengthOverflow(usize::MAX))
    }

    /// Read a length prefix and the bytes it announces
    pub fn read_len_prefixed(&mut self) -> Result<&'a [u8]> {
        let len = self.read_len()?;
        self.take(len)
    }
}
