//! Bounded little-endian reader over an in-memory file buffer.
//!
//! Wraps [`std::io::Cursor`] and the `byteorder` extension traits so that
//! every short read is reported as [`DecodeError::Truncated`] with the byte
//! offset at which it started.

use std::io::Cursor;

use byteorder::{LittleEndian, ReadBytesExt};

use super::error::DecodeError;

/// Read cursor that never reads past the end of its buffer
pub struct ByteCursor<'a> {
    inner: Cursor<&'a [u8]>,
}

macro_rules! read_le {
    ($name:ident, $ty:ty, $method:ident) => {
        /// Read one little-endian value, advancing the cursor
        pub fn $name(&mut self) -> Result<$ty, DecodeError> {
            let offset = self.position();
            self.inner
                .$method::<LittleEndian>()
                .map_err(|_| DecodeError::Truncated { offset })
        }
    };
}

impl<'a> ByteCursor<'a> {
    /// Create a cursor positioned at the start of `buffer`
    pub fn new(buffer: &'a [u8]) -> Self {
        Self {
            inner: Cursor::new(buffer),
        }
    }

    /// Current byte offset
    pub fn position(&self) -> usize {
        self.inner.position() as usize
    }

    /// Move the cursor to an absolute offset
    pub fn set_position(&mut self, offset: usize) {
        self.inner.set_position(offset as u64);
    }

    /// Bytes left between the cursor and the end of the buffer
    pub fn remaining(&self) -> usize {
        self.inner.get_ref().len().saturating_sub(self.position())
    }

    /// Read a single byte
    pub fn read_u8(&mut self) -> Result<u8, DecodeError> {
        let offset = self.position();
        self.inner
            .read_u8()
            .map_err(|_| DecodeError::Truncated { offset })
    }

    /// Borrow the next `len` bytes and advance past them
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], DecodeError> {
        let offset = self.position();
        if len > self.remaining() {
            return Err(DecodeError::Truncated { offset });
        }
        let buffer: &'a [u8] = *self.inner.get_ref();
        self.set_position(offset + len);
        Ok(&buffer[offset..offset + len])
    }

    read_le!(read_i16, i16, read_i16);
    read_le!(read_u32, u32, read_u32);
    read_le!(read_i32, i32, read_i32);
    read_le!(read_i64, i64, read_i64);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_little_endian() {
        let bytes = [0x34, 0x12, 0x78, 0x56, 0x34, 0x12];
        let mut cursor = ByteCursor::new(&bytes);
        assert_eq!(cursor.read_i16().unwrap(), 0x1234);
        assert_eq!(cursor.read_u32().unwrap(), 0x1234_5678);
        assert_eq!(cursor.remaining(), 0);
    }

    #[test]
    fn test_short_read_reports_start_offset() {
        let bytes = [0x01, 0x02, 0x03];
        let mut cursor = ByteCursor::new(&bytes);
        cursor.read_u8().unwrap();
        let err = cursor.read_u32().unwrap_err();
        assert!(matches!(err, DecodeError::Truncated { offset: 1 }));
    }

    #[test]
    fn test_read_bytes_past_end() {
        let bytes = [0u8; 4];
        let mut cursor = ByteCursor::new(&bytes);
        assert_eq!(cursor.read_bytes(3).unwrap().len(), 3);
        assert!(matches!(
            cursor.read_bytes(2),
            Err(DecodeError::Truncated { offset: 3 })
        ));
        // failed read leaves the cursor where it was
        assert_eq!(cursor.position(), 3);
    }
}
