//! Length-prefixed UTF-8 strings.
//!
//! The length prefix is an unsigned integer stored 7 bits per byte, least
//! significant group first. A byte with its high bit set means another
//! length byte follows.

use super::cursor::ByteCursor;
use super::error::DecodeError;

/// Maximum number of prefix bytes for a 32-bit length
const MAX_PREFIX_BYTES: usize = 5;

/// Bits of the final prefix byte that would reach past bit 31
const LAST_BYTE_OVERFLOW: u8 = 0x70;

/// Decode a string starting at `offset`, returning it and the offset just past it
pub fn decode_string(buffer: &[u8], offset: usize) -> Result<(String, usize), DecodeError> {
    let mut cursor = ByteCursor::new(buffer);
    cursor.set_position(offset);
    let value = read_string(&mut cursor)?;
    Ok((value, cursor.position()))
}

/// Decode a string at the cursor position and advance past it
pub fn read_string(cursor: &mut ByteCursor<'_>) -> Result<String, DecodeError> {
    let start = cursor.position();
    let len = read_length(cursor, start)?;
    if len == 0 {
        return Ok(String::new());
    }

    let text_offset = cursor.position();
    let bytes = cursor.read_bytes(len)?;
    std::str::from_utf8(bytes)
        .map(str::to_owned)
        .map_err(|_| DecodeError::InvalidString {
            offset: text_offset,
        })
}

fn read_length(cursor: &mut ByteCursor<'_>, start: usize) -> Result<usize, DecodeError> {
    let mut length: u64 = 0;
    for index in 0..MAX_PREFIX_BYTES {
        let byte = cursor.read_u8()?;
        if index == MAX_PREFIX_BYTES - 1 && byte & LAST_BYTE_OVERFLOW != 0 {
            return Err(DecodeError::VarintOverflow { offset: start });
        }
        length |= u64::from(byte & 0x7F) << (7 * index);
        if byte & 0x80 == 0 {
            return usize::try_from(length).map_err(|_| DecodeError::VarintOverflow { offset: start });
        }
    }
    Err(DecodeError::VarintOverflow { offset: start })
}

/// Append `value` with its 7-bit length prefix to `out`
pub fn encode_string(out: &mut Vec<u8>, value: &str) {
    let mut length = value.len() as u64;
    while length >= 0x80 {
        out.push((length as u8 & 0x7F) | 0x80);
        length >>= 7;
    }
    out.push(length as u8);
    out.extend_from_slice(value.as_bytes());
}
