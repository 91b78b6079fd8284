//! Binary reading utilities for replay archives and packet payloads.
//!
//! Two byte orders meet in a replay:
//!
//! - The ZIP container stores its integers little-endian.
//! - The `.tmcpr` packet framing stores timestamps and lengths big-endian.
//!
//! Packet payloads additionally use the game protocol's variable-length
//! integers (VarInt) and VarInt-prefixed UTF-8 strings.
//!
//! All functions perform bounds checking and return
//! `ParserError::UnexpectedEof` for truncated data.
//!
//! # Example
//!
//! ```
//! use mcpr_chat::binary::{read_u32_be, read_varint, read_varint_string};
//!
//! let data = [0x00, 0x00, 0x01, 0x2C, 0x02, b'h', b'i'];
//!
//! assert_eq!(read_u32_be(&data, 0).unwrap(), 300);
//! assert_eq!(read_varint(&data, 4).unwrap(), (2, 1));
//! assert_eq!(read_varint_string(&data, 4).unwrap(), ("hi".to_string(), 3));
//! ```

use crate::error::{ParserError, Result};

/// Maximum number of bytes a protocol VarInt may occupy.
pub const VARINT_MAX_BYTES: usize = 5;

/// Returns the `len`-byte window at `offset`, or an `UnexpectedEof` error.
fn window(bytes: &[u8], offset: usize, len: usize) -> Result<&[u8]> {
    let end = offset.saturating_add(len);
    if end > bytes.len() {
        return Err(ParserError::unexpected_eof(end, bytes.len()));
    }
    Ok(&bytes[offset..end])
}

/// Reads a single byte at the given offset.
///
/// # Errors
///
/// Returns `ParserError::UnexpectedEof` if `offset` is past the end.
pub fn read_u8(bytes: &[u8], offset: usize) -> Result<u8> {
    Ok(window(bytes, offset, 1)?[0])
}

/// Reads a little-endian u16 value from the byte buffer at the given offset.
///
/// # Errors
///
/// Returns `ParserError::UnexpectedEof` if the buffer doesn't contain
/// at least 2 bytes starting from the given offset.
///
/// # Example
///
/// ```
/// use mcpr_chat::binary::read_u16_le;
///
/// let data = [0x34, 0x12, 0xFF, 0xFF];
/// assert_eq!(read_u16_le(&data, 0).unwrap(), 0x1234);
/// assert_eq!(read_u16_le(&data, 2).unwrap(), 0xFFFF);
/// ```
pub fn read_u16_le(bytes: &[u8], offset: usize) -> Result<u16> {
    let slice = window(bytes, offset, 2)?;
    Ok(u16::from_le_bytes([slice[0], slice[1]]))
}

/// Reads a little-endian u32 value from the byte buffer at the given offset.
///
/// # Errors
///
/// Returns `ParserError::UnexpectedEof` if the buffer doesn't contain
/// at least 4 bytes starting from the given offset.
///
/// # Example
///
/// ```
/// use mcpr_chat::binary::read_u32_le;
///
/// let data = [0x50, 0x4B, 0x05, 0x06];
/// assert_eq!(read_u32_le(&data, 0).unwrap(), 0x0605_4B50);
/// ```
pub fn read_u32_le(bytes: &[u8], offset: usize) -> Result<u32> {
    let slice = window(bytes, offset, 4)?;
    Ok(u32::from_le_bytes([slice[0], slice[1], slice[2], slice[3]]))
}

/// Reads a big-endian u32 value from the byte buffer at the given offset.
///
/// # Errors
///
/// Returns `ParserError::UnexpectedEof` if the buffer doesn't contain
/// at least 4 bytes starting from the given offset.
pub fn read_u32_be(bytes: &[u8], offset: usize) -> Result<u32> {
    let slice = window(bytes, offset, 4)?;
    Ok(u32::from_be_bytes([slice[0], slice[1], slice[2], slice[3]]))
}

/// Reads a slice of bytes from the buffer at the given offset.
///
/// # Errors
///
/// Returns `ParserError::UnexpectedEof` if the buffer doesn't contain
/// at least `len` bytes starting from the given offset.
///
/// # Example
///
/// ```
/// use mcpr_chat::binary::read_bytes;
///
/// let data = b"PK\x03\x04\x14\x00";
/// assert_eq!(read_bytes(data, 0, 4).unwrap(), b"PK\x03\x04");
/// ```
pub fn read_bytes(bytes: &[u8], offset: usize, len: usize) -> Result<&[u8]> {
    window(bytes, offset, len)
}

/// Reads a protocol VarInt at the given offset.
///
/// Returns the decoded value together with the number of bytes consumed.
/// Each byte carries 7 bits, least significant group first; the high bit
/// marks a continuation.
///
/// # Errors
///
/// - `ParserError::UnexpectedEof` if the data ends inside the VarInt
/// - `ParserError::InvalidData` if the VarInt is longer than 5 bytes
///
/// # Example
///
/// ```
/// use mcpr_chat::binary::read_varint;
///
/// assert_eq!(read_varint(&[0xAC, 0x02], 0).unwrap(), (300, 2));
/// assert_eq!(read_varint(&[0xFF, 0xFF, 0xFF, 0xFF, 0x0F], 0).unwrap(), (-1, 5));
/// ```
#[allow(clippy::cast_possible_wrap)]
pub fn read_varint(bytes: &[u8], offset: usize) -> Result<(i32, usize)> {
    let mut value: u32 = 0;

    for i in 0..VARINT_MAX_BYTES {
        let byte = read_u8(bytes, offset + i)?;
        value |= u32::from(byte & 0x7F) << (7 * i);
        if byte & 0x80 == 0 {
            return Ok((value as i32, i + 1));
        }
    }

    Err(ParserError::InvalidData {
        reason: format!("VarInt at offset {offset} is longer than {VARINT_MAX_BYTES} bytes"),
    })
}

/// Reads a VarInt-length-prefixed UTF-8 string at the given offset.
///
/// Returns the string together with the total number of bytes consumed
/// (prefix included).
///
/// # Errors
///
/// - `ParserError::UnexpectedEof` if the prefix or the string body is truncated
/// - `ParserError::InvalidData` if the length is negative or the bytes
///   are not valid UTF-8
pub fn read_varint_string(bytes: &[u8], offset: usize) -> Result<(String, usize)> {
    let (len, prefix) = read_varint(bytes, offset)?;
    let len = usize::try_from(len).map_err(|_| ParserError::InvalidData {
        reason: format!("Negative string length {len} at offset {offset}"),
    })?;

    let body = read_bytes(bytes, offset + prefix, len)?;
    let text = String::from_utf8(body.to_vec()).map_err(|e| ParserError::InvalidData {
        reason: format!("Invalid UTF-8 string at offset {offset}: {e}"),
    })?;

    Ok((text, prefix + len))
}
