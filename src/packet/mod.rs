//! Packet records from the `.tmcpr` capture stream.
//!
//! # Format
//!
//! The capture is a flat sequence of records:
//!
//! | Offset | Size | Type | Field |
//! |--------|------|------|-------|
//! | 0 | 4 | u32 BE | Timestamp (ms since recording start) |
//! | 4 | 4 | u32 BE | Payload length |
//! | 8 | var | bytes | Payload (packet id VarInt + packet body) |
//!
//! Each [`Packet`] owns its payload and reads it front to back through a
//! cursor; reads never backtrack.

pub mod reader;

pub use reader::{PacketReader, MAX_PACKET_LEN, RECORD_HEADER_SIZE};

use crate::binary::{read_u8, read_varint, read_varint_string};
use crate::error::Result;

/// A single timestamped packet with a sequential payload cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    /// Milliseconds since the start of the recording.
    pub timestamp_ms: u32,

    data: Vec<u8>,
    position: usize,
}

impl Packet {
    /// Creates a packet with the cursor at the start of the payload.
    #[must_use]
    pub fn new(timestamp_ms: u32, data: Vec<u8>) -> Self {
        Packet {
            timestamp_ms,
            data,
            position: 0,
        }
    }

    /// Returns the full payload, regardless of the cursor.
    #[must_use]
    pub fn payload(&self) -> &[u8] {
        &self.data
    }

    /// Returns the number of unread payload bytes.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    /// Reads one byte and advances the cursor.
    ///
    /// # Errors
    ///
    /// Returns `ParserError::UnexpectedEof` if the payload is exhausted.
    pub fn read_byte(&mut self) -> Result<u8> {
        let byte = read_u8(&self.data, self.position)?;
        self.position += 1;
        Ok(byte)
    }

    /// Reads a protocol VarInt and advances the cursor.
    ///
    /// # Errors
    ///
    /// Returns `ParserError::UnexpectedEof` or `ParserError::InvalidData`
    /// for a truncated or oversized VarInt.
    pub fn read_varint(&mut self) -> Result<i32> {
        let (value, consumed) = read_varint(&self.data, self.position)?;
        self.position += consumed;
        Ok(value)
    }

    /// Reads a VarInt-length-prefixed UTF-8 string and advances the cursor.
    ///
    /// # Errors
    ///
    /// Returns `ParserError::UnexpectedEof` or `ParserError::InvalidData`
    /// if the string is truncated, has a negative length or is not UTF-8.
    pub fn read_string(&mut self) -> Result<String> {
        let (text, consumed) = read_varint_string(&self.data, self.position)?;
        self.position += consumed;
        Ok(text)
    }
}
