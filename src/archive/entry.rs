//! Streaming access to the data of a single archive entry.

use std::io::{self, Read};

use flate2::read::DeflateDecoder;

/// Compression method: data stored as-is.
pub const METHOD_STORED: u16 = 0;

/// Compression method: raw DEFLATE stream.
pub const METHOD_DEFLATED: u16 = 8;

/// A reader over one entry's decompressed bytes.
///
/// Borrows the archive data; nothing is decompressed until read.
pub enum EntryReader<'a> {
    /// Entry stored without compression.
    Stored(&'a [u8]),

    /// Entry compressed with raw DEFLATE.
    Deflated(DeflateDecoder<&'a [u8]>),
}

impl<'a> EntryReader<'a> {
    /// Creates a reader for entry data compressed with the given method.
    ///
    /// Returns `None` for methods other than stored and DEFLATE.
    #[must_use]
    pub fn new(method: u16, data: &'a [u8]) -> Option<Self> {
        match method {
            METHOD_STORED => Some(EntryReader::Stored(data)),
            METHOD_DEFLATED => Some(EntryReader::Deflated(DeflateDecoder::new(data))),
            _ => None,
        }
    }
}

impl Read for EntryReader<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            EntryReader::Stored(data) => data.read(buf),
            EntryReader::Deflated(decoder) => decoder.read(buf),
        }
    }
}

impl std::fmt::Debug for EntryReader<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryReader::Stored(data) => write!(f, "EntryReader::Stored({} bytes left)", data.len()),
            EntryReader::Deflated(_) => f.write_str("EntryReader::Deflated"),
        }
    }
}
