//! Lazy packet iteration over a `.tmcpr` capture.
//!
//! [`PacketReader`] is a two-phase sequence: iterating yields packets until
//! the stream ends *or* a framing error occurs, and [`PacketReader::finish`]
//! tells the two apart afterwards. Consumers must finish their scan before
//! calling it, so an error can never be hidden by an early, successful-looking
//! stop.
//!
//! # Example
//!
//! ```no_run
//! use mcpr_chat::packet::PacketReader;
//!
//! let file = std::fs::File::open("recording.tmcpr")?;
//! let mut reader = PacketReader::new(std::io::BufReader::new(file));
//!
//! for packet in reader.by_ref() {
//!     println!("{}ms: {} bytes", packet.timestamp_ms, packet.payload().len());
//! }
//! reader.finish()?;
//! # Ok::<(), mcpr_chat::error::ParserError>(())
//! ```

use std::io::{self, Read};

use tracing::trace;

use super::Packet;
use crate::binary::read_u32_be;
use crate::error::{ParserError, Result};

/// Size of a record header (timestamp + length).
pub const RECORD_HEADER_SIZE: usize = 8;

/// Largest payload a record may declare (the protocol's packet size limit).
pub const MAX_PACKET_LEN: usize = 2 * 1024 * 1024;

/// Iterator over the packets of a capture stream.
///
/// Iteration stops at the first error; the error is kept and reported by
/// [`PacketReader::finish`] as `ParserError::StreamError`.
#[derive(Debug)]
pub struct PacketReader<R> {
    /// Underlying capture stream.
    inner: R,

    /// Error that ended iteration, if any.
    error: Option<ParserError>,

    /// Number of packets yielded so far.
    packet_count: usize,

    /// Whether iteration has completed.
    finished: bool,
}

impl<R: Read> PacketReader<R> {
    /// Creates a reader positioned at the first record.
    #[must_use]
    pub fn new(inner: R) -> Self {
        PacketReader {
            inner,
            error: None,
            packet_count: 0,
            finished: false,
        }
    }

    /// Returns the number of packets yielded so far.
    #[must_use]
    pub fn packet_count(&self) -> usize {
        self.packet_count
    }

    /// Returns whether iteration is complete.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Returns the error that ended iteration, if any.
    #[must_use]
    pub fn error(&self) -> Option<&ParserError> {
        self.error.as_ref()
    }

    /// Consumes the reader and reports its terminal status.
    ///
    /// A stream that was left unread (because the consumer stopped early)
    /// is not an error.
    ///
    /// # Errors
    ///
    /// Returns `ParserError::StreamError` wrapping the error that ended
    /// iteration.
    pub fn finish(self) -> Result<()> {
        match self.error {
            Some(error) => Err(ParserError::StreamError(Box::new(error))),
            None => Ok(()),
        }
    }

    /// Reads the next record, or `None` at a clean end of stream.
    fn read_record(&mut self) -> Result<Option<Packet>> {
        let mut header = [0u8; RECORD_HEADER_SIZE];
        match fill(&mut self.inner, &mut header)? {
            0 => return Ok(None),
            RECORD_HEADER_SIZE => {}
            n => return Err(ParserError::unexpected_eof(RECORD_HEADER_SIZE, n)),
        }

        let timestamp_ms = read_u32_be(&header, 0)?;
        let len = read_u32_be(&header, 4)? as usize;
        if len > MAX_PACKET_LEN {
            return Err(ParserError::InvalidRecord {
                reason: format!(
                    "packet at {timestamp_ms}ms declares {len} bytes, limit is {MAX_PACKET_LEN}"
                ),
            });
        }

        let mut data = vec![0u8; len];
        let read = fill(&mut self.inner, &mut data)?;
        if read < len {
            return Err(ParserError::unexpected_eof(len, read));
        }

        Ok(Some(Packet::new(timestamp_ms, data)))
    }
}

impl<R: Read> Iterator for PacketReader<R> {
    type Item = Packet;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        match self.read_record() {
            Ok(Some(packet)) => {
                self.packet_count += 1;
                Some(packet)
            }
            Ok(None) => {
                trace!(packets = self.packet_count, "capture stream exhausted");
                self.finished = true;
                None
            }
            Err(e) => {
                trace!(packets = self.packet_count, error = %e, "capture stream failed");
                self.finished = true;
                self.error = Some(e);
                None
            }
        }
    }
}

/// Reads until `buf` is full or the stream ends, returning the bytes read.
fn fill<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut total = 0;
    while total < buf.len() {
        match reader.read(&mut buf[total..]) {
            Ok(0) => break,
            Ok(n) => total += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(total)
}
