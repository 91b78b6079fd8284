//! ZIP central directory parsing.
//!
//! A replay archive is read back to front:
//!
//! 1. The end-of-central-directory (EOCD) record sits in the last
//!    22 + comment bytes of the file and points at the central directory.
//! 2. The central directory holds one 46-byte header (plus variable-length
//!    name, extra field and comment) per entry.
//! 3. Each central header points at a local file header that precedes the
//!    entry data.
//!
//! # EOCD layout
//!
//! | Offset | Size | Field |
//! |--------|------|-------|
//! | 0 | 4 | Signature `PK\x05\x06` |
//! | 4 | 2 | Number of this disk |
//! | 6 | 2 | Disk where the central directory starts |
//! | 8 | 2 | Entries on this disk |
//! | 10 | 2 | Total entries |
//! | 12 | 4 | Central directory size |
//! | 16 | 4 | Central directory offset |
//! | 20 | 2 | Comment length |

use crate::binary::{read_bytes, read_u16_le, read_u32_le};
use crate::error::{ParserError, Result};

/// Signature of the end-of-central-directory record.
pub const EOCD_SIGNATURE: &[u8; 4] = b"PK\x05\x06";

/// Signature of a central directory file header.
pub const CENTRAL_HEADER_SIGNATURE: &[u8; 4] = b"PK\x01\x02";

/// Signature of a local file header.
pub const LOCAL_HEADER_SIGNATURE: &[u8; 4] = b"PK\x03\x04";

/// Fixed size of the EOCD record (without comment).
pub const EOCD_SIZE: usize = 22;

/// Fixed size of a central directory file header.
pub const CENTRAL_HEADER_SIZE: usize = 46;

/// Fixed size of a local file header.
pub const LOCAL_HEADER_SIZE: usize = 30;

/// Longest archive comment the EOCD can describe.
const MAX_COMMENT_LEN: usize = 0xFFFF;

/// General purpose flag bit marking an encrypted entry.
const FLAG_ENCRYPTED: u16 = 0x0001;

/// The end-of-central-directory record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndOfCentralDirectory {
    /// Total number of entries in the central directory.
    pub entry_count: u16,

    /// Size of the central directory in bytes.
    pub directory_size: u32,

    /// Offset of the central directory from the start of the archive.
    pub directory_offset: u32,

    /// Offset of the EOCD record itself.
    pub offset: usize,
}

impl EndOfCentralDirectory {
    /// Locates and parses the EOCD record.
    ///
    /// The record is searched backwards from the end of the data, across
    /// at most the maximum comment length.
    ///
    /// # Errors
    ///
    /// - `ParserError::UnexpectedEof` if the data is shorter than an EOCD record
    /// - `ParserError::InvalidArchive` if no EOCD is found, or the archive
    ///   spans several disks or needs ZIP64 extensions
    pub fn locate(data: &[u8]) -> Result<Self> {
        if data.len() < EOCD_SIZE {
            return Err(ParserError::unexpected_eof(EOCD_SIZE, data.len()));
        }

        let last = data.len() - EOCD_SIZE;
        let first = last.saturating_sub(MAX_COMMENT_LEN);

        let offset = (first..=last)
            .rev()
            .find(|&i| &data[i..i + 4] == EOCD_SIGNATURE)
            .ok_or_else(|| {
                ParserError::invalid_archive("end of central directory not found, not a ZIP file")
            })?;

        Self::parse_at(data, offset)
    }

    fn parse_at(data: &[u8], offset: usize) -> Result<Self> {
        let disk = read_u16_le(data, offset + 4)?;
        let directory_disk = read_u16_le(data, offset + 6)?;
        if disk != 0 || directory_disk != 0 {
            return Err(ParserError::invalid_archive(
                "multi-disk archives are not supported",
            ));
        }

        let entry_count = read_u16_le(data, offset + 10)?;
        let directory_size = read_u32_le(data, offset + 12)?;
        let directory_offset = read_u32_le(data, offset + 16)?;

        if entry_count == u16::MAX || directory_offset == u32::MAX || directory_size == u32::MAX {
            return Err(ParserError::invalid_archive(
                "ZIP64 archives are not supported",
            ));
        }

        let end = directory_offset as usize + directory_size as usize;
        if end > offset {
            return Err(ParserError::invalid_archive(format!(
                "central directory ({directory_offset}+{directory_size}) overlaps its end record at {offset}"
            )));
        }

        Ok(EndOfCentralDirectory {
            entry_count,
            directory_size,
            directory_offset,
            offset,
        })
    }
}

/// One entry of the central directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CentralEntry {
    /// Entry name, as stored in the archive.
    pub name: String,

    /// General purpose bit flags.
    pub flags: u16,

    /// Compression method (0 = stored, 8 = DEFLATE).
    pub method: u16,

    /// Size of the entry data as stored.
    pub compressed_size: u32,

    /// Size of the entry data once decompressed.
    pub uncompressed_size: u32,

    /// Offset of the entry's local file header.
    pub local_header_offset: u32,
}

impl CentralEntry {
    /// Returns whether the entry is encrypted.
    #[must_use]
    pub fn is_encrypted(&self) -> bool {
        self.flags & FLAG_ENCRYPTED != 0
    }

    /// Parses a central directory file header at the given offset.
    ///
    /// Returns the entry and the total bytes consumed, including the
    /// variable-length name, extra field and comment.
    ///
    /// # Errors
    ///
    /// - `ParserError::InvalidMagic` if the signature is not `PK\x01\x02`
    /// - `ParserError::UnexpectedEof` if the header is truncated
    pub fn parse(data: &[u8], offset: usize) -> Result<(Self, usize)> {
        let signature = read_bytes(data, offset, 4)?;
        if signature != CENTRAL_HEADER_SIGNATURE {
            return Err(ParserError::invalid_magic(CENTRAL_HEADER_SIGNATURE, signature));
        }

        let flags = read_u16_le(data, offset + 8)?;
        let method = read_u16_le(data, offset + 10)?;
        let compressed_size = read_u32_le(data, offset + 20)?;
        let uncompressed_size = read_u32_le(data, offset + 24)?;
        let name_len = read_u16_le(data, offset + 28)? as usize;
        let extra_len = read_u16_le(data, offset + 30)? as usize;
        let comment_len = read_u16_le(data, offset + 32)? as usize;
        let local_header_offset = read_u32_le(data, offset + 42)?;

        let name = read_bytes(data, offset + CENTRAL_HEADER_SIZE, name_len)?;
        let name = String::from_utf8_lossy(name).into_owned();

        let entry = CentralEntry {
            name,
            flags,
            method,
            compressed_size,
            uncompressed_size,
            local_header_offset,
        };

        Ok((entry, CENTRAL_HEADER_SIZE + name_len + extra_len + comment_len))
    }
}

/// Parses every central directory entry described by the EOCD record.
///
/// # Errors
///
/// Returns an error if any central header is malformed or truncated.
pub fn read_central_directory(
    data: &[u8],
    eocd: &EndOfCentralDirectory,
) -> Result<Vec<CentralEntry>> {
    let mut entries = Vec::with_capacity(usize::from(eocd.entry_count));
    let mut offset = eocd.directory_offset as usize;

    for _ in 0..eocd.entry_count {
        let (entry, consumed) = CentralEntry::parse(data, offset)?;
        entries.push(entry);
        offset += consumed;
    }

    Ok(entries)
}

/// Returns the offset where an entry's data begins, past its local header.
///
/// The local header carries its own name and extra field lengths, which
/// may differ from those in the central directory.
///
/// # Errors
///
/// - `ParserError::InvalidMagic` if the signature is not `PK\x03\x04`
/// - `ParserError::UnexpectedEof` if the header is truncated
pub fn local_data_offset(data: &[u8], entry: &CentralEntry) -> Result<usize> {
    let offset = entry.local_header_offset as usize;

    let signature = read_bytes(data, offset, 4)?;
    if signature != LOCAL_HEADER_SIGNATURE {
        return Err(ParserError::invalid_magic(LOCAL_HEADER_SIGNATURE, signature));
    }

    let name_len = read_u16_le(data, offset + 26)? as usize;
    let extra_len = read_u16_le(data, offset + 28)? as usize;

    Ok(offset + LOCAL_HEADER_SIZE + name_len + extra_len)
}
