//! Read-only access to ReplayMod `.mcpr` archives.
//!
//! A `.mcpr` file is a plain ZIP archive. The entries this crate needs are:
//!
//! - [`RECORDING_ENTRY`] - the binary packet capture
//! - [`MARKERS_ENTRY`] - the JSON marker list
//! - [`METADATA_ENTRY`] - the JSON session metadata
//!
//! Only stored and DEFLATE entries are supported. ZIP64, encryption and
//! multi-disk archives are rejected.
//!
//! # Example
//!
//! ```no_run
//! use mcpr_chat::archive::{ReplayArchive, METADATA_ENTRY};
//!
//! let data = std::fs::read("replay.mcpr")?;
//! let archive = ReplayArchive::parse(&data)?;
//!
//! for name in archive.entry_names() {
//!     println!("{name}");
//! }
//! let metadata = archive.read_entry(METADATA_ENTRY)?;
//! println!("{} bytes of metadata", metadata.len());
//! # Ok::<(), mcpr_chat::error::ParserError>(())
//! ```

pub mod directory;
pub mod entry;

pub use directory::{CentralEntry, EndOfCentralDirectory};
pub use entry::{EntryReader, METHOD_DEFLATED, METHOD_STORED};

use std::io::Read;

use tracing::debug;

use crate::binary::read_bytes;
use crate::error::{ParserError, Result};

/// Name of the packet capture entry.
pub const RECORDING_ENTRY: &str = "recording.tmcpr";

/// Name of the marker list entry.
pub const MARKERS_ENTRY: &str = "markers.json";

/// Name of the session metadata entry.
pub const METADATA_ENTRY: &str = "metaData.json";

/// Entries every replay must contain for chat extraction.
pub const REQUIRED_ENTRIES: [&str; 3] = [RECORDING_ENTRY, MARKERS_ENTRY, METADATA_ENTRY];

/// A parsed replay archive borrowing the raw file bytes.
#[derive(Debug, Clone)]
pub struct ReplayArchive<'a> {
    data: &'a [u8],
    entries: Vec<CentralEntry>,
}

impl<'a> ReplayArchive<'a> {
    /// Parses the central directory of a replay archive.
    ///
    /// # Errors
    ///
    /// - `ParserError::InvalidArchive` if the data is not a usable ZIP archive
    /// - `ParserError::InvalidMagic` if a central header signature is wrong
    /// - `ParserError::UnexpectedEof` if the data is truncated
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        let eocd = EndOfCentralDirectory::locate(data)?;
        let entries = directory::read_central_directory(data, &eocd)?;

        debug!(entries = entries.len(), "parsed replay archive directory");

        Ok(ReplayArchive { data, entries })
    }

    /// Returns the number of entries in the archive.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether the archive has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the names of all entries, in directory order.
    pub fn entry_names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    /// Returns whether an entry with the given name exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.name == name)
    }

    /// Checks that every named entry exists.
    ///
    /// # Errors
    ///
    /// Returns `ParserError::MissingEntry` for the first absent name.
    pub fn require(&self, names: &[&str]) -> Result<()> {
        match names.iter().find(|name| !self.contains(name)) {
            Some(name) => Err(ParserError::MissingEntry {
                name: (*name).to_string(),
            }),
            None => Ok(()),
        }
    }

    fn find(&self, name: &str) -> Result<&CentralEntry> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .ok_or_else(|| ParserError::MissingEntry {
                name: name.to_string(),
            })
    }

    /// Opens an entry for streaming reads.
    ///
    /// # Errors
    ///
    /// - `ParserError::MissingEntry` if no entry has this name
    /// - `ParserError::InvalidArchive` if the entry is encrypted or uses
    ///   an unsupported compression method
    /// - `ParserError::InvalidMagic` / `ParserError::UnexpectedEof` if the
    ///   local header or data is damaged
    pub fn entry(&self, name: &str) -> Result<EntryReader<'a>> {
        let entry = self.find(name)?;

        if entry.is_encrypted() {
            return Err(ParserError::invalid_archive(format!(
                "entry '{name}' is encrypted"
            )));
        }

        let start = directory::local_data_offset(self.data, entry)?;
        let body = read_bytes(self.data, start, entry.compressed_size as usize)?;

        EntryReader::new(entry.method, body).ok_or_else(|| {
            ParserError::invalid_archive(format!(
                "entry '{name}' uses unsupported compression method {}",
                entry.method
            ))
        })
    }

    /// Reads an entry fully into memory.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`ReplayArchive::entry`], plus
    /// `ParserError::IoError` if decompression fails.
    pub fn read_entry(&self, name: &str) -> Result<Vec<u8>> {
        let expected = self.find(name)?.uncompressed_size as usize;
        let mut out = Vec::with_capacity(expected);
        self.entry(name)?.read_to_end(&mut out)?;
        Ok(out)
    }
}
