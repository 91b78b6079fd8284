//! Error types for the replay chat extractor.
//!
//! Every failure is fatal: the tool is single-shot and does not retry or
//! resume. Non-matching packets and an empty result are not errors.

use std::path::PathBuf;

use thiserror::Error;

/// The main error type for replay parsing operations.
///
/// This enum covers all error cases that can occur while extracting chat:
/// - File I/O failures
/// - Malformed or incomplete archives
/// - Undecodable metadata or marker documents
/// - Unsupported game versions
/// - Corrupt packet records
///
/// # Example
///
/// ```
/// use mcpr_chat::error::{ParserError, Result};
///
/// fn example_operation() -> Result<()> {
///     Err(ParserError::MissingEntry {
///         name: "markers.json".to_string(),
///     })
/// }
/// ```
#[derive(Error, Debug)]
pub enum ParserError {
    /// An I/O error occurred while reading replay data.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The replay file itself could not be read.
    #[error("Cannot open replay {}: {source}", path.display())]
    ArchiveOpen {
        /// Path of the replay that failed to open.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A record signature does not match the ZIP format.
    ///
    /// Replay archives are ZIP files; each structure starts with a `PK`
    /// signature such as `PK\x05\x06` for the end of central directory.
    #[error("Invalid magic bytes: expected {expected}, found {found}")]
    InvalidMagic {
        /// The expected magic bytes (as hex string for display).
        expected: String,
        /// The bytes actually found (as hex string).
        found: String,
    },

    /// The archive is structurally invalid or uses unsupported features.
    #[error("Invalid archive: {reason}")]
    InvalidArchive {
        /// A description of what makes the archive unusable.
        reason: String,
    },

    /// One of the entries every recording must contain is absent.
    #[error("Missing archive entry '{name}': file isn't a replay or it doesn't have any markers")]
    MissingEntry {
        /// Name of the missing entry.
        name: String,
    },

    /// The metadata document is not valid JSON or lacks the version field.
    #[error("Invalid metadata document: {source}")]
    MetadataDecode {
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// The marker document is not a valid JSON array of markers.
    #[error("Invalid marker document: {source}")]
    MarkerDecode {
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// The recording was made with a game version missing from the registry.
    #[error("Unsupported Minecraft version: {version}")]
    UnsupportedVersion {
        /// The version string declared by the metadata.
        version: String,
    },

    /// The marker document contains no markers.
    #[error("Couldn't find any markers")]
    NoMarkers,

    /// A packet carried the chat packet id but its body did not decode.
    #[error("Invalid packet at {timestamp_ms}ms: {reason}")]
    InvalidPacket {
        /// Timestamp of the offending packet.
        timestamp_ms: u32,
        /// A description of the decode failure.
        reason: String,
    },

    /// The packet stream reported an error once scanning had finished.
    #[error("Packet stream error: {0}")]
    StreamError(#[source] Box<ParserError>),

    /// A packet record header is not usable.
    #[error("Invalid packet record: {reason}")]
    InvalidRecord {
        /// A description of the framing problem.
        reason: String,
    },

    /// A primitive value inside a payload is malformed.
    #[error("Invalid data: {reason}")]
    InvalidData {
        /// A description of the malformed value.
        reason: String,
    },

    /// A chat component could not be parsed as JSON.
    #[error("Invalid chat component: {source}")]
    InvalidChatComponent {
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// The data ended unexpectedly before the required bytes could be read.
    #[error("Unexpected end of data: expected {expected} bytes, but only {available} available")]
    UnexpectedEof {
        /// The number of bytes that were expected to be available.
        expected: usize,
        /// The actual number of bytes available.
        available: usize,
    },
}

impl ParserError {
    /// Creates an `InvalidMagic` error with the given byte slices.
    ///
    /// The bytes are converted to hex strings for human-readable display.
    ///
    /// # Example
    ///
    /// ```
    /// use mcpr_chat::error::ParserError;
    ///
    /// let err = ParserError::invalid_magic(b"PK\x05\x06", b"\x00\x00\x00\x00");
    /// assert!(err.to_string().contains("Invalid magic bytes"));
    /// ```
    #[must_use]
    pub fn invalid_magic(expected: &[u8], found: &[u8]) -> Self {
        ParserError::InvalidMagic {
            expected: bytes_to_hex(expected),
            found: bytes_to_hex(found),
        }
    }

    /// Creates an `UnexpectedEof` error with the given sizes.
    #[must_use]
    pub fn unexpected_eof(expected: usize, available: usize) -> Self {
        ParserError::UnexpectedEof { expected, available }
    }

    /// Creates an `InvalidArchive` error from any displayable reason.
    #[must_use]
    pub fn invalid_archive(reason: impl Into<String>) -> Self {
        ParserError::InvalidArchive {
            reason: reason.into(),
        }
    }
}

/// Converts a byte slice to a hexadecimal string representation.
///
/// Slices of 8 bytes or less are formatted as space-separated hex values,
/// longer ones as the first 8 bytes followed by "...".
fn bytes_to_hex(bytes: &[u8]) -> String {
    let shown = bytes.len().min(8);
    let prefix = bytes[..shown]
        .iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(" ");

    if bytes.len() <= 8 {
        prefix
    } else {
        format!("{prefix}... ({} bytes total)", bytes.len())
    }
}

/// A specialized Result type for replay parsing operations.
pub type Result<T> = std::result::Result<T, ParserError>;
