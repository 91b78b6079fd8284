//! End-to-end chat extraction from a replay archive.
//!
//! The steps run in a fixed order, and the first failure aborts:
//!
//! 1. Parse the archive and check the three required entries exist
//! 2. Decode the metadata and resolve the chat packet id for its version
//! 3. Decode the markers and pick the earliest as the boundary
//! 4. Scan the capture up to the boundary
//! 5. Check the capture stream's terminal status
//!
//! The version is resolved before any marker or packet is read, and the
//! stream status is checked only after the scan, including an early stop,
//! has completed.

use std::io::BufReader;
use std::path::Path;

use tracing::{debug, info};

use crate::archive::{ReplayArchive, MARKERS_ENTRY, METADATA_ENTRY, RECORDING_ENTRY, REQUIRED_ENTRIES};
use crate::error::{ParserError, Result};
use crate::packet::PacketReader;
use crate::scan::{scan, ChatLine};
use crate::session::{earliest_marker, parse_markers, SessionMetadata};
use crate::version::chat_packet_id;

/// Replay file read when no path is given.
pub const DEFAULT_REPLAY_FILE: &str = "replay.mcpr";

/// Extracts the last chat line at or before the earliest marker.
///
/// Returns `None` when no chat line qualifies.
///
/// # Errors
///
/// Any failure is fatal. See [`ParserError`] for the possible causes; in
/// particular `ParserError::StreamError` is returned when the capture turns
/// out to be damaged, even if a chat line was found before the damage.
///
/// # Example
///
/// ```no_run
/// use mcpr_chat::extract::extract_last_chat;
///
/// let data = std::fs::read("replay.mcpr")?;
/// if let Some(line) = extract_last_chat(&data)? {
///     println!("{}ms: {}", line.timestamp_ms, line.json);
/// }
/// # Ok::<(), mcpr_chat::error::ParserError>(())
/// ```
pub fn extract_last_chat(data: &[u8]) -> Result<Option<ChatLine>> {
    let archive = ReplayArchive::parse(data)?;
    archive.require(&REQUIRED_ENTRIES)?;

    let metadata = SessionMetadata::from_json(&archive.read_entry(METADATA_ENTRY)?)?;
    let packet_id = chat_packet_id(&metadata.mc_version)?;
    debug!(
        version = %metadata.mc_version,
        packet_id,
        "resolved chat packet id"
    );

    let markers = parse_markers(&archive.read_entry(MARKERS_ENTRY)?)?;
    let boundary = earliest_marker(&markers)?;
    debug!(markers = markers.len(), boundary, "resolved marker boundary");

    let mut packets = PacketReader::new(BufReader::new(archive.entry(RECORDING_ENTRY)?));
    let line = scan(&mut packets, packet_id, boundary)?;
    info!(
        packets = packets.packet_count(),
        found = line.is_some(),
        "scanned capture"
    );
    packets.finish()?;

    Ok(line)
}

/// Reads a replay file and extracts its last chat line before the first marker.
///
/// # Errors
///
/// Returns `ParserError::ArchiveOpen` if the file cannot be read, and the
/// errors of [`extract_last_chat`] otherwise.
pub fn extract_from_path(path: impl AsRef<Path>) -> Result<Option<ChatLine>> {
    let path = path.as_ref();
    let data = std::fs::read(path).map_err(|source| ParserError::ArchiveOpen {
        path: path.to_path_buf(),
        source,
    })?;

    debug!(path = %path.display(), bytes = data.len(), "read replay");
    extract_last_chat(&data)
}
