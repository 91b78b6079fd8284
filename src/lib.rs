//! # mcpr-chat
//!
//! Extracts the last chat message sent before the first marker of a
//! ReplayMod (`.mcpr`) recording.
//!
//! A `.mcpr` file is a ZIP archive bundling:
//! - `metaData.json` - the game version the session was recorded with
//! - `markers.json` - bookmarks placed in the replay editor
//! - `recording.tmcpr` - the captured, timestamped network packets
//!
//! ## Quick Start
//!
//! ```no_run
//! use mcpr_chat::chat::render_plain;
//! use mcpr_chat::error::Result;
//! use mcpr_chat::extract::extract_from_path;
//!
//! fn last_words() -> Result<()> {
//!     match extract_from_path("replay.mcpr")? {
//!         Some(line) => {
//!             println!("At {}ms: {}", line.timestamp_ms, line.json);
//!             println!("Plain: {}", render_plain(&line.json)?);
//!         }
//!         None => println!("No chat before the first marker"),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Module Overview
//!
//! - [`error`] - Error types and result alias
//! - [`binary`] - Bounds-checked integer, VarInt and string reads
//! - [`archive`] - ZIP container access by entry name
//! - [`session`] - Metadata and marker documents, boundary selection
//! - [`version`] - Game version to chat packet id registry
//! - [`packet`] - Capture records and the lazy packet reader
//! - [`scan`] - The chat scanner
//! - [`chat`] - Plain-text rendering of chat components
//! - [`extract`] - End-to-end extraction

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod archive;
pub mod binary;
pub mod chat;
pub mod error;
pub mod extract;
pub mod packet;
pub mod scan;
pub mod session;
pub mod version;

// Re-export commonly used types at the crate root
pub use archive::ReplayArchive;
pub use chat::render_plain;
pub use error::{ParserError, Result};
pub use extract::{extract_from_path, extract_last_chat, DEFAULT_REPLAY_FILE};
pub use packet::{Packet, PacketReader};
pub use scan::{scan, scan_text, ChatEvent, ChatLine};
pub use session::{earliest_marker, Marker, SessionMetadata};
pub use version::chat_packet_id;
