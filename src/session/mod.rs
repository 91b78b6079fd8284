//! The two JSON documents bundled with every recording.
//!
//! - [`metadata`] - `metaData.json`, declares the recorded game version
//! - [`markers`] - `markers.json`, the user's bookmarks and the boundary
//!   derived from them

pub mod markers;
pub mod metadata;

pub use markers::{earliest_marker, parse_markers, Marker, MarkerValue};
pub use metadata::SessionMetadata;
