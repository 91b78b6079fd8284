//! Marker list (`markers.json`) decoding and boundary selection.
//!
//! Markers are bookmarks placed in the replay editor. ReplayMod stores them
//! as a JSON array:
//!
//! ```json
//! [
//!   {"realTimestamp": 51234, "value": {"name": "kill", "position": {"x": 1.0}}},
//!   {"realTimestamp": 20876, "value": {}}
//! ]
//! ```
//!
//! The earliest marker defines the scan boundary.

use serde::Deserialize;

use crate::error::{ParserError, Result};

/// A user-placed bookmark in the recording.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Marker {
    /// Milliseconds since the start of the recording.
    pub real_timestamp: i64,

    /// Optional marker payload.
    #[serde(default)]
    pub value: Option<MarkerValue>,
}

impl Marker {
    /// Creates an unnamed marker at the given timestamp.
    #[must_use]
    pub fn at(real_timestamp: i64) -> Self {
        Marker {
            real_timestamp,
            value: None,
        }
    }

    /// Returns the marker's label, if one was given.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.value.as_ref().and_then(|v| v.name.as_deref())
    }
}

/// The `value` object of a marker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MarkerValue {
    /// Label typed by the user.
    #[serde(default)]
    pub name: Option<String>,
}

/// Decodes the marker document.
///
/// # Errors
///
/// Returns `ParserError::MarkerDecode` if the document is not a JSON array
/// of objects with an integer `realTimestamp`.
pub fn parse_markers(bytes: &[u8]) -> Result<Vec<Marker>> {
    serde_json::from_slice(bytes).map_err(|source| ParserError::MarkerDecode { source })
}

/// Returns the earliest timestamp among the markers.
///
/// Ties are irrelevant: any marker sharing the minimum gives the same value.
///
/// # Errors
///
/// Returns `ParserError::NoMarkers` if the collection is empty.
///
/// # Example
///
/// ```
/// use mcpr_chat::session::{earliest_marker, Marker};
///
/// let markers = [Marker::at(50), Marker::at(20)];
/// assert_eq!(earliest_marker(&markers).unwrap(), 20);
/// ```
pub fn earliest_marker(markers: &[Marker]) -> Result<i64> {
    markers
        .iter()
        .map(|m| m.real_timestamp)
        .min()
        .ok_or(ParserError::NoMarkers)
}
