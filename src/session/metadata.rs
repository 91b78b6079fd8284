//! Session metadata (`metaData.json`) decoding.
//!
//! ReplayMod writes a small JSON object describing the recording:
//!
//! ```json
//! {
//!   "singleplayer": false,
//!   "serverName": "play.example.net",
//!   "duration": 183021,
//!   "date": 1523212345678,
//!   "mcversion": "1.12.2",
//!   "fileFormat": "MCPR",
//!   "fileFormatVersion": 9,
//!   "protocol": 340,
//!   "generator": "ReplayMod v1.12.2-2.1.4"
//! }
//! ```
//!
//! Only `mcversion` is required; everything else is informational.

use serde::Deserialize;

use crate::error::{ParserError, Result};

/// Decoded session metadata.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionMetadata {
    /// Game version the session was recorded with, e.g. `"1.12.2"`.
    #[serde(rename = "mcversion")]
    pub mc_version: String,

    /// Server address, when recorded on a server.
    #[serde(default)]
    pub server_name: Option<String>,

    /// Whether the session was recorded in singleplayer.
    #[serde(default)]
    pub singleplayer: bool,

    /// Recording length in milliseconds.
    #[serde(default)]
    pub duration: Option<u64>,

    /// Recording start as a Unix timestamp in milliseconds.
    #[serde(default)]
    pub date: Option<i64>,

    /// Network protocol number of the recorded version.
    #[serde(default)]
    pub protocol: Option<i32>,

    /// Version of the replay file format.
    #[serde(default)]
    pub file_format_version: Option<u32>,

    /// Tool that produced the recording.
    #[serde(default)]
    pub generator: Option<String>,
}

impl SessionMetadata {
    /// Decodes the metadata document.
    ///
    /// # Errors
    ///
    /// Returns `ParserError::MetadataDecode` if the document is not valid
    /// JSON or lacks the `mcversion` field.
    ///
    /// # Example
    ///
    /// ```
    /// use mcpr_chat::session::SessionMetadata;
    ///
    /// let meta = SessionMetadata::from_json(br#"{"mcversion":"1.12.2"}"#).unwrap();
    /// assert_eq!(meta.mc_version, "1.12.2");
    /// ```
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|source| ParserError::MetadataDecode { source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_document() {
        let json = br#"{
            "singleplayer": false,
            "serverName": "play.example.net",
            "duration": 183021,
            "date": 1523212345678,
            "mcversion": "1.12.2",
            "fileFormat": "MCPR",
            "fileFormatVersion": 9,
            "protocol": 340,
            "generator": "ReplayMod v1.12.2-2.1.4",
            "selfId": 1234,
            "players": []
        }"#;

        let meta = SessionMetadata::from_json(json).unwrap();
        assert_eq!(meta.mc_version, "1.12.2");
        assert_eq!(meta.server_name.as_deref(), Some("play.example.net"));
        assert!(!meta.singleplayer);
        assert_eq!(meta.duration, Some(183_021));
        assert_eq!(meta.protocol, Some(340));
        assert_eq!(meta.file_format_version, Some(9));
    }

    #[test]
    fn test_minimal_document() {
        let meta = SessionMetadata::from_json(br#"{"mcversion":"1.8.9"}"#).unwrap();
        assert_eq!(meta.mc_version, "1.8.9");
        assert_eq!(meta.server_name, None);
        assert_eq!(meta.generator, None);
    }

    #[test]
    fn test_missing_version() {
        let result = SessionMetadata::from_json(br#"{"serverName":"localhost"}"#);
        assert!(matches!(result, Err(ParserError::MetadataDecode { .. })));
    }

    #[test]
    fn test_malformed_json() {
        let result = SessionMetadata::from_json(b"{\"mcversion\":");
        assert!(matches!(result, Err(ParserError::MetadataDecode { .. })));
    }
}
