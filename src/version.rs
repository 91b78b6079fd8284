//! Game version registry.
//!
//! Maps the version string declared in the session metadata to the id of
//! the clientbound "Chat Message" packet in that protocol revision. Every
//! listed revision encodes the packet as a JSON chat component string
//! followed by a position byte.
//!
//! New versions are added as table entries.
//!
//! # Example
//!
//! ```
//! use mcpr_chat::version::chat_packet_id;
//!
//! assert_eq!(chat_packet_id("1.12.2").unwrap(), 0x0F);
//! assert!(chat_packet_id("9.9.9").is_err());
//! ```

use crate::error::{ParserError, Result};

/// Chat Message packet id for every supported game version.
pub const CHAT_PACKET_IDS: &[(&str, u8)] = &[
    // 1.8: protocol 47
    ("1.8", 0x02),
    ("1.8.1", 0x02),
    ("1.8.2", 0x02),
    ("1.8.3", 0x02),
    ("1.8.4", 0x02),
    ("1.8.5", 0x02),
    ("1.8.6", 0x02),
    ("1.8.7", 0x02),
    ("1.8.8", 0x02),
    ("1.8.9", 0x02),
    // 1.9 - 1.12.2
    ("1.9", 0x0F),
    ("1.9.1", 0x0F),
    ("1.9.2", 0x0F),
    ("1.9.4", 0x0F),
    ("1.10", 0x0F),
    ("1.10.1", 0x0F),
    ("1.10.2", 0x0F),
    ("1.11", 0x0F),
    ("1.11.1", 0x0F),
    ("1.11.2", 0x0F),
    ("1.12", 0x0F),
    ("1.12.1", 0x0F),
    ("1.12.2", 0x0F),
    // 1.13 - 1.14.4
    ("1.13", 0x0E),
    ("1.13.1", 0x0E),
    ("1.13.2", 0x0E),
    ("1.14", 0x0E),
    ("1.14.1", 0x0E),
    ("1.14.2", 0x0E),
    ("1.14.3", 0x0E),
    ("1.14.4", 0x0E),
    // 1.15 - 1.15.2
    ("1.15", 0x0F),
    ("1.15.1", 0x0F),
    ("1.15.2", 0x0F),
    // 1.16 - 1.16.5, a sender UUID follows the position byte
    ("1.16", 0x0E),
    ("1.16.1", 0x0E),
    ("1.16.2", 0x0E),
    ("1.16.3", 0x0E),
    ("1.16.4", 0x0E),
    ("1.16.5", 0x0E),
];

/// Resolves the Chat Message packet id for a game version.
///
/// The lookup is an exact string match.
///
/// # Errors
///
/// Returns `ParserError::UnsupportedVersion` if the version is not in
/// [`CHAT_PACKET_IDS`].
pub fn chat_packet_id(version: &str) -> Result<u8> {
    CHAT_PACKET_IDS
        .iter()
        .find(|(known, _)| *known == version)
        .map(|&(_, id)| id)
        .ok_or_else(|| ParserError::UnsupportedVersion {
            version: version.to_string(),
        })
}

/// Returns every supported version string, in table order.
pub fn supported_versions() -> impl Iterator<Item = &'static str> {
    CHAT_PACKET_IDS.iter().map(|&(version, _)| version)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_recorded_version_1_12_2() {
        assert_eq!(chat_packet_id("1.12.2").unwrap(), 0x0F);
    }

    #[test]
    fn test_protocol_families() {
        assert_eq!(chat_packet_id("1.8.9").unwrap(), 0x02);
        assert_eq!(chat_packet_id("1.9.4").unwrap(), 0x0F);
        assert_eq!(chat_packet_id("1.13.2").unwrap(), 0x0E);
        assert_eq!(chat_packet_id("1.15.2").unwrap(), 0x0F);
        assert_eq!(chat_packet_id("1.16.5").unwrap(), 0x0E);
    }

    #[test]
    fn test_unknown_version() {
        match chat_packet_id("9.9.9") {
            Err(ParserError::UnsupportedVersion { version }) => assert_eq!(version, "9.9.9"),
            other => panic!("Expected UnsupportedVersion, got {other:?}"),
        }
    }

    #[test]
    fn test_lookup_is_exact() {
        assert!(chat_packet_id("1.12.2 ").is_err());
        assert!(chat_packet_id("1.12.").is_err());
        assert!(chat_packet_id("").is_err());
    }

    #[test]
    fn test_lookup_is_stable() {
        for version in supported_versions() {
            assert_eq!(chat_packet_id(version).unwrap(), chat_packet_id(version).unwrap());
        }
    }

    #[test]
    fn test_table_has_no_duplicates() {
        let unique: HashSet<_> = supported_versions().collect();
        assert_eq!(unique.len(), CHAT_PACKET_IDS.len());
    }
}
