//! Chat scanning over a packet stream.
//!
//! The scanner walks packets in stream order up to the marker boundary and
//! keeps the last plain chat line it decodes. Only one line is ever held;
//! each later match replaces the previous one.
//!
//! # Chat Message packet body
//!
//! | Field | Type | Notes |
//! |-------|------|-------|
//! | JSON data | VarInt-prefixed string | Chat component |
//! | Position | u8 | 0 = chat, 1 = system, 2 = action bar |
//!
//! Later protocol revisions append fields after the position byte; they
//! are left unread.
//!
//! # Example
//!
//! ```
//! use mcpr_chat::packet::Packet;
//! use mcpr_chat::scan::scan_text;
//!
//! let chat = |t, text: &str| {
//!     let mut payload = vec![0x0F, text.len() as u8];
//!     payload.extend_from_slice(text.as_bytes());
//!     payload.push(0);
//!     Packet::new(t, payload)
//! };
//!
//! let packets = vec![chat(10, "\"A\""), chat(20, "\"B\"")];
//! assert_eq!(scan_text(packets.clone(), 0x0F, 20).unwrap(), "\"B\"");
//! assert_eq!(scan_text(packets, 0x0F, 15).unwrap(), "\"A\"");
//! ```

use tracing::{debug, trace};

use crate::error::{ParserError, Result};
use crate::packet::Packet;

/// Position byte of a regular chat line.
pub const POSITION_CHAT: u8 = 0;

/// Position byte of a system message.
pub const POSITION_SYSTEM: u8 = 1;

/// Position byte of an action bar message.
pub const POSITION_GAME_INFO: u8 = 2;

/// A decoded Chat Message packet body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatEvent {
    /// Raw JSON chat component.
    pub json: String,

    /// Display position discriminator.
    pub position: u8,
}

impl ChatEvent {
    /// Decodes the packet body following the packet id.
    ///
    /// # Errors
    ///
    /// Returns `ParserError::InvalidPacket` if either field is truncated
    /// or malformed.
    pub fn decode(packet: &mut Packet) -> Result<Self> {
        let timestamp_ms = packet.timestamp_ms;
        let invalid = |field: &str, e: ParserError| ParserError::InvalidPacket {
            timestamp_ms,
            reason: format!("chat {field}: {e}"),
        };

        let json = packet.read_string().map_err(|e| invalid("JSON data", e))?;
        let position = packet.read_byte().map_err(|e| invalid("position", e))?;

        Ok(ChatEvent { json, position })
    }

    /// Returns whether this event is a regular chat line.
    #[must_use]
    pub fn is_chat_line(&self) -> bool {
        self.position == POSITION_CHAT
    }
}

/// The chat line retained by a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatLine {
    /// Timestamp of the packet that carried the line.
    pub timestamp_ms: u32,

    /// Raw JSON chat component.
    pub json: String,
}

/// Finds the last chat line at or before `boundary`.
///
/// Packets are consumed in order. The first packet with a timestamp
/// greater than `boundary` stops the scan without being inspected; a packet
/// exactly at the boundary is still considered. Packets whose id differs
/// from `chat_packet_id` are skipped undecoded.
///
/// Returns `None` if no chat line qualifies. The caller is responsible for
/// checking the packet source's terminal status afterwards.
///
/// # Errors
///
/// Returns `ParserError::InvalidPacket` if a packet inside the boundary
/// has no id byte, or carries the chat id with a malformed body.
pub fn scan<I>(packets: I, chat_packet_id: u8, boundary: i64) -> Result<Option<ChatLine>>
where
    I: IntoIterator<Item = Packet>,
{
    let mut last = None;
    let mut inspected = 0usize;

    for mut packet in packets {
        if i64::from(packet.timestamp_ms) > boundary {
            debug!(
                timestamp_ms = packet.timestamp_ms,
                boundary, "reached marker boundary"
            );
            break;
        }
        inspected += 1;

        let packet_id = packet.read_byte().map_err(|e| ParserError::InvalidPacket {
            timestamp_ms: packet.timestamp_ms,
            reason: format!("packet id: {e}"),
        })?;
        if packet_id != chat_packet_id {
            continue;
        }

        let event = ChatEvent::decode(&mut packet)?;
        trace!(
            timestamp_ms = packet.timestamp_ms,
            position = event.position,
            "chat packet"
        );

        if event.is_chat_line() {
            last = Some(ChatLine {
                timestamp_ms: packet.timestamp_ms,
                json: event.json,
            });
        }
    }

    debug!(inspected, found = last.is_some(), "chat scan complete");
    Ok(last)
}

/// Like [`scan`], returning the raw JSON text or an empty string.
///
/// # Errors
///
/// Returns the errors of [`scan`].
pub fn scan_text<I>(packets: I, chat_packet_id: u8, boundary: i64) -> Result<String>
where
    I: IntoIterator<Item = Packet>,
{
    Ok(scan(packets, chat_packet_id, boundary)?
        .map(|line| line.json)
        .unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const CHAT: u8 = 0x0F;
    const OTHER: u8 = 0x23;

    fn varint(mut value: u32, out: &mut Vec<u8>) {
        loop {
            let byte = (value & 0x7F) as u8;
            value >>= 7;
            if value == 0 {
                out.push(byte);
                return;
            }
            out.push(byte | 0x80);
        }
    }

    /// Creates a packet with the given id, chat JSON and position byte.
    fn chat_packet(timestamp: u32, id: u8, json: &str, position: u8) -> Packet {
        let mut payload = vec![id];
        varint(json.len() as u32, &mut payload);
        payload.extend_from_slice(json.as_bytes());
        payload.push(position);
        Packet::new(timestamp, payload)
    }

    // ========================
    // Scenarios
    // ========================

    #[test]
    fn test_last_line_at_boundary_wins() {
        let packets = vec![
            chat_packet(10, CHAT, "A", POSITION_CHAT),
            chat_packet(20, CHAT, "B", POSITION_CHAT),
        ];
        assert_eq!(scan_text(packets, CHAT, 20).unwrap(), "B");
    }

    #[test]
    fn test_boundary_excludes_later_lines() {
        let packets = vec![
            chat_packet(10, CHAT, "A", POSITION_CHAT),
            chat_packet(20, CHAT, "B", POSITION_CHAT),
        ];
        assert_eq!(scan_text(packets, CHAT, 15).unwrap(), "A");
    }

    #[test]
    fn test_system_message_ignored() {
        let packets = vec![chat_packet(5, CHAT, "system", POSITION_SYSTEM)];
        assert_eq!(scan_text(packets, CHAT, 100).unwrap(), "");
    }

    #[test]
    fn test_other_packet_type_ignored() {
        let packets = vec![chat_packet(5, OTHER, "not chat", POSITION_CHAT)];
        assert_eq!(scan_text(packets, CHAT, 100).unwrap(), "");
    }

    #[test]
    fn test_boundary_before_first_packet() {
        let packets = vec![chat_packet(10, CHAT, "A", POSITION_CHAT)];
        assert_eq!(scan(packets, CHAT, 9).unwrap(), None);
    }

    #[test]
    fn test_negative_boundary() {
        let packets = vec![chat_packet(0, CHAT, "A", POSITION_CHAT)];
        assert_eq!(scan(packets, CHAT, -1).unwrap(), None);
    }

    #[test]
    fn test_empty_stream() {
        assert_eq!(scan(Vec::new(), CHAT, 1_000).unwrap(), None);
    }

    #[test]
    fn test_action_bar_does_not_replace_chat() {
        let packets = vec![
            chat_packet(10, CHAT, "hello", POSITION_CHAT),
            chat_packet(12, CHAT, "12 hearts", POSITION_GAME_INFO),
            chat_packet(14, OTHER, "noise", POSITION_CHAT),
        ];

        let line = scan(packets, CHAT, 100).unwrap().unwrap();
        assert_eq!(line.json, "hello");
        assert_eq!(line.timestamp_ms, 10);
    }

    #[test]
    fn test_trailing_fields_are_ignored() {
        let mut packet = chat_packet(10, CHAT, "with sender", POSITION_CHAT);
        let mut payload = packet.payload().to_vec();
        payload.extend_from_slice(&[0xAB; 16]); // Sender UUID
        packet = Packet::new(packet.timestamp_ms, payload);

        assert_eq!(scan_text(vec![packet], CHAT, 10).unwrap(), "with sender");
    }

    // ========================
    // Errors
    // ========================

    #[test]
    fn test_truncated_chat_body_is_fatal() {
        let packets = vec![
            chat_packet(10, CHAT, "A", POSITION_CHAT),
            Packet::new(11, vec![CHAT, 0x10, b'{']),
        ];

        match scan(packets, CHAT, 100) {
            Err(ParserError::InvalidPacket { timestamp_ms, .. }) => assert_eq!(timestamp_ms, 11),
            other => panic!("Expected InvalidPacket, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_position_is_fatal() {
        let packets = vec![Packet::new(3, vec![CHAT, 0x01, b'x'])];
        assert!(matches!(
            scan(packets, CHAT, 100),
            Err(ParserError::InvalidPacket { .. })
        ));
    }

    #[test]
    fn test_empty_payload_is_fatal() {
        let packets = vec![Packet::new(3, Vec::new())];
        assert!(matches!(
            scan(packets, CHAT, 100),
            Err(ParserError::InvalidPacket { .. })
        ));
    }

    #[test]
    fn test_malformed_other_packet_is_skipped() {
        let packets = vec![
            chat_packet(1, CHAT, "kept", POSITION_CHAT),
            Packet::new(2, vec![OTHER, 0xFF, 0xFF]),
        ];
        assert_eq!(scan_text(packets, CHAT, 100).unwrap(), "kept");
    }

    #[test]
    fn test_packets_past_boundary_are_never_decoded() {
        let packets = vec![
            chat_packet(1, CHAT, "kept", POSITION_CHAT),
            Packet::new(50, vec![CHAT, 0x7F]),
            Packet::new(51, Vec::new()),
        ];
        assert_eq!(scan_text(packets, CHAT, 49).unwrap(), "kept");
    }

    #[test]
    fn test_scan_stops_pulling_at_boundary() {
        let packets = vec![
            chat_packet(1, CHAT, "a", POSITION_CHAT),
            chat_packet(5, CHAT, "b", POSITION_CHAT),
            chat_packet(9, CHAT, "c", POSITION_CHAT),
        ];
        let mut iter = packets.into_iter();

        scan(iter.by_ref(), CHAT, 2).unwrap();
        // The packet at 5ms was pulled and rejected; only 9ms is left.
        assert_eq!(iter.next().map(|p| p.timestamp_ms), Some(9));
    }

    // ========================
    // Properties
    // ========================

    fn arb_packets() -> impl Strategy<Value = Vec<(u32, bool, u8)>> {
        prop::collection::vec((0u32..1_000, any::<bool>(), 0u8..3), 0..40).prop_map(|mut v| {
            v.sort_by_key(|&(t, _, _)| t);
            v
        })
    }

    fn build(records: &[(u32, bool, u8)]) -> Vec<Packet> {
        records
            .iter()
            .enumerate()
            .map(|(i, &(t, is_chat, position))| {
                let id = if is_chat { CHAT } else { OTHER };
                chat_packet(t, id, &format!("line {i}"), position)
            })
            .collect()
    }

    proptest! {
        #[test]
        fn prop_scan_matches_last_eligible(records in arb_packets(), boundary in -10i64..1_100) {
            let expected = records
                .iter()
                .enumerate()
                .filter(|(_, record)| {
                    let (t, is_chat, position) = **record;
                    i64::from(t) <= boundary && is_chat && position == POSITION_CHAT
                })
                .last()
                .map(|(i, _)| format!("line {i}"))
                .unwrap_or_default();

            prop_assert_eq!(scan_text(build(&records), CHAT, boundary).unwrap(), expected);
        }

        #[test]
        fn prop_raising_boundary_never_loses_lines(
            records in arb_packets(),
            low in 0i64..1_000,
            raise in 0i64..1_000,
        ) {
            let high = low + raise;
            let early = scan(build(&records), CHAT, low).unwrap();
            let late = scan(build(&records), CHAT, high).unwrap();

            if let Some(early) = early {
                let late = late.expect("a line before the lower boundary survives a higher one");
                prop_assert!(late.timestamp_ms >= early.timestamp_ms);
                prop_assert!(i64::from(late.timestamp_ms) <= high);
            }
        }
    }
}
