//! Builders for synthetic replay archives.

#![allow(dead_code)]

use std::io::Write;

use flate2::write::DeflateEncoder;
use flate2::Compression;

/// Compression method: stored.
pub const STORED: u16 = 0;

/// Compression method: DEFLATE.
pub const DEFLATED: u16 = 8;

/// Chat Message packet id for 1.12.2.
pub const CHAT_1_12: u8 = 0x0F;

/// An arbitrary non-chat packet id (1.12.2 Keep Alive).
pub const KEEP_ALIVE_1_12: u8 = 0x1F;

/// Appends a protocol VarInt.
pub fn push_varint(out: &mut Vec<u8>, mut value: u32) {
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

/// Builds a `.tmcpr` capture record by record.
#[derive(Default)]
pub struct Capture {
    bytes: Vec<u8>,
}

impl Capture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record with an arbitrary payload.
    pub fn raw(mut self, timestamp: u32, payload: &[u8]) -> Self {
        self.bytes.extend_from_slice(&timestamp.to_be_bytes());
        self.bytes
            .extend_from_slice(&(payload.len() as u32).to_be_bytes());
        self.bytes.extend_from_slice(payload);
        self
    }

    /// Appends a Chat Message packet.
    pub fn chat(self, timestamp: u32, id: u8, json: &str, position: u8) -> Self {
        let mut payload = vec![id];
        push_varint(&mut payload, json.len() as u32);
        payload.extend_from_slice(json.as_bytes());
        payload.push(position);
        self.raw(timestamp, &payload)
    }

    /// Appends a packet that is not a chat message.
    pub fn other(self, timestamp: u32, id: u8) -> Self {
        self.raw(timestamp, &[id, 0x00, 0x00, 0x00, 0x2A])
    }

    /// Appends bytes that do not form a complete record.
    pub fn garbage(mut self, bytes: &[u8]) -> Self {
        self.bytes.extend_from_slice(bytes);
        self
    }

    pub fn build(self) -> Vec<u8> {
        self.bytes
    }
}

/// Builds a ZIP archive from entries.
#[derive(Default)]
pub struct ArchiveBuilder {
    entries: Vec<(String, u16, Vec<u8>)>,
}

impl ArchiveBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entry(mut self, name: &str, method: u16, data: &[u8]) -> Self {
        self.entries.push((name.to_string(), method, data.to_vec()));
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut out = Vec::new();
        let mut central = Vec::new();

        for (name, method, content) in &self.entries {
            let stored = if *method == DEFLATED {
                let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
                encoder.write_all(content).unwrap();
                encoder.finish().unwrap()
            } else {
                content.clone()
            };

            let offset = out.len() as u32;
            out.extend_from_slice(b"PK\x03\x04");
            out.extend_from_slice(&20u16.to_le_bytes());
            out.extend_from_slice(&0u16.to_le_bytes());
            out.extend_from_slice(&method.to_le_bytes());
            out.extend_from_slice(&[0x00; 8]);
            out.extend_from_slice(&(stored.len() as u32).to_le_bytes());
            out.extend_from_slice(&(content.len() as u32).to_le_bytes());
            out.extend_from_slice(&(name.len() as u16).to_le_bytes());
            out.extend_from_slice(&0u16.to_le_bytes());
            out.extend_from_slice(name.as_bytes());
            out.extend_from_slice(&stored);

            central.extend_from_slice(b"PK\x01\x02");
            central.extend_from_slice(&[0x14, 0x00, 0x14, 0x00]);
            central.extend_from_slice(&0u16.to_le_bytes());
            central.extend_from_slice(&method.to_le_bytes());
            central.extend_from_slice(&[0x00; 8]);
            central.extend_from_slice(&(stored.len() as u32).to_le_bytes());
            central.extend_from_slice(&(content.len() as u32).to_le_bytes());
            central.extend_from_slice(&(name.len() as u16).to_le_bytes());
            central.extend_from_slice(&[0x00; 12]);
            central.extend_from_slice(&offset.to_le_bytes());
            central.extend_from_slice(name.as_bytes());
        }

        let directory_offset = out.len() as u32;
        let count = self.entries.len() as u16;
        out.extend_from_slice(&central);
        out.extend_from_slice(b"PK\x05\x06");
        out.extend_from_slice(&[0x00; 4]);
        out.extend_from_slice(&count.to_le_bytes());
        out.extend_from_slice(&count.to_le_bytes());
        out.extend_from_slice(&(central.len() as u32).to_le_bytes());
        out.extend_from_slice(&directory_offset.to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes());
        out
    }
}

/// Builds a complete replay with the given version, markers and capture.
pub fn replay(version: &str, markers: &str, capture: &[u8]) -> Vec<u8> {
    ArchiveBuilder::new()
        .entry(
            "metaData.json",
            STORED,
            format!(r#"{{"singleplayer":false,"mcversion":"{version}","protocol":340}}"#)
                .as_bytes(),
        )
        .entry("markers.json", DEFLATED, markers.as_bytes())
        .entry("recording.tmcpr", DEFLATED, capture)
        .build()
}
