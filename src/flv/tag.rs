//! FLV tag header.
//!
//! Every tag starts with an 11-byte header:
//! - byte 0: reserved bits + tag type (low 5 bits)
//! - bytes 1..4: payload size, big-endian u24
//! - bytes 4..8: timestamp, see [`read_tag_timestamp`]
//! - bytes 8..11: stream id (always 0)
//!
//! The payload follows, then a 4-byte previous-tag-size footer.

use super::codec::{read_tag_timestamp, read_u24_be};

/// FLV tag header size.
pub const TAG_HEADER_SIZE: usize = 11;

/// Offset of the timestamp inside the tag header.
pub const TIMESTAMP_OFFSET: usize = 4;

/// Audio tag type.
pub const TAG_TYPE_AUDIO: u8 = 8;

/// Video tag type.
pub const TAG_TYPE_VIDEO: u8 = 9;

/// Script data tag type.
pub const TAG_TYPE_SCRIPT_DATA: u8 = 18;

/// FLV tag type. Unknown types are carried through as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagType {
    Audio,
    Video,
    ScriptData,
    Other(u8),
}

impl TagType {
    /// Decode from the first header byte, ignoring the reserved high bits.
    pub fn from_byte(byte: u8) -> Self {
        match byte & 0x1F {
            TAG_TYPE_AUDIO => TagType::Audio,
            TAG_TYPE_VIDEO => TagType::Video,
            TAG_TYPE_SCRIPT_DATA => TagType::ScriptData,
            other => TagType::Other(other),
        }
    }
}

/// Decoded view of an 11-byte tag header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagHeader {
    pub tag_type: TagType,
    pub payload_size: u32,
    pub timestamp: u32,
}

impl TagHeader {
    /// Decode the first [`TAG_HEADER_SIZE`] bytes of `bytes`.
    pub fn parse(bytes: &[u8]) -> Self {
        TagHeader {
            tag_type: TagType::from_byte(bytes[0]),
            payload_size: read_u24_be(&bytes[1..4]),
            timestamp: read_tag_timestamp(bytes, TIMESTAMP_OFFSET),
        }
    }
}
