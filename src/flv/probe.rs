// Codec configuration probe
//
// Walks tag headers only far enough to see the first audio and the first
// video tag. For each tag the 11-byte header plus the first payload byte is
// read, then the rest of the payload and the footer are skipped.

use std::fmt;
use std::io::{Read, Seek};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::header::PREVIOUS_TAG_SIZE_LEN;
use super::tag::{TagHeader, TagType, TAG_HEADER_SIZE};
use crate::error::{MergeError, Result};
use crate::utils::io::{read_full, skip};

/// Audio parameters from the first byte of an audio tag payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Sound format, bits 7-4.
    pub format: u8,
    /// Sample rate code, bits 3-2.
    pub rate: u8,
    /// Sample size code, bit 1.
    pub size: u8,
    /// Channel type, bit 0.
    pub channel: u8,
}

impl AudioConfig {
    pub fn from_byte(byte: u8) -> Self {
        AudioConfig {
            format: (byte & 0xF0) >> 4,
            rate: (byte & 0x0C) >> 2,
            size: (byte & 0x02) >> 1,
            channel: byte & 0x01,
        }
    }

    /// Pack back into an audio tag's first payload byte.
    pub fn to_byte(self) -> u8 {
        (self.format << 4) | (self.rate << 2) | (self.size << 1) | self.channel
    }
}

/// Everything two inputs must agree on to be merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodecConfig {
    pub audio: AudioConfig,
    /// Video codec id, low nibble of the first video payload byte.
    pub video_codec: u8,
}

impl CodecConfig {
    /// True when all five codes match.
    pub fn is_compatible_with(&self, other: &CodecConfig) -> bool {
        self == other
    }

    /// Describe the first differing code, or `None` when compatible.
    pub fn mismatch(&self, other: &CodecConfig) -> Option<String> {
        let a = &self.audio;
        let b = &other.audio;
        let fields = [
            ("sound format", a.format, b.format),
            ("sound rate", a.rate, b.rate),
            ("sound size", a.size, b.size),
            ("sound type", a.channel, b.channel),
            ("video codec", self.video_codec, other.video_codec),
        ];
        fields
            .iter()
            .find(|(_, left, right)| left != right)
            .map(|(name, left, right)| format!("{} {} != {}", name, left, right))
    }
}

impl fmt::Display for CodecConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "audio(format={}, rate={}, size={}, channel={}) video(codec={})",
            self.audio.format, self.audio.rate, self.audio.size, self.audio.channel, self.video_codec
        )
    }
}

/// True iff both configurations share all five codec codes.
pub fn compatible(left: &CodecConfig, right: &CodecConfig) -> bool {
    left.is_compatible_with(right)
}

/// Scan tags from offset 9 until both audio and video parameters are known.
///
/// The stream must have just passed [`validate_container`](super::header::validate_container).
/// At most `max_tags` tag headers are read; running out of tags or hitting
/// the bound fails with [`MergeError::ProbeIncomplete`].
pub fn probe_stream<R: Read + Seek>(reader: &mut R, max_tags: usize) -> Result<CodecConfig> {
    let mut audio: Option<AudioConfig> = None;
    let mut video_codec: Option<u8> = None;
    let mut window = [0u8; TAG_HEADER_SIZE + 1];
    let mut tags_scanned = 0;
    let mut skip_size = PREVIOUS_TAG_SIZE_LEN as i64;

    loop {
        if let (Some(audio), Some(video_codec)) = (audio, video_codec) {
            return Ok(CodecConfig { audio, video_codec });
        }

        if tags_scanned >= max_tags {
            return Err(MergeError::ProbeIncomplete { tags_scanned });
        }

        skip(reader, skip_size).map_err(MergeError::SeekFailed)?;

        let read = match read_full(reader, &mut window) {
            Ok(read) => read,
            Err(err) => {
                debug!(error = %err, tags_scanned, "read failed while scanning tags");
                0
            }
        };
        if read != window.len() {
            return Err(MergeError::ProbeIncomplete { tags_scanned });
        }
        tags_scanned += 1;

        let header = TagHeader::parse(&window);
        let first_payload_byte = window[TAG_HEADER_SIZE];
        trace!(tag = tags_scanned, kind = ?header.tag_type, size = header.payload_size, "probe tag");

        match header.tag_type {
            TagType::Audio if audio.is_none() => {
                audio = Some(AudioConfig::from_byte(first_payload_byte));
            }
            TagType::Video if video_codec.is_none() => {
                video_codec = Some(first_payload_byte & 0x0F);
            }
            _ => {}
        }

        // rest of the payload after the byte already consumed, plus the footer
        skip_size = header.payload_size as i64 - 1 + PREVIOUS_TAG_SIZE_LEN as i64;
    }
}
