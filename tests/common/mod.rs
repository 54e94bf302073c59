//! Synthetic FLV builders shared by the integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use flvjoin::flv::{write_tag_timestamp, write_u24_be, TAG_HEADER_SIZE};

pub const AUDIO: u8 = 8;
pub const VIDEO: u8 = 9;
pub const SCRIPT: u8 = 18;

/// One tag as it appears on disk: header, payload, previous-tag-size.
pub fn tag(kind: u8, payload: &[u8], timestamp: u32) -> Vec<u8> {
    let mut out = vec![0u8; TAG_HEADER_SIZE];
    out[0] = kind;
    write_u24_be(&mut out[1..4], payload.len() as u32);
    write_tag_timestamp(&mut out, 4, timestamp);
    out.extend_from_slice(payload);
    out.extend_from_slice(&((payload.len() + TAG_HEADER_SIZE) as u32).to_be_bytes());
    out
}

/// Header with the given flags byte, the zero footer, then `tags`.
pub fn flv(flags: u8, tags: &[Vec<u8>]) -> Vec<u8> {
    let mut data = vec![b'F', b'L', b'V', 1, flags, 0, 0, 0, 9, 0, 0, 0, 0];
    for t in tags {
        data.extend_from_slice(t);
    }
    data
}

/// Audio (format 2, all other codes 0) and video (codec 2) tags at the given timestamps.
pub fn av_file(timestamps: &[u32]) -> Vec<u8> {
    av_file_with(0x20, 0x12, timestamps)
}

/// Alternating audio/video tags using the given first payload bytes.
pub fn av_file_with(audio_byte: u8, video_byte: u8, timestamps: &[u32]) -> Vec<u8> {
    let tags: Vec<Vec<u8>> = timestamps
        .iter()
        .enumerate()
        .map(|(i, &ts)| {
            if i % 2 == 0 {
                tag(AUDIO, &[audio_byte, i as u8, 0xAA], ts)
            } else {
                tag(VIDEO, &[video_byte, i as u8, 0xBB, 0xCC], ts)
            }
        })
        .collect();
    flv(0x05, &tags)
}

pub fn write(dir: &Path, name: &str, data: &[u8]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, data).unwrap();
    path
}

/// Decoded (type, timestamp, payload) of every tag after the preamble.
pub fn read_tags(data: &[u8]) -> Vec<(u8, u32, Vec<u8>)> {
    let mut tags = Vec::new();
    let mut pos = 13;
    while pos + TAG_HEADER_SIZE <= data.len() {
        let header = flvjoin::flv::TagHeader::parse(&data[pos..]);
        let size = header.payload_size as usize;
        let payload = data[pos + TAG_HEADER_SIZE..pos + TAG_HEADER_SIZE + size].to_vec();
        tags.push((data[pos], header.timestamp, payload));
        pos += TAG_HEADER_SIZE + size + 4;
    }
    tags
}
