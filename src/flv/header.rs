// FLV file header validation
//
// Layout of the first 13 bytes:
//   0..3   "FLV"
//   3      version (1)
//   4      flags (audio 0x04, video 0x01)
//   5..9   header length, big-endian (9)
//   9..13  first previous-tag-size (0)

use std::io::Read;

use super::codec::read_u32_be;
use crate::error::{MergeError, Result};
use crate::utils::io::read_full;

/// FLV file signature.
pub const FLV_SIGNATURE: &[u8; 3] = b"FLV";

/// The only FLV version this crate accepts.
pub const FLV_VERSION: u8 = 0x01;

/// Size of the fixed FLV header.
pub const FLV_HEADER_SIZE: usize = 9;

/// Size of the previous-tag-size field that trails every tag.
pub const PREVIOUS_TAG_SIZE_LEN: usize = 4;

/// Bytes before the first tag: header plus the leading previous-tag-size.
pub const FLV_PREAMBLE_SIZE: usize = FLV_HEADER_SIZE + PREVIOUS_TAG_SIZE_LEN;

/// A validated FLV header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerHeader {
    /// The raw 9 header bytes as found in the file.
    pub raw: [u8; FLV_HEADER_SIZE],
}

impl ContainerHeader {
    /// Stream flags byte, passed through untouched when merging.
    pub fn flags(&self) -> u8 {
        self.raw[4]
    }

    pub fn has_audio(&self) -> bool {
        self.flags() & 0x04 != 0
    }

    pub fn has_video(&self) -> bool {
        self.flags() & 0x01 != 0
    }
}

/// Read and check the 9-byte FLV header.
///
/// On success the stream is left at offset 9. On failure the position is
/// unspecified and the stream should be dropped.
pub fn validate_container<R: Read>(reader: &mut R) -> Result<ContainerHeader> {
    let mut raw = [0u8; FLV_HEADER_SIZE];
    let read = read_full(reader, &mut raw)
        .map_err(|e| MergeError::InvalidContainer(format!("cannot read header: {}", e)))?;

    if read != FLV_HEADER_SIZE {
        return Err(MergeError::InvalidContainer(format!(
            "file holds {} bytes, header needs {}",
            read, FLV_HEADER_SIZE
        )));
    }

    if &raw[0..3] != FLV_SIGNATURE {
        return Err(MergeError::InvalidContainer(format!(
            "bad signature '{}'",
            String::from_utf8_lossy(&raw[0..3])
        )));
    }

    if raw[3] != FLV_VERSION {
        return Err(MergeError::InvalidContainer(format!("unsupported version {}", raw[3])));
    }

    let header_len = read_u32_be(&raw[5..9]);
    if header_len != FLV_HEADER_SIZE as u32 {
        return Err(MergeError::InvalidContainer(format!(
            "declared header length {} (expected {})",
            header_len, FLV_HEADER_SIZE
        )));
    }

    Ok(ContainerHeader { raw })
}
