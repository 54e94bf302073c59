// Tag stream copier
//
// Copies one input's tags to the output, shifting every tag timestamp by the
// running offset carried over from the previous input. Header bytes other
// than the timestamp, payloads and footers are copied byte for byte.

use std::io::{Read, Seek, SeekFrom, Write};

use serde::Serialize;
use tracing::{trace, warn};

use crate::error::{MergeError, Result};
use crate::flv::codec::write_tag_timestamp;
use crate::flv::header::{FLV_PREAMBLE_SIZE, PREVIOUS_TAG_SIZE_LEN};
use crate::flv::tag::{TagHeader, TAG_HEADER_SIZE, TIMESTAMP_OFFSET};
use crate::utils::io::{read_full, skip};

/// Upper bound for one payload plus its footer (24-bit size + 4, rounded up).
pub const MAX_DATA_SIZE: usize = 16_777_220;

/// Reusable payload buffer that never grows past [`MAX_DATA_SIZE`].
#[derive(Debug, Default)]
pub struct ScratchBuffer {
    buf: Vec<u8>,
}

impl ScratchBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Borrow `len` bytes, growing the buffer fallibly if needed.
    pub fn get(&mut self, len: usize) -> Result<&mut [u8]> {
        if len > MAX_DATA_SIZE {
            return Err(MergeError::AllocationFailed(len));
        }
        if self.buf.len() < len {
            let additional = len - self.buf.len();
            self.buf
                .try_reserve_exact(additional)
                .map_err(|_| MergeError::AllocationFailed(len))?;
            self.buf.resize(len, 0);
        }
        Ok(&mut self.buf[..len])
    }

    /// Bytes currently reserved; never shrinks between tags.
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }
}

/// What one call to [`copy_tags`] did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CopyStats {
    /// Number of tags written.
    pub tags: u64,
    /// Bytes appended to the destination, header included for the first input.
    pub bytes_written: u64,
    /// Rewritten timestamp of the first tag, if any.
    pub first_timestamp: Option<u32>,
    /// Rewritten timestamp of the last tag, 0 when the input had no tags.
    /// This is the running timestamp handed to the next input.
    pub last_timestamp: u32,
}

/// Append the tags of `source` to `dest`, offsetting timestamps by `running_timestamp`.
///
/// When `is_first` is set, `dest` is rewound and the 13-byte preamble of
/// `source` is written verbatim; otherwise the preamble is skipped.
/// A truncated trailing tag header ends the input; a truncated payload fails
/// with [`MergeError::CopyFailed`].
pub fn copy_tags<R, W>(
    source: &mut R,
    dest: &mut W,
    is_first: bool,
    running_timestamp: u32,
    scratch: &mut ScratchBuffer,
) -> Result<CopyStats>
where
    R: Read + Seek,
    W: Write + Seek,
{
    let mut stats = CopyStats::default();

    source.seek(SeekFrom::Start(0)).map_err(MergeError::SeekFailed)?;

    if is_first {
        let mut preamble = [0u8; FLV_PREAMBLE_SIZE];
        let read = read_full(source, &mut preamble).map_err(|e| MergeError::copy("preamble", e))?;
        if read != FLV_PREAMBLE_SIZE {
            return Err(MergeError::CopyFailed(format!(
                "preamble is {} bytes, expected {}",
                read, FLV_PREAMBLE_SIZE
            )));
        }
        dest.seek(SeekFrom::Start(0)).map_err(MergeError::SeekFailed)?;
        dest.write_all(&preamble)
            .map_err(|e| MergeError::copy("writing preamble", e))?;
        stats.bytes_written += FLV_PREAMBLE_SIZE as u64;
    } else {
        skip(source, FLV_PREAMBLE_SIZE as i64).map_err(MergeError::SeekFailed)?;
    }

    let mut header_buf = [0u8; TAG_HEADER_SIZE];
    loop {
        let read = read_full(source, &mut header_buf).map_err(|e| MergeError::copy("tag header", e))?;
        if read != TAG_HEADER_SIZE {
            if read > 0 {
                trace!(bytes = read, "ignoring truncated trailing tag header");
            }
            break;
        }

        let header = TagHeader::parse(&header_buf);
        let (new_timestamp, wrapped) = header.timestamp.overflowing_add(running_timestamp);
        if wrapped {
            warn!(
                timestamp = header.timestamp,
                offset = running_timestamp,
                "tag timestamp wrapped past u32::MAX"
            );
        }
        write_tag_timestamp(&mut header_buf, TIMESTAMP_OFFSET, new_timestamp);

        dest.write_all(&header_buf)
            .map_err(|e| MergeError::copy("writing tag header", e))?;

        let body_len = header.payload_size as usize + PREVIOUS_TAG_SIZE_LEN;
        let body = scratch.get(body_len)?;
        let read = read_full(source, body).map_err(|e| MergeError::copy("tag payload", e))?;
        if read != body_len {
            return Err(MergeError::CopyFailed(format!(
                "tag {} payload truncated: {} of {} bytes",
                stats.tags + 1,
                read,
                body_len
            )));
        }
        dest.write_all(body)
            .map_err(|e| MergeError::copy("writing tag payload", e))?;

        trace!(kind = ?header.tag_type, size = header.payload_size, from = header.timestamp, to = new_timestamp, "copied tag");

        stats.tags += 1;
        stats.bytes_written += (TAG_HEADER_SIZE + body_len) as u64;
        stats.first_timestamp.get_or_insert(new_timestamp);
        stats.last_timestamp = new_timestamp;
    }

    Ok(stats)
}
