// FLV container handling
//
// FLV File Structure:
// - Header (9 bytes): "FLV", version, flags, header length
// - PreviousTagSize0 (4 bytes, always 0)
// - Tag 1..N, each:
//   - Tag header (11 bytes): type, payload size, timestamp, stream id
//   - Payload (payload size bytes)
//   - PreviousTagSize (4 bytes)

pub mod codec;
pub mod header;
pub mod probe;
pub mod tag;

pub use codec::{read_tag_timestamp, read_u24_be, read_u32_be, write_tag_timestamp, write_u24_be};
pub use header::{validate_container, ContainerHeader, FLV_HEADER_SIZE, FLV_PREAMBLE_SIZE, FLV_SIGNATURE};
pub use probe::{compatible, probe_stream, AudioConfig, CodecConfig};
pub use tag::{TagHeader, TagType, TAG_HEADER_SIZE};
