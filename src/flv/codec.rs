// Fixed-width big-endian fields of the FLV container
//
// The tag timestamp is stored as 24 bits of big-endian lower timestamp
// followed by one "extended" byte holding bits 24-31:
//
//   offset+0  bits 16-23
//   offset+1  bits 8-15
//   offset+2  bits 0-7
//   offset+3  bits 24-31

use byteorder::{BigEndian, ByteOrder};

/// Largest value a 24-bit field can hold.
pub const MAX_U24: u32 = 0x00FF_FFFF;

/// Read a big-endian u32 from the first 4 bytes of `bytes`.
pub fn read_u32_be(bytes: &[u8]) -> u32 {
    BigEndian::read_u32(&bytes[..4])
}

/// Read a big-endian u24 from the first 3 bytes of `bytes`.
pub fn read_u24_be(bytes: &[u8]) -> u32 {
    BigEndian::read_u24(&bytes[..3])
}

/// Write `value` as a big-endian u24 into the first 3 bytes of `bytes`.
///
/// `value` must fit in 24 bits.
pub fn write_u24_be(bytes: &mut [u8], value: u32) {
    debug_assert!(value <= MAX_U24, "value {} does not fit in 24 bits", value);
    BigEndian::write_u24(&mut bytes[..3], value);
}

/// Decode the tag timestamp stored at `buffer[offset..offset + 4]`.
pub fn read_tag_timestamp(buffer: &[u8], offset: usize) -> u32 {
    let lower = BigEndian::read_u24(&buffer[offset..offset + 3]);
    ((buffer[offset + 3] as u32) << 24) | lower
}

/// Encode `value` into `buffer[offset..offset + 4]` with the tag timestamp layout.
pub fn write_tag_timestamp(buffer: &mut [u8], offset: usize, value: u32) {
    BigEndian::write_u24(&mut buffer[offset..offset + 3], value & MAX_U24);
    buffer[offset + 3] = (value >> 24) as u8;
}
