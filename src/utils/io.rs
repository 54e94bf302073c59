// I/O helpers shared by the validator, prober and copier

use std::io::{ErrorKind, Read, Seek};

/// Read until `buffer` is full or the reader hits end of stream.
///
/// Returns the number of bytes actually read, so callers can tell a clean
/// end of stream (0) from a truncated record (less than `buffer.len()`).
pub fn read_full<R: Read>(reader: &mut R, buffer: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buffer.len() {
        match reader.read(&mut buffer[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Move the stream position forward (or back) relative to where it is now.
///
/// Goes through `Seek::seek_relative`, so a `BufReader` keeps its buffer when
/// the target is already buffered.
pub fn skip<S: Seek>(stream: &mut S, offset: i64) -> std::io::Result<()> {
    stream.seek_relative(offset)
}
