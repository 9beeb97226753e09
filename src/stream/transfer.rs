//! Bulk transfer helpers
//!
//! Loops over the primitive read/skip/write calls until a requested amount
//! is reached or the source ends.

use std::io::{self, ErrorKind, Read, Write};

use super::{Close, InputStream};

/// Fixed intermediate buffer size for bulk transfers
pub const BUFFER_SIZE: usize = 8192;

/// Skip up to `count` bytes using the reader's native skip.
///
/// Stops as soon as a skip makes no progress, so the result may be short of
/// `count` at end-of-stream (or when the source cannot skip further).
pub fn skip<R: InputStream + ?Sized>(reader: &mut R, count: u64) -> io::Result<u64> {
    let mut remaining = count;

    while remaining > 0 {
        let skipped = reader.skip(remaining)?;
        if skipped == 0 {
            break;
        }
        remaining -= skipped.min(remaining);
    }

    Ok(count - remaining)
}

/// Discard up to `count` bytes by reading them.
///
/// Unlike `skip` this always makes forward progress on sources whose native
/// skip stalls. Scratch buffer is `min(count, BUFFER_SIZE)` bytes.
pub fn waste<R: Read + ?Sized>(reader: &mut R, count: u64) -> io::Result<u64> {
    let mut remaining = count;
    let mut buf = vec![0u8; count.min(BUFFER_SIZE as u64) as usize];

    while remaining > 0 {
        let len = remaining.min(buf.len() as u64) as usize;
        match reader.read(&mut buf[..len]) {
            Ok(0) => break,
            Ok(n) => remaining -= n as u64,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }

    Ok(count - remaining)
}

/// Read until end-of-stream, returning the number of bytes consumed
pub fn exhaust<R: Read + ?Sized>(reader: &mut R) -> io::Result<u64> {
    let mut total = 0u64;
    let mut buf = [0u8; BUFFER_SIZE];

    loop {
        match reader.read(&mut buf) {
            Ok(0) => return Ok(total),
            Ok(n) => total += n as u64,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
}

/// Copy all remaining bytes from `source` to `sink`.
///
/// Returns the number of bytes transferred.
pub fn copy<R, W>(source: &mut R, sink: &mut W) -> io::Result<u64>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    let mut total = 0u64;
    let mut buf = [0u8; BUFFER_SIZE];

    loop {
        let n = match source.read(&mut buf) {
            Ok(0) => return Ok(total),
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        sink.write_all(&buf[..n])?;
        total += n as u64;
    }
}

/// Close `closeable`, handing any failure to `on_error` instead of returning it
pub fn close_quietly<C, F>(closeable: &mut C, on_error: F)
where
    C: Close + ?Sized,
    F: FnOnce(io::Error),
{
    if let Err(e) = closeable.close() {
        on_error(e);
    }
}
