//! ICNS codec
//!
//! Writes a container as an `.icns` byte stream and loads one back into a
//! new container, streaming payloads through the backing store.

use std::cell::Cell;
use std::io::{ErrorKind, Read, Write};

use bytes::{Buf, BufMut, BytesMut};

use crate::config::Config;
use crate::error::{IcnsError, Result};
use crate::stream::{
    copy, BoundedReader, Close, CloseProtectedWriter, CountingReader, CountingWriter,
};

use super::{IcnsBuilder, IcnsIcons, OsType, HEADER_SIZE, ICNS_MAGIC};

// =============================================================================
// Encoding
// =============================================================================

impl IcnsIcons {
    /// Length of the encoded `.icns` file, headers included.
    ///
    /// Fails with `Format` if it does not fit the 32-bit length field.
    pub fn encoded_len(&self) -> Result<u32> {
        let total = self.iter().try_fold(HEADER_SIZE as u64, |total, entry| {
            total.checked_add(HEADER_SIZE as u64 + entry.size())
        });

        total
            .and_then(|total| u32::try_from(total).ok())
            .ok_or_else(|| {
                IcnsError::Format("container too large for ICNS length field".to_string())
            })
    }

    /// Write the container as an `.icns` file into `sink`.
    ///
    /// Returns bytes written. `sink` is flushed but left open.
    pub fn write_to<W: Write + ?Sized>(&self, sink: &mut W) -> Result<u64> {
        let total = self.encoded_len()?;
        let written = Cell::new(0u64);
        let mut out = CountingWriter::new(CloseProtectedWriter::new(sink), &written);

        out.write_all(&encode_header(ICNS_MAGIC, total))?;

        for entry in self {
            // Fits: encoded_len() already bounded the sum
            let len = HEADER_SIZE + entry.size() as u32;
            out.write_all(&encode_header(entry.os_type().as_bytes(), len))?;

            let mut reader = entry.open()?;
            let copied = copy(&mut reader, &mut out)?;
            if copied != entry.size() {
                return Err(IcnsError::Format(format!(
                    "entry '{}' yielded {} of {} bytes",
                    entry.os_type(),
                    copied,
                    entry.size()
                )));
            }
        }

        out.close()?;
        Ok(out.count())
    }
}

fn encode_header(tag: &[u8; 4], len: u32) -> BytesMut {
    let mut header = BytesMut::with_capacity(HEADER_SIZE as usize);
    header.put_slice(tag);
    header.put_u32(len);
    header
}

// =============================================================================
// Decoding
// =============================================================================

impl IcnsIcons {
    /// Load an `.icns` stream using the default config
    pub fn load<R: Read>(input: R) -> Result<Self> {
        Self::load_with_config(input, Config::default())
    }

    /// Load an `.icns` stream into a new container.
    ///
    /// Reads no further than the length declared in the file header. On any
    /// failure the partially filled backing store is deleted.
    pub fn load_with_config<R: Read>(input: R, config: Config) -> Result<Self> {
        let offset = Cell::new(0u64);
        let mut source = CountingReader::new(input, &offset);

        let (magic, declared) = read_header(&mut source, 0)?;
        if &magic != ICNS_MAGIC {
            return Err(IcnsError::Format(format!(
                "invalid ICNS magic: expected 'icns', got '{}'",
                OsType::new(magic)
            )));
        }
        if declared < HEADER_SIZE {
            return Err(IcnsError::Format(format!("invalid ICNS length: {}", declared)));
        }

        let builder = IcnsBuilder::with_config(config)?;
        let body = BoundedReader::new(&mut source, (declared - HEADER_SIZE) as u64);

        match read_entries(&builder, body, &offset) {
            Ok(()) => builder.build(),
            Err(e) => {
                builder.abandon();
                Err(e)
            }
        }
    }
}

fn read_entries<R: Read>(
    builder: &IcnsBuilder,
    mut body: BoundedReader<R>,
    offset: &Cell<u64>,
) -> Result<()> {
    while body.remaining() > 0 {
        let at = offset.get();
        let (tag, len) = read_header(&mut body, at)?;
        let os_type = OsType::new(tag);

        if len < HEADER_SIZE {
            return Err(IcnsError::Format(format!(
                "invalid length {} for entry '{}' at offset {}",
                len, os_type, at
            )));
        }

        let expected = (len - HEADER_SIZE) as u64;
        let mut payload = BoundedReader::new(&mut body, expected);
        builder.add_type(os_type, &mut payload)?;

        if payload.remaining() > 0 {
            return Err(IcnsError::Format(format!(
                "truncated entry '{}' at offset {}: got {} of {} bytes",
                os_type,
                at,
                expected - payload.remaining(),
                expected
            )));
        }
    }

    Ok(())
}

fn read_header<R: Read>(reader: &mut R, at: u64) -> Result<([u8; 4], u32)> {
    let mut raw = [0u8; HEADER_SIZE as usize];
    reader.read_exact(&mut raw).map_err(|e| match e.kind() {
        ErrorKind::UnexpectedEof => IcnsError::Format(format!("truncated header at offset {}", at)),
        _ => IcnsError::Io(e),
    })?;

    let mut buf = &raw[..];
    let mut tag = [0u8; 4];
    buf.copy_to_slice(&mut tag);

    Ok((tag, buf.get_u32()))
}
