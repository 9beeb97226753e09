//! ICNS Entry
//!
//! One stored payload: its tag, its exact size, and a factory that opens a
//! fresh cursor over its bytes in the backing store.

use std::fmt;
use std::fs::File;
use std::io::{self, Read, Write};
use std::sync::Arc;

use crate::error::Result;
use crate::stream::{copy, BoundedReader, Close, CloseProtectedWriter, SeekableReader};

use super::OsType;

/// Cursor over one entry's payload; yields exactly `size` bytes
pub type EntryReader = BoundedReader<SeekableReader<File>>;

/// Opens a new, independent `EntryReader` on every call
pub type ContentFactory = Arc<dyn Fn() -> io::Result<EntryReader> + Send + Sync>;

/// A single payload stored in a container
#[derive(Clone)]
pub struct IcnsEntry {
    os_type: OsType,
    size: u64,
    content: ContentFactory,
}

impl IcnsEntry {
    pub(crate) fn new(os_type: OsType, size: u64, content: ContentFactory) -> Self {
        Self {
            os_type,
            size,
            content,
        }
    }

    pub fn os_type(&self) -> OsType {
        self.os_type
    }

    /// Payload length in bytes
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Open a new reader positioned at byte 0 of the payload.
    ///
    /// Each call has its own cursor. Fails with an I/O error once the owning
    /// container has been closed.
    pub fn open(&self) -> Result<EntryReader> {
        Ok((self.content)()?)
    }

    /// Read the whole payload into memory
    pub fn read_to_vec(&self) -> Result<Vec<u8>> {
        let mut data = Vec::with_capacity(usize::try_from(self.size).unwrap_or(0));
        self.open()?.read_to_end(&mut data)?;
        Ok(data)
    }

    /// Stream the payload into `sink` and flush it, returning bytes written.
    ///
    /// `sink` is left open.
    pub fn write_to<W: Write + ?Sized>(&self, sink: &mut W) -> Result<u64> {
        let mut reader = self.open()?;
        let mut view = CloseProtectedWriter::new(sink);
        let written = copy(&mut reader, &mut view)?;
        view.close()?;
        Ok(written)
    }
}

impl fmt::Debug for IcnsEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IcnsEntry")
            .field("os_type", &self.os_type)
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}
