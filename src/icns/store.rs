//! Backing Store
//!
//! Transient file holding payload bytes. Append-only while a builder owns
//! it, read-only (many independent cursors) once a container owns it.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

use tempfile::TempPath;

use crate::config::{Config, DiagnosticSink};
use crate::error::Result;
use crate::stream::{BoundedReader, Close, SeekableReader};

use super::entry::{ContentFactory, EntryReader};

/// Write side of a backing store as seen by the builder
pub(crate) trait StoreSink: Write + Close + Send {}

impl<T: Write + Close + Send> StoreSink for T {}

// =============================================================================
// BackingStore
// =============================================================================

/// Ownership handle for the store file.
///
/// `delete` is the primary removal path. If the handle is dropped without
/// it, `TempPath` still removes the file as a last resort.
pub(crate) struct BackingStore {
    path: TempPath,
    /// Path shared with entry content factories
    shared: Arc<Path>,
}

impl BackingStore {
    /// Create a new, empty store file and its writer
    pub(crate) fn create(config: &Config) -> Result<(Self, StoreWriter)> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(&config.file_prefix);

        let file = match &config.temp_dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };
        let (file, path) = file.into_parts();
        let shared: Arc<Path> = Arc::from(&*path);

        tracing::debug!(path = %shared.display(), "created backing store");

        Ok((
            Self { path, shared },
            StoreWriter::new(file, config.sync_on_build),
        ))
    }

    pub(crate) fn path(&self) -> &Path {
        &self.shared
    }

    /// Factory opening a fresh cursor over `[start, start + size)`
    pub(crate) fn reader_factory(&self, start: u64, size: u64) -> ContentFactory {
        let path = Arc::clone(&self.shared);
        Arc::new(move || -> io::Result<EntryReader> {
            let file = File::open(&*path)?;
            Ok(BoundedReader::new(SeekableReader::at(file, start)?, size))
        })
    }

    /// Delete the store file.
    ///
    /// On failure the handle is handed back untouched, so the caller can keep
    /// ownership and retry. Dropping it still attempts removal.
    pub(crate) fn delete(self) -> std::result::Result<(), (Self, io::Error)> {
        if let Err(e) = fs::remove_file(&*self.shared) {
            return Err((self, e));
        }

        // Already removed; stop `TempPath` from trying again on drop
        let _ = self.path.keep();
        tracing::debug!(path = %self.shared.display(), "deleted backing store");
        Ok(())
    }

    /// Delete the store file, reporting failure to `sink` instead of the caller
    pub(crate) fn discard(self, sink: &dyn DiagnosticSink) {
        if let Err((store, e)) = self.delete() {
            sink.cleanup_failed(store.path(), &e);
        }
    }
}

// =============================================================================
// StoreWriter
// =============================================================================

/// Buffered append-only writer over the store file.
///
/// `close` flushes, optionally fsyncs, and releases the handle. Writes after
/// that fail.
pub(crate) struct StoreWriter {
    inner: Option<BufWriter<File>>,
    sync: bool,
}

impl StoreWriter {
    fn new(file: File, sync: bool) -> Self {
        Self {
            inner: Some(BufWriter::new(file)),
            sync,
        }
    }

    fn writer(&mut self) -> io::Result<&mut BufWriter<File>> {
        self.inner
            .as_mut()
            .ok_or_else(|| io::Error::other("backing store writer is closed"))
    }
}

impl Write for StoreWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writer()?.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer()?.flush()
    }
}

impl Close for StoreWriter {
    fn close(&mut self) -> io::Result<()> {
        if let Some(writer) = self.inner.take() {
            let file = writer.into_inner().map_err(|e| e.into_error())?;
            if self.sync {
                file.sync_all()?;
            }
        }
        Ok(())
    }
}
