//! ICNS Builder
//!
//! Streams payloads into a fresh backing store and finalizes them into an
//! `IcnsIcons` container.

use std::cell::Cell;
use std::fmt;
use std::io::{self, Read};
use std::mem;
use std::path::PathBuf;

use parking_lot::Mutex;

use crate::config::Config;
use crate::error::{IcnsError, Result};
use crate::stream::{copy, Close, CloseProtectedWriter, CountingWriter};

use super::store::{BackingStore, StoreSink};
use super::{IcnsEntry, IcnsIcons, OsType};

/// Accumulates entries into a backing store.
///
/// ## Concurrency:
/// - Every operation takes the same coarse lock, so concurrent callers are
///   serialized. Building is not a hot path.
///
/// ## Ownership:
/// - While open, the builder owns the backing store.
/// - `build()` hands it to the returned container.
/// - `close()` (or drop) without `build()` deletes it.
pub struct IcnsBuilder {
    config: Config,
    state: Mutex<BuilderState>,
}

enum BuilderState {
    Open(OpenBuilder),
    Closed,
}

struct OpenBuilder {
    store: BackingStore,
    writer: Box<dyn StoreSink>,
    /// Write cursor: next free offset in the store. Only touched under the
    /// builder lock, so a plain `Cell` counter is enough.
    position: Cell<u64>,
    entries: Vec<IcnsEntry>,
}

impl IcnsBuilder {
    /// Create a builder with a new backing store in the system temp directory
    pub fn new() -> Result<Self> {
        Self::with_config(Config::default())
    }

    /// Create a builder using `config` for store placement and diagnostics
    pub fn with_config(config: Config) -> Result<Self> {
        let (store, writer) = BackingStore::create(&config)?;
        Ok(Self::from_parts(config, store, Box::new(writer)))
    }

    pub(crate) fn from_parts(
        config: Config,
        store: BackingStore,
        writer: Box<dyn StoreSink>,
    ) -> Self {
        Self {
            config,
            state: Mutex::new(BuilderState::Open(OpenBuilder {
                store,
                writer,
                position: Cell::new(0),
                entries: Vec::new(),
            })),
        }
    }

    /// Append a payload tagged `os_type`, draining `input` into the store.
    ///
    /// Fails with `BuilderClosed` after `build()`/`close()`, and with
    /// `InvalidArgument` if `os_type` is empty or not 4 bytes. After an I/O
    /// failure the builder should be closed, not retried.
    pub fn add<R: Read>(&self, os_type: &str, input: R) -> Result<&Self> {
        let mut state = self.state.lock();
        let open = state.open_mut()?;
        open.append(OsType::parse(os_type)?, input)?;
        Ok(self)
    }

    /// Same as `add`, with an already parsed tag
    pub fn add_type<R: Read>(&self, os_type: OsType, input: R) -> Result<&Self> {
        let mut state = self.state.lock();
        state.open_mut()?.append(os_type, input)?;
        Ok(self)
    }

    /// Finalize the store and return the container.
    ///
    /// The builder is closed afterwards whatever the outcome. If finalizing
    /// the store fails, the store is deleted before the error is returned.
    pub fn build(&self) -> Result<IcnsIcons> {
        let open = match mem::replace(&mut *self.state.lock(), BuilderState::Closed) {
            BuilderState::Open(open) => open,
            BuilderState::Closed => return Err(IcnsError::BuilderClosed),
        };

        let OpenBuilder {
            store,
            mut writer,
            position,
            entries,
        } = open;

        let finished = writer.close();
        drop(writer);

        if let Err(e) = finished {
            tracing::debug!(path = %store.path().display(), error = %e, "finalize failed");
            store.discard(&*self.config.diagnostics);
            return Err(e.into());
        }

        tracing::debug!(
            path = %store.path().display(),
            entries = entries.len(),
            bytes = position.get(),
            "finalized backing store"
        );

        Ok(IcnsIcons::new(entries, store, self.config.diagnostics.clone()))
    }

    /// Discard the builder and delete its store. No-op if already closed.
    pub fn close(&self) -> Result<()> {
        match mem::replace(&mut *self.state.lock(), BuilderState::Closed) {
            BuilderState::Open(open) => Ok(open.discard(&self.config)?),
            BuilderState::Closed => Ok(()),
        }
    }

    /// Close, reporting any failure to the diagnostic sink
    pub(crate) fn abandon(&self) {
        let state = mem::replace(&mut *self.state.lock(), BuilderState::Closed);
        abandon_state(state, &self.config);
    }

    /// Number of entries added so far
    pub fn len(&self) -> usize {
        match &*self.state.lock() {
            BuilderState::Open(open) => open.entries.len(),
            BuilderState::Closed => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current write cursor (total payload bytes stored)
    pub fn position(&self) -> u64 {
        match &*self.state.lock() {
            BuilderState::Open(open) => open.position.get(),
            BuilderState::Closed => 0,
        }
    }

    pub fn is_closed(&self) -> bool {
        matches!(&*self.state.lock(), BuilderState::Closed)
    }

    /// Location of the backing store while the builder still owns it
    pub fn store_path(&self) -> Option<PathBuf> {
        match &*self.state.lock() {
            BuilderState::Open(open) => Some(open.store.path().to_path_buf()),
            BuilderState::Closed => None,
        }
    }
}

impl fmt::Debug for IcnsBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IcnsBuilder")
            .field("entries", &self.len())
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}

impl Drop for IcnsBuilder {
    fn drop(&mut self) {
        let state = mem::replace(self.state.get_mut(), BuilderState::Closed);
        abandon_state(state, &self.config);
    }
}

fn abandon_state(state: BuilderState, config: &Config) {
    if let BuilderState::Open(open) = state {
        let path = open.store.path().to_path_buf();
        if let Err(e) = open.discard(config) {
            config.diagnostics.cleanup_failed(&path, &e);
        }
    }
}

// =============================================================================
// Open State
// =============================================================================

impl BuilderState {
    fn open_mut(&mut self) -> Result<&mut OpenBuilder> {
        match self {
            BuilderState::Open(open) => Ok(open),
            BuilderState::Closed => Err(IcnsError::BuilderClosed),
        }
    }
}

impl OpenBuilder {
    fn append<R: Read>(&mut self, os_type: OsType, mut input: R) -> Result<()> {
        let start = self.position.get();

        // Flush on close, but keep the store writer itself open
        let writer = CloseProtectedWriter::new(&mut self.writer);
        let mut sink = CountingWriter::new(writer, &self.position);
        copy(&mut input, &mut sink)?;
        sink.close()?;

        let size = self.position.get() - start;
        let content = self.store.reader_factory(start, size);
        self.entries.push(IcnsEntry::new(os_type, size, content));

        tracing::debug!(%os_type, start, size, "added entry");

        Ok(())
    }

    /// Close the writer and delete the store without producing a container
    fn discard(self, config: &Config) -> io::Result<()> {
        let OpenBuilder {
            store, mut writer, ..
        } = self;

        let closed = writer.close();
        drop(writer);

        match closed {
            // The builder is closed either way; a handle given back on failure
            // retries removal when dropped
            Ok(()) => store.delete().map_err(|(_, e)| e),
            Err(e) => {
                store.discard(&*config.diagnostics);
                Err(e)
            }
        }
    }
}
