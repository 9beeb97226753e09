//! ICNS Icons
//!
//! Finalized, immutable container of entries. Owns the backing store until
//! closed or dropped.

use std::fmt;
use std::path::PathBuf;
use std::slice;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::config::DiagnosticSink;
use crate::error::Result;

use super::store::BackingStore;
use super::{IcnsEntry, OsType};

/// Finalized container produced by `IcnsBuilder::build`.
///
/// Entries keep insertion order; duplicate tags are kept as separate
/// entries. Reads of any entry may run concurrently, each on its own cursor.
pub struct IcnsIcons {
    entries: Vec<IcnsEntry>,
    /// `None` once closed
    store: Mutex<Option<BackingStore>>,
    diagnostics: Arc<dyn DiagnosticSink>,
}

impl IcnsIcons {
    pub(crate) fn new(
        entries: Vec<IcnsEntry>,
        store: BackingStore,
        diagnostics: Arc<dyn DiagnosticSink>,
    ) -> Self {
        Self {
            entries,
            store: Mutex::new(Some(store)),
            diagnostics,
        }
    }

    /// All entries in insertion order
    pub fn entries(&self) -> &[IcnsEntry] {
        &self.entries
    }

    pub fn iter(&self) -> slice::Iter<'_, IcnsEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries tagged `os_type`, in insertion order
    pub fn find(&self, os_type: &str) -> Vec<&IcnsEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.os_type() == os_type)
            .collect()
    }

    /// All entries tagged `os_type`, in insertion order
    pub fn find_type(&self, os_type: OsType) -> Vec<&IcnsEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.os_type() == os_type)
            .collect()
    }

    /// First entry tagged `os_type`
    pub fn first(&self, os_type: &str) -> Option<&IcnsEntry> {
        self.entries.iter().find(|entry| entry.os_type() == os_type)
    }

    /// Sum of all payload sizes
    pub fn total_size(&self) -> u64 {
        self.entries.iter().map(IcnsEntry::size).sum()
    }

    pub fn is_closed(&self) -> bool {
        self.store.lock().is_none()
    }

    /// Location of the backing store, `None` once closed
    pub fn store_path(&self) -> Option<PathBuf> {
        self.store
            .lock()
            .as_ref()
            .map(|store| store.path().to_path_buf())
    }

    /// Delete the backing store. No-op if already closed.
    ///
    /// Opening any entry afterwards fails with an I/O error. If deletion
    /// fails the container stays open, so `close` can be retried.
    pub fn close(&self) -> Result<()> {
        let mut slot = self.store.lock();
        if let Some(store) = slot.take() {
            if let Err((store, e)) = store.delete() {
                *slot = Some(store);
                return Err(e.into());
            }
        }
        Ok(())
    }
}

impl Drop for IcnsIcons {
    fn drop(&mut self) {
        if let Some(store) = self.store.get_mut().take() {
            store.discard(&*self.diagnostics);
        }
    }
}

impl<'a> IntoIterator for &'a IcnsIcons {
    type Item = &'a IcnsEntry;
    type IntoIter = slice::Iter<'a, IcnsEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl fmt::Debug for IcnsIcons {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IcnsIcons")
            .field("entries", &self.entries)
            .field("closed", &self.is_closed())
            .finish()
    }
}
