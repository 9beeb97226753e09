//! Configuration for icnskit
//!
//! Centralized configuration with sensible defaults.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Receives failures from best-effort cleanup paths.
///
/// Deleting a backing store after a primary failure (or from a `Drop`)
/// cannot report back to the caller, so those errors are routed here.
pub trait DiagnosticSink: Send + Sync {
    /// A backing store at `path` could not be deleted
    fn cleanup_failed(&self, path: &Path, error: &io::Error);
}

/// Default sink: logs through `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn cleanup_failed(&self, path: &Path, error: &io::Error) {
        tracing::warn!(path = %path.display(), %error, "could not delete backing store");
    }
}

/// Main configuration for builders and loaded containers
#[derive(Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Backing Store Configuration
    // -------------------------------------------------------------------------
    /// Directory where backing stores are created.
    /// `None` uses the system temp directory.
    pub temp_dir: Option<PathBuf>,

    /// File name prefix for backing stores
    pub file_prefix: String,

    /// fsync the backing store when the builder is finalized
    pub sync_on_build: bool,

    // -------------------------------------------------------------------------
    // Diagnostics
    // -------------------------------------------------------------------------
    /// Where best-effort cleanup failures are reported
    pub diagnostics: Arc<dyn DiagnosticSink>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            temp_dir: None,
            file_prefix: "icns-".to_string(),
            sync_on_build: false,
            diagnostics: Arc::new(TracingSink),
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("temp_dir", &self.temp_dir)
            .field("file_prefix", &self.file_prefix)
            .field("sync_on_build", &self.sync_on_build)
            .finish_non_exhaustive()
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the directory backing stores are created in
    pub fn temp_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.temp_dir = Some(path.into());
        self
    }

    /// Set the backing store file name prefix
    pub fn file_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.file_prefix = prefix.into();
        self
    }

    /// fsync the backing store on finalization
    pub fn sync_on_build(mut self, sync: bool) -> Self {
        self.config.sync_on_build = sync;
        self
    }

    /// Route cleanup failures to a custom sink
    pub fn diagnostics(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.config.diagnostics = sink;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
