//! # icnskit
//!
//! Builds and reads ICNS icon containers:
//! - Payloads streamed one at a time into a transient backing store
//! - Immutable containers whose entries are read lazily, any number of times
//! - Bounded, counting and close-protected stream wrappers
//! - Exactly-once deletion of the backing store on every path
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      IcnsBuilder                            │
//! │              (add → build | close, one lock)                │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ build(): store ownership moves
//!                       ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      IcnsIcons                              │
//! │             (immutable entries, close deletes)              │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ entry.open()
//!                       ▼
//!   ┌──────────────────────────────┐     ┌─────────────────────┐
//!   │  BoundedReader<SeekableReader│────►│   Backing Store     │
//!   │  <File>> (fresh per call)    │     │   (temp file)       │
//!   └──────────────────────────────┘     └─────────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod stream;
pub mod icns;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{IcnsError, Result};
pub use config::{Config, DiagnosticSink, TracingSink};
pub use icns::{IcnsBuilder, IcnsEntry, IcnsIcons, OsType};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of icnskit
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
