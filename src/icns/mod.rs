//! ICNS Module
//!
//! Assembles tagged icon payloads into a transient backing store and serves
//! them back lazily, one independent bounded cursor per read.
//!
//! ## Responsibilities
//! - Accept payloads one at a time (`IcnsBuilder`)
//! - Finalize into an immutable, repeatedly readable container (`IcnsIcons`)
//! - Own and delete the backing store exactly once
//! - Encode/decode the `.icns` file layout
//!
//! ## Lifecycle
//! ```text
//!   IcnsBuilder::new ──► Open ──add()──► Open
//!                         │
//!            build() ─────┼───── close() / drop
//!               │         │            │
//!               ▼         ▼            ▼
//!          IcnsIcons    Closed     store deleted
//!               │
//!        close() / drop
//!               ▼
//!         store deleted
//! ```
//!
//! ## File Format (big-endian)
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ Header (8 bytes)                            │
//! │   Magic: "icns" (4) | Total Length: u32 (4) │
//! ├─────────────────────────────────────────────┤
//! │ Entry (repeated)                            │
//! │   OSType (4) | Length: u32 (4) | Payload    │
//! │   (Length includes the 8-byte entry header) │
//! └─────────────────────────────────────────────┘
//! ```

mod builder;
mod entry;
mod format;
mod icons;
mod os_type;
mod store;

pub use builder::IcnsBuilder;
pub use entry::{ContentFactory, EntryReader, IcnsEntry};
pub use icons::IcnsIcons;
pub use os_type::OsType;

// =============================================================================
// Shared Constants
// =============================================================================

/// Magic bytes at the start of every `.icns` file
pub const ICNS_MAGIC: &[u8; 4] = b"icns";

/// Size of the file header and of every entry header
pub const HEADER_SIZE: u32 = 8;
