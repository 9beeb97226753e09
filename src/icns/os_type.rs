//! OSType tag
//!
//! Four opaque bytes naming an entry's role. Compared verbatim, never
//! interpreted here.

use std::fmt;
use std::str::FromStr;

use crate::error::{IcnsError, Result};

/// 4-byte type tag of an icon entry (e.g. `ic07`, `ic08`)
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OsType([u8; 4]);

impl OsType {
    pub const fn new(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }

    /// Parse a tag from its textual form.
    ///
    /// An empty string counts as a missing tag.
    pub fn parse(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(IcnsError::InvalidArgument("OSType is required".to_string()));
        }

        let bytes: [u8; 4] = s.as_bytes().try_into().map_err(|_| {
            IcnsError::InvalidArgument(format!(
                "OSType must be exactly 4 bytes, got {} ({:?})",
                s.len(),
                s
            ))
        })?;

        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl From<[u8; 4]> for OsType {
    fn from(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }
}

impl FromStr for OsType {
    type Err = IcnsError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for OsType {
    type Error = IcnsError;

    fn try_from(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl PartialEq<str> for OsType {
    fn eq(&self, other: &str) -> bool {
        self.0.as_slice() == other.as_bytes()
    }
}

impl PartialEq<&str> for OsType {
    fn eq(&self, other: &&str) -> bool {
        self.0.as_slice() == other.as_bytes()
    }
}

impl fmt::Display for OsType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.0 {
            if b.is_ascii_graphic() || b == b' ' {
                write!(f, "{}", b as char)?;
            } else {
                write!(f, "\\x{:02x}", b)?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for OsType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OsType(\"{}\")", self)
    }
}
