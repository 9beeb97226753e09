//! Bounded Reader
//!
//! Caps the total number of bytes that can be read or skipped.

use std::io::{self, Read};

use crate::error::{IcnsError, Result};

use super::{Close, InputStream};

/// Reader that yields at most `limit` bytes from its source.
///
/// Once the limit is used up every read reports end-of-stream, even if the
/// source has more data. `mark` records the remaining allowance so `reset`
/// can restore it alongside the source's own position.
#[derive(Debug)]
pub struct BoundedReader<R> {
    inner: R,
    /// Bytes still allowed to be read or skipped
    remaining: u64,
    /// Allowance at the last `mark()`
    mark: Option<u64>,
}

impl<R> BoundedReader<R> {
    pub fn new(inner: R, limit: u64) -> Self {
        Self {
            inner,
            remaining: limit,
            mark: None,
        }
    }

    /// Bytes that may still be read before end-of-stream is reported
    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    pub fn get_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> Read for BoundedReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.remaining == 0 || buf.is_empty() {
            return Ok(0);
        }

        let max = buf.len().min(usize::try_from(self.remaining).unwrap_or(usize::MAX));
        let n = self.inner.read(&mut buf[..max])?;
        self.remaining -= n as u64;

        Ok(n)
    }
}

impl<R: Close> Close for BoundedReader<R> {
    fn close(&mut self) -> io::Result<()> {
        self.inner.close()
    }
}

impl<R: InputStream> InputStream for BoundedReader<R> {
    fn skip(&mut self, n: u64) -> io::Result<u64> {
        let n = n.min(self.remaining);
        if n == 0 {
            return Ok(0);
        }

        let skipped = self.inner.skip(n)?;
        self.remaining -= skipped;

        Ok(skipped)
    }

    fn mark(&mut self) {
        self.inner.mark();
        self.mark = Some(self.remaining);
    }

    fn reset(&mut self) -> Result<()> {
        let mark = self.mark.ok_or(IcnsError::MarkNotSet)?;
        self.inner.reset()?;
        self.remaining = mark;

        Ok(())
    }

    fn mark_supported(&self) -> bool {
        self.inner.mark_supported()
    }
}
