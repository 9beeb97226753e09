//! Counting Reader / Writer
//!
//! Reports every transferred byte to an externally owned `Counter`.

use std::io::{self, Read, Write};

use crate::error::{IcnsError, Result};

use super::{Close, Counter, InputStream};

// =============================================================================
// CountingReader
// =============================================================================

/// Reader that adds the size of each successful read or skip to a counter.
///
/// The counter may be shared with other code, so `reset` does not restore a
/// private copy: it applies a compensating delta that brings the shared
/// total back to its value at `mark` time.
#[derive(Debug)]
pub struct CountingReader<R, C> {
    inner: R,
    counter: C,
    /// Counter total at the last `mark()`
    mark: Option<u64>,
}

impl<R, C: Counter> CountingReader<R, C> {
    pub fn new(inner: R, counter: C) -> Self {
        Self {
            inner,
            counter,
            mark: None,
        }
    }

    /// Current counter total
    pub fn count(&self) -> u64 {
        self.counter.add(0)
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

impl<R: Read, C: Counter> Read for CountingReader<R, C> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        if n > 0 {
            self.counter.add(n as i64);
        }

        Ok(n)
    }
}

impl<R: Close, C> Close for CountingReader<R, C> {
    fn close(&mut self) -> io::Result<()> {
        self.inner.close()
    }
}

impl<R: InputStream, C: Counter> InputStream for CountingReader<R, C> {
    fn skip(&mut self, n: u64) -> io::Result<u64> {
        let skipped = self.inner.skip(n)?;
        if skipped > 0 {
            self.counter.add(skipped as i64);
        }

        Ok(skipped)
    }

    fn mark(&mut self) {
        self.inner.mark();
        self.mark = Some(self.counter.add(0));
    }

    fn reset(&mut self) -> Result<()> {
        let mark = self.mark.ok_or(IcnsError::MarkNotSet)?;
        self.inner.reset()?;

        let current = self.counter.add(0);
        self.counter.add(mark as i64 - current as i64);

        Ok(())
    }

    fn mark_supported(&self) -> bool {
        self.inner.mark_supported()
    }
}

// =============================================================================
// CountingWriter
// =============================================================================

/// Writer that adds the number of bytes accepted by each write to a counter
#[derive(Debug)]
pub struct CountingWriter<W, C> {
    inner: W,
    counter: C,
}

impl<W, C: Counter> CountingWriter<W, C> {
    pub fn new(inner: W, counter: C) -> Self {
        Self { inner, counter }
    }

    /// Current counter total
    pub fn count(&self) -> u64 {
        self.counter.add(0)
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    pub fn get_mut(&mut self) -> &mut W {
        &mut self.inner
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write, C: Counter> Write for CountingWriter<W, C> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        if n > 0 {
            self.counter.add(n as i64);
        }

        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

impl<W: Close, C> Close for CountingWriter<W, C> {
    fn close(&mut self) -> io::Result<()> {
        self.inner.close()
    }
}
