//! Close-protected views
//!
//! Let code that closes whatever it is given operate on a long-lived
//! resource without ending that resource's life.

use std::io::{self, Read, Write};

use crate::error::Result;

use super::{Close, InputStream};

/// Reader whose `close()` is a no-op; everything else is delegated
#[derive(Debug)]
pub struct CloseProtectedReader<R> {
    inner: R,
}

impl<R> CloseProtectedReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
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

impl<R: Read> Read for CloseProtectedReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl<R> Close for CloseProtectedReader<R> {
    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<R: InputStream> InputStream for CloseProtectedReader<R> {
    fn skip(&mut self, n: u64) -> io::Result<u64> {
        self.inner.skip(n)
    }

    fn mark(&mut self) {
        self.inner.mark()
    }

    fn reset(&mut self) -> Result<()> {
        self.inner.reset()
    }

    fn mark_supported(&self) -> bool {
        self.inner.mark_supported()
    }
}

/// Writer whose `close()` only flushes; the sink stays open for its owner
#[derive(Debug)]
pub struct CloseProtectedWriter<W> {
    inner: W,
}

impl<W> CloseProtectedWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
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

impl<W: Write> Write for CloseProtectedWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

impl<W: Write> Close for CloseProtectedWriter<W> {
    fn close(&mut self) -> io::Result<()> {
        self.flush()
    }
}
