//! Seekable Reader
//!
//! Gives a seekable source a native skip and position-based mark/reset.

use std::io::{self, Read, Seek, SeekFrom};

use crate::error::{IcnsError, Result};

use super::{Close, InputStream};

/// Adapter over a `Read + Seek` source.
///
/// The end of data is sampled once at construction, which suits read-only
/// sources such as a finalized backing store. `skip` never seeks past it.
#[derive(Debug)]
pub struct SeekableReader<R> {
    inner: R,
    /// Current absolute position
    pos: u64,
    /// Absolute end of data
    end: u64,
    mark: Option<u64>,
}

impl<R: Read + Seek> SeekableReader<R> {
    /// Wrap `inner` at its current position
    pub fn new(mut inner: R) -> io::Result<Self> {
        let pos = inner.stream_position()?;
        Self::at(inner, pos)
    }

    /// Wrap `inner`, positioned at absolute `offset`
    pub fn at(mut inner: R, offset: u64) -> io::Result<Self> {
        let end = inner.seek(SeekFrom::End(0))?;
        inner.seek(SeekFrom::Start(offset))?;

        Ok(Self {
            inner,
            pos: offset,
            end,
            mark: None,
        })
    }

    /// Current absolute position
    pub fn position(&self) -> u64 {
        self.pos
    }

    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> Read for SeekableReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.pos += n as u64;
        Ok(n)
    }
}

impl<R: Close> Close for SeekableReader<R> {
    fn close(&mut self) -> io::Result<()> {
        self.inner.close()
    }
}

impl<R: Read + Seek + Close> InputStream for SeekableReader<R> {
    fn skip(&mut self, n: u64) -> io::Result<u64> {
        let count = n.min(self.end.saturating_sub(self.pos));
        if count > 0 {
            self.inner.seek(SeekFrom::Start(self.pos + count))?;
            self.pos += count;
        }

        Ok(count)
    }

    fn mark(&mut self) {
        self.mark = Some(self.pos);
    }

    fn reset(&mut self) -> Result<()> {
        let mark = self.mark.ok_or(IcnsError::MarkNotSet)?;
        self.inner.seek(SeekFrom::Start(mark))?;
        self.pos = mark;

        Ok(())
    }

    fn mark_supported(&self) -> bool {
        true
    }
}
