//! Tests for CloseProtectedReader / CloseProtectedWriter
//!
//! These tests verify:
//! - A protected reader's close never reaches the source
//! - A protected writer's close flushes but leaves the sink open
//! - Everything else is delegated unchanged

use std::io::{self, Cursor, Read, Write};

use icnskit::stream::{
    Close, CloseProtectedReader, CloseProtectedWriter, InputStream, SeekableReader,
};

// =============================================================================
// Helper Types
// =============================================================================

/// Source that refuses reads once closed
struct TrackingSource {
    inner: Cursor<Vec<u8>>,
    closed: bool,
}

impl TrackingSource {
    fn new(data: &[u8]) -> Self {
        Self {
            inner: Cursor::new(data.to_vec()),
            closed: false,
        }
    }
}

impl Read for TrackingSource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.closed {
            return Err(io::Error::other("source closed"));
        }
        self.inner.read(buf)
    }
}

impl Close for TrackingSource {
    fn close(&mut self) -> io::Result<()> {
        self.closed = true;
        Ok(())
    }
}

impl InputStream for TrackingSource {}

/// Sink that records flushes and refuses writes once closed
#[derive(Default)]
struct TrackingSink {
    data: Vec<u8>,
    pending: Vec<u8>,
    flushes: usize,
    closed: bool,
}

impl Write for TrackingSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.closed {
            return Err(io::Error::other("sink closed"));
        }
        self.pending.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.data.append(&mut self.pending);
        self.flushes += 1;
        Ok(())
    }
}

impl Close for TrackingSink {
    fn close(&mut self) -> io::Result<()> {
        self.flush()?;
        self.closed = true;
        Ok(())
    }
}

// =============================================================================
// CloseProtectedReader Tests
// =============================================================================

#[test]
fn test_reader_close_does_not_close_source() {
    let mut source = TrackingSource::new(b"abcdef");

    {
        let mut view = CloseProtectedReader::new(&mut source);
        let mut buf = [0u8; 3];
        view.read_exact(&mut buf).unwrap();
        assert_eq!(&buf, b"abc");
        view.close().unwrap();
    }

    assert!(!source.closed);

    let mut rest = Vec::new();
    source.read_to_end(&mut rest).unwrap();
    assert_eq!(rest, b"def");
}

#[test]
fn test_reader_reads_after_own_close() {
    let mut view = CloseProtectedReader::new(TrackingSource::new(b"xyz"));
    view.close().unwrap();

    let mut out = Vec::new();
    view.read_to_end(&mut out).unwrap();
    assert_eq!(out, b"xyz");
}

#[test]
fn test_unprotected_close_does_close_source() {
    let mut source = TrackingSource::new(b"abc");
    source.close().unwrap();

    let mut buf = [0u8; 1];
    assert!(source.read(&mut buf).is_err());
}

#[test]
fn test_reader_delegates_skip_and_mark() {
    let data: Vec<u8> = (0..100).collect();
    let mut view = CloseProtectedReader::new(SeekableReader::new(Cursor::new(data)).unwrap());

    assert!(view.mark_supported());
    view.mark();
    assert_eq!(view.skip(40).unwrap(), 40);

    let mut buf = [0u8; 1];
    view.read_exact(&mut buf).unwrap();
    assert_eq!(buf[0], 40);

    view.reset().unwrap();
    view.read_exact(&mut buf).unwrap();
    assert_eq!(buf[0], 0);
}

// =============================================================================
// CloseProtectedWriter Tests
// =============================================================================

#[test]
fn test_writer_close_flushes_but_keeps_sink_open() {
    let mut sink = TrackingSink::default();

    {
        let mut view = CloseProtectedWriter::new(&mut sink);
        view.write_all(b"hello ").unwrap();
        view.close().unwrap();
    }

    assert!(!sink.closed);
    assert_eq!(sink.flushes, 1);
    assert_eq!(sink.data, b"hello ");

    // The true owner keeps writing
    sink.write_all(b"world").unwrap();
    sink.close().unwrap();
    assert_eq!(sink.data, b"hello world");
    assert!(sink.closed);
}

#[test]
fn test_writer_delegates_writes() {
    let mut view = CloseProtectedWriter::new(Vec::new());
    view.write_all(b"abc").unwrap();
    view.write_all(b"def").unwrap();

    assert_eq!(view.into_inner(), b"abcdef");
}
