//! Stream Module
//!
//! Byte-stream decorators used to expose exact byte ranges of a shared
//! backing store without materializing payloads in memory.
//!
//! ## Responsibilities
//! - Cap how many bytes a reader may yield (`BoundedReader`)
//! - Report transferred byte counts to an external counter (`Counting*`)
//! - Hand out views whose `close()` does not end the underlying resource
//!   (`CloseProtected*`)
//! - Bulk transfer helpers: skip, waste, exhaust, copy
//!
//! ## Layering
//! ```text
//! ┌──────────────────────────────────────────┐
//! │ CountingReader / CloseProtectedReader    │  (optional, caller-side)
//! ├──────────────────────────────────────────┤
//! │ BoundedReader (limit = entry size)       │
//! ├──────────────────────────────────────────┤
//! │ SeekableReader (native skip, mark/reset) │
//! ├──────────────────────────────────────────┤
//! │ File (backing store, own cursor)         │
//! └──────────────────────────────────────────┘
//! ```

mod bounded;
mod counting;
mod protect;
mod seekable;
pub mod transfer;

use std::cell::Cell;
use std::fs::File;
use std::io::{self, BufWriter, Cursor, Read, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::error::{IcnsError, Result};

pub use bounded::BoundedReader;
pub use counting::{CountingReader, CountingWriter};
pub use protect::{CloseProtectedReader, CloseProtectedWriter};
pub use seekable::SeekableReader;
pub use transfer::{close_quietly, copy, exhaust, skip, waste, BUFFER_SIZE};

// =============================================================================
// Traits
// =============================================================================

/// Explicit end-of-life for a stream.
///
/// Dropping still releases the resource; `close` exists so wrappers can
/// intercept it (flush instead, or ignore) and so failures are observable.
pub trait Close {
    fn close(&mut self) -> io::Result<()>;
}

/// A readable stream with a native skip primitive and optional mark/reset.
pub trait InputStream: Read + Close {
    /// Skip up to `n` bytes, returning how many were actually skipped.
    /// May return less than `n`, and 0 at end-of-stream.
    fn skip(&mut self, n: u64) -> io::Result<u64> {
        io::copy(&mut Read::take(&mut *self, n), &mut io::sink())
    }

    /// Remember the current position for a later `reset`
    fn mark(&mut self) {}

    /// Return to the position recorded by the last `mark`
    fn reset(&mut self) -> Result<()> {
        Err(IcnsError::MarkNotSupported)
    }

    fn mark_supported(&self) -> bool {
        false
    }
}

/// Externally owned byte accumulator.
///
/// `add` applies `delta` (possibly negative) and returns the new total.
/// `add(0)` reads the current total.
pub trait Counter {
    fn add(&self, delta: i64) -> u64;
}

// =============================================================================
// Counter Implementations
// =============================================================================

impl Counter for AtomicU64 {
    fn add(&self, delta: i64) -> u64 {
        let magnitude = delta.unsigned_abs();
        if delta >= 0 {
            self.fetch_add(magnitude, Ordering::SeqCst).wrapping_add(magnitude)
        } else {
            self.fetch_sub(magnitude, Ordering::SeqCst).wrapping_sub(magnitude)
        }
    }
}

/// Single-threaded counter, for totals already guarded by an outer lock
impl Counter for Cell<u64> {
    fn add(&self, delta: i64) -> u64 {
        let total = self.get().wrapping_add_signed(delta);
        self.set(total);
        total
    }
}

impl<C: Counter + ?Sized> Counter for &C {
    fn add(&self, delta: i64) -> u64 {
        (**self).add(delta)
    }
}

impl<C: Counter + ?Sized> Counter for Arc<C> {
    fn add(&self, delta: i64) -> u64 {
        (**self).add(delta)
    }
}

/// Adapts a callback `Fn(delta) -> total` into a `Counter`
pub struct FnCounter<F>(pub F);

impl<F: Fn(i64) -> u64> Counter for FnCounter<F> {
    fn add(&self, delta: i64) -> u64 {
        (self.0)(delta)
    }
}

// =============================================================================
// Close Implementations
// =============================================================================

impl Close for File {
    fn close(&mut self) -> io::Result<()> {
        // Handle is released on drop
        Ok(())
    }
}

impl<W: Write> Close for BufWriter<W> {
    fn close(&mut self) -> io::Result<()> {
        self.flush()
    }
}

impl Close for &[u8] {
    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Close for Vec<u8> {
    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<T> Close for Cursor<T> {
    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Close for io::Sink {
    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Close for io::Empty {
    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<T: Close + ?Sized> Close for &mut T {
    fn close(&mut self) -> io::Result<()> {
        (**self).close()
    }
}

impl<T: Close + ?Sized> Close for Box<T> {
    fn close(&mut self) -> io::Result<()> {
        (**self).close()
    }
}

// =============================================================================
// InputStream Implementations
// =============================================================================

impl InputStream for File {}

impl InputStream for io::Empty {}

impl InputStream for &[u8] {
    fn skip(&mut self, n: u64) -> io::Result<u64> {
        let data: &[u8] = *self;
        let count = n.min(data.len() as u64) as usize;
        *self = &data[count..];
        Ok(count as u64)
    }
}

impl<T: AsRef<[u8]>> InputStream for Cursor<T> {
    fn skip(&mut self, n: u64) -> io::Result<u64> {
        let len = self.get_ref().as_ref().len() as u64;
        let pos = self.position().min(len);
        let count = n.min(len - pos);
        self.set_position(pos + count);
        Ok(count)
    }
}

impl<T: InputStream + ?Sized> InputStream for &mut T {
    fn skip(&mut self, n: u64) -> io::Result<u64> {
        (**self).skip(n)
    }

    fn mark(&mut self) {
        (**self).mark()
    }

    fn reset(&mut self) -> Result<()> {
        (**self).reset()
    }

    fn mark_supported(&self) -> bool {
        (**self).mark_supported()
    }
}

impl<T: InputStream + ?Sized> InputStream for Box<T> {
    fn skip(&mut self, n: u64) -> io::Result<u64> {
        (**self).skip(n)
    }

    fn mark(&mut self) {
        (**self).mark()
    }

    fn reset(&mut self) -> Result<()> {
        (**self).reset()
    }

    fn mark_supported(&self) -> bool {
        (**self).mark_supported()
    }
}
