//! Contracts for the layers around the dispatch engine.
//!
//! ```text
//!   peer <-> PlatformIo <-> ProtocolBinding <-> process_request <-> Thing
//!            (bytes)        (Request/Response)
//! ```
//!
//! The dispatch engine never touches I/O. A [`ProtocolBinding`] owns a
//! [`PlatformIo`], decodes a [`Request`] into a scratch segment and encodes
//! the [`Response`] back out.

use std::fmt;
use std::io;

use servient_model::{ServientError, ServientResult};

use crate::exchange::{Request, Response};
use crate::payload::Payload;

/// Raw byte transport of the platform.
pub trait PlatformIo {
    /// Read up to `buf.len()` bytes. `Ok(0)` means the input is exhausted.
    fn read(&mut self, buf: &mut [u8]) -> ServientResult<usize>;

    /// Write up to `buf.len()` bytes and report how many were taken.
    fn write(&mut self, buf: &[u8]) -> ServientResult<usize>;

    /// Push buffered output to the peer.
    fn flush(&mut self) -> ServientResult<()> {
        Ok(())
    }

    /// Write all of `buf`, retrying short writes.
    fn write_all(&mut self, mut buf: &[u8]) -> ServientResult<()> {
        while !buf.is_empty() {
            match self.write(buf)? {
                0 => return Err(ServientError::generic("transport accepted no bytes")),
                n => buf = &buf[n..],
            }
        }
        Ok(())
    }
}

/// Protocol layer turning bytes into requests and responses into bytes.
pub trait ProtocolBinding {
    /// Decode the next request into `scratch`.
    ///
    /// Returns `Ok(None)` when no further request will arrive. The returned
    /// request borrows its target and payload from `scratch`.
    fn receive<'a>(&mut self, scratch: Payload<'a>) -> ServientResult<Option<Request<'a>>>;

    /// Encode `response` and hand it to the transport.
    fn send(&mut self, response: &Response<'_>) -> ServientResult<()>;
}

/// [`PlatformIo`] over a pair of standard streams.
#[derive(Debug)]
pub struct StreamIo<R, W> {
    reader: R,
    writer: W,
}

impl<R: io::Read, W: io::Write> StreamIo<R, W> {
    /// Pair a reader with a writer.
    #[must_use]
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Split back into the underlying streams.
    #[must_use]
    pub fn into_inner(self) -> (R, W) {
        (self.reader, self.writer)
    }

    /// The underlying writer.
    #[must_use]
    pub fn writer(&self) -> &W {
        &self.writer
    }
}

impl<R: io::Read, W: io::Write> PlatformIo for StreamIo<R, W> {
    fn read(&mut self, buf: &mut [u8]) -> ServientResult<usize> {
        loop {
            match self.reader.read(buf) {
                Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
                other => return Ok(other?),
            }
        }
    }

    fn write(&mut self, buf: &[u8]) -> ServientResult<usize> {
        Ok(self.writer.write(buf)?)
    }

    fn flush(&mut self) -> ServientResult<()> {
        Ok(self.writer.flush()?)
    }
}

/// Adapts a [`PlatformIo`] to [`io::Write`] so bindings can use `write!`.
pub struct IoWriter<'a, I: ?Sized>(pub &'a mut I);

impl<I: PlatformIo + ?Sized> io::Write for IoWriter<'_, I> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(self.0.write(buf)?)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(self.0.flush()?)
    }
}

impl<I: ?Sized> fmt::Debug for IoWriter<'_, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("IoWriter")
    }
}
