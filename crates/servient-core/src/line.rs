//! A line-oriented text binding for serial links and terminals.
//!
//! Requests are one line each:
//!
//! ```text
//! <operation> <target>[ <payload>]\n
//! readproperty /status
//! writeproperty /status true
//! ```
//!
//! Responses echo the status code and name, then any payload:
//!
//! ```text
//! <code> <STATUS>[ <payload>]\n
//! 0 OK false
//! 2 NOT_FOUND
//! ```
//!
//! The scratch segment handed to [`LineBinding::receive`] is split in two:
//! the tail becomes the target buffer and the rest the payload buffer, so a
//! request is decoded without copying it anywhere else.

use std::io::Write;

use servient_model::{OperationType, ServientError, ServientResult};

use crate::binding::{IoWriter, PlatformIo, ProtocolBinding};
use crate::exchange::{Request, Response};
use crate::payload::Payload;

/// Default size of the target buffer carved from each scratch segment.
pub const DEFAULT_TARGET_BUFFER_BYTES: usize = 32;

/// Longest operation name accepted on the wire.
const MAX_OPERATION_NAME: usize = 32;

/// What ended a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Delimiter {
    Space,
    EndOfLine,
    EndOfInput,
}

/// [`ProtocolBinding`] speaking the line protocol over a [`PlatformIo`].
#[derive(Debug)]
pub struct LineBinding<I> {
    io: I,
    target_buffer_bytes: usize,
}

impl<I: PlatformIo> LineBinding<I> {
    /// A binding over `io` with the default target buffer size.
    #[must_use]
    pub fn new(io: I) -> Self {
        Self::with_target_buffer(io, DEFAULT_TARGET_BUFFER_BYTES)
    }

    /// A binding reserving `target_buffer_bytes` of each scratch segment for
    /// the target.
    #[must_use]
    pub fn with_target_buffer(io: I, target_buffer_bytes: usize) -> Self {
        Self {
            io,
            target_buffer_bytes,
        }
    }

    /// The underlying transport.
    #[must_use]
    pub fn io(&self) -> &I {
        &self.io
    }

    /// Give the transport back.
    #[must_use]
    pub fn into_io(self) -> I {
        self.io
    }

    fn read_byte(&mut self) -> ServientResult<Option<u8>> {
        let mut byte = [0u8; 1];
        match self.io.read(&mut byte)? {
            0 => Ok(None),
            _ => Ok(Some(byte[0])),
        }
    }

    /// Read one token into `sink`, stopping at a space (if `stop_at_space`),
    /// newline or end of input. Carriage returns are dropped. Bytes that do
    /// not fit are consumed and reported once the token ends.
    fn read_token(
        &mut self,
        sink: &mut Payload<'_>,
        stop_at_space: bool,
    ) -> ServientResult<Delimiter> {
        let mut overflow: Option<ServientError> = None;
        loop {
            let delimiter = match self.read_byte()? {
                None => Delimiter::EndOfInput,
                Some(b'\n') => Delimiter::EndOfLine,
                Some(b' ') if stop_at_space => Delimiter::Space,
                Some(b'\r') => continue,
                Some(byte) => {
                    if overflow.is_none() {
                        overflow = sink.append(&[byte]).err();
                    }
                    continue;
                }
            };
            return match overflow {
                Some(err) => {
                    if delimiter != Delimiter::EndOfLine {
                        self.skip_line()?;
                    }
                    Err(err)
                }
                None => Ok(delimiter),
            };
        }
    }

    fn skip_line(&mut self) -> ServientResult<()> {
        while let Some(byte) = self.read_byte()? {
            if byte == b'\n' {
                break;
            }
        }
        Ok(())
    }
}

impl<I: PlatformIo> ProtocolBinding for LineBinding<I> {
    fn receive<'a>(&mut self, mut scratch: Payload<'a>) -> ServientResult<Option<Request<'a>>> {
        scratch.clear();
        let mut target = scratch.split_off(self.target_buffer_bytes.min(scratch.remaining()))?;

        let mut name_buf = [0u8; MAX_OPERATION_NAME];
        let mut name = Payload::writable(&mut name_buf);
        let mut delimiter = loop {
            // Blank lines and leading spaces come back as empty tokens.
            let delimiter = self.read_token(&mut name, true)?;
            if !name.is_empty() || delimiter == Delimiter::EndOfInput {
                break delimiter;
            }
        };
        if name.is_empty() {
            return Ok(None);
        }

        // Runs of spaces before the target come back as empty tokens.
        while delimiter == Delimiter::Space && target.is_empty() {
            delimiter = self.read_token(&mut target, true)?;
        }
        if delimiter == Delimiter::Space {
            self.read_token(&mut scratch, false)?;
        }

        // The line is consumed by now, so decoding failures belong to this
        // request alone.
        let operation = name
            .as_text()
            .ok()
            .and_then(OperationType::from_name)
            .ok_or_else(|| {
                tracing::debug!(
                    operation = %String::from_utf8_lossy(name.as_bytes()),
                    "unknown operation"
                );
                ServientError::NotAllowed
            })?;
        let target = target.into_text().map_err(|_| ServientError::NotFound)?;
        if target.is_empty() {
            return Err(ServientError::NotFound);
        }

        Ok(Some(Request::new(target, operation, scratch)))
    }

    fn send(&mut self, response: &Response<'_>) -> ServientResult<()> {
        let status = response.status;
        let content = trim_trailing_nuls(response.payload.as_bytes());

        let mut out = IoWriter(&mut self.io);
        write!(out, "{} {}", status.code(), status)?;
        if !content.is_empty() {
            out.write_all(b" ")?;
            out.write_all(content)?;
        }
        out.write_all(b"\n")?;
        out.flush()?;
        Ok(())
    }
}

fn trim_trailing_nuls(bytes: &[u8]) -> &[u8] {
    let end = bytes.iter().rposition(|b| *b != 0).map_or(0, |last| last + 1);
    &bytes[..end]
}
