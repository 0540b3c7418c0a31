//! Fixed-capacity payload segments.
//!
//! A [`Payload`] is a descriptor over memory owned by the caller: the bytes,
//! how many of them hold valid content, a content-format tag and whether the
//! segment may be written. Capacity is fixed when the segment is created and
//! never grows; the only way to hand memory to another segment is
//! [`Payload::split`], which carves the unused tail of one segment into a
//! second, disjoint one.
//!
//! ```text
//!  one scratch buffer
//! +-----------------------------------------------+
//! | valid |       unused tail                      |
//! +-----------------------------------------------+
//!             split(left, right, n)
//! +-------------------------------+---------------+
//! | valid |   left (cap - n)      | right (n)     |
//! +-------------------------------+---------------+
//! ```
//!
//! No operation here allocates, and every failing operation leaves the
//! segments it was given untouched.

use std::fmt;
use std::io;
use std::mem;

use servient_model::{ContentFormat, ServientError, ServientResult};

/// Whether a segment's memory may be written through it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Access {
    /// Content may be read but not changed.
    #[default]
    ReadOnly,
    /// Content may be appended, replaced and split.
    ReadWrite,
}

#[derive(Debug)]
enum Content<'a> {
    Empty,
    Shared(&'a [u8]),
    Exclusive(&'a mut [u8]),
}

/// A fixed-capacity memory segment carrying request or response content.
pub struct Payload<'a> {
    content: Content<'a>,
    valid: usize,
    format: ContentFormat,
    access: Access,
}

impl<'a> Payload<'a> {
    /// An empty, read-only segment with no memory behind it.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            content: Content::Empty,
            valid: 0,
            format: ContentFormat::UNKNOWN,
            access: Access::ReadOnly,
        }
    }

    /// An empty but writable segment, ready to receive memory from
    /// [`Payload::split`].
    #[must_use]
    pub const fn receiver() -> Self {
        Self {
            content: Content::Empty,
            valid: 0,
            format: ContentFormat::UNKNOWN,
            access: Access::ReadWrite,
        }
    }

    /// A writable segment over `buf` with no valid content yet.
    #[must_use]
    pub fn writable(buf: &'a mut [u8]) -> Self {
        Self {
            content: Content::Exclusive(buf),
            valid: 0,
            format: ContentFormat::UNKNOWN,
            access: Access::ReadWrite,
        }
    }

    /// A read-only segment whose content is all of `bytes`.
    #[must_use]
    pub fn read_only(bytes: &'a [u8]) -> Self {
        Self {
            valid: bytes.len(),
            content: Content::Shared(bytes),
            format: ContentFormat::UNKNOWN,
            access: Access::ReadOnly,
        }
    }

    /// Set the content-format tag, builder style.
    #[must_use]
    pub fn with_content_format(mut self, format: ContentFormat) -> Self {
        self.format = format;
        self
    }

    // -- Accessors --

    /// Total bytes of memory behind the segment.
    #[must_use]
    pub fn capacity(&self) -> usize {
        match &self.content {
            Content::Empty => 0,
            Content::Shared(bytes) => bytes.len(),
            Content::Exclusive(buf) => buf.len(),
        }
    }

    /// Bytes of valid content.
    #[must_use]
    pub fn len(&self) -> usize {
        self.valid
    }

    /// Whether the segment holds no valid content.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.valid == 0
    }

    /// Bytes still free after the valid content.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.capacity() - self.valid
    }

    /// The valid content.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        match &self.content {
            Content::Empty => &[],
            Content::Shared(bytes) => &bytes[..self.valid],
            Content::Exclusive(buf) => &buf[..self.valid],
        }
    }

    /// The valid content as text, up to the first NUL.
    pub fn as_text(&self) -> ServientResult<&str> {
        text_of(self.as_bytes())
    }

    /// Give up the descriptor and keep the valid content borrowed for the
    /// lifetime of the underlying memory.
    #[must_use]
    pub fn into_bytes(self) -> &'a [u8] {
        let valid = self.valid;
        match self.content {
            Content::Empty => &[],
            Content::Shared(bytes) => &bytes[..valid],
            Content::Exclusive(buf) => {
                let buf: &'a [u8] = buf;
                &buf[..valid]
            }
        }
    }

    /// Like [`Payload::into_bytes`], decoded as text up to the first NUL.
    pub fn into_text(self) -> ServientResult<&'a str> {
        text_of(self.into_bytes())
    }

    /// The content-format tag.
    #[must_use]
    pub fn content_format(&self) -> ContentFormat {
        self.format
    }

    /// Replace the content-format tag.
    pub fn set_content_format(&mut self, format: ContentFormat) {
        self.format = format;
    }

    /// Current access mode.
    #[must_use]
    pub fn access(&self) -> Access {
        self.access
    }

    /// Whether the segment may be written.
    #[must_use]
    pub fn is_writable(&self) -> bool {
        self.access == Access::ReadWrite
    }

    /// Change the access mode. Segments over shared memory can never become
    /// writable.
    pub fn set_access(&mut self, access: Access) -> ServientResult<()> {
        if access == Access::ReadWrite && matches!(self.content, Content::Shared(_)) {
            return Err(ServientError::NotAllowed);
        }
        self.access = access;
        Ok(())
    }

    // -- Mutation --

    /// Forget the valid content. The bytes themselves are left as they are.
    pub fn clear(&mut self) {
        self.valid = 0;
    }

    /// Append `data` after the valid content.
    ///
    /// Fails without writing anything when `data` does not fit.
    pub fn append(&mut self, data: &[u8]) -> ServientResult<()> {
        self.ensure_writable()?;
        let available = self.remaining();
        if data.len() > available {
            return Err(ServientError::not_enough_memory(data.len(), available));
        }
        let start = self.valid;
        let buf = self.buffer_mut()?;
        buf[start..start + data.len()].copy_from_slice(data);
        self.valid += data.len();
        Ok(())
    }

    /// Append `text` as a NUL-terminated string.
    ///
    /// Trailing NULs already in the valid content are dropped first, so
    /// consecutive calls build one singly-terminated string. `text` is taken
    /// up to its first NUL.
    ///
    /// # Examples
    ///
    /// ```
    /// use servient_core::payload::Payload;
    ///
    /// let mut buf = [0u8; 32];
    /// let mut payload = Payload::writable(&mut buf);
    /// payload.append_text("Lorem ipsum").unwrap();
    /// payload.append_text(" dolor").unwrap();
    /// assert_eq!(payload.as_bytes(), b"Lorem ipsum dolor\0");
    /// ```
    pub fn append_text(&mut self, text: &str) -> ServientResult<()> {
        self.ensure_writable()?;
        let text = until_nul(text.as_bytes());
        let base = until_trailing_nuls(self.as_bytes()).len();
        let available = self.capacity() - base;
        if text.len() + 1 > available {
            return Err(ServientError::not_enough_memory(text.len() + 1, available));
        }
        let buf = self.buffer_mut()?;
        buf[base..base + text.len()].copy_from_slice(text);
        buf[base + text.len()] = 0;
        self.valid = base + text.len() + 1;
        Ok(())
    }

    /// Replace the valid content with `data`.
    pub fn overwrite(&mut self, data: &[u8]) -> ServientResult<()> {
        self.ensure_writable()?;
        let capacity = self.capacity();
        if data.len() > capacity {
            return Err(ServientError::not_enough_memory(data.len(), capacity));
        }
        let buf = self.buffer_mut()?;
        buf[..data.len()].copy_from_slice(data);
        self.valid = data.len();
        Ok(())
    }

    /// The unused tail, for writing in place before [`Payload::set_len`].
    pub fn spare_capacity_mut(&mut self) -> ServientResult<&mut [u8]> {
        let start = self.valid;
        Ok(&mut self.buffer_mut()?[start..])
    }

    /// Declare the first `len` bytes valid.
    pub fn set_len(&mut self, len: usize) -> ServientResult<()> {
        self.ensure_writable()?;
        let capacity = self.capacity();
        if len > capacity {
            return Err(ServientError::not_enough_memory(len, capacity));
        }
        self.valid = len;
        Ok(())
    }

    /// Pull content once from `source` into the unused tail.
    ///
    /// Returns the number of bytes the source produced.
    pub fn fill_from<S>(&mut self, source: &mut S) -> ServientResult<usize>
    where
        S: PayloadSource + ?Sized,
    {
        let spare = self.spare_capacity_mut()?;
        let offered = spare.len();
        let produced = source.fill(spare)?;
        if produced > offered {
            return Err(ServientError::generic("payload source overran the buffer"));
        }
        self.valid += produced;
        Ok(produced)
    }

    /// Move the last `to_split` bytes of this segment's unused tail into
    /// `right`.
    ///
    /// Both segments must be writable and `to_split` may not exceed
    /// [`Payload::remaining`]. On success `right` addresses exactly the
    /// carved bytes and holds no valid content; whatever memory it
    /// previously addressed is released. On failure neither segment changes.
    ///
    /// # Examples
    ///
    /// ```
    /// use servient_core::payload::Payload;
    ///
    /// let mut scratch = [0u8; 256];
    /// let mut left = Payload::writable(&mut scratch);
    /// let mut right = Payload::receiver();
    /// left.split(&mut right, 96).unwrap();
    /// assert_eq!(left.capacity(), 160);
    /// assert_eq!(right.capacity(), 96);
    /// ```
    pub fn split(&mut self, right: &mut Payload<'a>, to_split: usize) -> ServientResult<()> {
        if !self.is_writable() || !right.is_writable() {
            return Err(ServientError::NotAllowed);
        }
        let available = self.remaining();
        if to_split > available {
            return Err(ServientError::not_enough_memory(to_split, available));
        }

        let keep = self.capacity() - to_split;
        match mem::replace(&mut self.content, Content::Empty) {
            Content::Exclusive(buf) => {
                let (head, tail) = buf.split_at_mut(keep);
                self.content = Content::Exclusive(head);
                right.content = Content::Exclusive(tail);
            }
            other => {
                self.content = other;
                right.content = Content::Empty;
            }
        }
        right.valid = 0;

        tracing::trace!(left = keep, right = to_split, "split payload segment");
        Ok(())
    }

    /// Split `to_split` bytes off into a new writable segment.
    pub fn split_off(&mut self, to_split: usize) -> ServientResult<Payload<'a>> {
        let mut right = Payload::receiver();
        self.split(&mut right, to_split)?;
        Ok(right)
    }

    fn ensure_writable(&self) -> ServientResult<()> {
        if self.is_writable() {
            Ok(())
        } else {
            Err(ServientError::NotAllowed)
        }
    }

    fn buffer_mut(&mut self) -> ServientResult<&mut [u8]> {
        self.ensure_writable()?;
        match &mut self.content {
            Content::Exclusive(buf) => Ok(&mut **buf),
            Content::Empty => Ok(<&mut [u8]>::default()),
            Content::Shared(_) => Err(ServientError::NotAllowed),
        }
    }
}

impl Default for Payload<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Payload<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Payload")
            .field("len", &self.valid)
            .field("capacity", &self.capacity())
            .field("format", &self.format)
            .field("access", &self.access)
            .finish()
    }
}

/// Writes are all-or-nothing: a chunk that does not fit fails with
/// [`io::ErrorKind::WriteZero`] and leaves the segment unchanged.
impl io::Write for Payload<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.append(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Single-shot producer used to fill a segment on demand.
///
/// Implemented for any `FnMut(&mut [u8]) -> ServientResult<usize>`.
pub trait PayloadSource {
    /// Write up to `buf.len()` bytes into `buf` and report how many were
    /// written.
    fn fill(&mut self, buf: &mut [u8]) -> ServientResult<usize>;
}

impl<F> PayloadSource for F
where
    F: FnMut(&mut [u8]) -> ServientResult<usize>,
{
    fn fill(&mut self, buf: &mut [u8]) -> ServientResult<usize> {
        self(buf)
    }
}

fn until_nul(bytes: &[u8]) -> &[u8] {
    match bytes.iter().position(|b| *b == 0) {
        Some(end) => &bytes[..end],
        None => bytes,
    }
}

fn until_trailing_nuls(bytes: &[u8]) -> &[u8] {
    match bytes.iter().rposition(|b| *b != 0) {
        Some(last) => &bytes[..=last],
        None => &[],
    }
}

fn text_of(bytes: &[u8]) -> ServientResult<&str> {
    std::str::from_utf8(until_nul(bytes))
        .map_err(|_| ServientError::generic("payload is not valid UTF-8"))
}
