//! Borrowed views into a caller-owned buffer.

use core::fmt;

/// A non-owning `[start, start + len)` view into a byte buffer.
///
/// Every value the parser returns is a `Span` into the buffer handed to
/// [`get_message`](crate::get_message). Nothing is copied; child lookups
/// re-scan inside the parent's span. Offsets stay relative to the whole
/// buffer so that a span can be widened back to its surroundings.
#[derive(Clone, Copy)]
pub struct Span<'a> {
    buf: &'a [u8],
    start: usize,
    len: usize,
}

impl<'a> Span<'a> {
    /// A span covering the whole buffer.
    #[inline]
    #[must_use]
    pub const fn full(buf: &'a [u8]) -> Self {
        Self {
            buf,
            start: 0,
            len: buf.len(),
        }
    }

    /// A span over `buf[start..end]`.
    ///
    /// Callers inside the crate guarantee `start <= end <= buf.len()`.
    #[inline]
    pub(crate) fn between(buf: &'a [u8], start: usize, end: usize) -> Self {
        debug_assert!(start <= end && end <= buf.len());
        Self {
            buf,
            start,
            len: end - start,
        }
    }

    /// Offset of the first byte within the underlying buffer.
    #[inline]
    #[must_use]
    pub const fn start(&self) -> usize {
        self.start
    }

    /// Offset one past the last byte within the underlying buffer.
    #[inline]
    #[must_use]
    pub const fn end(&self) -> usize {
        self.start + self.len
    }

    /// Number of bytes covered.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the span covers nothing.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The covered bytes.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &'a [u8] {
        &self.buf[self.start..self.end()]
    }

    /// The covered bytes as text, if they are valid UTF-8.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&'a str> {
        core::str::from_utf8(self.as_bytes()).ok()
    }

    /// The buffer this span points into.
    #[inline]
    pub(crate) fn buffer(&self) -> &'a [u8] {
        self.buf
    }

    /// Byte at absolute offset `pos`, if it lies inside this span.
    #[inline]
    pub(crate) fn byte_at(&self, pos: usize) -> Option<u8> {
        if pos >= self.start && pos < self.end() {
            Some(self.buf[pos])
        } else {
            None
        }
    }
}

impl PartialEq for Span<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Eq for Span<'_> {}

impl PartialEq<[u8]> for Span<'_> {
    fn eq(&self, other: &[u8]) -> bool {
        self.as_bytes() == other
    }
}

impl PartialEq<str> for Span<'_> {
    fn eq(&self, other: &str) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl PartialEq<&str> for Span<'_> {
    fn eq(&self, other: &&str) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl fmt::Debug for Span<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_str() {
            Some(s) => write!(f, "Span({}..{}, {:?})", self.start, self.end(), s),
            None => write!(f, "Span({}..{}, {:?})", self.start, self.end(), self.as_bytes()),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Span<'_> {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Span({}..{}, {=[u8]:a})", self.start, self.end(), self.as_bytes())
    }
}
