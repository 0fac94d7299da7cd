//! Output sinks for the serializer and the printer.
//!
//! A [`Sink`] is the single byte-emission capability the write side needs.
//! The crate never touches an I/O primitive itself: callers choose where the
//! bytes go by picking (or implementing) a sink.
//!
//! | Sink | Destination |
//! |------|-------------|
//! | [`SliceWriter`] | caller-provided fixed buffer |
//! | [`FmtSink`] | any `core::fmt::Write` (e.g. `heapless::String`) |
//! | [`FnSink`] | putc-style callback |
//! | `IoSink` | `embedded_io::Write` (UART, feature `embedded-io`) |
//! | `heapless::Vec<u8, N>` | fixed-capacity vector (feature `heapless`) |

use core::fmt;

/// Error type for serialization and printing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SerializeError {
    /// The output buffer is too small to hold the serialized message.
    BufferTooSmall,
    /// A write operation failed (for I/O adapters).
    WriteError,
    /// A float is NaN, infinite, or too large to render.
    InvalidFloat,
}

impl fmt::Display for SerializeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BufferTooSmall => write!(f, "buffer too small"),
            Self::WriteError => write!(f, "write error"),
            Self::InvalidFloat => write!(f, "float cannot be rendered"),
        }
    }
}

/// Byte-oriented output.
pub trait Sink {
    /// Emit one byte.
    ///
    /// # Errors
    ///
    /// [`SerializeError::BufferTooSmall`] when a bounded sink is full,
    /// [`SerializeError::WriteError`] when the underlying writer fails.
    fn put(&mut self, byte: u8) -> Result<(), SerializeError>;

    /// Emit a run of bytes.
    ///
    /// # Errors
    ///
    /// Same as [`Sink::put`].
    fn put_slice(&mut self, bytes: &[u8]) -> Result<(), SerializeError> {
        for &b in bytes {
            self.put(b)?;
        }
        Ok(())
    }

    /// Remaining capacity, for sinks that have one.
    fn remaining(&self) -> Option<usize> {
        None
    }
}

impl<S: Sink + ?Sized> Sink for &mut S {
    #[inline]
    fn put(&mut self, byte: u8) -> Result<(), SerializeError> {
        (**self).put(byte)
    }

    #[inline]
    fn put_slice(&mut self, bytes: &[u8]) -> Result<(), SerializeError> {
        (**self).put_slice(bytes)
    }

    #[inline]
    fn remaining(&self) -> Option<usize> {
        (**self).remaining()
    }
}

/// Sink writing into a caller-provided fixed buffer.
///
/// # Example
///
/// ```
/// use mcu_msg::{Sink, SliceWriter};
///
/// let mut buf = [0u8; 4];
/// let mut w = SliceWriter::new(&mut buf);
/// w.put_slice(b"#id").unwrap();
/// assert_eq!(w.remaining(), Some(1));
/// assert!(w.put_slice(b"{}").is_err());
/// assert_eq!(w.written(), b"#id");
/// ```
pub struct SliceWriter<'b> {
    buf: &'b mut [u8],
    pos: usize,
}

impl<'b> SliceWriter<'b> {
    /// Create a writer positioned at the start of `buf`.
    #[inline]
    pub fn new(buf: &'b mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Number of bytes written so far.
    #[inline]
    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// The bytes written so far.
    #[inline]
    #[must_use]
    pub fn written(&self) -> &[u8] {
        &self.buf[..self.pos]
    }

    /// Rewind to the start of the buffer.
    #[inline]
    pub fn reset(&mut self) {
        self.pos = 0;
    }

    /// Give the written part of the buffer back to the caller.
    #[must_use]
    pub fn into_written(self) -> &'b [u8] {
        let buf: &'b [u8] = self.buf;
        &buf[..self.pos]
    }
}

impl Sink for SliceWriter<'_> {
    #[inline]
    fn put(&mut self, byte: u8) -> Result<(), SerializeError> {
        let slot = self
            .buf
            .get_mut(self.pos)
            .ok_or(SerializeError::BufferTooSmall)?;
        *slot = byte;
        self.pos += 1;
        Ok(())
    }

    /// All-or-nothing: a run that does not fit is not written at all.
    fn put_slice(&mut self, bytes: &[u8]) -> Result<(), SerializeError> {
        let end = self.pos + bytes.len();
        if end > self.buf.len() {
            return Err(SerializeError::BufferTooSmall);
        }
        self.buf[self.pos..end].copy_from_slice(bytes);
        self.pos = end;
        Ok(())
    }

    #[inline]
    fn remaining(&self) -> Option<usize> {
        Some(self.buf.len() - self.pos)
    }
}

/// Sink adapter for `core::fmt::Write`.
///
/// Valid UTF-8 runs are written as text; other bytes are written one
/// `char` per byte.
pub struct FmtSink<W>(pub W);

impl<W: fmt::Write> Sink for FmtSink<W> {
    #[inline]
    fn put(&mut self, byte: u8) -> Result<(), SerializeError> {
        self.0
            .write_char(char::from(byte))
            .map_err(|_| SerializeError::WriteError)
    }

    fn put_slice(&mut self, bytes: &[u8]) -> Result<(), SerializeError> {
        match core::str::from_utf8(bytes) {
            Ok(s) => self.0.write_str(s).map_err(|_| SerializeError::WriteError),
            Err(_) => bytes.iter().try_for_each(|&b| self.put(b)),
        }
    }
}

/// Sink calling a putc-style function for every byte.
///
/// # Example
///
/// ```
/// use mcu_msg::{FnSink, Sink};
///
/// let mut count = 0;
/// let mut sink = FnSink(|_byte: u8| count += 1);
/// sink.put_slice(b"<CMD>").unwrap();
/// drop(sink);
/// assert_eq!(count, 5);
/// ```
pub struct FnSink<F>(pub F);

impl<F: FnMut(u8)> Sink for FnSink<F> {
    #[inline]
    fn put(&mut self, byte: u8) -> Result<(), SerializeError> {
        (self.0)(byte);
        Ok(())
    }
}

/// Sink adapter for `embedded_io::Write` (UART or other I/O peripherals).
#[cfg(feature = "embedded-io")]
pub struct IoSink<W>(pub W);

#[cfg(feature = "embedded-io")]
impl<W: embedded_io::Write> Sink for IoSink<W> {
    #[inline]
    fn put(&mut self, byte: u8) -> Result<(), SerializeError> {
        self.put_slice(&[byte])
    }

    fn put_slice(&mut self, bytes: &[u8]) -> Result<(), SerializeError> {
        self.0
            .write_all(bytes)
            .map_err(|_| SerializeError::WriteError)
    }
}

#[cfg(feature = "heapless")]
impl<const N: usize> Sink for heapless::Vec<u8, N> {
    #[inline]
    fn put(&mut self, byte: u8) -> Result<(), SerializeError> {
        self.push(byte).map_err(|_| SerializeError::BufferTooSmall)
    }

    fn put_slice(&mut self, bytes: &[u8]) -> Result<(), SerializeError> {
        self.extend_from_slice(bytes)
            .map_err(|_| SerializeError::BufferTooSmall)
    }

    #[inline]
    fn remaining(&self) -> Option<usize> {
        Some(N - self.len())
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use std::string::String;
    use std::vec::Vec;

    #[test]
    fn test_slice_writer_fills_exactly() {
        let mut buf = [0u8; 3];
        let mut w = SliceWriter::new(&mut buf);
        w.put(b'a').unwrap();
        w.put_slice(b"bc").unwrap();
        assert_eq!(w.remaining(), Some(0));
        assert_eq!(w.put(b'd'), Err(SerializeError::BufferTooSmall));
        assert_eq!(w.into_written(), b"abc");
    }

    #[test]
    fn test_slice_writer_put_slice_is_atomic() {
        let mut buf = [0u8; 4];
        let mut w = SliceWriter::new(&mut buf);
        w.put_slice(b"ab").unwrap();
        assert_eq!(w.put_slice(b"cde"), Err(SerializeError::BufferTooSmall));
        assert_eq!(w.position(), 2);
        w.reset();
        assert!(w.written().is_empty());
    }

    #[test]
    fn test_fmt_sink() {
        let mut s = String::new();
        let mut sink = FmtSink(&mut s);
        sink.put_slice(b"#m{").unwrap();
        sink.put(b'}').unwrap();
        assert_eq!(s, "#m{}");
    }

    #[test]
    fn test_fn_sink() {
        let mut out = Vec::new();
        FnSink(|b: u8| out.push(b)).put_slice(b"@o()").unwrap();
        assert_eq!(out, b"@o()");
    }

    #[test]
    fn test_mut_ref_sink() {
        fn emit<S: Sink>(mut sink: S) {
            sink.put_slice(b"<x>").unwrap();
        }
        let mut buf = [0u8; 8];
        let mut w = SliceWriter::new(&mut buf);
        emit(&mut w);
        assert_eq!(w.written(), b"<x>");
    }

    #[cfg(feature = "heapless")]
    #[test]
    fn test_heapless_vec_sink() {
        let mut v: heapless::Vec<u8, 4> = heapless::Vec::new();
        v.put_slice(b"abc").unwrap();
        assert_eq!(v.remaining(), Some(1));
        assert_eq!(v.put_slice(b"de"), Err(SerializeError::BufferTooSmall));
        v.put(b'd').unwrap();
        assert_eq!(v.put(b'e'), Err(SerializeError::BufferTooSmall));
    }
}
