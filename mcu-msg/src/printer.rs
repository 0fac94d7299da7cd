//! Print handler: a live sink with optional redirection into a buffer.
//!
//! [`Printer`] wraps the sink that normally receives output (a UART, a
//! putc callback) and can temporarily redirect everything it prints into a
//! caller-provided buffer, e.g. to assemble a message before handing it to
//! a DMA transfer.
//!
//! # Example
//!
//! ```
//! use mcu_msg::{get_message, FnSink, Printer};
//!
//! let mut uart = [0u8; 32];
//! let mut sent = 0;
//! let mut printer = Printer::new(FnSink(|b: u8| {
//!     uart[sent] = b;
//!     sent += 1;
//! }));
//!
//! let mut staging = [0u8; 16];
//! printer.begin_buffer(&mut staging);
//! printer.print_int(-42).unwrap();
//! let staged = printer.end_buffer().unwrap();
//! assert_eq!(staged, b"-42");
//!
//! let msg = get_message(b"#m{<GO>}", "m").unwrap();
//! printer.print_message(&msg).unwrap();
//! drop(printer);
//! assert_eq!(&uart[..sent], b"<GO>");
//! ```

use crate::fmt::{write_float, write_i32, MAX_FLOAT_LEN, MAX_INT_LEN};
use crate::parser::Message;
use crate::sink::{SerializeError, Sink, SliceWriter};
use crate::span::Span;

/// Print handler over a live sink `S`.
pub struct Printer<'b, S> {
    sink: S,
    buffer: Option<SliceWriter<'b>>,
}

impl<'b, S: Sink> Printer<'b, S> {
    /// Create a printer writing to `sink`.
    #[inline]
    pub fn new(sink: S) -> Self {
        Self { sink, buffer: None }
    }

    /// Redirect output into `buf` until [`Printer::end_buffer`].
    ///
    /// Replaces any buffer already active and returns what had been written
    /// to it.
    pub fn begin_buffer(&mut self, buf: &'b mut [u8]) -> Option<&'b [u8]> {
        debug!("redirect output to {}-byte buffer", buf.len());
        self.buffer
            .replace(SliceWriter::new(buf))
            .map(SliceWriter::into_written)
    }

    /// Stop redirecting and return the buffered bytes.
    ///
    /// Returns `None` if no buffer was active.
    pub fn end_buffer(&mut self) -> Option<&'b [u8]> {
        let written = self.buffer.take().map(SliceWriter::into_written);
        if let Some(bytes) = written {
            trace!("output buffer released with {} bytes", bytes.len());
        }
        written
    }

    /// Rewind the active buffer to its start. No effect on the live sink.
    pub fn reset_buffer(&mut self) {
        if let Some(writer) = self.buffer.as_mut() {
            writer.reset();
        }
    }

    /// Returns `true` while output goes to a buffer.
    #[inline]
    #[must_use]
    pub fn is_buffering(&self) -> bool {
        self.buffer.is_some()
    }

    /// Bytes buffered so far; empty when not buffering.
    #[must_use]
    pub fn buffered(&self) -> &[u8] {
        self.buffer.as_ref().map_or(&[][..], SliceWriter::written)
    }

    /// Print the bytes of a span.
    ///
    /// # Errors
    ///
    /// Propagates sink errors.
    pub fn print_span(&mut self, span: Span<'_>) -> Result<(), SerializeError> {
        self.put_slice(span.as_bytes())
    }

    /// Print the body of a parsed message, without its `#id{` `}` frame.
    ///
    /// # Errors
    ///
    /// Propagates sink errors.
    pub fn print_message(&mut self, message: &Message<'_>) -> Result<(), SerializeError> {
        self.print_span(message.body)
    }

    /// Print an integer in decimal.
    ///
    /// # Errors
    ///
    /// Propagates sink errors.
    pub fn print_int(&mut self, value: i32) -> Result<(), SerializeError> {
        let mut tmp = [0u8; MAX_INT_LEN];
        let len = write_i32(&mut tmp, value);
        self.put_slice(&tmp[..len])
    }

    /// Print a float with `precision` fractional digits.
    ///
    /// # Errors
    ///
    /// [`SerializeError::InvalidFloat`] for NaN, infinities and values too
    /// large to render; otherwise propagates sink errors.
    pub fn print_float(&mut self, value: f32, precision: u8) -> Result<(), SerializeError> {
        let mut tmp = [0u8; MAX_FLOAT_LEN];
        let len = write_float(&mut tmp, value, precision).ok_or(SerializeError::InvalidFloat)?;
        self.put_slice(&tmp[..len])
    }

    /// Render a document view.
    ///
    /// # Errors
    ///
    /// See [`Serialize::render`](crate::Serialize::render).
    #[cfg(feature = "wrapper")]
    pub fn print<T: crate::Serialize + ?Sized>(&mut self, item: &T) -> Result<(), SerializeError> {
        item.render(self)
    }

    /// Access the live sink.
    #[inline]
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Release the live sink. An active buffer is dropped.
    #[inline]
    pub fn into_inner(self) -> S {
        self.sink
    }
}

impl<S: Sink> Sink for Printer<'_, S> {
    #[inline]
    fn put(&mut self, byte: u8) -> Result<(), SerializeError> {
        match self.buffer.as_mut() {
            Some(writer) => writer.put(byte),
            None => self.sink.put(byte),
        }
    }

    fn put_slice(&mut self, bytes: &[u8]) -> Result<(), SerializeError> {
        match self.buffer.as_mut() {
            Some(writer) => writer.put_slice(bytes),
            None => self.sink.put_slice(bytes),
        }
    }

    fn remaining(&self) -> Option<usize> {
        match self.buffer.as_ref() {
            Some(writer) => writer.remaining(),
            None => self.sink.remaining(),
        }
    }
}
