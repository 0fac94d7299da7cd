//! Read-side facade: messages, objects, commands and typed fields.
//!
//! ```text
//! #test_msg{<CMD1> @obj1($key11=-1123334567; $key12='string "value"') @obj2($key21=-1.123456789)}
//! ```
//!
//! Every lookup is a fresh, stateless scan of a caller-owned buffer. Nothing
//! is allocated or copied; failures are returned as [`ParseError`] and never
//! panic, whatever the buffer contains.

use core::fmt;

use crate::charset::{
    CMD_START, CMD_STOP, MSG_FLAG, MSG_START, MSG_STOP, OBJ_FLAG, OBJ_START, OBJ_STOP,
};
use crate::decode::{decode_float, decode_int, decode_string, ParsedFloat, ParsedInt};
use crate::scanner::{find_closing, find_keyword, find_value, locate_keyword};
use crate::span::Span;

/// Error type for lookups and value decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Message, object, command or key is absent.
    NotFound,
    /// Value is present but violates the number or string grammar.
    Malformed,
    /// Number does not fit an `i32` or an `f32`.
    Overflow,
    /// A body or string was opened but never closed.
    Unterminated,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "not found"),
            Self::Malformed => write!(f, "malformed value"),
            Self::Overflow => write!(f, "number out of range"),
            Self::Unterminated => write!(f, "unterminated body or string"),
        }
    }
}

/// A `#id{...}` message found in a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Message<'a> {
    /// The message identifier.
    pub id: Span<'a>,
    /// Everything between `{` and the closing `}`.
    pub body: Span<'a>,
}

/// An `@id(...)` object found in a message body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Object<'a> {
    /// The object identifier.
    pub id: Span<'a>,
    /// Everything between `(` and the closing `)`.
    pub body: Span<'a>,
}

/// A `<name>` command found in a message body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Command<'a> {
    /// The command name, without `<` and `>`.
    pub name: Span<'a>,
}

/// Locate `flag id stop ... close` inside `haystack` and return `(id, body)`.
fn find_block<'a>(
    haystack: Span<'a>,
    id: &str,
    flag: u8,
    open: u8,
    close: u8,
) -> Result<(Span<'a>, Span<'a>), ParseError> {
    let (ident, open_pos) =
        locate_keyword(haystack, id.as_bytes(), flag, open).ok_or(ParseError::NotFound)?;
    let buf = haystack.buffer();
    let close_pos =
        find_closing(buf, open_pos + 1, haystack.end(), close).ok_or(ParseError::Unterminated)?;
    Ok((ident, Span::between(buf, open_pos + 1, close_pos)))
}

/// Find the message `#id{...}` in `buf`.
///
/// The body ends at the first `}` outside a quoted string; braces do not
/// nest.
///
/// # Errors
///
/// - [`ParseError::NotFound`] if no `#id{` exists.
/// - [`ParseError::Unterminated`] if the closing `}` is missing.
///
/// # Example
///
/// ```
/// use mcu_msg::get_message;
///
/// let buf = b"#status{<PING> @led($on=1)}";
/// let msg = get_message(buf, "status").unwrap();
/// assert_eq!(msg.body, "<PING> @led($on=1)");
/// assert!(msg.has_command("PING"));
/// ```
pub fn get_message<'a>(buf: &'a [u8], id: &str) -> Result<Message<'a>, ParseError> {
    let (id, body) = find_block(Span::full(buf), id, MSG_FLAG, MSG_START, MSG_STOP)?;
    Ok(Message { id, body })
}

impl<'a> Message<'a> {
    /// Find the object `@id(...)` in this message.
    ///
    /// # Errors
    ///
    /// - [`ParseError::NotFound`] if no `@id(` exists in the body.
    /// - [`ParseError::Unterminated`] if the closing `)` is missing.
    pub fn get_object(&self, id: &str) -> Result<Object<'a>, ParseError> {
        let (id, body) = find_block(self.body, id, OBJ_FLAG, OBJ_START, OBJ_STOP)?;
        Ok(Object { id, body })
    }

    /// Find the command `<name>` in this message.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::NotFound`] if the command is absent.
    pub fn get_command(&self, name: &str) -> Result<Command<'a>, ParseError> {
        find_keyword(self.body, name, CMD_START, CMD_STOP)
            .map(|name| Command { name })
            .ok_or(ParseError::NotFound)
    }

    /// Returns `true` if the command `<name>` is attached to this message.
    #[inline]
    #[must_use]
    pub fn has_command(&self, name: &str) -> bool {
        self.get_command(name).is_ok()
    }
}

impl<'a> Object<'a> {
    /// Raw, undecoded value text of `$key=`.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::NotFound`] if the key is absent.
    pub fn get_raw(&self, key: &str) -> Result<Span<'a>, ParseError> {
        find_value(self.body, key).ok_or(ParseError::NotFound)
    }

    /// Decode `$key=` as an integer.
    ///
    /// # Errors
    ///
    /// [`ParseError::NotFound`], [`ParseError::Malformed`] or
    /// [`ParseError::Overflow`].
    pub fn get_int(&self, key: &str) -> Result<i32, ParseError> {
        self.get_int_digits(key).map(|parsed| parsed.value)
    }

    /// Decode `$key=` as an integer, keeping the digit count.
    ///
    /// # Errors
    ///
    /// Same as [`Object::get_int`].
    pub fn get_int_digits(&self, key: &str) -> Result<ParsedInt, ParseError> {
        decode_int(self.get_raw(key)?.as_bytes())
    }

    /// Decode `$key=` as a float.
    ///
    /// # Errors
    ///
    /// [`ParseError::NotFound`], [`ParseError::Malformed`] or
    /// [`ParseError::Overflow`].
    pub fn get_float(&self, key: &str) -> Result<f32, ParseError> {
        self.get_float_precision(key).map(|parsed| parsed.value)
    }

    /// Decode `$key=` as a float, keeping digit count and precision.
    ///
    /// # Errors
    ///
    /// Same as [`Object::get_float`].
    pub fn get_float_precision(&self, key: &str) -> Result<ParsedFloat, ParseError> {
        decode_float(self.get_raw(key)?.as_bytes())
    }

    /// Decode `$key=` as a quoted string and return its unquoted content.
    ///
    /// # Errors
    ///
    /// [`ParseError::NotFound`], [`ParseError::Malformed`] if the value is
    /// not quoted, or [`ParseError::Unterminated`].
    pub fn get_string(&self, key: &str) -> Result<Span<'a>, ParseError> {
        decode_string(self.body, self.get_raw(key)?)
    }
}
