//! Rendering of document messages to the wire format.
//!
//! # Wire Format
//!
//! ```text
//! #<id>{<CMD>...@<obj>($int=1;$float=1.50;$str="text")...}
//! ```
//!
//! - Commands come first, then objects, each in insertion order.
//! - Object fields are grouped: integers, then floats, then strings.
//! - `;` separates consecutive fields, also across groups. There is no
//!   leading or trailing separator, so an empty group leaves no trace.
//! - Strings are quoted with `"`, or with `'` when the content holds a `"`.
//!
//! # Example
//!
//! ```
//! use mcu_msg::{Document, Serialize};
//!
//! let mut doc: Document<8> = Document::new();
//! let msg = doc.create_message("m").unwrap();
//! let obj = doc.create_object("o").unwrap();
//! let f = doc.create_float("f", 1.5, 2).unwrap();
//! let s = doc.create_string("s", "hi").unwrap();
//! doc.add_float_to_object(obj, f).unwrap();
//! doc.add_string_to_object(obj, s).unwrap();
//! doc.add_object_to_message(msg, obj).unwrap();
//!
//! let mut buf = [0u8; 64];
//! let len = doc.message_ref(msg).unwrap().serialize(&mut buf).unwrap();
//! assert_eq!(&buf[..len], b"#m{@o($f=1.50;$s=\"hi\")}");
//! ```

use crate::charset::{
    CMD_START, CMD_STOP, DOUBLE_QUOTE, KEY_EQU, KEY_FLAG, KEY_SEP, MSG_FLAG, MSG_START,
    MSG_STOP, OBJ_FLAG, OBJ_START, OBJ_STOP, SINGLE_QUOTE,
};
use crate::doc::{DocCommand, DocMessage, DocObject, Document, Handle};
use crate::fmt::{write_float, write_i32, MAX_FLOAT_LEN, MAX_INT_LEN};
use crate::sink::{FmtSink, SerializeError, Sink, SliceWriter};

/// Extension trait for rendering document views.
///
/// Implementors provide [`Serialize::render`]; the remaining methods pick a
/// destination and delegate to it.
pub trait Serialize {
    /// Render into any [`Sink`].
    ///
    /// # Errors
    ///
    /// Propagates sink errors; [`SerializeError::InvalidFloat`] for a float
    /// field that cannot be rendered.
    fn render<S: Sink + ?Sized>(&self, sink: &mut S) -> Result<(), SerializeError>;

    /// Serialize to the provided buffer.
    ///
    /// Returns the number of bytes written on success.
    ///
    /// # Errors
    ///
    /// Returns [`SerializeError::BufferTooSmall`] if the buffer is not large enough.
    fn serialize(&self, buf: &mut [u8]) -> Result<usize, SerializeError> {
        let mut writer = SliceWriter::new(buf);
        self.render(&mut writer)?;
        Ok(writer.position())
    }

    /// Serialize to a `core::fmt::Write` implementation.
    ///
    /// This can be used with types like `heapless::String`.
    ///
    /// # Errors
    ///
    /// Returns [`SerializeError::WriteError`] if the write fails.
    fn serialize_fmt<W: core::fmt::Write>(&self, writer: &mut W) -> Result<(), SerializeError> {
        self.render(&mut FmtSink(writer))
    }

    /// Serialize to a `heapless::Vec`.
    ///
    /// # Errors
    ///
    /// Returns [`SerializeError::BufferTooSmall`] if `M` is not large enough.
    #[cfg(feature = "heapless")]
    fn serialize_to_vec<const M: usize>(&self) -> Result<heapless::Vec<u8, M>, SerializeError> {
        let mut vec = heapless::Vec::new();
        self.render(&mut vec)?;
        Ok(vec)
    }

    /// Serialize to an `embedded_io::Write` implementation.
    ///
    /// This can be used with UART or other I/O peripherals.
    ///
    /// # Errors
    ///
    /// Returns [`SerializeError::WriteError`] if the write fails.
    #[cfg(feature = "embedded-io")]
    fn serialize_io<W: embedded_io::Write>(&self, writer: &mut W) -> Result<(), SerializeError> {
        self.render(&mut crate::sink::IoSink(writer))
    }
}

/// A message node together with the document that holds its children.
#[derive(Clone, Copy)]
pub struct MessageRef<'d, const N: usize> {
    doc: &'d Document<N>,
    node: &'d DocMessage,
}

/// An object node together with the document that holds its fields.
#[derive(Clone, Copy)]
pub struct ObjectRef<'d, const N: usize> {
    doc: &'d Document<N>,
    node: &'d DocObject,
}

/// A command node.
#[derive(Clone, Copy)]
pub struct CommandRef<'d> {
    node: &'d DocCommand,
}

impl<'d, const N: usize> MessageRef<'d, N> {
    #[inline]
    #[must_use]
    pub fn node(&self) -> &'d DocMessage {
        self.node
    }
}

impl<'d, const N: usize> ObjectRef<'d, N> {
    #[inline]
    #[must_use]
    pub fn node(&self) -> &'d DocObject {
        self.node
    }
}

impl<'d> CommandRef<'d> {
    #[inline]
    #[must_use]
    pub fn node(&self) -> &'d DocCommand {
        self.node
    }
}

impl<const N: usize> Document<N> {
    /// Serializable view of a message, or `None` for a stale handle.
    #[must_use]
    pub fn message_ref(&self, handle: Handle<DocMessage>) -> Option<MessageRef<'_, N>> {
        self.message(handle).map(|node| MessageRef { doc: self, node })
    }

    /// Serializable view of an object, or `None` for a stale handle.
    #[must_use]
    pub fn object_ref(&self, handle: Handle<DocObject>) -> Option<ObjectRef<'_, N>> {
        self.object(handle).map(|node| ObjectRef { doc: self, node })
    }

    /// Serializable view of a command, or `None` for a stale handle.
    #[must_use]
    pub fn command_ref(&self, handle: Handle<DocCommand>) -> Option<CommandRef<'_>> {
        self.command(handle).map(|node| CommandRef { node })
    }
}

impl<const N: usize> Serialize for MessageRef<'_, N> {
    fn render<S: Sink + ?Sized>(&self, sink: &mut S) -> Result<(), SerializeError> {
        render_message(self.doc, self.node, sink)
    }
}

impl<const N: usize> Serialize for ObjectRef<'_, N> {
    fn render<S: Sink + ?Sized>(&self, sink: &mut S) -> Result<(), SerializeError> {
        render_object(self.doc, self.node, sink)
    }
}

impl Serialize for CommandRef<'_> {
    fn render<S: Sink + ?Sized>(&self, sink: &mut S) -> Result<(), SerializeError> {
        render_command(self.node, sink)
    }
}

/// Render `#id{<commands>...<objects>...}`.
///
/// # Errors
///
/// See [`Serialize::render`].
pub fn render_message<const N: usize, S: Sink + ?Sized>(
    doc: &Document<N>,
    message: &DocMessage,
    sink: &mut S,
) -> Result<(), SerializeError> {
    trace!("render message {}", message.id());

    sink.put(MSG_FLAG)?;
    sink.put_slice(message.id().as_bytes())?;
    sink.put(MSG_START)?;

    for command in message.commands().iter().filter_map(|&h| doc.command(h)) {
        render_command(command, sink)?;
    }
    for object in message.objects().iter().filter_map(|&h| doc.object(h)) {
        render_object(doc, object, sink)?;
    }

    sink.put(MSG_STOP)
}

/// Render `@id(fields)`.
///
/// # Errors
///
/// See [`Serialize::render`].
pub fn render_object<const N: usize, S: Sink + ?Sized>(
    doc: &Document<N>,
    object: &DocObject,
    sink: &mut S,
) -> Result<(), SerializeError> {
    sink.put(OBJ_FLAG)?;
    sink.put_slice(object.id().as_bytes())?;
    sink.put(OBJ_START)?;

    let mut fields = FieldWriter { sink, first: true };

    for int in object.ints().iter().filter_map(|&h| doc.int(h)) {
        let mut tmp = [0u8; MAX_INT_LEN];
        let len = write_i32(&mut tmp, int.value());
        fields.field(int.id(), &[&tmp[..len]])?;
    }

    for float in object.floats().iter().filter_map(|&h| doc.float(h)) {
        let mut tmp = [0u8; MAX_FLOAT_LEN];
        let Some(len) = write_float(&mut tmp, float.value(), float.precision()) else {
            warn!("float field {} cannot be rendered", float.id());
            return Err(SerializeError::InvalidFloat);
        };
        fields.field(float.id(), &[&tmp[..len]])?;
    }

    for string in object.strings().iter().filter_map(|&h| doc.string(h)) {
        let content = string.content().as_bytes();
        let quote = [quote_for(content)];
        fields.field(string.id(), &[&quote[..], content, &quote[..]])?;
    }

    fields.sink.put(OBJ_STOP)
}

/// Render `<name>`. Names are never empty: [`Document::create_command`]
/// rejects them.
///
/// # Errors
///
/// Propagates sink errors.
pub fn render_command<S: Sink + ?Sized>(
    command: &DocCommand,
    sink: &mut S,
) -> Result<(), SerializeError> {
    sink.put(CMD_START)?;
    sink.put_slice(command.name().as_bytes())?;
    sink.put(CMD_STOP)
}

/// Quote character that does not occur in `content`.
fn quote_for(content: &[u8]) -> u8 {
    if content.contains(&DOUBLE_QUOTE) {
        SINGLE_QUOTE
    } else {
        DOUBLE_QUOTE
    }
}

/// Emits `$id=value` entries with a separator before all but the first.
struct FieldWriter<'s, S: Sink + ?Sized> {
    sink: &'s mut S,
    first: bool,
}

impl<S: Sink + ?Sized> FieldWriter<'_, S> {
    fn field(&mut self, id: &str, value: &[&[u8]]) -> Result<(), SerializeError> {
        if !core::mem::replace(&mut self.first, false) {
            self.sink.put(KEY_SEP)?;
        }
        self.sink.put(KEY_FLAG)?;
        self.sink.put_slice(id.as_bytes())?;
        self.sink.put(KEY_EQU)?;
        for part in value {
            self.sink.put_slice(part)?;
        }
        Ok(())
    }
}
