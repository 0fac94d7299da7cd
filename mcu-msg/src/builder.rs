//! Builder pattern API for constructing document messages.
//!
//! This module provides a fluent API over the [`Document`] constructors and
//! mutators, so a message can be assembled without juggling handles.
//!
//! # Example
//!
//! ```
//! use mcu_msg::{Document, MessageBuilder, Serialize};
//!
//! let mut doc: Document<16> = Document::new();
//! let msg = MessageBuilder::new(&mut doc, "status")?
//!     .command("PING")?
//!     .object("led", |o| {
//!         o.int("on", 1)?.float("duty", 0.25, 2)?.string("color", "red")?;
//!         Ok(())
//!     })?
//!     .finish();
//!
//! let mut buf = [0u8; 64];
//! let len = doc.message_ref(msg).unwrap().serialize(&mut buf).unwrap();
//! assert_eq!(&buf[..len], b"#status{<PING>@led($on=1;$duty=0.25;$color=\"red\")}");
//! # Ok::<(), mcu_msg::DocError>(())
//! ```

use crate::doc::{DocError, DocMessage, DocObject, Document, Handle};

/// Builder for a message node.
///
/// Created via [`MessageBuilder::new()`]. Each step creates the node and
/// links it immediately, so a failed step leaves everything added before it
/// in place.
pub struct MessageBuilder<'d, const N: usize> {
    doc: &'d mut Document<N>,
    message: Handle<DocMessage>,
}

impl<'d, const N: usize> MessageBuilder<'d, N> {
    /// Create the message node and start building it.
    ///
    /// # Errors
    ///
    /// Same as [`Document::create_message`].
    pub fn new(doc: &'d mut Document<N>, id: &str) -> Result<Self, DocError> {
        let message = doc.create_message(id)?;
        Ok(Self { doc, message })
    }

    /// Continue building an existing message.
    pub fn edit(doc: &'d mut Document<N>, message: Handle<DocMessage>) -> Self {
        Self { doc, message }
    }

    /// Append a command.
    ///
    /// # Errors
    ///
    /// Invalid name or full command list.
    pub fn command(&mut self, name: &str) -> Result<&mut Self, DocError> {
        let command = self.doc.create_command(name)?;
        self.doc.add_command_to_message(self.message, command)?;
        Ok(self)
    }

    /// Append an object whose fields are added by `fill`.
    ///
    /// The object is linked to the message only if `fill` succeeds.
    ///
    /// # Errors
    ///
    /// Invalid id, full object list, or the first error returned by `fill`.
    pub fn object<F>(&mut self, id: &str, fill: F) -> Result<&mut Self, DocError>
    where
        F: FnOnce(&mut ObjectBuilder<'_, N>) -> Result<(), DocError>,
    {
        let object = self.doc.create_object(id)?;
        fill(&mut ObjectBuilder {
            doc: &mut *self.doc,
            object,
        })?;
        self.doc.add_object_to_message(self.message, object)?;
        Ok(self)
    }

    /// Handle of the message being built.
    #[must_use]
    pub fn finish(&self) -> Handle<DocMessage> {
        self.message
    }
}

/// Builder for the fields of one object.
///
/// Handed to the closure of [`MessageBuilder::object()`].
pub struct ObjectBuilder<'d, const N: usize> {
    doc: &'d mut Document<N>,
    object: Handle<DocObject>,
}

impl<const N: usize> ObjectBuilder<'_, N> {
    /// Append an integer field.
    ///
    /// # Errors
    ///
    /// Invalid id or full integer list.
    pub fn int(&mut self, id: &str, value: i32) -> Result<&mut Self, DocError> {
        let field = self.doc.create_int(id, value)?;
        self.doc.add_int_to_object(self.object, field)?;
        Ok(self)
    }

    /// Append a float field rendered with `precision` fractional digits.
    ///
    /// # Errors
    ///
    /// Invalid id or full float list.
    pub fn float(&mut self, id: &str, value: f32, precision: u8) -> Result<&mut Self, DocError> {
        let field = self.doc.create_float(id, value, precision)?;
        self.doc.add_float_to_object(self.object, field)?;
        Ok(self)
    }

    /// Append a string field.
    ///
    /// # Errors
    ///
    /// Invalid id, unquotable content, or full string list.
    pub fn string(&mut self, id: &str, content: &str) -> Result<&mut Self, DocError> {
        let field = self.doc.create_string(id, content)?;
        self.doc.add_string_to_object(self.object, field)?;
        Ok(self)
    }

    /// Handle of the object being built.
    #[must_use]
    pub fn handle(&self) -> Handle<DocObject> {
        self.object
    }
}
