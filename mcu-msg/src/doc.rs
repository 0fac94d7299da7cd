//! Document model: the owned, mutable tree the serializer renders.
//!
//! Nodes live in a fixed-capacity arena ([`Document`]) and are addressed by
//! typed [`Handle`]s. Parents hold ordered lists of handles; adding appends
//! to the tail, removing unlinks by handle identity (two nodes with equal
//! content are still distinct). Nodes are never freed individually, so a
//! handle stays valid until [`Document::clear`].
//!
//! A node can sit in at most one list at a time. Removing it clears the link
//! and lets it be added again, to the same parent or another one.

use core::fmt;
use core::marker::PhantomData;

use heapless::{String, Vec};

use crate::charset::{is_identifier, DOUBLE_QUOTE, SINGLE_QUOTE};

/// Longest identifier a node can carry.
pub const MAX_ID_LEN: usize = 16;

/// Longest string field content.
pub const MAX_STRING_LEN: usize = 64;

/// Entries per ordered list (commands, objects, ints, floats, strings).
pub const MAX_CHILDREN: usize = 16;

type Id = String<MAX_ID_LEN>;
type Children<T> = Vec<Handle<T>, MAX_CHILDREN>;

/// Error type for document construction and mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DocError {
    /// The arena, a child list, or a string buffer is full.
    CapacityExceeded,
    /// Identifier is empty or contains characters outside `[A-Za-z0-9_]`.
    InvalidIdentifier,
    /// String content contains both quote characters and cannot be quoted.
    InvalidString,
    /// The node is already in a list.
    AlreadyLinked,
    /// The handle does not refer to a node of the expected kind.
    InvalidHandle,
}

impl fmt::Display for DocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CapacityExceeded => write!(f, "capacity exceeded"),
            Self::InvalidIdentifier => write!(f, "invalid identifier"),
            Self::InvalidString => write!(f, "string contains both quote characters"),
            Self::AlreadyLinked => write!(f, "node already linked"),
            Self::InvalidHandle => write!(f, "invalid handle"),
        }
    }
}

/// Typed index of a node inside a [`Document`].
pub struct Handle<T> {
    index: u16,
    _kind: PhantomData<fn() -> T>,
}

impl<T> Handle<T> {
    #[inline]
    const fn new(index: u16) -> Self {
        Self {
            index,
            _kind: PhantomData,
        }
    }

    /// Arena slot of the node.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u16 {
        self.index
    }
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl<T> Eq for Handle<T> {}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({})", self.index)
    }
}

#[cfg(feature = "defmt")]
impl<T> defmt::Format for Handle<T> {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Handle({})", self.index)
    }
}

/// A `#id{...}` message: commands first, then objects.
#[derive(Debug, Clone)]
pub struct DocMessage {
    id: Id,
    commands: Children<DocCommand>,
    objects: Children<DocObject>,
}

impl DocMessage {
    #[inline]
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[inline]
    #[must_use]
    pub fn commands(&self) -> &[Handle<DocCommand>] {
        &self.commands
    }

    #[inline]
    #[must_use]
    pub fn objects(&self) -> &[Handle<DocObject>] {
        &self.objects
    }
}

/// An `@id(...)` object with its integer, float and string fields.
#[derive(Debug, Clone)]
pub struct DocObject {
    id: Id,
    ints: Children<DocInt>,
    floats: Children<DocFloat>,
    strings: Children<DocString>,
    linked: bool,
}

impl DocObject {
    #[inline]
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[inline]
    #[must_use]
    pub fn ints(&self) -> &[Handle<DocInt>] {
        &self.ints
    }

    #[inline]
    #[must_use]
    pub fn floats(&self) -> &[Handle<DocFloat>] {
        &self.floats
    }

    #[inline]
    #[must_use]
    pub fn strings(&self) -> &[Handle<DocString>] {
        &self.strings
    }

    /// Returns `true` if the object has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ints.is_empty() && self.floats.is_empty() && self.strings.is_empty()
    }
}

/// A `<name>` command.
#[derive(Debug, Clone)]
pub struct DocCommand {
    name: Id,
    linked: bool,
}

impl DocCommand {
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// An integer field `$id=value`.
#[derive(Debug, Clone)]
pub struct DocInt {
    id: Id,
    value: i32,
    linked: bool,
}

impl DocInt {
    #[inline]
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[inline]
    #[must_use]
    pub fn value(&self) -> i32 {
        self.value
    }

    #[inline]
    pub fn set_value(&mut self, value: i32) {
        self.value = value;
    }
}

/// A float field `$id=value`, rendered with `precision` fractional digits.
#[derive(Debug, Clone)]
pub struct DocFloat {
    id: Id,
    value: f32,
    precision: u8,
    linked: bool,
}

impl DocFloat {
    #[inline]
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[inline]
    #[must_use]
    pub fn value(&self) -> f32 {
        self.value
    }

    #[inline]
    #[must_use]
    pub fn precision(&self) -> u8 {
        self.precision
    }

    #[inline]
    pub fn set_value(&mut self, value: f32) {
        self.value = value;
    }

    #[inline]
    pub fn set_precision(&mut self, precision: u8) {
        self.precision = precision;
    }
}

/// A string field `$id="content"`.
#[derive(Debug, Clone)]
pub struct DocString {
    id: Id,
    content: String<MAX_STRING_LEN>,
    linked: bool,
}

impl DocString {
    #[inline]
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[inline]
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Replace the content.
    ///
    /// # Errors
    ///
    /// [`DocError::InvalidString`] or [`DocError::CapacityExceeded`]; the
    /// old content is kept on error.
    pub fn set_content(&mut self, content: &str) -> Result<(), DocError> {
        self.content = make_content(content)?;
        Ok(())
    }
}

fn make_id(id: &str) -> Result<Id, DocError> {
    if !is_identifier(id) {
        return Err(DocError::InvalidIdentifier);
    }
    let mut s = Id::new();
    s.push_str(id).map_err(|_| DocError::CapacityExceeded)?;
    Ok(s)
}

fn make_content(content: &str) -> Result<String<MAX_STRING_LEN>, DocError> {
    let bytes = content.as_bytes();
    if bytes.contains(&DOUBLE_QUOTE) && bytes.contains(&SINGLE_QUOTE) {
        return Err(DocError::InvalidString);
    }
    let mut s = String::new();
    s.push_str(content).map_err(|_| DocError::CapacityExceeded)?;
    Ok(s)
}

enum Node {
    Message(DocMessage),
    Object(DocObject),
    Command(DocCommand),
    Int(DocInt),
    Float(DocFloat),
    Str(DocString),
}

/// Conversion between a node kind and the arena's storage enum.
trait Kind: Sized {
    fn wrap(self) -> Node;
    fn peek(node: &Node) -> Option<&Self>;
    fn peek_mut(node: &mut Node) -> Option<&mut Self>;
}

/// Nodes that live in a parent's list.
trait Linkable: Kind {
    fn linked(&self) -> bool;
    fn set_linked(&mut self, linked: bool);
}

macro_rules! node_kind {
    ($ty:ty, $variant:ident) => {
        impl Kind for $ty {
            #[inline]
            fn wrap(self) -> Node {
                Node::$variant(self)
            }

            #[inline]
            fn peek(node: &Node) -> Option<&Self> {
                match node {
                    Node::$variant(n) => Some(n),
                    _ => None,
                }
            }

            #[inline]
            fn peek_mut(node: &mut Node) -> Option<&mut Self> {
                match node {
                    Node::$variant(n) => Some(n),
                    _ => None,
                }
            }
        }
    };
    ($ty:ty, $variant:ident, linkable) => {
        node_kind!($ty, $variant);

        impl Linkable for $ty {
            #[inline]
            fn linked(&self) -> bool {
                self.linked
            }

            #[inline]
            fn set_linked(&mut self, linked: bool) {
                self.linked = linked;
            }
        }
    };
}

node_kind!(DocMessage, Message);
node_kind!(DocObject, Object, linkable);
node_kind!(DocCommand, Command, linkable);
node_kind!(DocInt, Int, linkable);
node_kind!(DocFloat, Float, linkable);
node_kind!(DocString, Str, linkable);

/// Fixed-capacity arena holding up to `N` nodes of any kind.
///
/// # Example
///
/// ```
/// use mcu_msg::Document;
///
/// let mut doc: Document<8> = Document::new();
/// let msg = doc.create_message("status").unwrap();
/// let obj = doc.create_object("led").unwrap();
/// let on = doc.create_int("on", 1).unwrap();
/// doc.add_int_to_object(obj, on).unwrap();
/// doc.add_object_to_message(msg, obj).unwrap();
///
/// assert_eq!(doc.message(msg).unwrap().objects(), &[obj]);
/// assert!(doc.remove_int_from_object(obj, on));
/// assert!(!doc.remove_int_from_object(obj, on));
/// ```
pub struct Document<const N: usize> {
    nodes: Vec<Node, N>,
}

impl<const N: usize> Default for Document<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> Document<N> {
    /// Create an empty document.
    #[must_use]
    pub const fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Number of nodes created so far.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Drop every node. All outstanding handles become invalid.
    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    fn insert<T: Kind>(&mut self, node: T) -> Result<Handle<T>, DocError> {
        let index = u16::try_from(self.nodes.len()).map_err(|_| DocError::CapacityExceeded)?;
        self.nodes
            .push(node.wrap())
            .map_err(|_| DocError::CapacityExceeded)?;
        Ok(Handle::new(index))
    }

    fn get<T: Kind>(&self, handle: Handle<T>) -> Option<&T> {
        self.nodes.get(usize::from(handle.index)).and_then(T::peek)
    }

    fn get_mut<T: Kind>(&mut self, handle: Handle<T>) -> Option<&mut T> {
        self.nodes
            .get_mut(usize::from(handle.index))
            .and_then(T::peek_mut)
    }

    // ---- constructors ----

    /// Create a message node.
    ///
    /// # Errors
    ///
    /// [`DocError::InvalidIdentifier`] or [`DocError::CapacityExceeded`].
    pub fn create_message(&mut self, id: &str) -> Result<Handle<DocMessage>, DocError> {
        let node = DocMessage {
            id: make_id(id)?,
            commands: Vec::new(),
            objects: Vec::new(),
        };
        let handle = self.insert(node)?;
        trace!("create message {}", id);
        Ok(handle)
    }

    /// Create an object node.
    ///
    /// # Errors
    ///
    /// [`DocError::InvalidIdentifier`] or [`DocError::CapacityExceeded`].
    pub fn create_object(&mut self, id: &str) -> Result<Handle<DocObject>, DocError> {
        self.insert(DocObject {
            id: make_id(id)?,
            ints: Vec::new(),
            floats: Vec::new(),
            strings: Vec::new(),
            linked: false,
        })
    }

    /// Create a command node.
    ///
    /// # Errors
    ///
    /// [`DocError::InvalidIdentifier`] or [`DocError::CapacityExceeded`].
    pub fn create_command(&mut self, name: &str) -> Result<Handle<DocCommand>, DocError> {
        self.insert(DocCommand {
            name: make_id(name)?,
            linked: false,
        })
    }

    /// Create an integer field.
    ///
    /// # Errors
    ///
    /// [`DocError::InvalidIdentifier`] or [`DocError::CapacityExceeded`].
    pub fn create_int(&mut self, id: &str, value: i32) -> Result<Handle<DocInt>, DocError> {
        self.insert(DocInt {
            id: make_id(id)?,
            value,
            linked: false,
        })
    }

    /// Create a float field rendered with `precision` fractional digits.
    ///
    /// # Errors
    ///
    /// [`DocError::InvalidIdentifier`] or [`DocError::CapacityExceeded`].
    pub fn create_float(
        &mut self,
        id: &str,
        value: f32,
        precision: u8,
    ) -> Result<Handle<DocFloat>, DocError> {
        self.insert(DocFloat {
            id: make_id(id)?,
            value,
            precision,
            linked: false,
        })
    }

    /// Create a string field.
    ///
    /// # Errors
    ///
    /// [`DocError::InvalidIdentifier`], [`DocError::InvalidString`] or
    /// [`DocError::CapacityExceeded`].
    pub fn create_string(
        &mut self,
        id: &str,
        content: &str,
    ) -> Result<Handle<DocString>, DocError> {
        self.insert(DocString {
            id: make_id(id)?,
            content: make_content(content)?,
            linked: false,
        })
    }

    // ---- accessors ----

    #[must_use]
    pub fn message(&self, handle: Handle<DocMessage>) -> Option<&DocMessage> {
        self.get(handle)
    }

    #[must_use]
    pub fn object(&self, handle: Handle<DocObject>) -> Option<&DocObject> {
        self.get(handle)
    }

    #[must_use]
    pub fn command(&self, handle: Handle<DocCommand>) -> Option<&DocCommand> {
        self.get(handle)
    }

    #[must_use]
    pub fn int(&self, handle: Handle<DocInt>) -> Option<&DocInt> {
        self.get(handle)
    }

    pub fn int_mut(&mut self, handle: Handle<DocInt>) -> Option<&mut DocInt> {
        self.get_mut(handle)
    }

    #[must_use]
    pub fn float(&self, handle: Handle<DocFloat>) -> Option<&DocFloat> {
        self.get(handle)
    }

    pub fn float_mut(&mut self, handle: Handle<DocFloat>) -> Option<&mut DocFloat> {
        self.get_mut(handle)
    }

    #[must_use]
    pub fn string(&self, handle: Handle<DocString>) -> Option<&DocString> {
        self.get(handle)
    }

    pub fn string_mut(&mut self, handle: Handle<DocString>) -> Option<&mut DocString> {
        self.get_mut(handle)
    }

    // ---- mutators ----

    fn append<P: Kind, C: Linkable>(
        &mut self,
        parent: Handle<P>,
        child: Handle<C>,
        list: fn(&mut P) -> &mut Children<C>,
    ) -> Result<(), DocError> {
        if self.get(child).ok_or(DocError::InvalidHandle)?.linked() {
            return Err(DocError::AlreadyLinked);
        }
        let parent_node = self.get_mut(parent).ok_or(DocError::InvalidHandle)?;
        list(parent_node)
            .push(child)
            .map_err(|_| DocError::CapacityExceeded)?;
        if let Some(node) = self.get_mut(child) {
            node.set_linked(true);
        }
        trace!("link node {} under {}", child.index, parent.index);
        Ok(())
    }

    fn unlink<P: Kind, C: Linkable>(
        &mut self,
        parent: Handle<P>,
        child: Handle<C>,
        list: fn(&mut P) -> &mut Children<C>,
    ) -> bool {
        let removed = match self.get_mut(parent) {
            Some(parent_node) => {
                let children = list(parent_node);
                match children.iter().position(|&h| h == child) {
                    Some(pos) => {
                        children.remove(pos);
                        true
                    }
                    None => false,
                }
            }
            None => false,
        };

        if removed {
            if let Some(node) = self.get_mut(child) {
                node.set_linked(false);
            }
            trace!("unlink node {} from {}", child.index, parent.index);
        } else {
            debug!("node {} not in list of {}, nothing removed", child.index, parent.index);
        }
        removed
    }

    /// Append an integer field to the object's integer list.
    ///
    /// # Errors
    ///
    /// [`DocError::InvalidHandle`], [`DocError::AlreadyLinked`] or
    /// [`DocError::CapacityExceeded`].
    pub fn add_int_to_object(
        &mut self,
        object: Handle<DocObject>,
        int: Handle<DocInt>,
    ) -> Result<(), DocError> {
        self.append(object, int, |o| &mut o.ints)
    }

    /// Append a float field to the object's float list.
    ///
    /// # Errors
    ///
    /// Same as [`Document::add_int_to_object`].
    pub fn add_float_to_object(
        &mut self,
        object: Handle<DocObject>,
        float: Handle<DocFloat>,
    ) -> Result<(), DocError> {
        self.append(object, float, |o| &mut o.floats)
    }

    /// Append a string field to the object's string list.
    ///
    /// # Errors
    ///
    /// Same as [`Document::add_int_to_object`].
    pub fn add_string_to_object(
        &mut self,
        object: Handle<DocObject>,
        string: Handle<DocString>,
    ) -> Result<(), DocError> {
        self.append(object, string, |o| &mut o.strings)
    }

    /// Append an object to the message's object list.
    ///
    /// # Errors
    ///
    /// Same as [`Document::add_int_to_object`].
    pub fn add_object_to_message(
        &mut self,
        message: Handle<DocMessage>,
        object: Handle<DocObject>,
    ) -> Result<(), DocError> {
        self.append(message, object, |m| &mut m.objects)
    }

    /// Append a command to the message's command list.
    ///
    /// # Errors
    ///
    /// Same as [`Document::add_int_to_object`].
    pub fn add_command_to_message(
        &mut self,
        message: Handle<DocMessage>,
        command: Handle<DocCommand>,
    ) -> Result<(), DocError> {
        self.append(message, command, |m| &mut m.commands)
    }

    /// Unlink an integer field from the object.
    ///
    /// Returns `false`, and changes nothing, if the field is not in this
    /// object's list.
    pub fn remove_int_from_object(
        &mut self,
        object: Handle<DocObject>,
        int: Handle<DocInt>,
    ) -> bool {
        self.unlink(object, int, |o| &mut o.ints)
    }

    /// Unlink a float field from the object. See [`Document::remove_int_from_object`].
    pub fn remove_float_from_object(
        &mut self,
        object: Handle<DocObject>,
        float: Handle<DocFloat>,
    ) -> bool {
        self.unlink(object, float, |o| &mut o.floats)
    }

    /// Unlink a string field from the object. See [`Document::remove_int_from_object`].
    pub fn remove_string_from_object(
        &mut self,
        object: Handle<DocObject>,
        string: Handle<DocString>,
    ) -> bool {
        self.unlink(object, string, |o| &mut o.strings)
    }

    /// Unlink an object from the message. See [`Document::remove_int_from_object`].
    pub fn remove_object_from_message(
        &mut self,
        message: Handle<DocMessage>,
        object: Handle<DocObject>,
    ) -> bool {
        self.unlink(message, object, |m| &mut m.objects)
    }

    /// Unlink a command from the message. See [`Document::remove_int_from_object`].
    pub fn remove_command_from_message(
        &mut self,
        message: Handle<DocMessage>,
        command: Handle<DocCommand>,
    ) -> bool {
        self.unlink(message, command, |m| &mut m.commands)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Doc = Document<16>;

    #[test]
    fn test_add_preserves_order() {
        let mut doc = Doc::new();
        let obj = doc.create_object("o").unwrap();
        let a = doc.create_int("a", 1).unwrap();
        let b = doc.create_int("b", 2).unwrap();
        let c = doc.create_int("c", 3).unwrap();
        for h in [a, b, c] {
            doc.add_int_to_object(obj, h).unwrap();
        }
        assert_eq!(doc.object(obj).unwrap().ints(), &[a, b, c]);
    }

    #[test]
    fn test_remove_by_identity() {
        let mut doc = Doc::new();
        let obj = doc.create_object("o").unwrap();
        // Same content, different nodes.
        let first = doc.create_int("k", 7).unwrap();
        let second = doc.create_int("k", 7).unwrap();
        doc.add_int_to_object(obj, first).unwrap();
        doc.add_int_to_object(obj, second).unwrap();

        assert!(doc.remove_int_from_object(obj, second));
        assert_eq!(doc.object(obj).unwrap().ints(), &[first]);
    }

    #[test]
    fn test_remove_head_middle_tail() {
        let mut doc = Doc::new();
        let msg = doc.create_message("m").unwrap();
        let cmds: [Handle<DocCommand>; 4] = [
            doc.create_command("A").unwrap(),
            doc.create_command("B").unwrap(),
            doc.create_command("C").unwrap(),
            doc.create_command("D").unwrap(),
        ];
        for h in cmds {
            doc.add_command_to_message(msg, h).unwrap();
        }

        assert!(doc.remove_command_from_message(msg, cmds[0]));
        assert!(doc.remove_command_from_message(msg, cmds[2]));
        assert!(doc.remove_command_from_message(msg, cmds[3]));
        assert_eq!(doc.message(msg).unwrap().commands(), &[cmds[1]]);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut doc = Doc::new();
        let o1 = doc.create_object("o1").unwrap();
        let o2 = doc.create_object("o2").unwrap();
        let s = doc.create_string("s", "x").unwrap();
        doc.add_string_to_object(o1, s).unwrap();

        assert!(!doc.remove_string_from_object(o2, s));
        assert_eq!(doc.object(o1).unwrap().strings(), &[s]);
        // Still linked to o1, so it cannot be added elsewhere.
        assert_eq!(doc.add_string_to_object(o2, s), Err(DocError::AlreadyLinked));
    }

    #[test]
    fn test_relink_after_remove() {
        let mut doc = Doc::new();
        let msg = doc.create_message("m").unwrap();
        let o1 = doc.create_object("o1").unwrap();
        let o2 = doc.create_object("o2").unwrap();
        doc.add_object_to_message(msg, o1).unwrap();
        doc.add_object_to_message(msg, o2).unwrap();

        assert_eq!(doc.add_object_to_message(msg, o1), Err(DocError::AlreadyLinked));
        assert!(doc.remove_object_from_message(msg, o1));
        doc.add_object_to_message(msg, o1).unwrap();
        assert_eq!(doc.message(msg).unwrap().objects(), &[o2, o1]);
    }

    #[test]
    fn test_invalid_identifiers() {
        let mut doc = Doc::new();
        assert_eq!(doc.create_message("").unwrap_err(), DocError::InvalidIdentifier);
        assert_eq!(doc.create_object("a b").unwrap_err(), DocError::InvalidIdentifier);
        assert_eq!(doc.create_command("<x>").unwrap_err(), DocError::InvalidIdentifier);
        assert_eq!(
            doc.create_int("this_id_is_far_too_long", 0).unwrap_err(),
            DocError::CapacityExceeded
        );
        assert!(doc.is_empty());
    }

    #[test]
    fn test_string_content_rules() {
        let mut doc = Doc::new();
        assert!(doc.create_string("a", r#"say "hi""#).is_ok());
        assert!(doc.create_string("b", "it's").is_ok());
        assert_eq!(
            doc.create_string("c", r#"it's "odd""#).unwrap_err(),
            DocError::InvalidString
        );

        let s = doc.create_string("d", "old").unwrap();
        let node = doc.string_mut(s).unwrap();
        assert_eq!(node.set_content(r#"'""#), Err(DocError::InvalidString));
        assert_eq!(node.content(), "old");
        node.set_content("new").unwrap();
        assert_eq!(doc.string(s).unwrap().content(), "new");

        let long = [b'x'; MAX_STRING_LEN + 1];
        let long = core::str::from_utf8(&long).unwrap();
        assert_eq!(doc.create_string("e", long).unwrap_err(), DocError::CapacityExceeded);
        assert!(doc.create_string("e", &long[1..]).is_ok());
    }

    #[test]
    fn test_arena_capacity() {
        let mut doc: Document<2> = Document::new();
        doc.create_command("a").unwrap();
        doc.create_command("b").unwrap();
        assert_eq!(doc.create_command("c").unwrap_err(), DocError::CapacityExceeded);
        doc.clear();
        assert!(doc.create_command("c").is_ok());
    }

    #[test]
    fn test_list_capacity() {
        let mut doc: Document<{ MAX_CHILDREN + 2 }> = Document::new();
        let obj = doc.create_object("o").unwrap();
        for _ in 0..MAX_CHILDREN {
            let f = doc.create_float("f", 0.5, 1).unwrap();
            doc.add_float_to_object(obj, f).unwrap();
        }
        let extra = doc.create_float("f", 0.5, 1).unwrap();
        assert_eq!(
            doc.add_float_to_object(obj, extra),
            Err(DocError::CapacityExceeded)
        );
        // A failed add leaves the node free to link elsewhere.
        assert_eq!(doc.float(extra).map(|f| f.linked), Some(false));
    }

    #[test]
    fn test_wrong_kind_handle() {
        let mut doc = Doc::new();
        let msg = doc.create_message("m").unwrap();
        let obj = doc.create_object("o").unwrap();
        // A handle reinterpreted as another kind finds nothing.
        let fake: Handle<DocObject> = Handle::new(msg.index());
        assert!(doc.object(fake).is_none());
        assert_eq!(doc.add_object_to_message(msg, fake), Err(DocError::InvalidHandle));
        assert!(!doc.remove_object_from_message(msg, obj));
    }

    #[test]
    fn test_field_mutation() {
        let mut doc = Doc::new();
        let i = doc.create_int("i", 1).unwrap();
        let f = doc.create_float("f", 1.0, 1).unwrap();
        doc.int_mut(i).unwrap().set_value(-5);
        let node = doc.float_mut(f).unwrap();
        node.set_value(2.25);
        node.set_precision(2);
        assert_eq!(doc.int(i).unwrap().value(), -5);
        assert_eq!(doc.float(f).unwrap().value(), 2.25);
        assert_eq!(doc.float(f).unwrap().precision(), 2);
    }
}
