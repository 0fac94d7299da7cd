//! Parser and writer for a compact text message format between
//! microcontrollers.
//!
//! This crate provides everything needed to exchange messages over a UART
//! style link:
//!
//! - **Parsing**: Zero-copy lookups into a received buffer
//!   - [`get_message()`] - Find a message by id
//!   - [`Message`], [`Object`], [`Command`] - Spans into the buffer
//!   - [`find_keyword()`], [`find_value()`] - Low-level scanners
//!
//! - **Document model** (feature `wrapper`): Owned, mutable message trees
//!   - [`Document`] - Fixed-capacity node arena with typed [`Handle`]s
//!   - [`MessageBuilder`] - Fluent builder API
//!
//! - **Serialization**: Render documents and values to any output
//!   - [`Serialize`] trait - Extension trait for serialization
//!   - [`Sink`] - Byte output ([`SliceWriter`], [`FmtSink`], [`FnSink`], ...)
//!   - [`Printer`] - Print handler with buffer redirection
//!
//! # Message Format
//!
//! ```text
//! #<id>{<CMD>... @<obj>($int=-12; $float=3.14; $str="text")...}
//! ```
//!
//! - `#id{ }` - Message
//! - `<name>` - Command
//! - `@id( )` - Object holding `$key=value` fields separated by `;`
//! - Values: signed integers, decimal floats, strings in `"` or `'`
//!
//! Whitespace is allowed around flags, identifiers, `=` and `;`.
//! Identifiers use `[A-Za-z0-9_]`.
//!
//! # Examples
//!
//! ## Parsing Messages
//!
//! ```
//! use mcu_msg::get_message;
//!
//! let buf = br#"#test_msg{<CMD1> @obj1($key11=-1123334567; $key12='string "value"')}"#;
//! let msg = get_message(buf, "test_msg").unwrap();
//! assert!(msg.has_command("CMD1"));
//!
//! let obj = msg.get_object("obj1").unwrap();
//! assert_eq!(obj.get_int("key11"), Ok(-1123334567));
//! assert_eq!(obj.get_string("key12").unwrap(), r#"string "value""#);
//! ```
//!
//! ## Building and Serializing
//!
//! ```
//! use mcu_msg::{Document, MessageBuilder, Serialize};
//!
//! let mut doc: Document<16> = Document::new();
//! let msg = MessageBuilder::new(&mut doc, "cfg")?
//!     .object("pwm", |o| {
//!         o.int("ch", 2)?.float("duty", 0.5, 1)?;
//!         Ok(())
//!     })?
//!     .finish();
//!
//! let mut buf = [0u8; 64];
//! let len = doc.message_ref(msg).unwrap().serialize(&mut buf).unwrap();
//! assert_eq!(&buf[..len], b"#cfg{@pwm($ch=2;$duty=0.5)}");
//! # Ok::<(), mcu_msg::DocError>(())
//! ```
//!
//! # Features
//!
//! - **`wrapper`** (default): Enable the document model, builder and serializer
//! - **`std`**: Enable standard library support (for host testing)
//! - **`defmt`**: Enable defmt formatting and route internal logs to defmt
//! - **`log`**: Route internal logs to the `log` facade
//! - **`heapless`**: Enable `serialize_to_vec()` and the `heapless::Vec` sink
//! - **`embedded-io`**: Enable `serialize_io()` and `IoSink` for I/O peripherals
//!
//! # No-std Support
//!
//! This crate is `#![no_std]` by default and uses no heap allocations,
//! making it suitable for embedded systems with limited resources.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
extern crate std;

#[macro_use]
mod macros;

pub mod charset;
pub mod decode;
pub mod fmt;
pub mod parser;
pub mod printer;
pub mod scanner;
pub mod sink;
pub mod span;

#[cfg(feature = "wrapper")]
pub mod builder;
#[cfg(feature = "wrapper")]
pub mod doc;
#[cfg(feature = "wrapper")]
pub mod serialize;

// Re-export types at crate root for convenience
pub use decode::{ParsedFloat, ParsedInt};
pub use parser::{get_message, Command, Message, Object, ParseError};
pub use printer::Printer;
pub use scanner::{find_keyword, find_value};
#[cfg(feature = "embedded-io")]
pub use sink::IoSink;
pub use sink::{FmtSink, FnSink, SerializeError, Sink, SliceWriter};
pub use span::Span;

#[cfg(feature = "wrapper")]
pub use builder::{MessageBuilder, ObjectBuilder};
#[cfg(feature = "wrapper")]
pub use doc::{
    DocCommand, DocError, DocFloat, DocInt, DocMessage, DocObject, DocString, Document, Handle,
    MAX_CHILDREN, MAX_ID_LEN, MAX_STRING_LEN,
};
#[cfg(feature = "wrapper")]
pub use serialize::{
    render_command, render_message, render_object, CommandRef, MessageRef, ObjectRef, Serialize,
};
