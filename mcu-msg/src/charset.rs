//! Character classes of the wire grammar.
//!
//! ```text
//! #id{ <cmd> @obj( $key=value; ... ) }
//! ```
//!
//! The control characters below delimit every structure. They can never be
//! part of an identifier and terminate raw values.

/// Message flag (`#id{...}`).
pub const MSG_FLAG: u8 = b'#';
/// Opens a message body.
pub const MSG_START: u8 = b'{';
/// Closes a message body.
pub const MSG_STOP: u8 = b'}';
/// Object flag (`@id(...)`).
pub const OBJ_FLAG: u8 = b'@';
/// Opens an object body.
pub const OBJ_START: u8 = b'(';
/// Closes an object body.
pub const OBJ_STOP: u8 = b')';
/// Key flag (`$key=value`).
pub const KEY_FLAG: u8 = b'$';
/// Separates key/value pairs.
pub const KEY_SEP: u8 = b';';
/// Separates a key from its value.
pub const KEY_EQU: u8 = b'=';
/// Opens a command (`<name>`).
pub const CMD_START: u8 = b'<';
/// Closes a command.
pub const CMD_STOP: u8 = b'>';

/// Preferred string delimiter.
pub const DOUBLE_QUOTE: u8 = b'"';
/// Fallback string delimiter.
pub const SINGLE_QUOTE: u8 = b'\'';

/// Returns `true` for the structural delimiters `# { } ( ) @ $ ; = < >`.
#[inline]
#[must_use]
pub const fn is_control_char(c: u8) -> bool {
    matches!(
        c,
        MSG_FLAG
            | MSG_START
            | MSG_STOP
            | OBJ_START
            | OBJ_STOP
            | OBJ_FLAG
            | KEY_FLAG
            | KEY_SEP
            | KEY_EQU
            | CMD_START
            | CMD_STOP
    )
}

/// Returns `true` for space, tab, LF, CR, vertical tab and form feed.
///
/// Unlike [`u8::is_ascii_whitespace`], vertical tab (`0x0B`) is included.
#[inline]
#[must_use]
pub const fn is_whitespace(c: u8) -> bool {
    matches!(c, b' ' | b'\t' | b'\n' | b'\r' | 0x0B | 0x0C)
}

/// Returns `true` for `[A-Za-z0-9_]`.
#[inline]
#[must_use]
pub const fn is_identifier_char(c: u8) -> bool {
    c == b'_' || c.is_ascii_alphanumeric()
}

/// Returns `true` for either string delimiter.
#[inline]
#[must_use]
pub const fn is_quote(c: u8) -> bool {
    c == DOUBLE_QUOTE || c == SINGLE_QUOTE
}

/// Returns `true` if `id` is a non-empty identifier.
#[must_use]
pub fn is_identifier(id: &str) -> bool {
    !id.is_empty() && id.bytes().all(is_identifier_char)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_control_chars() {
        for &c in b"#{}()@$;=<>" {
            assert!(is_control_char(c), "{} should be a control char", c as char);
        }
        for &c in b"azAZ09_ .-+'\"" {
            assert!(!is_control_char(c));
        }
    }

    #[test]
    fn test_whitespace_includes_vertical_tab() {
        assert!(is_whitespace(0x0B));
        assert!(is_whitespace(b'\x0C'));
        assert!(is_whitespace(b'\r'));
        assert!(!is_whitespace(b'_'));
        assert!(!is_whitespace(0));
    }

    #[test]
    fn test_identifier() {
        assert!(is_identifier("key_11"));
        assert!(is_identifier("_"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("a b"));
        assert!(!is_identifier("obj("));
        assert!(!is_identifier("ünï"));
    }
}
