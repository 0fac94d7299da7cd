//! Keyword scanning: the shared primitive behind every lookup.
//!
//! A keyword is a flag character, an identifier and a stop character, with
//! optional whitespace before the stop character:
//!
//! ```text
//! #test_msg{    @obj1 (    $key11 =    <CMD1>
//! ```
//!
//! Quoted strings are skipped verbatim while scanning, so flag characters
//! inside string values never match. Scanning only moves forward: a rejected
//! candidate resumes at the first byte that was not consumed by the match
//! attempt, which bounds every lookup by the haystack length.

use crate::charset::{
    is_control_char, is_identifier_char, is_quote, is_whitespace, KEY_EQU, KEY_FLAG,
};
use crate::span::Span;

/// Find the first `flag keyword <ws>* stop` sequence in `haystack`.
///
/// Returns the span of the identifier itself (flag and stop excluded), or
/// `None` if no candidate matches before the haystack ends. An unterminated
/// quote hides the rest of the haystack.
///
/// # Example
///
/// ```
/// use mcu_msg::{find_keyword, Span};
///
/// let buf = b"@objA @objB @objC (";
/// let found = find_keyword(Span::full(buf), "objC", b'@', b'(').unwrap();
/// assert_eq!(found, "objC");
/// assert_eq!(found.start(), 13);
/// ```
#[must_use]
pub fn find_keyword<'a>(haystack: Span<'a>, keyword: &str, flag: u8, stop: u8) -> Option<Span<'a>> {
    locate_keyword(haystack, keyword.as_bytes(), flag, stop).map(|(ident, _)| ident)
}

/// Find the raw value text of `$key=` inside an object body.
///
/// The value starts at the first non-whitespace byte after `=` and runs to
/// the next whitespace or control character. The returned span may be empty
/// (e.g. `$key=;`).
#[must_use]
pub fn find_value<'a>(body: Span<'a>, key: &str) -> Option<Span<'a>> {
    let (_, equ) = locate_keyword(body, key.as_bytes(), KEY_FLAG, KEY_EQU)?;
    let buf = body.buffer();
    let end = body.end();

    let start = skip_whitespace(buf, equ + 1, end);
    let mut stop = start;
    while stop < end && !is_whitespace(buf[stop]) && !is_control_char(buf[stop]) {
        stop += 1;
    }
    Some(Span::between(buf, start, stop))
}

/// Keyword match returning the identifier span and the offset of the stop byte.
pub(crate) fn locate_keyword<'a>(
    haystack: Span<'a>,
    keyword: &[u8],
    flag: u8,
    stop: u8,
) -> Option<(Span<'a>, usize)> {
    if keyword.is_empty() {
        return None;
    }

    let buf = haystack.buffer();
    let end = haystack.end();
    let mut pos = haystack.start();

    while pos < end {
        let c = buf[pos];
        if is_quote(c) {
            pos = skip_quoted(buf, pos, end)?;
            continue;
        }
        if c != flag {
            pos += 1;
            continue;
        }

        let ident = pos + 1;
        let mut matched = 0;
        while matched < keyword.len() && ident + matched < end {
            let b = buf[ident + matched];
            if b != keyword[matched] || is_control_char(b) || !is_identifier_char(b) {
                break;
            }
            matched += 1;
        }

        let next = skip_whitespace(buf, ident + matched, end);
        if matched == keyword.len() && next < end && buf[next] == stop {
            return Some((Span::between(buf, ident, ident + matched), next));
        }
        // `next > pos` always holds, so the scan never revisits rejected text.
        pos = next;
    }
    None
}

/// Offset of the first `close` byte at or after `from`, skipping quoted strings.
pub(crate) fn find_closing(buf: &[u8], from: usize, end: usize, close: u8) -> Option<usize> {
    let mut pos = from;
    while pos < end {
        let c = buf[pos];
        if c == close {
            return Some(pos);
        }
        if is_quote(c) {
            pos = skip_quoted(buf, pos, end)?;
        } else {
            pos += 1;
        }
    }
    None
}

/// Offset just past the quote closing the one at `open`.
#[inline]
pub(crate) fn skip_quoted(buf: &[u8], open: usize, end: usize) -> Option<usize> {
    let quote = buf[open];
    buf[open + 1..end]
        .iter()
        .position(|&b| b == quote)
        .map(|i| open + 1 + i + 1)
}

#[inline]
pub(crate) fn skip_whitespace(buf: &[u8], mut pos: usize, end: usize) -> usize {
    while pos < end && is_whitespace(buf[pos]) {
        pos += 1;
    }
    pos
}

#[cfg(test)]
mod tests {
    use super::*;

    fn find<'a>(buf: &'a [u8], keyword: &str, flag: u8, stop: u8) -> Option<Span<'a>> {
        find_keyword(Span::full(buf), keyword, flag, stop)
    }

    #[test]
    fn test_find_keyword_simple() {
        let buf = b"#msg{}";
        let span = find(buf, "msg", b'#', b'{').unwrap();
        assert_eq!(span, "msg");
        assert_eq!(span.start(), 1);
        assert_eq!(span.len(), 3);
    }

    #[test]
    fn test_find_keyword_whitespace_before_stop() {
        let buf = b"@obj2  \t(";
        assert_eq!(find(buf, "obj2", b'@', b'(').unwrap(), "obj2");
    }

    #[test]
    fn test_find_keyword_rejects_prefix() {
        let buf = b"@obj1($a=1) @obj($b=2)";
        let span = find(buf, "obj", b'@', b'(').unwrap();
        assert_eq!(span.start(), 13);
    }

    #[test]
    fn test_find_keyword_rejects_longer_keyword() {
        assert!(find(b"@ob(", "obj", b'@', b'(').is_none());
        assert!(find(b"@ob", "obj", b'@', b'(').is_none());
    }

    #[test]
    fn test_find_keyword_wrong_stop() {
        assert!(find(b"@obj{", "obj", b'@', b'(').is_none());
        assert!(find(b"@obj", "obj", b'@', b'(').is_none());
    }

    #[test]
    fn test_find_keyword_skips_quoted_flag() {
        let buf = b"#m{@o($k='@fake(')}";
        assert!(find(buf, "fake", b'@', b'(').is_none());
        assert_eq!(find(buf, "o", b'@', b'(').unwrap().start(), 4);
    }

    #[test]
    fn test_find_keyword_skips_double_quoted() {
        let buf = br#"$a="$b=1"; $b=2"#;
        let span = find(buf, "b", b'$', b'=').unwrap();
        assert_eq!(span.start(), 12);
    }

    #[test]
    fn test_find_keyword_unterminated_quote_hides_rest() {
        let buf = b"$a='open $b=2";
        assert!(find(buf, "b", b'$', b'=').is_none());
    }

    #[test]
    fn test_find_keyword_adjacent_flags() {
        // The rejected candidate's failing byte is itself a flag.
        let buf = b"@@objC(";
        assert_eq!(find(buf, "objC", b'@', b'(').unwrap().start(), 2);
    }

    #[test]
    fn test_find_keyword_near_matches() {
        let buf = b"@objA @objB @objC(";
        let span = find(buf, "objC", b'@', b'(').unwrap();
        assert_eq!(span.start(), 13);
        assert!(find(buf, "objA", b'@', b'(').is_none());
    }

    #[test]
    fn test_find_keyword_empty_keyword() {
        assert!(find(b"@(", "", b'@', b'(').is_none());
    }

    #[test]
    fn test_find_keyword_control_char_in_keyword() {
        assert!(find(b"@a(b(", "a(b", b'@', b'(').is_none());
    }

    #[test]
    fn test_find_keyword_respects_haystack_bounds() {
        let buf = b"xx@obj(yy";
        let inner = Span::between(buf, 0, 6);
        assert!(find_keyword(inner, "obj", b'@', b'(').is_none());
        let inner = Span::between(buf, 3, 9);
        assert!(find_keyword(inner, "obj", b'@', b'(').is_none());
    }

    #[test]
    fn test_find_value() {
        let buf = b"$key11 =   -1123334567  ; $key12 = 123";
        let body = Span::full(buf);
        assert_eq!(find_value(body, "key11").unwrap(), "-1123334567");
        assert_eq!(find_value(body, "key12").unwrap(), "123");
        assert!(find_value(body, "key13").is_none());
    }

    #[test]
    fn test_find_value_empty() {
        let buf = b"$a=;$b=";
        let body = Span::full(buf);
        assert!(find_value(body, "a").unwrap().is_empty());
        assert!(find_value(body, "b").unwrap().is_empty());
    }

    #[test]
    fn test_find_value_stops_at_control_char() {
        let buf = b"$a='x;y'";
        assert_eq!(find_value(Span::full(buf), "a").unwrap(), "'x");
    }

    #[test]
    fn test_find_closing_skips_quotes() {
        let buf = b"($s=')')x)";
        assert_eq!(find_closing(buf, 1, buf.len(), b')'), Some(7));
        assert_eq!(find_closing(b"('", 1, 2, b')'), None);
    }
}
