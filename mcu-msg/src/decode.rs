//! Strict decoders for raw value text.
//!
//! Integer: `['+'|'-'] digit+`. Float: `['+'|'-'] digit+ ['.' digit+]`, no
//! exponent. String: a `'` or `"` followed by anything up to the next
//! occurrence of the same quote; there is no escape mechanism.

use crate::charset::is_quote;
use crate::parser::ParseError;
use crate::scanner::skip_quoted;
use crate::span::Span;

/// A decoded integer together with the number of digits it was written with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ParsedInt {
    /// Decoded value.
    pub value: i32,
    /// Count of decimal digits consumed (sign excluded).
    pub digits: usize,
}

/// A decoded float together with the precision it was written with.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ParsedFloat {
    /// Decoded value, always finite.
    pub value: f32,
    /// Count of decimal digits consumed on both sides of the point.
    pub digits: usize,
    /// Count of fractional digits, saturated at `u8::MAX`.
    pub precision: u8,
}

/// Split an optional leading sign off `raw`.
#[inline]
fn split_sign(raw: &[u8]) -> (bool, &[u8]) {
    match raw.first() {
        Some(b'-') => (true, &raw[1..]),
        Some(b'+') => (false, &raw[1..]),
        _ => (false, raw),
    }
}

#[inline]
fn all_digits(s: &[u8]) -> bool {
    !s.is_empty() && s.iter().all(u8::is_ascii_digit)
}

/// Decode a signed decimal integer.
///
/// # Errors
///
/// - [`ParseError::Malformed`] if `raw` is not `['+'|'-'] digit+`.
/// - [`ParseError::Overflow`] if the value does not fit an `i32`.
pub fn decode_int(raw: &[u8]) -> Result<ParsedInt, ParseError> {
    let (negative, digits) = split_sign(raw);
    if !all_digits(digits) {
        return Err(ParseError::Malformed);
    }

    let mut magnitude: i64 = 0;
    for &b in digits {
        magnitude = magnitude
            .checked_mul(10)
            .and_then(|v| v.checked_add(i64::from(b - b'0')))
            .ok_or(ParseError::Overflow)?;
    }

    let value = if negative { -magnitude } else { magnitude };
    let value = i32::try_from(value).map_err(|_| ParseError::Overflow)?;

    Ok(ParsedInt {
        value,
        digits: digits.len(),
    })
}

/// Decode a signed decimal float.
///
/// The integer part is accumulated most significant digit first, the
/// fractional part by decreasing powers of ten from the point.
///
/// # Errors
///
/// - [`ParseError::Malformed`] if either digit run is empty or holds a
///   non-digit, including a second `.`.
/// - [`ParseError::Overflow`] if the magnitude does not fit an `f32`.
pub fn decode_float(raw: &[u8]) -> Result<ParsedFloat, ParseError> {
    let (negative, body) = split_sign(raw);
    let (int_part, frac_part) = match body.iter().position(|&b| b == b'.') {
        Some(dot) => (&body[..dot], Some(&body[dot + 1..])),
        None => (body, None),
    };

    if !all_digits(int_part) {
        return Err(ParseError::Malformed);
    }

    let mut value = 0.0f64;
    for &b in int_part {
        value = value * 10.0 + f64::from(b - b'0');
    }

    let mut precision = 0usize;
    if let Some(frac) = frac_part {
        if !all_digits(frac) {
            return Err(ParseError::Malformed);
        }
        let mut weight = 0.1f64;
        for &b in frac {
            value += f64::from(b - b'0') * weight;
            weight /= 10.0;
        }
        precision = frac.len();
    }

    if negative {
        value = -value;
    }
    let value = value as f32;
    if !value.is_finite() {
        return Err(ParseError::Overflow);
    }

    Ok(ParsedFloat {
        value,
        digits: int_part.len() + precision,
        precision: u8::try_from(precision).unwrap_or(u8::MAX),
    })
}

/// Decode a quoted string whose opening quote starts `value`.
///
/// The content runs to the next occurrence of the same quote inside `body`,
/// so it may contain whitespace, control characters and the other quote.
///
/// # Errors
///
/// - [`ParseError::Malformed`] if `value` does not start with a quote.
/// - [`ParseError::Unterminated`] if the closing quote is missing.
pub fn decode_string<'a>(body: Span<'a>, value: Span<'a>) -> Result<Span<'a>, ParseError> {
    let open = value.start();
    match body.byte_at(open) {
        Some(q) if is_quote(q) && !value.is_empty() => {}
        _ => return Err(ParseError::Malformed),
    }

    let close = skip_quoted(body.buffer(), open, body.end()).ok_or(ParseError::Unterminated)?;
    Ok(Span::between(body.buffer(), open + 1, close - 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() <= 1e-5 * b.abs().max(1.0)
    }

    #[test]
    fn test_decode_int() {
        assert_eq!(
            decode_int(b"-1123334567"),
            Ok(ParsedInt {
                value: -1_123_334_567,
                digits: 10
            })
        );
        assert_eq!(decode_int(b"+42").unwrap().value, 42);
        assert_eq!(decode_int(b"007").unwrap().digits, 3);
    }

    #[test]
    fn test_decode_int_negative_zero() {
        let parsed = decode_int(b"-0").unwrap();
        assert_eq!(parsed.value, 0);
        assert_eq!(parsed.digits, 1);
    }

    #[test]
    fn test_decode_int_limits() {
        assert_eq!(decode_int(b"2147483647").unwrap().value, i32::MAX);
        assert_eq!(decode_int(b"-2147483648").unwrap().value, i32::MIN);
        assert_eq!(decode_int(b"2147483648"), Err(ParseError::Overflow));
        assert_eq!(decode_int(b"-2147483649"), Err(ParseError::Overflow));
        assert_eq!(
            decode_int(b"99999999999999999999999"),
            Err(ParseError::Overflow)
        );
    }

    #[test]
    fn test_decode_int_malformed() {
        for raw in [&b""[..], b"-", b"+", b"12a", b"1.5", b"--1", b"'1'"] {
            assert_eq!(decode_int(raw), Err(ParseError::Malformed), "{:?}", raw);
        }
    }

    #[test]
    fn test_decode_float() {
        let parsed = decode_float(b"12.34").unwrap();
        assert!(approx(parsed.value, 12.34));
        assert_eq!(parsed.digits, 4);
        assert_eq!(parsed.precision, 2);

        let parsed = decode_float(b"-1.123456789").unwrap();
        assert!(approx(parsed.value, -1.123_456_789));
        assert_eq!(parsed.precision, 9);
    }

    #[test]
    fn test_decode_float_without_point() {
        let parsed = decode_float(b"+1000").unwrap();
        assert_eq!(parsed.value, 1000.0);
        assert_eq!(parsed.digits, 4);
        assert_eq!(parsed.precision, 0);
    }

    #[test]
    fn test_decode_float_malformed() {
        for raw in [&b""[..], b".", b"12.", b".5", b"1.2.3", b"1e5", b"-", b"1,5"] {
            assert_eq!(decode_float(raw), Err(ParseError::Malformed), "{:?}", raw);
        }
    }

    #[test]
    fn test_decode_float_too_long() {
        let mut raw = [b'1'; 321];
        raw[0] = b'0';
        assert_eq!(decode_float(&raw), Err(ParseError::Overflow));
        // Fits f64 but not f32.
        assert_eq!(decode_float(&raw[..40]), Err(ParseError::Overflow));
        // Large but representable.
        assert_eq!(decode_float(&raw[..30]).map(|p| p.digits), Ok(30));

        raw[0] = b'-';
        assert_eq!(decode_float(&raw), Err(ParseError::Overflow));
    }

    #[test]
    fn test_decode_string() {
        let buf = br#"$a='string "value"'; $b=1"#;
        let body = Span::full(buf);
        let value = Span::between(buf, 3, 4);
        let s = decode_string(body, value).unwrap();
        assert_eq!(s, r#"string "value""#);
    }

    #[test]
    fn test_decode_string_empty_content() {
        let buf = b"$a=\"\"";
        let s = decode_string(Span::full(buf), Span::between(buf, 3, 4)).unwrap();
        assert!(s.is_empty());
    }

    #[test]
    fn test_decode_string_errors() {
        let buf = b"$a=12";
        let body = Span::full(buf);
        assert_eq!(
            decode_string(body, Span::between(buf, 3, 5)),
            Err(ParseError::Malformed)
        );
        assert_eq!(
            decode_string(body, Span::between(buf, 5, 5)),
            Err(ParseError::Malformed)
        );

        let buf = b"$a='open";
        assert_eq!(
            decode_string(Span::full(buf), Span::between(buf, 3, 4)),
            Err(ParseError::Unterminated)
        );
    }
}
