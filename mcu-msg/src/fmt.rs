//! No-std compatible number formatting for serialization.
//!
//! These functions write formatted numbers directly to byte buffers without
//! requiring heap allocation or the standard library.

/// Largest number of fractional digits rendered for a float.
pub const MAX_FLOAT_PRECISION: u8 = 9;

/// Buffer size that fits any `i32` (`"-2147483648"`).
pub const MAX_INT_LEN: usize = 11;

/// Buffer size that fits any float accepted by [`write_float`].
///
/// Sign(1) + integer digits(20) + point(1) + fraction(9).
pub const MAX_FLOAT_LEN: usize = 31;

const POW10: [u64; MAX_FLOAT_PRECISION as usize + 1] = [
    1,
    10,
    100,
    1_000,
    10_000,
    100_000,
    1_000_000,
    10_000_000,
    100_000_000,
    1_000_000_000,
];

/// Write a u64 as decimal digits.
///
/// Returns the number of bytes written (1-20 bytes).
///
/// # Panics
///
/// Panics if `buf` is too small for the digits of `value`.
#[inline]
pub fn write_u64(buf: &mut [u8], value: u64) -> usize {
    if value == 0 {
        buf[0] = b'0';
        return 1;
    }

    // Write digits in reverse order to temporary buffer
    let mut temp = [0u8; 20];
    let mut n = value;
    let mut len = 0;
    while n > 0 {
        temp[len] = b'0' + (n % 10) as u8;
        n /= 10;
        len += 1;
    }

    // Copy digits in correct order
    buf[..len].copy_from_slice(&temp[..len]);
    buf[..len].reverse();
    len
}

/// Write an i32 as a signed decimal string.
///
/// Returns the number of bytes written (1-11 bytes).
///
/// # Panics
///
/// Panics if `buf.len() < 11` and the value needs all of it.
#[inline]
pub fn write_i32(buf: &mut [u8], value: i32) -> usize {
    if value < 0 {
        buf[0] = b'-';
        1 + write_u64(&mut buf[1..], u64::from(value.unsigned_abs()))
    } else {
        write_u64(buf, value as u64)
    }
}

/// Write `value` with exactly `precision` fractional digits.
///
/// The value is rounded half-up at the requested precision and the carry is
/// propagated into the integer part (`0.999` at precision 2 is `1.00`).
/// Precision 0 writes the integer part alone, without a point. Precision is
/// capped at [`MAX_FLOAT_PRECISION`].
///
/// Returns the number of bytes written, or `None` if the value is not finite
/// or its scaled magnitude does not fit a `u64`.
pub fn write_float(buf: &mut [u8], value: f32, precision: u8) -> Option<usize> {
    if !value.is_finite() {
        return None;
    }

    let precision = precision.min(MAX_FLOAT_PRECISION) as usize;
    let scale = POW10[precision];
    let scaled = f64::from(value).abs() * scale as f64 + 0.5;
    if scaled >= u64::MAX as f64 {
        return None;
    }
    // Truncation of a non-negative value is floor.
    let scaled = scaled as u64;

    let mut pos = 0;
    if value < 0.0 && scaled != 0 {
        buf[pos] = b'-';
        pos += 1;
    }
    pos += write_u64(&mut buf[pos..], scaled / scale);

    if precision > 0 {
        buf[pos] = b'.';
        pos += 1;

        // Zero-padded fraction, e.g. 1.05 -> "05"
        let mut frac = scaled % scale;
        for i in (0..precision).rev() {
            buf[pos + i] = b'0' + (frac % 10) as u8;
            frac /= 10;
        }
        pos += precision;
    }
    Some(pos)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int_str(value: i32) -> ([u8; MAX_INT_LEN], usize) {
        let mut buf = [0u8; MAX_INT_LEN];
        let len = write_i32(&mut buf, value);
        (buf, len)
    }

    fn float_str(value: f32, precision: u8) -> Option<([u8; MAX_FLOAT_LEN], usize)> {
        let mut buf = [0u8; MAX_FLOAT_LEN];
        write_float(&mut buf, value, precision).map(|len| (buf, len))
    }

    #[test]
    fn test_write_i32() {
        let (buf, len) = int_str(0);
        assert_eq!(&buf[..len], b"0");
        let (buf, len) = int_str(1000);
        assert_eq!(&buf[..len], b"1000");
        let (buf, len) = int_str(-1_123_334_567);
        assert_eq!(&buf[..len], b"-1123334567");
    }

    #[test]
    fn test_write_i32_limits() {
        let (buf, len) = int_str(i32::MIN);
        assert_eq!(&buf[..len], b"-2147483648");
        let (buf, len) = int_str(i32::MAX);
        assert_eq!(&buf[..len], b"2147483647");
    }

    #[test]
    fn test_write_float() {
        let (buf, len) = float_str(12.34, 2).unwrap();
        assert_eq!(&buf[..len], b"12.34");
        let (buf, len) = float_str(-2.5, 3).unwrap();
        assert_eq!(&buf[..len], b"-2.500");
        let (buf, len) = float_str(1.05, 2).unwrap();
        assert_eq!(&buf[..len], b"1.05");
    }

    #[test]
    fn test_write_float_rounds_half_up() {
        let (buf, len) = float_str(0.1, 1).unwrap();
        assert_eq!(&buf[..len], b"0.1");
        let (buf, len) = float_str(0.999, 2).unwrap();
        assert_eq!(&buf[..len], b"1.00");
        let (buf, len) = float_str(-1.126, 2).unwrap();
        assert_eq!(&buf[..len], b"-1.13");
    }

    #[test]
    fn test_write_float_precision_zero() {
        let (buf, len) = float_str(41.7, 0).unwrap();
        assert_eq!(&buf[..len], b"42");
    }

    #[test]
    fn test_write_float_small_negative() {
        let (buf, len) = float_str(-0.25, 1).unwrap();
        assert_eq!(&buf[..len], b"-0.3");
        let (buf, len) = float_str(-0.001, 1).unwrap();
        assert_eq!(&buf[..len], b"0.0");
    }

    #[test]
    fn test_write_float_precision_capped() {
        let (buf, len) = float_str(1.5, 200).unwrap();
        assert_eq!(&buf[..len], b"1.500000000");
    }

    #[test]
    fn test_write_float_rejects_unrepresentable() {
        assert!(float_str(f32::NAN, 2).is_none());
        assert!(float_str(f32::INFINITY, 2).is_none());
        assert!(float_str(f32::MAX, 2).is_none());
    }
}
