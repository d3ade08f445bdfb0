//! String to unsigned integer conversion.
//!
//! The shell grammar: with base 0, a leading `0` selects octal and a
//! following `0x`/`0X` selects hex, otherwise decimal. Scanning stops at the
//! first character that is not a digit of the selected base; the caller gets
//! the stop position back and decides whether a partial parse is an error.

fn digit_value(c: u8) -> Option<u32> {
    match c {
        b'0'..=b'9' => Some((c - b'0') as u32),
        b'a'..=b'z' => Some((c - b'a') as u32 + 10),
        b'A'..=b'Z' => Some((c - b'A') as u32 + 10),
        _ => None,
    }
}

/// Scan an unsigned integer from the start of `s`.
///
/// `base` 0 auto-detects octal/hex/decimal from the prefix; an explicit
/// base 16 skips an optional `0x`/`0X` prefix. Returns the value and the
/// index of the first unconsumed byte. Digits whose value is not below the
/// base stop the scan. The value wraps on overflow.
pub fn scan_uint(s: &str, base: u32) -> (u32, usize) {
    let bytes = s.as_bytes();
    let mut i = 0usize;
    let mut base = base;

    if base == 0 {
        base = 10;
        if bytes.first() == Some(&b'0') {
            base = 8;
            i = 1;
            if matches!(bytes.get(1), Some(&b'x') | Some(&b'X'))
                && bytes.get(2).is_some_and(u8::is_ascii_hexdigit)
            {
                i = 2;
                base = 16;
            }
        }
    } else if base == 16
        && bytes.first() == Some(&b'0')
        && matches!(bytes.get(1), Some(&b'x') | Some(&b'X'))
    {
        i = 2;
    }

    let mut value: u32 = 0;
    while let Some(&c) = bytes.get(i) {
        let d = match digit_value(c) {
            Some(d) if d < base => d,
            _ => break,
        };
        value = value.wrapping_mul(base).wrapping_add(d);
        i += 1;
    }
    (value, i)
}

/// Parse a whole token with base auto-detection. `None` if any character is
/// left unconsumed.
pub fn parse_exact(s: &str) -> Option<u32> {
    let (value, consumed) = scan_uint(s, 0);
    (consumed == s.len()).then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decimal() {
        assert_eq!(scan_uint("1234", 0), (1234, 4));
        assert_eq!(scan_uint("4294967295", 0), (u32::MAX, 10));
    }

    #[test]
    fn test_octal_prefix() {
        assert_eq!(scan_uint("017", 0), (15, 3));
        assert_eq!(scan_uint("0", 0), (0, 1));
        // 8 and 9 are not octal digits
        assert_eq!(scan_uint("019", 0), (1, 2));
    }

    #[test]
    fn test_hex_prefix() {
        assert_eq!(scan_uint("0x1f", 0), (31, 4));
        assert_eq!(scan_uint("0X1F", 0), (31, 4));
        assert_eq!(scan_uint("0xdeadbeef", 0), (0xdead_beef, 10));
    }

    #[test]
    fn test_bare_0x_stays_octal() {
        // No hex digit after the x, so the leading 0 parses alone.
        assert_eq!(scan_uint("0x", 0), (0, 1));
        assert_eq!(scan_uint("0xg", 0), (0, 1));
    }

    #[test]
    fn test_explicit_base_16() {
        assert_eq!(scan_uint("ff", 16), (255, 2));
        assert_eq!(scan_uint("0xff", 16), (255, 4));
        assert_eq!(scan_uint("0x", 16), (0, 2));
    }

    #[test]
    fn test_explicit_bases() {
        assert_eq!(scan_uint("1010", 2), (10, 4));
        assert_eq!(scan_uint("z", 36), (35, 1));
        assert_eq!(scan_uint("10", 36), (36, 2));
        assert_eq!(scan_uint("Z", 36), (35, 1));
    }

    #[test]
    fn test_stop_at_invalid_digit() {
        assert_eq!(scan_uint("123abc", 0), (123, 3));
        assert_eq!(scan_uint("12 34", 0), (12, 2));
        assert_eq!(scan_uint("", 0), (0, 0));
        assert_eq!(scan_uint("-5", 0), (0, 0));
    }

    #[test]
    fn test_parse_exact() {
        assert_eq!(parse_exact("0x1000"), Some(0x1000));
        assert_eq!(parse_exact("42"), Some(42));
        assert_eq!(parse_exact("010"), Some(8));
        assert_eq!(parse_exact(""), Some(0));
        assert_eq!(parse_exact("12z"), None);
        assert_eq!(parse_exact("0x"), None);
        assert_eq!(parse_exact("zz"), None);
    }
}
