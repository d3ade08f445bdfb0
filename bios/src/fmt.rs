//! Formatted output engine.
//!
//! The monitor runs with no C library underneath it, so number and template
//! formatting are built from scratch here. `format_number` converts one value
//! into a bounded buffer, `format_into` drives the `%`-directive template
//! grammar on top of it. Output is silently truncated at the buffer end;
//! callers that care get the logical length back.

use bitflags::bitflags;

bitflags! {
    /// Per-directive conversion flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FmtFlags: u8 {
        /// Pad the field with zeros instead of spaces.
        const ZERO_PAD  = 1 << 0;
        /// Interpret the value as signed.
        const SIGNED    = 1 << 1;
        /// Emit `+` for non-negative signed values.
        const PLUS      = 1 << 2;
        /// Emit a space for non-negative signed values.
        const SPACE     = 1 << 3;
        /// Left-justify within the field. Disables zero padding.
        const LEFT      = 1 << 4;
        /// Alternate form: `0` prefix for octal, `0x`/`0X` for hex.
        const ALTERNATE = 1 << 5;
        /// Uppercase digit set.
        const UPPER     = 1 << 6;
    }
}

const SMALL_DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const LARGE_DIGITS: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Bounded byte writer. Stores only while within capacity but always
/// advances the logical position, so the caller can detect truncation.
pub struct Sink<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> Sink<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        Sink { buf, pos: 0 }
    }

    #[inline]
    pub fn put(&mut self, byte: u8) {
        if self.pos < self.buf.len() {
            self.buf[self.pos] = byte;
        }
        self.pos += 1;
    }

    /// Logical count of bytes produced, which may exceed the capacity.
    #[inline]
    pub fn written(&self) -> usize {
        self.pos
    }
}

/// One formatting argument. Conversions are forgiving: a mismatched or
/// missing argument renders as zero or an empty string, never a panic.
#[derive(Debug, Clone, Copy)]
pub enum Arg<'a> {
    Uint(u32),
    Int(i32),
    Str(&'a str),
    Char(u8),
}

impl<'a> Arg<'a> {
    fn as_u32(&self) -> u32 {
        match *self {
            Arg::Uint(v) => v,
            Arg::Int(v) => v as u32,
            Arg::Char(c) => c as u32,
            Arg::Str(_) => 0,
        }
    }

    fn as_str(&self) -> &'a str {
        match *self {
            Arg::Str(s) => s,
            _ => "",
        }
    }
}

impl From<u32> for Arg<'_> {
    fn from(v: u32) -> Self {
        Arg::Uint(v)
    }
}

impl From<usize> for Arg<'_> {
    fn from(v: usize) -> Self {
        Arg::Uint(v as u32)
    }
}

impl From<u8> for Arg<'_> {
    fn from(v: u8) -> Self {
        Arg::Uint(v as u32)
    }
}

impl From<i32> for Arg<'_> {
    fn from(v: i32) -> Self {
        Arg::Int(v)
    }
}

impl<'a> From<&'a str> for Arg<'a> {
    fn from(s: &'a str) -> Self {
        Arg::Str(s)
    }
}

impl From<char> for Arg<'_> {
    fn from(c: char) -> Self {
        Arg::Char(c as u8)
    }
}

/// Render `value` in `base` into `out`.
///
/// `field_width` and `precision` may be negative, meaning "none". The width
/// budget is consumed in order: sign, alternate-form prefix, then padding.
/// Digits are produced least-significant first into a scratch array and
/// reversed out.
///
/// `base` must be in `[2, 36]`.
pub fn format_number(
    out: &mut Sink<'_>,
    value: u32,
    base: u32,
    field_width: i32,
    precision: i32,
    flags: FmtFlags,
) {
    debug_assert!((2..=36).contains(&base));

    let mut flags = flags;
    if flags.contains(FmtFlags::LEFT) {
        flags.remove(FmtFlags::ZERO_PAD);
    }
    let digits = if flags.contains(FmtFlags::UPPER) {
        LARGE_DIGITS
    } else {
        SMALL_DIGITS
    };
    let pad = if flags.contains(FmtFlags::ZERO_PAD) {
        b'0'
    } else {
        b' '
    };

    let mut size = field_width;
    let mut num = value;
    let mut sign = 0u8;
    if flags.contains(FmtFlags::SIGNED) {
        if (value as i32) < 0 {
            sign = b'-';
            num = (value as i32).unsigned_abs();
            size -= 1;
        } else if flags.contains(FmtFlags::PLUS) {
            sign = b'+';
            size -= 1;
        } else if flags.contains(FmtFlags::SPACE) {
            sign = b' ';
            size -= 1;
        }
    }
    if flags.contains(FmtFlags::ALTERNATE) {
        if base == 16 {
            size -= 2;
        } else if base == 8 {
            size -= 1;
        }
    }

    // Scratch for the digits, least significant first. 32 binary digits is
    // the worst case for a u32.
    let mut tmp = [0u8; 33];
    let mut ndigits = 0usize;
    if num == 0 {
        tmp[0] = b'0';
        ndigits = 1;
    } else {
        while num != 0 {
            tmp[ndigits] = digits[(num % base) as usize];
            ndigits += 1;
            num /= base;
        }
    }

    let mut precision = precision;
    if ndigits as i32 > precision {
        precision = ndigits as i32;
    }
    size -= precision;

    if !flags.intersects(FmtFlags::ZERO_PAD | FmtFlags::LEFT) {
        while size > 0 {
            size -= 1;
            out.put(b' ');
        }
    }
    if sign != 0 {
        out.put(sign);
    }
    if flags.contains(FmtFlags::ALTERNATE) {
        if base == 8 {
            out.put(b'0');
        } else if base == 16 {
            out.put(b'0');
            out.put(digits[33]);
        }
    }
    if !flags.contains(FmtFlags::LEFT) {
        while size > 0 {
            size -= 1;
            out.put(pad);
        }
    }
    while (ndigits as i32) < precision {
        precision -= 1;
        out.put(b'0');
    }
    while ndigits > 0 {
        ndigits -= 1;
        out.put(tmp[ndigits]);
    }
    while size > 0 {
        size -= 1;
        out.put(b' ');
    }
}

fn skip_atoi(bytes: &[u8], i: &mut usize) -> i32 {
    let mut n: i32 = 0;
    while let Some(b) = bytes.get(*i) {
        if !b.is_ascii_digit() {
            break;
        }
        n = n.wrapping_mul(10).wrapping_add((b - b'0') as i32);
        *i += 1;
    }
    n
}

/// Expand the template `fmt` into `buf`, taking values from `args` in order.
///
/// Directives are `%[flags][width][.precision]conv` with conv one of
/// `d i u o x X s c %`; an unknown conversion emits `%` and the character
/// verbatim. Returns the logical length, which may exceed the buffer
/// capacity (the excess is discarded).
pub fn format_into(buf: &mut [u8], fmt: &str, args: &[Arg<'_>]) -> usize {
    let mut out = Sink::new(buf);
    let mut args = args.iter();
    let bytes = fmt.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'%' {
            out.put(bytes[i]);
            i += 1;
            continue;
        }
        i += 1;

        let mut flags = FmtFlags::empty();
        loop {
            match bytes.get(i) {
                Some(b'-') => flags |= FmtFlags::LEFT,
                Some(b'+') => flags |= FmtFlags::PLUS,
                Some(b' ') => flags |= FmtFlags::SPACE,
                Some(b'#') => flags |= FmtFlags::ALTERNATE,
                Some(b'0') => flags |= FmtFlags::ZERO_PAD,
                _ => break,
            }
            i += 1;
        }

        let mut field_width: i32 = -1;
        if bytes.get(i).is_some_and(u8::is_ascii_digit) {
            field_width = skip_atoi(bytes, &mut i);
        }

        let mut precision: i32 = -1;
        if bytes.get(i) == Some(&b'.') {
            i += 1;
            precision = skip_atoi(bytes, &mut i).max(0);
        }

        let conv = match bytes.get(i) {
            Some(&c) => c,
            None => break,
        };
        i += 1;

        match conv {
            b'c' => {
                let c = args.next().map(|a| a.as_u32() as u8).unwrap_or(0);
                if !flags.contains(FmtFlags::LEFT) {
                    while field_width > 1 {
                        field_width -= 1;
                        out.put(b' ');
                    }
                }
                out.put(c);
                while field_width > 1 {
                    field_width -= 1;
                    out.put(b' ');
                }
            }
            b's' => {
                let s = args.next().map(|a| a.as_str()).unwrap_or("");
                let len = if precision >= 0 {
                    s.len().min(precision as usize)
                } else {
                    s.len()
                };
                if !flags.contains(FmtFlags::LEFT) {
                    while (len as i32) < field_width {
                        field_width -= 1;
                        out.put(b' ');
                    }
                }
                for &b in &s.as_bytes()[..len] {
                    out.put(b);
                }
                while (len as i32) < field_width {
                    field_width -= 1;
                    out.put(b' ');
                }
            }
            b'%' => out.put(b'%'),
            b'o' => {
                let v = args.next().map(|a| a.as_u32()).unwrap_or(0);
                format_number(&mut out, v, 8, field_width, precision, flags);
            }
            b'x' => {
                let v = args.next().map(|a| a.as_u32()).unwrap_or(0);
                format_number(&mut out, v, 16, field_width, precision, flags);
            }
            b'X' => {
                let v = args.next().map(|a| a.as_u32()).unwrap_or(0);
                format_number(
                    &mut out,
                    v,
                    16,
                    field_width,
                    precision,
                    flags | FmtFlags::UPPER,
                );
            }
            b'd' | b'i' => {
                let v = args.next().map(|a| a.as_u32()).unwrap_or(0);
                format_number(
                    &mut out,
                    v,
                    10,
                    field_width,
                    precision,
                    flags | FmtFlags::SIGNED,
                );
            }
            b'u' => {
                let v = args.next().map(|a| a.as_u32()).unwrap_or(0);
                format_number(&mut out, v, 10, field_width, precision, flags);
            }
            other => {
                out.put(b'%');
                out.put(other);
            }
        }
    }
    out.written()
}

/// Like [`format_into`], but the returned count is clipped to
/// `buf.len() - 1` whenever the logical length reached or exceeded the
/// capacity. The final byte stays reserved, mirroring the terminator
/// convention of fixed C-string buffers.
pub fn format_clipped(buf: &mut [u8], fmt: &str, args: &[Arg<'_>]) -> usize {
    let n = format_into(buf, fmt, args);
    if n >= buf.len() {
        buf.len().saturating_sub(1)
    } else {
        n
    }
}
