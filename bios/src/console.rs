//! Line-oriented console on top of a character device.
//!
//! `CharIo` is the hardware seam: the target binary backs it with the UART,
//! tests with a scripted byte queue. `Console` layers the interactive line
//! reader and the template-formatted output path on top.

use crate::fmt::{format_clipped, Arg};

/// Character device contract consumed by the monitor.
pub trait CharIo {
    /// Blocking read of one byte.
    fn read_char(&mut self) -> u8;
    /// Non-blocking poll, used only inside the boot abort window.
    fn char_available(&mut self) -> bool;
    fn write_char(&mut self, byte: u8);
}

/// Maximum printable characters on one command line.
pub const LINE_CAPACITY: usize = 63;

/// One command line. Fixed capacity, cleared on every shell iteration.
pub type LineBuf = heapless::Vec<u8, LINE_CAPACITY>;

/// Staging buffer for one formatted write.
const PRINTF_BUF: usize = 256;

pub struct Console<T: CharIo> {
    pub io: T,
}

impl<T: CharIo> Console<T> {
    pub fn new(io: T) -> Self {
        Console { io }
    }

    pub fn write_char(&mut self, byte: u8) {
        self.io.write_char(byte);
    }

    pub fn write_str(&mut self, s: &str) {
        for &b in s.as_bytes() {
            self.io.write_char(b);
        }
    }

    /// Write `s` followed by a newline.
    pub fn puts(&mut self, s: &str) {
        self.write_str(s);
        self.io.write_char(b'\n');
    }

    /// Expand a `%`-directive template and write it out. Returns the number
    /// of characters written (clipped at the staging capacity).
    pub fn printf(&mut self, fmt: &str, args: &[Arg<'_>]) -> usize {
        let mut buf = [0u8; PRINTF_BUF];
        let n = format_clipped(&mut buf, fmt, args);
        for &b in &buf[..n] {
            self.io.write_char(b);
        }
        n
    }

    /// Read one line, blocking until CR or LF.
    ///
    /// Every accepted character is echoed, and a newline is echoed on
    /// completion. Backspace and delete erase destructively with the
    /// `BS SP BS` sequence and refuse to erase past the start. Input beyond
    /// the buffer capacity is dropped without echo, and only printable
    /// ASCII is accepted, so the buffer always holds valid UTF-8.
    pub fn read_line(&mut self, line: &mut LineBuf) {
        line.clear();
        loop {
            let c = self.io.read_char();
            match c {
                0x08 | 0x7f => {
                    if line.pop().is_some() {
                        self.write_str("\x08 \x08");
                    }
                }
                b'\r' | b'\n' => {
                    self.io.write_char(b'\n');
                    return;
                }
                0x20..=0x7e => {
                    if line.push(c).is_ok() {
                        self.io.write_char(c);
                    }
                }
                _ => {}
            }
        }
    }
}

/// Template-formatted print through a [`Console`].
///
/// `bprintf!(con, "CRC32: %08x\n", value)` builds the argument slice and
/// forwards to [`Console::printf`].
#[macro_export]
macro_rules! bprintf {
    ($con:expr, $fmt:expr) => {
        $con.printf($fmt, &[])
    };
    ($con:expr, $fmt:expr, $($arg:expr),+ $(,)?) => {
        $con.printf($fmt, &[$($crate::fmt::Arg::from($arg)),+])
    };
}
