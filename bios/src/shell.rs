//! Interactive command shell: dispatcher, memory commands, dump renderer.
//!
//! Handlers receive their raw tokens (never absent, possibly empty) and
//! validate everything before touching memory, so a rejected command has no
//! side effects. Commands are not transactional with respect to each other.

use crate::bprintf;
use crate::console::{CharIo, LineBuf};
use crate::crc::Crc32;
use crate::mem::Memory;
use crate::monitor::{BootMedia, BootOutcome, Monitor, SysCtl};
use crate::scan::parse_exact;
use crate::token::Cursor;
use log::error;

/// Shell prompt, bold.
pub const PROMPT: &str = "\x1b[1mBIOS>\x1b[0m ";

const BYTES_PER_LINE: u32 = 16;

const MR_USAGE: &str = "mr <address> [length]";
const MW_USAGE: &str = "mw <address> <value> [count]";
const MC_USAGE: &str = "mc <dst> <src> [count]";
const CRC_USAGE: &str = "crc <address> <length>";

/// What the command loop should do after a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Reboot,
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    /// A required token was empty; the command's usage line is printed and
    /// nothing else happens.
    #[error("{0}")]
    Usage(&'static str),
    /// A numeric token had characters left over after parsing.
    #[error("incorrect {0}")]
    Parse(&'static str),
}

impl<C: CharIo, M: Memory, B: BootMedia, S: SysCtl> Monitor<C, M, B, S> {
    /// One prompt/read/execute iteration of the interactive loop.
    pub(crate) fn shell_once(&mut self) {
        self.con.write_str(PROMPT);
        let mut line = LineBuf::new();
        self.con.read_line(&mut line);
        let text = core::str::from_utf8(&line).unwrap_or("");
        if self.execute_line(text) == Control::Reboot {
            self.sys.reset();
        }
    }

    /// Tokenize and dispatch one command line.
    pub fn execute_line(&mut self, line: &str) -> Control {
        let mut cur = Cursor::new(line);
        let result = match cur.next_token() {
            "mr" => {
                let addr = cur.next_token();
                let len = cur.next_token();
                self.cmd_mr(addr, len)
            }
            "mw" => {
                let addr = cur.next_token();
                let value = cur.next_token();
                let count = cur.next_token();
                self.cmd_mw(addr, value, count)
            }
            "mc" => {
                let dst = cur.next_token();
                let src = cur.next_token();
                let count = cur.next_token();
                self.cmd_mc(dst, src, count)
            }
            "crc" => {
                let addr = cur.next_token();
                let len = cur.next_token();
                self.cmd_crc(addr, len)
            }
            "serialboot" => {
                self.cmd_serialboot();
                Ok(())
            }
            "reboot" => return Control::Reboot,
            "help" => {
                self.cmd_help();
                Ok(())
            }
            "" => Ok(()),
            _ => {
                self.con.puts("Command not found");
                Ok(())
            }
        };
        if let Err(err) = result {
            self.report(err);
        }
        Control::Continue
    }

    fn report(&mut self, err: CommandError) {
        match err {
            CommandError::Usage(usage) => self.con.puts(usage),
            CommandError::Parse(field) => {
                bprintf!(self.con, "incorrect %s\n", field);
            }
        }
    }

    fn cmd_mr(&mut self, addr: &str, len: &str) -> Result<(), CommandError> {
        if addr.is_empty() {
            return Err(CommandError::Usage(MR_USAGE));
        }
        let addr = parse_exact(addr).ok_or(CommandError::Parse("address"))?;
        let length = if len.is_empty() {
            1
        } else {
            parse_exact(len).ok_or(CommandError::Parse("length"))?
        };
        self.dump_bytes(addr, length);
        Ok(())
    }

    fn cmd_mw(&mut self, addr: &str, value: &str, count: &str) -> Result<(), CommandError> {
        if addr.is_empty() || value.is_empty() {
            return Err(CommandError::Usage(MW_USAGE));
        }
        let addr = parse_exact(addr).ok_or(CommandError::Parse("address"))?;
        let value = parse_exact(value).ok_or(CommandError::Parse("value"))?;
        let count = if count.is_empty() {
            1
        } else {
            parse_exact(count).ok_or(CommandError::Parse("count"))?
        };
        let mut a = addr;
        for _ in 0..count {
            self.mem.write_word(a, value);
            a = a.wrapping_add(4);
        }
        Ok(())
    }

    fn cmd_mc(&mut self, dst: &str, src: &str, count: &str) -> Result<(), CommandError> {
        if dst.is_empty() || src.is_empty() {
            return Err(CommandError::Usage(MC_USAGE));
        }
        let dst = parse_exact(dst).ok_or(CommandError::Parse("destination address"))?;
        let src = parse_exact(src).ok_or(CommandError::Parse("source address"))?;
        let count = if count.is_empty() {
            1
        } else {
            parse_exact(count).ok_or(CommandError::Parse("count"))?
        };
        // Forward, word at a time. Backward-overlapping ranges are not
        // corrected for.
        let mut d = dst;
        let mut s = src;
        for _ in 0..count {
            let word = self.mem.read_word(s);
            self.mem.write_word(d, word);
            d = d.wrapping_add(4);
            s = s.wrapping_add(4);
        }
        Ok(())
    }

    fn cmd_crc(&mut self, addr: &str, len: &str) -> Result<(), CommandError> {
        if addr.is_empty() || len.is_empty() {
            return Err(CommandError::Usage(CRC_USAGE));
        }
        let addr = parse_exact(addr).ok_or(CommandError::Parse("address"))?;
        let length = parse_exact(len).ok_or(CommandError::Parse("length"))?;
        let mut crc = Crc32::new();
        for i in 0..length {
            crc.update(self.mem.read_byte(addr.wrapping_add(i)));
        }
        bprintf!(self.con, "CRC32: %08x\n", crc.finish());
        Ok(())
    }

    fn cmd_serialboot(&mut self) {
        // Manual attempt from the shell: no fallback, we are already here.
        if self.boot.attempt_boot(false) == BootOutcome::NotFound {
            error!("No boot medium found");
        }
    }

    fn cmd_help(&mut self) {
        self.con.puts("This is the BogoBIOS debug shell.");
        self.con.puts("Available commands:");
        self.con.puts("mr         - read address space");
        self.con.puts("mw         - write address space");
        self.con.puts("mc         - copy address space");
        self.con
            .puts("crc        - compute CRC32 of a part of the address space");
        self.con.puts("serialboot - attempt serial boot");
        self.con.puts("reboot     - system reset");
    }

    /// Canonical hex+ASCII dump. Rows carry exactly 16 data columns; a short
    /// final row is padded so the columns stay aligned. Each row's leading
    /// address is the row's own starting offset.
    fn dump_bytes(&mut self, start: u32, count: u32) {
        self.con.write_str("Memory dump:");
        let mut addr = start;
        let mut remaining = count;
        while remaining > 0 {
            let row = remaining.min(BYTES_PER_LINE);
            bprintf!(self.con, "\n0x%08x  ", addr);
            for i in 0..row {
                bprintf!(self.con, "%02x ", self.mem.read_byte(addr.wrapping_add(i)));
            }
            for _ in row..BYTES_PER_LINE {
                self.con.write_str("   ");
            }
            self.con.write_str(" ");
            for i in 0..row {
                let b = self.mem.read_byte(addr.wrapping_add(i));
                let shown = if (0x20..=0x7e).contains(&b) { b } else { b'.' };
                self.con.write_char(shown);
            }
            for _ in row..BYTES_PER_LINE {
                self.con.write_char(b' ');
            }
            remaining -= row;
            addr = addr.wrapping_add(row);
        }
        self.con.write_str("\n");
    }
}
