//! Shared test doubles for the hardware seams.

use crate::console::CharIo;
use crate::mem::Memory;
use crate::monitor::{BootMedia, BootOutcome, SysCtl};
use std::cell::Cell;
use std::collections::VecDeque;

/// Scripted character device: reads come from a fixed byte queue, writes are
/// captured.
pub struct ScriptIo {
    input: VecDeque<u8>,
    pub output: Vec<u8>,
}

impl ScriptIo {
    pub fn new(input: &[u8]) -> Self {
        ScriptIo {
            input: input.iter().copied().collect(),
            output: Vec::new(),
        }
    }

    pub fn output_str(&self) -> String {
        String::from_utf8_lossy(&self.output).into_owned()
    }
}

impl CharIo for ScriptIo {
    fn read_char(&mut self) -> u8 {
        self.input.pop_front().expect("input script exhausted")
    }

    fn char_available(&mut self) -> bool {
        !self.input.is_empty()
    }

    fn write_char(&mut self, byte: u8) {
        self.output.push(byte);
    }
}

/// Flat little-endian memory with access counters, so tests can assert that
/// rejected commands never touch it. Out-of-range reads return zero and
/// out-of-range writes are dropped.
pub struct ArrayMemory {
    bytes: Vec<u8>,
    reads: Cell<usize>,
    writes: usize,
}

impl ArrayMemory {
    pub fn new(size: usize) -> Self {
        ArrayMemory {
            bytes: vec![0; size],
            reads: Cell::new(0),
            writes: 0,
        }
    }

    /// Seed a region without counting accesses.
    pub fn load(&mut self, addr: u32, data: &[u8]) {
        let start = addr as usize;
        self.bytes[start..start + data.len()].copy_from_slice(data);
    }

    pub fn reads(&self) -> usize {
        self.reads.get()
    }

    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl Memory for ArrayMemory {
    fn read_byte(&self, addr: u32) -> u8 {
        self.reads.set(self.reads.get() + 1);
        self.bytes.get(addr as usize).copied().unwrap_or(0)
    }

    fn read_word(&self, addr: u32) -> u32 {
        u32::from_le_bytes([
            self.read_byte(addr),
            self.read_byte(addr.wrapping_add(1)),
            self.read_byte(addr.wrapping_add(2)),
            self.read_byte(addr.wrapping_add(3)),
        ])
    }

    fn write_word(&mut self, addr: u32, value: u32) {
        self.writes += 1;
        for (i, b) in value.to_le_bytes().into_iter().enumerate() {
            if let Some(slot) = self.bytes.get_mut(addr as usize + i) {
                *slot = b;
            }
        }
    }
}

/// Boot-loader double: records each `allow_fallback` flag and returns a
/// scripted outcome.
pub struct ScriptBoot {
    outcome: BootOutcome,
    pub calls: Vec<bool>,
}

impl ScriptBoot {
    pub fn not_found() -> Self {
        ScriptBoot {
            outcome: BootOutcome::NotFound,
            calls: Vec::new(),
        }
    }

    pub fn started() -> Self {
        ScriptBoot {
            outcome: BootOutcome::Started,
            calls: Vec::new(),
        }
    }
}

impl BootMedia for ScriptBoot {
    fn attempt_boot(&mut self, allow_fallback: bool) -> BootOutcome {
        self.calls.push(allow_fallback);
        self.outcome
    }
}

/// System-control double with a fixed board id and a reset counter.
pub struct NullCtl {
    id: u32,
    pub resets: usize,
}

impl NullCtl {
    pub fn new(id: u32) -> Self {
        NullCtl { id, resets: 0 }
    }
}

impl SysCtl for NullCtl {
    fn board_id(&self) -> u32 {
        self.id
    }

    fn reset(&mut self) {
        self.resets += 1;
    }
}
