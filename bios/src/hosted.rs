//! Hosted stand-in: the monitor over stdio with an array-backed memory, so
//! the whole shell can be driven without hardware.
//!
//! Stdin stays line-buffered, which means the terminal echoes once more
//! than a real serial console would. Reaching end of input ends the
//! session.

use std::io::{Read, Write};

use bios_lib::board::BOARD_ID_QEMU_VIRT;
use bios_lib::console::{CharIo, Console};
use bios_lib::mem::Memory;
use bios_lib::monitor::{BootMedia, BootOutcome, Monitor, MonitorConfig, SysCtl};

/// Simulated address space size. Addresses wrap into it.
const MEM_SIZE: usize = 1 << 20;

struct StdioConsole;

impl CharIo for StdioConsole {
    fn read_char(&mut self) -> u8 {
        let mut byte = [0u8; 1];
        match std::io::stdin().read(&mut byte) {
            Ok(1) => byte[0],
            _ => std::process::exit(0),
        }
    }

    fn char_available(&mut self) -> bool {
        false
    }

    fn write_char(&mut self, byte: u8) {
        let mut out = std::io::stdout();
        let _ = out.write_all(&[byte]);
        let _ = out.flush();
    }
}

struct SimMemory {
    bytes: Vec<u8>,
}

impl SimMemory {
    fn new() -> Self {
        SimMemory {
            bytes: vec![0; MEM_SIZE],
        }
    }

    fn index(addr: u32) -> usize {
        addr as usize & (MEM_SIZE - 1)
    }
}

impl Memory for SimMemory {
    fn read_byte(&self, addr: u32) -> u8 {
        self.bytes[Self::index(addr)]
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
        for (i, b) in value.to_le_bytes().into_iter().enumerate() {
            let idx = Self::index(addr.wrapping_add(i as u32));
            self.bytes[idx] = b;
        }
    }
}

struct NoMedia;

impl BootMedia for NoMedia {
    fn attempt_boot(&mut self, _allow_fallback: bool) -> BootOutcome {
        BootOutcome::NotFound
    }
}

struct SimCtl;

impl SysCtl for SimCtl {
    fn board_id(&self) -> u32 {
        BOARD_ID_QEMU_VIRT
    }

    fn reset(&mut self) {
        std::process::exit(0);
    }
}

pub fn run() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let mut monitor = Monitor::new(
        Console::new(StdioConsole),
        SimMemory::new(),
        NoMedia,
        SimCtl,
        MonitorConfig::default(),
    );
    if monitor.startup().is_err() {
        std::process::exit(1);
    }
    monitor.run();
}
