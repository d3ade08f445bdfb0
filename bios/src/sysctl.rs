//! Board identity and reset through the sifive_test device.
//!
//! QEMU's virt machine exposes a test finisher at 0x10_0000; writing the
//! reset code there restarts the machine. The machine has no identity
//! register, so the reported board id is fixed at build time.

use bios_lib::board::BOARD_ID_QEMU_VIRT;
use bios_lib::monitor::SysCtl;

const TEST_DEVICE: usize = 0x10_0000;
const FINISHER_RESET: u32 = 0x7777;

pub struct SifiveTest;

impl SifiveTest {
    pub const fn new() -> Self {
        SifiveTest
    }
}

impl SysCtl for SifiveTest {
    fn board_id(&self) -> u32 {
        BOARD_ID_QEMU_VIRT
    }

    fn reset(&mut self) {
        unsafe {
            core::ptr::write_volatile(TEST_DEVICE as *mut u32, FINISHER_RESET);
        }
        // The write above restarts the machine; nothing to do if it is still
        // in flight.
        loop {
            unsafe {
                riscv::asm::wfi();
            }
        }
    }
}
