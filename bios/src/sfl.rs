//! Serial boot collaborator.
//!
//! The monitor owns only the liveness probe: send the magic request and wait
//! a bounded time for the magic answer from a download agent on the other
//! end of the link. The frame transfer engine belongs to the next boot
//! stage, not to the resident monitor; until an agent both answers and a
//! transfer stage is resident, every attempt reports `NotFound`.

use crate::uart::Uart;
use bios_lib::monitor::{BootMedia, BootOutcome};

const SFL_MAGIC_REQ: &[u8] = b"sL5DdSMmkekro\n";
const SFL_MAGIC_ACK: &[u8] = b"z6IHG7cYDID6o\n";

/// Poll iterations while waiting for the answer. An iteration count, like
/// the boot abort window.
const ACK_BUDGET: u32 = 2_000_000;

pub struct SflLoader {
    uart: Uart,
}

impl SflLoader {
    pub const fn new() -> Self {
        SflLoader { uart: Uart::new() }
    }

    fn wait_ack(&mut self) -> bool {
        let mut matched = 0;
        for _ in 0..ACK_BUDGET {
            if !self.uart.data_ready() {
                continue;
            }
            let c = self.uart.read_byte();
            if c == SFL_MAGIC_ACK[matched] {
                matched += 1;
                if matched == SFL_MAGIC_ACK.len() {
                    return true;
                }
            } else {
                matched = 0;
            }
        }
        false
    }
}

impl BootMedia for SflLoader {
    // The probe has no second medium to consult, so the fallback flag has
    // nothing to select here.
    fn attempt_boot(&mut self, _allow_fallback: bool) -> BootOutcome {
        for &b in SFL_MAGIC_REQ {
            self.uart.write_byte(b);
        }
        if !self.wait_ack() {
            return BootOutcome::NotFound;
        }
        log::warn!("Serial agent answered but no transfer stage is resident");
        BootOutcome::NotFound
    }
}
