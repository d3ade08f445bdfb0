//! Process context and boot sequencing.
//!
//! `Monitor` owns everything the resident monitor needs: the console, the
//! address-space handle, the boot-loader and system-control collaborators,
//! the identified board and the configuration. No monitor state lives in
//! globals; the context is created once in the entry path and threaded
//! through startup and the loop.
//!
//! Boot sequencing is an explicit state machine:
//! `AbortWindow -> {Shell, AttemptBoot}`, `AttemptBoot -> Shell` on failure.
//! `Shell` is terminal and loops forever; `reboot` leaves through the
//! hardware reset line, not through a state transition.

use crate::board::{lookup_board, BoardDescriptor};
use crate::console::{CharIo, Console};
use crate::integrity;
use crate::mem::Memory;
use log::{error, info, warn};

pub const BANNER: &str = concat!(
    "\nBogoBIOS v",
    env!("CARGO_PKG_VERSION"),
    " debug monitor\n",
    "Type 'help' for a list of commands.\n\n"
);

/// Keystroke that redirects the boot sequence into the shell.
pub const ABORT_KEY: u8 = b'Q';

/// Outcome reported by the boot-loader collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootOutcome {
    /// The loader took control; no return is expected.
    Started,
    /// No boot medium answered.
    NotFound,
}

/// Serial boot loader seam. The wire protocol lives behind this trait.
pub trait BootMedia {
    fn attempt_boot(&mut self, allow_fallback: bool) -> BootOutcome;
}

/// Board-level control lines: the identity register and the reset line.
pub trait SysCtl {
    fn board_id(&self) -> u32;
    /// Request a system reset. On real hardware this does not return.
    fn reset(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootState {
    AbortWindow,
    AttemptBoot,
    Shell,
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum StartupError {
    /// The hardware-reported id is not in the board registry. Terminal; the
    /// caller halts.
    #[error("unknown board id {0:#010x}")]
    UnknownBoard(u32),
}

#[derive(Debug, Clone, Copy)]
pub struct MonitorConfig {
    /// First byte of the resident image.
    pub image_base: u32,
    /// One past the last image byte; the expected checksum word lives here.
    pub image_end: u32,
    /// Abort-window poll iterations. An iteration count, not wall clock.
    pub abort_budget: u32,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        MonitorConfig {
            image_base: 0,
            image_end: 0,
            abort_budget: 4_000_000,
        }
    }
}

pub struct Monitor<C: CharIo, M: Memory, B: BootMedia, S: SysCtl> {
    pub(crate) con: Console<C>,
    pub(crate) mem: M,
    pub(crate) boot: B,
    pub(crate) sys: S,
    pub(crate) board: Option<&'static BoardDescriptor>,
    pub(crate) cfg: MonitorConfig,
}

impl<C: CharIo, M: Memory, B: BootMedia, S: SysCtl> Monitor<C, M, B, S> {
    pub fn new(con: Console<C>, mem: M, boot: B, sys: S, cfg: MonitorConfig) -> Self {
        Monitor {
            con,
            mem,
            boot,
            sys,
            board: None,
            cfg,
        }
    }

    pub fn board(&self) -> Option<&'static BoardDescriptor> {
        self.board
    }

    /// Banner, self check, board identification. Runs once before the boot
    /// state machine; an unknown board is the only fatal outcome.
    pub fn startup(&mut self) -> Result<(), StartupError> {
        // Banner as soon as possible, to show the system is alive.
        self.con.write_str(BANNER);
        self.check_bios_crc();
        self.identify_board()
    }

    fn check_bios_crc(&mut self) {
        let report =
            integrity::check_image(&self.mem, self.cfg.image_base, self.cfg.image_end);
        if report.passed() {
            info!("BIOS CRC passed ({:08x})", report.computed);
        } else {
            warn!(
                "BIOS CRC failed (expected {:08x}, got {:08x})",
                report.expected, report.computed
            );
            warn!("The system will continue, but expect problems.");
        }
    }

    fn identify_board(&mut self) -> Result<(), StartupError> {
        let id = self.sys.board_id();
        match lookup_board(id) {
            Some(desc) => {
                self.board = Some(desc);
                info!("Running on {}", desc.name);
                Ok(())
            }
            None => {
                error!("Running on unknown board (ID={id:#010x}), startup aborted");
                Err(StartupError::UnknownBoard(id))
            }
        }
    }

    /// One transition of the boot state machine.
    pub fn advance(&mut self, state: BootState) -> BootState {
        match state {
            BootState::AbortWindow => {
                if self.abort_window() {
                    BootState::Shell
                } else {
                    BootState::AttemptBoot
                }
            }
            BootState::AttemptBoot => match self.boot.attempt_boot(true) {
                // A loader that takes over never returns here.
                BootOutcome::Started => BootState::Shell,
                BootOutcome::NotFound => {
                    error!("No boot medium found");
                    BootState::Shell
                }
            },
            BootState::Shell => {
                self.shell_once();
                BootState::Shell
            }
        }
    }

    /// Drive the machine from the abort window onward. Does not return in
    /// normal operation.
    pub fn run(&mut self) {
        let mut state = BootState::AbortWindow;
        loop {
            state = self.advance(state);
        }
    }

    /// Poll for the abort keystroke for the configured iteration budget.
    /// Other keys are consumed and ignored.
    fn abort_window(&mut self) -> bool {
        info!("Press {} to abort boot", ABORT_KEY as char);
        for _ in 0..self.cfg.abort_budget {
            if self.con.io.char_available() && self.con.io.read_char() == ABORT_KEY {
                info!("Aborted boot on user request");
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::BOARD_ID_QEMU_VIRT;
    use crate::testutil::{ArrayMemory, NullCtl, ScriptBoot, ScriptIo};

    type TestMonitor = Monitor<ScriptIo, ArrayMemory, ScriptBoot, NullCtl>;

    fn monitor(input: &[u8], boot: ScriptBoot, board_id: u32) -> TestMonitor {
        let cfg = MonitorConfig {
            image_base: 0,
            image_end: 0,
            abort_budget: 16,
        };
        Monitor::new(
            Console::new(ScriptIo::new(input)),
            ArrayMemory::new(0x1000),
            boot,
            NullCtl::new(board_id),
            cfg,
        )
    }

    #[test]
    fn test_abort_key_enters_shell() {
        let mut m = monitor(b"Q", ScriptBoot::not_found(), BOARD_ID_QEMU_VIRT);
        assert_eq!(m.advance(BootState::AbortWindow), BootState::Shell);
        // The boot loader was never consulted.
        assert!(m.boot.calls.is_empty());
    }

    #[test]
    fn test_other_key_is_ignored_and_boot_proceeds() {
        let mut m = monitor(b"x", ScriptBoot::not_found(), BOARD_ID_QEMU_VIRT);
        assert_eq!(m.advance(BootState::AbortWindow), BootState::AttemptBoot);
    }

    #[test]
    fn test_expired_window_proceeds_to_boot() {
        let mut m = monitor(b"", ScriptBoot::not_found(), BOARD_ID_QEMU_VIRT);
        assert_eq!(m.advance(BootState::AbortWindow), BootState::AttemptBoot);
    }

    #[test]
    fn test_abort_key_after_other_keys_still_aborts() {
        let mut m = monitor(b"abQ", ScriptBoot::not_found(), BOARD_ID_QEMU_VIRT);
        assert_eq!(m.advance(BootState::AbortWindow), BootState::Shell);
    }

    #[test]
    fn test_boot_not_found_falls_through_to_shell() {
        let mut m = monitor(b"", ScriptBoot::not_found(), BOARD_ID_QEMU_VIRT);
        assert_eq!(m.advance(BootState::AttemptBoot), BootState::Shell);
        // The automatic attempt allows fallback.
        assert_eq!(m.boot.calls, vec![true]);
    }

    #[test]
    fn test_boot_started_hands_control_away() {
        let mut m = monitor(b"", ScriptBoot::started(), BOARD_ID_QEMU_VIRT);
        assert_eq!(m.advance(BootState::AttemptBoot), BootState::Shell);
    }

    #[test]
    fn test_startup_identifies_known_board() {
        let mut m = monitor(b"", ScriptBoot::not_found(), BOARD_ID_QEMU_VIRT);
        assert_eq!(m.startup(), Ok(()));
        assert_eq!(m.board().unwrap().name, "QEMU-VIRT");
        assert!(m.con.io.output_str().contains("BogoBIOS"));
    }

    #[test]
    fn test_startup_unknown_board_is_fatal() {
        let mut m = monitor(b"", ScriptBoot::not_found(), 0x1234_5678);
        assert_eq!(m.startup(), Err(StartupError::UnknownBoard(0x1234_5678)));
        assert!(m.board().is_none());
    }

    #[test]
    fn test_shell_state_runs_one_iteration_and_reboot_resets() {
        let mut m = monitor(b"reboot\r", ScriptBoot::not_found(), BOARD_ID_QEMU_VIRT);
        assert_eq!(m.advance(BootState::Shell), BootState::Shell);
        assert_eq!(m.sys.resets, 1);
    }
}
