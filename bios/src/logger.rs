//! Logging backend that writes to the console UART.
//!
//! Startup diagnostics go through the `log` facade with single-letter level
//! prefixes; shell output goes directly through the console and is not
//! logging.

use crate::uart::Uart;
use core::fmt::Write;
use log::{Level, LevelFilter, Log, Metadata, Record};
use spin::Mutex;

static UART: Mutex<Uart> = Mutex::new(Uart::new());
static LOGGER: Logger = Logger;

/// Install the UART logger. Called once, before the monitor context is
/// built.
pub fn init() {
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(LevelFilter::Info);
}

struct Logger;

impl Log for Logger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let mut uart = UART.lock();
            let _ = writeln!(
                uart,
                "{} {}",
                level_prefix(record.level()),
                record.args()
            );
        }
    }

    fn flush(&self) {}
}

fn level_prefix(level: Level) -> &'static str {
    match level {
        Level::Error => "E:",
        Level::Warn => "W:",
        Level::Info => "I:",
        Level::Debug => "D:",
        Level::Trace => "T:",
    }
}
