//! BogoBIOS binary: bare-metal bindings for the RISC-V target, or a stdio
//! simulator on a hosted platform.

#![cfg_attr(target_os = "none", no_std)]
#![cfg_attr(target_os = "none", no_main)]

#[cfg(target_os = "none")]
mod entry;
#[cfg(target_os = "none")]
mod logger;
#[cfg(target_os = "none")]
mod physmem;
#[cfg(target_os = "none")]
mod sfl;
#[cfg(target_os = "none")]
mod sysctl;
#[cfg(target_os = "none")]
mod uart;

#[cfg(not(target_os = "none"))]
mod hosted;

#[cfg(target_os = "none")]
mod bare {
    use bios_lib::console::Console;
    use bios_lib::monitor::{Monitor, MonitorConfig};

    use crate::{logger, physmem, sfl, sysctl, uart};

    /// Link base of the resident image, kept in sync with memory.ld.
    const IMAGE_BASE: u32 = 0x8020_0000;

    extern "C" {
        /// End of the resident image. The packaging tool writes the expected
        /// CRC-32 into the word at this address, so the symbol gives both the
        /// image length and the location of the expected value.
        static _edata: u32;
    }

    #[no_mangle]
    extern "C" fn rust_start() -> ! {
        logger::init();

        let image_end = unsafe { core::ptr::addr_of!(_edata) } as usize as u32;
        let cfg = MonitorConfig {
            image_base: IMAGE_BASE,
            image_end,
            ..MonitorConfig::default()
        };
        let mut monitor = Monitor::new(
            Console::new(uart::Uart::new()),
            physmem::PhysMemory,
            sfl::SflLoader::new(),
            sysctl::SifiveTest::new(),
            cfg,
        );

        if monitor.startup().is_err() {
            // Unknown board: halt permanently.
            halt();
        }
        monitor.run();
        halt()
    }

    pub fn halt() -> ! {
        loop {
            unsafe {
                riscv::asm::wfi();
            }
        }
    }
}

#[cfg(target_os = "none")]
#[panic_handler]
fn panic(info: &core::panic::PanicInfo) -> ! {
    use core::fmt::Write;
    let mut uart = uart::Uart::new();
    let _ = writeln!(uart, "\n*** BIOS PANIC ***");
    if let Some(loc) = info.location() {
        let _ = writeln!(uart, "at {}:{}:{}", loc.file(), loc.line(), loc.column());
    }
    let _ = writeln!(uart, "{}", info.message());
    bare::halt()
}

#[cfg(not(target_os = "none"))]
fn main() {
    hosted::run();
}
