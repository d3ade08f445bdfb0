//! BogoBIOS core library.
//!
//! Everything the resident debug monitor does lives here behind injectable
//! hardware seams (character I/O, raw memory, boot loader, system control),
//! so the whole monitor is unit-testable on the host while the `bios`
//! binary stays `no_std` and only contributes the bare-metal bindings.
//!
//! Components, leaves first: the formatted-output engine ([`fmt`]) and the
//! numeric literal scanner ([`scan`]); the line console ([`console`]) and
//! tokenizer ([`token`]); CRC-32 ([`crc`]) and the image self check
//! ([`integrity`]); the board registry ([`board`]); the command shell
//! ([`shell`]) and the boot-sequencing process context ([`monitor`]).

#![cfg_attr(not(test), no_std)]

pub mod board;
pub mod console;
pub mod crc;
pub mod fmt;
pub mod integrity;
pub mod mem;
pub mod monitor;
pub mod scan;
pub mod shell;
pub mod token;

#[cfg(test)]
pub(crate) mod testutil;
