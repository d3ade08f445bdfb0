//! Static board registry.
//!
//! Boards are identified by the hardware-reported id. The registry is fixed
//! at build time; running on a board that is not listed here is fatal at
//! startup.

pub struct BoardDescriptor {
    pub id: u32,
    /// Display name, at most 31 bytes.
    pub name: &'static str,
    /// Core clock in Hz.
    pub clock_frequency: u32,
}

pub const BOARD_ID_QEMU_VIRT: u32 = 0x5649_5254; // "VIRT"
pub const BOARD_ID_SIFIVE_U: u32 = 0x5346_5655; // "SFVU"

static BOARDS: &[BoardDescriptor] = &[
    BoardDescriptor {
        id: BOARD_ID_QEMU_VIRT,
        name: "QEMU-VIRT",
        clock_frequency: 10_000_000,
    },
    BoardDescriptor {
        id: BOARD_ID_SIFIVE_U,
        name: "SIFIVE-U",
        clock_frequency: 1_000_000_000,
    },
];

pub fn lookup_board(id: u32) -> Option<&'static BoardDescriptor> {
    BOARDS.iter().find(|b| b.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_known_board() {
        let board = lookup_board(BOARD_ID_QEMU_VIRT).unwrap();
        assert_eq!(board.name, "QEMU-VIRT");
        assert_eq!(board.clock_frequency, 10_000_000);
    }

    #[test]
    fn test_lookup_unknown_board() {
        assert!(lookup_board(0xdead_beef).is_none());
    }

    #[test]
    fn test_board_ids_are_unique() {
        for (i, a) in BOARDS.iter().enumerate() {
            for b in &BOARDS[i + 1..] {
                assert_ne!(a.id, b.id);
            }
        }
    }

    #[test]
    fn test_board_names_fit_the_descriptor() {
        for b in BOARDS {
            assert!(b.name.len() <= 31);
        }
    }
}
