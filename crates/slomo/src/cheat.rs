//! Hard-wired pokes for Sidewize.
//!
//! The addresses are specific to one release of the game and must not be
//! changed or derived.

use emu_core::Host;

/// A single-byte guest memory patch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheatPatch {
    pub address: u16,
    pub value: u8,
}

/// Collision check, first half: patched to make the ship invincible.
pub const INVINCIBLE_A: u16 = 52637;
/// Collision check, second half.
pub const INVINCIBLE_B: u16 = 52647;
/// Attribute wait loop, three bytes from here are NOPed out. Registers get
/// corrupted while it spins under emulation.
pub const ATTRIBUTE_WAIT_LOOP: u16 = 0x9CFE;

pub const SIDEWIZE_CHEATS: [CheatPatch; 5] = [
    CheatPatch {
        address: INVINCIBLE_A,
        value: 9,
    },
    CheatPatch {
        address: INVINCIBLE_B,
        value: 9,
    },
    CheatPatch {
        address: ATTRIBUTE_WAIT_LOOP,
        value: 0,
    },
    CheatPatch {
        address: ATTRIBUTE_WAIT_LOOP + 1,
        value: 0,
    },
    CheatPatch {
        address: ATTRIBUTE_WAIT_LOOP + 2,
        value: 0,
    },
];

/// Poke every patch into guest memory. Nothing is read back.
pub fn apply_cheats(host: &mut dyn Host, patches: &[CheatPatch]) {
    for patch in patches {
        host.poke(patch.address, patch.value);
    }
}
