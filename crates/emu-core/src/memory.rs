//! Flat 64K RAM host.
//!
//! No ROM, no banking, no contention. Used to run extensions headlessly
//! against a loaded memory image, and as a test fixture.

use crate::Host;

const MEMORY_SIZE: usize = 0x1_0000;

/// 64K of flat, fully writable memory.
pub struct FlatMemory {
    ram: Box<[u8; MEMORY_SIZE]>,
}

impl FlatMemory {
    #[must_use]
    pub fn new() -> Self {
        Self {
            ram: Box::new([0; MEMORY_SIZE]),
        }
    }

    /// Copy `bytes` into memory starting at `address`, wrapping at $FFFF.
    pub fn load(&mut self, address: u16, bytes: &[u8]) {
        for (i, &byte) in bytes.iter().enumerate() {
            self.ram[address.wrapping_add(i as u16) as usize] = byte;
        }
    }

    /// The whole address space.
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.ram[..]
    }
}

impl Default for FlatMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl Host for FlatMemory {
    fn peek_into(&self, address: u16, buf: &mut [u8]) {
        let start = address as usize;
        let end = start + buf.len();
        if end <= MEMORY_SIZE {
            buf.copy_from_slice(&self.ram[start..end]);
        } else {
            for (i, slot) in buf.iter_mut().enumerate() {
                *slot = self.ram[address.wrapping_add(i as u16) as usize];
            }
        }
    }

    fn poke(&mut self, address: u16, value: u8) {
        self.ram[address as usize] = value;
    }
}
