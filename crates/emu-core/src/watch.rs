//! Watch table: the host's index of what a plugin registered.
//!
//! Memory writes are the hot path, so address lookups are a single bit test
//! into a 64K bitmap.

use std::collections::HashMap;

use crate::IoRegistration;

/// Which events the host forwards to a plugin.
pub struct WatchTable {
    /// One bit per address in the 64K space.
    write_bits: Box<[u64; 1024]>,
    /// One bit per port in the 64K port space.
    port_bits: Box<[u64; 1024]>,
    keys: HashMap<&'static str, u32>,
}

impl WatchTable {
    #[must_use]
    pub fn new(registrations: &[IoRegistration]) -> Self {
        let mut table = Self {
            write_bits: Box::new([0; 1024]),
            port_bits: Box::new([0; 1024]),
            keys: HashMap::new(),
        };
        for registration in registrations {
            match *registration {
                IoRegistration::MemoryWrite(address) => set_bit(&mut table.write_bits, address),
                IoRegistration::PortRead(port) => set_bit(&mut table.port_bits, port),
                IoRegistration::KeyPress { combo, id } => {
                    table.keys.insert(combo, id);
                }
            }
        }
        table
    }

    #[must_use]
    pub fn watches_write(&self, address: u16) -> bool {
        test_bit(&self.write_bits, address)
    }

    #[must_use]
    pub fn watches_port_read(&self, port: u16) -> bool {
        test_bit(&self.port_bits, port)
    }

    /// The id registered for a key combination, if any.
    #[must_use]
    pub fn key_id(&self, combo: &str) -> Option<u32> {
        self.keys.get(combo).copied()
    }

    /// Number of watched memory addresses.
    #[must_use]
    pub fn write_watch_count(&self) -> usize {
        self.write_bits.iter().map(|w| w.count_ones() as usize).sum()
    }
}

fn set_bit(bits: &mut [u64; 1024], index: u16) {
    bits[(index >> 6) as usize] |= 1u64 << (index & 63);
}

fn test_bit(bits: &[u64; 1024], index: u16) -> bool {
    bits[(index >> 6) as usize] & (1u64 << (index & 63)) != 0
}
