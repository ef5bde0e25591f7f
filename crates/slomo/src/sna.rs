//! SNA snapshot RAM loader.
//!
//! Headless replays need the guest's memory, not its CPU state, so only the
//! RAM image is taken. Both layouts start with a 27-byte register header
//! followed by 48K of RAM as paged in at $4000-$FFFF; the 128K extension
//! (remaining banks) is ignored.

use emu_core::FlatMemory;

use crate::error::{Result, SloMoError};

/// Size of a 48K SNA snapshot file.
const SNA_48K_SIZE: usize = 49_179;

/// Size of a 128K SNA snapshot file.
const SNA_128K_SIZE: usize = 131_103;

/// Register header size.
const HEADER_SIZE: usize = 27;

/// RAM dump size ($4000-$FFFF).
const RAM_SIZE: usize = 49_152;

/// Where the RAM dump starts in the address space.
const RAM_BASE: u16 = 0x4000;

/// Load the RAM image of an SNA snapshot into `memory`.
pub fn load_sna(memory: &mut FlatMemory, data: &[u8]) -> Result<()> {
    match data.len() {
        SNA_48K_SIZE | SNA_128K_SIZE => {
            memory.load(RAM_BASE, &data[HEADER_SIZE..HEADER_SIZE + RAM_SIZE]);
            log::debug!("Loaded {RAM_SIZE} bytes of snapshot RAM");
            Ok(())
        }
        n => Err(SloMoError::Snapshot(format!(
            "SNA file must be {SNA_48K_SIZE} (48K) or {SNA_128K_SIZE} (128K) bytes, got {n}"
        ))),
    }
}
