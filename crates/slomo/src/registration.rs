//! What the plugin asks the host to forward.

use emu_core::IoRegistration;

use crate::mode::Hotkey;
use crate::screen::{SCREEN_BITMAP_BASE, SCREEN_LENGTH};

/// Port Sidewize polls to find the raster crossing the attribute area.
pub const SIDEWIZE_HSYNC_PORT: u16 = 0x40FF;

/// Every display file address, the four hotkeys, and the hsync port.
#[must_use]
pub fn registrations() -> Vec<IoRegistration> {
    let mut list = Vec::with_capacity(SCREEN_LENGTH + Hotkey::ALL.len() + 1);

    list.extend(
        (0..SCREEN_LENGTH as u16).map(|i| IoRegistration::MemoryWrite(SCREEN_BITMAP_BASE + i)),
    );
    list.extend(Hotkey::ALL.iter().map(|&key| IoRegistration::KeyPress {
        combo: key.combo(),
        id: key.id(),
    }));
    list.push(IoRegistration::PortRead(SIDEWIZE_HSYNC_PORT));

    list
}
