//! The extension contract.
//!
//! # Lifecycle
//!
//! 1. The host calls [`Plugin::init`] once and builds a watch table from the
//!    returned registrations. The list never changes afterwards.
//! 2. Every watched memory write, watched port read and registered hotkey is
//!    delivered to the plugin synchronously, in emulation order.
//! 3. [`Plugin::reset`] on machine reset, [`Plugin::tick`] once per emulated
//!    frame, [`Plugin::quit`] at shutdown.

use std::error::Error;

use crate::Host;

/// One thing an extension asks the host to forward to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IoRegistration {
    /// Deliver every CPU write to this memory address.
    MemoryWrite(u16),
    /// Deliver every CPU read (IN) of this I/O port.
    PortRead(u16),
    /// Deliver presses of this key combination, tagged with `id`.
    ///
    /// `combo` uses the host's syntax, e.g. `<ctrl><alt>1`. The id is opaque
    /// to the host and handed back unchanged on each press.
    KeyPress { combo: &'static str, id: u32 },
}

/// An emulator extension.
pub trait Plugin {
    /// Error raised from the write path. The host decides whether it is fatal.
    type Error: Error;

    /// Declare everything the host should forward. Called once.
    fn init(&mut self) -> Vec<IoRegistration>;

    /// Host shutdown.
    fn quit(&mut self) {}

    /// Machine reset.
    fn reset(&mut self) {}

    /// Once per emulated frame.
    fn tick(&mut self) {}

    /// A registered hotkey was pressed.
    ///
    /// Returns `true` if the plugin handled the key and nobody else should.
    fn key_pressed(&mut self, host: &mut dyn Host, id: u32) -> bool;

    /// The CPU is writing `value` to a watched address.
    ///
    /// Called before the write lands in guest memory. Returns `Ok(true)` to
    /// suppress the write, `Ok(false)` to let it through.
    fn write(&mut self, host: &dyn Host, address: u16, value: u8) -> Result<bool, Self::Error>;

    /// The CPU is reading a watched port.
    ///
    /// `Some(byte)` is a valid read and supplies the value the CPU sees;
    /// `None` means the plugin does not answer for this port.
    fn read(&mut self, host: &dyn Host, port: u16) -> Option<u8>;
}
