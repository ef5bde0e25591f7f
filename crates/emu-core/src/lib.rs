//! Core traits and types for emulator extensions.
//!
//! An extension ("plugin") never touches the emulated machine directly. It
//! declares up front which memory addresses, I/O ports and hotkeys it wants
//! to see, and the host forwards exactly those events to it, one at a time,
//! on the emulation thread. Guest memory is reached through the narrow
//! [`Host`] trait.

mod host;
mod memory;
mod observable;
mod plugin;
mod watch;

pub use host::Host;
pub use memory::FlatMemory;
pub use observable::{Observable, Value};
pub use plugin::{IoRegistration, Plugin};
pub use watch::WatchTable;
