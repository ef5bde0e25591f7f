//! SloMo: screen-write capture for ZX Spectrum emulators.
//!
//! Watches every CPU write into the display file ($4000-$5AFF) and, while a
//! capture mode is active, dumps the screen to a numbered `.scr` file after
//! each one, so a game's drawing can be replayed byte by byte. Two sampling
//! strategies give identical file layouts:
//!
//! - byte trace: a shadow copy updated only by the writes seen so far;
//! - buffer snapshot: the live display file, read in bulk on each write.
//!
//! A third mode arms on a hotkey and switches to buffer snapshots when the
//! game polls the hsync port, for exactly one poll-to-poll window. A fourth
//! hotkey pokes fixed cheats into Sidewize.
//!
//! The plugin is driven entirely by host callbacks (see [`emu_core::Plugin`])
//! and runs on the emulation thread.

mod cheat;
mod config;
mod engine;
mod error;
pub mod frame;
mod mode;
mod plugin;
mod registration;
pub mod screen;
pub mod script;
mod sna;

pub use cheat::{CheatPatch, SIDEWIZE_CHEATS, apply_cheats};
pub use config::SloMoConfig;
pub use engine::{CaptureEngine, HSYNC_SENTINEL};
pub use error::{Result, SloMoError};
pub use frame::{FrameWriter, FsFrameWriter, frame_path};
pub use mode::{CaptureMode, Hotkey};
pub use plugin::SloMo;
pub use registration::{SIDEWIZE_HSYNC_PORT, registrations};
pub use screen::ShadowFrameBuffer;
pub use script::{Event, Replay, ReplayStats};
pub use sna::load_sna;
