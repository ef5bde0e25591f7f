//! Headless replay of host events.
//!
//! A script is a JSON array of events, applied in order against a flat
//! memory image exactly the way an emulator host would deliver them:
//!
//! ```json
//! [
//!   { "hotkey": "external_trigger" },
//!   { "read": { "port": 16639 } },
//!   { "write": { "address": 16384, "value": 255 } },
//!   { "key": "<ctrl><alt>q" },
//!   "tick",
//!   "reset"
//! ]
//! ```
//!
//! Only events the plugin registered for reach it. Writes are offered to the
//! plugin before they land in memory, and land unless the plugin
//! suppresses them.

use std::fs;
use std::path::Path;

use emu_core::{FlatMemory, Host, Plugin, WatchTable};
use serde::Deserialize;

use crate::error::{Result, SloMoError};
use crate::mode::Hotkey;

/// One host event.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Event {
    /// Press one of the plugin's hotkeys by name.
    Hotkey(Hotkey),
    /// Press a key combination in host syntax, e.g. `<ctrl><alt>1`.
    Key(String),
    /// CPU write to memory.
    Write { address: u16, value: u8 },
    /// CPU read of an I/O port.
    Read { port: u16 },
    /// End of an emulated frame.
    Tick,
    /// Machine reset.
    Reset,
}

pub fn parse_script(json: &str) -> Result<Vec<Event>> {
    serde_json::from_str(json).map_err(SloMoError::Script)
}

pub fn load_script(path: &Path) -> Result<Vec<Event>> {
    let json = fs::read_to_string(path).map_err(|source| SloMoError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_script(&json)
}

/// What a replay delivered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayStats {
    pub events: usize,
    /// Watched writes handed to the plugin.
    pub writes_forwarded: usize,
    /// Writes the plugin suppressed.
    pub writes_suppressed: usize,
    /// Hotkeys the plugin reported as handled.
    pub keys_handled: usize,
    /// Port reads the plugin answered as valid.
    pub reads_answered: usize,
}

/// A minimal host: flat memory plus a plugin and its watch table.
pub struct Replay<P: Plugin> {
    plugin: P,
    memory: FlatMemory,
    watches: WatchTable,
    stats: ReplayStats,
}

impl<P: Plugin> Replay<P> {
    /// Initialise `plugin` and index its registrations.
    #[must_use]
    pub fn new(mut plugin: P, memory: FlatMemory) -> Self {
        let watches = WatchTable::new(&plugin.init());
        Self {
            plugin,
            memory,
            watches,
            stats: ReplayStats::default(),
        }
    }

    #[must_use]
    pub fn plugin(&self) -> &P {
        &self.plugin
    }

    #[must_use]
    pub fn memory(&self) -> &FlatMemory {
        &self.memory
    }

    #[must_use]
    pub fn stats(&self) -> ReplayStats {
        self.stats
    }

    /// Deliver one event. Returns the value the CPU would read for
    /// [`Event::Read`], `None` otherwise.
    pub fn step(&mut self, event: &Event) -> std::result::Result<Option<u8>, P::Error> {
        self.stats.events += 1;
        match event {
            Event::Hotkey(key) => self.press(key.combo()),
            Event::Key(combo) => self.press(combo),
            Event::Write { address, value } => {
                let mut verdict = Ok(false);
                if self.watches.watches_write(*address) {
                    self.stats.writes_forwarded += 1;
                    verdict = self.plugin.write(&self.memory, *address, *value);
                }
                // A plugin error still lets the CPU's write land.
                if matches!(verdict, Ok(true)) {
                    self.stats.writes_suppressed += 1;
                } else {
                    self.memory.poke(*address, *value);
                }
                verdict?;
            }
            Event::Read { port } => {
                let answer = if self.watches.watches_port_read(*port) {
                    self.plugin.read(&self.memory, *port)
                } else {
                    None
                };
                if answer.is_some() {
                    self.stats.reads_answered += 1;
                }
                // Unanswered reads float high.
                return Ok(Some(answer.unwrap_or(0xFF)));
            }
            Event::Tick => self.plugin.tick(),
            Event::Reset => self.plugin.reset(),
        }
        Ok(None)
    }

    /// Deliver every event in order, stopping at the first error.
    pub fn run(&mut self, events: &[Event]) -> std::result::Result<ReplayStats, P::Error> {
        for event in events {
            self.step(event)?;
        }
        Ok(self.stats)
    }

    /// Shut the plugin down and hand back the plugin and final memory.
    pub fn finish(mut self) -> (P, FlatMemory) {
        self.plugin.quit();
        (self.plugin, self.memory)
    }

    fn press(&mut self, combo: &str) {
        match self.watches.key_id(combo) {
            Some(id) => {
                if self.plugin.key_pressed(&mut self.memory, id) {
                    self.stats.keys_handled += 1;
                }
            }
            None => log::debug!("No plugin registered {combo}"),
        }
    }
}
