//! Host binding: routes host callbacks into the capture engine.

use std::fs;

use emu_core::{Host, IoRegistration, Plugin};

use crate::cheat::{SIDEWIZE_CHEATS, apply_cheats};
use crate::config::SloMoConfig;
use crate::engine::CaptureEngine;
use crate::error::SloMoError;
use crate::frame::{FrameWriter, FsFrameWriter};
use crate::mode::{CaptureMode, Hotkey};
use crate::registration::{SIDEWIZE_HSYNC_PORT, registrations};

/// The screen capture plugin.
pub struct SloMo<W: FrameWriter = FsFrameWriter> {
    engine: CaptureEngine<W>,
    config: SloMoConfig,
}

impl SloMo<FsFrameWriter> {
    /// Plugin writing frames to the filesystem.
    #[must_use]
    pub fn new(config: SloMoConfig) -> Self {
        Self::with_writer(config, FsFrameWriter::new())
    }
}

impl<W: FrameWriter> SloMo<W> {
    #[must_use]
    pub fn with_writer(config: SloMoConfig, writer: W) -> Self {
        let engine = CaptureEngine::new(writer, config.output_dir.clone());
        Self { engine, config }
    }

    #[must_use]
    pub fn engine(&self) -> &CaptureEngine<W> {
        &self.engine
    }

    /// Handle a hotkey. Every hotkey is always handled.
    pub fn hotkey(&mut self, host: &mut dyn Host, key: Hotkey) {
        match key {
            Hotkey::ByteTrace => self.engine.toggle(CaptureMode::ByteTrace),
            Hotkey::BufferSnapshot => self.engine.toggle(CaptureMode::BufferSnapshot),
            Hotkey::ExternalTrigger => self.engine.arm(),
            Hotkey::Cheats => {
                log::info!("Sidewize cheats activated");
                apply_cheats(host, &SIDEWIZE_CHEATS);
            }
        }
    }
}

impl<W: FrameWriter> Plugin for SloMo<W> {
    type Error = SloMoError;

    fn init(&mut self) -> Vec<IoRegistration> {
        log::info!("SloMo plugin added");
        if self.config.create_output_dir {
            let dir = &self.config.output_dir;
            match fs::create_dir_all(dir) {
                Ok(()) => log::debug!("Frames go to {}", dir.display()),
                Err(e) => log::warn!("Could not create {}: {e}", dir.display()),
            }
        }
        registrations()
    }

    fn quit(&mut self) {
        log::debug!("SloMo plugin removed");
    }

    fn key_pressed(&mut self, host: &mut dyn Host, id: u32) -> bool {
        let Some(key) = Hotkey::from_id(id) else {
            log::debug!("Ignoring unknown hotkey id {id}");
            return false;
        };
        self.hotkey(host, key);
        true
    }

    fn write(&mut self, host: &dyn Host, address: u16, value: u8) -> Result<bool, SloMoError> {
        self.engine.on_write(host, address, value)?;
        Ok(false)
    }

    fn read(&mut self, _host: &dyn Host, port: u16) -> Option<u8> {
        (port == SIDEWIZE_HSYNC_PORT).then(|| self.engine.on_port_read())
    }
}
