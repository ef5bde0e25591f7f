//! Capture engine: mode state machine and frame emission.
//!
//! Every write into the display file passes through [`CaptureEngine::on_write`]
//! on the emulation thread, so the idle path is a single check of the mode
//! and the capturing paths do no allocation.
//!
//! # Transitions
//!
//! | Event                 | From              | To                          |
//! |-----------------------|-------------------|-----------------------------|
//! | byte-trace key        | `ByteTrace`       | `None` (counter reset)      |
//! | byte-trace key        | anything else     | `ByteTrace` (shadow clear)  |
//! | buffer-snapshot key   | `BufferSnapshot`  | `None` (counter reset)      |
//! | buffer-snapshot key   | anything else     | `BufferSnapshot` (shadow clear) |
//! | external-trigger key  | any               | `ExternalTrigger`           |
//! | hsync port read       | `ExternalTrigger` | `BufferSnapshot`            |
//! | hsync port read       | `BufferSnapshot`  | `None` (counter reset)      |
//!
//! The port read reuses the buffer-snapshot toggle, so an armed trigger
//! samples screen writes until the game's next hsync poll and then disarms.

use std::path::{Path, PathBuf};

use emu_core::{Host, Observable, Value};

use crate::error::{Result, SloMoError};
use crate::frame::{FrameWriter, frame_path};
use crate::mode::CaptureMode;
use crate::screen::{SCREEN_BITMAP_BASE, SCREEN_LENGTH, ShadowFrameBuffer, screen_offset};

/// Value every read of the hsync port returns.
pub const HSYNC_SENTINEL: u8 = 0x40;

/// Owns all capture state. One instance per emulator session.
pub struct CaptureEngine<W: FrameWriter> {
    mode: CaptureMode,
    /// Index of the next frame file. Zeroed whenever capture switches off.
    frame: u32,
    shadow: ShadowFrameBuffer,
    /// Scratch for bulk reads in `BufferSnapshot`, reused across frames.
    snapshot: Box<[u8; SCREEN_LENGTH]>,
    output_dir: PathBuf,
    writer: W,
}

impl<W: FrameWriter> CaptureEngine<W> {
    #[must_use]
    pub fn new(writer: W, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            mode: CaptureMode::None,
            frame: 0,
            shadow: ShadowFrameBuffer::new(),
            snapshot: Box::new([0; SCREEN_LENGTH]),
            output_dir: output_dir.into(),
            writer,
        }
    }

    #[must_use]
    pub fn mode(&self) -> CaptureMode {
        self.mode
    }

    /// Index the next frame file will get.
    #[must_use]
    pub fn frame(&self) -> u32 {
        self.frame
    }

    #[must_use]
    pub fn shadow(&self) -> &ShadowFrameBuffer {
        &self.shadow
    }

    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    #[must_use]
    pub fn writer(&self) -> &W {
        &self.writer
    }

    /// Toggle `target` on, or off if it is already the active mode.
    ///
    /// Switching on clears the shadow buffer; switching off zeroes the
    /// frame counter.
    pub fn toggle(&mut self, target: CaptureMode) {
        let next = self.mode.toggled(target);
        if next == CaptureMode::None {
            log::info!("Disabled screen capture mode {}", self.mode);
            self.frame = 0;
        } else {
            self.shadow.clear();
            log::info!("Enabled screen capture mode {next}");
        }
        self.mode = next;
    }

    /// Arm the external trigger. Pressing again just re-arms.
    pub fn arm(&mut self) {
        log::info!("Armed external trigger");
        self.mode = CaptureMode::ExternalTrigger;
    }

    /// The CPU is writing `value` to `address` in the display file.
    ///
    /// In a capturing mode this writes exactly one frame file. Addresses
    /// outside the display file are ignored. The write itself is never
    /// blocked.
    pub fn on_write(&mut self, host: &dyn Host, address: u16, value: u8) -> Result<()> {
        if !self.mode.is_capturing() {
            return Ok(());
        }
        let Some(offset) = screen_offset(address) else {
            log::debug!("Ignoring write outside the display file: ${address:04X}");
            return Ok(());
        };
        match self.mode {
            CaptureMode::ByteTrace => {
                self.shadow.set(offset, value);
                let path = self.next_frame_path();
                self.writer
                    .write(&path, self.shadow.as_bytes())
                    .map_err(|source| SloMoError::FrameWrite { path, source })
            }
            CaptureMode::BufferSnapshot => {
                host.peek_into(SCREEN_BITMAP_BASE, &mut self.snapshot[..]);
                let path = self.next_frame_path();
                self.writer
                    .write(&path, &self.snapshot[..])
                    .map_err(|source| SloMoError::FrameWrite { path, source })
            }
            CaptureMode::None | CaptureMode::ExternalTrigger => Ok(()),
        }
    }

    /// The CPU is reading the hsync port. Always answers the sentinel.
    pub fn on_port_read(&mut self) -> u8 {
        match self.mode {
            CaptureMode::ExternalTrigger | CaptureMode::BufferSnapshot => {
                self.toggle(CaptureMode::BufferSnapshot);
            }
            CaptureMode::None | CaptureMode::ByteTrace => {}
        }
        HSYNC_SENTINEL
    }

    /// Claim the current frame index and advance the counter.
    fn next_frame_path(&mut self) -> PathBuf {
        let path = frame_path(&self.output_dir, self.frame);
        self.frame = self.frame.wrapping_add(1);
        log::trace!("{} frame {}", self.mode, path.display());
        path
    }
}

const QUERY_PATHS: &[&str] = &["mode", "frame", "capturing", "output_dir", "shadow.<offset>"];

impl<W: FrameWriter> Observable for CaptureEngine<W> {
    fn query(&self, path: &str) -> Option<Value> {
        match path {
            "mode" => Some(self.mode.name().into()),
            "frame" => Some(self.frame.into()),
            "capturing" => Some(self.mode.is_capturing().into()),
            "output_dir" => Some(Value::String(self.output_dir.display().to_string())),
            _ => {
                let offset = path.strip_prefix("shadow.")?;
                let offset: usize = offset.parse().ok()?;
                self.shadow.get(offset).map(Value::from)
            }
        }
    }

    fn query_paths(&self) -> &'static [&'static str] {
        QUERY_PATHS
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use emu_core::FlatMemory;

    use super::*;
    use crate::screen::{DEFAULT_ATTRIBUTE, SCREEN_BITMAP_LENGTH};

    #[derive(Default)]
    struct Recorder {
        frames: Vec<(PathBuf, Vec<u8>)>,
    }

    impl FrameWriter for Recorder {
        fn write(&mut self, path: &Path, bytes: &[u8]) -> io::Result<()> {
            self.frames.push((path.to_path_buf(), bytes.to_vec()));
            Ok(())
        }
    }

    struct Failing;

    impl FrameWriter for Failing {
        fn write(&mut self, _path: &Path, _bytes: &[u8]) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::NotFound, "no such directory"))
        }
    }

    fn engine() -> CaptureEngine<Recorder> {
        CaptureEngine::new(Recorder::default(), "frames")
    }

    #[test]
    fn starts_idle() {
        let engine = engine();
        assert_eq!(engine.mode(), CaptureMode::None);
        assert_eq!(engine.frame(), 0);
    }

    #[test]
    fn idle_writes_emit_nothing() {
        let mem = FlatMemory::new();
        let mut engine = engine();
        for addr in 0x4000..0x4010 {
            engine.on_write(&mem, addr, 0xFF).expect("no write attempted");
        }
        assert!(engine.writer().frames.is_empty());
        assert_eq!(engine.frame(), 0);
        assert_eq!(engine.shadow().get(0), Some(0));
    }

    #[test]
    fn byte_trace_first_write() {
        let mem = FlatMemory::new();
        let mut engine = engine();
        engine.toggle(CaptureMode::ByteTrace);
        assert_eq!(engine.frame(), 0);

        engine.on_write(&mem, 0x4000 + 10, 0x99).expect("recorded");

        let frames = &engine.writer().frames;
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].0, Path::new("frames/frame_0.scr"));
        let bytes = &frames[0].1;
        assert_eq!(bytes.len(), SCREEN_LENGTH);
        for (i, &b) in bytes.iter().enumerate() {
            let expected = if i == 10 {
                0x99
            } else if i < SCREEN_BITMAP_LENGTH {
                0
            } else {
                DEFAULT_ATTRIBUTE
            };
            assert_eq!(b, expected, "offset {i}");
        }
        assert_eq!(engine.frame(), 1);
    }

    #[test]
    fn byte_trace_ignores_live_memory() {
        let mut mem = FlatMemory::new();
        mem.load(0x4000, &[0xEE; SCREEN_LENGTH]);
        let mut engine = engine();
        engine.toggle(CaptureMode::ByteTrace);
        engine.on_write(&mem, 0x5800, 0x38).expect("recorded");

        let bytes = &engine.writer().frames[0].1;
        assert_eq!(bytes[0], 0);
        assert_eq!(bytes[SCREEN_BITMAP_LENGTH], 0x38);
        assert_eq!(bytes[SCREEN_BITMAP_LENGTH + 1], DEFAULT_ATTRIBUTE);
    }

    #[test]
    fn byte_trace_accumulates_writes() {
        let mem = FlatMemory::new();
        let mut engine = engine();
        engine.toggle(CaptureMode::ByteTrace);
        engine.on_write(&mem, 0x4000, 1).expect("recorded");
        engine.on_write(&mem, 0x4001, 2).expect("recorded");
        engine.on_write(&mem, 0x4000, 3).expect("recorded");

        let frames = &engine.writer().frames;
        assert_eq!(frames.len(), 3);
        assert_eq!(&frames[0].1[..2], &[1, 0]);
        assert_eq!(&frames[1].1[..2], &[1, 2]);
        assert_eq!(&frames[2].1[..2], &[3, 2]);
        assert_eq!(frames[2].0, Path::new("frames/frame_2.scr"));
    }

    #[test]
    fn writes_outside_the_display_file_emit_nothing() {
        let mem = FlatMemory::new();
        for target in [CaptureMode::ByteTrace, CaptureMode::BufferSnapshot] {
            let mut engine = engine();
            engine.toggle(target);
            for addr in [0x0000, 0x3FFF, 0x5B00, 0xFFFF] {
                engine.on_write(&mem, addr, 0x99).expect("ignored");
            }
            assert!(engine.writer().frames.is_empty());
            assert_eq!(engine.frame(), 0);
            assert_eq!(engine.shadow().as_bytes(), ShadowFrameBuffer::new().as_bytes());
        }
    }

    #[test]
    fn buffer_snapshot_reads_live_memory() {
        let mut mem = FlatMemory::new();
        let screen: Vec<u8> = (0..SCREEN_LENGTH).map(|i| (i * 7) as u8).collect();
        mem.load(0x4000, &screen);
        let mut engine = engine();
        engine.toggle(CaptureMode::BufferSnapshot);

        engine.on_write(&mem, 0x4123, 0x00).expect("recorded");

        let frames = &engine.writer().frames;
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].1, screen);
        assert_eq!(engine.frame(), 1);
    }

    #[test]
    fn buffer_snapshot_leaves_shadow_alone() {
        let mut mem = FlatMemory::new();
        mem.load(0x4000, &[0xAB; 16]);
        let mut engine = engine();
        engine.toggle(CaptureMode::BufferSnapshot);
        engine.on_write(&mem, 0x4000, 0xCD).expect("recorded");

        assert_eq!(engine.shadow().as_bytes(), ShadowFrameBuffer::new().as_bytes());
    }

    #[test]
    fn double_toggle_returns_to_none_and_resets_counter() {
        let mem = FlatMemory::new();
        for target in [CaptureMode::ByteTrace, CaptureMode::BufferSnapshot] {
            let mut engine = engine();
            engine.toggle(target);
            for i in 0..5 {
                engine.on_write(&mem, 0x4000 + i, 0x01).expect("recorded");
            }
            assert_eq!(engine.frame(), 5);
            engine.toggle(target);
            assert_eq!(engine.mode(), CaptureMode::None);
            assert_eq!(engine.frame(), 0);
        }
    }

    #[test]
    fn switching_between_capture_modes_keeps_counter() {
        let mem = FlatMemory::new();
        let mut engine = engine();
        engine.toggle(CaptureMode::ByteTrace);
        engine.on_write(&mem, 0x4000, 0x01).expect("recorded");
        engine.toggle(CaptureMode::BufferSnapshot);
        assert_eq!(engine.mode(), CaptureMode::BufferSnapshot);
        assert_eq!(engine.frame(), 1);
    }

    #[test]
    fn entering_a_mode_clears_the_shadow() {
        let mem = FlatMemory::new();
        let mut engine = engine();
        engine.toggle(CaptureMode::ByteTrace);
        engine.on_write(&mem, 0x4000, 0xFF).expect("recorded");
        engine.toggle(CaptureMode::ByteTrace);
        assert_eq!(engine.shadow().get(0), Some(0xFF));

        engine.toggle(CaptureMode::ByteTrace);
        assert_eq!(engine.shadow().get(0), Some(0));
    }

    #[test]
    fn arm_is_not_a_toggle() {
        let mut engine = engine();
        engine.arm();
        engine.arm();
        assert_eq!(engine.mode(), CaptureMode::ExternalTrigger);
    }

    #[test]
    fn armed_writes_emit_nothing() {
        let mem = FlatMemory::new();
        let mut engine = engine();
        engine.arm();
        engine.on_write(&mem, 0x4000, 0x01).expect("no write attempted");
        assert!(engine.writer().frames.is_empty());
    }

    #[test]
    fn port_read_arms_then_disarms() {
        let mut engine = engine();
        engine.arm();
        assert_eq!(engine.on_port_read(), HSYNC_SENTINEL);
        assert_eq!(engine.mode(), CaptureMode::BufferSnapshot);
        assert_eq!(engine.on_port_read(), HSYNC_SENTINEL);
        assert_eq!(engine.mode(), CaptureMode::None);
    }

    #[test]
    fn port_read_ignored_when_idle_or_tracing() {
        let mut engine = engine();
        assert_eq!(engine.on_port_read(), HSYNC_SENTINEL);
        assert_eq!(engine.mode(), CaptureMode::None);

        engine.toggle(CaptureMode::ByteTrace);
        assert_eq!(engine.on_port_read(), HSYNC_SENTINEL);
        assert_eq!(engine.mode(), CaptureMode::ByteTrace);
    }

    #[test]
    fn trigger_sample_scenario() {
        let mut mem = FlatMemory::new();
        mem.load(0x4000, &[0x5A; SCREEN_LENGTH]);
        let mut engine = engine();
        engine.arm();
        engine.on_port_read();
        assert_eq!(engine.frame(), 0);

        engine.on_write(&mem, 0x5AFF, 0x00).expect("recorded");
        assert_eq!(engine.frame(), 1);
        assert_eq!(engine.writer().frames[0].1, vec![0x5A; SCREEN_LENGTH]);

        engine.on_port_read();
        assert_eq!(engine.mode(), CaptureMode::None);
        assert_eq!(engine.frame(), 0);
    }

    #[test]
    fn writer_failure_propagates_with_path() {
        let mem = FlatMemory::new();
        let mut engine = CaptureEngine::new(Failing, "nowhere");
        engine.toggle(CaptureMode::ByteTrace);
        let err = engine.on_write(&mem, 0x4000, 1).expect_err("writer fails");
        match err {
            SloMoError::FrameWrite { path, .. } => {
                assert_eq!(path, Path::new("nowhere/frame_0.scr"));
            }
            other => panic!("unexpected error: {other}"),
        }
        // The index is spent even though the write failed.
        assert_eq!(engine.frame(), 1);
    }

    #[test]
    fn frame_counter_wraps() {
        let mem = FlatMemory::new();
        let mut engine = engine();
        engine.toggle(CaptureMode::ByteTrace);
        engine.frame = u32::MAX;
        engine.on_write(&mem, 0x4000, 1).expect("recorded");
        engine.on_write(&mem, 0x4000, 2).expect("recorded");

        let frames = &engine.writer().frames;
        assert_eq!(frames[0].0, Path::new("frames/frame_4294967295.scr"));
        assert_eq!(frames[1].0, Path::new("frames/frame_0.scr"));
        assert_eq!(engine.frame(), 1);
    }

    #[test]
    fn every_listed_query_path_answers() {
        let engine = engine();
        for path in engine.query_paths() {
            let path = path.replace("<offset>", "6911");
            assert!(engine.query(&path).is_some(), "{path}");
        }
        assert_eq!(engine.query("shadow.6911"), Some(Value::U8(DEFAULT_ATTRIBUTE)));
    }

    #[test]
    fn queries_expose_state() {
        let mem = FlatMemory::new();
        let mut engine = engine();
        assert_eq!(engine.query("mode"), Some(Value::from("none")));
        engine.toggle(CaptureMode::ByteTrace);
        engine.on_write(&mem, 0x4000 + 3, 0x42).expect("recorded");
        assert_eq!(engine.query("mode"), Some(Value::from("byte_trace")));
        assert_eq!(engine.query("frame"), Some(Value::U32(1)));
        assert_eq!(engine.query("capturing"), Some(Value::Bool(true)));
        assert_eq!(engine.query("shadow.3"), Some(Value::U8(0x42)));
        assert_eq!(engine.query("shadow.6912"), None);
        assert_eq!(engine.query("bogus"), None);
    }
}
