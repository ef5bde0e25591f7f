//! Capture modes and the hotkeys that select them.

use std::fmt;

use serde::Deserialize;

/// What the engine does with a watched screen write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaptureMode {
    /// Writes are observed and ignored.
    #[default]
    None,
    /// Each write updates the shadow buffer, which is then dumped.
    ByteTrace,
    /// Each write dumps the live display file read straight from the guest.
    BufferSnapshot,
    /// Armed: the next read of the hsync port switches to `BufferSnapshot`.
    ExternalTrigger,
}

impl CaptureMode {
    /// Whether screen writes produce frame files in this mode.
    #[must_use]
    pub const fn is_capturing(self) -> bool {
        matches!(self, Self::ByteTrace | Self::BufferSnapshot)
    }

    /// The mode a toggle hotkey for `target` leads to from `self`.
    ///
    /// Pressing the key for the active mode switches capture off; from any
    /// other mode it switches to `target`.
    #[must_use]
    pub fn toggled(self, target: Self) -> Self {
        if self == target { Self::None } else { target }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::ByteTrace => "byte_trace",
            Self::BufferSnapshot => "buffer_snapshot",
            Self::ExternalTrigger => "external_trigger",
        }
    }
}

impl fmt::Display for CaptureMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The four registered hotkeys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Hotkey {
    ByteTrace,
    BufferSnapshot,
    ExternalTrigger,
    Cheats,
}

impl Hotkey {
    pub const ALL: [Self; 4] = [
        Self::ByteTrace,
        Self::BufferSnapshot,
        Self::ExternalTrigger,
        Self::Cheats,
    ];

    /// Opaque id handed to the host at registration and returned on press.
    #[must_use]
    pub const fn id(self) -> u32 {
        match self {
            Self::ByteTrace => 1,
            Self::BufferSnapshot => 2,
            Self::ExternalTrigger => 3,
            Self::Cheats => 4,
        }
    }

    #[must_use]
    pub const fn from_id(id: u32) -> Option<Self> {
        match id {
            1 => Some(Self::ByteTrace),
            2 => Some(Self::BufferSnapshot),
            3 => Some(Self::ExternalTrigger),
            4 => Some(Self::Cheats),
            _ => None,
        }
    }

    /// Host key combination.
    #[must_use]
    pub const fn combo(self) -> &'static str {
        match self {
            Self::ByteTrace => "<ctrl><alt>1",
            Self::BufferSnapshot => "<ctrl><alt>2",
            Self::ExternalTrigger => "<ctrl><alt>3",
            Self::Cheats => "<ctrl><alt>q",
        }
    }
}
