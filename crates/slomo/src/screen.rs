//! Spectrum display file layout and the shadow copy of it.
//!
//! The display file is 6,144 bytes of bitmap at $4000-$57FF followed by 768
//! attribute bytes at $5800-$5AFF. Frame files are this region verbatim.

/// First byte of the bitmap.
pub const SCREEN_BITMAP_BASE: u16 = 0x4000;

/// Bitmap length in bytes (256×192 pixels, 1 bit each).
pub const SCREEN_BITMAP_LENGTH: usize = 6144;

/// Attribute length in bytes (32×24 cells).
pub const SCREEN_ATTRIBUTE_LENGTH: usize = 768;

/// First attribute byte.
pub const SCREEN_ATTRIBUTE_BASE: u16 = SCREEN_BITMAP_BASE + SCREEN_BITMAP_LENGTH as u16;

/// Whole display file: bitmap then attributes.
pub const SCREEN_LENGTH: usize = SCREEN_BITMAP_LENGTH + SCREEN_ATTRIBUTE_LENGTH;

/// Attribute the shadow buffer starts from: white ink on black paper, bright.
pub const DEFAULT_ATTRIBUTE: u8 = 0x47;

/// Offset of `address` into the display file, if it lies inside it.
#[must_use]
pub fn screen_offset(address: u16) -> Option<usize> {
    let offset = address.wrapping_sub(SCREEN_BITMAP_BASE) as usize;
    (offset < SCREEN_LENGTH).then_some(offset)
}

/// Incrementally maintained copy of the display file.
///
/// Only the byte-trace capture mode writes to it; its length and layout
/// always match the guest region.
pub struct ShadowFrameBuffer {
    bytes: Box<[u8; SCREEN_LENGTH]>,
}

impl ShadowFrameBuffer {
    /// Blank bitmap, default attributes.
    #[must_use]
    pub fn new() -> Self {
        let mut shadow = Self {
            bytes: Box::new([0; SCREEN_LENGTH]),
        };
        shadow.clear();
        shadow
    }

    /// Back to a blank bitmap with default attributes.
    pub fn clear(&mut self) {
        let (bitmap, attributes) = self.bytes.split_at_mut(SCREEN_BITMAP_LENGTH);
        bitmap.fill(0);
        attributes.fill(DEFAULT_ATTRIBUTE);
    }

    /// Store one byte at `offset` from the start of the bitmap.
    ///
    /// # Panics
    ///
    /// Panics if `offset` is outside the display file.
    pub fn set(&mut self, offset: usize, value: u8) {
        self.bytes[offset] = value;
    }

    #[must_use]
    pub fn get(&self, offset: usize) -> Option<u8> {
        self.bytes.get(offset).copied()
    }

    /// The full display file image.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..]
    }
}

impl Default for ShadowFrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}
