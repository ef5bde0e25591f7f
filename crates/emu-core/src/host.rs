//! Guest memory access offered to extensions.

/// Guest memory as seen by an extension.
///
/// Both operations bypass contention and side effects: they are the
/// debugger's view of RAM, not the CPU's.
pub trait Host {
    /// Copy `buf.len()` bytes of guest memory starting at `address` into `buf`.
    ///
    /// Addresses wrap at the top of the 64K space.
    fn peek_into(&self, address: u16, buf: &mut [u8]);

    /// Write one byte of guest memory.
    fn poke(&mut self, address: u16, value: u8);

    /// Read `len` bytes of guest memory starting at `address`.
    #[must_use]
    fn peek(&self, address: u16, len: usize) -> Vec<u8> {
        let mut buf = vec![0; len];
        self.peek_into(address, &mut buf);
        buf
    }

    /// Read a single byte of guest memory.
    #[must_use]
    fn peek_byte(&self, address: u16) -> u8 {
        let mut buf = [0];
        self.peek_into(address, &mut buf);
        buf[0]
    }
}
