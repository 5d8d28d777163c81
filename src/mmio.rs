//! Register-level access to the serial port.

/// Base address of the region where the serial port is mapped in the RISC-V address space.
pub const SERIAL_PORT_BASE: usize = 0xffff_c000;

/// Byte offset of the receive status register.
pub const RX_STATUS: u32 = 0x00;
/// Byte offset of the receive data register. The low byte holds the last received character.
pub const RX_DATA: u32 = 0x04;
/// Byte offset of the transmit status register.
pub const TX_STATUS: u32 = 0x08;
/// Byte offset of the transmit data register. The low byte of a written word is sent.
pub const TX_DATA: u32 = 0x0c;

/// Bit of both status registers signalling that the data register may be accessed.
pub const READY_BIT: u32 = 0;

/// Allows reading and writing 32-bit words of a peripheral's register block.
///
/// Offsets are in bytes relative to the start of the block. Loads take `&mut self`
/// because reading a data register may consume the value held by the peripheral.
pub trait Registers {
    /// Loads the word at the given offset.
    fn load_u32(&mut self, offset: u32) -> u32;
    /// Stores a word at the given offset.
    fn store_u32(&mut self, offset: u32, value: u32);
}

/// A register block accessed with volatile loads and stores at a fixed base address.
#[derive(Clone, Copy, Debug)]
pub struct VolatileRegisters {
    base: *mut u32,
}

impl VolatileRegisters {
    /// Creates a register block starting at `base`.
    ///
    /// # Safety
    ///
    /// `base` MUST point to a memory mapped register block that stays valid for
    /// word-aligned volatile access at every offset used on it, for as long as
    /// the returned value is in use.
    pub const unsafe fn new(base: *mut u32) -> Self {
        Self { base }
    }
}

impl Registers for VolatileRegisters {
    fn load_u32(&mut self, offset: u32) -> u32 {
        // SAFETY: validity of `base + offset` is guaranteed by the caller of `new`.
        unsafe { self.base.byte_add(offset as usize).read_volatile() }
    }

    fn store_u32(&mut self, offset: u32, value: u32) {
        // SAFETY: see `load_u32`.
        unsafe { self.base.byte_add(offset as usize).write_volatile(value) }
    }
}
