use crate::{
    bits,
    mmio::{
        READY_BIT, RX_DATA, RX_STATUS, Registers, SERIAL_PORT_BASE, TX_DATA, TX_STATUS,
        VolatileRegisters,
    },
};

/// Blocking byte-wise access to a serial line.
///
/// Neither operation can fail: a port that never becomes ready blocks forever.
pub trait ByteIo {
    /// Waits for a received byte and returns it.
    fn read_byte(&mut self) -> u8;
    /// Waits until the line can accept a byte, then sends it.
    fn write_byte(&mut self, byte: u8);
}

/// Returned by [`Uart::try_write_byte`] while the transmitter is busy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransmitterBusy;

/// A polled serial port driven through its status and data registers.
///
/// See [`crate::mmio`] for the register layout.
#[derive(Clone, Debug)]
pub struct Uart<R> {
    registers: R,
}

impl Uart<VolatileRegisters> {
    /// Creates a [`Uart`] on the serial port mapped at [`SERIAL_PORT_BASE`].
    ///
    /// # Safety
    ///
    /// Only sound on a target where the serial port is actually mapped at that address.
    pub const unsafe fn mapped() -> Self {
        // SAFETY: forwarded to the caller.
        unsafe { Self::new(VolatileRegisters::new(SERIAL_PORT_BASE as *mut u32)) }
    }
}

impl<R: Registers> Uart<R> {
    pub const fn new(registers: R) -> Self {
        Self { registers }
    }

    pub fn registers(&self) -> &R {
        &self.registers
    }

    pub fn registers_mut(&mut self) -> &mut R {
        &mut self.registers
    }

    pub fn into_registers(self) -> R {
        self.registers
    }

    /// Whether a received byte is waiting in the data register.
    pub fn rx_ready(&mut self) -> bool {
        bits::is_set(self.registers.load_u32(RX_STATUS), READY_BIT)
    }

    /// Whether the transmitter accepts the next byte.
    pub fn tx_ready(&mut self) -> bool {
        bits::is_set(self.registers.load_u32(TX_STATUS), READY_BIT)
    }

    /// Returns the received byte if one is ready, without waiting.
    pub fn try_read_byte(&mut self) -> Option<u8> {
        if !self.rx_ready() {
            return None;
        }
        Some(bits::low_byte(self.registers.load_u32(RX_DATA)))
    }

    /// Sends `byte` if the transmitter is ready, without waiting.
    pub fn try_write_byte(&mut self, byte: u8) -> Result<(), TransmitterBusy> {
        if !self.tx_ready() {
            return Err(TransmitterBusy);
        }
        self.registers.store_u32(TX_DATA, byte as u32);
        Ok(())
    }
}

impl<R: Registers> ByteIo for Uart<R> {
    fn read_byte(&mut self) -> u8 {
        loop {
            if let Some(byte) = self.try_read_byte() {
                return byte;
            }
            core::hint::spin_loop();
        }
    }

    fn write_byte(&mut self, byte: u8) {
        while self.try_write_byte(byte).is_err() {
            core::hint::spin_loop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Register block that is ready after a fixed number of status polls.
    struct Delayed {
        polls_left: u32,
        rx_word: u32,
        sent: Option<u32>,
    }

    impl Registers for Delayed {
        fn load_u32(&mut self, offset: u32) -> u32 {
            match offset {
                RX_STATUS | TX_STATUS => {
                    if self.polls_left == 0 {
                        1
                    } else {
                        self.polls_left -= 1;
                        0
                    }
                }
                RX_DATA => self.rx_word,
                _ => 0,
            }
        }
        fn store_u32(&mut self, offset: u32, value: u32) {
            assert_eq!(offset, TX_DATA);
            self.sent = Some(value);
        }
    }

    #[test]
    fn read_waits_for_ready_and_keeps_low_byte() {
        let mut uart = Uart::new(Delayed {
            polls_left: 5,
            rx_word: 0xffff_ff35,
            sent: None,
        });
        assert_eq!(uart.read_byte(), b'5');
        assert_eq!(uart.registers().polls_left, 0);
    }

    #[test]
    fn try_write_reports_busy_transmitter() {
        let mut uart = Uart::new(Delayed {
            polls_left: 1,
            rx_word: 0,
            sent: None,
        });
        assert_eq!(uart.try_write_byte(b'9'), Err(TransmitterBusy));
        assert_eq!(uart.registers().sent, None);
        assert_eq!(uart.try_write_byte(b'9'), Ok(()));
        assert_eq!(uart.registers().sent, Some(b'9' as u32));
    }

    #[test]
    fn try_read_without_data() {
        let mut uart = Uart::new(Delayed {
            polls_left: 1,
            rx_word: b'1' as u32,
            sent: None,
        });
        assert_eq!(uart.try_read_byte(), None);
        assert_eq!(uart.try_read_byte(), Some(b'1'));
    }
}
