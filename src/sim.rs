use std::collections::VecDeque;

use log::trace;

use crate::{
    bits,
    mmio::{READY_BIT, RX_DATA, RX_STATUS, Registers, TX_DATA, TX_STATUS},
};

/// Counts of status register reads, the simulated stand-in for elapsed cycles.
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq)]
pub struct PollStats {
    pub rx_status_reads: u64,
    pub tx_status_reads: u64,
}

/// A host-side model of the serial port register block.
///
/// Bytes queued with [`SimulatedSerialPort::feed`] are delivered one at a time
/// through the receive registers, and every byte written to the transmit data
/// register is captured. Offsets outside the block read as zero and ignore writes.
///
/// A latency makes the corresponding status register report "not ready" for that
/// many reads before each byte, so drivers have to actually poll.
#[derive(Clone, Debug, Default)]
pub struct SimulatedSerialPort {
    rx: VecDeque<u8>,
    tx: Vec<u8>,
    rx_latency: u32,
    tx_latency: u32,
    rx_wait: u32,
    tx_wait: u32,
    stats: PollStats,
}

impl SimulatedSerialPort {
    pub fn new(input: &[u8]) -> Self {
        let mut port = Self::default();
        port.feed(input);
        port
    }

    /// Sets the number of status polls each received and transmitted byte takes.
    pub fn with_latency(mut self, rx_latency: u32, tx_latency: u32) -> Self {
        self.rx_latency = rx_latency;
        self.tx_latency = tx_latency;
        self.rx_wait = rx_latency;
        self
    }

    /// Queues bytes on the receive side.
    pub fn feed(&mut self, input: &[u8]) {
        self.rx.extend(input);
    }

    /// Whether a complete line is waiting to be received.
    pub fn has_line_pending(&self) -> bool {
        self.rx.contains(&b'\n')
    }

    /// Bytes not yet received.
    pub fn pending(&self) -> &VecDeque<u8> {
        &self.rx
    }

    /// Everything transmitted so far.
    pub fn transmitted(&self) -> &[u8] {
        &self.tx
    }

    pub fn take_transmitted(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.tx)
    }

    pub fn stats(&self) -> PollStats {
        self.stats
    }

    fn rx_status(&mut self) -> u32 {
        self.stats.rx_status_reads += 1;
        if self.rx.is_empty() {
            return 0;
        }
        if self.rx_wait > 0 {
            self.rx_wait -= 1;
            return 0;
        }
        1 << READY_BIT
    }

    fn tx_status(&mut self) -> u32 {
        self.stats.tx_status_reads += 1;
        if self.tx_wait > 0 {
            self.tx_wait -= 1;
            return 0;
        }
        1 << READY_BIT
    }
}

impl Registers for SimulatedSerialPort {
    fn load_u32(&mut self, offset: u32) -> u32 {
        let value = match offset {
            RX_STATUS => self.rx_status(),
            RX_DATA => match self.rx.pop_front() {
                Some(byte) => {
                    self.rx_wait = self.rx_latency;
                    byte as u32
                }
                None => 0,
            },
            TX_STATUS => self.tx_status(),
            _ => 0,
        };
        trace!("load 0x{offset:02x} -> 0x{value:08x}");
        value
    }

    fn store_u32(&mut self, offset: u32, value: u32) {
        trace!("store 0x{offset:02x} <- 0x{value:08x}");
        if offset == TX_DATA {
            self.tx.push(bits::low_byte(value));
            self.tx_wait = self.tx_latency;
        }
    }
}
