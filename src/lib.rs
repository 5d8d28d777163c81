//! A serial line adder for bare-metal RISC-V.
//!
//! Two unsigned decimal numbers arrive on a polled, memory mapped UART, one per line,
//! and their sum is sent back as a single decimal line. The pieces are:
//!
//! - [`Uart`], blocking byte I/O over the [`Registers`] of the serial port,
//! - [`LineReader`] and [`write_line`], newline framing with a fixed-size buffer,
//! - [`parse`] and [`format`], decimal conversion with checked arithmetic,
//! - [`Calculator`], the read-read-reply cycle tying them together.
//!
//! Without the default `std` feature the crate is `no_std` and does not allocate.
//! With it, [`SimulatedSerialPort`] and [`Terminal`] run the calculator on a host.
//!
//! On the target, the calculator runs on the mapped serial port:
//!
//! ```no_run
//! use uart_calc::{Calculator, Mode, Uart};
//!
//! // SAFETY: the serial port is mapped at `SERIAL_PORT_BASE` on this target.
//! let uart = unsafe { Uart::mapped() };
//! let mut calc: Calculator<_> = Calculator::new(uart);
//! let _ = calc.run(Mode::Loop);
//! ```

#![cfg_attr(not(any(test, feature = "std")), no_std)]

pub mod bits;
pub mod calc;
pub mod decimal;
pub mod error;
pub mod line;
pub mod mmio;
#[cfg(feature = "std")]
pub mod sim;
#[cfg(feature = "std")]
pub mod terminal;
pub mod uart;

pub use calc::{Calculator, Mode, State, Step};
pub use decimal::{Digits, format, parse};
pub use error::{Error, Overflow};
pub use line::{DEFAULT_LINE_CAPACITY, LineReader, write_line};
pub use mmio::{Registers, SERIAL_PORT_BASE, VolatileRegisters};
#[cfg(feature = "std")]
pub use sim::{PollStats, SimulatedSerialPort};
#[cfg(feature = "std")]
pub use terminal::Terminal;
pub use uart::{ByteIo, TransmitterBusy, Uart};

/// The operand type, one RV32 register wide.
pub type Word = u32;
