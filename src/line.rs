//! Newline-delimited framing on top of [`ByteIo`].

use heapless::Vec;

use crate::{
    error::{Error, Overflow},
    uart::ByteIo,
};

/// Line buffer capacity used by [`crate::Calculator`] unless told otherwise.
pub const DEFAULT_LINE_CAPACITY: usize = 32;

const NEWLINE: u8 = b'\n';
const CARRIAGE_RETURN: u8 = b'\r';

/// Collects received bytes into a buffer of at most `N` bytes until a newline arrives.
///
/// Carriage returns are dropped wherever they appear, so both `\n` and `\r\n`
/// terminated input yield the same line.
#[derive(Clone, Debug, Default)]
pub struct LineReader<const N: usize> {
    buffer: Vec<u8, N>,
}

impl<const N: usize> LineReader<N> {
    pub const fn new() -> Self {
        Self { buffer: Vec::new() }
    }

    /// Reads the next line, without its terminator.
    ///
    /// If more than `N` bytes arrive before the newline, the rest of the line is
    /// consumed and dropped and [`Overflow::Line`] is returned, leaving the reader
    /// positioned at the start of the following line.
    pub fn read_line(&mut self, io: &mut impl ByteIo) -> Result<&[u8], Error> {
        self.buffer.clear();
        loop {
            match io.read_byte() {
                NEWLINE => return Ok(self.buffer.as_slice()),
                CARRIAGE_RETURN => {}
                byte => {
                    if self.buffer.push(byte).is_err() {
                        self.buffer.clear();
                        discard_line(io);
                        return Err(Error::Overflow(Overflow::Line));
                    }
                }
            }
        }
    }
}

fn discard_line(io: &mut impl ByteIo) {
    while io.read_byte() != NEWLINE {}
}

/// Sends `bytes` followed by a newline.
pub fn write_line(io: &mut impl ByteIo, bytes: &[u8]) {
    for &byte in bytes {
        io.write_byte(byte);
    }
    io.write_byte(NEWLINE);
}
