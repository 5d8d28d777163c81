use std::io::{Write, stdout};

use getch::Getch;

use crate::uart::ByteIo;

/// A [`ByteIo`] on the controlling terminal.
///
/// Keys are read unbuffered and echoed back, bytes written go to stdout.
///
/// # Panics
///
/// Reading or writing panics if the terminal is gone, the same way `print!` does.
pub struct Terminal(Getch);

impl Terminal {
    pub fn new() -> Self {
        Self(Getch::new())
    }
}

impl Default for Terminal {
    fn default() -> Self {
        Self::new()
    }
}

impl ByteIo for Terminal {
    fn read_byte(&mut self) -> u8 {
        let byte = match self.0.getch() {
            Ok(byte) => byte,
            Err(err) => panic!("failed reading from terminal: {err}"),
        };
        echo(byte);
        byte
    }

    fn write_byte(&mut self, byte: u8) {
        echo(byte);
    }
}

fn echo(byte: u8) {
    let mut out = stdout();
    if let Err(err) = out.write_all(&[byte]).and_then(|()| out.flush()) {
        panic!("failed writing to stdout: {err}");
    }
}
