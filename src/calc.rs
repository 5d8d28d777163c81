use log::{debug, warn};

use crate::{
    Word, decimal,
    error::{Error, Overflow},
    line::{self, DEFAULT_LINE_CAPACITY, LineReader},
    uart::ByteIo,
};

/// Where the calculator is within an add cycle.
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq)]
pub enum State {
    #[default]
    ReadFirst,
    ReadSecond {
        first: Word,
    },
    ComputeAndReply {
        first: Word,
        second: Word,
    },
}

/// Represents the result of a successful [`Calculator::step`].
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum Step {
    /// An operand was read, the cycle continues.
    Pending,
    /// The cycle completed and the sum was transmitted.
    Replied(Word),
}

/// How many add cycles [`Calculator::run`] performs.
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq)]
pub enum Mode {
    /// A single cycle, successful or not.
    Once,
    /// Cycles forever, starting over after every reply or error.
    #[default]
    Loop,
}

/// Reads two decimal operands from a serial line and replies with their sum.
///
/// ### Cycles
/// Each cycle reads the first operand line, the second operand line, and then
/// writes the sum followed by a newline. [`Calculator::step`] performs one of these
/// transitions at a time. Any error aborts the cycle and the next step starts over
/// with the first operand. Output is only produced once both operands parsed and
/// their sum fits a [`Word`].
pub struct Calculator<P, const N: usize = DEFAULT_LINE_CAPACITY> {
    io: P,
    reader: LineReader<N>,
    state: State,
}

impl<P: ByteIo, const N: usize> Calculator<P, N> {
    pub fn new(io: P) -> Self {
        Self {
            io,
            reader: LineReader::new(),
            state: State::ReadFirst,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn io(&self) -> &P {
        &self.io
    }

    pub fn io_mut(&mut self) -> &mut P {
        &mut self.io
    }

    pub fn into_io(self) -> P {
        self.io
    }

    /// Performs the transition out of the current state.
    ///
    /// On error the state is reset to [`State::ReadFirst`] before the error is returned.
    pub fn step(&mut self) -> Result<Step, Error> {
        let result = self.transition();
        if let Err(err) = &result {
            warn!("aborting add cycle in {:?}: {err}", self.state);
            self.state = State::ReadFirst;
        }
        result
    }

    fn transition(&mut self) -> Result<Step, Error> {
        match self.state {
            State::ReadFirst => {
                let first = self.read_operand()?;
                self.state = State::ReadSecond { first };
                Ok(Step::Pending)
            }
            State::ReadSecond { first } => {
                let second = self.read_operand()?;
                self.state = State::ComputeAndReply { first, second };
                Ok(Step::Pending)
            }
            State::ComputeAndReply { first, second } => {
                let sum = first
                    .checked_add(second)
                    .ok_or(Error::Overflow(Overflow::Sum))?;
                line::write_line(&mut self.io, &decimal::format(sum));
                debug!("{first} + {second} = {sum}");
                self.state = State::ReadFirst;
                Ok(Step::Replied(sum))
            }
        }
    }

    fn read_operand(&mut self) -> Result<Word, Error> {
        let line = self.reader.read_line(&mut self.io)?;
        let operand = decimal::parse(line)?;
        debug!("read operand {operand}");
        Ok(operand)
    }

    /// Steps until the current cycle replies or fails.
    pub fn run_cycle(&mut self) -> Result<Word, Error> {
        loop {
            if let Step::Replied(sum) = self.step()? {
                return Ok(sum);
            }
        }
    }

    /// Runs add cycles according to `mode`.
    ///
    /// With [`Mode::Loop`] this never returns; failed cycles are logged and skipped.
    pub fn run(&mut self, mode: Mode) -> Result<Word, Error> {
        match mode {
            Mode::Once => self.run_cycle(),
            Mode::Loop => loop {
                let _ = self.run_cycle();
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::VecDeque,
        panic::{self, AssertUnwindSafe},
    };

    use super::*;

    struct Script {
        input: VecDeque<u8>,
        output: std::vec::Vec<u8>,
    }

    impl ByteIo for Script {
        fn read_byte(&mut self) -> u8 {
            self.input.pop_front().expect("script ran out of input")
        }
        fn write_byte(&mut self, byte: u8) {
            self.output.push(byte);
        }
    }

    fn calculator(input: &[u8]) -> Calculator<Script> {
        Calculator::new(Script {
            input: input.iter().copied().collect(),
            output: std::vec::Vec::new(),
        })
    }

    #[test]
    fn walks_through_states() {
        let mut calc = calculator(b"12\n30\n");
        assert_eq!(calc.state(), State::ReadFirst);
        assert_eq!(calc.step(), Ok(Step::Pending));
        assert_eq!(calc.state(), State::ReadSecond { first: 12 });
        assert_eq!(calc.step(), Ok(Step::Pending));
        assert_eq!(
            calc.state(),
            State::ComputeAndReply {
                first: 12,
                second: 30
            }
        );
        assert!(calc.io().output.is_empty());
        assert_eq!(calc.step(), Ok(Step::Replied(42)));
        assert_eq!(calc.state(), State::ReadFirst);
        assert_eq!(calc.io().output, b"42\n");
    }

    #[test]
    fn once_performs_a_single_cycle() {
        let mut calc = calculator(b"1\n2\n3\n4\n");
        assert_eq!(calc.run(Mode::Once), Ok(3));
        assert_eq!(calc.io().input, b"3\n4\n");
        assert_eq!(calc.io().output, b"3\n");
    }

    #[test]
    fn loop_replies_to_every_complete_pair() {
        let mut calc = calculator(b"1\n2\n\n3\n4\n5\n");
        // The script panics once its input is exhausted, the only way out of the loop.
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| calc.run(Mode::Loop)));
        assert!(outcome.is_err());
        assert_eq!(calc.state(), State::ReadSecond { first: 5 });
        assert_eq!(calc.io().output, b"3\n7\n");
    }

    #[test]
    fn sum_overflow_emits_nothing_and_restarts() {
        let mut calc = calculator(b"4294967295\n1\n");
        assert_eq!(calc.run_cycle(), Err(Error::Overflow(Overflow::Sum)));
        assert_eq!(calc.state(), State::ReadFirst);
        assert!(calc.io().output.is_empty());
    }

    #[test]
    fn failed_second_operand_restarts_at_first() {
        let mut calc = calculator(b"5\n\n7\n8\n");
        assert_eq!(calc.run_cycle(), Err(Error::EmptyInput));
        assert_eq!(calc.state(), State::ReadFirst);
        assert_eq!(calc.run_cycle(), Ok(15));
        assert_eq!(calc.into_io().output, b"15\n");
    }

    #[test]
    fn invalid_first_operand() {
        let mut calc = calculator(b"x1\n");
        assert_eq!(
            calc.step(),
            Err(Error::InvalidCharacter { byte: b'x' })
        );
        assert_eq!(calc.state(), State::ReadFirst);
    }

    #[test]
    fn overlong_operand_line() {
        let mut calc: Calculator<Script, 4> = Calculator::new(Script {
            input: b"123456\n1\n2\n".iter().copied().collect(),
            output: std::vec::Vec::new(),
        });
        assert_eq!(calc.run_cycle(), Err(Error::Overflow(Overflow::Line)));
        assert_eq!(calc.run_cycle(), Ok(3));
    }
}
