use thiserror::Error;

/// The range that was exceeded by an [`Error::Overflow`].
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum Overflow {
    /// A parsed operand does not fit the operand type.
    Operand,
    /// The sum of both operands does not fit the operand type.
    Sum,
    /// More bytes arrived than the line buffer can hold before a newline.
    Line,
}

/// Represents an error during one add cycle.
///
/// Every variant aborts the current cycle; nothing is transmitted for it.
#[derive(Clone, Copy, Debug, Error, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum Error {
    #[error("line holds no digits")]
    EmptyInput,
    #[error("encountered non-digit byte 0x{byte:02x} before any digit")]
    InvalidCharacter { byte: u8 },
    #[error("{0:?} exceeds the representable range")]
    Overflow(Overflow),
}
