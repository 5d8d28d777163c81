//! Conversion between unsigned integers and ASCII decimal digit sequences.

use core::{fmt, ops::Deref};

use heapless::Vec;
use num_traits::{AsPrimitive, PrimInt, Unsigned};

use crate::error::{Error, Overflow};

/// Number of digits in `u128::MAX`, the widest value [`format`] accepts.
pub const MAX_DIGITS: usize = 39;

/// Unsigned primitive integers the parser and formatter work with.
pub trait Decimal: PrimInt + Unsigned + From<u8> + AsPrimitive<u8> {}

impl<T: PrimInt + Unsigned + From<u8> + AsPrimitive<u8>> Decimal for T {}

/// Parses the leading decimal digits of `bytes`.
///
/// Scanning stops at the first non-digit once at least one digit has been consumed,
/// returning the value accumulated so far, so `b"12x34"` parses as `12`.
pub fn parse<T: Decimal>(bytes: &[u8]) -> Result<T, Error> {
    let (first, _) = bytes.split_first().ok_or(Error::EmptyInput)?;
    if !first.is_ascii_digit() {
        return Err(Error::InvalidCharacter { byte: *first });
    }

    let ten = <T as From<u8>>::from(10);
    let mut value = T::zero();
    for &byte in bytes.iter().take_while(|byte| byte.is_ascii_digit()) {
        value = value
            .checked_mul(&ten)
            .and_then(|value| value.checked_add(&<T as From<u8>>::from(byte - b'0')))
            .ok_or(Error::Overflow(Overflow::Operand))?;
    }
    Ok(value)
}

/// Produces the decimal digits of `value`, most significant first, without leading zeros.
pub fn format<T: Decimal>(mut value: T) -> Digits {
    let ten = <T as From<u8>>::from(10);
    let mut digits = Vec::new();
    loop {
        let digit: u8 = (value % ten).as_();
        let pushed = digits.push(b'0' + digit);
        debug_assert!(pushed.is_ok(), "more than {MAX_DIGITS} digits");
        value = value / ten;
        if value.is_zero() {
            break;
        }
    }
    digits.reverse();
    Digits(digits)
}

/// ASCII digits produced by [`format`].
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Digits(Vec<u8, MAX_DIGITS>);

impl Digits {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn as_str(&self) -> &str {
        // Only ASCII digits are ever pushed.
        core::str::from_utf8(&self.0).unwrap_or_default()
    }
}

impl Deref for Digits {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Digits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.as_str())
    }
}

impl fmt::Display for Digits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
