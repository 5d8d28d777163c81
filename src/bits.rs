//! Field access on 32-bit register words.

/// Checks if bit `bit` of `word` is set.
pub fn is_set(word: u32, bit: u32) -> bool {
    word & (1 << bit) != 0
}

/// The least significant byte of a register word, where data registers keep their character.
pub fn low_byte(word: u32) -> u8 {
    (word & 0xff) as u8
}
