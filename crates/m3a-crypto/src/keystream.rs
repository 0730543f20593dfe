//! Linear congruential keystream used to obscure archive headers
//!
//! Every header word is XORed with one key. The running key starts at zero;
//! before each word it is advanced by [`ADD_KEY`], and after each word it is
//! multiplied by [`MULT_KEY`], both with 32-bit wraparound. Because XOR is its
//! own inverse, the same sequence both encrypts and decrypts.

/// Additive step of the key schedule
pub const ADD_KEY: u32 = 0x3C6E_F35F;

/// Multiplicative step of the key schedule
pub const MULT_KEY: u32 = 0x0019_660D;

/// Infinite iterator over the header keystream
#[derive(Debug, Clone)]
pub struct Keystream {
    key: u32,
}

impl Keystream {
    /// Start a fresh keystream (running key zero)
    pub const fn new() -> Self {
        Self { key: 0 }
    }
}

impl Default for Keystream {
    fn default() -> Self {
        Self::new()
    }
}

impl Iterator for Keystream {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        self.key = self.key.wrapping_add(ADD_KEY);
        let current = self.key;
        self.key = self.key.wrapping_mul(MULT_KEY);
        Some(current)
    }
}

/// XOR `data` in place with a fresh keystream, one little-endian word at a time.
///
/// Only whole words are transformed; callers validate alignment beforehand.
pub fn apply_keystream(data: &mut [u8]) {
    for (chunk, key) in data.chunks_exact_mut(4).zip(Keystream::new()) {
        let word = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]) ^ key;
        chunk.copy_from_slice(&word.to_le_bytes());
    }
}
