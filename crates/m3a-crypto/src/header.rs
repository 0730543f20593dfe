//! Encrypted/plaintext header detection and transform
//!
//! The format carries no explicit encryption flag. A plaintext header starts
//! with its own length in words, which is always small; an encrypted header
//! starts with that length XORed with [`ADD_KEY`], which is almost always huge.
//! Any first word above [`ENCRYPTION_THRESHOLD`] is therefore treated as
//! encrypted. A first word of exactly `1_000_000` is plaintext.

use crate::error::{CipherError, Result};
use crate::keystream::{ADD_KEY, apply_keystream};

/// Largest first word still read as a plaintext word count
pub const ENCRYPTION_THRESHOLD: u32 = 1_000_000;

/// Result of inspecting the first word of an archive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderMode {
    /// True header length in 32-bit words
    pub word_count: u32,
    /// Whether the header is obscured by the keystream
    pub encrypted: bool,
}

impl HeaderMode {
    /// Header length in bytes
    pub fn byte_len(self) -> Result<usize> {
        (self.word_count as usize)
            .checked_mul(4)
            .ok_or(CipherError::WordCountOverflow(self.word_count))
    }
}

/// Classify a header from its first little-endian word.
pub const fn probe_header(first_word: u32) -> HeaderMode {
    if first_word > ENCRYPTION_THRESHOLD {
        HeaderMode {
            word_count: first_word ^ ADD_KEY,
            encrypted: true,
        }
    } else {
        HeaderMode {
            word_count: first_word,
            encrypted: false,
        }
    }
}

/// Plaintext header bytes together with the mode they were stored in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecryptedHeader {
    /// Header bytes, exactly `word_count * 4` long
    pub bytes: Vec<u8>,
    /// Whether the source header was encrypted
    pub encrypted: bool,
}

/// Recover the plaintext header from the start of a raw archive stream.
///
/// Only the first `word_count * 4` bytes of `raw` are used; anything after
/// them (the payload region) is ignored.
pub fn decrypt(raw: &[u8]) -> Result<DecryptedHeader> {
    let Some(first) = raw.first_chunk::<4>() else {
        return Err(CipherError::Truncated {
            expected: 4,
            actual: raw.len(),
        });
    };

    let mode = probe_header(u32::from_le_bytes(*first));
    let len = mode.byte_len()?;
    if raw.len() < len {
        return Err(CipherError::Truncated {
            expected: len,
            actual: raw.len(),
        });
    }

    let mut bytes = raw[..len].to_vec();
    if mode.encrypted {
        apply_keystream(&mut bytes);
    }

    Ok(DecryptedHeader {
        bytes,
        encrypted: mode.encrypted,
    })
}

/// Produce the on-disk header from plaintext bytes.
///
/// Plaintext headers are copied verbatim.
pub fn encrypt(plain: &[u8], encrypted: bool) -> Result<Vec<u8>> {
    if plain.len() % 4 != 0 {
        return Err(CipherError::Misaligned(plain.len()));
    }

    let mut raw = plain.to_vec();
    if encrypted {
        apply_keystream(&mut raw);
    }
    Ok(raw)
}
