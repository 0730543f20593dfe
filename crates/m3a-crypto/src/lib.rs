//! Header cipher for M3A asset archives
//!
//! The directory header at the start of every M3A archive is either stored
//! as plain little-endian words or obscured with a word-wise XOR keystream.
//! This crate provides that keystream and the detection rule that tells the
//! two forms apart.
//!
//! # Components
//!
//! - **Keystream**: Linear congruential sequence of 32-bit keys
//! - **Header cipher**: Mode probe, `decrypt` and `encrypt` over header bytes
//!
//! # Examples
//!
//! ```
//! use m3a_crypto::{decrypt, encrypt};
//!
//! // Plaintext header: first word is the word count (2 words = 8 bytes)
//! let plain = [2u8, 0, 0, 0, 0xAA, 0xBB, 0xCC, 0xDD];
//!
//! let raw = encrypt(&plain, true).expect("aligned header");
//! assert_ne!(raw, plain);
//!
//! let header = decrypt(&raw).expect("complete header");
//! assert!(header.encrypted);
//! assert_eq!(header.bytes, plain);
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod header;
pub mod keystream;

pub use error::{CipherError, Result};

// Re-export commonly used types
pub use header::{
    DecryptedHeader, ENCRYPTION_THRESHOLD, HeaderMode, decrypt, encrypt, probe_header,
};
pub use keystream::{ADD_KEY, Keystream, MULT_KEY, apply_keystream};
