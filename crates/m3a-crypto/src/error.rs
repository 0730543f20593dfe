//! Error types for header cipher operations

use thiserror::Error;

/// Errors that can occur while decrypting or encrypting an archive header
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CipherError {
    /// Fewer bytes are available than the header declares
    #[error("truncated header: declared {expected} bytes, only {actual} available")]
    Truncated {
        /// Header length implied by the declared word count
        expected: usize,
        /// Bytes actually available
        actual: usize,
    },

    /// Header bytes do not form whole 32-bit words
    #[error("header length {0} is not a multiple of 4")]
    Misaligned(usize),

    /// Declared word count does not fit in the address space
    #[error("declared word count {0} is too large")]
    WordCountOverflow(u32),
}

/// Result type for cipher operations
pub type Result<T> = std::result::Result<T, CipherError>;
