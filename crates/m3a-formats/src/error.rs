//! Error types for directory decoding and archive I/O

use m3a_crypto::CipherError;
use thiserror::Error;

/// Errors that can occur when decoding, encoding, reading or writing an archive
#[derive(Debug, Error)]
pub enum FormatError {
    /// A fixed-width access would run past the end of the buffer
    #[error("out of bounds: {width} bytes at position {position}, buffer is {len} bytes")]
    OutOfBounds {
        /// Cursor position at the time of the access
        position: usize,
        /// Width of the attempted access
        width: usize,
        /// Total buffer length
        len: usize,
    },

    /// Word count stored in the header disagrees with the header length
    #[error("word count mismatch: header declares {declared} bytes, buffer holds {actual}")]
    WordCountMismatch {
        /// Bytes implied by the declared word count
        declared: usize,
        /// Bytes actually present
        actual: usize,
    },

    /// Encoding a directory would not fill exactly the declared header length
    #[error("encoded size mismatch: directory encodes to {encoded} bytes, header declares {declared}")]
    EncodedSizeMismatch {
        /// Bytes the directory would encode to
        encoded: usize,
        /// Bytes implied by the declared word count
        declared: usize,
    },

    /// A loaded payload no longer matches its declared size
    #[error("entry {index}: payload holds {actual} bytes but size field says {declared}")]
    PayloadSizeMismatch {
        /// Owning entry index
        index: u32,
        /// Declared size field
        declared: u32,
        /// Actual payload length
        actual: usize,
    },

    /// A payload range lies outside the payload region of the archive
    #[error("entry {index}: payload at {offset}+{size} is outside {start}..{end}")]
    PayloadOutOfRange {
        /// Owning entry index
        index: u32,
        /// Payload offset
        offset: u32,
        /// Payload size
        size: u32,
        /// First valid payload byte (header length)
        start: u64,
        /// One past the last valid payload byte
        end: u64,
    },

    /// A field value does not fit its on-disk width
    #[error("{field} value {value} does not fit in its on-disk field")]
    FieldOverflow {
        /// Field name
        field: &'static str,
        /// Offending value
        value: u64,
    },

    /// Parse/build cycle did not reproduce the input
    #[error("round-trip verification failed")]
    RoundTripMismatch,

    /// Header cipher failure (truncated or misaligned header)
    #[error("header cipher: {0}")]
    Cipher(#[from] CipherError),

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// `BinRw` parsing/writing error
    #[error("Binary format error: {0}")]
    BinRw(#[from] binrw::Error),
}

impl FormatError {
    /// Whether the error reports a structurally inconsistent archive rather
    /// than an I/O failure
    pub const fn is_integrity(&self) -> bool {
        matches!(
            self,
            Self::WordCountMismatch { .. }
                | Self::EncodedSizeMismatch { .. }
                | Self::PayloadSizeMismatch { .. }
                | Self::PayloadOutOfRange { .. }
                | Self::RoundTripMismatch
                | Self::Cipher(_)
        )
    }
}

/// Type alias for format operation results
pub type Result<T> = std::result::Result<T, FormatError>;
