//! Error types for the patcher.

use m3a_formats::FormatError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort patching of one archive.
#[derive(Debug, Error)]
pub enum PatchError {
    /// Source archive missing, unreadable or malformed
    #[error("failed to load {path}: {source}")]
    Load {
        /// Archive path
        path: PathBuf,
        /// Underlying failure
        #[source]
        source: FormatError,
    },

    /// Destination archive could not be written
    #[error("failed to store {path}: {source}")]
    Store {
        /// Archive path
        path: PathBuf,
        /// Underlying failure
        #[source]
        source: FormatError,
    },

    /// Directory could not be updated consistently
    #[error("directory update failed: {0}")]
    Format(#[from] FormatError),

    /// Invalid configuration
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl PatchError {
    /// Whether the failure is a file access problem rather than bad data
    pub fn is_file_access(&self) -> bool {
        match self {
            Self::Load { source, .. } | Self::Store { source, .. } => {
                matches!(source, FormatError::Io(_))
            }
            _ => false,
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Input folder does not exist
    #[error("input directory not found: {0}")]
    MissingInputDir(PathBuf),

    /// Archive path points outside the input folder
    #[error("archive path escapes the input directory: {0}")]
    ArchiveOutsideInput(PathBuf),

    /// Archive path has no file name
    #[error("archive path has no file name: {0}")]
    MissingFileName(PathBuf),

    /// Upscale factor outside the supported range
    #[error("scale {0} is outside 1..=64")]
    InvalidScale(u32),
}

/// Errors from the fallback image codec. These never abort a run.
#[derive(Debug, Error)]
pub enum ImageCodecError {
    /// Payload is not a decodable image
    #[error("unable to decode image: {0}")]
    Decode(String),

    /// Image could not be resized
    #[error("unable to upscale image: {0}")]
    Resize(String),

    /// Resized image could not be encoded
    #[error("unable to encode image: {0}")]
    Encode(String),
}

/// Result type for patcher operations
pub type Result<T> = std::result::Result<T, PatchError>;
