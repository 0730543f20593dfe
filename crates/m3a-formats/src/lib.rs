//! Directory codec and archive reader/writer for M3A asset archives
//!
#![allow(clippy::cast_possible_truncation)] // Intentional for binary format parsing
#![allow(clippy::cast_lossless)] // Sometimes clearer than From
#![allow(clippy::uninlined_format_args)] // Backwards compatibility
#![allow(clippy::doc_markdown)] // Many format-specific terms don't need backticks
#![allow(clippy::module_name_repetitions)] // Clear naming is preferred
//! M3A archives bundle the images, movies and placement records of an
//! adventure game's nodes. Each archive starts with a directory header,
//! optionally obscured by a keystream, followed by the payload region.
//!
//! # Components
//!
//! - **Cursor**: Bounds-checked fixed-width reader/writer ([`ByteCursor`])
//! - **Directory**: Entries, sub-entries and metadata ([`Directory`])
//! - **Archive**: Read and write phases that move payloads by offset
//!
//! # Design Principles
//!
//! - **Symmetric Operations**: Both parsing and building supported
//! - **Exact Sizes**: The header always encodes to its declared word count
//! - **Round-Trip Guarantee**: parse(build(data)) == data

#![warn(missing_docs)]

/// Archive read and write phases
///
/// The archive file is only open while the directory and payloads are being
/// loaded, and again while the rewritten archive is being stored.
pub mod archive;
pub mod cursor;
pub mod directory;
pub mod error;

// Test utilities module
#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
pub(crate) mod test_utils;

pub use archive::{load_archive, read_archive, save_archive, write_archive};
pub use cursor::{ByteCursor, FixedWidth};
pub use directory::{
    Directory, Entry, EntryLayout, EntryName, ResourceType, SubEntry, log_directory,
};
pub use error::{FormatError, Result};

/// Common format trait for symmetric parse/build
pub trait BinaryFormat: Sized {
    /// Parsing options that are not recorded in the bytes themselves
    type Options: Copy;

    /// Parse from bytes
    fn parse(data: &[u8], options: Self::Options) -> Result<Self>;

    /// Build to bytes
    fn build(&self) -> Result<Vec<u8>>;

    /// Verify round-trip correctness
    fn verify_round_trip(data: &[u8], options: Self::Options) -> Result<()> {
        let parsed = Self::parse(data, options)?;
        let rebuilt = parsed.build()?;
        if data != rebuilt.as_slice() {
            return Err(FormatError::RoundTripMismatch);
        }
        Ok(())
    }
}
