//! Image patcher for M3A asset archives.
//!
//! This crate swaps the images stored inside an archive for higher
//! resolution versions and keeps the directory consistent:
//! - Pre-made replacements are looked up by a fixed naming scheme
//! - Images without a replacement are upscaled by an [`ImageCodec`]
//! - Spot item coordinates are scaled to match
//! - Payloads are repacked behind the header whenever a size changes
//!
//! # Architecture
//!
//! - `config`: CLI arguments and derived paths
//! - `naming`: Replacement folder and file names
//! - `replacement`: Replacement lookup
//! - `codec`: Fallback decode/resize/encode
//! - `relocation`: Per sub-entry patching and payload repacking
//! - `pipeline`: Load, patch and store one archive
//!
//! # Example
//!
//! ```no_run
//! use m3a_patcher::{JpegCodec, PatchConfig, pipeline};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = PatchConfig::from_args();
//!     config.validate()?;
//!
//!     let report = pipeline::run(&config, &JpegCodec::default())?;
//!     println!("{report}");
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod codec;
pub mod config;
pub mod error;
pub mod naming;
pub mod pipeline;
pub mod relocation;
pub mod replacement;

pub use codec::{ImageCodec, JpegCodec, MAX_RESIZED_BYTES, Pixels};
pub use config::PatchConfig;
pub use error::{ConfigError, ImageCodecError, PatchError, Result};
pub use relocation::{
    DEFAULT_SCALE, MAX_SCALE, PatchOptions, PatchReport, patch_directory, relocate_payloads,
    rescale_spot_item,
};
pub use replacement::{ReplacementFolder, ReplacementSource};
