//! One complete patching run: load, patch, store

use crate::codec::ImageCodec;
use crate::config::PatchConfig;
use crate::error::{PatchError, Result};
use crate::relocation::{PatchReport, patch_directory};
use crate::replacement::ReplacementFolder;
use m3a_formats::{load_archive, log_directory, save_archive};
use tracing::info;

/// Patch the archive named by `config`
///
/// The source archive is closed before patching starts. Nothing is written
/// unless the whole directory loads, patches and encodes cleanly.
pub fn run<C: ImageCodec + ?Sized>(config: &PatchConfig, codec: &C) -> Result<PatchReport> {
    let input = config.input_path()?;
    let output = config.output_path()?;

    let mut directory =
        load_archive(&input, config.layout()).map_err(|source| PatchError::Load {
            path: input.clone(),
            source,
        })?;
    log_directory(&directory);

    let replacements = ReplacementFolder::new(config.replacement_dir()?);
    if !config.passthrough {
        info!(
            "Searching for upscaled data in {}",
            replacements.root().display()
        );
    }

    let report = patch_directory(
        &mut directory,
        &config.default_entry_name()?,
        config.options(),
        &replacements,
        codec,
    )?;

    save_archive(&directory, &output).map_err(|source| PatchError::Store {
        path: output.clone(),
        source,
    })?;

    Ok(report)
}
