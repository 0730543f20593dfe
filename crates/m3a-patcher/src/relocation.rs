//! Payload replacement and relocation
//!
//! [`patch_directory`] walks every payload-bearing sub-entry in archive
//! order. Spot items get their placement coordinates multiplied by the
//! scale, then each image payload is swapped for a pre-made replacement or,
//! failing that, upscaled in place by the image codec. Once any payload has
//! changed size the whole payload region is repacked behind the header.
//!
//! Repacking always starts from the header end and covers every payload,
//! including the unmodified ones, so offsets never overlap.

use crate::codec::ImageCodec;
use crate::error::Result;
use crate::naming::replacement_file_name;
use crate::replacement::ReplacementSource;
use m3a_formats::{Directory, FormatError, SubEntry};
use std::fmt;
use tracing::{debug, info, warn};

/// Upscale factor used unless configured otherwise
pub const DEFAULT_SCALE: u32 = 4;

/// Largest accepted upscale factor
pub const MAX_SCALE: u32 = 64;

/// Options for one patching pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatchOptions {
    /// Factor applied to spot item coordinates and fallback image sizes
    pub scale: u32,
    /// Forward the directory untouched
    pub passthrough: bool,
}

impl Default for PatchOptions {
    fn default() -> Self {
        Self {
            scale: DEFAULT_SCALE,
            passthrough: false,
        }
    }
}

/// What a patching pass did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PatchReport {
    /// Spot items whose coordinates were scaled
    pub rescaled: usize,
    /// Payloads swapped for a replacement file
    pub replaced: usize,
    /// Payloads upscaled by the image codec
    pub upscaled: usize,
    /// Payloads the image codec could not process
    pub failed: usize,
    /// Payloads of types that are never replaced
    pub skipped: usize,
    /// Whether the payload region was repacked
    pub relocated: bool,
}

impl fmt::Display for PatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} replaced, {} upscaled, {} failed, {} skipped, {} spot items rescaled{}",
            self.replaced,
            self.upscaled,
            self.failed,
            self.skipped,
            self.rescaled,
            if self.relocated { ", payloads relocated" } else { "" }
        )
    }
}

/// Replace or upscale every image payload of `directory`
///
/// `default_name` stands in for the entry name when entries are unnamed.
/// Image codec failures are logged and counted; the affected sub-entry keeps
/// its payload and the pass continues.
pub fn patch_directory<R, C>(
    directory: &mut Directory,
    default_name: &str,
    options: PatchOptions,
    replacements: &R,
    codec: &C,
) -> Result<PatchReport>
where
    R: ReplacementSource + ?Sized,
    C: ImageCodec + ?Sized,
{
    let mut report = PatchReport::default();
    if options.passthrough {
        debug!("Pass-through mode, directory left unchanged");
        return Ok(report);
    }

    let mut size_changed = false;

    for entry in &mut directory.entries {
        let entry_name = entry
            .name
            .map_or_else(|| default_name.to_string(), |name| name.to_string());
        let index = entry.index;

        for sub_entry in entry.sub_entries.iter_mut().filter(|s| s.carries_payload()) {
            if sub_entry.resource_type.is_spot_item() && rescale_spot_item(sub_entry, options.scale)
            {
                report.rescaled += 1;
            }

            let Some(file_name) =
                replacement_file_name(&entry_name, index, sub_entry.resource_type, sub_entry.face)
            else {
                report.skipped += 1;
                continue;
            };

            let original_size = sub_entry.size;
            debug!("Looking for {}", file_name);

            if let Some(bytes) = replacements.find(&file_name) {
                sub_entry.set_payload(bytes)?;
                report.replaced += 1;
            } else {
                info!("{} not found, upscaling {} bytes", file_name, original_size);
                let payload = sub_entry.payload.as_deref().unwrap_or_default();
                match codec.upscale(payload, options.scale) {
                    Ok(bytes) => {
                        sub_entry.set_payload(bytes)?;
                        report.upscaled += 1;
                    }
                    Err(e) => {
                        warn!(
                            "Entry {} {} face {}: {}",
                            index, sub_entry.resource_type, sub_entry.face, e
                        );
                        report.failed += 1;
                    }
                }
            }

            size_changed |= sub_entry.size != original_size;
        }
    }

    if size_changed {
        let end = relocate_payloads(directory)?;
        debug!("Payloads repacked, archive now {} bytes", end);
        report.relocated = true;
    }

    Ok(report)
}

/// Multiply a spot item's two placement coordinates by `scale`
///
/// Returns `false` when the record has fewer than two metadata words.
pub fn rescale_spot_item(sub_entry: &mut SubEntry, scale: u32) -> bool {
    match sub_entry.metadata.get_mut(..2) {
        Some([x, y]) => {
            *x = x.wrapping_mul(scale);
            *y = y.wrapping_mul(scale);
            true
        }
        _ => {
            warn!(
                "{} has {} metadata words, coordinates not rescaled",
                sub_entry.resource_type,
                sub_entry.metadata.len()
            );
            false
        }
    }
}

/// Pack every payload contiguously behind the header in archive order
///
/// Returns the end offset of the last payload, i.e. the new archive length.
pub fn relocate_payloads(directory: &mut Directory) -> m3a_formats::Result<u64> {
    let mut position = directory.header_len()? as u64;

    for sub_entry in directory.sub_entries_mut().filter(|s| s.carries_payload()) {
        sub_entry.offset = u32::try_from(position).map_err(|_| FormatError::FieldOverflow {
            field: "payload offset",
            value: position,
        })?;
        position += u64::from(sub_entry.size);
    }

    Ok(position)
}
