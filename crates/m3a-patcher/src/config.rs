//! Command-line configuration
//!
//! Every option can also be supplied through an `M3A_PATCHER_*` environment
//! variable.
//!
//! # Example
//!
//! ```no_run
//! use m3a_patcher::PatchConfig;
//!
//! let config = PatchConfig::from_args();
//! config.validate().expect("Invalid configuration");
//!
//! println!("Patching {}", config.input_dir.display());
//! ```

use crate::error::ConfigError;
use crate::naming;
use crate::relocation::{DEFAULT_SCALE, MAX_SCALE, PatchOptions};
use clap::Parser;
use m3a_formats::EntryLayout;
use std::path::{Component, Path, PathBuf};

/// Patcher configuration loaded from CLI args and environment variables.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "m3a-patcher",
    about = "Replace and upscale the images inside an M3A archive",
    version
)]
pub struct PatchConfig {
    /// Root folder of the original game data
    #[arg(env = "M3A_PATCHER_INPUT_DIR")]
    pub input_dir: PathBuf,

    /// Root folder of the pre-made replacement images
    #[arg(env = "M3A_PATCHER_UPSCALED_DIR")]
    pub upscaled_dir: PathBuf,

    /// Root folder the patched archive is written to
    #[arg(env = "M3A_PATCHER_OUTPUT_DIR")]
    pub output_dir: PathBuf,

    /// Archive to patch, relative to the input folder or inside it
    #[arg(env = "M3A_PATCHER_ARCHIVE")]
    pub archive: PathBuf,

    /// Directory entries carry a four-byte name
    #[arg(long, env = "M3A_PATCHER_NAMES")]
    pub names: bool,

    /// Rewrite the archive without patching anything
    #[arg(long, env = "M3A_PATCHER_PASSTHROUGH")]
    pub passthrough: bool,

    /// Upscale factor for coordinates and fallback images
    #[arg(long, env = "M3A_PATCHER_SCALE", default_value_t = DEFAULT_SCALE)]
    pub scale: u32,

    /// Log filter used when `RUST_LOG` is unset
    #[arg(long, env = "M3A_PATCHER_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl PatchConfig {
    /// Configuration for patching `archive` with default options
    pub fn new(
        input_dir: impl Into<PathBuf>,
        upscaled_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        archive: impl AsRef<Path>,
    ) -> Self {
        Self {
            input_dir: input_dir.into(),
            upscaled_dir: upscaled_dir.into(),
            output_dir: output_dir.into(),
            archive: archive.as_ref().to_path_buf(),
            names: false,
            passthrough: false,
            scale: DEFAULT_SCALE,
            log_level: "info".to_string(),
        }
    }

    /// Parse configuration from command-line arguments.
    #[must_use]
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Validate configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - The input folder doesn't exist
    /// - The scale is zero or above [`MAX_SCALE`]
    /// - The archive path leaves the input folder or has no file name
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.input_dir.is_dir() {
            return Err(ConfigError::MissingInputDir(self.input_dir.clone()));
        }

        if !(1..=MAX_SCALE).contains(&self.scale) {
            return Err(ConfigError::InvalidScale(self.scale));
        }

        self.relative_archive()?;
        Ok(())
    }

    /// Archive path relative to the input folder
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the path leaves the input folder or has no
    /// file name.
    pub fn relative_archive(&self) -> Result<PathBuf, ConfigError> {
        let relative = self
            .archive
            .strip_prefix(&self.input_dir)
            .unwrap_or(&self.archive);

        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return Err(ConfigError::ArchiveOutsideInput(self.archive.clone()));
        }

        if relative.file_name().is_none() {
            return Err(ConfigError::MissingFileName(self.archive.clone()));
        }

        Ok(relative.to_path_buf())
    }

    /// Path of the archive to read
    ///
    /// # Errors
    ///
    /// See [`Self::relative_archive`].
    pub fn input_path(&self) -> Result<PathBuf, ConfigError> {
        Ok(self.input_dir.join(self.relative_archive()?))
    }

    /// Path the patched archive is written to
    ///
    /// # Errors
    ///
    /// See [`Self::relative_archive`].
    pub fn output_path(&self) -> Result<PathBuf, ConfigError> {
        Ok(self.output_dir.join(self.relative_archive()?))
    }

    /// Folder searched for replacement images
    ///
    /// # Errors
    ///
    /// See [`Self::relative_archive`].
    pub fn replacement_dir(&self) -> Result<PathBuf, ConfigError> {
        Ok(naming::upscaled_folder(
            &self.upscaled_dir,
            &self.relative_archive()?,
        ))
    }

    /// Entry name used for unnamed entries
    ///
    /// # Errors
    ///
    /// See [`Self::relative_archive`].
    pub fn default_entry_name(&self) -> Result<String, ConfigError> {
        Ok(naming::default_entry_name(&self.relative_archive()?))
    }

    /// Directory entry layout
    #[must_use]
    pub const fn layout(&self) -> EntryLayout {
        EntryLayout::from_names(self.names)
    }

    /// Options for the patching pass
    #[must_use]
    pub const fn options(&self) -> PatchOptions {
        PatchOptions {
            scale: self.scale,
            passthrough: self.passthrough,
        }
    }
}
