//! M3A patcher binary entry point.
//!
//! This is a thin wrapper around the m3a-patcher library that:
//! 1. Parses command-line arguments
//! 2. Initializes logging
//! 3. Validates configuration
//! 4. Patches the archive
//!
//! Exits non-zero when the archive cannot be read, decoded or written.
//! Individual images that fail to upscale are only logged.

use anyhow::{Context, Result};
use m3a_patcher::{JpegCodec, PatchConfig, pipeline};

fn main() -> Result<()> {
    let config = PatchConfig::from_args();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .init();

    config.validate()?;

    tracing::info!(
        "Patching {} (names: {}, passthrough: {}, scale: {})",
        config.archive.display(),
        config.names,
        config.passthrough,
        config.scale
    );

    let report = pipeline::run(&config, &JpegCodec::default())
        .with_context(|| format!("patching {} failed", config.archive.display()))?;

    tracing::info!("Done: {}", report);
    Ok(())
}
