//! Lookup of pre-made replacement payloads

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Source of replacement payloads keyed by file name
///
/// `None` means no replacement exists and the fallback upscaler should run.
pub trait ReplacementSource {
    /// Replacement bytes for `file_name`, if any
    fn find(&self, file_name: &str) -> Option<Vec<u8>>;
}

/// Replacements stored as files in one folder
#[derive(Debug, Clone)]
pub struct ReplacementFolder {
    root: PathBuf,
}

impl ReplacementFolder {
    /// Look up replacements under `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Folder being searched
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ReplacementSource for ReplacementFolder {
    fn find(&self, file_name: &str) -> Option<Vec<u8>> {
        let path = self.root.join(file_name);
        if !path.is_file() {
            debug!("No replacement at {}", path.display());
            return None;
        }

        match std::fs::read(&path) {
            Ok(bytes) => {
                debug!("Found replacement {} ({} bytes)", path.display(), bytes.len());
                Some(bytes)
            }
            Err(e) => {
                warn!("Unable to read {}: {}", path.display(), e);
                None
            }
        }
    }
}

impl ReplacementSource for HashMap<String, Vec<u8>> {
    fn find(&self, file_name: &str) -> Option<Vec<u8>> {
        self.get(file_name).cloned()
    }
}
