//! Replacement file naming
//!
//! Upscaled images for an archive `<dir>/<stem>.<ext>` live in the folder
//! `<upscaled root>/<dir>/<stem>-<ext>/`, one JPEG per image sub-entry:
//!
//! ```text
//! <name>-<index>-5-<face>-edit.jpeg         spot item
//! <name>-<index>-45-<face>-edit.jpeg        localized spot item
//! <name>-<index>-46-<face>-edit.jpeg        localized frame
//! <name>-<index>-6-edit.jpeg                frame
//! <name>-<index>-<side>-edit.jpeg           cube face
//! ```
//!
//! `<name>` is the entry name, or the first four characters of the archive
//! stem when entries are unnamed.

use m3a_formats::ResourceType;
use std::path::{Path, PathBuf};

/// Cube face suffixes indexed by face number
pub const CUBE_FACE_SUFFIXES: [&str; 7] = ["", "back", "bottom", "front", "left", "right", "top"];

/// File name of the replacement for one sub-entry, or `None` for resource
/// types that are never replaced
pub fn replacement_file_name(
    entry_name: &str,
    index: u32,
    resource_type: ResourceType,
    face: u8,
) -> Option<String> {
    let full_name = format!("{entry_name}-{index}");

    match resource_type {
        ResourceType::SpotItem | ResourceType::LocalizedSpotItem | ResourceType::LocalizedFrame => {
            Some(format!(
                "{full_name}-{}-{face}-edit.jpeg",
                resource_type.base_tag()
            ))
        }
        ResourceType::Frame => Some(format!("{full_name}-{}-edit.jpeg", resource_type.tag())),
        ResourceType::CubeFace => CUBE_FACE_SUFFIXES
            .get(usize::from(face))
            .map(|side| format!("{full_name}-{side}-edit.jpeg")),
        _ => None,
    }
}

/// Folder holding the replacements for `relative_archive`
pub fn upscaled_folder(upscaled_root: &Path, relative_archive: &Path) -> PathBuf {
    let parent = relative_archive.parent().unwrap_or_else(|| Path::new(""));
    let stem = relative_archive
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();
    let extension = relative_archive
        .extension()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();

    upscaled_root.join(parent).join(format!("{stem}-{extension}"))
}

/// Entry name used when the archive's entries carry none
pub fn default_entry_name(relative_archive: &Path) -> String {
    relative_archive
        .file_stem()
        .map(|s| s.to_string_lossy().chars().take(4).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_spot_item_names() {
        assert_eq!(
            replacement_file_name("node", 12, ResourceType::SpotItem, 3).as_deref(),
            Some("node-12-5-3-edit.jpeg")
        );
        assert_eq!(
            replacement_file_name("node", 12, ResourceType::LocalizedSpotItem, 1).as_deref(),
            Some("node-12-45-1-edit.jpeg")
        );
        assert_eq!(
            replacement_file_name("node", 12, ResourceType::LocalizedFrame, 0).as_deref(),
            Some("node-12-46-0-edit.jpeg")
        );
    }

    #[test]
    fn test_frame_name_has_no_face() {
        assert_eq!(
            replacement_file_name("menu", 7, ResourceType::Frame, 4).as_deref(),
            Some("menu-7-6-edit.jpeg")
        );
    }

    #[test]
    fn test_cube_face_names() {
        let names: Vec<String> = (0..7)
            .filter_map(|face| replacement_file_name("mall", 100, ResourceType::CubeFace, face))
            .collect();

        assert_eq!(
            names,
            vec![
                "mall-100--edit.jpeg",
                "mall-100-back-edit.jpeg",
                "mall-100-bottom-edit.jpeg",
                "mall-100-front-edit.jpeg",
                "mall-100-left-edit.jpeg",
                "mall-100-right-edit.jpeg",
                "mall-100-top-edit.jpeg",
            ]
        );
        assert_eq!(replacement_file_name("mall", 100, ResourceType::CubeFace, 7), None);
    }

    #[test]
    fn test_other_types_not_replaced() {
        for resource_type in [
            ResourceType::Movie,
            ResourceType::Text,
            ResourceType::RawData,
            ResourceType::WaterEffectMask,
            ResourceType::Unknown(99),
        ] {
            assert_eq!(replacement_file_name("x", 1, resource_type, 0), None);
        }
    }

    #[test]
    fn test_upscaled_folder() {
        assert_eq!(
            upscaled_folder(Path::new("/up"), Path::new("data/nodes.m3a")),
            PathBuf::from("/up/data/nodes-m3a")
        );
        assert_eq!(
            upscaled_folder(Path::new("/up"), Path::new("menu.m3o")),
            PathBuf::from("/up/menu-m3o")
        );
    }

    #[test]
    fn test_default_entry_name() {
        assert_eq!(default_entry_name(Path::new("data/nodes.m3a")), "node");
        assert_eq!(default_entry_name(Path::new("ab.m3a")), "ab");
    }
}
