#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]
//! Integration tests for archive files on disk
//!
//! Archives are assembled by hand so every byte of the expected output is
//! known up front.

use m3a_formats::{
    BinaryFormat, Directory, EntryLayout, FormatError, ResourceType, load_archive, save_archive,
};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

/// Plaintext archive with a named entry holding a cube face, a text metadata
/// record and a frame.
fn named_archive_bytes() -> Vec<u8> {
    let mut header = Vec::new();
    header.extend_from_slice(&14u32.to_le_bytes()); // word count
    header.extend_from_slice(b"hall"); // name
    header.extend_from_slice(&[0x2A, 0x00, 0x00]); // index 42
    header.push(3); // sub-entry count

    // cube face 3 at 56, 4 bytes
    header.extend_from_slice(&56u32.to_le_bytes());
    header.extend_from_slice(&4u32.to_le_bytes());
    header.extend_from_slice(&[0, 0, 3, 0]);

    // text metadata, aux values, one metadata word
    header.extend_from_slice(&0xDEAD_BEEFu32.to_le_bytes());
    header.extend_from_slice(&0x0BAD_F00Du32.to_le_bytes());
    header.extend_from_slice(&[1, 0, 0, 12]);
    header.extend_from_slice(&77u32.to_le_bytes());

    // frame at 60, 6 bytes
    header.extend_from_slice(&60u32.to_le_bytes());
    header.extend_from_slice(&6u32.to_le_bytes());
    header.extend_from_slice(&[0, 0, 0, 6]);

    // padding word
    header.extend_from_slice(&[0, 0, 0, 0]);
    assert_eq!(header.len(), 56);

    let mut archive = header;
    archive.extend_from_slice(b"CUBE");
    archive.extend_from_slice(b"FRAME!");
    archive
}

#[test]
fn load_named_archive() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("hall.m3a");
    std::fs::write(&path, named_archive_bytes()).unwrap();

    let directory = load_archive(&path, EntryLayout::Named).unwrap();
    assert!(!directory.encrypted);
    assert_eq!(directory.entries.len(), 1);

    let entry = &directory.entries[0];
    assert_eq!(entry.name.map(|n| n.to_string()), Some("hall".to_string()));
    assert_eq!(entry.index, 42);

    let kinds: Vec<ResourceType> = entry.sub_entries.iter().map(|s| s.resource_type).collect();
    assert_eq!(
        kinds,
        vec![
            ResourceType::CubeFace,
            ResourceType::TextMetadata,
            ResourceType::Frame
        ]
    );
    assert_eq!(entry.sub_entries[0].payload.as_deref(), Some(&b"CUBE"[..]));
    assert_eq!(entry.sub_entries[1].payload, None);
    assert_eq!(entry.sub_entries[2].payload.as_deref(), Some(&b"FRAME!"[..]));
}

#[test]
fn save_reproduces_input() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("hall.m3a");
    let output = dir.path().join("out/nested/hall.m3a");
    std::fs::write(&input, named_archive_bytes()).unwrap();

    let directory = load_archive(&input, EntryLayout::Named).unwrap();
    save_archive(&directory, &output).unwrap();

    assert_eq!(std::fs::read(&output).unwrap(), named_archive_bytes());
}

#[test]
fn encrypted_archive_stays_encrypted() {
    let dir = TempDir::new().unwrap();
    let plain = named_archive_bytes();

    let mut encrypted = m3a_crypto::encrypt(&plain[..56], true).unwrap();
    encrypted.extend_from_slice(&plain[56..]);

    let input = dir.path().join("enc.m3a");
    let output = dir.path().join("enc-out.m3a");
    std::fs::write(&input, &encrypted).unwrap();

    let directory = load_archive(&input, EntryLayout::Named).unwrap();
    assert!(directory.encrypted);
    Directory::verify_round_trip(&encrypted[..56], EntryLayout::Named).unwrap();

    save_archive(&directory, &output).unwrap();
    assert_eq!(std::fs::read(&output).unwrap(), encrypted);
}

#[test]
fn missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let err = load_archive(&dir.path().join("absent.m3a"), EntryLayout::Indexed).unwrap_err();
    assert!(matches!(err, FormatError::Io(_)));
    assert!(!err.is_integrity());
}

#[test]
fn wrong_layout_fails_cleanly() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("hall.m3a");
    std::fs::write(&path, named_archive_bytes()).unwrap();

    // Reading names as indices misaligns every field
    let result = load_archive(&path, EntryLayout::Indexed);
    assert!(result.is_err());
}
