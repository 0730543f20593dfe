#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]
//! End-to-end patching of archives on disk

use m3a_formats::{
    Directory, Entry, EntryLayout, EntryName, ResourceType, SubEntry, load_archive, save_archive,
};
use m3a_patcher::{
    ImageCodec, ImageCodecError, JpegCodec, PatchConfig, PatchError, Pixels, pipeline,
    relocate_payloads,
};
use pretty_assertions::assert_eq;
use std::path::Path;
use tempfile::TempDir;

const ARCHIVE: &str = "data/nodes.m3a";

/// Treats bytes as a one-row image; resizing repeats every byte
struct RepeatCodec;

impl ImageCodec for RepeatCodec {
    fn decode(&self, bytes: &[u8]) -> Result<Pixels, ImageCodecError> {
        Ok(Pixels {
            width: u32::try_from(bytes.len()).unwrap(),
            height: 1,
            rgb: bytes.to_vec(),
        })
    }

    fn resize(&self, pixels: &Pixels, factor: u32) -> Result<Pixels, ImageCodecError> {
        Ok(Pixels {
            width: pixels.width * factor,
            height: 1,
            rgb: pixels
                .rgb
                .iter()
                .flat_map(|&b| std::iter::repeat_n(b, factor as usize))
                .collect(),
        })
    }

    fn encode(&self, pixels: &Pixels) -> Result<Vec<u8>, ImageCodecError> {
        Ok(pixels.rgb.clone())
    }
}

struct Workspace {
    _root: TempDir,
    input: std::path::PathBuf,
    upscaled: std::path::PathBuf,
    output: std::path::PathBuf,
}

impl Workspace {
    fn new() -> Self {
        let root = TempDir::new().unwrap();
        let input = root.path().join("game");
        let upscaled = root.path().join("upscaled");
        let output = root.path().join("patched");
        std::fs::create_dir_all(&input).unwrap();
        Self {
            _root: root,
            input,
            upscaled,
            output,
        }
    }

    fn config(&self) -> PatchConfig {
        PatchConfig::new(&self.input, &self.upscaled, &self.output, ARCHIVE)
    }

    fn write_input(&self, directory: &Directory) -> Vec<u8> {
        let path = self.input.join(ARCHIVE);
        save_archive(directory, &path).unwrap();
        std::fs::read(path).unwrap()
    }

    fn add_replacement(&self, file_name: &str, bytes: &[u8]) {
        let folder = self.upscaled.join("data/nodes-m3a");
        std::fs::create_dir_all(&folder).unwrap();
        std::fs::write(folder.join(file_name), bytes).unwrap();
    }

    fn output_path(&self) -> std::path::PathBuf {
        self.output.join(ARCHIVE)
    }

    fn load_output(&self, layout: EntryLayout) -> Directory {
        load_archive(&self.output_path(), layout).unwrap()
    }
}

/// Directory with a word-aligned header and contiguous payloads
fn packed_directory(entries: Vec<Entry>, encrypted: bool) -> Directory {
    let mut directory = Directory {
        word_count: 0,
        encrypted,
        entries,
        trailing: Vec::new(),
    };
    let used = directory.encoded_len();
    let padded = used.div_ceil(4) * 4;
    directory.trailing = vec![0; padded - used];
    directory.word_count = u32::try_from(padded / 4).unwrap();
    relocate_payloads(&mut directory).unwrap();
    directory
}

fn image(resource_type: ResourceType, face: u8, bytes: &[u8], metadata: Vec<u32>) -> SubEntry {
    SubEntry::with_payload(resource_type, face, 0, bytes.to_vec(), metadata).unwrap()
}

fn sample_entries() -> Vec<Entry> {
    let mut first = Entry::new(None, 3);
    first.sub_entries = vec![
        image(ResourceType::Frame, 0, b"ab", vec![]),
        image(ResourceType::CubeFace, 2, b"xyz", vec![]),
        SubEntry::metadata_only(ResourceType::TextMetadata, (0xAAAA, 0xBBBB), vec![9]),
    ];

    let mut second = Entry::new(None, 8);
    second.sub_entries = vec![
        image(ResourceType::SpotItem, 1, b"s", vec![10, 20, 30]),
        image(ResourceType::Movie, 0, b"movie", vec![]),
    ];

    vec![first, second]
}

fn assert_contiguous(directory: &Directory, file_len: usize) {
    let mut position = directory.word_count * 4;
    for (_, sub_entry) in directory.payloads() {
        assert_eq!(sub_entry.offset, position);
        position += sub_entry.size;
    }
    assert_eq!(position as usize, file_len);
}

#[test]
fn replaces_and_upscales_end_to_end() {
    let workspace = Workspace::new();
    workspace.write_input(&packed_directory(sample_entries(), false));
    workspace.add_replacement("node-3-6-edit.jpeg", b"REPLACED");

    let report = pipeline::run(&workspace.config(), &RepeatCodec).unwrap();
    assert_eq!(report.replaced, 1);
    assert_eq!(report.upscaled, 2);
    assert_eq!(report.rescaled, 1);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.failed, 0);
    assert!(report.relocated);

    let patched = workspace.load_output(EntryLayout::Indexed);
    let first = &patched.entries[0].sub_entries;
    let second = &patched.entries[1].sub_entries;

    assert_eq!(first[0].payload.as_deref(), Some(&b"REPLACED"[..]));
    assert_eq!(first[1].payload.as_deref(), Some(&b"xxxxyyyyzzzz"[..]));
    assert_eq!((first[2].offset, first[2].size), (0xAAAA, 0xBBBB));
    assert_eq!(second[0].payload.as_deref(), Some(&b"ssss"[..]));
    assert_eq!(second[0].metadata, vec![40, 80, 30]);
    assert_eq!(second[1].payload.as_deref(), Some(&b"movie"[..]));

    let file_len = std::fs::read(workspace.output_path()).unwrap().len();
    assert_contiguous(&patched, file_len);
}

#[test]
fn passthrough_is_byte_identical() {
    let workspace = Workspace::new();
    let original = workspace.write_input(&packed_directory(sample_entries(), false));
    workspace.add_replacement("node-3-6-edit.jpeg", b"REPLACED");

    let mut config = workspace.config();
    config.passthrough = true;
    let report = pipeline::run(&config, &RepeatCodec).unwrap();

    assert!(!report.relocated);
    assert_eq!(std::fs::read(workspace.output_path()).unwrap(), original);
}

#[test]
fn encrypted_archive_stays_encrypted() {
    let workspace = Workspace::new();
    let original = workspace.write_input(&packed_directory(sample_entries(), true));
    let first_word = u32::from_le_bytes(original[..4].try_into().unwrap());
    assert!(first_word > m3a_crypto::ENCRYPTION_THRESHOLD);

    pipeline::run(&workspace.config(), &RepeatCodec).unwrap();

    let patched = workspace.load_output(EntryLayout::Indexed);
    assert!(patched.encrypted);
    assert_eq!(patched.word_count, packed_directory(sample_entries(), true).word_count);
    assert_eq!(patched.entries[1].sub_entries[0].metadata, vec![40, 80, 30]);

    let mut passthrough = workspace.config();
    passthrough.passthrough = true;
    pipeline::run(&passthrough, &RepeatCodec).unwrap();
    assert_eq!(std::fs::read(workspace.output_path()).unwrap(), original);
}

#[test]
fn named_entries_drive_replacement_names() {
    let workspace = Workspace::new();

    let mut entry = Entry::new(Some(EntryName::new("hall")), 42);
    entry.sub_entries = vec![image(ResourceType::CubeFace, 6, b"c", vec![])];
    workspace.write_input(&packed_directory(vec![entry], false));
    workspace.add_replacement("hall-42-top-edit.jpeg", b"TOP!");

    let mut config = workspace.config();
    config.names = true;
    let report = pipeline::run(&config, &RepeatCodec).unwrap();
    assert_eq!(report.replaced, 1);

    let patched = workspace.load_output(EntryLayout::Named);
    assert_eq!(
        patched.entries[0].sub_entries[0].payload.as_deref(),
        Some(&b"TOP!"[..])
    );
}

#[test]
fn invalid_image_is_isolated() {
    let workspace = Workspace::new();
    let codec = JpegCodec::default();

    let valid = codec
        .encode(&Pixels {
            width: 4,
            height: 3,
            rgb: vec![0x80; 4 * 3 * 3],
        })
        .unwrap();

    let mut entry = Entry::new(None, 1);
    entry.sub_entries = vec![
        image(ResourceType::Frame, 0, b"not a jpeg at all", vec![]),
        image(ResourceType::CubeFace, 1, &valid, vec![]),
    ];
    workspace.write_input(&packed_directory(vec![entry], false));

    let report = pipeline::run(&workspace.config(), &codec).unwrap();
    assert_eq!(report.failed, 1);
    assert_eq!(report.upscaled, 1);

    let patched = workspace.load_output(EntryLayout::Indexed);
    let subs = &patched.entries[0].sub_entries;
    assert_eq!(subs[0].payload.as_deref(), Some(&b"not a jpeg at all"[..]));

    let upscaled = codec.decode(subs[1].payload.as_deref().unwrap()).unwrap();
    assert_eq!((upscaled.width, upscaled.height), (16, 12));

    let file_len = std::fs::read(workspace.output_path()).unwrap().len();
    assert_contiguous(&patched, file_len);
}

#[test]
fn missing_archive_is_file_access_error() {
    let workspace = Workspace::new();

    let err = pipeline::run(&workspace.config(), &RepeatCodec).unwrap_err();
    assert!(matches!(err, PatchError::Load { .. }));
    assert!(err.is_file_access());
    assert!(!workspace.output_path().exists());
}

#[test]
fn truncated_archive_writes_nothing() {
    let workspace = Workspace::new();
    let bytes = workspace.write_input(&packed_directory(sample_entries(), false));

    let path = workspace.input.join(ARCHIVE);
    std::fs::write(&path, &bytes[..bytes.len() - 3]).unwrap();

    let err = pipeline::run(&workspace.config(), &RepeatCodec).unwrap_err();
    assert!(matches!(err, PatchError::Load { .. }));
    assert!(!err.is_file_access());
    assert!(!Path::new(&workspace.output_path()).exists());
}
