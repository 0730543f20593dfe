//! Archive directory header
//!
//! The directory is the table at the start of every archive that names each
//! resource and locates its payload in the data region that follows.
//!
//! # Layout
//!
//! ```text
//! u32 LE   word_count      header length in 32-bit words
//! [Entry]  entries         until at most 4 bytes remain
//! [u8]     trailing        0-4 padding bytes up to the word boundary
//! ```
//!
//! On disk the whole header may be obscured by the keystream from
//! [`m3a_crypto`]; [`Directory::parse`] and [`Directory::build`] handle both
//! forms and remember which one was used.
//!
//! # Example
//!
//! ```
//! use m3a_formats::{BinaryFormat, Directory, EntryLayout};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // word_count = 3, one entry (index 7) with no sub-entries, word padding
//! let header = [3, 0, 0, 0, 7, 0, 0, 0, 0, 0, 0, 0];
//! let directory = Directory::parse(&header, EntryLayout::Indexed)?;
//!
//! assert!(!directory.encrypted);
//! assert_eq!(directory.entries.len(), 1);
//! assert_eq!(directory.entries[0].index, 7);
//! assert_eq!(directory.build()?, header);
//! # Ok(())
//! # }
//! ```

mod entry;
mod resource;

pub use entry::{Entry, EntryName, SubEntry};
pub use resource::{LOCALIZED_TAG_OFFSET, ResourceType};

use crate::BinaryFormat;
use crate::cursor::ByteCursor;
use crate::error::{FormatError, Result};
use tracing::debug;

/// Entries are decoded while more than this many header bytes remain
const ENTRY_GUARD: usize = 4;

/// Whether entries carry a four-byte name before their index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntryLayout {
    /// Entries start with their 24-bit index
    #[default]
    Indexed,
    /// Entries start with a four-byte name
    Named,
}

impl EntryLayout {
    /// Layout for a "names present" flag
    pub const fn from_names(names: bool) -> Self {
        if names { Self::Named } else { Self::Indexed }
    }
}

/// Decoded directory header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directory {
    /// Header length in 32-bit words, including the word count itself
    pub word_count: u32,
    /// Whether the header was stored encrypted
    pub encrypted: bool,
    /// Entries in archive order
    pub entries: Vec<Entry>,
    /// Unconsumed bytes between the last entry and the word boundary
    pub trailing: Vec<u8>,
}

impl Directory {
    /// Header length in bytes
    pub fn header_len(&self) -> Result<usize> {
        (self.word_count as usize)
            .checked_mul(4)
            .ok_or(FormatError::FieldOverflow {
                field: "word count",
                value: u64::from(self.word_count),
            })
    }

    /// Bytes the current entries would encode to
    pub fn encoded_len(&self) -> usize {
        4 + self.entries.iter().map(Entry::encoded_len).sum::<usize>() + self.trailing.len()
    }

    /// Decode plaintext header bytes
    pub fn decode(plain: &[u8], encrypted: bool, layout: EntryLayout) -> Result<Self> {
        let mut cursor = ByteCursor::new(plain.to_vec());
        let word_count = cursor.read::<u32>()?;

        let declared = (word_count as usize).checked_mul(4);
        if declared != Some(plain.len()) {
            return Err(FormatError::WordCountMismatch {
                declared: declared.unwrap_or(usize::MAX),
                actual: plain.len(),
            });
        }

        let mut entries = Vec::new();
        while cursor.remaining() > ENTRY_GUARD {
            entries.push(Entry::decode(&mut cursor, layout)?);
        }
        let trailing = cursor.read_bytes(cursor.remaining())?.to_vec();

        Ok(Self {
            word_count,
            encrypted,
            entries,
            trailing,
        })
    }

    /// Encode to plaintext header bytes of exactly `word_count * 4` bytes
    pub fn encode(&self) -> Result<Vec<u8>> {
        let declared = self.header_len()?;
        let encoded = self.encoded_len();
        if encoded != declared {
            return Err(FormatError::EncodedSizeMismatch { encoded, declared });
        }

        let mut cursor = ByteCursor::zeroed(declared);
        cursor.write(self.word_count)?;
        for entry in &self.entries {
            entry.encode(&mut cursor)?;
        }
        cursor.write_bytes(&self.trailing)?;

        Ok(cursor.into_inner())
    }

    /// All sub-entries in archive order, mutably
    pub fn sub_entries_mut(&mut self) -> impl Iterator<Item = &mut SubEntry> {
        self.entries.iter_mut().flat_map(|e| e.sub_entries.iter_mut())
    }

    /// Sub-entries that own payload bytes, paired with their entry index
    pub fn payloads(&self) -> impl Iterator<Item = (u32, &SubEntry)> {
        self.entries.iter().flat_map(|e| {
            e.sub_entries
                .iter()
                .filter(|s| s.carries_payload())
                .map(move |s| (e.index, s))
        })
    }

    /// Total payload bytes
    pub fn payload_bytes(&self) -> u64 {
        self.payloads().map(|(_, s)| u64::from(s.size)).sum()
    }
}

impl BinaryFormat for Directory {
    type Options = EntryLayout;

    fn parse(data: &[u8], layout: EntryLayout) -> Result<Self> {
        let header = m3a_crypto::decrypt(data)?;
        Self::decode(&header.bytes, header.encrypted, layout)
    }

    fn build(&self) -> Result<Vec<u8>> {
        let plain = self.encode()?;
        Ok(m3a_crypto::encrypt(&plain, self.encrypted)?)
    }
}

/// Log the directory contents at debug level
pub fn log_directory(directory: &Directory) {
    debug!(
        "Directory: {} words, {}",
        directory.word_count,
        if directory.encrypted {
            "encrypted"
        } else {
            "plaintext"
        }
    );

    for entry in &directory.entries {
        let name = entry.name.map(|n| n.to_string()).unwrap_or_default();
        debug!("* Entry \"{}\", index {}", name, entry.index);

        for sub_entry in &entry.sub_entries {
            debug!(
                "    {} face {}, offset {}, size {}, metadata ({}) {:?}",
                sub_entry.resource_type,
                sub_entry.face,
                sub_entry.offset,
                sub_entry.size,
                sub_entry.metadata.len(),
                &sub_entry.metadata[..sub_entry.metadata.len().min(4)]
            );
        }
    }
}
