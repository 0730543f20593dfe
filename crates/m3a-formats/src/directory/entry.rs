//! Directory entries and their sub-entry records
//!
//! Entry layout:
//! ```text
//! [u8; 4]  name            (named archives only)
//! u24 LE   index           (u16 low bits, then u8 high bits)
//! u8       sub_entry_count
//! [SubEntry; sub_entry_count]
//! ```
//!
//! Sub-entry layout:
//! ```text
//! u32 LE   offset
//! u32 LE   size
//! u16 LE   metadata_count
//! u8       face
//! u8       resource_type
//! [u32 LE; metadata_count]
//! ```

use super::EntryLayout;
use super::resource::ResourceType;
use crate::cursor::{ByteCursor, U24_MAX};
use crate::error::{FormatError, Result};
use binrw::{BinRead, BinWrite};
use std::fmt;
use std::io::Cursor;

/// Fixed part of a sub-entry record
#[derive(Debug, Clone, Copy, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little)]
struct SubEntryHeader {
    offset: u32,
    size: u32,
    metadata_count: u16,
    face: u8,
    resource_type: u8,
}

impl SubEntryHeader {
    const SIZE: usize = 12;
}

/// Four-byte entry name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryName([u8; 4]);

impl EntryName {
    /// Build from text, truncating to four bytes and zero-padding
    pub fn new(name: &str) -> Self {
        let mut bytes = [0u8; 4];
        let count = name.len().min(4);
        bytes[..count].copy_from_slice(&name.as_bytes()[..count]);
        Self(bytes)
    }

    /// Create from raw bytes
    pub const fn from_bytes(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }

    /// Raw bytes as stored
    pub const fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl fmt::Display for EntryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let end = self.0.iter().position(|&b| b == 0).unwrap_or(4);
        write!(f, "{}", String::from_utf8_lossy(&self.0[..end]))
    }
}

/// One resource record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubEntry {
    /// Byte offset of the payload from the start of the archive; an
    /// auxiliary value for pure-metadata records
    pub offset: u32,
    /// Payload length in bytes; an auxiliary value for pure-metadata records
    pub size: u32,
    /// Payload kind
    pub resource_type: ResourceType,
    /// Cube face (0-6)
    pub face: u8,
    /// Type-dependent metadata words
    pub metadata: Vec<u32>,
    /// Payload bytes; `None` until loaded from the archive, and always
    /// `None` for pure-metadata records
    pub payload: Option<Vec<u8>>,
}

impl SubEntry {
    /// Metadata-only record
    pub fn metadata_only(resource_type: ResourceType, aux: (u32, u32), metadata: Vec<u32>) -> Self {
        Self {
            offset: aux.0,
            size: aux.1,
            resource_type,
            face: 0,
            metadata,
            payload: None,
        }
    }

    /// Payload-bearing record
    pub fn with_payload(
        resource_type: ResourceType,
        face: u8,
        offset: u32,
        payload: Vec<u8>,
        metadata: Vec<u32>,
    ) -> Result<Self> {
        let mut sub_entry = Self {
            offset,
            size: 0,
            resource_type,
            face,
            metadata,
            payload: None,
        };
        sub_entry.set_payload(payload)?;
        Ok(sub_entry)
    }

    /// Whether this record owns payload bytes in the data region
    ///
    /// Zero-size payloads own nothing and keep their original offset.
    pub fn carries_payload(&self) -> bool {
        !self.resource_type.is_pure_metadata() && self.size != 0
    }

    /// Replace the payload, keeping `size` in step
    pub fn set_payload(&mut self, payload: Vec<u8>) -> Result<()> {
        self.size = u32::try_from(payload.len()).map_err(|_| FormatError::FieldOverflow {
            field: "payload size",
            value: payload.len() as u64,
        })?;
        self.payload = Some(payload);
        Ok(())
    }

    /// Encoded length in the directory header
    pub fn encoded_len(&self) -> usize {
        SubEntryHeader::SIZE + self.metadata.len() * 4
    }

    pub(crate) fn decode(cursor: &mut ByteCursor) -> Result<Self> {
        let header = SubEntryHeader::read(&mut Cursor::new(cursor.read_bytes(SubEntryHeader::SIZE)?))?;
        let resource_type = ResourceType::from_tag(header.resource_type);

        let metadata = (0..header.metadata_count)
            .map(|_| cursor.read::<u32>())
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            offset: header.offset,
            size: header.size,
            resource_type,
            face: header.face,
            metadata,
            payload: None,
        })
    }

    pub(crate) fn encode(&self, cursor: &mut ByteCursor, index: u32) -> Result<()> {
        if let Some(payload) = &self.payload
            && payload.len() != self.size as usize
        {
            return Err(FormatError::PayloadSizeMismatch {
                index,
                declared: self.size,
                actual: payload.len(),
            });
        }

        let metadata_count =
            u16::try_from(self.metadata.len()).map_err(|_| FormatError::FieldOverflow {
                field: "metadata count",
                value: self.metadata.len() as u64,
            })?;

        let header = SubEntryHeader {
            offset: self.offset,
            size: self.size,
            metadata_count,
            face: self.face,
            resource_type: self.resource_type.tag(),
        };

        let mut record = Cursor::new(Vec::with_capacity(SubEntryHeader::SIZE));
        header.write(&mut record)?;
        cursor.write_bytes(record.get_ref())?;

        for &word in &self.metadata {
            cursor.write(word)?;
        }
        Ok(())
    }
}

/// Group of related resources, typically one in-world node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Name, present only in named archives
    pub name: Option<EntryName>,
    /// 24-bit index, unique within the archive
    pub index: u32,
    /// Resource records in archive order
    pub sub_entries: Vec<SubEntry>,
}

impl Entry {
    /// Create an entry without sub-entries
    pub fn new(name: Option<EntryName>, index: u32) -> Self {
        Self {
            name,
            index,
            sub_entries: Vec::new(),
        }
    }

    /// Encoded length in the directory header
    pub fn encoded_len(&self) -> usize {
        let name_len = if self.name.is_some() { 4 } else { 0 };
        name_len + 4 + self.sub_entries.iter().map(SubEntry::encoded_len).sum::<usize>()
    }

    pub(crate) fn decode(cursor: &mut ByteCursor, layout: EntryLayout) -> Result<Self> {
        let name = match layout {
            EntryLayout::Named => Some(EntryName::from_bytes(cursor.read_string::<4>()?)),
            EntryLayout::Indexed => None,
        };

        let index = cursor.read_u24()?;
        let count = cursor.read::<u8>()?;

        let sub_entries = (0..count)
            .map(|_| SubEntry::decode(cursor))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            name,
            index,
            sub_entries,
        })
    }

    pub(crate) fn encode(&self, cursor: &mut ByteCursor) -> Result<()> {
        if self.index > U24_MAX {
            return Err(FormatError::FieldOverflow {
                field: "index",
                value: u64::from(self.index),
            });
        }
        let count = u8::try_from(self.sub_entries.len()).map_err(|_| FormatError::FieldOverflow {
            field: "sub-entry count",
            value: self.sub_entries.len() as u64,
        })?;

        if let Some(name) = &self.name {
            cursor.write_string(name.as_bytes(), 4)?;
        }
        cursor.write_u24(self.index)?;
        cursor.write(count)?;

        for sub_entry in &self.sub_entries {
            sub_entry.encode(cursor, self.index)?;
        }
        Ok(())
    }
}
