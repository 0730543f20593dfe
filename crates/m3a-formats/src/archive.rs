//! Archive read and write phases
//!
//! An archive is the directory header followed by the payload region. Each
//! payload-bearing sub-entry names its bytes by absolute `offset` and `size`;
//! the directory itself never touches them. Reading loads every declared
//! payload into its sub-entry, writing streams them back out at their
//! (possibly relocated) offsets.

use crate::BinaryFormat;
use crate::directory::{Directory, EntryLayout};
use crate::error::{FormatError, Result};
use m3a_crypto::{CipherError, probe_header};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Read the directory and every payload from an archive stream.
pub fn read_archive<R: Read + Seek>(reader: &mut R, layout: EntryLayout) -> Result<Directory> {
    let file_len = reader.seek(SeekFrom::End(0))?;
    reader.seek(SeekFrom::Start(0))?;

    if file_len < 4 {
        return Err(CipherError::Truncated {
            expected: 4,
            actual: file_len as usize,
        }
        .into());
    }

    let mut first = [0u8; 4];
    reader.read_exact(&mut first)?;
    let mode = probe_header(u32::from_le_bytes(first));
    let header_len = mode.byte_len()?;

    if header_len as u64 > file_len {
        return Err(CipherError::Truncated {
            expected: header_len,
            actual: file_len as usize,
        }
        .into());
    }

    let mut raw = vec![0u8; header_len];
    reader.seek(SeekFrom::Start(0))?;
    reader.read_exact(&mut raw)?;

    let mut directory = Directory::parse(&raw, layout)?;
    debug!(
        "Parsed directory: {} entries, {} words, encrypted={}",
        directory.entries.len(),
        directory.word_count,
        directory.encrypted
    );

    load_payloads(reader, &mut directory, file_len)?;
    Ok(directory)
}

/// Fill every payload buffer from the archive's data region
///
/// Buffers are only allocated once their range is known to lie inside the
/// file.
fn load_payloads<R: Read + Seek>(
    reader: &mut R,
    directory: &mut Directory,
    file_len: u64,
) -> Result<()> {
    let start = directory.header_len()? as u64;

    for entry in &mut directory.entries {
        for sub_entry in &mut entry.sub_entries {
            if !sub_entry.carries_payload() {
                continue;
            }
            check_payload_range(entry.index, sub_entry.offset, sub_entry.size, start, file_len)?;

            let mut payload = vec![0u8; sub_entry.size as usize];
            reader.seek(SeekFrom::Start(u64::from(sub_entry.offset)))?;
            reader.read_exact(&mut payload)?;
            sub_entry.payload = Some(payload);
        }
    }
    Ok(())
}

fn check_payload_range(index: u32, offset: u32, size: u32, start: u64, end: u64) -> Result<()> {
    let offset64 = u64::from(offset);
    if offset64 < start || offset64 + u64::from(size) > end {
        return Err(FormatError::PayloadOutOfRange {
            index,
            offset,
            size,
            start,
            end,
        });
    }
    Ok(())
}

/// Write the directory header and every payload to an archive stream.
///
/// The header keeps the cipher mode it was read with.
pub fn write_archive<W: Write + Seek>(directory: &Directory, writer: &mut W) -> Result<()> {
    let header = directory.build()?;
    let start = header.len() as u64;

    writer.seek(SeekFrom::Start(0))?;
    writer.write_all(&header)?;

    for (index, sub_entry) in directory.payloads() {
        check_payload_range(index, sub_entry.offset, sub_entry.size, start, u64::MAX)?;

        let Some(payload) = &sub_entry.payload else {
            return Err(FormatError::PayloadSizeMismatch {
                index,
                declared: sub_entry.size,
                actual: 0,
            });
        };
        writer.seek(SeekFrom::Start(u64::from(sub_entry.offset)))?;
        writer.write_all(payload)?;
    }

    writer.flush()?;
    Ok(())
}

/// Open an archive file, load it completely, and close it again.
pub fn load_archive(path: &Path, layout: EntryLayout) -> Result<Directory> {
    let mut reader = BufReader::new(File::open(path)?);
    let directory = read_archive(&mut reader, layout)?;
    info!(
        "Loaded {} ({} payloads, {} bytes)",
        path.display(),
        directory.payloads().count(),
        directory.payload_bytes()
    );
    Ok(directory)
}

/// Store an archive at `path`.
///
/// The archive is written to a temporary file next to `path` and renamed
/// over it only once every byte is on disk.
pub fn save_archive(directory: &Directory, path: &Path) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let mut temp = NamedTempFile::new_in(parent)?;
    {
        let mut writer = BufWriter::new(temp.as_file_mut());
        write_archive(directory, &mut writer)?;
    }
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| FormatError::Io(e.error))?;

    info!("Wrote {}", path.display());
    Ok(())
}
