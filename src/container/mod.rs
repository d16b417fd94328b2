//! Indexed-record container engine — writer and reader.
//!
//! # Layout
//! A container begins with its UTF-8 header text and a NUL terminator,
//! followed by a `u32` format version and a `u64` index-offset slot.  The
//! slot holds 0 while the file is being written and is patched in place on
//! `commit()`, so a crashed or abandoned write is detectable on open.
//! Record payloads follow, raw and back to back.  The index block sits at
//! the patched offset and runs to end of file:
//!
//! ```text
//! u64 record count
//! per record: u64 payload offset, u64 payload length
//! u8  metadata flag; if 1: u64 metadata length, metadata bytes
//! u32 CRC32 of every index byte above
//! ```
//!
//! # Endianness
//! All binary fields are little-endian.

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use crc32fast::Hasher;
use std::fs::File;
use std::io::{self, BufReader, Cursor, Read, Seek, SeekFrom, Write};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

use crate::header::{read_header, HeaderError};

pub const FORMAT_VERSION: u32 = 1;

#[derive(Error, Debug)]
pub enum ContainerError {
    #[error(transparent)]
    Header(#[from] HeaderError),
    #[error("Container header must not contain a NUL byte")]
    HeaderEmbeddedNul,
    #[error("Unsupported container version: {0}")]
    UnsupportedVersion(u32),
    #[error("Container was never committed")]
    Uncommitted,
    #[error("Container index is truncated")]
    TruncatedIndex,
    #[error("Container index checksum mismatch")]
    IndexChecksum,
    #[error("Record {index} out of range: container holds {count} record(s)")]
    RecordOutOfRange { index: u64, count: u64 },
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

// ── Reader ───────────────────────────────────────────────────────────────────

pub struct ContainerReader<R: Read + Seek> {
    reader: R,
    header: String,
    /// (payload offset, payload length) per record, in index order.
    records: Vec<(u64, u64)>,
    metadata: Option<Vec<u8>>,
}

impl ContainerReader<BufReader<File>> {
    /// Open a committed container file read-only.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ContainerError> {
        Self::from_reader(BufReader::new(File::open(path)?))
    }
}

impl<R: Read + Seek> ContainerReader<R> {
    /// Sniff the header, check the version, then read and verify the index
    /// block.  A zero index-offset slot means the writer never committed.
    pub fn from_reader(mut reader: R) -> Result<Self, ContainerError> {
        let header = read_header(&mut reader)?;
        let version = reader.read_u32::<LittleEndian>()?;
        if version != FORMAT_VERSION {
            return Err(ContainerError::UnsupportedVersion(version));
        }
        let index_offset = reader.read_u64::<LittleEndian>()?;
        if index_offset == 0 {
            return Err(ContainerError::Uncommitted);
        }

        // The index block is the file's tail, so read to EOF and split off
        // the trailing CRC32.
        reader.seek(SeekFrom::Start(index_offset))?;
        let mut raw = Vec::new();
        reader.read_to_end(&mut raw)?;
        if raw.len() < 4 {
            return Err(ContainerError::TruncatedIndex);
        }
        let (body, tail) = raw.split_at(raw.len() - 4);
        let stored = Cursor::new(tail).read_u32::<LittleEndian>()?;
        let mut hasher = Hasher::new();
        hasher.update(body);
        if hasher.finalize() != stored {
            return Err(ContainerError::IndexChecksum);
        }

        let mut cursor = Cursor::new(body);
        let count = cursor.read_u64::<LittleEndian>()?;
        let mut records = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let offset = cursor.read_u64::<LittleEndian>()?;
            let length = cursor.read_u64::<LittleEndian>()?;
            records.push((offset, length));
        }
        let metadata = match cursor.read_u8()? {
            0 => None,
            _ => {
                let length = cursor.read_u64::<LittleEndian>()?;
                let mut bytes = vec![0u8; length as usize];
                cursor.read_exact(&mut bytes)?;
                Some(bytes)
            }
        };

        debug!(
            header = %header,
            records = records.len(),
            metadata = metadata.is_some(),
            "opened container"
        );
        Ok(Self { reader, header, records, metadata })
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn record_count(&self) -> u64 {
        self.records.len() as u64
    }

    pub fn metadata(&self) -> Option<&[u8]> {
        self.metadata.as_deref()
    }

    /// Read the raw bytes of the record at `index`.
    pub fn record(&mut self, index: u64) -> Result<Vec<u8>, ContainerError> {
        let count = self.record_count();
        let &(offset, length) = self
            .records
            .get(index as usize)
            .ok_or(ContainerError::RecordOutOfRange { index, count })?;
        self.reader.seek(SeekFrom::Start(offset))?;
        let mut bytes = vec![0u8; length as usize];
        self.reader.read_exact(&mut bytes)?;
        Ok(bytes)
    }
}

// ── Writer ───────────────────────────────────────────────────────────────────

pub struct ContainerWriter<W: Write + Seek> {
    writer: W,
    /// File position of the index-offset slot, patched on commit.
    offset_slot: u64,
    records: Vec<(u64, u64)>,
    metadata: Option<Vec<u8>>,
}

impl ContainerWriter<File> {
    /// Create a new container file with the given header.  The file stays
    /// uncommitted (and is rejected by [`ContainerReader::open`]) until
    /// `commit()` runs.
    pub fn create<P: AsRef<Path>>(path: P, header: &str) -> Result<Self, ContainerError> {
        Self::from_writer(File::create(path)?, header)
    }
}

impl<W: Write + Seek> ContainerWriter<W> {
    pub fn from_writer(mut writer: W, header: &str) -> Result<Self, ContainerError> {
        if header.bytes().any(|b| b == 0) {
            return Err(ContainerError::HeaderEmbeddedNul);
        }
        writer.write_all(header.as_bytes())?;
        writer.write_u8(0)?;
        writer.write_u32::<LittleEndian>(FORMAT_VERSION)?;
        let offset_slot = writer.stream_position()?;
        writer.write_u64::<LittleEndian>(0)?; // patched on commit
        Ok(Self {
            writer,
            offset_slot,
            records: Vec::new(),
            metadata: None,
        })
    }

    /// Append one record payload.
    pub fn add(&mut self, bytes: &[u8]) -> Result<(), ContainerError> {
        let offset = self.writer.stream_position()?;
        self.writer.write_all(bytes)?;
        self.records.push((offset, bytes.len() as u64));
        Ok(())
    }

    pub fn set_metadata(&mut self, bytes: Vec<u8>) {
        self.metadata = Some(bytes);
    }

    /// Write the index block, then patch the index-offset slot.  Must be
    /// called exactly once; a writer dropped without committing leaves a
    /// file that readers reject as uncommitted.
    pub fn commit(&mut self) -> Result<(), ContainerError> {
        let index_offset = self.writer.stream_position()?;

        let mut body = Vec::new();
        body.write_u64::<LittleEndian>(self.records.len() as u64)?;
        for &(offset, length) in &self.records {
            body.write_u64::<LittleEndian>(offset)?;
            body.write_u64::<LittleEndian>(length)?;
        }
        match &self.metadata {
            Some(metadata) => {
                body.write_u8(1)?;
                body.write_u64::<LittleEndian>(metadata.len() as u64)?;
                body.extend_from_slice(metadata);
            }
            None => body.write_u8(0)?,
        }
        let mut hasher = Hasher::new();
        hasher.update(&body);

        self.writer.write_all(&body)?;
        self.writer.write_u32::<LittleEndian>(hasher.finalize())?;
        self.writer.seek(SeekFrom::Start(self.offset_slot))?;
        self.writer.write_u64::<LittleEndian>(index_offset)?;
        self.writer.flush()?;
        debug!(records = self.records.len(), index_offset, "committed container");
        Ok(())
    }
}
