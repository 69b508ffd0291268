//! In-memory ZIP archive builder.
//!
//! Accumulates named byte blobs into a ZIP stream held entirely in memory.
//! The builder is append-only: entries go in one at a time and the archive
//! is finalized exactly once with [`ZipBuilder::finish`].
//!
//! Entry names are not deduplicated. The ZIP container stores duplicate
//! names as separate entries and extractors resolve them last-write-wins,
//! so two uploads whose stripped base names collide produce a single file
//! on extraction.

use std::io::{Cursor, Write};

use bytes::Bytes;
use zip::write::{SimpleFileOptions, ZipWriter};

use crate::error::ArchiveError;

/// Append-only in-memory ZIP accumulator.
///
/// # Example
///
/// ```
/// use batchpress::archive::ZipBuilder;
///
/// let mut builder = ZipBuilder::new();
/// builder.add_entry("a.webp", b"data").unwrap();
/// let bytes = builder.finish().unwrap();
/// assert!(bytes.starts_with(b"PK"));
/// ```
pub struct ZipBuilder {
    writer: ZipWriter<Cursor<Vec<u8>>>,
    entries: usize,
}

impl ZipBuilder {
    /// Create an empty archive builder.
    pub fn new() -> Self {
        Self {
            writer: ZipWriter::new(Cursor::new(Vec::new())),
            entries: 0,
        }
    }

    /// Append one named entry.
    ///
    /// Entries are stored in insertion order with the archive's default
    /// compression. Duplicate names are written as-is.
    pub fn add_entry(&mut self, name: &str, data: &[u8]) -> Result<(), ArchiveError> {
        self.writer.start_file(name, SimpleFileOptions::default())?;
        self.writer.write_all(data)?;
        self.entries += 1;
        Ok(())
    }

    /// Number of entries written so far.
    pub fn entry_count(&self) -> usize {
        self.entries
    }

    /// Close the archive and return the full byte stream.
    pub fn finish(self) -> Result<Bytes, ArchiveError> {
        let cursor = self.writer.finish()?;
        Ok(Bytes::from(cursor.into_inner()))
    }
}

impl Default for ZipBuilder {
    fn default() -> Self {
        Self::new()
    }
}
