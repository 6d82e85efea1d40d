use std::io::{Cursor, Write};

use zip::CompressionMethod;
use zip::write::{FileOptions, ZipWriter};

use crate::disk::{DiskError, DiskResult};

pub const ARCHIVE_FILE_NAME: &str = "selected_files.zip";

/// Last `/`-separated segment of a disk path, e.g. `/docs/a.txt` -> `a.txt`.
pub fn base_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// In-memory deflated zip archive.
///
/// Entries are written under the name given to [`ArchiveBuilder::add`] with
/// no deduplication: two files sharing a base name collide.
pub struct ArchiveBuilder {
    zip: ZipWriter<Cursor<Vec<u8>>>,
    options: FileOptions,
    entries: usize,
}

impl ArchiveBuilder {
    pub fn new() -> Self {
        let options = FileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .unix_permissions(0o644);

        Self {
            zip: ZipWriter::new(Cursor::new(Vec::new())),
            options,
            entries: 0,
        }
    }

    pub fn add(&mut self, name: &str, data: &[u8]) -> DiskResult<()> {
        self.zip
            .start_file(name, self.options)
            .map_err(|e| DiskError::Archive(format!("Failed to add {}: {}", name, e)))?;
        self.zip
            .write_all(data)
            .map_err(|e| DiskError::Archive(format!("Failed to write {}: {}", name, e)))?;
        self.entries += 1;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries == 0
    }

    pub fn finish(mut self) -> DiskResult<Vec<u8>> {
        let cursor = self
            .zip
            .finish()
            .map_err(|e| DiskError::Archive(format!("Failed to finalize archive: {}", e)))?;
        Ok(cursor.into_inner())
    }
}

impl Default for ArchiveBuilder {
    fn default() -> Self {
        Self::new()
    }
}
