use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use crate::core::SgError;
use crate::dataset::merge::DatasetRow;

/// Append-only CSV writer for the output table.
///
/// The file is truncated on creation. The first non-empty block carries the header;
/// every later block is appended without one.
#[derive(Debug)]
pub struct DatasetWriter {
    path: PathBuf,
    header_written: bool,
    rows_written: usize,
}

impl DatasetWriter {
    /// Create (or truncate) the output file.
    ///
    /// # Errors
    ///
    /// Returns `SgError::Io` if the file cannot be created.
    pub fn create(path: impl AsRef<Path>) -> Result<Self, SgError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        File::create(&path)?;
        Ok(Self {
            path,
            header_written: false,
            rows_written: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Total data rows written so far, headers excluded.
    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    /// Append one block of rows and flush it to disk.
    ///
    /// # Errors
    ///
    /// Returns `SgError::Io` or `SgError::Csv` if the file cannot be opened or written.
    pub fn append_block(&mut self, rows: &[DatasetRow]) -> Result<(), SgError> {
        if rows.is_empty() {
            return Ok(());
        }
        let file = OpenOptions::new().append(true).open(&self.path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(!self.header_written)
            .from_writer(file);
        for row in rows {
            writer.serialize(row)?;
        }
        writer.flush()?;

        self.header_written = true;
        self.rows_written += rows.len();
        Ok(())
    }
}
