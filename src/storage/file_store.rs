//! File Store
//!
//! Loads and persists a full collection to a single JSON file.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{RepoError, Result};
use crate::record::Record;

/// Result of loading a store
#[derive(Debug)]
pub enum LoadOutcome {
    /// No store file exists yet (first use)
    Empty,

    /// The store was read and parsed
    Loaded(Vec<Record>),

    /// The store exists but could not be read or parsed
    Corrupt(RepoError),
}

impl LoadOutcome {
    /// Collapse into a collection, treating `Empty` as no records
    pub fn into_result(self) -> Result<Vec<Record>> {
        match self {
            LoadOutcome::Empty => Ok(Vec::new()),
            LoadOutcome::Loaded(records) => Ok(records),
            LoadOutcome::Corrupt(e) => Err(e),
        }
    }
}

/// Backing store for one record type
#[derive(Debug, Clone)]
pub struct FileStore {
    /// Location of the JSON file
    path: PathBuf,

    /// Write indented JSON
    pretty: bool,
}

impl FileStore {
    /// Create a store handle (does not touch the filesystem)
    pub fn new(path: impl Into<PathBuf>, pretty: bool) -> Self {
        Self {
            path: path.into(),
            pretty,
        }
    }

    /// Read the whole collection
    ///
    /// A missing file is `Empty`. Any other read or parse failure is
    /// `Corrupt`; the caller decides what to do with it.
    pub fn load(&self) -> LoadOutcome {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return LoadOutcome::Empty,
            Err(e) => {
                return LoadOutcome::Corrupt(RepoError::Corrupt {
                    path: self.path.clone(),
                    reason: e.to_string(),
                })
            }
        };

        match serde_json::from_reader::<_, Vec<Record>>(BufReader::new(file)) {
            Ok(records) => LoadOutcome::Loaded(records),
            Err(e) => LoadOutcome::Corrupt(RepoError::Corrupt {
                path: self.path.clone(),
                reason: e.to_string(),
            }),
        }
    }

    /// Overwrite the store with the given collection
    ///
    /// Creates the parent directory on first use. Not atomic at the
    /// filesystem level: a crash mid-write can leave a truncated file.
    pub fn persist(&self, records: &[Record]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut writer = BufWriter::new(File::create(&self.path)?);
        if self.pretty {
            serde_json::to_writer_pretty(&mut writer, records)?;
        } else {
            serde_json::to_writer(&mut writer, records)?;
        }
        writer.flush()?;

        tracing::debug!(
            "Persisted {} records to {}",
            records.len(),
            self.path.display()
        );
        Ok(())
    }

    /// Whether the store file exists
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Get the store file path
    pub fn path(&self) -> &Path {
        &self.path
    }
}
