//! Whole-collection persistence for records.
//!
//! Each collection lives in one JSON array file. Loads are forgiving: a
//! missing file is an empty collection and bad records are skipped with a
//! warning. Saves replace the whole file atomically.

use crate::error::{Error, Result};
use crate::types::Record;
use fs2::FileExt;
use serde_json::Value;
use std::cell::RefCell;
use std::collections::HashSet;
use std::fs::File;
use std::io::{Read, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// A record dropped while loading a collection
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkippedRecord {
    /// Position of the record in the stored array
    pub index: usize,
    pub reason: String,
}

/// Records loaded from a collection plus what had to be skipped
#[derive(Clone, Debug)]
pub struct LoadReport<T> {
    pub records: Vec<T>,
    pub skipped: Vec<SkippedRecord>,
}

impl<T> Default for LoadReport<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            skipped: Vec::new(),
        }
    }
}

/// Load/save access to one record collection
pub trait Repository<T: Record> {
    fn load_report(&self) -> Result<LoadReport<T>>;

    fn save_all(&self, records: &[T]) -> Result<()>;

    fn load_all(&self) -> Result<Vec<T>> {
        Ok(self.load_report()?.records)
    }
}

/// Repository backed by a pretty-printed JSON array file
#[derive(Debug)]
pub struct JsonFileRepository<T> {
    path: PathBuf,
    _record: PhantomData<fn() -> T>,
}

impl<T: Record> JsonFileRepository<T> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _record: PhantomData,
        }
    }

    fn read_contents(&self) -> std::io::Result<String> {
        let file = File::open(&self.path)?;
        file.lock_shared()?;

        let mut contents = String::new();
        let read = std::io::BufReader::new(&file).read_to_string(&mut contents);
        let _ = file.unlock();
        read.map(|_| contents)
    }
}

impl<T: Record> Repository<T> for JsonFileRepository<T> {
    fn load_report(&self) -> Result<LoadReport<T>> {
        let collection = T::KIND.collection_name();

        if !self.path.exists() {
            tracing::debug!("No {} file at {:?}, starting empty", collection, self.path);
            return Ok(LoadReport::default());
        }

        let contents = match self.read_contents() {
            Ok(contents) => contents,
            Err(e) => {
                tracing::warn!(
                    "Unable to read {} from {:?}: {}. Using an empty collection.",
                    collection,
                    self.path,
                    e
                );
                return Ok(LoadReport::default());
            }
        };

        if contents.trim().is_empty() {
            return Ok(LoadReport::default());
        }

        let entries = match serde_json::from_str::<Value>(&contents) {
            Ok(Value::Array(entries)) => entries,
            Ok(_) => {
                tracing::warn!(
                    "Invalid {} file {:?}: expected a JSON array. Using an empty collection.",
                    collection,
                    self.path
                );
                return Ok(LoadReport::default());
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to parse {} file {:?}: {}. Using an empty collection.",
                    collection,
                    self.path,
                    e
                );
                return Ok(LoadReport::default());
            }
        };

        let report = collect_records::<T>(entries);
        for skipped in &report.skipped {
            tracing::warn!(
                "Skipping {} record #{} in {:?}: {}",
                collection,
                skipped.index,
                self.path,
                skipped.reason
            );
        }

        tracing::debug!(
            "Loaded {} {} from {:?}",
            report.records.len(),
            collection,
            self.path
        );
        Ok(report)
    }

    fn save_all(&self, records: &[T]) -> Result<()> {
        let collection = T::KIND.collection_name();
        let contents = serde_json::to_string_pretty(records)?;

        write_atomic(&self.path, contents.as_bytes())
            .map_err(|e| Error::storage(format!("write {} to", collection), &self.path, e))?;

        tracing::debug!("Saved {} {} to {:?}", records.len(), collection, self.path);
        Ok(())
    }
}

/// Deserialize and validate each array entry, skipping the ones that fail
fn collect_records<T: Record>(entries: Vec<Value>) -> LoadReport<T> {
    let mut report = LoadReport::default();
    let mut seen = HashSet::new();

    for (index, entry) in entries.into_iter().enumerate() {
        let record = match serde_json::from_value::<T>(entry) {
            Ok(record) => record,
            Err(e) => {
                report.skipped.push(SkippedRecord {
                    index,
                    reason: e.to_string(),
                });
                continue;
            }
        };

        if let Err(e) = record.validate() {
            report.skipped.push(SkippedRecord {
                index,
                reason: e.to_string(),
            });
            continue;
        }

        if !seen.insert(record.id().to_string()) {
            report.skipped.push(SkippedRecord {
                index,
                reason: format!("duplicate ID '{}'", record.id()),
            });
            continue;
        }

        report.records.push(record);
    }

    report
}

/// Replace `path` with `contents` via a synced temp file and rename
///
/// The parent directory is created when missing.
pub(crate) fn write_atomic(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    let temp = NamedTempFile::new_in(parent)?;
    temp.as_file().lock_exclusive()?;

    {
        let mut writer = std::io::BufWriter::new(temp.as_file());
        writer.write_all(contents)?;
        writer.flush()?;
    }

    temp.as_file().sync_all()?;
    temp.as_file().unlock()?;

    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// In-memory repository, for callers that do not want disk access
#[derive(Debug)]
pub struct MemoryRepository<T> {
    records: RefCell<Vec<T>>,
}

impl<T> Default for MemoryRepository<T> {
    fn default() -> Self {
        Self {
            records: RefCell::new(Vec::new()),
        }
    }
}

impl<T: Record> MemoryRepository<T> {
    pub fn new(records: Vec<T>) -> Self {
        Self {
            records: RefCell::new(records),
        }
    }
}

impl<T: Record> Repository<T> for MemoryRepository<T> {
    fn load_report(&self) -> Result<LoadReport<T>> {
        Ok(LoadReport {
            records: self.records.borrow().clone(),
            skipped: Vec::new(),
        })
    }

    fn save_all(&self, records: &[T]) -> Result<()> {
        *self.records.borrow_mut() = records.to_vec();
        Ok(())
    }
}
