//! Ledger persistence.
//!
//! The ledger file is a single JSON array of records. Files written by
//! older versions hold display lines instead of objects; both forms are
//! read, only objects are written.

use crate::record::{parse_formatted, UsageRecord};
use crate::{Error, Result};
use fs2::FileExt;
use serde_json::Value;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Backing storage for a ledger
pub trait LedgerStore {
    /// Read every persisted record in order. A missing store is empty.
    fn load(&self) -> Result<Vec<UsageRecord>>;

    /// Replace the persisted records with `records`.
    fn save(&mut self, records: &[UsageRecord]) -> Result<()>;

    /// Remove the backing data. No-op when nothing is stored.
    fn delete(&mut self) -> Result<()>;
}

/// JSON-file ledger store
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Create a store for the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn corrupt(&self, source: Error) -> Error {
        Error::CorruptStore {
            path: self.path.clone(),
            source: Box::new(source),
        }
    }
}

impl LedgerStore for JsonFileStore {
    fn load(&self) -> Result<Vec<UsageRecord>> {
        if !self.path.exists() {
            tracing::debug!("No ledger file at {:?}, starting empty", self.path);
            return Ok(Vec::new());
        }

        let contents = std::fs::read_to_string(&self.path)?;
        let entries: Vec<Value> =
            serde_json::from_str(&contents).map_err(|e| self.corrupt(e.into()))?;

        let mut records = Vec::with_capacity(entries.len());
        let mut legacy = 0usize;
        for (index, entry) in entries.into_iter().enumerate() {
            let decoded = match entry {
                Value::String(line) => {
                    legacy += 1;
                    parse_formatted(&line)
                }
                other => serde_json::from_value::<UsageRecord>(other).map_err(|e| e.to_string()),
            };
            let record =
                decoded.map_err(|reason| self.corrupt(Error::MalformedEntry { index, reason }))?;
            records.push(record);
        }

        if legacy > 0 {
            tracing::info!(
                "Read {} legacy entries from {:?}; they will be rewritten on next save",
                legacy,
                self.path
            );
        }
        tracing::debug!("Loaded {} records from {:?}", records.len(), self.path);
        Ok(records)
    }

    /// Atomically writes the ledger by:
    /// 1. Writing to a temp file next to the target
    /// 2. Syncing to disk
    /// 3. Renaming over the original
    fn save(&mut self, records: &[UsageRecord]) -> Result<()> {
        // serde_json writes non-finite floats as null, which would not load back
        if let Some(index) = records.iter().position(|r| !is_finite_record(r)) {
            return Err(Error::MalformedEntry {
                index,
                reason: "record holds a non-finite number".into(),
            });
        }

        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(parent)?;

        let temp = NamedTempFile::new_in(parent)?;
        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            serde_json::to_writer_pretty(&mut writer, records)?;
            writer.write_all(b"\n")?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;

        temp.persist(&self.path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved {} records to {:?}", records.len(), self.path);
        Ok(())
    }

    fn delete(&mut self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::debug!("Deleted ledger file {:?}", self.path);
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

fn is_finite_record(record: &UsageRecord) -> bool {
    record.current_microamps.is_finite()
        && record.duration_seconds.is_finite()
        && record.consumption.0.is_finite()
}
