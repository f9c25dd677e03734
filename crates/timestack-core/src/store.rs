//! Persistence for user-defined intervals.
//!
//! [`IntervalStore`] is the seam between the core and whatever keeps records
//! between sessions. Two implementations ship with the crate: [`MemoryStore`]
//! for tests and ephemeral use, and [`JsonFileStore`], which keeps all
//! records in one JSON array file.
//!
//! # Invariants
//!
//! - `fetch_all` returns the newest `created_at` first.
//! - Saving a record whose id already exists replaces it.
//! - A failed mutation leaves previously stored state unchanged.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Result, TimestackError};
use crate::interval::IntervalRecord;

pub trait IntervalStore {
    fn save(&mut self, record: IntervalRecord) -> Result<()>;

    fn fetch_all(&self) -> Result<Vec<IntervalRecord>>;

    /// # Errors
    ///
    /// Returns [`TimestackError::NotFound`] if no record has this id.
    fn delete(&mut self, record: &IntervalRecord) -> Result<()>;
}

fn upsert(records: &mut Vec<IntervalRecord>, record: IntervalRecord) {
    match records.iter_mut().find(|existing| existing.id == record.id) {
        Some(existing) => *existing = record,
        None => records.push(record),
    }
}

fn remove(records: &mut Vec<IntervalRecord>, record: &IntervalRecord) -> Result<()> {
    let index = records
        .iter()
        .position(|existing| existing.id == record.id)
        .ok_or_else(|| TimestackError::NotFound(record.id.to_string()))?;
    records.remove(index);
    Ok(())
}

fn newest_first(mut records: Vec<IntervalRecord>) -> Vec<IntervalRecord> {
    records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    records
}

// ── MemoryStore ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Vec<IntervalRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl IntervalStore for MemoryStore {
    fn save(&mut self, record: IntervalRecord) -> Result<()> {
        debug!(id = %record.id, "saving interval in memory");
        upsert(&mut self.records, record);
        Ok(())
    }

    fn fetch_all(&self) -> Result<Vec<IntervalRecord>> {
        Ok(newest_first(self.records.clone()))
    }

    fn delete(&mut self, record: &IntervalRecord) -> Result<()> {
        debug!(id = %record.id, "deleting interval from memory");
        remove(&mut self.records, record)
    }
}

// ── JsonFileStore ───────────────────────────────────────────────────────────

/// Stores every record in a single JSON array file.
///
/// A missing or empty file reads as no records. Writes go to a sibling
/// `.tmp` file which is then renamed over the target.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Vec<IntervalRecord>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };
        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }
        let records: Vec<IntervalRecord> = serde_json::from_str(&contents)?;
        debug!(path = %self.path.display(), count = records.len(), "loaded intervals");
        Ok(records)
    }

    fn persist(&self, records: &[IntervalRecord]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(records)?;
        let tmp = self.tmp_path();
        fs::write(&tmp, json).map_err(|err| {
            let _ = fs::remove_file(&tmp);
            TimestackError::Storage(format!("failed to write '{}': {err}", tmp.display()))
        })?;
        fs::rename(&tmp, &self.path).map_err(|err| {
            let _ = fs::remove_file(&tmp);
            TimestackError::Storage(format!(
                "failed to replace '{}': {err}",
                self.path.display()
            ))
        })?;

        debug!(path = %self.path.display(), count = records.len(), "persisted intervals");
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "intervals.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl IntervalStore for JsonFileStore {
    fn save(&mut self, record: IntervalRecord) -> Result<()> {
        let mut records = self.load()?;
        debug!(id = %record.id, path = %self.path.display(), "saving interval");
        upsert(&mut records, record);
        self.persist(&records)
    }

    fn fetch_all(&self) -> Result<Vec<IntervalRecord>> {
        Ok(newest_first(self.load()?))
    }

    fn delete(&mut self, record: &IntervalRecord) -> Result<()> {
        let mut records = self.load()?;
        debug!(id = %record.id, path = %self.path.display(), "deleting interval");
        remove(&mut records, record)?;
        self.persist(&records)
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
