//! Project file format and the sinks that read and write it.
//!
//! The part store persists through the `ProjectSink` seam; this module holds
//! the two implementations that back it: [`FileProjectStore`], which keeps a
//! project in a single JSON file on disk, and [`MemoryProjectStore`], which
//! keeps the record in memory for tests and scratch sessions. The record
//! itself is [`ProjectFile`], format-versioned so a build refuses files it
//! cannot read instead of mangling them.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use cutkit_core::config::ProjectSettings;
use cutkit_core::error::PersistenceError;
use cutkit_parts::{Part, ProjectSink};

/// Format version written by this build; loads reject anything else.
pub const FILE_FORMAT_VERSION: &str = "1.0";

/// Complete persisted project record
///
/// Carries every part, tombstones included, so lineage queries survive a
/// reload. `last_modified` is epoch milliseconds, stamped at save time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectFile {
    pub format_version: String,
    pub project_id: String,
    pub last_modified: i64,
    pub parts: Vec<Part>,
}

impl ProjectFile {
    /// Build a record from the store's current parts
    ///
    /// Parts are ordered by creation time with id as tiebreak, so record
    /// order never depends on hash-map iteration.
    pub fn from_parts(project_id: impl Into<String>, parts: &[&Part]) -> Self {
        let mut records: Vec<Part> = parts.iter().map(|p| (*p).clone()).collect();
        records.sort_by_key(|p| (p.created(), p.id()));
        Self {
            format_version: FILE_FORMAT_VERSION.to_string(),
            project_id: project_id.into(),
            last_modified: Utc::now().timestamp_millis(),
            parts: records,
        }
    }

    fn check_version(&self) -> Result<(), PersistenceError> {
        if self.format_version != FILE_FORMAT_VERSION {
            return Err(PersistenceError::FormatVersion {
                found: self.format_version.clone(),
                supported: FILE_FORMAT_VERSION.to_string(),
            });
        }
        Ok(())
    }
}

fn fresh_project_id() -> String {
    format!("proj_{}", Uuid::new_v4())
}

/// File-backed project sink
///
/// Saves write the whole record atomically: the JSON lands in a sibling
/// temp file first and is renamed over the target, so a crash mid-write
/// leaves the previous save intact. A fresh project id is minted at
/// construction and replaced by the file's own id on load, keeping
/// load-save cycles under one identity.
#[derive(Debug)]
pub struct FileProjectStore {
    path: PathBuf,
    project_id: String,
    pretty: bool,
}

impl FileProjectStore {
    /// Sink writing pretty-printed JSON to `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_pretty(path, true)
    }

    /// Sink with an explicit JSON layout choice
    pub fn with_pretty(path: impl Into<PathBuf>, pretty: bool) -> Self {
        Self {
            path: path.into(),
            project_id: fresh_project_id(),
            pretty,
        }
    }

    /// Sink for `file_name` under the configured projects directory
    pub fn from_settings(settings: &ProjectSettings, file_name: &str) -> Self {
        Self::with_pretty(settings.projects_dir.join(file_name), settings.pretty_json)
    }

    /// Target file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Identity written into saved records
    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    fn write_atomic(&self, json: &str) -> Result<(), PersistenceError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let mut tmp_name = self.path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp = PathBuf::from(tmp_name);
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl ProjectSink for FileProjectStore {
    fn save(&mut self, parts: &[&Part]) -> Result<(), PersistenceError> {
        let record = ProjectFile::from_parts(self.project_id.clone(), parts);
        let json = if self.pretty {
            serde_json::to_string_pretty(&record)?
        } else {
            serde_json::to_string(&record)?
        };
        self.write_atomic(&json)?;
        debug!(path = %self.path.display(), parts = record.parts.len(), "project file written");
        Ok(())
    }

    fn load(&mut self) -> Result<Vec<Part>, PersistenceError> {
        let content = fs::read_to_string(&self.path)?;
        let record: ProjectFile = serde_json::from_str(&content)?;
        record.check_version()?;
        self.project_id = record.project_id;
        debug!(path = %self.path.display(), parts = record.parts.len(), "project file read");
        Ok(record.parts)
    }
}

/// In-memory project sink
///
/// Holds the last saved record, and can be marked unavailable so every save
/// and load fails. Store rollback paths are tested against exactly that
/// failure.
#[derive(Debug, Default)]
pub struct MemoryProjectStore {
    record: Option<ProjectFile>,
    saves: usize,
    unavailable: bool,
}

impl MemoryProjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// While unavailable, every save and load fails
    pub fn set_unavailable(&mut self, unavailable: bool) {
        self.unavailable = unavailable;
    }

    /// Number of successful saves so far
    pub fn save_count(&self) -> usize {
        self.saves
    }

    /// The record written by the most recent save
    pub fn record(&self) -> Option<&ProjectFile> {
        self.record.as_ref()
    }

    fn check_available(&self) -> Result<(), PersistenceError> {
        if self.unavailable {
            return Err(PersistenceError::Unavailable {
                reason: "memory store marked unavailable".to_string(),
            });
        }
        Ok(())
    }
}

impl ProjectSink for MemoryProjectStore {
    fn save(&mut self, parts: &[&Part]) -> Result<(), PersistenceError> {
        self.check_available()?;
        let project_id = match &self.record {
            Some(record) => record.project_id.clone(),
            None => fresh_project_id(),
        };
        self.record = Some(ProjectFile::from_parts(project_id, parts));
        self.saves += 1;
        Ok(())
    }

    fn load(&mut self) -> Result<Vec<Part>, PersistenceError> {
        self.check_available()?;
        match &self.record {
            Some(record) => Ok(record.parts.clone()),
            None => Ok(Vec::new()),
        }
    }
}
