//! Durable storage backed by plain JSON files under the data directory.
//!
//! - **[`FileHistory`]**: `history.json`, the recent-selection list.
//! - **[`FileStash`]**: `stash/{id}.json`, one file per handed-off remote
//!   payload, deleted on first read.
//!
//! Both stores treat a missing file as empty state, so a fresh data
//! directory needs no initialization step.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use culturevault_core::models::PlaceInfo;
use culturevault_core::store::{HistoryStore, StashStore};

const HISTORY_FILE: &str = "history.json";
const STASH_DIR: &str = "stash";

/// On-disk shape of the history file.
#[derive(Debug, Serialize, Deserialize)]
struct HistoryFile {
    entries: Vec<String>,
    saved_at: DateTime<Utc>,
}

/// History store persisted to `<data_dir>/history.json`.
pub struct FileHistory {
    path: PathBuf,
}

impl FileHistory {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(HISTORY_FILE),
        }
    }
}

impl HistoryStore for FileHistory {
    // An unreadable or corrupt history file degrades to an empty list with
    // a warning; the next selection rewrites it.
    fn get(&self) -> Result<Vec<String>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                eprintln!("Warning: could not read {}: {}", self.path.display(), e);
                return Ok(Vec::new());
            }
        };
        match serde_json::from_str::<HistoryFile>(&content) {
            Ok(file) => Ok(file.entries),
            Err(e) => {
                eprintln!("Warning: ignoring corrupt {}: {}", self.path.display(), e);
                Ok(Vec::new())
            }
        }
    }

    fn set(&self, entries: &[String]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let file = HistoryFile {
            entries: entries.to_vec(),
            saved_at: Utc::now(),
        };
        let content = serde_json::to_string_pretty(&file)?;
        std::fs::write(&self.path, content)
            .with_context(|| format!("Failed to write {}", self.path.display()))
    }

    fn clear(&self) -> Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)
                .with_context(|| format!("Failed to remove {}", self.path.display()))?;
        }
        Ok(())
    }
}

/// Stash store persisted as one JSON file per payload under
/// `<data_dir>/stash/`.
pub struct FileStash {
    dir: PathBuf,
}

impl FileStash {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            dir: data_dir.join(STASH_DIR),
        }
    }

    /// Ids come from model output; keep them from escaping the stash dir.
    fn payload_path(&self, id: &str) -> Result<PathBuf> {
        if id.is_empty() || id.contains(['/', '\\']) || id.contains("..") {
            anyhow::bail!("Invalid stash id: '{}'", id);
        }
        Ok(self.dir.join(format!("{}.json", id)))
    }
}

impl StashStore for FileStash {
    fn stash(&self, id: &str, payload: &PlaceInfo) -> Result<()> {
        let path = self.payload_path(id)?;
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create {}", self.dir.display()))?;
        let content = serde_json::to_string_pretty(payload)?;
        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write {}", path.display()))
    }

    fn take(&self, id: &str) -> Result<Option<PlaceInfo>> {
        let path = self.payload_path(id)?;
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let info: PlaceInfo = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        std::fs::remove_file(&path)
            .with_context(|| format!("Failed to remove {}", path.display()))?;
        Ok(Some(info))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use culturevault_core::models::PlaceRecord;

    #[test]
    fn history_roundtrips_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let history = FileHistory::new(dir.path());
        assert!(history.get().unwrap().is_empty());

        history
            .set(&["Kyoto".to_string(), "Delhi".to_string()])
            .unwrap();
        assert_eq!(history.get().unwrap(), vec!["Kyoto", "Delhi"]);
    }

    #[test]
    fn history_clear_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let history = FileHistory::new(dir.path());
        history.set(&["Kyoto".to_string()]).unwrap();
        history.clear().unwrap();
        assert!(!dir.path().join(HISTORY_FILE).exists());
        assert!(history.get().unwrap().is_empty());
    }

    #[test]
    fn clearing_empty_history_is_fine() {
        let dir = tempfile::tempdir().unwrap();
        let history = FileHistory::new(dir.path());
        history.clear().unwrap();
    }

    #[test]
    fn corrupt_history_degrades_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(HISTORY_FILE), "{not json").unwrap();

        let history = FileHistory::new(dir.path());
        assert!(history.get().unwrap().is_empty());

        // A later write recovers the file
        history.set(&["Kyoto".to_string()]).unwrap();
        assert_eq!(history.get().unwrap(), vec!["Kyoto"]);
    }

    #[test]
    fn stash_take_consumes_payload_file() {
        let dir = tempfile::tempdir().unwrap();
        let stash = FileStash::new(dir.path());
        let info = PlaceRecord::new("lisbon", "Lisbon", "Portugal", "Europe", "Europe");

        stash.stash("lisbon", &info).unwrap();
        let taken = stash.take("lisbon").unwrap();
        assert_eq!(taken.unwrap().name, "Lisbon");
        assert!(stash.take("lisbon").unwrap().is_none());
    }

    #[test]
    fn stash_rejects_path_traversal_ids() {
        let dir = tempfile::tempdir().unwrap();
        let stash = FileStash::new(dir.path());
        let info = PlaceRecord::new("x", "X", "Y", "Europe", "Europe");

        assert!(stash.stash("../evil", &info).is_err());
        assert!(stash.stash("a/b", &info).is_err());
        assert!(stash.take("").is_err());
    }
}
