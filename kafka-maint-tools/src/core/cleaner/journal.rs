// Copyright 2024 The Kafka Maint Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Persisted state of one cleaner run

use std::fs;
use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use kafka_maint_error::MaintError;
use kafka_maint_error::MaintResult;
use kafka_maint_error::ToolsError;
use serde::Deserialize;
use serde::Serialize;
use tracing::debug;
use tracing::warn;

use super::state::CleanerState;

/// Progress of one topic through the run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicEntry {
    pub topic: String,
    /// `retention.ms` override before the run, `None` if the broker default applied
    pub original_retention: Option<u64>,
    #[serde(default)]
    pub lowered: bool,
    #[serde(default)]
    pub restored: bool,
    /// The alter command exited unsuccessfully, so retention was never changed
    #[serde(default)]
    pub lower_failed: bool,
}

impl TopicEntry {
    pub fn new(topic: impl Into<String>, original_retention: Option<u64>) -> Self {
        TopicEntry {
            topic: topic.into(),
            original_retention,
            lowered: false,
            restored: false,
            lower_failed: false,
        }
    }

    /// Whether the restore phase still has to touch this topic
    ///
    /// A topic whose lowering is known to have failed keeps its original
    /// retention. A topic killed mid-lowering is in an unknown state and is restored.
    pub fn needs_restore(&self) -> bool {
        !self.restored && !(self.lower_failed && !self.lowered)
    }
}

/// JSON journal of a cleaner run
///
/// The file exists for as long as the run is unfinished. Its presence keeps a
/// second run from starting on the same working directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanerJournal {
    #[serde(skip)]
    path: PathBuf,
    pub state: CleanerState,
    pub purge_retention_ms: u64,
    pub topics: Vec<TopicEntry>,
}

impl CleanerJournal {
    /// Write a fresh journal at `path`
    ///
    /// # Errors
    /// [`ToolsError::JournalExists`] if a journal is already there
    pub fn create(
        path: impl Into<PathBuf>,
        state: CleanerState,
        purge_retention_ms: u64,
        topics: Vec<TopicEntry>,
    ) -> MaintResult<Self> {
        let journal = CleanerJournal {
            path: path.into(),
            state,
            purge_retention_ms,
            topics,
        };
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&journal.path)
            .map_err(|e| match e.kind() {
                io::ErrorKind::AlreadyExists => exists(&journal.path),
                _ => MaintError::Io(e),
            })?;
        file.write_all(serde_json::to_string_pretty(&journal)?.as_bytes())?;
        file.sync_all()?;
        debug!("journal created at {}", journal.path.display());
        Ok(journal)
    }

    /// Read the journal of an unfinished run
    pub fn load(path: impl Into<PathBuf>) -> MaintResult<Self> {
        let path = path.into();
        let content = fs::read_to_string(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => MaintError::Tools(ToolsError::JournalNotFound {
                path: path.display().to_string(),
            }),
            _ => MaintError::Io(e),
        })?;
        let mut journal: CleanerJournal = serde_json::from_str(&content)?;
        journal.path = path;
        Ok(journal)
    }

    /// Fail early when a journal already exists at `path`
    pub fn ensure_absent(path: &Path) -> MaintResult<()> {
        if path.exists() {
            return Err(exists(path));
        }
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the file contents through a sibling temporary and a rename
    pub fn save(&self) -> MaintResult<()> {
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        fs::write(&tmp, serde_json::to_string_pretty(self)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    /// Delete the file; a missing file is not an error
    pub fn remove(&self) -> MaintResult<()> {
        match fs::remove_file(&self.path) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }

    /// Move to `state` and persist
    pub fn transition(&mut self, state: CleanerState) -> MaintResult<()> {
        debug!("cleaner state {} -> {}", self.state, state);
        self.state = state;
        self.save()
    }

    pub fn mark_lowered(&mut self, index: usize) -> MaintResult<()> {
        if let Some(entry) = self.topics.get_mut(index) {
            entry.lowered = true;
            entry.lower_failed = false;
        }
        self.save()
    }

    pub fn mark_lower_failed(&mut self, index: usize) -> MaintResult<()> {
        if let Some(entry) = self.topics.get_mut(index) {
            entry.lower_failed = true;
        }
        self.save()
    }

    pub fn mark_restored(&mut self, index: usize) -> MaintResult<()> {
        if let Some(entry) = self.topics.get_mut(index) {
            entry.restored = true;
        }
        self.save()
    }

    pub fn topic_names(&self) -> Vec<String> {
        self.topics.iter().map(|entry| entry.topic.clone()).collect()
    }

    /// Topics left untouched because lowering their retention failed
    pub fn lower_failed(&self) -> Vec<String> {
        self.topics
            .iter()
            .filter(|entry| entry.lower_failed && !entry.lowered)
            .map(|entry| entry.topic.clone())
            .collect()
    }

    /// Topics whose retention has not been put back yet
    pub fn unrestored(&self) -> Vec<String> {
        self.topics
            .iter()
            .filter(|entry| entry.needs_restore())
            .map(|entry| entry.topic.clone())
            .collect()
    }
}

/// Exclusive claim on a journal while a run resumes it
///
/// Held as a `<journal>.lock` file created with `create_new`; dropping the guard
/// removes it.
#[derive(Debug)]
pub struct ResumeLock {
    path: PathBuf,
}

impl ResumeLock {
    /// # Errors
    /// [`ToolsError::JournalLocked`] when another process holds the lock
    pub fn acquire(journal_path: &Path) -> MaintResult<Self> {
        let mut path = journal_path.as_os_str().to_owned();
        path.push(".lock");
        let path = PathBuf::from(path);
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|e| match e.kind() {
                io::ErrorKind::AlreadyExists => MaintError::Tools(ToolsError::JournalLocked {
                    path: journal_path.display().to_string(),
                    lock: path.display().to_string(),
                }),
                _ => MaintError::Io(e),
            })?;
        writeln!(file, "{}", std::process::id())?;
        debug!("resume lock taken at {}", path.display());
        Ok(ResumeLock { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ResumeLock {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            if e.kind() != io::ErrorKind::NotFound {
                warn!("failed to remove resume lock {}: {e}", self.path.display());
            }
        }
    }
}

fn exists(path: &Path) -> MaintError {
    MaintError::Tools(ToolsError::JournalExists {
        path: path.display().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries() -> Vec<TopicEntry> {
        vec![TopicEntry::new("orders", Some(86_400_000)), TopicEntry::new("payments", None)]
    }

    #[test]
    fn create_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("journal.json");
        let mut journal = CleanerJournal::create(&path, CleanerState::LoweringRetention, 1000, entries()).unwrap();
        journal.mark_lowered(0).unwrap();
        journal.transition(CleanerState::WaitingForPurge).unwrap();

        let loaded = CleanerJournal::load(&path).unwrap();
        assert_eq!(loaded, journal);
        assert_eq!(loaded.state, CleanerState::WaitingForPurge);
        assert!(loaded.topics[0].lowered);
        assert!(!loaded.topics[1].lowered);
        assert_eq!(loaded.unrestored(), vec!["orders", "payments"]);
    }

    #[test]
    fn second_create_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("journal.json");
        CleanerJournal::create(&path, CleanerState::LoweringRetention, 1000, entries()).unwrap();

        let err = CleanerJournal::create(&path, CleanerState::LoweringRetention, 1000, entries()).unwrap_err();
        assert!(matches!(err, MaintError::Tools(ToolsError::JournalExists { .. })));
        assert!(CleanerJournal::ensure_absent(&path).is_err());
    }

    #[test]
    fn load_missing_and_remove_twice() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("journal.json");
        let err = CleanerJournal::load(&path).unwrap_err();
        assert!(matches!(err, MaintError::Tools(ToolsError::JournalNotFound { .. })));

        let journal = CleanerJournal::create(&path, CleanerState::LoweringRetention, 1000, entries()).unwrap();
        journal.remove().unwrap();
        journal.remove().unwrap();
        assert!(!path.exists());
        CleanerJournal::ensure_absent(&path).unwrap();
    }

    #[test]
    fn failed_lowering_needs_no_restore() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("journal.json");
        let mut journal = CleanerJournal::create(&path, CleanerState::LoweringRetention, 1000, entries()).unwrap();
        journal.mark_lowered(0).unwrap();
        journal.mark_lower_failed(1).unwrap();

        assert_eq!(journal.unrestored(), vec!["orders"]);
        assert_eq!(journal.lower_failed(), vec!["payments"]);
        assert!(CleanerJournal::load(&path).unwrap().topics[1].lower_failed);

        // a later successful lowering makes the topic restorable again
        journal.mark_lowered(1).unwrap();
        assert_eq!(journal.unrestored(), vec!["orders", "payments"]);
        assert!(journal.lower_failed().is_empty());
    }

    #[test]
    fn journal_without_lower_failed_field_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("journal.json");
        fs::write(
            &path,
            r#"{"state":"restoring_retention","purge_retention_ms":1000,"topics":[{"topic":"orders","original_retention":null,"lowered":true,"restored":false}]}"#,
        )
        .unwrap();
        let journal = CleanerJournal::load(&path).unwrap();
        assert!(!journal.topics[0].lower_failed);
        assert_eq!(journal.unrestored(), vec!["orders"]);
    }

    #[test]
    fn resume_lock_is_exclusive() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("journal.json");
        let lock = ResumeLock::acquire(&path).unwrap();
        assert!(lock.path().exists());
        assert_eq!(lock.path(), dir.path().join("journal.json.lock"));

        let err = ResumeLock::acquire(&path).unwrap_err();
        assert!(matches!(err, MaintError::Tools(ToolsError::JournalLocked { .. })));

        let lock_path = lock.path().to_path_buf();
        drop(lock);
        assert!(!lock_path.exists());
        ResumeLock::acquire(&path).unwrap();
    }

    #[test]
    fn journal_file_is_plain_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("journal.json");
        CleanerJournal::create(&path, CleanerState::LoweringRetention, 1000, entries()).unwrap();

        let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["state"], "lowering_retention");
        assert_eq!(value["topics"][0]["original_retention"], 86_400_000);
        assert!(value["topics"][1]["original_retention"].is_null());
        assert!(value.get("path").is_none());
    }
}
