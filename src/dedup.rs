// src/dedup.rs
//! Persistent record of previously emitted item ids. Loaded once at run
//! start, updated in memory, persisted once at run end with retention capped
//! by insertion recency so the file never grows without bound.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

pub const DEFAULT_RETENTION_CAP: usize = 5_000;

/// On-disk shape. Ids are stored oldest-first so truncation keeps the tail.
#[derive(Debug, Default, Serialize, Deserialize)]
struct PersistedState {
    #[serde(default)]
    known_ids: Vec<String>,
    #[serde(default)]
    last_fetch: Option<DateTime<Utc>>,
}

/// In-memory dedup state for one run.
#[derive(Debug, Default)]
pub struct DedupState {
    order: Vec<String>,
    seen: HashSet<String>,
    pub last_fetch: Option<DateTime<Utc>>,
}

impl DedupState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has(&self, id: &str) -> bool {
        self.seen.contains(id)
    }

    /// Record an id; returns false if it was already present.
    pub fn record(&mut self, id: &str) -> bool {
        if !self.seen.insert(id.to_string()) {
            return false;
        }
        self.order.push(id.to_string());
        true
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Drop all but the `cap` most recently recorded ids.
    fn truncate_to(&mut self, cap: usize) {
        if self.order.len() <= cap {
            return;
        }
        let cut = self.order.len() - cap;
        for id in self.order.drain(0..cut) {
            self.seen.remove(&id);
        }
    }
}

/// File-backed store for the dedup state. `load` is lossy by design: a
/// missing or unparseable file yields an empty state and never fails the run.
#[derive(Debug, Clone)]
pub struct DedupStateStore {
    path: PathBuf,
    cap: usize,
}

impl DedupStateStore {
    pub fn new(path: impl Into<PathBuf>, cap: usize) -> Self {
        Self {
            path: path.into(),
            cap,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> DedupState {
        let persisted = match std::fs::read_to_string(&self.path) {
            Ok(content) => match serde_json::from_str::<PersistedState>(&content) {
                Ok(p) => p,
                Err(e) => {
                    tracing::warn!(error = ?e, path = %self.path.display(), "dedup state unparseable, starting empty");
                    PersistedState::default()
                }
            },
            Err(_) => PersistedState::default(),
        };

        let mut state = DedupState {
            last_fetch: persisted.last_fetch,
            ..DedupState::default()
        };
        for id in persisted.known_ids {
            state.record(&id);
        }
        state
    }

    /// Truncate to the retention cap, stamp the fetch time, and write.
    pub fn persist(&self, state: &mut DedupState) -> Result<()> {
        state.truncate_to(self.cap);
        state.last_fetch = Some(Utc::now());

        let persisted = PersistedState {
            known_ids: state.order.clone(),
            last_fetch: state.last_fetch,
        };
        let json = serde_json::to_string_pretty(&persisted).context("serializing dedup state")?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
        }
        std::fs::write(&self.path, json)
            .with_context(|| format!("writing dedup state to {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_and_has() {
        let mut s = DedupState::new();
        assert!(!s.has("a"));
        assert!(s.record("a"));
        assert!(s.has("a"));
        assert!(!s.record("a"), "second record of same id is a no-op");
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = DedupStateStore::new(dir.path().join("absent.json"), 100);
        let state = store.load();
        assert!(state.is_empty());
        assert!(state.last_fetch.is_none());
    }

    #[test]
    fn corrupt_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "{not json at all").unwrap();
        let store = DedupStateStore::new(&path, 100);
        assert!(store.load().is_empty());
    }

    #[test]
    fn persist_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        let store = DedupStateStore::new(&path, 100);

        let mut state = store.load();
        state.record("one");
        state.record("two");
        store.persist(&mut state).unwrap();

        let reloaded = store.load();
        assert!(reloaded.has("one"));
        assert!(reloaded.has("two"));
        assert!(reloaded.last_fetch.is_some());
    }

    #[test]
    fn retention_keeps_most_recent_by_insertion() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        let store = DedupStateStore::new(&path, 3);

        let mut state = DedupState::new();
        for id in ["a", "b", "c", "d", "e"] {
            state.record(id);
        }
        store.persist(&mut state).unwrap();

        assert_eq!(state.len(), 3);
        let reloaded = store.load();
        assert_eq!(reloaded.len(), 3);
        assert!(!reloaded.has("a"));
        assert!(!reloaded.has("b"));
        assert!(reloaded.has("c"));
        assert!(reloaded.has("d"));
        assert!(reloaded.has("e"));
    }
}
