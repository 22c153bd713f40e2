//! JSON file store.
//!
//! The whole document is held in memory and rewritten on every save. Writes
//! go to a temp file in the same directory which is then renamed over the
//! target, so a crash never leaves a half-written document behind.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use quizadapt_core::history::UserHistory;
use quizadapt_core::model::DifficultyLevel;
use quizadapt_core::traits::PerformanceStore;

use crate::error::StoreError;

/// On-disk format version.
pub const FORMAT_VERSION: u32 = 1;

/// Top-level store document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreDocument {
    pub version: u32,
    #[serde(default)]
    pub users: BTreeMap<String, UserRecord>,
}

impl Default for StoreDocument {
    fn default() -> Self {
        Self {
            version: FORMAT_VERSION,
            users: BTreeMap::new(),
        }
    }
}

/// Everything persisted for one user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(default)]
    pub history: UserHistory,
    #[serde(default)]
    pub current_difficulty: Option<DifficultyLevel>,
    pub updated_at: DateTime<Utc>,
}

impl Default for UserRecord {
    fn default() -> Self {
        Self {
            history: UserHistory::new(),
            current_difficulty: None,
            updated_at: Utc::now(),
        }
    }
}

pub struct JsonFileStore {
    path: PathBuf,
    document: Mutex<StoreDocument>,
}

impl JsonFileStore {
    /// Open a store file, starting empty if it does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let document = if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|source| StoreError::Io {
                path: path.clone(),
                source,
            })?;
            let document: StoreDocument =
                serde_json::from_str(&content).map_err(|source| StoreError::Corrupt {
                    path: path.clone(),
                    source,
                })?;
            if document.version != FORMAT_VERSION {
                return Err(StoreError::UnsupportedVersion {
                    found: document.version,
                    expected: FORMAT_VERSION,
                });
            }
            tracing::info!(path = %path.display(), users = document.users.len(), "opened store");
            document
        } else {
            tracing::info!(path = %path.display(), "store file not found, starting empty");
            StoreDocument::default()
        };

        Ok(Self {
            path,
            document: Mutex::new(document),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Ids of every user with a record, sorted.
    pub async fn user_ids(&self) -> Vec<String> {
        self.document.lock().await.users.keys().cloned().collect()
    }

    /// Apply a change to one user's record and write the document.
    ///
    /// The in-memory document only changes once the write has succeeded.
    async fn update(
        &self,
        user_id: &str,
        apply: impl FnOnce(&mut UserRecord) + Send,
    ) -> anyhow::Result<()> {
        let mut document = self.document.lock().await;
        let mut next = document.clone();
        let record = next.users.entry(user_id.to_string()).or_default();
        apply(record);
        record.updated_at = Utc::now();

        let json = serde_json::to_vec_pretty(&next)?;
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || write_atomic(&path, &json)).await??;
        *document = next;
        tracing::debug!(user_id, path = %self.path.display(), "store saved");
        Ok(())
    }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    let io_err = |source: std::io::Error| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir).map_err(io_err)?;

    let mut tmp = tempfile::NamedTempFile::new_in(&dir).map_err(io_err)?;
    tmp.write_all(bytes).map_err(io_err)?;
    tmp.as_file().sync_all().map_err(io_err)?;
    tmp.persist(path).map_err(|e| io_err(e.error))?;
    Ok(())
}

#[async_trait]
impl PerformanceStore for JsonFileStore {
    fn name(&self) -> &str {
        "json"
    }

    async fn load_history(&self, user_id: &str) -> anyhow::Result<UserHistory> {
        let document = self.document.lock().await;
        Ok(document
            .users
            .get(user_id)
            .map(|r| r.history.clone())
            .unwrap_or_default())
    }

    async fn save_history(&self, user_id: &str, history: &UserHistory) -> anyhow::Result<()> {
        let history = history.clone();
        self.update(user_id, move |record| record.history = history)
            .await
    }

    async fn load_current_difficulty(
        &self,
        user_id: &str,
    ) -> anyhow::Result<Option<DifficultyLevel>> {
        let document = self.document.lock().await;
        Ok(document
            .users
            .get(user_id)
            .and_then(|r| r.current_difficulty))
    }

    async fn save_current_difficulty(
        &self,
        user_id: &str,
        level: DifficultyLevel,
    ) -> anyhow::Result<()> {
        self.update(user_id, move |record| record.current_difficulty = Some(level))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path().join("history.json")).unwrap();
        assert!(store.load_history("u").await.unwrap().is_empty());
        assert!(store.user_ids().await.is_empty());
    }

    #[tokio::test]
    async fn persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("history.json");

        let store = JsonFileStore::open(&path).unwrap();
        store
            .save_history("u1", &UserHistory::from(vec![0.3, 0.6]))
            .await
            .unwrap();
        store
            .save_current_difficulty("u1", DifficultyLevel::Intermediate)
            .await
            .unwrap();
        drop(store);

        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(
            reopened.load_history("u1").await.unwrap().to_vec(),
            vec![0.3, 0.6]
        );
        assert_eq!(
            reopened.load_current_difficulty("u1").await.unwrap(),
            Some(DifficultyLevel::Intermediate)
        );
        assert_eq!(reopened.user_ids().await, vec!["u1".to_string()]);
    }

    #[tokio::test]
    async fn difficulty_is_written_as_integer() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        let store = JsonFileStore::open(&path).unwrap();
        store
            .save_current_difficulty("u1", DifficultyLevel::Advanced)
            .await
            .unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["version"], 1);
        assert_eq!(raw["users"]["u1"]["current_difficulty"], 3);
    }

    #[test]
    fn corrupt_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = JsonFileStore::open(&path).err().unwrap();
        assert!(matches!(err, StoreError::Corrupt { .. }));
    }

    #[test]
    fn future_version_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        std::fs::write(&path, r#"{"version": 9, "users": {}}"#).unwrap();
        let err = JsonFileStore::open(&path).err().unwrap();
        assert!(matches!(
            err,
            StoreError::UnsupportedVersion {
                found: 9,
                expected: 1
            }
        ));
    }

    #[tokio::test]
    async fn failed_write_leaves_store_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();

        let store = JsonFileStore::open(blocker.join("history.json")).unwrap();
        let err = store
            .save_history("u", &UserHistory::from(vec![0.4]))
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StoreError>(),
            Some(StoreError::Io { .. })
        ));
        assert!(store
            .save_current_difficulty("u", DifficultyLevel::Advanced)
            .await
            .is_err());

        assert!(store.load_history("u").await.unwrap().is_empty());
        assert_eq!(store.load_current_difficulty("u").await.unwrap(), None);
        assert!(store.user_ids().await.is_empty());
    }

    #[tokio::test]
    async fn oversized_history_is_truncated_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        let scores: Vec<f64> = (0..30).map(|i| i as f64 / 100.0).collect();
        let doc = serde_json::json!({
            "version": 1,
            "users": { "u": { "history": scores, "updated_at": "2024-01-01T00:00:00Z" } }
        });
        std::fs::write(&path, doc.to_string()).unwrap();

        let store = JsonFileStore::open(&path).unwrap();
        let history = store.load_history("u").await.unwrap();
        assert_eq!(history.len(), 20);
        assert_eq!(history.recent(1), vec![0.29]);
    }
}
