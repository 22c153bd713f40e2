//! In-process store.
//!
//! Histories live in the core [`HistoryStore`]; stored difficulty levels in a
//! side map. Nothing survives the process.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use quizadapt_core::history::{HistoryStore, UserHistory};
use quizadapt_core::model::DifficultyLevel;
use quizadapt_core::traits::PerformanceStore;

#[derive(Debug, Default)]
pub struct InMemoryStore {
    histories: HistoryStore,
    levels: RwLock<HashMap<String, DifficultyLevel>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Direct access to the history log, e.g. for seeding.
    pub fn histories(&self) -> &HistoryStore {
        &self.histories
    }
}

#[async_trait]
impl PerformanceStore for InMemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn load_history(&self, user_id: &str) -> anyhow::Result<UserHistory> {
        Ok(self.histories.snapshot(user_id))
    }

    async fn save_history(&self, user_id: &str, history: &UserHistory) -> anyhow::Result<()> {
        self.histories.replace(user_id, history.clone());
        Ok(())
    }

    async fn load_current_difficulty(
        &self,
        user_id: &str,
    ) -> anyhow::Result<Option<DifficultyLevel>> {
        let levels = self.levels.read().unwrap_or_else(|e| e.into_inner());
        Ok(levels.get(user_id).copied())
    }

    async fn save_current_difficulty(
        &self,
        user_id: &str,
        level: DifficultyLevel,
    ) -> anyhow::Result<()> {
        let mut levels = self.levels.write().unwrap_or_else(|e| e.into_inner());
        levels.insert(user_id.to_string(), level);
        Ok(())
    }
}
