//! Mock store for testing.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use quizadapt_core::history::UserHistory;
use quizadapt_core::model::DifficultyLevel;
use quizadapt_core::traits::PerformanceStore;

use crate::error::StoreError;
use crate::memory::InMemoryStore;

/// An in-memory store with call counting, latency, and failure injection.
pub struct MockStore {
    inner: InMemoryStore,
    /// Delay applied before every call.
    latency: Option<Duration>,
    fail_saves: AtomicBool,
    loads: AtomicU32,
    saves: AtomicU32,
}

impl MockStore {
    pub fn new() -> Self {
        Self {
            inner: InMemoryStore::new(),
            latency: None,
            fail_saves: AtomicBool::new(false),
            loads: AtomicU32::new(0),
            saves: AtomicU32::new(0),
        }
    }

    /// Create a mock whose every call sleeps for `latency` first.
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            latency: Some(latency),
            ..Self::new()
        }
    }

    /// Make subsequent saves fail (or succeed again).
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::Relaxed);
    }

    /// Seed a user's history directly.
    pub fn seed(&self, user_id: &str, scores: &[f64]) {
        for &score in scores {
            self.inner.histories().append(user_id, score);
        }
    }

    pub fn load_count(&self) -> u32 {
        self.loads.load(Ordering::Relaxed)
    }

    pub fn save_count(&self) -> u32 {
        self.saves.load(Ordering::Relaxed)
    }

    async fn before_call(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }

    fn check_save(&self) -> anyhow::Result<()> {
        self.saves.fetch_add(1, Ordering::Relaxed);
        if self.fail_saves.load(Ordering::Relaxed) {
            return Err(StoreError::Injected("save rejected".into()).into());
        }
        Ok(())
    }
}

impl Default for MockStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PerformanceStore for MockStore {
    fn name(&self) -> &str {
        "mock"
    }

    async fn load_history(&self, user_id: &str) -> anyhow::Result<UserHistory> {
        self.before_call().await;
        self.loads.fetch_add(1, Ordering::Relaxed);
        self.inner.load_history(user_id).await
    }

    async fn save_history(&self, user_id: &str, history: &UserHistory) -> anyhow::Result<()> {
        self.before_call().await;
        self.check_save()?;
        self.inner.save_history(user_id, history).await
    }

    async fn load_current_difficulty(
        &self,
        user_id: &str,
    ) -> anyhow::Result<Option<DifficultyLevel>> {
        self.before_call().await;
        self.loads.fetch_add(1, Ordering::Relaxed);
        self.inner.load_current_difficulty(user_id).await
    }

    async fn save_current_difficulty(
        &self,
        user_id: &str,
        level: DifficultyLevel,
    ) -> anyhow::Result<()> {
        self.before_call().await;
        self.check_save()?;
        self.inner.save_current_difficulty(user_id, level).await
    }
}
