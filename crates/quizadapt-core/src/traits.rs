//! Collaborator traits.
//!
//! `PerformanceStore` is implemented by the `quizadapt-store` crate; the
//! adaptive engine only ever talks to persistence through it.

use async_trait::async_trait;

use crate::history::UserHistory;
use crate::model::DifficultyLevel;

/// Per-user performance persistence.
///
/// Each method is an atomic read or whole-value replace. Unknown users load
/// as an empty history and no stored difficulty.
#[async_trait]
pub trait PerformanceStore: Send + Sync {
    /// Human-readable backend name (e.g. "memory").
    fn name(&self) -> &str;

    async fn load_history(&self, user_id: &str) -> anyhow::Result<UserHistory>;

    async fn save_history(&self, user_id: &str, history: &UserHistory) -> anyhow::Result<()>;

    /// `None` when the user has never had a difficulty stored.
    async fn load_current_difficulty(
        &self,
        user_id: &str,
    ) -> anyhow::Result<Option<DifficultyLevel>>;

    async fn save_current_difficulty(
        &self,
        user_id: &str,
        level: DifficultyLevel,
    ) -> anyhow::Result<()>;
}

/// Receives each primary-path decision, e.g. for console progress.
pub trait DecisionObserver: Send + Sync {
    fn on_decision(&self, user_id: &str, decision: &crate::controller::Decision);
}

/// Observer that ignores everything.
pub struct NoopObserver;

impl DecisionObserver for NoopObserver {
    fn on_decision(&self, _: &str, _: &crate::controller::Decision) {}
}
