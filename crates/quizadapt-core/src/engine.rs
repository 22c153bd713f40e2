//! Adaptive engine orchestrator.
//!
//! Binds the difficulty controller to a persistence collaborator. Work for a
//! single user is serialized behind a per-user async lock so the
//! `previous_performance` read and the following append can never interleave
//! with another submission for the same user. Different users run in
//! parallel.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::OwnedMutexGuard;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::controller::DifficultyController;
use crate::error::CoreError;
use crate::history::UserHistory;
use crate::model::{AnswerSubmission, DifficultyLevel, QuestionSlot};
use crate::scoring::{evaluate, FeedbackCategory};
use crate::statistics::{analyze, PerformanceAnalytics};
use crate::traits::{DecisionObserver, NoopObserver, PerformanceStore};

/// Configuration for the adaptive engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Level assumed for users with no stored difficulty.
    pub default_difficulty: DifficultyLevel,
    /// Deadline applied to each persistence call. `None` waits indefinitely.
    pub persistence_timeout: Option<Duration>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_difficulty: DifficultyLevel::Beginner,
            persistence_timeout: Some(Duration::from_secs(5)),
        }
    }
}

/// What the answer-submission collaborator gets back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionOutcome {
    pub is_correct: bool,
    pub score: u32,
    pub feedback: String,
    pub feedback_category: FeedbackCategory,
    pub previous_difficulty: DifficultyLevel,
    pub new_difficulty: DifficultyLevel,
    pub performance_score: f64,
}

type UserLocks = Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>;

/// The central adaptive engine.
pub struct AdaptiveEngine {
    store: Arc<dyn PerformanceStore>,
    controller: DifficultyController,
    config: EngineConfig,
    observer: Arc<dyn DecisionObserver>,
    user_locks: UserLocks,
}

/// Holds one user's lock; drops the map entry when no one else wants it.
struct UserGuard<'a> {
    locks: &'a UserLocks,
    user_id: String,
    lock: Arc<tokio::sync::Mutex<()>>,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for UserGuard<'_> {
    fn drop(&mut self) {
        self.guard.take();
        let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        // map entry + this handle
        if Arc::strong_count(&self.lock) == 2
            && locks
                .get(&self.user_id)
                .is_some_and(|entry| Arc::ptr_eq(entry, &self.lock))
        {
            locks.remove(&self.user_id);
        }
    }
}

impl AdaptiveEngine {
    pub fn new(
        store: Arc<dyn PerformanceStore>,
        controller: DifficultyController,
        config: EngineConfig,
    ) -> Self {
        Self {
            store,
            controller,
            config,
            observer: Arc::new(NoopObserver),
            user_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Attach an observer notified of every primary-path decision.
    pub fn with_observer(mut self, observer: Arc<dyn DecisionObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn controller(&self) -> &DifficultyController {
        &self.controller
    }

    /// Score an answer, run the primary path, and persist the result.
    pub async fn submit(
        &self,
        user_id: &str,
        submission: &AnswerSubmission,
    ) -> Result<SubmissionOutcome> {
        let evaluation = evaluate(
            submission.user_answer.as_str(),
            submission.correct_answer.as_str(),
            submission.time_taken,
            submission.confidence,
        );
        let event = submission.to_event();

        let _guard = self.lock_user(user_id).await;

        let mut history = self.load_history(user_id).await?;
        let current = self.current_difficulty(user_id).await?;

        let decision = self.controller.next_difficulty(&mut history, current, &event);

        self.guarded("save_history", self.store.save_history(user_id, &history))
            .await?;
        self.guarded(
            "save_current_difficulty",
            self.store.save_current_difficulty(user_id, decision.next),
        )
        .await?;

        self.observer.on_decision(user_id, &decision);
        tracing::info!(
            user_id,
            correct = evaluation.is_correct,
            score = evaluation.score,
            from = %decision.previous,
            to = %decision.next,
            "answer submitted"
        );

        Ok(SubmissionOutcome {
            is_correct: evaluation.is_correct,
            score: evaluation.score,
            feedback: evaluation.feedback,
            feedback_category: evaluation.category,
            previous_difficulty: decision.previous,
            new_difficulty: decision.next,
            performance_score: decision.performance_score,
        })
    }

    /// Label a batch of `count` questions for `topic_id`.
    ///
    /// `base` defaults to the user's stored difficulty. Read-only.
    pub async fn questions(
        &self,
        user_id: &str,
        topic_id: u64,
        base: Option<DifficultyLevel>,
        count: usize,
    ) -> Result<Vec<QuestionSlot>> {
        let _guard = self.lock_user(user_id).await;

        let base = match base {
            Some(level) => level,
            None => self.current_difficulty(user_id).await?,
        };
        let history = self.load_history(user_id).await?;
        let levels = self
            .controller
            .question_difficulties(&history, base, count);

        tracing::debug!(user_id, topic_id, base = %base, count, "question batch labelled");
        Ok(levels
            .into_iter()
            .enumerate()
            .map(|(i, level)| QuestionSlot::new(topic_id, i + 1, level))
            .collect())
    }

    /// Aggregate analytics for a user. Read-only.
    pub async fn analytics(&self, user_id: &str) -> Result<PerformanceAnalytics> {
        let _guard = self.lock_user(user_id).await;
        let history = self.load_history(user_id).await?;
        Ok(analyze(&history.to_vec()))
    }

    /// The stored difficulty, or the configured default for new users.
    pub async fn current_difficulty(&self, user_id: &str) -> Result<DifficultyLevel> {
        let stored = self
            .guarded(
                "load_current_difficulty",
                self.store.load_current_difficulty(user_id),
            )
            .await?;
        Ok(stored.unwrap_or(self.config.default_difficulty))
    }

    async fn load_history(&self, user_id: &str) -> Result<UserHistory> {
        self.guarded("load_history", self.store.load_history(user_id))
            .await
    }

    /// Number of users currently holding or waiting on their lock.
    pub fn locked_users(&self) -> usize {
        self.user_locks
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    async fn lock_user(&self, user_id: &str) -> UserGuard<'_> {
        let lock = {
            let mut locks = self.user_locks.lock().unwrap_or_else(|e| e.into_inner());
            Arc::clone(locks.entry(user_id.to_string()).or_default())
        };
        let guard = Arc::clone(&lock).lock_owned().await;
        UserGuard {
            locks: &self.user_locks,
            user_id: user_id.to_string(),
            lock,
            guard: Some(guard),
        }
    }

    /// Apply the configured deadline to a persistence call.
    async fn guarded<T>(
        &self,
        operation: &'static str,
        fut: impl Future<Output = Result<T>>,
    ) -> Result<T> {
        match self.config.persistence_timeout {
            Some(limit) => match tokio::time::timeout(limit, fut).await {
                Ok(result) => result,
                Err(_) => {
                    let timeout_ms = limit.as_millis() as u64;
                    tracing::warn!(operation, timeout_ms, "persistence call timed out");
                    Err(CoreError::PersistenceTimeout {
                        operation,
                        timeout_ms,
                    }
                    .into())
                }
            },
            None => fut.await,
        }
    }
}
