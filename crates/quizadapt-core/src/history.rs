//! Bounded per-user performance history.
//!
//! A user's history is a FIFO log of performance scores, oldest first,
//! capped at [`HISTORY_CAPACITY`] entries. Entries are never edited after
//! insertion; the only removal is eviction from the head on overflow.

use std::collections::{HashMap, VecDeque};
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

/// Maximum number of scores retained per user.
pub const HISTORY_CAPACITY: usize = 20;

/// One user's bounded score log.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<f64>", into = "Vec<f64>")]
pub struct UserHistory {
    scores: VecDeque<f64>,
}

impl UserHistory {
    pub fn new() -> Self {
        Self {
            scores: VecDeque::with_capacity(HISTORY_CAPACITY + 1),
        }
    }

    /// Append a score, evicting from the head once over capacity.
    ///
    /// Scores are pinned to [0, 1]; NaN is stored as 0.
    pub fn push(&mut self, score: f64) {
        let score = if score.is_nan() {
            0.0
        } else {
            score.clamp(0.0, 1.0)
        };
        self.scores.push_back(score);
        while self.scores.len() > HISTORY_CAPACITY {
            self.scores.pop_front();
        }
    }

    /// The last `n` scores (all of them if fewer), oldest first.
    pub fn recent(&self, n: usize) -> Vec<f64> {
        let start = self.scores.len().saturating_sub(n);
        self.scores.range(start..).copied().collect()
    }

    /// Full snapshot, oldest first.
    pub fn to_vec(&self) -> Vec<f64> {
        self.scores.iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

impl From<Vec<f64>> for UserHistory {
    fn from(scores: Vec<f64>) -> Self {
        let mut history = UserHistory::new();
        for score in scores {
            history.push(score);
        }
        history
    }
}

impl From<UserHistory> for Vec<f64> {
    fn from(history: UserHistory) -> Self {
        history.scores.into()
    }
}

/// Process-local history store keyed by user id.
///
/// Histories are created lazily on first append. Reads for unknown users
/// return an empty sequence.
#[derive(Debug, Default)]
pub struct HistoryStore {
    users: RwLock<HashMap<String, UserHistory>>,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a score to a user's history.
    pub fn append(&self, user_id: &str, score: f64) {
        let mut users = self.users.write().unwrap_or_else(|e| e.into_inner());
        users.entry(user_id.to_string()).or_default().push(score);
    }

    /// The last `n` scores for a user, oldest first.
    pub fn recent(&self, user_id: &str, n: usize) -> Vec<f64> {
        let users = self.users.read().unwrap_or_else(|e| e.into_inner());
        users
            .get(user_id)
            .map(|h| h.recent(n))
            .unwrap_or_default()
    }

    /// Every retained score for a user, oldest first.
    pub fn all(&self, user_id: &str) -> Vec<f64> {
        let users = self.users.read().unwrap_or_else(|e| e.into_inner());
        users.get(user_id).map(|h| h.to_vec()).unwrap_or_default()
    }

    /// Clone of a user's history (empty if unknown).
    pub fn snapshot(&self, user_id: &str) -> UserHistory {
        let users = self.users.read().unwrap_or_else(|e| e.into_inner());
        users.get(user_id).cloned().unwrap_or_default()
    }

    /// Replace a user's history wholesale.
    pub fn replace(&self, user_id: &str, history: UserHistory) {
        let mut users = self.users.write().unwrap_or_else(|e| e.into_inner());
        users.insert(user_id.to_string(), history);
    }

    /// Number of users with a history.
    pub fn user_count(&self) -> usize {
        self.users.read().unwrap_or_else(|e| e.into_inner()).len()
    }
}
