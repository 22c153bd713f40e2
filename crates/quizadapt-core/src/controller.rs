//! The difficulty state machine.
//!
//! Two independent policies move a learner between levels:
//!
//! - the **primary path** runs after each submitted answer: features are
//!   extracted, the classifier picks a direction, the level moves at most one
//!   step, and the answer's performance score is appended to history;
//! - the **secondary path** labels a batch of upcoming questions from the
//!   mean of the last three scores. It never writes history or the stored
//!   level.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::classifier::{Adjustment, DifficultyClassifier};
use crate::error::CoreError;
use crate::features::{self, mean};
use crate::history::UserHistory;
use crate::model::{AnswerEvent, DifficultyLevel, FeatureVector};
use crate::scoring::performance_score;

/// History entries the secondary path looks at.
pub const BATCH_TREND_WINDOW: usize = 3;
/// Above this recent mean, batch questions go one level up.
pub const BATCH_RAISE_ABOVE: f64 = 0.7;
/// Below this recent mean, batch questions go one level down.
pub const BATCH_LOWER_BELOW: f64 = 0.3;

/// Outcome of one primary-path step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub features: FeatureVector,
    pub adjustment: Adjustment,
    /// Classifier probability of `Increase`.
    pub probability: f64,
    pub previous: DifficultyLevel,
    pub next: DifficultyLevel,
    /// Score appended to history for this answer.
    pub performance_score: f64,
}

/// Stateless controller; per-user state is passed in.
#[derive(Debug, Clone)]
pub struct DifficultyController {
    classifier: Arc<DifficultyClassifier>,
}

impl DifficultyController {
    /// Build a controller around the bootstrap classifier.
    pub fn new() -> Result<Self, CoreError> {
        Ok(Self::with_classifier(Arc::new(
            DifficultyClassifier::bootstrap()?,
        )))
    }

    pub fn with_classifier(classifier: Arc<DifficultyClassifier>) -> Self {
        Self { classifier }
    }

    pub fn classifier(&self) -> &DifficultyClassifier {
        &self.classifier
    }

    /// Primary path: decide the next level and append this answer's score.
    pub fn next_difficulty(
        &self,
        history: &mut UserHistory,
        current: DifficultyLevel,
        event: &AnswerEvent,
    ) -> Decision {
        let features = features::extract(&history.recent(features::PREVIOUS_WINDOW), event);
        let adjustment = self.classifier.predict(&features);
        let probability = self.classifier.probability(&features);

        let next = match adjustment {
            Adjustment::Increase => current.harder(),
            Adjustment::Decrease => current.easier(),
        };

        let score = performance_score(event);
        history.push(score);

        tracing::debug!(
            ?adjustment,
            probability,
            from = current.level(),
            to = next.level(),
            score,
            "primary difficulty decision"
        );

        Decision {
            features,
            adjustment,
            probability,
            previous: current,
            next,
            performance_score: score,
        }
    }

    /// Secondary path: one level per question, from the recent score trend.
    ///
    /// The trend is the mean of the last three scores; a shorter history
    /// uses only its latest score.
    pub fn question_difficulties(
        &self,
        history: &UserHistory,
        base: DifficultyLevel,
        count: usize,
    ) -> Vec<DifficultyLevel> {
        let window = if history.len() >= BATCH_TREND_WINDOW {
            BATCH_TREND_WINDOW
        } else {
            1
        };
        let recent = history.recent(window);
        (0..count)
            .map(|_| adjust_for_trend(&recent, base))
            .collect()
    }
}

/// Shift `base` by one level when the recent mean leaves the [0.3, 0.7] band.
pub fn adjust_for_trend(recent: &[f64], base: DifficultyLevel) -> DifficultyLevel {
    match mean(recent) {
        Some(m) if m > BATCH_RAISE_ABOVE => base.harder(),
        Some(m) if m < BATCH_LOWER_BELOW => base.easier(),
        _ => base,
    }
}
