//! Feature extraction for the difficulty classifier.

use crate::model::{AnswerEvent, FeatureVector, TIME_CAP_SECS};

/// Number of trailing history entries averaged into `previous_performance`.
pub const PREVIOUS_WINDOW: usize = 5;

/// Prior used for `previous_performance` when a user has no history yet.
pub const NEUTRAL_PRIOR: f64 = 0.5;

/// Turn an answer event into a classifier feature vector.
///
/// `history` is the user's score history, oldest first. Only the last
/// [`PREVIOUS_WINDOW`] entries are read.
pub fn extract(history: &[f64], event: &AnswerEvent) -> FeatureVector {
    FeatureVector {
        correctness: if event.is_correct() { 1.0 } else { 0.0 },
        time_score: time_score(event.time_taken()),
        confidence: event.confidence(),
        previous_performance: previous_performance(history),
    }
}

/// `1 - t/300`, floored at 0 once the cap is exceeded.
pub fn time_score(time_taken: f64) -> f64 {
    (1.0 - time_taken.max(0.0) / TIME_CAP_SECS).clamp(0.0, 1.0)
}

/// Mean of the last [`PREVIOUS_WINDOW`] history entries, or the neutral prior.
pub fn previous_performance(history: &[f64]) -> f64 {
    let start = history.len().saturating_sub(PREVIOUS_WINDOW);
    mean(&history[start..]).unwrap_or(NEUTRAL_PRIOR)
}

pub(crate) fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}
