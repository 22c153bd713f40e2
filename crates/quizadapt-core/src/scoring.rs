//! Answer scoring, feedback, and the per-answer performance score.
//!
//! Two distinct formulas live here: the displayed points awarded by
//! [`evaluate`], and the normalized [`performance_score`] that feeds the
//! history store.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::{clamp_confidence, clamp_time, AnswerEvent, TIME_CAP_SECS};

/// Points for a correct answer.
pub const BASE_POINTS: f64 = 10.0;
/// Maximum speed bonus, earned at `time_taken == 0`.
pub const MAX_TIME_BONUS: f64 = 5.0;
/// Confidence multiplier for correct answers.
pub const CONFIDENCE_POINTS: f64 = 2.0;

/// Which feedback message an answer earns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FeedbackCategory {
    FastCorrect,
    Correct,
    SlowCorrect,
    ConfidentIncorrect,
    Incorrect,
}

impl FeedbackCategory {
    /// Select the category: time buckets when correct, confidence when not.
    pub fn classify(is_correct: bool, time_taken: f64, confidence: f64) -> Self {
        if is_correct {
            if time_taken < 60.0 {
                FeedbackCategory::FastCorrect
            } else if time_taken < 180.0 {
                FeedbackCategory::Correct
            } else {
                FeedbackCategory::SlowCorrect
            }
        } else if confidence > 0.7 {
            FeedbackCategory::ConfidentIncorrect
        } else {
            FeedbackCategory::Incorrect
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            FeedbackCategory::FastCorrect => "Excellent! You answered quickly and correctly.",
            FeedbackCategory::Correct => "Great job! You got the right answer.",
            FeedbackCategory::SlowCorrect => {
                "Correct answer, but try to be a bit faster next time."
            }
            FeedbackCategory::ConfidentIncorrect => {
                "You were confident but incorrect. Review the concept carefully."
            }
            FeedbackCategory::Incorrect => {
                "Don't worry! This is a learning opportunity. Review the material and try again."
            }
        }
    }
}

impl fmt::Display for FeedbackCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FeedbackCategory::FastCorrect => "fast-correct",
            FeedbackCategory::Correct => "correct",
            FeedbackCategory::SlowCorrect => "slow-correct",
            FeedbackCategory::ConfidentIncorrect => "confident-incorrect",
            FeedbackCategory::Incorrect => "incorrect",
        };
        f.write_str(name)
    }
}

/// Result of scoring one answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub is_correct: bool,
    /// Truncated points in 0..=17.
    pub score: u32,
    pub feedback: String,
    pub category: FeedbackCategory,
    pub time_taken: f64,
    pub confidence: f64,
}

/// Score an answer by exact match against the expected answer.
pub fn evaluate<A: PartialEq + ?Sized>(
    user_answer: &A,
    correct_answer: &A,
    time_taken: f64,
    confidence: Option<f64>,
) -> Evaluation {
    let is_correct = user_answer == correct_answer;
    let time_taken = clamp_time(time_taken);
    let confidence = clamp_confidence(confidence);

    let base = if is_correct { BASE_POINTS } else { 0.0 };
    let time_bonus = ((TIME_CAP_SECS - time_taken) / TIME_CAP_SECS * MAX_TIME_BONUS).max(0.0);
    let confidence_bonus = if is_correct {
        confidence * CONFIDENCE_POINTS
    } else {
        0.0
    };
    let total = base + time_bonus + confidence_bonus;

    let category = FeedbackCategory::classify(is_correct, time_taken, confidence);
    Evaluation {
        is_correct,
        score: total.trunc() as u32,
        feedback: category.message().to_string(),
        category,
        time_taken,
        confidence,
    }
}

/// Normalized [0, 1] summary of one answer, stored in history.
///
/// `correctness - 0.3 * t/300 + 0.2 * confidence`, clamped.
pub fn performance_score(event: &AnswerEvent) -> f64 {
    let correctness = if event.is_correct() { 1.0 } else { 0.0 };
    let time_penalty = (event.time_taken() / TIME_CAP_SECS * 0.3).max(0.0);
    let confidence_bonus = event.confidence() * 0.2;
    (correctness - time_penalty + confidence_bonus).clamp(0.0, 1.0)
}
