//! Core data model types for quizadapt.
//!
//! These are the types every component passes around: difficulty levels,
//! answer events, feature vectors, and the shapes exchanged with the
//! answer-submission and question-batch collaborators.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Answers slower than this many seconds earn no time credit.
pub const TIME_CAP_SECS: f64 = 300.0;

/// Confidence assumed when the submitter does not report one.
pub const DEFAULT_CONFIDENCE: f64 = 0.5;

/// Ordinal question difficulty tier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(try_from = "i64", into = "u8")]
pub enum DifficultyLevel {
    #[default]
    Beginner = 1,
    Intermediate = 2,
    Advanced = 3,
}

impl DifficultyLevel {
    pub const MIN: DifficultyLevel = DifficultyLevel::Beginner;
    pub const MAX: DifficultyLevel = DifficultyLevel::Advanced;

    /// Numeric level in 1..=3.
    pub fn level(self) -> u8 {
        self as u8
    }

    /// Build a level from any integer, clamping into 1..=3.
    pub fn clamped(level: i64) -> Self {
        match level {
            i64::MIN..=1 => DifficultyLevel::Beginner,
            2 => DifficultyLevel::Intermediate,
            _ => DifficultyLevel::Advanced,
        }
    }

    /// One step harder, saturating at `Advanced`.
    pub fn harder(self) -> Self {
        Self::clamped(self as i64 + 1)
    }

    /// One step easier, saturating at `Beginner`.
    pub fn easier(self) -> Self {
        Self::clamped(self as i64 - 1)
    }

    /// Human-readable tier name.
    pub fn label(self) -> &'static str {
        match self {
            DifficultyLevel::Beginner => "Beginner",
            DifficultyLevel::Intermediate => "Intermediate",
            DifficultyLevel::Advanced => "Advanced",
        }
    }
}

impl TryFrom<i64> for DifficultyLevel {
    type Error = CoreError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(DifficultyLevel::Beginner),
            2 => Ok(DifficultyLevel::Intermediate),
            3 => Ok(DifficultyLevel::Advanced),
            other => Err(CoreError::InvalidDifficulty(other)),
        }
    }
}

impl From<DifficultyLevel> for u8 {
    fn from(level: DifficultyLevel) -> Self {
        level.level()
    }
}

impl fmt::Display for DifficultyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DifficultyLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1" | "beginner" => Ok(DifficultyLevel::Beginner),
            "2" | "intermediate" => Ok(DifficultyLevel::Intermediate),
            "3" | "advanced" => Ok(DifficultyLevel::Advanced),
            other => Err(format!("unknown difficulty: {other}")),
        }
    }
}

/// One answered question, as reported by the answer-submission collaborator.
///
/// Construction clamps the numeric fields: negative or non-finite times
/// become 0, confidence is pinned to [0, 1] and NaN falls back to the default.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawAnswerEvent")]
pub struct AnswerEvent {
    is_correct: bool,
    time_taken: f64,
    confidence: f64,
}

#[derive(Deserialize)]
struct RawAnswerEvent {
    is_correct: bool,
    #[serde(default)]
    time_taken: f64,
    #[serde(default)]
    confidence: Option<f64>,
}

impl From<RawAnswerEvent> for AnswerEvent {
    fn from(raw: RawAnswerEvent) -> Self {
        AnswerEvent::new(raw.is_correct, raw.time_taken, raw.confidence)
    }
}

impl AnswerEvent {
    pub fn new(is_correct: bool, time_taken: f64, confidence: Option<f64>) -> Self {
        Self {
            is_correct,
            time_taken: clamp_time(time_taken),
            confidence: clamp_confidence(confidence),
        }
    }

    pub fn is_correct(&self) -> bool {
        self.is_correct
    }

    /// Seconds spent answering, never negative.
    pub fn time_taken(&self) -> f64 {
        self.time_taken
    }

    /// Self-reported confidence in [0, 1].
    pub fn confidence(&self) -> f64 {
        self.confidence
    }
}

pub(crate) fn clamp_time(time_taken: f64) -> f64 {
    if time_taken.is_nan() || time_taken < 0.0 {
        tracing::warn!(time_taken, "time_taken out of range, treating as 0");
        return 0.0;
    }
    // Keep it finite so it still serializes; the time cap floors it anyway.
    time_taken.min(f64::MAX)
}

pub(crate) fn clamp_confidence(confidence: Option<f64>) -> f64 {
    match confidence {
        None => DEFAULT_CONFIDENCE,
        Some(c) if c.is_nan() => {
            tracing::warn!("confidence is NaN, using default");
            DEFAULT_CONFIDENCE
        }
        Some(c) if !(0.0..=1.0).contains(&c) => {
            tracing::warn!(confidence = c, "confidence out of range, clamping");
            c.clamp(0.0, 1.0)
        }
        Some(c) => c,
    }
}

/// Inputs to the difficulty classifier, each component in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub correctness: f64,
    pub time_score: f64,
    pub confidence: f64,
    pub previous_performance: f64,
}

impl FeatureVector {
    pub const LEN: usize = 4;

    pub fn to_array(self) -> [f64; Self::LEN] {
        [
            self.correctness,
            self.time_score,
            self.confidence,
            self.previous_performance,
        ]
    }

    pub fn from_array(values: [f64; Self::LEN]) -> Self {
        Self {
            correctness: values[0],
            time_score: values[1],
            confidence: values[2],
            previous_performance: values[3],
        }
    }
}

/// Direction of recent performance relative to earlier attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Improving,
    Declining,
    #[default]
    Stable,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trend::Improving => write!(f, "improving"),
            Trend::Declining => write!(f, "declining"),
            Trend::Stable => write!(f, "stable"),
        }
    }
}

/// A submitted answer plus the facts needed to score it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerSubmission {
    pub user_answer: String,
    pub correct_answer: String,
    /// Seconds spent answering.
    #[serde(default)]
    pub time_taken: f64,
    #[serde(default)]
    pub confidence: Option<f64>,
}

impl AnswerSubmission {
    pub fn is_correct(&self) -> bool {
        self.user_answer == self.correct_answer
    }

    pub fn to_event(&self) -> AnswerEvent {
        AnswerEvent::new(self.is_correct(), self.time_taken, self.confidence)
    }
}

/// A difficulty label for one externally-sourced question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionSlot {
    /// Stable slot id, `q_{topic}_{n}` with `n` starting at 1.
    pub id: String,
    pub topic_id: u64,
    pub difficulty_level: DifficultyLevel,
    pub difficulty_text: String,
    /// Points awarded for this question; equal to the numeric level.
    pub points: u8,
}

impl QuestionSlot {
    pub fn new(topic_id: u64, position: usize, difficulty: DifficultyLevel) -> Self {
        Self {
            id: format!("q_{topic_id}_{position}"),
            topic_id,
            difficulty_level: difficulty,
            difficulty_text: difficulty.label().to_string(),
            points: difficulty.level(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn difficulty_display_and_parse() {
        assert_eq!(DifficultyLevel::Beginner.to_string(), "Beginner");
        assert_eq!(
            "advanced".parse::<DifficultyLevel>().unwrap(),
            DifficultyLevel::Advanced
        );
        assert_eq!(
            "2".parse::<DifficultyLevel>().unwrap(),
            DifficultyLevel::Intermediate
        );
        assert!("expert".parse::<DifficultyLevel>().is_err());
    }

    #[test]
    fn difficulty_steps_saturate() {
        assert_eq!(DifficultyLevel::Advanced.harder(), DifficultyLevel::Advanced);
        assert_eq!(DifficultyLevel::Beginner.easier(), DifficultyLevel::Beginner);
        assert_eq!(
            DifficultyLevel::Intermediate.harder(),
            DifficultyLevel::Advanced
        );
        assert_eq!(DifficultyLevel::clamped(-4), DifficultyLevel::Beginner);
        assert_eq!(DifficultyLevel::clamped(9), DifficultyLevel::Advanced);
    }

    #[test]
    fn difficulty_serializes_as_integer() {
        let json = serde_json::to_string(&DifficultyLevel::Intermediate).unwrap();
        assert_eq!(json, "2");
        let level: DifficultyLevel = serde_json::from_str("3").unwrap();
        assert_eq!(level, DifficultyLevel::Advanced);
        assert!(serde_json::from_str::<DifficultyLevel>("4").is_err());
    }

    #[test]
    fn answer_event_clamps_inputs() {
        let event = AnswerEvent::new(true, -12.0, Some(1.7));
        assert_eq!(event.time_taken(), 0.0);
        assert_eq!(event.confidence(), 1.0);

        let event = AnswerEvent::new(false, 42.0, None);
        assert_eq!(event.confidence(), DEFAULT_CONFIDENCE);

        let event = AnswerEvent::new(false, f64::NAN, Some(f64::NAN));
        assert_eq!(event.time_taken(), 0.0);
        assert_eq!(event.confidence(), DEFAULT_CONFIDENCE);
    }

    #[test]
    fn answer_event_deserialize_clamps() {
        let event: AnswerEvent =
            serde_json::from_str(r#"{"is_correct": true, "time_taken": -3, "confidence": -0.2}"#)
                .unwrap();
        assert_eq!(event.time_taken(), 0.0);
        assert_eq!(event.confidence(), 0.0);
    }

    #[test]
    fn question_slot_fields() {
        let slot = QuestionSlot::new(7, 2, DifficultyLevel::Advanced);
        assert_eq!(slot.id, "q_7_2");
        assert_eq!(slot.difficulty_text, "Advanced");
        assert_eq!(slot.points, 3);
    }
}
