//! Performance analytics over a user's score history.

use serde::{Deserialize, Serialize};

use crate::features::mean;
use crate::model::Trend;

/// Entries compared against the rest of the history for the trend.
pub const TREND_WINDOW: usize = 3;
/// Minimum change in mean that counts as improving or declining.
pub const TREND_BAND: f64 = 0.1;
/// Entries echoed back as `recent_performance`.
pub const RECENT_WINDOW: usize = 5;

pub const STRENGTH_THRESHOLD: f64 = 0.7;
pub const WEAKNESS_THRESHOLD: f64 = 0.4;

pub const STRENGTH_HIGH_PERFORMANCE: &str = "Consistent high performance";
pub const WEAKNESS_FUNDAMENTALS: &str = "Need for fundamental review";

/// Aggregate view of a user's history.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PerformanceAnalytics {
    pub total_attempts: usize,
    /// Mean score, rounded to three decimals.
    pub average_score: f64,
    pub improvement_trend: Trend,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    /// Up to the last five scores, oldest first.
    #[serde(default)]
    pub recent_performance: Vec<f64>,
}

/// Compute analytics for a history (oldest first). Empty input yields the
/// zero/stable baseline.
pub fn analyze(history: &[f64]) -> PerformanceAnalytics {
    let Some(average) = mean(history) else {
        return PerformanceAnalytics::default();
    };

    let mut strengths = Vec::new();
    let mut weaknesses = Vec::new();
    if average >= STRENGTH_THRESHOLD {
        strengths.push(STRENGTH_HIGH_PERFORMANCE.to_string());
    }
    if average < WEAKNESS_THRESHOLD {
        weaknesses.push(WEAKNESS_FUNDAMENTALS.to_string());
    }

    let start = history.len().saturating_sub(RECENT_WINDOW);
    PerformanceAnalytics {
        total_attempts: history.len(),
        average_score: round3(average),
        improvement_trend: trend(history),
        strengths,
        weaknesses,
        recent_performance: history[start..].to_vec(),
    }
}

/// Compare the last three scores against everything before them.
///
/// With exactly three scores the baseline is the first score; with fewer
/// the trend is stable.
pub fn trend(history: &[f64]) -> Trend {
    if history.len() < TREND_WINDOW {
        return Trend::Stable;
    }
    let split = history.len() - TREND_WINDOW;
    let recent = mean(&history[split..]).unwrap_or_default();
    let earlier = if split == 0 {
        history[0]
    } else {
        mean(&history[..split]).unwrap_or_default()
    };

    if recent > earlier + TREND_BAND {
        Trend::Improving
    } else if recent < earlier - TREND_BAND {
        Trend::Declining
    } else {
        Trend::Stable
    }
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
