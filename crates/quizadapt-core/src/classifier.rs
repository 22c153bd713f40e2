//! Bootstrap difficulty classifier.
//!
//! A logistic-regression decision surface fit once, at construction, on a
//! fixed five-row training set of archetypal learner profiles. Features are
//! standardized with statistics taken from the same five rows. The fitted
//! state is immutable afterwards, so a single instance can be shared across
//! every user behind an `Arc`.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::model::FeatureVector;

const DIM: usize = FeatureVector::LEN;

/// Hand-authored training rows: `[correctness, time_score, confidence, previous_performance]`.
pub const BOOTSTRAP_FEATURES: [[f64; DIM]; 5] = [
    [1.0, 0.8, 0.9, 0.7],
    [0.0, 0.3, 0.4, 0.6],
    [1.0, 0.6, 0.7, 0.8],
    [0.0, 0.2, 0.3, 0.4],
    [1.0, 0.9, 0.8, 0.9],
];

/// Labels for [`BOOTSTRAP_FEATURES`].
pub const BOOTSTRAP_LABELS: [Adjustment; 5] = [
    Adjustment::Increase,
    Adjustment::Decrease,
    Adjustment::Increase,
    Adjustment::Decrease,
    Adjustment::Increase,
];

/// Classifier output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Adjustment {
    Increase,
    Decrease,
}

impl Adjustment {
    fn target(self) -> f64 {
        match self {
            Adjustment::Increase => 1.0,
            Adjustment::Decrease => 0.0,
        }
    }
}

/// Gradient-descent settings for the bootstrap fit.
#[derive(Debug, Clone, Copy)]
pub struct FitParams {
    /// Inverse L2 regularization strength.
    pub c: f64,
    pub learning_rate: f64,
    pub iterations: usize,
}

impl Default for FitParams {
    fn default() -> Self {
        Self {
            c: 1.0,
            learning_rate: 0.1,
            iterations: 2000,
        }
    }
}

/// Per-feature zero-mean/unit-variance transform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: [f64; DIM],
    pub std: [f64; DIM],
}

impl StandardScaler {
    /// Fit population statistics. Constant features get a unit scale.
    pub fn fit(rows: &[[f64; DIM]]) -> Self {
        let n = rows.len().max(1) as f64;
        let mut mean = [0.0; DIM];
        let mut std = [0.0; DIM];
        for j in 0..DIM {
            mean[j] = rows.iter().map(|r| r[j]).sum::<f64>() / n;
            let var = rows.iter().map(|r| (r[j] - mean[j]).powi(2)).sum::<f64>() / n;
            std[j] = if var > f64::EPSILON { var.sqrt() } else { 1.0 };
        }
        Self { mean, std }
    }

    pub fn transform(&self, row: &[f64; DIM]) -> [f64; DIM] {
        let mut out = [0.0; DIM];
        for j in 0..DIM {
            out[j] = (row[j] - self.mean[j]) / self.std[j];
        }
        out
    }
}

/// Linear boundary over standardized features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticModel {
    pub weights: [f64; DIM],
    pub bias: f64,
}

impl LogisticModel {
    /// Deterministic full-batch gradient descent from a zero start.
    ///
    /// Minimizes `0.5 * |w|^2 + C * sum(logloss)`; the bias is unregularized.
    pub fn fit(rows: &[[f64; DIM]], targets: &[f64], params: FitParams) -> Self {
        let mut model = Self {
            weights: [0.0; DIM],
            bias: 0.0,
        };
        for _ in 0..params.iterations {
            let mut grad_w = model.weights;
            let mut grad_b = 0.0;
            for (row, target) in rows.iter().zip(targets) {
                let err = model.probability(row) - target;
                for j in 0..DIM {
                    grad_w[j] += params.c * err * row[j];
                }
                grad_b += params.c * err;
            }
            for j in 0..DIM {
                model.weights[j] -= params.learning_rate * grad_w[j];
            }
            model.bias -= params.learning_rate * grad_b;
        }
        model
    }

    pub fn decision(&self, row: &[f64; DIM]) -> f64 {
        self.weights
            .iter()
            .zip(row.iter())
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + self.bias
    }

    pub fn probability(&self, row: &[f64; DIM]) -> f64 {
        sigmoid(self.decision(row))
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// The fitted increase/decrease classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifficultyClassifier {
    scaler: StandardScaler,
    model: LogisticModel,
}

impl DifficultyClassifier {
    /// Fit on the built-in bootstrap rows.
    pub fn bootstrap() -> Result<Self, CoreError> {
        Self::fit(&BOOTSTRAP_FEATURES, &BOOTSTRAP_LABELS, FitParams::default())
    }

    /// Fit on arbitrary labelled rows and require perfect separation of them.
    pub fn fit(
        rows: &[[f64; DIM]],
        labels: &[Adjustment],
        params: FitParams,
    ) -> Result<Self, CoreError> {
        let scaler = StandardScaler::fit(rows);
        let scaled: Vec<[f64; DIM]> = rows.iter().map(|r| scaler.transform(r)).collect();
        let targets: Vec<f64> = labels.iter().map(|l| l.target()).collect();
        let model = LogisticModel::fit(&scaled, &targets, params);

        let classifier = Self { scaler, model };
        let misclassified = rows
            .iter()
            .zip(labels)
            .filter(|(row, label)| classifier.predict_row(row) != **label)
            .count();
        if misclassified > 0 || rows.len() != labels.len() {
            return Err(CoreError::ClassifierFit { misclassified });
        }

        tracing::debug!(
            weights = ?classifier.model.weights,
            bias = classifier.model.bias,
            "difficulty classifier fitted"
        );
        Ok(classifier)
    }

    /// Probability that difficulty should increase.
    pub fn probability(&self, features: &FeatureVector) -> f64 {
        self.model
            .probability(&self.scaler.transform(&features.to_array()))
    }

    pub fn predict(&self, features: &FeatureVector) -> Adjustment {
        self.predict_row(&features.to_array())
    }

    fn predict_row(&self, row: &[f64; DIM]) -> Adjustment {
        if self.model.decision(&self.scaler.transform(row)) >= 0.0 {
            Adjustment::Increase
        } else {
            Adjustment::Decrease
        }
    }

    pub fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }

    pub fn model(&self) -> &LogisticModel {
        &self.model
    }
}
