//! Difficulty-adaptation policies.
//!
//! Two interchangeable strategies decide the next tier from a window of
//! recent performance: a deterministic threshold policy and a pretrained
//! softmax classifier with a rule-based cold-start fallback. Both move at
//! most one step per decision.

mod classifier;
mod rules;

pub use classifier::ModelPolicy;
pub use rules::{RulePolicy, Thresholds};

use serde::{Deserialize, Serialize};

use crate::model::{Difficulty, WindowStats};

/// Strategy seam between the session driver and the adaptation logic.
pub trait AdaptationPolicy {
    /// Decide the tier for the next problem.
    ///
    /// Takes `&mut self` because the statistical variant records its
    /// prediction count and last confidence for observability.
    fn next_difficulty(&mut self, stats: &WindowStats, current: Difficulty) -> Difficulty;

    /// Observability block for reporting. No control flow depends on it.
    fn model_info(&self) -> ModelInfo;
}

/// Reporting-only information about a policy's decisions so far.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Human-readable policy kind, e.g. "rule-based" or "logistic-regression".
    pub kind: String,
    /// Decisions made through the full (non-fallback) path.
    pub predictions_made: u64,
    /// Winning-class probability of the most recent classification, if any.
    pub last_confidence: Option<f64>,
}
