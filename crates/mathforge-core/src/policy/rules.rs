//! Deterministic threshold policy.
//!
//! Blends window accuracy (70%) with a response-speed score (30%) into a
//! composite performance score and walks a fixed transition table.

use crate::model::{Difficulty, WindowStats};
use crate::policy::{AdaptationPolicy, ModelInfo};

/// Mean latency treated as "too slow": a 15 second answer scores zero speed.
const SLOW_BASELINE_SECS: f64 = 15.0;

/// Threshold table for tier transitions.
#[derive(Debug, Clone, Copy)]
pub struct Thresholds {
    /// Minimum window accuracy (fraction) to advance a tier.
    pub advance_accuracy: f64,
    /// Minimum composite score to advance out of Easy.
    pub advance_performance: f64,
    /// Accuracy floor (fraction) below which a tier is demoted.
    pub demote_accuracy: f64,
    /// Composite floor below which Medium demotes to Easy.
    pub demote_performance: f64,
    /// Composite score required to advance from Medium to Hard.
    pub high_performance: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            advance_accuracy: 0.67,
            advance_performance: 0.75,
            demote_accuracy: 0.34,
            demote_performance: 0.40,
            high_performance: 0.80,
        }
    }
}

/// Rule-based adaptation policy.
#[derive(Debug, Default)]
pub struct RulePolicy {
    thresholds: Thresholds,
    decisions: u64,
}

impl RulePolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_thresholds(thresholds: Thresholds) -> Self {
        Self {
            thresholds,
            decisions: 0,
        }
    }

    /// Composite performance score: accuracy fraction weighted 70%, speed
    /// score 30%. Returns `(accuracy_fraction, speed_score, composite)`.
    pub fn performance_score(stats: &WindowStats) -> (f64, f64, f64) {
        let accuracy = stats.accuracy / 100.0;
        let speed = (1.0 - stats.avg_time / SLOW_BASELINE_SECS).clamp(0.0, 1.0);
        let composite = accuracy * 0.7 + speed * 0.3;
        (accuracy, speed, composite)
    }
}

impl AdaptationPolicy for RulePolicy {
    fn next_difficulty(&mut self, stats: &WindowStats, current: Difficulty) -> Difficulty {
        // Insufficient evidence: hold the current tier.
        if stats.recent_problems < 2 {
            return current;
        }

        self.decisions += 1;
        let (accuracy, _speed, perf) = Self::performance_score(stats);
        let t = &self.thresholds;

        let next = match current {
            Difficulty::Easy => {
                if perf > t.advance_performance && accuracy >= t.advance_accuracy {
                    Difficulty::Medium
                } else {
                    current
                }
            }
            Difficulty::Medium => {
                if perf > t.high_performance && accuracy >= t.advance_accuracy {
                    Difficulty::Hard
                } else if perf < t.demote_performance || accuracy < t.demote_accuracy {
                    Difficulty::Easy
                } else {
                    current
                }
            }
            Difficulty::Hard => {
                if perf < 0.5 || accuracy < t.demote_accuracy {
                    Difficulty::Medium
                } else {
                    current
                }
            }
        };

        if next != current {
            tracing::debug!(%current, %next, perf, accuracy, "rule policy transition");
        }
        next
    }

    fn model_info(&self) -> ModelInfo {
        ModelInfo {
            kind: "rule-based".to_string(),
            predictions_made: self.decisions,
            last_confidence: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(accuracy: f64, avg_time: f64, n: usize) -> WindowStats {
        WindowStats {
            accuracy,
            avg_time,
            correct_streak: 0,
            incorrect_streak: 0,
            recent_problems: n,
            trend: 0,
        }
    }

    #[test]
    fn holds_with_insufficient_evidence() {
        let mut policy = RulePolicy::new();
        let s = stats(100.0, 1.0, 1);
        assert_eq!(policy.next_difficulty(&s, Difficulty::Easy), Difficulty::Easy);
    }

    #[test]
    fn strong_easy_window_promotes_to_medium() {
        // 90% accuracy at 3s: speed 0.8, composite 0.87.
        let mut policy = RulePolicy::new();
        let s = stats(90.0, 3.0, 3);
        assert_eq!(
            policy.next_difficulty(&s, Difficulty::Easy),
            Difficulty::Medium
        );
    }

    #[test]
    fn weak_hard_window_demotes_to_medium() {
        // 20% accuracy at 12s: speed 0.2, composite 0.2.
        let mut policy = RulePolicy::new();
        let s = stats(20.0, 12.0, 3);
        assert_eq!(
            policy.next_difficulty(&s, Difficulty::Hard),
            Difficulty::Medium
        );
    }

    #[test]
    fn medium_promotes_only_on_excellent_composite() {
        let mut policy = RulePolicy::new();
        // Composite 0.7*0.9 + 0.3*0.8 = 0.87 > 0.80.
        assert_eq!(
            policy.next_difficulty(&stats(90.0, 3.0, 3), Difficulty::Medium),
            Difficulty::Hard
        );
        // Composite 0.7*0.7 + 0.3*0.8 = 0.73: stays.
        assert_eq!(
            policy.next_difficulty(&stats(70.0, 3.0, 3), Difficulty::Medium),
            Difficulty::Medium
        );
    }

    #[test]
    fn medium_demotes_when_struggling() {
        let mut policy = RulePolicy::new();
        assert_eq!(
            policy.next_difficulty(&stats(30.0, 10.0, 3), Difficulty::Medium),
            Difficulty::Easy
        );
    }

    #[test]
    fn easy_never_demotes_hard_never_promotes() {
        let mut policy = RulePolicy::new();
        assert_eq!(
            policy.next_difficulty(&stats(0.0, 15.0, 3), Difficulty::Easy),
            Difficulty::Easy
        );
        assert_eq!(
            policy.next_difficulty(&stats(100.0, 1.0, 3), Difficulty::Hard),
            Difficulty::Hard
        );
    }

    #[test]
    fn increasing_accuracy_never_decreases_difficulty() {
        for current in Difficulty::all() {
            let mut policy = RulePolicy::new();
            let mut last_level = 0;
            for accuracy in (0..=100).step_by(5) {
                let next =
                    policy.next_difficulty(&stats(accuracy as f64, 6.0, 3), current);
                assert!(
                    next.level() >= last_level,
                    "difficulty dropped from {last_level} at accuracy {accuracy} ({current})"
                );
                last_level = next.level();
            }
        }
    }

    #[test]
    fn model_info_reports_decision_count() {
        let mut policy = RulePolicy::new();
        policy.next_difficulty(&stats(50.0, 5.0, 3), Difficulty::Medium);
        policy.next_difficulty(&stats(50.0, 5.0, 3), Difficulty::Medium);
        let info = policy.model_info();
        assert_eq!(info.kind, "rule-based");
        assert_eq!(info.predictions_made, 2);
        assert!(info.last_confidence.is_none());
    }
}
