//! Per-session performance tracking.
//!
//! The tracker exclusively owns the append-only attempt log and derives the
//! rolling window statistics the adaptation policies consume, plus the
//! full-session summary rendered at the end.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::model::{AttemptRecord, Difficulty, WindowStats};
use crate::policy::ModelInfo;

/// Correct/total counts for a single difficulty tier.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TierPerformance {
    pub correct: u32,
    pub total: u32,
}

/// Aggregate over the full session history, computed on demand at session
/// end. Not persisted by the core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    pub total: u32,
    pub correct: u32,
    pub incorrect: u32,
    /// Percentage, 0–100.
    pub accuracy: f64,
    /// Mean response latency in seconds.
    pub avg_time: f64,
    /// Problems posed per tier.
    pub difficulty_distribution: HashMap<Difficulty, u32>,
    /// Adjacent-record difficulty flips over the session.
    pub difficulty_changes: u32,
    /// Tier of the last attempt.
    pub final_difficulty: Difficulty,
    /// Suggested starting tier for a follow-up session.
    pub recommended_difficulty: Difficulty,
    pub performance_by_difficulty: HashMap<Difficulty, TierPerformance>,
    /// Observability block from the active policy, attached by the driver.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_info: Option<ModelInfo>,
}

/// Append-only log of attempts with derived statistics.
#[derive(Debug, Default)]
pub struct PerformanceTracker {
    history: Vec<AttemptRecord>,
    difficulty_changes: u32,
}

impl PerformanceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one attempt.
    ///
    /// Bumps the difficulty-change counter when this attempt's tier differs
    /// from the previous attempt's; the very first record never counts.
    #[allow(clippy::too_many_arguments)]
    pub fn record(
        &mut self,
        problem: impl Into<String>,
        submitted: f64,
        correct_answer: f64,
        correct: bool,
        elapsed_secs: f64,
        difficulty: Difficulty,
    ) {
        if let Some(last) = self.history.last() {
            if last.difficulty != difficulty {
                self.difficulty_changes += 1;
                tracing::debug!(
                    from = %last.difficulty,
                    to = %difficulty,
                    "difficulty changed"
                );
            }
        }
        self.history.push(AttemptRecord {
            problem: problem.into(),
            submitted,
            correct_answer,
            correct,
            elapsed_secs,
            difficulty,
        });
    }

    /// Full attempt history, oldest first.
    pub fn history(&self) -> &[AttemptRecord] {
        &self.history
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Rolling statistics over the last `n` attempts (or the whole history
    /// if shorter). An empty history yields [`WindowStats::neutral`].
    pub fn recent_performance(&self, n: usize) -> WindowStats {
        if self.history.is_empty() {
            return WindowStats::neutral();
        }

        let start = self.history.len().saturating_sub(n.max(1));
        let recent = &self.history[start..];
        let total = recent.len();
        let correct_count = recent.iter().filter(|r| r.correct).count();
        let accuracy = correct_count as f64 / total as f64 * 100.0;
        let avg_time = recent.iter().map(|r| r.elapsed_secs).sum::<f64>() / total as f64;

        // Streaks: the most recent outcome decides which counter runs; the
        // scan stops at the first flip, so exactly one counter is non-zero.
        let mut correct_streak = 0;
        let mut incorrect_streak = 0;
        if let Some(last) = recent.last() {
            if last.correct {
                correct_streak = recent.iter().rev().take_while(|r| r.correct).count() as u32;
            } else {
                incorrect_streak = recent.iter().rev().take_while(|r| !r.correct).count() as u32;
            }
        }

        // Trend: first half vs second half of the window, only meaningful
        // with at least 4 attempts.
        let mut trend = 0;
        if total >= 4 {
            let mid = total / 2;
            let half_accuracy = |slice: &[AttemptRecord]| {
                slice.iter().filter(|r| r.correct).count() as f64 / slice.len() as f64
            };
            let first = half_accuracy(&recent[..mid]);
            let second = half_accuracy(&recent[mid..]);
            if second > first + 0.2 {
                trend = 1;
            } else if second < first - 0.2 {
                trend = -1;
            }
        }

        WindowStats {
            accuracy,
            avg_time,
            correct_streak,
            incorrect_streak,
            recent_problems: total,
            trend,
        }
    }

    /// Full-session summary, or `None` before any attempt was recorded.
    pub fn summary(&self) -> Option<SessionSummary> {
        let last = self.history.last()?;
        let total = self.history.len() as u32;
        let correct = self.history.iter().filter(|r| r.correct).count() as u32;
        let accuracy = correct as f64 / total as f64 * 100.0;
        let avg_time =
            self.history.iter().map(|r| r.elapsed_secs).sum::<f64>() / total as f64;

        let mut difficulty_distribution: HashMap<Difficulty, u32> =
            Difficulty::all().iter().map(|&d| (d, 0)).collect();
        let mut performance_by_difficulty: HashMap<Difficulty, TierPerformance> =
            Difficulty::all()
                .iter()
                .map(|&d| (d, TierPerformance::default()))
                .collect();
        for record in &self.history {
            *difficulty_distribution.entry(record.difficulty).or_default() += 1;
            let tier = performance_by_difficulty
                .entry(record.difficulty)
                .or_default();
            tier.total += 1;
            if record.correct {
                tier.correct += 1;
            }
        }

        let final_difficulty = last.difficulty;
        let recent = self.recent_performance(3);
        let recommended_difficulty = if recent.accuracy >= 80.0 {
            final_difficulty.step_up()
        } else if recent.accuracy < 50.0 {
            final_difficulty.step_down()
        } else {
            final_difficulty
        };

        Some(SessionSummary {
            total,
            correct,
            incorrect: total - correct,
            accuracy,
            avg_time,
            difficulty_distribution,
            difficulty_changes: self.difficulty_changes,
            final_difficulty,
            recommended_difficulty,
            performance_by_difficulty,
            model_info: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_outcomes(tracker: &mut PerformanceTracker, outcomes: &[bool]) {
        for (i, &ok) in outcomes.iter().enumerate() {
            tracker.record(
                format!("{i} + 1"),
                if ok { (i + 1) as f64 } else { 0.0 },
                (i + 1) as f64,
                ok,
                3.0,
                Difficulty::Easy,
            );
        }
    }

    /// The 7-attempt fixture from the reference session.
    fn fixture_tracker() -> PerformanceTracker {
        let rows: [(&str, f64, f64, bool, f64, Difficulty); 7] = [
            ("5 + 3", 8.0, 8.0, true, 3.2, Difficulty::Easy),
            ("7 - 2", 5.0, 5.0, true, 2.8, Difficulty::Easy),
            ("9 + 1", 10.0, 10.0, true, 2.1, Difficulty::Easy),
            ("15 + 8", 23.0, 23.0, true, 4.5, Difficulty::Medium),
            ("12 * 3", 36.0, 36.0, true, 5.2, Difficulty::Medium),
            ("20 - 7", 12.0, 13.0, false, 8.3, Difficulty::Medium),
            ("25 + 15", 40.0, 40.0, true, 6.1, Difficulty::Medium),
        ];
        let mut tracker = PerformanceTracker::new();
        for (problem, submitted, correct_answer, correct, elapsed, difficulty) in rows {
            tracker.record(problem, submitted, correct_answer, correct, elapsed, difficulty);
        }
        tracker
    }

    #[test]
    fn empty_history_is_neutral() {
        let tracker = PerformanceTracker::new();
        assert_eq!(tracker.recent_performance(3), WindowStats::neutral());
        assert!(tracker.summary().is_none());
    }

    #[test]
    fn recent_performance_is_idempotent() {
        let mut tracker = PerformanceTracker::new();
        record_outcomes(&mut tracker, &[true, false, true]);
        let a = tracker.recent_performance(3);
        let b = tracker.recent_performance(3);
        assert_eq!(a, b);
    }

    #[test]
    fn window_shorter_than_history_uses_last_n() {
        let mut tracker = PerformanceTracker::new();
        record_outcomes(&mut tracker, &[false, false, true, true, true]);
        let stats = tracker.recent_performance(3);
        assert_eq!(stats.recent_problems, 3);
        assert_eq!(stats.accuracy, 100.0);
    }

    #[test]
    fn streaks_stop_at_first_flip() {
        let mut tracker = PerformanceTracker::new();
        record_outcomes(&mut tracker, &[true, true, false, true]);
        let stats = tracker.recent_performance(4);
        assert_eq!(stats.correct_streak, 1);
        assert_eq!(stats.incorrect_streak, 0);
    }

    #[test]
    fn incorrect_streak_counts_trailing_misses() {
        let mut tracker = PerformanceTracker::new();
        record_outcomes(&mut tracker, &[true, false, false]);
        let stats = tracker.recent_performance(3);
        assert_eq!(stats.correct_streak, 0);
        assert_eq!(stats.incorrect_streak, 2);
    }

    #[test]
    fn trend_detects_improvement() {
        let mut tracker = PerformanceTracker::new();
        record_outcomes(&mut tracker, &[false, false, true, true]);
        assert_eq!(tracker.recent_performance(4).trend, 1);
    }

    #[test]
    fn trend_detects_decline() {
        let mut tracker = PerformanceTracker::new();
        record_outcomes(&mut tracker, &[true, true, false, false]);
        assert_eq!(tracker.recent_performance(4).trend, -1);
    }

    #[test]
    fn trend_stable_when_uniform() {
        let mut tracker = PerformanceTracker::new();
        record_outcomes(&mut tracker, &[true, true, true, true]);
        assert_eq!(tracker.recent_performance(4).trend, 0);
    }

    #[test]
    fn trend_zero_below_four_records() {
        let mut tracker = PerformanceTracker::new();
        record_outcomes(&mut tracker, &[false, true, true]);
        assert_eq!(tracker.recent_performance(3).trend, 0);
    }

    #[test]
    fn difficulty_changes_ignore_first_record() {
        let mut tracker = PerformanceTracker::new();
        tracker.record("1 + 1", 2.0, 2.0, true, 1.0, Difficulty::Medium);
        tracker.record("2 + 2", 4.0, 4.0, true, 1.0, Difficulty::Medium);
        tracker.record("3 + 3", 6.0, 6.0, true, 1.0, Difficulty::Hard);
        tracker.record("4 + 4", 8.0, 8.0, false, 1.0, Difficulty::Medium);
        let summary = tracker.summary().unwrap();
        assert_eq!(summary.difficulty_changes, 2);
    }

    #[test]
    fn fixture_session_summary() {
        let tracker = fixture_tracker();
        let summary = tracker.summary().unwrap();
        assert_eq!(summary.total, 7);
        assert_eq!(summary.correct, 6);
        assert_eq!(summary.incorrect, 1);
        assert!((summary.accuracy - 85.714).abs() < 0.01);
        assert!((summary.avg_time - 4.6).abs() < 0.01);
        assert_eq!(summary.difficulty_changes, 1);
        assert_eq!(summary.final_difficulty, Difficulty::Medium);
        // Last three attempts run 2/3 correct: stay at medium.
        assert_eq!(summary.recommended_difficulty, Difficulty::Medium);
        assert_eq!(summary.difficulty_distribution[&Difficulty::Easy], 3);
        assert_eq!(summary.difficulty_distribution[&Difficulty::Medium], 4);
        assert_eq!(summary.difficulty_distribution[&Difficulty::Hard], 0);
        let medium = summary.performance_by_difficulty[&Difficulty::Medium];
        assert_eq!(medium.correct, 3);
        assert_eq!(medium.total, 4);
    }

    #[test]
    fn recommendation_steps_up_on_high_accuracy() {
        let mut tracker = PerformanceTracker::new();
        for _ in 0..3 {
            tracker.record("2 + 2", 4.0, 4.0, true, 2.0, Difficulty::Easy);
        }
        let summary = tracker.summary().unwrap();
        assert_eq!(summary.recommended_difficulty, Difficulty::Medium);
    }

    #[test]
    fn recommendation_steps_down_on_low_accuracy() {
        let mut tracker = PerformanceTracker::new();
        for _ in 0..3 {
            tracker.record("40 / 5", 9.0, 8.0, false, 9.0, Difficulty::Hard);
        }
        let summary = tracker.summary().unwrap();
        assert_eq!(summary.recommended_difficulty, Difficulty::Medium);
    }

    #[test]
    fn recommendation_saturates_at_hard() {
        let mut tracker = PerformanceTracker::new();
        for _ in 0..3 {
            tracker.record("40 / 5", 8.0, 8.0, true, 2.0, Difficulty::Hard);
        }
        let summary = tracker.summary().unwrap();
        assert_eq!(summary.recommended_difficulty, Difficulty::Hard);
    }
}
