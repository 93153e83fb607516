//! Core data model types for mathforge.
//!
//! These are the fundamental types the entire engine uses to represent
//! difficulty tiers, problems, attempt records, and derived statistics.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Absolute tolerance used when comparing a submitted answer against the
/// correct one, absorbing floating-point error on division results.
pub const ANSWER_TOLERANCE: f64 = 0.01;

/// One of the three ordered difficulty tiers.
///
/// The core uses this enum everywhere; numeric levels (1..=3) and lowercase
/// string tags exist only at the driver boundary.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Numeric level, 1 (Easy) through 3 (Hard).
    pub fn level(self) -> u8 {
        match self {
            Difficulty::Easy => 1,
            Difficulty::Medium => 2,
            Difficulty::Hard => 3,
        }
    }

    /// Parse a numeric level. Out-of-range values are rejected, never
    /// clamped.
    pub fn from_level(level: i64) -> Result<Self, CoreError> {
        match level {
            1 => Ok(Difficulty::Easy),
            2 => Ok(Difficulty::Medium),
            3 => Ok(Difficulty::Hard),
            other => Err(CoreError::InvalidDifficulty(other)),
        }
    }

    /// One step harder, saturating at Hard.
    pub fn step_up(self) -> Self {
        match self {
            Difficulty::Easy => Difficulty::Medium,
            Difficulty::Medium | Difficulty::Hard => Difficulty::Hard,
        }
    }

    /// One step easier, saturating at Easy.
    pub fn step_down(self) -> Self {
        match self {
            Difficulty::Hard => Difficulty::Medium,
            Difficulty::Medium | Difficulty::Easy => Difficulty::Easy,
        }
    }

    /// All tiers in ascending order.
    pub fn all() -> [Difficulty; 3] {
        [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard]
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::Hard => write!(f, "hard"),
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "easy" | "1" => Ok(Difficulty::Easy),
            "medium" | "2" => Ok(Difficulty::Medium),
            "hard" | "3" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty: {other}")),
        }
    }
}

/// An arithmetic operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
}

impl Operator {
    /// Evaluate `a op b`.
    pub fn apply(self, a: i32, b: i32) -> f64 {
        match self {
            Operator::Add => (a + b) as f64,
            Operator::Sub => (a - b) as f64,
            Operator::Mul => (a * b) as f64,
            Operator::Div => a as f64 / b as f64,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operator::Add => write!(f, "+"),
            Operator::Sub => write!(f, "-"),
            Operator::Mul => write!(f, "*"),
            Operator::Div => write!(f, "/"),
        }
    }
}

/// A single arithmetic problem. Immutable once created.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Problem {
    pub operand1: i32,
    pub operand2: i32,
    pub operator: Operator,
    /// Precomputed correct answer.
    pub answer: f64,
    /// The tier this problem was generated for.
    pub difficulty: Difficulty,
}

impl Problem {
    /// Textual form, e.g. `"12 * 3"`.
    pub fn text(&self) -> String {
        format!("{} {} {}", self.operand1, self.operator, self.operand2)
    }

    /// Check a submitted answer against the correct one with a small
    /// numeric tolerance.
    pub fn check(&self, submitted: f64) -> bool {
        (submitted - self.answer).abs() < ANSWER_TOLERANCE
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = ?", self.text())
    }
}

/// Parse a learner-submitted answer into a number.
///
/// The driver calls this before `record`; a failure means re-prompt, and the
/// tracker never sees malformed input.
pub fn parse_answer(input: &str) -> Result<f64, CoreError> {
    let trimmed = input.trim();
    trimmed
        .parse::<f64>()
        .map_err(|_| CoreError::InvalidAnswerFormat(trimmed.to_string()))
}

/// One answered problem, as stored by the tracker. Immutable for the life
/// of the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttemptRecord {
    /// Textual form of the problem (e.g. "5 + 3").
    pub problem: String,
    /// The learner's submitted answer.
    pub submitted: f64,
    /// The correct answer.
    pub correct_answer: f64,
    /// Whether the submitted answer matched within tolerance.
    pub correct: bool,
    /// Response latency in seconds.
    pub elapsed_secs: f64,
    /// The tier active when the problem was posed.
    pub difficulty: Difficulty,
}

/// Rolling statistics over a window of recent attempts.
///
/// `accuracy` is a percentage (0–100); `avg_time` is in seconds. Exactly one
/// of the two streak counters is non-zero for a non-empty window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowStats {
    pub accuracy: f64,
    pub avg_time: f64,
    pub correct_streak: u32,
    pub incorrect_streak: u32,
    /// Number of attempts actually in the window.
    pub recent_problems: usize,
    /// -1 declining, 0 stable, 1 improving. Only non-zero when the window
    /// holds at least 4 attempts.
    pub trend: i8,
}

impl WindowStats {
    /// Neutral defaults returned for an empty history.
    pub fn neutral() -> Self {
        Self {
            accuracy: 0.0,
            avg_time: 0.0,
            correct_streak: 0,
            incorrect_streak: 0,
            recent_problems: 0,
            trend: 0,
        }
    }
}
