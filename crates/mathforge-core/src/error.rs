//! Core error types.
//!
//! All core operations are total over well-formed input; the only failures
//! are input-validation errors at the boundary, surfaced immediately to the
//! caller.

use thiserror::Error;

/// Errors produced by the core quiz engine.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A numeric difficulty level outside 1..=3 was passed at the boundary.
    #[error("invalid difficulty level: {0} (expected 1, 2, or 3)")]
    InvalidDifficulty(i64),

    /// A submitted answer could not be parsed as a number.
    ///
    /// The session driver catches this before `record` is ever called; the
    /// tracker itself only sees well-formed numeric answers.
    #[error("answer is not a number: '{0}'")]
    InvalidAnswerFormat(String),
}

impl CoreError {
    /// Returns `true` if the error is recoverable by re-prompting the
    /// learner, as opposed to a caller bug.
    pub fn is_retryable(&self) -> bool {
        matches!(self, CoreError::InvalidAnswerFormat(_))
    }
}
