//! The session driver loop.
//!
//! Generates a problem, collects an answer from a [`Learner`], scores and
//! records it, then consults the adaptation policy for the next tier until
//! the fixed problem count is reached.

use anyhow::{Context, Result};

use mathforge_core::model::{Difficulty, Problem};
use mathforge_core::tracker::SessionSummary;
use mathforge_core::{AdaptationPolicy, ModelPolicy, PerformanceTracker, ProblemGenerator, RulePolicy};

use crate::config::{MathforgeConfig, PolicyKind};

/// Source of answers for a session: the interactive prompt or a simulated
/// learner. Implementations report their own response latency.
pub trait Learner {
    /// Answer one problem, returning the numeric answer and the elapsed
    /// response time in seconds.
    fn answer(&mut self, problem: &Problem, index: usize, total: usize) -> Result<(f64, f64)>;

    /// Called after each answer is scored.
    fn on_feedback(&mut self, _problem: &Problem, _correct: bool) {}

    /// Called when the policy shifts the difficulty tier.
    fn on_difficulty_change(&mut self, _from: Difficulty, _to: Difficulty) {}
}

/// Outcome of a completed session.
pub struct SessionOutcome {
    pub tracker: PerformanceTracker,
    pub summary: SessionSummary,
}

/// Construct the configured adaptation policy.
pub fn build_policy(kind: PolicyKind) -> Box<dyn AdaptationPolicy> {
    match kind {
        PolicyKind::Rules => Box::new(RulePolicy::new()),
        PolicyKind::Model => Box::new(ModelPolicy::new()),
    }
}

/// Run one fixed-length session.
pub fn run_session(config: &MathforgeConfig, learner: &mut dyn Learner) -> Result<SessionOutcome> {
    let mut generator = match config.seed {
        Some(seed) => ProblemGenerator::seeded(seed),
        None => ProblemGenerator::new(),
    };
    let mut policy = build_policy(config.policy);
    let mut tracker = PerformanceTracker::new();
    let mut current = config.start_difficulty;

    tracing::info!(
        problems = config.problems,
        policy = ?config.policy,
        start = %current,
        "starting session"
    );

    for index in 0..config.problems {
        let problem = generator.generate(current);
        let (submitted, elapsed_secs) = learner.answer(&problem, index + 1, config.problems)?;
        let correct = problem.check(submitted);
        learner.on_feedback(&problem, correct);

        tracker.record(
            problem.text(),
            submitted,
            problem.answer,
            correct,
            elapsed_secs,
            current,
        );

        // The policy needs a few answers before it has anything to say.
        if index >= 2 {
            let stats = tracker.recent_performance(config.window);
            let next = policy.next_difficulty(&stats, current);
            if next != current {
                learner.on_difficulty_change(current, next);
                tracing::info!(from = %current, to = %next, "difficulty adjusted");
            }
            current = next;
        }
    }

    let mut summary = tracker
        .summary()
        .context("session produced no attempts")?;
    summary.model_info = Some(policy.model_info());

    Ok(SessionOutcome { tracker, summary })
}
