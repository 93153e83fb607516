//! The `mathforge simulate` command: a non-interactive session with a
//! scripted learner, used for demos and CI smoke tests.

use std::path::PathBuf;

use anyhow::Result;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

use mathforge_core::model::{Difficulty, Problem};

use crate::config::{load_config_from, PolicyKind};
use crate::report::{print_summary, SessionReport};
use crate::session::{run_session, Learner};

/// How capable the simulated learner is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Profile {
    /// Fast and accurate.
    Strong,
    /// Middling accuracy and pace.
    Average,
    /// Slow with frequent mistakes.
    Weak,
}

impl Profile {
    /// (probability of a correct answer, latency range in seconds)
    fn parameters(self) -> (f64, std::ops::RangeInclusive<f64>) {
        match self {
            Profile::Strong => (0.9, 2.0..=5.0),
            Profile::Average => (0.65, 5.0..=8.0),
            Profile::Weak => (0.3, 8.0..=15.0),
        }
    }
}

/// Deterministic scripted learner.
struct SimulatedLearner {
    profile: Profile,
    rng: ChaCha20Rng,
}

impl SimulatedLearner {
    fn new(profile: Profile, seed: u64) -> Self {
        Self {
            profile,
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }
}

impl Learner for SimulatedLearner {
    fn answer(&mut self, problem: &Problem, index: usize, total: usize) -> Result<(f64, f64)> {
        let (p_correct, latency) = self.profile.parameters();
        let elapsed = self.rng.gen_range(latency);
        let submitted = if self.rng.gen_bool(p_correct) {
            problem.answer
        } else {
            problem.answer + self.rng.gen_range(1..=10) as f64
        };
        tracing::info!(
            question = index,
            total,
            problem = %problem.text(),
            submitted,
            "simulated answer"
        );
        Ok((submitted, elapsed))
    }

    fn on_difficulty_change(&mut self, from: Difficulty, to: Difficulty) {
        tracing::info!(%from, %to, "difficulty adjusted");
    }
}

#[allow(clippy::too_many_arguments)]
pub fn execute(
    profile: Profile,
    difficulty: Option<Difficulty>,
    problems: Option<usize>,
    policy: Option<PolicyKind>,
    seed: u64,
    config_path: Option<PathBuf>,
    save_report: Option<PathBuf>,
) -> Result<()> {
    let mut config = load_config_from(config_path.as_deref())?;
    if let Some(d) = difficulty {
        config.start_difficulty = d;
    }
    if let Some(n) = problems {
        anyhow::ensure!(n >= 1, "problems must be at least 1");
        config.problems = n;
    }
    if let Some(p) = policy {
        config.policy = p;
    }
    // The generator and the learner share the seed for full reproducibility.
    config.seed = Some(seed);

    println!(
        "Simulating a {:?} learner over {} problems (seed {seed})",
        profile, config.problems
    );

    let mut learner = SimulatedLearner::new(profile, seed);
    let outcome = run_session(&config, &mut learner)?;
    print_summary(&outcome.summary);

    if let Some(path) = save_report {
        let report = SessionReport::new(
            config.policy,
            config.seed,
            outcome.tracker.history().to_vec(),
            outcome.summary,
        );
        report.save_json(&path)?;
        println!("\nSaved report to {}", path.display());
    }

    Ok(())
}
