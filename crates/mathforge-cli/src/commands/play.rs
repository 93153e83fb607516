//! The `mathforge play` command: an interactive quiz session.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;

use mathforge_core::model::{parse_answer, Difficulty, Problem};

use crate::config::{load_config_from, PolicyKind};
use crate::report::{print_summary, SessionReport};
use crate::session::{run_session, Learner};

/// Learner backed by the terminal: prompts on stdout, reads answers from
/// stdin, and re-prompts until the input parses as a number.
struct InteractiveLearner {
    stdin: io::StdinLock<'static>,
}

impl InteractiveLearner {
    fn new() -> Self {
        Self {
            stdin: io::stdin().lock(),
        }
    }
}

impl Learner for InteractiveLearner {
    fn answer(&mut self, problem: &Problem, index: usize, total: usize) -> Result<(f64, f64)> {
        println!("\n--- Question {index}/{total} ({}) ---", problem.difficulty);
        println!("{problem}");
        let start = Instant::now();
        loop {
            print!("Your answer: ");
            io::stdout().flush()?;
            let mut line = String::new();
            let read = self.stdin.read_line(&mut line)?;
            anyhow::ensure!(read > 0, "input closed before the session finished");
            match parse_answer(&line) {
                Ok(value) => return Ok((value, start.elapsed().as_secs_f64())),
                // Malformed input never reaches the tracker; just re-prompt.
                Err(e) => println!("{e}"),
            }
        }
    }

    fn on_feedback(&mut self, problem: &Problem, correct: bool) {
        if correct {
            println!("Correct!");
        } else {
            println!("Incorrect. The answer was {}", problem.answer);
        }
    }

    fn on_difficulty_change(&mut self, from: Difficulty, to: Difficulty) {
        println!("Difficulty adjusted: {from} -> {to}");
    }
}

#[allow(clippy::too_many_arguments)]
pub fn execute(
    difficulty: Option<Difficulty>,
    problems: Option<usize>,
    policy: Option<PolicyKind>,
    seed: Option<u64>,
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
    if seed.is_some() {
        config.seed = seed;
    }

    println!(
        "mathforge — {} problems, starting at {}",
        config.problems, config.start_difficulty
    );

    let mut learner = InteractiveLearner::new();
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
