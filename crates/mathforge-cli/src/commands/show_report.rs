//! The `mathforge show-report` command: render a saved session report.

use std::path::PathBuf;

use anyhow::Result;

use crate::report::{print_summary, SessionReport};

pub fn execute(path: PathBuf) -> Result<()> {
    let report = SessionReport::load_json(&path)?;

    println!("Session {}", report.id);
    println!("  finished: {}", report.created_at.to_rfc3339());
    println!("  policy:   {:?}", report.policy);
    match report.seed {
        Some(seed) => println!("  seed:     {seed}"),
        None => println!("  seed:     none"),
    }
    println!("  attempts: {}", report.attempts.len());

    print_summary(&report.summary);

    Ok(())
}
