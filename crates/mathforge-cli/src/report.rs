//! Session reports: JSON persistence and console rendering.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use comfy_table::{presets::UTF8_FULL, Cell, Table};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use mathforge_core::model::{AttemptRecord, Difficulty};
use mathforge_core::tracker::SessionSummary;

use crate::config::PolicyKind;

/// A persisted record of one completed session. Driver-side convenience;
/// the core itself never touches the filesystem.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    /// Unique session identifier.
    pub id: Uuid,
    /// When the session finished.
    pub created_at: DateTime<Utc>,
    /// Policy that drove the session.
    pub policy: PolicyKind,
    /// Seed used, if the session was reproducible.
    pub seed: Option<u64>,
    /// Every attempt, oldest first.
    pub attempts: Vec<AttemptRecord>,
    /// Full-session aggregate.
    pub summary: SessionSummary,
}

impl SessionReport {
    pub fn new(
        policy: PolicyKind,
        seed: Option<u64>,
        attempts: Vec<AttemptRecord>,
        summary: SessionSummary,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            policy,
            seed,
            attempts,
            summary,
        }
    }

    /// Save the report as JSON.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        serde_json::from_str(&content).context("failed to parse report JSON")
    }
}

/// Render the session summary as a console table.
pub fn summary_table(summary: &SessionSummary) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Metric", "Value"]);
    table.add_row(vec![
        Cell::new("Problems"),
        Cell::new(summary.total.to_string()),
    ]);
    table.add_row(vec![
        Cell::new("Correct"),
        Cell::new(format!("{} / {}", summary.correct, summary.total)),
    ]);
    table.add_row(vec![
        Cell::new("Accuracy"),
        Cell::new(format!("{:.1}%", summary.accuracy)),
    ]);
    table.add_row(vec![
        Cell::new("Avg response time"),
        Cell::new(format!("{:.1}s", summary.avg_time)),
    ]);
    table.add_row(vec![
        Cell::new("Difficulty changes"),
        Cell::new(summary.difficulty_changes.to_string()),
    ]);
    table.add_row(vec![
        Cell::new("Final difficulty"),
        Cell::new(summary.final_difficulty.to_string()),
    ]);
    table.add_row(vec![
        Cell::new("Recommended next"),
        Cell::new(summary.recommended_difficulty.to_string()),
    ]);
    table
}

/// Render the per-tier correct/total breakdown.
pub fn breakdown_table(summary: &SessionSummary) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Difficulty", "Posed", "Correct"]);
    for difficulty in Difficulty::all() {
        let posed = summary
            .difficulty_distribution
            .get(&difficulty)
            .copied()
            .unwrap_or(0);
        let tier = summary
            .performance_by_difficulty
            .get(&difficulty)
            .copied()
            .unwrap_or_default();
        table.add_row(vec![
            Cell::new(difficulty.to_string()),
            Cell::new(posed.to_string()),
            Cell::new(format!("{} / {}", tier.correct, tier.total)),
        ]);
    }
    table
}

/// Print the full end-of-session summary to stdout.
pub fn print_summary(summary: &SessionSummary) {
    println!("\nSession Summary");
    println!("{}", summary_table(summary));
    println!("\nBy difficulty");
    println!("{}", breakdown_table(summary));
    if let Some(info) = &summary.model_info {
        match info.last_confidence {
            Some(confidence) => println!(
                "\nPolicy: {} ({} predictions, last confidence {:.0}%)",
                info.kind,
                info.predictions_made,
                confidence * 100.0
            ),
            None => println!(
                "\nPolicy: {} ({} decisions)",
                info.kind, info.predictions_made
            ),
        }
    }
}
