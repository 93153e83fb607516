//! mathforge CLI — adaptive arithmetic quiz sessions in the terminal.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use mathforge_core::model::Difficulty;

mod commands;
mod config;
mod report;
mod session;

use commands::simulate::Profile;
use config::PolicyKind;

#[derive(Parser)]
#[command(name = "mathforge", version, about = "Adaptive-difficulty arithmetic quiz")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play an interactive quiz session
    Play {
        /// Starting difficulty: easy, medium, or hard
        #[arg(long)]
        difficulty: Option<Difficulty>,

        /// Number of problems in the session
        #[arg(long)]
        problems: Option<usize>,

        /// Adaptation policy: rules or model
        #[arg(long, value_enum)]
        policy: Option<PolicyKind>,

        /// Seed for reproducible problem generation
        #[arg(long)]
        seed: Option<u64>,

        /// Config file path (default: ./mathforge.toml if present)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Save a JSON session report to this path
        #[arg(long)]
        save_report: Option<PathBuf>,
    },

    /// Run a session with a simulated learner
    Simulate {
        /// Learner profile
        #[arg(long, value_enum, default_value = "average")]
        profile: Profile,

        /// Starting difficulty: easy, medium, or hard
        #[arg(long)]
        difficulty: Option<Difficulty>,

        /// Number of problems in the session
        #[arg(long)]
        problems: Option<usize>,

        /// Adaptation policy: rules or model
        #[arg(long, value_enum)]
        policy: Option<PolicyKind>,

        /// Seed shared by the generator and the simulated learner
        #[arg(long, default_value = "0")]
        seed: u64,

        /// Config file path (default: ./mathforge.toml if present)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Save a JSON session report to this path
        #[arg(long)]
        save_report: Option<PathBuf>,
    },

    /// Pretrain the statistical policy and print its info block
    ModelInfo,

    /// Print a previously saved session report
    ShowReport {
        /// Path to a report JSON written by --save-report
        #[arg(long)]
        path: PathBuf,
    },
}

fn main() {
    // Logs go to stderr; stdout carries only session output so seeded runs
    // are byte-for-byte reproducible.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("mathforge=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Play {
            difficulty,
            problems,
            policy,
            seed,
            config,
            save_report,
        } => commands::play::execute(difficulty, problems, policy, seed, config, save_report),
        Commands::Simulate {
            profile,
            difficulty,
            problems,
            policy,
            seed,
            config,
            save_report,
        } => commands::simulate::execute(
            profile,
            difficulty,
            problems,
            policy,
            seed,
            config,
            save_report,
        ),
        Commands::ModelInfo => commands::model_info::execute(),
        Commands::ShowReport { path } => commands::show_report::execute(path),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
