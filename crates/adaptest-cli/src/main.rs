//! adaptest CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "adaptest", version, about = "Short computerized adaptive quizzes")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Take an interactive adaptive quiz
    Run {
        /// Item bank TOML file (default: bundled english-grammar bank)
        #[arg(long)]
        bank: Option<PathBuf>,

        /// Number of items to administer
        #[arg(long)]
        max_items: Option<usize>,

        /// Invalid answers tolerated per item before aborting
        #[arg(long)]
        max_attempts: Option<u32>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,

        /// Print the session report as JSON when finished
        #[arg(long)]
        json: bool,
    },

    /// Run a session against a simulated examinee
    Simulate {
        /// Ability of the simulated examinee
        #[arg(long, allow_hyphen_values = true)]
        true_theta: f64,

        /// Item bank TOML file (default: bundled english-grammar bank)
        #[arg(long)]
        bank: Option<PathBuf>,

        /// Number of items to administer
        #[arg(long)]
        max_items: Option<usize>,

        /// Output format: table, json
        #[arg(long, default_value = "table")]
        format: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Show an item bank with response probability and information
    Items {
        /// Item bank TOML file (default: bundled english-grammar bank)
        #[arg(long)]
        bank: Option<PathBuf>,

        /// Ability at which to evaluate the items
        #[arg(long, default_value = "0.0", allow_hyphen_values = true)]
        theta: f64,
    },

    /// Create starter config and example item bank
    Init,
}

fn main() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("adaptest=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            bank,
            max_items,
            max_attempts,
            config,
            json,
        } => commands::run::execute(bank, max_items, max_attempts, config, json),
        Commands::Simulate {
            true_theta,
            bank,
            max_items,
            format,
            config,
        } => commands::simulate::execute(true_theta, bank, max_items, format, config),
        Commands::Items { bank, theta } => commands::items::execute(bank, theta),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
