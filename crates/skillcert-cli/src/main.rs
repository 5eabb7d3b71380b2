//! skillcert CLI — admin tooling around the certification core.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "skillcert", version, about = "Certification test assembly and profile tooling")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate a balanced test draw from a question bank
    Draw {
        /// Path to the question bank TOML
        #[arg(long)]
        bank: PathBuf,

        /// Number of questions to draw
        #[arg(long, default_value = "20")]
        count: usize,

        /// Restrict the draw to one category id
        #[arg(long)]
        category: Option<u64>,

        /// RNG seed for a reproducible draw
        #[arg(long)]
        seed: Option<u64>,

        /// Shuffle the difficulty groups together for presentation
        #[arg(long)]
        interleave: bool,
    },

    /// Compute a user's certification profile summary
    Summary {
        /// Path to the question bank TOML (defines the active categories)
        #[arg(long)]
        bank: PathBuf,

        /// Path to the rank ladder TOML
        #[arg(long)]
        ladder: PathBuf,

        /// Path to the user's category results TOML
        #[arg(long)]
        results: PathBuf,

        /// Settings TOML (defaults apply when omitted)
        #[arg(long)]
        settings: Option<PathBuf>,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Validate bank and ladder files
    Validate {
        /// Path to a question bank TOML
        #[arg(long)]
        bank: Option<PathBuf>,

        /// Path to a rank ladder TOML
        #[arg(long)]
        ladder: Option<PathBuf>,
    },

    /// Create starter settings, ladder, and example bank files
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("skillcert=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Draw {
            bank,
            count,
            category,
            seed,
            interleave,
        } => commands::draw::execute(bank, count, category, seed, interleave).await,
        Commands::Summary {
            bank,
            ladder,
            results,
            settings,
            format,
        } => commands::summary::execute(bank, ladder, results, settings, format).await,
        Commands::Validate { bank, ladder } => commands::validate::execute(bank, ladder),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
