//! gudangsoal CLI — browse a question bank, check answers, run drills.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(
    name = "gudangsoal",
    version,
    about = "Question bank practice and answer checking"
)]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate question bank TOML files
    Validate {
        /// Path to bank file or directory
        #[arg(long)]
        bank: PathBuf,
    },

    /// List questions
    List {
        /// Only questions in this subchapter
        #[arg(long)]
        subchapter: Option<String>,

        /// Difficulty: mudah, sedang, sulit, or all
        #[arg(long, default_value = "all")]
        difficulty: String,

        /// Maximum questions to list (defaults to the configured limit)
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Show one question
    Show {
        /// Question id
        id: String,
    },

    /// Check an answer to one question
    Check {
        /// Question id
        id: String,

        /// Answer text or option key; repeat or comma-separate for multiple answer
        #[arg(long, required = true)]
        answer: Vec<String>,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Answer a sequence of questions, one answer per line on stdin
    Drill {
        /// Only questions in this subchapter
        #[arg(long)]
        subchapter: Option<String>,

        /// Difficulty: mudah, sedang, sulit, or all
        #[arg(long, default_value = "all")]
        difficulty: String,

        /// Maximum questions to drill (defaults to the configured limit)
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Create starter config and example question bank
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("gudangsoal=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.config;

    let result = match cli.command {
        Commands::Validate { bank } => commands::validate::execute(bank),
        Commands::List {
            subchapter,
            difficulty,
            limit,
        } => commands::list::execute(subchapter, difficulty, limit, config).await,
        Commands::Show { id } => commands::show::execute(id, config).await,
        Commands::Check { id, answer, format } => {
            commands::check::execute(id, answer, format, config).await
        }
        Commands::Drill {
            subchapter,
            difficulty,
            limit,
        } => commands::drill::execute(subchapter, difficulty, limit, config).await,
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
