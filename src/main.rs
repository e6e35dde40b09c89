//! Archmap CLI entry point

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;

use config::Config;

#[derive(Parser)]
#[command(name = "archmap")]
#[command(about = "Architecture knowledge graph for codebases and their documentation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Shorten descriptions in query output
    #[arg(short, long, global = true)]
    concise: bool,

    /// Project root holding `.archmap/` and `archmap.toml`
    #[arg(short, long, global = true, default_value = ".")]
    root: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the graph from a vocabulary registry and documentation units
    Build {
        /// Vocabulary registry JSON file
        #[arg(long)]
        registry: PathBuf,

        /// Documentation units JSON file (an array)
        #[arg(long)]
        docs: Option<PathBuf>,

        /// Base directory absolute paths are made relative to
        #[arg(long)]
        base: Option<String>,
    },
    /// Resolve an ID or path to a node
    Resolve { identifier: String },
    /// Typo-tolerant search
    Search {
        query: String,

        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Best match with confidence and alternatives
    Match { query: String },
    /// Nodes and documents around an ID or path
    Context {
        identifier: Option<String>,

        /// A number, or `all` / `unlimited` / `-1`
        #[arg(short, long)]
        depth: Option<String>,
    },
    /// Folder hierarchy
    Tree {
        identifier: Option<String>,

        #[arg(short, long)]
        depth: Option<String>,
    },
    /// Check the stored graph for structural problems
    Validate,
    /// Remove the stored graph
    Clear,
    /// Show version
    Version,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Ignoring unreadable .env: {}", e);
        }
    }

    // Logs go to stderr; stdout carries JSON results.
    let log_level = if cli.verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(format!("archmap={}", log_level)));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::debug!("Archmap v{}", env!("CARGO_PKG_VERSION"));
    tracing::debug!("Project root: {}", cli.root.display());

    let mut config = Config::load(&cli.root)?;
    if cli.concise {
        config.concise = true;
    }

    match cli.command {
        Commands::Build { registry, docs, base } => {
            commands::build(&cli.root, &config, &registry, docs.as_deref(), base)
        }
        Commands::Resolve { identifier } => commands::resolve(&cli.root, &config, &identifier),
        Commands::Search { query, limit } => commands::search(&cli.root, &config, &query, limit),
        Commands::Match { query } => commands::best_match(&cli.root, &config, &query),
        Commands::Context { identifier, depth } => {
            commands::context(&cli.root, &config, identifier.as_deref(), depth.as_deref())
        }
        Commands::Tree { identifier, depth } => {
            commands::tree(&cli.root, &config, identifier.as_deref(), depth.as_deref())
        }
        Commands::Validate => commands::validate(&cli.root, &config),
        Commands::Clear => commands::clear(&cli.root),
        Commands::Version => {
            println!("Archmap v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
