//! Trove CLI - a multimodal knowledge base on your filesystem.

mod commands;

use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Trove - ingest files, ask questions.
#[derive(Parser)]
#[command(name = "trove")]
#[command(version)]
#[command(about = "Multimodal knowledge base: ingest files, ask questions", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize Trove (create config and database)
    Init,

    /// Process files, directories, or video URLs into the knowledge base
    Process {
        /// Paths or URLs to process
        #[arg(required = true)]
        inputs: Vec<String>,

        /// Recurse into directories
        #[arg(short, long)]
        recursive: bool,

        /// Skip inputs that were already processed successfully
        #[arg(long)]
        skip_processed: bool,
    },

    /// Ask a question against processed content
    Query {
        /// Your question
        question: String,

        /// Hide the source records shown under the answer
        #[arg(long)]
        no_sources: bool,
    },

    /// List all records in the knowledge base
    List {
        /// Filter by status (pending, processed, failed)
        #[arg(short, long)]
        status: Option<String>,
    },

    /// Show recent query history
    History {
        /// Maximum number of entries to show
        #[arg(short, long, default_value = "10")]
        limit: i64,
    },

    /// Delete all records and query history
    Clear {
        /// Confirm the deletion
        #[arg(long)]
        confirm: bool,
    },

    /// Show store statistics and toolchain availability
    Status,

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Print the config file path
    Path,

    /// Write a default config file if none exists
    Init,
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("trove=debug,info"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("trove=info,warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Init => commands::init::run(),
        Commands::Process {
            inputs,
            recursive,
            skip_processed,
        } => commands::process::run(&inputs, recursive, skip_processed),
        Commands::Query {
            question,
            no_sources,
        } => commands::query::run(&question, !no_sources),
        Commands::List { status } => commands::list::run(status),
        Commands::History { limit } => commands::history::run(limit),
        Commands::Clear { confirm } => commands::clear::run(confirm),
        Commands::Status => commands::status::run(),
        Commands::Config(cmd) => match cmd {
            ConfigCommands::Show => commands::config::show(),
            ConfigCommands::Path => commands::config::path(),
            ConfigCommands::Init => commands::config::init(),
        },
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_query_sources_shown_by_default_and_can_be_hidden() {
        let cli = Cli::parse_from(["trove", "query", "what is rust"]);
        match cli.command {
            Commands::Query { no_sources, .. } => assert!(!no_sources),
            _ => panic!("expected query command"),
        }

        let cli = Cli::parse_from(["trove", "query", "what is rust", "--no-sources"]);
        match cli.command {
            Commands::Query { no_sources, .. } => assert!(no_sources),
            _ => panic!("expected query command"),
        }
    }
}
