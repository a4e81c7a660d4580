//! snapline CLI - snap command

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod cmd;
mod system_config;
mod util;

/// Environment variable holding the log filter (default: warn)
const LOG_ENV: &str = "SNAP_LOG";

/// snapline - checkpoints and branches for the files you edit
#[derive(Parser)]
#[command(name = "snap")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Data directory (overrides storage.data_dir)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record the current content of a file
    Save {
        /// File to snapshot
        file: PathBuf,
        /// Language tag (default: plaintext)
        #[arg(long)]
        language: Option<String>,
        /// Change type: edit, ai-edit, manual, save, auto
        #[arg(long = "type", value_name = "TYPE")]
        change_type: Option<String>,
        /// Description (default depends on the change type)
        #[arg(short, long)]
        message: Option<String>,
        /// Record as automatic; skipped while auto-save is off
        #[arg(long)]
        auto: bool,
    },
    /// Show checkpoint timeline
    Log {
        /// Only checkpoints of this file
        #[arg(long)]
        file: Option<PathBuf>,
        /// Show a branch instead of all checkpoints
        #[arg(long)]
        branch: Option<String>,
        /// Number of checkpoints to show (default: 20)
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Show one checkpoint
    Show {
        /// Checkpoint ID, prefix, or "latest"
        checkpoint: String,
        /// Print the stored content
        #[arg(long)]
        content: bool,
    },
    /// Compare two checkpoints, or a checkpoint against its file on disk
    Diff {
        /// First checkpoint
        checkpoint_a: String,
        /// Second checkpoint (default: current file content)
        checkpoint_b: Option<String>,
        /// Show line-by-line diff (default: counts only)
        #[arg(short = 'p', long)]
        patch: bool,
        /// Number of context lines (default: 3)
        #[arg(short = 'U', long, default_value = "3")]
        context: usize,
    },
    /// Write a checkpoint's content back
    Restore {
        /// Checkpoint ID, prefix, or "latest"
        checkpoint: String,
        /// Write here instead of the checkpoint's file
        #[arg(short, long, conflicts_with = "stdout")]
        output: Option<PathBuf>,
        /// Print to stdout instead of writing a file
        #[arg(long)]
        stdout: bool,
    },
    /// Delete a checkpoint from every branch
    Delete {
        /// Checkpoint ID, prefix, or "latest"
        checkpoint: String,
    },
    /// Remove checkpoints of one file, or everything
    Clear {
        /// Only this file
        #[arg(long, conflicts_with = "all")]
        file: Option<PathBuf>,
        /// Remove all checkpoints and branches
        #[arg(long)]
        all: bool,
    },
    /// Manage branches
    #[command(subcommand)]
    Branch(BranchCommands),
    /// Write all checkpoints and branches as JSON
    Export {
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Merge a JSON export into the store
    Import {
        /// File written by `snap export`
        file: PathBuf,
    },
    /// Show store statistics
    Stats,
    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
enum BranchCommands {
    /// List branches
    List,
    /// Create a branch as a copy of another
    Create {
        /// Branch name
        name: String,
        /// Source branch (default: the active branch)
        #[arg(long)]
        from: Option<String>,
    },
    /// Make a branch active
    Switch {
        /// Branch name
        name: String,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// List all configuration values
    List,
    /// Get a configuration value
    Get {
        /// Key such as engine.max_checkpoints
        key: String,
    },
    /// Set a configuration value
    Set {
        key: String,
        value: String,
    },
    /// Show the config file path
    Path {
        /// Create the file with defaults if missing
        #[arg(long)]
        create: bool,
    },
    /// Show example configuration
    Example,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let data_dir = cli.data_dir;

    match cli.command {
        Commands::Save { file, language, change_type, message, auto } => {
            cmd::save::run(data_dir, &file, language, change_type.as_deref(), message, auto).await
        }
        Commands::Log { file, branch, limit } => {
            cmd::log::run(data_dir, file.as_deref(), branch.as_deref(), limit).await
        }
        Commands::Show { checkpoint, content } => cmd::show::run(data_dir, &checkpoint, content).await,
        Commands::Diff { checkpoint_a, checkpoint_b, patch, context } => {
            cmd::diff::run(data_dir, &checkpoint_a, checkpoint_b.as_deref(), patch, context).await
        }
        Commands::Restore { checkpoint, output, stdout } => {
            cmd::restore::run(data_dir, &checkpoint, output, stdout).await
        }
        Commands::Delete { checkpoint } => cmd::delete::run(data_dir, &checkpoint).await,
        Commands::Clear { file, all } => cmd::clear::run(data_dir, file.as_deref(), all).await,
        Commands::Branch(branch_cmd) => match branch_cmd {
            BranchCommands::List => cmd::branch::run_list(data_dir).await,
            BranchCommands::Create { name, from } => {
                cmd::branch::run_create(data_dir, &name, from.as_deref()).await
            }
            BranchCommands::Switch { name } => cmd::branch::run_switch(data_dir, &name).await,
        },
        Commands::Export { output } => cmd::transfer::run_export(data_dir, output).await,
        Commands::Import { file } => cmd::transfer::run_import(data_dir, &file).await,
        Commands::Stats => cmd::stats::run(data_dir).await,
        Commands::Config(config_cmd) => match config_cmd {
            ConfigCommands::List => cmd::config::run_list().await,
            ConfigCommands::Get { key } => cmd::config::run_get(&key).await,
            ConfigCommands::Set { key, value } => cmd::config::run_set(&key, &value).await,
            ConfigCommands::Path { create } => cmd::config::run_path(create).await,
            ConfigCommands::Example => cmd::config::run_example().await,
        },
    }
}
