//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Forwardly - forward-only schema migrations for deployed databases
#[derive(Parser, Debug)]
#[command(name = "fw")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to project directory
    #[arg(short = 'p', long, global = true, default_value = ".")]
    pub project_dir: String,

    /// Override config file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Override database path from config
    #[arg(short, long, global = true, env = "FORWARDLY_DATABASE")]
    pub database: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the migration log table if it does not exist
    Init,

    /// Apply pending migrations
    Migrate(MigrateArgs),

    /// Show each migration alongside its state in the log
    Status(StatusArgs),

    /// Load and validate the migration catalog without touching the database
    Validate,

    /// Handle a deployment lifecycle event and print the response
    Lifecycle(LifecycleArgs),
}

/// Arguments for the migrate command
#[derive(Args, Debug)]
pub struct MigrateArgs {
    /// Accept applied migrations whose SQL has since been edited (validation databases only)
    #[arg(long)]
    pub allow_modified: bool,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: StatusOutput,
}

/// Status output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusOutput {
    /// Table format
    Table,
    /// JSON output
    Json,
}

/// Arguments for the lifecycle command
#[derive(Args, Debug)]
pub struct LifecycleArgs {
    /// File containing the event JSON (reads stdin when omitted)
    #[arg(short, long)]
    pub event: Option<String>,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
