use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "vcl",
    about = "Vote Chain Ledger: tamper-evident polling station",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file (TOML). Missing default file means built-in defaults.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Ledger file; overrides `[ledger] path` from the configuration.
    #[arg(long, global = true)]
    pub ledger: Option<PathBuf>,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start a new election ledger
    Init(InitArgs),
    /// Cast a vote
    Vote(VoteArgs),
    /// Show every entry in the chain
    Chain,
    /// Show the live vote count
    Tally,
    /// Verify chain integrity
    Verify,
    /// End the election and write the results report
    Close,
    /// Show the effective configuration
    Config,
}

#[derive(Args)]
pub struct InitArgs {
    /// Replace an existing ledger file.
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct VoteArgs {
    pub voter_id: String,
    pub candidate: String,
}
