//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    completions::CompletionsArgs, config::ConfigCommands, consume::UseArgs,
    history::HistoryArgs, init::InitArgs, lot::LotCommands, price::PriceArgs,
    wish::WishCommands,
};

#[derive(Parser)]
#[command(name = "ficelle")]
#[command(author, version, about = "Ficelle - thread stock tracker")]
#[command(long_about = "Track craft thread supplies: stock lots, consumption per project, low-stock alerts, sale prices and a purchase wishlist.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output (debug logging on stderr)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Inventory root (default: auto-detect by finding .ficelle/)
    #[arg(long, global = true, value_name = "DIR")]
    pub root: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new inventory
    Init(InitArgs),

    /// Stock lot management (intake, inventory, photos)
    #[command(subcommand)]
    Lot(LotCommands),

    /// Consume thread from a lot
    Use(UseArgs),

    /// Show the consumption history
    History(HistoryArgs),

    /// List lots running low
    Alerts,

    /// Show the inventory dashboard
    Status,

    /// Compute a suggested sale price
    Price(PriceArgs),

    /// Purchase wishlist
    #[command(subcommand)]
    Wish(WishCommands),

    /// Show configuration
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Automatically detect based on context (pretty for show, tsv for list)
    #[default]
    Auto,
    /// YAML format (full fidelity)
    Yaml,
    /// Tab-separated values (for piping)
    Tsv,
    /// JSON format (for programming)
    Json,
    /// CSV format (for spreadsheets)
    Csv,
    /// Markdown tables
    Md,
    /// Just IDs, one per line
    Id,
}
