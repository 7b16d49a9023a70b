use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "folio",
    about = concat!("folio v", env!("CARGO_PKG_VERSION"), " - a portfolio you scroll in the terminal"),
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Load the catalog from a TOML file instead of the built-in one
    #[arg(long, global = true, value_name = "PATH")]
    pub catalog: Option<PathBuf>,

    /// Load settings from a TOML file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Append log output to this file
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Raise log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Run without scroll tracking: show everything at once
    #[arg(long, global = true)]
    pub no_reveal: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List entries matching a query and tag
    List(ListArgs),
    /// List every tag, "All" first
    Tags,
    /// Show one entry by title
    Show(ShowArgs),
    /// Print the effective configuration as TOML
    Config,
}

#[derive(Args)]
pub struct ListArgs {
    /// Case-insensitive text to look for in titles, summaries and tags
    #[arg(long, short, default_value = "")]
    pub query: String,
    /// Only entries carrying this exact tag
    #[arg(long, short, default_value = "All")]
    pub tag: String,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Entry title (case-insensitive)
    pub title: String,
}
