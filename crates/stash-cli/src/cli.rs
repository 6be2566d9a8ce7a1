use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "stash",
    about = "Keep small notes in a local record store",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file (created with defaults if missing)
    #[arg(short, long, global = true, default_value = "stash.toml")]
    pub config: PathBuf,

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
    /// Create or replace a note
    Set(SetArgs),
    /// Show one note
    Get(GetArgs),
    /// List all notes
    List,
    /// Delete a note
    Remove(RemoveArgs),
    /// List notes carrying a tag
    Find(FindArgs),
    /// Get or set configuration
    Config(ConfigArgs),
}

#[derive(Args)]
pub struct SetArgs {
    pub id: u64,
    pub title: String,
    #[arg(short, long, default_value = "")]
    pub body: String,
    #[arg(short, long = "tag")]
    pub tags: Vec<String>,
}

#[derive(Args)]
pub struct GetArgs {
    pub id: u64,
}

#[derive(Args)]
pub struct RemoveArgs {
    pub id: u64,
}

#[derive(Args)]
pub struct FindArgs {
    pub tag: String,
    #[arg(short, long)]
    pub ignore_case: bool,
}

#[derive(Args)]
pub struct ConfigArgs {
    pub key: Option<String>,
    pub value: Option<String>,
}
