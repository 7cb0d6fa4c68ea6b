/// CLI argument parsing

use clap::{Parser, Subcommand};
use std::time::Duration;

// Build timestamp injected at compile time
pub const BUILD_TIMESTAMP: &str = env!("BUILD_TIMESTAMP");
pub const VERSION_WITH_BUILD: &str = concat!(env!("CARGO_PKG_VERSION"), " (built: ", env!("BUILD_TIMESTAMP"), ")");

// Get version with timestamp
pub fn get_version() -> &'static str {
    VERSION_WITH_BUILD
}

#[derive(Parser)]
#[command(name = "sysglance")]
#[command(author, version = VERSION_WITH_BUILD, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Seconds between collection cycles (e.g. "3s", "500ms")
    #[arg(short, long, value_parser = humantime::parse_duration)]
    pub interval: Option<Duration>,

    /// Loading spinner tick while the first collection runs
    #[arg(long, value_parser = humantime::parse_duration)]
    pub tick: Option<Duration>,

    /// Default budget for probes without their own timeout
    #[arg(short = 't', long, value_parser = humantime::parse_duration)]
    pub timeout: Option<Duration>,

    /// Panel columns in the tiled layout
    #[arg(short, long)]
    pub columns: Option<usize>,

    /// Directory tree depth
    #[arg(long)]
    pub depth: Option<usize>,

    /// Files shown per directory in the tree
    #[arg(long)]
    pub files: Option<usize>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run one collection cycle and print it (no refresh loop)
    Snapshot,

    /// List registered probes with their timeout and refresh cadence
    Probes,

    /// Write the resolved settings to the config file
    Config,
}
