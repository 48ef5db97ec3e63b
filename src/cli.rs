use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;

/// Live countdowns for the things you need to get done.
/// Tasks live in memory only and are gone when the program exits.
#[derive(Parser)]
#[command(name = "tc", version, about = "Task countdown tracker")]
pub struct Cli {
    /// Log filter directive (RUST_LOG takes precedence when set).
    #[arg(long, global = true, env = "TC_LOG_LEVEL", default_value = "warn")]
    pub log_level: String,

    /// Path to the log file. Defaults to task_countdown.log in the temp directory.
    #[arg(long, global = true, env = "TC_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    // `ui` when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}
