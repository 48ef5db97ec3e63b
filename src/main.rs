//! # tc - Task Countdown
//!
//! A small terminal task tracker. Enter a task name and a due date/time and
//! the board keeps a live countdown for every task, refreshed once a second,
//! with a progress bar coloured by urgency.
//!
//! ## Quick Start
//!
//! ```bash
//! # Launch the board
//! tc
//!
//! # Launch the board with a couple of tasks already on it
//! tc ui --task "Buy milk@tomorrow 18:00" --task "Stand-up@09:30"
//!
//! # Print the countdowns once, as a table or JSON
//! tc show --task "Dentist@fri 14:00" --json
//! ```
//!
//! ## Urgency
//!
//! Each task is measured against the span from today's midnight to its due
//! time:
//!
//! - **Ample** (green): more than half of that span is left
//! - **Approaching** (amber): half or less is left
//! - **Overdue** (red): the due time has passed and the countdown reads "Time is up"
//!
//! Tasks live in memory only. Logs are written to a file
//! (`--log-file`, default `task_countdown.log` in the temp directory).

use clap::Parser;

pub mod cli;
pub mod clock;
pub mod cmd;
pub mod due;
pub mod fields;
pub mod format;
pub mod logging;
pub mod metrics;
pub mod refresh;
pub mod store;
pub mod task;
pub mod tui {
    pub mod app;
    pub mod colors;
    pub mod enums;
    pub mod input;
    pub mod run;
    pub mod utils;
}

use cli::Cli;
use cmd::*;
use logging::init_logging;

fn main() {
    let cli = Cli::parse();

    let _log_guard = init_logging(&cli.log_level, cli.log_file.as_deref());
    tracing::info!("tc starting");

    match cli.command.unwrap_or(Commands::Ui { tasks: Vec::new() }) {
        Commands::Ui { tasks } => cmd_ui(tasks),
        Commands::Show { tasks, urgency, json } => cmd_show(tasks, urgency, json),
        Commands::Completions { shell } => cmd_completions(shell),
    }

    tracing::info!("tc exiting");
}
