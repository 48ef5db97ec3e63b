//! Command implementations for the CLI interface.

use clap::Subcommand;
use clap_complete::{generate, Shell};

use crate::due::TaskSpec;
use crate::fields::Urgency;
use crate::format::print_table;
use crate::store::TaskStore;
use crate::task::Task;
use crate::tui::run::run_tui;

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the interactive countdown board.
    Ui {
        /// Task to start with, as NAME@DUE. May be repeated.
        #[arg(long = "task", value_name = "NAME@DUE")]
        tasks: Vec<TaskSpec>,
    },

    /// Print the countdowns for the given tasks once and exit.
    Show {
        /// Task as NAME@DUE, e.g. "Buy milk@tomorrow 18:00". May be repeated.
        #[arg(long = "task", value_name = "NAME@DUE")]
        tasks: Vec<TaskSpec>,
        /// Only show tasks at this urgency: ample | approaching | overdue.
        #[arg(long, value_enum)]
        urgency: Option<Urgency>,
        /// Output JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completion scripts.
    Completions {
        /// Shell to generate completions for.
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Build a store holding `specs` in order.
pub fn seeded_store(specs: &[TaskSpec]) -> TaskStore {
    let mut store = TaskStore::new();
    for spec in specs {
        store.add(&spec.name, Some(spec.due));
    }
    store
}

/// Launch the terminal user interface.
pub fn cmd_ui(tasks: Vec<TaskSpec>) {
    if let Err(e) = run_tui(seeded_store(&tasks)) {
        eprintln!("UI error: {e}");
        std::process::exit(1);
    }
}

/// Print the countdown of each task as a table or JSON.
pub fn cmd_show(tasks: Vec<TaskSpec>, urgency: Option<Urgency>, json: bool) {
    let store = seeded_store(&tasks);
    let shown: Vec<&Task> = store
        .tasks()
        .iter()
        .filter(|t| urgency.map_or(true, |u| t.urgency() == u))
        .collect();

    if json {
        match serde_json::to_string_pretty(&shown) {
            Ok(out) => println!("{out}"),
            Err(e) => {
                eprintln!("Failed to serialise tasks: {e}");
                std::process::exit(1);
            }
        }
    } else if shown.is_empty() {
        println!("No tasks.");
    } else {
        print_table(&shown, store.now());
    }
}

/// Generate shell completion scripts.
pub fn cmd_completions(shell: Shell) {
    use clap::CommandFactory;
    use crate::cli::Cli;

    let mut app = Cli::command();
    let app_name = app.get_name().to_string();
    generate(shell, &mut app, app_name, &mut std::io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Local};

    #[test]
    fn test_seeded_store_keeps_argument_order() {
        let now = Local::now();
        let specs = vec![
            TaskSpec { name: "second due".into(), due: now + Duration::days(2) },
            TaskSpec { name: "first due".into(), due: now + Duration::hours(1) },
        ];
        let store = seeded_store(&specs);
        let names: Vec<&str> = store.tasks().iter().map(Task::name).collect();
        assert_eq!(names, ["second due", "first due"]);
    }

    #[test]
    fn test_task_json_shape() {
        let now = Local::now();
        let specs = vec![TaskSpec { name: "Buy milk".into(), due: now + Duration::days(2) }];
        let store = seeded_store(&specs);

        let value = serde_json::to_value(store.tasks()).unwrap();
        let task = &value[0];
        assert_eq!(task["name"], "Buy milk");
        assert_eq!(task["urgency"], "ample");
        assert!(task["time_left"].as_str().unwrap().starts_with("1d 23h") || task["time_left"] == "2d 0h 0m 0s");
        assert!(task["due"].is_string());
        assert!(task["progress"].is_f64());
    }
}
