use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::cli::{DayCommands, TaskCommands, TemplateCommands, ViewArgs};

/// Main command-line interface for the dayplan study planner
///
/// Dayplan tracks per-day lists of study tasks with planned minutes and
/// completion percentages, derives aggregate progress and a projected finish
/// time, and seeds future days from weekly recurring templates. Without a
/// subcommand it shows the dashboard for the currently selected day.
#[derive(Parser)]
#[command(version, about, name = "dp")]
pub struct Args {
    /// Path to the planner store file. Defaults to
    /// $XDG_DATA_HOME/dayplan/dayplan.db
    #[arg(long, global = true)]
    pub data_file: Option<PathBuf>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Clear the persisted state before loading
    #[arg(long, global = true)]
    pub reset: bool,

    /// Focus this date (YYYY-MM-DD) instead of the remembered selection
    #[arg(long, global = true)]
    pub date: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands for the dayplan CLI
///
/// The CLI is organized into three main command categories plus a view
/// switch:
/// - `day`: Show the dashboard, change the selected date, edit the day note
/// - `task`: Mutate the tasks in effect for the selected day
/// - `template`: Manage the weekly recurring templates
#[derive(Subcommand)]
pub enum Commands {
    /// Show and manage the selected day
    #[command(alias = "d")]
    Day {
        #[command(subcommand)]
        command: DayCommands,
    },
    /// Manage the tasks of the selected day
    #[command(alias = "t")]
    Task {
        #[command(subcommand)]
        command: TaskCommands,
    },
    /// Manage the weekly recurring templates
    #[command(alias = "tpl")]
    Template {
        #[command(subcommand)]
        command: TemplateCommands,
    },
    /// Switch the remembered screen
    View(ViewArgs),
}
