//! Dayplan CLI Application
//!
//! Command-line interface for the dayplan study planner. Loads the persisted
//! planner state, applies one command against it, and re-renders the
//! affected day.

mod args;
mod cli;
mod renderer;

use anyhow::{Context, Result};
use args::{Args, Commands};
use clap::Parser;
use cli::Cli;
use dayplan_core::PlannerBuilder;
use log::info;
use renderer::TerminalRenderer;

fn main() -> Result<()> {
    env_logger::init();

    let Args {
        data_file,
        no_color,
        reset,
        date,
        command,
    } = Args::parse();

    let mut planner = PlannerBuilder::new()
        .with_store_path(data_file)
        .with_reset(reset)
        .build()
        .context("Failed to initialize planner")?;

    if let Some(date) = date {
        planner.select_date(&date);
    }

    let renderer = TerminalRenderer::new(!no_color);

    info!("Dayplan started");

    let mut cli = Cli::new(planner, renderer);
    match command {
        Some(Commands::Day { command }) => cli.handle_day_command(command),
        Some(Commands::Task { command }) => cli.handle_task_command(command),
        Some(Commands::Template { command }) => cli.handle_template_command(command),
        Some(Commands::View(view)) => cli.set_view(view),
        None => cli.show_day(),
    }
}
