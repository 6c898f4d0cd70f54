//! Command definitions and handlers.
//!
//! Each subcommand gets a clap argument struct that converts into the
//! framework-free parameter types of `dayplan-core`, keeping CLI concerns
//! (flags, help text, entry syntax) out of the core. The [`Cli`] struct owns
//! the planner and the renderer and maps every command to a core operation
//! followed by a re-render of the affected day — the CLI analog of the
//! original mutate-persist-rerender loop.

use anyhow::{anyhow, bail, Result};
use clap::{Args, Subcommand, ValueEnum};
use dayplan_core::params::{
    AddTask, BumpProgress, DeleteTask, EditTask, SetNote, SetTemplate, ToggleTask,
};
use dayplan_core::{
    DayStats, MutationResult, Notice, Planner, TaskList, TemplateList, TemplateTask, View,
    WeekdayKey,
};

use crate::renderer::TerminalRenderer;

/// Change the selected date
///
/// The selection is remembered across invocations; all task commands operate
/// on the selected date.
#[derive(Args)]
pub struct SelectDayArgs {
    /// Date to select (YYYY-MM-DD); anything invalid falls back to today
    pub date: String,
}

/// Replace the note attached to the selected day
#[derive(Args)]
pub struct NoteArgs {
    /// The new note text (empty clears the note)
    pub note: String,
}

impl From<NoteArgs> for SetNote {
    fn from(val: NoteArgs) -> Self {
        SetNote { note: val.note }
    }
}

#[derive(Subcommand)]
pub enum DayCommands {
    /// Show the day's tasks and progress
    #[command(alias = "s")]
    Show,
    /// Change the selected date
    Select(SelectDayArgs),
    /// Replace the day's note
    Note(NoteArgs),
}

/// Add a task directly to the selected day
#[derive(Args)]
pub struct AddTaskArgs {
    /// Title of the task
    pub title: String,
    /// Planned effort in minutes
    pub minutes: i64,
}

impl From<AddTaskArgs> for AddTask {
    fn from(val: AddTaskArgs) -> Self {
        AddTask {
            title: val.title,
            minutes_planned: val.minutes,
        }
    }
}

/// Mark a task done (or not done)
///
/// Accepts real task ids as shown in the day view as well as virtual ids
/// (`virt_<weekday>_<index>`); a virtual target materializes the day first.
#[derive(Args)]
pub struct ToggleTaskArgs {
    /// Id of the task to toggle
    pub id: String,
    /// Mark the task as not done instead
    #[arg(long)]
    pub undone: bool,
}

impl From<ToggleTaskArgs> for ToggleTask {
    fn from(val: ToggleTaskArgs) -> Self {
        ToggleTask {
            id: val.id,
            done: !val.undone,
        }
    }
}

/// Adjust a task's completion percentage by a signed delta
#[derive(Args)]
pub struct BumpTaskArgs {
    /// Id of the task to adjust
    pub id: String,
    /// Percentage-point change, e.g. 10 or -10
    #[arg(allow_hyphen_values = true)]
    pub delta: i64,
}

impl From<BumpTaskArgs> for BumpProgress {
    fn from(val: BumpTaskArgs) -> Self {
        BumpProgress {
            id: val.id,
            delta: val.delta,
        }
    }
}

/// Edit a task's title and/or planned minutes
#[derive(Args)]
pub struct EditTaskArgs {
    /// Id of the task to edit
    pub id: String,
    /// New title for the task
    #[arg(short, long)]
    pub title: Option<String>,
    /// New planned minutes for the task
    #[arg(short, long)]
    pub minutes: Option<i64>,
}

impl From<EditTaskArgs> for EditTask {
    fn from(val: EditTaskArgs) -> Self {
        EditTask {
            id: val.id,
            title: val.title,
            minutes_planned: val.minutes,
        }
    }
}

/// Delete a task from the selected day
///
/// Deleting the last task of a day removes the day entirely, so the weekly
/// template projection becomes visible again.
#[derive(Args)]
pub struct DeleteTaskArgs {
    /// Id of the task to delete
    pub id: String,
}

impl From<DeleteTaskArgs> for DeleteTask {
    fn from(val: DeleteTaskArgs) -> Self {
        DeleteTask { id: val.id }
    }
}

#[derive(Subcommand)]
pub enum TaskCommands {
    /// Add a task directly to the selected day
    #[command(alias = "a")]
    Add(AddTaskArgs),
    /// Mark a task done (or not done with --undone)
    #[command(alias = "t")]
    Toggle(ToggleTaskArgs),
    /// Adjust a task's completion percentage
    #[command(alias = "b")]
    Bump(BumpTaskArgs),
    /// Edit a task's title and/or planned minutes
    #[command(alias = "e")]
    Edit(EditTaskArgs),
    /// Delete a task
    #[command(aliases = ["d", "rm"])]
    Delete(DeleteTaskArgs),
}

/// Show one weekday's template, or all of them
#[derive(Args)]
pub struct ShowTemplateArgs {
    /// Weekday to show (e.g. thu or thursday); omit for all seven
    pub weekday: Option<String>,
}

/// Replace one weekday's template entries
///
/// Entries are comma-separated `Title:minutes` pairs, e.g.
/// `"Math:40,Physics:30"`.
#[derive(Args)]
pub struct SetTemplateArgs {
    /// Weekday to replace (e.g. thu or thursday)
    pub weekday: String,
    /// Entries as comma-separated Title:minutes pairs
    #[arg(value_delimiter = ',')]
    pub entries: Vec<String>,
}

/// Remove all entries from one weekday's template
#[derive(Args)]
pub struct ClearTemplateArgs {
    /// Weekday to clear (e.g. thu or thursday)
    pub weekday: String,
}

#[derive(Subcommand)]
pub enum TemplateCommands {
    /// Show one weekday's template, or all of them
    #[command(alias = "s")]
    Show(ShowTemplateArgs),
    /// Replace one weekday's template entries
    Set(SetTemplateArgs),
    /// Remove all entries from one weekday's template
    Clear(ClearTemplateArgs),
}

/// Switch the remembered screen
#[derive(Args)]
pub struct ViewArgs {
    /// Screen to remember
    pub view: ViewArg,
}

/// Command-line argument representation of the planner's screens
#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum ViewArg {
    Dashboard,
    Schedule,
    Calendar,
}

impl From<ViewArg> for View {
    fn from(val: ViewArg) -> Self {
        match val {
            ViewArg::Dashboard => View::Dashboard,
            ViewArg::Schedule => View::Schedule,
            ViewArg::Calendar => View::Calendar,
        }
    }
}

fn parse_weekday(raw: &str) -> Result<WeekdayKey> {
    raw.parse::<WeekdayKey>().map_err(|e| anyhow!(e))
}

/// Parses one `Title:minutes` template entry.
fn parse_template_entry(raw: &str) -> Result<TemplateTask> {
    let Some((title, minutes)) = raw.rsplit_once(':') else {
        bail!("Entry '{raw}' is not a Title:minutes pair");
    };
    let minutes: i64 = minutes
        .trim()
        .parse()
        .map_err(|_| anyhow!("Entry '{raw}' has non-numeric minutes"))?;
    Ok(TemplateTask::new(title.trim(), minutes))
}

/// Command handler that owns the planner and the terminal renderer.
pub struct Cli {
    planner: Planner,
    renderer: TerminalRenderer,
}

impl Cli {
    pub fn new(planner: Planner, renderer: TerminalRenderer) -> Self {
        Self { planner, renderer }
    }

    /// Renders the dashboard for the selected day: task list, note, and the
    /// progress card with the finish estimate.
    pub fn show_day(&self) -> Result<()> {
        let date_key = self.planner.selected_date().to_string();
        let tasks = self.planner.effective_tasks();
        let (totals, eta) = self.planner.day_stats(&date_key);

        let mut output = TaskList::new(&date_key, &tasks, self.planner.day_note(&date_key))
            .to_string();
        output.push_str("\n## Progress\n\n");
        output.push_str(&DayStats::new(&totals, &eta).to_string());
        self.renderer.render(&output)
    }

    pub fn handle_day_command(&mut self, command: DayCommands) -> Result<()> {
        match command {
            DayCommands::Show => self.show_day(),
            DayCommands::Select(args) => {
                let selected = self.planner.select_date(&args.date);
                self.renderer
                    .render(&Notice::success(format!("Selected {selected}")).to_string())?;
                self.show_day()
            }
            DayCommands::Note(args) => {
                self.planner.set_day_note(&args.into());
                self.show_day()
            }
        }
    }

    pub fn handle_task_command(&mut self, command: TaskCommands) -> Result<()> {
        match command {
            TaskCommands::Add(args) => {
                let task = self.planner.add_task(&args.into())?;
                self.renderer
                    .render(&MutationResult::new("Added", &task).to_string())?;
                self.show_day()
            }
            TaskCommands::Toggle(args) => {
                let params: ToggleTask = args.into();
                let outcome = self.planner.toggle_task(&params)?;
                self.report_mutation("Toggled", &params.id, outcome.as_ref())?;
                self.show_day()
            }
            TaskCommands::Bump(args) => {
                let params: BumpProgress = args.into();
                let outcome = self.planner.bump_progress(&params)?;
                self.report_mutation("Adjusted", &params.id, outcome.as_ref())?;
                self.show_day()
            }
            TaskCommands::Edit(args) => {
                let params: EditTask = args.into();
                let outcome = self.planner.edit_task(&params)?;
                self.report_mutation("Edited", &params.id, outcome.as_ref())?;
                self.show_day()
            }
            TaskCommands::Delete(args) => {
                let params: DeleteTask = args.into();
                let outcome = self.planner.delete_task(&params)?;
                self.report_mutation("Deleted", &params.id, outcome.as_ref())?;
                self.show_day()
            }
        }
    }

    pub fn handle_template_command(&mut self, command: TemplateCommands) -> Result<()> {
        match command {
            TemplateCommands::Show(args) => {
                let weekdays = match args.weekday {
                    Some(raw) => vec![parse_weekday(&raw)?],
                    None => WeekdayKey::ALL.to_vec(),
                };
                let mut output = String::new();
                for weekday in weekdays {
                    let tasks = self.planner.get_template(weekday);
                    output.push_str(&TemplateList::new(weekday, &tasks).to_string());
                    output.push('\n');
                }
                self.renderer.render(&output)
            }
            TemplateCommands::Set(args) => {
                let weekday = parse_weekday(&args.weekday)?;
                let tasks = args
                    .entries
                    .iter()
                    .map(|entry| parse_template_entry(entry))
                    .collect::<Result<Vec<_>>>()?;
                let saved = self.planner.set_template(&SetTemplate { weekday, tasks })?;
                self.renderer
                    .render(&TemplateList::new(weekday, &saved).to_string())
            }
            TemplateCommands::Clear(args) => {
                let weekday = parse_weekday(&args.weekday)?;
                self.planner.set_template(&SetTemplate {
                    weekday,
                    tasks: Vec::new(),
                })?;
                self.renderer.render(
                    &Notice::success(format!("Cleared {} template", weekday.label())).to_string(),
                )
            }
        }
    }

    pub fn set_view(&mut self, args: ViewArgs) -> Result<()> {
        let view: View = args.view.into();
        self.planner.set_view(view);
        self.renderer
            .render(&Notice::success(format!("Switched to {view} view")).to_string())
    }

    /// Prints a result line for a mutation; a missing id becomes a gentle
    /// notice instead of an error, matching the core's no-op policy.
    fn report_mutation(
        &self,
        verb: &'static str,
        id: &str,
        outcome: Option<&dayplan_core::Task>,
    ) -> Result<()> {
        match outcome {
            Some(task) => self
                .renderer
                .render(&MutationResult::new(verb, task).to_string()),
            None => self.renderer.render(
                &Notice::failure(format!("No task with id {id}; nothing changed")).to_string(),
            ),
        }
    }
}
