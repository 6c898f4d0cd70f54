//! Display wrappers for rendering computed planner data.
//!
//! The core hands the interface layer finished values only: aggregate stats
//! with an ETA label, effective task lists with a human-readable day label,
//! template sequences, and operation notices. Each wrapper formats markdown
//! through `fmt::Display`; nothing here touches state or performs I/O.

use std::fmt;

use crate::datekey;
use crate::models::{EffectiveTask, Task, WeekdayKey};
use crate::templates::TemplateTask;
use crate::totals::{format_minutes, Totals};

/// Human-readable label for a date key, e.g. `"Wednesday, 2025-01-01"`.
pub fn day_label(date_key: &str) -> String {
    let date = datekey::parse_date_key_or_today(date_key);
    let weekday = WeekdayKey::from_civil(date.weekday());
    format!("{}, {}", weekday.label(), datekey::to_date_key(date))
}

/// Stats card for one day: totals plus the finish estimate.
pub struct DayStats<'a> {
    pub totals: &'a Totals,
    pub eta: &'a str,
}

impl<'a> DayStats<'a> {
    pub fn new(totals: &'a Totals, eta: &'a str) -> Self {
        Self { totals, eta }
    }
}

impl fmt::Display for DayStats<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "- Planned: {}", format_minutes(self.totals.planned))?;
        writeln!(f, "- Done: {}", format_minutes(self.totals.done))?;
        writeln!(f, "- Left: {}", format_minutes(self.totals.left))?;
        writeln!(f, "- Progress: {}%", self.totals.percent)?;
        writeln!(f, "- Finish: {}", self.eta)
    }
}

/// The effective task list of one day, under its day label.
pub struct TaskList<'a> {
    pub day_label: String,
    pub tasks: &'a [EffectiveTask],
    pub note: &'a str,
}

impl<'a> TaskList<'a> {
    pub fn new(date_key: &str, tasks: &'a [EffectiveTask], note: &'a str) -> Self {
        Self {
            day_label: day_label(date_key),
            tasks,
            note,
        }
    }
}

impl fmt::Display for TaskList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# {}", self.day_label)?;
        writeln!(f)?;

        if !self.note.is_empty() {
            writeln!(f, "Note: {}", self.note)?;
            writeln!(f)?;
        }

        if self.tasks.is_empty() {
            writeln!(f, "No tasks for this day.")?;
            return Ok(());
        }

        for (position, task) in self.tasks.iter().enumerate() {
            let check = if task.effectively_done() { "x" } else { " " };
            write!(
                f,
                "{}. [{check}] {} ({}, {}%)",
                position + 1,
                task.title(),
                format_minutes(task.minutes_planned()),
                task.done_percent(),
            )?;
            if let EffectiveTask::Virtual(virtual_task) = task {
                write!(f, " — from {}'s template", virtual_task.source_weekday.label())?;
            }
            writeln!(f, " — id {}", task.id())?;
        }

        Ok(())
    }
}

/// One weekday's template sequence.
pub struct TemplateList<'a> {
    pub weekday: WeekdayKey,
    pub tasks: &'a [TemplateTask],
}

impl<'a> TemplateList<'a> {
    pub fn new(weekday: WeekdayKey, tasks: &'a [TemplateTask]) -> Self {
        Self { weekday, tasks }
    }
}

impl fmt::Display for TemplateList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## {} template", self.weekday.label())?;
        writeln!(f)?;

        if self.tasks.is_empty() {
            writeln!(f, "No template entries.")?;
            return Ok(());
        }

        for (position, task) in self.tasks.iter().enumerate() {
            writeln!(
                f,
                "{}. {} ({})",
                position + 1,
                task.title,
                format_minutes(task.minutes_planned),
            )?;
        }
        Ok(())
    }
}

/// Wrapper for reporting the outcome of a mutation on a task.
pub struct MutationResult<'a> {
    pub verb: &'static str,
    pub task: &'a Task,
}

impl<'a> MutationResult<'a> {
    pub fn new(verb: &'static str, task: &'a Task) -> Self {
        Self { verb, task }
    }
}

impl fmt::Display for MutationResult<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} task '{}' (id {})",
            self.verb, self.task.title, self.task.id
        )
    }
}

/// Plain confirmation or failure message.
pub struct Notice {
    pub message: String,
    pub success: bool,
}

impl Notice {
    /// Create a new success notice.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            success: true,
        }
    }

    /// Create a new failure notice.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            success: false,
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} {}",
            if self.success { "Success:" } else { "Error:" },
            self.message
        )
    }
}
