//! Parameter structures for planner operations.
//!
//! Shared between interfaces (CLI today, anything else tomorrow) without
//! framework-specific derives: the CLI defines clap wrappers that convert
//! into these, and the planner methods accept references to them. Validation
//! that belongs to the editing boundary lives here, next to the data it
//! checks.

use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, Result};
use crate::models::WeekdayKey;
use crate::templates::TemplateTask;

/// Parameters for adding a task directly to a date.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddTask {
    /// Title of the task (required)
    pub title: String,
    /// Planned effort in minutes
    pub minutes_planned: i64,
}

impl AddTask {
    /// Validates and canonicalizes the input: trimmed non-empty title,
    /// non-negative minutes.
    pub fn validate(&self) -> Result<(String, i64)> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(PlannerError::invalid_input("title", "Title must not be empty"));
        }
        Ok((title.to_string(), self.minutes_planned.max(0)))
    }
}

/// Parameters for toggling a task's done state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToggleTask {
    /// Id of the task (real or virtual)
    pub id: String,
    /// Target done state
    pub done: bool,
}

/// Parameters for adjusting a task's completion percentage by a delta.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BumpProgress {
    /// Id of the task (real or virtual)
    pub id: String,
    /// Signed percentage-point change, e.g. ±10
    pub delta: i64,
}

/// Parameters for editing a task's fields. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EditTask {
    /// Id of the task (real or virtual)
    pub id: String,
    /// New title
    pub title: Option<String>,
    /// New planned minutes
    pub minutes_planned: Option<i64>,
}

impl EditTask {
    /// Validates the requested changes before anything is touched: a title
    /// that trims to empty is rejected, minutes are clamped non-negative.
    pub fn validate(&self) -> Result<(Option<String>, Option<i64>)> {
        let title = match &self.title {
            Some(raw) => {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    return Err(PlannerError::invalid_input(
                        "title",
                        "Title must not be empty",
                    ));
                }
                Some(trimmed.to_string())
            }
            None => None,
        };
        Ok((title, self.minutes_planned.map(|m| m.max(0))))
    }
}

/// Parameters for deleting a task.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeleteTask {
    /// Id of the task (real or virtual)
    pub id: String,
}

/// Parameters for replacing one weekday's template sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetTemplate {
    /// Weekday whose sequence is replaced
    pub weekday: WeekdayKey,
    /// The full replacement sequence
    pub tasks: Vec<TemplateTask>,
}

impl SetTemplate {
    /// Field-level validation at the template editing boundary: every entry
    /// needs a non-blank title and non-negative minutes. The mutation is
    /// aborted on the first offending entry.
    pub fn validate(&self) -> Result<()> {
        for (index, task) in self.tasks.iter().enumerate() {
            if task.title.trim().is_empty() {
                return Err(PlannerError::invalid_input(
                    "title",
                    format!("Entry {} has an empty title", index + 1),
                ));
            }
            if task.minutes_planned < 0 {
                return Err(PlannerError::invalid_input(
                    "minutesPlanned",
                    format!("Entry {} has negative minutes", index + 1),
                ));
            }
        }
        Ok(())
    }
}

/// Parameters for setting the free-form note of a day.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SetNote {
    /// The replacement note text
    pub note: String,
}
