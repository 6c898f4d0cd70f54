//! The planner state container and its mutation operations.
//!
//! [`Planner`] owns the single mutable [`PlannerState`] root together with
//! the store it persists to. Every mutation is a read-modify-write against
//! that root followed by a synchronous save; a failed save is logged and the
//! in-memory state stays authoritative for the rest of the session.
//!
//! Mutations address tasks by id. A virtual id (`virt_<weekday>_<index>`)
//! first materializes its source template onto the date, then the operation
//! re-locates the real task *positionally* — the template index travels
//! inside the id, so duplicate template rows resolve unambiguously. An id
//! that cannot be found is a silent no-op: the operation returns `Ok(None)`
//! and only the materialization that already happened (if any) is kept.

use std::path::{Path, PathBuf};

use jiff::Zoned;

use crate::datekey;
use crate::error::{PlannerError, Result};
use crate::models::{
    new_task_id, EffectiveTask, LastAction, PlannerState, Task, TaskMeta, VirtualTask, View,
    WeekdayKey,
};
use crate::params::{AddTask, BumpProgress, DeleteTask, EditTask, SetNote, SetTemplate, ToggleTask};
use crate::resolve;
use crate::store::{SqliteStore, StateStore, STATE_KEY};
use crate::templates::TemplateTask;
use crate::totals::{self, Totals};

/// Main planner interface: state root plus persistence.
pub struct Planner {
    state: PlannerState,
    store: Box<dyn StateStore>,
}

impl Planner {
    fn new(state: PlannerState, store: Box<dyn StateStore>) -> Self {
        Self { state, store }
    }

    /// Read access to the state root for rendering.
    pub fn state(&self) -> &PlannerState {
        &self.state
    }

    /// The date key the planner is currently focused on.
    pub fn selected_date(&self) -> &str {
        &self.state.selected_date
    }

    /// Focuses the planner on a date. Invalid keys fall back to today; the
    /// canonicalized key is returned.
    pub fn select_date(&mut self, key: &str) -> String {
        let canonical = datekey::to_date_key(datekey::parse_date_key_or_today(key));
        self.state.selected_date = canonical.clone();
        self.persist();
        canonical
    }

    /// Switches the current screen.
    pub fn set_view(&mut self, view: View) {
        self.state.current_view = view;
        self.persist();
    }

    /// The tasks in effect for the selected date.
    pub fn effective_tasks(&self) -> Vec<EffectiveTask> {
        self.effective_tasks_for(&self.state.selected_date)
    }

    /// The tasks in effect for an arbitrary date.
    pub fn effective_tasks_for(&self, date_key: &str) -> Vec<EffectiveTask> {
        resolve::effective_tasks(&self.state, date_key)
    }

    /// Aggregate totals and ETA label for a date, as of now.
    pub fn day_stats(&self, date_key: &str) -> (Totals, String) {
        self.day_stats_at(date_key, &Zoned::now())
    }

    /// Aggregate totals and ETA label for a date, as of an explicit instant.
    pub fn day_stats_at(&self, date_key: &str, now: &Zoned) -> (Totals, String) {
        let tasks = self.effective_tasks_for(date_key);
        let totals = totals::compute_totals(&tasks);
        let eta = totals::eta_label(totals.left, now);
        (totals, eta)
    }

    /// The free-form note attached to a date, if its day entry exists.
    pub fn day_note(&self, date_key: &str) -> &str {
        self.state
            .day(date_key)
            .map(|day| day.meta.note.as_str())
            .unwrap_or("")
    }

    /// Replaces the note of the selected date's day entry.
    pub fn set_day_note(&mut self, params: &SetNote) {
        let date_key = self.state.selected_date.clone();
        self.state.ensure_day(&date_key).meta.note = params.note.clone();
        self.persist();
    }

    /// Adds a task directly to the selected date.
    ///
    /// This appends to the day's real task list without applying any
    /// template — only a mutation against a *virtual* task materializes. On
    /// a previously unmaterialized date the new task therefore becomes the
    /// day's only real task and the projection disappears.
    pub fn add_task(&mut self, params: &AddTask) -> Result<Task> {
        let (title, minutes_planned) = params.validate()?;
        let date_key = self.state.selected_date.clone();

        let day = self.state.ensure_day(&date_key);
        let sort_index = day
            .tasks
            .iter()
            .map(|task| task.sort_index)
            .max()
            .map_or(0, |max| max + 1);
        let task = Task {
            id: new_task_id(),
            title,
            minutes_planned,
            done_percent: 0,
            is_done: false,
            sort_index,
            meta: TaskMeta::stamp(LastAction::Created),
        };
        day.tasks.push(task.clone());

        self.persist();
        Ok(task)
    }

    /// Sets a task's done state, forcing its percentage to 100 or 0.
    pub fn toggle_task(&mut self, params: &ToggleTask) -> Result<Option<Task>> {
        self.mutate_task(&params.id, |task| {
            task.is_done = params.done;
            task.done_percent = if params.done { 100 } else { 0 };
        })
    }

    /// Adjusts a task's completion percentage by a signed delta, clamped to
    /// 0..=100; the done flag follows the clamped result.
    pub fn bump_progress(&mut self, params: &BumpProgress) -> Result<Option<Task>> {
        self.mutate_task(&params.id, |task| {
            let percent = totals::clamp_percent(task.done_percent + params.delta);
            task.done_percent = percent;
            task.is_done = percent >= 100;
        })
    }

    /// Edits a task's title and/or planned minutes.
    pub fn edit_task(&mut self, params: &EditTask) -> Result<Option<Task>> {
        // Validate before locating so a bad edit never triggers
        // materialization as a side effect.
        let (title, minutes_planned) = params.validate()?;
        self.mutate_task(&params.id, |task| {
            if let Some(title) = title {
                task.title = title;
            }
            if let Some(minutes_planned) = minutes_planned {
                task.minutes_planned = minutes_planned;
            }
        })
    }

    /// Deletes a task. Deleting the last task of a date removes the whole
    /// day entry, reverting the date to unmaterialized (the template
    /// projection becomes visible again).
    pub fn delete_task(&mut self, params: &DeleteTask) -> Result<Option<Task>> {
        let date_key = self.state.selected_date.clone();
        let (index, materialized) = self.locate_task(&date_key, &params.id);

        let removed = index.and_then(|index| {
            let day = self.state.days.get_mut(&date_key)?;
            let mut task = day.tasks.remove(index);
            task.meta = TaskMeta::stamp(LastAction::Deleted);
            let emptied = day.tasks.is_empty();
            if emptied {
                self.state.remove_day(&date_key);
            }
            Some(task)
        });

        if removed.is_none() {
            log::debug!("delete: no task '{}' on {date_key}, ignoring", params.id);
        }
        if removed.is_some() || materialized {
            self.persist();
        }
        Ok(removed)
    }

    /// Normalized copy of one weekday's template sequence.
    pub fn get_template(&self, weekday: WeekdayKey) -> Vec<TemplateTask> {
        self.state.schedule_templates.get(weekday)
    }

    /// Validates and replaces one weekday's template sequence, returning the
    /// normalized result.
    pub fn set_template(&mut self, params: &SetTemplate) -> Result<Vec<TemplateTask>> {
        params.validate()?;
        self.state
            .schedule_templates
            .set(params.weekday, params.tasks.clone());
        self.persist();
        Ok(self.state.schedule_templates.get(params.weekday))
    }

    /// Applies a shared mutation flow: locate (materializing a virtual
    /// target first), apply `change`, stamp metadata, persist. A missing
    /// target is a silent no-op.
    fn mutate_task(
        &mut self,
        id: &str,
        change: impl FnOnce(&mut Task),
    ) -> Result<Option<Task>> {
        let date_key = self.state.selected_date.clone();
        let (index, materialized) = self.locate_task(&date_key, id);

        let updated = match index {
            Some(index) => {
                let day = self.state.days.get_mut(&date_key);
                day.and_then(|day| day.tasks.get_mut(index)).map(|task| {
                    change(task);
                    task.meta = TaskMeta::stamp(LastAction::Edited);
                    task.clone()
                })
            }
            None => None,
        };

        if updated.is_none() {
            log::debug!("mutation: no task '{id}' on {date_key}, ignoring");
        }
        if updated.is_some() || materialized {
            self.persist();
        }
        Ok(updated)
    }

    /// Finds the position of the targeted task within the date's day entry.
    ///
    /// A virtual id materializes its source weekday first and then resolves
    /// by template position (`sort_index`). Returns the index, if any, and
    /// whether a materialization happened.
    fn locate_task(&mut self, date_key: &str, id: &str) -> (Option<usize>, bool) {
        if let Some((weekday, template_index)) = VirtualTask::parse_id(id) {
            resolve::materialize_day(&mut self.state, weekday, date_key);
            let index = self.state.day(date_key).and_then(|day| {
                day.tasks
                    .iter()
                    .position(|task| task.sort_index == template_index as i64)
            });
            return (index, true);
        }

        let index = self
            .state
            .day(date_key)
            .and_then(|day| day.tasks.iter().position(|task| task.id == id));
        (index, false)
    }

    /// Saves the whole state; failure is logged, never raised.
    fn persist(&self) {
        if let Err(e) = self.store.save(STATE_KEY, &self.state) {
            log::error!("failed to persist planner state: {e}");
        }
    }
}

/// Builder for creating and configuring Planner instances.
#[derive(Default)]
pub struct PlannerBuilder {
    store_path: Option<PathBuf>,
    store: Option<Box<dyn StateStore>>,
    reset: bool,
}

impl PlannerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a custom store file path.
    ///
    /// If not specified, uses XDG Base Directory specification:
    /// `$XDG_DATA_HOME/dayplan/dayplan.db` or `~/.local/share/dayplan/dayplan.db`
    pub fn with_store_path<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.store_path = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// Injects a store directly, bypassing the SQLite default. Used by tests
    /// and embedders.
    pub fn with_store(mut self, store: Box<dyn StateStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Clears the persisted state before the initial load (the startup
    /// `--reset` wire input).
    pub fn with_reset(mut self, reset: bool) -> Self {
        self.reset = reset;
        self
    }

    /// Builds the configured planner instance, loading (or resetting) the
    /// persisted state.
    ///
    /// # Errors
    ///
    /// Returns `PlannerError::FileSystem` if the store path is invalid and
    /// `PlannerError::Storage` if the store cannot be opened.
    pub fn build(self) -> Result<Planner> {
        let store: Box<dyn StateStore> = match self.store {
            Some(store) => store,
            None => {
                let path = match self.store_path {
                    Some(path) => path,
                    None => Self::default_store_path()?,
                };
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent).map_err(|e| PlannerError::FileSystem {
                        path: parent.to_path_buf(),
                        source: e,
                    })?;
                }
                Box::new(SqliteStore::new(&path)?)
            }
        };

        if self.reset {
            if let Err(e) = store.clear(STATE_KEY) {
                log::warn!("failed to reset persisted state: {e}");
            }
        }

        let state = store.load(STATE_KEY, PlannerState::default());
        Ok(Planner::new(state, store))
    }

    /// Returns the default store path following XDG Base Directory
    /// specification.
    fn default_store_path() -> Result<PathBuf> {
        xdg::BaseDirectories::with_prefix("dayplan")
            .place_data_file("dayplan.db")
            .map_err(|e| PlannerError::XdgDirectory(e.to_string()))
    }
}
