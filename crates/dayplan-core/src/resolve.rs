//! Day resolution: real tasks vs. virtual template projections.
//!
//! A date with materialized tasks is authoritative and is returned verbatim.
//! A date without them shows "what to prepare for tomorrow": the weekly
//! template of the *following* day's weekday, projected as virtual tasks.
//! Materialization is lazy-on-write — only a mutation attempt against a
//! virtual task turns the projection into real tasks, never a read.

use jiff::civil::Date;

use crate::datekey;
use crate::models::{
    new_task_id, EffectiveTask, LastAction, PlannerState, Task, TaskMeta, VirtualTask, WeekdayKey,
};

/// The weekday bucket a date projects from: the weekday of `date + 1 day`.
pub fn projection_weekday(date: Date) -> WeekdayKey {
    WeekdayKey::from_civil(datekey::add_days(date, 1).weekday())
}

/// Resolves the tasks in effect for a date.
///
/// Materialized tasks win; otherwise the next day's weekday template is
/// projected as virtual tasks with deterministic `virt_<weekday>_<index>`
/// ids. An invalid date key resolves as today (per the codec's fallback).
pub fn effective_tasks(state: &PlannerState, date_key: &str) -> Vec<EffectiveTask> {
    if let Some(day) = state.day(date_key) {
        if !day.tasks.is_empty() {
            return day.tasks.iter().cloned().map(EffectiveTask::Real).collect();
        }
    }

    let date = datekey::parse_date_key_or_today(date_key);
    let weekday = projection_weekday(date);
    state
        .schedule_templates
        .get(weekday)
        .into_iter()
        .enumerate()
        .map(|(index, blueprint)| {
            EffectiveTask::Virtual(VirtualTask {
                id: VirtualTask::synthetic_id(weekday, index),
                title: blueprint.title,
                minutes_planned: blueprint.minutes_planned,
                source_weekday: weekday,
                template_index: index,
            })
        })
        .collect()
}

/// Materializes a weekday template onto a date, replacing whatever tasks the
/// day held. Each blueprint entry becomes a fresh real task with a new id,
/// zero progress, and a sort index equal to its template position. Returns
/// the number of tasks created.
pub fn materialize_day(state: &mut PlannerState, weekday: WeekdayKey, date_key: &str) -> usize {
    let blueprints = state.schedule_templates.get(weekday);
    let tasks: Vec<Task> = blueprints
        .into_iter()
        .enumerate()
        .map(|(index, blueprint)| Task {
            id: new_task_id(),
            title: blueprint.title,
            minutes_planned: blueprint.minutes_planned,
            done_percent: 0,
            is_done: false,
            sort_index: index as i64,
            meta: TaskMeta::stamp(LastAction::Created),
        })
        .collect();

    let count = tasks.len();
    state.ensure_day(date_key).tasks = tasks;
    log::debug!("materialized {count} task(s) for {date_key} from {weekday} template");
    count
}
