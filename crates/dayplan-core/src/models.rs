//! Data models for days, tasks, and the planner state root.
//!
//! The central distinction in this module is between a materialized [`Task`]
//! (persisted, independently editable, carries identity and mutation history)
//! and a [`VirtualTask`] (a non-persistent projection derived from a weekly
//! template entry). Code that consumes "the tasks in effect for a date" works
//! with the [`EffectiveTask`] sum type and pattern-matches on the variant
//! instead of probing for a marker field.
//!
//! All persisted structs serialize with camelCase field names, matching the
//! JSON document shape the state store reads and writes.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use jiff::civil::Weekday;
use jiff::Timestamp;
use rand::{distributions::Alphanumeric, thread_rng, Rng};
use serde::{Deserialize, Serialize};

use crate::datekey;
use crate::templates::WeeklyTemplate;

const TASK_ID_LEN: usize = 12;

/// Generates a fresh opaque task id (random alphanumeric).
pub fn new_task_id() -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TASK_ID_LEN)
        .map(char::from)
        .collect()
}

/// Canonical weekday buckets, Sunday first (Sunday = 0 convention).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekdayKey {
    Sun,
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
}

impl WeekdayKey {
    /// All seven keys in Sunday-first order.
    pub const ALL: [WeekdayKey; 7] = [
        WeekdayKey::Sun,
        WeekdayKey::Mon,
        WeekdayKey::Tue,
        WeekdayKey::Wed,
        WeekdayKey::Thu,
        WeekdayKey::Fri,
        WeekdayKey::Sat,
    ];

    /// Canonical short key used in persisted maps and synthetic ids.
    pub fn as_str(&self) -> &'static str {
        match self {
            WeekdayKey::Sun => "sun",
            WeekdayKey::Mon => "mon",
            WeekdayKey::Tue => "tue",
            WeekdayKey::Wed => "wed",
            WeekdayKey::Thu => "thu",
            WeekdayKey::Fri => "fri",
            WeekdayKey::Sat => "sat",
        }
    }

    /// Full English weekday name for display.
    pub fn label(&self) -> &'static str {
        match self {
            WeekdayKey::Sun => "Sunday",
            WeekdayKey::Mon => "Monday",
            WeekdayKey::Tue => "Tuesday",
            WeekdayKey::Wed => "Wednesday",
            WeekdayKey::Thu => "Thursday",
            WeekdayKey::Fri => "Friday",
            WeekdayKey::Sat => "Saturday",
        }
    }

    /// Maps a civil weekday into the Sunday = 0 bucket convention.
    pub fn from_civil(weekday: Weekday) -> Self {
        Self::ALL[weekday.to_sunday_zero_offset() as usize]
    }
}

impl FromStr for WeekdayKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sun" | "sunday" => Ok(WeekdayKey::Sun),
            "mon" | "monday" => Ok(WeekdayKey::Mon),
            "tue" | "tuesday" => Ok(WeekdayKey::Tue),
            "wed" | "wednesday" => Ok(WeekdayKey::Wed),
            "thu" | "thursday" => Ok(WeekdayKey::Thu),
            "fri" | "friday" => Ok(WeekdayKey::Fri),
            "sat" | "saturday" => Ok(WeekdayKey::Sat),
            _ => Err(format!("Invalid weekday: {s}")),
        }
    }
}

impl fmt::Display for WeekdayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Type-safe enumeration of the planner's screens.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum View {
    #[default]
    Dashboard,
    Schedule,
    Calendar,
}

impl View {
    pub fn as_str(&self) -> &'static str {
        match self {
            View::Dashboard => "dashboard",
            View::Schedule => "schedule",
            View::Calendar => "calendar",
        }
    }
}

impl FromStr for View {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dashboard" => Ok(View::Dashboard),
            "schedule" => Ok(View::Schedule),
            "calendar" => Ok(View::Calendar),
            _ => Err(format!("Invalid view: {s}")),
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The last mutation recorded against a task.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LastAction {
    #[default]
    Created,
    Edited,
    Deleted,
}

/// Mutation bookkeeping attached to every materialized task.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskMeta {
    /// Timestamp of the last mutation (UTC)
    #[serde(default = "epoch")]
    pub updated_at: Timestamp,

    /// What the last mutation was
    #[serde(default)]
    pub last_action: LastAction,

    /// Originating device, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,
}

fn epoch() -> Timestamp {
    Timestamp::UNIX_EPOCH
}

impl Default for TaskMeta {
    fn default() -> Self {
        Self {
            updated_at: Timestamp::UNIX_EPOCH,
            last_action: LastAction::Created,
            device_id: None,
        }
    }
}

impl TaskMeta {
    /// Fresh metadata stamped with the current time.
    pub fn stamp(last_action: LastAction) -> Self {
        Self {
            updated_at: Timestamp::now(),
            last_action,
            device_id: None,
        }
    }
}

/// A materialized, persisted task for one specific date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Opaque unique identifier
    #[serde(default)]
    pub id: String,

    /// Title of the task
    #[serde(default)]
    pub title: String,

    /// Planned effort in minutes (non-negative)
    #[serde(default, deserialize_with = "lenient::minutes")]
    pub minutes_planned: i64,

    /// Completion percentage, 0..100
    #[serde(default, deserialize_with = "lenient::percent")]
    pub done_percent: i64,

    /// Whether the task has been marked done
    #[serde(default)]
    pub is_done: bool,

    /// Position within the day's task list
    #[serde(default)]
    pub sort_index: i64,

    /// Mutation bookkeeping
    #[serde(default)]
    pub meta: TaskMeta,
}

impl Task {
    /// True when the task counts as finished: explicitly toggled done, or at
    /// (or past) 100 percent.
    pub fn effectively_done(&self) -> bool {
        self.is_done || self.done_percent >= 100
    }
}

/// Free-form per-day annotations.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DayMeta {
    #[serde(default)]
    pub note: String,
}

/// The materialized task list for one date.
///
/// A day with an empty task list is treated as unmaterialized: reads fall
/// back to the virtual projection and the entry is a candidate for removal.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Day {
    #[serde(default)]
    pub tasks: Vec<Task>,

    #[serde(default)]
    pub meta: DayMeta,
}

/// A non-persistent projection of a template entry onto a concrete date.
///
/// The synthetic id encodes the source weekday and the template index, so a
/// later mutation can materialize the template and find the corresponding
/// real task by position.
#[derive(Debug, Clone, PartialEq)]
pub struct VirtualTask {
    pub id: String,
    pub title: String,
    pub minutes_planned: i64,
    /// Weekday whose template produced this projection
    pub source_weekday: WeekdayKey,
    /// Position of the source entry within that template
    pub template_index: usize,
}

impl VirtualTask {
    /// Builds the deterministic synthetic id `virt_<weekday>_<index>`.
    pub fn synthetic_id(weekday: WeekdayKey, index: usize) -> String {
        format!("virt_{}_{index}", weekday.as_str())
    }

    /// Recovers `(weekday, index)` from a synthetic id, or `None` when the id
    /// does not have the virtual shape.
    pub fn parse_id(id: &str) -> Option<(WeekdayKey, usize)> {
        let rest = id.strip_prefix("virt_")?;
        let (weekday, index) = rest.split_once('_')?;
        Some((weekday.parse().ok()?, index.parse().ok()?))
    }
}

/// A task as shown for a date: real when the day is materialized, virtual
/// when the day falls back to a template projection.
#[derive(Debug, Clone, PartialEq)]
pub enum EffectiveTask {
    Real(Task),
    Virtual(VirtualTask),
}

impl EffectiveTask {
    pub fn id(&self) -> &str {
        match self {
            EffectiveTask::Real(task) => &task.id,
            EffectiveTask::Virtual(task) => &task.id,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            EffectiveTask::Real(task) => &task.title,
            EffectiveTask::Virtual(task) => &task.title,
        }
    }

    pub fn minutes_planned(&self) -> i64 {
        match self {
            EffectiveTask::Real(task) => task.minutes_planned,
            EffectiveTask::Virtual(task) => task.minutes_planned,
        }
    }

    /// Completion percentage; a virtual task is always untouched.
    pub fn done_percent(&self) -> i64 {
        match self {
            EffectiveTask::Real(task) => task.done_percent,
            EffectiveTask::Virtual(_) => 0,
        }
    }

    pub fn is_done(&self) -> bool {
        match self {
            EffectiveTask::Real(task) => task.is_done,
            EffectiveTask::Virtual(_) => false,
        }
    }

    pub fn effectively_done(&self) -> bool {
        match self {
            EffectiveTask::Real(task) => task.effectively_done(),
            EffectiveTask::Virtual(_) => false,
        }
    }

    pub fn is_virtual(&self) -> bool {
        matches!(self, EffectiveTask::Virtual(_))
    }
}

/// The single mutable state root owned by the application session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlannerState {
    /// Date key the UI is currently focused on
    #[serde(default)]
    pub selected_date: String,

    /// Screen the UI is currently showing
    #[serde(default)]
    pub current_view: View,

    /// Materialized days, keyed by date key
    #[serde(default)]
    pub days: BTreeMap<String, Day>,

    /// Weekly recurring task blueprints
    #[serde(default)]
    pub schedule_templates: WeeklyTemplate,
}

impl Default for PlannerState {
    fn default() -> Self {
        Self {
            selected_date: datekey::to_date_key(datekey::today()),
            current_view: View::Dashboard,
            days: BTreeMap::new(),
            schedule_templates: WeeklyTemplate::default(),
        }
    }
}

impl PlannerState {
    /// Read access to a day's materialized entry, if any.
    pub fn day(&self, date_key: &str) -> Option<&Day> {
        self.days.get(date_key)
    }

    /// Returns the day entry for a date, creating an empty one on first use.
    pub fn ensure_day(&mut self, date_key: &str) -> &mut Day {
        self.days.entry(date_key.to_string()).or_default()
    }

    /// Drops a day entry, reverting the date to unmaterialized.
    pub fn remove_day(&mut self, date_key: &str) {
        self.days.remove(date_key);
    }
}

/// Deserializers that coerce sloppy persisted numbers instead of failing the
/// whole document: floats are truncated or rounded, non-numbers read as 0.
pub(crate) mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn minutes<'de, D>(deserializer: D) -> Result<i64, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(coerce(value, |f| f.trunc().max(0.0)))
    }

    pub fn percent<'de, D>(deserializer: D) -> Result<i64, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(coerce(value, f64::round))
    }

    fn coerce(value: Option<Value>, shape: impl Fn(f64) -> f64) -> i64 {
        match value.as_ref().and_then(Value::as_f64) {
            Some(f) if f.is_finite() => shape(f) as i64,
            _ => 0,
        }
    }
}
