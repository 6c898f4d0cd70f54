//! Weekly recurring task templates.
//!
//! A template is a per-weekday recipe of task blueprints: a title and a
//! planned minute count, nothing else. Templates never carry completion
//! state; they only seed days through materialization.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::{lenient, WeekdayKey};

/// Placeholder title for blueprint entries saved without one.
const DEFAULT_TITLE: &str = "Task";

/// A single task blueprint inside a weekly template.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TemplateTask {
    #[serde(default)]
    pub title: String,

    #[serde(default, deserialize_with = "lenient::minutes")]
    pub minutes_planned: i64,
}

impl TemplateTask {
    pub fn new(title: impl Into<String>, minutes_planned: i64) -> Self {
        Self {
            title: title.into(),
            minutes_planned,
        }
    }

    /// Returns the blueprint in canonical form: trimmed title with a
    /// placeholder for blank ones, minutes clamped to a non-negative count.
    pub fn normalized(&self) -> Self {
        let title = self.title.trim();
        Self {
            title: if title.is_empty() {
                DEFAULT_TITLE.to_string()
            } else {
                title.to_string()
            },
            minutes_planned: self.minutes_planned.max(0),
        }
    }
}

/// Keyed-by-weekday collection of task blueprints.
///
/// The inner map is keyed by the canonical short weekday strings so that a
/// corrupt persisted document cannot poison reads: unknown keys are ignored,
/// missing keys resolve to an empty sequence, and [`WeeklyTemplate::repair`]
/// restores the all-seven-keys invariant in place.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct WeeklyTemplate {
    entries: BTreeMap<String, Vec<TemplateTask>>,
}

impl WeeklyTemplate {
    /// Returns a normalized copy of a weekday's blueprint sequence, never a
    /// live reference. A missing or corrupted entry reads as empty.
    pub fn get(&self, weekday: WeekdayKey) -> Vec<TemplateTask> {
        self.entries
            .get(weekday.as_str())
            .map(|tasks| tasks.iter().map(TemplateTask::normalized).collect())
            .unwrap_or_default()
    }

    /// Normalizes and replaces the entire sequence for one weekday.
    pub fn set(&mut self, weekday: WeekdayKey, tasks: Vec<TemplateTask>) {
        self.entries.insert(
            weekday.as_str().to_string(),
            tasks.iter().map(TemplateTask::normalized).collect(),
        );
    }

    /// Re-establishes the structural invariant: every canonical weekday key
    /// present, anything else dropped.
    pub fn repair(&mut self) {
        let mut repaired = BTreeMap::new();
        for weekday in WeekdayKey::ALL {
            let key = weekday.as_str().to_string();
            repaired.insert(key, self.entries.remove(weekday.as_str()).unwrap_or_default());
        }
        self.entries = repaired;
    }

    /// True when no weekday has any blueprint entries.
    pub fn is_empty(&self) -> bool {
        self.entries.values().all(Vec::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_weekday_reads_as_empty() {
        let template = WeeklyTemplate::default();
        for weekday in WeekdayKey::ALL {
            assert!(template.get(weekday).is_empty());
        }
    }

    #[test]
    fn test_get_returns_normalized_copies() {
        let mut template = WeeklyTemplate::default();
        template.set(
            WeekdayKey::Thu,
            vec![
                TemplateTask::new("  Math  ", 40),
                TemplateTask::new("", 30),
                TemplateTask::new("Physics", -15),
            ],
        );

        let tasks = template.get(WeekdayKey::Thu);
        assert_eq!(tasks.len(), 3);
        assert_eq!(tasks[0], TemplateTask::new("Math", 40));
        assert_eq!(tasks[1], TemplateTask::new("Task", 30));
        assert_eq!(tasks[2], TemplateTask::new("Physics", 0));
    }

    #[test]
    fn test_set_replaces_whole_sequence() {
        let mut template = WeeklyTemplate::default();
        template.set(
            WeekdayKey::Mon,
            vec![TemplateTask::new("Math", 40), TemplateTask::new("Bio", 20)],
        );
        template.set(WeekdayKey::Mon, vec![TemplateTask::new("History", 25)]);

        let tasks = template.get(WeekdayKey::Mon);
        assert_eq!(tasks, vec![TemplateTask::new("History", 25)]);
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let mut template = WeeklyTemplate::default();
        template.set(
            WeekdayKey::Fri,
            vec![TemplateTask::new("  Essay draft ", 90), TemplateTask::new("", -1)],
        );

        let once = template.get(WeekdayKey::Fri);
        template.set(WeekdayKey::Fri, once.clone());
        assert_eq!(template.get(WeekdayKey::Fri), once);
    }

    #[test]
    fn test_repair_restores_all_seven_keys_and_drops_junk() {
        let mut template: WeeklyTemplate = serde_json::from_str(
            r#"{"thu":[{"title":"Math","minutesPlanned":40}],"funday":[{"title":"x"}]}"#,
        )
        .unwrap();
        template.repair();

        let json = serde_json::to_string(&template).unwrap();
        for weekday in WeekdayKey::ALL {
            assert!(json.contains(&format!("\"{}\"", weekday.as_str())));
        }
        assert!(!json.contains("funday"));
        assert_eq!(template.get(WeekdayKey::Thu).len(), 1);
    }

    #[test]
    fn test_is_empty() {
        let mut template = WeeklyTemplate::default();
        assert!(template.is_empty());
        template.repair();
        assert!(template.is_empty());
        template.set(WeekdayKey::Tue, vec![TemplateTask::new("Math", 40)]);
        assert!(!template.is_empty());
    }
}
