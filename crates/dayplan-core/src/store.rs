//! State persistence against a synchronous string key-value store.
//!
//! The whole planner state is one JSON document under one key. Loading is
//! deliberately forgiving: a missing key, malformed JSON, or a partially
//! shaped document never fails — each section of the state recovers
//! independently against the provided defaults, and only the unreadable
//! pieces are dropped. Saving reports errors to the caller, who is expected
//! to log and carry on with the in-memory state.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;

use crate::datekey;
use crate::error::{Result, StoreResultExt};
use crate::models::{Day, PlannerState, View};
use crate::templates::WeeklyTemplate;

/// Key under which the planner state document is stored.
pub const STATE_KEY: &str = "dayplan.state";

/// Synchronous load/save contract for the planner state.
pub trait StateStore {
    /// Loads the state under `key`, recovering section-by-section against
    /// `defaults`. Never fails; unreadable pieces are dropped with a warning.
    fn load(&self, key: &str, defaults: PlannerState) -> PlannerState;

    /// Writes the state under `key`. The caller treats failure as non-fatal.
    fn save(&self, key: &str, state: &PlannerState) -> Result<()>;

    /// Removes the value under `key` (startup reset).
    fn clear(&self, key: &str) -> Result<()>;
}

/// Rebuilds a structurally complete state from a raw JSON document.
///
/// Each top-level section falls back to its default independently; day
/// entries that fail to decode (or carry an invalid date key) are dropped
/// one by one rather than poisoning the rest.
pub fn decode_state(raw: &str, defaults: PlannerState) -> PlannerState {
    let root: Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(e) => {
            log::warn!("persisted state is not valid JSON ({e}), using defaults");
            return defaults;
        }
    };
    if !root.is_object() {
        log::warn!("persisted state is not an object, using defaults");
        return defaults;
    }

    let mut state = defaults;

    if let Some(selected) = root.get("selectedDate").and_then(Value::as_str) {
        if datekey::parse_date_key(selected).is_some() {
            state.selected_date = selected.to_string();
        } else {
            log::warn!("persisted selectedDate '{selected}' is invalid, keeping default");
        }
    }

    if let Some(view) = root.get("currentView") {
        match serde_json::from_value::<View>(view.clone()) {
            Ok(view) => state.current_view = view,
            Err(_) => log::warn!("persisted currentView is invalid, keeping default"),
        }
    }

    if let Some(days) = root.get("days").and_then(Value::as_object) {
        for (date_key, value) in days {
            if datekey::parse_date_key(date_key).is_none() {
                log::warn!("dropping day entry with invalid key '{date_key}'");
                continue;
            }
            match serde_json::from_value::<Day>(value.clone()) {
                Ok(day) => {
                    state.days.insert(date_key.clone(), day);
                }
                Err(e) => log::warn!("dropping unreadable day entry '{date_key}': {e}"),
            }
        }
    }

    if let Some(templates) = root.get("scheduleTemplates") {
        match serde_json::from_value::<WeeklyTemplate>(templates.clone()) {
            Ok(templates) => state.schedule_templates = templates,
            Err(_) => log::warn!("persisted templates are unreadable, keeping default"),
        }
    }
    state.schedule_templates.repair();

    state
}

/// Key-value store backed by a single-table SQLite database.
pub struct SqliteStore {
    connection: Connection,
}

impl SqliteStore {
    /// Opens (or creates) the database at `path` and initializes the schema.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection =
            Connection::open(path).store_context("Failed to open key-value store")?;
        connection
            .execute(
                "CREATE TABLE IF NOT EXISTS kv (key TEXT PRIMARY KEY, value TEXT NOT NULL)",
                [],
            )
            .store_context("Failed to initialize key-value schema")?;
        Ok(Self { connection })
    }

    fn read(&self, key: &str) -> Result<Option<String>> {
        self.connection
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()
            .store_context("Failed to read key")
    }
}

impl StateStore for SqliteStore {
    fn load(&self, key: &str, defaults: PlannerState) -> PlannerState {
        match self.read(key) {
            Ok(Some(raw)) => decode_state(&raw, defaults),
            Ok(None) => defaults,
            Err(e) => {
                log::warn!("failed to load persisted state ({e}), using defaults");
                defaults
            }
        }
    }

    fn save(&self, key: &str, state: &PlannerState) -> Result<()> {
        let raw = serde_json::to_string(state)?;
        self.connection
            .execute(
                "INSERT INTO kv (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                params![key, raw],
            )
            .store_context("Failed to write key")?;
        Ok(())
    }

    fn clear(&self, key: &str) -> Result<()> {
        self.connection
            .execute("DELETE FROM kv WHERE key = ?1", params![key])
            .store_context("Failed to clear key")?;
        Ok(())
    }
}

/// In-process store for tests and ephemeral sessions. Values still round-trip
/// through JSON so the persisted shape is exercised.
#[derive(Default)]
pub struct MemoryStore {
    cells: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStore {
    fn load(&self, key: &str, defaults: PlannerState) -> PlannerState {
        match self.cells.borrow().get(key) {
            Some(raw) => decode_state(raw, defaults),
            None => defaults,
        }
    }

    fn save(&self, key: &str, state: &PlannerState) -> Result<()> {
        let raw = serde_json::to_string(state)?;
        self.cells.borrow_mut().insert(key.to_string(), raw);
        Ok(())
    }

    fn clear(&self, key: &str) -> Result<()> {
        self.cells.borrow_mut().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WeekdayKey;
    use crate::templates::TemplateTask;

    fn sample_state() -> PlannerState {
        let mut state = PlannerState::default();
        state.selected_date = "2025-01-01".to_string();
        state
            .schedule_templates
            .set(WeekdayKey::Thu, vec![TemplateTask::new("Math", 40)]);
        state.ensure_day("2025-01-01").meta.note = "exam week".to_string();
        state
    }

    #[test]
    fn test_decode_garbage_falls_back_to_defaults() {
        let defaults = PlannerState::default();
        assert_eq!(decode_state("not json", defaults.clone()), defaults);
        let decoded = decode_state("[1,2,3]", defaults.clone());
        assert_eq!(decoded.selected_date, defaults.selected_date);
        assert!(decoded.days.is_empty());
    }

    #[test]
    fn test_decode_partial_document() {
        let decoded = decode_state(
            r#"{"selectedDate":"2025-06-10"}"#,
            PlannerState::default(),
        );
        assert_eq!(decoded.selected_date, "2025-06-10");
        assert_eq!(decoded.current_view, View::Dashboard);
        assert!(decoded.days.is_empty());
    }

    #[test]
    fn test_decode_drops_only_bad_day_entries() {
        let raw = r#"{
            "days": {
                "2025-01-01": {"tasks": [], "meta": {"note": "keep me"}},
                "2025-02-31": {"tasks": []},
                "2025-01-02": "not a day"
            }
        }"#;
        let decoded = decode_state(raw, PlannerState::default());
        assert_eq!(decoded.days.len(), 1);
        assert_eq!(decoded.day("2025-01-01").unwrap().meta.note, "keep me");
    }

    #[test]
    fn test_decode_invalid_selected_date_keeps_default() {
        let defaults = PlannerState::default();
        let expected = defaults.selected_date.clone();
        let decoded = decode_state(r#"{"selectedDate":"soon"}"#, defaults);
        assert_eq!(decoded.selected_date, expected);
    }

    #[test]
    fn test_decode_repairs_templates() {
        let raw = r#"{"scheduleTemplates":{"thu":[{"title":"Math","minutesPlanned":40}]}}"#;
        let decoded = decode_state(raw, PlannerState::default());
        assert_eq!(decoded.schedule_templates.get(WeekdayKey::Thu).len(), 1);
        assert!(decoded.schedule_templates.get(WeekdayKey::Mon).is_empty());
    }

    #[test]
    fn test_sqlite_store_round_trip() {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let store = SqliteStore::new(dir.path().join("test.db")).expect("store");

        let state = sample_state();
        store.save(STATE_KEY, &state).expect("save");
        let loaded = store.load(STATE_KEY, PlannerState::default());
        assert_eq!(loaded.selected_date, "2025-01-01");
        assert_eq!(loaded.day("2025-01-01").unwrap().meta.note, "exam week");
        assert_eq!(loaded.schedule_templates.get(WeekdayKey::Thu).len(), 1);
    }

    #[test]
    fn test_sqlite_store_missing_key_yields_defaults() {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let store = SqliteStore::new(dir.path().join("test.db")).expect("store");
        let loaded = store.load(STATE_KEY, PlannerState::default());
        assert!(loaded.days.is_empty());
    }

    #[test]
    fn test_sqlite_store_clear() {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let store = SqliteStore::new(dir.path().join("test.db")).expect("store");
        store.save(STATE_KEY, &sample_state()).expect("save");
        store.clear(STATE_KEY).expect("clear");
        let loaded = store.load(STATE_KEY, PlannerState::default());
        assert!(loaded.days.is_empty());
    }

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryStore::new();
        store.save(STATE_KEY, &sample_state()).expect("save");
        let loaded = store.load(STATE_KEY, PlannerState::default());
        assert_eq!(loaded.day("2025-01-01").unwrap().meta.note, "exam week");
    }
}
