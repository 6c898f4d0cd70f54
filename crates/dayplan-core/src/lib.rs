//! Core library for the dayplan study planner.
//!
//! This crate provides the planner's engine: the date-key codec, the pure
//! totals calculator, the weekly template store, the day resolution engine
//! (real tasks vs. virtual template projections), and the mutation
//! operations that promote a projected day into a real one on first write.
//!
//! # Architecture
//!
//! - [`models`] holds the persisted data shapes and the
//!   [`EffectiveTask`](models::EffectiveTask) sum type that resolution
//!   produces.
//! - [`planner`] owns the single mutable state root; every mutation is a
//!   read-modify-write followed by a synchronous save through [`store`].
//! - [`display`] wraps computed values in `fmt::Display` types; interface
//!   crates render them without reaching into the state.
//!
//! # Quick Start
//!
//! ```rust
//! use dayplan_core::{
//!     params::{AddTask, ToggleTask},
//!     MemoryStore, PlannerBuilder,
//! };
//!
//! # fn example() -> dayplan_core::Result<()> {
//! let mut planner = PlannerBuilder::new()
//!     .with_store(Box::new(MemoryStore::new()))
//!     .build()?;
//!
//! planner.select_date("2025-01-01");
//! let task = planner.add_task(&AddTask {
//!     title: "Math revision".to_string(),
//!     minutes_planned: 40,
//! })?;
//!
//! planner.toggle_task(&ToggleTask { id: task.id, done: true })?;
//! let (totals, eta) = planner.day_stats("2025-01-01");
//! assert_eq!(totals.left, 0);
//! assert_eq!(eta, "all done");
//! # Ok(())
//! # }
//! ```

pub mod datekey;
pub mod display;
pub mod error;
pub mod models;
pub mod params;
pub mod planner;
pub mod resolve;
pub mod store;
pub mod templates;
pub mod totals;

// Re-export commonly used types
pub use display::{DayStats, MutationResult, Notice, TaskList, TemplateList};
pub use error::{PlannerError, Result};
pub use models::{
    Day, EffectiveTask, LastAction, PlannerState, Task, TaskMeta, View, VirtualTask, WeekdayKey,
};
pub use planner::{Planner, PlannerBuilder};
pub use store::{MemoryStore, SqliteStore, StateStore, STATE_KEY};
pub use templates::{TemplateTask, WeeklyTemplate};
pub use totals::{compute_totals, eta_label, format_minutes, Totals};
