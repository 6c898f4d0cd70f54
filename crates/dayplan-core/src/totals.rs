//! Aggregate progress metrics over a task list.
//!
//! Everything in this module is pure: the inputs are a task slice and, for
//! the finish estimate, an explicit "now". Callers decide where "now" comes
//! from; tests pass a fixed instant.

use jiff::{Span, Zoned};
use serde::Serialize;

use crate::datekey;
use crate::models::EffectiveTask;

/// Aggregate planned/done/left minutes and overall percentage for one day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    /// Total planned minutes
    pub planned: i64,
    /// Minutes accounted for by completion percentages
    pub done: i64,
    /// Minutes still open
    pub left: i64,
    /// Overall completion, 0..100
    pub percent: i64,
}

/// Clamps a raw completion percentage into 0..=100.
pub fn clamp_percent(raw: i64) -> i64 {
    raw.clamp(0, 100)
}

/// Computes aggregate totals over the effective tasks of a day.
///
/// Per task, the completion percentage is clamped to 0..=100 and an
/// effectively-done task (toggled done, or at 100 percent) counts its full
/// planned minutes. The aggregate `done` is clamped so per-task rounding can
/// never report more minutes done than were planned.
pub fn compute_totals(tasks: &[EffectiveTask]) -> Totals {
    let mut planned: i64 = 0;
    let mut done: i64 = 0;

    for task in tasks {
        let minutes = task.minutes_planned().max(0);
        let percent = if task.effectively_done() {
            100
        } else {
            clamp_percent(task.done_percent())
        };
        planned += minutes;
        done += ((minutes as f64) * (percent as f64) / 100.0).round() as i64;
    }

    done = done.min(planned);
    let left = (planned - done).max(0);
    let percent = if planned > 0 {
        ((done as f64) / (planned as f64) * 100.0).round() as i64
    } else {
        0
    };

    Totals {
        planned,
        done,
        left,
        percent,
    }
}

/// Projects a finish time for the remaining minutes and renders it as a
/// short label: `"all done"`, `"today by 18:30"`, `"tomorrow by 00:15"`,
/// `"day after tomorrow by 09:00"`, or `"2025-03-02 by 09:00"` for anything
/// further out.
pub fn eta_label(left_minutes: i64, now: &Zoned) -> String {
    if left_minutes <= 0 {
        return "all done".to_string();
    }

    let finish = now
        .checked_add(Span::new().minutes(left_minutes))
        .unwrap_or_else(|_| now.clone());
    let day_offset = now
        .date()
        .until(finish.date())
        .map(|span| span.get_days())
        .unwrap_or(0);

    let day_phrase = match day_offset {
        0 => "today".to_string(),
        1 => "tomorrow".to_string(),
        2 => "day after tomorrow".to_string(),
        _ => datekey::to_date_key(finish.date()),
    };

    format!("{day_phrase} by {:02}:{:02}", finish.hour(), finish.minute())
}

/// Renders a minute count for humans: `0 → "0 min"`, `65 → "1 h 5 min"`.
pub fn format_minutes(minutes: i64) -> String {
    let v = minutes.max(0);
    let h = v / 60;
    let m = v % 60;
    if h == 0 {
        format!("{m} min")
    } else {
        format!("{h} h {m} min")
    }
}
