//! Tick callback that keeps the day snapshots for the final report.

use hominids_core::{DaySnapshot, Simulation, TickCallback, TickSummary};
use tracing::debug;

/// Collects every day snapshot the run produces.
#[derive(Debug, Default)]
pub struct ReportCallback {
    days: Vec<DaySnapshot>,
    keep_activity: bool,
}

impl ReportCallback {
    /// Create a collector. With `keep_activity` false the per-day cell
    /// tallies are dropped to keep the report small.
    pub const fn new(keep_activity: bool) -> Self {
        Self {
            days: Vec::new(),
            keep_activity,
        }
    }

    /// Take the snapshots collected so far, in day order.
    pub fn take_days(&mut self) -> Vec<DaySnapshot> {
        std::mem::take(&mut self.days)
    }
}

impl TickCallback for ReportCallback {
    fn on_tick(&mut self, summary: &TickSummary, _sim: &Simulation) {
        if let Some(day) = &summary.day {
            let mut day = day.clone();
            if !self.keep_activity {
                day.activity.clear();
            }
            debug!(day = day.day, cells = day.activity.len(), "Day snapshot stored");
            self.days.push(day);
        }
    }
}
