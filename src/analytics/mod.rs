/// Analytics engine for day resolution, summaries and the heatmap
///
/// This module turns raw habit and completion records into what the
/// heatmap needs: per-day views, per-day completion totals and the
/// calendar grid joining them.

pub mod heatmap;
pub mod resolver;
pub mod summary;

pub use heatmap::*;
pub use resolver::*;
pub use summary::*;

use chrono::NaiveDate;

use crate::domain::{date_range, year_start};
use crate::storage::{HabitStorage, StorageError};

/// Analytics engine for processing habit data
///
/// Holds the heatmap settings; all data comes from the storage passed to
/// each call.
#[derive(Debug, Clone, Default)]
pub struct AnalyticsEngine {
    config: HeatmapConfig,
}

impl AnalyticsEngine {
    /// Create a new analytics engine
    pub fn new(config: HeatmapConfig) -> Self {
        Self { config }
    }

    /// First day shown in the heatmap for the given `today`
    pub fn range_start(&self, today: NaiveDate) -> NaiveDate {
        self.config.tracking_start.unwrap_or_else(|| year_start(today))
    }

    /// Every calendar day from the configured start through `today`
    pub fn calendar_range(&self, today: NaiveDate) -> Vec<NaiveDate> {
        date_range(self.range_start(today), today)
    }

    /// Heatmap grid from the configured start through `today`
    pub fn heatmap<S: HabitStorage + ?Sized>(
        &self,
        storage: &S,
        today: NaiveDate,
    ) -> Result<Heatmap, StorageError> {
        let range = self.calendar_range(today);
        let summary = compute_summary(storage)?;
        Ok(build_heatmap(&range, &summary, self.config.min_grid_days))
    }
}
