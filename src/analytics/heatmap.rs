/// Heatmap grid: the calendar range joined with summary rows
///
/// Days without a summary row are still emitted so the grid has no gaps;
/// they simply carry no totals.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::analytics::SummaryRow;
use crate::domain::week_day_index;

/// 18 weeks of 5 visible rows, the smallest grid the heatmap renders
pub const DEFAULT_MIN_GRID_DAYS: usize = 18 * 5;

/// Settings for building the heatmap
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeatmapConfig {
    /// First day of the grid; January 1 of the current year when unset
    pub tracking_start: Option<NaiveDate>,
    /// The grid is padded with placeholders up to this many cells
    pub min_grid_days: usize,
}

impl Default for HeatmapConfig {
    fn default() -> Self {
        Self {
            tracking_start: None,
            min_grid_days: DEFAULT_MIN_GRID_DAYS,
        }
    }
}

/// One square of the heatmap
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeatmapCell {
    pub date: NaiveDate,
    /// Sunday-based weekday index, used to place the cell in its column
    pub week_day: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<u32>,
    pub completion_percentage: u32,
}

impl HeatmapCell {
    /// Whether the day has a day record behind it
    pub fn has_activity(&self) -> bool {
        self.amount.is_some()
    }
}

/// The full grid plus the number of empty placeholders appended after it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Heatmap {
    pub cells: Vec<HeatmapCell>,
    pub placeholders: usize,
}

/// Join `range` with `summary` by exact calendar day
pub fn build_heatmap(range: &[NaiveDate], summary: &[SummaryRow], min_grid_days: usize) -> Heatmap {
    let by_date: HashMap<NaiveDate, &SummaryRow> =
        summary.iter().map(|row| (row.date, row)).collect();

    let cells = range
        .iter()
        .map(|&date| match by_date.get(&date) {
            Some(row) => HeatmapCell {
                date,
                week_day: week_day_index(date),
                amount: Some(row.amount),
                completed: Some(row.completed),
                completion_percentage: row.completion_percentage(),
            },
            None => HeatmapCell {
                date,
                week_day: week_day_index(date),
                amount: None,
                completed: None,
                completion_percentage: 0,
            },
        })
        .collect();

    Heatmap {
        cells,
        placeholders: min_grid_days.saturating_sub(range.len()),
    }
}
