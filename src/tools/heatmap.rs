/// Tool for the calendar heatmap
///
/// This module implements the habit_heatmap MCP tool.

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::analytics::{AnalyticsEngine, Heatmap};
use crate::storage::HabitStorage;
use crate::tools::{date_or, ToolResponse, TrackerError};

/// Parameters for the heatmap
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct HeatmapParams {
    /// Last day of the grid (YYYY-MM-DD); defaults to today
    pub today: Option<String>,
}

/// Heatmap grid from the tracking start through `end`
#[derive(Debug, Serialize)]
pub struct HeatmapResponse {
    pub start: NaiveDate,
    pub end: NaiveDate,
    #[serde(flatten)]
    pub heatmap: Heatmap,
    pub message: String,
}

impl ToolResponse for HeatmapResponse {
    fn message(&self) -> &str {
        &self.message
    }
}

/// habit_heatmap
pub fn habit_heatmap<S: HabitStorage + ?Sized>(
    storage: &S,
    analytics: &AnalyticsEngine,
    params: HeatmapParams,
    today: NaiveDate,
) -> Result<HeatmapResponse, TrackerError> {
    let end = date_or(params.today.as_deref(), today)?;
    let start = analytics.range_start(end);
    let heatmap = analytics.heatmap(storage, end)?;

    let active_days = heatmap.cells.iter().filter(|c| c.has_activity()).count();
    let message = format!(
        "🗓️ {} to {}: {} days, {} with activity",
        start,
        end,
        heatmap.cells.len(),
        active_days
    );

    Ok(HeatmapResponse {
        start,
        end,
        heatmap,
        message,
    })
}
