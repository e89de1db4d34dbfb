/// Tool for the per-day completion summary
///
/// This module implements the habit_summary MCP tool.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::analytics::{compute_summary, SummaryRow};
use crate::storage::HabitStorage;
use crate::tools::{ToolResponse, TrackerError};

/// The summary tool takes no arguments
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct SummaryParams {}

/// Every day record with its possible and completed counts
#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub summary: Vec<SummaryRow>,
    pub message: String,
}

impl ToolResponse for SummaryResponse {
    fn message(&self) -> &str {
        &self.message
    }
}

/// habit_summary
pub fn habit_summary<S: HabitStorage + ?Sized>(
    storage: &S,
    _params: SummaryParams,
) -> Result<SummaryResponse, TrackerError> {
    let summary = compute_summary(storage)?;

    let message = if summary.is_empty() {
        "No activity recorded yet. Toggle a habit to start filling the heatmap!".to_string()
    } else {
        let lines = summary
            .iter()
            .map(|row| {
                format!(
                    "{}: {}/{} ({}%)",
                    row.date, row.completed, row.amount, row.completion_percentage()
                )
            })
            .collect::<Vec<_>>()
            .join("\n");
        format!("📊 Activity on {} days\n\n{}", summary.len(), lines)
    };

    Ok(SummaryResponse { summary, message })
}
