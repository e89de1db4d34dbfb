/// Tool for looking at a single day
///
/// This module implements the habit_day MCP tool.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::analytics::{resolve_day, DayView};
use crate::domain::parse_day;
use crate::storage::HabitStorage;
use crate::tools::{ToolResponse, TrackerError};

/// Parameters for resolving a day
#[derive(Debug, Deserialize, JsonSchema)]
pub struct DayParams {
    /// Day to look at (YYYY-MM-DD or ISO 8601 timestamp; time of day is ignored)
    pub date: String,
}

/// Possible and completed habits for the requested day
#[derive(Debug, Serialize)]
pub struct DayResponse {
    #[serde(flatten)]
    pub day: DayView,
    pub message: String,
}

impl ToolResponse for DayResponse {
    fn message(&self) -> &str {
        &self.message
    }
}

/// habit_day
pub fn habit_day<S: HabitStorage + ?Sized>(
    storage: &S,
    params: DayParams,
) -> Result<DayResponse, TrackerError> {
    let date = parse_day(&params.date)?;
    let day = resolve_day(storage, date)?;

    let message = if day.possible_habits.is_empty() {
        format!("📅 {}: no habits scheduled", date.format("%A %Y-%m-%d"))
    } else {
        let done = day
            .possible_habits
            .iter()
            .filter(|h| day.is_completed(&h.id))
            .count();
        let lines = day
            .possible_habits
            .iter()
            .map(|h| {
                let mark = if day.is_completed(&h.id) { "✅" } else { "⬜" };
                format!("{} {} ({})", mark, h.title, h.id)
            })
            .collect::<Vec<_>>()
            .join("\n");
        format!(
            "📅 {}: {} of {} habits done\n\n{}",
            date.format("%A %Y-%m-%d"),
            done,
            day.possible_habits.len(),
            lines
        )
    };

    Ok(DayResponse { day, message })
}
