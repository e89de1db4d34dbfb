/// Summary aggregation and heatmap binding rules
use chrono::NaiveDate;
use habit_heatmap_mcp::analytics::{build_heatmap, compute_summary};
use habit_heatmap_mcp::domain::date_range;
use habit_heatmap_mcp::*;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[cfg(test)]
mod summary_rules_tests {
    use super::*;

    #[test]
    fn test_summary_is_ordered_by_date() {
        let storage = MemoryStorage::new();
        let exercise = create_habit(&storage, "Exercise", &[1, 3, 5], date(2023, 1, 1)).unwrap();

        for day in [date(2023, 1, 6), date(2023, 1, 2), date(2023, 1, 4)] {
            toggle_completion(&storage, day, &exercise.id).unwrap();
        }

        let first = compute_summary(&storage).unwrap();
        let dates: Vec<NaiveDate> = first.iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![date(2023, 1, 2), date(2023, 1, 4), date(2023, 1, 6)]);
        assert_eq!(compute_summary(&storage).unwrap(), first);
    }

    #[test]
    fn test_unscheduled_completion_counts() {
        let storage = MemoryStorage::new();
        let exercise = create_habit(&storage, "Exercise", &[1, 3, 5], date(2023, 1, 1)).unwrap();

        // 2023-01-01 is a Sunday
        let outcome = toggle_completion(&storage, date(2023, 1, 1), &exercise.id).unwrap();
        assert!(outcome.completed);

        let summary = compute_summary(&storage).unwrap();
        assert_eq!(summary[0].amount, 0);
        assert_eq!(summary[0].completed, 1);
        assert_eq!(summary[0].completion_percentage(), 0);
    }

    #[test]
    fn test_completed_may_exceed_amount() {
        let storage = MemoryStorage::new();
        let sunday_walk = create_habit(&storage, "Walk", &[0], date(2023, 1, 1)).unwrap();
        let exercise = create_habit(&storage, "Exercise", &[1, 3, 5], date(2023, 1, 1)).unwrap();

        toggle_completion(&storage, date(2023, 1, 8), &sunday_walk.id).unwrap();
        toggle_completion(&storage, date(2023, 1, 8), &exercise.id).unwrap();

        let row = &compute_summary(&storage).unwrap()[0];
        assert_eq!(row.amount, 1);
        assert_eq!(row.completed, 2);
        assert_eq!(row.completion_percentage(), 200);
    }

    #[test]
    fn test_amount_follows_current_habits() {
        let storage = MemoryStorage::new();
        let exercise = create_habit(&storage, "Exercise", &[1, 3, 5], date(2023, 1, 1)).unwrap();
        toggle_completion(&storage, date(2023, 1, 2), &exercise.id).unwrap();
        assert_eq!(compute_summary(&storage).unwrap()[0].amount, 1);

        // Habits created later only count from their creation day on
        create_habit(&storage, "Read", &[1], date(2023, 1, 9)).unwrap();
        create_habit(&storage, "Stretch", &[1], date(2023, 1, 1)).unwrap();
        assert_eq!(compute_summary(&storage).unwrap()[0].amount, 2);
    }

    #[test]
    fn test_percentage_rounds() {
        let storage = MemoryStorage::new();
        let habits: Vec<Habit> = ["A", "B", "C"]
            .iter()
            .map(|title| create_habit(&storage, title, &[1], date(2023, 1, 1)).unwrap())
            .collect();
        toggle_completion(&storage, date(2023, 1, 2), &habits[0].id).unwrap();
        assert_eq!(compute_summary(&storage).unwrap()[0].completion_percentage(), 33);

        toggle_completion(&storage, date(2023, 1, 2), &habits[1].id).unwrap();
        assert_eq!(compute_summary(&storage).unwrap()[0].completion_percentage(), 67);
    }

    #[test]
    fn test_heatmap_joins_by_date() {
        let storage = MemoryStorage::new();
        let exercise = create_habit(&storage, "Exercise", &[1, 3, 5], date(2023, 1, 1)).unwrap();
        toggle_completion(&storage, date(2023, 1, 4), &exercise.id).unwrap();

        let range = date_range(date(2023, 1, 1), date(2023, 1, 7));
        let heatmap = build_heatmap(&range, &compute_summary(&storage).unwrap(), 90);

        assert_eq!(heatmap.cells.len(), 7);
        assert_eq!(heatmap.placeholders, 83);
        let active: Vec<&HeatmapCell> = heatmap.cells.iter().filter(|c| c.has_activity()).collect();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].date, date(2023, 1, 4));
        assert_eq!(active[0].week_day, 3);
        assert_eq!(active[0].completion_percentage, 100);
    }

    #[test]
    fn test_long_range_needs_no_placeholders() {
        let range = date_range(date(2023, 1, 1), date(2023, 6, 30));
        let heatmap = build_heatmap(&range, &[], 90);
        assert_eq!(heatmap.placeholders, 0);
        assert!(heatmap.cells.iter().all(|c| c.amount.is_none()));
    }
}
