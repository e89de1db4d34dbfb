/// End-to-end workflow against an on-disk SQLite database
use chrono::NaiveDate;
use habit_heatmap_mcp::analytics::{compute_summary, resolve_day};
use habit_heatmap_mcp::*;
use tempfile::tempdir;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[cfg(test)]
mod workflow_tests {
    use super::*;

    #[test]
    fn test_exercise_scenario() {
        let dir = tempdir().expect("Failed to create temp dir");
        let storage = SqliteStorage::new(dir.path().join("habits.db")).expect("Failed to open storage");

        let exercise = create_habit(&storage, "Exercise", &[1, 3, 5], date(2023, 1, 1)).unwrap();

        // 2023-01-02 is a Monday, 2023-01-01 a Sunday
        let monday = resolve_day(&storage, date(2023, 1, 2)).unwrap();
        assert_eq!(monday.possible_habits, vec![exercise.clone()]);
        assert!(monday.completed_habit_ids.is_empty());
        let sunday = resolve_day(&storage, date(2023, 1, 1)).unwrap();
        assert!(sunday.possible_habits.is_empty());

        let outcome = toggle_completion(&storage, date(2023, 1, 2), &exercise.id).unwrap();
        assert!(outcome.completed);
        assert_eq!(outcome.day.date, date(2023, 1, 2));
        assert_eq!(
            resolve_day(&storage, date(2023, 1, 2)).unwrap().completed_habit_ids,
            vec![exercise.id]
        );

        let summary = compute_summary(&storage).unwrap();
        assert_eq!(summary.len(), 1);
        assert_eq!(summary[0].date, date(2023, 1, 2));
        assert_eq!(summary[0].amount, 1);
        assert_eq!(summary[0].completed, 1);
        assert_eq!(summary[0].day_id, outcome.day.id);

        let outcome = toggle_completion(&storage, date(2023, 1, 2), &exercise.id).unwrap();
        assert!(!outcome.completed);
        assert!(resolve_day(&storage, date(2023, 1, 2))
            .unwrap()
            .completed_habit_ids
            .is_empty());
    }

    #[test]
    fn test_untoggled_day_stays_in_summary() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        let exercise = create_habit(&storage, "Exercise", &[1, 3, 5], date(2023, 1, 1)).unwrap();

        toggle_completion(&storage, date(2023, 1, 4), &exercise.id).unwrap();
        toggle_completion(&storage, date(2023, 1, 4), &exercise.id).unwrap();

        let day = storage.find_day_by_date(date(2023, 1, 4)).unwrap();
        assert!(day.is_some());

        let summary = compute_summary(&storage).unwrap();
        assert_eq!(summary.len(), 1);
        assert_eq!(summary[0].amount, 1);
        assert_eq!(summary[0].completed, 0);
        assert_eq!(summary[0].completion_percentage(), 0);
    }

    #[test]
    fn test_missing_habit_creates_no_day() {
        let storage = SqliteStorage::open_in_memory().unwrap();

        let err = toggle_completion(&storage, date(2023, 1, 2), &HabitId::new()).unwrap_err();
        assert_eq!(err.kind(), "not_found");

        assert!(storage.find_day_by_date(date(2023, 1, 2)).unwrap().is_none());
        assert!(compute_summary(&storage).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_habits_are_not_written() {
        let storage = SqliteStorage::open_in_memory().unwrap();

        let err = create_habit(&storage, "   ", &[1], date(2023, 1, 1)).unwrap_err();
        assert_eq!(err.kind(), "validation");
        let err = create_habit(&storage, "Read", &[], date(2023, 1, 1)).unwrap_err();
        assert_eq!(err.kind(), "validation");
        let err = create_habit(&storage, "Read", &[7], date(2023, 1, 1)).unwrap_err();
        assert_eq!(err.kind(), "validation");

        assert!(list_habits(&storage).unwrap().is_empty());
    }

    #[test]
    fn test_data_survives_reopen() {
        let dir = tempdir().expect("Failed to create temp dir");
        let db_path = dir.path().join("habits.db");

        let (reading, exercise) = {
            let storage = SqliteStorage::new(&db_path).unwrap();
            let reading = create_habit(&storage, "Read", &[0, 6], date(2023, 1, 1)).unwrap();
            let exercise = create_habit(&storage, "Exercise", &[1, 3, 5], date(2023, 1, 1)).unwrap();
            toggle_completion(&storage, date(2023, 1, 7), &reading.id).unwrap();
            (reading, exercise)
        };

        let storage = SqliteStorage::new(&db_path).unwrap();
        let habits = list_habits(&storage).unwrap();
        assert_eq!(habits, vec![reading.clone(), exercise]);

        let saturday = resolve_day(&storage, date(2023, 1, 7)).unwrap();
        assert_eq!(saturday.completed_habit_ids, vec![reading.id]);
    }

    #[tokio::test]
    async fn test_server_heatmap_uses_config() {
        let dir = tempdir().expect("Failed to create temp dir");
        let config = HeatmapConfig {
            tracking_start: Some(date(2023, 2, 1)),
            min_grid_days: 30,
        };
        let server = HabitTrackerServer::new(dir.path().join("habits.db"), config)
            .await
            .expect("Failed to create server");

        let exercise =
            create_habit(server.storage(), "Exercise", &[1, 3, 5], date(2023, 1, 1)).unwrap();
        toggle_completion(server.storage(), date(2023, 1, 30), &exercise.id).unwrap();
        toggle_completion(server.storage(), date(2023, 2, 1), &exercise.id).unwrap();

        let heatmap = server.analytics().heatmap(server.storage(), date(2023, 2, 10)).unwrap();
        assert_eq!(heatmap.cells.len(), 10);
        assert_eq!(heatmap.placeholders, 20);
        assert_eq!(heatmap.cells[0].date, date(2023, 2, 1));
        assert_eq!(heatmap.cells[0].completed, Some(1));
        // January activity is outside the grid
        assert_eq!(heatmap.cells.iter().filter(|c| c.has_activity()).count(), 1);
    }
}
