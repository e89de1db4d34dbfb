/// Concurrent toggles and day creation against shared stores
use chrono::NaiveDate;
use habit_heatmap_mcp::analytics::compute_summary;
use habit_heatmap_mcp::*;
use std::sync::Arc;
use std::thread;
use tempfile::tempdir;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[cfg(test)]
mod concurrency_tests {
    use super::*;

    #[test]
    fn test_concurrent_create_day_returns_one_day() {
        let dir = tempdir().expect("Failed to create temp dir");
        let storage = Arc::new(SqliteStorage::new(dir.path().join("habits.db")).unwrap());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let storage = Arc::clone(&storage);
                thread::spawn(move || storage.create_day(date(2023, 1, 2)).unwrap())
            })
            .collect();

        let days: Vec<Day> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(days.iter().all(|d| d.id == days[0].id));
        assert_eq!(storage.list_days_with_completion_counts().unwrap().len(), 1);
    }

    #[test]
    fn test_concurrent_toggles_of_different_habits() {
        let storage = Arc::new(SqliteStorage::open_in_memory().unwrap());
        let habits: Vec<Habit> = (0..6)
            .map(|i| {
                create_habit(storage.as_ref(), &format!("Habit {}", i), &[1], date(2023, 1, 1)).unwrap()
            })
            .collect();

        let handles: Vec<_> = habits
            .iter()
            .map(|habit| {
                let storage = Arc::clone(&storage);
                let habit_id = habit.id;
                thread::spawn(move || {
                    toggle_completion(storage.as_ref(), date(2023, 1, 2), &habit_id).unwrap()
                })
            })
            .collect();

        for handle in handles {
            assert!(handle.join().unwrap().completed);
        }

        let summary = compute_summary(storage.as_ref()).unwrap();
        assert_eq!(summary.len(), 1);
        assert_eq!(summary[0].amount, 6);
        assert_eq!(summary[0].completed, 6);
    }

    #[test]
    fn test_even_number_of_toggles_leaves_habit_incomplete() {
        let storage = Arc::new(MemoryStorage::new());
        let exercise = create_habit(storage.as_ref(), "Exercise", &[1, 3, 5], date(2023, 1, 1)).unwrap();

        let handles: Vec<_> = (0..10)
            .map(|_| {
                let storage = Arc::clone(&storage);
                let habit_id = exercise.id;
                thread::spawn(move || {
                    toggle_completion(storage.as_ref(), date(2023, 1, 2), &habit_id).unwrap()
                })
            })
            .collect();

        let completed = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|outcome| outcome.completed)
            .count();
        assert_eq!(completed, 5);

        let day = storage.find_day_by_date(date(2023, 1, 2)).unwrap().unwrap();
        assert!(storage.completed_habit_ids(&day.id).unwrap().is_empty());
    }

    #[test]
    fn test_two_connections_share_one_day() {
        let dir = tempdir().expect("Failed to create temp dir");
        let db_path = dir.path().join("habits.db");

        let first = SqliteStorage::new(&db_path).unwrap();
        let exercise = create_habit(&first, "Exercise", &[1, 3, 5], date(2023, 1, 1)).unwrap();
        let reading = create_habit(&first, "Read", &[1], date(2023, 1, 1)).unwrap();
        let second = SqliteStorage::new(&db_path).unwrap();

        let handles = vec![
            thread::spawn(move || toggle_completion(&first, date(2023, 1, 2), &exercise.id).unwrap()),
            thread::spawn(move || toggle_completion(&second, date(2023, 1, 2), &reading.id).unwrap()),
        ];
        let outcomes: Vec<ToggleOutcome> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(outcomes[0].day.id, outcomes[1].day.id);

        let storage = SqliteStorage::new(&db_path).unwrap();
        let summary = compute_summary(&storage).unwrap();
        assert_eq!(summary.len(), 1);
        assert_eq!(summary[0].completed, 2);
    }

    #[test]
    fn test_same_pair_toggled_from_many_connections() {
        let dir = tempdir().expect("Failed to create temp dir");
        let db_path = dir.path().join("habits.db");

        let exercise = {
            let storage = SqliteStorage::new(&db_path).unwrap();
            create_habit(&storage, "Exercise", &[1, 3, 5], date(2023, 1, 1)).unwrap()
        };

        // Odd number of toggles: the pair must end up completed exactly once
        let handles: Vec<_> = (0..9)
            .map(|_| {
                let storage = SqliteStorage::new(&db_path).unwrap();
                let habit_id = exercise.id;
                thread::spawn(move || {
                    toggle_completion(&storage, date(2023, 1, 2), &habit_id).unwrap()
                })
            })
            .collect();

        let outcomes: Vec<ToggleOutcome> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(outcomes.iter().filter(|o| o.completed).count(), 5);
        assert!(outcomes.iter().all(|o| o.day.id == outcomes[0].day.id));

        let storage = SqliteStorage::new(&db_path).unwrap();
        let day = storage.find_day_by_date(date(2023, 1, 2)).unwrap().unwrap();
        assert_eq!(storage.completed_habit_ids(&day.id).unwrap(), vec![exercise.id]);
        assert_eq!(storage.list_days_with_completion_counts().unwrap().len(), 1);
    }
}
