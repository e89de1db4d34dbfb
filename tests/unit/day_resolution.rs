/// Day resolution rules: weekday matching and creation dates
use chrono::NaiveDate;
use habit_heatmap_mcp::analytics::resolve_day;
use habit_heatmap_mcp::domain::{date_range, dates_from_year_beginning, parse_day, week_day_index};
use habit_heatmap_mcp::*;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[cfg(test)]
mod day_resolution_tests {
    use super::*;

    #[test]
    fn test_year_range_length() {
        let range = dates_from_year_beginning(date(2023, 2, 26));
        assert_eq!(range.len(), 57);
        assert_eq!(range.first(), Some(&date(2023, 1, 1)));
        assert_eq!(range.last(), Some(&date(2023, 2, 26)));
        assert!(range.windows(2).all(|w| w[1] == w[0].succ_opt().unwrap()));
    }

    #[test]
    fn test_inverted_range_is_empty() {
        assert!(date_range(date(2023, 3, 1), date(2023, 2, 1)).is_empty());
        assert_eq!(date_range(date(2023, 3, 1), date(2023, 3, 1)).len(), 1);
    }

    #[test]
    fn test_week_days_are_sunday_based() {
        assert_eq!(week_day_index(date(2023, 1, 1)), 0);
        assert_eq!(week_day_index(date(2023, 1, 2)), 1);
        assert_eq!(week_day_index(date(2023, 1, 7)), 6);
    }

    #[test]
    fn test_habit_not_possible_before_creation() {
        let storage = MemoryStorage::new();
        let exercise = create_habit(&storage, "Exercise", &[1, 3, 5], date(2023, 1, 4)).unwrap();

        assert!(resolve_day(&storage, date(2023, 1, 2)).unwrap().possible_habits.is_empty());
        assert_eq!(
            resolve_day(&storage, date(2023, 1, 4)).unwrap().possible_habits,
            vec![exercise]
        );
    }

    #[test]
    fn test_possible_habits_keep_insertion_order() {
        let storage = MemoryStorage::new();
        let water = create_habit(&storage, "Drink water", &[0, 1, 2, 3, 4, 5, 6], date(2023, 1, 1)).unwrap();
        let exercise = create_habit(&storage, "Exercise", &[1, 3, 5], date(2023, 1, 1)).unwrap();
        let reading = create_habit(&storage, "Read", &[1], date(2023, 1, 1)).unwrap();

        let monday = resolve_day(&storage, date(2023, 1, 9)).unwrap();
        let ids: Vec<HabitId> = monday.possible_habits.iter().map(|h| h.id).collect();
        assert_eq!(ids, vec![water.id, exercise.id, reading.id]);

        let tuesday = resolve_day(&storage, date(2023, 1, 10)).unwrap();
        assert_eq!(tuesday.possible_habits.len(), 1);
    }

    #[test]
    fn test_untouched_day_has_no_record() {
        let storage = MemoryStorage::new();
        create_habit(&storage, "Exercise", &[1, 3, 5], date(2023, 1, 1)).unwrap();

        let view = resolve_day(&storage, date(2023, 1, 2)).unwrap();
        assert!(view.completed_habit_ids.is_empty());
        assert!(storage.find_day_by_date(date(2023, 1, 2)).unwrap().is_none());
    }

    #[test]
    fn test_timestamps_resolve_to_their_day() {
        assert_eq!(parse_day("2023-01-02").unwrap(), date(2023, 1, 2));
        assert_eq!(parse_day("2023-01-02T18:30:00").unwrap(), date(2023, 1, 2));
        assert!(matches!(parse_day("02/01/2023"), Err(DomainError::InvalidDate(_))));
    }
}
