#[cfg(test)]
mod aggregation_tests {
    use chrono::{Duration, TimeZone, Utc};
    use staffserver::performance::{weight_for_priority, weighted_average};
    use staffserver::tasks::compute_due_at;

    #[test]
    fn test_review_sequence_recomputes_from_full_history() {
        // First review: one high-priority task scored 8.
        let mut reviews = vec![(8, "high".to_string())];
        assert_eq!(weighted_average(&reviews), Some(8.0));

        // Second review, different task, low priority, scored 2. The score is
        // recomputed over the whole history, not blended with the previous
        // aggregate: (8*2 + 2*1) / (2 + 1) = 6.0, not (8.0 + 2.0) / 2.
        reviews.push((2, "low".to_string()));
        assert_eq!(weighted_average(&reviews), Some(6.0));
    }

    #[test]
    fn test_review_edit_reflects_new_score_and_old_neighbors() {
        let mut reviews = vec![
            (8, "high".to_string()),
            (2, "low".to_string()),
            (5, "medium".to_string()),
        ];
        let before = weighted_average(&reviews).unwrap();

        // Editing the low-priority review from 2 to 10 changes the aggregate,
        // and the untouched reviews still participate.
        reviews[1] = (10, "low".to_string());
        let after = weighted_average(&reviews).unwrap();

        assert!(after > before);
        let expected = (8.0 * 2.0 + 10.0 * 1.0 + 5.0 * 1.5) / (2.0 + 1.0 + 1.5);
        assert!((after - expected).abs() < 1e-9);
    }

    #[test]
    fn test_repeated_reviews_of_one_task_all_count() {
        // The same task reviewed three times contributes three entries; the
        // aggregate is the weighted mean of all three events.
        let reviews = vec![
            (6, "medium".to_string()),
            (7, "medium".to_string()),
            (8, "medium".to_string()),
        ];
        assert_eq!(weighted_average(&reviews), Some(7.0));
    }

    #[test]
    fn test_no_reviews_means_unscored_not_zero() {
        assert_eq!(weighted_average(&[]), None);
        assert_ne!(weighted_average(&[]), Some(0.0));
    }

    #[test]
    fn test_unknown_priority_gets_base_weight() {
        assert_eq!(weight_for_priority("critical"), 1.0);
        let reviews = vec![(9, "critical".to_string()), (3, "high".to_string())];
        let expected = (9.0 * 1.0 + 3.0 * 2.0) / 3.0;
        assert_eq!(weighted_average(&reviews), Some(expected));
    }

    #[test]
    fn test_due_date_follows_start_and_effort() {
        let start = Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap();
        let due = compute_due_at(Some(start), 480).unwrap();
        assert_eq!(due, start + Duration::hours(8));
        assert_eq!(compute_due_at(None, 480), None);
    }
}
