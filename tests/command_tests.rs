use chrono::NaiveDate;
use dayplan::commands::*;
use dayplan::error::PlannerError;
use dayplan::models::DayRecord;
use dayplan::recurrence::resolve_day;
use dayplan::storage::Store;
use std::env;
use std::fs;

fn with_test_store<F>(test_name: &str, f: F)
where
    F: FnOnce(&Store),
{
    let mut db_path = env::temp_dir();
    db_path.push(format!("dayplan_test_{}.json", test_name));

    // Clean up before test
    if db_path.exists() {
        fs::remove_file(&db_path).unwrap();
    }

    let store = Store::at(&db_path);
    f(&store);

    // Clean up after test
    if db_path.exists() {
        fs::remove_file(&db_path).unwrap();
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn resolve(store: &Store, day: NaiveDate) -> Vec<dayplan::models::Task> {
    let record = store.load_day(day).unwrap_or_else(|| DayRecord::new(day));
    let history = store.load_history(day);
    resolve_day(&record.tasks, &history, day)
}

#[test]
fn test_add_and_load() {
    with_test_store("add_load", |store| {
        cmd_add(
            store,
            "Write report".into(),
            Some("2026-01-05".into()),
            "09:00".into(),
            "10:30".into(),
            Some("career".into()),
            None,
            None,
            None,
            None,
            true,
        );

        let record = store.load_day(date(2026, 1, 5)).unwrap();
        assert_eq!(record.tasks.len(), 1);
        assert_eq!(record.tasks[0].text, "Write report");
        assert_eq!(record.tasks[0].start, "09:00");
        assert_eq!(record.tasks[0].end, "10:30");
        assert_eq!(record.tasks[0].goal_id, Some("career".into()));
        assert!(!record.tasks[0].completed);
        assert!(record.tasks[0].recurring.is_none());
    });
}

#[test]
fn test_add_rejects_bad_time() {
    with_test_store("bad_time", |store| {
        cmd_add(
            store,
            "Bad".into(),
            Some("2026-01-05".into()),
            "9am".into(),
            "10:00".into(),
            None,
            None,
            None,
            None,
            None,
            true,
        );
        assert!(store.load_day(date(2026, 1, 5)).is_none());
    });
}

#[test]
fn test_complete_toggles() {
    with_test_store("complete", |store| {
        cmd_add(
            store,
            "Task".into(),
            Some("2026-01-05".into()),
            "09:00".into(),
            "10:00".into(),
            None, None, None, None, None,
            true,
        );
        let id = store.load_day(date(2026, 1, 5)).unwrap().tasks[0].id;
        let prefix = id.to_string()[..8].to_string();

        cmd_complete(store, prefix.clone(), Some("2026-01-05".into()), true);
        assert!(store.load_day(date(2026, 1, 5)).unwrap().tasks[0].completed);

        cmd_complete(store, prefix, Some("2026-01-05".into()), true);
        assert!(!store.load_day(date(2026, 1, 5)).unwrap().tasks[0].completed);
    });
}

#[test]
fn test_recurring_occurrence_persists_on_touch() {
    with_test_store("recur_touch", |store| {
        // 2026-01-05 is a Monday; weekly with no --on defaults to that weekday.
        cmd_add(
            store,
            "Gym".into(),
            Some("2026-01-05".into()),
            "07:00".into(),
            "08:00".into(),
            None,
            Some("weekly".into()),
            None, None, None,
            true,
        );

        // The next Monday gets a virtual occurrence.
        let monday = date(2026, 1, 12);
        let resolved = resolve(store, monday);
        assert_eq!(resolved.len(), 1);
        assert!(resolved[0].recurring.is_none());
        assert!(store.load_day(monday).is_none());

        // Completing it writes it into that day's explicit list.
        cmd_complete(store, resolved[0].id.to_string(), Some("2026-01-12".into()), true);
        let record = store.load_day(monday).unwrap();
        assert_eq!(record.tasks.len(), 1);
        assert!(record.tasks[0].completed);
        assert!(record.tasks[0].recurring.is_none());

        // Suppression keeps a second virtual copy from appearing.
        let resolved = resolve(store, monday);
        assert_eq!(resolved.len(), 1);

        // A Tuesday stays empty.
        assert!(resolve(store, date(2026, 1, 13)).is_empty());
    });
}

#[test]
fn test_remove_virtual_occurrence_is_refused() {
    with_test_store("remove_virtual", |store| {
        cmd_add(
            store,
            "Stretch".into(),
            Some("2026-01-05".into()),
            "06:30".into(),
            "06:45".into(),
            None,
            Some("daily".into()),
            None, None, None,
            true,
        );
        let tuesday = date(2026, 1, 6);
        let resolved = resolve(store, tuesday);
        assert_eq!(resolved.len(), 1);

        cmd_remove(store, resolved[0].id.to_string(), Some("2026-01-06".into()), true);

        // Nothing was persisted and the template still fires.
        assert!(store.load_day(tuesday).is_none());
        assert_eq!(resolve(store, tuesday).len(), 1);
    });
}

#[test]
fn test_remove_explicit_task() {
    with_test_store("remove", |store| {
        cmd_add(
            store,
            "Task".into(),
            Some("2026-01-05".into()),
            "09:00".into(),
            "10:00".into(),
            None, None, None, None, None,
            true,
        );
        let id = store.load_day(date(2026, 1, 5)).unwrap().tasks[0].id;

        cmd_remove(store, id.to_string()[..8].to_string(), Some("2026-01-05".into()), true);
        assert!(store.load_day(date(2026, 1, 5)).unwrap().tasks.is_empty());
    });
}

#[test]
fn test_edit_task() {
    with_test_store("edit", |store| {
        cmd_add(
            store,
            "Draft".into(),
            Some("2026-01-05".into()),
            "09:00".into(),
            "10:00".into(),
            None, None, None, None, None,
            true,
        );
        let id = store.load_day(date(2026, 1, 5)).unwrap().tasks[0].id;

        cmd_edit(
            store,
            id.to_string()[..8].to_string(),
            Some("2026-01-05".into()),
            Some("Final draft".into()),
            Some("10:00".into()),
            Some("11:30".into()),
            None, None, None, None, None,
            true,
        );

        let record = store.load_day(date(2026, 1, 5)).unwrap();
        assert_eq!(record.tasks.len(), 1);
        assert_eq!(record.tasks[0].text, "Final draft");
        assert_eq!(record.tasks[0].start, "10:00");
        assert_eq!(record.tasks[0].end, "11:30");
    });
}

#[test]
fn test_edit_clears_recurrence() {
    with_test_store("edit_recur", |store| {
        cmd_add(
            store,
            "Stretch".into(),
            Some("2026-01-05".into()),
            "06:30".into(),
            "06:45".into(),
            None,
            Some("daily".into()),
            None, None, None,
            true,
        );
        let id = store.load_day(date(2026, 1, 5)).unwrap().tasks[0].id;
        assert_eq!(resolve(store, date(2026, 1, 6)).len(), 1);

        cmd_edit(
            store,
            id.to_string()[..8].to_string(),
            Some("2026-01-05".into()),
            None, None, None, None,
            Some("none".into()),
            None, None, None,
            true,
        );

        assert!(store.load_day(date(2026, 1, 5)).unwrap().tasks[0].recurring.is_none());
        assert!(resolve(store, date(2026, 1, 6)).is_empty());
    });
}

#[test]
fn test_day_journal_fields() {
    with_test_store("journal", |store| {
        cmd_morning(store, "Deep work".into(), Some("2026-01-05".into()), true);
        cmd_reflect(store, "Good day".into(), Some("2026-01-05".into()), true);
        cmd_mood(store, "calm".into(), Some("2026-01-05".into()), true);

        let record = store.load_day(date(2026, 1, 5)).unwrap();
        assert_eq!(record.morning, "Deep work");
        assert_eq!(record.reflection, "Good day");
        assert_eq!(record.mood, "calm");
    });
}

#[test]
fn test_stale_write_is_rejected() {
    with_test_store("stale", |store| {
        let day = date(2026, 1, 5);
        let record = DayRecord::new(day);
        store.upsert_day(&record).unwrap();

        // Re-sending the same revision must fail now that the stored
        // revision has moved on.
        let err = store.upsert_day(&record).unwrap_err();
        assert!(matches!(err, PlannerError::StaleWrite { .. }));

        // Reloading picks up the new revision and the write goes through.
        let mut fresh = store.load_day(day).unwrap();
        fresh.morning = "retry".into();
        store.upsert_day(&fresh).unwrap();
        assert_eq!(store.load_day(day).unwrap().morning, "retry");
    });
}

#[test]
fn test_parse_recur_spec() {
    let monday = date(2026, 1, 5);

    assert_eq!(parse_recur_spec("", monday).unwrap(), None);
    assert_eq!(parse_recur_spec("none", monday).unwrap(), None);

    let daily = parse_recur_spec("daily", monday).unwrap().unwrap();
    assert_eq!(daily.interval, 1);
    assert!(daily.until.is_none());

    let weekly = parse_recur_spec("weekly mon,wed", monday).unwrap().unwrap();
    assert_eq!(weekly.days_of_week, vec![1, 3]);

    // Weekly with no day list defaults to the given day's weekday.
    let defaulted = parse_recur_spec("weekly", monday).unwrap().unwrap();
    assert_eq!(defaulted.days_of_week, vec![1]);

    let full = parse_recur_spec("every 2 weekly fri until 2026-06-01", monday)
        .unwrap()
        .unwrap();
    assert_eq!(full.interval, 2);
    assert_eq!(full.days_of_week, vec![5]);
    assert_eq!(full.until, Some(date(2026, 6, 1)));

    assert!(parse_recur_spec("monthly", monday).is_err());
    assert!(parse_recur_spec("weekly noday", monday).is_err());
    assert!(parse_recur_spec("every 0 daily", monday).is_err());
}

#[test]
fn test_reset() {
    with_test_store("reset", |store| {
        cmd_morning(store, "note".into(), Some("2026-01-05".into()), true);
        assert!(!store.load_days().is_empty());

        cmd_reset(store, true);
        assert!(store.load_days().is_empty());
    });
}
