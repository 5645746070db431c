//! Integration tests for persistence across restarts.
//!
//! Each test drives one controller, drops it, and loads a second controller
//! from the same store with the wall clock moved forward.

use chrono::{DateTime, Duration, Local, NaiveDate, TimeZone, Utc};
use focusloop_core::persistence::TIMER_STATE_KEY;
use focusloop_core::settings::SETTINGS_KEY;
use focusloop_core::task::TASKS_KEY;
use focusloop_core::{
    Collaborators, Controller, ControllerOptions, Event, ManualClock, ManualTicker, MemoryStore,
    SessionType, Settings, SilentNotifier, SqliteStore, Storage,
};

fn local_noon(day: u32) -> DateTime<Utc> {
    let naive = NaiveDate::from_ymd_opt(2024, 6, day)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap();
    Local
        .from_local_datetime(&naive)
        .earliest()
        .unwrap()
        .with_timezone(&Utc)
}

fn launch(storage: Box<dyn Storage>, clock: &ManualClock) -> (Controller, Event) {
    Controller::load(
        Collaborators {
            storage,
            wall_clock: Box::new(clock.clone()),
            tick_source: Box::new(ManualTicker::new()),
            notifier: Box::new(SilentNotifier),
        },
        ControllerOptions::default(),
    )
}

fn restored_outcome(event: &Event) -> &str {
    match event {
        Event::StateRestored { outcome, .. } => outcome,
        other => panic!("expected StateRestored, got {other:?}"),
    }
}

#[test]
fn test_round_trip_at_zero_age() {
    let store = MemoryStore::new();
    let clock = ManualClock::new(local_noon(3));

    let (mut first, _) = launch(Box::new(store.clone()), &clock);
    first.start_task("Write report").unwrap();
    for _ in 0..100 {
        first.tick();
    }
    assert!(first.is_running());
    let before = first.state().clone();
    first.persist();
    drop(first);

    let (second, event) = launch(Box::new(store.clone()), &clock);
    assert_eq!(restored_outcome(&event), "resumable");
    let after = second.state();
    assert_eq!(after.remaining_seconds, before.remaining_seconds);
    assert_eq!(after.session_type, before.session_type);
    assert_eq!(after.cycle_count, before.cycle_count);
    assert_eq!(after.completed_focus_count, before.completed_focus_count);
    assert_eq!(after.total_focus_minutes, before.total_focus_minutes);
    assert_eq!(after.current_task_label, "Write report");
    assert!(!after.is_running);
}

#[test]
fn test_time_away_is_subtracted() {
    let store = MemoryStore::new();
    let clock = ManualClock::new(local_noon(3));

    let (mut first, _) = launch(Box::new(store.clone()), &clock);
    first.start();
    first.teardown();

    clock.advance(Duration::seconds(600));
    let (second, event) = launch(Box::new(store.clone()), &clock);
    assert_eq!(restored_outcome(&event), "resumable");
    assert_eq!(second.state().remaining_seconds, 900);
    assert!(!second.is_running());
}

#[test]
fn test_stale_after_an_hour_resets_to_defaults() {
    let store = MemoryStore::new();
    let clock = ManualClock::new(local_noon(3));

    let (mut first, _) = launch(Box::new(store.clone()), &clock);
    first.update_settings(1, 1, false);
    first.start();
    for _ in 0..60 {
        first.tick();
    }
    assert_eq!(first.state().session_type, SessionType::ShortBreak);
    first.teardown();

    clock.advance(Duration::seconds(3600));
    let (second, event) = launch(Box::new(store.clone()), &clock);
    assert_eq!(restored_outcome(&event), "stale");
    let state = second.state();
    assert_eq!(state.session_type, SessionType::Focus);
    assert_eq!(state.cycle_count, 1);
    assert_eq!(state.completed_focus_count, 0);
    assert_eq!(state.remaining_seconds, second.settings().focus_minutes * 60);
    // Settings survive independently of the timer snapshot.
    assert_eq!(second.settings().focus_minutes, 1);
}

#[test]
fn test_corrupt_records_fall_back() {
    let store = MemoryStore::new();
    store.insert(SETTINGS_KEY, "not json");
    store.insert(TASKS_KEY, "{\"oops\":true}");
    store.insert(TIMER_STATE_KEY, "[]");
    let clock = ManualClock::new(local_noon(3));

    let (ctl, event) = launch(Box::new(store), &clock);
    assert_eq!(restored_outcome(&event), "stale");
    assert_eq!(ctl.settings(), &Settings::default());
    assert!(ctl.log().is_empty());
    assert_eq!(ctl.state().remaining_seconds, 1500);
}

#[test]
fn test_yesterdays_tasks_are_dropped_on_load() {
    let store = MemoryStore::new();
    let clock = ManualClock::new(local_noon(3));

    let (mut first, _) = launch(Box::new(store.clone()), &clock);
    first.update_settings(1, 1, false);
    first.start_task("Yesterday's work").unwrap();
    for _ in 0..60 {
        first.tick();
    }
    assert_eq!(first.today_total_seconds(), 60);
    first.teardown();

    clock.set(local_noon(4));
    let (second, _) = launch(Box::new(store.clone()), &clock);
    assert!(second.log().is_empty());
    assert_eq!(second.today_total_seconds(), 0);
    assert_eq!(second.settings().focus_minutes, 1);
}

#[test]
fn test_today_total_ignores_stored_aggregate() {
    let store = MemoryStore::new();
    let clock = ManualClock::new(local_noon(3));
    let (first, _) = launch(Box::new(store.clone()), &clock);
    let mut snapshot = first.snapshot();
    snapshot.today_total_seconds = 99_999;
    store.insert(TIMER_STATE_KEY, snapshot.to_bytes().unwrap());

    let (second, _) = launch(Box::new(store), &clock);
    assert_eq!(second.today_total_seconds(), 0);
    assert_eq!(second.display().today_total, "00:00");
}

#[test]
fn test_missed_completion_is_presented_as_ready() {
    let store = MemoryStore::new();
    let clock = ManualClock::new(local_noon(3));

    let (mut first, _) = launch(Box::new(store.clone()), &clock);
    first.update_settings(2, 1, false);
    first.start_task("Deep work").unwrap();
    first.teardown();

    clock.advance(Duration::minutes(10));
    let (second, event) = launch(Box::new(store.clone()), &clock);
    assert_eq!(restored_outcome(&event), "fresh");
    assert_eq!(second.state().session_type, SessionType::Focus);
    assert_eq!(second.state().remaining_seconds, 120);
    assert_eq!(second.state().completed_focus_count, 0);
    assert!(second.log().is_empty());
}

#[test]
fn test_sqlite_store_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("focusloop.db");
    let clock = ManualClock::new(local_noon(3));

    {
        let (mut ctl, _) = launch(Box::new(SqliteStore::open(&path).unwrap()), &clock);
        ctl.update_settings(1, 2, true);
        ctl.start_task("Persisted").unwrap();
        for _ in 0..60 {
            ctl.tick();
        }
        ctl.teardown();
    }

    clock.advance(Duration::seconds(30));
    let (ctl, event) = launch(Box::new(SqliteStore::open(&path).unwrap()), &clock);
    assert_eq!(restored_outcome(&event), "resumable");
    assert_eq!(ctl.state().session_type, SessionType::ShortBreak);
    assert_eq!(ctl.state().remaining_seconds, 120 - 30);
    assert_eq!(ctl.log().tasks()[0].title, "Persisted");
    assert_eq!(ctl.settings().short_break_minutes, 2);
}
