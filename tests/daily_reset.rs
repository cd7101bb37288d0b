//! Daily reset selectivity and day-boundary scheduling.
mod common;

use chrono::{Duration, FixedOffset, NaiveDate, TimeZone, Utc};
use hunter_system::hunter::{
    HunterSnapshot, ManualClock, ProgressionEngine, ProgressionEvent, QuestRecord, Rank,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn two_daily_one_regular() -> Vec<QuestRecord> {
    vec![
        QuestRecord::new("d1", "Pushups", "", Rank::E, 50).as_daily(),
        QuestRecord::new("d2", "Situps", "", Rank::E, 50).as_daily(),
        QuestRecord::new("once", "Gate", "", Rank::C, 300),
    ]
}

#[test]
fn reset_touches_only_daily_quests() {
    let snapshot = HunterSnapshot {
        quests: Some(two_daily_one_regular()),
        ..HunterSnapshot::default()
    };
    let (mut engine, _clock) = common::restored(1, 0.0, snapshot);
    for id in ["d1", "d2", "once"] {
        engine.complete_quest(id).unwrap();
    }
    engine.drain_events();

    assert_eq!(engine.reset_daily_quests(), 2);
    assert!(!engine.quest("d1").unwrap().completed);
    assert!(!engine.quest("d2").unwrap().completed);
    let once = engine.quest("once").unwrap();
    assert!(once.completed);
    assert_eq!(once.progress, 100);
    assert_eq!(
        engine.drain_events(),
        vec![ProgressionEvent::DailyQuestsReset {
            date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            quests_reset: 2,
        }]
    );
    // Identity is kept
    assert_eq!(engine.quests().len(), 3);
}

#[test]
fn reset_happens_once_per_calendar_day() {
    let (mut engine, clock) = common::engine(1, 0.0);
    engine.complete_quest("daily-pushups").unwrap();

    clock.advance(Duration::hours(15)); // 23:00 same day
    assert!(!engine.check_daily_reset());
    assert!(engine.quest("daily-pushups").unwrap().completed);

    clock.advance(Duration::hours(2)); // 01:00 next day
    assert!(engine.check_daily_reset());
    assert!(!engine.quest("daily-pushups").unwrap().completed);
    assert_eq!(engine.last_daily_reset(), NaiveDate::from_ymd_opt(2024, 5, 2).unwrap());

    clock.advance(Duration::hours(1));
    assert!(!engine.check_daily_reset());
}

#[test]
fn stale_restore_resets_on_first_check() {
    let snapshot = HunterSnapshot {
        last_daily_reset: NaiveDate::from_ymd_opt(2024, 4, 20),
        ..HunterSnapshot::default()
    };
    let (mut engine, _clock) = common::restored(1, 0.0, snapshot);
    assert!(engine.check_daily_reset());
    assert_eq!(engine.last_daily_reset(), NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
}

#[test]
fn day_boundary_uses_configured_offset() {
    // 2024-05-01 20:00 UTC is already 2024-05-02 in UTC+9
    let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 5, 1, 20, 0, 0).unwrap());
    let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();
    let mut engine = ProgressionEngine::builder()
        .config(common::progression(0.0))
        .rng(StdRng::seed_from_u64(1))
        .clock(clock.clone())
        .reset_offset(tokyo)
        .restore(HunterSnapshot {
            last_daily_reset: NaiveDate::from_ymd_opt(2024, 5, 1),
            ..HunterSnapshot::default()
        })
        .build();

    assert!(engine.check_daily_reset());
    assert_eq!(engine.last_daily_reset(), NaiveDate::from_ymd_opt(2024, 5, 2).unwrap());
    clock.advance(Duration::hours(3)); // 23:00 UTC, 08:00 in Tokyo
    assert!(!engine.check_daily_reset());
}

#[test]
fn clock_moving_backwards_never_resets() {
    let (mut engine, clock) = common::engine(1, 0.0);
    clock.advance(Duration::days(1));
    assert!(engine.check_daily_reset());
    engine.complete_quest("daily-pushups").unwrap();

    clock.set(common::start_instant() - Duration::days(3));
    assert!(!engine.check_daily_reset());
    assert!(engine.quest("daily-pushups").unwrap().completed);
    assert_eq!(engine.last_daily_reset(), NaiveDate::from_ymd_opt(2024, 5, 2).unwrap());

    clock.set(common::start_instant() + Duration::days(2));
    assert!(engine.check_daily_reset());
    assert!(!engine.quest("daily-pushups").unwrap().completed);
}
