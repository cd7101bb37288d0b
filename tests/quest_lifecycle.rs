//! End-to-end quest flow: seeded quests, custom quests, edits, progress.
mod common;

use std::collections::HashSet;

use hunter_system::hunter::{
    format_quest_list, ExerciseType, HunterError, NewQuest, ProgressionEvent, Rank,
};

#[test]
fn seeded_quests_are_present_on_first_start() {
    let (engine, _clock) = common::engine(1, 0.0);
    let daily: Vec<_> = engine.quests().iter().filter(|q| q.is_daily).collect();
    assert_eq!(daily.len(), 4);
    let pushups = engine.quest("daily-pushups").expect("seeded pushups quest");
    assert_eq!(pushups.reward_exp, 50);
    assert_eq!(pushups.reward_gold, Some(100));
    assert_eq!(pushups.exercise_type, Some(ExerciseType::Pushups));
    assert!(!pushups.customizable);
}

#[test]
fn completion_is_idempotent() {
    let (mut engine, _clock) = common::engine(1, 0.0);
    engine.complete_quest("daily-run").unwrap();
    let (exp, gold) = (engine.experience(), engine.gold());
    engine.drain_events();

    for _ in 0..3 {
        assert!(matches!(
            engine.complete_quest("daily-run"),
            Err(HunterError::InvalidState(_))
        ));
    }
    assert_eq!((engine.experience(), engine.gold()), (exp, gold));
    assert!(engine.drain_events().is_empty());
}

#[test]
fn reward_items_land_in_inventory() {
    let (mut engine, _clock) = common::engine(1, 0.0);
    engine.complete_quest("gate-d-rank").unwrap();
    assert_eq!(engine.gold(), 500);
    assert_eq!(engine.inventory().len(), 1);
    assert_eq!(engine.inventory()[0].name, "Mana Crystal");
    assert_eq!(engine.inventory()[0].quantity, 1);
}

#[test]
fn completion_stamps_time_from_clock() {
    let (mut engine, clock) = common::engine(1, 0.0);
    clock.advance(chrono::Duration::minutes(42));
    engine.complete_quest("daily-squats").unwrap();
    let quest = engine.quest("daily-squats").unwrap();
    assert_eq!(
        quest.last_completed_at,
        Some(common::start_instant() + chrono::Duration::minutes(42))
    );
}

#[test]
fn custom_quest_lifecycle() {
    let (mut engine, _clock) = common::engine(1, 0.0);
    let id = engine
        .add_custom_quest(
            NewQuest::new("Morning Swim", "30 laps", Rank::D, 120)
                .with_reward_gold(40)
                .with_exercise(ExerciseType::Cardio)
                .as_daily(),
        )
        .unwrap();

    let events = engine.drain_events();
    assert_eq!(
        events,
        vec![ProgressionEvent::QuestAdded {
            quest_id: id.clone(),
            title: "Morning Swim".into(),
        }]
    );

    let quest = engine.quest(&id).unwrap();
    assert!(quest.customizable && quest.is_daily && !quest.completed);
    assert_eq!(quest.progress, 0);

    engine.update_quest_details(&id, "Evening Swim", "40 laps").unwrap();
    assert_eq!(engine.quest(&id).unwrap().title, "Evening Swim");
    assert_eq!(engine.quest(&id).unwrap().description, "40 laps");

    engine.update_quest_progress(&id, 50).unwrap();
    engine.update_quest_progress(&id, 100).unwrap();
    assert!(engine.quest(&id).unwrap().completed);
    assert_eq!(engine.level(), 2);
    assert_eq!(engine.experience(), 20);
    assert_eq!(engine.gold(), 40);
}

#[test]
fn seeded_quests_cannot_be_edited() {
    let (mut engine, _clock) = common::engine(1, 0.0);
    let before = engine.quest("daily-situps").cloned();
    assert!(matches!(
        engine.update_quest_details("daily-situps", "Crunches", ""),
        Err(HunterError::InvalidState(_))
    ));
    assert_eq!(engine.quest("daily-situps").cloned(), before);
}

#[test]
fn unknown_ids_are_rejected_without_changes() {
    let (mut engine, _clock) = common::engine(1, 0.0);
    let before = engine.snapshot();
    assert!(matches!(
        engine.complete_quest("nope"),
        Err(HunterError::InvalidReference { kind: "quest", .. })
    ));
    assert!(engine.update_quest_details("nope", "t", "d").is_err());
    assert!(engine.update_quest_progress("nope", 10).is_err());
    assert_eq!(engine.snapshot().quests, before.quests);
    assert_eq!(engine.profile().gold, 0);
}

#[test]
fn thousand_custom_quests_get_unique_ids() {
    let (mut engine, _clock) = common::engine(12345, 0.0);
    let mut ids = HashSet::new();
    for n in 0..1000 {
        let id = engine
            .add_custom_quest(NewQuest::new(&format!("Quest {}", n), "", Rank::E, 1))
            .unwrap();
        assert!(ids.insert(id), "duplicate id at {}", n);
    }
    let all: HashSet<&str> = engine.quests().iter().map(|q| q.id.as_str()).collect();
    assert_eq!(all.len(), engine.quests().len());
}

#[test]
fn quest_list_reports_daily_completion() {
    let (mut engine, _clock) = common::engine(1, 0.0);
    engine.complete_quest("daily-pushups").unwrap();
    let lines = format_quest_list(engine.quests());
    assert_eq!(lines[0], "=== DAILY QUESTS (1/4) ===");
    assert!(lines[1].starts_with("[x] Pushups (E) 50xp +100g [daily]"));
    assert!(lines[1].contains("[push-ups]"));
}
