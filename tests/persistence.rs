//! Sled-backed save/restore of the full hunter state.
mod common;

use hunter_system::hunter::{
    HunterError, HunterStore, HunterStoreBuilder, MemoryAdapter, NewQuest, PersistenceAdapter,
    Rank,
};
use hunter_system::hunter::storage::{KEY_PROFILE, KEY_QUESTS};
use tempfile::TempDir;

#[test]
fn full_state_survives_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("hunter");

    let (expected_profile, expected_quests, expected_shadows, expected_reset) = {
        let store = HunterStoreBuilder::new(&path).open().unwrap();
        let (mut engine, _clock) = common::restored(1, 0.0, store.load_snapshot().unwrap());
        engine.complete_quest("gate-d-rank").unwrap();
        engine
            .add_custom_quest(NewQuest::new("Stretch", "10 min", Rank::E, 10))
            .unwrap();
        let shadow = engine.extract_shadow("knight").unwrap();
        engine.arise_shadow(&shadow.id).unwrap();
        store.save_snapshot(&engine.snapshot()).unwrap();
        (
            engine.profile(),
            engine.quests().to_vec(),
            engine.shadows().to_vec(),
            engine.last_daily_reset(),
        )
    };

    let store = HunterStoreBuilder::new(&path).open().unwrap();
    let (engine, _clock) = common::restored(2, 0.0, store.load_snapshot().unwrap());
    assert_eq!(engine.profile(), expected_profile);
    assert_eq!(engine.quests(), expected_quests.as_slice());
    assert_eq!(engine.shadows(), expected_shadows.as_slice());
    assert_eq!(engine.last_daily_reset(), expected_reset);
    assert_eq!(engine.inventory()[0].name, "Mana Crystal");
    assert_eq!(engine.rank(), Rank::E);
}

#[test]
fn empty_store_restores_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let store = HunterStoreBuilder::new(temp_dir.path()).open().unwrap();
    let (engine, _clock) = common::restored(1, 0.0, store.load_snapshot().unwrap());
    assert_eq!(engine.level(), 1);
    assert_eq!(engine.gold(), 0);
    assert!(engine.shadows().is_empty());
    assert!(engine.quest("daily-pushups").is_some());
    assert_eq!(engine.last_daily_reset(), common::start_instant().date_naive());
}

#[test]
fn rank_is_derived_on_load() {
    let adapter = MemoryAdapter::new();
    adapter
        .save(
            KEY_PROFILE,
            br#"{"version":1,"data":{"level":12,"experience":5,"gold":7,"updated_at":"2024-05-01T08:00:00Z"}}"#,
        )
        .unwrap();
    let store = HunterStore::new(adapter);
    let (engine, _clock) = common::restored(1, 0.0, store.load_snapshot().unwrap());
    assert_eq!(engine.level(), 12);
    assert_eq!(engine.rank(), Rank::C);
    assert!(engine.inventory().is_empty());
}

#[test]
fn unknown_schema_version_is_rejected() {
    let adapter = MemoryAdapter::new();
    adapter
        .save(KEY_QUESTS, br#"{"version":2,"data":[]}"#)
        .unwrap();
    let store = HunterStore::new(adapter);
    assert!(matches!(
        store.load_snapshot(),
        Err(HunterError::SchemaMismatch { entity: "quests", expected: 1, found: 2 })
    ));
}

#[test]
fn corrupt_record_is_a_json_error() {
    let adapter = MemoryAdapter::new();
    adapter.save(KEY_QUESTS, b"not json").unwrap();
    let store = HunterStore::new(adapter);
    assert!(matches!(store.get_quests(), Err(HunterError::Json(_))));
}
