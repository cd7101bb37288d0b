//! Extraction, arise, and the army summary.
mod common;

use std::collections::HashSet;

use hunter_system::hunter::{HunterError, ProgressionEvent, SHADOW_NAME_PREFIXES};

#[test]
fn level_up_extraction_is_deferred_until_completed() {
    let (mut engine, _clock) = common::engine(10, 1.0);
    engine.gain_experience(100);
    assert_eq!(engine.pending_extractions(), 1);
    assert!(engine.shadows().is_empty());

    let shadow = engine.complete_extraction().expect("one pending extraction");
    assert_eq!(engine.shadows().len(), 1);
    assert!(engine.config().shadow_types.contains(&shadow.shadow_type));
    assert!(engine
        .drain_events()
        .iter()
        .any(|e| matches!(e, ProgressionEvent::ShadowExtracted { shadow_id, .. } if *shadow_id == shadow.id)));
    assert!(engine.complete_extraction().is_none());
}

#[test]
fn shadow_attributes_follow_hunter_level() {
    let (mut engine, _clock) = common::engine(6, 0.0);
    engine.gain_experience(30_000); // level 25
    for _ in 0..50 {
        let shadow = engine.extract_shadow("assassin").unwrap();
        assert_eq!(shadow.level, 12);
        assert!((13..=22).contains(&shadow.power), "power {}", shadow.power);
        let (prefix, kind) = shadow.name.rsplit_once(' ').unwrap();
        assert!(SHADOW_NAME_PREFIXES.contains(&prefix));
        assert_eq!(kind, "Assassin");
    }
}

#[test]
fn arise_is_single_shot() {
    let (mut engine, _clock) = common::engine(7, 0.0);
    let shadow = engine.extract_shadow("knight").unwrap();
    engine.drain_events();

    let power = engine.arise_shadow(&shadow.id).unwrap();
    assert_eq!(power, shadow.power + 5);
    assert_eq!(
        engine.drain_events(),
        vec![ProgressionEvent::ShadowArisen {
            shadow_id: shadow.id.clone(),
            name: shadow.name.clone(),
            power,
        }]
    );

    assert!(matches!(
        engine.arise_shadow(&shadow.id),
        Err(HunterError::InvalidState(_))
    ));
    assert_eq!(engine.shadow(&shadow.id).unwrap().power, power);
    assert!(engine.drain_events().is_empty());
}

#[test]
fn bulk_arise_uses_same_bonus_and_skips_ineligible() {
    let mut config = common::progression(0.0);
    config.arise_power_bonus = 8;
    let mut engine = hunter_system::hunter::ProgressionEngine::builder()
        .config(config)
        .build();

    let shadows: Vec<_> = (0..3).map(|_| engine.extract_shadow("mage").unwrap()).collect();
    assert_eq!(engine.arise_shadow(&shadows[0].id).unwrap(), shadows[0].power + 8);

    let request = vec![
        shadows[0].id.clone(),
        "shadow-unknown".to_string(),
        shadows[1].id.clone(),
        shadows[2].id.clone(),
    ];
    let arisen = engine.arise_shadows(&request);
    assert_eq!(arisen, vec![shadows[1].id.clone(), shadows[2].id.clone()]);
    for shadow in &shadows {
        assert_eq!(engine.shadow(&shadow.id).unwrap().power, shadow.power + 8);
    }
}

#[test]
fn army_summary_totals() {
    let (mut engine, _clock) = common::engine(3, 0.0);
    let a = engine.extract_shadow("soldier").unwrap();
    let b = engine.extract_shadow("beast").unwrap();
    engine.arise_shadow(&b.id).unwrap();

    let army = engine.army();
    assert_eq!(army.total, 2);
    assert_eq!(army.arisen, 1);
    assert_eq!(army.dormant, 1);
    assert_eq!(army.arisen_power, u64::from(b.power + 5));
    assert_eq!(army.total_power, u64::from(a.power + b.power + 5));

    assert_eq!(engine.arise_all_dormant(), vec![a.id]);
    assert_eq!(engine.army().dormant, 0);
}

#[test]
fn thousand_shadows_get_unique_ids() {
    let (mut engine, _clock) = common::engine(4242, 0.0);
    let ids: HashSet<String> = (0..1000)
        .map(|_| engine.extract_shadow("soldier").unwrap().id)
        .collect();
    assert_eq!(ids.len(), 1000);
}

#[test]
fn invalid_shadow_type_is_input_error() {
    let (mut engine, _clock) = common::engine(1, 0.0);
    assert!(matches!(
        engine.extract_shadow("two words"),
        Err(HunterError::InvalidInput(_))
    ));
    assert!(engine.shadows().is_empty());
}
