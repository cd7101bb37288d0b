//! Test utilities & fixtures shared by the integration tests.

use chrono::{DateTime, TimeZone, Utc};
use hunter_system::config::ProgressionConfig;
use hunter_system::hunter::{HunterSnapshot, ManualClock, ProgressionEngine};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// 2024-05-01 08:00 UTC, the instant every fixture clock starts at.
#[allow(dead_code)]
pub fn start_instant() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap()
}

#[allow(dead_code)]
pub fn progression(chance: f64) -> ProgressionConfig {
    ProgressionConfig {
        extraction_chance: chance,
        ..ProgressionConfig::default()
    }
}

/// Deterministic engine with seeded quests, a seeded RNG and a manual clock.
#[allow(dead_code)]
pub fn engine(seed: u64, chance: f64) -> (ProgressionEngine, ManualClock) {
    let clock = ManualClock::new(start_instant());
    let engine = ProgressionEngine::builder()
        .config(progression(chance))
        .rng(StdRng::seed_from_u64(seed))
        .clock(clock.clone())
        .build();
    (engine, clock)
}

/// Same as [`engine`] but restored from `snapshot`.
#[allow(dead_code)]
pub fn restored(seed: u64, chance: f64, snapshot: HunterSnapshot) -> (ProgressionEngine, ManualClock) {
    let clock = ManualClock::new(start_instant());
    let engine = ProgressionEngine::builder()
        .config(progression(chance))
        .rng(StdRng::seed_from_u64(seed))
        .clock(clock.clone())
        .restore(snapshot)
        .build();
    (engine, clock)
}
