//! Built-in quests present on first start.

use crate::hunter::types::{ExerciseType, QuestRecord, Rank};

/// Daily training plus a few one-off goals. None of these are customizable.
pub fn seed_starter_quests() -> Vec<QuestRecord> {
    vec![
        QuestRecord::new(
            "daily-pushups",
            "Pushups",
            "Complete 100 pushups.",
            Rank::E,
            50,
        )
        .with_reward_gold(100)
        .with_exercise(ExerciseType::Pushups)
        .as_daily(),
        QuestRecord::new(
            "daily-situps",
            "Situps",
            "Complete 100 situps.",
            Rank::E,
            50,
        )
        .with_reward_gold(100)
        .with_exercise(ExerciseType::Situps)
        .as_daily(),
        QuestRecord::new(
            "daily-squats",
            "Squats",
            "Complete 100 squats.",
            Rank::E,
            50,
        )
        .with_reward_gold(100)
        .with_exercise(ExerciseType::Squats)
        .as_daily(),
        QuestRecord::new(
            "daily-run",
            "Run 10 km",
            "Run 10 kilometers without stopping.",
            Rank::D,
            100,
        )
        .with_reward_gold(150)
        .with_exercise(ExerciseType::Running)
        .as_daily(),
        QuestRecord::new(
            "plank-five-minutes",
            "Hold the Line",
            "Hold a plank for five minutes straight.",
            Rank::D,
            150,
        )
        .with_reward_gold(200)
        .with_exercise(ExerciseType::Plank),
        QuestRecord::new(
            "gate-d-rank",
            "Clear a D-Rank Gate",
            "Finish a full week of daily training.",
            Rank::C,
            300,
        )
        .with_reward_gold(500)
        .with_reward_item("Mana Crystal"),
        QuestRecord::new(
            "marathon",
            "Red Gate Marathon",
            "Complete a marathon distance in one session.",
            Rank::B,
            1000,
        )
        .with_reward_gold(2000)
        .with_reward_item("Knight Killer")
        .with_exercise(ExerciseType::Cardio),
    ]
}
