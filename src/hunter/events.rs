//! Transition events and scheduled intents produced by the engine.
//!
//! Events are notifications for a presentation layer (toasts, animations).
//! Intents are deferred work the engine cannot perform itself because it
//! holds no timers; an external scheduler waits `delay` and calls back.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::hunter::types::Rank;

/// Upper bound on undrained events kept by the engine.
pub const MAX_PENDING_EVENTS: usize = 256;

/// Upper bound on level-up extractions waiting to complete. Level-ups past
/// this point roll no extraction until the queue drains.
pub const MAX_PENDING_EXTRACTIONS: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProgressionEvent {
    LevelUp {
        level: u32,
        levels_gained: u32,
    },
    RankUp {
        from: Rank,
        to: Rank,
    },
    QuestCompleted {
        quest_id: String,
        title: String,
    },
    QuestAdded {
        quest_id: String,
        title: String,
    },
    DailyQuestsReset {
        date: NaiveDate,
        quests_reset: usize,
    },
    ShadowExtracted {
        shadow_id: String,
        name: String,
    },
    ShadowArisen {
        shadow_id: String,
        name: String,
        power: u32,
    },
}

impl ProgressionEvent {
    /// One-line notification text
    pub fn describe(&self) -> String {
        match self {
            ProgressionEvent::LevelUp { level, levels_gained } if *levels_gained > 1 => {
                format!("LEVEL UP x{}! You are now level {}.", levels_gained, level)
            }
            ProgressionEvent::LevelUp { level, .. } => {
                format!("LEVEL UP! You are now level {}.", level)
            }
            ProgressionEvent::RankUp { from, to } => {
                format!("RANK UP! {}-Rank -> {}-Rank", from, to)
            }
            ProgressionEvent::QuestCompleted { title, .. } => {
                format!("Quest complete: {}", title)
            }
            ProgressionEvent::QuestAdded { quest_id, title } => {
                format!("Quest added: {} [{}]", title, quest_id)
            }
            ProgressionEvent::DailyQuestsReset { date, quests_reset } => {
                format!("Daily quests reset for {} ({} quests)", date, quests_reset)
            }
            ProgressionEvent::ShadowExtracted { name, shadow_id } => {
                format!("Shadow extracted: {} [{}]", name, shadow_id)
            }
            ProgressionEvent::ShadowArisen { name, power, .. } => {
                format!("ARISE! {} joins the army (power {})", name, power)
            }
        }
    }
}

/// Deferred work for an external scheduler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduledIntent {
    /// Call `complete_extraction` once `delay` has elapsed.
    ExtractShadow { shadow_type: String, delay: Duration },
}

impl ScheduledIntent {
    pub fn delay(&self) -> Duration {
        match self {
            ScheduledIntent::ExtractShadow { delay, .. } => *delay,
        }
    }
}
