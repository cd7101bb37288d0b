//! Quest lifecycle for the progression engine
//!
//! Completion, custom quest authoring, edits, progress tracking and the
//! daily reset. Formatting helpers keep each rendered line short enough for
//! a terminal status panel.

use log::{debug, info};

use crate::hunter::engine::ProgressionEngine;
use crate::hunter::errors::HunterError;
use crate::hunter::events::ProgressionEvent;
use crate::hunter::types::{NewQuest, QuestRecord, Reward};
use crate::logutil::escape_log;
use crate::validation::{sanitize_quest_description, validate_quest_title};

impl ProgressionEngine {
    pub fn quests(&self) -> &[QuestRecord] {
        &self.quests
    }

    pub fn quest(&self, quest_id: &str) -> Option<&QuestRecord> {
        self.quests.iter().find(|q| q.id == quest_id)
    }

    fn quest_index(&self, quest_id: &str) -> Result<usize, HunterError> {
        self.quests
            .iter()
            .position(|q| q.id == quest_id)
            .ok_or_else(|| HunterError::quest_not_found(quest_id))
    }

    /// Complete a quest and pay out its reward. Returns the reward applied.
    pub fn complete_quest(&mut self, quest_id: &str) -> Result<Reward, HunterError> {
        let idx = self.quest_index(quest_id)?;
        if self.quests[idx].completed {
            return Err(HunterError::InvalidState(format!(
                "quest {} is already completed",
                quest_id
            )));
        }

        let now = self.clock.now();
        let quest = &mut self.quests[idx];
        quest.mark_complete(now);
        let reward = Reward {
            exp: quest.reward_exp,
            gold: quest.reward_gold,
            items: quest.reward_items.clone(),
        };
        let title = quest.title.clone();

        info!("Quest completed: {} ({})", escape_log(&title), quest_id);
        self.push_event(ProgressionEvent::QuestCompleted {
            quest_id: quest_id.to_string(),
            title,
        });
        self.grant_reward(&reward);
        Ok(reward)
    }

    /// Append a user-authored quest and return its fresh id.
    pub fn add_custom_quest(&mut self, new_quest: NewQuest) -> Result<String, HunterError> {
        let title = validate_quest_title(&new_quest.title)?;
        let description = sanitize_quest_description(&new_quest.description)?;

        let id = loop {
            let candidate = format!("custom-{}", self.random_suffix());
            if self.quest(&candidate).is_none() {
                break candidate;
            }
        };

        let quest = QuestRecord {
            id: id.clone(),
            title: title.clone(),
            description,
            difficulty: new_quest.difficulty,
            reward_exp: new_quest.reward_exp,
            reward_gold: new_quest.reward_gold,
            reward_items: new_quest.reward_items,
            completed: false,
            progress: 0,
            is_daily: new_quest.is_daily,
            last_completed_at: None,
            exercise_type: new_quest.exercise_type,
            customizable: true,
        };
        self.quests.push(quest);

        debug!("Added custom quest {} ({})", escape_log(&title), id);
        self.push_event(ProgressionEvent::QuestAdded {
            quest_id: id.clone(),
            title,
        });
        Ok(id)
    }

    /// Replace title and description of a user-authored quest.
    pub fn update_quest_details(
        &mut self,
        quest_id: &str,
        title: &str,
        description: &str,
    ) -> Result<(), HunterError> {
        let idx = self.quest_index(quest_id)?;
        if !self.quests[idx].customizable {
            return Err(HunterError::InvalidState(format!(
                "quest {} is a built-in quest and cannot be edited",
                quest_id
            )));
        }
        let title = validate_quest_title(title)?;
        let description = sanitize_quest_description(description)?;

        let quest = &mut self.quests[idx];
        quest.title = title;
        quest.description = description;
        debug!("Updated quest {} -> {}", quest_id, escape_log(&quest.title));
        Ok(())
    }

    /// Set a quest's progress percentage. Reaching 100 completes it.
    ///
    /// Returns the reward when this call completed the quest.
    pub fn update_quest_progress(
        &mut self,
        quest_id: &str,
        percent: u8,
    ) -> Result<Option<Reward>, HunterError> {
        let idx = self.quest_index(quest_id)?;
        if self.quests[idx].completed {
            return Err(HunterError::InvalidState(format!(
                "quest {} is already completed",
                quest_id
            )));
        }
        let percent = percent.min(100);
        if percent == 100 {
            return self.complete_quest(quest_id).map(Some);
        }
        self.quests[idx].progress = percent;
        debug!("Quest {} progress {}%", quest_id, percent);
        Ok(None)
    }

    /// Reset every daily quest. Returns how many were reset.
    pub fn reset_daily_quests(&mut self) -> usize {
        let mut count = 0;
        for quest in self.quests.iter_mut().filter(|q| q.is_daily) {
            quest.reset();
            count += 1;
        }
        let today = self.today();
        self.last_daily_reset = today;
        info!("Daily quests reset for {} ({} quests)", today, count);
        self.push_event(ProgressionEvent::DailyQuestsReset {
            date: today,
            quests_reset: count,
        });
        count
    }

    /// Reset once if the calendar day has advanced since the last reset.
    pub fn check_daily_reset(&mut self) -> bool {
        if self.last_daily_reset < self.today() {
            self.reset_daily_quests();
            true
        } else {
            false
        }
    }
}

/// One status line per quest, e.g. `[x] Pushups (E) 50xp +100g [daily]`
pub fn format_quest_line(quest: &QuestRecord) -> String {
    let mark = if quest.completed {
        "x".to_string()
    } else if quest.progress > 0 {
        format!("{}%", quest.progress)
    } else {
        " ".to_string()
    };
    let mut line = format!(
        "[{}] {} ({}) {}xp",
        mark, quest.title, quest.difficulty, quest.reward_exp
    );
    if let Some(gold) = quest.reward_gold {
        line.push_str(&format!(" +{}g", gold));
    }
    if !quest.reward_items.is_empty() {
        line.push_str(&format!(" +{}", quest.reward_items.join(", ")));
    }
    if quest.is_daily {
        line.push_str(" [daily]");
    }
    if let Some(exercise) = quest.exercise_type {
        line.push_str(&format!(" [{}]", exercise.label()));
    }
    line.push_str(&format!(" <{}>", quest.id));
    line
}

/// Daily quests first, then the rest, each under its own heading.
pub fn format_quest_list(quests: &[QuestRecord]) -> Vec<String> {
    if quests.is_empty() {
        return vec!["No quests available.".to_string()];
    }
    let mut lines = Vec::new();
    let daily: Vec<&QuestRecord> = quests.iter().filter(|q| q.is_daily).collect();
    let other: Vec<&QuestRecord> = quests.iter().filter(|q| !q.is_daily).collect();

    if !daily.is_empty() {
        let done = daily.iter().filter(|q| q.completed).count();
        lines.push(format!("=== DAILY QUESTS ({}/{}) ===", done, daily.len()));
        lines.extend(daily.into_iter().map(format_quest_line));
    }
    if !other.is_empty() {
        lines.push("=== QUESTS ===".to_string());
        lines.extend(other.into_iter().map(format_quest_line));
    }
    lines
}
