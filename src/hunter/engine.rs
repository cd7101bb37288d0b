//! The progression engine: single owner of the hunter's mutable state.
//!
//! Quest and shadow operations live in `quest.rs` and `shadow.rs` as further
//! `impl ProgressionEngine` blocks. The engine performs no I/O and holds no
//! timers; persistence goes through [`HunterSnapshot`] and deferred work is
//! surfaced as [`ScheduledIntent`]s.

use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, RngCore, SeedableRng};
use std::collections::{HashSet, VecDeque};

use crate::config::ProgressionConfig;
use crate::hunter::clock::{Clock, SystemClock};
use crate::hunter::events::{
    ProgressionEvent, ScheduledIntent, MAX_PENDING_EVENTS, MAX_PENDING_EXTRACTIONS,
};
use crate::hunter::progression::{carry_experience, experience_to_next_level, rank_for_level};
use crate::hunter::seed::seed_starter_quests;
use crate::hunter::types::{
    HunterProfile, ItemStack, ProfileRecord, QuestRecord, Rank, Reward, ShadowRecord,
};

/// Everything the engine persists. Fields are optional so a partially
/// populated store still restores (missing records fall back to defaults).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HunterSnapshot {
    pub profile: Option<ProfileRecord>,
    pub quests: Option<Vec<QuestRecord>>,
    pub shadows: Option<Vec<ShadowRecord>>,
    pub last_daily_reset: Option<NaiveDate>,
}

/// Builder so callers and tests can inject randomness, time, and restored state.
pub struct ProgressionEngineBuilder {
    config: ProgressionConfig,
    reset_offset: FixedOffset,
    rng: Option<Box<dyn RngCore + Send>>,
    clock: Option<Box<dyn Clock>>,
    snapshot: Option<HunterSnapshot>,
}

impl ProgressionEngineBuilder {
    pub fn new() -> Self {
        Self {
            config: ProgressionConfig::default(),
            reset_offset: Utc.fix(),
            rng: None,
            clock: None,
            snapshot: None,
        }
    }

    pub fn config(mut self, config: ProgressionConfig) -> Self {
        self.config = config;
        self
    }

    /// Offset in which calendar days are compared for the daily reset.
    pub fn reset_offset(mut self, offset: FixedOffset) -> Self {
        self.reset_offset = offset;
        self
    }

    pub fn rng<R: RngCore + Send + 'static>(mut self, rng: R) -> Self {
        self.rng = Some(Box::new(rng));
        self
    }

    pub fn clock<C: Clock + 'static>(mut self, clock: C) -> Self {
        self.clock = Some(Box::new(clock));
        self
    }

    /// Start from persisted state instead of a fresh level 1 hunter.
    pub fn restore(mut self, snapshot: HunterSnapshot) -> Self {
        self.snapshot = Some(snapshot);
        self
    }

    pub fn build(self) -> ProgressionEngine {
        let mut config = self.config;
        config.extraction_chance = if config.extraction_chance.is_nan() {
            0.0
        } else {
            config.extraction_chance.clamp(0.0, 1.0)
        };

        let rng = self
            .rng
            .unwrap_or_else(|| Box::new(StdRng::from_entropy()));
        let clock = self.clock.unwrap_or_else(|| Box::new(SystemClock));
        let today = clock.today(self.reset_offset);

        let snapshot = self.snapshot.unwrap_or_default();
        let profile = snapshot.profile.unwrap_or_default();
        // Re-normalize in case the stored record predates a threshold change
        let carry = carry_experience(profile.level.max(1), 0, profile.experience);
        let quests = dedupe_by_id(
            snapshot.quests.unwrap_or_else(seed_starter_quests),
            |q| q.id.as_str(),
            "quest",
        );
        let shadows = dedupe_by_id(
            snapshot.shadows.unwrap_or_default(),
            |s| s.id.as_str(),
            "shadow",
        );

        ProgressionEngine {
            config,
            reset_offset: self.reset_offset,
            rng,
            clock,
            level: carry.level,
            experience: carry.experience,
            gold: profile.gold,
            rank: rank_for_level(carry.level),
            quests,
            shadows,
            inventory: profile.inventory,
            last_daily_reset: snapshot.last_daily_reset.unwrap_or(today),
            pending_extractions: VecDeque::new(),
            events: Vec::new(),
            intents: Vec::new(),
        }
    }
}

impl Default for ProgressionEngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn dedupe_by_id<T>(records: Vec<T>, id: impl Fn(&T) -> &str, kind: &str) -> Vec<T> {
    let mut seen = HashSet::new();
    let mut kept = Vec::with_capacity(records.len());
    for record in records {
        if seen.insert(id(&record).to_string()) {
            kept.push(record);
        } else {
            warn!("Dropping duplicate {} id {} from restored state", kind, id(&record));
        }
    }
    kept
}

pub struct ProgressionEngine {
    pub(super) config: ProgressionConfig,
    pub(super) reset_offset: FixedOffset,
    pub(super) rng: Box<dyn RngCore + Send>,
    pub(super) clock: Box<dyn Clock>,
    pub(super) level: u32,
    pub(super) experience: u64,
    pub(super) gold: u64,
    pub(super) rank: Rank,
    pub(super) quests: Vec<QuestRecord>,
    pub(super) shadows: Vec<ShadowRecord>,
    pub(super) inventory: Vec<ItemStack>,
    pub(super) last_daily_reset: NaiveDate,
    pub(super) pending_extractions: VecDeque<String>,
    pub(super) events: Vec<ProgressionEvent>,
    pub(super) intents: Vec<ScheduledIntent>,
}

impl ProgressionEngine {
    pub fn builder() -> ProgressionEngineBuilder {
        ProgressionEngineBuilder::new()
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn experience(&self) -> u64 {
        self.experience
    }

    pub fn experience_to_next_level(&self) -> u64 {
        experience_to_next_level(self.level)
    }

    pub fn gold(&self) -> u64 {
        self.gold
    }

    pub fn rank(&self) -> Rank {
        self.rank
    }

    pub fn inventory(&self) -> &[ItemStack] {
        &self.inventory
    }

    pub fn last_daily_reset(&self) -> NaiveDate {
        self.last_daily_reset
    }

    pub fn config(&self) -> &ProgressionConfig {
        &self.config
    }

    pub fn profile(&self) -> HunterProfile {
        HunterProfile {
            level: self.level,
            experience: self.experience,
            experience_to_next_level: self.experience_to_next_level(),
            gold: self.gold,
            rank: self.rank,
        }
    }

    /// Current instant from the injected clock.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Today's date in the reset offset.
    pub fn today(&self) -> NaiveDate {
        self.clock.today(self.reset_offset)
    }

    /// Take every event emitted since the last drain.
    pub fn drain_events(&mut self) -> Vec<ProgressionEvent> {
        std::mem::take(&mut self.events)
    }

    /// Take every scheduled intent emitted since the last drain.
    pub fn drain_intents(&mut self) -> Vec<ScheduledIntent> {
        std::mem::take(&mut self.intents)
    }

    /// Add experience, carrying over thresholds one level at a time.
    ///
    /// Returns the number of levels gained. Each level gained may schedule a
    /// deferred shadow extraction.
    pub fn gain_experience(&mut self, amount: u64) -> u32 {
        if amount == 0 {
            return 0;
        }
        let carry = carry_experience(self.level, self.experience, amount);
        self.experience = carry.experience;
        if carry.levels_gained == 0 {
            debug!("Gained {} exp ({}/{})", amount, self.experience, self.experience_to_next_level());
            return 0;
        }

        self.level = carry.level;
        for _ in 0..carry.levels_gained {
            if self.extraction_queue_full() {
                debug!(
                    "Extraction queue full ({}); skipping remaining level-up rolls",
                    MAX_PENDING_EXTRACTIONS
                );
                break;
            }
            self.roll_level_up_extraction();
        }
        info!(
            "Level up: now level {} (+{}), exp {}/{}",
            self.level,
            carry.levels_gained,
            self.experience,
            self.experience_to_next_level()
        );
        self.push_event(ProgressionEvent::LevelUp {
            level: self.level,
            levels_gained: carry.levels_gained,
        });
        self.refresh_rank();
        carry.levels_gained
    }

    /// Apply a reward bundle (quest completion, cleared gate). Returns levels gained.
    pub fn grant_reward(&mut self, reward: &Reward) -> u32 {
        if let Some(gold) = reward.gold {
            self.gold = self.gold.saturating_add(gold);
        }
        for item in &reward.items {
            self.add_item(item);
        }
        self.gain_experience(reward.exp)
    }

    pub fn snapshot(&self) -> HunterSnapshot {
        HunterSnapshot {
            profile: Some(ProfileRecord {
                level: self.level,
                experience: self.experience,
                gold: self.gold,
                inventory: self.inventory.clone(),
                updated_at: self.clock.now(),
            }),
            quests: Some(self.quests.clone()),
            shadows: Some(self.shadows.clone()),
            last_daily_reset: Some(self.last_daily_reset),
        }
    }

    pub(super) fn push_event(&mut self, event: ProgressionEvent) {
        if self.events.len() >= MAX_PENDING_EVENTS {
            self.events.remove(0);
        }
        self.events.push(event);
    }

    /// 8 hex chars from the injected RNG; callers re-roll on collision.
    pub(super) fn random_suffix(&mut self) -> String {
        let bytes: [u8; 16] = self.rng.gen();
        let uuid = uuid::Builder::from_random_bytes(bytes).into_uuid();
        uuid.simple().to_string()[..8].to_string()
    }

    fn extraction_queue_full(&self) -> bool {
        self.pending_extractions.len() >= MAX_PENDING_EXTRACTIONS
            || self.intents.len() >= MAX_PENDING_EXTRACTIONS
    }

    fn roll_level_up_extraction(&mut self) {
        if !self.rng.gen_bool(self.config.extraction_chance) {
            return;
        }
        let Some(shadow_type) = self.config.shadow_types.choose(&mut self.rng).cloned() else {
            return;
        };
        debug!("Level-up extraction scheduled: {}", shadow_type);
        self.pending_extractions.push_back(shadow_type.clone());
        self.intents.push(ScheduledIntent::ExtractShadow {
            shadow_type,
            delay: self.config.extraction_delay(),
        });
    }

    /// Recompute rank from level; the only place rank is written.
    fn refresh_rank(&mut self) {
        let derived = rank_for_level(self.level);
        if derived != self.rank {
            let from = self.rank;
            self.rank = derived;
            info!("Rank up: {} -> {}", from, derived);
            self.push_event(ProgressionEvent::RankUp { from, to: derived });
        }
    }

    fn add_item(&mut self, name: &str) {
        match self.inventory.iter_mut().find(|stack| stack.name == name) {
            Some(stack) => stack.quantity = stack.quantity.saturating_add(1),
            None => self.inventory.push(ItemStack {
                name: name.to_string(),
                quantity: 1,
            }),
        }
    }
}
