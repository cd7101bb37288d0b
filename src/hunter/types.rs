use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const QUEST_SCHEMA_VERSION: u8 = 1;
pub const SHADOW_SCHEMA_VERSION: u8 = 1;
pub const PROFILE_SCHEMA_VERSION: u8 = 1;
pub const RESET_SCHEMA_VERSION: u8 = 1;

/// Hunter tier label. Doubles as quest difficulty.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Rank {
    E,
    D,
    C,
    B,
    A,
    S,
}

pub const ALL_RANKS: [Rank; 6] = [Rank::E, Rank::D, Rank::C, Rank::B, Rank::A, Rank::S];

impl Rank {
    pub fn letter(&self) -> char {
        match self {
            Rank::E => 'E',
            Rank::D => 'D',
            Rank::C => 'C',
            Rank::B => 'B',
            Rank::A => 'A',
            Rank::S => 'S',
        }
    }
}

impl Default for Rank {
    fn default() -> Self {
        Rank::E
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

impl FromStr for Rank {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let letter = trimmed
            .strip_suffix("-rank")
            .or_else(|| trimmed.strip_suffix("-Rank"))
            .unwrap_or(trimmed);
        match letter.to_ascii_uppercase().as_str() {
            "E" => Ok(Rank::E),
            "D" => Ok(Rank::D),
            "C" => Ok(Rank::C),
            "B" => Ok(Rank::B),
            "A" => Ok(Rank::A),
            "S" => Ok(Rank::S),
            _ => Err(format!("unknown rank '{}' (expected E, D, C, B, A or S)", s)),
        }
    }
}

/// Kind of workout a quest tracks
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseType {
    Pushups,
    Situps,
    Squats,
    Running,
    Plank,
    Cardio,
}

impl ExerciseType {
    pub fn label(&self) -> &'static str {
        match self {
            ExerciseType::Pushups => "push-ups",
            ExerciseType::Situps => "sit-ups",
            ExerciseType::Squats => "squats",
            ExerciseType::Running => "running",
            ExerciseType::Plank => "plank",
            ExerciseType::Cardio => "cardio",
        }
    }
}

impl FromStr for ExerciseType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', '_', ' '], "").as_str() {
            "pushups" | "pushup" => Ok(ExerciseType::Pushups),
            "situps" | "situp" => Ok(ExerciseType::Situps),
            "squats" | "squat" => Ok(ExerciseType::Squats),
            "running" | "run" => Ok(ExerciseType::Running),
            "plank" => Ok(ExerciseType::Plank),
            "cardio" => Ok(ExerciseType::Cardio),
            _ => Err(format!("unknown exercise type '{}'", s)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuestRecord {
    pub id: String,
    pub title: String,
    pub description: String,
    pub difficulty: Rank,
    pub reward_exp: u64,
    #[serde(default)]
    pub reward_gold: Option<u64>,
    #[serde(default)]
    pub reward_items: Vec<String>,
    pub completed: bool,
    /// Percent complete (0-100)
    pub progress: u8,
    pub is_daily: bool,
    #[serde(default)]
    pub last_completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub exercise_type: Option<ExerciseType>,
    /// User-authored quests may be edited; seeded ones may not
    #[serde(default)]
    pub customizable: bool,
}

impl QuestRecord {
    pub fn new(id: &str, title: &str, description: &str, difficulty: Rank, reward_exp: u64) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            difficulty,
            reward_exp,
            reward_gold: None,
            reward_items: Vec::new(),
            completed: false,
            progress: 0,
            is_daily: false,
            last_completed_at: None,
            exercise_type: None,
            customizable: false,
        }
    }

    pub fn with_reward_gold(mut self, gold: u64) -> Self {
        self.reward_gold = Some(gold);
        self
    }

    pub fn with_reward_item(mut self, item: &str) -> Self {
        self.reward_items.push(item.to_string());
        self
    }

    pub fn with_exercise(mut self, exercise: ExerciseType) -> Self {
        self.exercise_type = Some(exercise);
        self
    }

    pub fn as_daily(mut self) -> Self {
        self.is_daily = true;
        self
    }

    pub fn mark_complete(&mut self, at: DateTime<Utc>) {
        self.completed = true;
        self.progress = 100;
        self.last_completed_at = Some(at);
    }

    pub fn reset(&mut self) {
        self.completed = false;
        self.progress = 0;
    }
}

/// Input for a user-authored quest; the engine assigns id and initial state.
#[derive(Debug, Clone, PartialEq)]
pub struct NewQuest {
    pub title: String,
    pub description: String,
    pub difficulty: Rank,
    pub reward_exp: u64,
    pub reward_gold: Option<u64>,
    pub reward_items: Vec<String>,
    pub is_daily: bool,
    pub exercise_type: Option<ExerciseType>,
}

impl NewQuest {
    pub fn new(title: &str, description: &str, difficulty: Rank, reward_exp: u64) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
            difficulty,
            reward_exp,
            reward_gold: None,
            reward_items: Vec::new(),
            is_daily: false,
            exercise_type: None,
        }
    }

    pub fn with_reward_gold(mut self, gold: u64) -> Self {
        self.reward_gold = Some(gold);
        self
    }

    pub fn with_exercise(mut self, exercise: ExerciseType) -> Self {
        self.exercise_type = Some(exercise);
        self
    }

    pub fn as_daily(mut self) -> Self {
        self.is_daily = true;
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShadowRecord {
    pub id: String,
    pub name: String,
    /// Open set: soldier, knight, mage, beast, assassin, tank, ...
    pub shadow_type: String,
    pub level: u32,
    pub power: u32,
    pub arisen: bool,
    pub extracted_at: DateTime<Utc>,
}

/// Stack of identical reward items held by the hunter
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ItemStack {
    pub name: String,
    pub quantity: u32,
}

/// Rewards applied through the shared reward path (quests, cleared gates).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reward {
    pub exp: u64,
    pub gold: Option<u64>,
    pub items: Vec<String>,
}

impl Reward {
    pub fn new(exp: u64) -> Self {
        Self {
            exp,
            gold: None,
            items: Vec::new(),
        }
    }

    pub fn with_gold(mut self, gold: u64) -> Self {
        self.gold = Some(gold);
        self
    }

    pub fn with_item(mut self, item: &str) -> Self {
        self.items.push(item.to_string());
        self
    }
}

/// Persisted level/experience/gold/inventory; rank is derived on load.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProfileRecord {
    pub level: u32,
    pub experience: u64,
    pub gold: u64,
    #[serde(default)]
    pub inventory: Vec<ItemStack>,
    pub updated_at: DateTime<Utc>,
}

impl Default for ProfileRecord {
    fn default() -> Self {
        Self {
            level: 1,
            experience: 0,
            gold: 0,
            inventory: Vec::new(),
            updated_at: Utc::now(),
        }
    }
}

/// Read-only view of the hunter for presentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HunterProfile {
    pub level: u32,
    pub experience: u64,
    pub experience_to_next_level: u64,
    pub gold: u64,
    pub rank: Rank,
}

/// Totals across the shadow roster
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArmySummary {
    pub total: usize,
    pub arisen: usize,
    pub dormant: usize,
    pub total_power: u64,
    pub arisen_power: u64,
}
