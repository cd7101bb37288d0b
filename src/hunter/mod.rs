//! Hunter progression core and its runtime.
//!
//! The engine owns level, rank, quests and the shadow army; storage and the
//! tokio service sit around it so the engine itself stays free of I/O and
//! timers.

pub mod clock;
pub mod commands;
pub mod engine;
pub mod errors;
pub mod events;
pub mod progression;
pub mod quest;
pub mod seed;
pub mod service;
pub mod shadow;
pub mod storage;
pub mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use commands::{parse_command, SessionCommand, HELP_TEXT};
pub use engine::{HunterSnapshot, ProgressionEngine, ProgressionEngineBuilder};
pub use errors::HunterError;
pub use events::{ProgressionEvent, ScheduledIntent, MAX_PENDING_EVENTS, MAX_PENDING_EXTRACTIONS};
pub use progression::{carry_experience, experience_to_next_level, rank_for_level};
pub use quest::{format_quest_line, format_quest_list};
pub use seed::seed_starter_quests;
pub use service::{spawn_service, CommandOutcome, HunterCommand, HunterHandle, HunterService};
pub use shadow::{format_army, format_shadow_line, SHADOW_NAME_PREFIXES};
pub use storage::{
    HunterStore, HunterStoreBuilder, MemoryAdapter, PersistenceAdapter, SledAdapter,
};
pub use types::*;
