//! # Hunter System - gamified training progression
//!
//! A self-contained progression engine: completing workout quests earns
//! experience, levels raise the hunter's rank, and level-ups may extract
//! shadows that can later be arisen into an army.
//!
//! ## Features
//!
//! - **Progression**: linear per-level thresholds with carry-over and a rank
//!   derived purely from level.
//! - **Quests**: seeded daily training, custom quests, progress tracking and
//!   a daily reset on a configurable day boundary.
//! - **Shadow Army**: deferred extraction after level-ups, arise with a
//!   configurable power bonus.
//! - **Persistence**: versioned JSON records in sled, or in memory for tests.
//! - **Async Runtime**: one tokio task owns the engine; timers become messages.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use hunter_system::config::Config;
//! use hunter_system::hunter::{HunterCommand, HunterService, HunterStoreBuilder, ProgressionEngine};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("hunter.toml").await?;
//!     let store = HunterStoreBuilder::new(config.storage.database_path()).open()?;
//!     let builder = ProgressionEngine::builder()
//!         .config(config.progression.clone())
//!         .reset_offset(config.schedule.reset_offset());
//!     let mut service = HunterService::open(store, builder)?;
//!
//!     let outcome = service.execute(HunterCommand::CompleteQuest("daily-pushups".into()))?;
//!     for event in outcome.events {
//!         println!("{}", event.describe());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`hunter`] - Engine, quests, shadows, storage and the tokio service
//! - [`config`] - Configuration management and validation
//! - [`validation`] - Quest text and shadow type validation
//! - [`logutil`] - Single-line escaping for user text in logs

pub mod config;
pub mod hunter;
pub mod logutil;
pub mod validation;
