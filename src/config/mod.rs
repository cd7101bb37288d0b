//! # Configuration Management Module
//!
//! Centralized, TOML-backed configuration for the Hunter System with
//! validation and defaults.
//!
//! ## Configuration Structure
//!
//! - [`HunterConfig`] - Display settings for the hunter
//! - [`ProgressionConfig`] - Extraction chance, arise bonus, shadow types
//! - [`ScheduleConfig`] - Daily reset check cadence and day boundary offset
//! - [`StorageConfig`] - Data persistence settings
//! - [`LoggingConfig`] - Logging and debugging settings
//!
//! ## Usage
//!
//! ```rust,no_run
//! use hunter_system::config::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("hunter.toml").await?;
//!     println!("Hunter: {}", config.hunter.name);
//!     println!("Arise bonus: {}", config.progression.arise_power_bonus);
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration File Format
//!
//! ```toml
//! [hunter]
//! name = "Hunter"
//!
//! [progression]
//! arise_power_bonus = 5
//! extraction_chance = 0.7
//! extraction_delay_ms = 1500
//! shadow_types = ["soldier", "knight", "mage", "beast", "assassin"]
//!
//! [schedule]
//! reset_check_interval_minutes = 60
//! reset_utc_offset_minutes = 0
//!
//! [storage]
//! data_dir = "./data"
//!
//! [logging]
//! level = "info"
//! ```

use anyhow::{anyhow, bail, Result};
use chrono::{FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::fs;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HunterConfig {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProgressionConfig {
    /// Power added when a shadow is arisen (single and bulk alike).
    #[serde(default = "default_arise_power_bonus")]
    pub arise_power_bonus: u32,
    /// Probability that each level gained schedules a shadow extraction.
    #[serde(default = "default_extraction_chance")]
    pub extraction_chance: f64,
    /// Delay between a level-up and the scheduled extraction completing.
    #[serde(default = "default_extraction_delay_ms")]
    pub extraction_delay_ms: u64,
    /// Types rolled for level-up extractions.
    #[serde(default = "default_shadow_types")]
    pub shadow_types: Vec<String>,
}

fn default_arise_power_bonus() -> u32 {
    5
}

fn default_extraction_chance() -> f64 {
    0.7
}

fn default_extraction_delay_ms() -> u64 {
    1500
}

fn default_shadow_types() -> Vec<String> {
    ["soldier", "knight", "mage", "beast", "assassin"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            arise_power_bonus: default_arise_power_bonus(),
            extraction_chance: default_extraction_chance(),
            extraction_delay_ms: default_extraction_delay_ms(),
            shadow_types: default_shadow_types(),
        }
    }
}

impl ProgressionConfig {
    pub fn extraction_delay(&self) -> Duration {
        Duration::from_millis(self.extraction_delay_ms)
    }
}

/// Daily reset scheduling.
///
/// The day boundary is computed in a fixed UTC offset so the reset is
/// reproducible regardless of the host timezone.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScheduleConfig {
    #[serde(default = "default_reset_check_interval_minutes")]
    pub reset_check_interval_minutes: u64,
    #[serde(default)]
    pub reset_utc_offset_minutes: i32,
}

fn default_reset_check_interval_minutes() -> u64 {
    60
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            reset_check_interval_minutes: default_reset_check_interval_minutes(),
            reset_utc_offset_minutes: 0,
        }
    }
}

impl ScheduleConfig {
    pub fn reset_check_interval(&self) -> Duration {
        Duration::from_secs(self.reset_check_interval_minutes.max(1) * 60)
    }

    /// Offset used for calendar-day comparisons; falls back to UTC when out of range.
    pub fn reset_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.reset_utc_offset_minutes * 60)
            .unwrap_or_else(|| Utc.fix())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_dir: String,
    /// Optional override for the sled database path; defaults to `<data_dir>/hunter`.
    #[serde(default)]
    pub db_path: Option<String>,
}

impl StorageConfig {
    pub fn database_path(&self) -> String {
        match &self.db_path {
            Some(path) => path.clone(),
            None => format!("{}/hunter", self.data_dir.trim_end_matches('/')),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub hunter: HunterConfig,
    #[serde(default)]
    pub progression: ProgressionConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a file
    pub async fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| anyhow!("Failed to read config file {}: {}", path, e))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse config file {}: {}", path, e))?;

        config.validate()?;
        Ok(config)
    }

    /// Create a default configuration file
    pub async fn create_default(path: &str) -> Result<()> {
        let config = Config::default();
        let content = toml::to_string_pretty(&config)
            .map_err(|e| anyhow!("Failed to serialize default config: {}", e))?;

        fs::write(path, content)
            .await
            .map_err(|e| anyhow!("Failed to write config file {}: {}", path, e))?;

        Ok(())
    }

    /// Reject values the engine cannot honor.
    pub fn validate(&self) -> Result<()> {
        let chance = self.progression.extraction_chance;
        if !(0.0..=1.0).contains(&chance) {
            bail!("progression.extraction_chance must be within 0.0..=1.0 (got {})", chance);
        }
        if self.progression.shadow_types.is_empty() {
            bail!("progression.shadow_types must list at least one type");
        }
        if self
            .progression
            .shadow_types
            .iter()
            .any(|t| t.trim().is_empty())
        {
            bail!("progression.shadow_types contains an empty entry");
        }
        if self.schedule.reset_check_interval_minutes == 0 {
            bail!("schedule.reset_check_interval_minutes must be greater than zero");
        }
        if self.schedule.reset_utc_offset_minutes.abs() > 14 * 60 {
            bail!(
                "schedule.reset_utc_offset_minutes must be within +/-840 (got {})",
                self.schedule.reset_utc_offset_minutes
            );
        }
        if self.storage.data_dir.trim().is_empty() {
            bail!("storage.data_dir must not be empty");
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            hunter: HunterConfig {
                name: "Hunter".to_string(),
            },
            progression: ProgressionConfig::default(),
            schedule: ScheduleConfig::default(),
            storage: StorageConfig {
                data_dir: "./data".to_string(),
                db_path: None,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file: Some("hunter.log".to_string()),
            },
        }
    }
}
