//! Shadow extraction and the arise ritual.
//!
//! Extraction is split in two so the runtime can delay the second half:
//! `begin_extraction` queues a type and `complete_extraction` creates the
//! oldest queued shadow. `extract_shadow` does both at once.

use log::{debug, info};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::hunter::engine::ProgressionEngine;
use crate::hunter::errors::HunterError;
use crate::hunter::events::ProgressionEvent;
use crate::hunter::types::{ArmySummary, ShadowRecord};
use crate::validation::normalize_shadow_type;

/// Prefixes drawn for generated shadow names.
pub const SHADOW_NAME_PREFIXES: &[&str] = &[
    "Shadow", "Dark", "Abyssal", "Night", "Obsidian", "Phantom", "Dusk", "Umbral",
];

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl ProgressionEngine {
    pub fn shadows(&self) -> &[ShadowRecord] {
        &self.shadows
    }

    pub fn shadow(&self, shadow_id: &str) -> Option<&ShadowRecord> {
        self.shadows.iter().find(|s| s.id == shadow_id)
    }

    /// Number of extractions queued but not yet completed.
    pub fn pending_extractions(&self) -> usize {
        self.pending_extractions.len()
    }

    /// Queue an extraction of `shadow_type` for a later `complete_extraction`.
    pub fn begin_extraction(&mut self, shadow_type: &str) -> Result<(), HunterError> {
        let shadow_type = normalize_shadow_type(shadow_type)?;
        debug!("Extraction queued: {}", shadow_type);
        self.pending_extractions.push_back(shadow_type);
        Ok(())
    }

    /// Create the shadow for the oldest queued extraction, if any.
    pub fn complete_extraction(&mut self) -> Option<ShadowRecord> {
        let shadow_type = self.pending_extractions.pop_front()?;
        Some(self.create_shadow(shadow_type))
    }

    /// Extract a shadow immediately, bypassing the queue.
    pub fn extract_shadow(&mut self, shadow_type: &str) -> Result<ShadowRecord, HunterError> {
        let shadow_type = normalize_shadow_type(shadow_type)?;
        Ok(self.create_shadow(shadow_type))
    }

    fn create_shadow(&mut self, shadow_type: String) -> ShadowRecord {
        let power = self.rng.gen_range(1..=10u32) + self.level / 2;
        let prefix = SHADOW_NAME_PREFIXES
            .choose(&mut self.rng)
            .copied()
            .unwrap_or("Shadow");
        let name = format!("{} {}", prefix, capitalize(&shadow_type));
        let id = loop {
            let candidate = format!("shadow-{}", self.random_suffix());
            if self.shadow(&candidate).is_none() {
                break candidate;
            }
        };

        let shadow = ShadowRecord {
            id: id.clone(),
            name: name.clone(),
            shadow_type,
            level: (self.level / 2).max(1),
            power,
            arisen: false,
            extracted_at: self.clock.now(),
        };
        self.shadows.push(shadow.clone());

        info!("Shadow extracted: {} ({}) power {}", name, id, power);
        self.push_event(ProgressionEvent::ShadowExtracted {
            shadow_id: id,
            name,
        });
        shadow
    }

    /// Arise one shadow, adding the configured power bonus. Returns the new power.
    pub fn arise_shadow(&mut self, shadow_id: &str) -> Result<u32, HunterError> {
        let idx = self
            .shadows
            .iter()
            .position(|s| s.id == shadow_id)
            .ok_or_else(|| HunterError::shadow_not_found(shadow_id))?;
        if self.shadows[idx].arisen {
            return Err(HunterError::InvalidState(format!(
                "shadow {} has already arisen",
                shadow_id
            )));
        }

        let bonus = self.config.arise_power_bonus;
        let shadow = &mut self.shadows[idx];
        shadow.arisen = true;
        shadow.power = shadow.power.saturating_add(bonus);
        let (name, power) = (shadow.name.clone(), shadow.power);

        info!("ARISE: {} ({}) power {}", name, shadow_id, power);
        self.push_event(ProgressionEvent::ShadowArisen {
            shadow_id: shadow_id.to_string(),
            name,
            power,
        });
        Ok(power)
    }

    /// Arise every eligible shadow in `shadow_ids`, skipping unknown or
    /// already arisen ones. Returns the ids that arose, in input order.
    pub fn arise_shadows(&mut self, shadow_ids: &[String]) -> Vec<String> {
        let mut arisen = Vec::new();
        for id in shadow_ids {
            match self.arise_shadow(id) {
                Ok(_) => arisen.push(id.clone()),
                Err(e) => debug!("Skipping {} in bulk arise: {}", id, e),
            }
        }
        arisen
    }

    /// Arise every dormant shadow in the roster.
    pub fn arise_all_dormant(&mut self) -> Vec<String> {
        let dormant: Vec<String> = self
            .shadows
            .iter()
            .filter(|s| !s.arisen)
            .map(|s| s.id.clone())
            .collect();
        self.arise_shadows(&dormant)
    }

    pub fn army(&self) -> ArmySummary {
        let mut summary = ArmySummary {
            total: self.shadows.len(),
            ..ArmySummary::default()
        };
        for shadow in &self.shadows {
            summary.total_power += u64::from(shadow.power);
            if shadow.arisen {
                summary.arisen += 1;
                summary.arisen_power += u64::from(shadow.power);
            }
        }
        summary.dormant = summary.total - summary.arisen;
        summary
    }
}

pub fn format_shadow_line(shadow: &ShadowRecord) -> String {
    let state = if shadow.arisen { "ARISEN" } else { "dormant" };
    format!(
        "{} [{}] Lv{} {} power {} ({})",
        shadow.name, shadow.id, shadow.level, shadow.shadow_type, shadow.power, state
    )
}

pub fn format_army(summary: &ArmySummary, shadows: &[ShadowRecord]) -> Vec<String> {
    if shadows.is_empty() {
        return vec!["Your shadow army is empty.".to_string()];
    }
    let mut lines = vec![format!(
        "=== SHADOW ARMY ({} arisen / {} dormant) power {} ===",
        summary.arisen, summary.dormant, summary.total_power
    )];
    lines.extend(shadows.iter().map(format_shadow_line));
    lines
}
