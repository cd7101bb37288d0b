//! Experience thresholds and rank derivation.
//!
//! Pure functions only; the engine is the sole caller that mutates state
//! with their results.

use crate::hunter::types::Rank;

/// Experience per level used by the threshold formula.
pub const EXPERIENCE_PER_LEVEL: u64 = 100;

/// Experience needed to advance from `level` to `level + 1`.
pub fn experience_to_next_level(level: u32) -> u64 {
    u64::from(level.max(1)) * EXPERIENCE_PER_LEVEL
}

/// Rank tier for a level.
pub fn rank_for_level(level: u32) -> Rank {
    match level {
        25.. => Rank::S,
        20..=24 => Rank::A,
        15..=19 => Rank::B,
        10..=14 => Rank::C,
        5..=9 => Rank::D,
        _ => Rank::E,
    }
}

/// Result of carrying experience over level thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelCarry {
    pub level: u32,
    pub experience: u64,
    pub levels_gained: u32,
}

/// Apply `amount` experience starting at (`level`, `experience`).
///
/// The threshold rises with every level, so the levels gained are the
/// largest `k` whose summed thresholds fit in the experience held. That sum
/// is quadratic in `k` and is solved directly.
pub fn carry_experience(level: u32, experience: u64, amount: u64) -> LevelCarry {
    let level = level.max(1);
    let experience = experience.saturating_add(amount);
    let levels_gained = levels_affordable(level, experience);
    let spent = u64::try_from(cost_of_levels(level, levels_gained)).unwrap_or(experience);
    LevelCarry {
        level: level + levels_gained,
        experience: experience - spent,
        levels_gained,
    }
}

/// Experience needed to climb `levels` levels starting at `level`.
fn cost_of_levels(level: u32, levels: u32) -> u128 {
    let (l, k) = (u128::from(level), u128::from(levels));
    u128::from(EXPERIENCE_PER_LEVEL) * (k * l + k * k.saturating_sub(1) / 2)
}

/// Largest `k` with `cost_of_levels(level, k) <= experience`, capped so the
/// level never exceeds `u32::MAX`.
fn levels_affordable(level: u32, experience: u64) -> u32 {
    let headroom = u32::MAX - level;
    // cost = 50 * (k^2 + (2L - 1) k)
    let b = 2.0 * f64::from(level) - 1.0;
    let c = experience as f64 / (EXPERIENCE_PER_LEVEL as f64 / 2.0);
    let estimate = ((-b + (b * b + 4.0 * c).sqrt()) / 2.0).floor().max(0.0);
    let mut k = if estimate >= f64::from(headroom) {
        headroom
    } else {
        estimate as u32
    };
    // The float estimate can be off by one either way
    let budget = u128::from(experience);
    while k > 0 && cost_of_levels(level, k) > budget {
        k -= 1;
    }
    while k < headroom && cost_of_levels(level, k + 1) <= budget {
        k += 1;
    }
    k
}

/// Total experience a hunter has earned to stand at (`level`, `experience`).
pub fn lifetime_experience(level: u32, experience: u64) -> u64 {
    let below = u64::try_from(cost_of_levels(1, level.max(1) - 1)).unwrap_or(u64::MAX);
    below.saturating_add(experience)
}
