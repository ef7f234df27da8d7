//! Experience curve and per-member progress.

use std::ops::RangeInclusive;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Experience granted for a single message, before multipliers
pub const XP_PER_MESSAGE: RangeInclusive<u64> = 25..=39;

/// Experience needed to go from `level` to `level + 1`.
pub fn target_xp(level: u32) -> u64 {
    let level = u64::from(level);
    5 * level * level + 50 * level + 100
}

/// Experience needed to reach `level` from zero.
pub fn total_xp(level: u32) -> u64 {
    (0..level).map(target_xp).sum()
}

/// Roll the experience for one message.
pub fn random_xp() -> u64 {
    rand::rng().random_range(XP_PER_MESSAGE)
}

/// What an [`XpMultiplier`] is keyed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MultiplierKind {
    Role,
    Channel,
}

/// Bonus applied when the member has a role or posts in a channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XpMultiplier {
    #[serde(rename = "type")]
    pub kind: MultiplierKind,
    pub id: String,
    pub multiplier: f64,
}

/// A guild's experience scaling: a base rate and stacking multipliers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct XpRates {
    /// Unset or zero means 1.0
    #[serde(default)]
    pub xp_rate: Option<f64>,
    #[serde(default)]
    pub multipliers: Vec<XpMultiplier>,
}

impl XpRates {
    /// Combined factor for a message. Every matching multiplier stacks.
    pub fn factor<S: AsRef<str>>(&self, role_ids: &[S], channel_id: &str) -> f64 {
        let rate = self.xp_rate.filter(|rate| *rate != 0.0).unwrap_or(1.0);

        self.multipliers
            .iter()
            .filter(|m| match m.kind {
                MultiplierKind::Role => role_ids.iter().any(|role| role.as_ref() == m.id),
                MultiplierKind::Channel => channel_id == m.id,
            })
            .fold(rate, |factor, m| factor * m.multiplier)
    }

    /// Scale `base` experience, truncating to whole points.
    pub fn apply<S: AsRef<str>>(&self, base: u64, role_ids: &[S], channel_id: &str) -> u64 {
        let scaled = base as f64 * self.factor(role_ids, channel_id);
        if scaled.is_finite() && scaled > 0.0 {
            scaled as u64
        } else {
            0
        }
    }

    /// Roll and scale the experience for one message.
    pub fn roll<S: AsRef<str>>(&self, role_ids: &[S], channel_id: &str) -> u64 {
        self.apply(random_xp(), role_ids, channel_id)
    }
}

/// A member's position on the curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelProgress {
    pub level: u32,
    pub xp_current: u64,
    pub xp_required: u64,
    pub xp_total: u64,
}

impl Default for LevelProgress {
    fn default() -> Self {
        Self {
            level: 0,
            xp_current: 0,
            xp_required: target_xp(0),
            xp_total: 0,
        }
    }
}

impl LevelProgress {
    /// Add experience. Returns the new level when the threshold was crossed.
    ///
    /// At most one level is gained per call; overflow carries into the next
    /// level's progress.
    pub fn add_xp(&mut self, amount: u64) -> Option<u32> {
        self.xp_total = total_xp(self.level) + self.xp_current + amount;

        if self.xp_current + amount > self.xp_required {
            self.xp_current = self.xp_current + amount - self.xp_required;
            self.level += 1;
            self.xp_required = target_xp(self.level);
            Some(self.level)
        } else {
            self.xp_current += amount;
            None
        }
    }
}
