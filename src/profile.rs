//! Profile data exchanged with the host
//!
//! The core reads a [`ProfileSnapshot`] when a round starts and hands back a
//! [`RoundSummary`] when it ends. Storing either is the host's job.

use serde::{Deserialize, Serialize};

use crate::sim::{HeroId, WeaponId};

/// Permanent upgrade levels bought between rounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MetaUpgrades {
    /// Extra starting shield per level
    pub armor: u32,
    /// Move speed bonus per level
    pub agility: u32,
    /// Dash cooldown reduction per level
    pub dash: u32,
    /// Hero power charge rate bonus per level
    pub reactor: u32,
}

impl MetaUpgrades {
    /// Multiplier applied to passive hero power charge
    pub fn reactor_multiplier(&self) -> f32 {
        1.0 + 0.12 * self.reactor as f32
    }
}

/// Read-only view of the player's profile at round start
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileSnapshot {
    pub currency: u64,
    pub meta: MetaUpgrades,
    pub unlocked_weapons: Vec<WeaponId>,
    /// Best score so far, for the new-record flag
    pub best_score: u64,
}

impl Default for ProfileSnapshot {
    fn default() -> Self {
        Self {
            currency: 0,
            meta: MetaUpgrades::default(),
            unlocked_weapons: vec![WeaponId::Pulse],
            best_score: 0,
        }
    }
}

impl ProfileSnapshot {
    pub fn has_weapon(&self, weapon: WeaponId) -> bool {
        self.unlocked_weapons.contains(&weapon)
    }
}

/// Immutable result of one finished round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundSummary {
    pub hero: HeroId,
    pub weapon: WeaponId,
    pub score: u64,
    pub survival_seconds: u32,
    pub kills: u32,
    pub spawned_enemies: u32,
    pub best_combo: u32,
    pub level: u32,
    /// Currency granted for this round
    pub reward: u32,
    pub new_best: bool,
}
