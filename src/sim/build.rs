//! Build and progression model
//!
//! A build is the hero, weapon and upgrade effects folded into combat
//! stats. It is created once per round and then only changed by upgrade
//! picks and shield use.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use super::catalog::{HeroId, UpgradeId};
use super::state::RoundState;
use crate::consts::*;
use crate::profile::MetaUpgrades;

/// Mutable combat stats for one round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildState {
    /// Multiplier on `PLAYER_SPEED`
    pub move_speed: f32,
    /// Seconds between volleys
    pub fire_interval: f32,
    pub damage: f32,
    /// Shots per volley before weapon bonus
    pub multi_shot: u32,
    pub dash_cooldown: f32,
    pub pickup_radius: f32,
    pub shield: u32,
    pub max_shield: u32,
}

impl BuildState {
    /// Spend one shield charge. Returns false if none was left.
    pub fn consume_shield(&mut self) -> bool {
        if self.shield == 0 {
            return false;
        }
        self.shield -= 1;
        true
    }

    /// Restore up to `amount` shield, never past the maximum
    pub fn restore_shield(&mut self, amount: u32) {
        self.shield = (self.shield + amount).min(self.max_shield);
    }

    /// Apply one upgrade's stat change
    fn apply(&mut self, upgrade: UpgradeId) {
        match upgrade {
            UpgradeId::RapidFire => {
                self.fire_interval = (self.fire_interval * 0.85).max(MIN_FIRE_INTERVAL);
            }
            UpgradeId::HeavyRounds => self.damage += 1.0,
            UpgradeId::Swift => {
                self.move_speed = (self.move_speed + 0.15).min(MAX_MOVE_SPEED);
            }
            UpgradeId::SplitShot => {
                self.multi_shot = (self.multi_shot + 1).min(MAX_MULTI_SHOT);
            }
            UpgradeId::QuickDash => {
                self.dash_cooldown = (self.dash_cooldown - 0.6).max(MIN_DASH_COOLDOWN);
            }
            UpgradeId::Magnet => {
                self.pickup_radius = (self.pickup_radius + 50.0).min(MAX_PICKUP_RADIUS);
            }
        }
    }
}

/// Starting stats from hero archetype and meta-upgrade levels
pub fn create_build(hero: HeroId, meta: &MetaUpgrades) -> BuildState {
    let def = hero.def();
    let max_shield = (1 + def.bonus_shield + meta.armor).max(1);

    BuildState {
        move_speed: (def.move_scale * (1.0 + 0.04 * meta.agility as f32)).min(MAX_MOVE_SPEED),
        fire_interval: BASE_FIRE_INTERVAL * def.fire_scale,
        damage: BASE_SHOT_DAMAGE * def.damage_scale,
        multi_shot: 1,
        dash_cooldown: (BASE_DASH_COOLDOWN * def.dash_scale - 0.15 * meta.dash as f32)
            .max(MIN_DASH_COOLDOWN),
        pickup_radius: BASE_PICKUP_RADIUS,
        shield: max_shield,
        max_shield,
    }
}

/// Record and apply an upgrade. Taking the same upgrade twice is a no-op
/// and returns false.
pub fn apply_upgrade(round: &mut RoundState, upgrade: UpgradeId) -> bool {
    if round.upgrades.contains(&upgrade) {
        return false;
    }
    round.upgrades.push(upgrade);
    round.build.apply(upgrade);
    log::debug!("Upgrade taken: {:?} -> {:?}", upgrade, round.build);
    true
}

/// Up to `UPGRADE_CHOICES` distinct upgrades not yet taken
pub fn roll_upgrade_choices<R: Rng + ?Sized>(rng: &mut R, taken: &[UpgradeId]) -> Vec<UpgradeId> {
    let mut pool: Vec<UpgradeId> = UpgradeId::ALL
        .into_iter()
        .filter(|u| !taken.contains(u))
        .collect();
    pool.shuffle(rng);
    pool.truncate(UPGRADE_CHOICES);
    pool
}
