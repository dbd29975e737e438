//! Hero, weapon and upgrade tables
//!
//! Personality is plain data keyed by a tagged enum; nothing here has
//! behavior beyond looking up its definition.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UnknownId;

/// Hero special ability, one per hero
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeroPower {
    /// Melee burst around the player with a dash surge
    Cleave,
    /// Full shield restore with a stasis field
    Bulwark,
    /// Ring of projectiles in every direction
    Nova,
    /// Strike the nearest enemies directly
    Mark,
}

/// Playable heroes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeroId {
    #[default]
    Vanguard,
    Warden,
    Tempest,
    Hunter,
}

/// Hero archetype multipliers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeroDef {
    pub name: &'static str,
    /// Multiplies base move speed
    pub move_scale: f32,
    /// Multiplies base fire interval (lower fires faster)
    pub fire_scale: f32,
    /// Multiplies base shot damage
    pub damage_scale: f32,
    /// Multiplies base dash cooldown
    pub dash_scale: f32,
    pub bonus_shield: u32,
    pub power: HeroPower,
}

impl HeroId {
    pub const ALL: [HeroId; 4] = [
        HeroId::Vanguard,
        HeroId::Warden,
        HeroId::Tempest,
        HeroId::Hunter,
    ];

    pub fn def(self) -> HeroDef {
        match self {
            HeroId::Vanguard => HeroDef {
                name: "Vanguard",
                move_scale: 1.08,
                fire_scale: 1.0,
                damage_scale: 1.1,
                dash_scale: 0.85,
                bonus_shield: 0,
                power: HeroPower::Cleave,
            },
            HeroId::Warden => HeroDef {
                name: "Warden",
                move_scale: 0.94,
                fire_scale: 1.05,
                damage_scale: 1.0,
                dash_scale: 1.0,
                bonus_shield: 1,
                power: HeroPower::Bulwark,
            },
            HeroId::Tempest => HeroDef {
                name: "Tempest",
                move_scale: 1.0,
                fire_scale: 0.9,
                damage_scale: 0.95,
                dash_scale: 1.0,
                bonus_shield: 0,
                power: HeroPower::Nova,
            },
            HeroId::Hunter => HeroDef {
                name: "Hunter",
                move_scale: 1.02,
                fire_scale: 0.95,
                damage_scale: 1.15,
                dash_scale: 1.1,
                bonus_shield: 0,
                power: HeroPower::Mark,
            },
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HeroId::Vanguard => "vanguard",
            HeroId::Warden => "warden",
            HeroId::Tempest => "tempest",
            HeroId::Hunter => "hunter",
        }
    }
}

impl FromStr for HeroId {
    type Err = UnknownId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HeroId::ALL
            .into_iter()
            .find(|h| h.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownId {
                kind: "hero",
                id: s.to_string(),
            })
    }
}

impl fmt::Display for HeroId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.def().name)
    }
}

/// Player weapons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaponId {
    /// Balanced default
    #[default]
    Pulse,
    /// Wide low-damage spread
    Scatter,
    /// Single high-damage piercing shot
    Lance,
}

/// Per-weapon modifiers applied to every volley
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeaponDef {
    pub name: &'static str,
    /// Shots added on top of the build's multi-shot count
    pub extra_shots: u32,
    /// Angle between adjacent shots in a fan (radians)
    pub spread_step: f32,
    pub speed_scale: f32,
    pub ttl_scale: f32,
    pub damage_scale: f32,
    pub radius: f32,
    pub pierce: u32,
}

impl WeaponId {
    pub const ALL: [WeaponId; 3] = [WeaponId::Pulse, WeaponId::Scatter, WeaponId::Lance];

    pub fn def(self) -> WeaponDef {
        match self {
            WeaponId::Pulse => WeaponDef {
                name: "Pulse",
                extra_shots: 0,
                spread_step: 0.16,
                speed_scale: 1.0,
                ttl_scale: 1.0,
                damage_scale: 1.0,
                radius: 4.0,
                pierce: 0,
            },
            WeaponId::Scatter => WeaponDef {
                name: "Scatter",
                extra_shots: 2,
                spread_step: 0.22,
                speed_scale: 0.9,
                ttl_scale: 0.75,
                damage_scale: 0.7,
                radius: 3.5,
                pierce: 0,
            },
            WeaponId::Lance => WeaponDef {
                name: "Lance",
                extra_shots: 0,
                spread_step: 0.08,
                speed_scale: 1.35,
                ttl_scale: 1.2,
                damage_scale: 2.4,
                radius: 5.0,
                pierce: 2,
            },
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            WeaponId::Pulse => "pulse",
            WeaponId::Scatter => "scatter",
            WeaponId::Lance => "lance",
        }
    }
}

impl FromStr for WeaponId {
    type Err = UnknownId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WeaponId::ALL
            .into_iter()
            .find(|w| w.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownId {
                kind: "weapon",
                id: s.to_string(),
            })
    }
}

impl fmt::Display for WeaponId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.def().name)
    }
}

/// In-round upgrades offered on level-up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpgradeId {
    RapidFire,
    HeavyRounds,
    Swift,
    SplitShot,
    QuickDash,
    Magnet,
}

impl UpgradeId {
    pub const ALL: [UpgradeId; 6] = [
        UpgradeId::RapidFire,
        UpgradeId::HeavyRounds,
        UpgradeId::Swift,
        UpgradeId::SplitShot,
        UpgradeId::QuickDash,
        UpgradeId::Magnet,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            UpgradeId::RapidFire => "rapid_fire",
            UpgradeId::HeavyRounds => "heavy_rounds",
            UpgradeId::Swift => "swift",
            UpgradeId::SplitShot => "split_shot",
            UpgradeId::QuickDash => "quick_dash",
            UpgradeId::Magnet => "magnet",
        }
    }

    /// Short label for status messages
    pub fn label(self) -> &'static str {
        match self {
            UpgradeId::RapidFire => "Rapid Fire",
            UpgradeId::HeavyRounds => "Heavy Rounds",
            UpgradeId::Swift => "Swift Boots",
            UpgradeId::SplitShot => "Split Shot",
            UpgradeId::QuickDash => "Quick Dash",
            UpgradeId::Magnet => "Magnet",
        }
    }
}

impl FromStr for UpgradeId {
    type Err = UnknownId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UpgradeId::ALL
            .into_iter()
            .find(|u| u.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownId {
                kind: "upgrade",
                id: s.to_string(),
            })
    }
}
