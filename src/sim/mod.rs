//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay host-agnostic:
//! - Time only advances through [`tick`]
//! - Seeded RNG only, owned by the round
//! - Reverse iteration wherever entities are removed
//! - No rendering, input or persistence dependencies

pub mod build;
pub mod catalog;
pub mod collision;
pub mod power;
pub mod spawn;
pub mod state;
pub mod tick;

pub use build::{BuildState, apply_upgrade, create_build, roll_upgrade_choices};
pub use catalog::{HeroDef, HeroId, HeroPower, UpgradeId, WeaponDef, WeaponId};
pub use power::{PowerOutcome, cast_hero_power, resolve_power};
pub use spawn::{spawn_delay, spawn_enemy};
pub use state::{
    Contract, Enemy, EnemyKind, GameEvent, Orb, Pickup, PickupKind, Projectile, RoundState,
    TickInput,
};
pub use tick::{TickOutcome, desired_direction, tick};
