//! Arena Survivor - real-time arena survival simulation core
//!
//! Core modules:
//! - `sim`: Per-frame simulation (spawning, targeting, collisions, progression)
//! - `session`: Round lifecycle and the inbound command surface
//! - `profile`: Profile snapshot consumed at round start, summary emitted at round end
//! - `settings`: Runtime configuration

pub mod error;
pub mod profile;
pub mod session;
pub mod settings;
pub mod sim;

pub use error::{SessionError, SettingsError, UnknownId};
pub use profile::{ProfileSnapshot, RoundSummary};
pub use session::{Command, GamePhase, Session};
pub use settings::Settings;

use glam::Vec2;
use rand::Rng;

/// Game configuration constants
pub mod consts {
    /// Upper bound on a single frame's delta-time
    pub const MAX_FRAME_DT: f32 = 0.05;

    /// Default arena dimensions
    pub const ARENA_WIDTH: f32 = 960.0;
    pub const ARENA_HEIGHT: f32 = 600.0;
    /// Player stays this far inside the arena edges
    pub const ARENA_MARGIN: f32 = 18.0;
    /// Enemies appear this far outside the arena edges
    pub const SPAWN_PADDING: f32 = 24.0;
    /// Projectiles are culled this far outside the arena edges
    pub const PROJECTILE_CULL_MARGIN: f32 = 40.0;

    /// Player defaults
    pub const PLAYER_RADIUS: f32 = 14.0;
    pub const PLAYER_SPEED: f32 = 230.0;
    /// Pointer closer than this to the player produces no movement
    pub const POINTER_DEADZONE: f32 = 6.0;

    /// Dash
    pub const DASH_DURATION: f32 = 0.16;
    pub const DASH_SPEED_MULTIPLIER: f32 = 3.2;

    /// Invulnerability granted when a shield absorbs a hit
    pub const HIT_INVULNERABILITY: f32 = 1.0;

    /// Build defaults
    pub const BASE_FIRE_INTERVAL: f32 = 0.5;
    pub const BASE_SHOT_DAMAGE: f32 = 1.0;
    pub const BASE_DASH_COOLDOWN: f32 = 3.4;
    pub const BASE_PICKUP_RADIUS: f32 = 70.0;
    pub const MIN_FIRE_INTERVAL: f32 = 0.14;
    pub const MAX_MOVE_SPEED: f32 = 1.9;
    pub const MAX_MULTI_SHOT: u32 = 4;
    pub const MIN_DASH_COOLDOWN: f32 = 2.1;
    pub const MAX_PICKUP_RADIUS: f32 = 240.0;

    /// Projectiles
    pub const PROJECTILE_SPEED: f32 = 520.0;
    pub const PROJECTILE_TTL: f32 = 1.1;
    pub const MAX_PROJECTILES: usize = 180;
    /// Damage never drops below this after piercing
    pub const MIN_PIERCE_DAMAGE: f32 = 0.5;

    /// Enemies
    pub const MAX_ENEMIES: usize = 95;
    pub const SPAWN_DELAY_MAX: f32 = 1.14;
    pub const SPAWN_DELAY_MIN: f32 = 0.30;
    /// Spawn delay shrinks by this many seconds per elapsed second
    pub const SPAWN_DELAY_RAMP: f32 = 0.0105;
    pub const ELITE_FIRST_AT: f32 = 45.0;
    pub const ELITE_RADIUS_SCALE: f32 = 1.65;
    pub const ELITE_SPEED_SCALE: f32 = 1.08;

    /// Combo
    pub const COMBO_WINDOW: f32 = 2.2;
    pub const MAX_COMBO: u32 = 9;
    pub const COMBO_SCORE_STEP: f64 = 0.15;

    /// Hero power
    pub const MAX_CHARGE: f32 = 100.0;
    pub const CHARGE_PER_SECOND: f32 = 1.6;

    /// Continuous score per second per level
    pub const IDLE_SCORE_RATE: f64 = 0.6;

    /// Leveling
    pub const START_XP_TO_NEXT: u32 = 30;
    pub const XP_GROWTH: f32 = 1.22;
    pub const XP_GROWTH_FLAT: f32 = 16.0;
    pub const UPGRADE_CHOICES: usize = 3;

    /// Orbs
    pub const ORB_MAGNET_FACTOR: f32 = 3.0;
    pub const ORB_MIN_PULL: f32 = 60.0;
    pub const ORB_MAX_PULL: f32 = 280.0;

    /// Pickups
    pub const PICKUP_RADIUS: f32 = 10.0;
    pub const PICKUP_TTL: f32 = 10.0;
    pub const PICKUP_CHANCE: f32 = 0.045;
    pub const ELITE_PICKUP_CHANCE: f32 = 0.35;
    pub const FRENZY_DURATION: f32 = 6.0;
    pub const STASIS_DURATION: f32 = 5.0;
    /// Fire interval multiplier while frenzy is active
    pub const FRENZY_FIRE_SCALE: f32 = 0.55;
    /// Enemy speed multiplier while stasis is active
    pub const STASIS_SPEED_SCALE: f32 = 0.45;

    /// Bounty contracts
    pub const CONTRACT_FIRST_OFFER_AT: f32 = 12.0;
    pub const CONTRACT_CHARGE_BONUS: f32 = 18.0;

    /// Reward payout
    pub const REWARD_CAP: u32 = 600;
}

/// Rotate a vector by `angle` radians
#[inline]
pub fn rotate(v: Vec2, angle: f32) -> Vec2 {
    Vec2::from_angle(angle).rotate(v)
}

/// Unit vector from `from` toward `to`, zero if they coincide
#[inline]
pub fn direction_to(from: Vec2, to: Vec2) -> Vec2 {
    (to - from).normalize_or_zero()
}

/// Clamp a position inside a `width` x `height` arena, `margin` from every edge
#[inline]
pub fn clamp_to_arena(pos: Vec2, width: f32, height: f32, margin: f32) -> Vec2 {
    Vec2::new(
        pos.x.clamp(margin, (width - margin).max(margin)),
        pos.y.clamp(margin, (height - margin).max(margin)),
    )
}

/// Uniform sample in `[min, max)`; returns `min` for an empty range
#[inline]
pub fn rand_range<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    if max <= min {
        return min;
    }
    rng.random_range(min..max)
}
