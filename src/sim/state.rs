//! Round state and core simulation types
//!
//! Everything one life needs lives in [`RoundState`]. It is created fresh
//! for every round and owned exclusively by the simulation loop.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::build::{BuildState, create_build, roll_upgrade_choices};
use super::catalog::{HeroId, UpgradeId, WeaponId};
use crate::consts::*;
use crate::profile::{MetaUpgrades, RoundSummary};

/// Enemy behavior variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Fast, fragile, runs straight at the player
    Runner,
    /// Drifts side to side while closing in
    Zigzag,
    /// Slow and tough
    Brute,
}

impl EnemyKind {
    /// Score for a kill before combo
    pub fn score_value(self) -> f64 {
        match self {
            EnemyKind::Runner => 10.0,
            EnemyKind::Zigzag => 14.0,
            EnemyKind::Brute => 26.0,
        }
    }

    /// Hero power charge for a kill
    pub fn charge_value(self) -> f32 {
        match self {
            EnemyKind::Runner => 3.0,
            EnemyKind::Zigzag => 4.0,
            EnemyKind::Brute => 7.0,
        }
    }

    pub fn orb_xp(self) -> u32 {
        match self {
            EnemyKind::Runner => 4,
            EnemyKind::Zigzag => 6,
            EnemyKind::Brute => 12,
        }
    }

    pub fn orb_score(self) -> f64 {
        match self {
            EnemyKind::Runner => 2.0,
            EnemyKind::Zigzag => 3.0,
            EnemyKind::Brute => 6.0,
        }
    }

    pub fn orb_ttl(self) -> f32 {
        match self {
            EnemyKind::Runner | EnemyKind::Zigzag => 12.0,
            EnemyKind::Brute => 14.0,
        }
    }

    /// Steering speed multiplier applied each tick
    pub fn steer_scale(self) -> f32 {
        match self {
            EnemyKind::Runner => 1.0,
            EnemyKind::Zigzag => 0.95,
            EnemyKind::Brute => 0.9,
        }
    }
}

/// A hostile entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    pub pos: Vec2,
    pub radius: f32,
    /// Base speed in units per second
    pub speed: f32,
    pub hp: f32,
    pub max_hp: f32,
    /// Phase accumulator for lateral drift
    pub wobble: f32,
    /// Lateral drift magnitude (Zigzag only)
    pub drift: f32,
    pub elite: bool,
}

impl Enemy {
    /// Apply damage and report whether the enemy is defeated
    pub fn take_damage(&mut self, damage: f32) -> bool {
        self.hp = (self.hp - damage).min(self.max_hp);
        self.hp <= 0.0
    }
}

/// A player-fired shot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Seconds left before expiry
    pub ttl: f32,
    pub damage: f32,
    pub radius: f32,
    /// Enemies it can still pass through
    pub pierce: u32,
    /// Enemies already struck, never hit twice
    #[serde(default)]
    pub struck: Vec<u32>,
}

/// Experience/score drop
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Orb {
    pub id: u32,
    pub pos: Vec2,
    pub radius: f32,
    pub xp: u32,
    pub score: f64,
    pub ttl: f32,
}

/// Timed buff types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PickupKind {
    /// Restore one shield
    Shield,
    /// Faster fire rate
    Frenzy,
    /// Slower enemies
    Stasis,
}

impl PickupKind {
    pub const ALL: [PickupKind; 3] = [PickupKind::Shield, PickupKind::Frenzy, PickupKind::Stasis];
}

/// A buff pickup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pickup {
    pub id: u32,
    pub kind: PickupKind,
    pub pos: Vec2,
    pub radius: f32,
    pub ttl: f32,
}

/// An active bounty contract
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Contract {
    pub target: u32,
    pub progress: u32,
    pub expires_at: f32,
}

/// Outbound notifications for the host
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// Human-readable status line
    Status(String),
    /// Level-up choice opened; simulation is frozen until one is picked
    UpgradeOffered(Vec<UpgradeId>),
    /// Round finished
    RoundEnded(RoundSummary),
}

/// Continuous input state for a tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Sum of held movement keys, each component in [-1, 1]
    pub axis: Vec2,
    /// Pointer target in arena coordinates; takes precedence over `axis`
    pub pointer: Option<Vec2>,
}

/// Complete state of one round
#[derive(Debug, Clone)]
pub struct RoundState {
    pub seed: u64,
    pub rng: Pcg32,
    pub hero: HeroId,
    pub weapon: WeaponId,
    pub build: BuildState,
    /// Upgrades taken this round, in order
    pub upgrades: Vec<UpgradeId>,
    /// Arena width and height
    pub arena: Vec2,

    pub player_pos: Vec2,
    pub player_radius: f32,
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    pub orbs: Vec<Orb>,
    pub pickups: Vec<Pickup>,

    pub elapsed: f32,
    pub score: f64,
    pub spawn_clock: f32,
    pub kills: u32,
    pub spawned: u32,

    pub level: u32,
    pub xp: u32,
    pub xp_to_next: u32,

    pub combo: u32,
    pub combo_expire_at: f32,
    pub best_combo: u32,

    pub last_shot_at: f32,
    pub dash_ready_at: f32,
    pub dash_active_until: f32,
    pub dash_dir: Vec2,
    /// Last non-zero movement direction, used when dashing while idle
    pub last_move_dir: Vec2,
    pub invulnerable_until: f32,

    /// Hero power charge, 0 to 100
    pub charge: f32,
    /// Passive charge multiplier from the reactor meta-upgrade
    pub charge_rate: f32,
    pub frenzy_until: f32,
    pub stasis_until: f32,

    pub next_elite_at: f32,
    pub contract: Option<Contract>,
    pub next_contract_at: f32,

    /// Open level-up choice; the simulation is frozen while set
    pub upgrade_choice: Option<Vec<UpgradeId>>,
    /// Further level-ups waiting for a choice
    pub queued_choices: u32,

    /// Notifications not yet drained by the host
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl RoundState {
    /// Create a fresh round in the default arena
    pub fn new(seed: u64, hero: HeroId, weapon: WeaponId, meta: &MetaUpgrades) -> Self {
        let arena = Vec2::new(ARENA_WIDTH, ARENA_HEIGHT);
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            hero,
            weapon,
            build: create_build(hero, meta),
            upgrades: Vec::new(),
            arena,
            player_pos: arena * 0.5,
            player_radius: PLAYER_RADIUS,
            enemies: Vec::new(),
            projectiles: Vec::new(),
            orbs: Vec::new(),
            pickups: Vec::new(),
            elapsed: 0.0,
            score: 0.0,
            spawn_clock: 0.0,
            kills: 0,
            spawned: 0,
            level: 1,
            xp: 0,
            xp_to_next: START_XP_TO_NEXT,
            combo: 1,
            combo_expire_at: 0.0,
            best_combo: 1,
            last_shot_at: 0.0,
            dash_ready_at: 0.0,
            dash_active_until: 0.0,
            dash_dir: Vec2::X,
            last_move_dir: Vec2::X,
            invulnerable_until: 0.0,
            charge: 0.0,
            charge_rate: meta.reactor_multiplier(),
            frenzy_until: 0.0,
            stasis_until: 0.0,
            next_elite_at: ELITE_FIRST_AT,
            contract: None,
            next_contract_at: CONTRACT_FIRST_OFFER_AT,
            upgrade_choice: None,
            queued_choices: 0,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Resize the arena and recenter the player
    pub fn with_arena(mut self, width: f32, height: f32) -> Self {
        self.arena = Vec2::new(width.max(2.0 * ARENA_MARGIN), height.max(2.0 * ARENA_MARGIN));
        self.player_pos = self.arena * 0.5;
        self
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn is_invulnerable(&self) -> bool {
        self.elapsed < self.invulnerable_until
    }

    pub fn dash_active(&self) -> bool {
        self.elapsed < self.dash_active_until
    }

    pub fn frenzy_active(&self) -> bool {
        self.elapsed < self.frenzy_until
    }

    pub fn stasis_active(&self) -> bool {
        self.elapsed < self.stasis_until
    }

    /// Fire interval after buffs
    pub fn effective_fire_interval(&self) -> f32 {
        if self.frenzy_active() {
            self.build.fire_interval * FRENZY_FIRE_SCALE
        } else {
            self.build.fire_interval
        }
    }

    /// True while the simulation must not advance
    pub fn is_frozen(&self) -> bool {
        self.upgrade_choice.is_some()
    }

    /// Add hero power charge, capped at `MAX_CHARGE`
    pub fn add_charge(&mut self, amount: f32) {
        self.charge = (self.charge + amount).clamp(0.0, MAX_CHARGE);
    }

    /// Extend a buff window: refresh from now, stacking at most two durations
    pub fn extend_window(until: f32, now: f32, duration: f32) -> f32 {
        (until.max(now) + duration).min(now + duration * 2.0)
    }

    /// Start a dash if off cooldown. Returns false when not ready.
    pub fn try_dash(&mut self, input: &TickInput) -> bool {
        if self.elapsed < self.dash_ready_at {
            return false;
        }
        let dir = super::tick::desired_direction(self.player_pos, input);
        self.dash_dir = if dir == Vec2::ZERO { self.last_move_dir } else { dir };
        self.dash_active_until = self.elapsed + DASH_DURATION;
        self.dash_ready_at = self.elapsed + self.build.dash_cooldown;
        true
    }

    /// Queue a status line for the host
    pub fn status(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::info!("{}", message);
        self.events.push(GameEvent::Status(message));
    }

    /// Open the next level-up choice if none is showing
    pub fn offer_next_choice(&mut self) {
        while self.upgrade_choice.is_none() && self.queued_choices > 0 {
            self.queued_choices -= 1;
            let choices = roll_upgrade_choices(&mut self.rng, &self.upgrades);
            if choices.is_empty() {
                // Nothing left to offer this round
                self.queued_choices = 0;
                return;
            }
            self.events.push(GameEvent::UpgradeOffered(choices.clone()));
            self.upgrade_choice = Some(choices);
        }
    }

    /// Score the way it is reported, floored
    pub fn display_score(&self) -> u64 {
        self.score.max(0.0).floor() as u64
    }
}
