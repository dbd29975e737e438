//! Hero power resolver
//!
//! A cast is split in two: [`resolve_power`] looks at the round and decides
//! what the power does without touching anything, and
//! [`apply_power_outcome`] carries that out. Kills go through the regular
//! defeat handler so combo, drops and contracts all count them.

use glam::Vec2;

use super::catalog::HeroPower;
use super::collision::nearest_enemies;
use super::spawn::{add_enemy, add_projectile, on_enemy_defeated};
use super::state::RoundState;
use crate::consts::*;
use crate::rotate;

const CLEAVE_RADIUS: f32 = 150.0;
const CLEAVE_DAMAGE: f32 = 4.0;
const CLEAVE_DASH: f32 = 0.35;
const CLEAVE_INVULNERABLE: f32 = 0.6;
const CLEAVE_FRENZY: f32 = 3.0;

const BULWARK_INVULNERABLE: f32 = 1.5;
const BULWARK_STASIS: f32 = 4.0;

const NOVA_SHOTS: u32 = 18;
const NOVA_FRENZY: f32 = 4.0;
const NOVA_DAMAGE_SCALE: f32 = 1.2;

const MARK_TARGETS: usize = 6;
const MARK_STASIS: f32 = 3.0;
/// Share of an elite's max hp dealt by a mark
const MARK_ELITE_FRACTION: f32 = 0.5;

/// Damage dealt to one enemy by a power
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerHit {
    pub enemy_id: u32,
    pub damage: f32,
}

/// A projectile a power wants to create
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerShot {
    pub vel: Vec2,
    pub ttl: f32,
    pub damage: f32,
    pub radius: f32,
    pub pierce: u32,
}

/// Everything a cast does, before it is applied
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PowerOutcome {
    pub hits: Vec<PowerHit>,
    /// Fired from the player's position
    pub shots: Vec<PowerShot>,
    pub restore_shield: bool,
    pub invulnerable_for: f32,
    pub dash_for: f32,
    pub frenzy_for: f32,
    pub stasis_for: f32,
}

/// Decide what `power` does in the current round
pub fn resolve_power(power: HeroPower, round: &RoundState) -> PowerOutcome {
    match power {
        HeroPower::Cleave => PowerOutcome {
            hits: round
                .enemies
                .iter()
                .filter(|e| e.pos.distance(round.player_pos) <= CLEAVE_RADIUS + e.radius)
                .map(|e| PowerHit {
                    enemy_id: e.id,
                    damage: CLEAVE_DAMAGE,
                })
                .collect(),
            invulnerable_for: CLEAVE_INVULNERABLE,
            dash_for: CLEAVE_DASH,
            frenzy_for: CLEAVE_FRENZY,
            ..Default::default()
        },
        HeroPower::Bulwark => PowerOutcome {
            restore_shield: true,
            invulnerable_for: BULWARK_INVULNERABLE,
            stasis_for: BULWARK_STASIS,
            ..Default::default()
        },
        HeroPower::Nova => {
            let step = std::f32::consts::TAU / NOVA_SHOTS as f32;
            let shots = (0..NOVA_SHOTS)
                .map(|i| PowerShot {
                    vel: rotate(Vec2::X, i as f32 * step) * PROJECTILE_SPEED,
                    ttl: PROJECTILE_TTL,
                    damage: round.build.damage * NOVA_DAMAGE_SCALE,
                    radius: 5.0,
                    pierce: 1,
                })
                .collect();
            PowerOutcome {
                shots,
                frenzy_for: NOVA_FRENZY,
                ..Default::default()
            }
        }
        HeroPower::Mark => PowerOutcome {
            hits: nearest_enemies(&round.enemies, round.player_pos, MARK_TARGETS)
                .into_iter()
                .map(|i| {
                    let e = &round.enemies[i];
                    let damage = if e.elite {
                        e.max_hp * MARK_ELITE_FRACTION
                    } else {
                        e.hp
                    };
                    PowerHit {
                        enemy_id: e.id,
                        damage,
                    }
                })
                .collect(),
            stasis_for: MARK_STASIS,
            ..Default::default()
        },
    }
}

/// Carry out a resolved power. Returns the number of enemies it defeated.
pub fn apply_power_outcome(round: &mut RoundState, outcome: &PowerOutcome) -> u32 {
    let mut defeated = 0;
    for hit in &outcome.hits {
        let Some(idx) = round.enemies.iter().position(|e| e.id == hit.enemy_id) else {
            continue;
        };
        if round.enemies[idx].take_damage(hit.damage) {
            let enemy = round.enemies.remove(idx);
            on_enemy_defeated(round, &enemy);
            defeated += 1;
        }
    }

    let origin = round.player_pos;
    for shot in &outcome.shots {
        add_projectile(
            round,
            origin,
            shot.vel,
            shot.ttl,
            shot.damage,
            shot.radius,
            shot.pierce,
        );
    }

    if outcome.restore_shield {
        round.build.shield = round.build.max_shield;
    }

    let now = round.elapsed;
    if outcome.invulnerable_for > 0.0 {
        round.invulnerable_until = round.invulnerable_until.max(now + outcome.invulnerable_for);
    }
    if outcome.dash_for > 0.0 {
        round.dash_dir = round.last_move_dir;
        round.dash_active_until = round.dash_active_until.max(now + outcome.dash_for);
    }
    if outcome.frenzy_for > 0.0 {
        round.frenzy_until = RoundState::extend_window(round.frenzy_until, now, outcome.frenzy_for);
    }
    if outcome.stasis_for > 0.0 {
        round.stasis_until = RoundState::extend_window(round.stasis_until, now, outcome.stasis_for);
    }
    defeated
}

/// Cast the hero's power if fully charged. Resets charge and brings in an
/// elite in response. Returns false if the meter was not full.
pub fn cast_hero_power(round: &mut RoundState) -> bool {
    if round.charge < MAX_CHARGE {
        return false;
    }
    let power = round.hero.def().power;
    let outcome = resolve_power(power, round);
    let defeated = apply_power_outcome(round, &outcome);
    round.charge = 0.0;
    add_enemy(round, true);
    round.status(format!("{:?} unleashed ({} defeated)", power, defeated));
    true
}
