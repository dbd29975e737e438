//! Entity factories
//!
//! Enemy spawning follows a difficulty curve driven by elapsed round time.
//! Volleys, orbs and pickups are built here too, along with the kill
//! bookkeeping that ties them together.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use super::collision::nearest_enemy;
use super::state::{Contract, Enemy, EnemyKind, Orb, Pickup, PickupKind, Projectile, RoundState};
use crate::consts::*;
use crate::{direction_to, rand_range, rotate};

/// Base speed gained per second of elapsed time
const SPEED_RAMP: f32 = 0.35;

/// Chance a regular spawn is elite
pub fn elite_chance(elapsed: f32) -> f32 {
    if elapsed > 65.0 {
        (0.07 + (elapsed - 65.0) * 0.0006).min(0.18)
    } else {
        0.0
    }
}

fn brute_chance(elapsed: f32) -> f32 {
    if elapsed > 50.0 {
        (0.12 + (elapsed - 50.0) * 0.002).min(0.3)
    } else {
        0.0
    }
}

fn zigzag_chance(elapsed: f32) -> f32 {
    if elapsed > 20.0 {
        (0.18 + (elapsed - 20.0) * 0.003).min(0.38)
    } else {
        0.0
    }
}

/// Seconds between regular spawns at `elapsed`
pub fn spawn_delay(elapsed: f32) -> f32 {
    (SPAWN_DELAY_MAX - elapsed.max(0.0) * SPAWN_DELAY_RAMP).clamp(SPAWN_DELAY_MIN, SPAWN_DELAY_MAX)
}

/// Uniform point on one of the four edges, just outside the arena
fn edge_spawn_point<R: Rng + ?Sized>(rng: &mut R, arena: Vec2) -> Vec2 {
    match rng.random_range(0..4) {
        0 => Vec2::new(rand_range(rng, 0.0, arena.x), -SPAWN_PADDING),
        1 => Vec2::new(arena.x + SPAWN_PADDING, rand_range(rng, 0.0, arena.y)),
        2 => Vec2::new(rand_range(rng, 0.0, arena.x), arena.y + SPAWN_PADDING),
        _ => Vec2::new(-SPAWN_PADDING, rand_range(rng, 0.0, arena.y)),
    }
}

/// Build an enemy for the current point in the round
pub fn spawn_enemy<R: Rng + ?Sized>(
    rng: &mut R,
    arena: Vec2,
    elapsed: f32,
    force_elite: bool,
    id: u32,
) -> Enemy {
    let pos = edge_spawn_point(rng, arena);
    let elite = force_elite || rng.random::<f32>() < elite_chance(elapsed);

    let roll: f32 = rng.random();
    let brute = brute_chance(elapsed);
    let kind = if roll < brute {
        EnemyKind::Brute
    } else if roll < brute + zigzag_chance(elapsed) {
        EnemyKind::Zigzag
    } else {
        EnemyKind::Runner
    };

    let (mut radius, mut speed, mut hp, drift) = match kind {
        EnemyKind::Runner => (
            rand_range(rng, 11.0, 14.0),
            rand_range(rng, 78.0, 96.0),
            if rng.random_bool(0.35) { 2.0 } else { 1.0 },
            0.0,
        ),
        EnemyKind::Zigzag => (
            rand_range(rng, 12.0, 15.0),
            rand_range(rng, 70.0, 84.0),
            2.0,
            rand_range(rng, 40.0, 70.0),
        ),
        EnemyKind::Brute => (
            rand_range(rng, 20.0, 25.0),
            rand_range(rng, 46.0, 56.0),
            rng.random_range(5..=6) as f32,
            0.0,
        ),
    };
    speed += elapsed.max(0.0) * SPEED_RAMP;

    if elite {
        radius *= ELITE_RADIUS_SCALE;
        speed *= ELITE_SPEED_SCALE;
        hp = if kind == EnemyKind::Brute { hp * 2.0 } else { hp + 2.0 };
    }

    Enemy {
        id,
        kind,
        pos,
        radius,
        speed,
        hp,
        max_hp: hp,
        wobble: rand_range(rng, 0.0, TAU),
        drift,
        elite,
    }
}

/// Spawn an enemy into the round, evicting the oldest past the cap
pub fn add_enemy(round: &mut RoundState, force_elite: bool) {
    let id = round.next_entity_id();
    let enemy = spawn_enemy(&mut round.rng, round.arena, round.elapsed, force_elite, id);
    log::debug!(
        "Spawned {:?}{} #{} hp={} at {:?}",
        enemy.kind,
        if enemy.elite { " (elite)" } else { "" },
        enemy.id,
        enemy.hp,
        enemy.pos
    );
    round.enemies.push(enemy);
    round.spawned += 1;

    if round.enemies.len() > MAX_ENEMIES {
        let excess = round.enemies.len() - MAX_ENEMIES;
        round.enemies.drain(..excess);
        log::debug!("Enemy cap reached, evicted {}", excess);
    }
}

/// Add a projectile, evicting the oldest past the cap
pub fn add_projectile(
    round: &mut RoundState,
    pos: Vec2,
    vel: Vec2,
    ttl: f32,
    damage: f32,
    radius: f32,
    pierce: u32,
) {
    let id = round.next_entity_id();
    round.projectiles.push(Projectile {
        id,
        pos,
        vel,
        ttl,
        damage,
        radius,
        pierce,
        struck: Vec::new(),
    });
    if round.projectiles.len() > MAX_PROJECTILES {
        let excess = round.projectiles.len() - MAX_PROJECTILES;
        round.projectiles.drain(..excess);
    }
}

/// Fire one volley at the nearest enemy. Returns the number of shots fired.
pub fn fire_volley(round: &mut RoundState) -> u32 {
    let Some(target) = nearest_enemy(&round.enemies, round.player_pos) else {
        return 0;
    };
    let mut aim = direction_to(round.player_pos, round.enemies[target].pos);
    if aim == Vec2::ZERO {
        aim = round.last_move_dir;
    }

    let weapon = round.weapon.def();
    let shots = round.build.multi_shot + weapon.extra_shots;
    let speed = PROJECTILE_SPEED * weapon.speed_scale;
    let ttl = PROJECTILE_TTL * weapon.ttl_scale;
    let damage = round.build.damage * weapon.damage_scale;
    let center = (shots as f32 - 1.0) / 2.0;
    let origin = round.player_pos;

    for i in 0..shots {
        let offset = if shots == 1 {
            0.0
        } else {
            (i as f32 - center) * weapon.spread_step
        };
        let dir = rotate(aim, offset);
        add_projectile(
            round,
            origin,
            dir * speed,
            ttl,
            damage,
            weapon.radius,
            weapon.pierce,
        );
    }
    shots
}

/// Score multiplier for a combo count
pub fn combo_multiplier(combo: u32) -> f64 {
    1.0 + COMBO_SCORE_STEP * (combo.max(1) - 1) as f64
}

/// Count a kill toward the active contract, paying it out on the kill
/// that reaches the target
fn advance_contract(round: &mut RoundState) {
    let Some(Contract { target, progress, .. }) = round.contract.as_mut() else {
        return;
    };
    *progress = (*progress + 1).min(*target);
    if *progress < *target {
        return;
    }

    let bonus = 120.0 + 40.0 * round.level as f64;
    round.score += bonus;
    round.build.restore_shield(1);
    round.add_charge(CONTRACT_CHARGE_BONUS);
    round.contract = None;
    round.status(format!("Bounty complete! +{:.0}", bonus));
}

/// Bookkeeping for a defeated enemy: combo, score, charge, drops and
/// contract progress. The enemy must already be removed from the round.
pub fn on_enemy_defeated(round: &mut RoundState, enemy: &Enemy) {
    round.combo = if round.elapsed <= round.combo_expire_at {
        (round.combo + 1).min(MAX_COMBO)
    } else {
        1
    };
    round.combo_expire_at = round.elapsed + COMBO_WINDOW;
    round.best_combo = round.best_combo.max(round.combo);
    round.kills += 1;

    let elite_scale = if enemy.elite { 3.0 } else { 1.0 };
    round.score += enemy.kind.score_value() * elite_scale * combo_multiplier(round.combo);
    round.add_charge(enemy.kind.charge_value() + if enemy.elite { 10.0 } else { 0.0 });

    let orb_id = round.next_entity_id();
    round.orbs.push(Orb {
        id: orb_id,
        pos: enemy.pos,
        radius: if enemy.elite { 9.0 } else { 6.0 },
        xp: enemy.kind.orb_xp() * if enemy.elite { 3 } else { 1 },
        score: enemy.kind.orb_score() * elite_scale,
        ttl: enemy.kind.orb_ttl(),
    });

    advance_contract(round);

    let drop_chance = if enemy.elite {
        ELITE_PICKUP_CHANCE
    } else {
        PICKUP_CHANCE
    };
    if round.rng.random::<f32>() < drop_chance {
        let kind = PickupKind::ALL[round.rng.random_range(0..PickupKind::ALL.len())];
        let id = round.next_entity_id();
        round.pickups.push(Pickup {
            id,
            kind,
            pos: enemy.pos,
            radius: PICKUP_RADIUS,
            ttl: PICKUP_TTL,
        });
    }

    if enemy.elite {
        round.status(format!("Elite {:?} down!", enemy.kind));
    }
}
