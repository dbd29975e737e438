//! Per-frame simulation step
//!
//! Advances a round by one rendered frame. Phases run in a fixed order:
//! clocks, contracts, elite timer, spawning, player movement, auto-fire,
//! enemies, projectiles, orbs, pickups, combo expiry and leveling.
//! Collections are walked in reverse wherever entries are removed.

use glam::Vec2;
use rand::Rng;

use super::collision::{circles_overlap, out_of_bounds};
use super::spawn::{add_enemy, fire_volley, on_enemy_defeated, spawn_delay};
use super::state::{Contract, EnemyKind, PickupKind, RoundState, TickInput};
use crate::consts::*;
use crate::{clamp_to_arena, direction_to, rand_range};

/// Zigzag phase advance in radians per second
const ZIGZAG_FREQUENCY: f32 = 4.2;
/// Enemy steering speed gained per elapsed second (fraction of base)
const ENEMY_SPEED_RAMP: f32 = 0.0016;

/// Result of one step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Round advanced normally
    Running,
    /// An upgrade choice is open; nothing advanced
    Frozen,
    /// Player took an unshielded hit; the round is over
    Fatal,
}

/// Unit movement direction from input. An active pointer wins over the
/// keyboard axis.
pub fn desired_direction(player: Vec2, input: &TickInput) -> Vec2 {
    if let Some(target) = input.pointer {
        let to_target = target - player;
        if to_target.length() <= POINTER_DEADZONE {
            return Vec2::ZERO;
        }
        return to_target.normalize_or_zero();
    }
    input.axis.normalize_or_zero()
}

/// Advance the round by `dt` seconds
pub fn tick(round: &mut RoundState, input: &TickInput, dt: f32) -> TickOutcome {
    if round.is_frozen() {
        return TickOutcome::Frozen;
    }
    let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };

    advance_clocks(round, dt);
    update_contract(round);
    update_elite_timer(round);
    update_spawning(round);
    move_player(round, input, dt);
    auto_fire(round, dt);
    if update_enemies(round, dt) {
        return TickOutcome::Fatal;
    }
    update_projectiles(round, dt);
    update_orbs(round, dt);
    update_pickups(round, dt);
    expire_combo(round);
    update_leveling(round);

    TickOutcome::Running
}

fn advance_clocks(round: &mut RoundState, dt: f32) {
    round.elapsed += dt;
    round.spawn_clock += dt;
    round.add_charge(CHARGE_PER_SECOND * round.charge_rate * dt);
    round.score += dt as f64
        * IDLE_SCORE_RATE
        * round.level as f64
        * (1.0 + round.elapsed as f64 / 60.0);
}

/// Offer and expiry only; completion is paid on the kill that reaches
/// the target
fn update_contract(round: &mut RoundState) {
    let now = round.elapsed;
    let contract = round.contract;
    match contract {
        None => {
            if now >= round.next_contract_at {
                let target = round.rng.random_range(8..=13);
                let duration = rand_range(&mut round.rng, 17.0, 21.0);
                round.contract = Some(Contract {
                    target,
                    progress: 0,
                    expires_at: now + duration,
                });
                round.next_contract_at = now + rand_range(&mut round.rng, 30.0, 42.0);
                round.status(format!("Bounty: defeat {} enemies in {:.0}s", target, duration));
            }
        }
        Some(contract) if now > contract.expires_at => {
            round.contract = None;
            round.status("Bounty expired");
        }
        Some(_) => {}
    }
}

fn update_elite_timer(round: &mut RoundState) {
    if round.elapsed < round.next_elite_at {
        return;
    }
    add_enemy(round, true);
    round.next_elite_at = round.elapsed + rand_range(&mut round.rng, 30.0, 38.0);
    round.status("An elite approaches");
}

fn update_spawning(round: &mut RoundState) {
    if round.spawn_clock > spawn_delay(round.elapsed) {
        add_enemy(round, false);
        round.spawn_clock = 0.0;
    }
}

fn move_player(round: &mut RoundState, input: &TickInput, dt: f32) {
    let dir = desired_direction(round.player_pos, input);
    if dir != Vec2::ZERO {
        round.last_move_dir = dir;
    }

    let speed = PLAYER_SPEED * round.build.move_speed;
    let velocity = if round.dash_active() {
        round.dash_dir * speed * DASH_SPEED_MULTIPLIER
    } else {
        dir * speed
    };

    round.player_pos = clamp_to_arena(
        round.player_pos + velocity * dt,
        round.arena.x,
        round.arena.y,
        ARENA_MARGIN,
    );
}

/// Fires only when time advances, so a zero-length step never shoots
fn auto_fire(round: &mut RoundState, dt: f32) {
    if dt <= 0.0 || round.enemies.is_empty() {
        return;
    }
    if round.elapsed - round.last_shot_at >= round.effective_fire_interval()
        && fire_volley(round) > 0
    {
        round.last_shot_at = round.elapsed;
    }
}

/// Steer enemies and resolve player contact. Returns true on a fatal hit.
fn update_enemies(round: &mut RoundState, dt: f32) -> bool {
    let stasis = if round.stasis_active() {
        STASIS_SPEED_SCALE
    } else {
        1.0
    };
    let ramp = 1.0 + round.elapsed * ENEMY_SPEED_RAMP;
    let player = round.player_pos;
    let player_radius = round.player_radius;

    for i in (0..round.enemies.len()).rev() {
        let touching = {
            let enemy = &mut round.enemies[i];
            let heading = direction_to(enemy.pos, player);
            let speed = enemy.speed * enemy.kind.steer_scale() * stasis * ramp;
            let mut step = heading * speed * dt;
            if enemy.kind == EnemyKind::Zigzag {
                enemy.wobble += ZIGZAG_FREQUENCY * dt;
                let lateral = heading.perp();
                step += lateral * enemy.wobble.cos() * enemy.drift * dt;
            }
            enemy.pos += step;
            circles_overlap(enemy.pos, enemy.radius, player, player_radius)
        };

        if !touching || round.is_invulnerable() {
            continue;
        }
        if !round.build.consume_shield() {
            log::info!("Fatal hit at {:.1}s", round.elapsed);
            return true;
        }
        round.invulnerable_until = round.elapsed + HIT_INVULNERABILITY;
        round.enemies.remove(i);
        round.status(format!("Shield broke! {} left", round.build.shield));
    }
    false
}

fn update_projectiles(round: &mut RoundState, dt: f32) {
    for i in (0..round.projectiles.len()).rev() {
        let expired = {
            let shot = &mut round.projectiles[i];
            shot.pos += shot.vel * dt;
            shot.ttl -= dt;
            shot.ttl <= 0.0 || out_of_bounds(shot.pos, round.arena, PROJECTILE_CULL_MARGIN)
        };
        if expired {
            round.projectiles.remove(i);
            continue;
        }

        // Resolve every fresh enemy this shot overlaps until it is spent
        loop {
            let shot = &round.projectiles[i];
            let Some(target) = round.enemies.iter().position(|e| {
                !shot.struck.contains(&e.id)
                    && circles_overlap(shot.pos, shot.radius, e.pos, e.radius)
            }) else {
                break;
            };

            let damage = shot.damage;
            let enemy_id = round.enemies[target].id;
            if round.enemies[target].take_damage(damage) {
                let enemy = round.enemies.remove(target);
                on_enemy_defeated(round, &enemy);
            }

            let shot = &mut round.projectiles[i];
            if shot.pierce == 0 {
                round.projectiles.remove(i);
                break;
            }
            shot.pierce -= 1;
            shot.damage = (shot.damage - 1.0).max(MIN_PIERCE_DAMAGE);
            shot.struck.push(enemy_id);
        }
    }
}

fn update_orbs(round: &mut RoundState, dt: f32) {
    let player = round.player_pos;
    let reach = round.build.pickup_radius;
    let magnet_reach = reach * ORB_MAGNET_FACTOR;

    for i in (0..round.orbs.len()).rev() {
        let collected = {
            let orb = &mut round.orbs[i];
            orb.ttl -= dt;
            if orb.ttl <= 0.0 {
                round.orbs.remove(i);
                continue;
            }

            let distance = orb.pos.distance(player);
            if distance > reach && distance <= magnet_reach {
                let pull = (ORB_MAX_PULL * (1.0 - distance / magnet_reach))
                    .clamp(ORB_MIN_PULL, ORB_MAX_PULL);
                orb.pos += direction_to(orb.pos, player) * pull * dt;
            }
            orb.pos.distance(player) <= reach
        };

        if collected {
            let orb = round.orbs.remove(i);
            round.xp += orb.xp;
            round.score += orb.score;
        }
    }
}

fn update_pickups(round: &mut RoundState, dt: f32) {
    let player = round.player_pos;
    let player_radius = round.player_radius;

    for i in (0..round.pickups.len()).rev() {
        let pickup = &mut round.pickups[i];
        pickup.ttl -= dt;
        if pickup.ttl <= 0.0 {
            round.pickups.remove(i);
            continue;
        }
        if !circles_overlap(pickup.pos, pickup.radius, player, player_radius) {
            continue;
        }

        let pickup = round.pickups.remove(i);
        let now = round.elapsed;
        match pickup.kind {
            PickupKind::Shield => {
                round.build.restore_shield(1);
                round.status("Shield restored");
            }
            PickupKind::Frenzy => {
                round.frenzy_until = RoundState::extend_window(round.frenzy_until, now, FRENZY_DURATION);
                round.status("Frenzy!");
            }
            PickupKind::Stasis => {
                round.stasis_until = RoundState::extend_window(round.stasis_until, now, STASIS_DURATION);
                round.status("Stasis field");
            }
        }
    }
}

fn expire_combo(round: &mut RoundState) {
    if round.elapsed > round.combo_expire_at {
        round.combo = 1;
    }
}

fn update_leveling(round: &mut RoundState) {
    let mut gained = 0;
    while round.xp >= round.xp_to_next {
        round.xp -= round.xp_to_next;
        round.level += 1;
        round.xp_to_next = (round.xp_to_next as f32 * XP_GROWTH + XP_GROWTH_FLAT).floor() as u32;
        gained += 1;
    }
    if gained > 0 {
        round.queued_choices += gained;
        round.status(format!("Level {}!", round.level));
        round.offer_next_choice();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::MetaUpgrades;
    use crate::sim::build::apply_upgrade;
    use crate::sim::state::{Enemy, Orb, Pickup, Projectile};
    use crate::sim::{HeroId, WeaponId};
    use proptest::prelude::*;

    const DT: f32 = 1.0 / 60.0;

    fn quiet_round() -> RoundState {
        let mut r = RoundState::new(2024, HeroId::Vanguard, WeaponId::Pulse, &MetaUpgrades::default());
        r.next_contract_at = f32::MAX;
        r.next_elite_at = f32::MAX;
        r
    }

    fn enemy(id: u32, pos: Vec2, hp: f32) -> Enemy {
        Enemy {
            id,
            kind: EnemyKind::Runner,
            pos,
            radius: 12.0,
            speed: 80.0,
            hp,
            max_hp: hp,
            wobble: 0.0,
            drift: 0.0,
            elite: false,
        }
    }

    fn shot(id: u32, pos: Vec2, damage: f32, pierce: u32) -> Projectile {
        Projectile {
            id,
            pos,
            vel: Vec2::ZERO,
            ttl: 1.0,
            damage,
            radius: 4.0,
            pierce,
            struck: Vec::new(),
        }
    }

    #[test]
    fn test_projectile_defeats_runner() {
        let mut r = quiet_round();
        let spot = Vec2::new(100.0, 100.0);
        r.enemies.push(enemy(900, spot, 2.0));
        r.projectiles.push(shot(901, spot, 2.0, 0));

        assert_eq!(tick(&mut r, &TickInput::default(), 0.0), TickOutcome::Running);
        assert!(r.enemies.is_empty());
        assert!(r.projectiles.is_empty());
        assert_eq!(r.orbs.len(), 1);
        assert_eq!(r.orbs[0].pos, spot);
        assert_eq!(r.kills, 1);
    }

    #[test]
    fn test_pierce_defeats_pierce_plus_one() {
        for pierce in 0..3u32 {
            let mut r = quiet_round();
            let spot = Vec2::new(100.0, 100.0);
            for id in 0..5 {
                r.enemies.push(enemy(900 + id, spot, 0.5));
            }
            r.projectiles.push(shot(999, spot, 3.0, pierce));

            tick(&mut r, &TickInput::default(), 0.0);
            assert_eq!(r.kills, pierce + 1);
            assert!(r.projectiles.is_empty());
        }
    }

    #[test]
    fn test_pierce_reduces_damage_and_skips_struck() {
        let mut r = quiet_round();
        let spot = Vec2::new(100.0, 100.0);
        r.enemies.push(enemy(900, spot, 50.0));
        r.projectiles.push(shot(999, spot, 3.0, 2));

        tick(&mut r, &TickInput::default(), 0.0);
        assert_eq!(r.enemies[0].hp, 47.0);
        assert_eq!(r.projectiles[0].pierce, 1);
        assert_eq!(r.projectiles[0].damage, 2.0);

        // Still overlapping next frame, but already struck
        tick(&mut r, &TickInput::default(), 0.0);
        assert_eq!(r.enemies[0].hp, 47.0);
        assert_eq!(r.projectiles[0].pierce, 1);
    }

    #[test]
    fn test_shield_invulnerability_then_fatal() {
        let mut r = quiet_round();
        assert_eq!(r.build.shield, 1);
        let input = TickInput::default();

        r.elapsed = 5.0;
        r.last_shot_at = 5.0;
        let p = r.player_pos;
        r.enemies.push(enemy(900, p, 50.0));
        assert_eq!(tick(&mut r, &input, 0.0), TickOutcome::Running);
        assert_eq!(r.build.shield, 0);
        assert!(r.enemies.is_empty());
        assert_eq!(r.invulnerable_until, 6.0);

        r.elapsed = 5.5;
        r.last_shot_at = 5.5;
        r.enemies.push(enemy(901, p, 50.0));
        assert_eq!(tick(&mut r, &input, 0.0), TickOutcome::Running);
        assert_eq!(r.enemies.len(), 1);
        assert_eq!(r.build.shield, 0);

        r.elapsed = 6.1;
        r.last_shot_at = 6.1;
        r.enemies[0].pos = r.player_pos;
        assert_eq!(tick(&mut r, &input, 0.0), TickOutcome::Fatal);
    }

    #[test]
    fn test_orb_levels_up_and_freezes() {
        let mut r = quiet_round();
        r.xp = 65;
        r.xp_to_next = 70;
        let p = r.player_pos;
        r.orbs.push(Orb {
            id: 900,
            pos: p,
            radius: 6.0,
            xp: 10,
            score: 2.0,
            ttl: 5.0,
        });

        tick(&mut r, &TickInput::default(), 0.0);
        assert_eq!(r.level, 2);
        assert_eq!(r.xp, 5);
        assert_eq!(r.xp_to_next, 101);
        assert!(r.upgrade_choice.is_some());

        let elapsed = r.elapsed;
        assert_eq!(tick(&mut r, &TickInput::default(), 0.5), TickOutcome::Frozen);
        assert_eq!(r.elapsed, elapsed);
    }

    #[test]
    fn test_multiple_level_ups_queue_choices() {
        let mut r = quiet_round();
        r.xp = 30 + 52 + 10;
        tick(&mut r, &TickInput::default(), 0.0);
        assert_eq!(r.level, 3);
        assert_eq!(r.queued_choices, 1);
        assert!(r.upgrade_choice.is_some());
    }

    #[test]
    fn test_orb_magnet_and_expiry() {
        let mut r = quiet_round();
        let p = r.player_pos;
        let reach = r.build.pickup_radius;
        let start = p + Vec2::new(reach * 2.0, 0.0);
        r.orbs.push(Orb {
            id: 900,
            pos: start,
            radius: 6.0,
            xp: 1,
            score: 1.0,
            ttl: 5.0,
        });
        r.orbs.push(Orb {
            id: 901,
            pos: p + Vec2::new(0.0, reach * 5.0),
            radius: 6.0,
            xp: 1,
            score: 1.0,
            ttl: 0.01,
        });

        tick(&mut r, &TickInput::default(), DT);
        assert_eq!(r.orbs.len(), 1);
        let moved = start.x - r.orbs[0].pos.x;
        assert!(moved >= ORB_MIN_PULL * DT - 1e-3);
        assert!(moved <= ORB_MAX_PULL * DT + 1e-3);
    }

    #[test]
    fn test_pickups_apply_buffs() {
        let mut r = quiet_round();
        r.build.shield = 0;
        let p = r.player_pos;
        for (id, kind) in PickupKind::ALL.into_iter().enumerate() {
            r.pickups.push(Pickup {
                id: 900 + id as u32,
                kind,
                pos: p,
                radius: PICKUP_RADIUS,
                ttl: 5.0,
            });
        }
        tick(&mut r, &TickInput::default(), DT);
        assert!(r.pickups.is_empty());
        assert_eq!(r.build.shield, 1);
        assert!(r.frenzy_active());
        assert!(r.stasis_active());
        assert!(r.effective_fire_interval() < r.build.fire_interval);
    }

    #[test]
    fn test_contract_lifecycle() {
        let mut r = quiet_round();
        r.next_contract_at = 12.0;
        r.elapsed = 12.0;
        tick(&mut r, &TickInput::default(), 0.0);
        let contract = r.contract.expect("contract offered");
        assert!((8..=13).contains(&contract.target));
        assert!(contract.expires_at >= 12.0 + 17.0 && contract.expires_at <= 12.0 + 21.0);
        assert!(r.next_contract_at >= 42.0 && r.next_contract_at <= 54.0);

        // Completion is paid by the kill that reaches the target
        r.build.shield = 0;
        r.contract = Some(Contract {
            progress: contract.target - 1,
            ..contract
        });
        let spot = Vec2::new(100.0, 100.0);
        r.enemies.push(enemy(900, spot, 0.5));
        r.projectiles.push(shot(901, spot, 1.0, 0));
        let score = r.score;
        tick(&mut r, &TickInput::default(), 0.0);
        assert!(r.contract.is_none());
        assert_eq!(r.build.shield, 1);
        assert!(r.score >= score + 160.0);
        assert_eq!(
            r.charge,
            EnemyKind::Runner.charge_value() + CONTRACT_CHARGE_BONUS
        );

        // Expiry
        r.contract = Some(Contract {
            target: 10,
            progress: 3,
            expires_at: r.elapsed - 0.1,
        });
        tick(&mut r, &TickInput::default(), 0.0);
        assert!(r.contract.is_none());
    }

    #[test]
    fn test_elite_timer_forces_elite() {
        let mut r = quiet_round();
        r.next_elite_at = 45.0;
        r.elapsed = 45.0;
        tick(&mut r, &TickInput::default(), 0.0);
        assert!(r.enemies.iter().any(|e| e.elite));
        assert!(r.next_elite_at >= 75.0 && r.next_elite_at <= 83.0);
    }

    #[test]
    fn test_regular_spawn_resets_clock() {
        let mut r = quiet_round();
        r.spawn_clock = SPAWN_DELAY_MAX + 0.01;
        tick(&mut r, &TickInput::default(), 0.0);
        assert_eq!(r.enemies.len(), 1);
        assert_eq!(r.spawned, 1);
        assert_eq!(r.spawn_clock, 0.0);
    }

    #[test]
    fn test_pointer_overrides_axis() {
        let mut r = quiet_round();
        let start = r.player_pos;
        let input = TickInput {
            axis: Vec2::new(1.0, 0.0),
            pointer: Some(start + Vec2::new(0.0, -200.0)),
        };
        tick(&mut r, &input, DT);
        assert!((r.player_pos.x - start.x).abs() < 1e-3);
        assert!(r.player_pos.y < start.y);
    }

    #[test]
    fn test_diagonal_axis_is_normalized() {
        let mut r = quiet_round();
        let start = r.player_pos;
        let input = TickInput {
            axis: Vec2::new(1.0, 1.0),
            pointer: None,
        };
        tick(&mut r, &input, DT);
        let moved = r.player_pos.distance(start);
        assert!((moved - PLAYER_SPEED * r.build.move_speed * DT).abs() < 1e-2);
    }

    #[test]
    fn test_dash_moves_faster_and_clamps() {
        let mut r = quiet_round();
        let input = TickInput {
            axis: Vec2::new(1.0, 0.0),
            pointer: None,
        };
        assert!(r.try_dash(&input));
        let start = r.player_pos;
        tick(&mut r, &input, DT);
        let moved = r.player_pos.x - start.x;
        assert!(moved > PLAYER_SPEED * r.build.move_speed * DT * 2.0);

        r.player_pos = Vec2::new(r.arena.x, r.arena.y);
        tick(&mut r, &input, DT);
        assert_eq!(r.player_pos, r.arena - Vec2::splat(ARENA_MARGIN));
    }

    #[test]
    fn test_stasis_slows_enemies() {
        let mut fast = quiet_round();
        let mut slow = quiet_round();
        slow.stasis_until = 10.0;
        let start = Vec2::new(10.0, 300.0);
        fast.enemies.push(enemy(900, start, 50.0));
        slow.enemies.push(enemy(900, start, 50.0));
        fast.last_shot_at = f32::MAX;
        slow.last_shot_at = f32::MAX;

        tick(&mut fast, &TickInput::default(), DT);
        tick(&mut slow, &TickInput::default(), DT);
        let fast_moved = fast.enemies[0].pos.distance(start);
        let slow_moved = slow.enemies[0].pos.distance(start);
        assert!((slow_moved - fast_moved * STASIS_SPEED_SCALE).abs() < 1e-3);
    }

    #[test]
    fn test_zigzag_drifts_sideways() {
        let mut r = quiet_round();
        r.last_shot_at = f32::MAX;
        let start = Vec2::new(10.0, r.player_pos.y);
        r.enemies.push(Enemy {
            kind: EnemyKind::Zigzag,
            drift: 60.0,
            ..enemy(900, start, 50.0)
        });
        tick(&mut r, &TickInput::default(), DT);
        assert!((r.enemies[0].pos.y - start.y).abs() > 1e-3);
    }

    #[test]
    fn test_auto_fire_respects_interval() {
        let mut r = quiet_round();
        r.enemies.push(enemy(900, Vec2::new(10.0, 10.0), 50.0));
        r.elapsed = 1.0;
        tick(&mut r, &TickInput::default(), DT);
        assert_eq!(r.projectiles.len(), 1);
        assert_eq!(r.last_shot_at, r.elapsed);

        tick(&mut r, &TickInput::default(), DT);
        assert_eq!(r.projectiles.len(), 1);

        // Ready to fire, but no time passes
        r.last_shot_at = -10.0;
        tick(&mut r, &TickInput::default(), 0.0);
        assert_eq!(r.projectiles.len(), 1);
    }

    #[test]
    fn test_projectile_expires_on_ttl() {
        let mut r = quiet_round();
        let spot = Vec2::new(100.0, 100.0);
        r.projectiles.push(Projectile {
            ttl: DT * 0.5,
            ..shot(900, spot, 1.0, 0)
        });
        r.projectiles.push(shot(901, spot, 1.0, 0));

        tick(&mut r, &TickInput::default(), DT);
        assert_eq!(r.projectiles.len(), 1);
        assert_eq!(r.projectiles[0].id, 901);
    }

    #[test]
    fn test_projectile_culled_past_margin() {
        let mut r = quiet_round();
        r.projectiles.push(shot(900, Vec2::new(-PROJECTILE_CULL_MARGIN - 1.0, 100.0), 1.0, 0));
        r.projectiles.push(shot(901, Vec2::new(-PROJECTILE_CULL_MARGIN + 1.0, 100.0), 1.0, 0));
        r.projectiles.push(Projectile {
            vel: Vec2::new(600.0, 0.0),
            ..shot(902, Vec2::new(r.arena.x + PROJECTILE_CULL_MARGIN - 1.0, 100.0), 1.0, 0)
        });

        tick(&mut r, &TickInput::default(), DT);
        let ids: Vec<u32> = r.projectiles.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![901]);
    }

    #[test]
    fn test_pickup_expires_away_from_player() {
        let mut r = quiet_round();
        r.build.shield = 0;
        r.pickups.push(Pickup {
            id: 900,
            kind: PickupKind::Shield,
            pos: Vec2::new(50.0, 50.0),
            radius: PICKUP_RADIUS,
            ttl: DT * 0.5,
        });
        r.pickups.push(Pickup {
            id: 901,
            kind: PickupKind::Frenzy,
            pos: Vec2::new(60.0, 50.0),
            radius: PICKUP_RADIUS,
            ttl: 5.0,
        });

        tick(&mut r, &TickInput::default(), DT);
        assert_eq!(r.pickups.len(), 1);
        assert_eq!(r.pickups[0].id, 901);
        assert_eq!(r.build.shield, 0);
        assert!(!r.frenzy_active());
    }

    #[test]
    fn test_combo_expires_between_kills() {
        let mut r = quiet_round();
        r.combo = 5;
        r.combo_expire_at = 1.0;
        r.elapsed = 0.99;
        tick(&mut r, &TickInput::default(), 0.0);
        assert_eq!(r.combo, 5);
        tick(&mut r, &TickInput::default(), 0.02);
        assert_eq!(r.combo, 1);
    }

    fn fingerprint(r: &RoundState) -> String {
        let enemies: Vec<_> = r.enemies.iter().map(|e| (e.id, e.pos, e.hp)).collect();
        let shots: Vec<_> = r.projectiles.iter().map(|p| (p.id, p.pos, p.ttl, p.pierce)).collect();
        let orbs: Vec<_> = r.orbs.iter().map(|o| (o.id, o.pos, o.ttl)).collect();
        let pickups: Vec<_> = r.pickups.iter().map(|p| (p.id, p.ttl)).collect();
        format!(
            "{} {} {} {} {} {} {} {} {:?} {:?} {:?} {:?} {:?}",
            r.elapsed,
            r.score,
            r.charge,
            r.combo,
            r.xp,
            r.level,
            r.build.shield,
            r.kills,
            r.player_pos,
            enemies,
            shots,
            orbs,
            pickups
        )
    }

    #[test]
    fn test_zero_dt_is_idempotent() {
        let mut r = RoundState::new(77, HeroId::Tempest, WeaponId::Scatter, &MetaUpgrades::default());
        r.build.shield = 50;
        r.build.max_shield = 50;
        let input = TickInput {
            axis: Vec2::new(0.3, -1.0),
            pointer: None,
        };
        for _ in 0..1200 {
            if tick(&mut r, &input, DT) == TickOutcome::Frozen {
                let pick = r.upgrade_choice.take().and_then(|c| c.first().copied());
                if let Some(pick) = pick {
                    apply_upgrade(&mut r, pick);
                }
                r.offer_next_choice();
            }
        }
        assert!(r.spawned > 0);

        let before = fingerprint(&r);
        tick(&mut r, &input, 0.0);
        assert_eq!(before, fingerprint(&r));
    }

    #[test]
    fn test_zero_dt_after_frenzy_pickup_fires_nothing() {
        let mut r = quiet_round();
        r.elapsed = 10.0;
        r.last_shot_at = 9.65;
        r.enemies.push(enemy(900, Vec2::new(10.0, 10.0), 50.0));
        let p = r.player_pos;
        r.pickups.push(Pickup {
            id: 901,
            kind: PickupKind::Frenzy,
            pos: p,
            radius: PICKUP_RADIUS,
            ttl: 5.0,
        });

        tick(&mut r, &TickInput::default(), 0.001);
        assert!(r.frenzy_active());
        assert!(r.projectiles.is_empty());

        let before = fingerprint(&r);
        tick(&mut r, &TickInput::default(), 0.0);
        assert_eq!(before, fingerprint(&r));
        assert!(r.projectiles.is_empty());
    }

    #[test]
    fn test_zero_dt_after_completing_kill_changes_nothing() {
        let mut r = quiet_round();
        r.contract = Some(Contract {
            target: 1,
            progress: 0,
            expires_at: 100.0,
        });
        let spot = Vec2::new(100.0, 100.0);
        r.enemies.push(enemy(900, spot, 0.5));
        r.projectiles.push(shot(901, spot, 1.0, 0));

        tick(&mut r, &TickInput::default(), 0.001);
        assert!(r.contract.is_none());
        assert!(r.score >= 170.0);

        let before = fingerprint(&r);
        tick(&mut r, &TickInput::default(), 0.0);
        assert_eq!(before, fingerprint(&r));
        assert!(r.contract.is_none());
    }

    proptest! {
        #[test]
        fn prop_bounds_hold_every_step(
            seed in any::<u64>(),
            hero in 0usize..4,
            weapon in 0usize..3,
            steps in proptest::collection::vec((-1.0f32..1.0, -1.0f32..1.0, 0.0f32..0.05), 1..400),
        ) {
            let mut r = RoundState::new(seed, HeroId::ALL[hero], WeaponId::ALL[weapon], &MetaUpgrades::default());
            for (x, y, dt) in steps {
                let input = TickInput { axis: Vec2::new(x, y), pointer: None };
                let outcome = tick(&mut r, &input, dt);

                prop_assert!(r.build.shield <= r.build.max_shield);
                prop_assert!((1..=MAX_COMBO).contains(&r.combo));
                prop_assert!((0.0..=MAX_CHARGE).contains(&r.charge));
                prop_assert!(r.enemies.len() <= MAX_ENEMIES);
                prop_assert!(r.projectiles.len() <= MAX_PROJECTILES);
                for e in &r.enemies {
                    prop_assert!(e.hp <= e.max_hp);
                    prop_assert!(e.radius > 0.0 && e.speed > 0.0);
                }

                match outcome {
                    TickOutcome::Fatal => break,
                    TickOutcome::Frozen => {
                        let pick = r.upgrade_choice.take().and_then(|c| c.first().copied());
                        if let Some(pick) = pick {
                            apply_upgrade(&mut r, pick);
                        }
                        r.offer_next_choice();
                    }
                    TickOutcome::Running => {}
                }
            }
        }

        #[test]
        fn prop_spawn_delay_monotonic(a in 0.0f32..500.0, b in 0.0f32..500.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(spawn_delay(hi) <= spawn_delay(lo));
            prop_assert!(spawn_delay(a) >= SPAWN_DELAY_MIN && spawn_delay(a) <= SPAWN_DELAY_MAX);
        }
    }
}
