//! Collision and proximity queries
//!
//! Everything in the arena is a circle, so contact is a distance check
//! against the sum of radii. Targeting searches are linear scans; the
//! enemy population is capped well below where that matters.

use glam::Vec2;

use super::state::Enemy;

/// True if two circles overlap or touch
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    let reach = ra + rb;
    a.distance_squared(b) <= reach * reach
}

/// True if `pos` is more than `margin` outside a `size` arena
#[inline]
pub fn out_of_bounds(pos: Vec2, size: Vec2, margin: f32) -> bool {
    pos.x < -margin || pos.y < -margin || pos.x > size.x + margin || pos.y > size.y + margin
}

/// Index of the enemy closest to `from`, or `None` if there are none
pub fn nearest_enemy(enemies: &[Enemy], from: Vec2) -> Option<usize> {
    enemies
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| {
            a.pos
                .distance_squared(from)
                .partial_cmp(&b.pos.distance_squared(from))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|(i, _)| i)
}

/// Indices of the `k` enemies closest to `from`, nearest first
pub fn nearest_enemies(enemies: &[Enemy], from: Vec2, k: usize) -> Vec<usize> {
    let mut order: Vec<(usize, f32)> = enemies
        .iter()
        .enumerate()
        .map(|(i, e)| (i, e.pos.distance_squared(from)))
        .collect();
    order.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
    order.into_iter().take(k).map(|(i, _)| i).collect()
}
