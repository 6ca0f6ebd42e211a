//! Unit-step Euler integration with wall reflection.

use crate::core::config::{WallRule, WorldConfig};
use crate::core::particle::Particle;
use crate::core::vecmath::DIM;

/// Advance `p` by one tick inside a `[0, size[0]] x [0, size[1]]` arena.
///
/// The wall tests look at the pre-update position: the far walls use the pending
/// velocity (`x + radius + vx >= width`), the near walls only the current edge
/// (`x - radius < 0`). A firing test flips that velocity component, scaled by the
/// axis restitution, and the position is then advanced with the updated velocity.
/// Both axes are tested independently, so a corner hit flips both.
///
/// Under [`WallRule::Symmetric`] and [`WallRule::ReferenceParity`] the tests ignore
/// the direction of travel, so a body whose surface is already past a wall flips
/// every tick and oscillates there without coming back. [`WallRule::Approaching`]
/// only flips velocity components that point into the wall.
///
/// Returns `true` if any reflection fired.
pub fn advance(p: &mut Particle, size: [f64; DIM], config: &WorldConfig) -> bool {
    let mut reflected = false;
    for axis in 0..DIM {
        if hits_wall(p, axis, size[axis], config.wall_rule) {
            p.v[axis] = -p.v[axis] * config.restitution[axis];
            reflected = true;
        }
    }
    for (rk, &vk) in p.r.iter_mut().zip(p.v.iter()) {
        *rk += vk;
    }
    reflected
}

#[inline]
fn hits_wall(p: &Particle, axis: usize, extent: f64, rule: WallRule) -> bool {
    let x = p.r[axis];
    let radius = p.radius();
    let far = x + radius + p.v[axis] >= extent;
    let near_edge = x - radius;
    let near = match (rule, axis) {
        (WallRule::ReferenceParity, 0) => near_edge <= 0.0,
        _ => near_edge < 0.0,
    };
    match rule {
        WallRule::Approaching => (far && p.v[axis] > 0.0) || (near && p.v[axis] < 0.0),
        _ => far || near,
    }
}
