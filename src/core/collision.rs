//! Pairwise overlap detection and elastic collision response.

use crate::core::particle::Particle;
use crate::core::vecmath::{distance, dot, rotate, sub, DIM};

/// All unordered pairs `(i, j)` with `i < j` whose discs strictly overlap.
///
/// Exhaustive O(n^2) scan. Pairs come out in lexicographic order of spawn index,
/// which is also the order [`crate::core::World::step`] resolves them in.
/// Tangent discs (distance exactly equal to the radius sum) are not reported.
pub fn overlapping_pairs(particles: &[Particle]) -> Vec<(usize, usize)> {
    let n = particles.len();
    let mut pairs = Vec::new();
    for i in 0..n {
        for j in (i + 1)..n {
            if overlaps(&particles[i], &particles[j]) {
                pairs.push((i, j));
            }
        }
    }
    pairs
}

#[inline]
pub fn overlaps(a: &Particle, b: &Particle) -> bool {
    discs_overlap(&a.r, a.radius(), &b.r, b.radius())
}

/// Strict disc overlap: center distance below the radius sum.
#[inline]
pub fn discs_overlap(a: &[f64; DIM], ra: f64, b: &[f64; DIM], rb: f64) -> bool {
    distance(a, b) < ra + rb
}

/// Apply an elastic collision between two overlapping bodies.
///
/// Nothing happens unless the bodies are closing along the line of centers, i.e.
/// `(v_b - v_a) . (r_b - r_a) < 0`. Otherwise both velocities are rotated into the
/// frame whose x-axis points from `a` to `b`, the x-components undergo the 1D
/// elastic exchange, the y-components are kept, and the result is rotated back.
///
/// Returns `true` if an impulse was applied.
pub fn resolve(a: &mut Particle, b: &mut Particle) -> bool {
    let dv = sub(&b.v, &a.v);
    let d = sub(&b.r, &a.r);
    if dot(&dv, &d) >= 0.0 {
        return false;
    }

    let angle = -d[1].atan2(d[0]);
    let (m1, m2) = (a.mass(), b.mass());
    let total = m1 + m2;

    let u1 = rotate(a.v, angle);
    let u2 = rotate(b.v, angle);

    let v1 = [u1[0] * (m1 - m2) / total + u2[0] * 2.0 * m2 / total, u1[1]];
    let v2 = [u2[0] * (m2 - m1) / total + u1[0] * 2.0 * m1 / total, u2[1]];

    a.v = rotate(v1, -angle);
    b.v = rotate(v2, -angle);
    a.bump_collision_count();
    b.bump_collision_count();
    true
}
