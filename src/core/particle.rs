use crate::core::vecmath::DIM;
use crate::error::{Error, Result};

/// Default body mass used by the spawn helpers.
pub const DEFAULT_MASS: f64 = 1.0;

/// A rigid circular body.
///
/// Fields:
/// - `id`: stable identifier, assigned in spawn order by the owning world
/// - `r`: center position [x, y]
/// - `v`: velocity [vx, vy], in arena units per tick
/// - `radius`: disc radius (> 0)
/// - `mass`: body mass (> 0)
/// - `collision_count`: number of impulses the resolver has applied to this body
///
/// `radius` and `mass` are private so they cannot change after construction.
#[derive(Debug, Clone)]
pub struct Particle {
    /// Stable particle identifier.
    pub id: u32,
    /// Position (x, y).
    pub r: [f64; DIM],
    /// Velocity (vx, vy).
    pub v: [f64; DIM],
    radius: f64,
    mass: f64,
    /// Resolved-collision counter.
    pub collision_count: u64,
}

impl Particle {
    /// Create a body, rejecting geometry the collision response cannot handle.
    ///
    /// Errors:
    /// - `Error::InvalidParam` if `radius` or `mass` is not a positive finite number, or if
    ///   the center or velocity has a NaN/infinite component.
    pub fn new(id: u32, r: [f64; DIM], v: [f64; DIM], radius: f64, mass: f64) -> Result<Self> {
        let positive = |x: f64| x.is_finite() && x > 0.0;
        let finite = |xs: &[f64; DIM]| xs.iter().all(|x| x.is_finite());
        if !positive(radius) {
            return Err(Error::InvalidParam(format!(
                "body {id}: radius must be a positive finite number, got {radius}"
            )));
        }
        if !positive(mass) {
            return Err(Error::InvalidParam(format!(
                "body {id}: mass must be a positive finite number, got {mass}"
            )));
        }
        if !finite(&r) {
            return Err(Error::InvalidParam(format!(
                "body {id}: center {r:?} is not a finite arena coordinate"
            )));
        }
        if !finite(&v) {
            return Err(Error::InvalidParam(format!(
                "body {id}: velocity {v:?} must be finite"
            )));
        }
        Ok(Self {
            id,
            r,
            v,
            radius,
            mass,
            collision_count: 0,
        })
    }

    #[inline]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    #[inline]
    pub fn mass(&self) -> f64 {
        self.mass
    }

    /// Increment the collision counter.
    #[inline]
    pub fn bump_collision_count(&mut self) {
        self.collision_count = self.collision_count.saturating_add(1);
    }

    /// Returns the particle's kinetic energy: 1/2 m |v|^2.
    #[inline]
    pub fn kinetic_energy(&self) -> f64 {
        let vsq: f64 = self.v.iter().map(|&c| c * c).sum();
        0.5 * self.mass * vsq
    }

    /// Linear momentum m v.
    #[inline]
    pub fn momentum(&self) -> [f64; DIM] {
        [self.mass * self.v[0], self.mass * self.v[1]]
    }

    /// True when `point` lies strictly inside the disc.
    #[inline]
    pub fn contains(&self, point: &[f64; DIM]) -> bool {
        crate::core::vecmath::distance(&self.r, point) < self.radius
    }

    pub(crate) fn is_finite(&self) -> bool {
        self.r.iter().chain(self.v.iter()).all(|x| x.is_finite())
    }
}
