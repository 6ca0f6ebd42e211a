use crate::core::boundary;
use crate::core::collision::{discs_overlap, overlapping_pairs, resolve};
use crate::core::config::WorldConfig;
use crate::core::particle::{Particle, DEFAULT_MASS};
use crate::core::vecmath::DIM;
use crate::error::{Error, Result};
use rand::{rng, rngs::StdRng, Rng, SeedableRng};
use tracing::{debug, trace, warn};

/// Velocity range of bodies created by [`World::populate`]: `vx` in `[-5, 5)`, `vy` in `[0, 5)`.
const POPULATE_VX: (f64, f64) = (-5.0, 5.0);
const POPULATE_VY: (f64, f64) = (0.0, 5.0);

/// Radius and velocity ranges of bodies created by [`World::spawn_at`].
const SPAWN_AT_RADIUS: (f64, f64) = (20.0, 40.0);
const SPAWN_AT_VX: (f64, f64) = (-2.0, 2.0);
const SPAWN_AT_VY: (f64, f64) = (1.0, 5.0);

/// Counters from the most recent [`World::step`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickStats {
    /// Bodies that bounced off at least one wall.
    pub reflections: usize,
    /// Overlapping pairs found after integration.
    pub overlaps: usize,
    /// Pairs that passed the approach gate and exchanged momentum.
    pub resolved: usize,
}

/// A rectangular arena `[0, width] x [0, height]` and the bodies inside it.
///
/// One tick is: integrate every body (with wall reflection), detect all overlapping
/// pairs among the moved bodies, then resolve those pairs in detection order. A body
/// touching several others is resolved against each in turn with whatever velocity
/// the earlier resolutions left it, so the outcome depends on spawn order.
#[derive(Debug)]
pub struct World {
    size: [f64; DIM],
    particles: Vec<Particle>,
    /// Next-tick buffer; swapped in only when the tick finishes with finite state.
    scratch: Vec<Particle>,
    config: WorldConfig,
    rng: StdRng,
    next_id: u32,
    ticks: u64,
    last_tick: TickStats,
}

impl World {
    /// Create an empty world with the default configuration and an entropy-seeded RNG.
    pub fn new(width: f64, height: f64) -> Result<Self> {
        Self::with_config(width, height, WorldConfig::default(), None)
    }

    /// Create an empty world.
    ///
    /// `seed` drives [`World::populate`] and [`World::spawn_at`]; `None` is nondeterministic.
    pub fn with_config(
        width: f64,
        height: f64,
        config: WorldConfig,
        seed: Option<u64>,
    ) -> Result<Self> {
        validate_size(width, height)?;
        config.validate()?;
        let rng: StdRng = match seed {
            Some(s) => SeedableRng::seed_from_u64(s),
            None => SeedableRng::seed_from_u64(rng().random()),
        };
        Ok(Self {
            size: [width, height],
            particles: Vec::new(),
            scratch: Vec::new(),
            config,
            rng,
            next_id: 0,
            ticks: 0,
            last_tick: TickStats::default(),
        })
    }

    pub fn width(&self) -> f64 {
        self.size[0]
    }

    pub fn height(&self) -> f64 {
        self.size[1]
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Read-only view of the bodies in spawn order.
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn num_particles(&self) -> usize {
        self.particles.len()
    }

    /// Number of completed ticks since construction or the last reset.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn last_tick(&self) -> TickStats {
        self.last_tick
    }

    /// Append a body and return its id.
    ///
    /// Errors: `Error::InvalidParam` if radius or mass is not positive, or any component is non-finite.
    pub fn spawn(
        &mut self,
        position: [f64; DIM],
        velocity: [f64; DIM],
        radius: f64,
        mass: f64,
    ) -> Result<u32> {
        let id = self.next_id;
        let p = Particle::new(id, position, velocity, radius, mass)?;
        self.particles.push(p);
        self.next_id = self.next_id.saturating_add(1);
        debug!(id, ?position, ?velocity, radius, mass, "spawned particle");
        Ok(id)
    }

    /// Spawn a unit-mass body of random radius in `[20, 40)` at `position`, drifting
    /// downward with `vx` in `[-2, 2)` and `vy` in `[1, 5)`.
    ///
    /// No overlap check is made; an overlapping newcomer is pushed apart by the
    /// resolver on the following ticks.
    pub fn spawn_at(&mut self, position: [f64; DIM]) -> Result<u32> {
        let radius = self.rng.random_range(SPAWN_AT_RADIUS.0..SPAWN_AT_RADIUS.1);
        let velocity = [
            self.rng.random_range(SPAWN_AT_VX.0..SPAWN_AT_VX.1),
            self.rng.random_range(SPAWN_AT_VY.0..SPAWN_AT_VY.1),
        ];
        self.spawn(position, velocity, radius, DEFAULT_MASS)
    }

    /// Add `count` unit-mass bodies of identical `radius` at random non-overlapping
    /// positions fully inside the arena.
    ///
    /// Positions are rejection-sampled against every body already in the world.
    /// On error the bodies placed so far are kept.
    pub fn populate(&mut self, count: usize, radius: f64) -> Result<()> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(Error::InvalidParam("radius must be finite and > 0".into()));
        }
        if self.size.iter().any(|&l| l < 2.0 * radius) {
            return Err(Error::InvalidParam(
                "arena must be at least 2 * radius in every dimension".into(),
            ));
        }

        let max_attempts = self.config.max_placement_attempts;
        self.particles.reserve(count);
        for index in 0..count {
            let mut attempts = 0usize;
            let r = loop {
                if attempts >= max_attempts {
                    warn!(index, attempts, "giving up on particle placement");
                    return Err(Error::PlacementFailed { index, attempts });
                }
                attempts += 1;
                let mut r = [0.0_f64; DIM];
                for (k, r_k) in r.iter_mut().enumerate() {
                    *r_k = self.rng.random_range(radius..=self.size[k] - radius);
                }
                if !self.overlaps(&r, radius) {
                    break r;
                }
            };
            let v = [
                self.rng.random_range(POPULATE_VX.0..POPULATE_VX.1),
                self.rng.random_range(POPULATE_VY.0..POPULATE_VY.1),
            ];
            self.spawn(r, v, radius, DEFAULT_MASS)?;
        }
        debug!(count, radius, total = self.particles.len(), "populated world");
        Ok(())
    }

    /// Remove every body. Arena size, configuration and RNG state are kept.
    pub fn reset(&mut self) {
        debug!(removed = self.particles.len(), "reset world");
        self.particles.clear();
        self.next_id = 0;
        self.ticks = 0;
        self.last_tick = TickStats::default();
    }

    /// Change the arena bounds. Bodies are not moved.
    ///
    /// With the default [`crate::core::WallRule`] a body whose surface ends up past a
    /// wall flips its velocity every tick and oscillates there instead of returning.
    /// After shrinking the arena either call [`World::reset`] and [`World::populate`]
    /// again, or configure [`crate::core::WallRule::Approaching`], which lets such
    /// bodies drift back inside.
    pub fn resize(&mut self, width: f64, height: f64) -> Result<()> {
        validate_size(width, height)?;
        debug!(
            from = ?self.size,
            to = ?[width, height],
            "resized arena"
        );
        self.size = [width, height];
        Ok(())
    }

    /// Advance the simulation by one tick.
    ///
    /// The tick is computed into a scratch buffer and committed only if every body
    /// ends it with finite state.
    ///
    /// Errors: `Error::MathError` if any body would end the tick with a non-finite
    /// position or velocity (only reachable from extreme caller-supplied values). The
    /// world is then left exactly as it was before the call, tick counter included.
    pub fn step(&mut self) -> Result<()> {
        let mut stats = TickStats::default();
        self.scratch.clone_from(&self.particles);

        for p in &mut self.scratch {
            if boundary::advance(p, self.size, &self.config) {
                stats.reflections += 1;
            }
        }

        let pairs = overlapping_pairs(&self.scratch);
        stats.overlaps = pairs.len();
        for (i, j) in pairs {
            let (a, b) = pair_mut(&mut self.scratch, i, j);
            if resolve(a, b) {
                stats.resolved += 1;
            }
        }

        if let Some(p) = self.scratch.iter().find(|p| !p.is_finite()) {
            return Err(Error::MathError(format!(
                "particle {} would have non-finite state after tick {}",
                p.id,
                self.ticks + 1
            )));
        }

        std::mem::swap(&mut self.particles, &mut self.scratch);
        self.ticks += 1;
        self.last_tick = stats;
        trace!(
            tick = self.ticks,
            reflections = stats.reflections,
            overlaps = stats.overlaps,
            resolved = stats.resolved,
            "tick complete"
        );
        Ok(())
    }

    /// Index of the first body whose disc strictly contains `point`.
    pub fn particle_at(&self, point: [f64; DIM]) -> Option<usize> {
        self.particles.iter().position(|p| p.contains(&point))
    }

    /// True if a disc of `radius` centered at `r` would overlap any existing body.
    pub fn overlaps(&self, r: &[f64; DIM], radius: f64) -> bool {
        self.particles
            .iter()
            .any(|p| discs_overlap(&p.r, p.radius(), r, radius))
    }

    /// Total kinetic energy (diagnostic).
    pub fn kinetic_energy(&self) -> f64 {
        self.particles.iter().map(|p| p.kinetic_energy()).sum()
    }

    /// Total linear momentum (diagnostic).
    pub fn momentum(&self) -> [f64; DIM] {
        self.particles.iter().fold([0.0; DIM], |acc, p| {
            let m = p.momentum();
            [acc[0] + m[0], acc[1] + m[1]]
        })
    }
}

fn validate_size(width: f64, height: f64) -> Result<()> {
    if !(width.is_finite() && width > 0.0 && height.is_finite() && height > 0.0) {
        return Err(Error::InvalidParam(
            "arena width and height must be finite and > 0".into(),
        ));
    }
    Ok(())
}

/// Two distinct mutable borrows into `ps`; requires `i < j`.
#[inline]
fn pair_mut(ps: &mut [Particle], i: usize, j: usize) -> (&mut Particle, &mut Particle) {
    debug_assert!(i < j);
    let (left, right) = ps.split_at_mut(j);
    (&mut left[i], &mut right[0])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::vecmath::distance;
    use approx::assert_abs_diff_eq;

    #[test]
    fn make_small_world_ok() -> Result<()> {
        let mut world = World::with_config(400.0, 300.0, WorldConfig::default(), Some(1234))?;
        world.populate(8, 10.0)?;
        assert_eq!(world.num_particles(), 8);
        assert!(world.kinetic_energy().is_finite());
        world.step()?;
        assert_eq!(world.ticks(), 1);
        Ok(())
    }

    #[test]
    fn invalid_arena_rejected() {
        assert!(World::new(0.0, 10.0).is_err());
        assert!(World::new(10.0, f64::NAN).is_err());
        assert!(World::new(-1.0, -1.0).is_err());
    }

    #[test]
    fn spawn_validates_and_assigns_ids() -> Result<()> {
        let mut world = World::new(100.0, 100.0)?;
        assert_eq!(world.spawn([10.0, 10.0], [0.0, 0.0], 2.0, 1.0)?, 0);
        assert_eq!(world.spawn([50.0, 10.0], [0.0, 0.0], 2.0, 3.0)?, 1);
        assert!(world.spawn([50.0, 50.0], [0.0, 0.0], 0.0, 1.0).is_err());
        assert!(world.spawn([50.0, 50.0], [0.0, 0.0], 1.0, -1.0).is_err());
        assert_eq!(world.num_particles(), 2);
        Ok(())
    }

    #[test]
    fn populate_places_without_overlap_inside_arena() -> Result<()> {
        let mut world = World::with_config(800.0, 600.0, WorldConfig::default(), Some(42))?;
        world.populate(100, 20.0)?;
        let ps = world.particles();
        for (i, a) in ps.iter().enumerate() {
            assert!(a.r[0] >= 20.0 && a.r[0] <= 780.0);
            assert!(a.r[1] >= 20.0 && a.r[1] <= 580.0);
            assert!(a.v[0] >= -5.0 && a.v[0] < 5.0);
            assert!(a.v[1] >= 0.0 && a.v[1] < 5.0);
            for b in &ps[i + 1..] {
                assert!(distance(&a.r, &b.r) >= 40.0);
            }
        }
        Ok(())
    }

    #[test]
    fn populate_reports_exhausted_attempts() -> Result<()> {
        let cfg = WorldConfig {
            max_placement_attempts: 25,
            ..WorldConfig::default()
        };
        // Room for exactly one body of radius 5.
        let mut world = World::with_config(10.0, 10.0, cfg, Some(9))?;
        let err = world.populate(2, 5.0).unwrap_err();
        assert!(matches!(
            err,
            Error::PlacementFailed {
                index: 1,
                attempts: 25
            }
        ));
        assert_eq!(world.num_particles(), 1);
        Ok(())
    }

    #[test]
    fn populate_rejects_oversized_radius() -> Result<()> {
        let mut world = World::new(30.0, 100.0)?;
        assert!(world.populate(1, 20.0).is_err());
        Ok(())
    }

    #[test]
    fn seeded_worlds_are_reproducible() -> Result<()> {
        let mut a = World::with_config(500.0, 500.0, WorldConfig::default(), Some(7))?;
        let mut b = World::with_config(500.0, 500.0, WorldConfig::default(), Some(7))?;
        a.populate(20, 10.0)?;
        b.populate(20, 10.0)?;
        for _ in 0..50 {
            a.step()?;
            b.step()?;
        }
        for (pa, pb) in a.particles().iter().zip(b.particles()) {
            assert_eq!(pa.r, pb.r);
            assert_eq!(pa.v, pb.v);
        }
        Ok(())
    }

    #[test]
    fn spawn_at_uses_click_ranges() -> Result<()> {
        let mut world = World::with_config(800.0, 600.0, WorldConfig::default(), Some(3))?;
        for _ in 0..20 {
            world.spawn_at([400.0, 300.0])?;
        }
        for p in world.particles() {
            assert_eq!(p.r, [400.0, 300.0]);
            assert!(p.radius() >= 20.0 && p.radius() < 40.0);
            assert!(p.v[0] >= -2.0 && p.v[0] < 2.0);
            assert!(p.v[1] >= 1.0 && p.v[1] < 5.0);
            assert_eq!(p.mass(), 1.0);
        }
        Ok(())
    }

    #[test]
    fn step_integrates_then_resolves() -> Result<()> {
        let mut world = World::new(1000.0, 1000.0)?;
        // After one integration step the centers are 10 apart with radii 6.
        world.spawn([95.0, 500.0], [5.0, 0.0], 6.0, 1.0)?;
        world.spawn([115.0, 500.0], [-5.0, 0.0], 6.0, 1.0)?;
        world.step()?;
        let ps = world.particles();
        assert_eq!(ps[0].r, [100.0, 500.0]);
        assert_eq!(ps[1].r, [110.0, 500.0]);
        assert_abs_diff_eq!(ps[0].v[0], -5.0, epsilon = 1e-12);
        assert_abs_diff_eq!(ps[1].v[0], 5.0, epsilon = 1e-12);
        assert_eq!(
            world.last_tick(),
            TickStats {
                reflections: 0,
                overlaps: 1,
                resolved: 1
            }
        );
        Ok(())
    }

    #[test]
    fn resize_keeps_bodies_in_place() -> Result<()> {
        let mut world = World::new(500.0, 500.0)?;
        world.spawn([400.0, 100.0], [1.0, 0.0], 10.0, 1.0)?;
        world.resize(300.0, 500.0)?;
        assert_eq!(world.width(), 300.0);
        assert_eq!(world.particles()[0].r, [400.0, 100.0]);
        assert!(world.resize(0.0, 10.0).is_err());
        Ok(())
    }

    #[test]
    fn shrunk_out_body_oscillates_under_default_rule() -> Result<()> {
        let mut world = World::new(500.0, 500.0)?;
        world.spawn([400.0, 100.0], [1.0, 0.0], 10.0, 1.0)?;
        world.resize(300.0, 500.0)?;
        for tick in 1..=200 {
            world.step()?;
            let x = world.particles()[0].r[0];
            let expected = if tick % 2 == 1 { 399.0 } else { 400.0 };
            assert_eq!(x, expected, "tick {tick}");
        }
        Ok(())
    }

    #[test]
    fn shrunk_out_body_returns_under_approaching_rule() -> Result<()> {
        let cfg = WorldConfig {
            wall_rule: crate::core::WallRule::Approaching,
            ..WorldConfig::default()
        };
        let mut world = World::with_config(500.0, 500.0, cfg, Some(1))?;
        world.spawn([400.0, 100.0], [1.0, 0.0], 10.0, 1.0)?;
        world.resize(300.0, 500.0)?;
        for _ in 0..200 {
            world.step()?;
        }
        let p = &world.particles()[0];
        assert_eq!(p.v[0], -1.0);
        assert_eq!(p.r[0], 200.0);
        assert!(p.r[0] + p.radius() <= world.width());
        assert!(p.r[0] - p.radius() >= 0.0);
        Ok(())
    }

    #[test]
    fn reset_clears_bodies_and_ids() -> Result<()> {
        let mut world = World::with_config(300.0, 300.0, WorldConfig::default(), Some(1))?;
        world.populate(5, 5.0)?;
        world.step()?;
        world.reset();
        assert_eq!(world.num_particles(), 0);
        assert_eq!(world.ticks(), 0);
        assert_eq!(world.spawn([10.0, 10.0], [0.0, 0.0], 1.0, 1.0)?, 0);
        Ok(())
    }

    #[test]
    fn particle_at_picks_first_containing_disc() -> Result<()> {
        let mut world = World::new(200.0, 200.0)?;
        world.spawn([50.0, 50.0], [0.0, 0.0], 10.0, 1.0)?;
        world.spawn([55.0, 50.0], [0.0, 0.0], 10.0, 1.0)?;
        assert_eq!(world.particle_at([52.0, 50.0]), Some(0));
        assert_eq!(world.particle_at([63.0, 50.0]), Some(1));
        assert_eq!(world.particle_at([150.0, 150.0]), None);
        Ok(())
    }

    #[test]
    fn overflowing_masses_surface_as_math_error() -> Result<()> {
        let mut world = World::new(100.0, 100.0)?;
        // m1 + m2 overflows to infinity and the exchange yields NaN.
        world.spawn([40.0, 50.0], [1.0, 0.0], 10.0, f64::MAX)?;
        world.spawn([60.0, 50.0], [-1.0, 0.0], 10.0, f64::MAX)?;
        let before: Vec<([f64; 2], [f64; 2])> =
            world.particles().iter().map(|p| (p.r, p.v)).collect();
        let err = world.step().unwrap_err();
        assert!(matches!(err, Error::MathError(_)));
        // Nothing was committed: state, tick count and stats are untouched.
        let after: Vec<([f64; 2], [f64; 2])> =
            world.particles().iter().map(|p| (p.r, p.v)).collect();
        assert_eq!(before, after);
        assert_eq!(world.ticks(), 0);
        assert_eq!(world.last_tick(), TickStats::default());
        // Retrying hits the same deterministic failure instead of running on NaN.
        assert!(matches!(world.step(), Err(Error::MathError(_))));
        Ok(())
    }
}
