use crate::error::{Error, Result};

/// How the minimum-side walls compare the body's leading edge against zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WallRule {
    /// `x - radius < 0` and `y - radius < 0`.
    #[default]
    Symmetric,
    /// `x - radius <= 0` on the left wall, `y - radius < 0` on the top wall.
    ///
    /// Reproduces the asymmetric comparison of the reference bouncing-ball
    /// program bit for bit. A body resting exactly on the left wall reflects
    /// every tick under this rule.
    ReferenceParity,
    /// Symmetric comparisons, but a wall only reflects a body moving toward it.
    ///
    /// A body left outside the arena (after a shrinking resize, or spawned past a
    /// wall) drifts back in instead of oscillating in place. A body past the top
    /// wall that is already moving down is not flipped.
    Approaching,
}

/// Tunables shared by every particle in a world.
#[derive(Debug, Clone, PartialEq)]
pub struct WorldConfig {
    /// Wall restitution per axis `[horizontal, vertical]`; 1.0 is a perfectly elastic bounce.
    pub restitution: [f64; 2],
    pub wall_rule: WallRule,
    /// Rejection-sampling budget per particle for [`crate::core::World::populate`].
    pub max_placement_attempts: usize,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            restitution: [1.0, 1.0],
            wall_rule: WallRule::Symmetric,
            max_placement_attempts: 1_000_000,
        }
    }
}

impl WorldConfig {
    pub fn validate(&self) -> Result<()> {
        for (axis, &e) in self.restitution.iter().enumerate() {
            if !e.is_finite() || !(0.0..=1.0).contains(&e) {
                return Err(Error::InvalidParam(format!(
                    "restitution on axis {axis} must lie in [0, 1], got {e}"
                )));
            }
        }
        if self.max_placement_attempts == 0 {
            return Err(Error::InvalidParam(
                "max_placement_attempts must be > 0".into(),
            ));
        }
        Ok(())
    }
}
