use thiserror::Error;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the simulation core.
///
/// Every variant describes a caller-side contract violation: the physics itself
/// has no recoverable failure modes once the inputs are well formed.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid user or API parameter (non-positive radius/mass, bad arena size, ...).
    #[error("invalid parameter: {0}")]
    InvalidParam(String),

    /// Rejection sampling ran out of attempts while placing a batch of particles.
    #[error("failed to place particle {index} without overlap after {attempts} attempts")]
    PlacementFailed { index: usize, attempts: usize },

    /// Particle state became non-finite during a tick.
    #[error("numerical error: {0}")]
    MathError(String),
}
