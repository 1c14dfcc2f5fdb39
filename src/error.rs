//! Error types for shape and body construction.

use thiserror::Error;

/// Errors raised when constructing physics components.
///
/// Only construction can fail. Numerical edge cases met during a tick
/// (degenerate edges, detached entities) are absorbed by the step.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A polygon needs at least three points, a segment two distinct ones.
    #[error("invalid geometry: shape needs at least 3 points (2 distinct for a segment), got {points}")]
    InvalidGeometry { points: usize },

    /// Mass must be finite and strictly positive.
    #[error("invalid mass {0}: must be finite and greater than zero")]
    InvalidMass(f32),

    /// Restitution must lie in `[0, 1]`.
    #[error("invalid restitution {0}: must be within [0, 1]")]
    InvalidRestitution(f32),
}

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;
