//! ECS components (transform, physics).

#[cfg(feature = "physics")]
pub mod physics;
pub mod transform;

#[cfg(feature = "physics")]
pub use physics::*;
pub use transform::*;
