//! Entity Component System integration with hecs.
//!
//! The scene graph the physics core runs against: local transforms, the
//! parent/child hierarchy, and the components that mark shapes and bodies.

#[cfg(feature = "physics")]
pub mod bridge;
pub mod components;
pub mod systems;

pub mod prelude {
    #[cfg(feature = "physics")]
    pub use super::bridge::*;
    pub use super::components::*;
    pub use super::systems::{collect_subtree, transform_system, translate_world};
}
