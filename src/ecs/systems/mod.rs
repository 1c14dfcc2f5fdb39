//! ECS systems.

pub mod transform;

pub use transform::{collect_subtree, transform_system, translate_world};
