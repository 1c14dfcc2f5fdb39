//! polyphys
//!
//! A 2D physics core for convex polygons built on hecs and glam.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! 1. **error** - Construction errors for shapes and bodies
//! 2. **ecs** - hecs components, scene hierarchy and transform propagation (feature = "ecs")
//! 3. **physics** - SAT collision detection, contacts, rigid bodies and the
//!    fixed-step world (feature = "physics")
//!
//! Coordinates follow screen conventions: +Y points down, so the default
//! gravity is `(0, 9.81)`.

pub mod error;

#[cfg(feature = "ecs")]
pub mod ecs;

#[cfg(feature = "physics")]
pub mod physics;

pub use error::{Error, Result};

#[cfg(feature = "ecs")]
pub use ecs::prelude::*;

#[cfg(feature = "physics")]
pub use physics::{
    contact::{Contact, ContactImpulse, ContactInfo},
    event::SubscriptionId,
    PhysicsConfig, PhysicsState, PhysicsWorld, StepReport, DEFAULT_GRAVITY,
};

// Re-export glam for convenience
pub use glam;
