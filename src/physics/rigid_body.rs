//! Rigid body integration and contact resolution.

use glam::Vec2;

use crate::ecs::components::physics::RigidBody;
use crate::ecs::systems::translate_world;

use super::contact::Contact;

/// Advance one body by `dt` under `gravity`.
///
/// Velocity is updated first; the body then moves by the mean of its old and
/// new velocity, which is exact for constant acceleration. Returns `false`
/// if the entity has no body (or no longer exists).
pub fn integrate(world: &mut hecs::World, entity: hecs::Entity, gravity: Vec2, dt: f32) -> bool {
    let displacement = match world.get::<&mut RigidBody>(entity) {
        Ok(mut rb) => {
            let previous = rb.linear_velocity;
            rb.linear_velocity += gravity * dt;
            (previous + rb.linear_velocity) * 0.5 * dt
        }
        Err(_) => return false,
    };

    translate_world(world, entity, displacement);
    true
}

/// Integrate every listed entity that carries a `RigidBody`.
pub fn integrate_bodies(world: &mut hecs::World, entities: &[hecs::Entity], gravity: Vec2, dt: f32) {
    for &entity in entities {
        integrate(world, entity, gravity, dt);
    }
}

/// Resolve a shape's contacts against its own body.
///
/// For each contact the body is first pushed out along the normal by its share
/// of the depth (all of it when the other shape is static), then, for
/// mass-aware contacts, the frozen impulse is applied to its velocity.
/// Entities without a body, and contacts that belong to another shape, are
/// ignored.
pub fn resolve_contacts(world: &mut hecs::World, entity: hecs::Entity, contacts: &[Contact]) {
    let Ok(mass) = world.get::<&RigidBody>(entity).map(|rb| rb.mass) else {
        return;
    };

    for contact in contacts.iter().filter(|c| c.current() == entity) {
        let normal = contact.normal();

        let share = match world.get::<&RigidBody>(contact.other()) {
            Ok(other) => other.mass / (mass + other.mass),
            Err(_) => 1.0,
        };
        let correction = normal * (contact.depth() * share);
        if correction != Vec2::ZERO {
            translate_world(world, entity, correction);
        }

        if let Some(impulse) = contact.impulse() {
            if let Ok(mut rb) = world.get::<&mut RigidBody>(entity) {
                rb.linear_velocity += normal * (impulse.impulse_magnitude / mass);
            }
        }
    }
}
