//! Polygon shape support for collision detection.

use glam::Vec2;

use crate::ecs::components::physics::{PolygonCollider, RigidBody};
use crate::ecs::components::transform::GlobalTransform2D;

use super::contact::{BodyState, Contact};
use super::event::ContactSignal;

impl PolygonCollider {
    /// Local-space points, as given at construction.
    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    /// World-space vertices under `transform` (see [`GlobalTransform2D::apply`]).
    /// Computed fresh on every call.
    pub fn world_vertices(&self, transform: &GlobalTransform2D) -> Vec<Vec2> {
        self.points.iter().map(|&p| transform.apply(p)).collect()
    }

    /// Contacts delivered by the last notification.
    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    /// Replace the contact list and notify every subscriber.
    ///
    /// Always notifies, even if the new list looks the same as the old one.
    /// Only subscribers run here: the shape's `RigidBody` resolves its
    /// contacts when [`PhysicsWorld::fixed_update`](crate::physics::PhysicsWorld::fixed_update)
    /// publishes them, not through this signal.
    pub fn set_contacts(&mut self, contacts: Vec<Contact>) {
        self.contacts = contacts;
        self.on_contacts_changed.emit(&self.contacts);
    }

    /// Forget the contact list without notifying. Used when the shape leaves
    /// the simulated set so it starts from scratch if it comes back.
    pub(crate) fn clear_contacts(&mut self) {
        self.contacts.clear();
    }

    /// Subscribers to this shape's contact changes.
    pub fn on_contacts_changed(&mut self) -> &mut ContactSignal {
        &mut self.on_contacts_changed
    }
}

impl RigidBody {
    pub(crate) fn state(&self) -> BodyState {
        BodyState {
            velocity: self.linear_velocity,
            mass: self.mass,
            restitution: self.restitution,
        }
    }
}

/// A shape's world-space geometry and body state, captured once per tick.
#[derive(Debug, Clone)]
pub struct ShapeView {
    pub entity: hecs::Entity,
    pub vertices: Vec<Vec2>,
    pub body: Option<BodyState>,
}

impl ShapeView {
    /// Capture `entity`'s shape. `None` if it has no collider or transform.
    pub fn capture(world: &hecs::World, entity: hecs::Entity) -> Option<Self> {
        let collider = world.get::<&PolygonCollider>(entity).ok()?;
        let transform = world.get::<&GlobalTransform2D>(entity).ok()?;
        let body = world.get::<&RigidBody>(entity).ok().map(|rb| rb.state());

        Some(Self {
            entity,
            vertices: collider.world_vertices(&transform),
            body,
        })
    }
}
