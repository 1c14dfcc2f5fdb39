//! Helpers for building physics scenes in a hecs world.

use crate::ecs::components::physics::{PolygonCollider, RigidBody};
use crate::ecs::components::transform::{Children, GlobalTransform2D, Parent, Transform2D};

/// Spawn a plain scene node, optionally under `parent`.
pub fn spawn_node(
    world: &mut hecs::World,
    parent: Option<hecs::Entity>,
    transform: Transform2D,
) -> Result<hecs::Entity, hecs::NoSuchEntity> {
    let global = GlobalTransform2D::from_transform(&transform);
    let entity = world.spawn((transform, global));
    if let Some(parent) = parent {
        attach_child(world, parent, entity)?;
    }
    Ok(entity)
}

/// Spawn a static shape (no rigid body).
pub fn spawn_shape(
    world: &mut hecs::World,
    parent: Option<hecs::Entity>,
    transform: Transform2D,
    collider: PolygonCollider,
) -> Result<hecs::Entity, hecs::NoSuchEntity> {
    let entity = spawn_node(world, parent, transform)?;
    world.insert_one(entity, collider)?;
    Ok(entity)
}

/// Spawn a shape together with the rigid body that owns it.
pub fn spawn_body(
    world: &mut hecs::World,
    parent: Option<hecs::Entity>,
    transform: Transform2D,
    collider: PolygonCollider,
    body: RigidBody,
) -> Result<hecs::Entity, hecs::NoSuchEntity> {
    let entity = spawn_node(world, parent, transform)?;
    world.insert(entity, (collider, body))?;
    Ok(entity)
}

/// Attach `child` under `parent`, appending it to the parent's children.
pub fn attach_child(
    world: &mut hecs::World,
    parent: hecs::Entity,
    child: hecs::Entity,
) -> Result<(), hecs::NoSuchEntity> {
    if !world.contains(child) {
        return Err(hecs::NoSuchEntity);
    }
    if world.satisfies::<&Children>(parent)? {
        if let Ok(mut children) = world.get::<&mut Children>(parent) {
            children.0.push(child);
        }
    } else {
        world.insert_one(parent, Children(vec![child]))?;
    }
    world.insert_one(child, Parent(parent))
}

/// Remove `child` from its parent, making it a root.
///
/// A detached shape is no longer reachable from the scene root, so the
/// physics step stops seeing it.
pub fn detach_child(world: &mut hecs::World, child: hecs::Entity) {
    let Ok(Parent(parent)) = world.remove_one::<Parent>(child) else {
        return;
    };
    if let Ok(mut children) = world.get::<&mut Children>(parent) {
        children.0.retain(|&c| c != child);
    }
}
