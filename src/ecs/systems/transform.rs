//! Transform hierarchy propagation and traversal.

use glam::{Affine2, Vec2};

use crate::ecs::components::transform::{Children, GlobalTransform2D, Parent, Transform2D};

/// Propagate transforms through the Parent/Children hierarchy.
///
/// Phase 1: Update root entities (no Parent) - GlobalTransform2D = Transform2D.to_affine()
/// Phase 2: Recursively propagate through Children hierarchy.
pub fn transform_system(world: &mut hecs::World) {
    // Phase 1: entities without a Parent take their local transform as-is.
    // Gather them before writing so the query borrow is released.
    let roots: Vec<(hecs::Entity, Affine2)> = world
        .query_mut::<hecs::Without<(&Transform2D, &GlobalTransform2D), &Parent>>()
        .into_iter()
        .map(|(entity, (transform, _))| (entity, transform.to_affine()))
        .collect();

    for (entity, affine) in &roots {
        if let Ok(mut global) = world.get::<&mut GlobalTransform2D>(*entity) {
            global.0 = *affine;
        }
    }

    // Phase 2: walk down from every root that owns children.
    for (entity, parent_affine) in roots {
        if world.satisfies::<&Children>(entity).unwrap_or(false) {
            propagate_children(world, entity, parent_affine);
        }
    }
}

/// Recursively propagate GlobalTransform2D to children.
fn propagate_children(world: &mut hecs::World, parent: hecs::Entity, parent_global: Affine2) {
    // Cloned so the world can be mutated while iterating.
    let children = match world.get::<&Children>(parent) {
        Ok(c) => c.0.clone(),
        Err(_) => return,
    };

    for child in children {
        // A child without its own Transform2D sits exactly on its parent.
        let child_global = match world.get::<&Transform2D>(child) {
            Ok(transform) => parent_global * transform.to_affine(),
            Err(_) => parent_global,
        };

        if let Ok(mut global) = world.get::<&mut GlobalTransform2D>(child) {
            global.0 = child_global;
        }

        // Grandchildren
        if world.satisfies::<&Children>(child).unwrap_or(false) {
            propagate_children(world, child, child_global);
        }
    }
}

/// List `root` and its descendants that carry a `T` component.
///
/// Depth-first, parent before children, children in attachment order.
pub fn collect_subtree<T: hecs::Component>(
    world: &hecs::World,
    root: hecs::Entity,
) -> Vec<hecs::Entity> {
    let mut found = Vec::new();
    let mut stack = vec![root];

    while let Some(entity) = stack.pop() {
        if world.satisfies::<&T>(entity).unwrap_or(false) {
            found.push(entity);
        }
        if let Ok(children) = world.get::<&Children>(entity) {
            stack.extend(children.0.iter().rev().copied());
        }
    }

    found
}

/// Move an entity by a world-space offset.
///
/// The offset is mapped into the parent's frame before touching the local
/// `Transform2D`, and the cached `GlobalTransform2D` is shifted as well so
/// reads later in the same tick see the new position. Returns `false` when the
/// entity has no transform (or no longer exists).
pub fn translate_world(world: &mut hecs::World, entity: hecs::Entity, delta: Vec2) -> bool {
    let parent_global = world
        .get::<&Parent>(entity)
        .ok()
        .map(|parent| parent.0)
        .and_then(|parent| world.get::<&GlobalTransform2D>(parent).ok().map(|g| *g));

    let local_delta = match parent_global {
        Some(global) => global.0.inverse().transform_vector2(delta),
        None => delta,
    };

    match world.get::<&mut Transform2D>(entity) {
        Ok(mut transform) => transform.position += local_delta,
        Err(_) => return false,
    }

    if let Ok(mut global) = world.get::<&mut GlobalTransform2D>(entity) {
        global.0.translation += delta;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::components::transform::{Children, GlobalTransform2D, Parent, Transform2D};
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_root_entity_propagation() {
        let mut world = hecs::World::new();

        let pos = Vec2::new(1.0, 2.0);
        let entity = world.spawn((Transform2D::from_position(pos), GlobalTransform2D::default()));

        transform_system(&mut world);

        let global = world.get::<&GlobalTransform2D>(entity).unwrap();
        assert_eq!(global.0, Affine2::from_translation(pos));
    }

    #[test]
    fn test_parent_child_propagation() {
        let mut world = hecs::World::new();

        let parent = world.spawn((
            Transform2D::from_position_rotation(Vec2::new(5.0, 0.0), FRAC_PI_2),
            GlobalTransform2D::default(),
        ));
        let child = world.spawn((
            Transform2D::from_position(Vec2::new(1.0, 0.0)),
            GlobalTransform2D::default(),
            Parent(parent),
        ));
        world.insert_one(parent, Children(vec![child])).unwrap();

        transform_system(&mut world);

        // Child's local +X is the parent's rotated +Y.
        let child_global = world.get::<&GlobalTransform2D>(child).unwrap();
        let eps = 1e-5;
        assert!(
            (child_global.position() - Vec2::new(5.0, 1.0)).length() < eps,
            "got {:?}",
            child_global.position()
        );
        assert!((child_global.rotation() - FRAC_PI_2).abs() < eps);
    }

    #[test]
    fn test_collect_subtree_order() {
        struct Marker;

        let mut world = hecs::World::new();
        let root = world.spawn((Transform2D::identity(),));
        let a = world.spawn((Marker, Parent(root)));
        let a1 = world.spawn((Marker, Parent(a)));
        let b = world.spawn((Marker, Parent(root)));
        let unmarked = world.spawn((Parent(root),));
        let b1 = world.spawn((Marker, Parent(unmarked)));
        world.insert_one(root, Children(vec![a, b, unmarked])).unwrap();
        world.insert_one(a, Children(vec![a1])).unwrap();
        world.insert_one(unmarked, Children(vec![b1])).unwrap();

        // Not reachable from root.
        world.spawn((Marker,));

        assert_eq!(collect_subtree::<Marker>(&world, root), vec![a, a1, b, b1]);
        assert_eq!(collect_subtree::<Marker>(&world, a), vec![a, a1]);
    }

    #[test]
    fn test_translate_world_under_rotated_parent() {
        let mut world = hecs::World::new();
        let parent = world.spawn((
            Transform2D::from_position_rotation(Vec2::ZERO, FRAC_PI_2),
            GlobalTransform2D::default(),
        ));
        let child = world.spawn((
            Transform2D::identity(),
            GlobalTransform2D::default(),
            Parent(parent),
        ));
        world.insert_one(parent, Children(vec![child])).unwrap();
        transform_system(&mut world);

        assert!(translate_world(&mut world, child, Vec2::new(0.0, 3.0)));

        let eps = 1e-5;
        // World +Y is the parent's local +X.
        let local = world.get::<&Transform2D>(child).unwrap().position;
        assert!((local - Vec2::new(3.0, 0.0)).length() < eps, "got {:?}", local);

        let cached = world.get::<&GlobalTransform2D>(child).unwrap().position();
        assert!((cached - Vec2::new(0.0, 3.0)).length() < eps);

        transform_system(&mut world);
        let propagated = world.get::<&GlobalTransform2D>(child).unwrap().position();
        assert!((propagated - Vec2::new(0.0, 3.0)).length() < eps);
    }

    #[test]
    fn test_translate_world_missing_entity() {
        let mut world = hecs::World::new();
        let entity = world.spawn((Transform2D::identity(),));
        world.despawn(entity).unwrap();
        assert!(!translate_world(&mut world, entity, Vec2::ONE));
    }
}
