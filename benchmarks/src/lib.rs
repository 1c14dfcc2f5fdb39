//! Scene builders shared by the physics benchmarks.

use glam::Vec2;
use polyphys::ecs::bridge::{spawn_body, spawn_node, spawn_shape};
use polyphys::ecs::components::physics::{PolygonCollider, RigidBody};
use polyphys::ecs::components::transform::Transform2D;
use polyphys::physics::collider::ShapeView;
use polyphys::{PhysicsConfig, PhysicsWorld};

/// Deterministic pseudo-random sequence in `[0, 1)` (xorshift).
pub struct XorShift(u32);

impl XorShift {
    pub fn new(seed: u32) -> Self {
        Self(seed.max(1))
    }

    pub fn next_f32(&mut self) -> f32 {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 17;
        self.0 ^= self.0 << 5;
        (self.0 >> 8) as f32 / (1u32 << 24) as f32
    }
}

/// World-space vertices of a regular polygon centered at `center`.
pub fn regular_vertices(sides: usize, radius: f32, center: Vec2, angle: f32) -> Vec<Vec2> {
    let step = std::f32::consts::TAU / sides as f32;
    (0..sides)
        .map(|i| center + Vec2::from_angle(angle + step * i as f32) * radius)
        .collect()
}

/// `n` falling boxes over a ground segment, spread on a grid with jitter so
/// neighbours overlap now and then. Returns the world and the scene root.
pub fn build_scene(n: usize) -> (hecs::World, hecs::Entity) {
    let mut world = hecs::World::new();
    let mut rng = XorShift::new(0x5eed);

    let root = spawn_node(&mut world, None, Transform2D::identity()).expect("spawn root");
    let ground = PolygonCollider::segment(Vec2::new(-1000.0, 0.0), Vec2::new(1000.0, 0.0))
        .expect("ground segment");
    spawn_shape(&mut world, Some(root), Transform2D::identity(), ground).expect("spawn ground");

    let columns = (n as f32).sqrt().ceil().max(1.0) as usize;
    for i in 0..n {
        let x = (i % columns) as f32 * 1.8 + rng.next_f32() * 0.4;
        let y = -((i / columns) as f32 * 1.8) - 1.0 - rng.next_f32() * 0.4;
        let body = RigidBody::new(1.0 + rng.next_f32(), 0.5).expect("body");
        spawn_body(
            &mut world,
            Some(root),
            Transform2D::from_position_rotation(Vec2::new(x, y), rng.next_f32()),
            PolygonCollider::rectangle(Vec2::splat(0.5)),
            body,
        )
        .expect("spawn body");
    }

    (world, root)
}

/// [`build_scene`] with a physics world already attached to it.
pub fn setup_scene(n: usize) -> (hecs::World, PhysicsWorld) {
    let (world, root) = build_scene(n);
    let mut physics = PhysicsWorld::new(PhysicsConfig::default());
    physics.attach(root);
    (world, physics)
}

/// Captured views for every shape in a scene, ready for narrowphase.
pub fn capture_views(world: &mut hecs::World, root: hecs::Entity) -> Vec<ShapeView> {
    polyphys::transform_system(world);
    polyphys::collect_subtree::<PolygonCollider>(world, root)
        .into_iter()
        .filter_map(|entity| ShapeView::capture(world, entity))
        .collect()
}
