use std::sync::{Arc, Mutex};

use glam::Vec2;
use polyphys::ecs::bridge::{spawn_body, spawn_node, spawn_shape};
use polyphys::ecs::components::physics::{PolygonCollider, RigidBody};
use polyphys::ecs::components::transform::Transform2D;
use polyphys::{PhysicsConfig, PhysicsWorld};

/// Simulated seconds.
const DURATION: f64 = 3.0;
/// Render-side frame time fed to the fixed-step accumulator.
const FRAME_TIME: f64 = 1.0 / 30.0;

struct BounceScene {
    root: hecs::Entity,
    ball: hecs::Entity,
    bounces: Arc<Mutex<u32>>,
}

impl BounceScene {
    fn build(world: &mut hecs::World) -> anyhow::Result<Self> {
        let root = spawn_node(world, None, Transform2D::identity())?;

        // Ground line and two walls
        spawn_shape(
            world,
            Some(root),
            Transform2D::from_position(Vec2::new(0.0, 10.0)),
            PolygonCollider::segment(Vec2::new(-20.0, 0.0), Vec2::new(20.0, 0.0))?,
        )?;
        for x in [-6.0, 6.0] {
            spawn_shape(
                world,
                Some(root),
                Transform2D::from_position(Vec2::new(x, 5.0)),
                PolygonCollider::rectangle(Vec2::new(0.5, 5.0)),
            )?;
        }

        // A hexagon thrown sideways and a crate dropped from above
        let ball = spawn_body(
            world,
            Some(root),
            Transform2D::from_position(Vec2::new(-3.0, 2.0)),
            PolygonCollider::regular(6, 0.5)?,
            RigidBody::new(1.0, 0.6)?.with_velocity(Vec2::new(4.0, 0.0)),
        )?;
        spawn_body(
            world,
            Some(root),
            Transform2D::from_position_rotation(Vec2::new(2.0, 0.0), 0.3),
            PolygonCollider::rectangle(Vec2::splat(0.75)),
            RigidBody::new(4.0, 0.2)?,
        )?;

        let bounces = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&bounces);
        world
            .get::<&mut PolygonCollider>(ball)?
            .on_contacts_changed()
            .subscribe(move |contacts| {
                if contacts.iter().any(|c| c.impulse().is_some_and(|i| i.impulse_magnitude > 0.0)) {
                    if let Ok(mut count) = counter.lock() {
                        *count += 1;
                    }
                }
            });

        Ok(Self {
            root,
            ball,
            bounces,
        })
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut world = hecs::World::new();
    let scene = BounceScene::build(&mut world)?;

    let config = PhysicsConfig::default();
    log::info!(
        "gravity {:?}, fixed timestep {:.4}s",
        config.gravity,
        config.fixed_timestep
    );
    let mut physics = PhysicsWorld::new(config);
    physics.attach(scene.root);

    let frames = (DURATION / FRAME_TIME).round() as u32;
    for frame in 0..frames {
        let report = physics.step(&mut world, FRAME_TIME);
        if report.notifications > 0 {
            log::debug!(
                "frame {frame}: {} collisions, {} notifications",
                report.collisions,
                report.notifications
            );
        }

        if frame % 15 == 0 {
            let position = world.get::<&Transform2D>(scene.ball)?.position;
            let velocity = world.get::<&RigidBody>(scene.ball)?.linear_velocity;
            log::info!(
                "t={:.2}s ball at ({:.2}, {:.2}) moving ({:.2}, {:.2})",
                f64::from(frame) * FRAME_TIME,
                position.x,
                position.y,
                velocity.x,
                velocity.y
            );
        }
    }

    let bounces = scene
        .bounces
        .lock()
        .map_err(|_| anyhow::anyhow!("bounce counter poisoned"))?;
    log::info!("ball bounced {} times in {DURATION}s", *bounces);
    Ok(())
}
