//! CPU physics for convex polygons: SAT collision detection, contact
//! resolution and rigid body integration.
//!
//! # Architecture
//!
//! Every fixed tick, while attached to a scene:
//!
//! 1. Propagate transforms
//! 2. Collect the shapes reachable from the scene root
//! 3. Narrowphase collision detection (SAT) over every pair of shapes
//! 4. Publish new contact lists to shapes whose set of partners changed, and
//!    let each shape's rigid body resolve them (position correction + impulse)
//! 5. Integrate rigid bodies under gravity
//!
//! A body therefore cycles through integrate → detect → resolve: contacts are
//! found against the positions produced by the previous tick's integration.

pub mod collider;
pub mod contact;
pub mod event;
pub mod narrowphase;
pub mod rigid_body;

use std::collections::HashSet;
use std::fmt;
use std::ops::AddAssign;

use glam::Vec2;
use tracing::{debug, trace, warn};

use crate::ecs::components::physics::PolygonCollider;
use crate::ecs::systems::{collect_subtree, transform_system};

use self::collider::ShapeView;
use self::contact::Contact;
use self::narrowphase::detect_contact;

/// Gravity applied to every body: 9.81 units/s² along +Y, the engine's "down".
pub const DEFAULT_GRAVITY: Vec2 = Vec2::new(0.0, 9.81);

/// Configuration for the physics simulation.
#[derive(Debug, Clone)]
pub struct PhysicsConfig {
    /// Gravity vector. Default: (0, 9.81).
    pub gravity: Vec2,
    /// Fixed timestep used by [`PhysicsWorld::step`], in seconds. Default: 1/60.
    pub fixed_timestep: f64,
    /// Maximum number of fixed ticks per [`PhysicsWorld::step`]. Default: 4.
    pub max_substeps: u32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: DEFAULT_GRAVITY,
            fixed_timestep: 1.0 / 60.0,
            max_substeps: 4,
        }
    }
}

/// Whether the physics world is attached to a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhysicsState {
    /// Not attached; ticks do nothing.
    Idle,
    /// Attached; ticks run the full pipeline.
    Running,
}

/// Enumerates the shapes taking part in a tick.
pub type ShapeProvider = Box<dyn Fn(&hecs::World) -> Vec<hecs::Entity>>;

enum ShapeSource {
    /// Every shape in the subtree under this root.
    Subtree(hecs::Entity),
    Custom(ShapeProvider),
}

impl ShapeSource {
    fn collect(&self, world: &hecs::World) -> Vec<hecs::Entity> {
        match self {
            ShapeSource::Subtree(root) => collect_subtree::<PolygonCollider>(world, *root),
            ShapeSource::Custom(provider) => provider(world),
        }
    }
}

impl fmt::Debug for ShapeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeSource::Subtree(root) => f.debug_tuple("Subtree").field(root).finish(),
            ShapeSource::Custom(_) => f.write_str("Custom"),
        }
    }
}

/// Counters describing what a tick did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepReport {
    /// Fixed ticks executed.
    pub ticks: u32,
    /// Shapes collected (summed over ticks).
    pub shapes: usize,
    /// Shape pairs run through SAT.
    pub pairs_tested: usize,
    /// Pairs found colliding.
    pub collisions: usize,
    /// Contact-change notifications fired.
    pub notifications: usize,
}

impl AddAssign for StepReport {
    fn add_assign(&mut self, rhs: Self) {
        self.ticks += rhs.ticks;
        self.shapes += rhs.shapes;
        self.pairs_tested += rhs.pairs_tested;
        self.collisions += rhs.collisions;
        self.notifications += rhs.notifications;
    }
}

/// The main physics world managing simulation state.
///
/// Holds no shapes of its own: they are discovered from the scene on every
/// tick. A shape that drops out of the collected set has its contact list
/// cleared, so nothing it saw before is reused once it comes back.
#[derive(Debug)]
pub struct PhysicsWorld {
    config: PhysicsConfig,
    accumulator: f64,
    source: Option<ShapeSource>,
    /// Shapes collected by the last tick.
    tracked: Vec<hecs::Entity>,
    /// Set by attach: the next tick clears every tracked shape.
    resync: bool,
}

impl PhysicsWorld {
    /// Create an idle physics world with the given configuration.
    pub fn new(config: PhysicsConfig) -> Self {
        Self {
            config,
            accumulator: 0.0,
            source: None,
            tracked: Vec::new(),
            resync: false,
        }
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    pub fn state(&self) -> PhysicsState {
        match self.source {
            Some(_) => PhysicsState::Running,
            None => PhysicsState::Idle,
        }
    }

    /// Start simulating every shape under `root`.
    pub fn attach(&mut self, root: hecs::Entity) {
        debug!(?root, "physics attached to scene root");
        self.source = Some(ShapeSource::Subtree(root));
        self.resync = true;
    }

    /// Start simulating the shapes returned by `provider`, in its order.
    pub fn attach_with<F>(&mut self, provider: F)
    where
        F: Fn(&hecs::World) -> Vec<hecs::Entity> + 'static,
    {
        debug!("physics attached to custom shape provider");
        self.source = Some(ShapeSource::Custom(Box::new(provider)));
        self.resync = true;
    }

    /// Stop simulating. Later ticks do nothing until re-attached; the first
    /// tick after that starts every shape from an empty contact list.
    pub fn detach(&mut self) {
        if self.source.take().is_some() {
            debug!("physics detached");
        }
        self.accumulator = 0.0;
    }

    /// Step the physics simulation forward by `delta_time` seconds.
    ///
    /// Uses a fixed timestep accumulator so results do not depend on frame
    /// rate.
    pub fn step(&mut self, world: &mut hecs::World, delta_time: f64) -> StepReport {
        let mut report = StepReport::default();
        if self.source.is_none() {
            return report;
        }

        self.accumulator += delta_time;

        let mut substeps = 0u32;
        while self.accumulator >= self.config.fixed_timestep && substeps < self.config.max_substeps
        {
            report += self.fixed_update(world, self.config.fixed_timestep as f32);
            self.accumulator -= self.config.fixed_timestep;
            substeps += 1;
        }

        // Clamp accumulator to avoid spiral of death
        if self.accumulator > self.config.fixed_timestep * self.config.max_substeps as f64 {
            warn!(
                backlog = self.accumulator,
                "physics falling behind, dropping accumulated time"
            );
            self.accumulator = 0.0;
        }

        report
    }

    /// Run one fixed tick of `dt` seconds. Does nothing while idle.
    pub fn fixed_update(&mut self, world: &mut hecs::World, dt: f32) -> StepReport {
        let Some(source) = &self.source else {
            return StepReport::default();
        };

        // 1. Propagate transforms
        transform_system(world);

        // 2. Collect shapes
        let shapes: Vec<ShapeView> = source
            .collect(world)
            .into_iter()
            .filter_map(|entity| ShapeView::capture(world, entity))
            .collect();
        let entities: Vec<hecs::Entity> = shapes.iter().map(|s| s.entity).collect();
        self.forget_departed(world, &entities);

        let mut report = StepReport {
            ticks: 1,
            shapes: shapes.len(),
            ..StepReport::default()
        };

        // 3. Narrowphase over every pair
        let mut found: Vec<Vec<Contact>> = vec![Vec::new(); shapes.len()];
        for i in 0..shapes.len() {
            for j in (i + 1)..shapes.len() {
                report.pairs_tested += 1;
                if let Some((contact, mirrored)) = detect_contact(&shapes[i], &shapes[j]) {
                    found[i].push(contact);
                    found[j].push(mirrored);
                    report.collisions += 1;
                }
            }
        }

        // 4. Publish changed contact lists and resolve them
        for (shape, contacts) in shapes.iter().zip(found) {
            if publish_contacts(world, shape.entity, contacts) {
                report.notifications += 1;
            }
        }

        // 5. Integrate bodies
        rigid_body::integrate_bodies(world, &entities, self.config.gravity, dt);

        trace!(
            shapes = report.shapes,
            pairs = report.pairs_tested,
            collisions = report.collisions,
            notifications = report.notifications,
            "physics tick"
        );
        report
    }
}

impl PhysicsWorld {
    /// Clear the contacts of shapes collected last tick that are gone now
    /// (or of all of them right after an attach), then track `current`.
    fn forget_departed(&mut self, world: &mut hecs::World, current: &[hecs::Entity]) {
        let present: HashSet<hecs::Entity> = current.iter().copied().collect();
        for entity in self.tracked.drain(..) {
            if !self.resync && present.contains(&entity) {
                continue;
            }
            if let Ok(mut collider) = world.get::<&mut PolygonCollider>(entity) {
                if !collider.contacts().is_empty() {
                    debug!(?entity, "shape left the simulation, contacts cleared");
                    collider.clear_contacts();
                }
            }
        }
        self.resync = false;
        self.tracked.extend_from_slice(current);
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new(PhysicsConfig::default())
    }
}

/// Replace `entity`'s contacts if its set of partners changed, notify its
/// subscribers and let its body resolve them. Returns whether a
/// notification fired.
fn publish_contacts(world: &mut hecs::World, entity: hecs::Entity, contacts: Vec<Contact>) -> bool {
    let unchanged = match world.get::<&PolygonCollider>(entity) {
        Ok(collider) => same_partners(collider.contacts(), &contacts),
        Err(_) => return false,
    };
    if unchanged {
        return false;
    }

    debug!(?entity, contacts = contacts.len(), "contacts changed");

    let delivered = contacts.clone();
    match world.get::<&mut PolygonCollider>(entity) {
        Ok(mut collider) => collider.set_contacts(contacts),
        Err(_) => return false,
    }
    rigid_body::resolve_contacts(world, entity, &delivered);
    true
}

/// Whether two contact lists touch the same set of other shapes.
fn same_partners(previous: &[Contact], next: &[Contact]) -> bool {
    let previous: HashSet<hecs::Entity> = previous.iter().map(Contact::other).collect();
    let next: HashSet<hecs::Entity> = next.iter().map(Contact::other).collect();
    previous == next
}
