//! Physics components for ECS entities.

use glam::Vec2;

use crate::error::{Error, Result};
use crate::physics::contact::Contact;
use crate::physics::event::ContactSignal;

/// Convex polygon collision shape.
///
/// Points are in the entity's local space; the world transform is read from
/// the entity's `GlobalTransform2D` at detection time. Winding is not
/// enforced but must be consistent.
#[derive(Debug)]
pub struct PolygonCollider {
    pub(crate) points: Vec<Vec2>,
    /// Contacts from the last tick in which the set of partners changed.
    pub(crate) contacts: Vec<Contact>,
    pub(crate) on_contacts_changed: ContactSignal,
}

impl PolygonCollider {
    /// Create a polygon from at least three local points.
    pub fn new(points: Vec<Vec2>) -> Result<Self> {
        if points.len() < 3 {
            return Err(Error::InvalidGeometry {
                points: points.len(),
            });
        }
        Ok(Self::from_points(points))
    }

    /// Two-point line collider. Its two edges give opposite normals, which is
    /// all SAT needs for a flat surface.
    pub fn segment(a: Vec2, b: Vec2) -> Result<Self> {
        if a == b {
            return Err(Error::InvalidGeometry { points: 1 });
        }
        Ok(Self::from_points(vec![a, b]))
    }

    /// Axis-aligned rectangle centred on the origin.
    pub fn rectangle(half_extents: Vec2) -> Self {
        let Vec2 { x, y } = half_extents;
        Self::from_points(vec![
            Vec2::new(-x, -y),
            Vec2::new(-x, y),
            Vec2::new(x, y),
            Vec2::new(x, -y),
        ])
    }

    /// Regular polygon with `sides` vertices on a circle of `radius`.
    pub fn regular(sides: usize, radius: f32) -> Result<Self> {
        if sides < 3 {
            return Err(Error::InvalidGeometry { points: sides });
        }
        let step = std::f32::consts::TAU / sides as f32;
        let points = (0..sides)
            .map(|i| Vec2::from_angle(step * i as f32) * radius)
            .collect();
        Ok(Self::from_points(points))
    }

    fn from_points(points: Vec<Vec2>) -> Self {
        Self {
            points,
            contacts: Vec::new(),
            on_contacts_changed: ContactSignal::default(),
        }
    }
}

/// Rigid body component. Lives on the same entity as its `PolygonCollider`.
///
/// Entities whose shape carries no `RigidBody` are static and behave as if
/// their mass were infinite.
#[derive(Debug, Clone, PartialEq)]
pub struct RigidBody {
    pub(crate) mass: f32,
    pub(crate) restitution: f32,
    pub linear_velocity: Vec2,
}

impl RigidBody {
    /// Create a body at rest.
    ///
    /// `mass` must be finite and positive, `restitution` within `[0, 1]`
    /// (0 = fully inelastic, 1 = fully elastic).
    pub fn new(mass: f32, restitution: f32) -> Result<Self> {
        if !(mass.is_finite() && mass > 0.0) {
            return Err(Error::InvalidMass(mass));
        }
        if !(0.0..=1.0).contains(&restitution) {
            return Err(Error::InvalidRestitution(restitution));
        }
        Ok(Self {
            mass,
            restitution,
            linear_velocity: Vec2::ZERO,
        })
    }

    /// Set the initial velocity.
    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.linear_velocity = velocity;
        self
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }

    pub fn restitution(&self) -> f32 {
        self.restitution
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polygon_needs_three_points() {
        let err = PolygonCollider::new(vec![Vec2::ZERO, Vec2::X]).unwrap_err();
        assert_eq!(err, Error::InvalidGeometry { points: 2 });

        let ok = PolygonCollider::new(vec![Vec2::ZERO, Vec2::X, Vec2::Y]).unwrap();
        assert_eq!(ok.points.len(), 3);
        assert!(ok.contacts.is_empty());
    }

    #[test]
    fn test_segment_rejects_identical_endpoints() {
        assert!(PolygonCollider::segment(Vec2::ZERO, Vec2::X).is_ok());
        assert_eq!(
            PolygonCollider::segment(Vec2::ONE, Vec2::ONE).unwrap_err(),
            Error::InvalidGeometry { points: 1 }
        );
    }

    #[test]
    fn test_rectangle_points() {
        let rect = PolygonCollider::rectangle(Vec2::new(2.0, 1.0));
        assert_eq!(
            rect.points,
            vec![
                Vec2::new(-2.0, -1.0),
                Vec2::new(-2.0, 1.0),
                Vec2::new(2.0, 1.0),
                Vec2::new(2.0, -1.0),
            ]
        );
    }

    #[test]
    fn test_regular_polygon() {
        let hex = PolygonCollider::regular(6, 2.0).unwrap();
        assert_eq!(hex.points.len(), 6);
        for p in &hex.points {
            assert!((p.length() - 2.0).abs() < 1e-5);
        }
        assert!(PolygonCollider::regular(2, 1.0).is_err());
    }

    #[test]
    fn test_rigid_body_validation() {
        assert_eq!(RigidBody::new(0.0, 0.5), Err(Error::InvalidMass(0.0)));
        assert_eq!(RigidBody::new(-2.0, 0.5), Err(Error::InvalidMass(-2.0)));
        assert!(matches!(
            RigidBody::new(f32::NAN, 0.5),
            Err(Error::InvalidMass(_))
        ));
        assert!(matches!(
            RigidBody::new(f32::INFINITY, 0.5),
            Err(Error::InvalidMass(_))
        ));
        assert_eq!(
            RigidBody::new(1.0, 1.5),
            Err(Error::InvalidRestitution(1.5))
        );

        let body = RigidBody::new(2.0, 1.0)
            .unwrap()
            .with_velocity(Vec2::new(1.0, 0.0));
        assert_eq!(body.mass(), 2.0);
        assert_eq!(body.restitution(), 1.0);
        assert_eq!(body.linear_velocity, Vec2::X);
    }
}
