//! Transform components for ECS entities.

use glam::{Affine2, Vec2};

/// Local-space transform. Stores position, rotation, and scale separately.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform2D {
    pub position: Vec2,
    /// Planar rotation in radians.
    pub rotation: f32,
    pub scale: Vec2,
}

impl Transform2D {
    /// Create an identity transform.
    pub fn identity() -> Self {
        Self {
            position: Vec2::ZERO,
            rotation: 0.0,
            scale: Vec2::ONE,
        }
    }

    /// Create a transform from a position.
    pub fn from_position(position: Vec2) -> Self {
        Self {
            position,
            ..Self::identity()
        }
    }

    /// Create a transform from a position and a rotation.
    pub fn from_position_rotation(position: Vec2, rotation: f32) -> Self {
        Self {
            position,
            rotation,
            scale: Vec2::ONE,
        }
    }

    /// Convert to an affine transform (translation * rotation * scale).
    pub fn to_affine(&self) -> Affine2 {
        Affine2::from_scale_angle_translation(self.scale, self.rotation, self.position)
    }
}

impl Default for Transform2D {
    fn default() -> Self {
        Self::identity()
    }
}

/// World-space transform. Updated every tick by `transform_system`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlobalTransform2D(pub Affine2);

impl GlobalTransform2D {
    pub fn from_transform(transform: &Transform2D) -> Self {
        Self(transform.to_affine())
    }

    /// World position.
    pub fn position(&self) -> Vec2 {
        self.0.translation
    }

    /// World rotation in radians.
    pub fn rotation(&self) -> f32 {
        let (_, angle, _) = self.0.to_scale_angle_translation();
        angle
    }

    /// World scale.
    pub fn scale(&self) -> Vec2 {
        let (scale, _, _) = self.0.to_scale_angle_translation();
        scale
    }

    /// Map a local point to world space: scale, then rotate, then translate.
    ///
    /// Uses the decomposed position/rotation/scale rather than the raw matrix,
    /// so any shear picked up from a non-uniformly scaled parent is dropped.
    pub fn apply(&self, local: Vec2) -> Vec2 {
        let (scale, angle, translation) = self.0.to_scale_angle_translation();
        translation + Vec2::from_angle(angle).rotate(local * scale)
    }
}

impl Default for GlobalTransform2D {
    fn default() -> Self {
        Self(Affine2::IDENTITY)
    }
}

/// Reference to a parent entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parent(pub hecs::Entity);

/// List of child entities, in attachment order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Children(pub Vec<hecs::Entity>);

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_identity() {
        let t = Transform2D::identity();
        assert_eq!(t.position, Vec2::ZERO);
        assert_eq!(t.rotation, 0.0);
        assert_eq!(t.scale, Vec2::ONE);
        assert_eq!(t.to_affine(), Affine2::IDENTITY);
    }

    #[test]
    fn test_global_decomposition() {
        let t = Transform2D {
            position: Vec2::new(3.0, -2.0),
            rotation: 0.5,
            scale: Vec2::new(2.0, 0.5),
        };
        let global = GlobalTransform2D::from_transform(&t);

        let eps = 1e-5;
        assert!((global.position() - t.position).length() < eps);
        assert!((global.rotation() - t.rotation).abs() < eps);
        assert!((global.scale() - t.scale).length() < eps);
    }

    #[test]
    fn test_apply_scales_before_rotating() {
        let t = Transform2D {
            position: Vec2::new(10.0, 0.0),
            rotation: FRAC_PI_2,
            scale: Vec2::new(2.0, 1.0),
        };
        let global = GlobalTransform2D::from_transform(&t);

        // (1, 0) -> scaled (2, 0) -> rotated (0, 2) -> translated (10, 2)
        let p = global.apply(Vec2::X);
        let eps = 1e-5;
        assert!((p - Vec2::new(10.0, 2.0)).length() < eps, "got {:?}", p);
    }

    #[test]
    fn test_global_transform_default() {
        let gt = GlobalTransform2D::default();
        assert_eq!(gt.0, Affine2::IDENTITY);
        assert_eq!(gt.position(), Vec2::ZERO);
    }
}
