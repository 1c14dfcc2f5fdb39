//! Contact data structures for collision response.

use glam::Vec2;

/// Narrowphase result for an ordered pair of shapes (A, B).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactInfo {
    /// Separating axis, unit length, pointing from B toward A.
    pub normal: Vec2,
    /// Penetration depth along `normal`. Never negative.
    pub depth: f32,
}

/// Velocity data a shape's rigid body contributes to a contact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyState {
    pub velocity: Vec2,
    pub mass: f32,
    pub restitution: f32,
}

impl BodyState {
    fn inverse_mass(&self) -> f32 {
        1.0 / self.mass
    }
}

/// Impulse data frozen when a contact is created.
///
/// Shared unchanged by both sides of a contact so resolution order within a
/// tick does not matter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactImpulse {
    /// Velocity of the other shape minus velocity of the current shape.
    pub relative_velocity: Vec2,
    /// Smallest restitution among the bodies involved.
    pub restitution: f32,
    /// Impulse applied along the contact normal. Never negative.
    pub impulse_magnitude: f32,
}

/// One shape's view of an overlap with another shape.
///
/// The normal always points from `other` toward `current`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Contact {
    /// Neither shape owns a rigid body.
    Plain {
        current: hecs::Entity,
        other: hecs::Entity,
        info: ContactInfo,
    },
    /// At least one shape owns a rigid body.
    WithBodies {
        current: hecs::Entity,
        other: hecs::Entity,
        info: ContactInfo,
        impulse: ContactImpulse,
    },
}

impl Contact {
    pub fn current(&self) -> hecs::Entity {
        match *self {
            Contact::Plain { current, .. } | Contact::WithBodies { current, .. } => current,
        }
    }

    pub fn other(&self) -> hecs::Entity {
        match *self {
            Contact::Plain { other, .. } | Contact::WithBodies { other, .. } => other,
        }
    }

    pub fn info(&self) -> ContactInfo {
        match *self {
            Contact::Plain { info, .. } | Contact::WithBodies { info, .. } => info,
        }
    }

    pub fn depth(&self) -> f32 {
        self.info().depth
    }

    pub fn normal(&self) -> Vec2 {
        self.info().normal
    }

    /// Frozen impulse data, if this contact is mass-aware.
    pub fn impulse(&self) -> Option<ContactImpulse> {
        match *self {
            Contact::Plain { .. } => None,
            Contact::WithBodies { impulse, .. } => Some(impulse),
        }
    }

    pub fn is_mass_aware(&self) -> bool {
        matches!(self, Contact::WithBodies { .. })
    }

    /// The same contact seen from the other shape: normal negated, shapes
    /// swapped, impulse data carried over untouched.
    pub fn opposite(&self) -> Contact {
        let flip = |info: ContactInfo| ContactInfo {
            normal: -info.normal,
            depth: info.depth,
        };
        match *self {
            Contact::Plain {
                current,
                other,
                info,
            } => Contact::Plain {
                current: other,
                other: current,
                info: flip(info),
            },
            Contact::WithBodies {
                current,
                other,
                info,
                impulse,
            } => Contact::WithBodies {
                current: other,
                other: current,
                info: flip(info),
                impulse,
            },
        }
    }
}

/// Build the contact for shape `a` colliding with shape `b`.
///
/// `info.normal` must point from `b` toward `a`. A shape without a body is
/// immovable: it contributes no velocity, no inverse mass and does not limit
/// restitution.
pub fn create_contact(
    info: ContactInfo,
    a: hecs::Entity,
    b: hecs::Entity,
    body_a: Option<&BodyState>,
    body_b: Option<&BodyState>,
) -> Contact {
    if body_a.is_none() && body_b.is_none() {
        return Contact::Plain {
            current: a,
            other: b,
            info,
        };
    }

    let velocity = |body: Option<&BodyState>| body.map_or(Vec2::ZERO, |b| b.velocity);
    let inverse_mass = |body: Option<&BodyState>| body.map_or(0.0, BodyState::inverse_mass);

    let relative_velocity = velocity(body_b) - velocity(body_a);
    let restitution = body_a
        .into_iter()
        .chain(body_b)
        .map(|b| b.restitution)
        .fold(f32::INFINITY, f32::min);
    let inverse_mass_sum = inverse_mass(body_a) + inverse_mass(body_b);

    // Closing speed along the normal; positive while the shapes approach.
    let closing_speed = relative_velocity.dot(info.normal);
    let impulse_magnitude = ((1.0 + restitution) * closing_speed / inverse_mass_sum).max(0.0);

    Contact::WithBodies {
        current: a,
        other: b,
        info,
        impulse: ContactImpulse {
            relative_velocity,
            restitution,
            impulse_magnitude,
        },
    }
}

/// Build both sides of a contact: `a`'s view and its mirror for `b`.
pub fn create_contact_pair(
    info: ContactInfo,
    a: hecs::Entity,
    b: hecs::Entity,
    body_a: Option<&BodyState>,
    body_b: Option<&BodyState>,
) -> (Contact, Contact) {
    let contact = create_contact(info, a, b, body_a, body_b);
    let mirrored = contact.opposite();
    (contact, mirrored)
}
