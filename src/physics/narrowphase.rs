//! Narrowphase collision detection: Separating Axis Theorem for convex polygons.

use glam::Vec2;
use tracing::warn;

use super::collider::ShapeView;
use super::contact::{create_contact_pair, Contact, ContactInfo};

/// Overlaps closer than this count as equal; the earlier axis wins.
const AXIS_TIE_TOLERANCE: f32 = 1e-5;

/// Unit edge normals of a polygon, in edge order.
///
/// Edge `i` runs from `v[i]` to `v[(i + 1) % n]`; its axis is the edge rotated
/// by 90 degrees. Zero-length edges yield `None`.
pub fn edge_axes(vertices: &[Vec2]) -> impl Iterator<Item = Option<Vec2>> + '_ {
    let n = vertices.len();
    (0..n).map(move |i| {
        let edge = vertices[(i + 1) % n] - vertices[i];
        let axis = edge.perp().normalize_or_zero();
        (axis != Vec2::ZERO).then_some(axis)
    })
}

/// Project vertices onto `axis`, returning `(min, max)`.
pub fn project(vertices: &[Vec2], axis: Vec2) -> (f32, f32) {
    vertices
        .iter()
        .map(|v| v.dot(axis))
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(min, max), p| {
            (min.min(p), max.max(p))
        })
}

/// Average of the vertices.
fn center(vertices: &[Vec2]) -> Vec2 {
    vertices.iter().copied().sum::<Vec2>() / vertices.len() as f32
}

/// SAT test between two convex polygons given in world space.
///
/// Returns `None` as soon as a separating axis is found. Otherwise the
/// returned normal is the axis of least overlap, pointing from `b` toward
/// `a`, and the depth is that overlap. Touching polygons collide with zero
/// depth. Axes are tried in order: `a`'s edges, then `b`'s.
pub fn sat_polygons(a: &[Vec2], b: &[Vec2]) -> Option<ContactInfo> {
    if a.is_empty() || b.is_empty() {
        return None;
    }

    let mut best: Option<(f32, Vec2)> = None;

    for axis in edge_axes(a).chain(edge_axes(b)).flatten() {
        let (min_a, max_a) = project(a, axis);
        let (min_b, max_b) = project(b, axis);

        if max_a < min_b || max_b < min_a {
            return None;
        }

        // Distance either projection must move to stop overlapping.
        let overlap = (max_a - min_b).min(max_b - min_a);
        if !overlap.is_finite() {
            continue;
        }
        match best {
            Some((depth, _)) if overlap >= depth - AXIS_TIE_TOLERANCE => {}
            _ => best = Some((overlap, axis)),
        }
    }

    let Some((depth, mut normal)) = best else {
        warn!("no usable axis between polygons, skipping degenerate pair");
        return None;
    };

    // Point the normal from b's center toward a's.
    if (center(a) - center(b)).dot(normal) < 0.0 {
        normal = -normal;
    }

    Some(ContactInfo {
        normal,
        depth: depth.max(0.0),
    })
}

/// Detect a collision between two captured shapes and build both contacts:
/// `a`'s view first, then its mirror for `b`.
pub fn detect_contact(a: &ShapeView, b: &ShapeView) -> Option<(Contact, Contact)> {
    let info = sat_polygons(&a.vertices, &b.vertices)?;
    Some(create_contact_pair(
        info,
        a.entity,
        b.entity,
        a.body.as_ref(),
        b.body.as_ref(),
    ))
}
