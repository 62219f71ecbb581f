//! Basic vector math helper functions.
//! Small helpers for planar (x,z) distances, directions and headings.
use glam::{Vec2, Vec3};

/// Projects a world position onto the horizontal (x,z) plane.
#[must_use]
pub fn planar(position: Vec3) -> Vec2 {
    Vec2::new(position.x, position.z)
}

/// Returns the horizontal distance between two world positions.
///
/// # Examples
/// ```
/// use glam::Vec3;
/// use echoes::vector_math::planar_distance;
/// let d = planar_distance(Vec3::new(0.0, 5.0, 0.0), Vec3::new(3.0, -2.0, 4.0));
/// assert!((d - 5.0).abs() < f32::EPSILON);
/// ```
#[must_use]
pub fn planar_distance(a: Vec3, b: Vec3) -> f32 {
    planar(a).distance(planar(b))
}

/// Returns the unit vector in the direction of the supplied components.
///
/// Non-finite input or the zero vector yields `Vec2::ZERO` so callers can
/// treat it as "no movement".
///
/// # Examples
///
/// ```
/// use glam::Vec2;
/// use echoes::vec_normalize;
/// let n = vec_normalize(Vec2::new(3.0, 4.0));
/// assert!((n.x - 0.6).abs() < 1e-6);
/// assert!((n.y - 0.8).abs() < 1e-6);
/// assert_eq!(vec_normalize(Vec2::ZERO), Vec2::ZERO);
/// ```
#[must_use]
pub fn vec_normalize(vector: Vec2) -> Vec2 {
    if !vector.is_finite() {
        return Vec2::ZERO;
    }
    vector.try_normalize().unwrap_or(Vec2::ZERO)
}

/// Heading angle of a planar direction, measured from +z towards +x.
///
/// Matches the convention `facing = atan2(dx, dz)`, so a heading of zero
/// looks down +z and `(sin h, cos h)` recovers the direction.
#[must_use]
pub fn heading(direction: Vec2) -> f32 {
    direction.x.atan2(direction.y)
}

/// Unit planar direction for a heading produced by [`heading`].
#[must_use]
pub fn heading_direction(angle: f32) -> Vec2 {
    Vec2::new(angle.sin(), angle.cos())
}
