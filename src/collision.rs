//! Axis-aligned collision primitives shared by the player and enemies.
//!
//! Boxes are described by their min and max corners. Overlap is strict, so
//! two boxes that merely share a face are considered apart; this is what lets
//! [`Aabb::push_out`] leave a resolved pair in a non-overlapping state.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Direction chosen when resolving a penetration, in tie-break order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushDirection {
    /// Towards -x.
    Left,
    /// Towards +x.
    Right,
    /// Towards -z.
    Front,
    /// Towards +z.
    Back,
}

/// Picks the smallest of the four penetrations.
///
/// Ties resolve left, right, front, back.
fn min_penetration(left: f32, right: f32, front: f32, back: f32) -> PushDirection {
    let m = left.min(right).min(front).min(back);
    if left <= m {
        PushDirection::Left
    } else if right <= m {
        PushDirection::Right
    } else if front <= m {
        PushDirection::Front
    } else {
        PushDirection::Back
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// Corner with the smallest coordinates.
    pub min: Vec3,
    /// Corner with the largest coordinates.
    pub max: Vec3,
}

impl Aabb {
    /// Builds a box from two corners, ordering each axis.
    #[must_use]
    pub fn new(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Builds a box around `center` with the given half extents.
    #[must_use]
    pub fn from_center(center: Vec3, half_extents: Vec3) -> Self {
        Self::new(center - half_extents, center + half_extents)
    }

    /// Builds a cube around `center`.
    #[must_use]
    pub fn cube(center: Vec3, half: f32) -> Self {
        Self::from_center(center, Vec3::splat(half))
    }

    /// Centre of the box.
    #[must_use]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Strict interval overlap on all three axes.
    ///
    /// # Examples
    /// ```
    /// use glam::Vec3;
    /// use echoes::collision::Aabb;
    /// let a = Aabb::cube(Vec3::ZERO, 0.5);
    /// let b = Aabb::cube(Vec3::new(0.8, 0.0, 0.0), 0.5);
    /// assert!(a.overlaps(&b) && b.overlaps(&a));
    /// let touching = Aabb::cube(Vec3::new(1.0, 0.0, 0.0), 0.5);
    /// assert!(!a.overlaps(&touching));
    /// ```
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
            && self.min.z < other.max.z
            && self.max.z > other.min.z
    }

    /// Moves `self` out of `obstacle` along the horizontal axis of least
    /// penetration.
    ///
    /// The moved face is placed exactly on the obstacle's face, so the pair
    /// no longer overlaps afterwards. The vertical extent is untouched.
    /// Returns `false` when the boxes did not overlap.
    pub fn push_out(&mut self, obstacle: &Self) -> bool {
        if !self.overlaps(obstacle) {
            return false;
        }

        let width = self.max.x - self.min.x;
        let depth = self.max.z - self.min.z;
        match min_penetration(
            self.max.x - obstacle.min.x,
            obstacle.max.x - self.min.x,
            self.max.z - obstacle.min.z,
            obstacle.max.z - self.min.z,
        ) {
            PushDirection::Left => {
                self.max.x = obstacle.min.x;
                self.min.x = obstacle.min.x - width;
            }
            PushDirection::Right => {
                self.min.x = obstacle.max.x;
                self.max.x = obstacle.max.x + width;
            }
            PushDirection::Front => {
                self.max.z = obstacle.min.z;
                self.min.z = obstacle.min.z - depth;
            }
            PushDirection::Back => {
                self.min.z = obstacle.max.z;
                self.max.z = obstacle.max.z + depth;
            }
        }
        true
    }
}

/// Horizontal rectangle on the (x,z) plane with inclusive edges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Smallest x.
    pub x_min: f32,
    /// Largest x.
    pub x_max: f32,
    /// Smallest z.
    pub z_min: f32,
    /// Largest z.
    pub z_max: f32,
}

impl Rect {
    /// Builds a rectangle, ordering each axis so negative extents work.
    #[must_use]
    pub fn new(x_min: f32, x_max: f32, z_min: f32, z_max: f32) -> Self {
        Self {
            x_min: x_min.min(x_max),
            x_max: x_min.max(x_max),
            z_min: z_min.min(z_max),
            z_max: z_min.max(z_max),
        }
    }

    /// Builds a rectangle from a centre and (possibly negative) half extents.
    #[must_use]
    pub fn from_center(center: Vec2, half_x: f32, half_z: f32) -> Self {
        Self::new(
            center.x - half_x,
            center.x + half_x,
            center.y - half_z,
            center.y + half_z,
        )
    }

    /// Inclusive point containment.
    #[must_use]
    pub fn contains(&self, x: f32, z: f32) -> bool {
        (self.x_min..=self.x_max).contains(&x) && (self.z_min..=self.z_max).contains(&z)
    }

    /// Grows the rectangle by `pad` on every side.
    #[must_use]
    pub fn padded(&self, pad: f32) -> Self {
        Self::new(
            self.x_min - pad,
            self.x_max + pad,
            self.z_min - pad,
            self.z_max + pad,
        )
    }

    /// Pulls `point` inside the rectangle shrunk by `margin`.
    ///
    /// Lower bounds are applied before upper bounds, so a margin wider than
    /// the rectangle resolves towards the max edge instead of panicking.
    #[must_use]
    pub fn clamp_inside(&self, point: Vec2, margin: f32) -> Vec2 {
        let clamp = |v: f32, lo: f32, hi: f32| v.max(lo).min(hi);
        Vec2::new(
            clamp(point.x, self.x_min + margin, self.x_max - margin),
            clamp(point.y, self.z_min + margin, self.z_max - margin),
        )
    }

    /// Pushes a contained point onto the nearest edge.
    ///
    /// Uses the same minimum-penetration rule and tie-break as
    /// [`Aabb::push_out`]. Points outside the rectangle are returned as-is.
    #[must_use]
    pub fn push_point_out(&self, point: Vec2) -> Vec2 {
        if !self.contains(point.x, point.y) {
            return point;
        }
        match min_penetration(
            point.x - self.x_min,
            self.x_max - point.x,
            point.y - self.z_min,
            self.z_max - point.y,
        ) {
            PushDirection::Left => Vec2::new(self.x_min, point.y),
            PushDirection::Right => Vec2::new(self.x_max, point.y),
            PushDirection::Front => Vec2::new(point.x, self.z_min),
            PushDirection::Back => Vec2::new(point.x, self.z_max),
        }
    }

    /// Extrudes the rectangle into a box spanning `y_min..y_max`.
    #[must_use]
    pub fn extrude(&self, y_min: f32, y_max: f32) -> Aabb {
        Aabb::new(
            Vec3::new(self.x_min, y_min, self.z_min),
            Vec3::new(self.x_max, y_max, self.z_max),
        )
    }
}

/// Clips the parametric interval against one slab edge.
///
/// `p` is the edge-facing component of the segment direction and `q` the
/// signed distance from the start to the edge.
fn clip_edge(p: f32, q: f32, (t_min, t_max): (f32, f32)) -> Option<(f32, f32)> {
    if p == 0.0 {
        return (q >= 0.0).then_some((t_min, t_max));
    }
    let r = q / p;
    if p < 0.0 {
        if r > t_max {
            return None;
        }
        Some((t_min.max(r), t_max))
    } else {
        if r < t_min {
            return None;
        }
        Some((t_min, t_max.min(r)))
    }
}

fn slab_interval(
    start: f32,
    delta: f32,
    lo: f32,
    hi: f32,
    interval: (f32, f32),
) -> Option<(f32, f32)> {
    let entered = clip_edge(-delta, start - lo, interval)?;
    clip_edge(delta, hi - start, entered)
}

/// Liang-Barsky test of the segment `origin -> target` against `target_box`.
///
/// Returns `true` when some part of the segment lies inside the box. Only
/// the target's own extent is considered; obstacles between the endpoints
/// are not tested.
///
/// # Examples
/// ```
/// use glam::Vec3;
/// use echoes::collision::{segment_visible, Aabb};
/// let target = Aabb::cube(Vec3::new(5.0, 0.5, 0.0), 0.5);
/// assert!(segment_visible(Vec3::new(0.0, 0.5, 0.0), target.center(), &target));
/// let short = Vec3::new(2.0, 0.5, 0.0);
/// assert!(!segment_visible(Vec3::new(0.0, 0.5, 0.0), short, &target));
/// ```
#[must_use]
pub fn segment_visible(origin: Vec3, target: Vec3, target_box: &Aabb) -> bool {
    let delta = target - origin;
    let axes = [
        (origin.x, delta.x, target_box.min.x, target_box.max.x),
        (origin.y, delta.y, target_box.min.y, target_box.max.y),
        (origin.z, delta.z, target_box.min.z, target_box.max.z),
    ];
    axes.into_iter()
        .try_fold((0.0_f32, 1.0_f32), |interval, (start, d, lo, hi)| {
            slab_interval(start, d, lo, hi, interval)
        })
        .is_some_and(|(t_min, t_max)| t_min <= t_max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    fn cube(x: f32, y: f32, z: f32, half: f32) -> Aabb {
        Aabb::cube(Vec3::new(x, y, z), half)
    }

    #[rstest]
    #[case::disjoint(cube(0.0, 0.0, 0.0, 0.5), cube(3.0, 0.0, 0.0, 0.5), false)]
    #[case::overlapping(cube(0.0, 0.0, 0.0, 0.5), cube(0.6, 0.2, -0.3, 0.5), true)]
    #[case::contained(cube(0.0, 0.0, 0.0, 2.0), cube(0.1, 0.1, 0.1, 0.2), true)]
    #[case::touching_face(cube(0.0, 0.0, 0.0, 0.5), cube(0.0, 0.0, 1.0, 0.5), false)]
    #[case::vertical_gap(cube(0.0, 0.0, 0.0, 0.5), cube(0.0, 1.5, 0.0, 0.5), false)]
    #[case::thin_wall(
        Aabb::new(Vec3::new(-0.2, 0.0, -3.0), Vec3::new(0.2, 3.0, 3.0)),
        cube(0.5, 0.5, 0.0, 0.5),
        true
    )]
    fn overlap_is_symmetric(#[case] a: Aabb, #[case] b: Aabb, #[case] expected: bool) {
        assert_eq!(a.overlaps(&b), expected);
        assert_eq!(b.overlaps(&a), expected);
    }

    #[rstest]
    #[case::from_left(cube(-0.3, 0.0, 0.1, 0.5), cube(0.0, 0.0, 0.0, 0.5))]
    #[case::from_right(cube(0.7, 0.0, 0.0, 0.5), cube(0.0, 0.0, 0.0, 0.5))]
    #[case::from_front(cube(0.1, 0.0, -0.6, 0.5), cube(0.0, 0.0, 0.0, 0.5))]
    #[case::from_back(cube(0.0, 0.0, 0.9, 0.5), cube(0.0, 0.0, 0.0, 0.5))]
    #[case::deep_inside(cube(0.13, 0.0, -0.07, 0.25), cube(0.0, 0.0, 0.0, 1.0))]
    #[case::odd_sizes(
        Aabb::new(Vec3::new(1.37, 0.0, 2.11), Vec3::new(2.41, 1.0, 3.09)),
        Aabb::new(Vec3::new(2.03, -1.0, 0.0), Vec3::new(2.23, 4.0, 8.0))
    )]
    fn push_out_separates(#[case] mut a: Aabb, #[case] b: Aabb) {
        assert!(a.overlaps(&b));
        let before = a;
        assert!(a.push_out(&b));
        assert!(!a.overlaps(&b));
        assert_relative_eq!(a.min.y, before.min.y);
        assert_relative_eq!(a.max.y, before.max.y);
    }

    #[test]
    fn push_out_ignores_disjoint_boxes() {
        let mut a = cube(5.0, 0.0, 0.0, 0.5);
        let before = a;
        assert!(!a.push_out(&cube(0.0, 0.0, 0.0, 0.5)));
        assert_eq!(a, before);
    }

    #[test]
    fn push_out_ties_prefer_left() {
        // Centred overlap: all four penetrations are equal.
        let mut a = cube(0.0, 0.0, 0.0, 0.5);
        let b = cube(0.0, 0.0, 0.0, 0.5);
        a.push_out(&b);
        assert_relative_eq!(a.max.x, b.min.x);
        assert_relative_eq!(a.center().z, 0.0);
    }

    #[test]
    fn push_out_ties_prefer_right_over_front() {
        // Right and front penetrations both equal 0.5; left and back are larger.
        let mut a = Aabb::new(Vec3::new(0.5, 0.0, -0.5), Vec3::new(1.5, 1.0, 0.5));
        let b = Aabb::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 1.0, 1.0));
        a.push_out(&b);
        assert_relative_eq!(a.min.x, b.max.x);
        assert_relative_eq!(a.min.z, -0.5);
    }

    #[rstest]
    #[case::nearest_left(Vec2::new(0.1, 0.5), Vec2::new(0.0, 0.5))]
    #[case::nearest_right(Vec2::new(0.95, 0.5), Vec2::new(1.0, 0.5))]
    #[case::nearest_front(Vec2::new(0.5, 0.05), Vec2::new(0.5, 0.0))]
    #[case::nearest_back(Vec2::new(0.5, 0.8), Vec2::new(0.5, 1.0))]
    #[case::outside(Vec2::new(2.0, 2.0), Vec2::new(2.0, 2.0))]
    fn push_point_out_picks_nearest_edge(#[case] point: Vec2, #[case] expected: Vec2) {
        let rect = Rect::new(0.0, 1.0, 0.0, 1.0);
        assert_eq!(rect.push_point_out(point), expected);
    }

    #[test]
    fn rect_orders_negative_extents() {
        let rect = Rect::from_center(Vec2::new(1.0, 1.0), 2.0, -3.0);
        assert_relative_eq!(rect.z_min, -2.0);
        assert_relative_eq!(rect.z_max, 4.0);
        assert!(rect.contains(1.0, -2.0));
    }

    #[test]
    fn clamp_inside_respects_margin() {
        let rect = Rect::new(-2.0, 2.0, -1.0, 1.0);
        let clamped = rect.clamp_inside(Vec2::new(5.0, -5.0), 0.35);
        assert_relative_eq!(clamped.x, 1.65);
        assert_relative_eq!(clamped.y, -0.65);
        let inside = rect.clamp_inside(Vec2::new(0.2, 0.1), 0.35);
        assert_eq!(inside, Vec2::new(0.2, 0.1));
    }

    #[rstest]
    #[case::reaches_centre(Vec3::new(0.0, 0.5, 0.0), Vec3::new(6.0, 0.5, 0.0), true)]
    #[case::stops_short(Vec3::new(0.0, 0.5, 0.0), Vec3::new(5.0, 0.5, 0.0), false)]
    #[case::passes_beside(Vec3::new(0.0, 0.5, 3.0), Vec3::new(12.0, 0.5, 3.0), false)]
    #[case::passes_through(Vec3::new(0.0, 0.5, 0.2), Vec3::new(12.0, 0.5, -0.2), true)]
    #[case::starts_inside(Vec3::new(6.1, 0.4, 0.0), Vec3::new(20.0, 0.4, 0.0), true)]
    #[case::degenerate_inside(Vec3::new(6.0, 0.5, 0.0), Vec3::new(6.0, 0.5, 0.0), true)]
    #[case::degenerate_outside(Vec3::new(0.0, 0.5, 0.0), Vec3::new(0.0, 0.5, 0.0), false)]
    #[case::from_above(Vec3::new(6.0, 8.0, 0.0), Vec3::new(6.0, 0.5, 0.0), true)]
    fn segment_visibility(#[case] origin: Vec3, #[case] target: Vec3, #[case] expected: bool) {
        let target_box = cube(6.0, 0.5, 0.0, 0.5);
        assert_eq!(segment_visible(origin, target, &target_box), expected);
    }
}
