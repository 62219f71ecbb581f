//! Static terrain: flat platforms, sloped ramps and the queries over them.
//!
//! Every piece of terrain has a collision *footprint* on the (x,z) plane. Its
//! x half-extent is half the authored width, while its z half-extent is the
//! authored depth divided by a per-entity shrink factor. The footprint is
//! therefore independent of whatever the renderer draws, and all containment,
//! clamping and wall queries derive from it so they never disagree.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::collision::{Aabb, Rect};
use crate::{
    PLATFORM_FOOTPRINT_SHRINK, RAMP_CLIMB_MARGIN, RAMP_FOOTPRINT_SHRINK, RAMP_MIN_SPAN,
    RAMP_SPAN_FAR_DIVISOR, RAMP_SPAN_NEAR_DIVISOR,
};

fn default_visible() -> bool {
    true
}

fn default_platform_shrink() -> f32 {
    PLATFORM_FOOTPRINT_SHRINK
}

fn default_ramp_shrink() -> f32 {
    RAMP_FOOTPRINT_SHRINK
}

/// Handle of a platform inside a [`Terrain`].
///
/// Handles are plain indices, so rebuilding the terrain never leaves a
/// dangling reference behind; a stale handle simply resolves to `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlatformId(pub usize);

/// Flat box with its top at `top`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    /// Centre on the (x,z) plane.
    pub center: Vec2,
    /// Extent along x. May be negative.
    pub width: f32,
    /// Extent along z. May be negative.
    pub depth: f32,
    /// Height of the top face.
    pub top: f32,
    /// Whether the renderer should draw it; border walls are invisible.
    #[serde(default = "default_visible")]
    pub visible: bool,
    /// Divisor turning `depth` into the collision half-depth.
    #[serde(default = "default_platform_shrink")]
    pub footprint_shrink: f32,
}

impl Platform {
    /// Creates a visible platform with the default footprint shrink.
    #[must_use]
    pub fn new(x: f32, z: f32, width: f32, depth: f32, top: f32) -> Self {
        Self {
            center: Vec2::new(x, z),
            width,
            depth,
            top,
            visible: true,
            footprint_shrink: PLATFORM_FOOTPRINT_SHRINK,
        }
    }

    /// Marks the platform as invisible.
    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    /// Collision footprint.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        Rect::from_center(
            self.center,
            self.width / 2.0,
            self.depth / self.footprint_shrink,
        )
    }

    /// Rectangle matching the rendered box, used when the platform acts as
    /// a solid block.
    #[must_use]
    pub fn solid_bounds(&self) -> Rect {
        Rect::from_center(self.center, self.width / 2.0, self.depth / 2.0)
    }

    /// Whether `(x, z)` lies on the footprint.
    #[must_use]
    pub fn contains(&self, x: f32, z: f32) -> bool {
        self.bounds().contains(x, z)
    }

    /// Pulls `point` inside the footprint, `margin` away from every edge.
    #[must_use]
    pub fn clamp_inside(&self, point: Vec2, margin: f32) -> Vec2 {
        self.bounds().clamp_inside(point, margin)
    }

    /// Raised platforms block ground movement; the floor slab does not.
    #[must_use]
    pub fn is_raised(&self) -> bool {
        self.top > 0.0
    }
}

/// Slope rising from `base` to `top` along its depth axis.
///
/// The sign of `depth` picks the climbing direction: positive depth rises
/// towards +z, negative depth towards -z.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ramp {
    /// Centre on the (x,z) plane.
    pub center: Vec2,
    /// Extent along x. May be negative.
    pub width: f32,
    /// Signed extent along z.
    pub depth: f32,
    /// Height at the low end.
    pub base: f32,
    /// Height at the high end.
    pub top: f32,
    /// Divisor turning `depth` into the collision half-depth.
    #[serde(default = "default_ramp_shrink")]
    pub footprint_shrink: f32,
}

impl Ramp {
    /// Creates a ramp with the default footprint shrink.
    #[must_use]
    pub fn new(x: f32, z: f32, width: f32, depth: f32, base: f32, top: f32) -> Self {
        Self {
            center: Vec2::new(x, z),
            width,
            depth,
            base,
            top,
            footprint_shrink: RAMP_FOOTPRINT_SHRINK,
        }
    }

    /// Collision footprint.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        Rect::from_center(
            self.center,
            self.width / 2.0,
            self.depth / self.footprint_shrink,
        )
    }

    /// Whether `(x, z)` lies on the footprint.
    #[must_use]
    pub fn contains(&self, x: f32, z: f32) -> bool {
        self.bounds().contains(x, z)
    }

    /// Pulls `point` inside the footprint, `margin` away from every edge.
    #[must_use]
    pub fn clamp_inside(&self, point: Vec2, margin: f32) -> Vec2 {
        self.bounds().clamp_inside(point, margin)
    }

    /// Whether a walker at `z` is on the low side of the ramp, at least
    /// `margin` away from the high edge.
    #[must_use]
    pub fn approached_from_front(&self, z: f32, margin: f32) -> bool {
        let bounds = self.bounds();
        if self.depth > 0.0 {
            z <= bounds.z_max - margin
        } else {
            z >= bounds.z_min + margin
        }
    }

    /// Surface height at `(x, z)`.
    ///
    /// Outside the footprint, near the high edge, or on a degenerate span the
    /// base height is returned.
    ///
    /// # Examples
    /// ```
    /// use echoes::terrain::Ramp;
    /// let ramp = Ramp::new(0.0, 0.0, 4.0, 6.0, 0.0, 3.0);
    /// assert_eq!(ramp.height(10.0, 0.0), 0.0);
    /// assert!(ramp.height(0.0, 0.0) > 0.0);
    /// ```
    #[must_use]
    pub fn height(&self, x: f32, z: f32) -> f32 {
        if !self.contains(x, z) || !self.approached_from_front(z, RAMP_CLIMB_MARGIN) {
            return self.base;
        }

        let z0 = self.center.y - self.depth / RAMP_SPAN_NEAR_DIVISOR;
        let z1 = self.center.y + self.depth / RAMP_SPAN_FAR_DIVISOR;
        let span = z1 - z0;
        if span.abs() < RAMP_MIN_SPAN {
            return self.base;
        }

        let t = ((z - z0) / span).clamp(0.0, 1.0);
        (1.0 - t) * self.base + t * self.top
    }

    /// Invisible walls along both x edges of the footprint.
    ///
    /// The walls straddle the same edges that [`Ramp::contains`] uses, so
    /// there is no gap between "inside the ramp" and "blocked by a wall".
    #[must_use]
    pub fn side_walls(&self, thickness: f32) -> [Aabb; 2] {
        let bounds = self.bounds();
        let wall = |x: f32| {
            Aabb::new(
                Vec3::new(x - thickness, self.base, bounds.z_min),
                Vec3::new(x + thickness, self.top, bounds.z_max),
            )
        };
        [wall(bounds.x_min), wall(bounds.x_max)]
    }
}

/// The static terrain set of one map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Terrain {
    /// Platforms, addressed by [`PlatformId`].
    #[serde(default)]
    pub platforms: Vec<Platform>,
    /// Ramps.
    #[serde(default)]
    pub ramps: Vec<Ramp>,
}

impl Terrain {
    /// Creates a terrain set.
    #[must_use]
    pub fn new(platforms: Vec<Platform>, ramps: Vec<Ramp>) -> Self {
        Self { platforms, ramps }
    }

    /// Resolves a platform handle.
    #[must_use]
    pub fn platform(&self, id: PlatformId) -> Option<&Platform> {
        self.platforms.get(id.0)
    }

    /// Iterates over platforms with their handles.
    pub fn platforms_with_ids(&self) -> impl Iterator<Item = (PlatformId, &Platform)> {
        self.platforms
            .iter()
            .enumerate()
            .map(|(idx, platform)| (PlatformId(idx), platform))
    }

    /// Highest platform whose footprint contains `(x, z)`.
    ///
    /// When several share the greatest top, the first one wins.
    #[must_use]
    pub fn highest_platform_at(&self, x: f32, z: f32) -> Option<PlatformId> {
        self.platforms_with_ids()
            .filter(|(_, platform)| platform.contains(x, z))
            .fold(None, |best: Option<(PlatformId, f32)>, (id, platform)| {
                match best {
                    Some((_, top)) if top >= platform.top => best,
                    _ => Some((id, platform.top)),
                }
            })
            .map(|(id, _)| id)
    }

    /// Whether `(x, z)` lies on any raised platform.
    #[must_use]
    pub fn on_raised_platform(&self, x: f32, z: f32) -> bool {
        self.platforms
            .iter()
            .any(|platform| platform.is_raised() && platform.contains(x, z))
    }

    /// Ground height under `(x, z)`.
    ///
    /// Takes the greater of every ramp approached from its low side (using
    /// `approach_margin`) and every platform containing the point, floored at
    /// zero.
    #[must_use]
    pub fn floor_height_at(&self, x: f32, z: f32, approach_margin: f32) -> f32 {
        let ramps = self
            .ramps
            .iter()
            .filter(|ramp| ramp.contains(x, z) && ramp.approached_from_front(z, approach_margin))
            .map(|ramp| ramp.height(x, z));
        let platforms = self
            .platforms
            .iter()
            .filter(|platform| platform.contains(x, z))
            .map(|platform| platform.top);
        ramps.chain(platforms).fold(0.0, f32::max)
    }
}
