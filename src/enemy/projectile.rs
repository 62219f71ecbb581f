//! Projectiles fired by ranged enemies.
use glam::Vec3;
use serde::Serialize;

use crate::vector_math::planar_distance;
use crate::{PROJECTILE_HIT_HEIGHT, PROJECTILE_HIT_RADIUS};

/// A single shot in flight, owned by the enemy that fired it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Projectile {
    /// Current position.
    pub position: Vec3,
    /// Velocity in units per second.
    pub velocity: Vec3,
    /// Seconds left before the shot expires.
    pub ttl: f32,
}

/// Outcome of advancing a projectile by one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flight {
    /// Still travelling.
    Airborne,
    /// Reached the target this tick.
    Hit,
    /// Ran out of lifetime.
    Expired,
}

impl Projectile {
    /// Advances the shot and classifies it against `target`.
    pub fn advance(&mut self, dt: f32, target: Vec3) -> Flight {
        self.position += self.velocity * dt;
        self.ttl -= dt;

        let near = planar_distance(self.position, target) < PROJECTILE_HIT_RADIUS;
        let level = (self.position.y - target.y).abs() < PROJECTILE_HIT_HEIGHT;
        if near && level {
            Flight::Hit
        } else if self.ttl > 0.0 {
            Flight::Airborne
        } else {
            Flight::Expired
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn shot(x: f32, ttl: f32) -> Projectile {
        Projectile {
            position: Vec3::new(x, 0.5, 0.0),
            velocity: Vec3::new(10.0, 0.0, 0.0),
            ttl,
        }
    }

    #[rstest]
    #[case::hits_target(shot(4.0, 2.0), Vec3::new(5.5, 0.5, 0.0), Flight::Hit)]
    #[case::too_high(shot(4.0, 2.0), Vec3::new(5.5, 2.0, 0.0), Flight::Airborne)]
    #[case::keeps_flying(shot(0.0, 2.0), Vec3::new(9.0, 0.5, 0.0), Flight::Airborne)]
    #[case::expires(shot(0.0, 0.05), Vec3::new(9.0, 0.5, 0.0), Flight::Expired)]
    #[case::hit_beats_expiry(shot(4.0, 0.05), Vec3::new(5.0, 0.5, 0.0), Flight::Hit)]
    fn advance_classifies(
        #[case] mut p: Projectile,
        #[case] target: Vec3,
        #[case] expected: Flight,
    ) {
        assert_eq!(p.advance(0.1, target), expected);
    }
}
