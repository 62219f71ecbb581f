//! The player character: movement over terrain, sword swings and damage.
//!
//! Movement runs in three passes each tick. The horizontal step is taken
//! first and reverted if it clips a ramp's side wall; the body is then lifted
//! onto the highest surface underneath; finally any raised platform the feet
//! are still below pushes the body out sideways.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::collision::Aabb;
use crate::health::Health;
use crate::terrain::Terrain;
use crate::vector_math::{heading, heading_direction, planar, vec_normalize};
use crate::{
    ATTACK_HALF_HEIGHT, ATTACK_HALF_WIDTH, ATTACK_REACH, ATTACK_WINDOW, PLAYER_INVULNERABILITY,
    PLAYER_MAX_HEALTH, PLAYER_RAMP_WALL_THICKNESS, PLAYER_SIZE, PLAYER_SPEED,
    RAMP_APPROACH_MARGIN, STEP_TOLERANCE,
};

/// Tunable player attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Movement speed in units per second.
    pub speed: f32,
    /// Maximum hit points.
    pub max_health: u16,
    /// Edge length of the player's cube.
    pub size: f32,
    /// Seconds of invulnerability after each hit.
    pub invulnerability: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            speed: PLAYER_SPEED,
            max_health: PLAYER_MAX_HEALTH,
            size: PLAYER_SIZE,
            invulnerability: PLAYER_INVULNERABILITY,
        }
    }
}

/// Directional movement keys held this tick.
///
/// Forward walks towards +x, back towards -x, left towards -z and right
/// towards +z.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[expect(
    clippy::struct_excessive_bools,
    reason = "This struct represents the pressed state of exactly four directional keys."
)]
pub struct MoveInput {
    /// Towards +x.
    pub forward: bool,
    /// Towards -x.
    pub back: bool,
    /// Towards -z.
    pub left: bool,
    /// Towards +z.
    pub right: bool,
}

impl MoveInput {
    /// Unit direction on the (x,z) plane, or zero when nothing is held.
    ///
    /// # Examples
    /// ```
    /// use echoes::player::MoveInput;
    /// let input = MoveInput { forward: true, right: true, ..Default::default() };
    /// assert!((input.direction().length() - 1.0).abs() < 1e-6);
    /// assert_eq!(MoveInput::default().direction(), glam::Vec2::ZERO);
    /// ```
    #[must_use]
    pub fn direction(&self) -> Vec2 {
        const fn axis(neg: bool, pos: bool) -> f32 {
            match (neg, pos) {
                (true, false) => -1.0,
                (false, true) => 1.0,
                _ => 0.0,
            }
        }

        vec_normalize(Vec2::new(
            axis(self.back, self.forward),
            axis(self.left, self.right),
        ))
    }
}

/// Player state.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    position: Vec3,
    facing: f32,
    health: Health,
    invulnerable_for: f32,
    swing: Option<f32>,
    config: PlayerConfig,
}

impl Player {
    /// Spawns a player standing on the ground at `start`.
    #[must_use]
    pub fn new(config: PlayerConfig, start: Vec2) -> Self {
        Self {
            position: Vec3::new(start.x, config.size / 2.0, start.y),
            facing: 0.0,
            health: Health::full(config.max_health),
            invulnerable_for: 0.0,
            swing: None,
            config,
        }
    }

    /// Centre of the player's cube.
    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Heading angle, see [`crate::vector_math::heading`].
    #[must_use]
    pub fn facing(&self) -> f32 {
        self.facing
    }

    /// Hit points.
    #[must_use]
    pub fn health(&self) -> Health {
        self.health
    }

    /// Whether the player can still act.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        !self.health.is_dead()
    }

    /// Whether incoming damage is currently ignored.
    #[must_use]
    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable_for > 0.0
    }

    /// Whether a sword swing is in progress.
    #[must_use]
    pub fn is_attacking(&self) -> bool {
        self.swing.is_some()
    }

    /// Attributes the player was built with.
    #[must_use]
    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    /// Bounding cube of the body.
    #[must_use]
    pub fn aabb(&self) -> Aabb {
        Aabb::cube(self.position, self.config.size / 2.0)
    }

    /// Moves the player back to `start` on the ground. Health is kept.
    pub fn respawn_at(&mut self, start: Vec2) {
        self.position = Vec3::new(start.x, self.config.size / 2.0, start.y);
        self.swing = None;
    }

    /// Advances movement, terrain resolution and timers by `dt` seconds.
    pub fn update(&mut self, dt: f32, input: &MoveInput, terrain: &Terrain) {
        if !self.is_alive() {
            return;
        }

        if self.invulnerable_for > 0.0 {
            self.invulnerable_for -= dt;
        }

        let previous = planar(self.position);
        let direction = input.direction();
        if direction != Vec2::ZERO {
            let step = direction * self.config.speed * dt;
            self.set_planar(previous + step);
            self.facing = heading(direction);
        }

        let body = self.aabb();
        let clipped_wall = terrain
            .ramps
            .iter()
            .flat_map(|ramp| ramp.side_walls(PLAYER_RAMP_WALL_THICKNESS))
            .any(|wall| body.overlaps(&wall));
        if clipped_wall {
            self.set_planar(previous);
        }

        let half = self.config.size / 2.0;
        let here = planar(self.position);
        let floor = terrain.floor_height_at(here.x, here.y, RAMP_APPROACH_MARGIN);
        self.position.y = floor + half;

        self.block_against_platforms(terrain);

        if let Some(elapsed) = self.swing.as_mut() {
            *elapsed += dt;
            if *elapsed > ATTACK_WINDOW {
                self.swing = None;
            }
        }
    }

    fn block_against_platforms(&mut self, terrain: &Terrain) {
        let half = self.config.size / 2.0;
        let feet = self.position.y - half;
        for platform in terrain.platforms.iter().filter(|p| p.is_raised()) {
            if feet >= platform.top - STEP_TOLERANCE {
                continue;
            }
            let solid = platform.solid_bounds().padded(half);
            let pushed = solid.push_point_out(planar(self.position));
            self.set_planar(pushed);
        }
    }

    fn set_planar(&mut self, point: Vec2) {
        self.position.x = point.x;
        self.position.z = point.y;
    }

    /// Applies `amount` damage unless dead or invulnerable.
    ///
    /// Returns `true` when the hit landed. Each landed hit opens a fresh
    /// invulnerability window.
    pub fn take_damage(&mut self, amount: u16) -> bool {
        if !self.is_alive() || self.is_invulnerable() {
            return false;
        }
        self.health.apply_damage(amount);
        self.invulnerable_for = self.config.invulnerability;
        true
    }

    /// Starts a sword swing. Ignored while dead.
    pub fn trigger_attack(&mut self) {
        if self.is_alive() {
            self.swing = Some(0.0);
        }
    }

    /// Sword hitbox while a swing is active.
    ///
    /// Every overlap during the swing counts, so the same enemy may be hit on
    /// consecutive ticks.
    #[must_use]
    pub fn attack_hitbox(&self) -> Option<Aabb> {
        if !self.is_alive() {
            return None;
        }
        self.swing?;
        let forward = heading_direction(self.facing) * ATTACK_REACH;
        let center = self.position + Vec3::new(forward.x, 0.0, forward.y);
        Some(Aabb::from_center(
            center,
            Vec3::new(ATTACK_HALF_WIDTH, ATTACK_HALF_HEIGHT, ATTACK_HALF_WIDTH),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::{Platform, Ramp};
    use approx::assert_relative_eq;
    use rstest::{fixture, rstest};

    const DT: f32 = 1.0 / 60.0;

    #[fixture]
    fn flat() -> Terrain {
        Terrain::new(vec![Platform::new(0.0, 0.0, 40.0, -40.0, 0.0)], Vec::new())
    }

    fn player_at(x: f32, z: f32) -> Player {
        Player::new(PlayerConfig::default(), Vec2::new(x, z))
    }

    #[rstest]
    #[case::forward(MoveInput { forward: true, ..Default::default() }, Vec2::X)]
    #[case::back(MoveInput { back: true, ..Default::default() }, Vec2::NEG_X)]
    #[case::left(MoveInput { left: true, ..Default::default() }, Vec2::NEG_Y)]
    #[case::right(MoveInput { right: true, ..Default::default() }, Vec2::Y)]
    #[case::cancelled(MoveInput { left: true, right: true, ..Default::default() }, Vec2::ZERO)]
    fn input_maps_to_axes(#[case] input: MoveInput, #[case] expected: Vec2) {
        assert_eq!(input.direction(), expected);
    }

    #[rstest]
    fn moves_at_configured_speed(flat: Terrain) {
        let mut player = player_at(0.0, 0.0);
        let input = MoveInput {
            forward: true,
            ..Default::default()
        };
        player.update(0.5, &input, &flat);
        assert_relative_eq!(player.position().x, PLAYER_SPEED * 0.5);
        assert_relative_eq!(player.position().y, PLAYER_SIZE / 2.0);
        assert_relative_eq!(player.facing(), std::f32::consts::FRAC_PI_2);
    }

    #[rstest]
    fn idle_keeps_facing(flat: Terrain) {
        let mut player = player_at(0.0, 0.0);
        let input = MoveInput {
            left: true,
            ..Default::default()
        };
        player.update(DT, &input, &flat);
        let facing = player.facing();
        player.update(DT, &MoveInput::default(), &flat);
        assert_relative_eq!(player.facing(), facing);
    }

    #[test]
    fn stands_on_platform_top() {
        let terrain = Terrain::new(vec![Platform::new(0.0, 0.0, 4.0, 4.0, 2.0)], Vec::new());
        let mut player = player_at(0.0, 0.0);
        player.update(DT, &MoveInput::default(), &terrain);
        assert_relative_eq!(player.position().y, 2.5);
    }

    #[test]
    fn raised_platform_blocks_from_the_side() {
        let terrain = Terrain::new(vec![Platform::new(0.0, 0.0, 2.0, 2.0, 3.0)], Vec::new());
        let mut player = player_at(-1.45, 0.0);
        let input = MoveInput {
            forward: true,
            ..Default::default()
        };
        for _ in 0..30 {
            player.update(DT, &input, &terrain);
        }
        assert!(player.position().x <= -1.5 + 1e-4);
        assert_relative_eq!(player.position().y, 0.5);
    }

    #[test]
    fn ramp_lifts_player_climbing_from_front() {
        let terrain = Terrain::new(Vec::new(), vec![Ramp::new(0.0, 0.0, 4.0, 6.0, 0.0, 3.0)]);
        let mut player = player_at(0.0, -2.0);
        let input = MoveInput {
            right: true,
            ..Default::default()
        };
        let mut heights = Vec::new();
        for _ in 0..20 {
            player.update(DT, &input, &terrain);
            heights.push(player.position().y);
        }
        assert!(heights.windows(2).all(|w| matches!(w, [a, b] if b >= a)));
        assert!(player.position().y > 0.5);
    }

    #[test]
    fn ramp_side_wall_reverts_move() {
        let ramp = Ramp::new(0.0, 0.0, 4.0, 6.0, 0.0, 3.0);
        let edge = ramp.bounds().x_min;
        let terrain = Terrain::new(Vec::new(), vec![ramp]);
        let mut player = player_at(edge - 0.75, 0.0);
        let input = MoveInput {
            forward: true,
            ..Default::default()
        };
        player.update(0.05, &input, &terrain);
        assert_relative_eq!(player.position().x, edge - 0.75);
    }

    #[rstest]
    fn damage_respects_invulnerability(flat: Terrain) {
        let mut player = player_at(0.0, 0.0);
        assert!(player.take_damage(1));
        assert!(!player.take_damage(1));
        assert_eq!(player.health().current(), PLAYER_MAX_HEALTH - 1);
        for _ in 0..31 {
            player.update(DT, &MoveInput::default(), &flat);
        }
        assert!(player.take_damage(1));
        assert_eq!(player.health().current(), PLAYER_MAX_HEALTH - 2);
    }

    #[test]
    fn lethal_damage_is_terminal() {
        let mut player = Player::new(
            PlayerConfig {
                max_health: 2,
                invulnerability: 0.0,
                ..PlayerConfig::default()
            },
            Vec2::ZERO,
        );
        assert!(player.take_damage(5));
        assert!(!player.is_alive());
        assert_eq!(player.health().current(), 0);
        assert!(!player.take_damage(1));
        player.trigger_attack();
        assert!(player.attack_hitbox().is_none());
    }

    #[rstest]
    fn swing_lasts_attack_window(flat: Terrain) {
        let mut player = player_at(0.0, 0.0);
        assert!(player.attack_hitbox().is_none());
        player.trigger_attack();
        let hitbox = player
            .attack_hitbox()
            .unwrap_or_else(|| panic!("swing should expose a hitbox"));
        assert_relative_eq!(hitbox.center().z, ATTACK_REACH);
        assert_relative_eq!(hitbox.max.x - hitbox.min.x, ATTACK_HALF_WIDTH * 2.0);
        for _ in 0..14 {
            player.update(DT, &MoveInput::default(), &flat);
        }
        assert!(player.is_attacking());
        player.update(DT, &MoveInput::default(), &flat);
        player.update(DT, &MoveInput::default(), &flat);
        assert!(!player.is_attacking());
    }
}
