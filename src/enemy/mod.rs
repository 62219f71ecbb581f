//! Enemy AI and combat.
//!
//! An enemy starts [`EnemyState::Dormant`] and wakes the first time its
//! section engages it. While engaged and alive it pursues or kites the player,
//! attacks on its own timers and keeps itself on its terrain layer. Enemies
//! outside the current section are disengaged and freeze in place, timers and
//! projectiles included.

mod profile;
mod projectile;

pub use profile::{Behaviour, EnemyProfile, EnemyType};
pub use projectile::{Flight, Projectile};

use glam::{Vec2, Vec3};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::collision::{segment_visible, Aabb};
use crate::health::Health;
use crate::player::Player;
use crate::stage::SectionId;
use crate::terrain::{Platform, PlatformId, Terrain};
use crate::vector_math::{heading, planar, vec_normalize};
use crate::{
    BURST_GAP, CONTACT_EPSILON, DEFAULT_LEASH_RADIUS, ENEMY_RAMP_WALL_THICKNESS, ENEMY_SIZE,
    KITE_FAR, KITE_NEAR, LEASH_RESET_COOLDOWN, MELEE_COOLDOWN, MELEE_DAMAGE, MELEE_RANGE,
    PLATFORM_EDGE_MARGIN, PROJECTILE_SPEED, PROJECTILE_TTL, RANGED_COOLDOWN, RANGED_DAMAGE,
};

/// Melee attack parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeleeParams {
    /// Reach of a strike.
    pub range: f32,
    /// Damage per strike.
    pub damage: u16,
    /// Delay between strikes.
    pub cooldown: f32,
}

impl Default for MeleeParams {
    fn default() -> Self {
        Self {
            range: MELEE_RANGE,
            damage: MELEE_DAMAGE,
            cooldown: MELEE_COOLDOWN,
        }
    }
}

/// Ranged attack parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangedParams {
    /// Damage per projectile.
    pub damage: u16,
    /// Delay after the last shot of a burst.
    pub cooldown: f32,
    /// Shots per burst.
    pub burst: u8,
    /// Delay between shots inside a burst.
    pub burst_gap: f32,
    /// Retreat when the player is nearer than this.
    pub kite_near: f32,
    /// Advance when the player is farther than this.
    pub kite_far: f32,
    /// Projectile speed.
    pub projectile_speed: f32,
    /// Projectile lifetime.
    pub projectile_ttl: f32,
}

impl Default for RangedParams {
    fn default() -> Self {
        Self {
            damage: RANGED_DAMAGE,
            cooldown: RANGED_COOLDOWN,
            burst: 1,
            burst_gap: BURST_GAP,
            kite_near: KITE_NEAR,
            kite_far: KITE_FAR,
            projectile_speed: PROJECTILE_SPEED,
            projectile_ttl: PROJECTILE_TTL,
        }
    }
}

/// Attack style with its parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Closes to melee range.
    Melee(MeleeParams),
    /// Keeps distance and shoots.
    Ranged(RangedParams),
}

impl EnemyKind {
    /// Kind with built-in parameters for `enemy_type`.
    #[must_use]
    pub fn standard(enemy_type: EnemyType) -> Self {
        match enemy_type {
            EnemyType::Melee => Self::Melee(MeleeParams::default()),
            EnemyType::Ranged => Self::Ranged(RangedParams::default()),
        }
    }

    /// Archetype of this kind.
    #[must_use]
    pub const fn enemy_type(&self) -> EnemyType {
        match self {
            Self::Melee(_) => EnemyType::Melee,
            Self::Ranged(_) => EnemyType::Ranged,
        }
    }
}

/// Lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyState {
    /// Spawned but never engaged.
    Dormant,
    /// Awake and alive.
    Active,
    /// Terminal.
    Dead,
}

/// Which surface an enemy is confined to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerrainLayer {
    /// Walks the ground and may not climb onto raised platforms or ramps.
    Ground,
    /// Stays on top of one platform.
    PlatformLocked(PlatformId),
}

/// What an enemy did during one update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnemyReport {
    /// Projectiles emitted.
    pub shots_fired: u8,
    /// Damage events that landed on the player.
    pub hits_landed: u8,
    /// Whether the enemy was pulled back home this tick.
    pub leash_reset: bool,
}

/// A single enemy instance.
#[derive(Debug, Clone, PartialEq)]
pub struct Enemy {
    position: Vec3,
    facing: f32,
    health: Health,
    kind: EnemyKind,
    behaviour: Behaviour,
    speed: f32,
    melee_timer: f32,
    ranged_timer: f32,
    burst_left: u8,
    burst_timer: f32,
    projectiles: Vec<Projectile>,
    home: Vec2,
    leash_radius: f32,
    section: Option<SectionId>,
    engaged: bool,
    layer: TerrainLayer,
    can_fire: bool,
    state: EnemyState,
}

impl Enemy {
    /// Creates a dormant ground enemy at `spawn` whose leash home is the spawn
    /// point.
    #[must_use]
    pub fn new(kind: EnemyKind, spawn: Vec2) -> Self {
        let profile = EnemyProfile::fallback(kind.enemy_type());
        Self {
            position: Vec3::new(spawn.x, ENEMY_SIZE / 2.0, spawn.y),
            facing: 0.0,
            health: Health::full(profile.hp),
            kind,
            behaviour: profile.behaviour,
            speed: profile.speed,
            melee_timer: 0.0,
            ranged_timer: 0.0,
            burst_left: 0,
            burst_timer: 0.0,
            projectiles: Vec::new(),
            home: spawn,
            leash_radius: DEFAULT_LEASH_RADIUS,
            section: None,
            engaged: false,
            layer: TerrainLayer::Ground,
            can_fire: true,
            state: EnemyState::Dormant,
        }
    }

    /// Stamps hit points, speed, behaviour and ranged tuning from `profile`.
    ///
    /// Ranged cooldowns are raised to the global floor. A profile with no
    /// hit points yields an enemy that is already dead.
    #[must_use]
    pub fn with_profile(mut self, profile: &EnemyProfile) -> Self {
        self.health = Health::full(profile.hp);
        if self.health.is_dead() {
            self.state = EnemyState::Dead;
        }
        self.speed = profile.speed;
        self.behaviour = profile.behaviour;
        if let EnemyKind::Ranged(params) = &mut self.kind {
            params.cooldown = profile.effective_fire_cooldown();
            params.burst = profile.burst;
        }
        self
    }

    /// Sets the leash radius around the home point.
    #[must_use]
    pub fn with_leash(mut self, radius: f32) -> Self {
        self.leash_radius = radius;
        self
    }

    /// Records the owning section.
    #[must_use]
    pub fn in_section(mut self, section: SectionId) -> Self {
        self.section = Some(section);
        self
    }

    /// Confines the enemy to the top of `platform`.
    #[must_use]
    pub fn pinned_to(mut self, id: PlatformId, platform: &Platform) -> Self {
        self.layer = TerrainLayer::PlatformLocked(id);
        self.position.y = platform.top + ENEMY_SIZE / 2.0;
        self
    }

    /// Centre of the enemy's cube.
    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Displaces the enemy on the (x,z) plane without touching its home.
    pub fn set_planar_position(&mut self, point: Vec2) {
        self.position.x = point.x;
        self.position.z = point.y;
    }

    /// Heading towards the player as of the last update.
    #[must_use]
    pub fn facing(&self) -> f32 {
        self.facing
    }

    /// Hit points.
    #[must_use]
    pub fn health(&self) -> Health {
        self.health
    }

    /// Attack style and parameters.
    #[must_use]
    pub fn kind(&self) -> &EnemyKind {
        &self.kind
    }

    /// Behaviour tag.
    #[must_use]
    pub fn behaviour(&self) -> Behaviour {
        self.behaviour
    }

    /// Movement speed.
    #[must_use]
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Lifecycle state.
    #[must_use]
    pub fn state(&self) -> EnemyState {
        self.state
    }

    /// Whether the enemy is not dead.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.state != EnemyState::Dead
    }

    /// Whether the enemy is updated each tick.
    #[must_use]
    pub fn is_engaged(&self) -> bool {
        self.engaged
    }

    /// Projectiles currently in flight.
    #[must_use]
    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    /// Leash anchor.
    #[must_use]
    pub fn home(&self) -> Vec2 {
        self.home
    }

    /// Leash radius.
    #[must_use]
    pub fn leash_radius(&self) -> f32 {
        self.leash_radius
    }

    /// Owning section, if spawned by one.
    #[must_use]
    pub fn section(&self) -> Option<SectionId> {
        self.section
    }

    /// Terrain layer.
    #[must_use]
    pub fn layer(&self) -> TerrainLayer {
        self.layer
    }

    /// Whether ranged attacks are currently permitted.
    #[must_use]
    pub fn can_fire(&self) -> bool {
        self.can_fire
    }

    /// Bounding cube of the body.
    #[must_use]
    pub fn aabb(&self) -> Aabb {
        Aabb::cube(self.position, ENEMY_SIZE / 2.0)
    }

    /// Wakes the enemy so it acts on subsequent updates.
    pub fn engage(&mut self) {
        if self.state == EnemyState::Dormant {
            self.state = EnemyState::Active;
        }
        self.engaged = true;
    }

    /// Freezes the enemy in place.
    pub fn disengage(&mut self) {
        self.engaged = false;
    }

    /// Grants or withdraws permission to fire.
    pub fn set_fire_permission(&mut self, allowed: bool) {
        self.can_fire = allowed;
    }

    /// Applies damage. Returns `true` when this hit killed the enemy.
    pub fn take_damage(&mut self, amount: u16) -> bool {
        if !self.is_alive() {
            return false;
        }
        let killed = self.health.apply_damage(amount);
        if killed {
            self.state = EnemyState::Dead;
            self.projectiles.clear();
        }
        killed
    }

    /// Advances AI, attacks, terrain confinement and projectiles by `dt`.
    pub fn update(&mut self, dt: f32, player: &mut Player, terrain: &Terrain) -> EnemyReport {
        let mut report = EnemyReport::default();

        if !self.is_alive() || !player.is_alive() {
            self.projectiles.clear();
            return report;
        }
        if !self.engaged {
            return report;
        }

        let here = planar(self.position);
        if here.distance(self.home) > self.leash_radius {
            debug!(
                "enemy in section {:?} leashed back to ({}, {})",
                self.section, self.home.x, self.home.y
            );
            self.set_planar_position(self.home);
            self.projectiles.clear();
            self.melee_timer = LEASH_RESET_COOLDOWN;
            self.ranged_timer = LEASH_RESET_COOLDOWN;
            report.leash_reset = true;
            return report;
        }

        let offset = planar(player.position()) - here;
        let distance = offset.length();
        if distance < CONTACT_EPSILON {
            self.facing = 0.0;
            return report;
        }
        self.facing = heading(offset);
        let toward = vec_normalize(offset);

        match self.kind.clone() {
            EnemyKind::Melee(params) => {
                if distance > params.range {
                    self.step(toward, dt);
                }
                if self.strike(&params, dt, player) {
                    report.hits_landed += 1;
                }
            }
            EnemyKind::Ranged(params) => {
                if distance > params.kite_far {
                    self.step(toward, dt);
                } else if distance < params.kite_near {
                    self.step(-toward, dt);
                }
                if self.shoot(&params, dt, player) {
                    report.shots_fired += 1;
                }
            }
        }

        self.confine(here, terrain);
        report.hits_landed += self.advance_projectiles(dt, player);
        report
    }

    fn step(&mut self, direction: Vec2, dt: f32) {
        let next = planar(self.position) + direction * self.speed * dt;
        self.set_planar_position(next);
    }

    fn strike(&mut self, params: &MeleeParams, dt: f32, player: &mut Player) -> bool {
        if self.melee_timer > 0.0 {
            self.melee_timer -= dt;
            return false;
        }
        let distance = planar(self.position).distance(planar(player.position()));
        if distance > params.range {
            return false;
        }
        self.melee_timer = params.cooldown;
        player.take_damage(params.damage)
    }

    fn shoot(&mut self, params: &RangedParams, dt: f32, player: &Player) -> bool {
        if !self.can_fire {
            return false;
        }
        if self.burst_timer > 0.0 {
            self.burst_timer -= dt;
            return false;
        }
        if self.ranged_timer > 0.0 && self.burst_left == 0 {
            self.ranged_timer -= dt;
            return false;
        }
        if self.burst_left == 0 {
            self.burst_left = params.burst.max(1);
        }
        if self.ranged_timer > 0.0 {
            self.ranged_timer -= dt;
            return false;
        }

        let target = player.position();
        if !segment_visible(self.position, target, &player.aabb()) {
            return false;
        }
        let direction = vec_normalize(planar(target) - planar(self.position));
        if direction == Vec2::ZERO {
            return false;
        }

        let velocity = direction * params.projectile_speed;
        self.projectiles.push(Projectile {
            position: self.position,
            velocity: Vec3::new(velocity.x, 0.0, velocity.y),
            ttl: params.projectile_ttl,
        });
        self.burst_left -= 1;
        if self.burst_left > 0 {
            self.burst_timer = params.burst_gap;
        } else {
            self.ranged_timer = params.cooldown;
        }
        true
    }

    /// Keeps the enemy on its layer after moving from `previous`.
    fn confine(&mut self, previous: Vec2, terrain: &Terrain) {
        if let TerrainLayer::PlatformLocked(id) = self.layer {
            let Some(platform) = terrain.platform(id) else {
                debug!(
                    "enemy in section {:?} is pinned to missing platform {id:?}; left unconfined",
                    self.section
                );
                return;
            };
            let here = planar(self.position);
            let kept = if platform.contains(here.x, here.y) {
                here
            } else {
                previous
            };
            self.set_planar_position(platform.clamp_inside(kept, PLATFORM_EDGE_MARGIN));
            self.position.y = platform.top + ENEMY_SIZE / 2.0;
            return;
        }

        let here = planar(self.position);
        if terrain.on_raised_platform(here.x, here.y) {
            self.set_planar_position(previous);
        }
        self.position.y = ENEMY_SIZE / 2.0;

        let here = planar(self.position);
        if let Some(ramp) = terrain.ramps.iter().find(|r| r.contains(here.x, here.y)) {
            let mut body = self.aabb();
            for wall in ramp.side_walls(ENEMY_RAMP_WALL_THICKNESS) {
                body.push_out(&wall);
            }
            self.set_planar_position(planar(body.center()));
            let here = planar(self.position);
            if ramp.contains(here.x, here.y) {
                self.set_planar_position(previous);
            }
        }
    }

    fn advance_projectiles(&mut self, dt: f32, player: &mut Player) -> u8 {
        let target = player.position();
        let mut landed = 0;
        let mut hits = 0_u8;
        self.projectiles
            .retain_mut(|shot| match shot.advance(dt, target) {
                Flight::Airborne => true,
                Flight::Hit => {
                    hits += 1;
                    false
                }
                Flight::Expired => false,
            });
        if let EnemyKind::Ranged(params) = &self.kind {
            for _ in 0..hits {
                if player.take_damage(params.damage) {
                    landed += 1;
                }
            }
        }
        landed
    }
}
