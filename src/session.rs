//! One running game: the fixed-order tick and objective progression.
//!
//! Each tick runs, in order: the sword trigger, the player update, section
//! resolution, fire permissions, enemy updates, sword hits and finally the
//! objective. Clearing every key section makes the world's echo collectible
//! at the altar; collecting it opens the portal, and interacting at the
//! altar with the portal open moves on to the next world. Once every echo is
//! held, interacting at the chest in the first world finishes the game and
//! seals the portal.

use bevy::prelude::Resource;
use glam::{Vec2, Vec3};
use hashbrown::HashSet;
use log::{debug, info};
use serde::Serialize;

use crate::collision::Aabb;
use crate::enemy::{Enemy, EnemyType};
use crate::level::{AltarConfig, ChestConfig, LevelConfig, LevelError};
use crate::player::{MoveInput, Player};
use crate::stage::{SectionId, Stage};
use crate::terrain::Terrain;
use crate::vector_math::planar;
use crate::world::{FireRule, WorldId, WorldTable};
use crate::ATTACK_DAMAGE;

/// Input sampled for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Movement keys held.
    pub movement: MoveInput,
    /// Attack pressed this tick.
    pub attack: bool,
    /// Interact pressed this tick.
    pub interact: bool,
}

/// Noteworthy state changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Milestone {
    /// A section spawned its roster.
    SectionActivated {
        /// The section.
        section: SectionId,
    },
    /// Every enemy of a section died.
    SectionCleared {
        /// The section.
        section: SectionId,
    },
    /// Every key section of the world is cleared.
    StageComplete {
        /// The world.
        world: WorldId,
    },
    /// The world's echo was collected.
    EchoCollected {
        /// The world.
        world: WorldId,
    },
    /// The player stepped through the portal.
    WorldAdvanced {
        /// World left behind.
        from: WorldId,
        /// World entered.
        to: WorldId,
    },
    /// The player's health reached zero.
    PlayerDied,
    /// Every echo was handed in at the chest.
    GameComplete,
}

/// What happened during one tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickSummary {
    /// Damage events that landed on the player.
    pub player_hits: u16,
    /// Sword contacts on enemies.
    pub enemy_hits: u16,
    /// Enemies killed.
    pub kills: u16,
    /// Projectiles fired.
    pub shots_fired: u16,
    /// Enemies pulled back to their home.
    pub leash_resets: u16,
    /// State changes, in the order they happened.
    pub milestones: Vec<Milestone>,
}

/// Read-only view of the player.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerView {
    /// Body centre.
    pub position: Vec3,
    /// Heading angle.
    pub facing: f32,
    /// Hit points.
    pub hp: u16,
    /// Maximum hit points.
    pub max_hp: u16,
    /// Whether alive.
    pub alive: bool,
    /// Sword hitbox during a swing.
    pub attack_hitbox: Option<Aabb>,
}

/// Read-only view of an enemy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnemyView {
    /// Owning section.
    pub section: Option<SectionId>,
    /// Archetype.
    pub kind: EnemyType,
    /// Body centre.
    pub position: Vec3,
    /// Heading angle.
    pub facing: f32,
    /// Hit points.
    pub hp: u16,
    /// Whether alive.
    pub alive: bool,
    /// Projectile positions.
    pub projectiles: Vec<Vec3>,
}

/// Read-only view of a section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionView {
    /// Identifier.
    pub id: SectionId,
    /// Display name.
    pub name: String,
    /// Whether it counts towards completion.
    pub key: bool,
    /// Whether its roster spawned.
    pub active: bool,
    /// Whether its roster is dead.
    pub cleared: bool,
}

/// Serialisable picture of the whole session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    /// Active world.
    pub world: WorldId,
    /// Its display name.
    pub world_name: String,
    /// Ticks run so far.
    pub ticks: u64,
    /// Simulated seconds.
    pub elapsed: f32,
    /// Section the player stands in.
    pub current_section: Option<SectionId>,
    /// Whether every key section is cleared.
    pub stage_complete: bool,
    /// Whether the echo waits at the altar.
    pub echo_collectible: bool,
    /// Whether the portal is open.
    pub portal_open: bool,
    /// Worlds whose echo has been collected, in ascending order.
    pub echoes: Vec<WorldId>,
    /// Whether the echoes were handed in.
    pub game_complete: bool,
    /// The player.
    pub player: PlayerView,
    /// Spawned enemies.
    pub enemies: Vec<EnemyView>,
    /// All sections.
    pub sections: Vec<SectionView>,
}

impl From<&Enemy> for EnemyView {
    fn from(enemy: &Enemy) -> Self {
        Self {
            section: enemy.section(),
            kind: enemy.kind().enemy_type(),
            position: enemy.position(),
            facing: enemy.facing(),
            hp: enemy.health().current(),
            alive: enemy.is_alive(),
            projectiles: enemy.projectiles().iter().map(|p| p.position).collect(),
        }
    }
}

/// A running game.
#[derive(Resource, Debug, Clone)]
pub struct GameSession {
    terrain: Terrain,
    worlds: WorldTable,
    stage: Stage,
    player: Player,
    player_start: Vec2,
    altar: AltarConfig,
    chest: Option<ChestConfig>,
    world: WorldId,
    echoes: HashSet<WorldId>,
    stage_was_complete: bool,
    game_complete: bool,
    ticks: u64,
    elapsed: f32,
}

impl GameSession {
    /// Starts `level` in its first world.
    ///
    /// # Errors
    /// Returns any error from [`LevelConfig::validate`].
    pub fn new(level: LevelConfig) -> Result<Self, LevelError> {
        level.validate()?;
        let world = level.worlds.first().ok_or(LevelError::NoWorlds)?;
        let LevelConfig {
            terrain,
            sections,
            worlds,
            leash_radius,
            player_start,
            player,
            altar,
            chest,
        } = level;
        Ok(Self {
            terrain,
            worlds,
            stage: Stage::new(sections, leash_radius),
            player: Player::new(player, player_start),
            player_start,
            altar,
            chest,
            world,
            echoes: HashSet::new(),
            stage_was_complete: false,
            game_complete: false,
            ticks: 0,
            elapsed: 0.0,
        })
    }

    /// Starts `level` in `world` instead of the first world.
    ///
    /// # Errors
    /// Returns any validation error, or [`LevelError::UndeclaredWorld`] when
    /// `world` is not part of the level.
    pub fn starting_in(level: LevelConfig, world: WorldId) -> Result<Self, LevelError> {
        let mut session = Self::new(level)?;
        if session.worlds.get(world).is_none() {
            return Err(LevelError::UndeclaredWorld(world));
        }
        session.world = world;
        Ok(session)
    }

    /// Active world.
    #[must_use]
    pub fn world(&self) -> WorldId {
        self.world
    }

    /// World table.
    #[must_use]
    pub fn worlds(&self) -> &WorldTable {
        &self.worlds
    }

    /// The player.
    #[must_use]
    pub fn player(&self) -> &Player {
        &self.player
    }

    /// Mutable access to the player, for scripted scenarios.
    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    /// The stage.
    #[must_use]
    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    /// Mutable access to the stage, for scripted scenarios.
    pub fn stage_mut(&mut self) -> &mut Stage {
        &mut self.stage
    }

    /// Static terrain.
    #[must_use]
    pub fn terrain(&self) -> &Terrain {
        &self.terrain
    }

    /// Whether the player is within the altar's radius.
    #[must_use]
    pub fn at_altar(&self) -> bool {
        planar(self.player.position()).distance(self.altar.position) < self.altar.radius
    }

    /// Whether the player can reach the chest. The chest only stands in the
    /// first world of the cycle.
    #[must_use]
    pub fn at_chest(&self) -> bool {
        if self.worlds.first() != Some(self.world) {
            return false;
        }
        self.chest.as_ref().is_some_and(|chest| {
            planar(self.player.position()).distance(chest.position) <= chest.radius
        })
    }

    /// Whether the echoes were handed in. The portal stays sealed afterwards.
    #[must_use]
    pub fn game_complete(&self) -> bool {
        self.game_complete
    }

    /// Whether the given world's echo has been collected.
    #[must_use]
    pub fn echo_collected(&self, world: WorldId) -> bool {
        self.echoes.contains(&world)
    }

    /// Whether the echo waits at the altar.
    #[must_use]
    pub fn echo_collectible(&self) -> bool {
        !self.echo_collected(self.world) && self.stage.stage_complete()
    }

    /// Whether the portal to the next world is open.
    #[must_use]
    pub fn portal_open(&self) -> bool {
        !self.game_complete && self.echo_collected(self.world)
    }

    /// Whether every declared world's echo has been collected.
    #[must_use]
    pub fn all_echoes(&self) -> bool {
        self.worlds
            .themes()
            .iter()
            .all(|theme| self.echoes.contains(&theme.id))
    }

    /// Ticks run so far.
    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Simulated seconds so far.
    #[must_use]
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Runs one tick of `dt` seconds.
    pub fn tick(&mut self, dt: f32, input: &TickInput) -> TickSummary {
        let mut summary = TickSummary::default();
        let was_alive = self.player.is_alive();

        if input.attack {
            self.player.trigger_attack();
        }
        self.player.update(dt, &input.movement, &self.terrain);

        let ctx = self.worlds.context(self.world);
        let stage_report = self
            .stage
            .update(planar(self.player.position()), &ctx, &self.terrain);
        if let Some(section) = stage_report.activated {
            summary.milestones.push(Milestone::SectionActivated { section });
        }
        summary.milestones.extend(
            stage_report
                .cleared
                .into_iter()
                .map(|section| Milestone::SectionCleared { section }),
        );

        let fire_rule = ctx.fire_rule();
        self.grant_fire_permissions(fire_rule);

        for enemy in self.stage.enemies_mut() {
            let report = enemy.update(dt, &mut self.player, &self.terrain);
            summary.player_hits += u16::from(report.hits_landed);
            summary.shots_fired += u16::from(report.shots_fired);
            summary.leash_resets += u16::from(report.leash_reset);
        }

        self.resolve_sword_hits(&mut summary);

        if was_alive && !self.player.is_alive() {
            info!("player died in world {:?}", self.world);
            summary.milestones.push(Milestone::PlayerDied);
        }

        self.evaluate_objective(input, &mut summary);

        self.ticks += 1;
        self.elapsed += dt;
        summary
    }

    fn grant_fire_permissions(&mut self, rule: FireRule) {
        let allowed = match rule {
            FireRule::Always => true,
            FireRule::Pack { radius } => {
                let player = planar(self.player.position());
                self.stage.enemies().any(|enemy| {
                    enemy.is_alive()
                        && enemy.kind().enemy_type() == EnemyType::Melee
                        && planar(enemy.position()).distance(player) < radius
                })
            }
        };
        for enemy in self.stage.enemies_mut() {
            if enemy.kind().enemy_type() == EnemyType::Ranged {
                enemy.set_fire_permission(allowed);
            }
        }
    }

    fn resolve_sword_hits(&mut self, summary: &mut TickSummary) {
        let Some(hitbox) = self.player.attack_hitbox() else {
            return;
        };
        for enemy in self.stage.enemies_mut() {
            if enemy.is_alive() && hitbox.overlaps(&enemy.aabb()) {
                summary.enemy_hits += 1;
                if enemy.take_damage(ATTACK_DAMAGE) {
                    summary.kills += 1;
                }
            }
        }
    }

    fn evaluate_objective(&mut self, input: &TickInput, summary: &mut TickSummary) {
        let complete = self.stage.stage_complete();
        if complete && !self.stage_was_complete {
            info!("world {:?} stage complete", self.world);
            summary.milestones.push(Milestone::StageComplete { world: self.world });
        }
        self.stage_was_complete = complete;

        let at_altar = self.at_altar();
        if self.echo_collectible() && at_altar {
            info!("echo of world {:?} collected", self.world);
            self.echoes.insert(self.world);
            summary.milestones.push(Milestone::EchoCollected { world: self.world });
        }

        let mut interact = input.interact;
        if interact && !self.game_complete && self.all_echoes() && self.at_chest() {
            info!("all echoes handed in; game complete");
            self.game_complete = true;
            summary.milestones.push(Milestone::GameComplete);
            interact = false;
        }

        if interact && at_altar && self.portal_open() {
            let from = self.world;
            if let Some(to) = self.worlds.next(from) {
                self.advance_to(to);
                summary.milestones.push(Milestone::WorldAdvanced { from, to });
            }
        }
    }

    /// Switches to `world`: every section resets and the player returns to
    /// the start position.
    pub fn advance_to(&mut self, world: WorldId) {
        info!("entering world {world:?}");
        self.world = world;
        self.stage.reset_world();
        self.stage_was_complete = false;
        self.player.respawn_at(self.player_start);
        debug!(
            "player respawned at ({}, {})",
            self.player_start.x, self.player_start.y
        );
    }

    /// Read-only picture of the session.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        let mut echoes: Vec<WorldId> = self.echoes.iter().copied().collect();
        echoes.sort_unstable();
        let health = self.player.health();
        Snapshot {
            world: self.world,
            world_name: self
                .worlds
                .get(self.world)
                .map_or_else(String::new, |theme| theme.name.clone()),
            ticks: self.ticks,
            elapsed: self.elapsed,
            current_section: self.stage.current_section(),
            stage_complete: self.stage.stage_complete(),
            echo_collectible: self.echo_collectible(),
            portal_open: self.portal_open(),
            echoes,
            game_complete: self.game_complete,
            player: PlayerView {
                position: self.player.position(),
                facing: self.player.facing(),
                hp: health.current(),
                max_hp: health.max(),
                alive: self.player.is_alive(),
                attack_hitbox: self.player.attack_hitbox(),
            },
            enemies: self.stage.enemies().map(EnemyView::from).collect(),
            sections: self
                .stage
                .sections()
                .iter()
                .map(|section| SectionView {
                    id: section.id(),
                    name: section.name().to_owned(),
                    key: section.is_key(),
                    active: section.is_active(),
                    cleared: section.is_cleared(),
                })
                .collect(),
        }
    }
}
