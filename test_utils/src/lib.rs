//! Builders and drivers shared by the integration tests.
//!
//! Levels built here have no terrain unless asked for, so the floor is flat
//! at height zero and movement is easy to predict.

use echoes::collision::Rect;
use echoes::level::{AltarConfig, ChestConfig, LevelConfig};
use echoes::player::PlayerConfig;
use echoes::session::{GameSession, TickInput, TickSummary};
use echoes::stage::{SectionId, SectionLayout, SpawnPoint};
use echoes::terrain::{Platform, Terrain};
use echoes::world::{WorldId, WorldTable, OVERWORLD};
use echoes::{ALTAR_RADIUS, DEFAULT_LEASH_RADIUS};
use glam::Vec2;

/// Fixed step used by most scenarios.
pub const DT: f32 = 1.0 / 60.0;

/// Builder for [`SectionLayout`].
///
/// # Examples
/// ```
/// use test_utils::SectionBuilder;
/// let layout = SectionBuilder::new(3, -2.0, 2.0, -2.0, 2.0).key().melee(0.0, 0.0).build();
/// assert!(layout.key);
/// assert_eq!(layout.id.0, 3);
/// ```
#[derive(Debug, Clone)]
pub struct SectionBuilder {
    layout: SectionLayout,
    world: WorldId,
}

impl SectionBuilder {
    /// Starts a non-key section with no spawns, rosters going to the
    /// overworld until [`SectionBuilder::in_world`] says otherwise.
    #[must_use]
    pub fn new(id: u32, x_min: f32, x_max: f32, z_min: f32, z_max: f32) -> Self {
        Self {
            layout: SectionLayout {
                id: SectionId(id),
                name: format!("section {id}"),
                bounds: Rect::new(x_min, x_max, z_min, z_max),
                key: false,
                rosters: Default::default(),
            },
            world: OVERWORLD,
        }
    }

    /// Marks the section as required for stage completion.
    #[must_use]
    pub fn key(mut self) -> Self {
        self.layout.key = true;
        self
    }

    /// Directs following spawns to `world`.
    #[must_use]
    pub fn in_world(mut self, world: WorldId) -> Self {
        self.world = world;
        self.layout.rosters.entry(world).or_default();
        self
    }

    /// Adds a melee spawn.
    #[must_use]
    pub fn melee(self, x: f32, z: f32) -> Self {
        self.spawn(SpawnPoint::melee(x, z))
    }

    /// Adds a ranged spawn.
    #[must_use]
    pub fn ranged(self, x: f32, z: f32) -> Self {
        self.spawn(SpawnPoint::ranged(x, z))
    }

    fn spawn(mut self, point: SpawnPoint) -> Self {
        self.layout
            .rosters
            .entry(self.world)
            .or_default()
            .push(point);
        self
    }

    /// Finishes the layout.
    #[must_use]
    pub fn build(self) -> SectionLayout {
        self.layout
    }
}

/// Builder for [`LevelConfig`] on flat ground.
#[derive(Debug, Clone)]
pub struct LevelBuilder {
    level: LevelConfig,
}

impl Default for LevelBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl LevelBuilder {
    /// Empty level with the built-in worlds, the player at the origin, the
    /// altar far away and no chest.
    #[must_use]
    pub fn new() -> Self {
        Self {
            level: LevelConfig {
                terrain: Terrain::default(),
                sections: Vec::new(),
                worlds: WorldTable::default(),
                leash_radius: DEFAULT_LEASH_RADIUS,
                player_start: Vec2::ZERO,
                player: PlayerConfig::default(),
                altar: AltarConfig {
                    position: Vec2::new(1000.0, 1000.0),
                    radius: ALTAR_RADIUS,
                },
                chest: None,
            },
        }
    }

    /// Adds a section.
    #[must_use]
    pub fn section(mut self, section: SectionBuilder) -> Self {
        self.level.sections.push(section.build());
        self
    }

    /// Adds a platform.
    #[must_use]
    pub fn platform(mut self, x: f32, z: f32, width: f32, depth: f32, top: f32) -> Self {
        self.level
            .terrain
            .platforms
            .push(Platform::new(x, z, width, depth, top));
        self
    }

    /// Moves the player start.
    #[must_use]
    pub fn start(mut self, x: f32, z: f32) -> Self {
        self.level.player_start = Vec2::new(x, z);
        self
    }

    /// Moves the altar.
    #[must_use]
    pub fn altar(mut self, x: f32, z: f32) -> Self {
        self.level.altar.position = Vec2::new(x, z);
        self
    }

    /// Places the echo chest.
    #[must_use]
    pub fn chest(mut self, x: f32, z: f32) -> Self {
        self.level.chest = Some(ChestConfig::at(Vec2::new(x, z)));
        self
    }

    /// Finishes the level.
    #[must_use]
    pub fn build(self) -> LevelConfig {
        self.level
    }

    /// Finishes the level and starts a session on it.
    ///
    /// # Panics
    /// Panics if the level fails validation.
    #[must_use]
    pub fn session(self) -> GameSession {
        GameSession::new(self.level).unwrap_or_else(|e| panic!("test level should be valid: {e}"))
    }
}

/// Runs `ticks` ticks of `dt` with the same input and collects summaries.
pub fn run_ticks(
    session: &mut GameSession,
    dt: f32,
    ticks: usize,
    input: &TickInput,
) -> Vec<TickSummary> {
    (0..ticks).map(|_| session.tick(dt, input)).collect()
}

/// Ticks until `done` holds, returning how many ticks that took.
pub fn run_until(
    session: &mut GameSession,
    dt: f32,
    max_ticks: usize,
    input: &TickInput,
    mut done: impl FnMut(&GameSession) -> bool,
) -> Option<usize> {
    for tick in 1..=max_ticks {
        session.tick(dt, input);
        if done(session) {
            return Some(tick);
        }
    }
    None
}

/// Indices of ticks in which the player took damage.
#[must_use]
pub fn hit_ticks(summaries: &[TickSummary]) -> Vec<usize> {
    summaries
        .iter()
        .enumerate()
        .filter(|(_, summary)| summary.player_hits > 0)
        .map(|(idx, _)| idx)
        .collect()
}
