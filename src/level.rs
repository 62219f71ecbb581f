//! Level configuration: terrain, sections, worlds and objective placement.
//!
//! Levels are plain JSON documents deserialised into [`LevelConfig`].
//! [`LevelConfig::default`] yields the built-in arena with three worlds.

use std::fs;
use std::path::{Path, PathBuf};

use glam::Vec2;
use log::warn;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::collision::Rect;
use crate::enemy::EnemyType;
use crate::player::PlayerConfig;
use crate::stage::{SectionId, SectionLayout, SpawnPoint};
use crate::terrain::{Platform, Ramp, Terrain};
use crate::world::{WorldId, WorldTable, ETER, OVERWORLD, UNDERGROUND};
use crate::{ALTAR_RADIUS, CHEST_RADIUS, DEFAULT_LEASH_RADIUS};

/// Errors raised while loading or validating a level.
#[derive(Debug, Error)]
pub enum LevelError {
    /// The level file could not be read.
    #[error("failed to read level file {path}: {source}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// The document is not valid level JSON, or could not be written as JSON.
    #[error("invalid level JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// The level declares no worlds.
    #[error("level declares no worlds")]
    NoWorlds,
    /// Two worlds share an id.
    #[error("world {0:?} is declared more than once")]
    DuplicateWorld(WorldId),
    /// A roster names a world that is not declared.
    #[error("section {section:?} has a roster for unknown world {world:?}")]
    UnknownWorld {
        /// Offending section.
        section: SectionId,
        /// Undeclared world.
        world: WorldId,
    },
    /// A requested world is not declared by the level.
    #[error("world {0:?} is not declared")]
    UndeclaredWorld(WorldId),
    /// Two sections share an id.
    #[error("section {0:?} is declared more than once")]
    DuplicateSection(SectionId),
    /// Two sections overlap by more than a shared edge.
    #[error("sections {first:?} and {second:?} overlap")]
    OverlappingSections {
        /// Earlier section.
        first: SectionId,
        /// Later section.
        second: SectionId,
    },
    /// The leash radius is zero, negative or not finite.
    #[error("leash radius must be positive, got {0}")]
    InvalidLeashRadius(f32),
    /// The altar radius is zero, negative or not finite.
    #[error("altar radius must be positive, got {0}")]
    InvalidAltarRadius(f32),
    /// The chest radius is zero, negative or not finite.
    #[error("chest radius must be positive, got {0}")]
    InvalidChestRadius(f32),
    /// A world's enemy profile has no hit points.
    #[error("world {world:?} gives {kind:?} enemies zero hit points")]
    EmptyProfile {
        /// World declaring the profile.
        world: WorldId,
        /// Archetype the profile applies to.
        kind: EnemyType,
    },
}

/// Where the echo and portal appear.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AltarConfig {
    /// Position on the (x,z) plane.
    pub position: Vec2,
    /// Interaction radius.
    #[serde(default = "default_altar_radius")]
    pub radius: f32,
}

fn default_altar_radius() -> f32 {
    ALTAR_RADIUS
}

/// Where the collected echoes are handed in.
///
/// The chest only exists in the first world of the cycle. Interacting
/// there while holding every echo finishes the game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChestConfig {
    /// Position on the (x,z) plane.
    pub position: Vec2,
    /// Interaction radius, inclusive.
    #[serde(default = "default_chest_radius")]
    pub radius: f32,
}

impl ChestConfig {
    /// Chest at `position` with the default radius.
    #[must_use]
    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            radius: CHEST_RADIUS,
        }
    }
}

fn default_chest_radius() -> f32 {
    CHEST_RADIUS
}

fn default_leash_radius() -> f32 {
    DEFAULT_LEASH_RADIUS
}

/// Complete description of a playable level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    /// Static terrain. Omitted terrain means flat ground.
    #[serde(default)]
    pub terrain: Terrain,
    /// Sections in lookup order.
    pub sections: Vec<SectionLayout>,
    /// Worlds in progression order.
    pub worlds: WorldTable,
    /// Leash radius given to every spawned enemy.
    #[serde(default = "default_leash_radius")]
    pub leash_radius: f32,
    /// Where the player starts each world.
    pub player_start: Vec2,
    /// Player attributes.
    #[serde(default)]
    pub player: PlayerConfig,
    /// Objective placement.
    pub altar: AltarConfig,
    /// Finale placement. Without a chest the game never completes.
    #[serde(default)]
    pub chest: Option<ChestConfig>,
}

fn overlap_strictly(a: &Rect, b: &Rect) -> bool {
    a.x_min < b.x_max && b.x_min < a.x_max && a.z_min < b.z_max && b.z_min < a.z_max
}

impl LevelConfig {
    /// Parses and validates a JSON level.
    ///
    /// # Errors
    /// Returns [`LevelError::Json`] for malformed JSON and any validation
    /// error reported by [`LevelConfig::validate`].
    pub fn from_json_str(json: &str) -> Result<Self, LevelError> {
        let level: Self = serde_json::from_str(json)?;
        level.validate()?;
        Ok(level)
    }

    /// Reads, parses and validates a JSON level file.
    ///
    /// # Errors
    /// Returns [`LevelError::Io`] when the file cannot be read, otherwise as
    /// [`LevelConfig::from_json_str`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LevelError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| LevelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Serialises the level as pretty JSON.
    ///
    /// # Errors
    /// Returns [`LevelError::Json`] if serialisation fails.
    pub fn to_json_string(&self) -> Result<String, LevelError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks cross-references and numeric ranges.
    ///
    /// Sections whose bounds share only an edge are allowed; lookup then
    /// prefers the earlier one.
    ///
    /// # Errors
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), LevelError> {
        if !(self.leash_radius.is_finite() && self.leash_radius > 0.0) {
            return Err(LevelError::InvalidLeashRadius(self.leash_radius));
        }
        if !(self.altar.radius.is_finite() && self.altar.radius > 0.0) {
            return Err(LevelError::InvalidAltarRadius(self.altar.radius));
        }
        if let Some(chest) = &self.chest {
            if !(chest.radius.is_finite() && chest.radius > 0.0) {
                return Err(LevelError::InvalidChestRadius(chest.radius));
            }
        }

        let themes = self.worlds.themes();
        if themes.is_empty() {
            return Err(LevelError::NoWorlds);
        }
        for (idx, theme) in themes.iter().enumerate() {
            if themes.iter().skip(idx + 1).any(|other| other.id == theme.id) {
                return Err(LevelError::DuplicateWorld(theme.id));
            }
            for kind in [EnemyType::Melee, EnemyType::Ranged] {
                if theme.profile(kind).hp == 0 {
                    return Err(LevelError::EmptyProfile {
                        world: theme.id,
                        kind,
                    });
                }
            }
        }

        for (idx, section) in self.sections.iter().enumerate() {
            for later in self.sections.iter().skip(idx + 1) {
                if later.id == section.id {
                    return Err(LevelError::DuplicateSection(section.id));
                }
                if overlap_strictly(&section.bounds, &later.bounds) {
                    return Err(LevelError::OverlappingSections {
                        first: section.id,
                        second: later.id,
                    });
                }
            }
            let mut worlds: Vec<WorldId> = section.rosters.keys().copied().collect();
            worlds.sort_unstable();
            if let Some(world) = worlds.into_iter().find(|w| self.worlds.get(*w).is_none()) {
                return Err(LevelError::UnknownWorld {
                    section: section.id,
                    world,
                });
            }
        }

        if !self.sections.iter().any(|s| s.key) {
            warn!("level has no key sections; every echo is available immediately");
        }
        let start = self.player_start;
        if !self
            .sections
            .iter()
            .any(|s| s.bounds.contains(start.x, start.y))
        {
            warn!(
                "player start ({}, {}) lies outside every section",
                self.player_start.x, self.player_start.y
            );
        }
        Ok(())
    }
}

const X_START: f32 = -18.0;
const X_END: f32 = 18.0;
const Z_MIN: f32 = -8.5;
const Z_MAX: f32 = 8.5;

fn builtin_terrain() -> Terrain {
    const Z_WALL: f32 = 16.5;
    const D_WALL: f32 = -9.0;
    const H_WALL: f32 = 7.0;

    let mut platforms = vec![
        Platform::new(0.0, 0.0, 42.0, -42.0, 0.0),
        Platform::new(-22.0, 0.0, 1.0, -42.0, 10.0).hidden(),
        Platform::new(22.0, 0.0, 1.0, -42.0, 10.0).hidden(),
        Platform::new(0.0, 22.0, 42.0, -1.0, 10.0).hidden(),
        Platform::new(0.0, -22.0, 42.0, -1.0, 10.0).hidden(),
    ];
    for z in [Z_WALL, -Z_WALL] {
        platforms.extend([
            Platform::new(-15.0, z, 14.0, D_WALL, H_WALL),
            Platform::new(0.0, z, 16.0, D_WALL, H_WALL),
            Platform::new(15.0, z, 14.0, D_WALL, H_WALL),
        ]);
    }
    platforms.extend([
        Platform::new(-7.0, 9.0, 8.0, -6.0, H_WALL),
        Platform::new(17.5, -10.0, 8.5, -5.0, H_WALL),
        Platform::new(17.5, 9.0, 9.0, -6.0, H_WALL),
        Platform::new(-3.5, 7.5, 6.5, -5.5, 3.5),
        Platform::new(11.5, -9.8, 7.0, -6.0, 4.0),
    ]);

    let ramps = vec![
        Ramp::new(-3.5, 3.0, 5.0, 5.5, 0.0, 3.5),
        Ramp::new(11.5, -3.8, 5.5, -6.0, 0.0, 4.0),
    ];
    Terrain::new(platforms, ramps)
}

fn builtin_section(
    id: u32,
    name: &str,
    x_range: (f32, f32),
    key: bool,
    rosters: [Vec<SpawnPoint>; 3],
) -> SectionLayout {
    let [over, eter, under] = rosters;
    SectionLayout {
        id: SectionId(id),
        name: name.to_owned(),
        bounds: Rect::new(x_range.0, x_range.1, Z_MIN, Z_MAX),
        key,
        rosters: [(OVERWORLD, over), (ETER, eter), (UNDERGROUND, under)]
            .into_iter()
            .collect(),
    }
}

fn builtin_sections() -> Vec<SectionLayout> {
    use SpawnPoint as S;

    let empty = || [Vec::new(), Vec::new(), Vec::new()];
    vec![
        builtin_section(0, "Entrance", (X_START, -13.0), false, empty()),
        builtin_section(
            1,
            "Encounter 1",
            (-13.0, -7.5),
            true,
            [
                vec![S::melee(-11.0, 1.0), S::melee(-9.5, -1.0)],
                vec![S::ranged(-11.0, 2.5), S::melee(-9.8, -1.5)],
                vec![S::melee(-11.2, -2.0), S::melee(-9.2, 2.0)],
            ],
        ),
        builtin_section(
            2,
            "Plateau climb 1",
            (-7.5, -1.0),
            true,
            [
                vec![S::melee(-6.2, -0.5), S::ranged(-6.8, 1.8)],
                vec![S::ranged(-5.0, 7.0), S::ranged(-2.0, 6.0)],
                vec![S::melee(-5.5, -1.5), S::ranged(-3.0, 7.0)],
            ],
        ),
        builtin_section(
            3,
            "Central corridor",
            (-1.0, 6.0),
            true,
            [
                vec![S::melee(1.0, 1.5), S::melee(3.0, -1.5)],
                vec![S::ranged(2.0, 2.5), S::ranged(4.0, -2.5)],
                vec![S::melee(1.5, 2.0), S::melee(4.0, 0.0)],
            ],
        ),
        builtin_section(
            4,
            "Plateau climb 2",
            (6.0, 12.5),
            true,
            [
                vec![S::ranged(8.8, -1.8), S::melee(8.0, 1.2)],
                vec![S::ranged(11.0, -7.0), S::ranged(17.0, -6.0)],
                vec![S::melee(8.5, 0.5), S::ranged(11.0, -7.0)],
            ],
        ),
        builtin_section(
            5,
            "Pre-altar",
            (12.5, 15.5),
            true,
            [
                vec![S::melee(13.5, 1.0)],
                vec![S::ranged(13.7, -2.0), S::melee(13.0, 2.0)],
                vec![S::melee(13.2, -1.0), S::melee(14.2, 2.0)],
            ],
        ),
        builtin_section(6, "Altar", (15.5, X_END), false, empty()),
    ]
}

impl Default for LevelConfig {
    fn default() -> Self {
        let player_start = Vec2::new(X_START + 1.0, 0.0);
        Self {
            terrain: builtin_terrain(),
            sections: builtin_sections(),
            worlds: WorldTable::default(),
            leash_radius: DEFAULT_LEASH_RADIUS,
            player_start,
            player: PlayerConfig::default(),
            altar: AltarConfig {
                position: Vec2::new(17.0, 0.0),
                radius: ALTAR_RADIUS,
            },
            chest: Some(ChestConfig::at(player_start - Vec2::new(0.0, 2.0))),
        }
    }
}
