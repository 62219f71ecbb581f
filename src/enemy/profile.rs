//! Per-world tuning records stamped onto enemies when a section activates.
use serde::{Deserialize, Serialize};

use crate::{RANGED_COOLDOWN, RANGED_COOLDOWN_FLOOR};

/// Broad enemy archetype named in section rosters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyType {
    /// Closes in and strikes at short range.
    Melee,
    /// Keeps its distance and fires projectiles.
    Ranged,
}

/// Behaviour tag carried for presentation and fire rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Behaviour {
    /// Straight pursuit.
    Chase,
    /// Fast pursuit.
    Backstab,
    /// Slow pursuit that enables nearby ranged allies.
    PackChase,
    /// Keeps a firing band around the player.
    Kite,
    /// Kites and fires in bursts.
    KiteBurst,
    /// Fires only while a melee ally pressures the player.
    Opportunist,
}

/// Stats applied to one enemy type in one world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyProfile {
    /// Starting and maximum hit points.
    pub hp: u16,
    /// Movement speed in units per second.
    pub speed: f32,
    /// Behaviour tag.
    pub behaviour: Behaviour,
    /// Delay between ranged bursts. Ignored by melee enemies.
    #[serde(default = "default_fire_cooldown")]
    pub fire_cooldown: f32,
    /// Shots per ranged burst. Ignored by melee enemies.
    #[serde(default = "default_burst")]
    pub burst: u8,
}

fn default_fire_cooldown() -> f32 {
    RANGED_COOLDOWN
}

const fn default_burst() -> u8 {
    1
}

impl EnemyProfile {
    /// Built-in stats used when a world has no profile for `kind`.
    #[must_use]
    pub fn fallback(kind: EnemyType) -> Self {
        match kind {
            EnemyType::Melee => Self {
                hp: 3,
                speed: 3.0,
                behaviour: Behaviour::Chase,
                fire_cooldown: RANGED_COOLDOWN,
                burst: 1,
            },
            EnemyType::Ranged => Self {
                hp: 2,
                speed: 2.0,
                behaviour: Behaviour::Kite,
                fire_cooldown: RANGED_COOLDOWN,
                burst: 1,
            },
        }
    }

    /// Ranged cooldown after applying the lower bound.
    #[must_use]
    pub fn effective_fire_cooldown(&self) -> f32 {
        self.fire_cooldown.max(RANGED_COOLDOWN_FLOOR)
    }
}
