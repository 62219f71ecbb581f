#![cfg_attr(docsrs, feature(doc_cfg))]
//! Simulation core for a sectioned, multi-world action game.
//!
//! The map is split into rectangular sections. Entering one spawns its
//! roster for the active world; clearing every key section frees the
//! world's echo at the altar, and collecting it opens the portal to the
//! next world. [`GameSession`] runs the fixed-order tick and
//! [`EchoesPlugin`] drives it from a Bevy app.
pub mod collision;
pub mod constants;
pub mod enemy;
pub mod health;
pub mod level;
pub mod logging;
pub mod player;
pub mod plugin;
pub mod session;
pub mod stage;
pub mod terrain;
pub mod vector_math;
pub mod world;
pub use constants::*;

// Re-export commonly used items
pub use collision::{segment_visible, Aabb, Rect};
pub use enemy::{Behaviour, Enemy, EnemyKind, EnemyProfile, EnemyState, EnemyType, Projectile};
pub use health::Health;
pub use level::{AltarConfig, ChestConfig, LevelConfig, LevelError};
pub use logging::init as init_logging;
pub use player::{MoveInput, Player, PlayerConfig};
pub use plugin::{EchoesPlugin, ObjectiveEvent, PendingInput, SessionInitError, SessionSettings};
pub use session::{GameSession, Milestone, Snapshot, TickInput, TickSummary};
pub use stage::{Section, SectionId, SectionLayout, SpawnPoint, Stage};
pub use terrain::{Platform, PlatformId, Ramp, Terrain};
pub use vector_math::{heading, planar_distance, vec_normalize};
pub use world::{FireRule, WorldContext, WorldId, WorldTable, WorldTheme};

pub mod prelude {
    //! Prelude exports used in documentation examples.
    //!
    //! ```rust,no_run
    //! use echoes::prelude::*;
    //! ```

    pub use crate::EchoesPlugin;
    pub use crate::GameSession;
    pub use crate::LevelConfig;
    pub use crate::MoveInput;
    pub use crate::TickInput;
    pub use crate::WorldId;
    pub use glam::{Vec2, Vec3};
}
