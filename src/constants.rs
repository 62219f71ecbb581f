//! Gameplay constants shared across the simulation.
//!
//! Distances are in world units, durations in seconds. Profiles and player
//! configuration use these as their defaults, so tuning a value here changes
//! every level that does not override it.

/// Divisor applied to a platform's depth to obtain its collision half-depth.
pub const PLATFORM_FOOTPRINT_SHRINK: f32 = 1.75;
/// Divisor applied to a ramp's depth to obtain its collision half-depth.
pub const RAMP_FOOTPRINT_SHRINK: f32 = 2.3;
/// Divisor locating the low end of a ramp's interpolation span.
pub const RAMP_SPAN_NEAR_DIVISOR: f32 = 2.0;
/// Divisor locating the high end of a ramp's interpolation span.
pub const RAMP_SPAN_FAR_DIVISOR: f32 = 1.2;
/// Spans shorter than this are treated as flat.
pub const RAMP_MIN_SPAN: f32 = 1e-6;
/// Margin from the top edge inside which a ramp yields no height gain.
pub const RAMP_CLIMB_MARGIN: f32 = 0.5;
/// Margin used by the player when deciding whether a ramp applies at all.
pub const RAMP_APPROACH_MARGIN: f32 = 0.15;

/// Half thickness of the invisible walls along a ramp's sides for players.
pub const PLAYER_RAMP_WALL_THICKNESS: f32 = 0.18;
/// Half thickness of the invisible walls along a ramp's sides for enemies.
pub const ENEMY_RAMP_WALL_THICKNESS: f32 = 0.20;
/// Distance kept from platform edges when clamping a pinned enemy.
pub const PLATFORM_EDGE_MARGIN: f32 = 0.35;
/// Feet within this distance of a block's top may walk onto it.
pub const STEP_TOLERANCE: f32 = 0.15;

/// Default player movement speed.
pub const PLAYER_SPEED: f32 = 6.0;
/// Default player maximum health.
pub const PLAYER_MAX_HEALTH: u16 = 10;
/// Edge length of the player's cube.
pub const PLAYER_SIZE: f32 = 1.0;
/// Invulnerability window opened by each damage event.
pub const PLAYER_INVULNERABILITY: f32 = 0.5;
/// Duration of a sword swing.
pub const ATTACK_WINDOW: f32 = 0.25;
/// Forward offset of the sword hitbox from the player's centre.
pub const ATTACK_REACH: f32 = 1.0;
/// Horizontal half extent of the sword hitbox.
pub const ATTACK_HALF_WIDTH: f32 = 0.3;
/// Vertical half extent of the sword hitbox.
pub const ATTACK_HALF_HEIGHT: f32 = 0.2;
/// Damage dealt by one sword contact.
pub const ATTACK_DAMAGE: u16 = 1;

/// Edge length of an enemy's cube.
pub const ENEMY_SIZE: f32 = 1.0;
/// Default leash radius for a stage.
pub const DEFAULT_LEASH_RADIUS: f32 = 7.0;
/// Attack cooldown forced on both attack types after a leash reset.
pub const LEASH_RESET_COOLDOWN: f32 = 0.2;
/// Horizontal distances below this count as "standing on the player".
pub const CONTACT_EPSILON: f32 = 1e-6;

/// Default melee reach.
pub const MELEE_RANGE: f32 = 1.2;
/// Default melee damage.
pub const MELEE_DAMAGE: u16 = 1;
/// Default delay between melee hits.
pub const MELEE_COOLDOWN: f32 = 0.8;

/// Default damage dealt by a projectile.
pub const RANGED_DAMAGE: u16 = 1;
/// Default delay between bursts.
pub const RANGED_COOLDOWN: f32 = 2.0;
/// Lower bound applied to stamped ranged cooldowns.
pub const RANGED_COOLDOWN_FLOOR: f32 = 1.6;
/// Delay between shots inside one burst.
pub const BURST_GAP: f32 = 0.12;
/// Kiting enemies retreat when the player is closer than this.
pub const KITE_NEAR: f32 = 5.0;
/// Kiting enemies advance when the player is farther than this.
pub const KITE_FAR: f32 = 9.0;
/// Projectile travel speed.
pub const PROJECTILE_SPEED: f32 = 11.0;
/// Projectile lifetime.
pub const PROJECTILE_TTL: f32 = 2.0;
/// Horizontal proximity at which a projectile hits the player.
pub const PROJECTILE_HIT_RADIUS: f32 = 0.8;
/// Vertical proximity at which a projectile hits the player.
pub const PROJECTILE_HIT_HEIGHT: f32 = 1.0;

/// Radius used by the pack fire rule.
pub const PACK_RADIUS: f32 = 2.5;
/// Interaction radius around the altar.
pub const ALTAR_RADIUS: f32 = 1.2;
/// Interaction radius around the echo chest.
pub const CHEST_RADIUS: f32 = 1.6;
