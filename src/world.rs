//! World themes: per-world enemy tuning, fire rules and the world cycle.
//!
//! The same map is replayed once per world. What changes between worlds is
//! carried by a [`WorldTheme`], and updates receive the active theme through
//! an explicit [`WorldContext`] value.

use serde::{Deserialize, Serialize};

use crate::enemy::{Behaviour, EnemyProfile, EnemyType};
use crate::PACK_RADIUS;

/// Identifier of a world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorldId(pub u8);

/// When ranged enemies may shoot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum FireRule {
    /// Ranged enemies may always fire.
    #[default]
    Always,
    /// Ranged enemies fire only while a live melee enemy is within `radius`
    /// of the player.
    Pack {
        /// Horizontal distance from the player.
        radius: f32,
    },
}

/// Everything that varies between worlds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldTheme {
    /// Identifier used by section rosters.
    pub id: WorldId,
    /// Display name.
    pub name: String,
    /// Stats for melee enemies.
    pub melee: EnemyProfile,
    /// Stats for ranged enemies.
    pub ranged: EnemyProfile,
    /// Ranged fire rule.
    #[serde(default)]
    pub fire_rule: FireRule,
}

impl WorldTheme {
    /// Profile for `kind`.
    #[must_use]
    pub fn profile(&self, kind: EnemyType) -> &EnemyProfile {
        match kind {
            EnemyType::Melee => &self.melee,
            EnemyType::Ranged => &self.ranged,
        }
    }
}

/// The active world as seen by one update.
#[derive(Debug, Clone, Copy)]
pub struct WorldContext<'a> {
    /// Active world.
    pub id: WorldId,
    /// Its theme, if the table has one.
    pub theme: Option<&'a WorldTheme>,
}

impl WorldContext<'_> {
    /// Profile for `kind`, falling back to built-in stats.
    #[must_use]
    pub fn profile(&self, kind: EnemyType) -> EnemyProfile {
        self.theme.map_or_else(
            || EnemyProfile::fallback(kind),
            |theme| theme.profile(kind).clone(),
        )
    }

    /// Fire rule in force.
    #[must_use]
    pub fn fire_rule(&self) -> FireRule {
        self.theme.map_or(FireRule::Always, |theme| theme.fire_rule)
    }
}

/// Ordered set of worlds. Progression walks the order and wraps around.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorldTable {
    themes: Vec<WorldTheme>,
}

impl WorldTable {
    /// Builds a table in progression order.
    #[must_use]
    pub fn new(themes: Vec<WorldTheme>) -> Self {
        Self { themes }
    }

    /// Themes in progression order.
    #[must_use]
    pub fn themes(&self) -> &[WorldTheme] {
        &self.themes
    }

    /// Looks up a theme.
    #[must_use]
    pub fn get(&self, id: WorldId) -> Option<&WorldTheme> {
        self.themes.iter().find(|theme| theme.id == id)
    }

    /// First world of the cycle.
    #[must_use]
    pub fn first(&self) -> Option<WorldId> {
        self.themes.first().map(|theme| theme.id)
    }

    /// World following `id`, wrapping to the first. Unknown ids restart the
    /// cycle.
    #[must_use]
    pub fn next(&self, id: WorldId) -> Option<WorldId> {
        let position = self.themes.iter().position(|theme| theme.id == id);
        match position {
            Some(idx) => self
                .themes
                .get(idx + 1)
                .or_else(|| self.themes.first())
                .map(|theme| theme.id),
            None => self.first(),
        }
    }

    /// Context for updates running in world `id`.
    #[must_use]
    pub fn context(&self, id: WorldId) -> WorldContext<'_> {
        WorldContext {
            id,
            theme: self.get(id),
        }
    }
}

/// The first world.
pub const OVERWORLD: WorldId = WorldId(0);
/// The second world.
pub const ETER: WorldId = WorldId(1);
/// The third world.
pub const UNDERGROUND: WorldId = WorldId(2);

impl Default for WorldTable {
    fn default() -> Self {
        let profile = |hp, speed, behaviour, fire_cooldown, burst| EnemyProfile {
            hp,
            speed,
            behaviour,
            fire_cooldown,
            burst,
        };
        Self::new(vec![
            WorldTheme {
                id: OVERWORLD,
                name: "Overworld".to_owned(),
                melee: profile(3, 2.0, Behaviour::Chase, 2.0, 1),
                ranged: profile(2, 1.5, Behaviour::Kite, 2.2, 1),
                fire_rule: FireRule::Always,
            },
            WorldTheme {
                id: ETER,
                name: "Eter".to_owned(),
                melee: profile(2, 3.2, Behaviour::Backstab, 2.0, 1),
                ranged: profile(3, 2.0, Behaviour::KiteBurst, 1.8, 2),
                fire_rule: FireRule::Always,
            },
            WorldTheme {
                id: UNDERGROUND,
                name: "Underground".to_owned(),
                melee: profile(4, 1.9, Behaviour::PackChase, 2.0, 1),
                ranged: profile(1, 2.2, Behaviour::Opportunist, 2.5, 1),
                fire_rule: FireRule::Pack {
                    radius: PACK_RADIUS,
                },
            },
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(OVERWORLD, Some(ETER))]
    #[case(ETER, Some(UNDERGROUND))]
    #[case(UNDERGROUND, Some(OVERWORLD))]
    #[case::unknown(WorldId(9), Some(OVERWORLD))]
    fn worlds_cycle(#[case] from: WorldId, #[case] expected: Option<WorldId>) {
        assert_eq!(WorldTable::default().next(from), expected);
    }

    #[test]
    fn empty_table_has_no_next() {
        assert_eq!(WorldTable::new(Vec::new()).next(OVERWORLD), None);
    }

    #[test]
    fn context_falls_back_for_unknown_world() {
        let table = WorldTable::default();
        let ctx = table.context(WorldId(7));
        assert_eq!(ctx.profile(EnemyType::Melee), EnemyProfile::fallback(EnemyType::Melee));
        assert_eq!(ctx.fire_rule(), FireRule::Always);
    }

    #[test]
    fn underground_uses_pack_rule() {
        let table = WorldTable::default();
        let ctx = table.context(UNDERGROUND);
        assert_eq!(ctx.fire_rule(), FireRule::Pack { radius: PACK_RADIUS });
        assert_eq!(ctx.profile(EnemyType::Ranged).behaviour, Behaviour::Opportunist);
    }

    #[test]
    fn fire_rule_round_trips_through_json() {
        let json = r#"{"rule": "pack", "radius": 3.0}"#;
        let rule: FireRule =
            serde_json::from_str(json).unwrap_or_else(|e| panic!("rule should parse: {e}"));
        assert_eq!(rule, FireRule::Pack { radius: 3.0 });
    }
}
