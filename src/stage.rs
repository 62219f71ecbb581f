//! Sections of a stage: lazy enemy rosters, engagement and clearance.
//!
//! A stage is split into rectangular sections along the play area. Entering
//! a section for the first time spawns its roster for the current world; the
//! roster then lives until the section is reset. Only the section the player
//! stands in has engaged enemies.

use glam::Vec2;
use hashbrown::HashMap;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::collision::Rect;
use crate::enemy::{Enemy, EnemyKind, EnemyType};
use crate::terrain::{Platform, Terrain};
use crate::world::{WorldContext, WorldId};

/// Identifier of a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionId(pub u32);

/// One roster entry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnPoint {
    /// Archetype to spawn.
    pub kind: EnemyType,
    /// Spawn x.
    pub x: f32,
    /// Spawn z.
    pub z: f32,
}

impl SpawnPoint {
    /// Melee spawn at `(x, z)`.
    #[must_use]
    pub const fn melee(x: f32, z: f32) -> Self {
        Self {
            kind: EnemyType::Melee,
            x,
            z,
        }
    }

    /// Ranged spawn at `(x, z)`.
    #[must_use]
    pub const fn ranged(x: f32, z: f32) -> Self {
        Self {
            kind: EnemyType::Ranged,
            x,
            z,
        }
    }
}

/// Static description of a section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionLayout {
    /// Identifier.
    pub id: SectionId,
    /// Display name.
    pub name: String,
    /// Area on the (x,z) plane, edges inclusive.
    pub bounds: Rect,
    /// Whether clearing this section is required to finish the stage.
    #[serde(default)]
    pub key: bool,
    /// Spawns per world. Worlds without an entry spawn nothing.
    #[serde(default)]
    pub rosters: HashMap<WorldId, Vec<SpawnPoint>>,
}

/// Runtime state of a section.
#[derive(Debug, Clone)]
pub struct Section {
    layout: SectionLayout,
    active: bool,
    cleared: bool,
    enemies: Vec<Enemy>,
}

impl Section {
    /// Creates an inactive section.
    #[must_use]
    pub fn new(layout: SectionLayout) -> Self {
        Self {
            layout,
            active: false,
            cleared: false,
            enemies: Vec::new(),
        }
    }

    /// Identifier.
    #[must_use]
    pub fn id(&self) -> SectionId {
        self.layout.id
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.layout.name
    }

    /// Static description.
    #[must_use]
    pub fn layout(&self) -> &SectionLayout {
        &self.layout
    }

    /// Whether the section counts towards stage completion.
    #[must_use]
    pub fn is_key(&self) -> bool {
        self.layout.key
    }

    /// Whether the roster has been spawned.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Whether every enemy of the roster has died.
    #[must_use]
    pub fn is_cleared(&self) -> bool {
        self.cleared
    }

    /// Enemies spawned by this section.
    #[must_use]
    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    /// Mutable access to the spawned enemies.
    pub fn enemies_mut(&mut self) -> &mut [Enemy] {
        &mut self.enemies
    }

    /// Inclusive containment test.
    #[must_use]
    pub fn contains(&self, x: f32, z: f32) -> bool {
        self.layout.bounds.contains(x, z)
    }

    /// Spawns the roster for `world`. Does nothing when already active.
    ///
    /// Returns `true` when this call activated the section.
    pub fn activate(
        &mut self,
        world: &WorldContext<'_>,
        leash_radius: f32,
        terrain: &Terrain,
    ) -> bool {
        if self.active {
            return false;
        }
        self.active = true;

        let id = self.layout.id;
        let roster = self.layout.rosters.get(&world.id).map_or(&[][..], Vec::as_slice);
        self.enemies = roster
            .iter()
            .map(|spawn| {
                let profile = world.profile(spawn.kind);
                let enemy = Enemy::new(EnemyKind::standard(spawn.kind), Vec2::new(spawn.x, spawn.z))
                    .with_profile(&profile)
                    .with_leash(leash_radius)
                    .in_section(id);
                let pinned = terrain
                    .highest_platform_at(spawn.x, spawn.z)
                    .and_then(|pid| terrain.platform(pid).map(|p| (pid, p)))
                    .filter(|(_, platform)| Platform::is_raised(platform));
                match pinned {
                    Some((pid, platform)) => enemy.pinned_to(pid, platform),
                    None => enemy,
                }
            })
            .collect();
        debug!(
            "section {} '{}' activated with {} enemies",
            id.0,
            self.layout.name,
            self.enemies.len()
        );
        true
    }

    /// Marks the section cleared once active with every enemy dead.
    ///
    /// Returns `true` on the update that flips the flag.
    pub fn refresh_clearance(&mut self) -> bool {
        if !self.active || self.cleared {
            return false;
        }
        if self.enemies.iter().all(|enemy| !enemy.is_alive()) {
            self.cleared = true;
            return true;
        }
        false
    }

    /// Returns the section to its pre-activation state.
    pub fn reset(&mut self) {
        self.active = false;
        self.cleared = false;
        self.enemies.clear();
    }
}

/// What changed during one stage update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StageReport {
    /// Section activated this update.
    pub activated: Option<SectionId>,
    /// Sections that became cleared this update.
    pub cleared: Vec<SectionId>,
}

/// Ordered sections plus the player's current one.
#[derive(Debug, Clone)]
pub struct Stage {
    sections: Vec<Section>,
    leash_radius: f32,
    current: Option<SectionId>,
}

impl Stage {
    /// Builds a stage from section layouts in lookup order.
    #[must_use]
    pub fn new(layouts: Vec<SectionLayout>, leash_radius: f32) -> Self {
        Self {
            sections: layouts.into_iter().map(Section::new).collect(),
            leash_radius,
            current: None,
        }
    }

    /// Sections in lookup order.
    #[must_use]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Looks up a section by id.
    #[must_use]
    pub fn section(&self, id: SectionId) -> Option<&Section> {
        self.sections.iter().find(|s| s.id() == id)
    }

    /// Mutable lookup by id.
    pub fn section_mut(&mut self, id: SectionId) -> Option<&mut Section> {
        self.sections.iter_mut().find(|s| s.id() == id)
    }

    /// First section containing `(x, z)`.
    #[must_use]
    pub fn section_at(&self, x: f32, z: f32) -> Option<&Section> {
        self.sections.iter().find(|s| s.contains(x, z))
    }

    /// Section the player stood in at the last update.
    #[must_use]
    pub fn current_section(&self) -> Option<SectionId> {
        self.current
    }

    /// Leash radius given to spawned enemies.
    #[must_use]
    pub fn leash_radius(&self) -> f32 {
        self.leash_radius
    }

    /// Resolves the player's section, activates it, updates engagement and
    /// refreshes clearance.
    pub fn update(
        &mut self,
        player: Vec2,
        world: &WorldContext<'_>,
        terrain: &Terrain,
    ) -> StageReport {
        let mut report = StageReport::default();
        self.current = self.section_at(player.x, player.y).map(Section::id);

        let leash_radius = self.leash_radius;
        for section in &mut self.sections {
            let is_current = Some(section.id()) == self.current;
            if is_current && section.activate(world, leash_radius, terrain) {
                report.activated = Some(section.id());
            }
            for enemy in section.enemies_mut() {
                if is_current {
                    enemy.engage();
                } else {
                    enemy.disengage();
                }
            }
        }

        for section in &mut self.sections {
            if section.refresh_clearance() {
                debug!("section {} cleared", section.id().0);
                report.cleared.push(section.id());
            }
        }
        report
    }

    /// Every spawned enemy across all sections.
    pub fn enemies(&self) -> impl Iterator<Item = &Enemy> {
        self.sections.iter().flat_map(|s| s.enemies.iter())
    }

    /// Mutable iterator over every spawned enemy.
    pub fn enemies_mut(&mut self) -> impl Iterator<Item = &mut Enemy> {
        self.sections.iter_mut().flat_map(|s| s.enemies.iter_mut())
    }

    /// Whether every key section is cleared.
    #[must_use]
    pub fn stage_complete(&self) -> bool {
        self.sections
            .iter()
            .filter(|s| s.is_key())
            .all(Section::is_cleared)
    }

    /// Resets every section and forgets the current one.
    pub fn reset_world(&mut self) {
        for section in &mut self.sections {
            section.reset();
        }
        self.current = None;
    }
}
