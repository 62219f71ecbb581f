//! Ranged fire permissions under each world's fire rule.

use echoes::session::{GameSession, TickInput};
use echoes::world::{WorldId, OVERWORLD, UNDERGROUND};
use rstest::rstest;
use test_utils::{run_ticks, LevelBuilder, SectionBuilder, DT};

fn skirmish(world: WorldId, with_melee: bool) -> GameSession {
    let mut section = SectionBuilder::new(0, -10.0, 10.0, -10.0, 10.0)
        .key()
        .in_world(world)
        .ranged(0.0, 6.0);
    if with_melee {
        section = section.melee(2.0, 0.0);
    }
    let level = LevelBuilder::new().section(section).build();
    GameSession::starting_in(level, world)
        .unwrap_or_else(|e| panic!("skirmish level should be valid: {e}"))
}

fn shots_in_three_seconds(session: &mut GameSession) -> u16 {
    run_ticks(session, DT, 180, &TickInput::default())
        .iter()
        .map(|summary| summary.shots_fired)
        .sum()
}

#[rstest]
#[case::always_alone(OVERWORLD, false, true)]
#[case::always_with_pack(OVERWORLD, true, true)]
#[case::pack_alone(UNDERGROUND, false, false)]
#[case::pack_with_melee_near(UNDERGROUND, true, true)]
fn ranged_fires_per_world_rule(
    #[case] world: WorldId,
    #[case] with_melee: bool,
    #[case] expect_fire: bool,
) {
    let mut session = skirmish(world, with_melee);
    let shots = shots_in_three_seconds(&mut session);
    assert_eq!(shots > 0, expect_fire, "fired {shots} shots");
}

#[test]
fn pack_permission_lapses_when_the_melee_dies() {
    let mut session = skirmish(UNDERGROUND, true);
    run_ticks(&mut session, DT, 1, &TickInput::default());
    for enemy in session.stage_mut().enemies_mut() {
        if enemy.kind().enemy_type() == echoes::EnemyType::Melee {
            while enemy.is_alive() {
                enemy.take_damage(1);
            }
        }
    }
    run_ticks(&mut session, DT, 1, &TickInput::default());
    assert_eq!(shots_in_three_seconds(&mut session), 0);
}
