//! Plateaus in a running session: pinned enemies and blocked players.

use echoes::enemy::TerrainLayer;
use echoes::session::TickInput;
use echoes::terrain::PlatformId;
use echoes::{MoveInput, ENEMY_SIZE, PLATFORM_EDGE_MARGIN};
use test_utils::{run_ticks, LevelBuilder, SectionBuilder, DT};

#[test]
fn plateau_guard_stays_on_top_while_the_player_is_held_off() {
    let mut session = LevelBuilder::new()
        .platform(0.0, 0.0, 6.0, 6.0, 3.0)
        .section(SectionBuilder::new(0, -10.0, 10.0, -10.0, 10.0).key().melee(0.0, 0.0))
        .start(-6.0, 0.0)
        .session();

    let approach = TickInput {
        movement: MoveInput {
            forward: true,
            ..MoveInput::default()
        },
        ..TickInput::default()
    };
    run_ticks(&mut session, DT, 120, &approach);

    let guard = session
        .stage()
        .enemies()
        .next()
        .unwrap_or_else(|| panic!("the guard should have spawned"));
    assert_eq!(guard.layer(), TerrainLayer::PlatformLocked(PlatformId(0)));
    assert!(guard.position().x >= -3.0 + PLATFORM_EDGE_MARGIN - 1e-4);
    assert!((guard.position().y - (3.0 + ENEMY_SIZE / 2.0)).abs() < 1e-5);

    let player = session.player().position();
    assert!(player.x <= -3.5 + 1e-4, "player walked into the plateau at {player}");
    assert!((player.y - 0.5).abs() < 1e-5);
}
