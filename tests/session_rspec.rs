//! Behavioural tests for objective progression across worlds.
//!
//! A single key section holds one melee guard per world standing beside the
//! altar, with the echo chest on the same spot. Killing the guard completes
//! the stage, the echo is collected on the spot and interacting opens the
//! way to the next world. Back in the first world with every echo held,
//! interacting hands them in at the chest.

#[path = "support/rspec_runner.rs"]
mod rspec_runner;

use std::sync::{Arc, Mutex, MutexGuard};

use echoes::session::{GameSession, Milestone, TickInput};
use echoes::stage::SectionId;
use echoes::world::{ETER, OVERWORLD, UNDERGROUND};
use echoes::EnemyState;
use rspec::block::Context as Scenario;
use rspec_runner::run_serial;
use test_utils::{run_until, LevelBuilder, SectionBuilder, DT};

const GUARDED: SectionId = SectionId(0);

#[derive(Clone, Debug)]
struct Env {
    session: Arc<Mutex<GameSession>>,
    milestones: Arc<Mutex<Vec<Milestone>>>,
}

fn guarded_altar() -> GameSession {
    LevelBuilder::new()
        .section(
            SectionBuilder::new(0, -5.0, 5.0, -5.0, 5.0)
                .key()
                .melee(0.0, 1.0)
                .in_world(ETER)
                .melee(0.0, 1.0)
                .in_world(UNDERGROUND)
                .melee(0.0, 1.0),
        )
        .start(0.0, 0.0)
        .altar(0.0, 0.0)
        .chest(0.0, 0.0)
        .session()
}

impl Default for Env {
    fn default() -> Self {
        Self {
            session: Arc::new(Mutex::new(guarded_altar())),
            milestones: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl Env {
    fn session(&self) -> MutexGuard<'_, GameSession> {
        self.session
            .lock()
            .unwrap_or_else(|e| panic!("session mutex poisoned: {e}"))
    }

    fn milestones(&self) -> Vec<Milestone> {
        self.milestones
            .lock()
            .unwrap_or_else(|e| panic!("milestone mutex poisoned: {e}"))
            .clone()
    }

    fn reset(&self) {
        *self.session() = guarded_altar();
        self.milestones
            .lock()
            .unwrap_or_else(|e| panic!("milestone mutex poisoned: {e}"))
            .clear();
    }

    fn step(&self, input: &TickInput) {
        let summary = self.session().tick(DT, input);
        self.milestones
            .lock()
            .unwrap_or_else(|e| panic!("milestone mutex poisoned: {e}"))
            .extend(summary.milestones);
    }

    fn fight(&self) {
        let swing = TickInput {
            attack: true,
            ..TickInput::default()
        };
        for _ in 0..60 {
            self.step(&swing);
            if self.session().portal_open() {
                return;
            }
        }
        panic!("the guard should fall and the echo be collected within a second");
    }

    fn interact(&self) {
        self.step(&TickInput {
            interact: true,
            ..TickInput::default()
        });
    }

    fn tour(&self) {
        for _ in 0..3 {
            self.fight();
            self.interact();
        }
    }

    fn count(&self, milestone: Milestone) -> usize {
        self.milestones().iter().filter(|m| **m == milestone).count()
    }
}

#[test]
fn clearing_the_stage_opens_the_portal() {
    run_serial(&rspec::given(
        "a key section guarded by one melee enemy beside the altar",
        Env::default(),
        |scenario: &mut Scenario<Env>| {
            scenario.when("the player swings until the guard falls", |ctx| {
                ctx.before_each(|env| {
                    env.reset();
                    env.fight();
                });

                ctx.then("the section clears and the stage completes", |env| {
                    let session = env.session();
                    let section = session
                        .stage()
                        .section(GUARDED)
                        .unwrap_or_else(|| panic!("guarded section should exist"));
                    assert!(section.is_cleared());
                    assert!(session.stage().stage_complete());
                });

                ctx.then("milestones arrive in order", |env| {
                    let milestones = env.milestones();
                    let expected = [
                        Milestone::SectionActivated { section: GUARDED },
                        Milestone::SectionCleared { section: GUARDED },
                        Milestone::StageComplete { world: OVERWORLD },
                        Milestone::EchoCollected { world: OVERWORLD },
                    ];
                    assert_eq!(milestones, expected);
                });

                ctx.then("the echo is held and cannot be collected again", |env| {
                    {
                        let session = env.session();
                        assert!(session.echo_collected(OVERWORLD));
                        assert!(!session.echo_collectible());
                        assert!(!session.all_echoes());
                    }
                    env.step(&TickInput::default());
                    let collected = env
                        .milestones()
                        .iter()
                        .filter(|m| matches!(m, Milestone::EchoCollected { .. }))
                        .count();
                    assert_eq!(collected, 1);
                });

                ctx.then("the world stays put without an interaction", |env| {
                    for _ in 0..30 {
                        env.step(&TickInput::default());
                    }
                    assert_eq!(env.session().world(), OVERWORLD);
                });
            });

            scenario.when("the player interacts at the open portal", |ctx| {
                ctx.before_each(|env| {
                    env.reset();
                    env.fight();
                    env.interact();
                });

                ctx.then("the session moves to the next world", |env| {
                    assert_eq!(env.session().world(), ETER);
                    assert!(env.milestones().contains(&Milestone::WorldAdvanced {
                        from: OVERWORLD,
                        to: ETER,
                    }));
                });

                ctx.then("every section is dormant and the portal closed", |env| {
                    let session = env.session();
                    assert!(session.stage().sections().iter().all(|s| !s.is_active()));
                    assert!(!session.stage().stage_complete());
                    assert!(!session.portal_open());
                    assert!(session.echo_collected(OVERWORLD));
                });

                ctx.then("the next world's roster spawns with its own stats", |env| {
                    env.step(&TickInput::default());
                    let session = env.session();
                    let enemies: Vec<_> = session.stage().enemies().collect();
                    assert_eq!(enemies.len(), 1);
                    let guard = enemies
                        .first()
                        .unwrap_or_else(|| panic!("guard should respawn"));
                    assert_eq!(guard.health().max(), 2);
                    assert_eq!(guard.state(), EnemyState::Active);
                });
            });
        },
    ));
}

#[test]
fn handing_in_every_echo_finishes_the_game() {
    run_serial(&rspec::given(
        "three guarded worlds and a chest beside the start",
        Env::default(),
        |scenario: &mut Scenario<Env>| {
            scenario.when("the player clears every world and returns", |ctx| {
                ctx.before_each(|env| {
                    env.reset();
                    env.tour();
                });

                ctx.then("the cycle wraps back to the first world", |env| {
                    let session = env.session();
                    assert_eq!(session.world(), OVERWORLD);
                    assert!(session.all_echoes());
                    assert!(session.portal_open());
                    assert!(!session.game_complete());
                    drop(session);
                    assert_eq!(
                        env.count(Milestone::WorldAdvanced {
                            from: UNDERGROUND,
                            to: OVERWORLD,
                        }),
                        1
                    );
                });

                ctx.then("interacting at the chest finishes the game", |env| {
                    env.interact();
                    let session = env.session();
                    assert!(session.game_complete());
                    assert!(session.snapshot().game_complete);
                    assert!(!session.portal_open());
                    assert_eq!(session.world(), OVERWORLD);
                    drop(session);
                    assert_eq!(env.count(Milestone::GameComplete), 1);
                });

                ctx.then("the portal stays sealed afterwards", |env| {
                    for _ in 0..4 {
                        env.interact();
                    }
                    assert_eq!(env.session().world(), OVERWORLD);
                    assert_eq!(env.count(Milestone::GameComplete), 1);
                    assert_eq!(
                        env.count(Milestone::WorldAdvanced {
                            from: OVERWORLD,
                            to: ETER,
                        }),
                        1
                    );
                });
            });

            scenario.when("the player interacts at the chest with echoes missing", |ctx| {
                ctx.before_each(|env| {
                    env.reset();
                    env.fight();
                    env.interact();
                });

                ctx.then("the interaction opens the portal instead", |env| {
                    assert_eq!(env.session().world(), ETER);
                    assert!(!env.session().game_complete());
                    assert_eq!(env.count(Milestone::GameComplete), 0);
                });
            });
        },
    ));
}

#[test]
fn walking_away_from_the_altar_keeps_the_echo_waiting() {
    let mut session = LevelBuilder::new()
        .section(SectionBuilder::new(0, -5.0, 5.0, -5.0, 5.0).key())
        .altar(4.0, 0.0)
        .session();

    let ticks = run_until(&mut session, DT, 10, &TickInput::default(), |s| {
        s.stage().stage_complete()
    });
    assert_eq!(ticks, Some(1));
    assert!(session.echo_collectible());
    assert!(!session.portal_open());
}
