//! Bevy plugin driving a [`GameSession`] from the app schedule.
//!
//! The plugin owns no rendering. It inserts the session as a resource,
//! advances it once per `Update` using either a fixed step or the frame
//! delta, and raises [`ObjectiveEvent`]s for milestones so observers can
//! react without polling the session.

use bevy::ecs::prelude::On;
use bevy::prelude::*;
use log::{error, info};
use thiserror::Error;

use crate::level::LevelConfig;
use crate::session::{GameSession, Milestone, TickInput};

/// Runtime configuration for advancing the session.
#[derive(Resource, Clone, Debug, PartialEq)]
pub struct SessionSettings {
    /// When set, every update advances by exactly this many seconds.
    pub fixed_dt: Option<f32>,
    /// Upper bound on the frame delta when `fixed_dt` is unset.
    ///
    /// Clamps frame hitches so enemies do not tunnel through walls.
    pub max_delta_seconds: f32,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            fixed_dt: None,
            max_delta_seconds: 0.1,
        }
    }
}

/// Input for the next tick, written by whatever samples the devices.
///
/// `attack` and `interact` are edge-triggered and cleared after each tick.
#[derive(Resource, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PendingInput(pub TickInput);

/// Event raised for each session milestone.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectiveEvent(pub Milestone);

/// Event raised when the session cannot be created.
#[derive(Event, Debug, Clone, Error)]
#[error("failed to start session: {detail}")]
pub struct SessionInitError {
    /// Description of the underlying error.
    pub detail: String,
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must accept On<T> by value for Events V2."
)]
fn log_objective(event: On<ObjectiveEvent>) {
    let ObjectiveEvent(milestone) = event.event();
    info!("objective: {milestone:?}");
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must accept On<T> by value for Events V2."
)]
fn log_session_error(event: On<SessionInitError>) {
    error!("{}", event.event());
}

/// Advances the [`GameSession`] by one tick and publishes milestones.
///
/// Does nothing when no session resource exists.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value, not by reference."
)]
pub fn advance_session_system(
    mut commands: Commands,
    time: Res<Time>,
    settings: Res<SessionSettings>,
    mut input: ResMut<PendingInput>,
    session: Option<ResMut<GameSession>>,
) {
    let Some(mut session) = session else {
        return;
    };

    let dt = settings.fixed_dt.unwrap_or_else(|| {
        let clamped_max = settings.max_delta_seconds.max(f32::EPSILON);
        time.delta_secs().min(clamped_max)
    });
    let summary = session.tick(dt, &input.0);

    input.0.attack = false;
    input.0.interact = false;

    for milestone in summary.milestones {
        commands.trigger(ObjectiveEvent(milestone));
    }
}

/// Plugin installing the session resource and its update system.
///
/// # Examples
///
/// ```ignore
/// use bevy::prelude::*;
/// use echoes::EchoesPlugin;
///
/// App::new()
///     .add_plugins(MinimalPlugins)
///     .add_plugins(EchoesPlugin::default())
///     .run();
/// ```
#[derive(Debug, Clone, Default)]
pub struct EchoesPlugin {
    level: LevelConfig,
}

impl EchoesPlugin {
    /// Plugin running `level` instead of the built-in one.
    #[must_use]
    pub fn new(level: LevelConfig) -> Self {
        Self { level }
    }
}

impl Plugin for EchoesPlugin {
    fn build(&self, app: &mut App) {
        app.add_observer(log_objective);
        app.add_observer(log_session_error);
        app.init_resource::<SessionSettings>();
        app.init_resource::<PendingInput>();

        match GameSession::new(self.level.clone()) {
            Ok(session) => {
                app.insert_resource(session);
            }
            Err(e) => {
                app.world_mut().trigger(SessionInitError {
                    detail: e.to_string(),
                });
                return;
            }
        }

        app.add_systems(Update, advance_session_system);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::MoveInput;
    use rstest::rstest;

    fn app_with(plugin: EchoesPlugin, fixed_dt: f32) -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins(plugin);
        app.insert_resource(SessionSettings {
            fixed_dt: Some(fixed_dt),
            ..SessionSettings::default()
        });
        app
    }

    #[rstest]
    fn plugin_initialises_resources() {
        let app = app_with(EchoesPlugin::default(), 0.1);
        assert!(app.world().contains_resource::<GameSession>());
        assert!(app.world().contains_resource::<PendingInput>());
        assert!(app.world().contains_resource::<SessionSettings>());
    }

    #[rstest]
    fn invalid_level_skips_session() {
        let mut level = LevelConfig::default();
        level.leash_radius = -1.0;
        let mut app = app_with(EchoesPlugin::new(level), 0.1);
        assert!(!app.world().contains_resource::<GameSession>());
        app.update();
    }

    #[rstest]
    fn update_ticks_session_with_pending_input() {
        let mut app = app_with(EchoesPlugin::default(), 0.1);
        let start = app.world().resource::<GameSession>().player().position();
        app.world_mut().resource_mut::<PendingInput>().0 = TickInput {
            movement: MoveInput {
                forward: true,
                ..MoveInput::default()
            },
            attack: true,
            interact: false,
        };
        app.update();

        let session = app.world().resource::<GameSession>();
        assert_eq!(session.ticks(), 1);
        assert!(session.player().position().x > start.x);
        let pending = app.world().resource::<PendingInput>();
        assert!(pending.0.movement.forward);
        assert!(!pending.0.attack);
    }
}
