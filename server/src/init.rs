use std::time::Duration;

use bevy::{
    diagnostic::{FrameTimeDiagnosticsPlugin, LogDiagnosticsPlugin},
    prelude::*,
};
use bevy_app::ScheduleRunnerPlugin;
use bevy_log::{debug, info, LogPlugin};
use shared::{
    players::IntentBuffer,
    sets::{configure_game_sets, GameUpdateSet},
    ReadyGate, Session, SessionConfig, TICKS_PER_SECOND,
};

use crate::{
    level::{build_level, HeadlessLevel},
    script::apply_script,
};

#[derive(Resource, Debug, Clone, Copy)]
pub struct RunOptions {
    pub ticks: u64,
    /// Skip frame pacing
    pub fast: bool,
}

#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct ServerTime(pub u64);

/// Fixed step so runs are reproducible whatever the wall-clock pacing.
const TICK_DELTA: f32 = 1.0 / TICKS_PER_SECOND as f32;

pub fn init(config: SessionConfig, options: RunOptions) {
    let wait = if options.fast {
        Duration::ZERO
    } else {
        Duration::from_secs_f64(1.0 / TICKS_PER_SECOND as f64)
    };

    let mut app = App::new();
    app.add_plugins(MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(wait)));
    app.add_plugins(FrameTimeDiagnosticsPlugin::default());
    app.add_plugins(LogDiagnosticsPlugin::default());
    app.add_plugins(LogPlugin::default());

    build_app(&mut app, config, options);

    info!("Running {} headless ticks", options.ticks);
    app.run();
}

/// Register the session, level and systems. Separate from [`init`] so tests
/// can drive the app with `update()`.
pub fn build_app(app: &mut App, config: SessionConfig, options: RunOptions) {
    let mut session = Session::new(config);
    // Everything is in memory; nothing to wait for.
    *session.ready_gate_mut() = ReadyGate::open();
    let level = build_level(session.height_field().config());
    info!("Headless level: {} triangles", level.len());

    app.insert_resource(session)
        .insert_resource(HeadlessLevel(level))
        .insert_resource(IntentBuffer::default())
        .insert_resource(ServerTime::default())
        .insert_resource(options);

    configure_game_sets(app);
    app.add_systems(Update, scripted_input_system.in_set(GameUpdateSet::Input))
        .add_systems(Update, simulation_system.in_set(GameUpdateSet::Simulation))
        .add_systems(
            Update,
            (report_system, stop_system)
                .chain()
                .in_set(GameUpdateSet::Sync),
        );
}

fn scripted_input_system(
    time: Res<ServerTime>,
    session: Res<Session>,
    mut buffer: ResMut<IntentBuffer>,
) {
    apply_script(time.0, &mut buffer, session.height_field().config());
}

fn simulation_system(
    mut session: ResMut<Session>,
    mut buffer: ResMut<IntentBuffer>,
    level: Res<HeadlessLevel>,
    mut time: ResMut<ServerTime>,
) {
    let input = buffer.take_snapshot();
    let report = session.tick(&input, Some(&level.0), TICK_DELTA);

    if let Some(locomotion) = report.locomotion {
        if locomotion.respawned {
            info!("Avatar respawned at tick {}", time.0);
        }
        if locomotion.jumped {
            debug!("Avatar jumped at tick {}", time.0);
        }
    }
    time.0 += 1;
}

fn report_system(time: Res<ServerTime>, session: Res<Session>) {
    if time.0 % (5 * TICKS_PER_SECOND) != 0 {
        return;
    }
    let avatar = session.avatar();
    info!(
        "t={} avatar={:.2?} {:?} {:?} water_steps={} energy={:.4}",
        time.0,
        avatar.position,
        avatar.support,
        avatar.animation.active(),
        session.height_field().steps(),
        session.height_field().energy()
    );
}

fn stop_system(
    time: Res<ServerTime>,
    options: Res<RunOptions>,
    session: Res<Session>,
    mut exit: EventWriter<AppExit>,
) {
    if time.0 < options.ticks {
        return;
    }
    info!(
        "Finished {} ticks ({:.1}s simulated), {} water steps",
        time.0,
        session.elapsed(),
        session.height_field().steps()
    );
    exit.write(AppExit::Success);
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::water::WaterPreset;

    fn test_app(ticks: u64) -> App {
        let mut app = App::new();
        build_app(
            &mut app,
            SessionConfig::default().with_preset(WaterPreset::Mobile),
            RunOptions { ticks, fast: true },
        );
        app
    }

    #[test]
    fn test_each_update_is_one_tick() {
        let mut app = test_app(100);
        for _ in 0..14 {
            app.update();
        }
        assert_eq!(app.world().resource::<ServerTime>().0, 14);
        let session = app.world().resource::<Session>();
        assert_eq!(session.frames(), 14);
        assert_eq!(session.height_field().steps(), 6);
    }

    #[test]
    fn test_avatar_stays_in_world() {
        let mut app = test_app(10_000);
        for _ in 0..600 {
            app.update();
        }
        let session = app.world().resource::<Session>();
        assert!(session.avatar().position.y > shared::FALL_THRESHOLD);
        assert!(session.avatar().position.is_finite());
    }

    #[test]
    fn test_stops_after_tick_limit() {
        let mut app = test_app(3);
        for _ in 0..3 {
            app.update();
        }
        let exits = app.world().resource::<Events<AppExit>>();
        assert!(!exits.is_empty());
    }
}
