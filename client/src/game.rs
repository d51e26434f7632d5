use bevy::prelude::*;
use shared::{
    physics::rapier::LevelPhysicsPlugin,
    players::IntentBuffer,
    sets::{configure_game_sets, GameUpdateSet},
};

use crate::{
    camera::{camera_sync_system, spawn_camera},
    input::{
        keyboard::keyboard_intent_system,
        mouse::{camera_look_system, pointer_water_system},
    },
    player::{
        animation::{
            animation_sync_system, clips_ready_system, setup_animation_player_system,
            spawn_avatar,
        },
        controller::{avatar_sync_system, simulation_system},
    },
    world::{
        floater_sync_system, level_ready_system, spawn_floaters, spawn_level, spawn_water,
        water_mesh_sync_system,
    },
};

pub fn game_plugin(app: &mut App) {
    app.add_plugins(LevelPhysicsPlugin)
        .insert_resource(IntentBuffer::default());

    configure_game_sets(app);

    app.add_systems(
        Startup,
        (
            spawn_level,
            spawn_water,
            spawn_floaters,
            spawn_avatar,
            spawn_camera,
        ),
    )
    .add_systems(
        Update,
        (
            keyboard_intent_system,
            camera_look_system,
            pointer_water_system,
        )
            .in_set(GameUpdateSet::Input),
    )
    .add_systems(
        Update,
        (
            level_ready_system,
            setup_animation_player_system,
            clips_ready_system,
            simulation_system,
        )
            .chain()
            .in_set(GameUpdateSet::Simulation),
    )
    .add_systems(
        Update,
        (
            avatar_sync_system,
            camera_sync_system,
            floater_sync_system,
            animation_sync_system,
        )
            .in_set(GameUpdateSet::Sync),
    )
    .add_systems(
        Update,
        water_mesh_sync_system.in_set(GameUpdateSet::Rendering),
    );
}
