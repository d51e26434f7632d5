use bevy::prelude::*;

/// Fixed frame rate the headless runner ticks at.
pub const TICKS_PER_SECOND: u64 = 60;

/// Where the avatar appears at session start and after falling out of the world.
pub const SPAWN_POINT: Vec3 = Vec3 {
    x: 0.0,
    y: 6.0,
    z: 40.0,
};

/// Avatar Y below which it is teleported back to [`SPAWN_POINT`].
pub const FALL_THRESHOLD: f32 = -150.0;

/// Grid resolution of the desktop water preset.
pub const DESKTOP_WATER_WIDTH: usize = 128;
/// Grid resolution of the mobile water preset.
pub const MOBILE_WATER_WIDTH: usize = 32;
/// Physical side length of the water field in world units.
pub const WATER_BOUNDS: f32 = 128.0;

/// Height of the dock deck's walking surface.
pub const DECK_HEIGHT: f32 = 0.5;
/// Half the side length of the square dock deck.
pub const DECK_HALF_EXTENT: f32 = 15.0;
/// Depth of the seabed below the water anchor.
pub const SEABED_DEPTH: f32 = 3.0;
/// Height of the dock walls above the deck.
pub const WALL_HEIGHT: f32 = 3.0;

/// Distance used for the disturbance centre when the pointer is off the water.
pub const DISTURBANCE_PARKED: f32 = 10_000.0;

/// Upper bound on ray length handed to physics backends.
pub const RAY_MAX_DISTANCE: f32 = 1_000.0;

pub const CONFIG_LOAD_ERROR: &str = "Failed to load session config";
