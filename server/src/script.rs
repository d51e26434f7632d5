//! Deterministic input script standing in for a player.

use bevy::prelude::*;
use shared::{
    players::{IntentBuffer, MoveAction},
    water::WaterConfig,
};

/// Length of one script cycle in ticks.
pub const CYCLE: u64 = 480;

/// Movement keys held during each part of the cycle.
fn held_keys(phase: u64) -> &'static [MoveAction] {
    match phase {
        0..=119 => &[MoveAction::MoveBackward],
        120..=179 => &[MoveAction::MoveBackward, MoveAction::MoveRight],
        180..=239 => &[],
        240..=359 => &[MoveAction::MoveForward],
        360..=419 => &[MoveAction::MoveLeft],
        _ => &[],
    }
}

/// Write the scripted intent for `tick` into the buffer.
pub fn apply_script(tick: u64, buffer: &mut IntentBuffer, water: &WaterConfig) {
    let phase = tick % CYCLE;

    buffer.set_held(held_keys(phase).iter().copied());

    if phase % 90 == 45 {
        buffer.press_jump();
    }

    if (120..180).contains(&phase) {
        buffer.add_camera_delta(0.01, 0.0);
    }

    // Drag a circle over the water during the idle stretches.
    let pointer = (180..240).contains(&phase) || phase >= 420;
    buffer.set_pointer_on_water(pointer.then(|| {
        let angle = tick as f32 * 0.05;
        let radius = water.half_bounds() * 0.5;
        Vec2::new(water.anchor.x, water.anchor.z) + Vec2::from_angle(angle) * radius
    }));
}
