use bevy::{input::mouse::AccumulatedMouseMotion, prelude::*, window::PrimaryWindow};
use shared::{players::IntentBuffer, water::WaterConfig, Session};

use crate::{camera::FollowCamera, constants::MOUSE_SENSITIVITY};

/// Camera (yaw, pitch) deltas for a mouse motion in pixels.
///
/// Dragging right turns the view right and dragging up tilts it up.
pub fn look_delta(motion: Vec2) -> (f32, f32) {
    (-motion.x * MOUSE_SENSITIVITY, motion.y * MOUSE_SENSITIVITY)
}

/// Right mouse button + drag rotates the camera.
pub fn camera_look_system(
    mouse_button: Res<ButtonInput<MouseButton>>,
    mouse_motion: Res<AccumulatedMouseMotion>,
    mut buffer: ResMut<IntentBuffer>,
) {
    if !mouse_button.pressed(MouseButton::Right) || mouse_motion.delta == Vec2::ZERO {
        return;
    }
    let (yaw, pitch) = look_delta(mouse_motion.delta);
    buffer.add_camera_delta(yaw, pitch);
}

/// Where a ray meets the water rest plane, if inside the field.
pub fn pointer_hit_on_water(ray: Ray3d, water: &WaterConfig) -> Option<Vec2> {
    let distance = ray.intersect_plane(water.anchor, InfinitePlane3d::new(Vec3::Y))?;
    let point = ray.get_point(distance);
    let local = Vec2::new(point.x - water.anchor.x, point.z - water.anchor.z);
    (local.abs().max_element() <= water.half_bounds()).then_some(Vec2::new(point.x, point.z))
}

/// Left mouse button over the water moves the disturbance centre.
pub fn pointer_water_system(
    mouse_button: Res<ButtonInput<MouseButton>>,
    window: Query<&Window, With<PrimaryWindow>>,
    camera: Query<(&Camera, &GlobalTransform), With<FollowCamera>>,
    session: Res<Session>,
    mut buffer: ResMut<IntentBuffer>,
) {
    let hit = (|| {
        if !mouse_button.pressed(MouseButton::Left) {
            return None;
        }
        let cursor = window.single().ok()?.cursor_position()?;
        let (camera, camera_transform) = camera.single().ok()?;
        let ray = camera.viewport_to_world(camera_transform, cursor).ok()?;
        pointer_hit_on_water(ray, session.height_field().config())
    })();

    buffer.set_pointer_on_water(hit);
}
