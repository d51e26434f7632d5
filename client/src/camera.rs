use bevy::prelude::*;
use shared::Session;

#[derive(Component)]
pub struct FollowCamera;

pub fn spawn_camera(mut commands: Commands, session: Res<Session>) {
    commands.spawn((
        Camera3d::default(),
        session.camera_transform(),
        FollowCamera,
        Name::new("FollowCamera"),
    ));
}

/// Place the camera where the session's rig says.
pub fn camera_sync_system(
    session: Res<Session>,
    mut camera: Query<&mut Transform, With<FollowCamera>>,
) {
    let Ok(mut transform) = camera.single_mut() else {
        debug!("Camera not found");
        return;
    };
    *transform = session.camera_transform();
}
