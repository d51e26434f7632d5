use bevy::prelude::*;
use bevy_rapier3d::prelude::*;
use shared::{physics::rapier::RapierGeometry, players::IntentBuffer, Session};

use super::AvatarRoot;

/// Take this frame's input snapshot and run one session tick.
pub fn simulation_system(
    time: Res<Time>,
    mut session: ResMut<Session>,
    mut buffer: ResMut<IntentBuffer>,
    rapier_context: Query<(
        &RapierContextColliders,
        &RapierRigidBodySet,
        &RapierQueryPipeline,
    )>,
) {
    let delta = time.delta_secs();
    if delta <= 0.0 {
        return;
    }

    let input = buffer.take_snapshot();
    let report = match rapier_context.single() {
        Ok((colliders, rigidbody_set, query_pipeline)) => {
            let geometry = RapierGeometry::new(colliders, rigidbody_set, query_pipeline);
            session.tick(&input, Some(&geometry), delta)
        }
        Err(_) => session.tick(&input, None, delta),
    };

    if report.locomotion.is_some_and(|locomotion| locomotion.respawned) {
        info!("Avatar respawned at {:?}", session.avatar().position);
    }
}

pub fn avatar_sync_system(
    session: Res<Session>,
    mut avatar: Query<&mut Transform, With<AvatarRoot>>,
) {
    let Ok(mut transform) = avatar.single_mut() else {
        debug!("avatar not found");
        return;
    };
    let state = session.avatar();
    transform.translation = state.position;
    transform.rotation = state.orientation;
}
