//! The playable level: a walled dock beside the water, a seabed, and a crate.
//! Each piece is a primitive mesh with a matching Rapier collider.

use bevy::prelude::*;
use bevy_rapier3d::prelude::RapierColliderHandle;
use shared::{
    physics::rapier::{LevelCollider, LevelColliderBundle},
    Session, DECK_HALF_EXTENT, DECK_HEIGHT, SEABED_DEPTH, SPAWN_POINT, WALL_HEIGHT,
};

const WALL_THICKNESS: f32 = 0.5;

/// Static box pieces as (centre, half extents).
pub fn level_boxes(session: &Session) -> Vec<(Vec3, Vec3)> {
    let water = session.height_field().config();
    let h = DECK_HALF_EXTENT;
    let deck = SPAWN_POINT.with_y(0.0) + Vec3::Z * 12.0;
    let wall_y = DECK_HEIGHT + WALL_HEIGHT / 2.0;
    let t = WALL_THICKNESS / 2.0;

    vec![
        // Deck, top face at DECK_HEIGHT
        (
            deck + Vec3::Y * (DECK_HEIGHT / 2.0),
            Vec3::new(h, DECK_HEIGHT / 2.0, h),
        ),
        // Back and side walls
        (
            deck.with_y(wall_y) + Vec3::Z * (h + t),
            Vec3::new(h, WALL_HEIGHT / 2.0, t),
        ),
        (
            deck.with_y(wall_y) - Vec3::X * (h + t),
            Vec3::new(t, WALL_HEIGHT / 2.0, h),
        ),
        (
            deck.with_y(wall_y) + Vec3::X * (h + t),
            Vec3::new(t, WALL_HEIGHT / 2.0, h),
        ),
        // Crate near the spawn
        (
            SPAWN_POINT.with_y(DECK_HEIGHT + 0.75) + Vec3::new(5.0, 0.0, 4.0),
            Vec3::new(1.0, 0.75, 1.0),
        ),
        // Seabed
        (
            water.anchor - Vec3::Y * (SEABED_DEPTH + 0.25),
            Vec3::new(water.half_bounds(), 0.25, water.half_bounds()),
        ),
    ]
}

pub fn spawn_level(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    session: Res<Session>,
) {
    let material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.55, 0.42, 0.3),
        perceptual_roughness: 0.9,
        ..default()
    });

    let boxes = level_boxes(&session);
    for (center, half) in &boxes {
        commands.spawn((
            Mesh3d(meshes.add(Cuboid::from_size(*half * 2.0))),
            MeshMaterial3d(material.clone()),
            LevelColliderBundle::cuboid(*half, Transform::from_translation(*center)),
        ));
    }

    commands.spawn((
        DirectionalLight {
            illuminance: 12_000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(30.0, 60.0, 40.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    info!("Spawned level with {} colliders", boxes.len());
}

/// Open the collision part of the ready gate once Rapier has taken the colliders.
pub fn level_ready_system(
    colliders: Query<(), (With<LevelCollider>, With<RapierColliderHandle>)>,
    mut session: ResMut<Session>,
) {
    if session.ready_gate().collision || colliders.is_empty() {
        return;
    }
    session.ready_gate_mut().collision = true;
    info!("Level collision ready");
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{water::WaterPreset, SessionConfig};

    #[test]
    fn test_boxes_match_shared_level_dimensions() {
        let session = Session::new(SessionConfig::default().with_preset(WaterPreset::Mobile));
        let boxes = level_boxes(&session);
        let top = |(center, half): &(Vec3, Vec3)| center.y + half.y;

        assert!((top(&boxes[0]) - DECK_HEIGHT).abs() < 1e-5);
        assert!((boxes[0].1.x - DECK_HALF_EXTENT).abs() < 1e-5);
        assert!((top(&boxes[1]) - (DECK_HEIGHT + WALL_HEIGHT)).abs() < 1e-5);

        let anchor = session.height_field().config().anchor;
        let seabed = boxes.last().expect("seabed");
        assert!((top(seabed) - (anchor.y - SEABED_DEPTH)).abs() < 1e-5);
    }
}
