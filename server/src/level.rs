//! Built-in test level for headless runs: a walled dock next to the water
//! and a seabed under the whole field.

use bevy::prelude::*;
use shared::{
    physics::TriangleMesh, water::WaterConfig, DECK_HALF_EXTENT, DECK_HEIGHT, SEABED_DEPTH,
    SPAWN_POINT, WALL_HEIGHT,
};

#[derive(Resource)]
pub struct HeadlessLevel(pub TriangleMesh);

/// Closed box with a walkable top.
fn with_crate(mesh: TriangleMesh, center: Vec3, half: f32, height: f32) -> TriangleMesh {
    let bottom = center.y;
    let corners = [
        center + Vec3::new(-half, 0.0, -half),
        center + Vec3::new(half, 0.0, -half),
        center + Vec3::new(half, 0.0, half),
        center + Vec3::new(-half, 0.0, half),
    ];
    let mut mesh = mesh;
    for k in 0..4 {
        mesh = mesh.with_wall(corners[k], corners[(k + 1) % 4], bottom, height);
    }
    mesh.with_floor(center + Vec3::Y * height, half, half)
}

pub fn build_level(water: &WaterConfig) -> TriangleMesh {
    let deck_center = SPAWN_POINT.with_y(DECK_HEIGHT) + Vec3::Z * 12.0;
    let h = DECK_HALF_EXTENT;
    let back = deck_center.z + h;
    let front = deck_center.z - h;

    let mesh = TriangleMesh::new()
        .with_floor(deck_center, h, h)
        .with_wall(
            Vec3::new(-h, 0.0, back),
            Vec3::new(h, 0.0, back),
            DECK_HEIGHT,
            WALL_HEIGHT,
        )
        .with_wall(
            Vec3::new(-h, 0.0, front),
            Vec3::new(-h, 0.0, back),
            DECK_HEIGHT,
            WALL_HEIGHT,
        )
        .with_wall(
            Vec3::new(h, 0.0, front),
            Vec3::new(h, 0.0, back),
            DECK_HEIGHT,
            WALL_HEIGHT,
        )
        .with_floor(
            water.anchor - Vec3::Y * SEABED_DEPTH,
            water.half_bounds(),
            water.half_bounds(),
        );

    with_crate(mesh, SPAWN_POINT.with_y(DECK_HEIGHT) + Vec3::new(5.0, 0.0, 4.0), 1.0, 1.5)
}
