//! Water surface mesh and floating props.
//!
//! The mesh has one vertex per grid cell, laid out in the same row-major
//! order as the height field, so displacements copy over index for index.

use bevy::{
    asset::RenderAssetUsages,
    prelude::*,
    render::mesh::{Indices, PrimitiveTopology, VertexAttributeValues},
};
use shared::{
    water::{HeightField, SurfaceSampler, WaterConfig},
    Session,
};

use crate::constants::FLOATER_SIZE;

#[derive(Component)]
pub struct WaterSurface;

/// Scene entity mirroring `Session::bodies()[index]`.
#[derive(Component)]
pub struct Floater(pub usize);

/// Flat grid mesh in anchor-local space.
pub fn build_water_mesh(field: &HeightField) -> Mesh {
    let width = field.width();
    let mut positions = Vec::with_capacity(width * width);
    let mut uvs = Vec::with_capacity(width * width);

    for j in 0..width {
        for i in 0..width {
            let local = field.cell_center(i, j);
            positions.push([local.x, 0.0, local.y]);
            uvs.push([
                (i as f32 + 0.5) / width as f32,
                (j as f32 + 0.5) / width as f32,
            ]);
        }
    }

    let mut indices = Vec::with_capacity((width - 1) * (width - 1) * 6);
    for j in 0..width - 1 {
        for i in 0..width - 1 {
            let a = (j * width + i) as u32;
            let b = a + 1;
            let c = a + width as u32;
            let d = c + 1;
            indices.extend_from_slice(&[a, b, c, b, d, c]);
        }
    }

    let normals = vec![[0.0, 1.0, 0.0]; positions.len()];

    let mut mesh = Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::MAIN_WORLD | RenderAssetUsages::RENDER_WORLD,
    );
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
    mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, uvs);
    mesh.insert_indices(Indices::U32(indices));
    mesh
}

/// Write the displaced heights and matching normals into the mesh.
pub fn displace_water_mesh(mesh: &mut Mesh, field: &HeightField, displacements: &[f32]) {
    if let Some(VertexAttributeValues::Float32x3(positions)) =
        mesh.attribute_mut(Mesh::ATTRIBUTE_POSITION)
    {
        for (position, y) in positions.iter_mut().zip(displacements) {
            position[1] = *y;
        }
    }

    let config: &WaterConfig = field.config();
    let sampler = SurfaceSampler::new(field);
    let width = field.width() as f32;
    let scale = config.vertical_scale;
    if let Some(VertexAttributeValues::Float32x3(normals)) =
        mesh.attribute_mut(Mesh::ATTRIBUTE_NORMAL)
    {
        for (index, normal) in normals.iter_mut().enumerate() {
            let i = (index % field.width()) as f32;
            let j = (index / field.width()) as f32;
            let sample = sampler.sample_uv((i + 0.5) / width, (j + 0.5) / width);
            let n = Vec3::new(sample.slope_x * scale, 1.0, -sample.slope_z * scale).normalize();
            *normal = n.to_array();
        }
    }
}

pub fn spawn_water(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    session: Res<Session>,
) {
    let field = session.height_field();
    let mut mesh = build_water_mesh(field);
    displace_water_mesh(&mut mesh, field, &session.vertex_displacements());

    commands.spawn((
        Mesh3d(meshes.add(mesh)),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgba(0.1, 0.35, 0.55, 0.85),
            perceptual_roughness: 0.1,
            reflectance: 0.6,
            alpha_mode: AlphaMode::Blend,
            ..default()
        })),
        Transform::from_translation(field.config().anchor),
        WaterSurface,
        Name::new("Water"),
    ));
}

/// Re-displace the water mesh whenever the field has stepped.
pub fn water_mesh_sync_system(
    session: Res<Session>,
    surface: Query<&Mesh3d, With<WaterSurface>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut last_step: Local<u64>,
) {
    let field = session.height_field();
    if field.steps() == *last_step {
        return;
    }
    let Ok(handle) = surface.single() else {
        return;
    };
    let Some(mesh) = meshes.get_mut(&handle.0) else {
        return;
    };
    displace_water_mesh(mesh, field, &session.vertex_displacements());
    *last_step = field.steps();
}

pub fn spawn_floaters(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    session: Res<Session>,
) {
    let mesh = meshes.add(Cuboid::new(FLOATER_SIZE, FLOATER_SIZE * 0.5, FLOATER_SIZE));
    let material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.95, 0.8, 0.2),
        ..default()
    });

    for (index, body) in session.bodies().iter().enumerate() {
        commands.spawn((
            Mesh3d(mesh.clone()),
            MeshMaterial3d(material.clone()),
            Transform::from_translation(body.position).with_rotation(body.orientation),
            Floater(index),
        ));
    }
}

pub fn floater_sync_system(
    session: Res<Session>,
    mut floaters: Query<(&Floater, &mut Transform)>,
) {
    let bodies = session.bodies();
    for (floater, mut transform) in floaters.iter_mut() {
        if let Some(body) = bodies.get(floater.0) {
            transform.translation = body.position;
            transform.rotation = body.orientation;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::water::WaterPreset;

    fn field() -> HeightField {
        HeightField::flat(WaterConfig {
            width: 4,
            bounds: 8.0,
            ..WaterPreset::Mobile.to_config()
        })
    }

    #[test]
    fn test_mesh_has_one_vertex_per_cell() {
        let mesh = build_water_mesh(&field());
        assert_eq!(mesh.count_vertices(), 16);
        assert_eq!(mesh.indices().map(|i| i.len()), Some(3 * 3 * 6));
    }

    #[test]
    fn test_triangles_face_up() {
        let mesh = build_water_mesh(&field());
        let Some(VertexAttributeValues::Float32x3(positions)) =
            mesh.attribute(Mesh::ATTRIBUTE_POSITION)
        else {
            panic!("positions missing");
        };
        let indices: Vec<usize> = mesh.indices().unwrap().iter().collect();
        for tri in indices.chunks(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|k| Vec3::from(positions[k]));
            assert!((b - a).cross(c - a).y > 0.0);
        }
    }

    #[test]
    fn test_displacement_follows_field() {
        let mut field = field();
        field.set_height(1, 2, 0.5);
        let mut mesh = build_water_mesh(&field);
        let scale = field.config().vertical_scale;
        let displacements: Vec<f32> = field.heights().iter().map(|h| h * scale).collect();
        displace_water_mesh(&mut mesh, &field, &displacements);

        let Some(VertexAttributeValues::Float32x3(positions)) =
            mesh.attribute(Mesh::ATTRIBUTE_POSITION)
        else {
            panic!("positions missing");
        };
        assert_eq!(positions[2 * 4 + 1][1], 0.5 * scale);
        assert_eq!(positions[0][1], 0.0);
    }
}
