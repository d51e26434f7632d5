use bevy::math::{
    bounding::{Aabb3d, RayCast3d},
    Dir3, Vec3,
};

use crate::constants::RAY_MAX_DISTANCE;

pub mod floating;
pub mod movement;
pub mod rapier;

pub use floating::*;
pub use movement::*;

/// One ray intersection with the static level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Distance from the ray origin along the (normalized) direction
    pub distance: f32,
    /// World-space intersection point
    pub point: Vec3,
}

/// Static collision geometry, queried only with rays.
///
/// Implementations return every hit sorted by ascending distance and an
/// empty list when nothing is hit. A miss is never an error.
pub trait CollisionGeometry {
    fn raycast(&self, origin: Vec3, direction: Vec3) -> Vec<RayHit>;

    fn nearest_hit(&self, origin: Vec3, direction: Vec3) -> Option<RayHit> {
        self.raycast(origin, direction).into_iter().next()
    }
}

/// Sort hits nearest first. Shared by every backend.
pub fn sort_hits(hits: &mut [RayHit]) {
    hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
}

/// A plain triangle soup with a bounding box broad phase.
#[derive(Debug, Clone, Default)]
pub struct TriangleMesh {
    triangles: Vec<[Vec3; 3]>,
    bounds: Option<Aabb3d>,
}

impl TriangleMesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_triangle(&mut self, a: Vec3, b: Vec3, c: Vec3) {
        self.triangles.push([a, b, c]);
        let min = a.min(b).min(c);
        let max = a.max(b).max(c);
        let (min, max) = match self.bounds {
            Some(bounds) => (min.min(bounds.min.into()), max.max(bounds.max.into())),
            None => (min, max),
        };
        self.bounds = Some(Aabb3d::new((min + max) / 2.0, (max - min) / 2.0));
    }

    /// Horizontal quad centred on `center`, as two triangles.
    pub fn with_floor(mut self, center: Vec3, half_x: f32, half_z: f32) -> Self {
        let a = center + Vec3::new(-half_x, 0.0, -half_z);
        let b = center + Vec3::new(half_x, 0.0, -half_z);
        let c = center + Vec3::new(half_x, 0.0, half_z);
        let d = center + Vec3::new(-half_x, 0.0, half_z);
        self.push_triangle(a, b, c);
        self.push_triangle(a, c, d);
        self
    }

    /// Vertical wall quad spanning `from`..`to` horizontally, from `bottom` up `height`.
    pub fn with_wall(mut self, from: Vec3, to: Vec3, bottom: f32, height: f32) -> Self {
        let a = from.with_y(bottom);
        let b = to.with_y(bottom);
        let c = to.with_y(bottom + height);
        let d = from.with_y(bottom + height);
        self.push_triangle(a, b, c);
        self.push_triangle(a, c, d);
        self
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }
}

/// Two-sided Möller–Trumbore ray/triangle test.
fn ray_triangle(origin: Vec3, direction: Vec3, [a, b, c]: [Vec3; 3]) -> Option<f32> {
    const EPSILON: f32 = 1e-7;

    let edge1 = b - a;
    let edge2 = c - a;
    let p = direction.cross(edge2);
    let det = edge1.dot(p);
    if det.abs() < EPSILON {
        return None;
    }

    let inv_det = 1.0 / det;
    let t_vec = origin - a;
    let u = t_vec.dot(p) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = t_vec.cross(edge1);
    let v = direction.dot(q) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = edge2.dot(q) * inv_det;
    (t >= 0.0).then_some(t)
}

impl CollisionGeometry for TriangleMesh {
    fn raycast(&self, origin: Vec3, direction: Vec3) -> Vec<RayHit> {
        let (Some(bounds), Ok(dir)) = (self.bounds, Dir3::new(direction)) else {
            return Vec::new();
        };

        // Flat geometry has a zero-thickness box; pad it so the slab test holds.
        let padded = Aabb3d {
            min: bounds.min - 1e-3,
            max: bounds.max + 1e-3,
        };
        let broad_phase = RayCast3d::new(origin, dir, RAY_MAX_DISTANCE);
        if broad_phase.aabb_intersection_at(&padded).is_none() {
            return Vec::new();
        }

        let direction = dir.as_vec3();
        let mut hits: Vec<RayHit> = self
            .triangles
            .iter()
            .filter_map(|triangle| ray_triangle(origin, direction, *triangle))
            .filter(|distance| *distance <= RAY_MAX_DISTANCE)
            .map(|distance| RayHit {
                distance,
                point: origin + direction * distance,
            })
            .collect();

        sort_hits(&mut hits);
        hits
    }
}
