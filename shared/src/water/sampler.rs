//! Point queries against the simulated water surface.
//!
//! World coordinates map to grid UV exactly as the render mesh maps its
//! vertices, so a floater sits on the same surface the player sees:
//!
//! ```text
//! u = (x - anchor.x) / bounds + 0.5
//! v = 0.5 - (z - anchor.z) / bounds
//! ```

use bevy::math::{Vec2, Vec3};

use super::{config::WaterConfig, heightfield::HeightField};

/// Result of a water surface query at a single point.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SurfaceSample {
    /// Simulated height relative to the rest level (not scaled)
    pub height: f32,
    /// Downhill slope along +X, in height units per world unit
    pub slope_x: f32,
    /// Downhill slope along the grid's v axis, in height units per world unit
    pub slope_z: f32,
}

impl SurfaceSample {
    /// Unit surface normal built from the slope, `(slope_x, 1, -slope_z)`.
    pub fn normal(&self) -> Vec3 {
        Vec3::new(self.slope_x, 1.0, -self.slope_z).normalize_or(Vec3::Y)
    }
}

/// Read-only view over a [`HeightField`] answering world-space queries.
#[derive(Clone, Copy)]
pub struct SurfaceSampler<'a> {
    field: &'a HeightField,
}

impl<'a> SurfaceSampler<'a> {
    pub fn new(field: &'a HeightField) -> Self {
        Self { field }
    }

    pub fn config(&self) -> &'a WaterConfig {
        self.field.config()
    }

    /// Grid UV of a world-space point.
    #[inline]
    pub fn world_to_uv(&self, world_x: f32, world_z: f32) -> Vec2 {
        let config = self.field.config();
        Vec2::new(
            (world_x - config.anchor.x) / config.bounds + 0.5,
            0.5 - (world_z - config.anchor.z) / config.bounds,
        )
    }

    /// Sample height and slope under a world-space point.
    pub fn sample(&self, world_x: f32, world_z: f32) -> SurfaceSample {
        let uv = self.world_to_uv(world_x, world_z);
        self.sample_uv(uv.x, uv.y)
    }

    /// Sample height and slope at a grid UV in `[0, 1]²`.
    pub fn sample_uv(&self, u: f32, v: f32) -> SurfaceSample {
        let config = self.field.config();
        let cell = 1.0 / config.width as f32;
        let scale = config.slope_scale();

        let height = self.height_uv(u, v);
        let slope_x = (self.height_uv(u - cell, v) - self.height_uv(u + cell, v)) * scale;
        let slope_z = (self.height_uv(u, v - cell) - self.height_uv(u, v + cell)) * scale;

        SurfaceSample {
            height,
            slope_x,
            slope_z,
        }
    }

    /// Bilinear height at a grid UV with clamped edges.
    pub fn height_uv(&self, u: f32, v: f32) -> f32 {
        let width = self.field.width() as f32;
        // Texel centres sit at (i + 0.5) / width.
        let x = (u * width - 0.5).clamp(0.0, width - 1.0);
        let y = (v * width - 0.5).clamp(0.0, width - 1.0);

        let i0 = x.floor();
        let j0 = y.floor();
        let tx = x - i0;
        let ty = y - j0;
        let (i0, j0) = (i0 as isize, j0 as isize);

        let h00 = self.field.height_at(i0, j0);
        let h10 = self.field.height_at(i0 + 1, j0);
        let h01 = self.field.height_at(i0, j0 + 1);
        let h11 = self.field.height_at(i0 + 1, j0 + 1);

        let top = h00 + (h10 - h00) * tx;
        let bottom = h01 + (h11 - h01) * tx;
        top + (bottom - top) * ty
    }
}
