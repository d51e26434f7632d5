//! Height-field water simulation.
//!
//! The surface is a `width × width` grid of heights advanced with a damped
//! leapfrog discretization of the 2-D wave equation:
//!
//! ```text
//! h_new  = ((N + S + E + W) / 2 - h_prev) * viscosity
//! h_new -= disturbance_falloff(distance to centre) * depth_strength
//! ```
//!
//! Two flat row-major buffers hold the current and previous heights and are
//! swapped after each step. Neighbour reads past the grid edge clamp to the
//! edge cell, so waves reflect off the border instead of wrapping around.

use std::f32::consts::PI;

use bevy::math::Vec2;
use noiz::prelude::*;

use super::config::WaterConfig;
use crate::constants::DISTURBANCE_PARKED;

/// Number of noise octaves summed when seeding the grid.
const SEED_OCTAVES: usize = 15;
/// Frequency of the first seeding octave.
const SEED_BASE_FREQUENCY: f32 = 0.025;
/// Frequency growth per octave.
const SEED_FREQUENCY_GROWTH: f32 = 1.25;
/// The seeding sample lattice always spans this many noise units, whatever
/// the grid resolution, so mobile and desktop grids look alike.
const SEED_LATTICE_SPAN: f32 = 128.0;

/// Raised-cosine falloff of the pointer disturbance.
///
/// Returns 2.0 at the centre and exactly 0.0 from `mouse_size` outward.
#[inline]
pub fn disturbance_falloff(distance: f32, mouse_size: f32) -> f32 {
    if distance >= mouse_size {
        return 0.0;
    }
    let phase = (distance * PI / mouse_size).clamp(0.0, PI);
    phase.cos() + 1.0
}

/// The simulated water surface.
#[derive(Debug, Clone)]
pub struct HeightField {
    config: WaterConfig,
    current: Vec<f32>,
    previous: Vec<f32>,
    /// Disturbance centre in anchor-local world units (x, z)
    disturbance: Vec2,
    steps: u64,
}

impl HeightField {
    /// Create a field seeded with fractal noise.
    pub fn new(config: WaterConfig, seed: u32) -> Self {
        let mut field = Self::flat(config);
        field.seed_with_noise(seed);
        field
    }

    /// Create a field with every height at zero.
    pub fn flat(config: WaterConfig) -> Self {
        let config = config.sanitized();
        let cells = config.width * config.width;
        Self {
            config,
            current: vec![0.0; cells],
            previous: vec![0.0; cells],
            disturbance: Vec2::splat(DISTURBANCE_PARKED),
            steps: 0,
        }
    }

    fn seed_with_noise(&mut self, seed: u32) {
        let mut perlin = Noise::<common_noise::Perlin>::default();
        perlin.set_seed(seed);

        let width = self.config.width;
        let lattice_step = SEED_LATTICE_SPAN / width as f32;

        for j in 0..width {
            for i in 0..width {
                let point = Vec2::new(i as f32 * lattice_step, j as f32 * lattice_step);
                let mut amplitude = self.config.seed_max_height;
                let mut frequency = SEED_BASE_FREQUENCY;
                let mut height = 0.0;
                for octave in 0..SEED_OCTAVES {
                    height += amplitude * perlin.sample_for::<f32>(point * frequency);
                    amplitude *= 0.53 + 0.025 * octave as f32;
                    frequency *= SEED_FREQUENCY_GROWTH;
                }
                self.current[j * width + i] = height;
            }
        }

        self.previous.copy_from_slice(&self.current);
        log::debug!(
            "Seeded {}x{} water grid (seed {})",
            width,
            width,
            seed
        );
    }

    pub fn config(&self) -> &WaterConfig {
        &self.config
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.config.width
    }

    /// Number of steps taken since creation.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Latest heights, row-major with `j` (the v axis) as the row.
    pub fn heights(&self) -> &[f32] {
        &self.current
    }

    /// Heights from the step before the latest one.
    pub fn previous_heights(&self) -> &[f32] {
        &self.previous
    }

    /// Height of cell `(i, j)`, clamping out-of-range indices to the edge.
    #[inline]
    pub fn height_at(&self, i: isize, j: isize) -> f32 {
        let max = self.config.width as isize - 1;
        let i = i.clamp(0, max) as usize;
        let j = j.clamp(0, max) as usize;
        self.current[j * self.config.width + i]
    }

    /// Overwrite both buffers of one cell. Used to inject test impulses.
    pub fn set_height(&mut self, i: usize, j: usize, height: f32) {
        let width = self.config.width;
        if i < width && j < width {
            self.current[j * width + i] = height;
            self.previous[j * width + i] = height;
        }
    }

    /// Move the disturbance centre, in anchor-local (x, z) world units.
    /// `None` parks it far outside the grid.
    pub fn set_disturbance(&mut self, center: Option<Vec2>) {
        self.disturbance = center.unwrap_or(Vec2::splat(DISTURBANCE_PARKED));
    }

    /// Current disturbance centre, `None` while parked.
    pub fn disturbance(&self) -> Option<Vec2> {
        (self.disturbance.x < DISTURBANCE_PARKED).then_some(self.disturbance)
    }

    /// Anchor-local (x, z) of the centre of cell `(i, j)`.
    ///
    /// `v` runs against world Z, so row 0 lies at the +Z edge.
    #[inline]
    pub fn cell_center(&self, i: usize, j: usize) -> Vec2 {
        let width = self.config.width as f32;
        let u = (i as f32 + 0.5) / width;
        let v = (j as f32 + 0.5) / width;
        Vec2::new((u - 0.5) * self.config.bounds, (0.5 - v) * self.config.bounds)
    }

    /// Advance the simulation by one discrete time unit.
    pub fn step(&mut self) {
        let width = self.config.width;
        let max = width as isize - 1;
        let viscosity = self.config.viscosity;
        let mouse_size = self.config.mouse_size;
        let depth_strength = self.config.depth_strength;
        let disturbance_active = self.disturbance().is_some();

        let read = |buffer: &[f32], i: isize, j: isize| -> f32 {
            buffer[j.clamp(0, max) as usize * width + i.clamp(0, max) as usize]
        };

        // The new heights overwrite `previous` in place: each cell's old
        // previous value is read exactly once, by that cell.
        for j in 0..width {
            for i in 0..width {
                let (ii, jj) = (i as isize, j as isize);
                let neighbours = read(&self.current, ii, jj - 1)
                    + read(&self.current, ii, jj + 1)
                    + read(&self.current, ii + 1, jj)
                    + read(&self.current, ii - 1, jj);

                let index = j * width + i;
                let mut new_height = (neighbours * 0.5 - self.previous[index]) * viscosity;

                if disturbance_active {
                    let distance = self.cell_center(i, j).distance(self.disturbance);
                    new_height -= disturbance_falloff(distance, mouse_size) * depth_strength;
                }

                self.previous[index] = new_height;
            }
        }

        std::mem::swap(&mut self.current, &mut self.previous);
        self.steps += 1;
    }

    /// Sum of squared heights, a cheap measure of wave energy.
    pub fn energy(&self) -> f32 {
        self.current.iter().map(|h| h * h).sum()
    }
}
