//! Water field configuration shared by the simulator, the sampler and the
//! render mesh.
//!
//! The render mesh and the physics sampler must agree on `width`, `bounds`
//! and `anchor`, so both read them from the same [`WaterConfig`].

use bevy::math::Vec3;
use serde::{Deserialize, Serialize};

use crate::constants::{DESKTOP_WATER_WIDTH, MOBILE_WATER_WIDTH, WATER_BOUNDS};

/// Configuration for the height-field water simulation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WaterConfig {
    /// Cells per side of the square grid
    pub width: usize,
    /// Side length of the field in world units
    pub bounds: f32,
    /// World-space centre of the field; its Y is the rest water level
    pub anchor: Vec3,
    /// Damping factor of the wave update, in (0, 1)
    pub viscosity: f32,
    /// Radius of the pointer disturbance in world units
    pub mouse_size: f32,
    /// Height removed at the disturbance centre per step
    pub depth_strength: f32,
    /// Amplification applied to simulated heights for display and floaters
    pub vertical_scale: f32,
    /// Amplitude of the first noise octave used to seed the grid
    pub seed_max_height: f32,
}

impl Default for WaterConfig {
    fn default() -> Self {
        WaterPreset::default().to_config()
    }
}

impl WaterConfig {
    /// World units covered by one grid cell.
    #[inline]
    pub fn cell_size(&self) -> f32 {
        self.bounds / self.width as f32
    }

    /// Half the side length, the reach of the field from its anchor.
    #[inline]
    pub fn half_bounds(&self) -> f32 {
        self.bounds * 0.5
    }

    /// Grid cells per world unit, the scale applied to sampled slopes.
    #[inline]
    pub fn slope_scale(&self) -> f32 {
        self.width as f32 / self.bounds
    }

    /// Clamp values a hand-edited config could push out of range.
    pub fn sanitized(mut self) -> Self {
        self.width = self.width.max(2);
        self.bounds = self.bounds.max(1.0);
        self.viscosity = self.viscosity.clamp(0.0, 0.999);
        self.mouse_size = self.mouse_size.max(f32::EPSILON);
        self
    }
}

/// Device profiles for the water grid.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
pub enum WaterPreset {
    /// 128×128 grid
    #[default]
    Desktop,
    /// 32×32 grid with slightly stronger damping
    Mobile,
}

impl WaterPreset {
    pub fn to_config(self) -> WaterConfig {
        let base = WaterConfig {
            width: DESKTOP_WATER_WIDTH,
            bounds: WATER_BOUNDS,
            anchor: Vec3::ZERO,
            viscosity: 0.98,
            mouse_size: 8.0,
            depth_strength: 0.02,
            vertical_scale: 2.0,
            seed_max_height: 0.1,
        };

        match self {
            WaterPreset::Desktop => base,
            WaterPreset::Mobile => WaterConfig {
                width: MOBILE_WATER_WIDTH,
                viscosity: 0.96,
                ..base
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_grid_sizes() {
        assert_eq!(WaterPreset::Desktop.to_config().width, 128);
        assert_eq!(WaterPreset::Mobile.to_config().width, 32);
        assert_eq!(
            WaterPreset::Desktop.to_config().bounds,
            WaterPreset::Mobile.to_config().bounds
        );
    }

    #[test]
    fn test_slope_scale_is_cells_per_unit() {
        let config = WaterPreset::Desktop.to_config();
        assert!((config.slope_scale() * config.cell_size() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_sanitized_clamps_viscosity() {
        let config = WaterConfig {
            viscosity: 1.5,
            width: 0,
            ..Default::default()
        }
        .sanitized();
        assert!(config.viscosity < 1.0);
        assert_eq!(config.width, 2);
    }
}
