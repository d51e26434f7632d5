//! Water surface simulation and queries.
//!
//! ```text
//!   WaterConfig ──► HeightField ──step()──► heights ──► render mesh displacement
//!                        │
//!                        └──► SurfaceSampler ──► SurfaceSample ──► floating bodies
//! ```
//!
//! The field only ever stores heights relative to the rest level; the
//! `vertical_scale` amplification is applied by consumers.

pub mod config;
pub mod heightfield;
pub mod sampler;

pub use config::{WaterConfig, WaterPreset};
pub use heightfield::{disturbance_falloff, HeightField};
pub use sampler::{SurfaceSample, SurfaceSampler};
