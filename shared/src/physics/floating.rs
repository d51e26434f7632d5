//! Floating props riding the simulated water surface.
//!
//! Bodies are stepped on the water cadence, not every frame, so velocities
//! are in world units per step rather than per second.

use bevy::math::{Quat, Vec2, Vec3};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::water::{SurfaceSampler, WaterConfig};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FloaterConfig {
    /// Number of bodies scattered at session start
    pub count: usize,
    /// Gain of the slope-following push
    pub slope_gain: f32,
    /// Amplitude of the per-body oscillating drift
    pub drift_gain: f32,
    /// Angular frequency of the drift, radians per second of elapsed time
    pub drift_frequency: f32,
    /// Multiplicative velocity damping per step, below 1
    pub damping: f32,
    /// Distance kept from the field edge
    pub margin: f32,
    /// Extra distance a reflected body is pushed back inside
    pub inset: f32,
    /// Velocity factor applied on reflection
    pub bounce: f32,
    /// Slerp factor toward the target orientation per step
    pub orient_rate: f32,
    /// Movement below this length keeps the previous heading
    pub heading_epsilon: f32,
}

impl Default for FloaterConfig {
    fn default() -> Self {
        Self {
            count: 5,
            slope_gain: 0.1,
            drift_gain: 0.0005,
            drift_frequency: 0.6,
            damping: 0.998,
            margin: 2.0,
            inset: 0.001,
            bounce: -0.54,
            orient_rate: 0.05,
            heading_epsilon: 1e-4,
        }
    }
}

impl FloaterConfig {
    /// Largest horizontal offset from the anchor a body may keep.
    pub fn reflection_limit(&self, water: &WaterConfig) -> f32 {
        (water.half_bounds() - self.margin.max(0.0)).max(0.0)
    }
}

/// Per-step inputs shared by every body.
#[derive(Debug, Clone, Copy, Default)]
pub struct FloatContext {
    /// Session time in seconds, drives the oscillating drift
    pub elapsed: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FloatingBody {
    pub position: Vec3,
    pub orientation: Quat,
    pub velocity: Vec3,
    /// Yaw-only rotation from the last non-negligible movement
    pub heading: Quat,
}

impl FloatingBody {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            orientation: Quat::IDENTITY,
            velocity: Vec3::ZERO,
            heading: Quat::IDENTITY,
        }
    }
}

/// Scatter `count` bodies inside the reflection limits, reproducibly for a seed.
pub fn scatter_bodies(
    count: usize,
    water: &WaterConfig,
    config: &FloaterConfig,
    seed: u64,
) -> Vec<FloatingBody> {
    let mut rng = StdRng::seed_from_u64(seed);
    let limit = config.reflection_limit(water);

    (0..count)
        .map(|_| {
            let (x, z) = if limit > 0.0 {
                (rng.gen_range(-limit..limit), rng.gen_range(-limit..limit))
            } else {
                (0.0, 0.0)
            };
            let yaw = rng.gen_range(0.0..std::f32::consts::TAU);

            let mut body = FloatingBody::at(water.anchor + Vec3::new(x, 0.0, z));
            body.heading = Quat::from_rotation_y(yaw);
            body.orientation = body.heading;
            body
        })
        .collect()
}

/// Advance one body by one water step.
pub fn step_floating_body(
    body: &mut FloatingBody,
    index: usize,
    sampler: &SurfaceSampler,
    config: &FloaterConfig,
    ctx: &FloatContext,
) {
    let water = sampler.config();
    let sample = sampler.sample(body.position.x, body.position.z);

    body.position.y = water.anchor.y + sample.height * water.vertical_scale;

    let push = Vec2::new(sample.slope_x, -sample.slope_z) * config.slope_gain;
    let phase = index as f32 * 1.7;
    let t = ctx.elapsed * config.drift_frequency;
    let drift = Vec2::new((t + phase).sin(), (t * 0.7 + phase).cos()) * config.drift_gain;
    body.velocity.x += push.x + drift.x;
    body.velocity.z += push.y + drift.y;
    body.velocity.y = 0.0;

    body.velocity *= config.damping;
    let before = Vec2::new(body.position.x, body.position.z);
    body.position.x += body.velocity.x;
    body.position.z += body.velocity.z;

    reflect_at_bounds(body, water, config);

    let moved = Vec2::new(body.position.x, body.position.z) - before;
    if moved.length() > config.heading_epsilon {
        body.heading = Quat::from_rotation_y(moved.x.atan2(moved.y));
    }

    let tilt = Quat::from_rotation_arc(Vec3::Y, sample.normal());
    let target = (tilt * body.heading).normalize();
    body.orientation = body.orientation.slerp(target, config.orient_rate).normalize();
}

/// Keep a body inside the field, bouncing the offending velocity component.
pub fn reflect_at_bounds(body: &mut FloatingBody, water: &WaterConfig, config: &FloaterConfig) {
    let limit = config.reflection_limit(water);
    let inset = config.inset.clamp(0.0, limit);

    let offset_x = body.position.x - water.anchor.x;
    if offset_x.abs() > limit {
        body.position.x = water.anchor.x + offset_x.signum() * (limit - inset);
        body.velocity.x *= config.bounce;
    }

    let offset_z = body.position.z - water.anchor.z;
    if offset_z.abs() > limit {
        body.position.z = water.anchor.z + offset_z.signum() * (limit - inset);
        body.velocity.z *= config.bounce;
    }
}

/// Step every body, in index order.
pub fn step_floating_bodies(
    bodies: &mut [FloatingBody],
    sampler: &SurfaceSampler,
    config: &FloaterConfig,
    ctx: &FloatContext,
) {
    for (index, body) in bodies.iter_mut().enumerate() {
        step_floating_body(body, index, sampler, config, ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::water::{HeightField, WaterPreset};
    use bevy::math::EulerRot;
    use proptest::prelude::*;

    fn small_water() -> WaterConfig {
        WaterConfig {
            width: 16,
            bounds: 32.0,
            anchor: Vec3::new(10.0, 3.0, -5.0),
            ..WaterPreset::Mobile.to_config()
        }
    }

    #[test]
    fn test_snaps_to_scaled_surface_height() {
        let water = small_water();
        let mut field = HeightField::flat(water.clone());
        for i in 0..water.width {
            for j in 0..water.width {
                field.set_height(i, j, 0.25);
            }
        }
        let sampler = SurfaceSampler::new(&field);
        let mut body = FloatingBody::at(water.anchor + Vec3::new(1.0, 40.0, 1.0));
        step_floating_body(
            &mut body,
            0,
            &sampler,
            &FloaterConfig::default(),
            &FloatContext::default(),
        );
        assert!((body.position.y - (3.0 + 0.25 * water.vertical_scale)).abs() < 1e-5);
    }

    #[test]
    fn test_reflection_flips_and_attenuates_velocity() {
        let water = small_water();
        let config = FloaterConfig::default();
        let limit = water.half_bounds() - config.margin;

        let mut body = FloatingBody::at(water.anchor + Vec3::new(limit + 0.5, 0.0, 0.0));
        body.velocity = Vec3::new(0.3, 0.0, 0.1);
        reflect_at_bounds(&mut body, &water, &config);

        assert!((body.velocity.x - (-0.54 * 0.3)).abs() < 1e-6);
        assert_eq!(body.velocity.z, 0.1);
        assert!(body.position.x - water.anchor.x < limit);
    }

    #[test]
    fn test_reflection_on_negative_side() {
        let water = small_water();
        let config = FloaterConfig::default();
        let limit = water.half_bounds() - config.margin;

        let mut body = FloatingBody::at(water.anchor + Vec3::new(0.0, 0.0, -limit - 1.0));
        body.velocity = Vec3::new(0.0, 0.0, -0.2);
        reflect_at_bounds(&mut body, &water, &config);

        assert!((body.velocity.z - 0.108).abs() < 1e-6);
        assert!(body.position.z - water.anchor.z > -limit);
    }

    #[test]
    fn test_heading_kept_when_not_moving() {
        let water = small_water();
        let field = HeightField::flat(water.clone());
        let sampler = SurfaceSampler::new(&field);
        let config = FloaterConfig {
            drift_gain: 0.0,
            ..FloaterConfig::default()
        };

        let heading = Quat::from_rotation_y(1.0);
        let mut body = FloatingBody::at(water.anchor);
        body.heading = heading;

        for _ in 0..10 {
            step_floating_body(&mut body, 0, &sampler, &config, &FloatContext::default());
        }
        assert_eq!(body.heading, heading);
        assert!(body.orientation.angle_between(heading) < 1.0);
    }

    #[test]
    fn test_heading_follows_movement() {
        let water = small_water();
        let field = HeightField::flat(water.clone());
        let sampler = SurfaceSampler::new(&field);
        let config = FloaterConfig {
            drift_gain: 0.0,
            ..FloaterConfig::default()
        };

        let mut body = FloatingBody::at(water.anchor);
        body.velocity = Vec3::new(0.1, 0.0, 0.0);
        step_floating_body(&mut body, 0, &sampler, &config, &FloatContext::default());

        let (yaw, _, _) = body.heading.to_euler(EulerRot::YXZ);
        assert!((yaw - std::f32::consts::FRAC_PI_2).abs() < 1e-4, "yaw {yaw}");
    }

    #[test]
    fn test_drift_moves_bodies_on_flat_water() {
        let water = small_water();
        let field = HeightField::flat(water.clone());
        let sampler = SurfaceSampler::new(&field);
        let config = FloaterConfig::default();

        let mut bodies = vec![FloatingBody::at(water.anchor); 2];
        for step in 0..60 {
            let ctx = FloatContext {
                elapsed: step as f32 / 60.0,
            };
            step_floating_bodies(&mut bodies, &sampler, &config, &ctx);
        }
        assert_ne!(bodies[0].position, water.anchor.with_y(bodies[0].position.y));
        assert_ne!(bodies[0].position, bodies[1].position);
    }

    #[test]
    fn test_scatter_is_deterministic_and_inside() {
        let water = small_water();
        let config = FloaterConfig::default();
        let a = scatter_bodies(8, &water, &config, 42);
        let b = scatter_bodies(8, &water, &config, 42);
        assert_eq!(a, b);

        let limit = config.reflection_limit(&water);
        for body in &a {
            assert!((body.position.x - water.anchor.x).abs() <= limit);
            assert!((body.position.z - water.anchor.z).abs() <= limit);
        }
    }

    proptest! {
        #[test]
        fn prop_bodies_stay_within_bounds(
            x in -40.0f32..40.0,
            z in -40.0f32..40.0,
            vx in -5.0f32..5.0,
            vz in -5.0f32..5.0,
            steps in 1usize..50,
        ) {
            let water = small_water();
            let field = HeightField::new(water.clone(), 7);
            let sampler = SurfaceSampler::new(&field);
            let config = FloaterConfig::default();

            let mut body = FloatingBody::at(water.anchor + Vec3::new(x, 0.0, z));
            body.velocity = Vec3::new(vx, 0.0, vz);
            for step in 0..steps {
                let ctx = FloatContext { elapsed: step as f32 * 0.1 };
                step_floating_body(&mut body, 3, &sampler, &config, &ctx);
                let half = water.half_bounds();
                prop_assert!((body.position.x - water.anchor.x).abs() <= half);
                prop_assert!((body.position.z - water.anchor.z).abs() <= half);
            }
        }
    }
}
