use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{
    config::SessionConfig,
    physics::{
        scatter_bodies, simulate_locomotion, step_floating_bodies, CollisionGeometry,
        FloatContext, FloatingBody, LocomotionReport,
    },
    players::{Avatar, CameraRig, InputState},
    water::{HeightField, SurfaceSampler},
};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CadenceConfig {
    /// Frames per cycle on which the water runs
    pub active: u32,
    /// Cycle length in frames
    pub period: u32,
}

impl Default for CadenceConfig {
    fn default() -> Self {
        Self {
            active: 3,
            period: 7,
        }
    }
}

/// Decides which frames advance the water and the floaters.
#[derive(Debug, Clone)]
pub struct FrameCadence {
    config: CadenceConfig,
    frame: u64,
}

impl FrameCadence {
    pub fn new(config: CadenceConfig) -> Self {
        let period = config.period.max(1);
        Self {
            config: CadenceConfig {
                active: config.active.min(period),
                period,
            },
            frame: 0,
        }
    }

    /// Count one frame. Returns whether this frame runs the water.
    pub fn advance(&mut self) -> bool {
        let active = self.frame % u64::from(self.config.period) < u64::from(self.config.active);
        self.frame += 1;
        active
    }

    pub fn frames(&self) -> u64 {
        self.frame
    }
}

/// Assets the avatar needs before locomotion may run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadyGate {
    pub avatar: bool,
    pub collision: bool,
    pub clips: bool,
}

impl ReadyGate {
    pub fn open() -> Self {
        Self {
            avatar: true,
            collision: true,
            clips: true,
        }
    }

    pub fn is_open(&self) -> bool {
        self.avatar && self.collision && self.clips
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickReport {
    /// `None` when the ready gate was closed or no geometry was supplied
    pub locomotion: Option<LocomotionReport>,
    pub water_stepped: bool,
}

/// Fold a 64-bit session seed into the 32-bit noise seed.
fn noise_seed(seed: u64) -> u32 {
    (seed ^ (seed >> 32)) as u32
}

/// Owner of all simulation state for one play session.
#[derive(Resource)]
pub struct Session {
    config: SessionConfig,
    water: HeightField,
    bodies: Vec<FloatingBody>,
    avatar: Avatar,
    camera: CameraRig,
    cadence: FrameCadence,
    ready: ReadyGate,
    elapsed: f32,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        let water_config = config.effective_water();
        let water = HeightField::new(water_config.clone(), noise_seed(config.seed));
        let bodies = scatter_bodies(
            config.floaters.count,
            &water_config,
            &config.floaters,
            config.seed,
        );

        log::info!(
            "Session started: {}x{} water, {} floaters, seed {}",
            water_config.width,
            water_config.width,
            bodies.len(),
            config.seed
        );

        Self {
            water,
            bodies,
            avatar: Avatar::spawned_at(config.locomotion.spawn_point),
            camera: CameraRig::new(config.camera.clone()),
            cadence: FrameCadence::new(config.cadence),
            ready: ReadyGate::default(),
            elapsed: 0.0,
            config,
        }
    }

    /// Run one frame of the simulation.
    pub fn tick(
        &mut self,
        input: &InputState,
        geometry: Option<&dyn CollisionGeometry>,
        delta: f32,
    ) -> TickReport {
        let mut report = TickReport::default();

        self.camera
            .update(input.camera_yaw_delta, input.camera_pitch_delta);

        if let (true, Some(geometry)) = (self.ready.is_open(), geometry) {
            let camera = self.camera_transform();
            report.locomotion = Some(simulate_locomotion(
                &mut self.avatar,
                input,
                &camera,
                geometry,
                &self.config.locomotion,
                delta,
            ));
        }

        let anchor = self.water.config().anchor;
        self.water.set_disturbance(
            input
                .pointer_on_water
                .map(|point| point - Vec2::new(anchor.x, anchor.z)),
        );

        if self.cadence.advance() {
            self.water.step();
            let sampler = SurfaceSampler::new(&self.water);
            let ctx = FloatContext {
                elapsed: self.elapsed,
            };
            step_floating_bodies(&mut self.bodies, &sampler, &self.config.floaters, &ctx);
            report.water_stepped = true;
        }

        self.elapsed += delta.max(0.0);
        report
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn avatar(&self) -> &Avatar {
        &self.avatar
    }

    pub fn bodies(&self) -> &[FloatingBody] {
        &self.bodies
    }

    pub fn height_field(&self) -> &HeightField {
        &self.water
    }

    pub fn camera(&self) -> &CameraRig {
        &self.camera
    }

    /// Third-person camera around the avatar's current position.
    pub fn camera_transform(&self) -> Transform {
        self.camera.transform(self.avatar.position)
    }

    pub fn ready_gate(&self) -> ReadyGate {
        self.ready
    }

    pub fn ready_gate_mut(&mut self) -> &mut ReadyGate {
        &mut self.ready
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn frames(&self) -> u64 {
        self.cadence.frames()
    }

    /// Per-vertex Y offsets for the water mesh, in [`HeightField::heights`] order.
    pub fn vertex_displacements(&self) -> Vec<f32> {
        let scale = self.water.config().vertical_scale;
        self.water.heights().iter().map(|h| h * scale).collect()
    }
}
