use bevy::math::{Quat, Vec3};

use crate::constants::SPAWN_POINT;

pub mod animation;
pub mod camera;
pub mod input;

pub use animation::{AnimationBlend, AnimationState};
pub use camera::{CameraConfig, CameraRig};
pub use input::{InputState, IntentBuffer, MoveAction};

/// Physical support of the avatar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SupportState {
    Grounded,
    #[default]
    Airborne,
}

impl SupportState {
    /// Transition taken when the ground probe confirms contact.
    /// Returns true when this is a fresh landing.
    pub fn land(&mut self) -> bool {
        let was_airborne = *self == SupportState::Airborne;
        *self = SupportState::Grounded;
        was_airborne
    }

    /// Transition taken when the ground probe finds nothing within reach.
    pub fn lose_ground(&mut self) {
        *self = SupportState::Airborne;
    }

    pub fn is_grounded(self) -> bool {
        self == SupportState::Grounded
    }
}

/// The single player-controlled character.
#[derive(Debug, Clone)]
pub struct Avatar {
    pub position: Vec3,
    pub orientation: Quat,
    pub vertical_velocity: f32,
    pub support: SupportState,
    pub animation: AnimationBlend,
    /// Milliseconds of uninterrupted movement input
    pub move_held_ms: f32,
}

impl Default for Avatar {
    fn default() -> Self {
        Self::spawned_at(SPAWN_POINT)
    }
}

impl Avatar {
    pub fn spawned_at(position: Vec3) -> Self {
        Self {
            position,
            orientation: Quat::IDENTITY,
            vertical_velocity: 0.0,
            support: SupportState::Airborne,
            animation: AnimationBlend::default(),
            move_held_ms: 0.0,
        }
    }

    /// Apply a jump impulse. Only a grounded avatar can jump; it becomes
    /// airborne immediately. Returns whether the jump happened.
    pub fn try_jump(&mut self, impulse: f32) -> bool {
        if !self.support.is_grounded() {
            return false;
        }
        self.vertical_velocity = impulse;
        self.support = SupportState::Airborne;
        true
    }

    /// Teleport back to `spawn` with no vertical motion.
    pub fn respawn(&mut self, spawn: Vec3) {
        self.position = spawn;
        self.vertical_velocity = 0.0;
        self.support = SupportState::Airborne;
        self.move_held_ms = 0.0;
    }
}
