use bevy::math::Vec2;
use bevy_ecs::resource::Resource;
use bevy_platform::collections::HashSet;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, PartialEq, Debug, Clone, Copy, Eq, Hash)]
pub enum MoveAction {
    MoveForward,
    MoveRight,
    MoveBackward,
    MoveLeft,
}

/// Immutable per-tick view of the player's intent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputState {
    pub inputs: HashSet<MoveAction>,
    /// Set on the frame the jump key went down
    pub jump: bool,
    /// Accumulated camera yaw change since the last snapshot, radians
    pub camera_yaw_delta: f32,
    /// Accumulated camera pitch change since the last snapshot, radians
    pub camera_pitch_delta: f32,
    /// Where the pointer touches the water, world (x, z)
    pub pointer_on_water: Option<Vec2>,
}

impl InputState {
    pub fn is_pressed(&self, action: MoveAction) -> bool {
        self.inputs.contains(&action)
    }

    pub fn with_action(mut self, action: MoveAction) -> Self {
        self.inputs.insert(action);
        self
    }

    pub fn with_jump(mut self) -> Self {
        self.jump = true;
        self
    }
}

/// Producer side of the input snapshot.
///
/// Event handlers write here at any time; the tick takes one snapshot at its
/// start. Held keys and the pointer are last-write-wins, camera deltas add
/// up, and a jump press stays latched until the next snapshot consumes it.
/// Nothing is queued: two jump presses between ticks count as one.
#[derive(Resource, Debug, Default)]
pub struct IntentBuffer {
    pending: InputState,
}

impl IntentBuffer {
    /// Replace the set of held movement keys.
    pub fn set_held(&mut self, held: impl IntoIterator<Item = MoveAction>) {
        self.pending.inputs.clear();
        self.pending.inputs.extend(held);
    }

    pub fn press_jump(&mut self) {
        self.pending.jump = true;
    }

    pub fn add_camera_delta(&mut self, yaw: f32, pitch: f32) {
        self.pending.camera_yaw_delta += yaw;
        self.pending.camera_pitch_delta += pitch;
    }

    pub fn set_pointer_on_water(&mut self, point: Option<Vec2>) {
        self.pending.pointer_on_water = point;
    }

    /// Take this tick's snapshot, clearing edge events and deltas.
    pub fn take_snapshot(&mut self) -> InputState {
        let snapshot = self.pending.clone();
        self.pending.jump = false;
        self.pending.camera_yaw_delta = 0.0;
        self.pending.camera_pitch_delta = 0.0;
        snapshot
    }
}
