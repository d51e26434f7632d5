//! Third-person orbit camera following the avatar.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    /// Orbit radius around the avatar
    pub distance: f32,
    /// Height of the point the camera looks at, above the avatar's feet
    pub look_height: f32,
    /// Lowest pitch in radians (negative looks up from below)
    pub min_pitch: f32,
    /// Highest pitch in radians
    pub max_pitch: f32,
    /// Fraction of the remaining angle covered each tick
    pub smoothing: f32,
    pub initial_pitch: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            distance: 10.0,
            look_height: 1.5,
            min_pitch: -0.2,
            max_pitch: 1.2,
            smoothing: 0.15,
            initial_pitch: 0.35,
        }
    }
}

/// Yaw/pitch orbit state with eased following of its targets.
#[derive(Debug, Clone)]
pub struct CameraRig {
    config: CameraConfig,
    yaw: f32,
    pitch: f32,
    target_yaw: f32,
    target_pitch: f32,
}

impl CameraRig {
    pub fn new(config: CameraConfig) -> Self {
        let pitch = config.initial_pitch.clamp(config.min_pitch, config.max_pitch);
        Self {
            config,
            yaw: 0.0,
            pitch,
            target_yaw: 0.0,
            target_pitch: pitch,
        }
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn target_pitch(&self) -> f32 {
        self.target_pitch
    }

    /// Feed this tick's look deltas and ease toward the new targets.
    pub fn update(&mut self, yaw_delta: f32, pitch_delta: f32) {
        self.target_yaw += yaw_delta;
        self.target_pitch =
            (self.target_pitch + pitch_delta).clamp(self.config.min_pitch, self.config.max_pitch);

        let k = self.config.smoothing.clamp(0.0, 1.0);
        self.yaw += (self.target_yaw - self.yaw) * k;
        self.pitch += (self.target_pitch - self.pitch) * k;
    }

    /// Camera transform orbiting `focus`, looking at it.
    pub fn transform(&self, focus: Vec3) -> Transform {
        let rotation = Quat::from_euler(EulerRot::YXZ, self.yaw, -self.pitch, 0.0);
        let look_at = focus + Vec3::Y * self.config.look_height;
        let eye = look_at + rotation * Vec3::Z * self.config.distance;
        Transform::from_translation(eye).looking_at(look_at, Vec3::Y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pitch_target_is_clamped() {
        let mut rig = CameraRig::new(CameraConfig::default());
        rig.update(0.0, 10.0);
        assert_eq!(rig.target_pitch(), 1.2);
        rig.update(0.0, -10.0);
        assert_eq!(rig.target_pitch(), -0.2);
    }

    #[test]
    fn test_angles_ease_toward_target() {
        let mut rig = CameraRig::new(CameraConfig::default());
        let start_pitch = rig.pitch();
        rig.update(1.0, 0.5);
        assert!(rig.yaw() > 0.0 && rig.yaw() < 1.0);
        assert!(rig.pitch() > start_pitch && rig.pitch() < rig.target_pitch());
        for _ in 0..200 {
            rig.update(0.0, 0.0);
        }
        assert!((rig.yaw() - 1.0).abs() < 1e-3);
        assert!((rig.pitch() - rig.target_pitch()).abs() < 1e-3);
    }

    #[test]
    fn test_default_rig_looks_toward_negative_z() {
        let rig = CameraRig::new(CameraConfig::default());
        let transform = rig.transform(Vec3::ZERO);
        assert!(transform.translation.z > 0.0);
        assert!(transform.translation.y > 1.5, "positive pitch looks down");
        let forward = transform.forward().with_y(0.0).normalize_or_zero();
        assert!((forward - Vec3::NEG_Z).length() < 1e-4);
    }
}
