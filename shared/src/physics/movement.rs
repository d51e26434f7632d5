//! Avatar locomotion: camera-relative walking, wall and ground probes,
//! gravity, jumping, respawn and the idle/run animation blend.
//!
//! Collision is resolved with rays only. The level is opaque apart from
//! [`CollisionGeometry::raycast`], and a probe that hits nothing means "free
//! to move" or "no ground", never an error.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{
    constants::{FALL_THRESHOLD, SPAWN_POINT},
    physics::CollisionGeometry,
    players::{AnimationState, Avatar, InputState, MoveAction},
};

/// Physics constants used by the locomotion controller.
pub mod constants {
    /// Gravity acceleration (units/s²), negative for downward
    pub const GRAVITY: f32 = -20.0;
    /// Maximum fall speed
    pub const TERMINAL_VELOCITY: f32 = 50.0;
    /// Jump impulse velocity
    pub const JUMP_VELOCITY: f32 = 8.0;
    /// Walking/running speed (units/s)
    pub const PLAYER_SPEED: f32 = 6.0;
    /// Intent vectors shorter than this count as no input
    pub const MIN_INTENT: f32 = 0.001;
    /// Nearest wall closer than this blocks translation
    pub const WALL_CLEARANCE: f32 = 1.5;
    /// Ground closer than this (from the probe origin) supports the avatar
    pub const GROUND_CLEARANCE: f32 = 1.5;
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LocomotionConfig {
    pub speed: f32,
    pub gravity: f32,
    pub terminal_velocity: f32,
    pub jump_velocity: f32,
    /// Slerp factor applied to the orientation each tick while moving
    pub turn_rate: f32,
    pub wall_clearance: f32,
    pub ground_clearance: f32,
    /// Height above the feet the forward probe starts from
    pub wall_probe_height: f32,
    /// Height above the feet the ground probe starts from
    pub ground_probe_height: f32,
    /// Cross-fade duration between idle and run, seconds
    pub fade_duration: f32,
    /// Continuous movement after which the run clip speeds up, milliseconds
    pub sprint_after_ms: f32,
    pub sprint_time_scale: f32,
    pub fall_threshold: f32,
    pub spawn_point: Vec3,
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        Self {
            speed: constants::PLAYER_SPEED,
            gravity: constants::GRAVITY,
            terminal_velocity: constants::TERMINAL_VELOCITY,
            jump_velocity: constants::JUMP_VELOCITY,
            turn_rate: 0.15,
            wall_clearance: constants::WALL_CLEARANCE,
            ground_clearance: constants::GROUND_CLEARANCE,
            wall_probe_height: 0.5,
            ground_probe_height: 1.0,
            fade_duration: 0.2,
            sprint_after_ms: 2000.0,
            sprint_time_scale: 1.5,
            fall_threshold: FALL_THRESHOLD,
            spawn_point: SPAWN_POINT,
        }
    }
}

/// What happened during one locomotion tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LocomotionReport {
    pub moving: bool,
    /// Movement was suppressed by the forward probe
    pub blocked: bool,
    pub grounded: bool,
    pub jumped: bool,
    pub respawned: bool,
}

/// Calculate the camera-relative movement intent (not normalized).
pub fn calculate_movement_intent(input: &InputState, camera: &Transform) -> Vec3 {
    let forward = camera.forward().with_y(0.0).normalize_or_zero();
    let right = camera.right().with_y(0.0).normalize_or_zero();

    let mut direction = Vec3::ZERO;

    if input.is_pressed(MoveAction::MoveBackward) {
        direction -= forward;
    }
    if input.is_pressed(MoveAction::MoveForward) {
        direction += forward;
    }
    if input.is_pressed(MoveAction::MoveLeft) {
        direction -= right;
    }
    if input.is_pressed(MoveAction::MoveRight) {
        direction += right;
    }

    direction
}

/// Run one locomotion tick for the avatar.
///
/// Order: intent, turn, forward probe and translation, animation target,
/// ground probe, jump, gravity and vertical integration, fall recovery,
/// animation advance.
pub fn simulate_locomotion<G: CollisionGeometry + ?Sized>(
    avatar: &mut Avatar,
    input: &InputState,
    camera: &Transform,
    geometry: &G,
    config: &LocomotionConfig,
    delta: f32,
) -> LocomotionReport {
    let mut report = LocomotionReport::default();
    if delta <= 0.0 {
        return report;
    }

    let intent = calculate_movement_intent(input, camera);
    report.moving = intent.length_squared() >= constants::MIN_INTENT * constants::MIN_INTENT;

    if report.moving {
        let direction = intent.normalize();
        turn_toward(avatar, direction, config.turn_rate);
        report.blocked = !apply_horizontal_movement(avatar, geometry, direction, config, delta);
    }

    update_animation_target(avatar, report.moving, config, delta);

    report.grounded = resolve_ground(avatar, geometry, config);

    if input.jump && avatar.try_jump(config.jump_velocity) {
        report.jumped = true;
        report.grounded = false;
    }

    apply_gravity(avatar, config, delta);

    report.respawned = apply_safety_net(avatar, config);

    avatar.animation.advance(delta);

    report
}

/// Slerp the orientation toward the heading of `direction`.
fn turn_toward(avatar: &mut Avatar, direction: Vec3, turn_rate: f32) {
    let heading = direction.x.atan2(direction.z);
    let target = Quat::from_rotation_y(heading);
    avatar.orientation = avatar.orientation.slerp(target, turn_rate);
}

/// Translate along `direction` unless a wall is within clearance.
/// Returns whether the avatar moved.
fn apply_horizontal_movement<G: CollisionGeometry + ?Sized>(
    avatar: &mut Avatar,
    geometry: &G,
    direction: Vec3,
    config: &LocomotionConfig,
    delta: f32,
) -> bool {
    let origin = avatar.position + Vec3::Y * config.wall_probe_height;
    if let Some(hit) = geometry.nearest_hit(origin, direction) {
        if hit.distance < config.wall_clearance {
            return false;
        }
    }

    avatar.position += direction * config.speed * delta;
    true
}

fn update_animation_target(
    avatar: &mut Avatar,
    moving: bool,
    config: &LocomotionConfig,
    delta: f32,
) {
    if moving {
        avatar.move_held_ms += delta * 1000.0;
        avatar
            .animation
            .cross_fade_to(AnimationState::Running, config.fade_duration);
        let scale = if avatar.move_held_ms > config.sprint_after_ms {
            config.sprint_time_scale
        } else {
            1.0
        };
        avatar.animation.set_time_scale(AnimationState::Running, scale);
    } else {
        avatar.move_held_ms = 0.0;
        avatar
            .animation
            .cross_fade_to(AnimationState::Idle, config.fade_duration);
    }
}

/// Probe straight down and update the support state.
///
/// A rising avatar passes through the probe band without landing; a
/// grounded one is snapped onto the hit point every tick.
fn resolve_ground<G: CollisionGeometry + ?Sized>(
    avatar: &mut Avatar,
    geometry: &G,
    config: &LocomotionConfig,
) -> bool {
    let origin = avatar.position + Vec3::Y * config.ground_probe_height;
    let ground = geometry
        .nearest_hit(origin, Vec3::NEG_Y)
        .filter(|hit| hit.distance < config.ground_clearance);

    match ground {
        Some(hit) if avatar.vertical_velocity <= 0.0 => {
            if avatar.support.land() {
                log::debug!("Avatar landed at {:?}", hit.point);
            }
            avatar.position.y = hit.point.y;
            avatar.vertical_velocity = 0.0;
            true
        }
        _ => {
            avatar.support.lose_ground();
            false
        }
    }
}

fn apply_gravity(avatar: &mut Avatar, config: &LocomotionConfig, delta: f32) {
    if !avatar.support.is_grounded() {
        avatar.vertical_velocity += config.gravity * delta;
        avatar.vertical_velocity = avatar
            .vertical_velocity
            .clamp(-config.terminal_velocity, config.terminal_velocity);
    }
    avatar.position.y += avatar.vertical_velocity * delta;
}

/// Teleport the avatar back to spawn if it fell out of the world.
fn apply_safety_net(avatar: &mut Avatar, config: &LocomotionConfig) -> bool {
    if avatar.position.y >= config.fall_threshold {
        return false;
    }
    log::warn!(
        "Avatar fell below safety threshold (y = {}). Respawning.",
        avatar.position.y
    );
    avatar.respawn(config.spawn_point);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::{RayHit, TriangleMesh};
    use crate::players::SupportState;

    const DT: f32 = 1.0 / 60.0;

    /// Camera behind the avatar looking down -Z.
    fn camera() -> Transform {
        Transform::from_xyz(0.0, 5.0, 10.0).looking_at(Vec3::ZERO, Vec3::Y)
    }

    fn floor() -> TriangleMesh {
        TriangleMesh::new().with_floor(Vec3::ZERO, 100.0, 100.0)
    }

    struct Nothing;

    impl CollisionGeometry for Nothing {
        fn raycast(&self, _origin: Vec3, _direction: Vec3) -> Vec<RayHit> {
            Vec::new()
        }
    }

    /// Reports a wall at a fixed distance along any horizontal ray.
    struct WallAt(f32);

    impl CollisionGeometry for WallAt {
        fn raycast(&self, origin: Vec3, direction: Vec3) -> Vec<RayHit> {
            if direction.y.abs() > 0.5 {
                return Vec::new();
            }
            let direction = direction.normalize();
            vec![RayHit {
                distance: self.0,
                point: origin + direction * self.0,
            }]
        }
    }

    fn grounded_avatar(position: Vec3) -> Avatar {
        let mut avatar = Avatar::spawned_at(position);
        avatar.support = SupportState::Grounded;
        avatar
    }

    #[test]
    fn test_grounded_avatar_snaps_exactly_to_ground() {
        let config = LocomotionConfig::default();
        let mut avatar = grounded_avatar(Vec3::new(1.0, 0.3, 1.0));
        avatar.vertical_velocity = -2.0;
        let probe = floor()
            .nearest_hit(
                avatar.position + Vec3::Y * config.ground_probe_height,
                Vec3::NEG_Y,
            )
            .unwrap();

        let report = simulate_locomotion(
            &mut avatar,
            &InputState::default(),
            &camera(),
            &floor(),
            &config,
            DT,
        );
        assert!(report.grounded);
        assert_eq!(avatar.position.y, probe.point.y);
        assert_eq!(avatar.vertical_velocity, 0.0);
    }

    #[test]
    fn test_airborne_avatar_accelerates_down() {
        let mut avatar = Avatar::spawned_at(Vec3::new(0.0, 20.0, 0.0));
        let config = LocomotionConfig::default();
        simulate_locomotion(
            &mut avatar,
            &InputState::default(),
            &camera(),
            &floor(),
            &config,
            DT,
        );
        assert!((avatar.vertical_velocity - config.gravity * DT).abs() < 1e-6);
        assert!(avatar.position.y < 20.0);
        assert_eq!(avatar.support, SupportState::Airborne);
    }

    #[test]
    fn test_jump_ignored_while_airborne() {
        let mut avatar = Avatar::spawned_at(Vec3::new(0.0, 20.0, 0.0));
        avatar.vertical_velocity = -1.0;
        let config = LocomotionConfig::default();
        let report = simulate_locomotion(
            &mut avatar,
            &InputState::default().with_jump(),
            &camera(),
            &Nothing,
            &config,
            DT,
        );
        assert!(!report.jumped);
        assert!((avatar.vertical_velocity - (-1.0 + config.gravity * DT)).abs() < 1e-6);
    }

    #[test]
    fn test_jump_from_ground() {
        let mut avatar = grounded_avatar(Vec3::ZERO);
        let config = LocomotionConfig::default();
        let report = simulate_locomotion(
            &mut avatar,
            &InputState::default().with_jump(),
            &camera(),
            &floor(),
            &config,
            DT,
        );
        assert!(report.jumped);
        assert_eq!(avatar.support, SupportState::Airborne);
        assert!(avatar.vertical_velocity > 0.0);
        assert!(avatar.position.y > 0.0);

        // Still inside the probe band while rising: no landing.
        let report = simulate_locomotion(
            &mut avatar,
            &InputState::default(),
            &camera(),
            &floor(),
            &config,
            DT,
        );
        assert!(!report.grounded);
        assert!(avatar.vertical_velocity > 0.0);
    }

    #[test]
    fn test_fall_below_threshold_respawns() {
        let mut avatar = Avatar::spawned_at(Vec3::new(4.0, -151.0, 2.0));
        avatar.vertical_velocity = -30.0;
        let config = LocomotionConfig::default();
        let report = simulate_locomotion(
            &mut avatar,
            &InputState::default(),
            &camera(),
            &Nothing,
            &config,
            DT,
        );
        assert!(report.respawned);
        assert_eq!(avatar.position, SPAWN_POINT);
        assert_eq!(avatar.vertical_velocity, 0.0);
    }

    #[test]
    fn test_no_input_stays_put_and_fades_to_idle() {
        let mut avatar = grounded_avatar(Vec3::ZERO);
        avatar
            .animation
            .cross_fade_to(AnimationState::Running, 0.2);
        let config = LocomotionConfig::default();

        let report = simulate_locomotion(
            &mut avatar,
            &InputState::default(),
            &camera(),
            &floor(),
            &config,
            DT,
        );
        assert!(!report.moving);
        assert_eq!(avatar.position, Vec3::ZERO);
        assert_eq!(avatar.animation.active(), AnimationState::Idle);

        let ticks = (config.fade_duration / DT).ceil() as usize + 1;
        for _ in 0..ticks {
            simulate_locomotion(
                &mut avatar,
                &InputState::default(),
                &camera(),
                &floor(),
                &config,
                DT,
            );
        }
        assert_eq!(avatar.animation.weight(AnimationState::Idle), 1.0);
    }

    #[test]
    fn test_opposite_keys_cancel_to_no_movement() {
        let input = InputState::default()
            .with_action(MoveAction::MoveForward)
            .with_action(MoveAction::MoveBackward);
        let intent = calculate_movement_intent(&input, &camera());
        assert!(intent.length_squared() < constants::MIN_INTENT * constants::MIN_INTENT);
    }

    #[test]
    fn test_forward_moves_away_from_camera() {
        let mut avatar = grounded_avatar(Vec3::ZERO);
        let config = LocomotionConfig::default();
        let report = simulate_locomotion(
            &mut avatar,
            &InputState::default().with_action(MoveAction::MoveForward),
            &camera(),
            &floor(),
            &config,
            DT,
        );
        assert!(report.moving);
        assert!(!report.blocked);
        assert!((avatar.position.z + config.speed * DT).abs() < 1e-4);
        assert_eq!(avatar.animation.active(), AnimationState::Running);
    }

    #[test]
    fn test_wall_within_clearance_blocks_but_still_turns() {
        let mut avatar = grounded_avatar(Vec3::ZERO);
        let report = simulate_locomotion(
            &mut avatar,
            &InputState::default().with_action(MoveAction::MoveRight),
            &camera(),
            &WallAt(1.0),
            &LocomotionConfig::default(),
            DT,
        );
        assert!(report.blocked);
        assert_eq!(avatar.position.x, 0.0);
        assert_eq!(avatar.position.z, 0.0);
        assert_ne!(avatar.orientation, Quat::IDENTITY);
    }

    #[test]
    fn test_distant_wall_does_not_block() {
        let mut avatar = grounded_avatar(Vec3::ZERO);
        let report = simulate_locomotion(
            &mut avatar,
            &InputState::default().with_action(MoveAction::MoveRight),
            &camera(),
            &WallAt(2.0),
            &LocomotionConfig::default(),
            DT,
        );
        assert!(!report.blocked);
        assert!(avatar.position.x > 0.0);
    }

    #[test]
    fn test_run_clip_speeds_up_after_sustained_movement() {
        let mut avatar = grounded_avatar(Vec3::ZERO);
        let config = LocomotionConfig::default();
        let input = InputState::default().with_action(MoveAction::MoveForward);

        simulate_locomotion(&mut avatar, &input, &camera(), &floor(), &config, DT);
        assert_eq!(avatar.animation.time_scale(AnimationState::Running), 1.0);

        for _ in 0..130 {
            simulate_locomotion(&mut avatar, &input, &camera(), &floor(), &config, DT);
        }
        assert_eq!(
            avatar.animation.time_scale(AnimationState::Running),
            config.sprint_time_scale
        );
    }

    #[test]
    fn test_walking_off_a_ledge_starts_falling() {
        let ledge = TriangleMesh::new().with_floor(Vec3::ZERO, 1.0, 1.0);
        let mut avatar = grounded_avatar(Vec3::new(5.0, 0.0, 0.0));
        simulate_locomotion(
            &mut avatar,
            &InputState::default(),
            &camera(),
            &ledge,
            &LocomotionConfig::default(),
            DT,
        );
        assert_eq!(avatar.support, SupportState::Airborne);
        assert!(avatar.vertical_velocity < 0.0);
    }
}
