//! Two-clip animation blend for the avatar.
//!
//! The blend only tracks weights, playback times and speeds. Skeletal
//! evaluation belongs to the renderer, which reads [`AnimationBlend::weight`],
//! [`AnimationBlend::time_scale`] and [`AnimationBlend::clip_time`] each frame.

/// Clips the avatar can blend between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AnimationState {
    #[default]
    Idle,
    Running,
}

impl AnimationState {
    pub const ALL: [AnimationState; 2] = [AnimationState::Idle, AnimationState::Running];

    #[inline]
    fn index(self) -> usize {
        match self {
            AnimationState::Idle => 0,
            AnimationState::Running => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct CrossFade {
    from: AnimationState,
    elapsed: f32,
    duration: f32,
}

/// Cross-fading blend between [`AnimationState`]s.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationBlend {
    active: AnimationState,
    fade: Option<CrossFade>,
    clip_times: [f32; 2],
    time_scales: [f32; 2],
}

impl Default for AnimationBlend {
    fn default() -> Self {
        Self {
            active: AnimationState::Idle,
            fade: None,
            clip_times: [0.0; 2],
            time_scales: [1.0; 2],
        }
    }
}

impl AnimationBlend {
    /// The state being faded in, or fully playing.
    pub fn active(&self) -> AnimationState {
        self.active
    }

    pub fn is_fading(&self) -> bool {
        self.fade.is_some()
    }

    /// Start a cross-fade toward `target`.
    ///
    /// Does nothing if `target` is already the active state, so a playing
    /// clip is never restarted. A clip that is still audible (fading out) is
    /// resumed where it is and its weight carries over into the new fade; a
    /// silent one starts from the beginning.
    /// Returns whether a new fade started.
    pub fn cross_fade_to(&mut self, target: AnimationState, duration: f32) -> bool {
        if target == self.active {
            return false;
        }

        let carried = self.weight(target);
        if carried <= 0.0 {
            self.clip_times[target.index()] = 0.0;
        }

        let from = self.active;
        self.active = target;
        self.fade = (duration > 0.0 && carried < 1.0).then_some(CrossFade {
            from,
            elapsed: duration * carried,
            duration,
        });
        log::debug!("Animation cross-fade {:?} -> {:?}", from, target);
        true
    }

    pub fn set_time_scale(&mut self, state: AnimationState, scale: f32) {
        self.time_scales[state.index()] = scale.max(0.0);
    }

    pub fn time_scale(&self, state: AnimationState) -> f32 {
        self.time_scales[state.index()]
    }

    /// Playback position of a clip in seconds.
    pub fn clip_time(&self, state: AnimationState) -> f32 {
        self.clip_times[state.index()]
    }

    /// Blend weight of a clip, the weights of both clips summing to 1.
    pub fn weight(&self, state: AnimationState) -> f32 {
        match self.fade {
            None => {
                if state == self.active {
                    1.0
                } else {
                    0.0
                }
            }
            Some(fade) => {
                let t = (fade.elapsed / fade.duration).clamp(0.0, 1.0);
                if state == self.active {
                    t
                } else if state == fade.from {
                    1.0 - t
                } else {
                    0.0
                }
            }
        }
    }

    /// Advance playback and any in-flight fade by `delta` seconds.
    pub fn advance(&mut self, delta: f32) {
        if delta <= 0.0 {
            return;
        }

        let fading_from = self.fade.map(|fade| fade.from);
        for state in AnimationState::ALL {
            if state == self.active || Some(state) == fading_from {
                self.clip_times[state.index()] += delta * self.time_scale(state);
            }
        }

        let finished = match &mut self.fade {
            Some(fade) => {
                fade.elapsed += delta;
                fade.elapsed >= fade.duration
            }
            None => false,
        };
        if finished {
            self.fade = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_fully_idle() {
        let blend = AnimationBlend::default();
        assert_eq!(blend.active(), AnimationState::Idle);
        assert_eq!(blend.weight(AnimationState::Idle), 1.0);
        assert_eq!(blend.weight(AnimationState::Running), 0.0);
    }

    #[test]
    fn test_cross_fade_completes_after_duration() {
        let mut blend = AnimationBlend::default();
        assert!(blend.cross_fade_to(AnimationState::Running, 0.2));
        blend.advance(0.1);
        assert!((blend.weight(AnimationState::Running) - 0.5).abs() < 1e-5);
        assert!((blend.weight(AnimationState::Idle) - 0.5).abs() < 1e-5);
        blend.advance(0.1);
        assert!(!blend.is_fading());
        assert_eq!(blend.weight(AnimationState::Running), 1.0);
    }

    #[test]
    fn test_interrupted_fade_keeps_weights_continuous() {
        let mut blend = AnimationBlend::default();
        blend.cross_fade_to(AnimationState::Running, 0.2);
        blend.advance(0.05);
        let idle_before = blend.weight(AnimationState::Idle);
        let running_before = blend.weight(AnimationState::Running);

        assert!(blend.cross_fade_to(AnimationState::Idle, 0.2));
        assert!((blend.weight(AnimationState::Idle) - idle_before).abs() < 1e-5);
        assert!((blend.weight(AnimationState::Running) - running_before).abs() < 1e-5);

        blend.advance(0.1);
        assert!(blend.weight(AnimationState::Idle) > idle_before);
        blend.advance(0.1);
        assert!(!blend.is_fading());
        assert_eq!(blend.weight(AnimationState::Idle), 1.0);
    }

    #[test]
    fn test_incoming_clip_plays_from_first_step() {
        let mut blend = AnimationBlend::default();
        blend.cross_fade_to(AnimationState::Running, 0.2);
        blend.advance(0.05);
        assert!((blend.clip_time(AnimationState::Running) - 0.05).abs() < 1e-6);
        assert!((blend.clip_time(AnimationState::Idle) - 0.05).abs() < 1e-6);
    }

    #[test]
    fn test_cross_fade_to_active_does_not_restart() {
        let mut blend = AnimationBlend::default();
        blend.cross_fade_to(AnimationState::Running, 0.2);
        blend.advance(0.5);
        let played = blend.clip_time(AnimationState::Running);
        assert!(played > 0.0);

        assert!(!blend.cross_fade_to(AnimationState::Running, 0.2));
        assert_eq!(blend.clip_time(AnimationState::Running), played);
    }

    #[test]
    fn test_silent_clip_restarts_from_zero() {
        let mut blend = AnimationBlend::default();
        blend.cross_fade_to(AnimationState::Running, 0.2);
        blend.advance(1.0);
        blend.cross_fade_to(AnimationState::Idle, 0.2);
        blend.advance(1.0);
        assert!(blend.clip_time(AnimationState::Running) > 0.0);

        blend.cross_fade_to(AnimationState::Running, 0.2);
        assert_eq!(blend.clip_time(AnimationState::Running), 0.0);
    }

    #[test]
    fn test_time_scale_speeds_playback() {
        let mut blend = AnimationBlend::default();
        blend.set_time_scale(AnimationState::Idle, 1.5);
        blend.advance(2.0);
        assert!((blend.clip_time(AnimationState::Idle) - 3.0).abs() < 1e-5);
    }
}
