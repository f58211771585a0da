//! Tick-driven animation controllers.
//!
//! Both controllers are passive: they hold timing state and report progress
//! when `update()` is called. The owner decides when to call `update()` (its
//! `tick()` entry point) and how to apply the reported values.

use std::time::{Duration, Instant};

use super::easing::{ease, lerp_eased, Easing};

/// Progress report from a [`ScrollAnimation`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum AnimationState {
    /// No animation in progress.
    #[default]
    Idle,
    /// Animation is running; the eased intermediate value.
    Running(f32),
    /// Animation just completed; the final value.
    Finished(f32),
}

impl AnimationState {
    pub fn is_running(&self) -> bool {
        matches!(self, AnimationState::Running(_))
    }
}

/// Animates a scroll fraction toward a target value.
///
/// Defaults match the scroll-to-item behavior: half a second with a septic
/// ease-out, so the view arrives almost immediately and settles gently.
#[derive(Debug, Clone)]
pub struct ScrollAnimation {
    easing: Easing,
    duration: Duration,
    from: f32,
    to: f32,
    start_time: Option<Instant>,
    running: bool,
}

impl ScrollAnimation {
    pub const DEFAULT_DURATION: Duration = Duration::from_millis(500);

    pub fn new() -> Self {
        Self {
            easing: Easing::EaseOutSeptic,
            duration: Self::DEFAULT_DURATION,
            from: 0.0,
            to: 0.0,
            start_time: None,
            running: false,
        }
    }

    pub fn with_duration(duration: Duration) -> Self {
        Self {
            duration,
            ..Self::new()
        }
    }

    #[inline]
    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn set_duration(&mut self, duration: Duration) {
        self.duration = duration;
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Target value of the current (or last) animation.
    #[inline]
    pub fn target(&self) -> f32 {
        self.to
    }

    /// Start animating from `from` to `to`.
    ///
    /// Returns `false` if the values are already equal (nothing to animate).
    pub fn start(&mut self, from: f32, to: f32) -> bool {
        if from == to {
            return false;
        }
        self.from = from;
        self.to = to;
        self.start_time = Some(Instant::now());
        self.running = true;
        true
    }

    /// Stop the animation immediately, leaving the value wherever it was.
    pub fn stop(&mut self) {
        self.running = false;
        self.start_time = None;
    }

    /// Advance the animation and report its state.
    pub fn update(&mut self) -> AnimationState {
        if !self.running {
            return AnimationState::Idle;
        }

        let Some(start_time) = self.start_time else {
            return AnimationState::Idle;
        };

        let elapsed = start_time.elapsed();
        let raw_progress = if self.duration.is_zero() {
            1.0
        } else {
            (elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
        };

        if raw_progress >= 1.0 {
            self.running = false;
            self.start_time = None;
            return AnimationState::Finished(self.to);
        }

        AnimationState::Running(lerp_eased(self.easing, self.from, self.to, raw_progress))
    }
}

impl Default for ScrollAnimation {
    fn default() -> Self {
        Self::new()
    }
}

/// Progress report from a [`FadeTransition`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum FadeState {
    /// No fade in progress.
    #[default]
    Idle,
    /// Within the initial delay; nothing visible has changed yet.
    Waiting,
    /// Fade is running; eased progress in `[0, 1]`.
    Running(f32),
    /// Fade just completed.
    Finished,
}

/// A delayed cross-dissolve controller.
///
/// Defaults match the skin's viewport/placeholder swap: a 100 ms hold
/// followed by a 200 ms fade.
#[derive(Debug, Clone)]
pub struct FadeTransition {
    easing: Easing,
    delay: Duration,
    duration: Duration,
    start_time: Option<Instant>,
    running: bool,
}

impl FadeTransition {
    pub const DEFAULT_DELAY: Duration = Duration::from_millis(100);
    pub const DEFAULT_DURATION: Duration = Duration::from_millis(200);

    pub fn new() -> Self {
        Self {
            easing: Easing::EaseInOut,
            delay: Self::DEFAULT_DELAY,
            duration: Self::DEFAULT_DURATION,
            start_time: None,
            running: false,
        }
    }

    pub fn with_timing(delay: Duration, duration: Duration) -> Self {
        Self {
            delay,
            duration,
            ..Self::new()
        }
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Start (or restart) the fade.
    pub fn start(&mut self) {
        self.start_time = Some(Instant::now());
        self.running = true;
    }

    /// Stop the fade immediately.
    pub fn stop(&mut self) {
        self.running = false;
        self.start_time = None;
    }

    /// Advance the fade and report its state.
    pub fn update(&mut self) -> FadeState {
        if !self.running {
            return FadeState::Idle;
        }

        let Some(start_time) = self.start_time else {
            return FadeState::Idle;
        };

        let elapsed = start_time.elapsed();
        if elapsed < self.delay {
            return FadeState::Waiting;
        }

        let active = elapsed - self.delay;
        let raw_progress = if self.duration.is_zero() {
            1.0
        } else {
            (active.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
        };

        if raw_progress >= 1.0 {
            self.running = false;
            self.start_time = None;
            return FadeState::Finished;
        }

        FadeState::Running(ease(self.easing, raw_progress))
    }
}

impl Default for FadeTransition {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scroll_animation_same_value_does_not_start() {
        let mut anim = ScrollAnimation::new();
        assert!(!anim.start(0.5, 0.5));
        assert!(!anim.is_running());
        assert_eq!(anim.update(), AnimationState::Idle);
    }

    #[test]
    fn test_scroll_animation_zero_duration_finishes_immediately() {
        let mut anim = ScrollAnimation::with_duration(Duration::ZERO);
        assert!(anim.start(0.0, 1.0));
        assert_eq!(anim.update(), AnimationState::Finished(1.0));
        assert_eq!(anim.update(), AnimationState::Idle);
    }

    #[test]
    fn test_scroll_animation_running_reports_intermediate() {
        let mut anim = ScrollAnimation::with_duration(Duration::from_secs(60));
        anim.start(0.0, 1.0);
        match anim.update() {
            AnimationState::Running(value) => assert!((0.0..1.0).contains(&value)),
            other => panic!("expected Running, got {:?}", other),
        }
        assert!(anim.is_running());
        assert_eq!(anim.target(), 1.0);
    }

    #[test]
    fn test_scroll_animation_stop() {
        let mut anim = ScrollAnimation::new();
        anim.start(0.0, 1.0);
        anim.stop();
        assert_eq!(anim.update(), AnimationState::Idle);
    }

    #[test]
    fn test_fade_waits_for_delay() {
        let mut fade = FadeTransition::with_timing(Duration::from_secs(60), Duration::ZERO);
        fade.start();
        assert_eq!(fade.update(), FadeState::Waiting);
        assert!(fade.is_running());
    }

    #[test]
    fn test_fade_zero_timing_finishes_immediately() {
        let mut fade = FadeTransition::with_timing(Duration::ZERO, Duration::ZERO);
        fade.start();
        assert_eq!(fade.update(), FadeState::Finished);
        assert_eq!(fade.update(), FadeState::Idle);
    }

    #[test]
    fn test_fade_restart() {
        let mut fade = FadeTransition::with_timing(Duration::ZERO, Duration::ZERO);
        fade.start();
        assert_eq!(fade.update(), FadeState::Finished);
        fade.start();
        assert_eq!(fade.update(), FadeState::Finished);
    }
}
