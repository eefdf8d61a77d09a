//! Frame stepping and lifetime tracking for skill effects.
//!
//! Both types are driven by explicit time deltas so they can be ticked from
//! any clock: a game loop, a test, or an offline renderer.

use std::time::Duration;

/// Seconds each frame stays on screen by default.
pub const DEFAULT_FRAME_SECONDS: f32 = 0.05;
/// Seconds a skill effect lives by default.
pub const DEFAULT_LIFETIME_SECONDS: f32 = 3.0;

/// Steps through `frame_count` frames at a fixed rate.
///
/// Playback starts at frame 0. After the last frame it wraps to
/// `loop_start` rather than 0, so a sheet whose first frame is an idle or
/// wind-up pose plays it only once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameAnimation {
    frame_count: usize,
    current: usize,
    loop_start: usize,
    frame_duration: Duration,
    elapsed: Duration,
}

impl FrameAnimation {
    /// Loop back to frame 1 (or 0 for single-frame sheets).
    #[must_use]
    pub fn new(frame_count: usize, frame_duration: Duration) -> Self {
        let frame_count = frame_count.max(1);
        Self {
            frame_count,
            current: 0,
            loop_start: 1.min(frame_count - 1),
            frame_duration,
            elapsed: Duration::ZERO,
        }
    }

    /// Override the frame playback wraps to. Clamped to the last frame.
    #[must_use]
    pub fn with_loop_start(mut self, loop_start: usize) -> Self {
        self.loop_start = loop_start.min(self.frame_count - 1);
        self
    }

    #[must_use]
    pub fn current(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    #[must_use]
    pub fn loop_start(&self) -> usize {
        self.loop_start
    }

    /// Advance by `delta`. Returns the new frame if at least one frame
    /// boundary was crossed.
    pub fn tick(&mut self, delta: Duration) -> Option<usize> {
        if self.frame_duration.is_zero() {
            return None;
        }

        self.elapsed += delta;
        let frame_nanos = self.frame_duration.as_nanos();
        let steps = self.elapsed.as_nanos() / frame_nanos;
        if steps == 0 {
            return None;
        }
        // Keep the remainder so long-running effects don't drift.
        let remainder = self.elapsed.as_nanos() % frame_nanos;
        self.elapsed = Duration::from_nanos(u64::try_from(remainder).unwrap_or(u64::MAX));

        self.advance(steps);
        Some(self.current)
    }

    fn advance(&mut self, mut steps: u128) {
        while steps > 0 && self.current < self.loop_start {
            self.step();
            steps -= 1;
        }

        let cycle = (self.frame_count - self.loop_start) as u128;
        for _ in 0..steps % cycle {
            self.step();
        }
    }

    fn step(&mut self) {
        self.current += 1;
        if self.current >= self.frame_count {
            self.current = self.loop_start;
        }
    }
}

/// A one-shot countdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lifetime {
    duration: Duration,
    elapsed: Duration,
    reported: bool,
}

impl Lifetime {
    #[must_use]
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            elapsed: Duration::ZERO,
            reported: false,
        }
    }

    /// Advance by `delta`. True only on the first tick at or past the
    /// duration, which for a zero duration is the first tick.
    pub fn tick(&mut self, delta: Duration) -> bool {
        if self.reported {
            return false;
        }
        self.elapsed = self.elapsed.saturating_add(delta).min(self.duration);
        self.reported = self.is_finished();
        self.reported
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    #[must_use]
    pub fn remaining(&self) -> Duration {
        self.duration - self.elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: Duration = Duration::from_millis(50);

    #[test]
    fn advances_one_frame_per_duration() {
        let mut animation = FrameAnimation::new(25, FRAME);
        assert_eq!(animation.tick(Duration::from_millis(30)), None);
        assert_eq!(animation.tick(Duration::from_millis(30)), Some(1));
        assert_eq!(animation.current(), 1);
        assert_eq!(animation.tick(Duration::from_millis(40)), Some(2));
    }

    #[test]
    fn wraps_past_the_idle_frame() {
        let mut animation = FrameAnimation::new(25, FRAME);
        for _ in 0..24 {
            animation.tick(FRAME);
        }
        assert_eq!(animation.current(), 24);
        assert_eq!(animation.tick(FRAME), Some(1));

        // Frame 0 never comes back.
        for _ in 0..200 {
            assert_ne!(animation.tick(FRAME), Some(0));
        }
    }

    #[test]
    fn large_deltas_skip_whole_cycles() {
        let mut stepped = FrameAnimation::new(25, FRAME);
        for _ in 0..1003 {
            stepped.tick(FRAME);
        }

        let mut jumped = FrameAnimation::new(25, FRAME);
        jumped.tick(FRAME * 1003);
        assert_eq!(jumped.current(), stepped.current());
    }

    #[test]
    fn custom_loop_start_and_degenerate_sheets() {
        let mut animation = FrameAnimation::new(4, FRAME).with_loop_start(0);
        animation.tick(FRAME * 4);
        assert_eq!(animation.current(), 0);

        let mut single = FrameAnimation::new(1, FRAME);
        assert_eq!(single.loop_start(), 0);
        assert_eq!(single.tick(FRAME * 3), Some(0));

        let mut frozen = FrameAnimation::new(25, Duration::ZERO);
        assert_eq!(frozen.tick(FRAME), None);
    }

    #[test]
    fn lifetime_fires_once() {
        let mut lifetime = Lifetime::new(Duration::from_secs(3));
        assert!(!lifetime.tick(Duration::from_secs(2)));
        assert_eq!(lifetime.remaining(), Duration::from_secs(1));
        assert!(lifetime.tick(Duration::from_secs(2)));
        assert!(lifetime.is_finished());
        assert!(!lifetime.tick(Duration::from_secs(1)));
        assert_eq!(lifetime.remaining(), Duration::ZERO);
    }

    #[test]
    fn zero_lifetime_fires_on_first_tick() {
        let mut lifetime = Lifetime::new(Duration::ZERO);
        assert!(lifetime.is_finished());
        assert!(lifetime.tick(Duration::from_millis(16)));
        for _ in 0..10 {
            assert!(!lifetime.tick(Duration::from_millis(16)));
        }

        // Even a zero delta reports it.
        assert!(Lifetime::new(Duration::ZERO).tick(Duration::ZERO));
    }
}
