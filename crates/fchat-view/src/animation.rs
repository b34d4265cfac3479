#![forbid(unsafe_code)]

//! Timed interpolation for smooth scrolling.
//!
//! [`ScrollAnimation`] moves a value from `from` to `to` over a fixed
//! duration, shaped by an easing curve. It is advanced explicitly with
//! [`ScrollAnimation::tick`] from the UI loop's frame timer, which keeps it
//! deterministic under test.
//!
//! # Invariants
//!
//! 1. `value()` equals `from` before the first tick and `to` once complete.
//! 2. Elapsed time never exceeds the duration.
//! 3. A zero duration is clamped to 1ns (completes on the first tick).

use std::time::Duration;

/// Easing curve: maps linear progress `t ∈ [0, 1]` to eased progress.
pub type EasingFn = fn(f64) -> f64;

/// Default duration of an animated scroll.
pub const DEFAULT_SCROLL_DURATION: Duration = Duration::from_millis(150);

/// Identity easing.
#[must_use]
pub fn linear(t: f64) -> f64 {
    t.clamp(0.0, 1.0)
}

/// Fast start, gentle stop.
#[must_use]
pub fn ease_out_cubic(t: f64) -> f64 {
    let inv = 1.0 - t.clamp(0.0, 1.0);
    1.0 - inv * inv * inv
}

/// A single value transition.
#[derive(Debug, Clone, Copy)]
pub struct ScrollAnimation {
    from: f64,
    to: f64,
    elapsed: Duration,
    duration: Duration,
    easing: EasingFn,
}

impl ScrollAnimation {
    /// Animate from `from` to `to` over `duration` with ease-out cubic.
    #[must_use]
    pub fn new(from: f64, to: f64, duration: Duration) -> Self {
        Self {
            from,
            to,
            elapsed: Duration::ZERO,
            duration: if duration.is_zero() {
                Duration::from_nanos(1)
            } else {
                duration
            },
            easing: ease_out_cubic,
        }
    }

    /// Replace the easing curve (builder pattern).
    #[must_use]
    pub fn easing(mut self, easing: EasingFn) -> Self {
        self.easing = easing;
        self
    }

    /// Advance by `dt`.
    pub fn tick(&mut self, dt: Duration) {
        self.elapsed = self.elapsed.saturating_add(dt).min(self.duration);
    }

    /// Linear progress in `[0, 1]`.
    #[must_use]
    pub fn progress(&self) -> f64 {
        (self.elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
    }

    /// Interpolated value at the current progress.
    #[must_use]
    pub fn value(&self) -> f64 {
        if self.is_complete() {
            return self.to;
        }
        self.from + (self.to - self.from) * (self.easing)(self.progress())
    }

    /// Whether the full duration has elapsed.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Start value.
    #[must_use]
    pub fn from(&self) -> f64 {
        self.from
    }

    /// End value.
    #[must_use]
    pub fn target(&self) -> f64 {
        self.to
    }

    /// Move both endpoints by `delta`, keeping progress.
    ///
    /// Used when the coordinate space itself moves under a running animation
    /// (new messages shifting the scroll range).
    pub fn shift(&mut self, delta: f64) {
        self.from += delta;
        self.to += delta;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS_50: Duration = Duration::from_millis(50);

    #[test]
    fn easing_endpoints() {
        for easing in [linear as EasingFn, ease_out_cubic] {
            assert_eq!(easing(0.0), 0.0);
            assert_eq!(easing(1.0), 1.0);
            assert_eq!(easing(-3.0), 0.0);
            assert_eq!(easing(7.0), 1.0);
        }
    }

    #[test]
    fn ease_out_cubic_is_monotonic_and_front_loaded() {
        let mut prev = 0.0;
        for i in 0..=100 {
            let v = ease_out_cubic(f64::from(i) / 100.0);
            assert!(v >= prev, "not monotonic at step {i}");
            prev = v;
        }
        assert!(ease_out_cubic(0.5) > 0.5);
    }

    #[test]
    fn animation_reaches_target() {
        let mut anim = ScrollAnimation::new(10.0, 20.0, DEFAULT_SCROLL_DURATION);
        assert_eq!(anim.value(), 10.0);
        anim.tick(MS_50);
        let mid = anim.value();
        assert!(mid > 10.0 && mid < 20.0);
        assert!(!anim.is_complete());
        anim.tick(Duration::from_secs(1));
        assert!(anim.is_complete());
        assert_eq!(anim.value(), 20.0);
        assert_eq!(anim.progress(), 1.0);
    }

    #[test]
    fn zero_duration_completes_on_first_tick() {
        let mut anim = ScrollAnimation::new(0.0, 5.0, Duration::ZERO);
        assert!(!anim.is_complete());
        anim.tick(Duration::from_nanos(1));
        assert!(anim.is_complete());
        assert_eq!(anim.value(), 5.0);
    }

    #[test]
    fn linear_easing_halfway() {
        let mut anim = ScrollAnimation::new(0.0, 10.0, Duration::from_millis(100)).easing(linear);
        anim.tick(MS_50);
        assert!((anim.value() - 5.0).abs() < 1e-9);
    }

    #[test]
    fn shift_moves_both_endpoints() {
        let mut anim = ScrollAnimation::new(0.0, 10.0, Duration::from_millis(100)).easing(linear);
        anim.tick(MS_50);
        anim.shift(3.0);
        assert_eq!(anim.from(), 3.0);
        assert_eq!(anim.target(), 13.0);
        assert!((anim.value() - 8.0).abs() < 1e-9);
    }
}
