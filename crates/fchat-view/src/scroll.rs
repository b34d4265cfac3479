#![forbid(unsafe_code)]

//! Virtual scroll position over a message log.
//!
//! [`ScrollTracker`] measures everything in message-index units: `minimum`
//! and `maximum` bound the absolute positions of the live messages,
//! `page_size` is how many messages fit on screen, and the scroll value is
//! the (fractional) index of the topmost visible message. Eviction raises
//! `minimum`, appends raise `maximum`, and [`ScrollTracker::reset_bounds`]
//! periodically slides the whole frame back so `minimum` returns to zero.
//!
//! Two values are tracked. `desired_value` is where the user (or the
//! follow-bottom logic) wants to be; `current_value` is what is drawn. They
//! differ only while an animation runs.
//!
//! # Invariants
//!
//! 1. `desired_value` is always `max(minimum, min(bottom, v))` of whatever was
//!    requested, where `bottom = maximum - page_size`.
//! 2. `minimum <= current_value` at all times; when idle
//!    `current_value == desired_value`.
//! 3. `reset_bounds` never changes `relative_current_value`.
//! 4. `bottom < minimum` (fewer messages than fit on a page) resolves to
//!    `minimum` in the clamp and counts as "at bottom".
//!
//! # Failure Modes
//!
//! - `reset_bounds` requested mid-animation is deferred until the animation
//!   completes; the call returns `false`.
//! - Non-finite inputs are ignored by the clamp's `max`/`min` ordering and
//!   leave the previous bounds in effect.

use std::time::Duration;

use crate::animation::{DEFAULT_SCROLL_DURATION, ScrollAnimation, ease_out_cubic};

/// Tolerance for scroll value comparisons.
pub const VALUE_EPSILON: f64 = 0.0001;

/// Default messages per wheel notch.
pub const DEFAULT_SMALL_CHANGE: f64 = 5.0;

/// Tracker tuning.
///
/// # Defaults
///
/// | Field | Value |
/// |-------|-------|
/// | `smooth_scrolling` | `true` |
/// | `animation_duration` | 150ms |
/// | `small_change` | 5.0 |
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackerConfig {
    /// Animate scroll requests that ask for it.
    pub smooth_scrolling: bool,
    /// Duration of one animated scroll.
    pub animation_duration: Duration,
    /// Messages moved per wheel notch.
    pub small_change: f64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            smooth_scrolling: true,
            animation_duration: DEFAULT_SCROLL_DURATION,
            small_change: DEFAULT_SMALL_CHANGE,
        }
    }
}

/// Animation phase of the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollPhase {
    /// `current_value == desired_value`.
    Idle,
    /// `current_value` is moving toward `desired_value`.
    Animating,
}

/// Scroll position state for one chat view.
#[derive(Debug, Clone)]
pub struct ScrollTracker {
    config: TrackerConfig,
    minimum: f64,
    maximum: f64,
    page_size: f64,
    desired_value: f64,
    current_value: f64,
    animation: Option<ScrollAnimation>,
    reset_pending: bool,
}

impl Default for ScrollTracker {
    fn default() -> Self {
        Self::new(TrackerConfig::default())
    }
}

impl ScrollTracker {
    /// Empty tracker: all bounds and values at zero.
    #[must_use]
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            config,
            minimum: 0.0,
            maximum: 0.0,
            page_size: 0.0,
            desired_value: 0.0,
            current_value: 0.0,
            animation: None,
            reset_pending: false,
        }
    }

    // ------------------------------------------------------------------
    // Getters
    // ------------------------------------------------------------------

    #[must_use]
    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    #[must_use]
    pub fn minimum(&self) -> f64 {
        self.minimum
    }

    #[must_use]
    pub fn maximum(&self) -> f64 {
        self.maximum
    }

    #[must_use]
    pub fn page_size(&self) -> f64 {
        self.page_size
    }

    #[must_use]
    pub fn small_change(&self) -> f64 {
        self.config.small_change
    }

    /// Where the view is heading.
    #[must_use]
    pub fn desired_value(&self) -> f64 {
        self.desired_value
    }

    /// What is drawn this frame.
    #[must_use]
    pub fn current_value(&self) -> f64 {
        self.current_value
    }

    /// `current_value - minimum`: index into the live snapshot.
    #[must_use]
    pub fn relative_current_value(&self) -> f64 {
        self.current_value - self.minimum
    }

    /// Largest scroll value that still fills the page: `maximum - page_size`.
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.maximum - self.page_size
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    #[must_use]
    pub fn phase(&self) -> ScrollPhase {
        if self.is_animating() {
            ScrollPhase::Animating
        } else {
            ScrollPhase::Idle
        }
    }

    /// Whether the desired value sits at the bottom of the content.
    #[must_use]
    pub fn is_at_bottom(&self) -> bool {
        self.bottom() - self.desired_value <= VALUE_EPSILON
    }

    /// Whether a `reset_bounds` is waiting for the animation to finish.
    #[must_use]
    pub fn reset_pending(&self) -> bool {
        self.reset_pending
    }

    // ------------------------------------------------------------------
    // Setters
    // ------------------------------------------------------------------

    /// Resize the page. When idle the position is re-clamped to the new
    /// bottom.
    pub fn set_page_size(&mut self, page_size: f64) {
        self.page_size = page_size.max(0.0);
        if self.animation.is_none() {
            self.desired_value = self.clamp(self.desired_value);
            self.current_value = self.desired_value;
        }
    }

    pub fn set_small_change(&mut self, small_change: f64) {
        self.config.small_change = small_change;
    }

    /// Disabling smooth scrolling finishes any running animation at once.
    pub fn set_smooth_scrolling(&mut self, enabled: bool) {
        self.config.smooth_scrolling = enabled;
        if !enabled && self.animation.is_some() {
            self.finish_animation();
        }
    }

    pub fn set_animation_duration(&mut self, duration: Duration) {
        self.config.animation_duration = duration;
    }

    // ------------------------------------------------------------------
    // Bounds
    // ------------------------------------------------------------------

    /// Set the lowest live position.
    ///
    /// When the desired value falls below the new minimum (the messages being
    /// looked at were evicted) the view is pulled up to the new minimum.
    pub fn set_minimum(&mut self, minimum: f64) {
        self.minimum = minimum;
        if self.desired_value < self.minimum {
            tracing::trace!(
                target: "fchat.scroll",
                minimum,
                desired = self.desired_value,
                "desired value pulled up to minimum"
            );
            self.set_desired_value(self.minimum, false);
        }
        if self.current_value < self.minimum {
            self.current_value = self.minimum;
        }
    }

    pub fn offset_minimum(&mut self, delta: f64) {
        self.set_minimum(self.minimum + delta);
    }

    /// Set the position one past the newest message.
    ///
    /// Growth never moves the view; following the bottom is the caller's
    /// decision. Shrinking (a clear) only clamps values that would otherwise
    /// point past the end.
    pub fn set_maximum(&mut self, maximum: f64) {
        self.maximum = maximum;
        let ceiling = self.maximum.max(self.minimum);
        if self.desired_value > ceiling {
            self.desired_value = ceiling;
        }
        if self.current_value > ceiling {
            self.current_value = ceiling;
        }
    }

    pub fn offset_maximum(&mut self, delta: f64) {
        self.set_maximum(self.maximum + delta);
    }

    /// Slide the frame back so `minimum` is zero again.
    ///
    /// Returns `true` when the frame was renormalized now. Mid-animation the
    /// reset is remembered and applied when the animation completes.
    pub fn reset_bounds(&mut self) -> bool {
        if self.minimum <= 0.0 {
            return false;
        }
        if self.is_animating() {
            self.reset_pending = true;
            tracing::trace!(target: "fchat.scroll", minimum = self.minimum, "reset deferred");
            return false;
        }
        self.apply_reset();
        true
    }

    /// Zero everything and stop any animation.
    pub fn clear(&mut self) {
        self.minimum = 0.0;
        self.maximum = 0.0;
        self.desired_value = 0.0;
        self.current_value = 0.0;
        self.animation = None;
        self.reset_pending = false;
    }

    // ------------------------------------------------------------------
    // Movement
    // ------------------------------------------------------------------

    /// Request a new scroll position.
    ///
    /// The value is clamped first. If it differs from the current desired
    /// value and `animated` is requested with smooth scrolling on, an
    /// animation starts from the value on screen; otherwise the view jumps.
    pub fn set_desired_value(&mut self, value: f64, animated: bool) {
        let value = self.clamp(value);
        if (self.desired_value - value).abs() <= VALUE_EPSILON {
            self.desired_value = value;
            if self.animation.is_none() {
                self.current_value = value;
            }
            return;
        }

        self.desired_value = value;
        if animated && self.config.smooth_scrolling {
            self.animation = Some(
                ScrollAnimation::new(self.current_value, value, self.config.animation_duration)
                    .easing(ease_out_cubic),
            );
        } else {
            self.finish_animation();
        }
        tracing::trace!(
            target: "fchat.scroll",
            desired = value,
            animated = self.animation.is_some(),
            "desired value changed"
        );
    }

    pub fn scroll_to_bottom(&mut self, animated: bool) {
        self.set_desired_value(self.bottom(), animated);
    }

    pub fn scroll_to_top(&mut self, animated: bool) {
        self.set_desired_value(self.minimum, animated);
    }

    /// Shift the view by `delta` without animating.
    ///
    /// A running animation keeps its progress; both its endpoints move with
    /// the frame so content does not jump.
    pub fn offset(&mut self, delta: f64) {
        match self.animation.as_mut() {
            Some(animation) => {
                animation.shift(delta);
                self.desired_value = self.clamp(self.desired_value + delta);
                self.current_value = self.clamp_current(self.current_value + delta);
            }
            None => self.set_desired_value(self.desired_value + delta, false),
        }
    }

    /// Move by `lines` wheel notches (`small_change` messages each).
    /// Negative values scroll toward older messages.
    pub fn scroll_lines(&mut self, lines: f64, animated: bool) {
        let target = self.desired_value + lines * self.config.small_change;
        self.set_desired_value(target, animated);
    }

    pub fn page_up(&mut self, animated: bool) {
        self.set_desired_value(self.desired_value - self.page_size, animated);
    }

    pub fn page_down(&mut self, animated: bool) {
        self.set_desired_value(self.desired_value + self.page_size, animated);
    }

    /// Advance the animation by `dt`. Returns whether it is still running.
    pub fn tick(&mut self, dt: Duration) -> bool {
        let Some(animation) = self.animation.as_mut() else {
            return false;
        };
        animation.tick(dt);
        if animation.is_complete() {
            self.finish_animation();
            return false;
        }
        let value = animation.value();
        self.current_value = self.clamp_current(value);
        true
    }

    // ------------------------------------------------------------------
    // Scrollbar geometry
    // ------------------------------------------------------------------

    /// Fraction of the content visible on one page, in `[0, 1]`.
    #[must_use]
    pub fn visible_fraction(&self) -> f64 {
        let span = self.maximum - self.minimum;
        if span <= VALUE_EPSILON {
            return 1.0;
        }
        (self.page_size / span).clamp(0.0, 1.0)
    }

    /// Top of the visible page as a fraction of the content, in `[0, 1]`.
    #[must_use]
    pub fn position_fraction(&self) -> f64 {
        let span = self.maximum - self.minimum;
        if span <= VALUE_EPSILON {
            return 0.0;
        }
        (self.relative_current_value() / span).clamp(0.0, 1.0)
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn clamp(&self, value: f64) -> f64 {
        self.minimum.max(self.bottom().min(value))
    }

    // Animation frames may overshoot a bottom that moved; only the lower
    // bound is enforced on the drawn value.
    fn clamp_current(&self, value: f64) -> f64 {
        self.minimum.max(value.min(self.maximum.max(self.minimum)))
    }

    fn finish_animation(&mut self) {
        self.animation = None;
        self.desired_value = self.clamp(self.desired_value);
        self.current_value = self.desired_value;
        if self.reset_pending {
            self.apply_reset();
        }
    }

    fn apply_reset(&mut self) {
        let shift = self.minimum;
        self.minimum = 0.0;
        self.maximum -= shift;
        self.desired_value -= shift;
        self.current_value -= shift;
        self.reset_pending = false;
        tracing::debug!(
            target: "fchat.scroll",
            shift,
            maximum = self.maximum,
            "bounds reset"
        );
    }
}
