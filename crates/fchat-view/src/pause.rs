#![forbid(unsafe_code)]

//! Scroll pausing.
//!
//! While the user hovers, selects, or holds a modifier over a busy chat, the
//! view must stop moving under them. [`PauseController`] tracks *why* the
//! view is paused (a small closed set of [`PauseReason`]s, each with an
//! optional expiry) and buffers the bound changes that arrive meanwhile as
//! [`PendingOffsets`]. When the last reason goes away the buffered offsets
//! are handed back to the caller exactly once.
//!
//! Time is passed in explicitly (`now`), so the controller has no timer of
//! its own: the UI loop asks [`PauseController::next_deadline`] when to wake
//! up and calls [`PauseController::poll`] at that point.
//!
//! # Invariants
//!
//! 1. A finite expiry is only replaced by a strictly later one.
//! 2. An indefinite pause stays indefinite until `unpause`.
//! 3. Pending offsets are returned once per paused → unpaused transition and
//!    are zero afterwards.
//!
//! # Failure Modes
//!
//! - `Instant + Duration` overflow: the pause becomes indefinite.
//! - Unpausing a reason that is not active: no-op, returns `None`.

use std::time::Duration;

use web_time::Instant;

/// Why scrolling is paused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PauseReason {
    /// Pointer hovering over the message area.
    Mouse,
    /// Brief hold after a double click so the clicked word stays put.
    DoubleClick,
    /// A configured keyboard modifier is held.
    KeyboardModifier,
    /// A text selection drag is in progress.
    Selecting,
}

impl PauseReason {
    /// All reasons, in slot order.
    pub const ALL: [Self; 4] = [
        Self::Mouse,
        Self::DoubleClick,
        Self::KeyboardModifier,
        Self::Selecting,
    ];

    const COUNT: usize = Self::ALL.len();

    const fn slot(self) -> usize {
        match self {
            Self::Mouse => 0,
            Self::DoubleClick => 1,
            Self::KeyboardModifier => 2,
            Self::Selecting => 3,
        }
    }

    /// Stable lowercase name for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mouse => "mouse",
            Self::DoubleClick => "double_click",
            Self::KeyboardModifier => "keyboard_modifier",
            Self::Selecting => "selecting",
        }
    }
}

/// When a pause reason lapses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseExpiry {
    /// Lapses once `now >= instant`.
    At(Instant),
    /// Lasts until explicitly unpaused.
    Never,
}

/// Bound and selection changes buffered while paused.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PendingOffsets {
    /// Added to the tracker's minimum on resume (evictions).
    pub minimum: f64,
    /// Added to the tracker's maximum on resume (appends and backfill).
    pub maximum: f64,
    /// Added to selection message indices on resume.
    pub selection: isize,
    /// Added to the scroll position on resume (backfill compensation).
    pub scroll: f64,
}

impl PendingOffsets {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.minimum == 0.0 && self.maximum == 0.0 && self.selection == 0 && self.scroll == 0.0
    }
}

/// Per-view pause state.
#[derive(Debug, Clone, Default)]
pub struct PauseController {
    reasons: [Option<PauseExpiry>; PauseReason::COUNT],
    pending: PendingOffsets,
}

impl PauseController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pause for `reason`.
    ///
    /// `None` pauses until [`unpause`](Self::unpause). A finite duration
    /// inserts the reason or extends its expiry to `now + duration` when
    /// that is later than what is already recorded.
    pub fn pause(&mut self, reason: PauseReason, duration: Option<Duration>, now: Instant) {
        let requested = match duration {
            None => PauseExpiry::Never,
            Some(duration) => now
                .checked_add(duration)
                .map_or(PauseExpiry::Never, PauseExpiry::At),
        };
        let slot = &mut self.reasons[reason.slot()];
        let next = match (*slot, requested) {
            (None, requested) => requested,
            (Some(PauseExpiry::Never), _) => PauseExpiry::Never,
            (Some(PauseExpiry::At(_)), PauseExpiry::Never) => PauseExpiry::Never,
            (Some(PauseExpiry::At(current)), PauseExpiry::At(new)) => {
                PauseExpiry::At(current.max(new))
            }
        };
        if *slot != Some(next) {
            tracing::trace!(
                target: "fchat.pause",
                reason = reason.as_str(),
                indefinite = next == PauseExpiry::Never,
                "pause reason set"
            );
        }
        *slot = Some(next);
    }

    /// Drop `reason`. Returns the buffered offsets when this was the last
    /// active reason.
    pub fn unpause(&mut self, reason: PauseReason) -> Option<PendingOffsets> {
        if self.reasons[reason.slot()].take().is_none() {
            return None;
        }
        tracing::trace!(target: "fchat.pause", reason = reason.as_str(), "pause reason cleared");
        self.resume_if_idle()
    }

    /// Drop every finite reason whose expiry is at or before `now`.
    /// Returns the buffered offsets when that leaves no reason active.
    pub fn poll(&mut self, now: Instant) -> Option<PendingOffsets> {
        let mut expired = false;
        for (slot, reason) in self.reasons.iter_mut().zip(PauseReason::ALL) {
            if let Some(PauseExpiry::At(at)) = *slot
                && at <= now
            {
                *slot = None;
                expired = true;
                tracing::trace!(target: "fchat.pause", reason = reason.as_str(), "pause expired");
            }
        }
        if expired { self.resume_if_idle() } else { None }
    }

    /// Soonest finite expiry; when the caller should next `poll`.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.reasons
            .iter()
            .filter_map(|slot| match slot {
                Some(PauseExpiry::At(at)) => Some(*at),
                _ => None,
            })
            .min()
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.reasons.iter().any(Option::is_some)
    }

    #[must_use]
    pub fn is_paused_by(&self, reason: PauseReason) -> bool {
        self.reasons[reason.slot()].is_some()
    }

    #[must_use]
    pub fn expiry(&self, reason: PauseReason) -> Option<PauseExpiry> {
        self.reasons[reason.slot()]
    }

    /// Active reasons in slot order.
    pub fn active_reasons(&self) -> impl Iterator<Item = PauseReason> + '_ {
        PauseReason::ALL
            .into_iter()
            .filter(|reason| self.is_paused_by(*reason))
    }

    // ------------------------------------------------------------------
    // Buffered offsets
    // ------------------------------------------------------------------

    #[must_use]
    pub fn pending(&self) -> PendingOffsets {
        self.pending
    }

    pub fn defer_minimum(&mut self, delta: f64) {
        self.pending.minimum += delta;
    }

    pub fn defer_maximum(&mut self, delta: f64) {
        self.pending.maximum += delta;
    }

    pub fn defer_selection(&mut self, delta: isize) {
        self.pending.selection += delta;
    }

    pub fn defer_scroll(&mut self, delta: f64) {
        self.pending.scroll += delta;
    }

    /// Forget buffered offsets without resuming (the content was cleared).
    pub fn discard_pending(&mut self) {
        self.pending = PendingOffsets::default();
    }

    fn resume_if_idle(&mut self) -> Option<PendingOffsets> {
        if self.is_paused() {
            return None;
        }
        let pending = std::mem::take(&mut self.pending);
        tracing::debug!(
            target: "fchat.pause",
            pending_min = pending.minimum,
            pending_max = pending.maximum,
            pending_selection = pending.selection,
            "all pause reasons cleared"
        );
        Some(pending)
    }
}
