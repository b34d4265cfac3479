#![forbid(unsafe_code)]

//! One scrollable chat pane.
//!
//! [`ChatView`] ties the message log to its scroll position, pause state,
//! selection, and scrollbar markers. The producer side calls the
//! `message_*` methods; the UI side forwards input, drives [`ChatView::tick`]
//! from its frame timer, lays out [`ChatView::visible_window`], and reacts
//! to [`ViewEvent`]s.
//!
//! # Pausing
//!
//! While any [`PauseReason`] is active the view keeps showing the snapshot
//! it had when the pause began, and bound changes are buffered instead of
//! applied. On resume the buffer is applied in one step, so content under
//! the pointer never shifts while the user is reading or selecting it.
//!
//! # Invariants
//!
//! 1. While unpaused, `scroll.maximum() - scroll.minimum()` equals the log
//!    length.
//! 2. While paused, the same holds for the frozen snapshot.
//! 3. A view at the bottom stays at the bottom across appends, backfill,
//!    resizes, and resume.

use std::time::Duration;

use fchat_log::{BoundedLog, Snapshot};
use web_time::Instant;

use crate::config::ViewConfig;
use crate::highlights::{ScrollbarHighlight, ScrollbarHighlights};
use crate::pause::{PauseController, PauseReason, PendingOffsets};
use crate::scroll::ScrollTracker;
use crate::selection::{Selection, SelectionItem};

/// Notifications for the UI layer, collected until
/// [`ChatView::drain_events`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewEvent {
    /// Content or position changed; lay out and repaint.
    Relayout,
    /// The first pause reason became active.
    Paused,
    /// The last pause reason went away and buffered changes were applied.
    Resumed,
    /// An explicit jump to the newest message.
    ScrolledToBottom,
}

/// What to lay out this frame.
#[derive(Debug, Clone)]
pub struct VisibleWindow<T> {
    /// Messages to draw from.
    pub snapshot: Snapshot<T>,
    /// Index of the topmost (partially) visible message.
    pub first_index: usize,
    /// Fraction of the first message scrolled off the top, in `[0, 1)`.
    pub top_offset: f64,
    /// Messages per page.
    pub page_size: f64,
    /// Whether the view is following the newest message.
    pub at_bottom: bool,
}

impl<T> VisibleWindow<T> {
    /// Messages from the top of the page downward.
    pub fn entries(&self) -> impl Iterator<Item = &T> {
        self.snapshot.iter().skip(self.first_index)
    }
}

/// Scrollback state for one chat pane.
#[derive(Debug, Clone)]
pub struct ChatView<T> {
    config: ViewConfig,
    messages: BoundedLog<T>,
    shown: Snapshot<T>,
    scroll: ScrollTracker,
    pauses: PauseController,
    selection: Selection,
    selecting: bool,
    highlights: ScrollbarHighlights,
    events: Vec<ViewEvent>,
}

impl<T: Clone> Default for ChatView<T> {
    fn default() -> Self {
        Self::new(ViewConfig::default())
    }
}

impl<T: Clone> ChatView<T> {
    #[must_use]
    pub fn new(config: ViewConfig) -> Self {
        Self {
            messages: BoundedLog::with_segment_size(config.message_limit, config.segment_size),
            shown: Snapshot::default(),
            scroll: ScrollTracker::new(config.tracker_config()),
            pauses: PauseController::new(),
            selection: Selection::default(),
            selecting: false,
            highlights: ScrollbarHighlights::with_segment_size(
                config.message_limit,
                config.segment_size,
            ),
            events: Vec::new(),
            config,
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    #[must_use]
    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    /// The live log (not the paused snapshot).
    #[must_use]
    pub fn messages(&self) -> &BoundedLog<T> {
        &self.messages
    }

    #[must_use]
    pub fn scroll(&self) -> &ScrollTracker {
        &self.scroll
    }

    #[must_use]
    pub fn pauses(&self) -> &PauseController {
        &self.pauses
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.pauses.is_paused()
    }

    #[must_use]
    pub fn selection(&self) -> Selection {
        self.selection
    }

    #[must_use]
    pub fn is_selecting(&self) -> bool {
        self.selecting
    }

    /// Whether newer messages exist below the page ("go to bottom" button).
    #[must_use]
    pub fn has_messages_below(&self) -> bool {
        !self.scroll.is_at_bottom()
    }

    /// Soonest pause expiry; schedule a `tick` no later than this.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pauses.next_deadline()
    }

    // ------------------------------------------------------------------
    // Producer side
    // ------------------------------------------------------------------

    /// Append the newest message. Returns the entry evicted to make room.
    pub fn message_appended(&mut self, entry: T, highlight: ScrollbarHighlight) -> Option<T> {
        let was_at_bottom = self.scroll.is_at_bottom();
        let evicted = self.messages.append(entry);
        self.highlights.add(highlight);

        if self.pauses.is_paused() {
            self.pauses.defer_maximum(1.0);
            if evicted.is_some() {
                self.pauses.defer_minimum(1.0);
                self.pauses.defer_selection(-1);
            }
        } else {
            self.scroll.offset_maximum(1.0);
            if evicted.is_some() {
                self.scroll.offset_minimum(1.0);
                self.selection.shift(-1);
            }
            if was_at_bottom {
                self.scroll
                    .scroll_to_bottom(self.config.smooth_scrolling_on_new_messages);
            }
        }

        tracing::trace!(
            target: "fchat.view",
            len = self.messages.len(),
            evicted = evicted.is_some(),
            paused = self.pauses.is_paused(),
            "message appended"
        );
        self.queue_relayout();
        evicted
    }

    /// Backfill older messages at the head, oldest first.
    ///
    /// Only the newest entries that fit in the free space are kept. The
    /// scroll position moves with the content so the page does not jump.
    /// `highlights` pairs with `entries` by position; missing markers are
    /// null. Returns how many entries were kept.
    pub fn messages_added_at_start(
        &mut self,
        entries: &[T],
        highlights: &[ScrollbarHighlight],
    ) -> usize {
        let accepted = self.messages.prepend_bulk(entries).len();
        if accepted == 0 {
            return 0;
        }
        if highlights.len() == entries.len() {
            self.highlights.add_at_start(highlights);
        } else {
            let markers: Vec<_> = highlights
                .iter()
                .copied()
                .chain(std::iter::repeat(ScrollbarHighlight::NONE))
                .take(entries.len())
                .collect();
            self.highlights.add_at_start(&markers);
        }

        let delta = accepted as f64;
        let shift = isize::try_from(accepted).unwrap_or(isize::MAX);
        if self.pauses.is_paused() {
            self.pauses.defer_maximum(delta);
            self.pauses.defer_scroll(delta);
            self.pauses.defer_selection(shift);
        } else {
            let was_at_bottom = self.scroll.is_at_bottom();
            self.scroll.offset_maximum(delta);
            if was_at_bottom {
                self.scroll.scroll_to_bottom(false);
            } else {
                self.scroll.offset(delta);
            }
            self.selection.shift(shift);
        }

        tracing::debug!(
            target: "fchat.view",
            requested = entries.len(),
            accepted,
            "messages added at start"
        );
        self.queue_relayout();
        accepted
    }

    /// Replace the message at `index` if it is still `expected_old`.
    pub fn message_replaced(
        &mut self,
        index: usize,
        expected_old: &T,
        replacement: T,
        highlight: ScrollbarHighlight,
    ) -> bool
    where
        T: PartialEq,
    {
        if !self.messages.replace(index, expected_old, replacement) {
            tracing::debug!(target: "fchat.view", index, "replace skipped: entry moved or evicted");
            return false;
        }
        self.highlights.replace(index, highlight);
        self.queue_relayout();
        true
    }

    /// Drop every message, buffered offsets, and the selection.
    pub fn clear_messages(&mut self) {
        self.messages.clear();
        self.highlights.clear();
        self.scroll.clear();
        self.pauses.discard_pending();
        self.selection = Selection::default();
        self.shown = self.messages.snapshot();
        tracing::debug!(target: "fchat.view", "messages cleared");
        self.queue_relayout();
    }

    // ------------------------------------------------------------------
    // Render side
    // ------------------------------------------------------------------

    /// Messages to draw: the live log while unpaused, the snapshot taken at
    /// pause time otherwise.
    pub fn messages_snapshot(&mut self) -> Snapshot<T> {
        if !self.pauses.is_paused() {
            self.shown = self.messages.snapshot();
        }
        self.shown.clone()
    }

    /// Scrollbar markers, frozen alongside the messages while paused.
    pub fn highlights_snapshot(&mut self) -> Snapshot<ScrollbarHighlight> {
        self.highlights.snapshot()
    }

    /// The slice of messages the current scroll position points at.
    pub fn visible_window(&mut self) -> VisibleWindow<T> {
        let snapshot = self.messages_snapshot();
        let relative = self.scroll.relative_current_value().max(0.0);
        let first_index = (relative.floor() as usize).min(snapshot.len());
        VisibleWindow {
            snapshot,
            first_index,
            top_offset: relative.fract(),
            page_size: self.scroll.page_size(),
            at_bottom: self.scroll.is_at_bottom(),
        }
    }

    /// Report the page size measured by layout.
    ///
    /// Keeps a bottom-following view at the bottom and renormalizes the
    /// scroll frame once the head has been evicted.
    pub fn layout_completed(&mut self, page_size: f64) {
        let was_at_bottom = self.scroll.is_at_bottom();
        self.scroll.set_page_size(page_size);
        if was_at_bottom {
            self.scroll
                .scroll_to_bottom(self.config.smooth_scrolling_on_new_messages);
        }
        self.scroll.reset_bounds();
    }

    /// Advance animation and pause expiry. Returns whether another frame is
    /// needed for a running animation.
    pub fn tick(&mut self, now: Instant, dt: Duration) -> bool {
        let animating = self.scroll.tick(dt);
        if let Some(pending) = self.pauses.poll(now) {
            self.resume(pending);
        }
        if animating {
            self.queue_relayout();
        }
        animating
    }

    /// Take the events raised since the last call.
    pub fn drain_events(&mut self) -> Vec<ViewEvent> {
        std::mem::take(&mut self.events)
    }

    // ------------------------------------------------------------------
    // Input
    // ------------------------------------------------------------------

    /// Pointer moved over the messages.
    pub fn mouse_moved(&mut self, now: Instant) {
        if self.config.pause_on_hover {
            self.pause(PauseReason::Mouse, self.config.hover_pause(), now);
        }
    }

    pub fn mouse_left(&mut self) {
        self.unpause(PauseReason::Mouse);
    }

    pub fn double_clicked(&mut self, now: Instant) {
        if let Some(duration) = self.config.double_click_pause() {
            self.pause(PauseReason::DoubleClick, Some(duration), now);
        }
    }

    /// The configured pause modifier was pressed or released.
    pub fn modifier_changed(&mut self, pressed: bool, now: Instant) {
        if !self.config.pause_on_modifier {
            return;
        }
        if pressed {
            self.pause(PauseReason::KeyboardModifier, None, now);
        } else {
            self.unpause(PauseReason::KeyboardModifier);
        }
    }

    /// A selection drag began at `at`.
    pub fn selection_started(&mut self, at: SelectionItem, now: Instant) {
        self.selecting = true;
        self.selection = Selection::caret(at);
        self.pause(PauseReason::Selecting, None, now);
        self.queue_relayout();
    }

    /// The drag moved to `to`.
    pub fn selection_updated(&mut self, to: SelectionItem) {
        if self.selecting {
            self.selection.end = to;
            self.queue_relayout();
        }
    }

    pub fn selection_finished(&mut self) {
        self.selecting = false;
        self.unpause(PauseReason::Selecting);
    }

    pub fn set_selection(&mut self, selection: Selection) {
        self.selection = selection;
        self.queue_relayout();
    }

    pub fn clear_selection(&mut self) {
        self.set_selection(Selection::default());
    }

    /// Mouse wheel. Positive notches scroll toward older messages.
    pub fn wheel(&mut self, notches: f64) {
        self.scroll.scroll_lines(-notches, true);
        self.queue_relayout();
    }

    pub fn page_up(&mut self) {
        self.scroll.page_up(true);
        self.queue_relayout();
    }

    pub fn page_down(&mut self) {
        self.scroll.page_down(true);
        self.queue_relayout();
    }

    /// Jump to the newest message.
    pub fn scroll_to_bottom(&mut self) {
        self.scroll
            .scroll_to_bottom(self.config.smooth_scrolling_on_new_messages);
        self.events.push(ViewEvent::ScrolledToBottom);
        self.queue_relayout();
    }

    pub fn scroll_to_top(&mut self) {
        self.scroll.scroll_to_top(true);
        self.queue_relayout();
    }

    // ------------------------------------------------------------------
    // Pausing
    // ------------------------------------------------------------------

    /// Pause for `reason`; `None` lasts until [`unpause`](Self::unpause).
    pub fn pause(&mut self, reason: PauseReason, duration: Option<Duration>, now: Instant) {
        let was_paused = self.pauses.is_paused();
        if !was_paused {
            self.shown = self.messages.snapshot();
            self.highlights.pause();
        }
        self.pauses.pause(reason, duration, now);
        if !was_paused {
            tracing::debug!(target: "fchat.view", reason = reason.as_str(), "scrolling paused");
            self.events.push(ViewEvent::Paused);
        }
    }

    pub fn unpause(&mut self, reason: PauseReason) {
        if let Some(pending) = self.pauses.unpause(reason) {
            self.resume(pending);
        }
    }

    fn resume(&mut self, pending: PendingOffsets) {
        let was_at_bottom = self.scroll.is_at_bottom();
        self.scroll.offset_maximum(pending.maximum);
        if was_at_bottom {
            self.scroll.offset_minimum(pending.minimum);
            self.scroll
                .scroll_to_bottom(self.config.smooth_scrolling_on_new_messages);
        } else {
            // Backfill shift first: raising the minimum only pulls the view
            // down if the row being read was itself evicted.
            if pending.scroll != 0.0 {
                self.scroll.offset(pending.scroll);
            }
            self.scroll.offset_minimum(pending.minimum);
        }
        self.selection.shift(pending.selection);
        self.highlights.unpause();
        self.shown = self.messages.snapshot();

        tracing::debug!(
            target: "fchat.view",
            pending_min = pending.minimum,
            pending_max = pending.maximum,
            pending_selection = pending.selection,
            at_bottom = self.scroll.is_at_bottom(),
            "scrolling resumed"
        );
        self.events.push(ViewEvent::Resumed);
        self.queue_relayout();
    }

    fn queue_relayout(&mut self) {
        if !self.events.contains(&ViewEvent::Relayout) {
            self.events.push(ViewEvent::Relayout);
        }
    }
}
