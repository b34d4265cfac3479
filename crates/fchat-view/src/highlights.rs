#![forbid(unsafe_code)]

//! Scrollbar highlight markers.
//!
//! Each message has one [`ScrollbarHighlight`] (often the null marker), kept
//! in a [`BoundedLog`] with the same capacity as the message log so the two
//! evict in lockstep. The scrollbar painter reads a snapshot; while paused
//! that snapshot stays frozen so markers line up with the frozen messages.

use fchat_log::{BoundedLog, Snapshot};

/// What a marker stands for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum HighlightKind {
    #[default]
    None,
    /// A highlight phrase or mention matched.
    Highlight,
    /// A subscription or similar channel event.
    Subscription,
}

/// How the marker is painted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum HighlightStyle {
    /// Not painted.
    #[default]
    None,
    /// Full-width block.
    Default,
    /// Thin line.
    Line,
}

/// A marker on the scrollbar track.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ScrollbarHighlight {
    pub kind: HighlightKind,
    /// Packed `0xRRGGBBAA`.
    pub color: u32,
    pub style: HighlightStyle,
}

impl ScrollbarHighlight {
    /// Marker that paints nothing.
    pub const NONE: Self = Self {
        kind: HighlightKind::None,
        color: 0,
        style: HighlightStyle::None,
    };

    #[must_use]
    pub const fn new(kind: HighlightKind, color: u32, style: HighlightStyle) -> Self {
        Self { kind, color, style }
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        self.style == HighlightStyle::None
    }
}

/// Per-message markers with a freezable snapshot.
#[derive(Debug, Clone)]
pub struct ScrollbarHighlights {
    markers: BoundedLog<ScrollbarHighlight>,
    frozen: Snapshot<ScrollbarHighlight>,
    paused: bool,
}

impl ScrollbarHighlights {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self::with_segment_size(capacity, fchat_log::DEFAULT_SEGMENT_SIZE)
    }

    #[must_use]
    pub fn with_segment_size(capacity: usize, segment_size: usize) -> Self {
        Self {
            markers: BoundedLog::with_segment_size(capacity, segment_size),
            frozen: Snapshot::default(),
            paused: false,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Marker for the newest message.
    pub fn add(&mut self, highlight: ScrollbarHighlight) {
        self.markers.append(highlight);
    }

    /// Markers for backfilled messages. Returns how many were kept.
    pub fn add_at_start(&mut self, highlights: &[ScrollbarHighlight]) -> usize {
        self.markers.prepend_bulk(highlights).len()
    }

    /// Returns `false` when `index` is out of range.
    pub fn replace(&mut self, index: usize, highlight: ScrollbarHighlight) -> bool {
        self.markers.replace_at(index, highlight).is_some()
    }

    /// Drop all markers, including a frozen snapshot.
    pub fn clear(&mut self) {
        self.markers.clear();
        self.frozen = Snapshot::default();
    }

    /// Markers to paint. Refreshed on every call unless paused.
    pub fn snapshot(&mut self) -> Snapshot<ScrollbarHighlight> {
        if !self.paused {
            self.frozen = self.markers.snapshot();
        }
        self.frozen.clone()
    }

    /// Freeze the painted markers at their current state.
    pub fn pause(&mut self) {
        if !self.paused {
            self.frozen = self.markers.snapshot();
            self.paused = true;
        }
    }

    pub fn unpause(&mut self) {
        self.paused = false;
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marker(red: u32) -> ScrollbarHighlight {
        ScrollbarHighlight::new(HighlightKind::Highlight, red << 24, HighlightStyle::Default)
    }

    fn reds(snapshot: &Snapshot<ScrollbarHighlight>) -> Vec<u32> {
        snapshot.iter().map(|h| h.color >> 24).collect()
    }

    #[test]
    fn null_marker() {
        assert!(ScrollbarHighlight::NONE.is_null());
        assert!(ScrollbarHighlight::default().is_null());
        assert!(!marker(1).is_null());
    }

    #[test]
    fn add_at_start_fills_free_space() {
        let mut highlights = ScrollbarHighlights::new(10);
        highlights.add(marker(1));
        highlights.add(marker(2));
        assert_eq!(highlights.add_at_start(&[marker(4), marker(3)]), 2);
        assert_eq!(reds(&highlights.snapshot()), vec![4, 3, 1, 2]);

        let batch: Vec<_> = [255, 255, 255, 255, 10, 9, 8, 7, 6, 5]
            .into_iter()
            .map(marker)
            .collect();
        assert_eq!(highlights.add_at_start(&batch), 6);
        assert_eq!(
            reds(&highlights.snapshot()),
            vec![10, 9, 8, 7, 6, 5, 4, 3, 1, 2]
        );
        assert_eq!(highlights.add_at_start(&[marker(99)]), 0);
    }

    #[test]
    fn evicts_with_message_log() {
        let mut highlights = ScrollbarHighlights::new(3);
        for red in 1..=5 {
            highlights.add(marker(red));
        }
        assert_eq!(highlights.len(), 3);
        assert_eq!(reds(&highlights.snapshot()), vec![3, 4, 5]);
    }

    #[test]
    fn replace_in_range_only() {
        let mut highlights = ScrollbarHighlights::new(4);
        highlights.add(ScrollbarHighlight::NONE);
        assert!(highlights.replace(0, marker(7)));
        assert!(!highlights.replace(1, marker(8)));
        assert_eq!(reds(&highlights.snapshot()), vec![7]);
    }

    #[test]
    fn paused_snapshot_is_frozen() {
        let mut highlights = ScrollbarHighlights::new(4);
        highlights.add(marker(1));
        highlights.pause();
        highlights.add(marker(2));
        assert!(highlights.is_paused());
        assert_eq!(reds(&highlights.snapshot()), vec![1]);

        highlights.unpause();
        assert_eq!(reds(&highlights.snapshot()), vec![1, 2]);
    }

    #[test]
    fn clear_drops_frozen_markers() {
        let mut highlights = ScrollbarHighlights::new(4);
        highlights.add(marker(1));
        highlights.pause();
        highlights.clear();
        assert!(highlights.snapshot().is_empty());
        assert!(highlights.is_paused());
    }
}
