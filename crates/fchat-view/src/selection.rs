#![forbid(unsafe_code)]

//! Text selection anchored to message indices.
//!
//! Indices are positions in the live snapshot, so they move whenever the log
//! gains entries at the front (backfill) or loses them there (eviction).
//! [`Selection::shift`] applies that movement.

/// One end of a selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SelectionItem {
    pub message_index: usize,
    pub char_index: usize,
}

impl SelectionItem {
    #[must_use]
    pub const fn new(message_index: usize, char_index: usize) -> Self {
        Self {
            message_index,
            char_index,
        }
    }
}

/// A selection from `start` (where the drag began) to `end` (where it is
/// now). `start` may come after `end`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    pub start: SelectionItem,
    pub end: SelectionItem,
}

impl Selection {
    #[must_use]
    pub const fn new(start: SelectionItem, end: SelectionItem) -> Self {
        Self { start, end }
    }

    /// Collapsed selection at `item`.
    #[must_use]
    pub const fn caret(item: SelectionItem) -> Self {
        Self::new(item, item)
    }

    /// Earlier endpoint.
    #[must_use]
    pub fn min(&self) -> SelectionItem {
        self.start.min(self.end)
    }

    /// Later endpoint.
    #[must_use]
    pub fn max(&self) -> SelectionItem {
        self.start.max(self.end)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    #[must_use]
    pub fn is_single_message(&self) -> bool {
        self.start.message_index == self.end.message_index
    }

    /// Whether any part of message `index` is selected.
    #[must_use]
    pub fn contains_message(&self, index: usize) -> bool {
        !self.is_empty() && (self.min().message_index..=self.max().message_index).contains(&index)
    }

    /// Move both endpoints by `delta` messages.
    ///
    /// An endpoint pushed before the first message clamps to the start of
    /// message 0. When the whole selection falls off, it collapses to an
    /// empty selection at the origin.
    pub fn shift(&mut self, delta: isize) {
        if delta == 0 {
            return;
        }
        let (lo, hi) = if self.start <= self.end {
            (&mut self.start, &mut self.end)
        } else {
            (&mut self.end, &mut self.start)
        };
        if shift_item(hi, delta).is_none() {
            *self = Self::default();
            return;
        }
        if shift_item(lo, delta).is_none() {
            *lo = SelectionItem::default();
        }
    }
}

fn shift_item(item: &mut SelectionItem, delta: isize) -> Option<()> {
    item.message_index = item.message_index.checked_add_signed(delta)?;
    Some(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sel(a: (usize, usize), b: (usize, usize)) -> Selection {
        Selection::new(SelectionItem::new(a.0, a.1), SelectionItem::new(b.0, b.1))
    }

    #[test]
    fn min_max_order_endpoints() {
        let s = sel((5, 2), (3, 9));
        assert_eq!(s.min(), SelectionItem::new(3, 9));
        assert_eq!(s.max(), SelectionItem::new(5, 2));
        assert!(!s.is_single_message());
    }

    #[test]
    fn same_message_orders_by_char() {
        let s = sel((4, 8), (4, 1));
        assert_eq!(s.min().char_index, 1);
        assert!(s.is_single_message());
    }

    #[test]
    fn caret_is_empty() {
        let s = Selection::caret(SelectionItem::new(2, 3));
        assert!(s.is_empty());
        assert!(!s.contains_message(2));
    }

    #[test]
    fn contains_message_range() {
        let s = sel((2, 0), (4, 1));
        assert!(!s.contains_message(1));
        assert!(s.contains_message(2));
        assert!(s.contains_message(4));
        assert!(!s.contains_message(5));
    }

    #[test]
    fn shift_follows_eviction() {
        let mut s = sel((3, 1), (6, 2));
        s.shift(-1);
        assert_eq!(s, sel((2, 1), (5, 2)));
    }

    #[test]
    fn shift_follows_backfill() {
        let mut s = sel((6, 2), (3, 1));
        s.shift(10);
        assert_eq!(s, sel((16, 2), (13, 1)));
    }

    #[test]
    fn shift_clamps_head_endpoint() {
        let mut s = sel((1, 4), (5, 0));
        s.shift(-3);
        assert_eq!(s, sel((0, 0), (2, 0)));

        let mut reversed = sel((5, 0), (1, 4));
        reversed.shift(-3);
        assert_eq!(reversed, sel((2, 0), (0, 0)));
    }

    #[test]
    fn shift_drops_fully_evicted_selection() {
        let mut s = sel((1, 4), (2, 7));
        s.shift(-3);
        assert_eq!(s, Selection::default());
        assert!(s.is_empty());
    }
}
