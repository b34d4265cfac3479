#![forbid(unsafe_code)]

//! Immutable point-in-time views over a [`BoundedLog`](crate::BoundedLog).
//!
//! A [`Snapshot`] holds its own references to the log's segments. Later
//! appends, prepends, replacements, or a `clear()` on the log never change
//! what a snapshot reports: the log copies any segment a snapshot still
//! shares before writing to it.
//!
//! Index lookup walks the segment list, so it is O(segments). Segment count
//! stays small relative to capacity (capacity / segment size), which keeps
//! this cheap for the handful of lookups a frame needs.

use std::collections::VecDeque;
use std::fmt;
use std::ops::Index;
use std::sync::Arc;

use crate::segment::{SegmentList, live_entries, locate};

/// A frozen view of the log at the moment [`BoundedLog::snapshot`] was called.
///
/// Cloning a snapshot is O(1).
///
/// [`BoundedLog::snapshot`]: crate::BoundedLog::snapshot
pub struct Snapshot<T> {
    segments: SegmentList<T>,
    len: usize,
    first_offset: usize,
    last_offset: usize,
}

impl<T> Snapshot<T> {
    pub(crate) fn new(
        segments: SegmentList<T>,
        len: usize,
        first_offset: usize,
        last_offset: usize,
    ) -> Self {
        Self {
            segments,
            len,
            first_offset,
            last_offset,
        }
    }

    /// Number of entries captured.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the snapshot captured no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Entry at `index`, oldest first. `None` when out of range.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        let (segment, offset) = locate(&self.segments, self.first_offset, self.len, index)?;
        self.segments.get(segment)?.get(offset)
    }

    /// Oldest captured entry.
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.iter().next()
    }

    /// Newest captured entry.
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.iter().next_back()
    }

    /// Iterate entries oldest to newest.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> {
        live_entries(&self.segments, self.first_offset, self.last_offset)
    }

    /// Copy the captured entries out.
    #[must_use]
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().cloned().collect()
    }
}

impl<T> Index<usize> for Snapshot<T> {
    type Output = T;

    /// Out-of-range access is a caller bug: it asserts in debug builds and
    /// reads the newest entry in release builds.
    ///
    /// # Panics
    ///
    /// Panics if the snapshot is empty, in every build profile. Use
    /// [`get`](Self::get) when the snapshot may be empty.
    fn index(&self, index: usize) -> &T {
        debug_assert!(
            index < self.len,
            "snapshot index {index} out of range (len {})",
            self.len
        );
        let clamped = index.min(self.len.saturating_sub(1));
        match self.get(clamped) {
            Some(entry) => entry,
            None => panic!("index into empty snapshot"),
        }
    }
}

impl<T> Clone for Snapshot<T> {
    fn clone(&self) -> Self {
        Self {
            segments: Arc::clone(&self.segments),
            len: self.len,
            first_offset: self.first_offset,
            last_offset: self.last_offset,
        }
    }
}

impl<T> Default for Snapshot<T> {
    fn default() -> Self {
        Self::new(Arc::new(VecDeque::new()), 0, 0, 0)
    }
}

impl<T: fmt::Debug> fmt::Debug for Snapshot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq> PartialEq for Snapshot<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T: PartialEq> PartialEq<[T]> for Snapshot<T> {
    fn eq(&self, other: &[T]) -> bool {
        self.len == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: PartialEq, const N: usize> PartialEq<[T; N]> for Snapshot<T> {
    fn eq(&self, other: &[T; N]) -> bool {
        self == other.as_slice()
    }
}

#[cfg(test)]
mod tests {
    use crate::BoundedLog;

    use super::*;

    #[test]
    fn default_is_empty() {
        let snap: Snapshot<u32> = Snapshot::default();
        assert!(snap.is_empty());
        assert_eq!(snap.get(0), None);
        assert_eq!(snap.iter().count(), 0);
    }

    #[test]
    fn clone_shares_contents() {
        let mut log = BoundedLog::with_segment_size(10, 2);
        for i in 0..5 {
            log.append(i);
        }
        let snap = log.snapshot();
        let copy = snap.clone();
        assert_eq!(snap, copy);
        assert_eq!(copy, [0, 1, 2, 3, 4]);
    }

    #[test]
    fn first_and_last() {
        let mut log = BoundedLog::with_segment_size(3, 2);
        for i in 0..7 {
            log.append(i);
        }
        let snap = log.snapshot();
        assert_eq!(snap.first(), Some(&4));
        assert_eq!(snap.last(), Some(&6));
        assert_eq!(snap[1], 5);
    }

    #[test]
    #[should_panic]
    fn indexing_empty_snapshot_panics() {
        let snap: Snapshot<u8> = Snapshot::default();
        let _entry = &snap[0];
    }

    #[test]
    #[cfg(not(debug_assertions))]
    fn out_of_range_index_reads_newest_in_release() {
        let mut log = BoundedLog::new(4);
        log.append(1);
        log.append(2);
        let snap = log.snapshot();
        assert_eq!(snap[9], 2);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "out of range")]
    fn out_of_range_index_asserts_in_debug() {
        let mut log = BoundedLog::new(4);
        log.append(1);
        let snap = log.snapshot();
        let _entry = &snap[3];
    }

    #[test]
    fn debug_lists_entries() {
        let mut log = BoundedLog::new(4);
        log.append("a");
        log.append("b");
        assert_eq!(format!("{:?}", log.snapshot()), r#"["a", "b"]"#);
    }
}
