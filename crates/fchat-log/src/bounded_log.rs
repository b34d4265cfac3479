#![forbid(unsafe_code)]

//! Capacity-bounded message log backed by shared segments.
//!
//! [`BoundedLog`] keeps at most `capacity` entries in append order. Storage is
//! split into fixed-size segments so that [`BoundedLog::snapshot`] can hand
//! out the current segments without copying entries.
//!
//! # Behavior
//!
//! - Appending past capacity evicts the oldest entry, one for one.
//! - Backfill ([`BoundedLog::prepend_bulk`]) only fills free space. Entries
//!   that would not fit are rejected instead of evicting live ones, so an
//!   always-full log does not flicker while history loads.
//! - Replacement is optimistic: the caller names the entry it expects to
//!   overwrite, and a concurrent eviction turns the call into a no-op.
//!
//! # Example
//!
//! ```
//! use fchat_log::BoundedLog;
//!
//! let mut log = BoundedLog::new(3);
//! for entry in ["a", "b", "c"] {
//!     log.append(entry);
//! }
//! let before = log.snapshot();
//! assert_eq!(log.append("d"), Some("a"));
//!
//! assert_eq!(log.snapshot(), ["b", "c", "d"]);
//! assert_eq!(before, ["a", "b", "c"]);
//! ```

use std::collections::VecDeque;
use std::sync::Arc;

use crate::segment::{Segment, SegmentList, live_entries, locate};
use crate::snapshot::Snapshot;

/// Default maximum number of retained entries.
pub const DEFAULT_CAPACITY: usize = 1000;

/// Default number of entries per segment.
pub const DEFAULT_SEGMENT_SIZE: usize = 100;

/// A memory-bounded log of entries with O(1) snapshots.
///
/// Entries are treated as immutable values once stored; `T: Clone` is
/// expected to be cheap (typically an `Arc` to the real message).
#[derive(Debug, Clone)]
pub struct BoundedLog<T> {
    segments: SegmentList<T>,
    /// Index of the first live entry inside the head segment.
    first_offset: usize,
    len: usize,
    capacity: usize,
    segment_size: usize,
}

impl<T> BoundedLog<T> {
    /// Create a log holding at most `capacity` entries.
    ///
    /// A capacity of zero is allowed and yields a log that drops everything.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self::with_segment_size(capacity, DEFAULT_SEGMENT_SIZE)
    }

    /// Create a log with an explicit segment size (clamped to at least 1).
    #[must_use]
    pub fn with_segment_size(capacity: usize, segment_size: usize) -> Self {
        Self {
            segments: Arc::new(VecDeque::new()),
            first_offset: 0,
            len: 0,
            capacity,
            segment_size: segment_size.max(1),
        }
    }

    /// Maximum number of entries retained.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of entries currently stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the log holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Free slots before appends start evicting.
    #[must_use]
    pub fn space(&self) -> usize {
        self.capacity.saturating_sub(self.len)
    }

    /// Entry at `index` (0 = oldest).
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        let (segment, offset) = locate(&self.segments, self.first_offset, self.len, index)?;
        self.segments.get(segment)?.get(offset)
    }

    /// Oldest entry.
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.iter().next()
    }

    /// Newest entry.
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.iter().next_back()
    }

    /// Take a point-in-time view of the log. O(1).
    #[must_use]
    pub fn snapshot(&self) -> Snapshot<T> {
        Snapshot::new(
            Arc::clone(&self.segments),
            self.len,
            self.first_offset,
            self.last_offset(),
        )
    }

    /// Remove every entry. Outstanding snapshots keep their contents.
    pub fn clear(&mut self) {
        self.segments = Arc::new(VecDeque::new());
        self.first_offset = 0;
        self.len = 0;
    }

    fn iter(&self) -> impl DoubleEndedIterator<Item = &T> {
        live_entries(&self.segments, self.first_offset, self.last_offset())
    }

    fn last_offset(&self) -> usize {
        self.segments.back().map_or(0, |tail| tail.len())
    }

    #[cfg(test)]
    pub(crate) fn segment_count(&self) -> usize {
        self.segments.len()
    }
}

impl<T: Clone> BoundedLog<T> {
    /// Append an entry at the tail.
    ///
    /// Returns the evicted head entry when the log was already full. With a
    /// zero capacity the entry itself comes straight back.
    pub fn append(&mut self, entry: T) -> Option<T> {
        if self.capacity == 0 {
            return Some(entry);
        }

        let segment_size = self.segment_size;
        let segments = Arc::make_mut(&mut self.segments);
        if segments
            .back()
            .is_none_or(|tail| tail.len() >= segment_size)
        {
            segments.push_back(Arc::new(Vec::with_capacity(segment_size)));
        }
        if let Some(tail) = segments.back_mut() {
            Arc::make_mut(tail).push(entry);
        }
        self.len += 1;

        if self.len > self.capacity {
            self.evict_front()
        } else {
            None
        }
    }

    /// Insert a batch of older entries at the head (history backfill).
    ///
    /// Only as many entries as fit in the free space are taken, from the end
    /// of `entries` (the ones closest to the current head). Returns the
    /// accepted entries in order; a full log accepts nothing.
    pub fn prepend_bulk(&mut self, entries: &[T]) -> Vec<T> {
        let accepted_count = self.space().min(entries.len());
        if accepted_count == 0 {
            #[cfg(feature = "tracing")]
            if !entries.is_empty() {
                tracing::trace!(
                    target: "fchat.log",
                    rejected = entries.len(),
                    "backfill rejected, log is full"
                );
            }
            return Vec::new();
        }

        // Eviction only happens on a full log, so a log with free space has
        // no dead prefix in its head segment.
        debug_assert_eq!(self.first_offset, 0);

        let accepted = entries[entries.len() - accepted_count..].to_vec();
        let segment_size = self.segment_size;
        let segments = Arc::make_mut(&mut self.segments);
        for chunk in accepted.rchunks(segment_size) {
            segments.push_front(Arc::new(chunk.to_vec()));
        }
        self.len += accepted_count;

        #[cfg(feature = "tracing")]
        tracing::trace!(
            target: "fchat.log",
            accepted = accepted_count,
            rejected = entries.len() - accepted_count,
            len = self.len,
            "backfill prepended"
        );

        accepted
    }

    /// Swap the entry at `index` for `replacement` if it still equals
    /// `expected_old`.
    ///
    /// Returns `false` (and changes nothing) when the index is out of range
    /// or the entry has changed, e.g. because it was evicted meanwhile.
    pub fn replace(&mut self, index: usize, expected_old: &T, replacement: T) -> bool
    where
        T: PartialEq,
    {
        let matches = self.get(index).is_some_and(|current| current == expected_old);
        if matches {
            self.write(index, replacement);
        }
        matches
    }

    /// Swap the entry at `index` unconditionally, returning the previous one.
    pub fn replace_at(&mut self, index: usize, replacement: T) -> Option<T> {
        self.write(index, replacement)
    }

    /// Find `needle` (starting the search at `hint`) and replace it.
    ///
    /// Returns the index the replacement landed at.
    pub fn replace_item(&mut self, hint: usize, needle: &T, replacement: T) -> Option<usize>
    where
        T: PartialEq,
    {
        let (index, _) = self.find(hint, |entry| entry == needle)?;
        self.write(index, replacement)?;
        Some(index)
    }

    /// Find the first entry matching `predicate`, starting at `start_hint`.
    ///
    /// The hint is checked first, then the scan continues to the tail and
    /// wraps around from the head. Hints past the end are tolerated.
    pub fn find<F>(&self, start_hint: usize, mut predicate: F) -> Option<(usize, T)>
    where
        F: FnMut(&T) -> bool,
    {
        let hint = start_hint.min(self.len);
        self.iter()
            .enumerate()
            .skip(hint)
            .chain(self.iter().enumerate().take(hint))
            .find(|&(_, entry)| predicate(entry))
            .map(|(index, entry)| (index, entry.clone()))
    }

    /// Find the newest entry matching `predicate`.
    pub fn rfind<F>(&self, mut predicate: F) -> Option<(usize, T)>
    where
        F: FnMut(&T) -> bool,
    {
        let len = self.len;
        self.iter()
            .rev()
            .enumerate()
            .find(|&(_, entry)| predicate(entry))
            .map(|(from_back, entry)| (len - 1 - from_back, entry.clone()))
    }

    fn write(&mut self, index: usize, replacement: T) -> Option<T> {
        let (segment, offset) = locate(&self.segments, self.first_offset, self.len, index)?;
        let segments = Arc::make_mut(&mut self.segments);
        let chunk: &mut Segment<T> = segments.get_mut(segment)?;
        let slot = Arc::make_mut(chunk).get_mut(offset)?;
        Some(std::mem::replace(slot, replacement))
    }

    fn evict_front(&mut self) -> Option<T> {
        let segments = Arc::make_mut(&mut self.segments);
        let head = segments.front()?;
        let head_len = head.len();
        let evicted = head.get(self.first_offset).cloned();

        self.first_offset += 1;
        self.len -= 1;
        if self.first_offset >= head_len {
            segments.pop_front();
            self.first_offset = 0;
        }

        #[cfg(feature = "tracing")]
        tracing::trace!(target: "fchat.log", len = self.len, "evicted oldest entry");

        evicted
    }
}

impl<T> Default for BoundedLog<T> {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
