#![forbid(unsafe_code)]

//! Segment storage shared between the log and its snapshots.
//!
//! A segment is an `Arc<Vec<T>>`. The log owns an `Arc` of the segment list,
//! so handing out a snapshot is two reference-count bumps. Mutation always
//! goes through `Arc::make_mut`, which copies a segment (or the list) only
//! while a snapshot still shares it.
//!
//! # Invariants
//!
//! 1. Live entries of the head segment start at `first_offset`.
//! 2. Live entries of the tail segment end at `last_offset`.
//! 3. Every segment in between is live in full.
//! 4. No segment in the list is empty.

use std::collections::VecDeque;
use std::sync::Arc;

pub(crate) type Segment<T> = Arc<Vec<T>>;
pub(crate) type SegmentList<T> = Arc<VecDeque<Segment<T>>>;

/// Live slice of segment `position` in a list of `count` segments.
pub(crate) fn live_slice<T>(
    segment: &[T],
    position: usize,
    count: usize,
    first_offset: usize,
    last_offset: usize,
) -> &[T] {
    let start = if position == 0 { first_offset } else { 0 };
    let end = if position + 1 == count {
        last_offset.min(segment.len())
    } else {
        segment.len()
    };
    &segment[start.min(end)..end]
}

/// Resolve a logical index to `(segment, offset)`.
///
/// O(segments); callers guarantee `index < len`.
pub(crate) fn locate<T>(
    segments: &VecDeque<Segment<T>>,
    first_offset: usize,
    len: usize,
    index: usize,
) -> Option<(usize, usize)> {
    if index >= len {
        return None;
    }
    let mut remaining = index + first_offset;
    for (position, segment) in segments.iter().enumerate() {
        if remaining < segment.len() {
            return Some((position, remaining));
        }
        remaining -= segment.len();
    }
    None
}

/// Iterate the live entries of a segment list, oldest first.
pub(crate) fn live_entries<T>(
    segments: &VecDeque<Segment<T>>,
    first_offset: usize,
    last_offset: usize,
) -> impl DoubleEndedIterator<Item = &T> {
    let count = segments.len();
    segments.iter().enumerate().flat_map(move |(position, segment)| {
        live_slice(segment, position, count, first_offset, last_offset).iter()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(chunks: &[&[u32]]) -> VecDeque<Segment<u32>> {
        chunks.iter().map(|c| Arc::new(c.to_vec())).collect()
    }

    #[test]
    fn single_segment_respects_both_offsets() {
        let segments = list(&[&[1, 2, 3, 4]]);
        let live: Vec<_> = live_entries(&segments, 1, 3).copied().collect();
        assert_eq!(live, vec![2, 3]);
    }

    #[test]
    fn locate_walks_across_segments() {
        let segments = list(&[&[1, 2, 3], &[4, 5, 6], &[7]]);
        assert_eq!(locate(&segments, 2, 5, 0), Some((0, 2)));
        assert_eq!(locate(&segments, 2, 5, 1), Some((1, 0)));
        assert_eq!(locate(&segments, 2, 5, 4), Some((2, 0)));
        assert_eq!(locate(&segments, 2, 5, 5), None);
    }

    #[test]
    fn live_entries_reverse() {
        let segments = list(&[&[1, 2], &[3, 4]]);
        let live: Vec<_> = live_entries(&segments, 1, 2).rev().copied().collect();
        assert_eq!(live, vec![4, 3, 2]);
    }
}
