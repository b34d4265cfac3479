#![no_main]

use std::collections::VecDeque;

use arbitrary::Arbitrary;
use fchat_log::BoundedLog;
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum Op {
    Append(u16),
    Prepend(Vec<u16>),
    Replace { index: u8, value: u16 },
    Find { hint: u8, needle: u16 },
    Snapshot,
    Clear,
}

#[derive(Debug, Arbitrary)]
struct Input {
    capacity: u8,
    segment_size: u8,
    ops: Vec<Op>,
}

fuzz_target!(|input: Input| {
    let capacity = usize::from(input.capacity % 64);
    let segment_size = usize::from(input.segment_size % 16).max(1);
    let mut log = BoundedLog::with_segment_size(capacity, segment_size);
    let mut model: VecDeque<u16> = VecDeque::new();
    let mut snapshots = Vec::new();

    for op in input.ops {
        match op {
            Op::Append(value) => {
                let evicted = log.append(value);
                model.push_back(value);
                let expected = if model.len() > capacity {
                    model.pop_front()
                } else {
                    None
                };
                assert_eq!(evicted, expected, "wrong eviction");
            }
            Op::Prepend(batch) => {
                let take = capacity.saturating_sub(model.len()).min(batch.len());
                let accepted = log.prepend_bulk(&batch);
                assert_eq!(accepted.as_slice(), &batch[batch.len() - take..]);
                for value in accepted.iter().rev() {
                    model.push_front(*value);
                }
            }
            Op::Replace { index, value } => {
                let index = usize::from(index);
                let previous = log.replace_at(index, value);
                assert_eq!(previous, model.get(index).copied());
                if let Some(slot) = model.get_mut(index) {
                    *slot = value;
                }
            }
            Op::Find { hint, needle } => {
                let found = log.find(usize::from(hint), |v| *v == needle);
                match found {
                    Some((index, value)) => {
                        assert_eq!(value, needle);
                        assert_eq!(model.get(index), Some(&needle));
                    }
                    None => assert!(!model.contains(&needle)),
                }
            }
            Op::Snapshot => {
                let expected: Vec<u16> = model.iter().copied().collect();
                snapshots.push((log.snapshot(), expected));
            }
            Op::Clear => {
                log.clear();
                model.clear();
            }
        }

        // Post-conditions that must always hold:
        assert!(log.len() <= capacity, "capacity exceeded");
        assert_eq!(log.len(), model.len());
        assert_eq!(log.space(), capacity - model.len());
    }

    // Snapshots never change after they are taken.
    for (snapshot, expected) in &snapshots {
        assert_eq!(snapshot.len(), expected.len());
        assert!(snapshot.iter().eq(expected.iter()), "snapshot mutated");
    }
});
