#![no_main]

use std::time::Duration;

use fchat_view::{ChatView, PauseReason, ScrollbarHighlight, ViewConfig};
use libfuzzer_sys::fuzz_target;
use web_time::Instant;

fuzz_target!(|data: &[u8]| {
    // First byte picks the capacity (1..=64).
    let Some((&first, payload)) = data.split_first() else {
        return;
    };
    let mut view: ChatView<u32> = ChatView::new(ViewConfig {
        message_limit: usize::from(first % 64) + 1,
        segment_size: 4,
        ..Default::default()
    });
    view.layout_completed(6.0);

    let t0 = Instant::now();
    let mut elapsed = Duration::ZERO;
    let mut next = 0u32;

    for pair in payload.chunks(2) {
        let op = pair[0];
        let arg = pair.get(1).copied().unwrap_or(0);
        let now = t0 + elapsed;
        match op % 12 {
            0..=3 => {
                view.message_appended(next, ScrollbarHighlight::NONE);
                next = next.wrapping_add(1);
            }
            4 => {
                let batch: Vec<u32> = (0..u32::from(arg % 16)).collect();
                view.messages_added_at_start(&batch, &[]);
            }
            5 => view.wheel(f64::from(arg as i8) / 16.0),
            6 => view.mouse_moved(now),
            7 => view.mouse_left(),
            8 => view.double_clicked(now),
            9 => view.pause(PauseReason::Selecting, None, now),
            10 => view.unpause(PauseReason::Selecting),
            _ => view.layout_completed(f64::from(arg % 40)),
        }
        elapsed += Duration::from_millis(u64::from(arg) * 4);
        view.tick(t0 + elapsed, Duration::from_millis(16));

        // Post-conditions that must always hold:
        let scroll = view.scroll();
        assert!(scroll.current_value() >= scroll.minimum() - 1e-6, "above the head");
        let span = scroll.maximum() - scroll.minimum();
        let shown = view.messages_snapshot();
        assert!((span - shown.len() as f64).abs() < 1e-6, "range/snapshot mismatch");
        let window = view.visible_window();
        assert!(window.first_index <= window.snapshot.len());
    }
});
