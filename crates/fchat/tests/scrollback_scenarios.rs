//! End-to-end scrollback scenarios through the public facade.

use std::sync::Arc;
use std::time::Duration;

use fchat::prelude::*;
use web_time::Instant;

type Message = Arc<str>;

fn msg(text: &str) -> Message {
    Arc::from(text)
}

fn texts(snapshot: &Snapshot<Message>) -> Vec<&str> {
    snapshot.iter().map(AsRef::as_ref).collect()
}

#[test]
fn snapshot_outlives_eviction() {
    let mut log = BoundedLog::new(3);
    for text in ["A", "B", "C", "D"] {
        log.append(msg(text));
    }
    let snapshot = log.snapshot();
    assert_eq!(texts(&snapshot), ["B", "C", "D"]);

    let evicted = log.append(msg("E"));
    assert_eq!(evicted.as_deref(), Some("B"));
    assert_eq!(texts(&log.snapshot()), ["C", "D", "E"]);
    assert_eq!(texts(&snapshot), ["B", "C", "D"]);
}

#[test]
fn bottom_follow_through_view() {
    let mut view: ChatView<Message> = ChatView::new(ViewConfig {
        smooth_scrolling: false,
        ..Default::default()
    });
    view.layout_completed(5.0);
    for i in 0..10 {
        view.message_appended(msg(&format!("m{i}")), ScrollbarHighlight::NONE);
    }
    assert_eq!(view.scroll().minimum(), 0.0);
    assert_eq!(view.scroll().maximum(), 10.0);
    assert_eq!(view.scroll().desired_value(), 5.0);

    view.message_appended(msg("m10"), ScrollbarHighlight::NONE);
    view.message_appended(msg("m11"), ScrollbarHighlight::NONE);
    assert_eq!(view.scroll().desired_value(), 7.0);

    let window = view.visible_window();
    let page: Vec<&str> = window.entries().map(AsRef::as_ref).collect();
    assert_eq!(page, ["m7", "m8", "m9", "m10", "m11"]);
}

#[test]
fn hover_pause_extends_and_expires() {
    let t0 = Instant::now();
    let mut view: ChatView<Message> = ChatView::new(ViewConfig {
        hover_pause_ms: 200,
        ..Default::default()
    });
    view.layout_completed(5.0);

    view.mouse_moved(t0);
    view.pause(
        PauseReason::Mouse,
        Some(Duration::from_millis(500)),
        t0 + Duration::from_millis(100),
    );
    view.message_appended(msg("late"), ScrollbarHighlight::NONE);

    view.tick(t0 + Duration::from_millis(300), Duration::from_millis(16));
    assert!(view.is_paused());
    assert!(view.messages_snapshot().is_empty());

    let deadline = view.next_deadline().unwrap_or(t0);
    view.tick(deadline, Duration::from_millis(16));
    assert!(!view.is_paused());
    assert_eq!(texts(&view.messages_snapshot()), ["late"]);

    let events = view.drain_events();
    assert!(events.contains(&ViewEvent::Paused));
    assert!(events.contains(&ViewEvent::Resumed));
}

#[test]
fn busy_chat_with_capacity_and_backfill() {
    let mut view: ChatView<Message> = ChatView::new(ViewConfig {
        message_limit: 50,
        segment_size: 8,
        smooth_scrolling: false,
        ..Default::default()
    });
    view.layout_completed(10.0);

    // History arrives before live traffic.
    let history: Vec<Message> = (0..30).map(|i| msg(&format!("h{i}"))).collect();
    assert_eq!(view.messages_added_at_start(&history, &[]), 30);
    for i in 0..100 {
        view.message_appended(msg(&format!("live{i}")), ScrollbarHighlight::NONE);
        if i % 25 == 0 {
            view.layout_completed(10.0);
        }
    }

    let snapshot = view.messages_snapshot();
    assert_eq!(snapshot.len(), 50);
    assert_eq!(snapshot.first().map(AsRef::as_ref), Some("live50"));
    assert_eq!(snapshot.last().map(AsRef::as_ref), Some("live99"));
    assert!(view.scroll().is_at_bottom());

    view.layout_completed(10.0);
    assert_eq!(view.scroll().minimum(), 0.0);
    assert_eq!(view.scroll().maximum(), 50.0);
    let window = view.visible_window();
    assert_eq!(window.first_index, 40);
}
