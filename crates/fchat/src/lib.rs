#![forbid(unsafe_code)]

//! FrankenChat scrollback core, public facade crate.
//!
//! This crate re-exports the stable surface of `fchat-log` and `fchat-view`
//! and offers a prelude for day-to-day usage.
//!
//! ```
//! use fchat::prelude::*;
//!
//! let mut view: ChatView<&str> = ChatView::new(ViewConfig::default());
//! view.layout_completed(20.0);
//! view.message_appended("hello", ScrollbarHighlight::NONE);
//!
//! let window = view.visible_window();
//! assert_eq!(window.entries().next(), Some(&"hello"));
//! ```

// --- Log re-exports --------------------------------------------------------

pub use fchat_log::{BoundedLog, DEFAULT_CAPACITY, DEFAULT_SEGMENT_SIZE, Snapshot};

// --- View re-exports -------------------------------------------------------

pub use fchat_view::{
    ChatView, ConfigError, HighlightKind, HighlightStyle, PauseController, PauseExpiry,
    PauseReason, PendingOffsets, ScrollPhase, ScrollTracker, ScrollbarHighlight,
    ScrollbarHighlights, Selection, SelectionItem, TrackerConfig, ViewConfig, ViewEvent,
    VisibleWindow,
};

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        BoundedLog, ChatView, PauseReason, ScrollbarHighlight, Selection, SelectionItem,
        Snapshot, ViewConfig, ViewEvent, VisibleWindow,
    };

    pub use crate::{log, view};
}

pub use fchat_log as log;
pub use fchat_view as view;
