#![forbid(unsafe_code)]

//! Scroll position, pausing, and view state for a chat pane.
//!
//! # Role in FrankenChat
//! `fchat-view` sits between the message log (`fchat-log`) and whatever
//! draws it. It decides which messages are on screen, keeps the page still
//! while the user interacts with it, and follows the newest message when
//! the user is at the bottom.
//!
//! # Primary responsibilities
//! - **ScrollTracker**: clamped, optionally animated scroll position in
//!   message-index units.
//! - **PauseController**: pause reasons with expiries and buffered bound
//!   changes.
//! - **ChatView**: one pane wiring the log, tracker, pauses, selection, and
//!   scrollbar highlights together.
//! - **ViewConfig**: tunables, loadable from TOML/JSON with the `config`
//!   feature.
//!
//! # Time
//! Nothing here reads a clock. Animation advances by the `Duration` passed
//! to `tick`, and pause expiries compare against the `Instant` passed in.

pub mod animation;
pub mod chat_view;
pub mod config;
pub mod highlights;
pub mod pause;
pub mod scroll;
pub mod selection;

pub use animation::{DEFAULT_SCROLL_DURATION, EasingFn, ScrollAnimation, ease_out_cubic, linear};
pub use chat_view::{ChatView, ViewEvent, VisibleWindow};
pub use config::{ConfigError, ViewConfig};
pub use highlights::{HighlightKind, HighlightStyle, ScrollbarHighlight, ScrollbarHighlights};
pub use pause::{PauseController, PauseExpiry, PauseReason, PendingOffsets};
pub use scroll::{ScrollPhase, ScrollTracker, TrackerConfig, VALUE_EPSILON};
pub use selection::{Selection, SelectionItem};
