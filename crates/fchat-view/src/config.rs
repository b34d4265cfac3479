#![forbid(unsafe_code)]

//! Chat view configuration.
//!
//! [`ViewConfig`] gathers the tunables of one chat view: how many messages
//! to keep, how scrolling animates, and which interactions pause scrolling.
//! With the `config` feature it can be loaded from TOML or JSON.
//!
//! # Loading
//!
//! ```toml
//! # fchat-view.toml
//! message_limit = 2000
//! smooth_scrolling = false
//! hover_pause_ms = 0
//! ```
//!
//! ```rust,ignore
//! let config = ViewConfig::load_toml_file("fchat-view.toml")?;
//! ```
//!
//! # Defaults
//!
//! `ViewConfig::default()` reproduces the built-in constants:
//! [`DEFAULT_CAPACITY`], [`DEFAULT_SEGMENT_SIZE`],
//! [`DEFAULT_SCROLL_DURATION`], and [`DEFAULT_SMALL_CHANGE`].

#[cfg(feature = "config")]
use std::path::Path;
use std::time::Duration;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

use fchat_log::{DEFAULT_CAPACITY, DEFAULT_SEGMENT_SIZE};

use crate::animation::DEFAULT_SCROLL_DURATION;
use crate::scroll::{DEFAULT_SMALL_CHANGE, TrackerConfig};

/// Hover pause length when the pointer moves over the messages.
pub const DEFAULT_HOVER_PAUSE: Duration = Duration::from_millis(500);

/// Pause length after a double click.
pub const DEFAULT_DOUBLE_CLICK_PAUSE: Duration = Duration::from_millis(200);

const MAX_ANIMATION_MS: u64 = 5_000;

// ---------------------------------------------------------------------------
// ViewConfig
// ---------------------------------------------------------------------------

/// Tunables for one [`ChatView`](crate::ChatView).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct ViewConfig {
    /// Messages kept before the oldest is evicted. Zero keeps nothing.
    pub message_limit: usize,
    /// Entries per storage segment.
    pub segment_size: usize,
    /// Animate user-initiated scrolling.
    pub smooth_scrolling: bool,
    /// Animate the follow-bottom scroll when new messages arrive.
    pub smooth_scrolling_on_new_messages: bool,
    /// Duration of one scroll animation.
    pub scroll_animation_ms: u64,
    /// Messages moved per wheel notch.
    pub small_change: f64,
    /// Pause while the pointer moves over the messages.
    pub pause_on_hover: bool,
    /// How long a hover keeps the view paused after the last movement.
    /// `0` pauses until the pointer leaves.
    pub hover_pause_ms: u64,
    /// How long a double click keeps the view paused. `0` disables.
    pub double_click_pause_ms: u64,
    /// Pause while the configured keyboard modifier is held.
    pub pause_on_modifier: bool,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            message_limit: DEFAULT_CAPACITY,
            segment_size: DEFAULT_SEGMENT_SIZE,
            smooth_scrolling: true,
            smooth_scrolling_on_new_messages: false,
            scroll_animation_ms: DEFAULT_SCROLL_DURATION.as_millis() as u64,
            small_change: DEFAULT_SMALL_CHANGE,
            pause_on_hover: true,
            hover_pause_ms: DEFAULT_HOVER_PAUSE.as_millis() as u64,
            double_click_pause_ms: DEFAULT_DOUBLE_CLICK_PAUSE.as_millis() as u64,
            pause_on_modifier: false,
        }
    }
}

impl ViewConfig {
    /// Scroll tracker settings derived from this config.
    #[must_use]
    pub fn tracker_config(&self) -> TrackerConfig {
        TrackerConfig {
            smooth_scrolling: self.smooth_scrolling,
            animation_duration: Duration::from_millis(self.scroll_animation_ms),
            small_change: self.small_change,
        }
    }

    /// Hover pause duration; `None` means until the pointer leaves.
    #[must_use]
    pub fn hover_pause(&self) -> Option<Duration> {
        (self.hover_pause_ms > 0).then(|| Duration::from_millis(self.hover_pause_ms))
    }

    /// Double-click pause duration; `None` when disabled.
    #[must_use]
    pub fn double_click_pause(&self) -> Option<Duration> {
        (self.double_click_pause_ms > 0).then(|| Duration::from_millis(self.double_click_pause_ms))
    }

    /// Validate all parameters are within acceptable ranges.
    ///
    /// Returns a list of validation errors. An empty list means the config
    /// is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.segment_size == 0 {
            errors.push("segment_size must be > 0".into());
        }
        if self.scroll_animation_ms > MAX_ANIMATION_MS {
            errors.push(format!(
                "scroll_animation_ms must be <= {MAX_ANIMATION_MS}, got {}",
                self.scroll_animation_ms
            ));
        }
        if !self.small_change.is_finite() || self.small_change <= 0.0 {
            errors.push(format!(
                "small_change must be finite and > 0, got {}",
                self.small_change
            ));
        }

        errors
    }

    /// `Ok(self)` when [`validate`](Self::validate) finds nothing.
    pub fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Parse from a TOML string.
    #[cfg(feature = "config")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(ConfigError::Toml)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Parse from a JSON string.
    #[cfg(feature = "config")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(ConfigError::Json)
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Load a TOML file and reject invalid values.
    #[cfg(feature = "config")]
    pub fn load_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_file(path)?.validated()
    }

    /// Load a JSON file and reject invalid values.
    #[cfg(feature = "config")]
    pub fn load_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_json_file(path)?.validated()
    }

    /// Serialize to a TOML string.
    #[cfg(feature = "config")]
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors that can occur when loading a view configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "config")]
    Toml(toml::de::Error),
    /// JSON parse error.
    #[cfg(feature = "config")]
    Json(serde_json::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "config")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            #[cfg(feature = "config")]
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "config")]
            Self::Toml(e) => Some(e),
            #[cfg(feature = "config")]
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use super::*;

    #[test]
    fn default_matches_component_defaults() {
        let config = ViewConfig::default();
        assert_eq!(config.message_limit, DEFAULT_CAPACITY);
        assert_eq!(config.segment_size, DEFAULT_SEGMENT_SIZE);

        let tracker = config.tracker_config();
        let expected = TrackerConfig::default();
        assert_eq!(tracker, expected);

        assert_eq!(config.hover_pause(), Some(DEFAULT_HOVER_PAUSE));
        assert_eq!(config.double_click_pause(), Some(DEFAULT_DOUBLE_CLICK_PAUSE));
        assert!(config.validate().is_empty());
    }

    #[test]
    fn zero_durations_map_to_none() {
        let config = ViewConfig {
            hover_pause_ms: 0,
            double_click_pause_ms: 0,
            ..Default::default()
        };
        assert_eq!(config.hover_pause(), None);
        assert_eq!(config.double_click_pause(), None);
    }

    #[test]
    fn validate_collects_every_problem() {
        let config = ViewConfig {
            segment_size: 0,
            scroll_animation_ms: 60_000,
            small_change: f64::NAN,
            ..Default::default()
        };
        let errors = config.validate();
        assert_eq!(errors.len(), 3, "{errors:?}");
        assert!(errors[0].contains("segment_size"));
        assert!(errors[2].contains("small_change"));
    }

    #[test]
    fn zero_message_limit_is_valid() {
        let config = ViewConfig {
            message_limit: 0,
            ..Default::default()
        };
        assert!(config.validate().is_empty());
        assert!(config.validated().is_ok());
    }

    #[test]
    fn validated_rejects_bad_config() {
        let err = ViewConfig {
            small_change: -1.0,
            ..Default::default()
        }
        .validated()
        .unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref e) if e.len() == 1));
        assert!(err.to_string().starts_with("validation errors: small_change"));
        assert!(err.source().is_none());
    }

    #[test]
    fn io_error_has_source() {
        let err = ConfigError::from(std::io::Error::other("disk gone"));
        assert!(err.to_string().contains("disk gone"));
        assert!(err.source().is_some());
    }

    #[cfg(feature = "config")]
    mod loading {
        use std::io::Write;

        use super::*;

        #[test]
        fn partial_toml_fills_defaults() {
            let config = ViewConfig::from_toml_str(
                "message_limit = 250\nsmooth_scrolling = false\nhover_pause_ms = 0\n",
            )
            .unwrap();
            assert_eq!(config.message_limit, 250);
            assert!(!config.smooth_scrolling);
            assert_eq!(config.hover_pause(), None);
            assert_eq!(config.segment_size, DEFAULT_SEGMENT_SIZE);
        }

        #[test]
        fn json_roundtrip() {
            let config = ViewConfig {
                pause_on_modifier: true,
                small_change: 3.0,
                ..Default::default()
            };
            let json = serde_json::to_string(&config).unwrap();
            assert_eq!(ViewConfig::from_json_str(&json).unwrap(), config);
        }

        #[test]
        fn toml_roundtrip() {
            let config = ViewConfig {
                message_limit: 42,
                ..Default::default()
            };
            let text = config.to_toml_string().unwrap();
            assert_eq!(ViewConfig::from_toml_str(&text).unwrap(), config);
        }

        #[test]
        fn malformed_input_reports_parser() {
            let err = ViewConfig::from_toml_str("message_limit = \"many\"").unwrap_err();
            assert!(matches!(err, ConfigError::Toml(_)));
            let err = ViewConfig::from_json_str("{").unwrap_err();
            assert!(matches!(err, ConfigError::Json(_)));
        }

        #[test]
        fn load_file_validates() {
            let mut file = tempfile::NamedTempFile::new().unwrap();
            writeln!(file, "segment_size = 0").unwrap();
            let err = ViewConfig::load_toml_file(file.path()).unwrap_err();
            assert!(matches!(err, ConfigError::Validation(_)));

            let mut file = tempfile::NamedTempFile::new().unwrap();
            writeln!(file, r#"{{"message_limit": 10}}"#).unwrap();
            let config = ViewConfig::load_json_file(file.path()).unwrap();
            assert_eq!(config.message_limit, 10);
        }

        #[test]
        fn missing_file_is_io_error() {
            let err = ViewConfig::from_toml_file("/nonexistent/fchat-view.toml").unwrap_err();
            assert!(matches!(err, ConfigError::Io(_)));
        }
    }
}
