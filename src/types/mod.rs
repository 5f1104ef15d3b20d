//! Core data types for the islet overlay core.
//!
//! This module defines the data structures used for:
//! - Timer and media state snapshots published on the bus
//! - Commands issued by the overlay toward the owning engines
//! - Runtime configuration with validation

use serde::{Deserialize, Serialize};

// ============================================================================
// TimerSnapshot
// ============================================================================

/// A point-in-time snapshot of the focus timer.
///
/// Snapshots are broadcast on the `timer_state` topic after every mutation
/// and persisted best-effort so a fresh session can resume from the last
/// known value. Invariant: `0 <= time_left_seconds <= total_seconds`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    /// Remaining seconds in the current countdown
    #[serde(rename = "timeLeftSeconds")]
    pub time_left_seconds: u32,
    /// Whether the countdown is actively ticking
    #[serde(rename = "isRunning")]
    pub is_running: bool,
    /// Base duration the progress ring is drawn against
    #[serde(rename = "totalSeconds")]
    pub total_seconds: u32,
}

impl TimerSnapshot {
    /// Creates a stopped snapshot with a full countdown of `minutes`.
    #[must_use]
    pub fn with_minutes(minutes: u32) -> Self {
        Self {
            time_left_seconds: minutes * 60,
            is_running: false,
            total_seconds: minutes * 60,
        }
    }

    /// Returns the countdown progress in `0.0..=1.0` (1.0 = full).
    #[must_use]
    pub fn progress(&self) -> f64 {
        if self.total_seconds == 0 {
            return 0.0;
        }
        f64::from(self.time_left_seconds) / f64::from(self.total_seconds)
    }
}

impl Default for TimerSnapshot {
    fn default() -> Self {
        Self::with_minutes(25)
    }
}

// ============================================================================
// MediaSnapshot
// ============================================================================

/// A point-in-time snapshot of the external media session.
///
/// Never persisted: it is re-derived from polling the media source. When a
/// poll fails the adapter flips `connected` and `is_playing` off but keeps
/// the last-known metadata so the overlay does not flicker to empty fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaSnapshot {
    /// Whether the source reports active playback
    #[serde(rename = "isPlaying")]
    pub is_playing: bool,
    /// Playback position in seconds
    #[serde(rename = "currentTime")]
    pub current_time: f64,
    /// Track duration in seconds (0.0 when unknown)
    pub duration: f64,
    /// Track title (last known)
    pub title: String,
    /// Track artist (last known)
    pub artist: String,
    /// Cover art URL or data URL (last known)
    pub cover: String,
    /// Accent color derived from the cover art
    pub color: String,
    /// Whether the last poll reached the media source
    pub connected: bool,
}

impl Default for MediaSnapshot {
    fn default() -> Self {
        Self {
            is_playing: false,
            current_time: 0.0,
            duration: 0.0,
            title: String::new(),
            artist: String::new(),
            cover: String::new(),
            color: String::new(),
            connected: false,
        }
    }
}

// ============================================================================
// Commands
// ============================================================================

/// Commands the overlay issues toward the timer engine.
///
/// Carried on the `timer_commands` topic; a command published while no
/// engine is mounted is a silent no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum TimerCommand {
    /// Flip the running flag
    Toggle,
    /// Stop the countdown and reset to the base duration
    Stop,
    /// Add (or subtract) minutes from the remaining time
    Adjust {
        /// Signed delta in minutes
        minutes: i32,
    },
    /// Replace the base duration outright
    Set {
        /// New duration in minutes; zero is rejected as a no-op
        minutes: u32,
    },
}

/// Commands the overlay issues toward the media session adapter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum MediaCommand {
    /// Toggle playback on the external source
    PlayPause,
    /// Skip to the next track
    Next,
    /// Return to the previous track
    Previous,
    /// Seek to an absolute position
    Seek {
        /// Target position in seconds
        seconds: f64,
    },
}

// ============================================================================
// TimerCompleted
// ============================================================================

/// One-shot broadcast emitted exactly once when a countdown reaches zero.
///
/// Distinct from a `TimerSnapshot` with `time_left_seconds == 0` so that
/// listeners can fire one-shot behavior (chime, banner) instead of
/// repeatedly matching a steady-state value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerCompleted {
    /// The base duration of the session that just finished
    #[serde(rename = "totalSeconds")]
    pub total_seconds: u32,
}

// ============================================================================
// IsletConfig
// ============================================================================

/// Runtime configuration for the overlay core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IsletConfig {
    /// Default countdown duration in minutes (1-120)
    pub default_minutes: u32,
    /// Upper bound for adjust/set in minutes (1-120)
    pub max_minutes: u32,
    /// Media poll interval in milliseconds (100-10000)
    pub poll_interval_ms: u64,
    /// Whether the completion chime is enabled
    pub sound_enabled: bool,
    /// Whether an AI API key is configured (affects the AskAI panel size)
    pub has_api_key: bool,
}

impl Default for IsletConfig {
    fn default() -> Self {
        Self {
            default_minutes: 25,
            max_minutes: 120,
            poll_interval_ms: 1000,
            sound_enabled: true,
            has_api_key: false,
        }
    }
}

impl IsletConfig {
    /// Creates a new configuration with the specified default duration.
    #[must_use]
    pub fn with_default_minutes(mut self, minutes: u32) -> Self {
        self.default_minutes = minutes;
        self
    }

    /// Creates a new configuration with the specified upper bound.
    #[must_use]
    pub fn with_max_minutes(mut self, minutes: u32) -> Self {
        self.max_minutes = minutes;
        self
    }

    /// Creates a new configuration with the specified poll interval.
    #[must_use]
    pub fn with_poll_interval_ms(mut self, interval: u64) -> Self {
        self.poll_interval_ms = interval;
        self
    }

    /// Validates the configuration.
    ///
    /// Returns an error message if validation fails.
    pub fn validate(&self) -> Result<(), String> {
        if self.default_minutes < 1 || self.default_minutes > 120 {
            return Err("default duration must be between 1 and 120 minutes".to_string());
        }
        if self.max_minutes < 1 || self.max_minutes > 120 {
            return Err("maximum duration must be between 1 and 120 minutes".to_string());
        }
        if self.default_minutes > self.max_minutes {
            return Err("default duration must not exceed the maximum".to_string());
        }
        if self.poll_interval_ms < 100 || self.poll_interval_ms > 10_000 {
            return Err("poll interval must be between 100 and 10000 ms".to_string());
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
