//! External media source seam.
//!
//! A media source is an out-of-process surface reachable only through a
//! request/response pair: `query` for the current playback state and
//! `control` for transport requests. "No media source available" is a
//! steady, non-error condition the adapter must tolerate indefinitely.

use std::sync::Mutex;

use thiserror::Error;

use crate::types::MediaCommand;

// ============================================================================
// MediaSourceError
// ============================================================================

/// Errors returned by a media source.
#[derive(Debug, Error)]
pub enum MediaSourceError {
    /// No active media surface exists right now.
    #[error("no media source available: {0}")]
    Unavailable(String),

    /// A transport command could not be delivered.
    #[error("media control failed: {0}")]
    ControlFailed(String),
}

// ============================================================================
// MediaProbe
// ============================================================================

/// The result of one successful `query` against a media source.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaProbe {
    /// Track title
    pub title: String,
    /// Track artist
    pub artist: String,
    /// Cover art URL
    pub cover: String,
    /// Accent color derived from the cover art
    pub color: String,
    /// Track duration in seconds
    pub duration: f64,
    /// Playback position in seconds
    pub current_time: f64,
    /// Whether playback is active
    pub is_playing: bool,
}

// ============================================================================
// MediaSource
// ============================================================================

/// Request/response seam to the external media surface.
///
/// Implementations must not block: both calls run on the poll/dispatch
/// path. Commands are requests, not guarantees; the next `query` is the
/// authoritative view of whatever actually happened.
pub trait MediaSource: Send + Sync {
    /// Queries the current playback state.
    ///
    /// # Errors
    ///
    /// Returns `MediaSourceError::Unavailable` when no media surface is
    /// active; callers treat this as degraded state, not failure.
    fn query(&self) -> Result<MediaProbe, MediaSourceError>;

    /// Requests a transport action on the external surface.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be delivered.
    fn control(&self, command: MediaCommand) -> Result<(), MediaSourceError>;
}

// ============================================================================
// NullMediaSource
// ============================================================================

/// A media source with no surface behind it.
///
/// Used when no external player is bridged in: every query reports
/// unavailable and the adapter stays in the degraded state.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullMediaSource;

impl MediaSource for NullMediaSource {
    fn query(&self) -> Result<MediaProbe, MediaSourceError> {
        Err(MediaSourceError::Unavailable("no surface bridged".to_string()))
    }

    fn control(&self, _command: MediaCommand) -> Result<(), MediaSourceError> {
        Err(MediaSourceError::ControlFailed("no surface bridged".to_string()))
    }
}

// ============================================================================
// ScriptedMediaSource
// ============================================================================

struct ScriptedState {
    probe: MediaProbe,
    available: bool,
    controls: Vec<MediaCommand>,
}

/// Deterministic media source for tests and the demo harness.
///
/// Simulates a simple player: `query` advances the playhead by one second
/// while playing, transport commands mutate the scripted state directly.
pub struct ScriptedMediaSource {
    state: Mutex<ScriptedState>,
}

impl ScriptedMediaSource {
    /// Creates a source playing the given track from the start.
    #[must_use]
    pub fn playing(title: &str, artist: &str, duration: f64) -> Self {
        Self {
            state: Mutex::new(ScriptedState {
                probe: MediaProbe {
                    title: title.to_string(),
                    artist: artist.to_string(),
                    cover: String::new(),
                    color: "#1db954".to_string(),
                    duration,
                    current_time: 0.0,
                    is_playing: true,
                },
                available: true,
                controls: Vec::new(),
            }),
        }
    }

    /// Marks the source reachable or unreachable for subsequent queries.
    pub fn set_available(&self, available: bool) {
        self.state.lock().unwrap().available = available;
    }

    /// Overrides the playing flag directly (bypassing `control`).
    pub fn set_playing(&self, is_playing: bool) {
        self.state.lock().unwrap().probe.is_playing = is_playing;
    }

    /// Returns every transport command received so far.
    #[must_use]
    pub fn received_controls(&self) -> Vec<MediaCommand> {
        self.state.lock().unwrap().controls.clone()
    }
}

impl MediaSource for ScriptedMediaSource {
    fn query(&self) -> Result<MediaProbe, MediaSourceError> {
        let mut state = self.state.lock().unwrap();
        if !state.available {
            return Err(MediaSourceError::Unavailable("scripted: offline".to_string()));
        }
        if state.probe.is_playing {
            let next = state.probe.current_time + 1.0;
            state.probe.current_time = next.min(state.probe.duration);
        }
        Ok(state.probe.clone())
    }

    fn control(&self, command: MediaCommand) -> Result<(), MediaSourceError> {
        let mut state = self.state.lock().unwrap();
        if !state.available {
            return Err(MediaSourceError::ControlFailed("scripted: offline".to_string()));
        }
        state.controls.push(command);
        match command {
            MediaCommand::PlayPause => {
                state.probe.is_playing = !state.probe.is_playing;
            }
            MediaCommand::Next | MediaCommand::Previous => {
                state.probe.current_time = 0.0;
            }
            MediaCommand::Seek { seconds } => {
                state.probe.current_time = seconds.clamp(0.0, state.probe.duration);
            }
        }
        Ok(())
    }
}
