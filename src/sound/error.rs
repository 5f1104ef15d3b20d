//! Sound system error types.

use thiserror::Error;

/// Errors that can occur while playing the completion chime.
#[derive(Debug, Error)]
pub enum SoundError {
    /// Audio device is not available (e.g. headless container).
    #[error("audio device not available: {0}")]
    DeviceNotAvailable(String),

    /// Failed to create the audio output sink.
    #[error("failed to create audio sink: {0}")]
    StreamError(String),

    /// Generic playback error.
    #[error("chime playback error: {0}")]
    PlaybackError(String),
}

impl SoundError {
    /// Returns true if this error means no audio hardware is reachable.
    #[must_use]
    pub fn is_device_error(&self) -> bool {
        matches!(self, Self::DeviceNotAvailable(_) | Self::StreamError(_))
    }
}
