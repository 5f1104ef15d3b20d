//! Completion chime playback for the timer engine.
//!
//! The timer's only audible surface is a short chime when a countdown
//! completes. This module provides:
//!
//! - `ChimePlayer`: the playback trait the engine depends on
//! - `RodioChime`: rodio-based implementation with a synthesized chime
//! - `MockChime`: recording mock for tests
//!
//! Playback is best-effort: when no audio device exists the engine keeps
//! working and completions are silent.

mod error;
mod player;

pub use error::SoundError;
pub use player::{try_create_chime, RodioChime};

/// Trait for chime playback implementations.
pub trait ChimePlayer: Send + Sync {
    /// Plays the completion chime. Must be non-blocking.
    ///
    /// # Errors
    ///
    /// Returns an error if playback fails.
    fn chime(&self) -> Result<(), SoundError>;

    /// Returns true if chime playback is disabled.
    fn is_disabled(&self) -> bool;

    /// Enables chime playback.
    fn enable(&self);

    /// Disables chime playback.
    fn disable(&self);
}

impl ChimePlayer for RodioChime {
    fn chime(&self) -> Result<(), SoundError> {
        RodioChime::chime(self)
    }

    fn is_disabled(&self) -> bool {
        RodioChime::is_disabled(self)
    }

    fn enable(&self) {
        RodioChime::enable(self);
    }

    fn disable(&self) {
        RodioChime::disable(self);
    }
}

/// Mock chime player for testing.
#[derive(Debug, Default)]
pub struct MockChime {
    chimes: std::sync::atomic::AtomicUsize,
    disabled: std::sync::atomic::AtomicBool,
    should_fail: std::sync::atomic::AtomicBool,
}

impl MockChime {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes subsequent `chime` calls fail.
    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail
            .store(should_fail, std::sync::atomic::Ordering::SeqCst);
    }

    /// Returns how many chimes were played.
    #[must_use]
    pub fn chime_count(&self) -> usize {
        self.chimes.load(std::sync::atomic::Ordering::SeqCst)
    }
}

impl ChimePlayer for MockChime {
    fn chime(&self) -> Result<(), SoundError> {
        if self.should_fail.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(SoundError::PlaybackError("mock failure".to_string()));
        }
        if self.disabled.load(std::sync::atomic::Ordering::SeqCst) {
            return Ok(());
        }
        self.chimes.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        Ok(())
    }

    fn is_disabled(&self) -> bool {
        self.disabled.load(std::sync::atomic::Ordering::SeqCst)
    }

    fn enable(&self) {
        self.disabled
            .store(false, std::sync::atomic::Ordering::SeqCst);
    }

    fn disable(&self) {
        self.disabled
            .store(true, std::sync::atomic::Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_records_chimes() {
        let mock = MockChime::new();
        assert_eq!(mock.chime_count(), 0);

        mock.chime().unwrap();
        mock.chime().unwrap();
        assert_eq!(mock.chime_count(), 2);
    }

    #[test]
    fn test_mock_disabled_plays_nothing() {
        let mock = MockChime::new();
        mock.disable();
        assert!(mock.is_disabled());

        mock.chime().unwrap();
        assert_eq!(mock.chime_count(), 0);
    }

    #[test]
    fn test_mock_failure() {
        let mock = MockChime::new();
        mock.set_should_fail(true);
        assert!(mock.chime().is_err());
    }
}
