//! Chime player implementation using rodio.
//!
//! The completion chime is synthesized (two short sine notes) rather than
//! shipped as an embedded asset, so the binary carries no audio data.
//!
//! rodio's output stream is not `Send`, so it lives on a dedicated audio
//! thread; `RodioChime` itself is a cheap channel-backed handle that can be
//! shared across tasks. The thread exits when the handle is dropped.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

use rodio::source::{SineWave, Source};
use rodio::{OutputStream, Sink};
use tracing::{debug, warn};

use super::error::SoundError;

/// Frequencies of the two chime notes (A5, E6).
const CHIME_NOTES_HZ: [f32; 2] = [880.0, 1318.5];

/// Length of each chime note.
const NOTE_LENGTH: Duration = Duration::from_millis(160);

/// A chime player that uses rodio for audio playback.
///
/// Thread-safe and shareable via `Arc`. Playback is non-blocking: `chime`
/// posts a request to the audio thread and returns immediately.
pub struct RodioChime {
    /// Requests to the audio thread; dropping the sender stops the thread.
    requests: Mutex<mpsc::Sender<()>>,
    /// Whether chime playback is disabled.
    disabled: AtomicBool,
}

impl RodioChime {
    /// Creates a new chime player and its audio thread.
    ///
    /// # Errors
    ///
    /// Returns `SoundError::DeviceNotAvailable` if no audio output device
    /// is available.
    pub fn new(disabled: bool) -> Result<Self, SoundError> {
        let (requests, rx) = mpsc::channel::<()>();
        let (ready_tx, ready_rx) = mpsc::channel::<Result<(), SoundError>>();

        thread::Builder::new()
            .name("islet-audio".to_string())
            .spawn(move || audio_thread(rx, &ready_tx))
            .map_err(|e| SoundError::StreamError(e.to_string()))?;

        // The thread reports whether the output stream came up before any
        // chime request is accepted.
        match ready_rx.recv() {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(e),
            Err(_) => {
                return Err(SoundError::DeviceNotAvailable(
                    "audio thread exited during startup".to_string(),
                ))
            }
        }

        debug!("audio output stream initialized");

        Ok(Self {
            requests: Mutex::new(requests),
            disabled: AtomicBool::new(disabled),
        })
    }

    /// Creates a player that never produces sound.
    ///
    /// # Errors
    ///
    /// May still fail if the audio stream cannot be initialized.
    pub fn muted() -> Result<Self, SoundError> {
        Self::new(true)
    }

    /// Plays the completion chime, non-blocking.
    ///
    /// # Errors
    ///
    /// Returns an error if the audio thread is gone.
    pub fn chime(&self) -> Result<(), SoundError> {
        if self.disabled.load(Ordering::Relaxed) {
            debug!("chime disabled, skipping");
            return Ok(());
        }

        self.requests
            .lock()
            .unwrap()
            .send(())
            .map_err(|_| SoundError::PlaybackError("audio thread gone".to_string()))
    }

    /// Returns true if chime playback is currently disabled.
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.disabled.load(Ordering::Relaxed)
    }

    /// Enables chime playback.
    pub fn enable(&self) {
        self.disabled.store(false, Ordering::Relaxed);
    }

    /// Disables chime playback.
    pub fn disable(&self) {
        self.disabled.store(true, Ordering::Relaxed);
    }
}

impl std::fmt::Debug for RodioChime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RodioChime")
            .field("disabled", &self.disabled.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

/// Owns the rodio output stream and serves chime requests until every
/// sender handle has been dropped.
fn audio_thread(rx: mpsc::Receiver<()>, ready_tx: &mpsc::Sender<Result<(), SoundError>>) {
    let (stream, handle) = match OutputStream::try_default() {
        Ok(pair) => pair,
        Err(e) => {
            let _ = ready_tx.send(Err(SoundError::DeviceNotAvailable(e.to_string())));
            return;
        }
    };
    // Keep the stream alive for the lifetime of the thread
    let _stream = stream;
    let _ = ready_tx.send(Ok(()));

    while rx.recv().is_ok() {
        let sink = match Sink::try_new(&handle) {
            Ok(sink) => sink,
            Err(e) => {
                warn!("failed to create audio sink: {e}");
                continue;
            }
        };
        for freq in CHIME_NOTES_HZ {
            let note = SineWave::new(freq)
                .take_duration(NOTE_LENGTH)
                .amplify(0.35);
            sink.append(note);
        }
        sink.detach();
        debug!("completion chime started (detached)");
    }
}

/// Creates a chime player, returning None if audio is unavailable.
///
/// If audio initialization fails, a warning is logged and None is returned;
/// the timer engine then completes sessions silently.
#[must_use]
pub fn try_create_chime(disabled: bool) -> Option<Arc<RodioChime>> {
    match RodioChime::new(disabled) {
        Ok(player) => Some(Arc::new(player)),
        Err(e) => {
            warn!("audio not available, chime disabled: {e}");
            None
        }
    }
}
