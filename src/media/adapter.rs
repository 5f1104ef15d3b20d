//! Media session adapter.
//!
//! Owns the local `MediaSnapshot` and keeps it loosely synchronized with
//! the external source by polling at a fixed interval. The adapter never
//! assumes a transport command succeeded: `play_pause` flips the local
//! flag optimistically to avoid perceived input lag, and the next poll
//! result wins regardless.

use std::sync::{Arc, Mutex};

use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{debug, warn};

use crate::bus::{IsletBus, Subscription};
use crate::types::{MediaCommand, MediaSnapshot};

use super::source::MediaSource;

// ============================================================================
// MediaSessionAdapter
// ============================================================================

/// Polling adapter owning the media state.
pub struct MediaSessionAdapter {
    /// Local view of the external session, exclusively owned here
    snapshot: MediaSnapshot,
    /// The external surface being observed
    source: Arc<dyn MediaSource>,
    /// Bus for snapshot broadcasts
    bus: IsletBus,
}

impl MediaSessionAdapter {
    /// Creates an adapter in the disconnected state.
    pub fn new(source: Arc<dyn MediaSource>, bus: IsletBus) -> Self {
        Self {
            snapshot: MediaSnapshot::default(),
            source,
            bus,
        }
    }

    /// Returns the current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> MediaSnapshot {
        self.snapshot.clone()
    }

    /// Queries the source once and publishes the resulting snapshot.
    ///
    /// On success the whole snapshot is overwritten from the probe. On
    /// failure the adapter degrades softly: `connected` and `is_playing`
    /// go false but the last-known metadata stays, so the overlay does
    /// not flicker to empty fields while a source is briefly gone.
    pub fn poll(&mut self) {
        match self.source.query() {
            Ok(probe) => {
                self.snapshot.is_playing = probe.is_playing;
                self.snapshot.current_time = probe.current_time;
                self.snapshot.duration = probe.duration;
                self.snapshot.title = probe.title;
                self.snapshot.artist = probe.artist;
                self.snapshot.cover = probe.cover;
                self.snapshot.color = probe.color;
                self.snapshot.connected = true;
            }
            Err(e) => {
                debug!("media poll failed, degrading: {e}");
                self.snapshot.connected = false;
                self.snapshot.is_playing = false;
            }
        }
        self.bus.media_state.publish(&self.snapshot);
    }

    /// Applies a command received on the bus.
    ///
    /// Commands are forwarded to the external source; delivery failures
    /// are logged and swallowed (the next poll reports reality anyway).
    pub fn apply(&mut self, command: MediaCommand) {
        if command == MediaCommand::PlayPause {
            // Optimistic flip so the UI reacts before the next poll
            // confirms; the poll result is authoritative.
            self.snapshot.is_playing = !self.snapshot.is_playing;
            self.bus.media_state.publish(&self.snapshot);
        }

        if let Err(e) = self.source.control(command) {
            warn!("media control {command:?} failed: {e}");
        }
    }
}

impl std::fmt::Debug for MediaSessionAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaSessionAdapter")
            .field("snapshot", &self.snapshot)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Wiring
// ============================================================================

/// Subscribes a shared adapter to the media command topic.
pub fn attach_commands(
    adapter: &Arc<Mutex<MediaSessionAdapter>>,
    bus: &IsletBus,
) -> Subscription {
    let adapter = Arc::clone(adapter);
    bus.media_commands.subscribe(move |command| {
        adapter.lock().unwrap().apply(*command);
    })
}

/// Runs the poll loop until the task is aborted.
pub async fn run_poller(adapter: Arc<Mutex<MediaSessionAdapter>>, poll_interval_ms: u64) {
    let mut ticker = interval(Duration::from_millis(poll_interval_ms));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;
        adapter.lock().unwrap().poll();
    }
}

// ============================================================================
// Tests
// ============================================================================
