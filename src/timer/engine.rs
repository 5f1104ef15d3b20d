//! Focus-timer engine.
//!
//! The engine exclusively owns the `TimerSnapshot`; the overlay never
//! mutates it directly and only issues `TimerCommand`s over the bus.
//! Every mutating operation follows the same sequence:
//!
//! 1. update state
//! 2. persist the snapshot best-effort (failures are swallowed)
//! 3. publish a fresh snapshot on the `timer_state` topic
//!
//! On completion (countdown reaching zero) the engine additionally plays
//! the chime and emits exactly one `TimerCompleted` broadcast.

use std::sync::{Arc, Mutex};

use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{debug, warn};

use crate::bus::{IsletBus, Subscription};
use crate::sound::ChimePlayer;
use crate::store::Store;
use crate::types::{IsletConfig, TimerCommand, TimerCompleted, TimerSnapshot};

/// Store key for the persisted timer snapshot.
pub const TIMER_STATE_KEY: &str = "focus-timer.state";

// ============================================================================
// TimerEngine
// ============================================================================

/// Countdown engine owning the timer state.
pub struct TimerEngine {
    /// Current state, exclusively owned by this engine
    snapshot: TimerSnapshot,
    /// Upper clamp bound for adjust/set, in seconds
    max_seconds: u32,
    /// Bus for snapshots and completion broadcasts
    bus: IsletBus,
    /// Best-effort persistence
    store: Store,
    /// Completion chime; None when audio is unavailable
    chime: Option<Arc<dyn ChimePlayer>>,
}

impl TimerEngine {
    /// Creates an engine, restoring the last persisted snapshot if present.
    ///
    /// A restored snapshot may be up to one tick stale; that is accepted.
    /// Without one the countdown starts stopped at the configured default.
    pub fn new(
        config: &IsletConfig,
        bus: IsletBus,
        store: Store,
        chime: Option<Arc<dyn ChimePlayer>>,
    ) -> Self {
        let snapshot = store
            .load::<TimerSnapshot>(TIMER_STATE_KEY)
            .unwrap_or_else(|| TimerSnapshot::with_minutes(config.default_minutes));

        Self {
            snapshot,
            max_seconds: config.max_minutes * 60,
            bus,
            store,
            chime,
        }
    }

    /// Returns the current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> TimerSnapshot {
        self.snapshot
    }

    /// Publishes the current snapshot without mutating it.
    ///
    /// Called once after wiring so late-mounted listeners seed their view.
    pub fn announce(&self) {
        self.bus.timer_state.publish(&self.snapshot);
    }

    /// Applies a command received on the bus.
    pub fn apply(&mut self, command: TimerCommand) {
        match command {
            TimerCommand::Toggle => self.toggle(),
            TimerCommand::Stop => self.stop(),
            TimerCommand::Adjust { minutes } => self.adjust(minutes),
            TimerCommand::Set { minutes } => self.set_absolute(minutes),
        }
    }

    /// Flips the running flag.
    ///
    /// A pure flip: two toggles net to a no-op. Toggling at zero remaining
    /// flips the flag but ticks stay no-ops until the timer is reset or set.
    pub fn toggle(&mut self) {
        self.snapshot.is_running = !self.snapshot.is_running;
        self.commit();
    }

    /// Stops the countdown and resets to the base duration. Idempotent.
    pub fn stop(&mut self) {
        self.snapshot.is_running = false;
        self.snapshot.time_left_seconds = self.snapshot.total_seconds;
        self.commit();
    }

    /// Adds `delta_minutes` to the remaining time, clamped to
    /// `[0, max_minutes * 60]`.
    ///
    /// While stopped the base duration is re-based to the new remaining
    /// time rounded up to the next minute, so the progress ring shows full
    /// after a paused adjustment. While running the base is only raised
    /// when the new remaining time would exceed it.
    pub fn adjust(&mut self, delta_minutes: i32) {
        let new = (i64::from(self.snapshot.time_left_seconds)
            + i64::from(delta_minutes) * 60)
            .clamp(0, i64::from(self.max_seconds));
        // Clamp keeps the value within u32 range.
        let new = u32::try_from(new).unwrap_or(0);

        self.snapshot.time_left_seconds = new;
        if !self.snapshot.is_running || new > self.snapshot.total_seconds {
            self.snapshot.total_seconds = round_up_to_minute(new);
        }
        self.commit();
    }

    /// Replaces the base duration and stops the countdown.
    ///
    /// `minutes == 0` is rejected as a silent no-op; validation belongs to
    /// the caller, the engine is merely defensive. Values above the
    /// configured maximum are clamped to it.
    pub fn set_absolute(&mut self, minutes: u32) {
        if minutes == 0 {
            debug!("rejecting set-absolute with zero minutes");
            return;
        }
        // Clamp in minutes before converting; multiplying first could
        // overflow on an oversized command from the bus.
        let seconds = minutes.min(self.max_seconds / 60) * 60;
        self.snapshot.total_seconds = seconds;
        self.snapshot.time_left_seconds = seconds;
        self.snapshot.is_running = false;
        self.commit();
    }

    /// Advances the countdown by one second.
    ///
    /// No-op while stopped. Reaching zero stops the countdown, plays the
    /// chime and emits exactly one `TimerCompleted`; further ticks do not
    /// decrement or re-emit.
    pub fn tick(&mut self) {
        if !self.snapshot.is_running {
            return;
        }

        if self.snapshot.time_left_seconds == 0 {
            // Running at zero (e.g. toggled after completion): settle to
            // stopped without re-emitting a completion.
            self.snapshot.is_running = false;
            self.commit();
            return;
        }

        self.snapshot.time_left_seconds -= 1;

        if self.snapshot.time_left_seconds == 0 {
            self.snapshot.is_running = false;
            self.commit();
            self.ring_chime();
            self.bus.timer_completed.publish(&TimerCompleted {
                total_seconds: self.snapshot.total_seconds,
            });
        } else {
            self.commit();
        }
    }

    /// Persists and broadcasts the current snapshot.
    fn commit(&self) {
        debug_assert!(self.snapshot.time_left_seconds <= self.snapshot.total_seconds);
        self.store.save(TIMER_STATE_KEY, &self.snapshot);
        self.bus.timer_state.publish(&self.snapshot);
    }

    fn ring_chime(&self) {
        if let Some(chime) = &self.chime {
            if let Err(e) = chime.chime() {
                warn!("completion chime failed: {e}");
            }
        }
    }
}

impl std::fmt::Debug for TimerEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerEngine")
            .field("snapshot", &self.snapshot)
            .field("max_seconds", &self.max_seconds)
            .finish_non_exhaustive()
    }
}

/// Rounds seconds up to the next whole minute.
fn round_up_to_minute(seconds: u32) -> u32 {
    seconds.div_ceil(60) * 60
}

// ============================================================================
// Wiring
// ============================================================================

/// Subscribes a shared engine to the command topic.
///
/// Commands arriving while the returned `Subscription` is alive are applied
/// synchronously; once it drops, commands degrade to silent no-ops by bus
/// semantics.
pub fn attach_commands(engine: &Arc<Mutex<TimerEngine>>, bus: &IsletBus) -> Subscription {
    let engine = Arc::clone(engine);
    bus.timer_commands.subscribe(move |command| {
        engine.lock().unwrap().apply(*command);
    })
}

/// Runs the 1-second tick loop until the task is aborted.
///
/// Spawn this as its own tokio task; dropping the join handle's abort is
/// the teardown path (no tick survives an unmounted engine).
pub async fn run_ticker(engine: Arc<Mutex<TimerEngine>>) {
    let mut ticker = interval(Duration::from_secs(1));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;
        engine.lock().unwrap().tick();
    }
}

// ============================================================================
// Tests
// ============================================================================
