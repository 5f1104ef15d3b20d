//! Island wiring: connects the overlay machine to the bus and the store.
//!
//! `Island` owns the shared `OverlayMachine`, feeds it timer and media
//! snapshots from the bus, persists the hover-restore target, and exposes
//! the interaction surface (pointer events, app requests, transport and
//! timer buttons). Commands triggered from the overlay are published on
//! the bus only after the machine lock is released, so a command handler
//! that publishes fresh state back never re-enters a held lock.

use std::sync::{Arc, Mutex};

use tokio::time::{interval, Duration, Instant, MissedTickBehavior};
use tracing::debug;

use crate::bus::{IsletBus, Subscription};
use crate::store::Store;
use crate::types::{MediaCommand, TimerCommand};

use super::app::OverlayApp;
use super::dimensions::Dimensions;
use super::machine::{MachineEvent, OverlayMachine};

/// Store key for the persisted hover-restore target.
pub const LAST_ACTIVE_KEY: &str = "island.last-active-app";

/// Frame interval for the overlay clock driver.
const FRAME: Duration = Duration::from_millis(25);

// ============================================================================
// Island
// ============================================================================

/// The wired overlay component.
pub struct Island {
    machine: Arc<Mutex<OverlayMachine>>,
    bus: IsletBus,
    store: Store,
    /// Keeps the state-topic handlers registered for the island's lifetime
    _subscriptions: Vec<Subscription>,
}

impl Island {
    /// Wires a new island: restores the hover-restore target from the
    /// store and subscribes to the timer and media state topics.
    pub fn new(bus: IsletBus, store: Store, has_api_key: bool) -> Self {
        let mut machine = OverlayMachine::new(has_api_key);
        if let Some(app) = store.load::<OverlayApp>(LAST_ACTIVE_KEY) {
            debug!("restoring last active app: {}", app.as_str());
            machine.seed_last_active(app);
        }
        let machine = Arc::new(Mutex::new(machine));

        // State handlers only update machine fields, they never publish.
        let timer_machine = Arc::clone(&machine);
        let timer_sub = bus.timer_state.subscribe(move |snapshot| {
            timer_machine.lock().unwrap().on_timer_state(snapshot);
        });

        let media_machine = Arc::clone(&machine);
        let media_sub = bus.media_state.subscribe(move |snapshot| {
            media_machine.lock().unwrap().on_media_state(snapshot);
        });

        Self {
            machine,
            bus,
            store,
            _subscriptions: vec![timer_sub, media_sub],
        }
    }

    // ------------------------------------------------------------------------
    // Interaction surface
    // ------------------------------------------------------------------------

    /// Requests a transition to `app`.
    pub fn open(&self, app: OverlayApp) {
        let events = self.machine.lock().unwrap().open(app);
        self.handle_events(&events);
    }

    /// Pointer entered the overlay region.
    pub fn pointer_enter(&self) {
        let events = self.machine.lock().unwrap().pointer_enter();
        self.handle_events(&events);
    }

    /// Pointer left the overlay region.
    pub fn pointer_leave(&self) {
        self.machine.lock().unwrap().pointer_leave();
    }

    /// Back action: return to the menu hub.
    pub fn back(&self) {
        let events = self.machine.lock().unwrap().back();
        self.handle_events(&events);
    }

    /// Explicit close: collapse to idle without the hover grace.
    pub fn close(&self) {
        let events = self.machine.lock().unwrap().close();
        self.handle_events(&events);
    }

    /// Dismisses the sticky music session indicator.
    pub fn dismiss_music_session(&self) {
        self.machine.lock().unwrap().dismiss_music_session();
    }

    /// Advances the overlay clock, persisting any state that landed.
    pub fn advance(&self, elapsed: Duration) {
        let events = self.machine.lock().unwrap().advance(elapsed);
        self.handle_events(&events);
    }

    // ------------------------------------------------------------------------
    // Overlay-triggered commands
    // ------------------------------------------------------------------------
    //
    // Published with no machine lock held; the handlers on the other side
    // may publish fresh state back synchronously.

    /// Timer panel: start/pause button.
    pub fn toggle_timer(&self) {
        self.bus.timer_commands.publish(&TimerCommand::Toggle);
    }

    /// Timer panel: reset button.
    pub fn stop_timer(&self) {
        self.bus.timer_commands.publish(&TimerCommand::Stop);
    }

    /// Timer panel: +/- minute steppers.
    pub fn adjust_timer(&self, minutes: i32) {
        self.bus.timer_commands.publish(&TimerCommand::Adjust { minutes });
    }

    /// Timer panel: preset selection.
    pub fn set_timer(&self, minutes: u32) {
        self.bus.timer_commands.publish(&TimerCommand::Set { minutes });
    }

    /// Music panel: transport buttons and the seek bar.
    pub fn media_command(&self, command: MediaCommand) {
        self.bus.media_commands.publish(&command);
    }

    // ------------------------------------------------------------------------
    // Render state
    // ------------------------------------------------------------------------

    /// Currently active overlay state.
    #[must_use]
    pub fn app(&self) -> OverlayApp {
        self.machine.lock().unwrap().app()
    }

    /// False during the hide half of a swap phase.
    #[must_use]
    pub fn content_visible(&self) -> bool {
        self.machine.lock().unwrap().content_visible()
    }

    /// Current overlay frame size.
    #[must_use]
    pub fn dimensions(&self) -> Dimensions {
        self.machine.lock().unwrap().dimensions()
    }

    /// Whether the timer satellite sphere is showing.
    #[must_use]
    pub fn timer_sphere_visible(&self) -> bool {
        self.machine.lock().unwrap().timer_sphere_visible()
    }

    /// Whether the music satellite sphere is showing.
    #[must_use]
    pub fn music_sphere_visible(&self) -> bool {
        self.machine.lock().unwrap().music_sphere_visible()
    }

    /// The current hover-restore target.
    #[must_use]
    pub fn last_active(&self) -> OverlayApp {
        self.machine.lock().unwrap().last_active()
    }

    fn handle_events(&self, events: &[MachineEvent]) {
        for event in events {
            match event {
                MachineEvent::Entered(app) if app.is_remembered() => {
                    debug!("entered {}, persisting as last active", app.as_str());
                    self.store.save(LAST_ACTIVE_KEY, app);
                }
                MachineEvent::Entered(_) => {}
                MachineEvent::Collapsed => {
                    debug!("hover grace expired, collapsing");
                }
            }
        }
    }
}

impl std::fmt::Debug for Island {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Island")
            .field("app", &self.app())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Wiring
// ============================================================================

/// Drives the overlay clock until the task is aborted.
///
/// Advances by measured elapsed time rather than the frame constant, so
/// skipped ticks under load do not stretch the machine's phase timers.
pub async fn run_overlay(island: Arc<Island>) {
    let mut ticker = interval(FRAME);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut last = Instant::now();

    loop {
        ticker.tick().await;
        let now = Instant::now();
        island.advance(now - last);
        last = now;
    }
}

// ============================================================================
// Tests
// ============================================================================
