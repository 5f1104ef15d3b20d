//! The overlay transition machine.
//!
//! `OverlayMachine` is clock-free: it never reads wall time. Pending
//! phase timers (the 150 ms content swap and the 450 ms hover-exit grace)
//! live as data and are driven by explicit `advance(elapsed)` calls, so
//! tests run against a fake clock and the binary drives the machine from
//! a small interval task.
//!
//! Timing contract:
//! - `Idle ⇄ Menu` swaps instantly, in the same call.
//! - Every other transition hides content at t=0 and swaps the state,
//!   re-showing content, only once the 150 ms phase elapses. No two
//!   states' content is ever visible simultaneously mid-swap.
//! - Pointer leave arms a 450 ms grace timer before collapsing to `Idle`;
//!   re-entry before it fires cancels it. The pinned states (`Camera`,
//!   `Calculator`) never arm it.

use tokio::time::Duration;
use tracing::trace;

use crate::types::{MediaSnapshot, TimerSnapshot};

use super::app::OverlayApp;
use super::dimensions::{dimensions, Dimensions, SessionFlags};

/// Length of the content hide/swap/show phase.
pub const SWAP_PHASE: Duration = Duration::from_millis(150);

/// Grace period between pointer leave and collapse to `Idle`.
pub const HOVER_GRACE: Duration = Duration::from_millis(450);

// ============================================================================
// MachineEvent
// ============================================================================

/// Events the machine reports back to its wiring layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MachineEvent {
    /// A state was entered (instantly or after a swap phase completed)
    Entered(OverlayApp),
    /// The hover-exit grace period expired and a collapse began
    Collapsed,
}

// ============================================================================
// OverlayMachine
// ============================================================================

#[derive(Debug, Clone, Copy)]
struct PendingSwap {
    remaining: Duration,
    target: OverlayApp,
}

/// The overlay state machine.
///
/// Exclusively owns `OverlayApp` and the derived satellite indicators.
/// Timer and media state arrive as read-only snapshots; the machine never
/// mutates them and never publishes anything itself.
#[derive(Debug)]
pub struct OverlayMachine {
    /// Currently active state
    app: OverlayApp,
    /// False only during the hide half of a swap phase
    content_visible: bool,
    /// Hover-restore target, persisted across sessions by the wiring layer
    last_active: OverlayApp,
    /// Pending content swap, if any
    swap: Option<PendingSwap>,
    /// Pending hover-exit collapse, if any
    collapse: Option<Duration>,
    /// Latest timer running flag from the state topic
    timer_running: bool,
    /// Latest playing flag from the state topic
    music_playing: bool,
    /// Sticky session latch: set on first observed playback, cleared only
    /// by the explicit dismiss action
    music_session_active: bool,
    /// Whether an AI API key is configured
    has_api_key: bool,
}

impl OverlayMachine {
    /// Creates a machine in `Idle` with `Menu` as the hover-restore target.
    #[must_use]
    pub fn new(has_api_key: bool) -> Self {
        Self {
            app: OverlayApp::Idle,
            content_visible: true,
            last_active: OverlayApp::Menu,
            swap: None,
            collapse: None,
            timer_running: false,
            music_playing: false,
            music_session_active: false,
            has_api_key,
        }
    }

    /// Seeds the hover-restore target from a persisted value.
    ///
    /// Chrome states (`Idle`/`Menu`) are never remembered and are ignored.
    pub fn seed_last_active(&mut self, app: OverlayApp) {
        if app.is_remembered() {
            self.last_active = app;
        }
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    /// Currently active state.
    #[must_use]
    pub fn app(&self) -> OverlayApp {
        self.app
    }

    /// False only during the hide half of a swap phase.
    #[must_use]
    pub fn content_visible(&self) -> bool {
        self.content_visible
    }

    /// The hover-restore target.
    #[must_use]
    pub fn last_active(&self) -> OverlayApp {
        self.last_active
    }

    /// True while the sticky music-session latch is set.
    #[must_use]
    pub fn music_session_active(&self) -> bool {
        self.music_session_active
    }

    /// Timer sphere: visible while the timer runs and its own panel
    /// is not the active state.
    #[must_use]
    pub fn timer_sphere_visible(&self) -> bool {
        self.timer_running && self.app != OverlayApp::FocusTimer
    }

    /// Music sphere: visible while the sticky session latch is set and
    /// the music panel is not the active state. Pausing does not hide
    /// it; only the explicit dismiss does.
    #[must_use]
    pub fn music_sphere_visible(&self) -> bool {
        self.music_session_active && self.app != OverlayApp::Music
    }

    /// Current frame size, derived from the state and session flags.
    #[must_use]
    pub fn dimensions(&self) -> Dimensions {
        dimensions(self.app, self.session_flags())
    }

    fn session_flags(&self) -> SessionFlags {
        SessionFlags {
            music_playing: self.music_playing,
            timer_running: self.timer_running,
            has_api_key: self.has_api_key,
        }
    }

    /// Time until the nearest pending phase timer fires, if any.
    ///
    /// Drivers sleep against this instead of polling blindly.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        match (self.swap.map(|s| s.remaining), self.collapse) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (Some(a), None) => Some(a),
            (None, Some(b)) => Some(b),
            (None, None) => None,
        }
    }

    // ------------------------------------------------------------------------
    // Inputs
    // ------------------------------------------------------------------------

    /// Requests a transition to `target`.
    ///
    /// `Idle ⇄ Menu` applies in the same call; everything else starts the
    /// 150 ms swap phase. A request contradicting a pending swap cancels
    /// and replaces it. Any pending collapse is cancelled.
    pub fn open(&mut self, target: OverlayApp) -> Vec<MachineEvent> {
        self.collapse = None;

        if let Some(swap) = &self.swap {
            if swap.target == target {
                return Vec::new();
            }
            // Contradicting request: restart the phase toward the new
            // target; content is already hidden.
            trace!("replacing pending swap with {}", target.as_str());
            self.swap = Some(PendingSwap {
                remaining: SWAP_PHASE,
                target,
            });
            return Vec::new();
        }

        if target == self.app {
            return Vec::new();
        }

        if self.app.is_chrome() && target.is_chrome() {
            trace!("instant transition {} -> {}", self.app.as_str(), target.as_str());
            self.app = target;
            self.content_visible = true;
            return vec![MachineEvent::Entered(target)];
        }

        trace!("phased transition {} -> {}", self.app.as_str(), target.as_str());
        self.content_visible = false;
        self.swap = Some(PendingSwap {
            remaining: SWAP_PHASE,
            target,
        });
        Vec::new()
    }

    /// Pointer entered the overlay.
    ///
    /// Cancels any pending collapse. From `Idle` (or mid-collapse toward
    /// it) the overlay re-opens the persisted last-active app rather than
    /// always the menu.
    pub fn pointer_enter(&mut self) -> Vec<MachineEvent> {
        self.collapse = None;

        let closing = self.swap.is_some_and(|s| s.target == OverlayApp::Idle);
        if closing || (self.app == OverlayApp::Idle && self.swap.is_none()) {
            let target = self.last_active;
            return self.open(target);
        }
        Vec::new()
    }

    /// Pointer left the overlay.
    ///
    /// Arms the 450 ms grace timer, except in the pinned states and when
    /// the overlay is already (heading) idle.
    pub fn pointer_leave(&mut self) {
        let effective = self.swap.map_or(self.app, |s| s.target);
        if effective.is_pinned() {
            trace!("{} is pinned, ignoring pointer leave", effective.as_str());
            return;
        }
        if effective == OverlayApp::Idle {
            return;
        }
        self.collapse = Some(HOVER_GRACE);
    }

    /// Back action: every app returns to the `Menu` hub, not to `Idle`.
    pub fn back(&mut self) -> Vec<MachineEvent> {
        self.open(OverlayApp::Menu)
    }

    /// Explicit close action: collapse to `Idle` immediately (no grace).
    pub fn close(&mut self) -> Vec<MachineEvent> {
        self.open(OverlayApp::Idle)
    }

    /// Clears the sticky music-session latch.
    pub fn dismiss_music_session(&mut self) {
        self.music_session_active = false;
    }

    /// Read-only timer snapshot from the state topic.
    pub fn on_timer_state(&mut self, snapshot: &TimerSnapshot) {
        self.timer_running = snapshot.is_running;
    }

    /// Read-only media snapshot from the state topic.
    ///
    /// The first observed playback sets the sticky session latch; later
    /// pauses leave it set.
    pub fn on_media_state(&mut self, snapshot: &MediaSnapshot) {
        self.music_playing = snapshot.is_playing;
        if snapshot.is_playing {
            self.music_session_active = true;
        }
    }

    // ------------------------------------------------------------------------
    // Clock
    // ------------------------------------------------------------------------

    /// Advances the machine's fake clock by `elapsed`, firing any phase
    /// timers that come due (in order, including cascades such as a
    /// collapse that starts a swap toward `Idle`).
    pub fn advance(&mut self, elapsed: Duration) -> Vec<MachineEvent> {
        let mut events = Vec::new();
        let mut budget = elapsed;

        loop {
            let Some(next) = self.next_deadline() else {
                break;
            };
            if next > budget {
                self.shift_timers(budget);
                break;
            }

            self.shift_timers(next);
            budget -= next;

            if self.swap.is_some_and(|s| s.remaining.is_zero()) {
                let target = self.swap.take().map(|s| s.target).unwrap_or(self.app);
                self.app = target;
                self.content_visible = true;
                if target.is_remembered() {
                    self.last_active = target;
                }
                events.push(MachineEvent::Entered(target));
            }

            if self.collapse.is_some_and(|c| c.is_zero()) {
                self.collapse = None;
                events.push(MachineEvent::Collapsed);
                if self.app.is_chrome() {
                    self.app = OverlayApp::Idle;
                    self.content_visible = true;
                } else {
                    // Collapsing out of an app still honors the swap rule.
                    self.content_visible = false;
                    self.swap = Some(PendingSwap {
                        remaining: SWAP_PHASE,
                        target: OverlayApp::Idle,
                    });
                }
            }
        }

        events
    }

    fn shift_timers(&mut self, by: Duration) {
        if let Some(swap) = &mut self.swap {
            swap.remaining = swap.remaining.saturating_sub(by);
        }
        if let Some(collapse) = &mut self.collapse {
            *collapse = collapse.saturating_sub(by);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
