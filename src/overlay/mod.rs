//! Overlay state machine ("Dynamic Island") for the islet core.
//!
//! The overlay is the floating multi-app control surface:
//! - `app`: the set of overlay states (idle, menu hub, mini-apps)
//! - `dimensions`: pure per-state size derivation
//! - `machine`: the clock-free transition machine (swap phases, hover
//!   grace, pinned states, satellite indicators)
//! - `island`: the wiring component that connects the machine to the bus
//!   and to persistence

pub mod app;
pub mod dimensions;
pub mod island;
pub mod machine;

pub use app::OverlayApp;
pub use dimensions::{dimensions, Dimensions, SessionFlags};
pub use island::{run_overlay, Island, LAST_ACTIVE_KEY};
pub use machine::{MachineEvent, OverlayMachine, HOVER_GRACE, SWAP_PHASE};
