//! Timer engine for the islet overlay core.
//!
//! This module contains the focus-timer countdown:
//! - `engine`: state mutations, persistence, bus publishing and the tick loop

pub mod engine;

pub use engine::{attach_commands, run_ticker, TimerEngine, TIMER_STATE_KEY};
