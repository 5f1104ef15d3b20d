//! Islet - Dynamic Island overlay core
//!
//! This library provides the headless core behind a floating multi-app
//! overlay ("Dynamic Island") with a focus timer and media controls.
//! It includes:
//! - Overlay state machine with swap phases, hover grace and pinned states
//! - Focus timer engine with clamped adjustments and a completion chime
//! - Media session adapter polling an external playback surface
//! - Typed in-process event bus decoupling the three components
//! - Best-effort key-value persistence for timer state and overlay memory
//! - CLI command parsing

pub mod bus;
pub mod cli;
pub mod media;
pub mod overlay;
pub mod sound;
pub mod store;
pub mod timer;
pub mod types;

// Re-export commonly used types for convenience
pub use types::{
    IsletConfig, MediaCommand, MediaSnapshot, TimerCommand, TimerCompleted, TimerSnapshot,
};

// Re-export bus types
pub use bus::{IsletBus, Subscription, Topic};

// Re-export overlay types
pub use overlay::{dimensions, Dimensions, Island, OverlayApp, OverlayMachine, SessionFlags};

// Re-export engine and adapter types
pub use media::{MediaSessionAdapter, MediaSource, NullMediaSource, ScriptedMediaSource};
pub use sound::{ChimePlayer, MockChime, RodioChime};
pub use store::{JsonFileStore, MemoryStore, StateStore, Store};
pub use timer::TimerEngine;
