//! Media session adapter for the islet overlay core.
//!
//! The overlay does not own playback; an external, best-effort media
//! surface (in the original product, the active browser tab) does. This
//! module contains:
//! - `source`: the request/response seam to that external surface
//! - `adapter`: the polling adapter that owns the local `MediaSnapshot`

pub mod adapter;
pub mod source;

pub use adapter::{attach_commands, run_poller, MediaSessionAdapter};
pub use source::{MediaProbe, MediaSource, MediaSourceError, NullMediaSource, ScriptedMediaSource};
