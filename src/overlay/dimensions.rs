//! Per-state overlay dimensions.
//!
//! A pure function from `(state, session flags)` to a fixed size. No
//! side effects, no stored state: the overlay shell re-derives its frame
//! from this table on every render.

use super::app::OverlayApp;

/// Overlay frame size for one state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    /// Frame width in logical pixels
    pub width: u32,
    /// Frame height in logical pixels
    pub height: u32,
    /// Corner radius in logical pixels
    pub radius: u32,
}

impl Dimensions {
    const fn new(width: u32, height: u32, radius: u32) -> Self {
        Self {
            width,
            height,
            radius,
        }
    }
}

/// Background-session flags that widen the compact states.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionFlags {
    /// A music session is actively playing
    pub music_playing: bool,
    /// The focus timer is counting down
    pub timer_running: bool,
    /// An AI API key is configured
    pub has_api_key: bool,
}

impl SessionFlags {
    fn has_background_session(self) -> bool {
        self.music_playing || self.timer_running
    }
}

/// Derives the overlay frame for a state.
///
/// Deterministic: identical inputs always yield identical output. `Idle`
/// and `Menu` reserve extra width while a background session is active so
/// the inline status chip fits; `AskAi` shrinks to a key-prompt card when
/// no API key is configured.
#[must_use]
pub fn dimensions(app: OverlayApp, flags: SessionFlags) -> Dimensions {
    match app {
        OverlayApp::Idle => {
            if flags.has_background_session() {
                Dimensions::new(184, 36, 18)
            } else {
                Dimensions::new(122, 36, 18)
            }
        }
        OverlayApp::Menu => {
            if flags.has_background_session() {
                Dimensions::new(344, 148, 24)
            } else {
                Dimensions::new(320, 148, 24)
            }
        }
        OverlayApp::Music => Dimensions::new(360, 172, 28),
        OverlayApp::Translate => Dimensions::new(380, 220, 24),
        OverlayApp::FocusTimer => Dimensions::new(320, 204, 28),
        OverlayApp::AskAi => {
            if flags.has_api_key {
                Dimensions::new(420, 320, 24)
            } else {
                Dimensions::new(360, 160, 24)
            }
        }
        OverlayApp::Camera => Dimensions::new(420, 340, 24),
        OverlayApp::Calendar => Dimensions::new(360, 300, 24),
        OverlayApp::Calculator => Dimensions::new(300, 384, 24),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_flag_combinations() -> Vec<SessionFlags> {
        let mut combos = Vec::new();
        for music in [false, true] {
            for timer in [false, true] {
                for key in [false, true] {
                    combos.push(SessionFlags {
                        music_playing: music,
                        timer_running: timer,
                        has_api_key: key,
                    });
                }
            }
        }
        combos
    }

    #[test]
    fn test_pure_identical_inputs_identical_output() {
        for app in OverlayApp::ALL {
            for flags in all_flag_combinations() {
                assert_eq!(dimensions(app, flags), dimensions(app, flags));
            }
        }
    }

    #[test]
    fn test_defined_for_every_state_and_flag_combo() {
        for app in OverlayApp::ALL {
            for flags in all_flag_combinations() {
                let dims = dimensions(app, flags);
                assert!(dims.width > 0, "{app:?} {flags:?}");
                assert!(dims.height > 0, "{app:?} {flags:?}");
                assert!(dims.radius > 0, "{app:?} {flags:?}");
            }
        }
    }

    #[test]
    fn test_idle_widens_with_background_session() {
        let quiet = dimensions(OverlayApp::Idle, SessionFlags::default());
        let with_timer = dimensions(
            OverlayApp::Idle,
            SessionFlags {
                timer_running: true,
                ..SessionFlags::default()
            },
        );
        let with_music = dimensions(
            OverlayApp::Idle,
            SessionFlags {
                music_playing: true,
                ..SessionFlags::default()
            },
        );
        assert!(with_timer.width > quiet.width);
        assert_eq!(with_timer, with_music);
    }

    #[test]
    fn test_menu_widens_with_background_session() {
        let quiet = dimensions(OverlayApp::Menu, SessionFlags::default());
        let busy = dimensions(
            OverlayApp::Menu,
            SessionFlags {
                music_playing: true,
                timer_running: true,
                ..SessionFlags::default()
            },
        );
        assert!(busy.width > quiet.width);
    }

    #[test]
    fn test_ask_ai_depends_on_api_key_only() {
        let without = dimensions(OverlayApp::AskAi, SessionFlags::default());
        let with = dimensions(
            OverlayApp::AskAi,
            SessionFlags {
                has_api_key: true,
                ..SessionFlags::default()
            },
        );
        assert!(with.height > without.height);

        // Session flags do not change app panels
        let with_music = dimensions(
            OverlayApp::AskAi,
            SessionFlags {
                music_playing: true,
                ..SessionFlags::default()
            },
        );
        assert_eq!(without, with_music);
    }

    #[test]
    fn test_app_panels_ignore_session_flags() {
        for app in [
            OverlayApp::Music,
            OverlayApp::Translate,
            OverlayApp::FocusTimer,
            OverlayApp::Camera,
            OverlayApp::Calendar,
            OverlayApp::Calculator,
        ] {
            let base = dimensions(app, SessionFlags::default());
            for flags in all_flag_combinations() {
                let mut without_key = flags;
                without_key.has_api_key = false;
                assert_eq!(
                    dimensions(app, without_key),
                    base,
                    "{app:?} must not vary with session flags"
                );
            }
        }
    }
}
