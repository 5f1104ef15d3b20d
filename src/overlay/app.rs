//! Overlay app states.

use serde::{Deserialize, Serialize};

/// The set of states the overlay can show. Exactly one is active at a time.
///
/// `Idle` and `Menu` are the only two states reachable from each other
/// without a content-swap animation; every other transition runs the
/// three-phase hide/swap/show sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlayApp {
    /// Collapsed pill, no content
    Idle,
    /// The hub every app's back action returns to
    Menu,
    /// Music transport panel
    Music,
    /// Translation panel
    Translate,
    /// Focus-timer panel
    FocusTimer,
    /// AI chat panel
    AskAi,
    /// Camera panel (pinned)
    Camera,
    /// Calendar panel
    Calendar,
    /// Calculator panel (pinned)
    Calculator,
}

impl OverlayApp {
    /// Every state, for table-driven tests and iteration.
    pub const ALL: [Self; 9] = [
        Self::Idle,
        Self::Menu,
        Self::Music,
        Self::Translate,
        Self::FocusTimer,
        Self::AskAi,
        Self::Camera,
        Self::Calendar,
        Self::Calculator,
    ];

    /// Returns the string representation of the state.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Menu => "menu",
            Self::Music => "music",
            Self::Translate => "translate",
            Self::FocusTimer => "focus_timer",
            Self::AskAi => "ask_ai",
            Self::Camera => "camera",
            Self::Calendar => "calendar",
            Self::Calculator => "calculator",
        }
    }

    /// Pinned states never auto-collapse on pointer leave; the user must
    /// explicitly back out of them.
    #[must_use]
    pub fn is_pinned(&self) -> bool {
        matches!(self, Self::Camera | Self::Calculator)
    }

    /// True for the `Idle`/`Menu` pair, which swap instantly between each
    /// other (neither renders per-app content worth cross-fading).
    #[must_use]
    pub fn is_chrome(&self) -> bool {
        matches!(self, Self::Idle | Self::Menu)
    }

    /// True if entering this state updates the persisted hover-restore
    /// target (`Idle` and `Menu` are never remembered).
    #[must_use]
    pub fn is_remembered(&self) -> bool {
        !self.is_chrome()
    }
}

impl Default for OverlayApp {
    fn default() -> Self {
        Self::Idle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_idle() {
        assert_eq!(OverlayApp::default(), OverlayApp::Idle);
    }

    #[test]
    fn test_pinned_states() {
        assert!(OverlayApp::Camera.is_pinned());
        assert!(OverlayApp::Calculator.is_pinned());
        for app in OverlayApp::ALL {
            if !matches!(app, OverlayApp::Camera | OverlayApp::Calculator) {
                assert!(!app.is_pinned(), "{app:?} must not be pinned");
            }
        }
    }

    #[test]
    fn test_chrome_states() {
        assert!(OverlayApp::Idle.is_chrome());
        assert!(OverlayApp::Menu.is_chrome());
        assert!(!OverlayApp::Music.is_chrome());
    }

    #[test]
    fn test_remembered_is_complement_of_chrome() {
        for app in OverlayApp::ALL {
            assert_eq!(app.is_remembered(), !app.is_chrome());
        }
    }

    #[test]
    fn test_all_covers_every_state() {
        assert_eq!(OverlayApp::ALL.len(), 9);
    }

    #[test]
    fn test_serialize_snake_case() {
        let json = serde_json::to_string(&OverlayApp::FocusTimer).unwrap();
        assert_eq!(json, "\"focus_timer\"");

        let back: OverlayApp = serde_json::from_str("\"ask_ai\"").unwrap();
        assert_eq!(back, OverlayApp::AskAi);
    }

    #[test]
    fn test_as_str() {
        for app in OverlayApp::ALL {
            assert!(!app.as_str().is_empty());
        }
        assert_eq!(OverlayApp::Calculator.as_str(), "calculator");
    }
}
