//! Push-button actions
//!
//! The staff has a single button. What a press does depends on how long
//! it was held.

/// Minimum hold for a long press (ms)
pub const LONG_PRESS_MS: u32 = 800;

/// Minimum hold for a restart press (ms)
pub const RESTART_PRESS_MS: u32 = 3000;

/// Presses shorter than this are contact bounce (ms)
pub const DEBOUNCE_MS: u32 = 20;

/// Action requested by a button press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonAction {
    /// Short press: advance to the next image
    Next,
    /// Long press: pause or resume playback
    TogglePause,
    /// Very long press: back to the first image
    Restart,
}

impl ButtonAction {
    /// Classify a press by how long the button was held
    ///
    /// Returns `None` for bounces.
    pub fn from_hold_ms(held_ms: u32) -> Option<Self> {
        match held_ms {
            ms if ms < DEBOUNCE_MS => None,
            ms if ms < LONG_PRESS_MS => Some(ButtonAction::Next),
            ms if ms < RESTART_PRESS_MS => Some(ButtonAction::TogglePause),
            _ => Some(ButtonAction::Restart),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ButtonAction::Next => "next",
            ButtonAction::TogglePause => "toggle-pause",
            ButtonAction::Restart => "restart",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_boundaries() {
        assert_eq!(ButtonAction::from_hold_ms(0), None);
        assert_eq!(ButtonAction::from_hold_ms(DEBOUNCE_MS - 1), None);
        assert_eq!(ButtonAction::from_hold_ms(DEBOUNCE_MS), Some(ButtonAction::Next));
        assert_eq!(ButtonAction::from_hold_ms(799), Some(ButtonAction::Next));
        assert_eq!(ButtonAction::from_hold_ms(800), Some(ButtonAction::TogglePause));
        assert_eq!(ButtonAction::from_hold_ms(2999), Some(ButtonAction::TogglePause));
        assert_eq!(ButtonAction::from_hold_ms(3000), Some(ButtonAction::Restart));
        assert_eq!(ButtonAction::from_hold_ms(u32::MAX), Some(ButtonAction::Restart));
    }

    #[test]
    fn test_names() {
        assert_eq!(ButtonAction::Next.name(), "next");
        assert_eq!(ButtonAction::Restart.name(), "restart");
    }
}
