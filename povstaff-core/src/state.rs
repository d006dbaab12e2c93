//! Playback state
//!
//! The engine does not store this enum; it is derived from the playlist
//! length and the pause flag so the two can never disagree.

/// Engine playback states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PlaybackState {
    /// Playlist has no entries; navigation and line advance do nothing
    Empty,
    /// Normal playback
    Ready,
    /// Line advance and image navigation suspended
    Paused,
}

impl PlaybackState {
    /// Resolve the state from its inputs
    ///
    /// An empty playlist reads as `Empty` even while paused.
    pub fn resolve(playlist_empty: bool, paused: bool) -> Self {
        match (playlist_empty, paused) {
            (true, _) => PlaybackState::Empty,
            (false, true) => PlaybackState::Paused,
            (false, false) => PlaybackState::Ready,
        }
    }

    /// Check if scanlines advance in this state
    pub fn advances_lines(&self) -> bool {
        matches!(self, PlaybackState::Ready)
    }

    /// Check if `next_image` moves the cursor in this state
    pub fn allows_navigation(&self) -> bool {
        matches!(self, PlaybackState::Ready)
    }

    pub fn name(&self) -> &'static str {
        match self {
            PlaybackState::Empty => "empty",
            PlaybackState::Ready => "ready",
            PlaybackState::Paused => "paused",
        }
    }
}
