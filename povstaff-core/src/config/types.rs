//! Configuration type definitions
//!
//! Memory limits are fixed at compile time; everything an operator may
//! want to change per staff lives in [`StaffConfig`].

use heapless::String;

/// Bytes reserved for decoded image data
pub const BUF_SIZE: usize = 64000;

/// Maximum manifest line length in characters
pub const MAX_LINE_LENGTH: usize = 32;

/// Maximum number of playlist entries
pub const MAX_FILES: usize = 50;

/// Filename storage size including the terminator slot
pub const MAX_FILENAME: usize = 31;

/// Maximum filename length in characters
pub const MAX_FILENAME_LEN: usize = MAX_FILENAME - 1;

/// Maximum length of a configured path (manifest location)
pub const MAX_PATH_LEN: usize = 32;

/// Hold time of each blink phase
pub const BLINK_HOLD_MS: u32 = 500;

/// Number of dark/lit cycles in a blink
pub const BLINK_REPEATS: u8 = 2;

/// Every n-th pixel is lit during a blink
pub const BLINK_SPACING: usize = 8;

/// Staff operating mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum OperatingMode {
    /// Normal playback with color-corrected rendering
    #[default]
    Show = 0,
    /// Diagnostic playback
    Debug = 1,
    /// Storage is exposed to a host for loading image files
    Upload = 2,
}

impl OperatingMode {
    /// Get the mode as a byte value
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Create a mode from a byte value
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(OperatingMode::Show),
            1 => Some(OperatingMode::Debug),
            2 => Some(OperatingMode::Upload),
            _ => None,
        }
    }

    /// Parse a mode name as written in `staff.toml`
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "show" => Some(OperatingMode::Show),
            "debug" => Some(OperatingMode::Debug),
            "upload" => Some(OperatingMode::Upload),
            _ => None,
        }
    }

    /// Mode name as written in `staff.toml`
    pub fn name(self) -> &'static str {
        match self {
            OperatingMode::Show => "show",
            OperatingMode::Debug => "debug",
            OperatingMode::Upload => "upload",
        }
    }

    /// Check if this mode drives the LEDs from the playlist
    pub fn plays_images(self) -> bool {
        matches!(self, OperatingMode::Show | OperatingMode::Debug)
    }
}

/// Runtime staff configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StaffConfig {
    /// Operating mode selected at boot
    pub mode: OperatingMode,
    /// Global LED brightness (0-255)
    pub brightness: u8,
    /// Manifest file listing the images to play
    pub manifest: String<MAX_PATH_LEN>,
    /// Display duration for manifest lines that omit one (ms)
    pub default_duration_ms: u32,
    /// Interval between two scanlines (µs)
    pub line_period_us: u32,
    /// Advance to the next image when an entry's duration elapses
    pub auto_advance: bool,
    /// Apply LED color correction in show mode
    pub color_correction: bool,
}

impl Default for StaffConfig {
    fn default() -> Self {
        let mut manifest = String::new();
        let _ = manifest.push_str("images.txt");
        Self {
            mode: OperatingMode::Show,
            brightness: 64,
            manifest,
            default_duration_ms: 5000,
            line_period_us: 500,
            auto_advance: true,
            color_correction: true,
        }
    }
}
