//! Inter-task communication channels
//!
//! Defines the static channels used for communication between Embassy tasks.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;

use povstaff_core::color::RGB8;
use povstaff_core::input::ButtonAction;

use crate::board::NUM_LEDS;

/// Channel capacity for button actions
const BUTTON_CHANNEL_SIZE: usize = 4;

/// One strip's worth of colors, already corrected and dimmed
pub type Frame = [RGB8; NUM_LEDS];

/// Latest frame for the LED task; older frames are overwritten
pub static FRAME: Signal<CriticalSectionRawMutex, Frame> = Signal::new();

/// Classified button presses for the playback task
pub static BUTTON_CHANNEL: Channel<CriticalSectionRawMutex, ButtonAction, BUTTON_CHANNEL_SIZE> =
    Channel::new();
