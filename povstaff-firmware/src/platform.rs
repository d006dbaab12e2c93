//! Engine collaborators backed by embassy
//!
//! The engine renders synchronously; the strip itself is driven by the
//! LED task, so the engine's writer only publishes the finished frame.

use core::convert::Infallible;

use embassy_rp::flash::{Blocking, Flash};
use embassy_rp::peripherals::FLASH;
use embassy_time::Instant;
use povstaff_core::color::{BLACK, RGB8};
use povstaff_core::Pov;
use povstaff_drivers::{BankFileSystem, BmpDecoder, SmartLedStrip};
use povstaff_hal::MonotonicClock;
use smart_leds::SmartLedsWrite;

use crate::board::{FLASH_SIZE, NUM_LEDS};
use crate::channels::{Frame, FRAME};

/// On-board QSPI flash in blocking mode
pub type BankFlash = Flash<'static, FLASH, Blocking, FLASH_SIZE>;

/// Strip as seen by the engine
pub type Strip = SmartLedStrip<FramePublisher>;

/// The POV engine as wired on this board
pub type Engine = Pov<Strip, BmpDecoder<'static>, BankFileSystem<BankFlash>, EmbassyClock, NUM_LEDS>;

/// `SmartLedsWrite` that hands complete frames to the LED task
pub struct FramePublisher;

impl SmartLedsWrite for FramePublisher {
    type Error = Infallible;
    type Color = RGB8;

    fn write<T, I>(&mut self, iterator: T) -> Result<(), Self::Error>
    where
        T: IntoIterator<Item = I>,
        I: Into<Self::Color>,
    {
        let mut frame: Frame = [BLACK; NUM_LEDS];
        for (slot, color) in frame.iter_mut().zip(iterator) {
            *slot = color.into();
        }
        FRAME.signal(frame);
        Ok(())
    }
}

/// Microseconds since boot from the embassy time driver
pub struct EmbassyClock;

impl MonotonicClock for EmbassyClock {
    fn now_micros(&self) -> u64 {
        Instant::now().as_micros()
    }
}
