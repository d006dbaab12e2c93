//! LED output task
//!
//! Streams published frames to the WS2812 strip through PIO and DMA.

use defmt::*;
use embassy_rp::peripherals::PIO0;
use embassy_rp::pio_programs::ws2812::PioWs2812;

use crate::board::NUM_LEDS;
use crate::channels::FRAME;

/// WS2812 driver on PIO0, state machine 0
pub type Ws2812 = PioWs2812<'static, PIO0, 0, NUM_LEDS>;

/// LED task - writes the latest frame whenever one is published
#[embassy_executor::task]
pub async fn led_task(mut ws2812: Ws2812) {
    info!("LED task started ({} pixels)", NUM_LEDS);

    loop {
        let frame = FRAME.wait().await;
        ws2812.write(&frame).await;
    }
}
