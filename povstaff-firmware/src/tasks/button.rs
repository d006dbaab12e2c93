//! Push-button task
//!
//! Times each press and sends the resulting action to the playback task.
//! The button pulls the pin to ground.

use defmt::*;
use embassy_rp::gpio::Input;
use embassy_time::{Instant, Timer};

use povstaff_core::input::{ButtonAction, DEBOUNCE_MS};

use crate::channels::BUTTON_CHANNEL;

#[embassy_executor::task]
pub async fn button_task(mut button: Input<'static>) {
    info!("Button task started");

    loop {
        button.wait_for_low().await;
        let pressed = Instant::now();
        button.wait_for_high().await;

        let held_ms = pressed.elapsed().as_millis().min(u32::MAX as u64) as u32;
        if let Some(action) = ButtonAction::from_hold_ms(held_ms) {
            debug!("Button held {} ms -> {}", held_ms, action.name());
            if BUTTON_CHANNEL.try_send(action).is_err() {
                warn!("Button queue full, dropping {}", action.name());
            }
        }

        // Let the contacts settle before arming again
        Timer::after_millis(DEBOUNCE_MS as u64).await;
    }
}
