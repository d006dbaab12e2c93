//! Playback task
//!
//! Drives the engine at the configured line period: one scanline per
//! tick, button handling between lines, and auto-advance when the
//! current entry's display time is up.

use defmt::*;
use embassy_time::{Duration, Instant, Ticker, Timer};

use povstaff_core::color::{ColorCorrection, RED, RGB8, YELLOW};
use povstaff_core::config::{OperatingMode, StaffConfig};
use povstaff_core::engine::BlinkSequence;
use povstaff_core::input::ButtonAction;
use povstaff_core::scheduler::SlideTimer;
use povstaff_core::traits::BitmapSource;
use povstaff_core::PovError;

use crate::channels::BUTTON_CHANNEL;
use crate::platform::Engine;

#[embassy_executor::task]
pub async fn playback_task(pov: &'static mut Engine, config: StaffConfig) {
    info!("Playback task started");

    if let Err(e) = pov.begin(config.mode) {
        error!("Image bank mount failed: {}", e);
        blink(pov, RED).await;
        park().await;
    }

    pov.set_brightness(config.brightness);
    if !config.color_correction {
        pov.set_correction(ColorCorrection::UNCORRECTED);
    }

    load_playlist(pov, &config).await;

    let debug = config.mode == OperatingMode::Debug;
    let mut ticker = Ticker::every(Duration::from_micros(config.line_period_us as u64));
    let mut timer = SlideTimer::new();
    timer.restart(now_us());
    let mut passes: u32 = 0;

    loop {
        ticker.next().await;
        let now = now_us();

        while let Ok(action) = BUTTON_CHANNEL.try_receive() {
            handle_button(pov, &mut timer, action, now);
        }

        match pov.show_next_line() {
            Ok(0) if debug && pov.playlist().current_image().is_some() && !pov.is_paused() => {
                passes = passes.wrapping_add(1);
                if let Some(entry) = pov.current_entry() {
                    debug!("Pass {} of {} done", passes, entry.filename());
                }
            }
            Ok(_) => {}
            Err(e) => warn!("Line render failed: {}", e),
        }

        if config.auto_advance {
            let duration = pov.current_entry().map_or(0, |e| e.duration_ms());
            if timer.is_due(now, duration) {
                advance(pov);
                passes = 0;
                timer.restart(now);
            }
        }
    }
}

/// Read the manifest and report what is playable
async fn load_playlist(pov: &mut Engine, config: &StaffConfig) {
    let manifest = config.manifest.as_str();
    match pov.add_image_list(manifest, config.default_duration_ms) {
        Ok(count) => info!("{} images listed in {}", count, manifest),
        Err(PovError::Io(e)) if pov.playlist().is_empty() => {
            warn!("Cannot read manifest {}: {}", manifest, e);
        }
        Err(e) => {
            // Entries were added but the first one did not load
            warn!("{} images listed, first failed to load: {}", pov.playlist().len(), e);
        }
    }

    if pov.playlist().is_empty() {
        warn!("No images to show");
        blink(pov, YELLOW).await;
    } else if let Some(info) = pov.playlist().current_image().and_then(|s| s.info()) {
        info!("Showing {}x{} image", info.width, info.height);
    }
}

fn handle_button(pov: &mut Engine, timer: &mut SlideTimer, action: ButtonAction, now: u64) {
    match action {
        ButtonAction::Next => {
            advance(pov);
            timer.restart(now);
        }
        ButtonAction::TogglePause => {
            if pov.toggle_pause() {
                timer.pause(now);
                info!("Paused");
            } else {
                timer.resume(now);
                info!("Resumed");
            }
        }
        ButtonAction::Restart => {
            match pov.first_image() {
                Ok(_) => info!("Back to first image"),
                Err(e) => warn!("Failed to load first image: {}", e),
            }
            timer.restart(now);
            if pov.is_paused() {
                timer.pause(now);
            }
        }
    }
}

/// Move to the next entry and log the outcome
fn advance(pov: &mut Engine) {
    let result = pov.next_image();
    let Some(entry) = pov.current_entry() else {
        return;
    };
    match result {
        Ok(Some(info)) => debug!(
            "Now showing {} ({}x{})",
            entry.filename(),
            info.width,
            info.height
        ),
        Ok(None) => {}
        Err(e) => warn!("Failed to load {}: {}", entry.filename(), e),
    }
}

/// Run the blink alert on the async timer
async fn blink(pov: &mut Engine, color: RGB8) {
    for step in BlinkSequence::new(color) {
        if let Err(e) = pov.render_blink_step(step) {
            warn!("Blink frame failed: {}", e);
        }
        if step.hold_ms > 0 {
            Timer::after_millis(step.hold_ms as u64).await;
        }
    }
}

/// Stop here for good; the strip stays dark
async fn park() -> ! {
    loop {
        Timer::after_secs(60).await;
        trace!("Parked");
    }
}

fn now_us() -> u64 {
    Instant::now().as_micros()
}
