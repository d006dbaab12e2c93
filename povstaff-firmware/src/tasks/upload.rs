//! Upload task
//!
//! Receives a complete image bank over UART0 and programs it into the
//! bank partition. The engine is not started in this mode, so a device
//! with blank or corrupt flash can always be provisioned.
//!
//! A transfer that goes quiet for `IDLE_TIMEOUT` is abandoned and the
//! next byte is taken as the start of a new bank.

use defmt::*;
use embassy_rp::uart::BufferedUartRx;
use embassy_time::{with_timeout, Duration, Timer};
use embedded_io_async::Read;

use povstaff_core::color::{BLACK, BLUE, GREEN, RED, RGB8};
use povstaff_core::engine::BlinkSequence;
use povstaff_core::traits::LedDriver;
use povstaff_drivers::{BankFileSystem, BankProgrammer, SmartLedStrip};
use povstaff_hal::FileSystem;

use crate::board::{BANK_PARTITION, NUM_LEDS};
use crate::platform::{BankFlash, FramePublisher, Strip};

/// Buffer size for UART receive
const RX_CHUNK: usize = 256;

/// Silence that ends an unfinished transfer
const IDLE_TIMEOUT: Duration = Duration::from_secs(2);

#[embassy_executor::task]
pub async fn upload_task(mut rx: BufferedUartRx, fs: BankFileSystem<BankFlash>, brightness: u8) {
    let identity = fs.identity();
    info!(
        "Upload mode: flash JEDEC id {=u32:#x}, bank partition {} bytes",
        identity.jedec_id, identity.capacity
    );

    let mut strip = SmartLedStrip::new(FramePublisher);
    LedDriver::<NUM_LEDS>::set_brightness(&mut strip, brightness);
    blink(&mut strip, BLUE).await;

    let mut programmer = BankProgrammer::new(fs.release(), BANK_PARTITION);
    let mut buf = [0u8; RX_CHUNK];
    let mut last_decile = 0;

    info!("Waiting for bank");
    loop {
        let n = match with_timeout(IDLE_TIMEOUT, rx.read(&mut buf)).await {
            Ok(Ok(n)) => n,
            Ok(Err(e)) => {
                warn!("UART error: {}", e);
                continue;
            }
            Err(_) => {
                let progress = programmer.progress();
                if progress.received > 0 {
                    warn!("Transfer stalled after {} bytes, discarding", progress.received);
                    programmer.reset();
                    last_decile = 0;
                }
                continue;
            }
        };

        match programmer.write(&buf[..n]) {
            Ok(progress) if progress.is_complete() => {
                info!("Bank programmed: {} bytes", progress.received);
                let mut fs = BankFileSystem::new(programmer.release(), BANK_PARTITION, identity.jedec_id);
                let ok = match fs.mount() {
                    Ok(()) => {
                        info!("Bank holds {} files", fs.file_count());
                        true
                    }
                    Err(e) => {
                        error!("Programmed bank does not mount: {}", e);
                        false
                    }
                };
                programmer = BankProgrammer::new(fs.release(), BANK_PARTITION);
                last_decile = 0;
                blink(&mut strip, if ok { GREEN } else { RED }).await;
            }
            Ok(progress) => {
                let decile = progress.percent() / 10;
                if progress.total.is_some() && decile != last_decile {
                    info!("Upload {}% ({} bytes)", progress.percent(), progress.received);
                    last_decile = decile;
                }
            }
            Err(e) => {
                error!("Upload rejected: {}", e);
                programmer.reset();
                last_decile = 0;
                blink(&mut strip, RED).await;
            }
        }
    }
}

/// Run the blink alert straight on the strip
async fn blink(strip: &mut Strip, color: RGB8) {
    let mut pixels = [BLACK; NUM_LEDS];
    for step in BlinkSequence::new(color) {
        step.frame.render(&mut pixels);
        if let Err(e) = strip.write(&pixels) {
            warn!("Blink frame failed: {}", e);
        }
        if step.hold_ms > 0 {
            Timer::after_millis(step.hold_ms as u64).await;
        }
    }
}
