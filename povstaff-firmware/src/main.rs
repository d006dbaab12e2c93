//! Povstaff - POV LED Staff Firmware
//!
//! Main firmware binary for RP2040-based persistence-of-vision staffs.
//! Images stored in an on-flash bank are streamed to a WS2812 strip one
//! scanline at a time.
//!
//! Holding the button during reset forces upload mode, so a staff with a
//! broken bank or configuration can always be reprogrammed.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::flash::Flash;
use embassy_rp::gpio::{Input, Pull};
use embassy_rp::peripherals::{PIO0, UART0};
use embassy_rp::pio::Pio;
use embassy_rp::pio_programs::ws2812::{PioWs2812, PioWs2812Program};
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use embassy_time::Timer;
use static_cell::{ConstStaticCell, StaticCell};
use {defmt_rtt as _, panic_probe as _};

use povstaff_core::config::{OperatingMode, BUF_SIZE};
use povstaff_core::Pov;
use povstaff_drivers::{BankFileSystem, BmpDecoder, SmartLedStrip};

use crate::board::{BANK_PARTITION, UPLOAD_BAUDRATE};
use crate::platform::{BankFlash, EmbassyClock, Engine, FramePublisher};

mod board;
mod channels;
mod config;
mod platform;
mod tasks;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
    PIO0_IRQ_0 => embassy_rp::pio::InterruptHandler<PIO0>;
});

// Decode buffer for one image (must live forever)
static DECODE_BUF: ConstStaticCell<[u8; BUF_SIZE]> = ConstStaticCell::new([0; BUF_SIZE]);

static ENGINE: StaticCell<Engine> = StaticCell::new();

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 16]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 1024]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Povstaff firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    // WS2812 strip on PIO0
    let Pio {
        mut common, sm0, ..
    } = Pio::new(p.PIO0, Irqs);
    let program = PioWs2812Program::new(&mut common);
    let ws2812: tasks::Ws2812 = PioWs2812::new(&mut common, sm0, p.DMA_CH0, p.PIN_16, &program);
    spawner.spawn(tasks::led_task(ws2812)).unwrap();

    let button = Input::new(p.PIN_15, Pull::Up);
    // Give the pull-up time to settle before sampling
    Timer::after_millis(10).await;
    let upload_forced = button.is_low();

    // Image bank and configuration
    let mut flash: BankFlash = Flash::new_blocking(p.FLASH);
    let jedec_id = match flash.blocking_jedec_id() {
        Ok(id) => id,
        Err(_) => {
            warn!("Could not read flash JEDEC id");
            0
        }
    };
    let mut fs = BankFileSystem::new(flash, BANK_PARTITION, jedec_id);
    let mut config = config::load_config(&mut fs);

    if upload_forced {
        info!("Button held at boot, forcing upload mode");
        config.mode = OperatingMode::Upload;
    }
    info!("Operating mode: {}", config.mode.name());

    match config.mode {
        OperatingMode::Upload => {
            let uart_config = {
                let mut cfg = UartConfig::default();
                cfg.baudrate = UPLOAD_BAUDRATE;
                cfg
            };
            let tx_buf = TX_BUF.init([0u8; 16]);
            let rx_buf = RX_BUF.init([0u8; 1024]);

            let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
            let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
            let (_tx, rx) = uart.split();
            info!("UART initialized at {} baud", UPLOAD_BAUDRATE);

            spawner
                .spawn(tasks::upload_task(rx, fs, config.brightness))
                .unwrap();
        }
        OperatingMode::Show | OperatingMode::Debug => {
            spawner.spawn(tasks::button_task(button)).unwrap();

            let strip = SmartLedStrip::new(FramePublisher);
            let decoder = BmpDecoder::new(DECODE_BUF.take());
            let engine = ENGINE.init(Pov::new(strip, decoder, fs, EmbassyClock));
            spawner
                .spawn(tasks::playback_task(engine, config))
                .unwrap();
        }
    }

    info!("All tasks spawned, firmware running");

    // All work happens in spawned tasks; PIO0 stays configured while main lives
    loop {
        Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}
