//! End-to-end playback: bank on flash, BMP decoding, engine, LED strip

use core::cell::Cell;

use heapless::Vec;
use povstaff_core::color::{ColorCorrection, BLACK, RGB8};
use povstaff_core::config::OperatingMode;
use povstaff_core::scheduler::SlideTimer;
use povstaff_core::traits::DecodeError;
use povstaff_core::{PlaybackState, Pov, PovError};
use povstaff_drivers::storage::{BankBuilder, BankFileSystem, BankPartition, BankProgrammer, RamFlash};
use povstaff_drivers::{BmpDecoder, SmartLedStrip};
use povstaff_hal::{FsError, MonotonicClock};
use smart_leds::SmartLedsWrite;

const PIXELS: usize = 8;
const FLASH_SIZE: usize = 64 * 1024;
const PARTITION: BankPartition = BankPartition::new(16 * 1024, 32 * 1024);

struct TestClock {
    now: Cell<u64>,
}

impl MonotonicClock for TestClock {
    fn now_micros(&self) -> u64 {
        self.now.get()
    }
}

#[derive(Default)]
struct Capture {
    frames: usize,
    last: Vec<RGB8, PIXELS>,
}

impl SmartLedsWrite for Capture {
    type Error = ();
    type Color = RGB8;

    fn write<T, I>(&mut self, iterator: T) -> Result<(), Self::Error>
    where
        T: IntoIterator<Item = I>,
        I: Into<Self::Color>,
    {
        self.last.clear();
        for color in iterator {
            self.last.push(color.into()).map_err(|_| ())?;
        }
        self.frames += 1;
        Ok(())
    }
}

/// Solid-color 24-bit bottom-up BMP; row `y` from the top is `(y, 0, 255 - y)`
fn solid_rows_bmp(out: &mut [u8], width: u16, height: u16) -> usize {
    let stride = (width as usize * 3).div_ceil(4) * 4;
    let total = 54 + stride * height as usize;
    out[..total].fill(0);
    out[0..2].copy_from_slice(b"BM");
    out[2..6].copy_from_slice(&(total as u32).to_le_bytes());
    out[10..14].copy_from_slice(&54u32.to_le_bytes());
    out[14..18].copy_from_slice(&40u32.to_le_bytes());
    out[18..22].copy_from_slice(&(width as i32).to_le_bytes());
    out[22..26].copy_from_slice(&(height as i32).to_le_bytes());
    out[26..28].copy_from_slice(&1u16.to_le_bytes());
    out[28..30].copy_from_slice(&24u16.to_le_bytes());

    for y in 0..height as usize {
        let row = 54 + (height as usize - 1 - y) * stride;
        for x in 0..width as usize {
            let px = row + x * 3;
            out[px] = 255 - y as u8;
            out[px + 1] = 0;
            out[px + 2] = y as u8;
        }
    }
    total
}

/// Program a bank with two images, one broken file and a manifest
fn programmed_flash() -> RamFlash<FLASH_SIZE> {
    let mut wide = [0u8; 512];
    let wide_len = solid_rows_bmp(&mut wide, 6, 3);
    let mut tall = [0u8; 512];
    let tall_len = solid_rows_bmp(&mut tall, 2, 5);

    let mut bank = [0u8; 2048];
    let len = BankBuilder::new()
        .with("images.txt", b"# demo\nwide.bmp,2000\nbroken.bmp\ntall.bmp,0\n")
        .and_then(|b| b.with("wide.bmp", &wide[..wide_len]))
        .and_then(|b| b.with("tall.bmp", &tall[..tall_len]))
        .and_then(|b| b.with("broken.bmp", b"BM not really"))
        .and_then(|b| b.write(&mut bank))
        .unwrap();

    // Upload in UART-sized pieces
    let mut programmer = BankProgrammer::new(RamFlash::new(), PARTITION);
    for chunk in bank[..len].chunks(64) {
        programmer.write(chunk).unwrap();
    }
    programmer.finish().unwrap();
    programmer.release()
}

#[test]
fn plays_manifest_from_programmed_bank() {
    let clock = TestClock { now: Cell::new(0) };
    let mut buf = [0u8; 256];
    let fs = BankFileSystem::new(programmed_flash(), PARTITION, 0x00EF_4015);
    let mut pov: Pov<_, _, _, _, PIXELS> = Pov::new(
        SmartLedStrip::new(Capture::default()),
        BmpDecoder::new(&mut buf),
        fs,
        &clock,
    );

    pov.begin(OperatingMode::Debug).unwrap();
    assert_eq!(pov.state(), PlaybackState::Empty);

    assert_eq!(pov.add_image_list("images.txt", 5000), Ok(3));
    assert_eq!(pov.state(), PlaybackState::Ready);
    assert_eq!(pov.current_entry().unwrap().filename(), "wide.bmp");
    assert_eq!(pov.current_entry().unwrap().duration_ms(), 2000);

    // Three rows, top first
    clock.now.set(100);
    assert_eq!(pov.show_next_line(), Ok(1));
    assert_eq!(pov.pixels()[0], RGB8::new(0, 0, 255));
    assert_eq!(pov.pixels()[5], RGB8::new(0, 0, 255));
    assert_eq!(pov.pixels()[6], BLACK);
    assert_eq!(pov.last_line_update(), 100);
    assert_eq!(pov.show_next_line(), Ok(2));
    assert_eq!(pov.pixels()[0], RGB8::new(1, 0, 254));
    assert_eq!(pov.show_next_line(), Ok(0));

    // Broken entry plays as nothing but does not stop the show
    assert_eq!(pov.next_image(), Err(PovError::Decode(DecodeError::Truncated)));
    assert_eq!(pov.show_next_line(), Ok(0));

    pov.next_image().unwrap();
    assert_eq!(pov.current_entry().unwrap().filename(), "tall.bmp");
    for expected in [1, 2, 3, 4, 0] {
        assert_eq!(pov.show_next_line(), Ok(expected));
    }
    assert_eq!(pov.pixels()[1], RGB8::new(4, 0, 251));
    assert_eq!(pov.pixels()[2], BLACK);

    // Wraps back to the first entry
    pov.next_image().unwrap();
    assert_eq!(pov.playlist().cursor(), 0);
}

#[test]
fn show_mode_corrects_output() {
    let clock = TestClock { now: Cell::new(0) };
    let mut buf = [0u8; 256];
    let fs = BankFileSystem::new(programmed_flash(), PARTITION, 0);
    let mut pov: Pov<_, _, _, _, PIXELS> = Pov::new(
        SmartLedStrip::new(Capture::default()),
        BmpDecoder::new(&mut buf),
        fs,
        &clock,
    );
    pov.begin(OperatingMode::Show).unwrap();
    assert_eq!(pov.leds().correction(), ColorCorrection::TYPICAL_SMD5050);

    pov.set_brightness(255);
    for i in 0..PIXELS {
        pov.set_pixel(i, RGB8::new(255, 255, 255));
    }
    pov.show().unwrap();
    let sent = &pov.leds().writer().last;
    assert_eq!(sent[0], RGB8::new(255, 176, 240));
}

#[test]
fn auto_advance_with_slide_timer() {
    let clock = TestClock { now: Cell::new(0) };
    let mut buf = [0u8; 256];
    let fs = BankFileSystem::new(programmed_flash(), PARTITION, 0);
    let mut pov: Pov<_, _, _, _, PIXELS> = Pov::new(
        SmartLedStrip::new(Capture::default()),
        BmpDecoder::new(&mut buf),
        fs,
        &clock,
    );
    pov.begin(OperatingMode::Show).unwrap();
    pov.add_image_list("images.txt", 5000).unwrap();

    let mut timer = SlideTimer::new();
    timer.restart(0);
    let mut advances = 0;

    // 500 µs line period for 10 seconds
    for step in 1..=20_000u64 {
        let now = step * 500;
        clock.now.set(now);
        pov.show_next_line().unwrap();

        let duration = pov.current_entry().map_or(0, |e| e.duration_ms());
        if timer.is_due(now, duration) {
            let _ = pov.next_image();
            timer.restart(now);
            advances += 1;
        }
    }

    // wide.bmp after 2 s, broken.bmp after 5 s more, then tall.bmp stays
    assert_eq!(advances, 2);
    assert_eq!(pov.current_entry().unwrap().filename(), "tall.bmp");
}

#[test]
fn blank_flash_is_fatal() {
    let clock = TestClock { now: Cell::new(0) };
    let mut buf = [0u8; 256];
    let fs = BankFileSystem::new(RamFlash::<FLASH_SIZE>::new(), PARTITION, 0);
    let mut pov: Pov<_, _, _, _, PIXELS> = Pov::new(
        SmartLedStrip::new(Capture::default()),
        BmpDecoder::new(&mut buf),
        fs,
        &clock,
    );

    let err = pov.begin(OperatingMode::Show).unwrap_err();
    assert_eq!(err, PovError::FilesystemMountFailure(FsError::Corrupted));
    assert!(err.is_fatal());
    assert_eq!(pov.leds().writer().frames, 0);
}
