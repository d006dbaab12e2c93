//! POV engine implementation
//!
//! The caller drives the engine from its own loop, calling
//! [`Pov::show_next_line`] once per refresh. Nothing here blocks except
//! [`Pov::blink`], which waits on the injected delay.

use embedded_hal::delay::DelayNs;
use povstaff_hal::{FileSystem, MonotonicClock};

use super::blink::{BlinkSequence, BlinkStep};
use super::error::PovError;
use crate::color::{fill_gradient, from_bgr, ColorCorrection, BLACK, GREEN, RED, RGB8};
use crate::config::OperatingMode;
use crate::playlist::{Playlist, PlaylistEntry};
use crate::state::PlaybackState;
use crate::traits::{BitmapSource, ImageInfo, LedDriver};

/// POV display engine for a strip of `N` pixels
///
/// Owns the pixel array, the playlist (and through it the decoder), the
/// LED driver, the file system and the clock. Instances share nothing.
pub struct Pov<L, B, F, C, const N: usize> {
    leds: L,
    fs: F,
    clock: C,
    pixels: [RGB8; N],
    playlist: Playlist<B>,
    current_line: u16,
    paused: bool,
    mode: OperatingMode,
    last_line_update: u64,
}

impl<L, B, F, C, const N: usize> Pov<L, B, F, C, N>
where
    L: LedDriver<N>,
    B: BitmapSource,
    F: FileSystem,
    C: MonotonicClock,
{
    pub fn new(leds: L, source: B, fs: F, clock: C) -> Self {
        Self {
            leds,
            fs,
            clock,
            pixels: [BLACK; N],
            playlist: Playlist::new(source),
            current_line: 0,
            paused: false,
            mode: OperatingMode::Show,
            last_line_update: 0,
        }
    }

    /// Mount storage and prepare the strip
    ///
    /// Show mode enables the SMD5050 color correction, other modes render
    /// uncorrected. A mount failure is fatal for the device.
    pub fn begin(&mut self, mode: OperatingMode) -> Result<(), PovError> {
        self.mode = mode;
        self.fs.mount().map_err(PovError::FilesystemMountFailure)?;

        let correction = match mode {
            OperatingMode::Show => ColorCorrection::TYPICAL_SMD5050,
            OperatingMode::Debug | OperatingMode::Upload => ColorCorrection::UNCORRECTED,
        };
        self.leds.set_correction(correction);
        self.show()
    }

    // ---- Rendering ----

    /// Set one pixel; out-of-range indices are ignored
    pub fn set_pixel(&mut self, index: usize, color: RGB8) {
        if let Some(pixel) = self.pixels.get_mut(index) {
            *pixel = color;
        }
    }

    pub fn set_brightness(&mut self, brightness: u8) {
        self.leds.set_brightness(brightness);
    }

    pub fn set_correction(&mut self, correction: ColorCorrection) {
        self.leds.set_correction(correction);
    }

    /// Clear the strip immediately
    ///
    /// Does not count as a line update.
    pub fn blank(&mut self) -> Result<(), PovError> {
        self.pixels.fill(BLACK);
        self.leds.write(&self.pixels)?;
        Ok(())
    }

    /// Push the pixel array to the strip and record the time
    pub fn show(&mut self) -> Result<(), PovError> {
        self.leds.write(&self.pixels)?;
        self.last_line_update = self.clock.now_micros();
        Ok(())
    }

    /// Render `v` in `[0, 1]` as a red-to-green gauge
    ///
    /// Values outside the range are clamped; NaN reads as 0. Ignores the
    /// pause flag and the loaded image.
    pub fn show_value(&mut self, v: f32) -> Result<(), PovError> {
        let v = if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) };
        // v >= 0, so adding one half and truncating rounds
        let level = ((v * N as f32 + 0.5) as usize).min(N);

        fill_gradient(&mut self.pixels, RED, GREEN);
        self.pixels[level..].fill(BLACK);
        self.show()
    }

    /// Render `size` pixels from BGR `bytes`, black beyond them
    pub fn show_line(&mut self, bytes: &[u8], size: usize) -> Result<(), PovError> {
        fill_line(&mut self.pixels, bytes, size);
        self.show()
    }

    /// Run the blink alert, waiting on `delay` between frames
    pub fn blink<D: DelayNs>(&mut self, color: RGB8, delay: &mut D) -> Result<(), PovError> {
        for step in BlinkSequence::new(color) {
            self.render_blink_step(step)?;
            if step.hold_ms > 0 {
                delay.delay_ms(step.hold_ms);
            }
        }
        Ok(())
    }

    /// Render one blink frame without waiting
    ///
    /// Does not count as a line update.
    pub fn render_blink_step(&mut self, step: BlinkStep) -> Result<(), PovError> {
        step.frame.render(&mut self.pixels);
        self.leds.write(&self.pixels)?;
        Ok(())
    }

    // ---- Playlist ----

    /// Append an image and make it current
    ///
    /// The entry stays in the playlist even if loading fails; the error is
    /// still returned. Returns the entry index.
    pub fn add_image(&mut self, filename: &str, duration_ms: u32) -> Result<usize, PovError> {
        let index = self.playlist.append(filename, duration_ms)?;
        self.current_line = 0;
        self.playlist.activate_index(index, &mut self.fs)?;
        Ok(index)
    }

    /// Append the images listed in the manifest at `path`
    ///
    /// Loads the current entry if anything was added. Returns the number of
    /// entries added.
    pub fn add_image_list(&mut self, path: &str, default_duration_ms: u32) -> Result<usize, PovError> {
        self.current_line = 0;
        let manifest = self.fs.open(path)?;
        let count = self.playlist.add_from_manifest(manifest, default_duration_ms)?;
        if count > 0 {
            self.playlist.activate(&mut self.fs)?;
        }
        Ok(count)
    }

    /// Remove every entry and unload the image
    pub fn clear_image_list(&mut self) {
        self.playlist.reset();
        self.current_line = 0;
    }

    /// Go back to the first entry and load it
    ///
    /// Returns `Ok(None)` on an empty playlist.
    pub fn first_image(&mut self) -> Result<Option<ImageInfo>, PovError> {
        self.playlist.first();
        self.current_line = 0;
        Ok(self.playlist.activate(&mut self.fs)?)
    }

    /// Advance to the next entry, wrapping, and load it
    ///
    /// Does nothing while paused. Returns `Ok(None)` when paused or the
    /// playlist is empty.
    pub fn next_image(&mut self) -> Result<Option<ImageInfo>, PovError> {
        if self.paused {
            return Ok(None);
        }
        self.playlist.next();
        self.current_line = 0;
        Ok(self.playlist.activate(&mut self.fs)?)
    }

    /// Render the current scanline and advance
    ///
    /// Returns the next line index, which wraps to 0 after the last line.
    /// Returns 0 without rendering when no image is loaded, and the
    /// unchanged line index while paused.
    pub fn show_next_line(&mut self) -> Result<u16, PovError> {
        let Some(image) = self.playlist.current_image() else {
            return Ok(0);
        };
        if self.paused {
            return Ok(self.current_line);
        }
        let Some(info) = image.info() else {
            return Ok(0);
        };

        match image.line(self.current_line) {
            Some(bytes) => fill_line(&mut self.pixels, bytes, info.width as usize),
            None => {
                self.current_line = 0;
                return Ok(0);
            }
        }
        self.show()?;

        self.current_line += 1;
        if self.current_line >= info.height {
            self.current_line = 0;
        }
        Ok(self.current_line)
    }

    // ---- Pause ----

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Flip the pause flag, returning the new value
    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        self.paused
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn state(&self) -> PlaybackState {
        PlaybackState::resolve(self.playlist.is_empty(), self.paused)
    }

    // ---- Accessors ----

    pub fn current_line(&self) -> u16 {
        self.current_line
    }

    /// Time of the last line update (µs)
    pub fn last_line_update(&self) -> u64 {
        self.last_line_update
    }

    pub fn mode(&self) -> OperatingMode {
        self.mode
    }

    pub fn playlist(&self) -> &Playlist<B> {
        &self.playlist
    }

    pub fn current_entry(&self) -> Option<&PlaylistEntry> {
        self.playlist.current()
    }

    pub fn pixels(&self) -> &[RGB8; N] {
        &self.pixels
    }

    pub fn leds(&self) -> &L {
        &self.leds
    }

    pub fn file_system(&self) -> &F {
        &self.fs
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }
}

fn fill_line<const N: usize>(pixels: &mut [RGB8; N], bytes: &[u8], size: usize) {
    for (i, pixel) in pixels.iter_mut().enumerate() {
        *pixel = if i < size {
            bytes.get(3 * i..).and_then(from_bgr).unwrap_or(BLACK)
        } else {
            BLACK
        };
    }
}
