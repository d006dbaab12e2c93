//! Color helpers
//!
//! Pixel values are `smart_leds::RGB8`, the same type the LED drivers
//! consume, so frames never need converting on their way out.

pub use smart_leds::RGB8;

/// All channels off
pub const BLACK: RGB8 = RGB8::new(0, 0, 0);

/// Full red
pub const RED: RGB8 = RGB8::new(255, 0, 0);

/// Full green
pub const GREEN: RGB8 = RGB8::new(0, 255, 0);

/// Full blue
pub const BLUE: RGB8 = RGB8::new(0, 0, 255);

/// Red + green
pub const YELLOW: RGB8 = RGB8::new(255, 255, 0);

/// Per-channel color correction
///
/// Each channel is scaled by `value / 255` before brightness is applied,
/// compensating for the uneven luminance of the LED dies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ColorCorrection {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl ColorCorrection {
    /// No correction
    pub const UNCORRECTED: Self = Self::new(255, 255, 255);

    /// Typical values for SMD5050 LEDs
    pub const TYPICAL_SMD5050: Self = Self::new(255, 176, 240);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Apply the correction to a color
    pub fn apply(self, color: RGB8) -> RGB8 {
        RGB8::new(
            scale8(color.r, self.r),
            scale8(color.g, self.g),
            scale8(color.b, self.b),
        )
    }
}

impl Default for ColorCorrection {
    fn default() -> Self {
        Self::UNCORRECTED
    }
}

/// Scale `value` by `scale / 255`, keeping full scale lossless
pub fn scale8(value: u8, scale: u8) -> u8 {
    ((value as u16 * (scale as u16 + 1)) >> 8) as u8
}

/// Build a color from three bytes stored blue-green-red
#[inline]
pub fn from_bgr(bytes: &[u8]) -> Option<RGB8> {
    match bytes {
        [b, g, r, ..] => Some(RGB8::new(*r, *g, *b)),
        _ => None,
    }
}

/// Fill `pixels` with a linear gradient from `from` (first pixel) to `to`
/// (last pixel)
pub fn fill_gradient(pixels: &mut [RGB8], from: RGB8, to: RGB8) {
    let last = pixels.len().saturating_sub(1);
    if last == 0 {
        if let Some(first) = pixels.first_mut() {
            *first = from;
        }
        return;
    }

    for (i, pixel) in pixels.iter_mut().enumerate() {
        *pixel = RGB8::new(
            lerp(from.r, to.r, i, last),
            lerp(from.g, to.g, i, last),
            lerp(from.b, to.b, i, last),
        );
    }
}

fn lerp(from: u8, to: u8, step: usize, steps: usize) -> u8 {
    let delta = to as i32 - from as i32;
    (from as i32 + delta * step as i32 / steps as i32) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale8() {
        assert_eq!(scale8(255, 255), 255);
        assert_eq!(scale8(200, 255), 200);
        assert_eq!(scale8(255, 0), 0);
        assert_eq!(scale8(255, 128), 128);
    }

    #[test]
    fn test_correction() {
        let white = RGB8::new(255, 255, 255);
        assert_eq!(ColorCorrection::UNCORRECTED.apply(white), white);
        assert_eq!(
            ColorCorrection::TYPICAL_SMD5050.apply(white),
            RGB8::new(255, 176, 240)
        );
    }

    #[test]
    fn test_from_bgr() {
        assert_eq!(from_bgr(&[1, 2, 3]), Some(RGB8::new(3, 2, 1)));
        assert_eq!(from_bgr(&[1, 2]), None);
    }

    #[test]
    fn test_gradient_endpoints() {
        let mut pixels = [BLACK; 10];
        fill_gradient(&mut pixels, RED, GREEN);
        assert_eq!(pixels[0], RED);
        assert_eq!(pixels[9], GREEN);

        // Red falls while green rises
        for pair in pixels.windows(2) {
            assert!(pair[1].r <= pair[0].r);
            assert!(pair[1].g >= pair[0].g);
            assert_eq!(pair[1].b, 0);
        }
    }

    #[test]
    fn test_gradient_single_pixel() {
        let mut pixels = [BLACK; 1];
        fill_gradient(&mut pixels, RED, GREEN);
        assert_eq!(pixels[0], RED);

        let mut empty: [RGB8; 0] = [];
        fill_gradient(&mut empty, RED, GREEN);
    }
}
