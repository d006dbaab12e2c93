//! LED strip over a `smart-leds` writer
//!
//! Works with any `SmartLedsWrite` implementation (WS2812 over PIO, SPI,
//! RMT, ...). Color correction is applied first, then global brightness,
//! so the engine's pixel array always holds nominal image colors.

use povstaff_core::color::{scale8, ColorCorrection, RGB8};
use povstaff_core::traits::{LedDriver, LedError};
use smart_leds::SmartLedsWrite;

pub struct SmartLedStrip<W> {
    writer: W,
    brightness: u8,
    correction: ColorCorrection,
}

impl<W> SmartLedStrip<W>
where
    W: SmartLedsWrite<Color = RGB8>,
{
    /// Full brightness, no correction
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            brightness: 255,
            correction: ColorCorrection::UNCORRECTED,
        }
    }

    pub fn brightness(&self) -> u8 {
        self.brightness
    }

    pub fn correction(&self) -> ColorCorrection {
        self.correction
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    /// Color as it will be sent to the strip
    pub fn output_color(&self, color: RGB8) -> RGB8 {
        adjust(color, self.correction, self.brightness)
    }
}

impl<W, const N: usize> LedDriver<N> for SmartLedStrip<W>
where
    W: SmartLedsWrite<Color = RGB8>,
{
    fn write(&mut self, pixels: &[RGB8; N]) -> Result<(), LedError> {
        let (correction, brightness) = (self.correction, self.brightness);
        let colors = pixels.iter().map(|&p| adjust(p, correction, brightness));
        self.writer.write(colors).map_err(|_| LedError::Transfer)
    }

    fn set_brightness(&mut self, brightness: u8) {
        self.brightness = brightness;
    }

    fn set_correction(&mut self, correction: ColorCorrection) {
        self.correction = correction;
    }
}

fn adjust(color: RGB8, correction: ColorCorrection, brightness: u8) -> RGB8 {
    let c = correction.apply(color);
    RGB8::new(
        scale8(c.r, brightness),
        scale8(c.g, brightness),
        scale8(c.b, brightness),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use heapless::Vec;

    /// Writer that keeps the last frame
    struct CaptureWriter {
        frame: Vec<RGB8, 16>,
        fail: bool,
    }

    impl SmartLedsWrite for CaptureWriter {
        type Error = ();
        type Color = RGB8;

        fn write<T, I>(&mut self, iterator: T) -> Result<(), Self::Error>
        where
            T: IntoIterator<Item = I>,
            I: Into<Self::Color>,
        {
            if self.fail {
                return Err(());
            }
            self.frame.clear();
            for color in iterator {
                self.frame.push(color.into()).map_err(|_| ())?;
            }
            Ok(())
        }
    }

    fn strip() -> SmartLedStrip<CaptureWriter> {
        SmartLedStrip::new(CaptureWriter {
            frame: Vec::new(),
            fail: false,
        })
    }

    #[test]
    fn test_passthrough_by_default() {
        let mut strip = strip();
        let frame = [RGB8::new(10, 200, 255), RGB8::new(0, 0, 0)];
        LedDriver::<2>::write(&mut strip, &frame).unwrap();
        assert_eq!(strip.writer().frame.as_slice(), &frame);
    }

    #[test]
    fn test_correction_then_brightness() {
        let mut strip = strip();
        LedDriver::<1>::set_correction(&mut strip, ColorCorrection::TYPICAL_SMD5050);
        LedDriver::<1>::set_brightness(&mut strip, 128);

        let white = [RGB8::new(255, 255, 255)];
        LedDriver::<1>::write(&mut strip, &white).unwrap();
        // 255 -> 128, 176 -> 88, 240 -> 120
        assert_eq!(strip.writer().frame[0], RGB8::new(128, 88, 120));
        assert_eq!(strip.output_color(white[0]), RGB8::new(128, 88, 120));
    }

    #[test]
    fn test_zero_brightness_is_dark() {
        let mut strip = strip();
        LedDriver::<1>::set_brightness(&mut strip, 0);
        LedDriver::<1>::write(&mut strip, &[RGB8::new(255, 255, 255)]).unwrap();
        assert_eq!(strip.writer().frame[0], RGB8::new(0, 0, 0));
    }

    #[test]
    fn test_transfer_error() {
        let mut strip = strip();
        strip.writer.fail = true;
        assert_eq!(
            LedDriver::<1>::write(&mut strip, &[RGB8::default()]),
            Err(LedError::Transfer)
        );
    }
}
