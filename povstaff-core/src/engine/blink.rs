//! Blink alert pattern
//!
//! The pattern is a list of timed frames rather than a blocking routine,
//! so it can be driven by a blocking delay or by an async timer.

use crate::color::{BLACK, RGB8};
use crate::config::{BLINK_HOLD_MS, BLINK_REPEATS, BLINK_SPACING};

/// What a blink step puts on the strip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BlinkFrame {
    /// All pixels off
    Dark,
    /// Every `BLINK_SPACING`th pixel lit in the color, others off
    Marks(RGB8),
}

impl BlinkFrame {
    /// Draw the frame into `pixels`
    pub fn render(self, pixels: &mut [RGB8]) {
        pixels.fill(BLACK);
        if let BlinkFrame::Marks(color) = self {
            for pixel in pixels.iter_mut().step_by(BLINK_SPACING) {
                *pixel = color;
            }
        }
    }
}

/// One frame of the pattern and how long to hold it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BlinkStep {
    pub frame: BlinkFrame,
    pub hold_ms: u32,
}

/// Iterator over the steps of one blink
///
/// Dark and marks alternate `BLINK_REPEATS` times, each held for
/// `BLINK_HOLD_MS`, and a final dark frame clears the strip.
#[derive(Debug, Clone)]
pub struct BlinkSequence {
    color: RGB8,
    step: u8,
}

impl BlinkSequence {
    /// Number of steps in a sequence
    pub const LEN: u8 = BLINK_REPEATS * 2 + 1;

    pub fn new(color: RGB8) -> Self {
        Self { color, step: 0 }
    }

    /// Total time the sequence holds its frames (ms)
    pub fn duration_ms() -> u32 {
        BLINK_REPEATS as u32 * 2 * BLINK_HOLD_MS
    }
}

impl Iterator for BlinkSequence {
    type Item = BlinkStep;

    fn next(&mut self) -> Option<BlinkStep> {
        if self.step >= Self::LEN {
            return None;
        }
        let step = self.step;
        self.step += 1;

        let item = if step == Self::LEN - 1 {
            BlinkStep {
                frame: BlinkFrame::Dark,
                hold_ms: 0,
            }
        } else if step % 2 == 0 {
            BlinkStep {
                frame: BlinkFrame::Dark,
                hold_ms: BLINK_HOLD_MS,
            }
        } else {
            BlinkStep {
                frame: BlinkFrame::Marks(self.color),
                hold_ms: BLINK_HOLD_MS,
            }
        };
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = Self::LEN.saturating_sub(self.step) as usize;
        (left, Some(left))
    }
}

impl ExactSizeIterator for BlinkSequence {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::BLUE;

    #[test]
    fn test_sequence_shape() {
        let mut seq = BlinkSequence::new(BLUE);
        assert_eq!(seq.len(), 5);

        let dark = BlinkStep {
            frame: BlinkFrame::Dark,
            hold_ms: 500,
        };
        let marks = BlinkStep {
            frame: BlinkFrame::Marks(BLUE),
            hold_ms: 500,
        };
        assert_eq!(seq.next(), Some(dark));
        assert_eq!(seq.next(), Some(marks));
        assert_eq!(seq.next(), Some(dark));
        assert_eq!(seq.next(), Some(marks));
        assert_eq!(
            seq.next(),
            Some(BlinkStep {
                frame: BlinkFrame::Dark,
                hold_ms: 0
            })
        );
        assert_eq!(seq.next(), None);
    }

    #[test]
    fn test_render_marks() {
        let mut pixels = [RGB8::new(9, 9, 9); 20];
        BlinkFrame::Marks(BLUE).render(&mut pixels);
        let lit: usize = pixels.iter().filter(|&&p| p == BLUE).count();
        assert_eq!(lit, 3);
        assert_eq!(pixels[0], BLUE);
        assert_eq!(pixels[8], BLUE);
        assert_eq!(pixels[16], BLUE);
        assert_eq!(pixels[1], BLACK);

        BlinkFrame::Dark.render(&mut pixels);
        assert!(pixels.iter().all(|&p| p == BLACK));
    }

    #[test]
    fn test_duration() {
        let total: u32 = BlinkSequence::new(BLUE).map(|s| s.hold_ms).sum();
        assert_eq!(total, BlinkSequence::duration_ms());
        assert_eq!(total, 2000);
    }
}
