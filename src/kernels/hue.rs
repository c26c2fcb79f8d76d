//! This module contains the kernel for the Hue value-to-color mapping: a
//! six-segment piecewise-linear hue ramp (the jet/turbo colormap
//! construction) over the scaled domain `[0, 1529]`.
//!
//! At every ramp position exactly one or two channels sit at an extreme and
//! the remaining one ramps linearly, so the decoder can identify the
//! dominant channel and invert the ramp from the relative magnitudes of the
//! other two. The final descending ramp ends at channel value 1 rather than
//! 0, so the top of the range cannot alias the bottom after a lossy round
//! trip.

use crate::traits::Coder;
use crate::types::Color;

/// Length of the six-segment ramp: 6 * 255 segments minus the shared
/// endpoints.
const RAMP_MAX: u32 = 1529;

#[derive(Debug, Clone)]
pub struct Hue {
    quantization: u8,
}

impl Hue {
    pub fn new(quantization: u8) -> Self {
        Self { quantization }
    }

    fn max_value(&self) -> u16 {
        if self.quantization >= 16 {
            u16::MAX
        } else {
            (1u16 << self.quantization) - 1
        }
    }

    fn ramp_position(&self, value: u16) -> u32 {
        let val = value.min(self.max_value()) as f32;
        (val / self.max_value() as f32 * RAMP_MAX as f32).round() as u32
    }
}

impl Coder for Hue {
    fn encode_value(&self, value: u16) -> Color {
        let d = self.ramp_position(value);

        let r = match d {
            0..=255 => 255,
            256..=510 => 510 - d,
            511..=1020 => 0,
            1021..=1275 => d - 1020,
            _ => 255,
        };
        let g = match d {
            0..=255 => d,
            256..=765 => 255,
            766..=1020 => 1020 - d,
            _ => 0,
        };
        let b = match d {
            0..=510 => 0,
            511..=765 => d - 510,
            766..=1275 => 255,
            _ => (1530 - d).max(1),
        };

        Color::new(r as u8, g as u8, b as u8)
    }

    fn decode_value(&self, color: Color) -> u16 {
        let (r, g, b) = (color[0] as i32, color[1] as i32, color[2] as i32);

        let d: i32 = if r + g + b < 255 {
            // Crushed dark pixels decode to the bottom of the range.
            0
        } else if r > g && r > b {
            if g >= b {
                g - b
            } else {
                1530 - b
            }
        } else if g >= r && g >= b {
            b - r + 510
        } else {
            r - g + 1020
        };

        let d = d.clamp(0, RAMP_MAX as i32) as f32;
        (d / RAMP_MAX as f32 * self.max_value() as f32).round() as u16
    }

    fn coding_bits(&self) -> u8 {
        self.quantization
    }

    fn channel_bits(&self) -> [u8; 3] {
        [8, 8, 8]
    }

    fn supports_enlarge(&self) -> bool {
        false
    }

    fn supports_interpolation(&self) -> bool {
        false
    }
}

//==================================================================================
// Unit Tests
//==================================================================================
