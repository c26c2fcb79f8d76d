//! This module contains the pure, stateless kernel for the Morton (Z-order)
//! value-to-color mapping.
//!
//! Morton encoding interleaves the bits of a depth value across the three
//! channels, so that scaling a value into the lattice and reading it back is
//! exact. It provides no error-locality guarantee on its own; its main role
//! is as the index-to-coordinate base map that the Hilbert kernel refines.

use crate::traits::Coder;
use crate::types::Color;

/// Z-order curve kernel. Bit `3i + k` of the value is routed to channel `k`
/// at position `i`.
#[derive(Debug, Clone)]
pub struct Morton {
    axis_bits: u8,
    coding_bits: u8,
}

impl Morton {
    /// Builds a Morton kernel covering a full quantization width. The number
    /// of interleave rounds is derived from the width, so the three channels
    /// may end up with unequal bit counts (e.g. 6/5/5 for 16 bits).
    pub fn new(quantization: u8) -> Self {
        Self {
            axis_bits: quantization.div_ceil(3),
            coding_bits: quantization,
        }
    }

    /// Builds the symmetric per-axis kernel the Hilbert transform is layered
    /// on: `axis_bits` interleave rounds covering exactly `3 * axis_bits`
    /// value bits.
    pub(crate) fn with_axis_bits(axis_bits: u8) -> Self {
        Self {
            axis_bits,
            coding_bits: 3 * axis_bits,
        }
    }

    fn max_value(&self) -> u32 {
        if self.coding_bits >= 16 {
            u16::MAX as u32
        } else {
            (1u32 << self.coding_bits) - 1
        }
    }
}

impl Coder for Morton {
    fn encode_value(&self, value: u16) -> Color {
        let val = (value as u32).min(self.max_value());
        let mut ret = [0u32; 3];

        for i in 0..self.axis_bits as u32 {
            for k in 0..3u32 {
                let bit_pos = 3 * i + k;
                if bit_pos < self.coding_bits as u32 {
                    ret[k as usize] |= ((val >> bit_pos) & 1) << i;
                }
            }
        }

        Color::new(ret[0] as u8, ret[1] as u8, ret[2] as u8)
    }

    fn decode_value(&self, color: Color) -> u16 {
        let mut val = 0u32;

        for i in 0..self.axis_bits as u32 {
            for k in 0..3u32 {
                let bit_pos = 3 * i + k;
                if bit_pos < self.coding_bits as u32 {
                    val |= (((color[k as usize] as u32) >> i) & 1) << bit_pos;
                }
            }
        }

        val.min(self.max_value()) as u16
    }

    fn coding_bits(&self) -> u8 {
        self.coding_bits
    }

    fn channel_bits(&self) -> [u8; 3] {
        let mut bits = [0u8; 3];
        for (k, channel) in bits.iter_mut().enumerate() {
            *channel = (0..self.axis_bits)
                .filter(|i| 3 * (*i as u32) + (k as u32) < self.coding_bits as u32)
                .count() as u8;
        }
        bits
    }

    fn supports_enlarge(&self) -> bool {
        true
    }

    fn supports_interpolation(&self) -> bool {
        true
    }
}

//==================================================================================
// Unit Tests
//==================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_exhaustive_9_bits() {
        let coder = Morton::new(9);
        for v in 0u16..512 {
            assert_eq!(coder.decode_value(coder.encode_value(v)), v);
        }
    }

    #[test]
    fn test_roundtrip_exhaustive_16_bits() {
        let coder = Morton::new(16);
        for v in 0u16..=u16::MAX {
            assert_eq!(coder.decode_value(coder.encode_value(v)), v);
        }
    }

    #[test]
    fn test_bit_routing() {
        // Bits 0, 1, 2 land in channels r, g, b at position 0.
        let coder = Morton::new(9);
        assert_eq!(coder.encode_value(0b001), Color::new(1, 0, 0));
        assert_eq!(coder.encode_value(0b010), Color::new(0, 1, 0));
        assert_eq!(coder.encode_value(0b100), Color::new(0, 0, 1));
        // Bit 3 lands back in r at position 1.
        assert_eq!(coder.encode_value(0b1000), Color::new(2, 0, 0));
    }

    #[test]
    fn test_channel_bits_uneven_for_16() {
        let coder = Morton::new(16);
        assert_eq!(coder.channel_bits(), [6, 5, 5]);

        let coder = Morton::with_axis_bits(3);
        assert_eq!(coder.channel_bits(), [3, 3, 3]);
    }

    #[test]
    fn test_out_of_domain_value_clamps() {
        let coder = Morton::new(9);
        assert_eq!(
            coder.encode_value(0xFFFF),
            coder.encode_value(511),
            "values beyond the coding range must clamp, not wrap"
        );
    }
}
