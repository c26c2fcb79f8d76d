//! This module contains the kernel for the Packed value-to-color mapping:
//! the depth value is split into up to three contiguous bit fields, one per
//! channel.
//!
//! Packing is exact within its resolution, but every field carry produces
//! the largest possible single-step color change for the smallest possible
//! depth change; the Split kernel exists to fix exactly that.

use crate::error::DepthpackError;
use crate::traits::Coder;
use crate::types::Color;

/// Contiguous bit-field packing, high field first.
#[derive(Debug, Clone)]
pub struct Packed {
    distribution: [u8; 3],
    coding_bits: u8,
}

/// Shared field-layout validation for the Packed/Split family.
pub(crate) fn validate_distribution(
    distribution: [u8; 3],
    quantization: u8,
) -> Result<u8, DepthpackError> {
    let reject = |reason: &str| {
        Err(DepthpackError::InvalidDistribution {
            distribution,
            quantization,
            reason: reason.to_string(),
        })
    };

    if distribution.iter().any(|&d| d > 8) {
        return reject("a channel cannot hold more than 8 bits");
    }
    if distribution[0] == 0 {
        return reject("the high field must be non-empty");
    }
    if distribution[2] > 0 && distribution[1] == 0 {
        return reject("field widths must be contiguous (no empty middle field)");
    }
    let sum: u8 = distribution.iter().sum();
    if sum > quantization {
        return reject("field widths exceed the quantization width");
    }
    Ok(sum)
}

/// Derives a default field layout when the configuration supplies none: the
/// high field takes `algo_bits` (or half the quantization width), the rest
/// spills into the remaining channels.
pub(crate) fn derive_distribution(quantization: u8, algo_bits: Option<u8>) -> [u8; 3] {
    let high = algo_bits
        .unwrap_or(quantization.div_ceil(2))
        .min(8)
        .min(quantization);
    let rest = quantization - high;
    let mid = rest.min(8);
    [high, mid, rest - mid]
}

impl Packed {
    pub fn new(quantization: u8, distribution: [u8; 3]) -> Result<Self, DepthpackError> {
        let coding_bits = validate_distribution(distribution, quantization)?;
        Ok(Self {
            distribution,
            coding_bits,
        })
    }

    fn max_value(&self) -> u16 {
        if self.coding_bits >= 16 {
            u16::MAX
        } else {
            (1u16 << self.coding_bits) - 1
        }
    }

    fn field_mask(&self, idx: usize) -> u16 {
        (1u16 << self.distribution[idx]) - 1
    }
}

impl Coder for Packed {
    fn encode_value(&self, value: u16) -> Color {
        let val = value.min(self.max_value());
        let [_, mid, low] = self.distribution;

        Color::new(
            (val >> (mid + low)) as u8,
            ((val >> low) & self.field_mask(1)) as u8,
            (val & self.field_mask(2)) as u8,
        )
    }

    fn decode_value(&self, color: Color) -> u16 {
        let [_, mid, low] = self.distribution;
        let high_part = (color[0] as u16).min(self.field_mask(0));
        let mid_part = (color[1] as u16).min(self.field_mask(1));
        let low_part = (color[2] as u16).min(self.field_mask(2));

        (high_part << (mid + low)) | (mid_part << low) | low_part
    }

    fn coding_bits(&self) -> u8 {
        self.coding_bits
    }

    fn channel_bits(&self) -> [u8; 3] {
        self.distribution
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
    fn test_roundtrip_exhaustive_three_fields() {
        let coder = Packed::new(10, [4, 3, 3]).unwrap();
        for v in 0u16..1024 {
            assert_eq!(coder.decode_value(coder.encode_value(v)), v);
        }
    }

    #[test]
    fn test_roundtrip_exhaustive_two_fields() {
        let coder = Packed::new(10, [5, 5, 0]).unwrap();
        for v in 0u16..1024 {
            assert_eq!(coder.decode_value(coder.encode_value(v)), v);
        }
    }

    #[test]
    fn test_field_layout() {
        let coder = Packed::new(10, [4, 3, 3]).unwrap();
        // 0b1010_011_101
        assert_eq!(coder.encode_value(0b1010011101), Color::new(0b1010, 0b011, 0b101));
    }

    #[test]
    fn test_distribution_validation() {
        assert!(Packed::new(10, [9, 1, 0]).is_err());
        assert!(Packed::new(10, [0, 5, 5]).is_err());
        assert!(Packed::new(10, [5, 0, 5]).is_err());
        assert!(Packed::new(10, [6, 6, 0]).is_err());
        assert!(Packed::new(10, [4, 3, 3]).is_ok());
        // A distribution below the quantization width is allowed; the stream
        // coder recovers the remainder by interpolation.
        assert!(Packed::new(12, [4, 4, 0]).is_ok());
    }

    #[test]
    fn test_derive_distribution() {
        assert_eq!(derive_distribution(10, None), [5, 5, 0]);
        assert_eq!(derive_distribution(10, Some(4)), [4, 6, 0]);
        assert_eq!(derive_distribution(16, None), [8, 8, 0]);
        assert_eq!(derive_distribution(16, Some(5)), [5, 8, 3]);
    }

    #[test]
    fn test_decode_clamps_overrange_fields() {
        let coder = Packed::new(10, [4, 3, 3]).unwrap();
        // A channel value beyond its field width clamps instead of bleeding
        // into higher fields.
        assert_eq!(
            coder.decode_value(Color::new(0, 255, 0)),
            coder.decode_value(Color::new(0, 7, 0))
        );
    }
}
