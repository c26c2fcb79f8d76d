//! This module contains the kernel for the Split value-to-color mapping:
//! the Packed field layout with a boustrophedon parity fold on the lower
//! fields.
//!
//! Before a lower field is stored, it is reflected (`v -> maxField - v`)
//! whenever the raw value of the next-higher field is odd. A unit increment
//! of the depth value that carries across a field boundary then moves every
//! stored channel by at most one native step, turning Packed's worst-case
//! discontinuity into a locally continuous ramp that lossy compression can
//! round safely. The fold only reorders bit patterns, so the mapping stays
//! exact.

use crate::error::DepthpackError;
use crate::kernels::packed::validate_distribution;
use crate::traits::Coder;
use crate::types::Color;

#[derive(Debug, Clone)]
pub struct Split {
    distribution: [u8; 3],
    coding_bits: u8,
}

impl Split {
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

impl Coder for Split {
    fn encode_value(&self, value: u16) -> Color {
        let val = value.min(self.max_value());
        let [_, mid, low] = self.distribution;

        let high = val >> (mid + low);
        let mid_raw = (val >> low) & self.field_mask(1);
        let low_raw = val & self.field_mask(2);

        let mid_stored = if high & 1 == 1 {
            self.field_mask(1) - mid_raw
        } else {
            mid_raw
        };
        let low_stored = if mid_raw & 1 == 1 {
            self.field_mask(2) - low_raw
        } else {
            low_raw
        };

        Color::new(high as u8, mid_stored as u8, low_stored as u8)
    }

    fn decode_value(&self, color: Color) -> u16 {
        let [_, mid, low] = self.distribution;
        let high = (color[0] as u16).min(self.field_mask(0));
        let mid_stored = (color[1] as u16).min(self.field_mask(1));
        let low_stored = (color[2] as u16).min(self.field_mask(2));

        let mid_raw = if high & 1 == 1 {
            self.field_mask(1) - mid_stored
        } else {
            mid_stored
        };
        let low_raw = if mid_raw & 1 == 1 {
            self.field_mask(2) - low_stored
        } else {
            low_stored
        };

        (high << (mid + low)) | (mid_raw << low) | low_raw
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
