//! This module provides shared, low-level utility functions used throughout
//! the depthpack core.
//!
//! Its primary responsibility is the safe, validated conversion between raw
//! byte buffers (as produced/consumed by external image codecs) and typed
//! `Color` slices, without copying.

use crate::error::DepthpackError;
use crate::types::Color;

/// Reinterprets a slice of colors as a flat RGB byte buffer.
///
/// Zero-copy; the output length is exactly `colors.len() * 3`.
pub fn colors_as_bytes(colors: &[Color]) -> &[u8] {
    bytemuck::cast_slice(colors)
}

/// Reinterprets a flat RGB byte buffer as a slice of colors.
///
/// # Errors
/// Returns a `DepthpackError::PodCast` if the byte slice length is not a
/// multiple of 3.
pub fn bytes_as_colors(bytes: &[u8]) -> Result<&[Color], DepthpackError> {
    Ok(bytemuck::try_cast_slice(bytes)?)
}

/// Mutable variant of [`bytes_as_colors`], for decoding in place into a
/// caller-owned image buffer.
pub fn bytes_as_colors_mut(bytes: &mut [u8]) -> Result<&mut [Color], DepthpackError> {
    Ok(bytemuck::try_cast_slice_mut(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colors_to_bytes_layout() {
        let colors = vec![Color::new(1, 2, 3), Color::new(4, 5, 6)];
        assert_eq!(colors_as_bytes(&colors), &[1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_bytes_to_colors_roundtrip() {
        let bytes = vec![9u8, 8, 7, 6, 5, 4];
        let colors = bytes_as_colors(&bytes).unwrap();
        assert_eq!(colors, &[Color::new(9, 8, 7), Color::new(6, 5, 4)]);
    }

    #[test]
    fn test_bytes_to_colors_mismatch_error() {
        let bytes = vec![0u8, 1, 2, 3];
        let result = bytes_as_colors(&bytes);
        assert!(matches!(result, Err(DepthpackError::PodCast(_))));
    }
}
