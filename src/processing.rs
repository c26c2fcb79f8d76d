//! This module provides the depth-raster pre/post-processing steps that
//! bracket the codec: quantization of raw samples into the logical
//! `[0, 2^Q − 1]` domain, expansion back to the full 16-bit range, and a
//! thresholded median filter for salt-and-pepper noise left by a lossy
//! round trip.
//!
//! Everything here operates on caller-owned buffers; reading rasters from
//! files and writing images is external to the crate.

use num_traits::Float;

use crate::error::DepthpackError;

fn check_quantization(quantization: u8) -> Result<u16, DepthpackError> {
    if quantization < 1 || quantization > 16 {
        return Err(DepthpackError::InvalidQuantization(quantization));
    }
    Ok(if quantization >= 16 {
        u16::MAX
    } else {
        (1u16 << quantization) - 1
    })
}

/// Linearly rescales floating-point samples into `[0, 2^quantization − 1]`.
///
/// With `hint = Some((min, max))` the rescale uses the given bounds (values
/// outside clamp); otherwise the bounds are derived from the data. A flat
/// raster maps to all zeros.
pub fn quantize<T: Float>(
    source: &[T],
    quantization: u8,
    hint: Option<(T, T)>,
) -> Result<Vec<u16>, DepthpackError> {
    let levels = check_quantization(quantization)?;
    if source.is_empty() {
        return Ok(Vec::new());
    }

    let (min, max) = match hint {
        Some((lo, hi)) if lo < hi => (lo, hi),
        _ => source.iter().fold(
            (T::infinity(), T::neg_infinity()),
            |(lo, hi), &s| (lo.min(s), hi.max(s)),
        ),
    };
    let range = max - min;
    if range <= T::zero() {
        return Ok(vec![0; source.len()]);
    }

    let scale = T::from(levels).ok_or_else(|| {
        DepthpackError::InternalError("quantization level count not representable".to_string())
    })?;

    let mut out = Vec::with_capacity(source.len());
    for &sample in source {
        let normalized = ((sample - min) / range).max(T::zero()).min(T::one());
        let scaled = (normalized * scale).round();
        let value = scaled.to_u16().ok_or_else(|| {
            DepthpackError::InternalError("quantized sample out of range".to_string())
        })?;
        out.push(value.min(levels));
    }
    Ok(out)
}

/// Integer-sample variant of [`quantize`]: rescales 16-bit samples into the
/// logical domain using their observed min/max.
pub fn quantize_u16(source: &[u16], quantization: u8) -> Result<Vec<u16>, DepthpackError> {
    let samples: Vec<f32> = source.iter().map(|&s| s as f32).collect();
    quantize(&samples, quantization, None)
}

/// Expands logical values back into the full 16-bit range.
pub fn dequantize(source: &[u16], quantization: u8) -> Result<Vec<u16>, DepthpackError> {
    let levels = check_quantization(quantization)?;
    let shift = 16 - quantization;
    Ok(source.iter().map(|&v| v.min(levels) << shift).collect())
}

/// Windowed median filter over a row-major raster.
///
/// A sample is replaced by its window median only when it deviates from it
/// by more than `threshold`, so genuine depth edges survive while isolated
/// decode spikes are suppressed.
///
/// # Errors
/// Rejects rasters whose dimensions do not match the buffer length.
pub fn denoise_median(
    data: &mut [u16],
    width: usize,
    height: usize,
    threshold: u16,
    half_window: usize,
) -> Result<(), DepthpackError> {
    if width * height != data.len() {
        return Err(DepthpackError::RasterMismatch {
            width: width as u32,
            height: height as u32,
            len: data.len(),
        });
    }

    let snapshot = data.to_vec();
    let mut window = Vec::with_capacity((2 * half_window + 1) * (2 * half_window + 1));

    for y in 0..height {
        for x in 0..width {
            window.clear();
            for dy in -(half_window as i64)..=half_window as i64 {
                for dx in -(half_window as i64)..=half_window as i64 {
                    let nx = x as i64 + dx;
                    let ny = y as i64 + dy;
                    if nx >= 0 && (nx as usize) < width && ny >= 0 && (ny as usize) < height {
                        window.push(snapshot[ny as usize * width + nx as usize]);
                    }
                }
            }
            window.sort_unstable();
            let median = window[window.len() / 2];

            let current = data[y * width + x];
            let deviation = (current as i32 - median as i32).unsigned_abs();
            if deviation > threshold as u32 {
                data[y * width + x] = median;
            }
        }
    }
    Ok(())
}

//==================================================================================
// Unit Tests
//==================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantize_spans_full_range() {
        let quantized = quantize(&[0.0f32, 0.5, 1.0], 8, None).unwrap();
        assert_eq!(quantized, vec![0, 128, 255]);
    }

    #[test]
    fn test_quantize_with_hint_clamps_outliers() {
        let quantized = quantize(&[-10.0f32, 0.0, 50.0, 100.0, 500.0], 8, Some((0.0, 100.0))).unwrap();
        assert_eq!(quantized, vec![0, 0, 128, 255, 255]);
    }

    #[test]
    fn test_quantize_flat_and_empty_rasters() {
        assert_eq!(quantize(&[7.0f32; 4], 10, None).unwrap(), vec![0; 4]);
        assert!(quantize::<f32>(&[], 10, None).unwrap().is_empty());
    }

    #[test]
    fn test_quantize_rejects_bad_width() {
        assert!(matches!(
            quantize(&[0.0f32], 0, None),
            Err(DepthpackError::InvalidQuantization(0))
        ));
        assert!(matches!(
            quantize(&[0.0f32], 17, None),
            Err(DepthpackError::InvalidQuantization(17))
        ));
    }

    #[test]
    fn test_quantize_u16_and_dequantize() {
        let quantized = quantize_u16(&[0, 1000, 2000], 10).unwrap();
        assert_eq!(quantized, vec![0, 512, 1023]);

        let expanded = dequantize(&[0, 512, 1023], 10).unwrap();
        assert_eq!(expanded, vec![0, 512 << 6, 1023 << 6]);
    }

    #[test]
    fn test_denoise_median_suppresses_spike() {
        let mut raster = vec![100u16; 9];
        raster[4] = 5000;
        denoise_median(&mut raster, 3, 3, 50, 1).unwrap();
        assert_eq!(raster[4], 100);
    }

    #[test]
    fn test_denoise_median_preserves_edges() {
        // A clean step edge deviates from the window median by less than
        // the threshold on each side, so it must survive.
        #[rustfmt::skip]
        let mut raster = vec![
            0, 0, 900, 900,
            0, 0, 900, 900,
            0, 0, 900, 900,
            0, 0, 900, 900u16,
        ];
        let expected = raster.clone();
        denoise_median(&mut raster, 4, 4, 1000, 1).unwrap();
        assert_eq!(raster, expected);
    }

    #[test]
    fn test_denoise_median_dimension_mismatch() {
        let mut raster = vec![0u16; 8];
        assert!(matches!(
            denoise_median(&mut raster, 3, 3, 10, 1),
            Err(DepthpackError::RasterMismatch { .. })
        ));
    }
}
