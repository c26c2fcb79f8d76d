//! This module orchestrates one algorithm kernel plus its spacing and
//! lookup tables into the bulk value-to-color codec.
//!
//! Encode: (optionally) blend between two adjacent lattice encodings for
//! sub-quantization smoothness, map the value through the kernel to a
//! native-resolution color, then spread it over the full 8-bit channel
//! range. Decode runs the inverse: shrink the (possibly lossily altered)
//! stored color back to native resolution, then reconstruct through the
//! kernel directly or through seam-aware trilinear interpolation over the
//! native lattice.
//!
//! All tables are built once at construction; `encode`/`decode` are pure
//! reads over them, so a built [`StreamCoder`] can be shared read-only
//! across threads.

use log::debug;

use crate::config::CodecConfig;
use crate::error::DepthpackError;
use crate::kernels::Kernel;
use crate::traits::Coder;
use crate::types::Color;

pub mod spacing;
pub mod tables;


pub use spacing::SpacingTable;
use tables::{DecodingTable, EncodingTable};

/// The bulk depth-to-color codec: one kernel, its spacing tables, and the
/// optional dense lookup tables, all immutable after construction.
///
/// ```
/// use depthpack::{CodecConfig, StreamCoder};
///
/// let coder = StreamCoder::new(CodecConfig::default()).unwrap();
/// let depths = vec![0u16, 1234, 4095];
/// let colors = coder.encode_vec(&depths);
/// assert_eq!(coder.decode_vec(&colors), depths);
/// ```
#[derive(Debug, Clone)]
pub struct StreamCoder {
    kernel: Kernel,
    quantization: u8,
    /// Depth bits beyond the kernel's native capacity, recovered by
    /// truncation centering or interpolation.
    shift: u8,
    interpolate: bool,
    spacing: Option<SpacingTable>,
    encoding_table: Option<EncodingTable>,
    decoding_table: Option<DecodingTable>,
}

impl StreamCoder {
    /// Builds the codec described by `config`.
    ///
    /// Fails fast on any configuration the selected variant cannot honor;
    /// flags a variant does not support (`enlarge` on the continuous-wave
    /// variants, `interpolate` on variants that resolve the full width
    /// internally) are ignored.
    pub fn new(config: CodecConfig) -> Result<Self, DepthpackError> {
        let kernel = Kernel::from_config(&config)?;
        let shift = config.quantization - kernel.coding_bits();

        let interpolate = config.interpolate && kernel.supports_interpolation();
        if config.interpolate && !interpolate {
            debug!("interpolation not applicable to {:?}, ignoring", config.algorithm);
        }

        let spacing = if kernel.supports_enlarge() {
            if config.enlarge {
                Some(SpacingTable::weighted(&kernel))
            } else {
                Some(SpacingTable::uniform(kernel.channel_bits()))
            }
        } else {
            if config.enlarge {
                debug!("enlarge not applicable to {:?}, ignoring", config.algorithm);
            }
            None
        };

        let mut coder = Self {
            kernel,
            quantization: config.quantization,
            shift,
            interpolate,
            spacing,
            encoding_table: None,
            decoding_table: None,
        };

        if config.use_tables {
            coder.generate_tables();
        }
        Ok(coder)
    }

    pub fn quantization(&self) -> u8 {
        self.quantization
    }

    /// The largest representable depth value.
    pub fn max_value(&self) -> u16 {
        if self.quantization >= 16 {
            u16::MAX
        } else {
            (1u16 << self.quantization) - 1
        }
    }

    //==============================================================================
    // Bulk transforms
    //==============================================================================

    /// Encodes `source` into `dest`, element by element.
    ///
    /// # Errors
    /// Rejects mismatched buffer lengths; out-of-range depth values clamp.
    pub fn encode(&self, source: &[u16], dest: &mut [Color]) -> Result<(), DepthpackError> {
        if source.len() != dest.len() {
            return Err(DepthpackError::BufferMismatch {
                expected: source.len(),
                actual: dest.len(),
            });
        }
        for (value, out) in source.iter().zip(dest.iter_mut()) {
            *out = self.encode_pixel(*value);
        }
        Ok(())
    }

    /// Decodes `source` into `dest`, element by element.
    ///
    /// # Errors
    /// Rejects mismatched buffer lengths.
    pub fn decode(&self, source: &[Color], dest: &mut [u16]) -> Result<(), DepthpackError> {
        if source.len() != dest.len() {
            return Err(DepthpackError::BufferMismatch {
                expected: source.len(),
                actual: dest.len(),
            });
        }
        for (color, out) in source.iter().zip(dest.iter_mut()) {
            *out = self.decode_pixel(*color);
        }
        Ok(())
    }

    /// Allocating convenience wrapper around [`StreamCoder::encode`].
    pub fn encode_vec(&self, source: &[u16]) -> Vec<Color> {
        source.iter().map(|&v| self.encode_pixel(v)).collect()
    }

    /// Allocating convenience wrapper around [`StreamCoder::decode`].
    pub fn decode_vec(&self, source: &[Color]) -> Vec<u16> {
        source.iter().map(|&c| self.decode_pixel(c)).collect()
    }

    //==============================================================================
    // Per-pixel paths
    //==============================================================================

    #[inline]
    fn encode_pixel(&self, value: u16) -> Color {
        match &self.encoding_table {
            Some(table) => table.get(value.min(self.max_value())),
            None => self.encode_one(value),
        }
    }

    #[inline]
    fn decode_pixel(&self, color: Color) -> u16 {
        if self.interpolate {
            self.decode_trilinear(color)
        } else {
            let native = match &self.spacing {
                Some(spacing) => spacing.shrink_color(color),
                None => color,
            };
            let base = match &self.decoding_table {
                Some(table) => table.get(native),
                None => self.kernel.decode_value(native) << self.shift,
            };
            // Center inside the truncated sub-lattice step.
            let half = (1u16 << self.shift) >> 1;
            (base + half).min(self.max_value())
        }
    }

    /// Direct (table-free) encode of one value.
    fn encode_one(&self, value: u16) -> Color {
        let value = value.min(self.max_value());
        if self.interpolate && self.shift > 0 {
            let steps = 1u32 << self.shift;
            let capacity_max = ((1u32 << self.kernel.coding_bits()) - 1) as u16;

            let t = value as f32 / steps as f32;
            let lo = (t.floor() as u16).min(capacity_max);
            let hi = (lo + 1).min(capacity_max);
            let frac = t - lo as f32;

            let c0 = self.spread(self.kernel.encode_value(lo));
            let c1 = self.spread(self.kernel.encode_value(hi));
            let mut out = Color::default();
            for k in 0..3 {
                let blended = c0[k] as f32 + (c1[k] as f32 - c0[k] as f32) * frac;
                out[k] = blended.round() as u8;
            }
            out
        } else {
            self.spread(self.kernel.encode_value(value >> self.shift))
        }
    }

    #[inline]
    fn spread(&self, native: Color) -> Color {
        match &self.spacing {
            Some(spacing) => spacing.enlarge_color(native),
            None => native,
        }
    }

    /// Seam-aware trilinear reconstruction over the native lattice.
    fn decode_trilinear(&self, color: Color) -> u16 {
        let spacing = match &self.spacing {
            // Interpolation is only enabled for kernels that carry spacing
            // tables; anything else falls back to the direct path.
            None => return self.kernel.decode_value(color) << self.shift,
            Some(spacing) => spacing,
        };

        let bits = self.kernel.channel_bits();
        let mut corner = [0usize; 3];
        let mut frac = [0f32; 3];
        for k in 0..3 {
            let (c, f) = spacing.locate(k, color[k]);
            corner[k] = c as usize;
            frac[k] = f;
        }

        // Decode the enclosing unit cube of native lattice corners.
        let mut values = [[[0i32; 2]; 2]; 2];
        for (dx, plane) in values.iter_mut().enumerate() {
            for (dy, row) in plane.iter_mut().enumerate() {
                for (dz, value) in row.iter_mut().enumerate() {
                    let native = Color::new(
                        clamp_coord(corner[0] + dx, bits[0]),
                        clamp_coord(corner[1] + dy, bits[1]),
                        clamp_coord(corner[2] + dz, bits[2]),
                    );
                    *value = match &self.decoding_table {
                        Some(table) => table.get(native) as i32,
                        None => (self.kernel.decode_value(native) << self.shift) as i32,
                    };
                }
            }
        }

        // Axes whose corner pairs jump across a lattice seam snap to the
        // nearer corner instead of blending; the threshold scales with the
        // sub-lattice step.
        let threshold = 2i32 << self.shift;
        for axis in 0..3 {
            let mut max_jump = 0i32;
            for a in 0..2 {
                for b in 0..2 {
                    let (lo, hi) = match axis {
                        0 => (values[0][a][b], values[1][a][b]),
                        1 => (values[a][0][b], values[a][1][b]),
                        _ => (values[a][b][0], values[a][b][1]),
                    };
                    max_jump = max_jump.max((hi - lo).abs());
                }
            }
            if max_jump > threshold {
                frac[axis] = if frac[axis] < 0.5 { 0.0 } else { 1.0 };
            }
        }

        let mut acc = 0f32;
        for (dx, plane) in values.iter().enumerate() {
            for (dy, row) in plane.iter().enumerate() {
                for (dz, &value) in row.iter().enumerate() {
                    let weight = axis_weight(frac[0], dx)
                        * axis_weight(frac[1], dy)
                        * axis_weight(frac[2], dz);
                    acc += weight * value as f32;
                }
            }
        }

        (acc.round() as i32).clamp(0, self.max_value() as i32) as u16
    }

    fn generate_tables(&mut self) {
        self.decoding_table = Some(DecodingTable::build(&self.kernel, self.shift));
        let encoding = EncodingTable::build(self.max_value(), |v| self.encode_one(v));
        debug!(
            "coding tables ready: {} encode entries, decode sides {:?}",
            encoding.len(),
            self.decoding_table.as_ref().map(|t| t.sides())
        );
        self.encoding_table = Some(encoding);
    }
}

#[inline]
fn clamp_coord(coord: usize, bits: u8) -> u8 {
    if bits == 0 {
        return 0;
    }
    coord.min((1usize << bits) - 1) as u8
}

#[inline]
fn axis_weight(frac: f32, upper: usize) -> f32 {
    if upper == 1 {
        frac
    } else {
        1.0 - frac
    }
}
