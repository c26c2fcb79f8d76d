//! The single source of truth for all depthpack codec configuration.
//!
//! This module defines the unified `CodecConfig` struct, which is designed to
//! be created once at the application boundary (e.g., from a user's JSON file
//! or command-line layer) and then passed into [`crate::codec::StreamCoder`].
//!
//! Algorithm identity is a closed enum parsed here, at the boundary; the core
//! never selects an algorithm by runtime string comparison.

use serde::{Deserialize, Serialize};

use crate::error::DepthpackError;

//==================================================================================
// I. Core Configuration Enums
//==================================================================================

/// The seven value-to-color algorithm variants.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    /// Z-order bit interleaving. Exact, but with no error-locality guarantee;
    /// mostly the base map the curve variants refine.
    Morton,

    /// 3D Hilbert curve with sub-cell subdivision. The recommended variant
    /// for lossy pipelines.
    Hilbert,

    /// Contiguous bit fields, one per channel. Exact but fragile at field
    /// carries.
    Packed,

    /// Packed with a boustrophedon parity fold that makes field carries
    /// continuous in the stored channels.
    Split,

    /// Wrapped-cosine phase encoding with a coarse linear counter channel.
    Phase,

    /// Folded triangular waves at a quarter-period offset, plus a coarse
    /// linear channel.
    Triangle,

    /// Six-segment piecewise-linear hue ramp.
    Hue,
}

impl Default for Algorithm {
    fn default() -> Self {
        Algorithm::Hilbert
    }
}

//==================================================================================
// II. The Unified CodecConfig
//==================================================================================

/// The full configuration consumed by `StreamCoder::new`.
///
/// Optional parameters (`algo_bits`, `channel_distribution`) are derived from
/// `quantization` when absent; see the individual field docs. Validation
/// happens at construction time and rejects any combination the selected
/// variant cannot honor.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct CodecConfig {
    /// Which algorithm variant maps values to colors.
    #[serde(default)]
    pub algorithm: Algorithm,

    /// Number of significant bits retained in each depth value. Values are
    /// logical, i.e. in `[0, 2^quantization − 1]`.
    #[serde(default = "default_quantization")]
    pub quantization: u8,

    /// Bits per lattice axis for the curve variants, or the high-field width
    /// used to derive a 2-field channel distribution for Packed/Split.
    /// `None` derives the widest setting the variant's constraints allow.
    #[serde(default)]
    pub algo_bits: Option<u8>,

    /// Per-channel bit widths for the Packed/Split families. `None` derives
    /// a 2-field distribution from `algo_bits`. Ignored by other variants.
    #[serde(default)]
    pub channel_distribution: Option<[u8; 3]>,

    /// If true, native coordinates are spread over the 8-bit channel range
    /// through sensitivity-weighted spacing tables; otherwise a uniform
    /// shift is used.
    #[serde(default = "default_true")]
    pub enlarge: bool,

    /// If true, encode blends between adjacent lattice points and decode
    /// reconstructs through seam-aware trilinear interpolation, for variants
    /// that support it.
    #[serde(default)]
    pub interpolate: bool,

    /// If true, dense encode/decode lookup tables are precomputed at
    /// construction for O(1) amortized per-pixel cost.
    #[serde(default = "default_true")]
    pub use_tables: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::default(),
            quantization: default_quantization(),
            algo_bits: None,
            channel_distribution: None,
            enlarge: true,
            interpolate: false,
            use_tables: true,
        }
    }
}

impl CodecConfig {
    /// Parses a configuration from its JSON representation.
    pub fn from_json(json: &str) -> Result<Self, DepthpackError> {
        let config: CodecConfig = serde_json::from_str(json)?;
        config.validate_range()?;
        Ok(config)
    }

    /// Range check shared by every variant; variant-specific constraints are
    /// enforced when the kernel is instantiated.
    pub fn validate_range(&self) -> Result<(), DepthpackError> {
        if self.quantization < 1 || self.quantization > 16 {
            return Err(DepthpackError::InvalidQuantization(self.quantization));
        }
        if let Some(bits) = self.algo_bits {
            if bits < 1 || bits > 8 {
                return Err(DepthpackError::InvalidAlgoBits {
                    algo_bits: bits,
                    quantization: self.quantization,
                });
            }
        }
        Ok(())
    }

    /// The maximum representable depth value under this quantization width.
    pub fn max_value(&self) -> u16 {
        if self.quantization >= 16 {
            u16::MAX
        } else {
            (1u16 << self.quantization) - 1
        }
    }
}

/// Helper for `serde` to default a boolean field to true.
fn default_true() -> bool {
    true
}

/// Helper for `serde` to provide the default quantization width.
fn default_quantization() -> u8 {
    12
}

//==================================================================================
// III. Unit Tests
//==================================================================================
