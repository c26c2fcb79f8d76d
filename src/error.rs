//! This module defines the single, unified error type for the entire depthpack
//! library. It uses the `thiserror` crate to provide ergonomic, context-aware
//! error handling.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DepthpackError {
    // =========================================================================
    // === Configuration Errors (fatal at StreamCoder construction)
    // =========================================================================
    #[error("Quantization width {0} is outside the supported range [1, 16]")]
    InvalidQuantization(u8),

    #[error("{algo_bits} algorithm bits cannot satisfy quantization width {quantization} for this variant")]
    InvalidAlgoBits { algo_bits: u8, quantization: u8 },

    #[error("Channel distribution {distribution:?} is invalid for quantization width {quantization}: {reason}")]
    InvalidDistribution {
        distribution: [u8; 3],
        quantization: u8,
        reason: String,
    },

    // =========================================================================
    // === Buffer & Interop Errors
    // =========================================================================
    #[error("Buffer length mismatch: expected {expected} elements, got {actual}")]
    BufferMismatch { expected: usize, actual: usize },

    #[error("Raster dimensions {width}x{height} do not match buffer of {len} elements")]
    RasterMismatch {
        width: u32,
        height: u32,
        len: usize,
    },

    /// An error from a safe byte-casting operation failing.
    #[error("Byte slice casting error: {0}")]
    PodCast(String),

    /// An error from the Serde JSON library during configuration parsing.
    #[error("Serde JSON error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    #[error("Internal logic error (this is a bug): {0}")]
    InternalError(String),
}

// =============================================================================
// === Manual `From` Implementations ===
// =============================================================================

impl From<bytemuck::PodCastError> for DepthpackError {
    fn from(err: bytemuck::PodCastError) -> Self {
        DepthpackError::PodCast(err.to_string())
    }
}
