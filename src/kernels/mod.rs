//! This module serves as the public API and dispatcher for the collection of
//! all pure, stateless value-to-color algorithm kernels.
//!
//! It declares the kernel sub-modules and provides the closed [`Kernel`]
//! enum, the single construction and dispatch point used by the stream
//! coder. The variant set is closed and table generation calls the kernels
//! millions of times, so dispatch is a plain match rather than dynamic
//! dispatch.

use crate::config::{Algorithm, CodecConfig};
use crate::error::DepthpackError;
use crate::traits::Coder;
use crate::types::Color;

//==================================================================================
// 1. Module Declarations
//==================================================================================

/// Space-filling-curve variants
pub mod hilbert;
pub mod morton;

/// Bit-packing variants
pub mod packed;
pub mod split;

/// Continuous-wave variants
pub mod hue;
pub mod phase;
pub mod triangle;

pub use hilbert::Hilbert;
pub use hue::Hue;
pub use morton::Morton;
pub use packed::Packed;
pub use phase::Phase;
pub use split::Split;
pub use triangle::Triangle;

//==================================================================================
// 2. Unified Dispatcher
//==================================================================================

/// The closed set of algorithm variants, instantiated from a validated
/// configuration.
#[derive(Debug, Clone)]
pub enum Kernel {
    Morton(Morton),
    Hilbert(Hilbert),
    Packed(Packed),
    Split(Split),
    Phase(Phase),
    Triangle(Triangle),
    Hue(Hue),
}

macro_rules! dispatch {
    ($self:expr, $inner:ident => $body:expr) => {
        match $self {
            Kernel::Morton($inner) => $body,
            Kernel::Hilbert($inner) => $body,
            Kernel::Packed($inner) => $body,
            Kernel::Split($inner) => $body,
            Kernel::Phase($inner) => $body,
            Kernel::Triangle($inner) => $body,
            Kernel::Hue($inner) => $body,
        }
    };
}

impl Kernel {
    /// Instantiates the kernel selected by `config`, deriving the optional
    /// parameters the configuration leaves unset and rejecting combinations
    /// the variant cannot honor.
    pub fn from_config(config: &CodecConfig) -> Result<Self, DepthpackError> {
        config.validate_range()?;
        let q = config.quantization;

        match config.algorithm {
            Algorithm::Morton => Ok(Kernel::Morton(Morton::new(q))),
            Algorithm::Hilbert => {
                let bits = match config.algo_bits {
                    Some(bits) => bits,
                    None => Hilbert::derive_algo_bits(q).ok_or(
                        DepthpackError::InvalidAlgoBits {
                            algo_bits: 0,
                            quantization: q,
                        },
                    )?,
                };
                Ok(Kernel::Hilbert(Hilbert::new(q, bits)?))
            }
            Algorithm::Packed => {
                let distribution = config
                    .channel_distribution
                    .unwrap_or_else(|| packed::derive_distribution(q, config.algo_bits));
                Ok(Kernel::Packed(Packed::new(q, distribution)?))
            }
            Algorithm::Split => {
                let distribution = config
                    .channel_distribution
                    .unwrap_or_else(|| packed::derive_distribution(q, config.algo_bits));
                Ok(Kernel::Split(Split::new(q, distribution)?))
            }
            Algorithm::Phase => Ok(Kernel::Phase(Phase::new(q))),
            Algorithm::Triangle => Ok(Kernel::Triangle(Triangle::new(q))),
            Algorithm::Hue => Ok(Kernel::Hue(Hue::new(q))),
        }
    }
}

impl Coder for Kernel {
    fn encode_value(&self, value: u16) -> Color {
        dispatch!(self, inner => inner.encode_value(value))
    }

    fn decode_value(&self, color: Color) -> u16 {
        dispatch!(self, inner => inner.decode_value(color))
    }

    fn coding_bits(&self) -> u8 {
        dispatch!(self, inner => inner.coding_bits())
    }

    fn channel_bits(&self) -> [u8; 3] {
        dispatch!(self, inner => inner.channel_bits())
    }

    fn supports_enlarge(&self) -> bool {
        dispatch!(self, inner => inner.supports_enlarge())
    }

    fn supports_interpolation(&self) -> bool {
        dispatch!(self, inner => inner.supports_interpolation())
    }
}

//==================================================================================
// 3. Unit Tests
//==================================================================================
