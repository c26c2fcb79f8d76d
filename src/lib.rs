//! This file is the root of the `depthpack` Rust crate.
//!
//! depthpack encodes single-channel depth rasters (16-bit integers) into
//! 3-channel 8-bit color images so they can be stored and transmitted
//! through ordinary lossy image pipelines (JPEG/PNG/WebP) and decoded back
//! with bounded reconstruction error.
//!
//! The crate is organized leaf-first:
//! 1. `kernels` — the seven stateless value-to-color algorithm variants.
//! 2. `codec` — spacing tables, lookup tables, and the [`StreamCoder`]
//!    orchestrator that turns one kernel into a bulk codec.
//! 3. `processing` — quantization and denoising steps bracketing the codec.
//!
//! Reading depth files and encoding/decoding image containers are external
//! concerns; the boundary is plain `u16` depth slices and [`Color`] pixel
//! buffers (see [`colors_as_bytes`] for the zero-copy byte view).

//==================================================================================
// 0. Constants
//==================================================================================
/// The crate version, automatically set from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//==================================================================================
// 1. Module Declarations
//==================================================================================

pub mod codec;
pub mod config;
pub mod kernels;
pub mod processing;

mod error;
mod traits;
mod types;
mod utils;

//==================================================================================
// 2. Public API Surface
//==================================================================================

pub use codec::{SpacingTable, StreamCoder};
pub use config::{Algorithm, CodecConfig};
pub use error::DepthpackError;
pub use traits::Coder;
pub use types::Color;
pub use utils::{bytes_as_colors, bytes_as_colors_mut, colors_as_bytes};
