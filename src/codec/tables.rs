//! This module holds the dense lookup tables the stream coder can
//! precompute: one color per representable depth value, and one cell-base
//! depth per representable native coordinate triple.
//!
//! The tables are a pure performance cache, never a source of truth: their
//! contents must agree with the direct kernel computation for every input,
//! and the test suite asserts exactly that.

use crate::traits::Coder;
use crate::types::Color;

/// `EncodingTable[v]` = final stored color for depth value `v`, with
/// interpolation and enlargement already applied.
#[derive(Debug, Clone)]
pub struct EncodingTable {
    colors: Vec<Color>,
}

impl EncodingTable {
    pub fn build(max_value: u16, encode_one: impl Fn(u16) -> Color) -> Self {
        let colors = (0..=max_value).map(encode_one).collect();
        Self { colors }
    }

    #[inline]
    pub fn get(&self, value: u16) -> Color {
        self.colors[(value as usize).min(self.colors.len() - 1)]
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

/// `DecodingTable[x][y][z]` = decoded cell-base depth (already scaled into
/// the quantization domain) for every native coordinate triple.
#[derive(Debug, Clone)]
pub struct DecodingTable {
    values: Vec<u16>,
    sides: [usize; 3],
}

impl DecodingTable {
    pub fn build<C: Coder>(coder: &C, shift: u8) -> Self {
        let bits = coder.channel_bits();
        let sides = [
            1usize << bits[0],
            1usize << bits[1],
            1usize << bits[2],
        ];

        let mut values = vec![0u16; sides[0] * sides[1] * sides[2]];
        for x in 0..sides[0] {
            for y in 0..sides[1] {
                for z in 0..sides[2] {
                    let idx = (x * sides[1] + y) * sides[2] + z;
                    values[idx] =
                        coder.decode_value(Color::new(x as u8, y as u8, z as u8)) << shift;
                }
            }
        }

        Self { values, sides }
    }

    /// Looks up a native coordinate triple, clamping each coordinate to its
    /// side.
    #[inline]
    pub fn get(&self, native: Color) -> u16 {
        let x = (native[0] as usize).min(self.sides[0] - 1);
        let y = (native[1] as usize).min(self.sides[1] - 1);
        let z = (native[2] as usize).min(self.sides[2] - 1);
        self.values[(x * self.sides[1] + y) * self.sides[2] + z]
    }

    pub fn sides(&self) -> [usize; 3] {
        self.sides
    }
}

//==================================================================================
// Unit Tests
//==================================================================================
