//! This module builds the per-axis enlarge/shrink remapping tables between a
//! kernel's native coordinate range and the full 0..255 channel range.
//!
//! Lossy compression's rounding noise is uniform in the stored channels, but
//! its effect on decoded depth is not: some native-coordinate steps, if
//! perturbed, cause large depth jumps, others cause none. The weighted
//! synthesis measures each axis's local decode sensitivity over the whole
//! native lattice and hands fragile steps more 8-bit codepoints, so one
//! rounding step of the image codec stays inside (or adjacent to) the
//! correct native step. The uniform variant is the plain left-shift spread
//! used when enlargement is disabled.

use log::debug;

use crate::traits::Coder;
use crate::types::Color;

/// Forward (`enlarge`) and inverse (`shrink`) per-axis remapping arrays.
///
/// Invariants, established at construction and relied on by the stream
/// coder:
/// - `enlarge[k]` is non-decreasing and injective over the native domain;
/// - `shrink[k]` is total (defined for all 256 inputs), non-decreasing, and
///   a left-inverse of `enlarge[k]`;
/// - every native step owns at least one 8-bit codepoint, so a ±1
///   perturbation in the 8-bit domain never skips past an adjacent native
///   coordinate.
#[derive(Debug, Clone)]
pub struct SpacingTable {
    enlarge: [Vec<u8>; 3],
    shrink: [Vec<u8>; 3],
}

impl SpacingTable {
    /// Uniform spread: native coordinates are left-shifted into the high
    /// bits of the channel, and shrinking rounds to the nearest native step.
    pub fn uniform(bits: [u8; 3]) -> Self {
        let mut enlarge: [Vec<u8>; 3] = Default::default();
        let mut shrink: [Vec<u8>; 3] = Default::default();

        for k in 0..3 {
            if bits[k] == 0 {
                enlarge[k] = vec![0];
                shrink[k] = vec![0; 256];
                continue;
            }
            let side = 1usize << bits[k];
            let shift = 8 - bits[k];
            enlarge[k] = (0..side).map(|c| (c << shift) as u8).collect();
            shrink[k] = (0..256usize)
                .map(|e| {
                    if shift == 0 {
                        e as u8
                    } else {
                        ((e + (1 << (shift - 1))) >> shift).min(side - 1) as u8
                    }
                })
                .collect();
        }

        Self { enlarge, shrink }
    }

    /// Sensitivity-weighted spread: gaps between consecutive codepoints are
    /// proportional to the worst decoded-depth jump the corresponding native
    /// step can cause anywhere in the lattice, with a floor of one codepoint
    /// per step.
    pub fn weighted<C: Coder>(coder: &C) -> Self {
        let bits = coder.channel_bits();
        let sides = [
            1usize << bits[0],
            1usize << bits[1],
            1usize << bits[2],
        ];

        // Dense decode over the native lattice, z fastest.
        let mut cube = vec![0u16; sides[0] * sides[1] * sides[2]];
        for x in 0..sides[0] {
            for y in 0..sides[1] {
                for z in 0..sides[2] {
                    let idx = (x * sides[1] + y) * sides[2] + z;
                    cube[idx] = coder.decode_value(Color::new(x as u8, y as u8, z as u8));
                }
            }
        }

        let mut table = Self::uniform(bits);
        for k in 0..3 {
            if sides[k] < 2 {
                continue;
            }
            let errors = error_vector(&cube, sides, k);
            let alloc = allocate_codepoints(&errors, 255);

            let mut enlarge = Vec::with_capacity(sides[k]);
            enlarge.push(0u8);
            let mut acc = 0u32;
            for &a in &alloc {
                acc += a;
                enlarge.push(acc as u8);
            }

            let mut shrink = vec![0u8; 256];
            for (j, &gap) in alloc.iter().enumerate() {
                let start = enlarge[j] as u32;
                for o in 0..gap {
                    // Round to the nearer endpoint; an exact half rounds up.
                    shrink[(start + o) as usize] = if o <= (gap - 1) / 2 {
                        j as u8
                    } else {
                        (j + 1) as u8
                    };
                }
            }
            shrink[255] = (sides[k] - 1) as u8;

            debug!(
                "spacing axis {k}: {} native steps, max sensitivity {}",
                sides[k],
                errors.iter().max().copied().unwrap_or(0)
            );
            table.enlarge[k] = enlarge;
            table.shrink[k] = shrink;
        }

        table
    }

    pub fn enlarge(&self, axis: usize, coord: u8) -> u8 {
        let column = &self.enlarge[axis];
        column[(coord as usize).min(column.len() - 1)]
    }

    pub fn shrink(&self, axis: usize, value: u8) -> u8 {
        self.shrink[axis][value as usize]
    }

    pub fn enlarge_color(&self, native: Color) -> Color {
        Color::new(
            self.enlarge(0, native[0]),
            self.enlarge(1, native[1]),
            self.enlarge(2, native[2]),
        )
    }

    pub fn shrink_color(&self, stored: Color) -> Color {
        Color::new(
            self.shrink(0, stored[0]),
            self.shrink(1, stored[1]),
            self.shrink(2, stored[2]),
        )
    }

    /// Lower bracketing native coordinate and the fractional position inside
    /// its codepoint gap, for interpolated decoding.
    pub(crate) fn locate(&self, axis: usize, value: u8) -> (u8, f32) {
        let column = &self.enlarge[axis];
        let side = column.len();
        if side == 1 {
            return (0, 0.0);
        }

        let mut coord = self.shrink[axis][value as usize] as usize;
        if column[coord] > value {
            coord -= 1;
        }
        if coord >= side - 1 {
            return ((side - 1) as u8, 0.0);
        }

        let gap = (column[coord + 1] - column[coord]) as f32;
        (coord as u8, (value - column[coord]) as f32 / gap)
    }
}

/// Per-step sensitivity along one axis: the maximum absolute decoded
/// difference between adjacent native coordinates, observed anywhere in the
/// lattice.
fn error_vector(cube: &[u16], sides: [usize; 3], axis: usize) -> Vec<u32> {
    let index = |c: [usize; 3]| (c[0] * sides[1] + c[1]) * sides[2] + c[2];
    let mut errors = vec![0u32; sides[axis] - 1];

    let others = match axis {
        0 => [1, 2],
        1 => [0, 2],
        _ => [0, 1],
    };
    for a in 0..sides[others[0]] {
        for b in 0..sides[others[1]] {
            for (j, err) in errors.iter_mut().enumerate() {
                let mut lo = [0usize; 3];
                lo[axis] = j;
                lo[others[0]] = a;
                lo[others[1]] = b;
                let mut hi = lo;
                hi[axis] = j + 1;

                let diff = (cube[index(hi)] as i32 - cube[index(lo)] as i32).unsigned_abs();
                *err = (*err).max(diff);
            }
        }
    }
    errors
}

/// Distributes `target` codepoint steps over the gaps proportionally to
/// their sensitivity, guaranteeing every gap at least one step (so adjacent
/// native coordinates stay distinguishable after enlargement). Largest
/// remainders win the leftover steps; ties resolve to the lower index.
fn allocate_codepoints(errors: &[u32], target: u32) -> Vec<u32> {
    let n = errors.len() as u32;
    debug_assert!(n <= target);
    let mut alloc = vec![1u32; errors.len()];
    let extra = target - n;
    if extra == 0 {
        return alloc;
    }

    let sum: u64 = errors.iter().map(|&e| e as u64).sum();
    if sum == 0 {
        for (j, slot) in alloc.iter_mut().enumerate() {
            *slot += extra / n + u32::from((j as u32) < extra % n);
        }
        return alloc;
    }

    let mut remainders: Vec<(f64, usize)> = Vec::with_capacity(errors.len());
    let mut used = 0u32;
    for (j, &err) in errors.iter().enumerate() {
        let share = err as f64 * extra as f64 / sum as f64;
        let whole = share.floor() as u32;
        alloc[j] += whole;
        used += whole;
        remainders.push((share - whole as f64, j));
    }

    remainders.sort_by(|a, b| b.0.total_cmp(&a.0).then(a.1.cmp(&b.1)));
    let leftover = (target - n - used).min(remainders.len() as u32);
    for &(_, j) in remainders.iter().take(leftover as usize) {
        alloc[j] += 1;
    }
    alloc
}

//==================================================================================
// Unit Tests
//==================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernels::{Hilbert, Packed};

    fn assert_invariants(table: &SpacingTable, bits: [u8; 3]) {
        for k in 0..3 {
            let side = 1usize << bits[k];
            // Enlarge is injective and non-decreasing over the native domain.
            for c in 1..side {
                assert!(
                    table.enlarge(k, c as u8) > table.enlarge(k, (c - 1) as u8),
                    "enlarge not strictly increasing on axis {k} at {c}"
                );
            }
            // Shrink is total, non-decreasing, and a left-inverse of enlarge.
            for e in 1..256usize {
                let prev = table.shrink(k, (e - 1) as u8);
                let cur = table.shrink(k, e as u8);
                assert!(cur >= prev, "shrink not monotonic on axis {k} at {e}");
                assert!(
                    cur - prev <= 1,
                    "shrink skips a native step on axis {k} at {e}"
                );
            }
            for c in 0..side {
                assert_eq!(
                    table.shrink(k, table.enlarge(k, c as u8)),
                    c as u8,
                    "shrink(enlarge({c})) != {c} on axis {k}"
                );
            }
        }
    }

    #[test]
    fn test_uniform_invariants() {
        assert_invariants(&SpacingTable::uniform([4, 4, 4]), [4, 4, 4]);
        assert_invariants(&SpacingTable::uniform([6, 5, 5]), [6, 5, 5]);
        assert_invariants(&SpacingTable::uniform([8, 8, 0]), [8, 8, 0]);
    }

    #[test]
    fn test_weighted_invariants_hilbert() {
        let coder = Hilbert::new(10, 3).unwrap();
        let table = SpacingTable::weighted(&coder);
        assert_invariants(&table, [4, 4, 4]);
        // Weighted tables span the full channel range.
        for k in 0..3 {
            assert_eq!(table.enlarge(k, 15), 255);
        }
    }

    #[test]
    fn test_weighted_invariants_packed() {
        let coder = Packed::new(10, [4, 3, 3]).unwrap();
        let table = SpacingTable::weighted(&coder);
        assert_invariants(&table, [4, 3, 3]);
    }

    #[test]
    fn test_perturbation_stays_adjacent() {
        // Perturbing an enlarged coordinate by ±1 (one compression rounding
        // step) shrinks back to the same or an adjacent native coordinate.
        let coder = Hilbert::new(10, 3).unwrap();
        let table = SpacingTable::weighted(&coder);
        for k in 0..3 {
            for c in 0u8..16 {
                let e = table.enlarge(k, c);
                for perturbed in [e.saturating_sub(1), e.saturating_add(1)] {
                    let back = table.shrink(k, perturbed) as i32;
                    assert!(
                        (back - c as i32).abs() <= 1,
                        "axis {k}: enlarge({c})={e} perturbed to {perturbed} shrank to {back}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_packed_low_field_gets_uniform_spacing() {
        // Every step of Packed's lowest field changes the value by the same
        // amount, so its axis allocation degenerates to (nearly) uniform.
        let coder = Packed::new(9, [3, 3, 3]).unwrap();
        let table = SpacingTable::weighted(&coder);
        let gaps: Vec<i32> = (0..7)
            .map(|c| table.enlarge(2, c + 1) as i32 - table.enlarge(2, c) as i32)
            .collect();
        let (min, max) = (gaps.iter().min().unwrap(), gaps.iter().max().unwrap());
        assert!(max - min <= 1, "low-field gaps vary: {gaps:?}");
    }

    #[test]
    fn test_allocation_floor_and_total() {
        let alloc = allocate_codepoints(&[0, 1000, 0, 3], 255);
        assert_eq!(alloc.iter().sum::<u32>(), 255);
        assert!(alloc.iter().all(|&a| a >= 1));
        assert!(alloc[1] > alloc[3]);
        assert_eq!(alloc[0], 1);
    }

    #[test]
    fn test_allocation_identity_at_full_resolution() {
        // 255 gaps over 255 codepoints: everyone gets exactly one.
        let errors = vec![7u32; 255];
        let alloc = allocate_codepoints(&errors, 255);
        assert!(alloc.iter().all(|&a| a == 1));
    }
}
