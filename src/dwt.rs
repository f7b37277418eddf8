// Copyright (c) 2026 Wavehide Contributors
// SPDX-License-Identifier: GPL-3.0-only

//! Single-level 2-D Haar decomposition and coefficient storage.
//!
//! Provides [`CoeffMatrix`] for one subband's coefficients and
//! [`Subbands`] for the four outputs of a forward decomposition
//! (approximation + three detail bands).
//!
//! The transform works on non-overlapping 2×2 pixel blocks. For a block
//! `[[a, b], [c, d]]` the four coefficients are
//!
//! ```text
//! approx = (a + b + c + d) / 2     detail_h = (a - b + c - d) / 2
//! detail_v = (a + b - c - d) / 2   detail_d = (a - b - c + d) / 2
//! ```
//!
//! which is the orthonormal Haar transform with the two 1/√2 half-band
//! normalizations fused into a single /2. Integer input samples therefore
//! produce exactly representable half-integer coefficients, and
//! forward → inverse reconstructs the input bit-for-bit. Odd image
//! dimensions are handled by duplicating the edge sample, matching
//! symmetric boundary extension for a length-2 filter.

use crate::pixels::Plane;

/// A 2-D grid of real-valued subband coefficients, row-major flat storage.
#[derive(Debug, Clone, PartialEq)]
pub struct CoeffMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl CoeffMatrix {
    /// Create a matrix initialized to zero.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols, data: vec![0.0; rows * cols] }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.rows * self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        debug_assert!(row < self.rows && col < self.cols);
        self.data[row * self.cols + col]
    }

    pub fn set(&mut self, row: usize, col: usize, val: f64) {
        debug_assert!(row < self.rows && col < self.cols);
        self.data[row * self.cols + col] = val;
    }

    /// Raw read-only access to all coefficients in row-major order.
    pub fn values(&self) -> &[f64] {
        &self.data
    }

    /// Raw mutable access to all coefficients in row-major order.
    pub fn values_mut(&mut self) -> &mut [f64] {
        &mut self.data
    }
}

/// The four subbands of a single-level 2-D decomposition.
///
/// Each matrix has `ceil(h/2) × ceil(w/2)` cells for an `h × w` input.
/// Only `approx` is ever modified by the embedding layer; the detail
/// bands are carried through untouched so the inverse reconstructs the
/// unmodified image content exactly.
#[derive(Debug, Clone)]
pub struct Subbands {
    pub approx: CoeffMatrix,
    pub detail_h: CoeffMatrix,
    pub detail_v: CoeffMatrix,
    pub detail_d: CoeffMatrix,
    /// Original input dimensions, needed to drop the synthesized edge
    /// samples on reconstruction of odd-sized inputs.
    width: usize,
    height: usize,
}

impl Subbands {
    /// Input plane width this decomposition came from.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Input plane height this decomposition came from.
    pub fn height(&self) -> usize {
        self.height
    }
}

/// Number of approximation-subband cells for an image of the given size.
pub fn approx_cells(width: usize, height: usize) -> usize {
    width.div_ceil(2) * height.div_ceil(2)
}

/// Forward single-level 2-D Haar decomposition of an 8-bit sample plane.
pub fn forward(plane: &Plane) -> Subbands {
    let (w, h) = (plane.width(), plane.height());
    let (cw, ch) = (w.div_ceil(2), h.div_ceil(2));

    let mut approx = CoeffMatrix::new(ch, cw);
    let mut detail_h = CoeffMatrix::new(ch, cw);
    let mut detail_v = CoeffMatrix::new(ch, cw);
    let mut detail_d = CoeffMatrix::new(ch, cw);

    // Edge duplication: reads past the right/bottom edge repeat the last
    // in-range sample.
    let sample = |x: usize, y: usize| -> f64 {
        plane.get(x.min(w - 1), y.min(h - 1)) as f64
    };

    for by in 0..ch {
        for bx in 0..cw {
            let (x, y) = (bx * 2, by * 2);
            let a = sample(x, y);
            let b = sample(x + 1, y);
            let c = sample(x, y + 1);
            let d = sample(x + 1, y + 1);
            approx.set(by, bx, (a + b + c + d) / 2.0);
            detail_h.set(by, bx, (a - b + c - d) / 2.0);
            detail_v.set(by, bx, (a + b - c - d) / 2.0);
            detail_d.set(by, bx, (a - b - c + d) / 2.0);
        }
    }

    Subbands { approx, detail_h, detail_v, detail_d, width: w, height: h }
}

/// Inverse single-level 2-D Haar reconstruction.
///
/// Returns the reconstructed samples as real values in row-major order
/// (`height × width`); the caller clamps and quantizes to the pixel range.
pub fn inverse(bands: &Subbands) -> Vec<f64> {
    let (w, h) = (bands.width, bands.height);
    let mut out = vec![0.0f64; w * h];

    for by in 0..bands.approx.rows() {
        for bx in 0..bands.approx.cols() {
            let ll = bands.approx.get(by, bx);
            let lh = bands.detail_h.get(by, bx);
            let hl = bands.detail_v.get(by, bx);
            let hh = bands.detail_d.get(by, bx);

            let a = (ll + lh + hl + hh) / 2.0;
            let b = (ll - lh + hl - hh) / 2.0;
            let c = (ll + lh - hl - hh) / 2.0;
            let d = (ll - lh - hl + hh) / 2.0;

            let (x, y) = (bx * 2, by * 2);
            out[y * w + x] = a;
            if x + 1 < w {
                out[y * w + x + 1] = b;
            }
            if y + 1 < h {
                out[(y + 1) * w + x] = c;
            }
            if x + 1 < w && y + 1 < h {
                out[(y + 1) * w + x + 1] = d;
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plane_from(width: usize, height: usize, f: impl Fn(usize, usize) -> u8) -> Plane {
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Plane::from_raw(width, height, data)
    }

    #[test]
    fn forward_inverse_exact_even_dims() {
        let plane = plane_from(8, 6, |x, y| (x * 31 + y * 17 + 3) as u8);
        let bands = forward(&plane);
        let rec = inverse(&bands);
        for y in 0..6 {
            for x in 0..8 {
                assert_eq!(rec[y * 8 + x], plane.get(x, y) as f64, "pixel ({x},{y})");
            }
        }
    }

    #[test]
    fn forward_inverse_exact_odd_dims() {
        let plane = plane_from(7, 5, |x, y| (x * 53 + y * 29) as u8);
        let bands = forward(&plane);
        assert_eq!(bands.approx.rows(), 3);
        assert_eq!(bands.approx.cols(), 4);
        let rec = inverse(&bands);
        for y in 0..5 {
            for x in 0..7 {
                assert_eq!(rec[y * 7 + x], plane.get(x, y) as f64, "pixel ({x},{y})");
            }
        }
    }

    #[test]
    fn approx_is_half_block_sum() {
        let plane = plane_from(4, 4, |x, y| (10 + x + 4 * y) as u8);
        let bands = forward(&plane);
        let expected = (10 + 11 + 14 + 15) as f64 / 2.0;
        assert_eq!(bands.approx.get(0, 0), expected);
    }

    #[test]
    fn integer_input_gives_half_integer_coefficients() {
        let plane = plane_from(6, 6, |x, y| ((x * 7 + y * 13) % 251) as u8);
        let bands = forward(&plane);
        for &v in bands.approx.values() {
            assert_eq!((v * 2.0).fract(), 0.0, "coefficient {v} not half-integer");
        }
    }

    #[test]
    fn modified_approx_shifts_block_proportionally() {
        let plane = plane_from(4, 4, |_, _| 100);
        let mut bands = forward(&plane);
        // +8 in the approximation cell spreads +4 over each of the 4 pixels.
        let v = bands.approx.get(0, 0);
        bands.approx.set(0, 0, v + 8.0);
        let rec = inverse(&bands);
        assert_eq!(rec[0], 104.0);
        assert_eq!(rec[1], 104.0);
        assert_eq!(rec[4], 104.0);
        assert_eq!(rec[5], 104.0);
        // Untouched blocks reconstruct unchanged.
        assert_eq!(rec[2], 100.0);
    }

    #[test]
    fn capacity_matches_subband_dims() {
        assert_eq!(approx_cells(8, 6), 12);
        assert_eq!(approx_cells(7, 5), 12);
        assert_eq!(approx_cells(1, 1), 1);
    }
}
