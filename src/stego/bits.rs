// Copyright (c) 2026 Wavehide Contributors
// SPDX-License-Identifier: GPL-3.0-only

//! Bit-pair packing codec: the only module that touches raw coefficient
//! storage.
//!
//! Each approximation-subband cell carries two payload bits in bits 3–4 of
//! the truncated integer part of its value; the fractional remainder is
//! preserved bit-for-bit. Payload bytes are consumed MSB-first, two bits
//! per cell, in row-major cell order.

use crate::dwt::CoeffMatrix;
use crate::stego::error::StegoError;

/// Mask covering the two carrier bits.
const PAIR_MASK: i64 = 0b11000;

/// Carrier bit offset within the integer part.
const PAIR_SHIFT: u32 = 3;

/// A cell whose self-verification failed even after the corrective rewrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteAnomaly {
    pub row: usize,
    pub col: usize,
    pub expected: u8,
    pub got: u8,
}

/// Read the 2-bit group carried by a coefficient value.
fn read_pair(value: f64) -> u8 {
    (((value.trunc() as i64) & PAIR_MASK) >> PAIR_SHIFT) as u8
}

/// Clear-and-set the carrier bits, keeping the fractional remainder.
fn write_pair(value: f64, pair: u8) -> f64 {
    let whole = value.trunc() as i64;
    let frac = value - whole as f64;
    let new_whole = (whole & !PAIR_MASK) | ((pair as i64) << PAIR_SHIFT);
    new_whole as f64 + frac
}

/// Clear-and-set the carrier bits, dropping the fractional remainder.
///
/// Corrective rewrite for the rare case where re-adding the fraction
/// rounded the integer part across a carrier-bit boundary.
fn write_pair_truncated(value: f64, pair: u8) -> f64 {
    let whole = value.trunc() as i64;
    ((whole & !PAIR_MASK) | ((pair as i64) << PAIR_SHIFT)) as f64
}

/// Embed a payload into the matrix, two bits per cell in row-major order.
///
/// Every write is immediately verified by re-reading the carrier bits; a
/// mismatch triggers one corrective rewrite without the fractional part,
/// and a persistent mismatch is reported as a [`WriteAnomaly`] while
/// embedding continues for the remaining cells.
///
/// # Errors
/// [`StegoError::CapacityExceeded`] if the payload needs more 2-bit slots
/// than the matrix has cells; returned before any cell is modified.
pub fn embed(matrix: &mut CoeffMatrix, payload: &[u8]) -> Result<Vec<WriteAnomaly>, StegoError> {
    let needed = payload.len() * 4;
    let available = matrix.len();
    if needed > available {
        return Err(StegoError::CapacityExceeded { needed, available });
    }

    let cols = matrix.cols();
    let mut anomalies = Vec::new();

    for (slot, pair) in pairs(payload).enumerate() {
        let (row, col) = (slot / cols, slot % cols);
        matrix.set(row, col, write_pair(matrix.get(row, col), pair));

        let got = read_pair(matrix.get(row, col));
        if got != pair {
            matrix.set(row, col, write_pair_truncated(matrix.get(row, col), pair));
            let got = read_pair(matrix.get(row, col));
            if got != pair {
                anomalies.push(WriteAnomaly { row, col, expected: pair, got });
            }
        }
    }

    Ok(anomalies)
}

/// Extract the full carried byte stream, scanning every cell row-major.
///
/// Trailing cells that do not complete a byte are dropped; payloads are
/// always whole bytes. Terminator handling happens one layer up, in the
/// payload partitioner, so the parity bytes that follow the in-stream
/// terminator are still collected.
pub fn extract(matrix: &CoeffMatrix) -> Vec<u8> {
    let mut out = Vec::with_capacity(matrix.len() / 4);
    let mut acc = 0u8;
    let mut pairs_in_acc = 0u8;

    for &value in matrix.values() {
        acc = (acc << 2) | read_pair(value);
        pairs_in_acc += 1;
        if pairs_in_acc == 4 {
            out.push(acc);
            acc = 0;
            pairs_in_acc = 0;
        }
    }

    out
}

/// 2-bit slots available in a matrix of the given cell count, in bytes.
pub fn byte_capacity(cells: usize) -> usize {
    cells / 4
}

/// Iterate the 2-bit groups of a payload, MSB-first within each byte.
fn pairs(payload: &[u8]) -> impl Iterator<Item = u8> + '_ {
    payload
        .iter()
        .flat_map(|&byte| (0..4).map(move |i| (byte >> (6 - 2 * i)) & 0b11))
}
