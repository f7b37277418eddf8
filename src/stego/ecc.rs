// Copyright (c) 2026 Wavehide Contributors
// SPDX-License-Identifier: GPL-3.0-only

//! Reed-Solomon error correction over GF(2^8).
//!
//! RS(255, 235) with the primitive polynomial 0x11D (x^8+x^4+x^3+x^2+1):
//! 20 parity symbols per chunk, correcting up to 10 corrupted symbols.
//! Systematic encoding, Berlekamp-Massey decoding with Chien search and
//! the Forney algorithm. Payloads shorter than 235 bytes use a shortened
//! code; longer payloads are split into 235-byte data chunks, each with
//! its own parity block appended.

use std::sync::OnceLock;

/// Primitive polynomial for GF(2^8): x^8 + x^4 + x^3 + x^2 + 1 = 0x11D.
const PRIM_POLY: u16 = 0x11D;

/// Full RS block size.
const BLOCK_LEN: usize = 255;

/// Parity symbols appended to every data chunk.
pub const PARITY_LEN: usize = 20;

/// Data symbols per full chunk.
pub const CHUNK_DATA_LEN: usize = BLOCK_LEN - PARITY_LEN; // 235

/// Correction capability per chunk: t = PARITY_LEN / 2.
pub const T_MAX: usize = PARITY_LEN / 2;

// --- GF(2^8) arithmetic ---

struct GfTables {
    exp: [u8; 512],
    log: [u8; 256],
}

fn gf_tables() -> &'static GfTables {
    static TABLES: OnceLock<GfTables> = OnceLock::new();
    TABLES.get_or_init(|| {
        let mut exp = [0u8; 512];
        let mut log = [0u8; 256];
        let mut x: u16 = 1;
        for i in 0..255u16 {
            exp[i as usize] = x as u8;
            exp[(i + 255) as usize] = x as u8; // wrap-around padding
            log[x as usize] = i as u8;
            x <<= 1;
            if x & 0x100 != 0 {
                x ^= PRIM_POLY;
            }
        }
        exp[510] = exp[0];
        exp[511] = exp[1];
        GfTables { exp, log }
    })
}

fn gf_mul(a: u8, b: u8) -> u8 {
    if a == 0 || b == 0 {
        return 0;
    }
    let t = gf_tables();
    t.exp[t.log[a as usize] as usize + t.log[b as usize] as usize]
}

/// Multiplicative inverse. Zero has no inverse.
fn gf_inv(a: u8) -> u8 {
    debug_assert_ne!(a, 0, "cannot invert zero in GF(2^8)");
    let t = gf_tables();
    t.exp[255 - t.log[a as usize] as usize]
}

/// Evaluate a polynomial at x; `poly[0]` is the highest-degree coefficient.
fn poly_eval(poly: &[u8], x: u8) -> u8 {
    let mut acc = 0u8;
    for &c in poly {
        acc = gf_mul(acc, x) ^ c;
    }
    acc
}

/// Evaluate a polynomial in ascending-power order at x.
fn poly_eval_asc(poly: &[u8], x: u8) -> u8 {
    let mut acc = 0u8;
    let mut x_pow = 1u8;
    for &c in poly {
        acc ^= gf_mul(c, x_pow);
        x_pow = gf_mul(x_pow, x);
    }
    acc
}

/// Generator polynomial g(x) = prod_{i=0}^{19} (x - alpha^i),
/// highest-degree coefficient first.
fn gen_poly() -> &'static [u8] {
    static GEN: OnceLock<Vec<u8>> = OnceLock::new();
    GEN.get_or_init(|| {
        let t = gf_tables();
        let mut g = vec![1u8];
        for i in 0..PARITY_LEN {
            let root = t.exp[i]; // alpha^i
            let mut next = vec![0u8; g.len() + 1];
            for (j, &c) in g.iter().enumerate() {
                next[j] ^= c;
                next[j + 1] ^= gf_mul(c, root);
            }
            g = next;
        }
        g
    })
}

// --- Encoding ---

/// Systematically encode one data chunk of at most [`CHUNK_DATA_LEN`] bytes.
///
/// Returns `data || parity`. For shortened codes the data is conceptually
/// zero-padded at the front to the full chunk length; the parity is
/// computed over that virtual full block.
fn encode_chunk(data: &[u8]) -> Vec<u8> {
    debug_assert!(data.len() <= CHUNK_DATA_LEN);
    let g = gen_poly();

    // Remainder of data * x^PARITY_LEN divided by g(x).
    let mut reg = [0u8; PARITY_LEN];
    for &byte in data {
        let feedback = byte ^ reg[0];
        for j in 0..PARITY_LEN - 1 {
            reg[j] = reg[j + 1] ^ gf_mul(feedback, g[j + 1]);
        }
        reg[PARITY_LEN - 1] = gf_mul(feedback, g[PARITY_LEN]);
    }

    let mut out = Vec::with_capacity(data.len() + PARITY_LEN);
    out.extend_from_slice(data);
    out.extend_from_slice(&reg);
    out
}

/// RS-encode a payload, splitting it into [`CHUNK_DATA_LEN`]-byte chunks.
///
/// Each chunk is followed by its own [`PARITY_LEN`] parity bytes; the last
/// chunk may be a shortened code.
pub fn encode(data: &[u8]) -> Vec<u8> {
    if data.is_empty() {
        return encode_chunk(data);
    }
    let mut out = Vec::with_capacity(encoded_len(data.len()));
    for chunk in data.chunks(CHUNK_DATA_LEN) {
        out.extend_from_slice(&encode_chunk(chunk));
    }
    out
}

/// Encoded length for a given data length.
pub fn encoded_len(data_len: usize) -> usize {
    data_len + PARITY_LEN * data_len.div_ceil(CHUNK_DATA_LEN).max(1)
}

// --- Decoding ---

/// Decoding failed: more than [`T_MAX`] symbol errors in some chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EccError;

impl std::fmt::Display for EccError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Reed-Solomon: too many symbol errors to correct")
    }
}

impl std::error::Error for EccError {}

/// Syndromes S_0 .. S_{2t-1} of a full 255-symbol block (FCR = 0).
fn syndromes(block: &[u8]) -> [u8; PARITY_LEN] {
    let t = gf_tables();
    let mut s = [0u8; PARITY_LEN];
    for (i, si) in s.iter_mut().enumerate() {
        *si = poly_eval(block, t.exp[i]);
    }
    s
}

/// Berlekamp-Massey: error locator sigma(x) in ascending-power order.
fn error_locator(synd: &[u8]) -> Vec<u8> {
    let n = synd.len();
    let mut c = vec![0u8; n + 1]; // current locator
    let mut b = vec![0u8; n + 1]; // previous locator
    c[0] = 1;
    b[0] = 1;
    let mut c_len = 1usize;
    let mut b_len = 1usize;
    let mut errs = 0usize;
    let mut prev_delta = 1u8;
    let mut gap = 1usize;

    for r in 0..n {
        let mut delta = synd[r];
        for i in 1..c_len {
            delta ^= gf_mul(c[i], synd[r - i]);
        }
        if delta == 0 {
            gap += 1;
            continue;
        }

        let factor = gf_mul(delta, gf_inv(prev_delta));
        if 2 * errs <= r {
            let old_c = c.clone();
            let old_c_len = c_len;
            c_len = (b_len + gap).max(c_len);
            for j in 0..b_len {
                c[j + gap] ^= gf_mul(factor, b[j]);
            }
            b[..old_c_len].copy_from_slice(&old_c[..old_c_len]);
            for v in b.iter_mut().skip(old_c_len) {
                *v = 0;
            }
            b_len = old_c_len;
            errs = r + 1 - errs;
            prev_delta = delta;
            gap = 1;
        } else {
            c_len = (b_len + gap).max(c_len);
            for j in 0..b_len {
                c[j + gap] ^= gf_mul(factor, b[j]);
            }
            gap += 1;
        }
    }

    c[..c_len].to_vec()
}

/// Chien search: error positions as array indices into the 255-symbol block.
fn error_positions(sigma: &[u8]) -> Option<Vec<(usize, usize)>> {
    let t = gf_tables();
    let num_errors = sigma.len() - 1;
    let mut found = Vec::with_capacity(num_errors);

    // sigma has roots at alpha^{-p}; a root at GF position p means the
    // symbol at array index 254 - p is in error.
    for p in 0..BLOCK_LEN {
        let x = if p == 0 { 1 } else { t.exp[(255 - (p % 255)) % 255] };
        if poly_eval_asc(sigma, x) == 0 {
            found.push((p, BLOCK_LEN - 1 - p));
        }
    }

    (found.len() == num_errors).then_some(found)
}

/// Forney algorithm: magnitudes for the located errors (FCR = 0).
fn error_magnitudes(sigma: &[u8], synd: &[u8], found: &[(usize, usize)]) -> Vec<u8> {
    let t = gf_tables();
    let two_t = synd.len();

    // Omega(x) = S(x) * Sigma(x) mod x^{2t}, ascending power.
    let mut omega = vec![0u8; two_t];
    for i in 0..sigma.len().min(two_t) {
        for j in 0..two_t - i {
            omega[i + j] ^= gf_mul(sigma[i], synd[j]);
        }
    }

    // Formal derivative in GF(2^m): even-power terms vanish.
    let mut sigma_prime = vec![0u8; sigma.len().saturating_sub(1)];
    for i in (1..sigma.len()).step_by(2) {
        sigma_prime[i - 1] = sigma[i];
    }

    found
        .iter()
        .map(|&(gf_pos, _)| {
            let x = if gf_pos == 0 { 1 } else { t.exp[gf_pos % 255] };
            let x_inv = if gf_pos == 0 { 1 } else { t.exp[(255 - (gf_pos % 255)) % 255] };
            let sp = poly_eval_asc(&sigma_prime, x_inv);
            if sp == 0 {
                0
            } else {
                gf_mul(x, gf_mul(poly_eval_asc(&omega, x_inv), gf_inv(sp)))
            }
        })
        .collect()
}

/// Decode one received chunk of `data_len + PARITY_LEN` bytes.
///
/// Returns the corrected data and the number of symbols corrected.
fn decode_chunk(received: &[u8], data_len: usize) -> Result<(Vec<u8>, usize), EccError> {
    debug_assert_eq!(received.len(), data_len + PARITY_LEN);

    // Shortened codes: zero-pad at the front to a full 255-symbol block.
    let padding = BLOCK_LEN - received.len();
    let mut block = vec![0u8; BLOCK_LEN];
    block[padding..].copy_from_slice(received);

    let synd = syndromes(&block);
    if synd.iter().all(|&s| s == 0) {
        return Ok((received[..data_len].to_vec(), 0));
    }

    let sigma = error_locator(&synd);
    let num_errors = sigma.len() - 1;
    if num_errors > T_MAX {
        return Err(EccError);
    }

    let found = error_positions(&sigma).ok_or(EccError)?;
    let magnitudes = error_magnitudes(&sigma, &synd, &found);

    for (&(_, pos), &mag) in found.iter().zip(&magnitudes) {
        if pos < padding {
            // Error located in the virtual zero padding: not correctable.
            return Err(EccError);
        }
        block[pos] ^= mag;
    }

    if syndromes(&block).iter().any(|&s| s != 0) {
        return Err(EccError);
    }

    Ok((block[padding..padding + data_len].to_vec(), num_errors))
}

/// Decode a frame produced by [`encode`], given the original data length.
///
/// Corrects up to [`T_MAX`] symbol errors per chunk. Returns the corrected
/// data and the total number of symbols corrected.
///
/// # Errors
/// [`EccError`] if `encoded` is shorter than the frame implied by
/// `data_len`, or any chunk has too many errors.
pub fn decode(encoded: &[u8], data_len: usize) -> Result<(Vec<u8>, usize), EccError> {
    if encoded.len() < encoded_len(data_len) {
        return Err(EccError);
    }

    let mut data = Vec::with_capacity(data_len);
    let mut corrected = 0usize;
    let mut remaining = data_len;
    let mut offset = 0usize;

    while remaining > 0 {
        let chunk_data = remaining.min(CHUNK_DATA_LEN);
        let chunk_len = chunk_data + PARITY_LEN;
        let (chunk, errs) = decode_chunk(&encoded[offset..offset + chunk_len], chunk_data)?;
        data.extend_from_slice(&chunk);
        corrected += errs;
        offset += chunk_len;
        remaining -= chunk_data;
    }

    Ok((data, corrected))
}
