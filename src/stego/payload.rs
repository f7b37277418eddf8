// Copyright (c) 2026 Wavehide Contributors
// SPDX-License-Identifier: GPL-3.0-only

//! Payload partitioning and protected-frame recovery.
//!
//! Encode side: the message becomes a terminated byte stream, split into
//! three contiguous parts (one per color channel), each part terminated
//! and Reed-Solomon-encoded into a protected frame:
//!
//! ```text
//! stream  = [message bytes][0x00]
//! part 1  = stream[..n/3]        + [0x00]
//! part 2  = stream[n/3..2*n/3]   + [0x00]
//! part 3  = stream[2*n/3..]                (ends at the stream terminator)
//! frame k = rs_encode(part k)              (20 parity bytes per chunk)
//! ```
//!
//! The split points use truncating integer division; the remainder goes to
//! the third part.
//!
//! Decode side: the extracted byte stream contains the frame followed by
//! whatever the rest of the coefficient matrix happens to carry. The frame
//! boundary is not stored anywhere; it is recovered by scanning for the
//! terminator sentinel and attempting an RS decode of the frame it implies,
//! backed up by a bounded length sweep for the case where the terminator
//! byte itself was corrupted. A decode-side search instead of a fragile
//! length header keeps the wire format free of metadata.

use crate::stego::ecc;

/// End-of-part sentinel byte.
pub const TERMINATOR: u8 = 0x00;

/// Upper bound on the data lengths tried by the fallback sweep.
const SWEEP_LIMIT: usize = 4096;

/// Split a message into the three terminated channel parts.
pub fn split_message(message: &str) -> [Vec<u8>; 3] {
    let mut stream = Vec::with_capacity(message.len() + 1);
    stream.extend_from_slice(message.as_bytes());
    stream.push(TERMINATOR);

    let third = stream.len() / 3;
    let mut first = stream[..third].to_vec();
    let mut second = stream[third..2 * third].to_vec();
    let last = stream[2 * third..].to_vec();

    // The stream's own terminator already ends the third part.
    first.push(TERMINATOR);
    second.push(TERMINATOR);
    [first, second, last]
}

/// Build the three protected frames for a message.
pub fn protect(message: &str) -> [Vec<u8>; 3] {
    split_message(message).map(|part| ecc::encode(&part))
}

/// Recover one channel's part from its extracted byte stream.
///
/// Returns the part bytes with the terminator stripped, plus the number of
/// symbol errors corrected, or `None` if no frame could be decoded
/// (uncorrectable corruption).
pub fn recover_part(stream: &[u8]) -> Option<(Vec<u8>, usize)> {
    // Sentinel scan: each all-zero byte at a data position is a terminator
    // candidate; the frame then ends PARITY_LEN bytes later per chunk. The
    // first candidate that RS-decodes to terminated data wins. On a clean
    // stream the first zero byte is the terminator itself.
    for (z, &byte) in stream.iter().enumerate() {
        if byte != TERMINATOR || z % 255 >= ecc::CHUNK_DATA_LEN {
            continue;
        }
        let chunks = z / 255;
        let data_len = chunks * ecc::CHUNK_DATA_LEN + z % 255 + 1;
        if let Some(hit) = try_decode(stream, data_len) {
            return Some(hit);
        }
    }

    // Length sweep: the terminator may have been flipped to a non-zero
    // byte. Try every plausible data length the sentinel scan skipped.
    for data_len in 1..=SWEEP_LIMIT {
        if ecc::encoded_len(data_len) > stream.len() {
            break;
        }
        let chunks = (data_len - 1) / ecc::CHUNK_DATA_LEN;
        let terminator_pos = data_len - 1 + ecc::PARITY_LEN * chunks;
        if stream[terminator_pos] == TERMINATOR {
            continue; // already tried by the sentinel scan
        }
        if let Some(hit) = try_decode(stream, data_len) {
            return Some(hit);
        }
    }

    None
}

/// Attempt to decode a frame of the given data length off the stream front.
fn try_decode(stream: &[u8], data_len: usize) -> Option<(Vec<u8>, usize)> {
    let frame_len = ecc::encoded_len(data_len);
    if frame_len > stream.len() {
        return None;
    }
    let (mut data, errors) = ecc::decode(&stream[..frame_len], data_len).ok()?;
    // Corrected data must end at a terminator, or the candidate length was
    // wrong (a zero byte produced by corruption, or a spurious RS success).
    if data.pop() != Some(TERMINATOR) {
        return None;
    }
    Some((data, errors))
}

/// Concatenate recovered parts in channel order into the final message.
///
/// Unrecoverable parts contribute nothing; invalid UTF-8 (possible when a
/// part is missing from the middle of a multi-byte sequence) is replaced
/// rather than failing the extraction.
pub fn assemble(parts: &[Option<Vec<u8>>; 3]) -> String {
    let mut bytes = Vec::new();
    for part in parts.iter().flatten() {
        bytes.extend_from_slice(part);
    }
    String::from_utf8_lossy(&bytes).into_owned()
}
