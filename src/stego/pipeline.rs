// Copyright (c) 2026 Wavehide Contributors
// SPDX-License-Identifier: GPL-3.0-only

//! Channel orchestration: the per-channel embed and extract pipelines.
//!
//! Embed: split planes → forward Haar per channel → partition and protect
//! the message → bit-pair embed into each approximation subband → inverse
//! Haar → clamp to the pixel range → merge. Capacity is checked for all
//! three channels before any matrix is touched, so a failed embed never
//! leaves a half-written image.
//!
//! Extract mirrors the pipeline: forward Haar → bit-pair extract →
//! per-channel frame recovery → concatenation in channel order.
//!
//! The three channels share no mutable state; with the `parallel` feature
//! they run on rayon workers and are joined before the merge step.

use crate::dwt;
use crate::pixels::{Plane, RgbPlanes};
use crate::stego::error::StegoError;
use crate::stego::{bits, ecc, payload, ChannelId, ExtractReport, StegoEvent};

/// Fan three independent closures out to rayon workers.
#[cfg(feature = "parallel")]
fn join3<A, B, C, RA, RB, RC>(a: A, b: B, c: C) -> (RA, RB, RC)
where
    A: FnOnce() -> RA + Send,
    B: FnOnce() -> RB + Send,
    C: FnOnce() -> RC + Send,
    RA: Send,
    RB: Send,
    RC: Send,
{
    let (ra, (rb, rc)) = rayon::join(a, || rayon::join(b, c));
    (ra, rb, rc)
}

#[cfg(not(feature = "parallel"))]
fn join3<A, B, C, RA, RB, RC>(a: A, b: B, c: C) -> (RA, RB, RC)
where
    A: FnOnce() -> RA,
    B: FnOnce() -> RB,
    C: FnOnce() -> RC,
{
    (a(), b(), c())
}

/// Embed a message into a set of RGB planes, returning the stego planes.
///
/// Pure counterpart of [`embed_message`](super::embed_message): no file
/// I/O, so callers and tests can drive it on in-memory images.
///
/// # Errors
/// [`StegoError::CapacityExceeded`] if any channel's protected frame needs
/// more 2-bit slots than its approximation subband provides. The input
/// planes are never modified.
pub fn embed_in_planes(
    planes: &RgbPlanes,
    message: &str,
) -> Result<(RgbPlanes, Vec<StegoEvent>), StegoError> {
    let frames = payload::protect(message);

    // All-channel capacity check before any coefficient is written.
    let available = dwt::approx_cells(planes.width(), planes.height());
    for frame in &frames {
        let needed = frame.len() * 4;
        if needed > available {
            return Err(StegoError::CapacityExceeded { needed, available });
        }
    }

    let [frame_r, frame_g, frame_b] = frames;
    let (red, green, blue) = join3(
        || embed_channel(&planes.red, &frame_r, ChannelId::Red),
        || embed_channel(&planes.green, &frame_g, ChannelId::Green),
        || embed_channel(&planes.blue, &frame_b, ChannelId::Blue),
    );

    let (red, ev_r) = red?;
    let (green, ev_g) = green?;
    let (blue, ev_b) = blue?;

    let mut events = ev_r;
    events.extend(ev_g);
    events.extend(ev_b);
    Ok((RgbPlanes { red, green, blue }, events))
}

/// Extract the hidden message from a set of RGB planes.
///
/// Never fails: channels whose part cannot be corrected contribute nothing
/// and raise a [`StegoEvent::CorruptionUnrecoverable`] in the report.
pub fn extract_from_planes(planes: &RgbPlanes) -> ExtractReport {
    let (red, green, blue) = join3(
        || extract_channel(&planes.red),
        || extract_channel(&planes.green),
        || extract_channel(&planes.blue),
    );

    let mut events = Vec::new();
    let mut rs_errors_corrected = 0usize;
    let channels = [ChannelId::Red, ChannelId::Green, ChannelId::Blue];
    let parts = [red, green, blue];
    let mut recovered: [Option<Vec<u8>>; 3] = [None, None, None];

    for ((slot, part), channel) in recovered.iter_mut().zip(parts).zip(channels) {
        match part {
            Some((bytes, errors)) => {
                rs_errors_corrected += errors;
                *slot = Some(bytes);
            }
            None => events.push(StegoEvent::CorruptionUnrecoverable { channel }),
        }
    }

    ExtractReport {
        message: payload::assemble(&recovered),
        events,
        rs_errors_corrected,
    }
}

/// Maximum message length in bytes that an image of the given dimensions
/// can carry after partitioning and Reed-Solomon expansion.
pub fn estimate_capacity(width: u32, height: u32) -> usize {
    let cells = dwt::approx_cells(width as usize, height as usize);
    let slots = bits::byte_capacity(cells);

    // Largest single part (data bytes, terminator included) whose RS frame
    // fits in `slots` bytes.
    let full_chunks = slots / 255;
    let partial = (slots % 255).saturating_sub(ecc::PARITY_LEN);
    let max_part = full_chunks * ecc::CHUNK_DATA_LEN + partial;
    if max_part == 0 {
        return 0;
    }

    // Parts across all channels total stream_len + 2 bytes; walk down from
    // the optimistic bound until the actual split fits.
    let mut msg_len = 3 * max_part;
    loop {
        let stream = msg_len + 1;
        let third = stream / 3;
        let largest = (third + 1).max(stream - 2 * third);
        if largest <= max_part {
            return msg_len;
        }
        if msg_len == 0 {
            return 0;
        }
        msg_len -= 1;
    }
}

/// Transform, embed, reconstruct, and clamp one channel.
fn embed_channel(
    plane: &Plane,
    frame: &[u8],
    channel: ChannelId,
) -> Result<(Plane, Vec<StegoEvent>), StegoError> {
    let mut bands = dwt::forward(plane);
    let anomalies = bits::embed(&mut bands.approx, frame)?;
    let samples = dwt::inverse(&bands);
    let out = Plane::from_samples(plane.width(), plane.height(), &samples);

    let events = anomalies
        .into_iter()
        .map(|a| StegoEvent::WriteVerificationFailed {
            channel,
            row: a.row,
            col: a.col,
            expected: a.expected,
            got: a.got,
        })
        .collect();
    Ok((out, events))
}

/// Transform and recover one channel's part.
fn extract_channel(plane: &Plane) -> Option<(Vec<u8>, usize)> {
    let bands = dwt::forward(plane);
    let stream = bits::extract(&bands.approx);
    payload::recover_part(&stream)
}
