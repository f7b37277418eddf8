// Copyright (c) 2026 Wavehide Contributors
// SPDX-License-Identifier: GPL-3.0-only

//! Steganographic embedding and extraction.
//!
//! The message is split into three Reed-Solomon-protected parts, one per
//! RGB channel, and each part is packed two bits at a time into the
//! approximation subband of that channel's Haar decomposition
//! ([`pipeline`] drives the per-channel flow). Embedding writes the stego
//! image back in place; extraction is best-effort and never fails once the
//! image loads: unrecoverable channels contribute nothing and are
//! reported as events.

pub mod bits;
pub mod ecc;
pub mod error;
pub mod payload;
mod pipeline;

use std::fmt;
use std::path::Path;

use crate::pixels;

pub use error::StegoError;
pub use pipeline::{embed_in_planes, estimate_capacity, extract_from_planes};

/// One of the three color channels, in embedding order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelId {
    Red,
    Green,
    Blue,
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Red => write!(f, "red"),
            Self::Green => write!(f, "green"),
            Self::Blue => write!(f, "blue"),
        }
    }
}

/// Non-fatal diagnostic raised during embedding or extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StegoEvent {
    /// A coefficient cell did not verify after the corrective rewrite.
    /// Embedding continued; Reed-Solomon absorbs the damaged pair.
    WriteVerificationFailed {
        channel: ChannelId,
        row: usize,
        col: usize,
        expected: u8,
        got: u8,
    },
    /// A channel's part could not be corrected; it contributed an empty
    /// string to the extracted message.
    CorruptionUnrecoverable { channel: ChannelId },
}

impl fmt::Display for StegoEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WriteVerificationFailed { channel, row, col, expected, got } => write!(
                f,
                "{channel} channel: cell ({row}, {col}) holds {got:02b} after rewrite, expected {expected:02b}"
            ),
            Self::CorruptionUnrecoverable { channel } => {
                write!(f, "{channel} channel: part unrecoverable, dropped from output")
            }
        }
    }
}

/// Outcome of a successful embed.
#[derive(Debug, Clone, Default)]
pub struct EmbedReport {
    pub events: Vec<StegoEvent>,
}

/// Outcome of an extraction. `message` is empty when no channel carried a
/// recoverable part.
#[derive(Debug, Clone, Default)]
pub struct ExtractReport {
    pub message: String,
    pub events: Vec<StegoEvent>,
    /// Total Reed-Solomon symbol errors corrected across all channels.
    pub rs_errors_corrected: usize,
}

/// Embed a message into the image at `path`, rewriting the file in place.
///
/// # Errors
/// - [`StegoError::ImageNotFound`] if the path is not a decodable image.
/// - [`StegoError::CapacityExceeded`] if the protected message does not
///   fit; the file is left untouched.
/// - [`StegoError::ImageWrite`] if saving the stego image fails.
pub fn embed_message(path: &Path, message: &str) -> Result<EmbedReport, StegoError> {
    let planes = pixels::load(path)?;
    let (stego, events) = embed_in_planes(&planes, message)?;
    pixels::save(path, &stego)?;
    Ok(EmbedReport { events })
}

/// Extract the message hidden in the image at `path`.
///
/// # Errors
/// [`StegoError::ImageNotFound`] if the path is not a decodable image.
/// Corruption never fails the call; affected channels are reported in the
/// returned events instead.
pub fn extract_message(path: &Path) -> Result<ExtractReport, StegoError> {
    let planes = pixels::load(path)?;
    Ok(extract_from_planes(&planes))
}
