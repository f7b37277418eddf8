// Copyright (c) 2026 Wavehide Contributors
// SPDX-License-Identifier: GPL-3.0-only

//! Error types for the steganography pipeline.
//!
//! [`StegoError`] covers the fatal failure modes; non-fatal anomalies are
//! reported as [`StegoEvent`](super::StegoEvent)s instead of errors.

use std::fmt;
use std::path::PathBuf;

/// Fatal errors from steganographic embedding or extraction.
#[derive(Debug)]
pub enum StegoError {
    /// The source path does not resolve to a decodable image.
    ImageNotFound {
        path: PathBuf,
        source: image::ImageError,
    },
    /// The protected payload needs more 2-bit coefficient slots than the
    /// approximation subband provides. Raised before any pixel is modified.
    CapacityExceeded { needed: usize, available: usize },
    /// The stego image could not be encoded or written back to disk.
    ImageWrite {
        path: PathBuf,
        source: image::ImageError,
    },
}

impl fmt::Display for StegoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ImageNotFound { path, source } => {
                write!(f, "cannot load image {}: {source}", path.display())
            }
            Self::CapacityExceeded { needed, available } => write!(
                f,
                "message too large: needs {needed} coefficient slots, carrier has {available}"
            ),
            Self::ImageWrite { path, source } => {
                write!(f, "cannot write image {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for StegoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ImageNotFound { source, .. } | Self::ImageWrite { source, .. } => Some(source),
            Self::CapacityExceeded { .. } => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, StegoError>;
