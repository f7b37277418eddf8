// Copyright (c) 2026 Wavehide Contributors
// SPDX-License-Identifier: GPL-3.0-only

//! # wavehide
//!
//! Wavelet-domain steganography for raster images. Hides a text message in
//! the approximation subband of a single-level Haar decomposition, one third
//! of the message per RGB channel, each third protected by Reed-Solomon
//! error correction so that minor pixel corruption does not destroy the
//! payload.
//!
//! The pixel I/O (`pixels` module) wraps the `image` crate. The transform
//! (`dwt` module) and the Reed-Solomon codec (`stego::ecc`) are implemented
//! here, std only.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use std::path::Path;
//! use wavehide::{embed_message, extract_message};
//!
//! embed_message(Path::new("photo.png"), "meet at dawn").unwrap();
//! let report = extract_message(Path::new("photo.png")).unwrap();
//! assert_eq!(report.message, "meet at dawn");
//! ```

pub mod dwt;
pub mod pixels;
pub mod stego;

pub use dwt::{CoeffMatrix, Subbands};
pub use pixels::{Plane, RgbPlanes};
pub use stego::error::StegoError;
pub use stego::{
    embed_in_planes, embed_message, estimate_capacity, extract_from_planes, extract_message,
    ChannelId, EmbedReport, ExtractReport, StegoEvent,
};
