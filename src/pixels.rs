// Copyright (c) 2026 Wavehide Contributors
// SPDX-License-Identifier: GPL-3.0-only

//! Pixel-domain I/O: image loading/saving and RGB plane handling.
//!
//! Wraps the `image` crate. The steganography layer never sees interleaved
//! pixels; it works on one [`Plane`] of 8-bit samples per channel.

use std::path::Path;

use crate::stego::error::StegoError;

/// One channel of 8-bit samples, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plane {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl Plane {
    /// Build a plane from row-major samples.
    ///
    /// # Panics
    /// Panics if `data.len() != width * height`.
    pub fn from_raw(width: usize, height: usize, data: Vec<u8>) -> Self {
        assert_eq!(data.len(), width * height, "plane size mismatch");
        Self { width, height, data }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> u8 {
        debug_assert!(x < self.width && y < self.height);
        self.data[y * self.width + x]
    }

    pub fn set(&mut self, x: usize, y: usize, val: u8) {
        debug_assert!(x < self.width && y < self.height);
        self.data[y * self.width + x] = val;
    }

    /// Raw row-major samples.
    pub fn samples(&self) -> &[u8] {
        &self.data
    }

    pub fn samples_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Quantize real-valued reconstructed samples into a plane.
    ///
    /// Every sample is clamped to 0–255 before the integer conversion;
    /// embedding can push reconstructed values slightly out of range.
    pub fn from_samples(width: usize, height: usize, samples: &[f64]) -> Self {
        assert_eq!(samples.len(), width * height, "sample count mismatch");
        let data = samples.iter().map(|&v| v.clamp(0.0, 255.0) as u8).collect();
        Self { width, height, data }
    }
}

/// The three color planes of an RGB image, equally sized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbPlanes {
    pub red: Plane,
    pub green: Plane,
    pub blue: Plane,
}

impl RgbPlanes {
    pub fn width(&self) -> usize {
        self.red.width()
    }

    pub fn height(&self) -> usize {
        self.red.height()
    }
}

/// Load an image file and split it into RGB planes.
///
/// # Errors
/// [`StegoError::ImageNotFound`] if the path does not resolve to a
/// decodable image.
pub fn load(path: &Path) -> Result<RgbPlanes, StegoError> {
    let img = image::open(path)
        .map_err(|source| StegoError::ImageNotFound { path: path.to_path_buf(), source })?
        .to_rgb8();
    Ok(split(&img))
}

/// Merge RGB planes and save the image at `path`, format from extension.
///
/// # Errors
/// [`StegoError::ImageWrite`] if encoding or writing fails.
pub fn save(path: &Path, planes: &RgbPlanes) -> Result<(), StegoError> {
    let img = merge(planes);
    img.save(path)
        .map_err(|source| StegoError::ImageWrite { path: path.to_path_buf(), source })
}

/// Split an interleaved RGB buffer into three planes.
pub fn split(img: &image::RgbImage) -> RgbPlanes {
    let (w, h) = (img.width() as usize, img.height() as usize);
    let mut red = Vec::with_capacity(w * h);
    let mut green = Vec::with_capacity(w * h);
    let mut blue = Vec::with_capacity(w * h);
    for px in img.pixels() {
        red.push(px[0]);
        green.push(px[1]);
        blue.push(px[2]);
    }
    RgbPlanes {
        red: Plane::from_raw(w, h, red),
        green: Plane::from_raw(w, h, green),
        blue: Plane::from_raw(w, h, blue),
    }
}

/// Interleave three planes back into an RGB buffer.
pub fn merge(planes: &RgbPlanes) -> image::RgbImage {
    let (w, h) = (planes.width(), planes.height());
    image::RgbImage::from_fn(w as u32, h as u32, |x, y| {
        let (x, y) = (x as usize, y as usize);
        image::Rgb([
            planes.red.get(x, y),
            planes.green.get(x, y),
            planes.blue.get(x, y),
        ])
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_merge_roundtrip() {
        let img = image::RgbImage::from_fn(5, 4, |x, y| {
            image::Rgb([(x * 40) as u8, (y * 60) as u8, (x + y) as u8])
        });
        let planes = split(&img);
        assert_eq!(planes.width(), 5);
        assert_eq!(planes.height(), 4);
        assert_eq!(planes.green.get(2, 3), 180);
        assert_eq!(merge(&planes).as_raw(), img.as_raw());
    }

    #[test]
    fn from_samples_clamps_out_of_range() {
        let p = Plane::from_samples(2, 1, &[-3.5, 260.0]);
        assert_eq!(p.samples(), &[0, 255]);
    }

    #[test]
    fn from_samples_truncates_exact_integers() {
        let p = Plane::from_samples(2, 1, &[104.0, 17.0]);
        assert_eq!(p.samples(), &[104, 17]);
    }
}
