// Copyright (c) 2026 Wavehide Contributors
// SPDX-License-Identifier: GPL-3.0-only

//! Round-trip integration tests: embed then extract on in-memory planes
//! and on image files.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use wavehide::pixels::{self, Plane, RgbPlanes};
use wavehide::{embed_in_planes, embed_message, estimate_capacity, extract_from_planes, extract_message, StegoError};

/// Deterministic mid-range noise cover. Samples stay in 60..200 so that
/// embedding deltas never clamp at the pixel-range edges.
fn noise_cover(width: usize, height: usize, seed: u64) -> RgbPlanes {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut plane = |rng: &mut ChaCha8Rng| {
        Plane::from_raw(
            width,
            height,
            (0..width * height).map(|_| rng.gen_range(60..200)).collect(),
        )
    };
    RgbPlanes {
        red: plane(&mut rng),
        green: plane(&mut rng),
        blue: plane(&mut rng),
    }
}

fn roundtrip(cover: &RgbPlanes, message: &str) -> String {
    let (stego, events) = embed_in_planes(cover, message).unwrap();
    assert!(events.is_empty(), "unexpected embed events: {events:?}");
    let report = extract_from_planes(&stego);
    assert!(report.events.is_empty(), "unexpected extract events: {:?}", report.events);
    assert_eq!(report.rs_errors_corrected, 0);
    report.message
}

#[test]
fn roundtrip_basic() {
    let cover = noise_cover(64, 64, 1);
    assert_eq!(roundtrip(&cover, "Attack at dawn."), "Attack at dawn.");
}

#[test]
fn roundtrip_empty_message() {
    let cover = noise_cover(32, 32, 2);
    assert_eq!(roundtrip(&cover, ""), "");
}

#[test]
fn roundtrip_unicode() {
    let cover = noise_cover(64, 64, 3);
    let message = "Héllo wörld, até já! 🔐";
    assert_eq!(roundtrip(&cover, message), message);
}

#[test]
fn roundtrip_all_lengths_mod_three() {
    // The partition split truncates stream_len / 3; every residue class of
    // the stream length must still reassemble exactly.
    let cover = noise_cover(64, 64, 4);
    let base = "abcdefghijklmnopqrstuvwxyz";
    for len in 0..=16 {
        let message = &base[..len];
        assert_eq!(roundtrip(&cover, message), message, "length {len}");
    }
}

#[test]
fn roundtrip_structured_cover() {
    // Gradients instead of noise: flat regions and edges.
    let (w, h) = (80, 60);
    let grad = |f: fn(usize, usize) -> u8| {
        Plane::from_raw(w, h, (0..w * h).map(|i| f(i % w, i / w)).collect())
    };
    let cover = RgbPlanes {
        red: grad(|x, y| (60 + (x + y) % 120) as u8),
        green: grad(|x, _| (60 + x % 120) as u8),
        blue: grad(|_, y| (60 + 2 * y % 120) as u8),
    };
    let message = "structured covers work too";
    assert_eq!(roundtrip(&cover, message), message);
}

#[test]
fn roundtrip_odd_dimensions() {
    let cover = noise_cover(63, 41, 5);
    let message = "odd-sized image";
    assert_eq!(roundtrip(&cover, message), message);
}

#[test]
fn extraction_is_idempotent() {
    let cover = noise_cover(64, 64, 6);
    let (stego, _) = embed_in_planes(&cover, "stable").unwrap();
    let first = extract_from_planes(&stego);
    let second = extract_from_planes(&stego);
    assert_eq!(first.message, second.message);
    assert_eq!(first.events, second.events);
    assert_eq!(first.rs_errors_corrected, second.rs_errors_corrected);
}

#[test]
fn sentinel_no_premature_truncation() {
    // '@' ends in six zero bits and ' ' starts with two; sequences like
    // "@ " must not fake a terminator anywhere in the pipeline.
    let cover = noise_cover(64, 64, 7);
    let message = "@ @@  @@@ a@ @b @@";
    assert_eq!(roundtrip(&cover, message), message);
}

#[test]
fn roundtrip_at_exact_capacity() {
    let cover = noise_cover(64, 64, 8);
    let cap = estimate_capacity(64, 64);
    assert!(cap > 0);
    let message = "m".repeat(cap);
    assert_eq!(roundtrip(&cover, &message), message);
}

#[test]
fn capacity_exceeded_is_fatal_and_early() {
    let cover = noise_cover(64, 64, 9);
    let cap = estimate_capacity(64, 64);
    let message = "m".repeat(cap + 1);
    match embed_in_planes(&cover, &message) {
        Err(StegoError::CapacityExceeded { needed, available }) => {
            assert!(needed > available, "needed {needed} <= available {available}");
        }
        other => panic!("expected CapacityExceeded, got {other:?}"),
    }
}

#[test]
fn extract_from_unmarked_image_is_empty() {
    let cover = noise_cover(48, 48, 10);
    let report = extract_from_planes(&cover);
    assert_eq!(report.message, "");
    assert_eq!(report.events.len(), 3, "all three channels should report corruption");
}

#[test]
fn file_roundtrip_png() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cover.png");

    let cover = noise_cover(64, 48, 11);
    pixels::save(&path, &cover).unwrap();

    let message = "saved and reloaded";
    embed_message(&path, message).unwrap();
    let report = extract_message(&path).unwrap();
    assert_eq!(report.message, message);
    assert!(report.events.is_empty());
}

#[test]
fn missing_image_is_image_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nope.png");
    match embed_message(&path, "hi") {
        Err(StegoError::ImageNotFound { .. }) => {}
        other => panic!("expected ImageNotFound, got {other:?}"),
    }
    match extract_message(&path) {
        Err(StegoError::ImageNotFound { .. }) => {}
        other => panic!("expected ImageNotFound, got {other:?}"),
    }
}

#[test]
fn failed_embed_leaves_file_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("small.png");

    let cover = noise_cover(16, 16, 12);
    pixels::save(&path, &cover).unwrap();
    let before = std::fs::read(&path).unwrap();

    let err = embed_message(&path, "this will not fit in a 16x16 image").unwrap_err();
    assert!(matches!(err, StegoError::CapacityExceeded { .. }));
    assert_eq!(std::fs::read(&path).unwrap(), before);
}
