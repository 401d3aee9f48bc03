// Host-side tests for the front-end state shared by event handlers and the
// renderer. The main crate is wasm-only, so we include the pure-Rust modules
// directly.

#![allow(dead_code)]
mod constants {
    include!("../src/constants.rs");
}
mod state {
    include!("../src/state.rs");
}

use constants::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use state::*;
use std::io::Cursor;
use tree_core::{FieldConfig, TreeError, UploadOutcome, SPARKLE_COUNT, STARFIELD_COUNT};

const TREE: usize = 300;

fn app(seed: u64) -> AppState {
    let cfg = FieldConfig {
        count: TREE,
        ..FieldConfig::default()
    };
    AppState::with_rng(cfg, &mut StdRng::seed_from_u64(seed)).unwrap()
}

fn png(rgb: [u8; 3]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(8, 8, image::Rgba([rgb[0], rgb[1], rgb[2], 255]));
    let mut out = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut out, image::ImageFormat::Png)
        .unwrap();
    out.into_inner()
}

#[test]
fn scene_points_are_laid_out_tree_first() {
    let s = app(1);
    let pts = s.scene_points();
    assert_eq!(pts.tree_count(), TREE);
    assert_eq!(pts.len(), TREE + 1 + SPARKLE_COUNT + STARFIELD_COUNT);
    assert_eq!(pts.colors.len(), pts.len());

    for (i, p) in s.field.positions().iter().enumerate() {
        assert_eq!(pts.position_size[i], [p.x, p.y, p.z, TREE_POINT_SIZE]);
    }
    assert_eq!(&pts.colors[..TREE], s.field.default_colors().as_slice());
}

#[test]
fn star_tops_the_tree_in_world_space() {
    let s = app(2);
    let pts = s.scene_points();
    let star = pts.position_size[TREE];
    let expected_y = -2.5 + s.field.height() + tree_core::STAR_LIFT;
    assert_eq!(star[0], 0.0);
    assert!((star[1] - expected_y).abs() < 1e-5);
    assert_eq!(star[3], STAR_POINT_SIZE);
    assert_eq!(pts.colors[TREE], tree_core::STAR_COLOR);
}

#[test]
fn draw_ranges_tile_the_instances() {
    let s = app(3);
    let pts = s.scene_points();
    let r = &pts.ranges;
    let tree = TREE as u32;
    assert_eq!(r.tree, 0..tree);
    assert_eq!(r.star, tree..tree + 1);
    assert_eq!(r.sparkles, tree + 1..tree + 1 + SPARKLE_COUNT as u32);
    assert_eq!(r.starfield.start, r.sparkles.end);
    assert_eq!(r.starfield.end as usize, pts.len());
}

#[test]
fn backdrop_keeps_its_own_colors_and_sizes() {
    let s = app(14);
    let pts = s.scene_points();
    let sparkle = pts.ranges.sparkles.start as usize;
    // Sparkle dimming is a blend weight applied at draw time
    assert_eq!(pts.colors[sparkle], tree_core::SPARKLE_COLOR);
    assert_eq!(pts.position_size[sparkle][3], SPARKLE_POINT_SIZE);

    let first_star = pts.ranges.starfield.start as usize;
    assert_eq!(pts.position_size[first_star][3], STARFIELD_POINT_SIZE);
    assert_eq!(pts.colors[first_star], s.stars.colors.as_slice()[0]);
    let p = s.stars.positions[0];
    assert_eq!(&pts.position_size[first_star][..3], &[p.x, p.y, p.z]);
}

#[test]
fn photo_recolors_only_the_tree() {
    let mut s = app(4);
    let before = s.scene_points();
    let ticket = s.begin_photo();
    let outcome = s.apply_photo(ticket, &png([255, 0, 0])).unwrap();
    assert_eq!(outcome, UploadOutcome::Applied);
    assert!(s.has_photo());

    let after = s.scene_points();
    assert!(after.colors[..TREE].iter().all(|c| *c == [1.0, 0.0, 0.0]));
    assert_eq!(after.colors[TREE..], before.colors[TREE..]);
    assert_eq!(after.position_size, before.position_size);
}

#[test]
fn corrupt_photo_keeps_previous_colors() {
    let mut s = app(5);
    let first = s.begin_photo();
    s.apply_photo(first, &png([0, 0, 255])).unwrap();
    let revision = s.colors.revision();

    let ticket = s.begin_photo();
    let err = s.apply_photo(ticket, b"definitely not an image").unwrap_err();
    assert!(matches!(err, TreeError::ImageDecode(_)));
    assert!(s.has_photo());
    assert_eq!(s.colors.revision(), revision);
    assert_eq!(s.colors.active().get(0), Some([0.0, 0.0, 1.0]));
}

#[test]
fn clearing_the_photo_restores_defaults() {
    let mut s = app(6);
    let ticket = s.begin_photo();
    s.apply_photo(ticket, &png([0, 255, 0])).unwrap();
    s.clear_photo();
    assert!(!s.has_photo());
    assert_eq!(s.colors.active().as_ref(), s.field.default_colors());
}

#[test]
fn photo_picked_before_clear_is_ignored() {
    let mut s = app(7);
    let ticket = s.begin_photo();
    s.clear_photo();
    let outcome = s.apply_photo(ticket, &png([255, 255, 255])).unwrap();
    assert_eq!(outcome, UploadOutcome::Stale);
    assert!(!s.has_photo());
}

#[test]
fn regenerate_draws_a_new_tree() {
    let mut s = app(8);
    let old = s.field.positions().to_vec();
    let ticket = s.begin_photo();
    s.apply_photo(ticket, &png([255, 0, 0])).unwrap();

    s.regenerate_with_rng(&mut StdRng::seed_from_u64(99)).unwrap();
    assert_eq!(s.field_revision, 1);
    assert_eq!(s.field.len(), TREE);
    assert_ne!(s.field.positions(), &old[..]);
    assert!(!s.has_photo());
    assert_eq!(s.colors.active().as_ref(), s.field.default_colors());
}

#[test]
fn music_toggles() {
    let mut s = app(9);
    assert!(!s.music_playing);
    assert!(s.toggle_music());
    assert!(!s.toggle_music());
}

#[test]
fn undecodable_newer_photo_blocks_older_one() {
    let mut s = app(10);
    let older = s.begin_photo();
    let newer = s.begin_photo();
    assert!(s.apply_photo(newer, b"GIF89a truncated").is_err());
    assert!(!s.photo_pending());
    let late = s.apply_photo(older, &png([255, 0, 0])).unwrap();
    assert_eq!(late, UploadOutcome::Stale);
    assert!(!s.has_photo());
}

#[test]
fn unreadable_newer_file_blocks_older_one() {
    let mut s = app(11);
    let older = s.begin_photo();
    let unreadable = s.begin_photo();
    assert!(s.abandon_photo(unreadable));
    assert!(!s.photo_pending());
    assert_eq!(
        s.apply_photo(older, &png([0, 255, 0])).unwrap(),
        UploadOutcome::Stale
    );
}

#[test]
fn regenerate_settles_a_loading_photo() {
    let mut s = app(12);
    let ticket = s.begin_photo();
    assert!(s.photo_pending());
    s.regenerate_with_rng(&mut StdRng::seed_from_u64(5)).unwrap();
    assert!(!s.photo_pending());
    assert_eq!(
        s.apply_photo(ticket, &png([0, 0, 255])).unwrap(),
        UploadOutcome::Stale
    );
    assert!(!s.photo_pending());
}

#[test]
fn older_photo_landing_first_leaves_newer_pending() {
    let mut s = app(13);
    let older = s.begin_photo();
    let newer = s.begin_photo();
    assert_eq!(
        s.apply_photo(older, &png([255, 0, 0])).unwrap(),
        UploadOutcome::Applied
    );
    assert!(s.photo_pending());
    s.apply_photo(newer, &png([0, 255, 0])).unwrap();
    assert!(!s.photo_pending());
}
