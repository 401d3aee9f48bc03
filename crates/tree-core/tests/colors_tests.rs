// Integration tests for the active color buffer and its upload tickets.

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use tree_core::*;

fn field(seed: u64) -> ParticleField {
    let cfg = FieldConfig {
        count: 256,
        ..FieldConfig::default()
    };
    generate_field_with_rng(&cfg, &mut StdRng::seed_from_u64(seed)).unwrap()
}

fn solid(field: &ParticleField, rgb: [f32; 3]) -> ColorBuffer {
    ColorBuffer::new(vec![rgb; field.len()])
}

fn bits(buf: &ColorBuffer) -> Vec<u32> {
    buf.as_flat().iter().map(|v| v.to_bits()).collect()
}

#[test]
fn starts_on_default_palette() {
    let f = field(1);
    let colors = ActiveColors::new(&f);
    assert_eq!(colors.source(), ColorSource::Default);
    assert_eq!(colors.active().as_ref(), f.default_colors());
    assert_eq!(colors.revision(), 0);
}

#[test]
fn applied_upload_becomes_active() {
    let f = field(2);
    let mut colors = ActiveColors::new(&f);
    let ticket = colors.begin_upload();
    let outcome = colors
        .complete_upload(ticket, Ok(solid(&f, [1.0, 0.0, 0.0])))
        .unwrap();
    assert_eq!(outcome, UploadOutcome::Applied);
    assert_eq!(colors.source(), ColorSource::Image);
    assert_eq!(colors.active().get(0), Some([1.0, 0.0, 0.0]));
    assert_eq!(colors.revision(), 1);
}

#[test]
fn clearing_reverts_to_bit_identical_defaults() {
    let f = field(3);
    let mut colors = ActiveColors::new(&f);
    let original = bits(f.default_colors());
    let ticket = colors.begin_upload();
    colors
        .complete_upload(ticket, Ok(solid(&f, [0.2, 0.4, 0.6])))
        .unwrap();
    colors.clear();
    assert_eq!(colors.source(), ColorSource::Default);
    assert_eq!(bits(colors.active()), original);
    assert!(Arc::ptr_eq(colors.active(), colors.defaults()));
}

#[test]
fn failed_upload_leaves_active_buffer_untouched() {
    let f = field(4);
    let mut colors = ActiveColors::new(&f);
    let first = colors.begin_upload();
    colors
        .complete_upload(first, Ok(solid(&f, [0.0, 1.0, 0.0])))
        .unwrap();
    let before = colors.active().clone();
    let revision = colors.revision();

    let ticket = colors.begin_upload();
    let decode = SourceImage::decode(b"\x89PNG\r\n\x1a\nnot really")
        .map(|img| sample_source_image(f.surface_coords(), &img))
        .map_err(TreeError::from);
    let err = colors.complete_upload(ticket, decode).unwrap_err();
    assert!(matches!(err, TreeError::ImageDecode(_)));
    assert!(Arc::ptr_eq(colors.active(), &before));
    assert_eq!(colors.source(), ColorSource::Image);
    assert_eq!(colors.revision(), revision);
}

#[test]
fn wrong_length_buffer_is_rejected() {
    let f = field(5);
    let mut colors = ActiveColors::new(&f);
    let ticket = colors.begin_upload();
    let err = colors
        .complete_upload(ticket, Ok(ColorBuffer::new(vec![[0.0; 3]; 3])))
        .unwrap_err();
    assert!(matches!(
        err,
        TreeError::BufferLength {
            expected: 256,
            actual: 3
        }
    ));
    assert_eq!(colors.source(), ColorSource::Default);
}

#[test]
fn late_result_from_superseded_selection_is_dropped() {
    let f = field(6);
    let mut colors = ActiveColors::new(&f);
    let older = colors.begin_upload();
    let newer = colors.begin_upload();

    let applied = colors
        .complete_upload(newer, Ok(solid(&f, [0.0, 0.0, 1.0])))
        .unwrap();
    assert_eq!(applied, UploadOutcome::Applied);

    let late = colors
        .complete_upload(older, Ok(solid(&f, [1.0, 1.0, 0.0])))
        .unwrap();
    assert_eq!(late, UploadOutcome::Stale);
    assert_eq!(colors.active().get(0), Some([0.0, 0.0, 1.0]));
}

#[test]
fn older_selection_may_land_before_newer_one() {
    let f = field(7);
    let mut colors = ActiveColors::new(&f);
    let older = colors.begin_upload();
    let newer = colors.begin_upload();
    assert_eq!(
        colors
            .complete_upload(older, Ok(solid(&f, [1.0, 0.0, 0.0])))
            .unwrap(),
        UploadOutcome::Applied
    );
    assert_eq!(
        colors
            .complete_upload(newer, Ok(solid(&f, [0.0, 1.0, 0.0])))
            .unwrap(),
        UploadOutcome::Applied
    );
    assert_eq!(colors.active().get(0), Some([0.0, 1.0, 0.0]));
}

#[test]
fn clear_supersedes_in_flight_uploads() {
    let f = field(8);
    let mut colors = ActiveColors::new(&f);
    let pending = colors.begin_upload();
    colors.clear();
    let outcome = colors
        .complete_upload(pending, Ok(solid(&f, [1.0, 0.0, 1.0])))
        .unwrap();
    assert_eq!(outcome, UploadOutcome::Stale);
    assert_eq!(colors.source(), ColorSource::Default);
}

#[test]
fn reset_adopts_new_field_defaults() {
    let f1 = field(9);
    let f2 = field(10);
    let mut colors = ActiveColors::new(&f1);
    let pending = colors.begin_upload();
    colors.reset(&f2);
    assert_eq!(colors.active().as_ref(), f2.default_colors());
    assert_eq!(
        colors
            .complete_upload(pending, Ok(solid(&f2, [1.0; 3])))
            .unwrap(),
        UploadOutcome::Stale
    );
}

#[test]
fn readers_keep_their_snapshot_after_a_swap() {
    let f = field(11);
    let mut colors = ActiveColors::new(&f);
    let snapshot = colors.active().clone();
    let ticket = colors.begin_upload();
    colors
        .complete_upload(ticket, Ok(solid(&f, [0.5; 3])))
        .unwrap();
    assert_eq!(snapshot.as_ref(), f.default_colors());
    assert_ne!(colors.active().as_ref(), snapshot.as_ref());
}

#[test]
fn failed_newer_selection_retires_older_ones() {
    let f = field(12);
    let mut colors = ActiveColors::new(&f);
    let older = colors.begin_upload();
    let newer = colors.begin_upload();

    let failed = colors.complete_upload(
        newer,
        Err(ImageDecodeError::Empty {
            width: 0,
            height: 0,
        }
        .into()),
    );
    assert!(matches!(failed, Err(TreeError::ImageDecode(_))));

    let late = colors
        .complete_upload(older, Ok(solid(&f, [1.0, 0.0, 0.0])))
        .unwrap();
    assert_eq!(late, UploadOutcome::Stale);
    assert_eq!(colors.source(), ColorSource::Default);
    assert_eq!(colors.active().as_ref(), f.default_colors());
}

#[test]
fn wrong_length_newer_selection_retires_older_ones() {
    let f = field(13);
    let mut colors = ActiveColors::new(&f);
    let older = colors.begin_upload();
    let newer = colors.begin_upload();
    assert!(colors
        .complete_upload(newer, Ok(ColorBuffer::new(vec![[0.0; 3]; 2])))
        .is_err());
    assert_eq!(
        colors
            .complete_upload(older, Ok(solid(&f, [0.0, 1.0, 0.0])))
            .unwrap(),
        UploadOutcome::Stale
    );
}

#[test]
fn abandoned_selection_retires_older_ones() {
    let f = field(14);
    let mut colors = ActiveColors::new(&f);
    let older = colors.begin_upload();
    let unreadable = colors.begin_upload();
    assert!(colors.abandon_upload(unreadable));
    assert!(!colors.has_pending_upload());
    assert_eq!(
        colors
            .complete_upload(older, Ok(solid(&f, [0.0, 0.0, 1.0])))
            .unwrap(),
        UploadOutcome::Stale
    );
    assert_eq!(colors.revision(), 0);
}

#[test]
fn abandoning_an_old_ticket_keeps_newer_ones_pending() {
    let f = field(15);
    let mut colors = ActiveColors::new(&f);
    let older = colors.begin_upload();
    let newer = colors.begin_upload();
    assert!(colors.abandon_upload(older));
    assert!(colors.has_pending_upload());
    assert_eq!(
        colors
            .complete_upload(newer, Ok(solid(&f, [0.3; 3])))
            .unwrap(),
        UploadOutcome::Applied
    );
    assert!(!colors.has_pending_upload());
}

#[test]
fn pending_tracks_outstanding_tickets() {
    let f = field(16);
    let mut colors = ActiveColors::new(&f);
    assert!(!colors.has_pending_upload());
    let first = colors.begin_upload();
    let second = colors.begin_upload();
    assert!(colors.has_pending_upload());

    colors
        .complete_upload(first, Ok(solid(&f, [0.1; 3])))
        .unwrap();
    assert!(colors.has_pending_upload());
    colors
        .complete_upload(second, Ok(solid(&f, [0.2; 3])))
        .unwrap();
    assert!(!colors.has_pending_upload());

    colors.begin_upload();
    colors.reset(&f);
    assert!(!colors.has_pending_upload());
}

#[test]
fn abandoning_a_superseded_ticket_reports_it() {
    let f = field(17);
    let mut colors = ActiveColors::new(&f);
    let ticket = colors.begin_upload();
    colors.clear();
    assert!(!colors.abandon_upload(ticket));
    assert_eq!(colors.source(), ColorSource::Default);
}
