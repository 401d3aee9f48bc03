use rand::rngs::StdRng;
use rand::SeedableRng;
use tree_core::*;

#[test]
fn starfield_lies_in_its_shell() {
    let mut rng = StdRng::seed_from_u64(3);
    let set = starfield(2000, STARFIELD_RADIUS, STARFIELD_DEPTH, &mut rng);
    assert_eq!(set.len(), 2000);
    assert_eq!(set.colors.len(), 2000);
    for p in &set.positions {
        let d = p.length();
        assert!(d >= STARFIELD_RADIUS - 1e-2, "{d}");
        assert!(d <= STARFIELD_RADIUS + STARFIELD_DEPTH + 1e-2, "{d}");
    }
    for c in set.colors.as_slice() {
        assert!(c[0] >= 0.6 && c[0] < 1.0);
        assert_eq!(c[0], c[1]);
        assert_eq!(c[1], c[2]);
    }
}

#[test]
fn starfield_covers_both_hemispheres() {
    let mut rng = StdRng::seed_from_u64(4);
    let set = starfield(1000, 10.0, 0.0, &mut rng);
    let above = set.positions.iter().filter(|p| p.y > 0.0).count();
    assert!(above > 400 && above < 600, "{above}");
}

#[test]
fn sparkles_fill_their_cube() {
    let mut rng = StdRng::seed_from_u64(5);
    let set = sparkles(SPARKLE_COUNT, SPARKLE_EXTENT, SPARKLE_COLOR, &mut rng);
    assert_eq!(set.len(), SPARKLE_COUNT);
    let half = SPARKLE_EXTENT / 2.0;
    for p in &set.positions {
        assert!(p.abs().max_element() <= half);
    }
    assert!(set.colors.as_slice().iter().all(|c| *c == ORNAMENT_GOLD));
}

#[test]
fn empty_sets() {
    let mut rng = StdRng::seed_from_u64(6);
    assert!(starfield(0, 1.0, 1.0, &mut rng).is_empty());
    let flat = sparkles(4, 0.0, [1.0; 3], &mut rng);
    assert!(flat.positions.iter().all(|p| *p == glam::Vec3::ZERO));
}
