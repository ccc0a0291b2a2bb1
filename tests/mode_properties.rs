//! Property tests for display mode enumeration.

use display_bridge::display::mock::MockPlatform;
use display_bridge::display::modes::{expand_modes, list_modes};
use display_bridge::display::types::{
    RawDisplayMode, ALPHA_BITS_CHOICES, COMBINATIONS_PER_MODE, DEPTH_BITS_CHOICES,
    MIN_TRUE_COLOR_BITS, STENCIL_BITS_CHOICES,
};
use proptest::prelude::*;

fn raw_mode() -> impl Strategy<Value = RawDisplayMode> {
    (
        prop::sample::select(vec![320u32, 640, 800, 1024, 1280, 1920]),
        prop::sample::select(vec![200u32, 480, 600, 768, 1024, 1080]),
        prop::sample::select(vec![4u32, 8, 15, 16, 24, 32]),
        prop::sample::select(vec![0u32, 60, 75, 144]),
    )
        .prop_map(|(w, h, bpp, hz)| RawDisplayMode::new(w, h, bpp, hz))
}

proptest! {
    #[test]
    fn low_depth_modes_are_excluded(raw in prop::collection::vec(raw_mode(), 0..12)) {
        let expanded = expand_modes(&raw);
        let qualifying = raw.iter().filter(|m| m.bits_per_pixel >= MIN_TRUE_COLOR_BITS).count();

        prop_assert_eq!(expanded.len(), qualifying * COMBINATIONS_PER_MODE);
        prop_assert!(expanded.iter().all(|d| d.color_bits_per_pixel >= MIN_TRUE_COLOR_BITS));
    }

    #[test]
    fn each_mode_expands_to_every_combination(raw in prop::collection::vec(raw_mode(), 1..8)) {
        let qualifying: Vec<_> = raw.iter().copied().filter(|m| m.is_true_color()).collect();
        let expanded = expand_modes(&raw);

        for (chunk, base) in expanded.chunks(COMBINATIONS_PER_MODE).zip(&qualifying) {
            prop_assert!(chunk.iter().all(|d| d.raw() == *base));

            let mut combos: Vec<_> = chunk
                .iter()
                .map(|d| (d.depth_bits, d.stencil_bits, d.alpha_bits))
                .collect();
            let expected: Vec<_> = DEPTH_BITS_CHOICES
                .iter()
                .flat_map(|&d| STENCIL_BITS_CHOICES.iter().map(move |&s| (d, s)))
                .flat_map(|(d, s)| ALPHA_BITS_CHOICES.iter().map(move |&a| (d, s, a)))
                .collect();
            // Depth-major ordering.
            prop_assert_eq!(&combos, &expected);
            combos.dedup();
            prop_assert_eq!(combos.len(), COMBINATIONS_PER_MODE);
        }
    }

    #[test]
    fn listing_matches_platform_report(raw in prop::collection::vec(raw_mode(), 0..6)) {
        let platform = MockPlatform::new().with_raw_modes(raw.clone());
        prop_assert_eq!(list_modes(&platform), expand_modes(&raw));
    }
}
