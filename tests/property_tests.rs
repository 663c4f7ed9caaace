//! Property-based tests for chameleon-recolor
//!
//! These tests use proptest to check the invariants of region recoloring
//! over arbitrary images and target colors.

use chameleon_recolor::{rgb_to_hsv, ColorPicker, Image, RegionRecolor, HUE_TOLERANCE};
use image::{Rgb, Rgba};
use proptest::prelude::*;

/// Largest amount any channel can be brightened by.
const MAX_BOOST: u8 = 89;

/// Strategy for generating small but valid image dimensions
fn image_dimensions() -> impl Strategy<Value = (u32, u32)> {
    (1u32..=24, 1u32..=24)
}

/// Strategy for generating RGB pixel values
fn rgb_pixel() -> impl Strategy<Value = Rgb<u8>> {
    (any::<u8>(), any::<u8>(), any::<u8>()).prop_map(|(r, g, b)| Rgb([r, g, b]))
}

/// Strategy for an image whose pixels are drawn from a small palette, so
/// that matching regions are large enough to survive the opening.
fn paletted_rgb_image() -> impl Strategy<Value = Image<Rgb<u8>>> {
    (
        image_dimensions(),
        prop::collection::vec(rgb_pixel(), 1..=4),
        1u32..=8,
    )
        .prop_map(|((width, height), palette, cell)| {
            create_test_rgb_image_with_pattern(width, height, |x, y| {
                let index = ((x / cell + y / cell) as usize) % palette.len();
                palette[index]
            })
        })
}

/// Create a test RGB image with given dimensions and fill pattern
fn create_test_rgb_image_with_pattern(
    width: u32,
    height: u32,
    pattern: impl Fn(u32, u32) -> Rgb<u8>,
) -> Image<Rgb<u8>> {
    Image::from_fn(width, height, pattern)
}

proptest! {
    #[test]
    fn recolor_preserves_dimensions(
        image in paletted_rgb_image(),
        target in rgb_pixel(),
    ) {
        let result = image.recolor_region(target).unwrap();
        prop_assert_eq!(result.dimensions(), image.dimensions());
    }

    #[test]
    fn recolor_only_brightens_within_bounds(
        image in paletted_rgb_image(),
        target in rgb_pixel(),
    ) {
        let result = image.recolor_region(target).unwrap();

        for (before, after) in image.pixels().zip(result.pixels()) {
            for channel in 0..3 {
                let (before, after) = (before[channel], after[channel]);
                prop_assert!(after >= before);
                prop_assert!(after <= before.saturating_add(MAX_BOOST));
            }
        }
    }

    #[test]
    fn all_channels_get_the_same_boost(
        image in paletted_rgb_image(),
        target in rgb_pixel(),
    ) {
        let result = image.recolor_region(target).unwrap();

        for (before, after) in image.pixels().zip(result.pixels()) {
            let boosts: Vec<u8> = (0..3)
                .filter(|&channel| before[channel] <= 255 - MAX_BOOST)
                .map(|channel| after[channel] - before[channel])
                .collect();
            prop_assert!(boosts.windows(2).all(|pair| pair[0] == pair[1]));
        }
    }

    #[test]
    fn recolor_is_deterministic(
        image in paletted_rgb_image(),
        target in rgb_pixel(),
    ) {
        let snapshot = image.clone();
        let first = image.recolor_region(target).unwrap();
        let second = image.recolor_region(target).unwrap();
        prop_assert_eq!(first, second);
        prop_assert_eq!(image, snapshot);
    }

    #[test]
    fn distant_hue_leaves_uniform_image_unchanged(
        (width, height) in (2u32..=24, 1u32..=24),
        fill in rgb_pixel(),
        target in rgb_pixel(),
    ) {
        let fill_hue = i32::from(rgb_to_hsv(fill).hue);
        let target_hue = i32::from(rgb_to_hsv(target).hue);
        prop_assume!((fill_hue - target_hue).abs() > i32::from(HUE_TOLERANCE));

        let image: Image<Rgb<u8>> = Image::from_pixel(width, height, fill);
        prop_assert_eq!(image.recolor_region(target).unwrap(), image);
    }

    #[test]
    fn matching_hue_boosts_uniform_image_everywhere(
        (width, height) in image_dimensions(),
        fill in rgb_pixel(),
    ) {
        let image: Image<Rgb<u8>> = Image::from_pixel(width, height, fill);
        let result = image.recolor_region(fill).unwrap();
        let Rgb([r, g, b]) = fill;
        let expected = Rgb([
            r.saturating_add(MAX_BOOST),
            g.saturating_add(MAX_BOOST),
            b.saturating_add(MAX_BOOST),
        ]);
        prop_assert!(result.pixels().all(|p| *p == expected));
    }

    #[test]
    fn rgba_alpha_is_untouched(
        (width, height) in image_dimensions(),
        fill in rgb_pixel(),
        alpha in any::<u8>(),
        target in rgb_pixel(),
    ) {
        let Rgb([r, g, b]) = fill;
        let image: Image<Rgba<u8>> = Image::from_pixel(width, height, Rgba([r, g, b, alpha]));
        let result = image.recolor_region(target).unwrap();
        prop_assert!(result.pixels().all(|p| p[3] == alpha));
    }

    #[test]
    fn picked_color_recolors_its_own_region(
        image in paletted_rgb_image(),
        x in any::<u32>(),
        y in any::<u32>(),
    ) {
        let (x, y) = (x % image.width(), y % image.height());
        let picked = image.pick_color(x, y).unwrap();
        prop_assert_eq!(picked, *image.get_pixel(x, y));
        prop_assert!(image.recolor_region(picked).is_ok());
    }

    #[test]
    fn dominant_colors_cover_every_pixel_at_most_once(
        image in paletted_rgb_image(),
        count in 1usize..=8,
    ) {
        let swatches = image.dominant_colors(count).unwrap();
        prop_assert!(!swatches.is_empty());
        prop_assert!(swatches.len() <= count);

        let total: u64 = swatches.iter().map(|s| u64::from(s.population)).sum();
        prop_assert!(total <= u64::from(image.width() * image.height()));
        prop_assert!(swatches
            .windows(2)
            .all(|pair| pair[0].population >= pair[1].population));
    }
}
