mod common;

use ndarray::Array3;

use common::{blank, fill_rect, CELESTE, GREEN, PINK, RED};
use posetrack_core::detection::mask::color_mask;
use posetrack_core::detection::marker::detect_color;
use posetrack_core::detection::{
    detect_markers, draw_offset_labels, draw_physical_label, ColorRange, Detection,
    DetectionConfig, DetectionMode, HsvInterval,
};
use posetrack_core::geometry::PixelPoint;
use posetrack_core::physical::to_physical;
use posetrack_core::relative::relative_offsets;

fn hsv_row(pixels: &[[u8; 3]]) -> Array3<u8> {
    Array3::from_shape_fn((1, pixels.len(), 3), |(_, col, ch)| pixels[col][ch])
}

// ---------------------------------------------------------------------------
// Mask union
// ---------------------------------------------------------------------------

#[test]
fn test_mask_is_union_of_intervals() {
    let red = DetectionConfig::default().color("red").unwrap().clone();
    let hsv = hsv_row(&[
        [5, 200, 200],   // first interval
        [175, 200, 200], // second interval
        [90, 200, 200],  // hue in neither
        [5, 50, 200],    // saturation too low
        [10, 100, 100],  // boundary of first interval
        [170, 255, 255], // boundary of second interval
        [11, 200, 200],  // just past the first interval
    ]);

    let mask = color_mask(&hsv, &red.intervals);
    let got: Vec<bool> = mask.row(0).to_vec();
    assert_eq!(got, vec![true, true, false, false, true, true, false]);
}

#[test]
fn test_mask_without_intervals_is_empty() {
    let hsv = hsv_row(&[[5, 200, 200], [60, 255, 255]]);
    let mask = color_mask(&hsv, &[]);
    assert!(mask.iter().all(|&m| !m));
}

#[test]
fn test_wrapped_red_detected_from_both_ends() {
    let mut img = blank(60, 30);
    // Hue ~0 and hue ~175 blocks, far apart; the larger wins.
    fill_rect(&mut img, 2, 2, 6, 6, RED);
    fill_rect(&mut img, 30, 5, 45, 20, image::Rgb([255, 0, 40]));

    let result = detect_markers(&img, &DetectionConfig::default());
    let red = result.points.get("red").expect("red detected");
    assert_eq!(*red, Detection::Single(PixelPoint::new(37, 12)));
}

// ---------------------------------------------------------------------------
// Area threshold (multi mode)
// ---------------------------------------------------------------------------

#[test]
fn test_multi_area_threshold_excludes_area_ten() {
    let mut img = blank(60, 40);
    // 3x6 pixels: contour area 2 * 5 = 10.
    fill_rect(&mut img, 5, 5, 7, 10, CELESTE);
    // 2x12 pixels: contour area 1 * 11 = 11.
    fill_rect(&mut img, 30, 5, 31, 16, CELESTE);

    let result = detect_markers(&img, &DetectionConfig::default());
    let celeste = result.points.get("celeste").expect("celeste detected");
    assert_eq!(*celeste, Detection::Multiple(vec![PixelPoint::new(30, 10)]));
}

#[test]
fn test_multi_color_absent_when_all_regions_small() {
    let mut img = blank(40, 40);
    fill_rect(&mut img, 5, 5, 7, 10, CELESTE);
    fill_rect(&mut img, 20, 20, 22, 22, CELESTE);

    let result = detect_markers(&img, &DetectionConfig::default());
    assert!(!result.points.contains_key("celeste"));
}

#[test]
fn test_multi_reports_regions_bottom_up() {
    let mut img = blank(100, 100);
    fill_rect(&mut img, 60, 10, 70, 20, CELESTE);
    fill_rect(&mut img, 10, 50, 20, 60, CELESTE);
    fill_rect(&mut img, 10, 10, 20, 20, CELESTE);

    let result = detect_markers(&img, &DetectionConfig::default());
    let points = result.points["celeste"].points().to_vec();
    assert_eq!(
        points,
        vec![
            PixelPoint::new(15, 55),
            PixelPoint::new(65, 15),
            PixelPoint::new(15, 15),
        ]
    );
}

#[test]
fn test_min_area_is_configurable() {
    let mut img = blank(40, 40);
    fill_rect(&mut img, 5, 5, 7, 10, CELESTE);

    let config = DetectionConfig {
        min_area: 5.0,
        ..DetectionConfig::default()
    };
    let result = detect_markers(&img, &config);
    assert_eq!(result.points["celeste"].points().len(), 1);
}

// ---------------------------------------------------------------------------
// Centroids (single mode)
// ---------------------------------------------------------------------------

#[test]
fn test_rectangle_centroid_is_geometric_center() {
    let mut img = blank(100, 100);
    fill_rect(&mut img, 10, 30, 20, 40, GREEN);

    let result = detect_markers(&img, &DetectionConfig::default());
    assert_eq!(result.points["green"], Detection::Single(PixelPoint::new(15, 35)));
}

#[test]
fn test_centroid_truncates_half_pixels() {
    let mut img = blank(100, 100);
    // Center at (15.5, 35.5).
    fill_rect(&mut img, 10, 30, 21, 41, GREEN);

    let result = detect_markers(&img, &DetectionConfig::default());
    assert_eq!(result.points["green"], Detection::Single(PixelPoint::new(15, 35)));
}

#[test]
fn test_single_mode_picks_largest_region() {
    let mut img = blank(100, 100);
    fill_rect(&mut img, 5, 5, 9, 9, GREEN);
    fill_rect(&mut img, 50, 50, 70, 70, GREEN);
    fill_rect(&mut img, 80, 5, 90, 15, GREEN);

    let result = detect_markers(&img, &DetectionConfig::default());
    assert_eq!(result.points["green"], Detection::Single(PixelPoint::new(60, 60)));
}

#[test]
fn test_single_mode_tie_goes_to_lowest_region() {
    let mut img = blank(100, 100);
    fill_rect(&mut img, 10, 10, 20, 20, GREEN);
    fill_rect(&mut img, 60, 70, 70, 80, GREEN);
    fill_rect(&mut img, 70, 40, 80, 50, GREEN);

    let result = detect_markers(&img, &DetectionConfig::default());
    assert_eq!(result.points["green"], Detection::Single(PixelPoint::new(65, 75)));
}

#[test]
fn test_l_shaped_region_centroid() {
    let mut img = blank(50, 50);
    // Vertical bar x 10..=12, y 10..=30 and horizontal foot x 10..=30, y 28..=30.
    fill_rect(&mut img, 10, 10, 12, 30, PINK);
    fill_rect(&mut img, 10, 28, 30, 30, PINK);

    let result = detect_markers(&img, &DetectionConfig::default());
    let Detection::Single(p) = result.points["pink"] else {
        panic!("pink should be single mode");
    };
    // Mass sits towards the corner at (10..12, 28..30).
    assert!(p.x > 11 && p.x < 20, "x = {}", p.x);
    assert!(p.y > 20 && p.y < 30, "y = {}", p.y);
}

// ---------------------------------------------------------------------------
// Degenerate regions
// ---------------------------------------------------------------------------

#[test]
fn test_one_pixel_wide_line_is_skipped() {
    let mut img = blank(50, 50);
    fill_rect(&mut img, 20, 5, 20, 40, RED);

    let result = detect_markers(&img, &DetectionConfig::default());
    assert!(!result.points.contains_key("red"));
}

#[test]
fn test_single_pixel_is_skipped() {
    let mut img = blank(20, 20);
    img.put_pixel(10, 10, GREEN);

    let result = detect_markers(&img, &DetectionConfig::default());
    assert!(!result.points.contains_key("green"));
}

#[test]
fn test_zero_area_in_multi_mode_is_skipped() {
    let mut img = blank(50, 50);
    fill_rect(&mut img, 5, 5, 5, 45, CELESTE);
    fill_rect(&mut img, 20, 20, 30, 30, CELESTE);

    let result = detect_markers(&img, &DetectionConfig::default());
    assert_eq!(
        result.points["celeste"],
        Detection::Multiple(vec![PixelPoint::new(25, 25)])
    );
}

// ---------------------------------------------------------------------------
// Result shape and annotation
// ---------------------------------------------------------------------------

#[test]
fn test_blank_image_detects_nothing() {
    let result = detect_markers(&blank(32, 32), &DetectionConfig::default());
    assert!(result.points.is_empty());
}

#[test]
fn test_only_configured_colors_are_reported() {
    let mut img = blank(60, 60);
    fill_rect(&mut img, 5, 5, 15, 15, GREEN);
    fill_rect(&mut img, 30, 30, 40, 40, RED);

    let config = DetectionConfig {
        colors: vec![ColorRange::new(
            "green",
            &[HsvInterval::new([50, 100, 100], [70, 255, 255])],
            DetectionMode::Single,
        )],
        ..DetectionConfig::default()
    };
    let result = detect_markers(&img, &config);
    assert_eq!(result.points.keys().collect::<Vec<_>>(), vec!["green"]);
}

#[test]
fn test_annotation_marks_centroid_and_keeps_input() {
    let mut img = blank(60, 60);
    fill_rect(&mut img, 20, 20, 30, 30, GREEN);

    let result = detect_markers(&img, &DetectionConfig::default());
    assert_eq!(result.annotated.get_pixel(25, 25).0, [255, 255, 255]);
    assert_eq!(img.get_pixel(25, 25).0, GREEN.0);
    assert_eq!(result.annotated.dimensions(), img.dimensions());
}

#[test]
fn test_annotation_writes_color_name() {
    let mut img = blank(120, 80);
    fill_rect(&mut img, 10, 20, 20, 30, GREEN);

    let result = detect_markers(&img, &DetectionConfig::default());
    // Centroid (15, 25): the name starts at (20, 30) and runs right, past
    // the dot and the green block.
    assert!(count_pixels(&result.annotated, 32..80, 15..34, is_white) > 20);
    assert_eq!(count_pixels(&img, 0..120, 0..80, is_white), 0);
}

#[test]
fn test_offset_and_physical_labels() {
    let mut img = blank(200, 120);
    fill_rect(&mut img, 17, 97, 23, 103, GREEN);
    fill_rect(&mut img, 37, 57, 43, 63, RED);

    let mut result = detect_markers(&img, &DetectionConfig::default());
    let offsets = relative_offsets(&result.points, "green").unwrap();
    draw_offset_labels(&mut result.annotated, &result.points, &offsets);

    // red:(20,-40) sits on a baseline 10 pixels above the red centroid (40, 60).
    assert!(count_pixels(&result.annotated, 50..150, 36..53, is_green) > 20);

    let red = result.points["red"].primary().unwrap();
    let coord = to_physical(offsets["red"].primary().unwrap());
    draw_physical_label(&mut result.annotated, red, "red", &coord);
    // PhysRed:(...) sits 25 pixels above the red centroid.
    assert!(count_pixels(&result.annotated, 50..200, 21..36, is_red) > 20);
}

fn is_white([r, g, b]: [u8; 3]) -> bool {
    r >= 128 && g >= 128 && b >= 128
}

fn is_green([r, g, b]: [u8; 3]) -> bool {
    g >= 128 && r < 64 && b < 64
}

fn is_red([r, g, b]: [u8; 3]) -> bool {
    r >= 128 && g < 64 && b < 64
}

fn count_pixels(
    img: &image::RgbImage,
    xs: std::ops::Range<u32>,
    ys: std::ops::Range<u32>,
    pred: impl Fn([u8; 3]) -> bool,
) -> usize {
    ys.flat_map(|y| xs.clone().map(move |x| (x, y)))
        .filter(|&(x, y)| x < img.width() && y < img.height() && pred(img.get_pixel(x, y).0))
        .count()
}

#[test]
fn test_detect_color_on_hsv_array() {
    let hsv = Array3::from_shape_fn((10, 10, 3), |(row, col, ch)| {
        let inside = (2..8).contains(&row) && (2..8).contains(&col);
        match (inside, ch) {
            (true, 0) => 60,
            (true, _) => 255,
            (false, _) => 0,
        }
    });
    let green = DetectionConfig::default().color("green").unwrap().clone();
    let detection = detect_color(&hsv, &green, 10.0);
    assert_eq!(detection, Some(Detection::Single(PixelPoint::new(4, 4))));
}
