use handpoint_core::geometry::{to_source_point, DisplayRect, ImageSize, SourcePoint};

const NATIVE: ImageSize = ImageSize {
    width: 1080,
    height: 540,
};

#[test]
fn test_half_size_display_doubles_coordinates() {
    let rect = DisplayRect::sized(540.0, 270.0);
    let p = to_source_point(100.0, 50.0, rect, NATIVE).unwrap();
    assert_eq!(p, SourcePoint { x: 200, y: 100 });
}

#[test]
fn test_offset_rect_is_subtracted() {
    let rect = DisplayRect::new(20.0, 300.0, 540.0, 270.0);
    let p = to_source_point(120.0, 350.0, rect, NATIVE).unwrap();
    assert_eq!(p, SourcePoint { x: 200, y: 100 });
}

#[test]
fn test_axes_scale_independently() {
    // Stretched display: 2x horizontally, 4x vertically.
    let rect = DisplayRect::sized(540.0, 135.0);
    let p = to_source_point(10.0, 10.0, rect, NATIVE).unwrap();
    assert_eq!(p, SourcePoint { x: 20, y: 40 });
}

#[test]
fn test_rounding_to_nearest_pixel() {
    let rect = DisplayRect::sized(700.0, 350.0);
    // 333 * 1080/700 = 513.77 -> 514; 111 * 540/350 = 171.26 -> 171
    let p = to_source_point(333.0, 111.0, rect, NATIVE).unwrap();
    assert_eq!(p, SourcePoint { x: 514, y: 171 });
}

#[test]
fn test_out_of_bounds_clicks_are_clamped() {
    let rect = DisplayRect::new(10.0, 10.0, 540.0, 270.0);

    let before = to_source_point(-50.0, 0.0, rect, NATIVE).unwrap();
    assert_eq!(before, SourcePoint { x: 0, y: 0 });

    let after = to_source_point(10_000.0, 10_000.0, rect, NATIVE).unwrap();
    assert_eq!(after, SourcePoint { x: 1079, y: 539 });

    let edge = to_source_point(550.0, 280.0, rect, NATIVE).unwrap();
    assert_eq!(edge, SourcePoint { x: 1079, y: 539 });
}

#[test]
fn test_degenerate_display_is_an_error() {
    assert!(to_source_point(1.0, 1.0, DisplayRect::sized(0.0, 10.0), NATIVE).is_err());
    assert!(to_source_point(1.0, 1.0, DisplayRect::sized(10.0, f32::NAN), NATIVE).is_err());
    let empty = ImageSize {
        width: 0,
        height: 0,
    };
    assert!(to_source_point(1.0, 1.0, DisplayRect::sized(10.0, 10.0), empty).is_err());
}

#[test]
fn test_display_rect_contains() {
    let rect = DisplayRect::new(10.0, 10.0, 100.0, 50.0);
    assert!(rect.contains(10.0, 10.0));
    assert!(rect.contains(109.9, 59.9));
    assert!(!rect.contains(110.0, 30.0));
    assert!(!rect.contains(5.0, 30.0));
}
