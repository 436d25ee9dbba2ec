#![allow(clippy::float_cmp)]

use super::*;

const EPS: f64 = 1e-9;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < EPS
}

fn aspect_ratio(size: Size) -> f64 {
    size.width / size.height
}

fn hat() -> Category {
    Category::Other("hat".into())
}

fn mannequin() -> Canvas {
    Canvas::new(400.0, 750.0)
}

// =============================================================
// compute_anchor
// =============================================================

#[test]
fn known_anchor_ignores_drop_position() {
    let canvas = mannequin();
    let a = compute_anchor(&Category::Top, Point::new(0.0, 0.0), canvas);
    let b = compute_anchor(&Category::Top, Point::new(399.0, 749.0), canvas);
    assert_eq!(a, b);
    assert!(approx(a.x, 200.0));
    assert!(approx(a.y, 270.0));
}

#[test]
fn known_anchor_scales_with_canvas() {
    let small = compute_anchor(&Category::Shoes, Point::default(), Canvas::new(200.0, 375.0));
    let large = compute_anchor(&Category::Shoes, Point::default(), mannequin());
    assert!(approx(large.x, small.x * 2.0));
    assert!(approx(large.y, small.y * 2.0));
}

#[test]
fn unknown_anchor_uses_drop_point() {
    let a = compute_anchor(&hat(), Point::new(123.0, 456.0), mannequin());
    assert_eq!(a, Point::new(123.0, 456.0));
}

#[test]
fn unknown_anchor_keeps_edge_margin() {
    let a = compute_anchor(&hat(), Point::new(390.0, 10.0), mannequin());
    assert_eq!(a, Point::new(390.0, 10.0));

    let a = compute_anchor(&hat(), Point::new(400.0, 0.0), mannequin());
    assert_eq!(a, Point::new(390.0, 10.0));

    let a = compute_anchor(&hat(), Point::new(-50.0, 900.0), mannequin());
    assert_eq!(a, Point::new(10.0, 740.0));
}

#[test]
fn unknown_anchor_on_tiny_canvas_centers() {
    let a = compute_anchor(&hat(), Point::new(1.0, 14.0), Canvas::new(15.0, 15.0));
    assert_eq!(a, Point::new(7.5, 7.5));
}

#[test]
fn unknown_anchor_with_non_finite_drop_centers() {
    let a = compute_anchor(&hat(), Point::new(f64::NAN, f64::INFINITY), mannequin());
    assert_eq!(a, Point::new(200.0, 375.0));
}

#[test]
fn anchor_is_never_negative() {
    for c in [Category::Top, hat()] {
        let a = compute_anchor(&c, Point::new(-1e6, -1e6), Canvas::new(-10.0, 0.0));
        assert!(a.x >= 0.0 && a.y >= 0.0, "{c}: {a:?}");
    }
}

// =============================================================
// compute_fit_size
// =============================================================

#[test]
fn fit_size_shoes_scenario() {
    let size = compute_fit_size(&Category::Shoes, Size::new(200.0, 100.0), mannequin()).unwrap();
    assert!(approx(size.width, 120.0));
    assert!(approx(size.height, 60.0));
}

#[test]
fn fit_size_shrinks_to_bounds() {
    // 500x500 * 0.8 = 400x400, top bounds are 140x240.
    let size = compute_fit_size(&Category::Top, Size::new(500.0, 500.0), mannequin()).unwrap();
    assert!(approx(size.width, 140.0));
    assert!(approx(size.height, 140.0));
}

#[test]
fn fit_size_never_upscales() {
    // 100x200 * 0.9 = 90x180, well inside the 180x360 dress box.
    let size = compute_fit_size(&Category::Dress, Size::new(100.0, 200.0), mannequin()).unwrap();
    assert!(approx(size.width, 90.0));
    assert!(approx(size.height, 180.0));
}

#[test]
fn fit_size_unknown_uses_default_scale_and_bounds() {
    let size = compute_fit_size(&hat(), Size::new(100.0, 100.0), mannequin()).unwrap();
    assert!(approx(size.width, 80.0));
    assert!(approx(size.height, 80.0));

    // Default box is 40% of each dimension: 160x300.
    let size = compute_fit_size(&hat(), Size::new(1000.0, 100.0), mannequin()).unwrap();
    assert!(approx(size.width, 160.0));
    assert!(approx(size.height, 16.0));
}

#[test]
fn fit_size_rejects_missing_natural_size() {
    let canvas = mannequin();
    for natural in [
        Size::new(0.0, 100.0),
        Size::new(100.0, 0.0),
        Size::new(-5.0, 100.0),
        Size::new(f64::NAN, 100.0),
    ] {
        assert_eq!(compute_fit_size(&Category::Top, natural, canvas), Err(PlacementError::ImageNotReady));
    }
}

#[test]
fn fit_size_rejects_unlaid_canvas() {
    let result = compute_fit_size(&Category::Top, Size::new(100.0, 100.0), Canvas::new(0.0, 0.0));
    assert_eq!(result, Err(PlacementError::CanvasNotReady));
}

#[test]
fn image_readiness_is_checked_before_canvas() {
    let result = compute_fit_size(&Category::Top, Size::new(0.0, 0.0), Canvas::new(0.0, 0.0));
    assert_eq!(result, Err(PlacementError::ImageNotReady));
}

// =============================================================
// compute_final_position
// =============================================================

#[test]
fn final_position_centers_and_offsets() {
    // Top: anchor (200, 270), 140x140, nudged up 10% of height.
    let p = compute_final_position(Point::new(200.0, 270.0), Size::new(140.0, 140.0), &Category::Top, mannequin());
    assert!(approx(p.x, 130.0));
    assert!(approx(p.y, 186.0));
}

#[test]
fn final_position_unknown_has_no_offset() {
    let p = compute_final_position(Point::new(200.0, 300.0), Size::new(100.0, 50.0), &hat(), mannequin());
    assert!(approx(p.x, 150.0));
    assert!(approx(p.y, 275.0));
}

#[test]
fn offset_cannot_push_item_above_canvas() {
    // 5 - 20 - 0.15 * 40 = -21 before clamping.
    let p = compute_final_position(Point::new(50.0, 5.0), Size::new(40.0, 40.0), &Category::Accessories, mannequin());
    assert_eq!(p.y, 0.0);
    assert!(approx(p.x, 30.0));
}

#[test]
fn offset_cannot_push_item_below_canvas() {
    // 745 - 50 + 0.08 * 100 = 703 before clamping; max is 650.
    let p = compute_final_position(Point::new(200.0, 745.0), Size::new(100.0, 100.0), &Category::Shoes, mannequin());
    assert!(approx(p.y, 650.0));
}

#[test]
fn item_wider_than_canvas_pins_to_origin() {
    let p = compute_final_position(Point::new(50.0, 50.0), Size::new(500.0, 10.0), &hat(), Canvas::new(100.0, 100.0));
    assert_eq!(p.x, 0.0);
}

// =============================================================
// stack_order
// =============================================================

#[test]
fn stack_order_is_category_table() {
    assert_eq!(stack_order(&Category::Shoes), 0);
    assert_eq!(stack_order(&Category::Accessories), 4);
    assert_eq!(stack_order(&hat()), crate::consts::DEFAULT_STACK_ORDER);
}

// =============================================================
// place: scenarios
// =============================================================

#[test]
fn place_shoes_lands_in_lower_quarter() {
    let canvas = mannequin();
    let p = place(&Category::Shoes, Point::new(10.0, 10.0), Size::new(200.0, 100.0), canvas).unwrap();
    assert!(approx(p.size.width, 120.0));
    assert!(approx(p.size.height, 60.0));
    assert!(approx(p.position.x, 140.0));
    assert!(approx(p.position.y, 619.8));
    assert!(p.position.y >= canvas.height * 0.75);
    assert_eq!(p.stack_order, 0);
}

#[test]
fn place_unknown_near_corner_is_clamped() {
    let p = place(&hat(), Point::new(390.0, 10.0), Size::new(100.0, 100.0), mannequin()).unwrap();
    assert_eq!(p.category, hat());
    assert!(approx(p.size.width, 80.0));
    assert!(approx(p.position.x, 320.0));
    assert_eq!(p.position.y, 0.0);
    assert_eq!(p.stack_order, 2);
}

#[test]
fn place_propagates_image_not_ready() {
    let result = place(&Category::Dress, Point::default(), Size::new(0.0, 0.0), mannequin());
    assert_eq!(result, Err(PlacementError::ImageNotReady));
    assert_eq!(PlacementError::ImageNotReady.error_code(), "E_IMAGE_NOT_READY");
}

// =============================================================
// place: sweeps
// =============================================================

fn all_categories() -> Vec<Category> {
    let mut all = Category::KNOWN.to_vec();
    all.push(hat());
    all.push(Category::Other(String::new()));
    all
}

const CANVASES: [(f64, f64); 5] = [(100.0, 100.0), (400.0, 750.0), (1920.0, 1080.0), (320.0, 2000.0), (101.5, 333.3)];

const NATURALS: [(f64, f64); 6] =
    [(1.0, 1.0), (200.0, 100.0), (100.0, 200.0), (3000.0, 4000.0), (50.0, 50.0), (10_000.0, 10.0)];

fn drops(canvas: Canvas) -> [Point; 4] {
    [
        Point::new(0.0, 0.0),
        Point::new(canvas.width, canvas.height),
        Point::new(-100.0, 5000.0),
        Point::new(canvas.width / 2.0, canvas.height / 2.0),
    ]
}

#[test]
fn every_placement_stays_on_canvas() {
    for (cw, ch) in CANVASES {
        let canvas = Canvas::new(cw, ch);
        for category in all_categories() {
            for (nw, nh) in NATURALS {
                for drop in drops(canvas) {
                    let p = place(&category, drop, Size::new(nw, nh), canvas).unwrap();
                    let ctx = format!("{category} canvas={cw}x{ch} natural={nw}x{nh} drop={drop:?} -> {p:?}");
                    assert!(p.position.x >= 0.0, "{ctx}");
                    assert!(p.position.y >= 0.0, "{ctx}");
                    assert!(p.position.x + p.size.width <= cw + EPS, "{ctx}");
                    assert!(p.position.y + p.size.height <= ch + EPS, "{ctx}");
                    assert!(p.size.width > 0.0 && p.size.height > 0.0, "{ctx}");
                    assert!(p.size.width <= cw && p.size.height <= ch, "{ctx}");
                }
            }
        }
    }
}

#[test]
fn every_placement_preserves_aspect_ratio() {
    for (cw, ch) in CANVASES {
        let canvas = Canvas::new(cw, ch);
        for category in all_categories() {
            for (nw, nh) in NATURALS {
                let natural = Size::new(nw, nh);
                let p = place(&category, Point::default(), natural, canvas).unwrap();
                let expected = aspect_ratio(natural);
                let actual = aspect_ratio(p.size);
                assert!(((actual - expected) / expected).abs() < 1e-9, "{category} {nw}x{nh}: {actual} vs {expected}");
            }
        }
    }
}

#[test]
fn placement_is_deterministic() {
    for (cw, ch) in CANVASES {
        let canvas = Canvas::new(cw, ch);
        for category in all_categories() {
            for drop in drops(canvas) {
                let a = place(&category, drop, Size::new(640.0, 480.0), canvas).unwrap();
                let b = place(&category, drop, Size::new(640.0, 480.0), canvas).unwrap();
                assert_eq!(a, b);
            }
        }
    }
}

#[test]
fn place_at_matches_place_for_computed_anchor() {
    let canvas = mannequin();
    let drop = Point::new(390.0, 10.0);
    for category in all_categories() {
        let anchor = compute_anchor(&category, drop, canvas);
        let via_anchor = place_at(&category, anchor, Size::new(300.0, 200.0), canvas).unwrap();
        let direct = place(&category, drop, Size::new(300.0, 200.0), canvas).unwrap();
        assert_eq!(via_anchor, direct, "{category}");
    }
}

#[test]
fn place_at_defers_like_place() {
    let anchor = Point::new(200.0, 200.0);
    assert_eq!(
        place_at(&Category::Top, anchor, Size::new(0.0, 10.0), mannequin()),
        Err(PlacementError::ImageNotReady)
    );
    assert_eq!(
        place_at(&Category::Top, anchor, Size::new(10.0, 10.0), Canvas::new(0.0, 0.0)),
        Err(PlacementError::CanvasNotReady)
    );
}
