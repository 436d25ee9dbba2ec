#![allow(clippy::float_cmp)]

use super::*;

fn drop_event(category: &str, x: f64, y: f64) -> DropEvent {
    DropEvent {
        category: Category::parse(category),
        image_ref: "https://example.test/shirt.png".into(),
        name: "Blue Denim Shirt".into(),
        pointer_x: x,
        pointer_y: y,
    }
}

// =============================================================
// DropEvent
// =============================================================

#[test]
fn drop_event_parses_camel_case_payload() {
    let json = r#"{"category":"shoes","imageRef":"blob:abc","name":"White Sneakers","pointerX":12.5,"pointerY":300}"#;
    let event: DropEvent = serde_json::from_str(json).unwrap();
    assert_eq!(event.category, Category::Shoes);
    assert_eq!(event.image_ref, "blob:abc");
    assert_eq!(event.pointer(), Point::new(12.5, 300.0));
}

#[test]
fn drop_event_accepts_image_url_alias_and_missing_name() {
    let json = r#"{"category":"hat","imageUrl":"https://x.test/h.png","pointerX":0,"pointerY":0}"#;
    let event: DropEvent = serde_json::from_str(json).unwrap();
    assert_eq!(event.category, Category::Other("hat".into()));
    assert_eq!(event.image_ref, "https://x.test/h.png");
    assert!(event.name.is_empty());
}

// =============================================================
// PendingPlacement
// =============================================================

#[test]
fn begin_computes_anchor_at_drop_time() {
    let pending = PendingPlacement::begin(drop_event("hat", 123.0, 45.0), Canvas::new(400.0, 750.0));
    assert_eq!(pending.anchor(), Point::new(123.0, 45.0));
    assert_eq!(pending.image_ref(), "https://example.test/shirt.png");
    assert_eq!(pending.category(), &Category::Other("hat".into()));
}

#[test]
fn finish_builds_placed_item() {
    let canvas = Canvas::new(400.0, 750.0);
    let pending = PendingPlacement::begin(drop_event("shoes", 0.0, 0.0), canvas);
    let item = pending.finish(Size::new(200.0, 100.0)).unwrap();

    let expected = engine::place(&Category::Shoes, Point::default(), Size::new(200.0, 100.0), canvas).unwrap();
    assert_eq!(item.position, expected.position);
    assert_eq!(item.size, expected.size);
    assert_eq!(item.stack_order, expected.stack_order);
    assert_eq!(item.name, "Blue Denim Shirt");
    assert_eq!(item.image_ref, "https://example.test/shirt.png");
}

#[test]
fn finish_uses_canvas_captured_at_begin() {
    let pending = PendingPlacement::begin(drop_event("top", 0.0, 0.0), Canvas::new(400.0, 750.0));
    assert_eq!(pending.canvas(), Canvas::new(400.0, 750.0));
    let item = pending.finish(Size::new(1000.0, 1000.0)).unwrap();
    // Top box on 400x750 is 140x240.
    assert!((item.size.width - 140.0).abs() < 1e-9);
}

#[test]
fn finish_defers_until_image_ready_then_succeeds() {
    let pending = PendingPlacement::begin(drop_event("dress", 0.0, 0.0), Canvas::new(400.0, 750.0));
    assert_eq!(pending.finish(Size::new(0.0, 0.0)), Err(PlacementError::ImageNotReady));
    assert!(pending.finish(Size::new(300.0, 600.0)).is_ok());
}

#[test]
fn finish_on_unlaid_canvas_is_deferred() {
    let pending = PendingPlacement::begin(drop_event("top", 5.0, 5.0), Canvas::new(0.0, 0.0));
    assert_eq!(pending.finish(Size::new(10.0, 10.0)), Err(PlacementError::CanvasNotReady));
}

#[test]
fn each_finish_assigns_a_new_id() {
    let pending = PendingPlacement::begin(drop_event("top", 0.0, 0.0), Canvas::new(400.0, 750.0));
    let a = pending.finish(Size::new(100.0, 100.0)).unwrap();
    let b = pending.finish(Size::new(100.0, 100.0)).unwrap();
    assert_ne!(a.id, b.id);
    assert_eq!(a.position, b.position);
}
