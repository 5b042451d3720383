//! Tests for the view transform and gesture handling

use streamscope::view::{Gesture, ViewInteraction, ViewTransform, MAX_SCALE, ZOOM_SENSITIVITY};

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}

#[test]
fn test_wheel_zoom_keeps_cursor_anchored() {
    let mut view = ViewInteraction::new();
    view.handle(Gesture::PointerDown { x: 0.0 });
    view.handle(Gesture::PointerMove { x: 35.0 });
    view.handle(Gesture::PointerUp);

    let before = view.transform();
    let content_x = (100.0 - before.offset) / before.scale;
    assert!(view.handle(Gesture::Wheel {
        cursor_x: 100.0,
        delta_y: -240.0,
    }));

    let after = view.transform();
    assert!(
        approx_eq(after.apply(content_x), 100.0),
        "content under the cursor stays at x=100, got {}",
        after.apply(content_x)
    );
    assert!(approx_eq(after.scale, (240.0 * ZOOM_SENSITIVITY).exp()));
}

#[test]
fn test_wheel_at_scale_limit_reports_no_change() {
    let mut view = ViewInteraction::new();
    while view.transform().scale < MAX_SCALE {
        view.handle(Gesture::Wheel {
            cursor_x: 10.0,
            delta_y: -1000.0,
        });
    }
    assert!(!view.handle(Gesture::Wheel {
        cursor_x: 10.0,
        delta_y: -1000.0,
    }));
}

#[test]
fn test_drag_accumulates_offset() {
    let mut view = ViewInteraction::new();
    view.handle(Gesture::PointerDown { x: 100.0 });
    for x in [110.0, 130.0, 125.0] {
        assert!(view.handle(Gesture::PointerMove { x }));
    }
    view.handle(Gesture::PointerUp);
    assert!(!view.handle(Gesture::PointerMove { x: 500.0 }), "release ends the drag");
    assert_eq!(view.transform().offset, 25.0);
}

#[test]
fn test_reset_restores_identity() {
    let mut view = ViewInteraction::new();
    assert!(!view.handle(Gesture::Key('0')), "identity reset is a no-op");
    view.handle(Gesture::Wheel {
        cursor_x: 50.0,
        delta_y: 300.0,
    });
    assert!(view.handle(Gesture::Key('0')));
    assert_eq!(view.transform(), ViewTransform::default());
}
