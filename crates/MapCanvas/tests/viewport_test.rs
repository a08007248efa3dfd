use glam::Vec2;
use map_canvas::coords;
use map_canvas::input::{InputEvent, ModifiersState, PointerButton};
use map_canvas::math::Rect;
use map_canvas::model::{CanvasFlags, Scene};
use map_canvas::view::Transform;
use map_canvas::viewport::{Gesture, Suspension, ViewportController};
use map_canvas::{Canvas, CanvasConfig};
use map_terrain::SeededRng;

const VIEWPORT: Vec2 = Vec2::new(800.0, 600.0);

fn mounted() -> Canvas {
    let mut canvas = Canvas::default();
    canvas.mount(VIEWPORT, 1.0);
    canvas
}

fn assert_content_visible(controller: &ViewportController) {
    let view = controller.view();
    let screen = Rect::new(Vec2::ZERO, view.viewport_size);
    let content = view.content_on_screen();
    assert!(
        content.intersects(&screen),
        "content {content:?} left the viewport {screen:?}"
    );
}

#[test]
fn test_mount_fits_content() {
    let canvas = mounted();
    let t = canvas.view().transform;
    let expected = (600.0 / 1100.0_f32).max(0.5);
    assert!((t.zoom - expected).abs() < 1e-5);

    let center = canvas.view().screen_to_logical(VIEWPORT * 0.5);
    assert!(center.distance(Vec2::splat(500.0)) < 1e-2);
}

#[test]
fn test_random_gestures_stay_in_bounds() {
    let mut controller = ViewportController::new(&CanvasConfig::default());
    controller.set_viewport_size(VIEWPORT);
    controller.fit_to_content();
    let mut rng = SeededRng::new("viewport-fuzz");

    for _ in 0..500 {
        let gesture = if rng.next_f32() < 0.5 {
            Gesture::Pan {
                delta: Vec2::new(rng.range(-600.0, 600.0), rng.range(-600.0, 600.0)),
            }
        } else {
            Gesture::Zoom {
                factor: rng.range(0.3, 3.0),
                focus: Vec2::new(rng.range(0.0, VIEWPORT.x), rng.range(0.0, VIEWPORT.y)),
            }
        };
        controller.apply_gesture(gesture);

        let zoom = controller.transform().zoom;
        assert!((0.5..=5.0).contains(&zoom), "zoom {zoom} out of bounds");
        assert_content_visible(&controller);
    }
}

#[test]
fn test_zoom_keeps_focus_fixed() {
    let mut controller = ViewportController::new(&CanvasConfig::default());
    controller.set_viewport_size(VIEWPORT);
    controller.fit_to_content();

    let focus = VIEWPORT * 0.5;
    let before = controller.view().screen_to_logical(focus);
    assert!(controller.apply_gesture(Gesture::Zoom { factor: 2.0, focus }));
    let after = controller.view().screen_to_logical(focus);
    assert!(before.distance(after) < 1e-2);
}

#[test]
fn test_wheel_zooms_and_middle_button_pans() {
    let scene = Scene::default();
    let mut canvas = mounted();
    let zoom_before = canvas.view().transform.zoom;

    canvas.handle_event(
        &scene,
        &InputEvent::Wheel {
            pos: VIEWPORT * 0.5,
            delta: 200.0,
        },
    );
    let zoom_after = canvas.view().transform.zoom;
    assert!((zoom_after / zoom_before - (200.0_f32 * 0.002).exp()).abs() < 1e-4);

    let pan_before = canvas.view().transform.pan;
    for event in [
        InputEvent::PointerDown {
            pos: Vec2::new(400.0, 300.0),
            button: PointerButton::Middle,
            modifiers: ModifiersState::NONE,
        },
        InputEvent::moved(Vec2::new(390.0, 295.0)),
        InputEvent::up(Vec2::new(390.0, 295.0)),
    ] {
        canvas.handle_event(&scene, &event);
    }
    let moved = canvas.view().transform.pan - pan_before;
    assert!(moved.distance(Vec2::new(-10.0, -5.0)) < 1e-3);
}

#[test]
fn test_placement_suspends_gestures() {
    let scene = Scene::default();
    let mut canvas = mounted();
    canvas.set_flags(CanvasFlags::PLACEMENT);
    assert!(canvas.viewport().suspension().contains(Suspension::PLACEMENT));

    let before = canvas.view().transform;
    canvas.handle_event(
        &scene,
        &InputEvent::Wheel {
            pos: VIEWPORT * 0.5,
            delta: 300.0,
        },
    );
    assert_eq!(canvas.view().transform, before);

    canvas.set_flags(CanvasFlags::empty());
    assert!(canvas.viewport().is_enabled());
}

#[test]
fn test_export_forces_identity_and_restores() {
    let mut canvas = mounted();
    let fitted = canvas.view().transform;

    canvas.set_flags(CanvasFlags::EXPORT);
    assert_eq!(canvas.view().transform, Transform::IDENTITY);
    assert!(canvas.viewport().is_exporting());

    canvas.viewport_mut().fit_to_content();
    assert_eq!(canvas.view().transform, Transform::IDENTITY);

    canvas.set_flags(CanvasFlags::empty());
    assert_eq!(canvas.view().transform, fitted);
}

#[test]
fn test_export_capture_uses_identity_coordinates() {
    let scene = Scene::default();
    let mut canvas = mounted();
    canvas.set_flags(CanvasFlags::EXPORT);

    let list = canvas.render(&scene);
    match list.first() {
        Some(map_canvas::render::DrawCommand::Rect { pos, size, .. }) => {
            assert_eq!(*pos, Vec2::ZERO);
            assert_eq!(*size, Vec2::splat(coords::LOGICAL_EXTENT));
        }
        other => panic!("Expected background rect, got {other:?}"),
    }
}

#[test]
fn test_ensure_fitted_runs_once_per_mount() {
    let mut canvas = mounted();
    let viewport = canvas.viewport_mut();
    viewport.apply_gesture(Gesture::Zoom {
        factor: 2.0,
        focus: VIEWPORT * 0.5,
    });
    viewport.apply_gesture(Gesture::Pan {
        delta: Vec2::new(30.0, 0.0),
    });
    let panned = canvas.view().transform;

    canvas.update_viewport_size(VIEWPORT);
    assert_eq!(canvas.view().transform, panned);

    canvas.teardown();
    canvas.mount(VIEWPORT, 1.0);
    assert_ne!(canvas.view().transform, panned);
}

#[test]
fn test_screen_to_logical_with_surface_scale() {
    let transform = Transform {
        pan: Vec2::new(40.0, 20.0),
        zoom: 2.0,
    };
    // A 2x backing surface reports doubled pointer coordinates.
    let logical = coords::screen_to_logical(Vec2::new(280.0, 240.0), &transform, 2.0);
    assert_eq!(logical, Vec2::new(50.0, 50.0));

    let p = Vec2::new(37.25, 81.5);
    let back = coords::to_normalized(coords::to_render(p));
    assert!(back.distance(p) < 1e-4);
}
