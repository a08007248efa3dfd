use glam::Vec2;
use map_canvas::input::InputEvent;
use map_canvas::model::{Background, CanvasFlags, Entity, Relationship, Scene, Uuid};
use map_canvas::render::DrawCommand;
use map_canvas::{Canvas, CanvasConfig, Category, Status};

fn entity(x: f32, y: f32, category: Category, status: Status, owner: Uuid) -> Entity {
    Entity {
        id: Uuid::new_v4(),
        category,
        title: format!("{category:?}"),
        position: Vec2::new(x, y),
        status,
        owner,
    }
}

fn image_scene(entities: Vec<Entity>, relationships: Vec<Relationship>) -> Scene {
    Scene {
        map_id: "render".to_string(),
        entities,
        relationships,
        background: Background::Image {
            href: "map.png".to_string(),
            size: Vec2::new(1600.0, 1200.0),
        },
    }
}

fn link(from: &Entity, to: &Entity, status: Status, control: Option<Vec2>) -> Relationship {
    Relationship {
        id: Uuid::new_v4(),
        from: from.id,
        to: to.id,
        status,
        control,
        owner: from.owner,
    }
}

fn circles_at(list: &[DrawCommand], at: Vec2) -> Vec<&DrawCommand> {
    list.iter()
        .filter(|cmd| {
            matches!(cmd, DrawCommand::Circle { center, .. } if center.distance(at) < 1e-3)
        })
        .collect()
}

fn curves(list: &[DrawCommand]) -> Vec<&DrawCommand> {
    list.iter()
        .filter(|cmd| matches!(cmd, DrawCommand::QuadCurve { .. }))
        .collect()
}

#[test]
fn test_background_comes_first() {
    let owner = Uuid::new_v4();
    let scene = image_scene(
        vec![entity(10.0, 10.0, Category::Event, Status::Approved, owner)],
        vec![],
    );
    let mut canvas = Canvas::default();
    let list = canvas.render(&scene);

    match &list[..2] {
        [DrawCommand::Rect { pos, size, .. }, DrawCommand::Image { href, .. }] => {
            assert_eq!(*pos, Vec2::ZERO);
            assert_eq!(*size, Vec2::splat(1000.0));
            assert_eq!(href, "map.png");
        }
        other => panic!("Unexpected background commands: {other:?}"),
    }
}

#[test]
fn test_pending_entity_visibility() {
    let owner = Uuid::new_v4();
    let approved = entity(10.0, 10.0, Category::Person, Status::Approved, Uuid::new_v4());
    let pending = entity(50.0, 50.0, Category::Person, Status::Pending, owner);
    let scene = image_scene(vec![approved, pending], vec![]);
    let mut canvas = Canvas::default();

    // Anonymous viewer: only the approved entity.
    let list = canvas.render(&scene);
    assert_eq!(circles_at(&list, Vec2::new(100.0, 100.0)).len(), 2);
    assert!(circles_at(&list, Vec2::new(500.0, 500.0)).is_empty());

    // Owner sees the pending entity, faded, with the thicker outline.
    canvas.set_viewer(Some(owner));
    let list = canvas.render(&scene);
    let style = &canvas.config().style;
    let marker = circles_at(&list, Vec2::new(500.0, 500.0))
        .into_iter()
        .find(|cmd| matches!(cmd, DrawCommand::Circle { stroke: Some(_), .. }))
        .cloned();
    match marker {
        Some(DrawCommand::Circle {
            fill: Some(fill),
            stroke_width,
            ..
        }) => {
            assert!((fill.w - style.pending_opacity).abs() < 1e-6);
            assert_eq!(stroke_width, style.marker.pending_outline_width);
        }
        other => panic!("Expected pending marker, got {other:?}"),
    }
}

#[test]
fn test_relationship_opacity_follows_status() {
    let owner = Uuid::new_v4();
    let a = entity(10.0, 10.0, Category::Event, Status::Approved, owner);
    let b = entity(50.0, 10.0, Category::Event, Status::Approved, owner);
    let approved = link(&a, &b, Status::Approved, None);
    let pending = link(&b, &a, Status::Pending, Some(Vec2::new(30.0, 80.0)));
    let scene = image_scene(vec![a, b], vec![approved, pending]);
    let mut canvas = Canvas::default();

    assert_eq!(curves(&canvas.render(&scene)).len(), 1);

    canvas.set_viewer(Some(owner));
    let list = canvas.render(&scene);
    let alphas: Vec<f32> = curves(&list)
        .iter()
        .filter_map(|cmd| match cmd {
            DrawCommand::QuadCurve { color, .. } => Some(color.w),
            _ => None,
        })
        .collect();
    let style = &canvas.config().style;
    assert_eq!(
        alphas,
        vec![style.line.opacity, style.line.opacity * style.pending_opacity]
    );
}

#[test]
fn test_pending_relationship_never_outshines_approved() {
    let owner = Uuid::new_v4();
    let a = entity(10.0, 10.0, Category::Event, Status::Approved, owner);
    let b = entity(50.0, 10.0, Category::Event, Status::Approved, owner);
    let approved = link(&a, &b, Status::Approved, None);
    let pending = link(&b, &a, Status::Pending, Some(Vec2::new(30.0, 80.0)));
    let scene = image_scene(vec![a, b], vec![approved, pending]);

    let mut config = CanvasConfig::default();
    config.style.line.opacity = 0.3;
    let mut canvas = Canvas::default();
    canvas.set_config(config).unwrap();
    canvas.set_viewer(Some(owner));

    let list = canvas.render(&scene);
    let alphas: Vec<f32> = curves(&list)
        .iter()
        .filter_map(|cmd| match cmd {
            DrawCommand::QuadCurve { color, .. } => Some(color.w),
            _ => None,
        })
        .collect();
    assert_eq!(alphas.len(), 2);
    assert!((alphas[0] - 0.3).abs() < 1e-6);
    assert!((alphas[1] - 0.15).abs() < 1e-6);
    assert!(alphas[1] < alphas[0]);
}

#[test]
fn test_default_and_explicit_control_points() {
    let owner = Uuid::new_v4();
    let a = entity(10.0, 10.0, Category::Event, Status::Approved, owner);
    let b = entity(50.0, 10.0, Category::Event, Status::Approved, owner);
    let c = entity(10.0, 50.0, Category::Event, Status::Approved, owner);
    let derived = link(&a, &b, Status::Approved, None);
    let explicit = link(&a, &c, Status::Approved, Some(Vec2::new(40.0, 40.0)));
    let scene = image_scene(vec![a, b, c], vec![derived, explicit]);
    let mut canvas = Canvas::default();

    let list = canvas.render(&scene);
    let ctrls: Vec<Vec2> = curves(&list)
        .iter()
        .filter_map(|cmd| match cmd {
            DrawCommand::QuadCurve { ctrl, .. } => Some(*ctrl),
            _ => None,
        })
        .collect();
    // (100,100)→(500,100): midpoint (300,100) offset by 0.15·(0,400).
    assert!(ctrls[0].distance(Vec2::new(300.0, 160.0)) < 1e-3);
    assert!(ctrls[1].distance(Vec2::new(400.0, 400.0)) < 1e-3);
}

#[test]
fn test_missing_endpoint_is_skipped() {
    let owner = Uuid::new_v4();
    let a = entity(10.0, 10.0, Category::Event, Status::Approved, owner);
    let b = entity(50.0, 10.0, Category::Event, Status::Approved, owner);
    let mut dangling = link(&a, &b, Status::Approved, None);
    dangling.to = Uuid::new_v4();
    let good = link(&a, &b, Status::Approved, None);
    let scene = image_scene(vec![a, b], vec![dangling, good]);

    let mut canvas = Canvas::default();
    let list = canvas.render(&scene);
    assert_eq!(curves(&list).len(), 1);
    assert_eq!(circles_at(&list, Vec2::new(500.0, 100.0)).len(), 2);
}

#[test]
fn test_region_draws_text_only() {
    let mut canvas = Canvas::default();
    canvas.set_config(CanvasConfig {
        style: map_canvas::CanvasStyle {
            region_font: Some("Cinzel".to_string()),
            ..Default::default()
        },
        ..Default::default()
    })
    .unwrap();

    let region = entity(30.0, 30.0, Category::Region, Status::Approved, Uuid::new_v4());
    let scene = image_scene(vec![region], vec![]);
    let list = canvas.render(&scene);

    assert!(!list.iter().any(|cmd| matches!(cmd, DrawCommand::Circle { .. })));
    let texts: Vec<_> = list
        .iter()
        .filter(|cmd| matches!(cmd, DrawCommand::Text { .. }))
        .collect();
    assert_eq!(texts.len(), 1);
    match texts[0] {
        DrawCommand::Text { text, font, .. } => {
            assert_eq!(text, "Region");
            assert_eq!(font.as_deref(), Some("Cinzel"));
        }
        _ => unreachable!(),
    }
}

#[test]
fn test_selected_entity_gets_ring() {
    let e = entity(10.0, 10.0, Category::Space, Status::Approved, Uuid::new_v4());
    let id = e.id;
    let scene = image_scene(vec![e], vec![]);
    let mut canvas = Canvas::default();

    assert_eq!(circles_at(&canvas.render(&scene), Vec2::new(100.0, 100.0)).len(), 2);
    canvas.set_selection([id]);
    assert_eq!(circles_at(&canvas.render(&scene), Vec2::new(100.0, 100.0)).len(), 3);
}

#[test]
fn test_live_drag_and_link_preview() {
    let owner = Uuid::new_v4();
    let a = entity(10.0, 10.0, Category::Event, Status::Approved, owner);
    let b = entity(50.0, 10.0, Category::Event, Status::Approved, owner);
    let scene = image_scene(vec![a, b], vec![]);
    let mut canvas = Canvas::default();
    canvas.set_flags(CanvasFlags::EDITABLE);

    canvas.handle_event(&scene, &InputEvent::down(Vec2::new(100.0, 100.0)));
    canvas.handle_event(&scene, &InputEvent::moved(Vec2::new(150.0, 120.0)));
    let list = canvas.render(&scene);
    assert_eq!(circles_at(&list, Vec2::new(150.0, 120.0)).len(), 2);
    assert!(circles_at(&list, Vec2::new(100.0, 100.0)).is_empty());
    canvas.cancel_gesture();

    let alt = map_canvas::input::ModifiersState {
        alt: true,
        ..Default::default()
    };
    canvas.handle_event(&scene, &InputEvent::down_with(Vec2::new(500.0, 100.0), alt));
    canvas.handle_event(&scene, &InputEvent::moved(Vec2::new(700.0, 300.0)));
    let list = canvas.render(&scene);
    let preview = list
        .iter()
        .find(|cmd| matches!(cmd, DrawCommand::QuadCurve { dashed: true, .. }));
    match preview {
        Some(DrawCommand::QuadCurve { start, end, .. }) => {
            assert_eq!(*start, Vec2::new(500.0, 100.0));
            assert_eq!(*end, Vec2::new(700.0, 300.0));
        }
        other => panic!("Expected preview curve, got {other:?}"),
    }
}

#[test]
fn test_generated_background_draws_landmass() {
    let scene = Scene {
        map_id: "torontopia".to_string(),
        ..Default::default()
    };
    let mut canvas = Canvas::default();
    let list = canvas.render(&scene);

    let paths = list
        .iter()
        .filter(|cmd| matches!(cmd, DrawCommand::Path { .. }))
        .count();
    let landmass = map_terrain::Landmass::generate("torontopia", &canvas.config().landmass);
    assert_eq!(paths, 1 + landmass.islands.len());

    // Rendering twice is idempotent.
    assert_eq!(canvas.render(&scene), list);
}

#[test]
fn test_export_size() {
    let image = Background::Image {
        href: "a.png".to_string(),
        size: Vec2::new(1600.0, 1200.0),
    };
    assert_eq!(Canvas::export_size(&image), Vec2::new(1600.0, 1200.0));
    assert_eq!(
        Canvas::export_size(&Background::Generated),
        Vec2::splat(1000.0)
    );
}
