use glam::Vec2;
use map_canvas::input::{InputEvent, ModifiersState};
use map_canvas::model::{Background, CanvasFlags, Entity, Relationship, Scene, Uuid};
use map_canvas::render::DrawCommand;
use map_canvas::{Canvas, CanvasConfig, Category, Intent, Status};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();
    println!("=== MapCanvas Headless Demo ===");

    // 1. Initialize Canvas
    let config = CanvasConfig::from_json(r#"{ "style": { "marker_scale": 1.25 } }"#)?;
    let mut canvas = Canvas::new(config);
    let me = Uuid::new_v4();
    canvas.set_viewer(Some(me));
    canvas.set_flags(CanvasFlags::EDITABLE);
    // Simulating a 1280x720 window
    canvas.mount(Vec2::new(1280.0, 720.0), 1.0);

    // 2. Build a scene the host would normally load from storage
    let harbour = Entity {
        id: Uuid::new_v4(),
        category: Category::Space,
        title: "Harbour Hall".into(),
        position: Vec2::new(30.0, 40.0),
        status: Status::Approved,
        owner: me,
    };
    let market = Entity {
        id: Uuid::new_v4(),
        category: Category::Event,
        title: "Night Market".into(),
        position: Vec2::new(60.0, 45.0),
        status: Status::Pending,
        owner: me,
    };
    let district = Entity {
        id: Uuid::new_v4(),
        category: Category::Region,
        title: "Old Town".into(),
        position: Vec2::new(45.0, 20.0),
        status: Status::Approved,
        owner: me,
    };
    let mut scene = Scene {
        map_id: "torontopia".into(),
        entities: vec![harbour.clone(), market.clone(), district],
        relationships: vec![Relationship {
            id: Uuid::new_v4(),
            from: harbour.id,
            to: market.id,
            status: Status::Approved,
            control: None,
            owner: me,
        }],
        background: Background::Generated,
    };

    let to_screen = |e: &Entity| canvas.view().logical_to_screen(e.render_position());
    let harbour_px = to_screen(&harbour);
    let market_px = to_screen(&market);

    // 3. Script a few gestures
    let alt = ModifiersState {
        alt: true,
        ..ModifiersState::NONE
    };
    let steps: Vec<(&str, Vec<InputEvent>)> = vec![
        (
            "Click Harbour Hall",
            vec![InputEvent::down(harbour_px), InputEvent::up(harbour_px)],
        ),
        (
            "Drag Harbour Hall",
            vec![
                InputEvent::down(harbour_px),
                InputEvent::moved(harbour_px + Vec2::new(20.0, 10.0)),
                InputEvent::up(harbour_px + Vec2::new(40.0, 20.0)),
            ],
        ),
        (
            "Alt-drag Night Market onto Harbour Hall",
            vec![
                InputEvent::down_with(market_px, alt),
                InputEvent::moved((market_px + harbour_px) * 0.5),
                InputEvent::up(harbour_px + Vec2::new(40.0, 20.0)),
            ],
        ),
        (
            "Zoom in at the centre",
            vec![InputEvent::Wheel {
                pos: Vec2::new(640.0, 360.0),
                delta: 150.0,
            }],
        ),
    ];

    for (label, events) in steps {
        println!("\n>> {label}");
        let (draw_list, intents) = canvas.update(&scene, &events);
        for intent in &intents {
            if *intent != Intent::RepaintNeeded {
                println!("  Intent: {intent:?}");
            }
            // Act as the host: persist moves so the next frame sees them.
            if let Intent::MoveEntity { id, x, y } = intent {
                if let Some(entity) = scene.entities.iter_mut().find(|e| e.id == *id) {
                    entity.position = Vec2::new(*x, *y);
                }
            }
        }
        summarize(&draw_list);
    }

    // 4. Export capture at the natural size
    canvas.set_flags(CanvasFlags::EDITABLE | CanvasFlags::EXPORT);
    let export = canvas.render(&scene);
    println!(
        "\nExport {}: {} commands",
        Canvas::export_size(&scene.background),
        export.len()
    );
    canvas.set_flags(CanvasFlags::EDITABLE);

    canvas.teardown();
    println!("\nDemo Complete.");
    Ok(())
}

fn summarize(draw_list: &[DrawCommand]) {
    let mut counts = [0usize; 6];
    for cmd in draw_list {
        let slot = match cmd {
            DrawCommand::Rect { .. } => 0,
            DrawCommand::Image { .. } => 1,
            DrawCommand::Path { .. } => 2,
            DrawCommand::Circle { .. } => 3,
            DrawCommand::QuadCurve { .. } => 4,
            DrawCommand::Text { .. } => 5,
        };
        counts[slot] += 1;
    }
    println!(
        "  Draw list: {} rects, {} images, {} paths, {} circles, {} curves, {} texts",
        counts[0], counts[1], counts[2], counts[3], counts[4], counts[5]
    );
}
