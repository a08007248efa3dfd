use glam::{Vec2, Vec4};
use map_terrain::Landmass;

use crate::config::{CanvasConfig, CanvasStyle};
use crate::coords::LOGICAL_EXTENT;
use crate::interaction::{self, InteractionMode};
use crate::model::{Background, Entity, Scene, SelectionSet, Status, UserId, Visibility};
use crate::render::{DrawCommand, RenderList, TextAnchor};
use crate::view::View;

/// Gap between a marker and its label, in logical units.
const LABEL_GAP: f32 = 6.0;
/// Selection ring distance outside the marker, in logical units.
const SELECTION_RING_GAP: f32 = 4.0;
const SELECTION_RING_WIDTH: f32 = 2.0;

/// High-level renderer for the map canvas.
///
/// The `Painter` converts the scene (background, relationships, entities) and
/// the transient interaction state into a `RenderList` the host can draw.
/// Draw order is back to front:
/// - Background fill, then image or generated landmass
/// - Relationship curves
/// - Relationship preview while linking
/// - Entities (glow, marker, outline, selection ring, label)
pub struct Painter;

impl Painter {
    /// Generates the draw commands for one frame.
    ///
    /// # Arguments
    /// * `view` - The current viewport transform (pan/zoom).
    /// * `config` - Styling and hit-test tunables.
    /// * `scene` - Host-supplied entities, relationships and background.
    /// * `landmass` - Terrain for `Background::Generated`; skipped when `None`.
    /// * `viewer` - Current user, for the visibility rule.
    /// * `selection` - Entities to draw with a selection ring.
    /// * `mode` - Current interaction state (live drag positions, curve edits, link preview).
    pub fn draw_scene(
        view: &View,
        config: &CanvasConfig,
        scene: &Scene,
        landmass: Option<&Landmass>,
        viewer: Option<UserId>,
        selection: &SelectionSet,
        mode: &InteractionMode,
    ) -> RenderList {
        let mut draw_list = Vec::new();
        let style = &config.style;

        // 1. Background
        Self::draw_background(view, style, &scene.background, landmass, &mut draw_list);

        // 2. Relationships (behind entities)
        Self::draw_relationships(view, style, scene, viewer, mode, &mut draw_list);

        // 3. Preview curve while creating a relationship
        if let InteractionMode::CreatingRelationship(session) = mode {
            let start = view.logical_to_screen(session.origin);
            let end = view.logical_to_screen(session.pointer);
            draw_list.push(DrawCommand::QuadCurve {
                start,
                ctrl: (start + end) * 0.5,
                end,
                color: style.line.preview_color,
                width: style.line.width * view.transform.zoom,
                dashed: true,
            });
        }

        // 4. Entities
        for entity in &scene.entities {
            let visibility = entity.visibility(viewer);
            if !visibility.is_visible() {
                continue;
            }
            let position = view.logical_to_screen(mode.entity_position(entity));
            if entity.category.is_label_only() {
                Self::draw_region_label(view, style, entity, position, visibility, &mut draw_list);
            } else {
                Self::draw_marker(
                    view,
                    style,
                    entity,
                    position,
                    visibility,
                    selection.contains(entity.id),
                    &mut draw_list,
                );
            }
        }

        draw_list
    }

    fn draw_background(
        view: &View,
        style: &CanvasStyle,
        background: &Background,
        landmass: Option<&Landmass>,
        draw_list: &mut RenderList,
    ) {
        let origin = view.logical_to_screen(Vec2::ZERO);
        let size = Vec2::splat(LOGICAL_EXTENT * view.transform.zoom);

        draw_list.push(DrawCommand::Rect {
            pos: origin,
            size,
            color: style.background_color,
            stroke_width: 0.0,
            stroke_color: None,
        });

        match background {
            Background::Image { href, .. } => {
                draw_list.push(DrawCommand::Image {
                    href: href.clone(),
                    pos: origin,
                    size,
                });
            }
            Background::Generated => {
                let Some(landmass) = landmass else {
                    return;
                };
                let terrain = &style.terrain;
                let to_screen = |p: Vec2| view.logical_to_screen(p);
                let shapes = std::iter::once(&landmass.coastline).chain(&landmass.islands);
                for shape in shapes {
                    draw_list.push(DrawCommand::Path {
                        path: shape.to_path().map_points(to_screen),
                        fill: Some(terrain.land_color),
                        stroke: Some(terrain.coast_color),
                        stroke_width: terrain.coast_width * view.transform.zoom,
                        fill_rule: landmass.fill_rule(),
                    });
                }
            }
        }
    }

    fn draw_relationships(
        view: &View,
        style: &CanvasStyle,
        scene: &Scene,
        viewer: Option<UserId>,
        mode: &InteractionMode,
        draw_list: &mut RenderList,
    ) {
        for relationship in &scene.relationships {
            let visibility = relationship.visibility(viewer);
            if !visibility.is_visible() {
                continue;
            }
            let Some((start, ctrl, end)) = interaction::curve_geometry(scene, relationship, mode)
            else {
                tracing::debug!(
                    relationship = %relationship.id,
                    from = %relationship.from,
                    to = %relationship.to,
                    "Skipping relationship with a missing endpoint"
                );
                continue;
            };

            let opacity = match visibility {
                Visibility::Faded => style.line.opacity * style.pending_opacity,
                _ => style.line.opacity,
            };
            draw_list.push(DrawCommand::QuadCurve {
                start: view.logical_to_screen(start),
                ctrl: view.logical_to_screen(ctrl),
                end: view.logical_to_screen(end),
                color: with_alpha(style.line.color, opacity),
                width: style.line.width * view.transform.zoom,
                dashed: false,
            });
        }
    }

    fn draw_marker(
        view: &View,
        style: &CanvasStyle,
        entity: &Entity,
        center: Vec2,
        visibility: Visibility,
        selected: bool,
        draw_list: &mut RenderList,
    ) {
        let zoom = view.transform.zoom;
        let marker = &style.marker;
        let fade = match visibility {
            Visibility::Faded => style.pending_opacity,
            _ => 1.0,
        };
        let color = style.category_color(entity.category);
        let radius = marker.radius * style.marker_scale * zoom;

        // Glow
        draw_list.push(DrawCommand::Circle {
            center,
            radius: radius * marker.glow_factor,
            fill: Some(with_alpha(color, marker.glow_opacity * fade)),
            stroke: None,
            stroke_width: 0.0,
        });

        // Marker with outline; pending entities get the thicker outline
        let outline_width = match entity.status {
            Status::Pending => marker.pending_outline_width,
            Status::Approved => marker.outline_width,
        };
        draw_list.push(DrawCommand::Circle {
            center,
            radius,
            fill: Some(with_alpha(color, fade)),
            stroke: Some(with_alpha(marker.outline_color, fade)),
            stroke_width: outline_width * zoom,
        });

        if selected {
            draw_list.push(DrawCommand::Circle {
                center,
                radius: radius + SELECTION_RING_GAP * zoom,
                fill: None,
                stroke: Some(style.selection_color),
                stroke_width: SELECTION_RING_WIDTH * zoom,
            });
        }

        let size = marker.label_size * style.label_scale * zoom;
        draw_list.push(DrawCommand::Text {
            pos: center + Vec2::new(0.0, radius + LABEL_GAP * zoom + size),
            text: entity.title.clone(),
            color: with_alpha(style.text_color, fade),
            size,
            font: None,
            anchor: TextAnchor::Middle,
        });
    }

    fn draw_region_label(
        view: &View,
        style: &CanvasStyle,
        entity: &Entity,
        center: Vec2,
        visibility: Visibility,
        draw_list: &mut RenderList,
    ) {
        let fade = match visibility {
            Visibility::Faded => style.pending_opacity,
            _ => 1.0,
        };
        let size = style.marker.region_label_size * style.label_scale * view.transform.zoom;
        // Baseline sits half a line below the center so the text is centered.
        draw_list.push(DrawCommand::Text {
            pos: center + Vec2::new(0.0, size * 0.5),
            text: entity.title.clone(),
            color: with_alpha(style.category_color(entity.category), fade),
            size,
            font: style.region_font.clone(),
            anchor: TextAnchor::Middle,
        });
    }
}

fn with_alpha(color: Vec4, factor: f32) -> Vec4 {
    Vec4::new(color.x, color.y, color.z, color.w * factor)
}
