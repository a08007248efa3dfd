use std::mem;

use glam::Vec2;

use crate::config::CanvasConfig;
use crate::coords;
use crate::input::{InputEvent, Key, ModifiersState, PointerButton};
use crate::math::{self, Rect};
use crate::model::{
    CanvasFlags, Entity, EntityId, Relationship, RelationshipId, Scene, SelectionSet, UserId,
};
use crate::viewport::{Gesture, ViewportController};

/// Extra reach around a marker that still counts as a hit, in logical units.
const MARKER_HIT_SLOP: f32 = 4.0;
/// Rough glyph width as a fraction of font size, for label hit boxes.
const GLYPH_WIDTH_RATIO: f32 = 0.6;

/// Intents emitted by the Canvas to the host application.
///
/// None of these perform I/O; the host decides whether to persist them and
/// then supplies an updated [`Scene`]. Coordinates are normalized and clamped
/// to `0..=100`.
#[derive(Clone, Debug, PartialEq)]
pub enum Intent {
    MoveEntity {
        id: EntityId,
        x: f32,
        y: f32,
    },
    /// A bulk drag finished; one entry per dragged entity.
    MoveEntities(Vec<EntityMove>),
    Select {
        entity: EntityId,
        /// Pointer position of the click, for anchoring a detail popover.
        anchor: Vec2,
        modifiers: ModifiersState,
    },
    ClearSelection,
    PlaceEntity {
        x: f32,
        y: f32,
        /// Screen position of the originating pointer, for visual effects.
        pointer: Vec2,
    },
    CreateRelationship {
        from: EntityId,
        to: EntityId,
    },
    SetRelationshipCurve {
        id: RelationshipId,
        cx: f32,
        cy: f32,
    },
    OpenRelationshipDetail {
        relationship: RelationshipId,
    },
    /// The visual state has changed, requiring a repaint.
    RepaintNeeded,
}

/// New normalized position of one entity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EntityMove {
    pub id: EntityId,
    pub x: f32,
    pub y: f32,
}

/// Which entities a drag moves. Decided once when the session starts.
#[derive(Clone, Debug, PartialEq)]
pub enum DragKind {
    Single {
        id: EntityId,
        /// Normalized position when the drag started.
        origin: Vec2,
    },
    /// The pressed entity was part of a multi-selection.
    Bulk { origins: Vec<(EntityId, Vec2)> },
}

/// Transient state of an entity drag.
#[derive(Clone, Debug, PartialEq)]
pub struct DragSession {
    pub kind: DragKind,
    /// The entity under the pointer at press time.
    pub pressed: EntityId,
    /// Pointer position at press time (Logical Space).
    pub start_logical: Vec2,
    /// Latest pointer position (Logical Space, unclamped).
    pub current_logical: Vec2,
    /// `false` when editing is not permitted; the gesture can only end as a click.
    pub movable: bool,
}

impl DragSession {
    fn begin(
        entity: &Entity,
        pointer: Vec2,
        scene: &Scene,
        selection: &SelectionSet,
        movable: bool,
    ) -> Self {
        let kind = if selection.len() >= 2 && selection.contains(entity.id) {
            DragKind::Bulk {
                origins: selection
                    .iter()
                    .filter_map(|id| scene.entity(id))
                    .map(|e| (e.id, e.position))
                    .collect(),
            }
        } else {
            DragKind::Single {
                id: entity.id,
                origin: entity.position,
            }
        };
        Self {
            kind,
            pressed: entity.id,
            start_logical: pointer,
            current_logical: pointer,
            movable,
        }
    }

    /// Squared pointer travel since the press, in logical units.
    pub fn displacement_sq(&self) -> f32 {
        (self.current_logical - self.start_logical).length_squared()
    }

    pub fn delta(&self) -> Vec2 {
        if self.movable {
            self.current_logical - self.start_logical
        } else {
            Vec2::ZERO
        }
    }

    fn shifted(&self, origin: Vec2) -> Vec2 {
        coords::clamp_normalized(coords::to_normalized(
            coords::to_render(origin) + self.delta(),
        ))
    }

    /// Live normalized position of `id`, if this session moves it.
    pub fn position_of(&self, id: EntityId) -> Option<Vec2> {
        match &self.kind {
            DragKind::Single { id: moved, origin } if *moved == id => Some(self.shifted(*origin)),
            DragKind::Single { .. } => None,
            DragKind::Bulk { origins } => origins
                .iter()
                .find(|(moved, _)| *moved == id)
                .map(|(_, origin)| self.shifted(*origin)),
        }
    }

    /// Final clamped positions of every moved entity.
    pub fn moves(&self) -> Vec<EntityMove> {
        let origins: Vec<(EntityId, Vec2)> = match &self.kind {
            DragKind::Single { id, origin } => vec![(*id, *origin)],
            DragKind::Bulk { origins } => origins.clone(),
        };
        origins
            .into_iter()
            .map(|(id, origin)| {
                let p = self.shifted(origin);
                EntityMove { id, x: p.x, y: p.y }
            })
            .collect()
    }
}

/// Transient state while dragging out a new relationship.
#[derive(Clone, Debug, PartialEq)]
pub struct LinkSession {
    pub source: EntityId,
    /// Source entity position (Logical Space).
    pub origin: Vec2,
    /// Preview endpoint, clamped to the logical area.
    pub pointer: Vec2,
}

/// Transient state while reshaping a relationship curve.
#[derive(Clone, Debug, PartialEq)]
pub struct CurveSession {
    pub relationship: RelationshipId,
    pub start_logical: Vec2,
    /// Live control point (Logical Space).
    pub control: Vec2,
    pub editable: bool,
}

/// Transient state of a background drag.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PanSession {
    /// Layout-pixel position at press time.
    pub start: Vec2,
    /// Layout-pixel position at the previous move.
    pub last: Vec2,
}

/// The current state of user interaction.
///
/// Every gesture session lives inside this enum and nowhere else; ending a
/// gesture replaces the mode with `Idle`, dropping the session.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum InteractionMode {
    /// No active interaction.
    #[default]
    Idle,
    /// Background drag moving the viewport.
    Panning(PanSession),
    /// Background press in placement mode; places an entity on release.
    Placing {
        /// Raw pointer position at press time.
        screen: Vec2,
        logical: Vec2,
    },
    /// Entity press, single or bulk.
    Dragging(DragSession),
    CreatingRelationship(LinkSession),
    EditingCurve(CurveSession),
}

/// Flat name of the current interaction state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Panning,
    Placing,
    DraggingSingle,
    DraggingBulk,
    CreatingRelationship,
    EditingCurve,
}

impl InteractionMode {
    pub fn phase(&self) -> Phase {
        match self {
            InteractionMode::Idle => Phase::Idle,
            InteractionMode::Panning(_) => Phase::Panning,
            InteractionMode::Placing { .. } => Phase::Placing,
            InteractionMode::Dragging(DragSession {
                kind: DragKind::Single { .. },
                ..
            }) => Phase::DraggingSingle,
            InteractionMode::Dragging(DragSession {
                kind: DragKind::Bulk { .. },
                ..
            }) => Phase::DraggingBulk,
            InteractionMode::CreatingRelationship(_) => Phase::CreatingRelationship,
            InteractionMode::EditingCurve(_) => Phase::EditingCurve,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, InteractionMode::Idle)
    }

    /// Live normalized position of an entity being dragged.
    pub fn live_position(&self, id: EntityId) -> Option<Vec2> {
        match self {
            InteractionMode::Dragging(session) => session.position_of(id),
            _ => None,
        }
    }

    /// Logical position of an entity, honoring an in-flight drag.
    pub fn entity_position(&self, entity: &Entity) -> Vec2 {
        self.live_position(entity.id)
            .map(coords::to_render)
            .unwrap_or_else(|| entity.render_position())
    }

    /// Live control point (Logical Space) of a relationship being edited.
    pub fn live_control(&self, id: RelationshipId) -> Option<Vec2> {
        match self {
            InteractionMode::EditingCurve(session) if session.relationship == id => {
                Some(session.control)
            }
            _ => None,
        }
    }
}

/// Read-only inputs every handler needs.
pub struct InteractionContext<'a> {
    pub scene: &'a Scene,
    pub config: &'a CanvasConfig,
    pub viewer: Option<UserId>,
    pub flags: CanvasFlags,
    /// Backing-to-layout pixel ratio of the surface.
    pub surface_scale: f32,
}

impl InteractionContext<'_> {
    fn layout(&self, screen: Vec2) -> Vec2 {
        if self.surface_scale > 0.0 {
            screen / self.surface_scale
        } else {
            screen
        }
    }

    fn logical(&self, viewport: &ViewportController, screen: Vec2) -> Vec2 {
        coords::screen_to_logical(screen, &viewport.transform(), self.surface_scale)
    }

    fn editable(&self) -> bool {
        self.flags.contains(CanvasFlags::EDITABLE)
    }

    /// Converts a layout-pixel distance into logical units at the current zoom.
    fn screen_reach(&self, viewport: &ViewportController, pixels: f32) -> f32 {
        pixels / viewport.transform().zoom
    }

    fn marker_radius(&self) -> f32 {
        self.config.style.marker.radius * self.config.style.marker_scale
    }
}

/// Start, control point and end of a relationship curve (Logical Space).
///
/// `None` when either endpoint is missing from the scene.
pub fn curve_geometry(
    scene: &Scene,
    relationship: &Relationship,
    mode: &InteractionMode,
) -> Option<(Vec2, Vec2, Vec2)> {
    let from = scene.entity(relationship.from)?;
    let to = scene.entity(relationship.to)?;
    let start = mode.entity_position(from);
    let end = mode.entity_position(to);
    let ctrl = mode
        .live_control(relationship.id)
        .or_else(|| relationship.control.map(coords::to_render))
        .unwrap_or_else(|| math::default_control_point(start, end));
    Some((start, ctrl, end))
}

/// Handles one input event and updates the interaction/view/selection state.
///
/// This function acts as the central state machine for the Canvas. All state
/// it touches is passed in by exclusive reference, so a single call either
/// applies a whole transition or none of it.
pub fn handle_event(
    mode: &mut InteractionMode,
    viewport: &mut ViewportController,
    selection: &mut SelectionSet,
    ctx: &InteractionContext,
    event: &InputEvent,
    intents: &mut Vec<Intent>,
) {
    if ctx.flags.contains(CanvasFlags::EXPORT) {
        return;
    }

    match event {
        InputEvent::Wheel { pos, delta } => {
            let factor = (delta * ctx.config.zoom_speed).exp();
            let focus = ctx.layout(*pos);
            if viewport.apply_gesture(Gesture::Zoom { factor, focus }) {
                intents.push(Intent::RepaintNeeded);
            }
        }
        InputEvent::PointerDown {
            pos,
            button,
            modifiers,
        } => {
            if !mode.is_idle() {
                tracing::trace!(phase = ?mode.phase(), "Ignoring press during an active gesture");
                return;
            }
            *mode = begin_gesture(viewport, selection, ctx, *pos, *button, *modifiers);
            if !mode.is_idle() {
                tracing::debug!(phase = ?mode.phase(), "Gesture started");
                intents.push(Intent::RepaintNeeded);
            }
        }
        InputEvent::PointerMove { pos, .. } => {
            update_gesture(mode, viewport, ctx, *pos, intents);
        }
        InputEvent::PointerUp { pos, modifiers } => {
            let finished = mem::take(mode);
            finish_gesture(finished, viewport, selection, ctx, *pos, *modifiers, intents);
        }
        InputEvent::PointerCancel => {
            cancel_gesture(mode, intents);
        }
        InputEvent::KeyDown { key: Key::Escape } => {
            if matches!(mode, InteractionMode::CreatingRelationship(_)) {
                cancel_gesture(mode, intents);
            }
        }
    }
}

/// Drops the active gesture without emitting anything but a repaint.
///
/// Returns `true` if a gesture was active.
pub fn cancel_gesture(mode: &mut InteractionMode, intents: &mut Vec<Intent>) -> bool {
    let previous = mem::take(mode);
    if previous.is_idle() {
        return false;
    }
    tracing::debug!(phase = ?previous.phase(), "Gesture cancelled");
    intents.push(Intent::RepaintNeeded);
    true
}

/// Decides which gesture a press starts.
///
/// Priority: entities (topmost first), then relationship curves, then the background.
fn begin_gesture(
    viewport: &ViewportController,
    selection: &SelectionSet,
    ctx: &InteractionContext,
    pos: Vec2,
    button: PointerButton,
    modifiers: ModifiersState,
) -> InteractionMode {
    let layout = ctx.layout(pos);
    match button {
        PointerButton::Secondary => return InteractionMode::Idle,
        PointerButton::Middle => {
            return InteractionMode::Panning(PanSession {
                start: layout,
                last: layout,
            });
        }
        PointerButton::Primary => {}
    }

    let logical = ctx.logical(viewport, pos);

    if let Some(entity) = hit_entity(ctx, logical) {
        if ctx.editable() && modifiers.link() && !entity.category.is_label_only() {
            return InteractionMode::CreatingRelationship(LinkSession {
                source: entity.id,
                origin: entity.render_position(),
                pointer: coords::clamp_logical(logical),
            });
        }
        return InteractionMode::Dragging(DragSession::begin(
            entity,
            logical,
            ctx.scene,
            selection,
            ctx.editable(),
        ));
    }

    if let Some((relationship, ctrl)) = hit_relationship(ctx, viewport, logical) {
        return InteractionMode::EditingCurve(CurveSession {
            relationship: relationship.id,
            start_logical: logical,
            control: ctrl,
            editable: ctx.editable(),
        });
    }

    if ctx.flags.contains(CanvasFlags::PLACEMENT) {
        return InteractionMode::Placing {
            screen: pos,
            logical,
        };
    }

    InteractionMode::Panning(PanSession {
        start: layout,
        last: layout,
    })
}

fn update_gesture(
    mode: &mut InteractionMode,
    viewport: &mut ViewportController,
    ctx: &InteractionContext,
    pos: Vec2,
    intents: &mut Vec<Intent>,
) {
    match mode {
        InteractionMode::Idle | InteractionMode::Placing { .. } => {}
        InteractionMode::Panning(session) => {
            let layout = ctx.layout(pos);
            let delta = layout - session.last;
            session.last = layout;
            if viewport.apply_gesture(Gesture::Pan { delta }) {
                intents.push(Intent::RepaintNeeded);
            }
        }
        InteractionMode::Dragging(session) => {
            session.current_logical = ctx.logical(viewport, pos);
            if session.movable {
                intents.push(Intent::RepaintNeeded);
            }
        }
        InteractionMode::CreatingRelationship(session) => {
            session.pointer = coords::clamp_logical(ctx.logical(viewport, pos));
            intents.push(Intent::RepaintNeeded);
        }
        InteractionMode::EditingCurve(session) => {
            if session.editable {
                session.control = coords::clamp_logical(ctx.logical(viewport, pos));
                intents.push(Intent::RepaintNeeded);
            }
        }
    }
}

fn finish_gesture(
    finished: InteractionMode,
    viewport: &ViewportController,
    selection: &mut SelectionSet,
    ctx: &InteractionContext,
    pos: Vec2,
    modifiers: ModifiersState,
    intents: &mut Vec<Intent>,
) {
    let threshold = ctx.config.movement_threshold_sq;
    let logical = ctx.logical(viewport, pos);

    match finished {
        InteractionMode::Idle => return,
        InteractionMode::Panning(session) => {
            let travel = (ctx.layout(pos) - session.start) / viewport.transform().zoom;
            if travel.length_squared() < threshold && !selection.is_empty() {
                selection.clear();
                emit(intents, Intent::ClearSelection);
            }
        }
        InteractionMode::Placing { screen, logical: pressed } => {
            if coords::logical_bounds().contains(pressed) {
                let p = coords::clamp_normalized(coords::to_normalized(pressed));
                emit(
                    intents,
                    Intent::PlaceEntity {
                        x: p.x,
                        y: p.y,
                        pointer: screen,
                    },
                );
            } else {
                tracing::debug!(?pressed, "Placement outside the map ignored");
            }
        }
        InteractionMode::Dragging(mut session) => {
            session.current_logical = logical;
            if !session.movable || session.displacement_sq() < threshold {
                click_entity(selection, session.pressed, pos, modifiers, intents);
            } else {
                match session.kind {
                    DragKind::Single { .. } => {
                        for m in session.moves() {
                            emit(
                                intents,
                                Intent::MoveEntity {
                                    id: m.id,
                                    x: m.x,
                                    y: m.y,
                                },
                            );
                        }
                    }
                    DragKind::Bulk { .. } => {
                        emit(intents, Intent::MoveEntities(session.moves()));
                    }
                }
            }
        }
        InteractionMode::CreatingRelationship(session) => {
            match nearest_link_target(ctx, viewport, session.source, logical) {
                Some(target) => emit(
                    intents,
                    Intent::CreateRelationship {
                        from: session.source,
                        to: target,
                    },
                ),
                None => {
                    tracing::debug!(
                        source = %session.source,
                        "No relationship target under pointer"
                    );
                }
            }
        }
        InteractionMode::EditingCurve(session) => {
            let travel = (logical - session.start_logical).length_squared();
            if !session.editable || travel < threshold {
                emit(
                    intents,
                    Intent::OpenRelationshipDetail {
                        relationship: session.relationship,
                    },
                );
            } else {
                let c = coords::clamp_normalized(coords::to_normalized(logical));
                emit(
                    intents,
                    Intent::SetRelationshipCurve {
                        id: session.relationship,
                        cx: c.x,
                        cy: c.y,
                    },
                );
            }
        }
    }
    intents.push(Intent::RepaintNeeded);
}

fn emit(intents: &mut Vec<Intent>, intent: Intent) {
    tracing::debug!(?intent, "Emitting intent");
    intents.push(intent);
}

/// Applies click semantics to the selection and reports the result.
///
/// With the multi-select modifier the entity is toggled. Without it the
/// selection becomes just this entity, or empties if it already was.
fn click_entity(
    selection: &mut SelectionSet,
    id: EntityId,
    anchor: Vec2,
    modifiers: ModifiersState,
    intents: &mut Vec<Intent>,
) {
    if modifiers.multi_select() {
        selection.toggle(id);
    } else if selection.is_sole(id) {
        selection.clear();
    } else {
        selection.replace(id);
    }

    if selection.contains(id) {
        emit(
            intents,
            Intent::Select {
                entity: id,
                anchor,
                modifiers,
            },
        );
    } else if selection.is_empty() {
        emit(intents, Intent::ClearSelection);
    }
}

/// Hit box of a label-only entity centered on its position.
pub(crate) fn label_box(entity: &Entity, config: &CanvasConfig) -> Rect {
    let size = config.style.marker.region_label_size * config.style.label_scale;
    let width = entity.title.chars().count().max(1) as f32 * size * GLYPH_WIDTH_RATIO;
    Rect::from_center(entity.render_position(), Vec2::new(width, size) * 0.5)
}

/// Topmost visible entity under `logical`.
fn hit_entity<'a>(ctx: &InteractionContext<'a>, logical: Vec2) -> Option<&'a Entity> {
    let radius = ctx.marker_radius() + MARKER_HIT_SLOP;
    ctx.scene
        .entities
        .iter()
        .rev()
        .filter(|e| e.visibility(ctx.viewer).is_visible())
        .find(|e| {
            if e.category.is_label_only() {
                label_box(e, ctx.config).contains(logical)
            } else {
                e.render_position().distance(logical) <= radius
            }
        })
}

/// Nearest visible relationship whose widened hit stroke covers `logical`,
/// with its current control point.
///
/// The stroke width is in screen pixels, independent of zoom.
fn hit_relationship<'a>(
    ctx: &InteractionContext<'a>,
    viewport: &ViewportController,
    logical: Vec2,
) -> Option<(&'a Relationship, Vec2)> {
    let reach = ctx.screen_reach(viewport, ctx.config.curve_hit_width * 0.5);
    let idle = InteractionMode::Idle;
    ctx.scene
        .relationships
        .iter()
        .filter(|r| r.visibility(ctx.viewer).is_visible())
        .filter_map(|r| {
            let (start, ctrl, end) = curve_geometry(ctx.scene, r, &idle)?;
            let distance = math::distance_to_quad(logical, start, ctrl, end);
            (distance <= reach).then_some((r, ctrl, distance))
        })
        .min_by(|a, b| a.2.total_cmp(&b.2))
        .map(|(r, ctrl, _)| (r, ctrl))
}

/// Nearest eligible relationship target within the link radius.
///
/// Eligible: visible, not the source, not label-only. The radius is in
/// screen pixels, scaled by `marker_scale`.
fn nearest_link_target(
    ctx: &InteractionContext,
    viewport: &ViewportController,
    source: EntityId,
    logical: Vec2,
) -> Option<EntityId> {
    let radius = ctx.screen_reach(
        viewport,
        ctx.config.link_hit_radius * ctx.config.style.marker_scale,
    );
    ctx.scene
        .visible_entities(ctx.viewer)
        .filter(|e| e.id != source && !e.category.is_label_only())
        .map(|e| (e.id, e.render_position().distance(logical)))
        .filter(|(_, d)| *d <= radius)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(id, _)| id)
}
