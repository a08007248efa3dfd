//! # MapCanvas
//!
//! `map_canvas` is a headless canvas for community maps: entities pinned on a
//! square map, curved relationships between them, and a procedurally generated
//! landmass behind everything. It owns only transient interaction state; the
//! host supplies a fresh [`Scene`] on every call and receives [`Intent`]s back.
//!
//! ## Core Architecture
//! - **Model (`src/model.rs`)**: host-owned scene records and the selection set.
//! - **Coords (`src/coords.rs`)**: normalized (0..100) and logical (0..1000) spaces.
//! - **Viewport (`src/viewport.rs`)**: pan/zoom with clamped zoom and translate extent.
//! - **Interaction (`src/interaction.rs`)**: the gesture state machine.
//! - **Render (`src/render.rs`)**: `DrawCommand`s for the host to draw.

pub mod config;
pub mod coords;
pub mod error;
pub mod input;
pub mod interaction;
pub mod math;
pub mod model;
pub mod painter;
pub mod render;
pub mod view;
pub mod viewport;

use glam::Vec2;
use map_terrain::LandmassCache;

use input::InputEvent;
use interaction::InteractionContext;
use model::{Background, CanvasFlags, EntityId, Scene, SelectionSet, UserId};
use render::RenderList;
use view::View;
use viewport::{Suspension, ViewportController};

// Re-exports for convenience
pub use config::{CanvasConfig, CanvasStyle};
pub use error::ConfigError;
pub use interaction::{EntityMove, Intent, InteractionMode, Phase};
pub use model::{Category, Entity, Relationship, Status};

/// The main entry point for the library.
///
/// The `Canvas` holds the viewport, the active gesture and the selection. It
/// is intended to be created once per mounted map and reused for every frame.
pub struct Canvas {
    config: CanvasConfig,
    viewport: ViewportController,
    interaction_mode: InteractionMode,
    selection: SelectionSet,
    flags: CanvasFlags,
    viewer: Option<UserId>,
    landmass_cache: LandmassCache,
    /// Backing pixels per layout pixel of the host surface.
    surface_scale: f32,
}

impl Canvas {
    /// Creates a new Canvas instance with the given configuration.
    ///
    /// An invalid configuration is replaced by the default one.
    pub fn new(config: CanvasConfig) -> Self {
        let config = match config.validate() {
            Ok(()) => config,
            Err(err) => {
                tracing::warn!(error = %err, "Invalid canvas config, using defaults");
                CanvasConfig::default()
            }
        };
        Self {
            viewport: ViewportController::new(&config),
            landmass_cache: LandmassCache::new(config.landmass.clone()),
            config,
            interaction_mode: InteractionMode::Idle,
            selection: SelectionSet::default(),
            flags: CanvasFlags::empty(),
            viewer: None,
            surface_scale: 1.0,
        }
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    /// Replaces the configuration after validating it.
    pub fn set_config(&mut self, config: CanvasConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.viewport.reconfigure(&config);
        self.landmass_cache.set_config(config.landmass.clone());
        self.config = config;
        Ok(())
    }

    pub fn viewer(&self) -> Option<UserId> {
        self.viewer
    }

    pub fn set_viewer(&mut self, viewer: Option<UserId>) {
        self.viewer = viewer;
    }

    pub fn flags(&self) -> CanvasFlags {
        self.flags
    }

    /// Applies host switches. Placement and export suspend viewport gestures;
    /// entering export also drops any gesture in progress.
    pub fn set_flags(&mut self, flags: CanvasFlags) {
        let entering_export =
            flags.contains(CanvasFlags::EXPORT) && !self.flags.contains(CanvasFlags::EXPORT);
        if entering_export {
            self.cancel_gesture();
        }

        for (flag, reason) in [
            (CanvasFlags::PLACEMENT, Suspension::PLACEMENT),
            (CanvasFlags::EXPORT, Suspension::EXPORT),
        ] {
            if flags.contains(flag) {
                self.viewport.suspend(reason);
            } else {
                self.viewport.resume(reason);
            }
        }

        tracing::debug!(?flags, "Canvas flags updated");
        self.flags = flags;
    }

    /// Sets the surface size and scale, then fits the map on first mount.
    pub fn mount(&mut self, size: Vec2, surface_scale: f32) {
        self.surface_scale = if surface_scale > 0.0 { surface_scale } else { 1.0 };
        self.viewport.set_viewport_size(size);
        self.viewport.ensure_fitted();
    }

    /// Updates the viewport size (e.g., on window resize).
    pub fn update_viewport_size(&mut self, size: Vec2) {
        self.viewport.set_viewport_size(size);
        self.viewport.ensure_fitted();
    }

    pub fn view(&self) -> &View {
        self.viewport.view()
    }

    pub fn viewport(&self) -> &ViewportController {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut ViewportController {
        &mut self.viewport
    }

    pub fn interaction_mode(&self) -> &InteractionMode {
        &self.interaction_mode
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    /// Replaces the selection, e.g. after the host deleted an entity.
    pub fn set_selection(&mut self, ids: impl IntoIterator<Item = EntityId>) {
        self.selection.set(ids);
    }

    /// Processes one input event against the current scene.
    pub fn handle_event(&mut self, scene: &Scene, event: &InputEvent) -> Vec<Intent> {
        let mut intents = Vec::new();
        let ctx = InteractionContext {
            scene,
            config: &self.config,
            viewer: self.viewer,
            flags: self.flags,
            surface_scale: self.surface_scale,
        };
        interaction::handle_event(
            &mut self.interaction_mode,
            &mut self.viewport,
            &mut self.selection,
            &ctx,
            event,
            &mut intents,
        );
        intents
    }

    /// Processes a batch of events, then renders the resulting frame.
    pub fn update(&mut self, scene: &Scene, events: &[InputEvent]) -> (RenderList, Vec<Intent>) {
        let mut intents = Vec::new();
        for event in events {
            intents.extend(self.handle_event(scene, event));
        }
        (self.render(scene), intents)
    }

    /// Renders the scene from scratch.
    ///
    /// Takes `&mut self` only to fill the landmass cache on first use of a seed.
    pub fn render(&mut self, scene: &Scene) -> RenderList {
        let landmass = match scene.background {
            Background::Generated => Some(self.landmass_cache.get(&scene.map_id)),
            Background::Image { .. } => None,
        };
        painter::Painter::draw_scene(
            self.viewport.view(),
            &self.config,
            scene,
            landmass.as_deref(),
            self.viewer,
            &self.selection,
            &self.interaction_mode,
        )
    }

    /// Drops the active gesture. Returns `true` if one was in progress.
    pub fn cancel_gesture(&mut self) -> bool {
        let mut discarded = Vec::new();
        interaction::cancel_gesture(&mut self.interaction_mode, &mut discarded)
    }

    /// Releases everything tied to the current mount.
    pub fn teardown(&mut self) {
        self.cancel_gesture();
        self.selection.clear();
        self.viewport.reset_fit();
        tracing::debug!("Canvas torn down");
    }

    /// Pixel size of an export capture for the given background.
    pub fn export_size(background: &Background) -> Vec2 {
        match background {
            Background::Image { size, .. } if size.x > 0.0 && size.y > 0.0 => *size,
            _ => Vec2::splat(coords::LOGICAL_EXTENT),
        }
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new(CanvasConfig::default())
    }
}
