//! # Viewport Controller
//!
//! Owns the pan/zoom transform. Every mutation goes through here so the zoom
//! limits and the translate extent hold after each gesture.

use bitflags::bitflags;
use glam::Vec2;

use crate::config::CanvasConfig;
use crate::coords::LOGICAL_EXTENT;
use crate::view::{Transform, View};

bitflags! {
    /// Reasons gesture handling is switched off. Handling resumes once all are cleared.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct Suspension: u8 {
        /// Placement mode: clicks must be unambiguous.
        const PLACEMENT = 1 << 0;
        /// Export capture: transform pinned to identity.
        const EXPORT = 1 << 1;
    }
}

/// A pan/zoom gesture increment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Gesture {
    /// Translate by a screen-space delta.
    Pan { delta: Vec2 },
    /// Multiply the zoom, keeping the logical point under `focus` (screen space) fixed.
    Zoom { factor: f32, focus: Vec2 },
}

#[derive(Clone, Debug)]
pub struct ViewportController {
    view: View,
    min_zoom: f32,
    max_zoom: f32,
    pan_padding: f32,
    fit_padding: f32,
    suspended: Suspension,
    /// Transform to restore when an export capture ends.
    saved: Option<Transform>,
    fitted: bool,
}

impl ViewportController {
    pub fn new(config: &CanvasConfig) -> Self {
        Self {
            view: View::new(Transform::IDENTITY, Vec2::ZERO),
            min_zoom: config.min_zoom,
            max_zoom: config.max_zoom,
            pan_padding: config.pan_padding,
            fit_padding: config.fit_padding,
            suspended: Suspension::empty(),
            saved: None,
            fitted: false,
        }
    }

    /// Picks up new limits; the current transform is re-clamped.
    pub fn reconfigure(&mut self, config: &CanvasConfig) {
        self.min_zoom = config.min_zoom;
        self.max_zoom = config.max_zoom;
        self.pan_padding = config.pan_padding;
        self.fit_padding = config.fit_padding;
        if !self.is_exporting() {
            self.view.transform.zoom = self.clamp_zoom(self.view.transform.zoom);
            self.constrain();
        }
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn transform(&self) -> Transform {
        self.view.transform
    }

    pub fn zoom_limits(&self) -> (f32, f32) {
        (self.min_zoom, self.max_zoom)
    }

    pub fn is_enabled(&self) -> bool {
        self.suspended.is_empty()
    }

    pub fn is_exporting(&self) -> bool {
        self.suspended.contains(Suspension::EXPORT)
    }

    pub fn suspension(&self) -> Suspension {
        self.suspended
    }

    /// Updates the viewport size (e.g., on window resize).
    pub fn set_viewport_size(&mut self, size: Vec2) {
        self.view.viewport_size = size;
        if !self.is_exporting() {
            self.constrain();
        }
    }

    /// Stops gesture handling for `reason`.
    ///
    /// Entering export pins the transform to identity until export is resumed.
    pub fn suspend(&mut self, reason: Suspension) {
        if reason.contains(Suspension::EXPORT) && !self.is_exporting() {
            self.saved = Some(self.view.transform);
            self.view.transform = Transform::IDENTITY;
        }
        self.suspended.insert(reason);
        tracing::debug!(suspended = ?self.suspended, "Viewport suspended");
    }

    pub fn resume(&mut self, reason: Suspension) {
        if reason.contains(Suspension::EXPORT) && self.is_exporting() {
            self.view.transform = self.saved.take().unwrap_or(Transform::IDENTITY);
        }
        self.suspended.remove(reason);
        tracing::debug!(suspended = ?self.suspended, "Viewport resumed");
    }

    /// Integrates a gesture. Returns `false` when suspended or nothing changed.
    pub fn apply_gesture(&mut self, gesture: Gesture) -> bool {
        if !self.is_enabled() {
            return false;
        }
        let before = self.view.transform;
        match gesture {
            Gesture::Pan { delta } => {
                self.view.transform.pan += delta;
            }
            Gesture::Zoom { factor, focus } => {
                if !(factor > 0.0) || !factor.is_finite() {
                    return false;
                }
                let old_zoom = self.view.transform.zoom;
                let new_zoom = self.clamp_zoom(old_zoom * factor);
                // Pan = Screen - (Logical * Zoom) keeps the focus point still.
                let logical_focus = self.view.screen_to_logical(focus);
                self.view.transform.zoom = new_zoom;
                self.view.transform.pan = focus - logical_focus * new_zoom;
            }
        }
        self.constrain();
        self.view.transform != before
    }

    /// Centers the whole logical area in the viewport with a padding margin.
    pub fn fit_to_content(&mut self) {
        let size = self.view.viewport_size;
        if self.is_exporting() || size.x <= 0.0 || size.y <= 0.0 {
            return;
        }
        let padded = LOGICAL_EXTENT * (1.0 + self.fit_padding * 2.0);
        let zoom = self.clamp_zoom((size.x / padded).min(size.y / padded));
        let center = Vec2::splat(LOGICAL_EXTENT * 0.5);
        self.view.transform = Transform {
            pan: size * 0.5 - center * zoom,
            zoom,
        };
        self.constrain();
        tracing::debug!(zoom, pan = ?self.view.transform.pan, "Fitted viewport to content");
    }

    /// Fits once per mount; later calls are no-ops until [`reset_fit`](Self::reset_fit).
    pub fn ensure_fitted(&mut self) {
        if self.fitted || self.view.viewport_size.cmple(Vec2::ZERO).any() {
            return;
        }
        self.fit_to_content();
        self.fitted = true;
    }

    pub fn reset_fit(&mut self) {
        self.fitted = false;
    }

    fn clamp_zoom(&self, zoom: f32) -> f32 {
        zoom.clamp(self.min_zoom, self.max_zoom)
    }

    /// Keeps the visible window inside the content bounds plus padding.
    ///
    /// The padding never exceeds half the visible span, so at least half of
    /// the viewport shows content once zoomed in. When the window is larger
    /// than the padded bounds the content is centered instead.
    fn constrain(&mut self) {
        let size = self.view.viewport_size;
        if size.x <= 0.0 || size.y <= 0.0 {
            return;
        }
        let zoom = self.view.transform.zoom;
        let pan = self.view.transform.pan;
        self.view.transform.pan = Vec2::new(
            constrain_axis(pan.x, zoom, size.x, self.pan_padding),
            constrain_axis(pan.y, zoom, size.y, self.pan_padding),
        );
    }
}

fn constrain_axis(pan: f32, zoom: f32, viewport: f32, padding: f32) -> f32 {
    let visible = viewport / zoom;
    let pad = padding.min(visible * 0.5);
    let (lo, hi) = (-pad, LOGICAL_EXTENT + pad);

    let d0 = -pan / zoom - lo;
    let d1 = (viewport - pan) / zoom - hi;
    let shift = if d1 > d0 {
        (d0 + d1) * 0.5
    } else if d0 < 0.0 {
        d0
    } else if d1 > 0.0 {
        d1
    } else {
        0.0
    };
    pan + shift * zoom
}
