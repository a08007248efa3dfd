//! # Input Protocol
//!
//! This module defines the input events the host application forwards to the Canvas.
//! Pointer positions are in Screen Space (pixels relative to the canvas surface).

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// State of keyboard modifiers (Shift, Ctrl, Alt, Meta).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifiersState {
    /// Shift key is pressed.
    pub shift: bool,
    /// Ctrl key is pressed.
    pub ctrl: bool,
    /// Alt / Option key is pressed.
    pub alt: bool,
    /// Meta / Command / Windows key is pressed.
    pub meta: bool,
}

impl ModifiersState {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    /// Click adds/removes from the selection instead of replacing it.
    pub fn multi_select(&self) -> bool {
        self.shift || self.ctrl || self.meta
    }

    /// Press on an entity starts a new relationship.
    pub fn link(&self) -> bool {
        self.alt
    }
}

/// Which pointer button went down.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerButton {
    /// Left mouse button, pen or touch contact.
    #[default]
    Primary,
    /// Middle mouse button. Always pans.
    Middle,
    /// Right mouse button. Ignored.
    Secondary,
}

/// Keyboard keys that the Canvas cares about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Escape,
}

/// A single input event.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    PointerDown {
        pos: Vec2,
        button: PointerButton,
        modifiers: ModifiersState,
    },
    PointerMove {
        pos: Vec2,
        modifiers: ModifiersState,
    },
    PointerUp {
        pos: Vec2,
        modifiers: ModifiersState,
    },
    /// The platform aborted the pointer stream (focus loss, touch cancel).
    PointerCancel,
    /// Scroll wheel or pinch. Positive `delta` zooms in.
    Wheel {
        pos: Vec2,
        delta: f32,
    },
    KeyDown {
        key: Key,
    },
}

impl InputEvent {
    /// Primary-button press without modifiers.
    pub fn down(pos: Vec2) -> Self {
        Self::down_with(pos, ModifiersState::NONE)
    }

    pub fn down_with(pos: Vec2, modifiers: ModifiersState) -> Self {
        InputEvent::PointerDown {
            pos,
            button: PointerButton::Primary,
            modifiers,
        }
    }

    pub fn moved(pos: Vec2) -> Self {
        InputEvent::PointerMove {
            pos,
            modifiers: ModifiersState::NONE,
        }
    }

    pub fn up(pos: Vec2) -> Self {
        Self::up_with(pos, ModifiersState::NONE)
    }

    pub fn up_with(pos: Vec2, modifiers: ModifiersState) -> Self {
        InputEvent::PointerUp { pos, modifiers }
    }
}
