//! # Scene Model
//!
//! The data the host hands to the canvas. The canvas never owns these records:
//! the host is the source of truth and passes a fresh [`Scene`] to every
//! render and event call. Only transient gesture state lives in the canvas.

use bitflags::bitflags;
use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::coords;

pub use uuid::Uuid;

/// Identifier of an [`Entity`].
pub type EntityId = Uuid;
/// Identifier of a [`Relationship`].
pub type RelationshipId = Uuid;
/// Identifier of a user (entity/relationship owner, current viewer).
pub type UserId = Uuid;

/// Closed set of entity kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Event,
    Person,
    Space,
    Community,
    Media,
    /// Drawn as a text label only, without a marker.
    Region,
}

impl Category {
    pub fn is_label_only(self) -> bool {
        matches!(self, Category::Region)
    }
}

/// Moderation state of an entity or relationship.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    #[default]
    Pending,
    Approved,
}

/// How an item should be drawn for a given viewer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Visibility {
    Hidden,
    /// Pending item shown to its owner at reduced opacity.
    Faded,
    Full,
}

impl Visibility {
    /// Approved: everyone. Pending: only the owner, faded.
    pub fn resolve(status: Status, owner: UserId, viewer: Option<UserId>) -> Self {
        match status {
            Status::Approved => Visibility::Full,
            Status::Pending if viewer == Some(owner) => Visibility::Faded,
            Status::Pending => Visibility::Hidden,
        }
    }

    pub fn is_visible(self) -> bool {
        self != Visibility::Hidden
    }
}

/// A point of interest pinned on the map.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub category: Category,
    pub title: String,
    /// Normalized position, `0..=100` on each axis.
    pub position: Vec2,
    pub status: Status,
    pub owner: UserId,
}

impl Entity {
    pub fn visibility(&self, viewer: Option<UserId>) -> Visibility {
        Visibility::resolve(self.status, self.owner, viewer)
    }

    /// Position in logical render space.
    pub fn render_position(&self) -> Vec2 {
        coords::to_render(self.position)
    }
}

/// A curved link between two entities.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    pub id: RelationshipId,
    pub from: EntityId,
    pub to: EntityId,
    pub status: Status,
    /// Explicit curve control point in normalized space.
    /// `None` derives one from the endpoints.
    pub control: Option<Vec2>,
    pub owner: UserId,
}

impl Relationship {
    pub fn visibility(&self, viewer: Option<UserId>) -> Visibility {
        Visibility::resolve(self.status, self.owner, viewer)
    }
}

/// What to draw behind the scene.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum Background {
    /// A host-provided image stretched over the logical area.
    Image {
        href: String,
        /// Natural pixel size, used for export captures.
        size: Vec2,
    },
    /// Procedural landmass seeded by the scene's `map_id`.
    #[default]
    Generated,
}

/// Everything the canvas needs to render one frame or interpret one event.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    /// Stable map identifier; seeds the generated landmass.
    pub map_id: String,
    pub entities: Vec<Entity>,
    pub relationships: Vec<Relationship>,
    pub background: Background,
}

impl Scene {
    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn relationship(&self, id: RelationshipId) -> Option<&Relationship> {
        self.relationships.iter().find(|r| r.id == id)
    }

    /// Entities the viewer can see, in draw order.
    pub fn visible_entities(&self, viewer: Option<UserId>) -> impl Iterator<Item = &Entity> {
        self.entities
            .iter()
            .filter(move |e| e.visibility(viewer).is_visible())
    }
}

/// Transient set of selected entities, in selection order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectionSet {
    ids: Vec<EntityId>,
}

impl SelectionSet {
    pub fn contains(&self, id: EntityId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// True if `id` is the one and only selected entity.
    pub fn is_sole(&self, id: EntityId) -> bool {
        self.ids.len() == 1 && self.ids[0] == id
    }

    pub fn iter(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.ids.iter().copied()
    }

    pub fn replace(&mut self, id: EntityId) {
        self.ids.clear();
        self.ids.push(id);
    }

    /// Adds `id` if absent, removes it if present.
    pub fn toggle(&mut self, id: EntityId) {
        if let Some(idx) = self.ids.iter().position(|&s| s == id) {
            self.ids.remove(idx);
        } else {
            self.ids.push(id);
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn set(&mut self, ids: impl IntoIterator<Item = EntityId>) {
        self.ids.clear();
        for id in ids {
            if !self.ids.contains(&id) {
                self.ids.push(id);
            }
        }
    }
}

bitflags! {
    /// Host-controlled switches for the canvas.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct CanvasFlags: u8 {
        /// Entities can be dragged, linked and curves re-shaped.
        const EDITABLE = 1 << 0;
        /// Background clicks place a new entity; pan/zoom is suspended.
        const PLACEMENT = 1 << 1;
        /// Capture mode: identity transform, no gestures.
        const EXPORT = 1 << 2;
    }
}

// Manual Serialize/Deserialize implementation for bitflags to keep the wire format a plain integer
impl Serialize for CanvasFlags {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u8(self.bits())
    }
}

impl<'de> Deserialize<'de> for CanvasFlags {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let bits = u8::deserialize(deserializer)?;
        Ok(Self::from_bits_truncate(bits))
    }
}
