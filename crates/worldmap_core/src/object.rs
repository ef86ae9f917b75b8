//! Object references, placed objects and the stacking/drawing capabilities

use serde::{Deserialize, Serialize};

/// Catalog id of a placeable object (its sprite id)
pub type ObjectId = u32;

/// Stack position reserved for the ground object of a cell
pub const GROUND_STACK_POSITION: u32 = 0;

/// Behaviour flags of a catalog object
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectFlags {
    /// Occupies the ground slot; a cell holds at most one
    #[serde(default)]
    pub ground: bool,
    /// Sprite cycles through animation frames
    #[serde(default)]
    pub animated: bool,
    /// Instances carry a count (coins, ammunition)
    #[serde(default)]
    pub cumulative: bool,
}

/// Anything that can be put on a cell's object stack
pub trait Stackable {
    /// Catalog id of the object
    fn object_id(&self) -> ObjectId;

    /// Whether the object takes the ground slot
    fn is_ground(&self) -> bool;
}

/// Anything a renderer can draw from a sprite sheet
pub trait Drawable {
    /// Source rectangle on the sprite sheet
    fn sprite_rect(&self) -> SpriteRect;

    /// Whether the renderer should advance animation frames
    fn is_animated(&self) -> bool {
        false
    }
}

/// Pixel rectangle on a sprite sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SpriteRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Lightweight reference to a catalog object, resolved once at selection time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectRef {
    pub id: ObjectId,
    pub ground: bool,
}

impl ObjectRef {
    /// Reference to a non-ground object
    pub const fn item(id: ObjectId) -> Self {
        Self { id, ground: false }
    }

    /// Reference to a ground object
    pub const fn ground(id: ObjectId) -> Self {
        Self { id, ground: true }
    }
}

impl Stackable for ObjectRef {
    fn object_id(&self) -> ObjectId {
        self.id
    }

    fn is_ground(&self) -> bool {
        self.ground
    }
}

/// One object on a cell's stack
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedObject {
    pub id: ObjectId,
    /// Ordering key; 0 is the ground slot, larger values draw later
    pub stack_position: u32,
    /// Stack count for cumulative objects
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
    /// Vertical draw offset in pixels caused by objects underneath
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elevation: Option<u32>,
}

impl PlacedObject {
    pub fn new(id: ObjectId, stack_position: u32) -> Self {
        Self {
            id,
            stack_position,
            count: None,
            elevation: None,
        }
    }

    pub fn with_count(mut self, count: u32) -> Self {
        self.count = Some(count);
        self
    }

    pub fn with_elevation(mut self, elevation: u32) -> Self {
        self.elevation = Some(elevation);
        self
    }
}

impl Stackable for PlacedObject {
    fn object_id(&self) -> ObjectId {
        self.id
    }

    fn is_ground(&self) -> bool {
        self.stack_position == GROUND_STACK_POSITION
    }
}
