//! Read-only catalog of placeable objects, expanded from sprite sheets

use crate::{Drawable, MapError, ObjectFlags, ObjectId, ObjectRef, SpriteRect, Stackable};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Edge length of one sprite unit in pixels
const SPRITE_UNIT: u32 = 32;

/// Sprites per row on a sheet, in sprite units
const SHEET_COLUMNS: u32 = 6;

/// Most entries a catalog may expand to
pub const MAX_CATALOG_ENTRIES: u64 = 1 << 20;

/// Size class of the sprites on a sheet
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum SpriteType {
    /// 32x32
    #[default]
    Single,
    /// 32x64
    Tall,
    /// 64x32
    Wide,
    /// 64x64
    Large,
}

impl SpriteType {
    /// Width and height in sprite units
    pub fn scale(self) -> (u32, u32) {
        match self {
            SpriteType::Single => (1, 1),
            SpriteType::Tall => (1, 2),
            SpriteType::Wide => (2, 1),
            SpriteType::Large => (2, 2),
        }
    }

    /// Source rectangle of the `n`-th sprite on a sheet of this type
    pub fn sprite_rect(self, n: u32) -> SpriteRect {
        let (xs, ys) = self.scale();
        SpriteRect {
            x: SPRITE_UNIT * xs * (n % (SHEET_COLUMNS * xs)),
            y: SPRITE_UNIT * ys * (n / (SHEET_COLUMNS * ys)),
            width: SPRITE_UNIT * xs,
            height: SPRITE_UNIT * ys,
        }
    }
}

impl TryFrom<u8> for SpriteType {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x00 => Ok(SpriteType::Single),
            0x01 => Ok(SpriteType::Tall),
            0x02 => Ok(SpriteType::Wide),
            0x03 => Ok(SpriteType::Large),
            other => Err(format!("unknown sprite type {other:#04x}")),
        }
    }
}

impl From<SpriteType> for u8 {
    fn from(value: SpriteType) -> Self {
        match value {
            SpriteType::Single => 0x00,
            SpriteType::Tall => 0x01,
            SpriteType::Wide => 0x02,
            SpriteType::Large => 0x03,
        }
    }
}

/// One sprite sheet contributing a contiguous id range to the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpriteSheet {
    /// Image file, relative to the sprite directory
    pub file: String,
    pub first_sprite_id: ObjectId,
    pub last_sprite_id: ObjectId,
    #[serde(default)]
    pub sprite_type: SpriteType,
    #[serde(default)]
    pub flags: ObjectFlags,
}

impl SpriteSheet {
    /// Number of sprites on the sheet; zero when the range is inverted
    pub fn sprite_count(&self) -> u64 {
        (u64::from(self.last_sprite_id) + 1).saturating_sub(u64::from(self.first_sprite_id))
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        (self.first_sprite_id..=self.last_sprite_id).contains(&id)
    }
}

/// Serialized catalog definition table
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogSource {
    pub sheets: Vec<SpriteSheet>,
}

/// A placeable object: one sprite on one sheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectDefinition {
    pub id: ObjectId,
    /// Index of the owning sheet in [`Catalog::sheets`]
    pub sheet: usize,
    pub rect: SpriteRect,
    pub flags: ObjectFlags,
}

impl ObjectDefinition {
    /// Reference suitable for placing this object on the grid
    pub fn object_ref(&self) -> ObjectRef {
        ObjectRef {
            id: self.id,
            ground: self.flags.ground,
        }
    }
}

impl Stackable for ObjectDefinition {
    fn object_id(&self) -> ObjectId {
        self.id
    }

    fn is_ground(&self) -> bool {
        self.flags.ground
    }
}

impl Drawable for ObjectDefinition {
    fn sprite_rect(&self) -> SpriteRect {
        self.rect
    }

    fn is_animated(&self) -> bool {
        self.flags.animated
    }
}

/// Ordered, read-only table of placeable objects.
///
/// Entries keep sheet order and, within a sheet, sprite id order. This is the
/// order the catalog pager pages through.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    sheets: Vec<SpriteSheet>,
    entries: Vec<ObjectDefinition>,
    // id -> position in `entries`
    index: HashMap<ObjectId, usize>,
}

impl Catalog {
    /// Expand sprite sheets into catalog entries.
    ///
    /// Sheets must have `first_sprite_id <= last_sprite_id`, be sorted by
    /// first id and must not overlap. Together they may hold at most
    /// [`MAX_CATALOG_ENTRIES`] sprites.
    pub fn from_sheets(sheets: Vec<SpriteSheet>) -> Result<Self, MapError> {
        let mut total: u64 = 0;
        for (n, sheet) in sheets.iter().enumerate() {
            if sheet.first_sprite_id > sheet.last_sprite_id {
                return Err(MapError::InvalidCatalog(format!(
                    "sheet '{}' ends before it starts ({} > {})",
                    sheet.file, sheet.first_sprite_id, sheet.last_sprite_id
                )));
            }
            if let Some(previous) = n.checked_sub(1).map(|p| &sheets[p]) {
                if sheet.first_sprite_id <= previous.last_sprite_id {
                    return Err(MapError::InvalidCatalog(format!(
                        "sheet '{}' overlaps '{}' at id {}",
                        sheet.file, previous.file, sheet.first_sprite_id
                    )));
                }
            }
            total += sheet.sprite_count();
            if total > MAX_CATALOG_ENTRIES {
                return Err(MapError::InvalidCatalog(format!(
                    "sheet '{}' takes the catalog past {} entries",
                    sheet.file, MAX_CATALOG_ENTRIES
                )));
            }
        }

        let mut entries = Vec::with_capacity(total as usize);
        let mut index = HashMap::with_capacity(total as usize);
        for (sheet_index, sheet) in sheets.iter().enumerate() {
            for (n, id) in (sheet.first_sprite_id..=sheet.last_sprite_id).enumerate() {
                index.insert(id, entries.len());
                entries.push(ObjectDefinition {
                    id,
                    sheet: sheet_index,
                    rect: sheet.sprite_type.sprite_rect(n as u32),
                    flags: sheet.flags,
                });
            }
        }

        tracing::debug!(
            sheets = sheets.len(),
            entries = entries.len(),
            "catalog expanded"
        );

        Ok(Self {
            sheets,
            entries,
            index,
        })
    }

    /// Parse a [`CatalogSource`] from JSON and expand it
    pub fn from_json(json: &str) -> Result<Self, MapError> {
        let source: CatalogSource = serde_json::from_str(json)?;
        Self::from_sheets(source.sheets)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn sheets(&self) -> &[SpriteSheet] {
        &self.sheets
    }

    /// All entries in paging order
    pub fn entries(&self) -> &[ObjectDefinition] {
        &self.entries
    }

    /// Entry at a paging position
    pub fn entry_at(&self, position: usize) -> Option<&ObjectDefinition> {
        self.entries.get(position)
    }

    /// Look up an object by id
    pub fn get(&self, id: ObjectId) -> Option<&ObjectDefinition> {
        self.index.get(&id).map(|&n| &self.entries[n])
    }

    /// Resolve an id into a placeable reference
    pub fn object_ref(&self, id: ObjectId) -> Result<ObjectRef, MapError> {
        self.get(id)
            .map(ObjectDefinition::object_ref)
            .ok_or(MapError::UnknownObject(id))
    }

    /// The sheet an object's sprite lives on
    pub fn sheet_for(&self, id: ObjectId) -> Option<&SpriteSheet> {
        // Last sheet starting at or before `id`
        let n = self.sheets.partition_point(|s| s.first_sprite_id <= id);
        n.checked_sub(1)
            .map(|p| &self.sheets[p])
            .filter(|sheet| sheet.contains(id))
    }
}
