use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Per-item classifier controlling lock and loop behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    #[serde(rename = "G")]
    Generic,
    /// Scenery/background: locked in place, horizontally centered, animation loops.
    #[serde(rename = "T")]
    Fixed,
    /// Reserved tag with no distinct behavior; handled like `Generic`.
    #[serde(rename = "F")]
    Reserved,
}

impl ItemKind {
    pub fn is_fixed(self) -> bool {
        matches!(self, ItemKind::Fixed)
    }

    pub fn code(self) -> &'static str {
        match self {
            ItemKind::Generic => "G",
            ItemKind::Fixed => "T",
            ItemKind::Reserved => "F",
        }
    }
}

/// Why a catalog asset path cannot be used.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssetPathError {
    #[error("path must be relative to the content root")]
    NotRelative,
    #[error("'{character}' at byte {offset} is not allowed; use lowercase, digits, '_', '-', '.'")]
    InvalidCharacter { character: char, offset: usize },
    #[error("segment {segment} is empty or a dot segment")]
    BadSegment { segment: usize },
    #[error("extension '{extension}' is neither png nor json")]
    UnsupportedExtension { extension: String },
}

/// Primary renderable payload of an item, classified once at catalog load.
///
/// Paths are '/'-separated, relative to the content root and lowercase; the
/// extension picks the kind. The filesystem loader applies the same rule, so a
/// path accepted here never fails validation at placement time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetRef {
    Image(String),
    Animation(String),
}

impl AssetRef {
    pub fn parse(path: &str) -> Result<Self, AssetPathError> {
        if path.starts_with('/') {
            return Err(AssetPathError::NotRelative);
        }
        let disallowed = path.char_indices().find(|(_, character)| {
            !(character.is_ascii_lowercase()
                || character.is_ascii_digit()
                || matches!(character, '_' | '-' | '.' | '/'))
        });
        if let Some((offset, character)) = disallowed {
            return Err(AssetPathError::InvalidCharacter { character, offset });
        }

        let mut file_name = "";
        for (segment, part) in path.split('/').enumerate() {
            if part.is_empty() || part == "." || part == ".." {
                return Err(AssetPathError::BadSegment { segment });
            }
            file_name = part;
        }

        match file_name.rsplit_once('.').map(|(_, extension)| extension) {
            Some("png") => Ok(AssetRef::Image(path.to_string())),
            Some("json") => Ok(AssetRef::Animation(path.to_string())),
            other => Err(AssetPathError::UnsupportedExtension {
                extension: other.unwrap_or_default().to_string(),
            }),
        }
    }

    pub fn path(&self) -> &str {
        match self {
            AssetRef::Image(path) | AssetRef::Animation(path) => path,
        }
    }

    pub fn is_animation(&self) -> bool {
        matches!(self, AssetRef::Animation(_))
    }

    /// A missing or blank path means the item has nothing to place.
    pub(crate) fn classify(path: Option<&str>) -> Result<Option<Self>, AssetPathError> {
        match path.filter(|path| !path.trim().is_empty()) {
            Some(path) => Self::parse(path).map(Some),
            None => Ok(None),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimalInfo {
    pub habitat: String,
    pub diet: String,
    pub feature: String,
    #[serde(default)]
    pub image_path: Option<String>,
    #[serde(default)]
    pub audio_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatalogItem {
    pub item_id: String,
    pub category_id: String,
    pub rank: u32,
    pub kind: ItemKind,
    pub owned_count: u32,
    pub price: u32,
    pub name: String,
    pub thumbnail_path: String,
    pub asset: Option<AssetRef>,
    pub playback_speed: f32,
    pub animal_info: Option<AnimalInfo>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub category_id: String,
    pub rank: u32,
    pub name: String,
    pub thumbnail_path: String,
    pub items: Vec<CatalogItem>,
}

/// One entry of a placement list: which item goes where.
///
/// A missing `y` centers the object vertically; a missing `x` places it at the
/// left edge and selects it right away, the way a freshly bought item behaves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementRequest {
    pub item_id: String,
    pub category_id: String,
    #[serde(default)]
    pub x: Option<f32>,
    #[serde(default)]
    pub y: Option<f32>,
    #[serde(default)]
    pub scale: Option<f32>,
}

impl PlacementRequest {
    pub fn new(item_id: impl Into<String>, category_id: impl Into<String>) -> Self {
        Self {
            item_id: item_id.into(),
            category_id: category_id.into(),
            x: None,
            y: None,
            scale: None,
        }
    }

    pub fn with_x(mut self, x: f32) -> Self {
        self.x = Some(x);
        self
    }

    pub fn with_y(mut self, y: f32) -> Self {
        self.y = Some(y);
        self
    }

    pub fn with_position(self, x: f32, y: f32) -> Self {
        self.with_x(x).with_y(y)
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = Some(scale);
        self
    }
}
