use thiserror::Error;

use crate::content::{ItemKind, PlacementRequest};

use super::assets::AssetLoadError;
use super::geometry::Vec2;
use super::surface::ObjectId;

/// One catalog item instance living on the surface.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementRecord {
    pub item_id: String,
    pub category_id: String,
    pub stack_index: u32,
    pub kind: ItemKind,
    pub position: Vec2,
    pub scale: f32,
    pub object: ObjectId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NotInCatalog,
    NoAsset,
    ObjectActive,
}

impl SkipReason {
    pub fn label(self) -> &'static str {
        match self {
            SkipReason::NotInCatalog => "not_in_catalog",
            SkipReason::NoAsset => "no_asset",
            SkipReason::ObjectActive => "object_active",
        }
    }
}

/// How a freshly added, selected item is paid for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acquisition {
    FromInventory { remaining: u32 },
    RequiresPurchase { price: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacedObject {
    pub object: ObjectId,
    pub stack_index: u32,
    pub acquisition: Option<Acquisition>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlacementOutcome {
    Placed(PlacedObject),
    Skipped(SkipReason),
}

impl PlacementOutcome {
    pub fn placed(&self) -> Option<&PlacedObject> {
        match self {
            PlacementOutcome::Placed(placed) => Some(placed),
            PlacementOutcome::Skipped(_) => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchReport {
    pub placed: Vec<PlacedObject>,
    pub skipped: Vec<(PlacementRequest, SkipReason)>,
}

#[derive(Debug, Error)]
pub enum PlacementError {
    #[error("failed to load asset for item {item_id} in category {category_id}: {source}")]
    AssetLoad {
        item_id: String,
        category_id: String,
        #[source]
        source: AssetLoadError,
    },
}
