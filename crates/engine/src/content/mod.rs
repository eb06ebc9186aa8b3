mod database;
mod loader;
mod types;

pub use database::{CatalogIndex, CatalogItemView};
pub use loader::{
    load_catalog, load_placement_requests, parse_catalog, parse_placement_requests, ContentError,
};
pub use types::{
    AnimalInfo, AssetPathError, AssetRef, CatalogItem, Category, ItemKind, PlacementRequest,
};
