use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use super::database::CatalogIndex;
use super::types::{
    AnimalInfo, AssetPathError, AssetRef, CatalogItem, Category, ItemKind, PlacementRequest,
};

const DEFAULT_PLAYBACK_SPEED: f32 = 1.0;

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to read {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed JSON in {origin} at '{location}': {source}")]
    Json {
        origin: String,
        location: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("duplicate category id {category_id}")]
    DuplicateCategory { category_id: String },
    #[error("duplicate item {item_id} in category {category_id}")]
    DuplicateItem {
        category_id: String,
        item_id: String,
    },
    #[error("item {item_id} declares category {declared} but is listed under {parent}")]
    CategoryMismatch {
        item_id: String,
        declared: String,
        parent: String,
    },
    #[error("item {item_id} has unusable asset path '{path}': {source}")]
    InvalidAssetPath {
        item_id: String,
        path: String,
        #[source]
        source: AssetPathError,
    },
    #[error("item {item_id} has invalid playback speed {speed}")]
    InvalidPlaybackSpeed { item_id: String, speed: f32 },
    #[error("placement #{index} for item {item_id} has invalid scale {scale}")]
    InvalidScale {
        index: usize,
        item_id: String,
        scale: f32,
    },
    #[error("placement #{index} for item {item_id} has a non-finite position")]
    InvalidPosition { index: usize, item_id: String },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RawCatalog {
    categories: Vec<RawCategory>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RawCategory {
    category_id: String,
    rank: u32,
    name: String,
    #[serde(default)]
    thumbnail_path: String,
    #[serde(default)]
    items: Vec<RawItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RawItem {
    item_id: String,
    category_id: String,
    rank: u32,
    kind: ItemKind,
    #[serde(default)]
    owned_count: u32,
    price: u32,
    name: String,
    #[serde(default)]
    thumbnail_path: String,
    #[serde(default)]
    asset_path: Option<String>,
    #[serde(default)]
    playback_speed: Option<f32>,
    #[serde(default)]
    animal_info: Option<AnimalInfo>,
}

pub fn load_catalog(path: &Path) -> Result<CatalogIndex, ContentError> {
    let raw = read_file(path)?;
    let catalog = parse_catalog(&raw, &path.display().to_string())?;
    info!(
        path = %path.display(),
        categories = catalog.categories().len(),
        items = catalog.item_count(),
        "catalog_loaded"
    );
    Ok(catalog)
}

/// Parses a catalog document. `origin` only labels errors.
pub fn parse_catalog(raw: &str, origin: &str) -> Result<CatalogIndex, ContentError> {
    let catalog: RawCatalog = deserialize_with_path(raw, origin)?;

    let mut seen_categories = HashSet::<String>::new();
    let mut categories = Vec::with_capacity(catalog.categories.len());
    for raw_category in catalog.categories {
        if !seen_categories.insert(raw_category.category_id.clone()) {
            return Err(ContentError::DuplicateCategory {
                category_id: raw_category.category_id,
            });
        }

        let mut seen_items = HashSet::<String>::new();
        let mut items = Vec::with_capacity(raw_category.items.len());
        for raw_item in raw_category.items {
            if raw_item.category_id != raw_category.category_id {
                return Err(ContentError::CategoryMismatch {
                    item_id: raw_item.item_id,
                    declared: raw_item.category_id,
                    parent: raw_category.category_id,
                });
            }
            if !seen_items.insert(raw_item.item_id.clone()) {
                return Err(ContentError::DuplicateItem {
                    category_id: raw_category.category_id,
                    item_id: raw_item.item_id,
                });
            }
            items.push(compile_item(raw_item)?);
        }

        categories.push(Category {
            category_id: raw_category.category_id,
            rank: raw_category.rank,
            name: raw_category.name,
            thumbnail_path: raw_category.thumbnail_path,
            items,
        });
    }

    Ok(CatalogIndex::from_categories(categories))
}

fn compile_item(raw: RawItem) -> Result<CatalogItem, ContentError> {
    let asset = AssetRef::classify(raw.asset_path.as_deref()).map_err(|source| {
        ContentError::InvalidAssetPath {
            item_id: raw.item_id.clone(),
            path: raw.asset_path.clone().unwrap_or_default(),
            source,
        }
    })?;
    if asset.is_none() {
        debug!(item_id = %raw.item_id, "catalog_item_without_asset");
    }
    if raw.kind == ItemKind::Reserved {
        debug!(item_id = %raw.item_id, "catalog_item_reserved_kind");
    }

    let playback_speed = raw.playback_speed.unwrap_or(DEFAULT_PLAYBACK_SPEED);
    if !playback_speed.is_finite() || playback_speed <= 0.0 {
        return Err(ContentError::InvalidPlaybackSpeed {
            item_id: raw.item_id,
            speed: playback_speed,
        });
    }

    Ok(CatalogItem {
        item_id: raw.item_id,
        category_id: raw.category_id,
        rank: raw.rank,
        kind: raw.kind,
        owned_count: raw.owned_count,
        price: raw.price,
        name: raw.name,
        thumbnail_path: raw.thumbnail_path,
        asset,
        playback_speed,
        animal_info: raw.animal_info,
    })
}

pub fn load_placement_requests(path: &Path) -> Result<Vec<PlacementRequest>, ContentError> {
    let raw = read_file(path)?;
    let requests = parse_placement_requests(&raw, &path.display().to_string())?;
    info!(
        path = %path.display(),
        count = requests.len(),
        "placement_list_loaded"
    );
    Ok(requests)
}

pub fn parse_placement_requests(
    raw: &str,
    origin: &str,
) -> Result<Vec<PlacementRequest>, ContentError> {
    let requests: Vec<PlacementRequest> = deserialize_with_path(raw, origin)?;
    for (index, request) in requests.iter().enumerate() {
        if let Some(scale) = request.scale {
            if !scale.is_finite() || scale <= 0.0 {
                return Err(ContentError::InvalidScale {
                    index,
                    item_id: request.item_id.clone(),
                    scale,
                });
            }
        }
        let finite = [request.x, request.y]
            .into_iter()
            .flatten()
            .all(f32::is_finite);
        if !finite {
            return Err(ContentError::InvalidPosition {
                index,
                item_id: request.item_id.clone(),
            });
        }
    }
    Ok(requests)
}

fn read_file(path: &Path) -> Result<String, ContentError> {
    fs::read_to_string(path).map_err(|source| ContentError::ReadFile {
        path: path.to_path_buf(),
        source,
    })
}

fn deserialize_with_path<T: DeserializeOwned>(raw: &str, origin: &str) -> Result<T, ContentError> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    serde_path_to_error::deserialize(&mut deserializer).map_err(|error| {
        let location = error.path().to_string();
        ContentError::Json {
            origin: origin.to_string(),
            location,
            source: error.into_inner(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn catalog_json(items: serde_json::Value) -> String {
        json!({
            "categories": [
                {
                    "categoryId": "JC-1",
                    "rank": 1,
                    "name": "Rides",
                    "thumbnailPath": "tabs/rides.png",
                    "items": items
                }
            ]
        })
        .to_string()
    }

    fn item_json(item_id: &str, asset_path: Option<&str>) -> serde_json::Value {
        json!({
            "itemId": item_id,
            "categoryId": "JC-1",
            "rank": 1,
            "kind": "G",
            "ownedCount": 2,
            "price": 20,
            "name": "Ferris Wheel",
            "thumbnailPath": "thumbs/wheel.png",
            "assetPath": asset_path
        })
    }

    #[test]
    fn parses_items_and_classifies_assets_once() {
        let raw = catalog_json(json!([
            item_json("JI-1", Some("rides/wheel.json")),
            item_json("JI-2", Some("rides/bin.png")),
            item_json("JI-3", None),
        ]));
        let catalog = parse_catalog(&raw, "test").expect("catalog");

        let wheel = catalog.item("JC-1", "JI-1").expect("wheel");
        assert_eq!(
            wheel.asset,
            Some(AssetRef::Animation("rides/wheel.json".to_string()))
        );
        assert_eq!(wheel.owned_count, 2);
        assert_eq!(wheel.playback_speed, 1.0);
        assert_eq!(
            catalog.item("JC-1", "JI-2").expect("bin").asset,
            Some(AssetRef::Image("rides/bin.png".to_string()))
        );
        assert!(catalog.item("JC-1", "JI-3").expect("none").asset.is_none());
    }

    #[test]
    fn parses_animal_info_and_playback_speed() {
        let mut giraffe = item_json("JI-9", Some("animals/giraffe.png"));
        giraffe["playbackSpeed"] = json!(0.6);
        giraffe["animalInfo"] = json!({
            "habitat": "savanna",
            "diet": "leaves",
            "feature": "long neck",
            "audioPath": "animals/giraffe.mp3"
        });
        let catalog = parse_catalog(&catalog_json(json!([giraffe])), "test").expect("catalog");
        let item = catalog.item("JC-1", "JI-9").expect("giraffe");
        assert_eq!(item.playback_speed, 0.6);
        let info = item.animal_info.as_ref().expect("animal info");
        assert_eq!(info.habitat, "savanna");
        assert_eq!(info.audio_path.as_deref(), Some("animals/giraffe.mp3"));
        assert!(info.image_path.is_none());
    }

    #[test]
    fn rejects_unsupported_asset_extension() {
        let raw = catalog_json(json!([item_json("JI-1", Some("rides/wheel.gif"))]));
        let error = parse_catalog(&raw, "test").expect_err("must fail");
        assert!(matches!(
            error,
            ContentError::InvalidAssetPath {
                ref item_id,
                source: AssetPathError::UnsupportedExtension { .. },
                ..
            } if item_id == "JI-1"
        ));
    }

    #[test]
    fn uppercase_asset_path_fails_at_catalog_load_not_at_placement() {
        let raw = catalog_json(json!([
            item_json("JI-ok", Some("rides/ok.png")),
            item_json("JI-bin", Some("bin.PNG")),
        ]));
        let error = parse_catalog(&raw, "catalog.json").expect_err("must fail");
        match error {
            ContentError::InvalidAssetPath {
                item_id,
                path,
                source,
            } => {
                assert_eq!(item_id, "JI-bin");
                assert_eq!(path, "bin.PNG");
                assert_eq!(
                    source,
                    AssetPathError::InvalidCharacter {
                        character: 'P',
                        offset: 4
                    }
                );
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_asset_path_escaping_content_root() {
        let raw = catalog_json(json!([item_json("JI-1", Some("../secret.png"))]));
        let error = parse_catalog(&raw, "test").expect_err("must fail");
        assert!(matches!(
            error,
            ContentError::InvalidAssetPath {
                source: AssetPathError::BadSegment { segment: 0 },
                ..
            }
        ));
    }

    #[test]
    fn rejects_duplicate_items_in_category() {
        let raw = catalog_json(json!([
            item_json("JI-1", Some("a.png")),
            item_json("JI-1", Some("b.png")),
        ]));
        let error = parse_catalog(&raw, "test").expect_err("must fail");
        assert!(matches!(error, ContentError::DuplicateItem { .. }));
    }

    #[test]
    fn rejects_item_listed_under_wrong_category() {
        let mut stray = item_json("JI-1", Some("a.png"));
        stray["categoryId"] = json!("JC-2");
        let error = parse_catalog(&catalog_json(json!([stray])), "test").expect_err("must fail");
        assert!(matches!(error, ContentError::CategoryMismatch { .. }));
    }

    #[test]
    fn rejects_non_positive_playback_speed() {
        let mut item = item_json("JI-1", Some("a.json"));
        item["playbackSpeed"] = json!(0.0);
        let error = parse_catalog(&catalog_json(json!([item])), "test").expect_err("must fail");
        assert!(matches!(error, ContentError::InvalidPlaybackSpeed { .. }));
    }

    #[test]
    fn json_errors_report_the_failing_path() {
        let raw = catalog_json(json!([{
            "itemId": "JI-1",
            "categoryId": "JC-1",
            "rank": 1,
            "kind": "X",
            "price": 1,
            "name": "bad kind"
        }]));
        let error = parse_catalog(&raw, "catalog.json").expect_err("must fail");
        match error {
            ContentError::Json {
                origin, location, ..
            } => {
                assert_eq!(origin, "catalog.json");
                assert_eq!(location, "categories[0].items[0].kind");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn placement_list_accepts_missing_optional_fields() {
        let raw = json!([
            { "itemId": "JI-1", "categoryId": "JC-1", "x": 0.0, "y": 46.5, "scale": 1.0 },
            { "itemId": "JI-1", "categoryId": "JC-1" }
        ])
        .to_string();
        let requests = parse_placement_requests(&raw, "test").expect("requests");
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].y, Some(46.5));
        assert_eq!(requests[1], PlacementRequest::new("JI-1", "JC-1"));
    }

    #[test]
    fn placement_list_rejects_invalid_scale() {
        let raw = json!([{ "itemId": "JI-1", "categoryId": "JC-1", "scale": -1.0 }]).to_string();
        let error = parse_placement_requests(&raw, "test").expect_err("must fail");
        assert!(matches!(error, ContentError::InvalidScale { index: 0, .. }));
    }

    #[test]
    fn load_catalog_reports_missing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("catalog.json");
        let error = load_catalog(&missing).expect_err("must fail");
        assert!(matches!(error, ContentError::ReadFile { ref path, .. } if *path == missing));
    }

    #[test]
    fn load_catalog_reads_from_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("catalog.json");
        fs::write(
            &path,
            catalog_json(json!([item_json("JI-1", Some("rides/wheel.json"))])),
        )
        .expect("write");
        let catalog = load_catalog(&path).expect("catalog");
        assert_eq!(catalog.item_count(), 1);
    }
}
