use std::collections::HashMap;

use super::types::{AssetRef, CatalogItem, Category, ItemKind};

/// Projection of a catalog item with exactly what placement and rendering need.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogItemView {
    pub name: String,
    pub thumbnail_path: String,
    pub price: u32,
    pub asset: Option<AssetRef>,
    pub kind: ItemKind,
    pub playback_speed: f32,
}

#[derive(Debug, Default, Clone)]
struct CategorySlot {
    index: usize,
    items_by_id: HashMap<String, usize>,
}

/// Read-only lookup from (category, item) to catalog metadata.
#[derive(Debug, Default, Clone)]
pub struct CatalogIndex {
    categories: Vec<Category>,
    slots: HashMap<String, CategorySlot>,
}

impl CatalogIndex {
    /// Callers must have rejected duplicate ids already; later duplicates shadow earlier ones.
    pub(crate) fn from_categories(categories: Vec<Category>) -> Self {
        let mut slots = HashMap::with_capacity(categories.len());
        for (index, category) in categories.iter().enumerate() {
            let items_by_id = category
                .items
                .iter()
                .enumerate()
                .map(|(item_index, item)| (item.item_id.clone(), item_index))
                .collect();
            slots.insert(
                category.category_id.clone(),
                CategorySlot { index, items_by_id },
            );
        }
        Self { categories, slots }
    }

    pub fn find_item(&self, category_id: &str, item_id: &str) -> Option<CatalogItemView> {
        self.item(category_id, item_id).map(|item| CatalogItemView {
            name: item.name.clone(),
            thumbnail_path: item.thumbnail_path.clone(),
            price: item.price,
            asset: item.asset.clone(),
            kind: item.kind,
            playback_speed: item.playback_speed,
        })
    }

    pub fn item(&self, category_id: &str, item_id: &str) -> Option<&CatalogItem> {
        let slot = self.slots.get(category_id)?;
        let item_index = *slot.items_by_id.get(item_id)?;
        self.categories.get(slot.index)?.items.get(item_index)
    }

    pub fn category(&self, category_id: &str) -> Option<&Category> {
        let slot = self.slots.get(category_id)?;
        self.categories.get(slot.index)
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn item_count(&self) -> usize {
        self.categories
            .iter()
            .map(|category| category.items.len())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(item_id: &str, category_id: &str, asset: Option<AssetRef>) -> CatalogItem {
        CatalogItem {
            item_id: item_id.to_string(),
            category_id: category_id.to_string(),
            rank: 1,
            kind: ItemKind::Generic,
            owned_count: 0,
            price: 7,
            name: format!("name-{item_id}"),
            thumbnail_path: format!("thumbs/{item_id}.png"),
            asset,
            playback_speed: 0.6,
            animal_info: None,
        }
    }

    fn index() -> CatalogIndex {
        CatalogIndex::from_categories(vec![
            Category {
                category_id: "rides".to_string(),
                rank: 1,
                name: "Rides".to_string(),
                thumbnail_path: "tabs/rides.png".to_string(),
                items: vec![
                    item(
                        "wheel",
                        "rides",
                        Some(AssetRef::Animation("rides/wheel.json".to_string())),
                    ),
                    item("coaster", "rides", None),
                ],
            },
            Category {
                category_id: "amenities".to_string(),
                rank: 2,
                name: "Amenities".to_string(),
                thumbnail_path: "tabs/amenities.png".to_string(),
                items: vec![item(
                    "bin",
                    "amenities",
                    Some(AssetRef::Image("amenities/bin.png".to_string())),
                )],
            },
        ])
    }

    #[test]
    fn find_item_projects_placement_fields() {
        let view = index().find_item("rides", "wheel").expect("wheel");
        assert_eq!(view.name, "name-wheel");
        assert_eq!(view.thumbnail_path, "thumbs/wheel.png");
        assert_eq!(view.price, 7);
        assert_eq!(
            view.asset,
            Some(AssetRef::Animation("rides/wheel.json".to_string()))
        );
        assert_eq!(view.kind, ItemKind::Generic);
        assert_eq!(view.playback_speed, 0.6);
    }

    #[test]
    fn find_item_misses_are_none() {
        let index = index();
        assert!(index.find_item("rides", "bin").is_none());
        assert!(index.find_item("unknown", "wheel").is_none());
        assert!(index.find_item("", "").is_none());
    }

    #[test]
    fn item_without_asset_is_found_but_has_nothing_to_place() {
        let view = index().find_item("rides", "coaster").expect("coaster");
        assert!(view.asset.is_none());
    }

    #[test]
    fn categories_keep_catalog_order() {
        let index = index();
        let ids: Vec<&str> = index
            .categories()
            .iter()
            .map(|category| category.category_id.as_str())
            .collect();
        assert_eq!(ids, vec!["rides", "amenities"]);
        assert_eq!(index.item_count(), 3);
        assert_eq!(
            index.category("amenities").map(|category| category.rank),
            Some(2)
        );
    }
}
