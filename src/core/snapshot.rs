//! The already-fetched collections a search runs against.

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::error::{CoreError, CoreResult};
use super::{
    Category, CategoryHierarchy, City, Hierarchy, LocationHierarchy, Property, SubCategory, Town,
};

/// Every collection the search page needs, as one JSON document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub properties: Vec<Property>,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub subcategories: Vec<SubCategory>,
    #[serde(default)]
    pub cities: Vec<City>,
    #[serde(default)]
    pub towns: Vec<Town>,
}

impl Snapshot {
    pub fn from_json_str(json: &str) -> CoreResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn location_hierarchy(&self) -> LocationHierarchy {
        Hierarchy::new(self.cities.clone(), self.towns.clone())
    }

    pub fn category_hierarchy(&self) -> CategoryHierarchy {
        Hierarchy::new(self.categories.clone(), self.subcategories.clone())
    }

    /// Logs every property whose town is not a town of its city, or whose
    /// subcategory is not a subcategory of its category, and returns their ids.
    ///
    /// Such records are still searchable; only their location display degrades.
    pub fn audit(&self) -> Vec<String> {
        let locations = self.location_hierarchy();
        let categories = self.category_hierarchy();

        self.properties
            .iter()
            .filter(|property| {
                let town_ok = match (&property.town_id, &property.city_id) {
                    (Some(town), Some(city)) => locations.child_belongs_to(town, city),
                    (Some(_), None) => false,
                    (None, _) => true,
                };
                let sub_ok = match (&property.sub_category_id, &property.category_id) {
                    (Some(sub), Some(category)) => categories.child_belongs_to(sub, category),
                    (Some(_), None) => false,
                    (None, _) => true,
                };
                if !town_ok {
                    tracing::warn!(
                        "Property {} has town {:?} outside of city {:?}",
                        property.id,
                        property.town_id,
                        property.city_id
                    );
                }
                if !sub_ok {
                    tracing::warn!(
                        "Property {} has subcategory {:?} outside of category {:?}",
                        property.id,
                        property.sub_category_id,
                        property.category_id
                    );
                }
                !(town_ok && sub_ok)
            })
            .map(|property| property.id.clone())
            .collect()
    }
}

/// Reads and parses a snapshot file.
pub async fn load_snapshot(path: &Path) -> CoreResult<Snapshot> {
    let json = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| CoreError::Io(e, path.to_path_buf()))?;
    let snapshot = Snapshot::from_json_str(&json)?;
    tracing::info!(
        "Loaded snapshot from {:?}: {} properties, {} cities, {} towns, {} categories, {} subcategories",
        path,
        snapshot.properties.len(),
        snapshot.cities.len(),
        snapshot.towns.len(),
        snapshot.categories.len(),
        snapshot.subcategories.len()
    );
    Ok(snapshot)
}
