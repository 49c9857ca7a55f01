//! The closed set of search constraints and the cascade rule that keeps the
//! child filters (town, subcategory) consistent with their parents.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::hierarchy::{Hierarchy, HierarchyNode};
use super::{CategoryHierarchy, ListingType, LocationHierarchy};

/// An inclusive size bound in square metres. Either side may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SizeRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

impl SizeRange {
    pub fn is_empty(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }
}

/// Names one field of [`Filters`]. The serialized form is the query-string key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterKey {
    ListingType,
    CityId,
    TownId,
    CategoryId,
    SubCategoryId,
    MinPrice,
    MaxPrice,
    Beds,
    Baths,
    Size,
    SearchTerm,
}

impl FilterKey {
    /// Every key, in display and encoding order.
    pub const ALL: [FilterKey; 11] = [
        FilterKey::ListingType,
        FilterKey::CityId,
        FilterKey::TownId,
        FilterKey::CategoryId,
        FilterKey::SubCategoryId,
        FilterKey::MinPrice,
        FilterKey::MaxPrice,
        FilterKey::Beds,
        FilterKey::Baths,
        FilterKey::Size,
        FilterKey::SearchTerm,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterKey::ListingType => "listingType",
            FilterKey::CityId => "cityId",
            FilterKey::TownId => "townId",
            FilterKey::CategoryId => "categoryId",
            FilterKey::SubCategoryId => "subCategoryId",
            FilterKey::MinPrice => "minPrice",
            FilterKey::MaxPrice => "maxPrice",
            FilterKey::Beds => "beds",
            FilterKey::Baths => "baths",
            FilterKey::Size => "size",
            FilterKey::SearchTerm => "searchTerm",
        }
    }

    pub fn parse(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == key)
    }
}

impl fmt::Display for FilterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The user's current search constraints. Every field is optional.
///
/// A field counts as present when it is `Some`, and additionally non-empty for
/// text fields and bounded on at least one side for `size`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Filters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub listing_type: Option<ListingType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub town_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_category_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub beds: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baths: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<SizeRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_term: Option<String>,
}

/// Prices, room counts and sizes must be finite and non-negative.
pub fn is_valid_amount(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

fn valid_amount(key: FilterKey, value: Option<f64>) -> Option<f64> {
    match value {
        Some(v) if !is_valid_amount(v) => {
            tracing::warn!("Ignoring filter `{}`: {} is not a valid amount", key, v);
            None
        }
        other => other,
    }
}

fn present_text(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.is_empty())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl Filters {
    pub fn is_present(&self, key: FilterKey) -> bool {
        match key {
            FilterKey::ListingType => self.listing_type.is_some(),
            FilterKey::CityId => present_text(&self.city_id),
            FilterKey::TownId => present_text(&self.town_id),
            FilterKey::CategoryId => present_text(&self.category_id),
            FilterKey::SubCategoryId => present_text(&self.sub_category_id),
            FilterKey::MinPrice => self.min_price.is_some(),
            FilterKey::MaxPrice => self.max_price.is_some(),
            FilterKey::Beds => self.beds.is_some(),
            FilterKey::Baths => self.baths.is_some(),
            FilterKey::Size => self.size.is_some_and(|s| !s.is_empty()),
            FilterKey::SearchTerm => present_text(&self.search_term),
        }
    }

    /// The present keys in display order.
    pub fn present_keys(&self) -> Vec<FilterKey> {
        FilterKey::ALL
            .into_iter()
            .filter(|&key| self.is_present(key))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.present_keys().is_empty()
    }

    /// Replaces every non-present value with `None`.
    pub fn normalized(self) -> Self {
        Self {
            listing_type: self.listing_type,
            city_id: non_empty(self.city_id),
            town_id: non_empty(self.town_id),
            category_id: non_empty(self.category_id),
            sub_category_id: non_empty(self.sub_category_id),
            min_price: self.min_price,
            max_price: self.max_price,
            beds: self.beds,
            baths: self.baths,
            size: self.size.filter(|s| !s.is_empty()),
            search_term: non_empty(self.search_term),
        }
    }

    /// Drops numeric bounds the query-string decoder would reject, so the
    /// filters survive a trip through the URL unchanged. Text fields are left
    /// as they are, empty strings included.
    pub fn validated(self) -> Self {
        // An unbounded range clears the size; one emptied here is dropped instead.
        let size = self.size.and_then(|range| {
            if range.is_empty() {
                return Some(range);
            }
            let checked = SizeRange {
                min: valid_amount(FilterKey::Size, range.min),
                max: valid_amount(FilterKey::Size, range.max),
            };
            (!checked.is_empty()).then_some(checked)
        });
        Self {
            min_price: valid_amount(FilterKey::MinPrice, self.min_price),
            max_price: valid_amount(FilterKey::MaxPrice, self.max_price),
            beds: valid_amount(FilterKey::Beds, self.beds),
            baths: valid_amount(FilterKey::Baths, self.baths),
            size,
            ..self
        }
    }

    /// Clears a single field without applying the cascade.
    pub fn clear(&mut self, key: FilterKey) {
        match key {
            FilterKey::ListingType => self.listing_type = None,
            FilterKey::CityId => self.city_id = None,
            FilterKey::TownId => self.town_id = None,
            FilterKey::CategoryId => self.category_id = None,
            FilterKey::SubCategoryId => self.sub_category_id = None,
            FilterKey::MinPrice => self.min_price = None,
            FilterKey::MaxPrice => self.max_price = None,
            FilterKey::Beds => self.beds = None,
            FilterKey::Baths => self.baths = None,
            FilterKey::Size => self.size = None,
            FilterKey::SearchTerm => self.search_term = None,
        }
    }

    /// Overlays `patch` on a copy of `self`.
    ///
    /// Fields set in the patch win. A patch field holding an empty string (or an
    /// unbounded size range) clears the field.
    pub fn merged(&self, patch: &Filters) -> Filters {
        fn overlay<T: Clone>(current: &Option<T>, patch: &Option<T>) -> Option<T> {
            patch.clone().or_else(|| current.clone())
        }

        Filters {
            listing_type: overlay(&self.listing_type, &patch.listing_type),
            city_id: overlay(&self.city_id, &patch.city_id),
            town_id: overlay(&self.town_id, &patch.town_id),
            category_id: overlay(&self.category_id, &patch.category_id),
            sub_category_id: overlay(&self.sub_category_id, &patch.sub_category_id),
            min_price: overlay(&self.min_price, &patch.min_price),
            max_price: overlay(&self.max_price, &patch.max_price),
            beds: overlay(&self.beds, &patch.beds),
            baths: overlay(&self.baths, &patch.baths),
            size: overlay(&self.size, &patch.size),
            search_term: overlay(&self.search_term, &patch.search_term),
        }
        .normalized()
    }

    /// Applies the cascade rule to the transition `previous -> next`.
    ///
    /// When the city changes (or is removed) the town survives only if it is a
    /// known town of the new city; the same holds for category and subcategory.
    pub fn reconcile(
        previous: &Filters,
        next: Filters,
        locations: &LocationHierarchy,
        categories: &CategoryHierarchy,
    ) -> Filters {
        let mut next = next.normalized();
        reconcile_child(
            previous.city_id.as_deref().filter(|v| !v.is_empty()),
            next.city_id.as_deref(),
            &mut next.town_id,
            locations,
        );
        reconcile_child(
            previous.category_id.as_deref().filter(|v| !v.is_empty()),
            next.category_id.as_deref(),
            &mut next.sub_category_id,
            categories,
        );
        next
    }

    /// Removes `key` and cascades to its dependent child filter.
    pub fn without(
        &self,
        key: FilterKey,
        locations: &LocationHierarchy,
        categories: &CategoryHierarchy,
    ) -> Filters {
        let mut next = self.clone();
        next.clear(key);
        Filters::reconcile(self, next, locations, categories)
    }
}

fn reconcile_child<P: HierarchyNode, C: HierarchyNode>(
    previous_parent: Option<&str>,
    next_parent: Option<&str>,
    child: &mut Option<String>,
    index: &Hierarchy<P, C>,
) {
    if previous_parent == next_parent {
        return;
    }
    let keep = match (next_parent, child.as_deref()) {
        (Some(parent), Some(id)) => index.child_belongs_to(id, parent),
        _ => false,
    };
    if !keep {
        if let Some(cleared) = child.take() {
            tracing::debug!(
                "Parent filter changed from {:?} to {:?}, clearing child filter {:?}",
                previous_parent,
                next_parent,
                cleared
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Category, City, SubCategory, Town};
    use tracing_test::traced_test;

    fn hierarchies() -> (LocationHierarchy, CategoryHierarchy) {
        let locations = Hierarchy::new(
            vec![
                City { id: "harare".into(), title: "Harare".into(), slug: None },
                City { id: "bulawayo".into(), title: "Bulawayo".into(), slug: None },
            ],
            vec![Town {
                id: "avondale".into(),
                title: "Avondale".into(),
                slug: None,
                city_id: "harare".into(),
            }],
        );
        let categories = Hierarchy::new(
            vec![
                Category { id: "residential".into(), title: "Residential".into(), slug: None },
                Category { id: "commercial".into(), title: "Commercial".into(), slug: None },
            ],
            vec![SubCategory {
                id: "cottage".into(),
                title: "Cottage".into(),
                slug: None,
                category_id: "residential".into(),
            }],
        );
        (locations, categories)
    }

    #[test]
    fn test_presence_rule() {
        let filters = Filters {
            city_id: Some(String::new()),
            size: Some(SizeRange::default()),
            beds: Some(0.0),
            ..Default::default()
        };
        assert_eq!(filters.present_keys(), vec![FilterKey::Beds]);
        assert!(!Filters::default().is_present(FilterKey::Size));
    }

    #[test]
    fn test_merged_overrides_and_clears() {
        let current = Filters {
            city_id: Some("harare".into()),
            beds: Some(2.0),
            ..Default::default()
        };
        let patch = Filters {
            city_id: Some(String::new()),
            baths: Some(1.0),
            ..Default::default()
        };
        let merged = current.merged(&patch);
        assert_eq!(merged.city_id, None);
        assert_eq!(merged.beds, Some(2.0));
        assert_eq!(merged.baths, Some(1.0));
    }

    #[test]
    fn test_changing_city_clears_town() {
        let (locations, categories) = hierarchies();
        let previous = Filters {
            city_id: Some("harare".into()),
            town_id: Some("avondale".into()),
            ..Default::default()
        };
        let next = previous.merged(&Filters {
            city_id: Some("bulawayo".into()),
            ..Default::default()
        });
        let reconciled = Filters::reconcile(&previous, next, &locations, &categories);
        assert_eq!(reconciled.city_id.as_deref(), Some("bulawayo"));
        assert_eq!(reconciled.town_id, None);
    }

    #[test]
    fn test_town_kept_when_it_belongs_to_new_city() {
        let (locations, categories) = hierarchies();
        let previous = Filters::default();
        let next = Filters {
            city_id: Some("harare".into()),
            town_id: Some("avondale".into()),
            ..Default::default()
        };
        let reconciled = Filters::reconcile(&previous, next.clone(), &locations, &categories);
        assert_eq!(reconciled, next);
    }

    #[test]
    fn test_unchanged_parent_leaves_child_alone() {
        let (locations, categories) = hierarchies();
        let previous = Filters {
            category_id: Some("commercial".into()),
            ..Default::default()
        };
        let next = previous.merged(&Filters {
            sub_category_id: Some("cottage".into()),
            ..Default::default()
        });
        let reconciled = Filters::reconcile(&previous, next, &locations, &categories);
        assert_eq!(reconciled.sub_category_id.as_deref(), Some("cottage"));
    }

    #[test]
    fn test_without_cascades() {
        let (locations, categories) = hierarchies();
        let filters = Filters {
            city_id: Some("harare".into()),
            town_id: Some("avondale".into()),
            category_id: Some("residential".into()),
            sub_category_id: Some("cottage".into()),
            ..Default::default()
        };

        let no_city = filters.without(FilterKey::CityId, &locations, &categories);
        assert_eq!(no_city.town_id, None);
        assert_eq!(no_city.sub_category_id.as_deref(), Some("cottage"));

        let no_category = filters.without(FilterKey::CategoryId, &locations, &categories);
        assert_eq!(no_category.sub_category_id, None);
        assert_eq!(no_category.town_id.as_deref(), Some("avondale"));

        let no_town = filters.without(FilterKey::TownId, &locations, &categories);
        assert_eq!(no_town.city_id.as_deref(), Some("harare"));
        assert_eq!(no_town.town_id, None);
    }

    #[test]
    fn test_filter_key_round_trips_through_its_name() {
        for key in FilterKey::ALL {
            assert_eq!(FilterKey::parse(key.as_str()), Some(key));
            let json = serde_json::to_string(&key).unwrap();
            assert_eq!(json, format!("\"{}\"", key.as_str()));
        }
        assert_eq!(FilterKey::parse("amenities"), None);
    }

    #[test]
    #[traced_test]
    fn test_validated_drops_negative_amounts() {
        let filters = Filters {
            city_id: Some("harare".into()),
            min_price: Some(100.0),
            max_price: Some(-1.0),
            beds: Some(-2.0),
            size: Some(SizeRange {
                min: Some(-5.0),
                max: Some(120.0),
            }),
            ..Default::default()
        }
        .validated();

        assert_eq!(filters.min_price, Some(100.0));
        assert_eq!(filters.max_price, None);
        assert_eq!(filters.beds, None);
        assert_eq!(filters.size, Some(SizeRange { min: None, max: Some(120.0) }));
        assert_eq!(filters.city_id.as_deref(), Some("harare"));
        assert!(logs_contain("Ignoring filter `maxPrice`: -1 is not a valid amount"));
    }

    #[test]
    fn test_validated_removes_emptied_size() {
        let filters = Filters {
            size: Some(SizeRange {
                min: Some(-1.0),
                max: None,
            }),
            ..Default::default()
        }
        .validated();
        assert_eq!(filters, Filters::default());
    }

    #[test]
    fn test_validated_keeps_clearing_strings() {
        let patch = Filters {
            sub_category_id: Some(String::new()),
            size: Some(SizeRange::default()),
            ..Default::default()
        }
        .validated();
        assert_eq!(patch.sub_category_id.as_deref(), Some(""));
        assert_eq!(patch.size, Some(SizeRange::default()));
    }
}
