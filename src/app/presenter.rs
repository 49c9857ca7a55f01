//! Turns the active filters into removable, human-readable chips.

use serde::Serialize;

use crate::core::{CategoryHierarchy, FilterKey, Filters, ListingType, LocationHierarchy};
use crate::utils::format::{format_plain, format_thousands};

/// One removable token shown above the results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActiveFilterChip {
    pub key: FilterKey,
    pub label: String,
}

/// Resolves filter ids to titles and formats chip labels.
pub struct ActiveFilterPresenter<'a> {
    locations: &'a LocationHierarchy,
    categories: &'a CategoryHierarchy,
    currency_symbol: &'a str,
}

impl<'a> ActiveFilterPresenter<'a> {
    pub fn new(
        locations: &'a LocationHierarchy,
        categories: &'a CategoryHierarchy,
        currency_symbol: &'a str,
    ) -> Self {
        Self {
            locations,
            categories,
            currency_symbol,
        }
    }

    /// One chip per present filter, in field order.
    pub fn chips(&self, filters: &Filters) -> Vec<ActiveFilterChip> {
        filters
            .present_keys()
            .into_iter()
            .filter_map(|key| {
                self.label(filters, key)
                    .map(|label| ActiveFilterChip { key, label })
            })
            .collect()
    }

    /// The chip label for `key`, or `None` when the field is not present.
    pub fn label(&self, filters: &Filters, key: FilterKey) -> Option<String> {
        if !filters.is_present(key) {
            return None;
        }
        let label = match key {
            FilterKey::CategoryId => format!(
                "Category: {}",
                self.categories.parent_label(filters.category_id.as_deref()?)
            ),
            FilterKey::SubCategoryId => format!(
                "SubCategory: {}",
                self.categories.child_label(filters.sub_category_id.as_deref()?)
            ),
            FilterKey::CityId => format!(
                "City: {}",
                self.locations.parent_label(filters.city_id.as_deref()?)
            ),
            FilterKey::TownId => format!(
                "Town: {}",
                self.locations.child_label(filters.town_id.as_deref()?)
            ),
            FilterKey::ListingType => format!("Type: {}", listing_type_label(filters.listing_type?)),
            FilterKey::MinPrice => format!(
                "Min {}{}",
                self.currency_symbol,
                format_thousands(filters.min_price?)
            ),
            FilterKey::MaxPrice => format!(
                "Max {}{}",
                self.currency_symbol,
                format_thousands(filters.max_price?)
            ),
            FilterKey::Beds => format!("{}+ beds", format_plain(filters.beds?)),
            FilterKey::Baths => format!("{}+ baths", format_plain(filters.baths?)),
            FilterKey::Size => {
                let size = filters.size?;
                match (size.min, size.max) {
                    (Some(min), Some(max)) => {
                        format!("{} - {} sqm", format_plain(min), format_plain(max))
                    }
                    (Some(min), None) => format!("Min {} sqm", format_plain(min)),
                    (None, Some(max)) => format!("Max {} sqm", format_plain(max)),
                    (None, None) => return None,
                }
            }
            FilterKey::SearchTerm => {
                format!("SearchTerm: {}", filters.search_term.as_deref()?)
            }
        };
        Some(label)
    }

    /// Removes `key` from the filters, clearing a town with its city and a
    /// subcategory with its category.
    pub fn remove(&self, filters: &Filters, key: FilterKey) -> Filters {
        filters.without(key, self.locations, self.categories)
    }
}

/// `RENT` becomes `Rent`.
fn listing_type_label(listing_type: ListingType) -> String {
    let raw = listing_type.as_str();
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
