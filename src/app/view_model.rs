//! Responsible for transforming the `SearchState` into a `SearchView`.
//!
//! This module acts as a presentation layer: it resolves ids to titles, formats
//! prices and builds the chips, breadcrumb and cards that the host renders.
//! It never mutates the state.

use serde::Serialize;

use super::presenter::{ActiveFilterChip, ActiveFilterPresenter};
use super::state::{SearchPhase, SearchState};
use crate::core::search::FEATURED_TAG;
use crate::core::{Filters, ListingType, Property, SortChoice, SortOption};
use crate::utils::format::format_thousands;

/// Heading shown when no location or category narrows the search.
const DEFAULT_TITLE: &str = "Properties";

/// A serializable representation of the search page.
#[derive(Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SearchView {
    pub url: String,
    pub phase: SearchPhase,
    pub filters: Filters,
    pub sort: SortOption,
    pub sort_options: Vec<SortChoice>,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub total_count: usize,
    pub cards: Vec<ListingCard>,
    pub chips: Vec<ActiveFilterChip>,
    pub breadcrumb: Breadcrumb,
    /// Label of the location picker button, e.g. `"Harare > Avondale"`.
    pub location_label: Option<String>,
    /// Label of the category picker button.
    pub category_label: Option<String>,
    pub has_active_filters: bool,
    pub is_empty: bool,
}

/// The results heading, e.g. `"Avondale"` with `12` results.
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Breadcrumb {
    pub title: String,
    pub result_count: usize,
}

/// A serializable representation of a single listing in the results grid.
#[derive(Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ListingCard {
    #[serde(flatten)]
    pub property: Property,
    /// `"Avondale, Harare"`, or just the city when the town is inconsistent.
    pub location: Option<String>,
    pub price_label: Option<String>,
    pub category_title: Option<String>,
    pub is_featured: bool,
}

/// Creates the complete `SearchView` from the current `SearchState`.
pub fn generate_view(state: &SearchState) -> SearchView {
    let context = &state.context;
    let presenter = ActiveFilterPresenter::new(
        &context.locations,
        &context.categories,
        &state.config.currency_symbol,
    );
    let filters = &state.filters;

    let cards = state
        .results
        .items
        .iter()
        .map(|property| build_card(state, property))
        .collect();

    SearchView {
        url: state.url.clone(),
        phase: state.phase,
        filters: filters.clone(),
        sort: state.sort,
        sort_options: SortOption::choices(),
        page: state.results.page,
        page_size: state.results.page_size,
        total_pages: state.results.total_pages,
        total_count: state.results.total_count,
        cards,
        chips: presenter.chips(filters),
        breadcrumb: Breadcrumb {
            title: breadcrumb_title(state),
            result_count: state.results.total_count,
        },
        location_label: context
            .locations
            .path_label(filters.city_id.as_deref(), filters.town_id.as_deref()),
        category_label: context.categories.path_label(
            filters.category_id.as_deref(),
            filters.sub_category_id.as_deref(),
        ),
        has_active_filters: !filters.is_empty(),
        is_empty: state.results.is_empty(),
    }
}

/// Builds the card for one listing.
pub fn build_card(state: &SearchState, property: &Property) -> ListingCard {
    let context = &state.context;
    ListingCard {
        location: context
            .locations
            .place_label(property.city_id.as_deref(), property.town_id.as_deref()),
        price_label: price_label(property, &state.config.currency_symbol),
        category_title: property
            .category_id
            .as_deref()
            .and_then(|id| context.categories.find_parent(id))
            .map(|category| category.title.clone()),
        is_featured: property.has_tag(FEATURED_TAG),
        property: property.clone(),
    }
}

/// Rentals show the monthly rent; everything else shows the sale price, with
/// the rent as a fallback when no sale price is known.
fn price_label(property: &Property, currency_symbol: &str) -> Option<String> {
    let rent = property
        .rent_price
        .map(|rent| format!("{}{} / month", currency_symbol, format_thousands(rent)));
    let sale = property
        .sale_price
        .map(|sale| format!("{}{}", currency_symbol, format_thousands(sale)));
    match property.listing_type {
        Some(ListingType::Rent) => rent.or(sale),
        _ => sale.or(rent),
    }
}

/// The most specific selected place or category, most specific first.
fn breadcrumb_title(state: &SearchState) -> String {
    let filters = &state.filters;
    let context = &state.context;
    let present = |value: &Option<String>| value.clone().filter(|v| !v.is_empty());

    present(&filters.town_id)
        .map(|id| context.locations.child_label(&id))
        .or_else(|| present(&filters.city_id).map(|id| context.locations.parent_label(&id)))
        .or_else(|| {
            present(&filters.sub_category_id).map(|id| context.categories.child_label(&id))
        })
        .or_else(|| present(&filters.category_id).map(|id| context.categories.parent_label(&id)))
        .unwrap_or_else(|| DEFAULT_TITLE.to_string())
}
