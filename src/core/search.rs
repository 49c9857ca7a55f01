//! Provides the filter, sort and paginate pipeline over a property collection.

use rayon::prelude::*;
use serde::Serialize;

use super::filters::Filters;
use super::sort::SortOption;
use super::Property;

/// Number of listings shown per results page unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Tag that marks a listing for the home page carousel.
pub const FEATURED_TAG: &str = "featured";

/// One page of search results.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultPage {
    pub items: Vec<Property>,
    /// Number of properties matching the filters, across all pages.
    pub total_count: usize,
    pub total_pages: usize,
    pub page: usize,
    pub page_size: usize,
}

impl ResultPage {
    pub fn is_empty(&self) -> bool {
        self.total_count == 0
    }
}

/// A utility struct for searching the property collection.
///
/// This struct is stateless and provides methods as associated functions.
/// Every function is pure: the same inputs always give the same output.
pub struct SearchEngine;

impl SearchEngine {
    /// Runs the whole pipeline: filter, then stable sort, then slice out `page`.
    pub fn run(
        properties: &[Property],
        filters: &Filters,
        sort: SortOption,
        page: usize,
        page_size: usize,
    ) -> ResultPage {
        let mut matches = Self::filter_properties(properties, filters);
        Self::sort_properties(&mut matches, sort);
        Self::paginate(&matches, page, page_size)
    }

    /// Keeps the properties that satisfy every present filter, in input order.
    pub fn filter_properties(properties: &[Property], filters: &Filters) -> Vec<Property> {
        properties
            .par_iter()
            .filter(|property| Self::matches_filter(property, filters))
            .cloned()
            .collect()
    }

    /// Checks a single property against the filters (logical AND).
    ///
    /// The price bounds are checked against `rent_price` only, so a listing
    /// without a rent price never passes a price filter.
    pub fn matches_filter(property: &Property, filters: &Filters) -> bool {
        if let Some(listing_type) = filters.listing_type {
            if property.listing_type != Some(listing_type) {
                return false;
            }
        }

        let id_checks = [
            (&filters.city_id, &property.city_id),
            (&filters.town_id, &property.town_id),
            (&filters.category_id, &property.category_id),
            (&filters.sub_category_id, &property.sub_category_id),
        ];
        for (wanted, actual) in id_checks {
            if let Some(wanted) = wanted.as_deref().filter(|v| !v.is_empty()) {
                if actual.as_deref() != Some(wanted) {
                    return false;
                }
            }
        }

        if !at_least(property.rent_price, filters.min_price)
            || !at_most(property.rent_price, filters.max_price)
            || !at_least(property.beds, filters.beds)
            || !at_least(property.baths, filters.baths)
        {
            return false;
        }

        if let Some(size) = filters.size {
            if !at_least(property.size, size.min) || !at_most(property.size, size.max) {
                return false;
            }
        }

        match filters.search_term.as_deref() {
            Some(term) if !term.is_empty() => Self::matches_search_term(property, term),
            _ => true,
        }
    }

    /// Case-insensitive substring match over the listing's text fields.
    fn matches_search_term(property: &Property, term: &str) -> bool {
        let term = term.to_lowercase();
        [
            &property.title,
            &property.description,
            &property.property_code,
            &property.address,
        ]
        .into_iter()
        .flatten()
        .any(|text| text.to_lowercase().contains(&term))
    }

    /// Stable sort: properties that compare equal keep their input order.
    pub fn sort_properties(properties: &mut [Property], sort: SortOption) {
        properties.sort_by(|a, b| sort.compare(a, b));
    }

    /// Slices `[(page-1)*page_size, page*page_size)` out of the sorted matches.
    ///
    /// Pages are one-based; page 0 is treated as page 1. A page past the end
    /// is empty but still reports the totals.
    pub fn paginate(sorted: &[Property], page: usize, page_size: usize) -> ResultPage {
        let page = page.max(1);
        let page_size = page_size.max(1);
        let start = (page - 1).saturating_mul(page_size).min(sorted.len());
        let end = start.saturating_add(page_size).min(sorted.len());

        ResultPage {
            items: sorted[start..end].to_vec(),
            total_count: sorted.len(),
            total_pages: Self::total_pages(sorted.len(), page_size),
            page,
            page_size,
        }
    }

    pub fn total_pages(total: usize, page_size: usize) -> usize {
        total.div_ceil(page_size.max(1))
    }

    /// Listings tagged as featured, oldest first, at most `limit` of them.
    pub fn featured(properties: &[Property], limit: usize) -> Vec<Property> {
        let mut featured: Vec<Property> = properties
            .iter()
            .filter(|property| property.has_tag(FEATURED_TAG))
            .cloned()
            .collect();
        Self::sort_properties(&mut featured, SortOption::DateAsc);
        featured.truncate(limit);
        featured
    }
}

/// `true` when there is no bound, or the value exists and is `>= bound`.
fn at_least(value: Option<f64>, bound: Option<f64>) -> bool {
    match bound {
        None => true,
        Some(bound) => value.is_some_and(|v| v >= bound),
    }
}

/// `true` when there is no bound, or the value exists and is `<= bound`.
fn at_most(value: Option<f64>, bound: Option<f64>) -> bool {
    match bound {
        None => true,
        Some(bound) => value.is_some_and(|v| v <= bound),
    }
}
