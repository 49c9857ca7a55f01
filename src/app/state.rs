//! Defines the mutable state of one search page.

use serde::Serialize;

use crate::config::SearchConfig;
use crate::core::{
    CategoryHierarchy, Filters, LocationHierarchy, Property, ResultPage, SearchQuery, Snapshot,
    SortOption,
};

use super::filtering;

/// Where the controller is in its update cycle.
///
/// Every mutation goes `Idle -> Mutating -> Idle` within a single call; the
/// state is only observable from outside while `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SearchPhase {
    Idle,
    Mutating,
}

/// The immutable collections a search page works on.
#[derive(Debug, Clone, Default)]
pub struct SearchContext {
    pub properties: Vec<Property>,
    pub locations: LocationHierarchy,
    pub categories: CategoryHierarchy,
}

impl SearchContext {
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        let locations = snapshot.location_hierarchy();
        let categories = snapshot.category_hierarchy();
        Self {
            properties: snapshot.properties,
            locations,
            categories,
        }
    }
}

/// Holds the complete state of a search page.
#[derive(Debug, Clone)]
pub struct SearchState {
    /// The search settings.
    pub config: SearchConfig,
    /// The properties and hierarchy indexes.
    pub context: SearchContext,
    /// The current filters, always normalized.
    pub filters: Filters,
    /// The current ordering.
    pub sort: SortOption,
    /// The current one-based page.
    pub page: usize,
    /// Listings per page, from the URL's `limit` or the configuration.
    pub page_size: usize,
    pub phase: SearchPhase,
    /// The visible page of results for the current filters, sort and page.
    pub results: ResultPage,
    /// The URL that reflects the current state.
    pub url: String,
}

impl SearchState {
    /// Builds the state for a page opened with `query`, computing its results.
    pub fn new(config: SearchConfig, context: SearchContext, query: SearchQuery) -> Self {
        let codec = config.codec();
        let url = codec.href(&config.base_path, &query);
        let mut state = Self {
            config,
            context,
            filters: query.filters.validated().normalized(),
            sort: query.sort,
            page: query.page.max(1),
            page_size: query.limit.max(1),
            phase: SearchPhase::Idle,
            results: ResultPage {
                items: Vec::new(),
                total_count: 0,
                total_pages: 0,
                page: 1,
                page_size: query.limit.max(1),
            },
            url,
        };
        filtering::apply_filters(&mut state);
        state
    }

    /// The query that describes the current state.
    pub fn query(&self) -> SearchQuery {
        SearchQuery {
            filters: self.filters.clone(),
            sort: self.sort,
            page: self.page,
            limit: self.page_size,
        }
    }

    /// Empties the filters and restores the default sort, first page and page size.
    pub fn reset_search(&mut self) {
        self.filters = Filters::default();
        self.sort = self.config.default_sort;
        self.page = 1;
        self.page_size = self.config.page_size.max(1);
    }
}
