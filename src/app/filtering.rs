//! This module is responsible for recomputing the visible results of a
//! `SearchState` after its filters, sort or page have changed.
//!
//! It is the only place that writes `SearchState::results`, which keeps state
//! mutation separate from presentation (see `view_model`).

use super::state::SearchState;
use crate::core::SearchEngine;

/// Applies the current filters, sort and page to the full property list.
pub fn apply_filters(state: &mut SearchState) {
    state.results = SearchEngine::run(
        &state.context.properties,
        &state.filters,
        state.sort,
        state.page,
        state.page_size,
    );
    tracing::debug!(
        "Recomputed results: {} matches, page {}/{}",
        state.results.total_count,
        state.results.page,
        state.results.total_pages
    );
}
