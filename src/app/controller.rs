//! The search page controller.
//!
//! Owns the `SearchState` and exposes one method per user interaction. Each
//! method runs a full transition through `with_state_and_notify`, so the URL,
//! the results and the view the host sees never diverge.

use super::events::UserEvent;
use super::helpers::{with_state_and_notify, Navigation};
use super::presenter::ActiveFilterPresenter;
use super::proxy::EventProxy;
use super::state::{SearchContext, SearchState};
use super::view_model::{build_card, generate_view, ListingCard, SearchView};
use crate::config::SearchConfig;
use crate::core::{FilterKey, Filters, SearchEngine, SearchQuery, SortOption};

pub struct SearchController<P: EventProxy> {
    state: SearchState,
    proxy: P,
}

impl<P: EventProxy> SearchController<P> {
    /// Creates a controller for a page opened with `query`.
    ///
    /// No events are sent until the first interaction or `refresh`.
    pub fn new(config: SearchConfig, context: SearchContext, query: SearchQuery, proxy: P) -> Self {
        Self {
            state: SearchState::new(config, context, query),
            proxy,
        }
    }

    /// Creates a controller from the raw query string of the page URL.
    pub fn from_query_string(
        config: SearchConfig,
        context: SearchContext,
        query_string: &str,
        proxy: P,
    ) -> Self {
        let query = config.codec().decode(query_string);
        Self::new(config, context, query, proxy)
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    pub fn view(&self) -> SearchView {
        generate_view(&self.state)
    }

    /// The URL that reflects the current state.
    pub fn url(&self) -> &str {
        &self.state.url
    }

    /// Sends the current view without changing anything.
    pub fn refresh(&self) {
        self.proxy
            .send_event(UserEvent::StateUpdate(Box::new(self.view())));
    }

    pub fn show_error(&self, message: impl Into<String>) {
        self.proxy.send_event(UserEvent::ShowError(message.into()));
    }

    /// Merges `patch` into the current filters and returns to the first page.
    ///
    /// Fields set in the patch overwrite the current ones; an empty string
    /// clears a text field. Negative or non-finite amounts are ignored and
    /// leave the current value in place. A changed city or category drops a
    /// town or subcategory that does not belong to it.
    pub fn set_filter(&mut self, patch: &Filters) {
        tracing::info!("Setting filters: {:?}", patch);
        let patch = patch.clone().validated();
        with_state_and_notify(&mut self.state, &self.proxy, |s| {
            let next = s.filters.merged(&patch);
            s.filters =
                Filters::reconcile(&s.filters, next, &s.context.locations, &s.context.categories);
            s.page = 1;
            Navigation::Query
        });
    }

    pub fn set_sort(&mut self, sort: SortOption) {
        tracing::info!("Sorting by {}", sort.as_str());
        with_state_and_notify(&mut self.state, &self.proxy, |s| {
            s.sort = sort;
            s.page = 1;
            Navigation::Query
        });
    }

    /// Moves to `page`. Page numbers start at 1; `0` is treated as 1.
    pub fn set_page(&mut self, page: usize) {
        tracing::info!("Moving to page {}", page);
        with_state_and_notify(&mut self.state, &self.proxy, |s| {
            s.page = page.max(1);
            Navigation::Query
        });
    }

    /// Drops every filter and restores the default sort. Navigates to the bare
    /// base path.
    pub fn clear_all(&mut self) {
        tracing::info!("Clearing all filters");
        with_state_and_notify(&mut self.state, &self.proxy, |s| {
            s.reset_search();
            Navigation::BasePath
        });
    }

    /// Removes one active filter chip, together with its dependent child filter.
    pub fn remove_filter(&mut self, key: FilterKey) {
        tracing::info!("Removing filter {}", key);
        with_state_and_notify(&mut self.state, &self.proxy, |s| {
            let presenter = ActiveFilterPresenter::new(
                &s.context.locations,
                &s.context.categories,
                &s.config.currency_symbol,
            );
            s.filters = presenter.remove(&s.filters, key);
            s.page = 1;
            Navigation::Query
        });
    }

    /// Filters by town from the side panel. A known town also selects its city.
    /// An empty id clears the town.
    pub fn select_town(&mut self, town_id: &str) {
        let city_id = self
            .state
            .context
            .locations
            .find_child(town_id)
            .map(|town| town.city_id.clone());
        if city_id.is_none() && !town_id.is_empty() {
            tracing::warn!("Selecting unknown town {:?}", town_id);
        }
        self.set_filter(&Filters {
            city_id,
            town_id: Some(town_id.to_string()),
            ..Default::default()
        });
    }

    /// Applies a choice from the location picker: a city, optionally narrowed to
    /// one of its towns. An empty city id clears both.
    pub fn select_location(&mut self, city_id: &str, town_id: Option<&str>) {
        self.set_filter(&Filters {
            city_id: Some(city_id.to_string()),
            town_id: Some(town_id.unwrap_or_default().to_string()),
            ..Default::default()
        });
    }

    /// Applies a choice from the category picker and clears the subcategory.
    pub fn select_category(&mut self, category_id: &str) {
        self.set_filter(&Filters {
            category_id: Some(category_id.to_string()),
            sub_category_id: Some(String::new()),
            ..Default::default()
        });
    }

    /// Cards for the featured listings carousel.
    pub fn featured(&self) -> Vec<ListingCard> {
        SearchEngine::featured(
            &self.state.context.properties,
            self.state.config.featured_limit,
        )
        .iter()
        .map(|property| build_card(&self.state, property))
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::state::SearchPhase;
    use crate::core::{City, Hierarchy, ListingType, Property, Town};
    use chrono::{Duration, TimeZone, Utc};
    use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

    fn create_controller() -> (
        SearchController<UnboundedSender<UserEvent>>,
        UnboundedReceiver<UserEvent>,
    ) {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let properties = (0..3)
            .map(|i| {
                let mut property = Property::new(format!("p{}", i), base + Duration::days(i));
                property.listing_type = Some(ListingType::Rent);
                property.city_id = Some("harare".into());
                property
            })
            .collect();
        let context = SearchContext {
            properties,
            locations: Hierarchy::new(
                vec![City { id: "harare".into(), title: "Harare".into(), slug: None }],
                vec![Town {
                    id: "avondale".into(),
                    title: "Avondale".into(),
                    slug: None,
                    city_id: "harare".into(),
                }],
            ),
            ..Default::default()
        };
        let (tx, rx) = mpsc::unbounded_channel();
        let controller =
            SearchController::from_query_string(SearchConfig::default(), context, "", tx);
        (controller, rx)
    }

    #[test]
    fn test_new_sends_nothing() {
        let (controller, mut rx) = create_controller();
        assert!(rx.try_recv().is_err());
        assert_eq!(controller.url(), "/search?sort=date-desc");
        assert_eq!(controller.state().phase, SearchPhase::Idle);
    }

    #[test]
    fn test_transition_emits_navigate_then_view() {
        let (mut controller, mut rx) = create_controller();
        controller.set_sort(SortOption::DateAsc);

        match rx.try_recv() {
            Ok(UserEvent::Navigate(url)) => assert_eq!(url, "/search?sort=date-asc"),
            other => panic!("expected Navigate, got {:?}", other),
        }
        match rx.try_recv() {
            Ok(UserEvent::StateUpdate(view)) => {
                assert_eq!(view.phase, SearchPhase::Idle);
                assert_eq!(view.cards[0].property.id, "p0");
            }
            other => panic!("expected StateUpdate, got {:?}", other),
        }
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_select_town_sets_city() {
        let (mut controller, _rx) = create_controller();
        controller.select_town("avondale");

        let filters = &controller.state().filters;
        assert_eq!(filters.city_id.as_deref(), Some("harare"));
        assert_eq!(filters.town_id.as_deref(), Some("avondale"));
    }

    #[test]
    fn test_select_category_clears_subcategory() {
        let (mut controller, _rx) = create_controller();
        controller.set_filter(&Filters {
            category_id: Some("residential".into()),
            sub_category_id: Some("cottage".into()),
            ..Default::default()
        });
        controller.select_category("commercial");

        let filters = &controller.state().filters;
        assert_eq!(filters.category_id.as_deref(), Some("commercial"));
        assert_eq!(filters.sub_category_id, None);
    }

    #[test]
    fn test_set_page_clamps_to_one() {
        let (mut controller, _rx) = create_controller();
        controller.set_page(0);
        assert_eq!(controller.state().page, 1);
        assert_eq!(controller.url(), "/search?sort=date-desc");
    }

    #[test]
    fn test_refresh_sends_view_only() {
        let (controller, mut rx) = create_controller();
        controller.refresh();
        assert!(matches!(rx.try_recv(), Ok(UserEvent::StateUpdate(_))));
        assert!(rx.try_recv().is_err());
    }
}
