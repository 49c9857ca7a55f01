//! Contains helper functions to reduce boilerplate code in other `app` modules.

use super::events::UserEvent;
use super::filtering;
use super::proxy::EventProxy;
use super::state::{SearchPhase, SearchState};
use super::view_model::generate_view;

/// Which URL a mutation navigates to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// The base path followed by the encoded query.
    Query,
    /// The bare base path, used when the search is reset.
    BasePath,
}

/// Runs one state transition and notifies the host.
///
/// The phase is `Mutating` while `update_fn` runs. Afterwards the results are
/// recomputed, the new URL is sent as a `Navigate` event and the full view as
/// a `StateUpdate` event, and the phase returns to `Idle`.
pub fn with_state_and_notify<F, P: EventProxy>(state: &mut SearchState, proxy: &P, update_fn: F)
where
    F: FnOnce(&mut SearchState) -> Navigation,
{
    state.phase = SearchPhase::Mutating;

    // Execute the specific mutation logic
    let navigation = update_fn(state);

    filtering::apply_filters(state);
    state.url = match navigation {
        Navigation::Query => state.config.codec().href(&state.config.base_path, &state.query()),
        Navigation::BasePath => state.config.base_path.clone(),
    };
    proxy.send_event(UserEvent::Navigate(state.url.clone()));

    state.phase = SearchPhase::Idle;

    // Generate the new view and send the event
    let view = generate_view(state);
    proxy.send_event(UserEvent::StateUpdate(Box::new(view)));
}
