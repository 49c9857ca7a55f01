//! Contains the command handlers that are callable from the host UI via IPC.
//!
//! Each handler corresponds to a specific `IpcMessage::command`. Handlers
//! deserialize their payload and forward to the `SearchController`, which
//! sends the resulting `UserEvent`s back to the host.

use serde::Deserialize;
use serde_json::Value;

use super::controller::SearchController;
use super::events::IpcMessage;
use super::proxy::EventProxy;
use crate::core::{FilterKey, Filters, SortOption};

#[derive(Deserialize, Debug)]
struct SortPayload {
    sort: SortOption,
}

#[derive(Deserialize, Debug)]
struct PagePayload {
    page: usize,
}

#[derive(Deserialize, Debug)]
struct RemoveFilterPayload {
    key: FilterKey,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct SelectTownPayload {
    town_id: String,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct SelectLocationPayload {
    city_id: String,
    #[serde(default)]
    town_id: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct SelectCategoryPayload {
    category_id: String,
}

/// Parses a raw IPC message and dispatches it to the matching handler.
pub fn handle_ipc_message<P: EventProxy>(message: &str, controller: &mut SearchController<P>) {
    let message = match serde_json::from_str::<IpcMessage>(message) {
        Ok(message) => message,
        Err(e) => {
            tracing::warn!("Failed to parse IPC message {:?}: {}", message, e);
            controller.show_error(format!("Invalid message: {}", e));
            return;
        }
    };

    tracing::debug!("IPC command: {}", message.command);
    match message.command.as_str() {
        "setFilter" => set_filter(message.payload, controller),
        "setSort" => set_sort(message.payload, controller),
        "setPage" => set_page(message.payload, controller),
        "clearAll" => controller.clear_all(),
        "removeFilter" => remove_filter(message.payload, controller),
        "selectTown" => select_town(message.payload, controller),
        "selectLocation" => select_location(message.payload, controller),
        "selectCategory" => select_category(message.payload, controller),
        "refresh" => controller.refresh(),
        unknown => {
            tracing::warn!("Unknown IPC command: {}", unknown);
            controller.show_error(format!("Unknown command: {}", unknown));
        }
    }
}

/// Deserializes `payload`, or reports the failure to the log and the host.
fn parse_payload<T, P>(command: &str, payload: Value, controller: &SearchController<P>) -> Option<T>
where
    T: serde::de::DeserializeOwned,
    P: EventProxy,
{
    match serde_json::from_value::<T>(payload.clone()) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(
                "Failed to deserialize {} payload {:?}: {}",
                command,
                payload,
                e
            );
            controller.show_error(format!("Invalid {} payload: {}", command, e));
            None
        }
    }
}

pub fn set_filter<P: EventProxy>(payload: Value, controller: &mut SearchController<P>) {
    if let Some(patch) = parse_payload::<Filters, _>("setFilter", payload, controller) {
        controller.set_filter(&patch);
    }
}

pub fn set_sort<P: EventProxy>(payload: Value, controller: &mut SearchController<P>) {
    if let Some(p) = parse_payload::<SortPayload, _>("setSort", payload, controller) {
        controller.set_sort(p.sort);
    }
}

pub fn set_page<P: EventProxy>(payload: Value, controller: &mut SearchController<P>) {
    if let Some(p) = parse_payload::<PagePayload, _>("setPage", payload, controller) {
        controller.set_page(p.page);
    }
}

pub fn remove_filter<P: EventProxy>(payload: Value, controller: &mut SearchController<P>) {
    if let Some(p) = parse_payload::<RemoveFilterPayload, _>("removeFilter", payload, controller) {
        controller.remove_filter(p.key);
    }
}

pub fn select_town<P: EventProxy>(payload: Value, controller: &mut SearchController<P>) {
    if let Some(p) = parse_payload::<SelectTownPayload, _>("selectTown", payload, controller) {
        controller.select_town(&p.town_id);
    }
}

pub fn select_location<P: EventProxy>(payload: Value, controller: &mut SearchController<P>) {
    if let Some(p) = parse_payload::<SelectLocationPayload, _>("selectLocation", payload, controller)
    {
        controller.select_location(&p.city_id, p.town_id.as_deref());
    }
}

pub fn select_category<P: EventProxy>(payload: Value, controller: &mut SearchController<P>) {
    if let Some(p) = parse_payload::<SelectCategoryPayload, _>("selectCategory", payload, controller)
    {
        controller.select_category(&p.category_id);
    }
}
