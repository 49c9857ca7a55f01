//! Defines the event and message structures exchanged with the host UI.

use serde::Deserialize;

use super::view_model::SearchView;

/// Events sent from the search controller to the host.
#[derive(Debug, Clone)]
pub enum UserEvent {
    /// A complete view update to re-render the search page.
    StateUpdate(Box<SearchView>),
    /// Replace the current history entry with this URL.
    Navigate(String),
    /// An error message to be displayed to the user.
    ShowError(String),
}

/// A message received from the host UI.
#[derive(Deserialize, Debug)]
pub struct IpcMessage {
    /// The name of the command to execute.
    pub command: String,
    /// The payload associated with the command, as a JSON value.
    #[serde(default)]
    pub payload: serde_json::Value,
}
