//! The search page application layer: state, controller, IPC commands and
//! the view model sent to the host UI.

pub mod commands;
pub mod controller;
pub mod events;
pub mod filtering;
pub mod helpers;
pub mod presenter;
pub mod proxy;
pub mod state;
pub mod view_model;

pub use commands::handle_ipc_message;
pub use controller::SearchController;
