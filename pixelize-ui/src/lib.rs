//! Pixelize UI - The panel-side controller of the plugin.
//!
//! This crate contains the panel's state and behavior, with no rendering:
//! - `SelectionStore`: the single source of truth for what the panel shows
//! - `Panel` + `update`: message-driven controller with debounced previews
//! - `PanelMessage`: host events, user intents, and loopback completions

pub mod constants;
pub mod controller;
pub mod msg;
pub mod store;

pub use controller::{Panel, dispatch_wire_event, run, update};
pub use msg::PanelMessage;
pub use store::{FillUpdate, SelectionStore};
