//! Pixelize Host - The document-side controller of the plugin.
//!
//! This crate runs next to the host document and bridges it to the panel:
//! - `DocumentHost`: the capability seam onto the document API
//! - `HostController`: selection/theme fan-out and panel request handling
//! - `MemoryHost`: in-memory document for tests and headless runs

pub mod controller;
pub mod document;
pub mod memory;

mod error;

pub use controller::{EXPORT_SCALE, HostController};
pub use document::{Bounds, DocumentHost, HostNotification, ShapeSnapshot, UndoBlockId};
pub use error::HostError;
pub use memory::{MediaUpload, MemoryHost, MemoryShape};
