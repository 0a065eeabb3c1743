//! Pixelize API - Shared types and message protocol between the document
//! host and the plugin panel.
//!
//! Both controller crates depend on this one; it carries no behavior beyond
//! validation and (de)serialization:
//! - Selection identity and snapshots
//! - Fill descriptors (including the "mixed" sentinel)
//! - Encoded raster buffers and the pixel-size bounds
//! - The tagged message envelopes for each direction

mod fill;
mod message;
mod raster;
mod selection;

pub use fill::*;
pub use message::*;
pub use raster::*;
pub use selection::*;
