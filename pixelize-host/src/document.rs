//! The capability seam onto the host document.
//!
//! The production binding lives inside the host application; this crate
//! only ever sees the operations below. [`crate::MemoryHost`] implements
//! them in memory for tests and headless simulation.

use async_trait::async_trait;

use pixelize_api::{FillDescriptor, Fills, MediaRef, ShapeId};

use crate::HostError;

/// What the controller reads off the currently selected shape.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeSnapshot {
    pub id: ShapeId,
    pub name: String,
    /// Logical size in document units. Raster exports are scaled up from
    /// this; wire messages carry it rounded to whole pixels.
    pub width: f64,
    pub height: f64,
    pub fills: Fills,
}

/// Placement of a newly created shape, in document units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Token pairing an `undo_block_begin` with its `undo_block_finish`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UndoBlockId(pub u64);

/// Document happenings the controller subscribes to.
#[derive(Debug, Clone, PartialEq)]
pub enum HostNotification {
    SelectionChanged,
    ThemeChanged(String),
}

/// Operations the plugin needs from the hosting application.
///
/// Synchronous methods mirror host calls that complete inline; export and
/// upload go through the host's asynchronous pipeline.
#[async_trait]
pub trait DocumentHost: Send {
    /// The selected shape, if exactly one object is selected.
    fn selection(&self) -> Option<ShapeSnapshot>;

    /// Export the shape as an encoded PNG at `scale` times its logical size.
    async fn export_png(&mut self, id: &ShapeId, scale: f64) -> Result<Vec<u8>, HostError>;

    /// Upload encoded image bytes to the host media library.
    async fn upload_media(
        &mut self,
        name: &str,
        bytes: &[u8],
        mime: &str,
    ) -> Result<MediaRef, HostError>;

    /// Replace the shape's fill list, top fill first.
    fn set_fills(&mut self, id: &ShapeId, fills: Vec<FillDescriptor>) -> Result<(), HostError>;

    /// Create a rectangle at `bounds` with the given fills.
    fn create_rectangle(
        &mut self,
        bounds: Bounds,
        fills: Vec<FillDescriptor>,
    ) -> Result<ShapeId, HostError>;

    /// Center of the user's viewport, in document units.
    fn viewport_center(&self) -> (f64, f64);

    /// Open an undo block. Every begin must be paired with a finish.
    fn undo_block_begin(&mut self) -> UndoBlockId;

    /// Close an undo block opened by [`Self::undo_block_begin`].
    fn undo_block_finish(&mut self, block: UndoBlockId);
}
