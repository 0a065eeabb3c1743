//! Panel messages.
//!
//! One closed enum covers everything that can happen to the panel: events
//! from the host controller, user intents, and the loopback completions
//! posted by spawned work.

use pixelize_api::{HostEvent, PixelSize, RasterBuffer, ShapeId};
use pixelize_filter::FilterError;

#[derive(Debug, Clone)]
pub enum PanelMessage {
    /// An event from the host-side controller.
    Host(HostEvent),

    /// The user moved the block size input.
    PreviewRequested(PixelSize),

    /// The user asked to apply the pixelation to the document.
    CommitRequested { size: PixelSize, add_new_layer: bool },

    /// The user asked to remove the top pixelated fill.
    DeleteTopLayerRequested,

    /// A preview debounce timer fired.
    PreviewDebounced { seq: u64 },

    /// A spawned preview filter run finished.
    PreviewFiltered {
        id: ShapeId,
        size: PixelSize,
        result: Result<RasterBuffer, FilterError>,
    },

    /// A spawned commit filter run finished.
    CommitFiltered {
        id: ShapeId,
        size: PixelSize,
        add_new_layer: bool,
        result: Result<RasterBuffer, FilterError>,
    },
}
