//! Selection state store.
//!
//! The single source of truth for what the panel shows. Every mutation goes
//! through a named operation; the asynchronous orchestration around them
//! (debounce, spawned filter runs) lives in the controller.
//!
//! Staleness discipline: an operation started for one selection must never
//! touch the state of another. Each `begin_*` hands out the live id, and
//! each `accept_*`/`fail_*` compares that id against the current one,
//! discarding the result on mismatch.

use pixelize_api::{FillDescriptor, Fills, PixelSize, RasterBuffer, ShapeId};

/// Outbound payload computed by an accepted commit.
#[derive(Debug, Clone, PartialEq)]
pub struct FillUpdate {
    pub image_data: Vec<u8>,
    pub original_fill: FillDescriptor,
    pub should_delete_first: bool,
}

/// Everything the panel knows about the current selection.
///
/// Three raster buffers with distinct roles: `original_image` is the
/// untouched host export and the only filter input, `exported_image`
/// mirrors what the document is believed to show, `preview_image` is the
/// latest filter output for display.
#[derive(Debug, Default)]
pub struct SelectionStore {
    id: Option<ShapeId>,
    name: Option<String>,
    fills: Option<Fills>,
    original_image: Option<RasterBuffer>,
    exported_image: Option<RasterBuffer>,
    preview_image: Option<RasterBuffer>,
    pixel_size: PixelSize,
    is_loading: bool,
    is_preview_loading: bool,
    is_pixelizing: bool,
    is_uploading_fill: bool,
    error: Option<String>,
}

impl SelectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Reads
    // =========================================================================

    pub fn id(&self) -> Option<&ShapeId> {
        self.id.as_ref()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn fills(&self) -> Option<&Fills> {
        self.fills.as_ref()
    }

    /// Number of fill layers on the selection; zero when there is no
    /// selection or its fills are mixed.
    pub fn layer_count(&self) -> usize {
        self.fills.as_ref().map_or(0, Fills::layer_count)
    }

    /// Whether the selection can be pixelated at all.
    pub fn is_processable(&self) -> bool {
        self.fills.as_ref().is_some_and(Fills::is_processable)
    }

    pub fn original_image(&self) -> Option<&RasterBuffer> {
        self.original_image.as_ref()
    }

    pub fn exported_image(&self) -> Option<&RasterBuffer> {
        self.exported_image.as_ref()
    }

    pub fn preview_image(&self) -> Option<&RasterBuffer> {
        self.preview_image.as_ref()
    }

    pub fn pixel_size(&self) -> PixelSize {
        self.pixel_size
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn is_preview_loading(&self) -> bool {
        self.is_preview_loading
    }

    pub fn is_pixelizing(&self) -> bool {
        self.is_pixelizing
    }

    pub fn is_uploading_fill(&self) -> bool {
        self.is_uploading_fill
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    // =========================================================================
    // Selection lifecycle
    // =========================================================================

    /// Clear to the no-selection defaults, dropping any buffered rasters.
    pub fn reset_selection(&mut self) {
        *self = Self::default();
    }

    /// Install a new selection identity. Every buffer, flag, and error left
    /// over from the previous selection is dropped, so a new selection can
    /// never show a stale preview or export.
    pub fn set_selection(&mut self, id: ShapeId, name: String, fills: Fills) {
        *self = Self {
            id: Some(id),
            name: Some(name),
            fills: Some(fills),
            ..Self::default()
        };
    }

    /// Mirror the host's export progress flag.
    pub fn set_loading(&mut self, is_loading: bool) {
        self.is_loading = is_loading;
    }

    /// Accept a finished host export if it still belongs to the current
    /// selection and that selection can be pixelated. Returns `false` for
    /// stale or unusable exports, which leave the store untouched.
    pub fn receive_export(&mut self, id: &ShapeId, raster: RasterBuffer) -> bool {
        if self.id.as_ref() != Some(id) || !self.is_processable() {
            return false;
        }
        self.original_image = Some(raster.clone());
        self.exported_image = Some(raster);
        self.is_loading = false;
        true
    }

    // =========================================================================
    // Preview
    // =========================================================================

    /// Start a preview run. Flags the work, drops the prior preview right
    /// away so a block size the user moved off of is never shown, and
    /// returns the id the eventual result must be checked against. `None`
    /// when there is nothing to preview.
    pub fn begin_preview(&mut self) -> Option<ShapeId> {
        if self.original_image.is_none() || !self.is_processable() {
            return None;
        }
        let id = self.id.clone()?;
        self.is_preview_loading = true;
        self.preview_image = None;
        Some(id)
    }

    /// The filter input for a preview run, captured at debounce expiry.
    pub fn preview_job(&self) -> Option<(ShapeId, RasterBuffer)> {
        if !self.is_processable() {
            return None;
        }
        let id = self.id.clone()?;
        let raster = self.original_image.clone()?;
        Some((id, raster))
    }

    /// Store a finished preview if the selection still matches. A stale
    /// result mutates nothing; its flag belongs to whichever newer
    /// operation follows.
    pub fn accept_preview(&mut self, id: &ShapeId, size: PixelSize, raster: RasterBuffer) -> bool {
        if self.id.as_ref() != Some(id) {
            return false;
        }
        self.preview_image = Some(raster);
        self.pixel_size = size;
        self.is_preview_loading = false;
        true
    }

    /// Clear the preview flag after a failed run, if still live. The
    /// preview stays unset.
    pub fn fail_preview(&mut self, id: &ShapeId) {
        if self.id.as_ref() == Some(id) {
            self.is_preview_loading = false;
        }
    }

    // =========================================================================
    // Commit
    // =========================================================================

    /// Start a commit run: flags the work and captures the filter input.
    /// The input is always the untouched original export, so repeated
    /// commits never re-pixelate already pixelated data.
    pub fn begin_commit(&mut self) -> Option<(ShapeId, RasterBuffer)> {
        if !self.is_processable() {
            return None;
        }
        let id = self.id.clone()?;
        let raster = self.original_image.clone()?;
        self.is_pixelizing = true;
        Some((id, raster))
    }

    /// Finish a commit: mirror the processed raster locally for immediate
    /// feedback and build the outbound fill update. `None` when the result
    /// is stale, in which case nothing is mutated.
    pub fn accept_commit(
        &mut self,
        id: &ShapeId,
        size: PixelSize,
        raster: RasterBuffer,
        add_new_layer: bool,
    ) -> Option<FillUpdate> {
        if self.id.as_ref() != Some(id) {
            return None;
        }
        let fills = self.fills.as_ref()?;
        let original_fill = fills.last()?.clone();
        let should_delete_first = !add_new_layer && fills.layer_count() >= 2;

        self.is_uploading_fill = true;
        self.is_pixelizing = false;
        self.exported_image = Some(raster.clone());
        self.pixel_size = size;

        Some(FillUpdate {
            image_data: raster.bytes,
            original_fill,
            should_delete_first,
        })
    }

    /// Clear the commit flag after a failed run, if still live.
    pub fn fail_commit(&mut self, id: &ShapeId) {
        if self.id.as_ref() == Some(id) {
            self.is_pixelizing = false;
        }
    }

    // =========================================================================
    // Host completions
    // =========================================================================

    /// The host finished applying an uploaded fill.
    pub fn receive_upload_complete(&mut self) {
        self.is_uploading_fill = false;
    }

    /// Record a host-reported failure. The string is shown to the user as
    /// is.
    pub fn receive_error(&mut self, message: String) {
        self.is_loading = false;
        self.error = Some(message);
    }
}
