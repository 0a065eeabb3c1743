//! Host-side controller.
//!
//! Listens for document notifications and panel requests, talks to the
//! document through the [`DocumentHost`] seam, and emits [`HostEvent`]s
//! back at the panel. One instance per open panel; everything runs on its
//! `run` loop, so document access is never concurrent.

use tokio::sync::mpsc;

use pixelize_api::{FillDescriptor, HostEvent, SelectionSnapshot, UiRequest, decode_request};

use crate::HostError;
use crate::document::{Bounds, DocumentHost, HostNotification, ShapeSnapshot};

/// Raster export scale. The panel fits exports back onto the shape's
/// logical size before filtering.
pub const EXPORT_SCALE: f64 = 2.0;

/// Name given to uploaded rasters in the host media library.
pub const UPLOAD_NAME: &str = "exported-image";
const PNG_MIME: &str = "image/png";

// User-facing failure strings, surfaced verbatim in the panel.
pub const EXPORT_FAILED: &str = "Failed to process selection. The image might be too complex.";
pub const UPLOAD_FAILED: &str = "Failed to upload image. The file might be too large.";
pub const CREATE_LAYER_FAILED: &str = "Failed to create new layer. Please try again.";
pub const UPDATE_FILL_FAILED: &str = "Failed to update image fill. Please try again.";

/// The document-side half of the plugin.
pub struct HostController<H: DocumentHost> {
    host: H,
    event_tx: mpsc::UnboundedSender<HostEvent>,
}

impl<H: DocumentHost> HostController<H> {
    /// Create a controller and the channel its events arrive on.
    pub fn new(host: H) -> (Self, mpsc::UnboundedReceiver<HostEvent>) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        (Self { host, event_tx }, event_rx)
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Emit an event to the panel.
    fn emit(&self, event: HostEvent) {
        let _ = self.event_tx.send(event);
    }

    /// Drive the controller from its two inputs until either closes.
    pub async fn run(
        mut self,
        mut notifications: mpsc::UnboundedReceiver<HostNotification>,
        mut requests: mpsc::UnboundedReceiver<UiRequest>,
    ) {
        loop {
            tokio::select! {
                notification = notifications.recv() => match notification {
                    Some(HostNotification::SelectionChanged) => {
                        self.handle_selection_change().await;
                    }
                    Some(HostNotification::ThemeChanged(theme)) => {
                        self.handle_theme_change(theme);
                    }
                    None => break,
                },
                request = requests.recv() => match request {
                    Some(request) => self.handle_request(request).await,
                    None => break,
                },
            }
        }
    }

    // =========================================================================
    // Document notifications
    // =========================================================================

    /// Forward a document theme change.
    pub fn handle_theme_change(&mut self, theme: String) {
        self.emit(HostEvent::Theme { content: theme });
    }

    /// Announce the new selection and, when it has a concrete fill list,
    /// export its raster.
    ///
    /// The event order is fixed: `selection-loading(true)`, `selection`,
    /// then `selection-loaded` or `export-error`, then
    /// `selection-loading(false)`. The trailing `false` goes out on every
    /// path that sent the `true`.
    pub async fn handle_selection_change(&mut self) {
        let Some(shape) = self.host.selection() else {
            self.emit(HostEvent::Selection { content: None });
            return;
        };

        self.emit(HostEvent::SelectionLoading { is_loading: true });
        self.emit(HostEvent::Selection {
            content: Some(SelectionSnapshot {
                id: shape.id.clone(),
                name: shape.name.clone(),
                fills: shape.fills.clone(),
            }),
        });

        // Mixed fills cannot be pixelated, so there is nothing to export.
        if shape.fills.as_uniform().is_some() {
            match self.host.export_png(&shape.id, EXPORT_SCALE).await {
                Ok(bytes) => self.emit(HostEvent::SelectionLoaded {
                    image_data: bytes,
                    width: shape.width.round() as u32,
                    height: shape.height.round() as u32,
                    selection_id: shape.id.clone(),
                }),
                Err(err) => {
                    tracing::error!("Selection export failed for {}: {}", shape.id, err);
                    self.emit(HostEvent::ExportError {
                        error: EXPORT_FAILED.to_string(),
                    });
                }
            }
        }

        self.emit(HostEvent::SelectionLoading { is_loading: false });
    }

    // =========================================================================
    // Panel requests
    // =========================================================================

    /// Handle one request from the panel. Requests arriving with nothing
    /// selected are dropped.
    pub async fn handle_request(&mut self, request: UiRequest) {
        let Some(shape) = self.host.selection() else {
            tracing::debug!("Dropping panel request, nothing is selected");
            return;
        };

        match request {
            UiRequest::UpdateImageFill {
                image_data,
                original_fill,
                should_delete_first,
                add_new_layer,
            } => {
                if add_new_layer {
                    self.add_new_layer(&shape, &image_data, &original_fill).await;
                } else {
                    self.update_existing_layer(
                        &shape,
                        &image_data,
                        &original_fill,
                        should_delete_first,
                    )
                    .await;
                }
            }
            UiRequest::DeleteTopLayer => self.delete_top_layer(&shape),
        }
    }

    /// Decode and handle a raw wire request. Malformed or unknown payloads
    /// are logged and dropped, never fatal.
    pub async fn handle_wire_request(&mut self, raw: &str) {
        match decode_request(raw) {
            Ok(request) => self.handle_request(request).await,
            Err(err) => tracing::warn!("Ignoring wire request: {}", err),
        }
    }

    /// Upload the raster and stack it onto the selection's background fill.
    /// The result is always two fills at most: the new image on top, the
    /// previous bottom fill underneath. `should_delete_first` rides along
    /// in the protocol but both values produce that same list.
    async fn update_existing_layer(
        &mut self,
        shape: &ShapeSnapshot,
        image_data: &[u8],
        template: &FillDescriptor,
        _should_delete_first: bool,
    ) {
        let media = match self.host.upload_media(UPLOAD_NAME, image_data, PNG_MIME).await {
            Ok(media) => media,
            Err(err) => {
                tracing::error!("Fill upload failed for {}: {}", shape.id, err);
                self.emit(HostEvent::ExportError {
                    error: UPLOAD_FAILED.to_string(),
                });
                return;
            }
        };
        let image_fill = template.with_image(media);

        let fills = match shape.fills.last() {
            Some(background) => vec![image_fill, background.clone()],
            None => vec![image_fill],
        };
        match self.host.set_fills(&shape.id, fills) {
            Ok(()) => self.emit(HostEvent::FillUploadComplete),
            Err(err) => {
                tracing::error!("Fill update failed for {}: {}", shape.id, err);
                self.emit(HostEvent::ExportError {
                    error: UPDATE_FILL_FAILED.to_string(),
                });
            }
        }
    }

    /// Upload the raster and create a rectangle at the viewport center
    /// carrying it as the sole fill. The upload and the creation form one
    /// undo step.
    async fn add_new_layer(
        &mut self,
        shape: &ShapeSnapshot,
        image_data: &[u8],
        template: &FillDescriptor,
    ) {
        let block = self.host.undo_block_begin();
        let result = self.create_pixelated_layer(shape, image_data, template).await;
        self.host.undo_block_finish(block);

        match result {
            Ok(()) => self.emit(HostEvent::FillUploadComplete),
            Err(err) => {
                tracing::error!("New layer failed for {}: {}", shape.id, err);
                let error = match err {
                    HostError::UploadFailed(_) => UPLOAD_FAILED,
                    _ => CREATE_LAYER_FAILED,
                };
                self.emit(HostEvent::ExportError {
                    error: error.to_string(),
                });
            }
        }
    }

    async fn create_pixelated_layer(
        &mut self,
        shape: &ShapeSnapshot,
        image_data: &[u8],
        template: &FillDescriptor,
    ) -> Result<(), HostError> {
        let media = self.host.upload_media(UPLOAD_NAME, image_data, PNG_MIME).await?;
        let image_fill = template.with_image(media);

        let (x, y) = self.host.viewport_center();
        self.host.create_rectangle(
            Bounds {
                x,
                y,
                width: shape.width,
                height: shape.height,
            },
            vec![image_fill],
        )?;
        Ok(())
    }

    /// Drop the selection's top fill, as one undo step. Needs at least two
    /// fills so the shape never loses its last one.
    fn delete_top_layer(&mut self, shape: &ShapeSnapshot) {
        let Some(fills) = shape.fills.as_uniform() else {
            return;
        };
        if fills.len() < 2 {
            return;
        }
        let remaining = fills[1..].to_vec();

        let block = self.host.undo_block_begin();
        if let Err(err) = self.host.set_fills(&shape.id, remaining) {
            tracing::error!("Top layer delete failed for {}: {}", shape.id, err);
        }
        self.host.undo_block_finish(block);
    }
}
