//! Panel controller.
//!
//! Message-driven: [`update`] applies one [`PanelMessage`] to the [`Panel`]
//! and is the only place the store is mutated. Filter work runs in spawned
//! tasks whose results re-enter `update` through the loopback channel; the
//! store's id checks discard anything that outlived its selection.

use tokio::sync::mpsc;

use pixelize_api::{HostEvent, PixelSize, RasterBuffer, ShapeId, UiRequest, decode_event};
use pixelize_filter::FilterError;

use crate::constants::PREVIEW_DEBOUNCE;
use crate::msg::PanelMessage;
use crate::store::SelectionStore;

/// The panel-side half of the plugin.
pub struct Panel {
    /// Selection state; mutated only through its named operations.
    pub selection: SelectionStore,
    theme: Option<String>,
    /// Latest preview request. Debounce timers carry the sequence they were
    /// armed for; only the newest one runs.
    preview_seq: u64,
    pending_preview: Option<(ShapeId, PixelSize)>,
    msg_tx: mpsc::UnboundedSender<PanelMessage>,
    request_tx: mpsc::UnboundedSender<UiRequest>,
}

impl Panel {
    /// Create a panel and the loopback channel its spawned work reports to.
    pub fn new(
        request_tx: mpsc::UnboundedSender<UiRequest>,
    ) -> (Self, mpsc::UnboundedReceiver<PanelMessage>) {
        let (msg_tx, msg_rx) = mpsc::unbounded_channel();
        let panel = Self {
            selection: SelectionStore::new(),
            theme: None,
            preview_seq: 0,
            pending_preview: None,
            msg_tx,
            request_tx,
        };
        (panel, msg_rx)
    }

    /// The host application theme, once one was reported.
    pub fn theme(&self) -> Option<&str> {
        self.theme.as_deref()
    }

    /// A handle for posting messages onto the panel's loop. The embedding
    /// layer sends user intents through this.
    pub fn sender(&self) -> mpsc::UnboundedSender<PanelMessage> {
        self.msg_tx.clone()
    }

    /// Send a request to the host-side controller.
    fn send_request(&self, request: UiRequest) {
        let _ = self.request_tx.send(request);
    }
}

/// Apply one message to the panel.
pub fn update(panel: &mut Panel, msg: PanelMessage) {
    match msg {
        PanelMessage::Host(event) => handle_host_event(panel, event),
        PanelMessage::PreviewRequested(size) => request_preview(panel, size),
        PanelMessage::CommitRequested {
            size,
            add_new_layer,
        } => request_commit(panel, size, add_new_layer),
        PanelMessage::DeleteTopLayerRequested => request_delete_top_layer(panel),
        PanelMessage::PreviewDebounced { seq } => run_preview(panel, seq),
        PanelMessage::PreviewFiltered { id, size, result } => {
            finish_preview(panel, id, size, result);
        }
        PanelMessage::CommitFiltered {
            id,
            size,
            add_new_layer,
            result,
        } => finish_commit(panel, id, size, add_new_layer, result),
    }
}

/// Decode a raw wire event and apply it. Malformed or unknown payloads are
/// logged and dropped, never fatal.
pub fn dispatch_wire_event(panel: &mut Panel, raw: &str) {
    match decode_event(raw) {
        Ok(event) => update(panel, PanelMessage::Host(event)),
        Err(err) => tracing::warn!("Ignoring wire event: {}", err),
    }
}

/// Drive the panel from its loopback and host channels. Exits when the
/// host event stream closes, returning the panel in its final state.
pub async fn run(
    mut panel: Panel,
    mut messages: mpsc::UnboundedReceiver<PanelMessage>,
    mut host_events: mpsc::UnboundedReceiver<HostEvent>,
) -> Panel {
    loop {
        tokio::select! {
            Some(msg) = messages.recv() => update(&mut panel, msg),
            event = host_events.recv() => match event {
                Some(event) => update(&mut panel, PanelMessage::Host(event)),
                None => break,
            },
        }
    }
    panel
}

// =============================================================================
// Host events
// =============================================================================

fn handle_host_event(panel: &mut Panel, event: HostEvent) {
    match event {
        HostEvent::Theme { content } => panel.theme = Some(content),
        HostEvent::Selection {
            content: Some(snapshot),
        } => {
            panel
                .selection
                .set_selection(snapshot.id, snapshot.name, snapshot.fills);
        }
        HostEvent::Selection { content: None } => panel.selection.reset_selection(),
        HostEvent::SelectionLoading { is_loading } => panel.selection.set_loading(is_loading),
        HostEvent::SelectionLoaded {
            image_data,
            width,
            height,
            selection_id,
        } => {
            let raster = RasterBuffer::new(image_data, width, height);
            if !panel.selection.receive_export(&selection_id, raster) {
                tracing::debug!("Discarding stale export for {}", selection_id);
            }
        }
        HostEvent::FillUploadComplete => panel.selection.receive_upload_complete(),
        HostEvent::ExportError { error } => {
            tracing::error!("Host reported: {}", error);
            panel.selection.receive_error(error);
        }
    }
}

// =============================================================================
// Preview
// =============================================================================

/// Arm a debounce timer for the requested block size. The spinner turns on
/// and the stale preview disappears immediately; the filter only runs once
/// the input rests for [`PREVIEW_DEBOUNCE`].
fn request_preview(panel: &mut Panel, size: PixelSize) {
    let Some(id) = panel.selection.begin_preview() else {
        tracing::debug!("Preview request with nothing to pixelate");
        return;
    };

    panel.preview_seq += 1;
    let seq = panel.preview_seq;
    panel.pending_preview = Some((id, size));

    let tx = panel.msg_tx.clone();
    tokio::spawn(async move {
        tokio::time::sleep(PREVIEW_DEBOUNCE).await;
        let _ = tx.send(PanelMessage::PreviewDebounced { seq });
    });
}

/// A debounce timer fired. Only the newest timer for a still-current
/// selection starts filter work.
fn run_preview(panel: &mut Panel, seq: u64) {
    if seq != panel.preview_seq {
        tracing::debug!("Dropping superseded preview timer {}", seq);
        return;
    }
    let Some((requested_id, size)) = panel.pending_preview.take() else {
        return;
    };
    let Some((id, raster)) = panel.selection.preview_job() else {
        return;
    };
    if id != requested_id {
        // The selection changed inside the debounce window; the new one
        // arms its own timer.
        return;
    }

    let tx = panel.msg_tx.clone();
    tokio::spawn(async move {
        let result = pixelize_filter::process(&raster, size);
        let _ = tx.send(PanelMessage::PreviewFiltered { id, size, result });
    });
}

fn finish_preview(
    panel: &mut Panel,
    id: ShapeId,
    size: PixelSize,
    result: Result<RasterBuffer, FilterError>,
) {
    match result {
        Ok(raster) => {
            if !panel.selection.accept_preview(&id, size, raster) {
                tracing::debug!("Discarding stale preview for {}", id);
            }
        }
        Err(err) => {
            tracing::error!("Preview filter failed for {}: {}", id, err);
            panel.selection.fail_preview(&id);
        }
    }
}

// =============================================================================
// Commit
// =============================================================================

fn request_commit(panel: &mut Panel, size: PixelSize, add_new_layer: bool) {
    let Some((id, raster)) = panel.selection.begin_commit() else {
        tracing::debug!("Commit request with nothing to pixelate");
        return;
    };

    let tx = panel.msg_tx.clone();
    tokio::spawn(async move {
        let result = pixelize_filter::process(&raster, size);
        let _ = tx.send(PanelMessage::CommitFiltered {
            id,
            size,
            add_new_layer,
            result,
        });
    });
}

fn finish_commit(
    panel: &mut Panel,
    id: ShapeId,
    size: PixelSize,
    add_new_layer: bool,
    result: Result<RasterBuffer, FilterError>,
) {
    let raster = match result {
        Ok(raster) => raster,
        Err(err) => {
            tracing::error!("Commit filter failed for {}: {}", id, err);
            panel.selection.fail_commit(&id);
            return;
        }
    };

    let Some(update) = panel.selection.accept_commit(&id, size, raster, add_new_layer) else {
        tracing::debug!("Discarding stale commit for {}", id);
        return;
    };
    panel.send_request(UiRequest::UpdateImageFill {
        image_data: update.image_data,
        original_fill: update.original_fill,
        should_delete_first: update.should_delete_first,
        add_new_layer,
    });
}

// =============================================================================
// Layer management
// =============================================================================

/// Ask the host to drop the top fill. Only offered when a pixelated layer
/// sits on a background fill, so the gate mirrors that.
fn request_delete_top_layer(panel: &mut Panel) {
    if panel.selection.layer_count() < 2 {
        tracing::debug!("Ignoring top layer delete with fewer than two fills");
        return;
    }
    panel.send_request(UiRequest::DeleteTopLayer);
}
