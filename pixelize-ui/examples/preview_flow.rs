//! Headless walkthrough of the plugin loop.
//!
//! Wires the host controller to the panel over in-process channels, selects
//! a shape, previews two block sizes, and commits the second one. Run with
//! `RUST_LOG=debug cargo run --example preview_flow` to watch the traffic.

use std::time::Duration;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use pixelize_api::{FillDescriptor, Fills, PixelSize};
use pixelize_filter::PixelGrid;
use pixelize_filter::codec::encode_png;
use pixelize_host::{HostController, HostNotification, MemoryHost};
use pixelize_ui::{Panel, PanelMessage, run};

/// A 12x8 gradient PNG standing in for the host's 2x export of a 6x4 shape.
fn sample_export() -> Vec<u8> {
    let (width, height) = (12u32, 8u32);
    let mut data = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        for x in 0..width {
            data.extend_from_slice(&[(x * 20) as u8, (y * 30) as u8, 160, 255]);
        }
    }
    encode_png(&PixelGrid::new(data, width, height)).expect("encode sample")
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut host = MemoryHost::new();
    host.set_viewport_center(120.0, 80.0);
    let shape = host.insert_shape(
        "Sample photo",
        6.0,
        4.0,
        Fills::Uniform(vec![FillDescriptor {
            fill_color: Some("#204060".to_string()),
            fill_opacity: Some(1.0),
            fill_image: None,
        }]),
        sample_export(),
    );
    host.select(Some(shape.clone()));
    tracing::info!("Selected shape {}", shape);

    let (notify_tx, notify_rx) = mpsc::unbounded_channel();
    let (request_tx, request_rx) = mpsc::unbounded_channel();

    let (controller, host_events) = HostController::new(host);
    let host_task = tokio::spawn(controller.run(notify_rx, request_rx));

    let (panel, messages) = Panel::new(request_tx);
    let intents = panel.sender();
    let panel_task = tokio::spawn(run(panel, messages, host_events));

    // The user selects the shape; the host exports its raster.
    notify_tx.send(HostNotification::SelectionChanged)?;
    tokio::time::sleep(Duration::from_millis(50)).await;

    // Two quick slider moves; only the second survives the debounce.
    intents.send(PanelMessage::PreviewRequested(PixelSize::clamped(2)))?;
    intents.send(PanelMessage::PreviewRequested(PixelSize::clamped(4)))?;
    tokio::time::sleep(Duration::from_millis(250)).await;

    // Apply the previewed size to the document.
    intents.send(PanelMessage::CommitRequested {
        size: PixelSize::clamped(4),
        add_new_layer: false,
    })?;
    tokio::time::sleep(Duration::from_millis(250)).await;

    // Closing the notification stream winds both loops down.
    drop(notify_tx);
    host_task.await?;
    let panel = panel_task.await?;

    let store = &panel.selection;
    tracing::info!(
        "Done: preview {} at block size {}, uploading={}",
        store
            .preview_image()
            .map(|raster| format!("{}x{}", raster.width, raster.height))
            .unwrap_or_else(|| "none".to_string()),
        store.pixel_size(),
        store.is_uploading_fill(),
    );
    Ok(())
}
