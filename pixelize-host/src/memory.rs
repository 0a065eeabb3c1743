//! In-memory document host.
//!
//! Stands in for the host application in tests and headless runs: shapes
//! live in a table, uploads append to a log, undo counters record block
//! pairing, and the `fail_*` flags inject host failures.

use std::collections::HashMap;

use async_trait::async_trait;
use uuid::Uuid;

use pixelize_api::{FillDescriptor, Fills, MediaRef, ShapeId};

use crate::document::{Bounds, DocumentHost, ShapeSnapshot, UndoBlockId};
use crate::HostError;

/// One shape in the in-memory document.
#[derive(Debug, Clone)]
pub struct MemoryShape {
    pub name: String,
    pub width: f64,
    pub height: f64,
    pub fills: Fills,
    /// Bytes handed back by `export_png`, whatever the requested scale.
    pub export_png: Vec<u8>,
}

/// One recorded `upload_media` call.
#[derive(Debug, Clone)]
pub struct MediaUpload {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
    pub media: MediaRef,
}

#[derive(Debug, Default)]
pub struct MemoryHost {
    shapes: HashMap<ShapeId, MemoryShape>,
    selected: Option<ShapeId>,
    center: (f64, f64),
    /// Upload log, in call order.
    pub uploads: Vec<MediaUpload>,
    /// Shapes minted by `create_rectangle`, with their placement.
    pub created: Vec<(ShapeId, Bounds)>,
    pub undo_begun: u64,
    pub undo_finished: u64,
    /// Fail the next `export_png` calls.
    pub fail_export: bool,
    /// Fail the next `upload_media` calls.
    pub fail_upload: bool,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a shape and return its minted id.
    pub fn insert_shape(
        &mut self,
        name: &str,
        width: f64,
        height: f64,
        fills: Fills,
        export_png: Vec<u8>,
    ) -> ShapeId {
        let id = ShapeId::new(Uuid::new_v4().to_string());
        self.shapes.insert(
            id.clone(),
            MemoryShape {
                name: name.to_string(),
                width,
                height,
                fills,
                export_png,
            },
        );
        id
    }

    /// Select one shape, or clear the selection with `None`.
    pub fn select(&mut self, id: Option<ShapeId>) {
        self.selected = id;
    }

    pub fn set_viewport_center(&mut self, x: f64, y: f64) {
        self.center = (x, y);
    }

    pub fn shape(&self, id: &ShapeId) -> Option<&MemoryShape> {
        self.shapes.get(id)
    }

    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }
}

/// Width and height from a PNG IHDR chunk, or zeros for anything else.
fn png_dimensions(bytes: &[u8]) -> (u32, u32) {
    const PNG_MAGIC: [u8; 4] = [0x89, b'P', b'N', b'G'];
    if bytes.len() < 24 || bytes[..4] != PNG_MAGIC {
        return (0, 0);
    }
    let width = u32::from_be_bytes([bytes[16], bytes[17], bytes[18], bytes[19]]);
    let height = u32::from_be_bytes([bytes[20], bytes[21], bytes[22], bytes[23]]);
    (width, height)
}

#[async_trait]
impl DocumentHost for MemoryHost {
    fn selection(&self) -> Option<ShapeSnapshot> {
        let id = self.selected.as_ref()?;
        let shape = self.shapes.get(id)?;
        Some(ShapeSnapshot {
            id: id.clone(),
            name: shape.name.clone(),
            width: shape.width,
            height: shape.height,
            fills: shape.fills.clone(),
        })
    }

    async fn export_png(&mut self, id: &ShapeId, _scale: f64) -> Result<Vec<u8>, HostError> {
        if self.fail_export {
            return Err(HostError::ExportFailed("injected export failure".to_string()));
        }
        let shape = self
            .shapes
            .get(id)
            .ok_or_else(|| HostError::ShapeNotFound(id.clone()))?;
        Ok(shape.export_png.clone())
    }

    async fn upload_media(
        &mut self,
        name: &str,
        bytes: &[u8],
        mime: &str,
    ) -> Result<MediaRef, HostError> {
        if self.fail_upload {
            return Err(HostError::UploadFailed("injected upload failure".to_string()));
        }
        let (width, height) = png_dimensions(bytes);
        let media = MediaRef {
            id: Uuid::new_v4().to_string(),
            width,
            height,
            name: Some(name.to_string()),
            mtype: Some(mime.to_string()),
        };
        self.uploads.push(MediaUpload {
            name: name.to_string(),
            mime: mime.to_string(),
            bytes: bytes.to_vec(),
            media: media.clone(),
        });
        Ok(media)
    }

    fn set_fills(&mut self, id: &ShapeId, fills: Vec<FillDescriptor>) -> Result<(), HostError> {
        let shape = self
            .shapes
            .get_mut(id)
            .ok_or_else(|| HostError::ShapeNotFound(id.clone()))?;
        shape.fills = Fills::Uniform(fills);
        Ok(())
    }

    fn create_rectangle(
        &mut self,
        bounds: Bounds,
        fills: Vec<FillDescriptor>,
    ) -> Result<ShapeId, HostError> {
        let id = ShapeId::new(Uuid::new_v4().to_string());
        self.shapes.insert(
            id.clone(),
            MemoryShape {
                name: "Rectangle".to_string(),
                width: bounds.width,
                height: bounds.height,
                fills: Fills::Uniform(fills),
                export_png: Vec::new(),
            },
        );
        self.created.push((id.clone(), bounds));
        Ok(id)
    }

    fn viewport_center(&self) -> (f64, f64) {
        self.center
    }

    fn undo_block_begin(&mut self) -> UndoBlockId {
        self.undo_begun += 1;
        UndoBlockId(self.undo_begun)
    }

    fn undo_block_finish(&mut self, _block: UndoBlockId) {
        self.undo_finished += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_png_dimensions_probes_ihdr() {
        let mut bytes = vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];
        bytes.extend_from_slice(&[0, 0, 0, 13]);
        bytes.extend_from_slice(b"IHDR");
        bytes.extend_from_slice(&640u32.to_be_bytes());
        bytes.extend_from_slice(&480u32.to_be_bytes());
        assert_eq!(png_dimensions(&bytes), (640, 480));
    }

    #[test]
    fn test_png_dimensions_rejects_other_bytes() {
        assert_eq!(png_dimensions(b"GIF89a"), (0, 0));
        assert_eq!(png_dimensions(&[]), (0, 0));
    }

    #[tokio::test]
    async fn test_selection_reflects_shape_table() {
        let mut host = MemoryHost::new();
        assert!(host.selection().is_none());

        let id = host.insert_shape("Photo", 10.0, 20.0, Fills::Uniform(Vec::new()), vec![1, 2]);
        host.select(Some(id.clone()));

        let snapshot = host.selection().unwrap();
        assert_eq!(snapshot.id, id);
        assert_eq!(snapshot.name, "Photo");
        assert_eq!(host.export_png(&id, 2.0).await.unwrap(), vec![1, 2]);

        host.select(None);
        assert!(host.selection().is_none());
    }

    #[test]
    fn test_undo_counters_pair_up() {
        let mut host = MemoryHost::new();
        let block = host.undo_block_begin();
        host.undo_block_finish(block);
        assert_eq!((host.undo_begun, host.undo_finished), (1, 1));
    }
}
