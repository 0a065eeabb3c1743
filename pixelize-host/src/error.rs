//! Host operation errors.

use pixelize_api::ShapeId;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    #[error("shape not found: {0}")]
    ShapeNotFound(ShapeId),

    #[error("export failed: {0}")]
    ExportFailed(String),

    #[error("upload failed: {0}")]
    UploadFailed(String),
}
