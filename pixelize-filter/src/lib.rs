//! Pixelization filter.
//!
//! Pure image processing with no host or panel dependencies: decode an
//! exported raster, fit it onto the shape's declared size, pixelate, and
//! re-encode. [`process`] is the one entry point the panel calls; the
//! submodules are exposed for tests and tooling.

pub mod codec;
pub mod pixelate;

use pixelize_api::{PixelSize, RasterBuffer};
pub use pixelate::PixelGrid;

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilterError {
    #[error("image decode failed: {0}")]
    Decode(String),

    #[error("image encode failed: {0}")]
    Encode(String),

    #[error("invalid image dimensions {width}x{height}")]
    InvalidDimension { width: u32, height: u32 },
}

// ============================================================================
// Pipeline
// ============================================================================

/// Run the full filter over an exported raster.
///
/// The buffer's declared dimensions are authoritative: the encoded image is
/// decoded, resampled onto the declared size, pixelated at `size`, and
/// re-encoded. The result carries the same declared dimensions as the input.
pub fn process(raster: &RasterBuffer, size: PixelSize) -> Result<RasterBuffer, FilterError> {
    if raster.width == 0 || raster.height == 0 {
        return Err(FilterError::InvalidDimension {
            width: raster.width,
            height: raster.height,
        });
    }

    let decoded = codec::decode_png(&raster.bytes)?;
    let mut grid = codec::fit_to(decoded, raster.width, raster.height)?;
    pixelate::pixelate(&mut grid, size);
    let bytes = codec::encode_png(&grid)?;

    Ok(RasterBuffer::new(bytes, raster.width, raster.height))
}
