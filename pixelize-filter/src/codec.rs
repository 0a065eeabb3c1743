//! Container boundary of the filter: PNG decode/encode and the fit onto
//! declared dimensions. Nothing outside this module touches the `image`
//! crate.

use image::codecs::png::PngEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ExtendedColorType, ImageEncoder, RgbaImage};

use crate::FilterError;
use crate::pixelate::PixelGrid;

/// Decode an encoded image into RGBA8.
pub fn decode_png(bytes: &[u8]) -> Result<PixelGrid, FilterError> {
    let image =
        image::load_from_memory(bytes).map_err(|err| FilterError::Decode(err.to_string()))?;
    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(PixelGrid::new(rgba.into_raw(), width, height))
}

/// Encode RGBA8 into a PNG container.
pub fn encode_png(grid: &PixelGrid) -> Result<Vec<u8>, FilterError> {
    let mut bytes = Vec::new();
    PngEncoder::new(&mut bytes)
        .write_image(&grid.data, grid.width, grid.height, ExtendedColorType::Rgba8)
        .map_err(|err| FilterError::Encode(err.to_string()))?;
    Ok(bytes)
}

/// Resample a grid onto the declared dimensions. The host exports rasters
/// at a higher scale than the shape's logical size; the declared size wins,
/// matching the original canvas draw (bilinear).
pub fn fit_to(grid: PixelGrid, width: u32, height: u32) -> Result<PixelGrid, FilterError> {
    if (grid.width, grid.height) == (width, height) {
        return Ok(grid);
    }
    let image = RgbaImage::from_raw(grid.width, grid.height, grid.data).ok_or_else(|| {
        FilterError::Decode("pixel buffer does not match its dimensions".to_string())
    })?;
    let resized = DynamicImage::ImageRgba8(image)
        .resize_exact(width, height, FilterType::Triangle)
        .into_rgba8();
    Ok(PixelGrid::new(resized.into_raw(), width, height))
}
