//! Encoded raster buffers and the pixel-size parameter of the filter.

use std::fmt;

use thiserror::Error;

/// Smallest accepted block size. No visible effect at this value.
pub const MIN_PIXEL_SIZE: u32 = 1;
/// Largest accepted block size.
pub const MAX_PIXEL_SIZE: u32 = 96;

/// A PNG-encoded image plus the dimensions it is declared to represent.
///
/// The declared dimensions rule: the host exports at a higher scale, and the
/// filter fits the decoded pixels back onto the declared size before
/// processing, so width/height here always describe the logical raster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterBuffer {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl RasterBuffer {
    pub fn new(bytes: Vec<u8>, width: u32, height: u32) -> Self {
        Self {
            bytes,
            width,
            height,
        }
    }
}

/// Side length, in source pixels, of each flat-colored tile the filter
/// produces. Bounded to `MIN_PIXEL_SIZE..=MAX_PIXEL_SIZE` at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PixelSize(u32);

/// A block size outside the accepted range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("pixel size {0} is outside {MIN_PIXEL_SIZE}..={MAX_PIXEL_SIZE}")]
pub struct PixelSizeError(pub u32);

impl PixelSize {
    pub const DEFAULT: PixelSize = PixelSize(MIN_PIXEL_SIZE);

    pub fn new(value: u32) -> Result<Self, PixelSizeError> {
        if (MIN_PIXEL_SIZE..=MAX_PIXEL_SIZE).contains(&value) {
            Ok(Self(value))
        } else {
            Err(PixelSizeError(value))
        }
    }

    /// Saturating constructor for callers fed by unconstrained inputs.
    pub fn clamped(value: u32) -> Self {
        Self(value.clamp(MIN_PIXEL_SIZE, MAX_PIXEL_SIZE))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for PixelSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for PixelSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_enforced() {
        assert!(PixelSize::new(0).is_err());
        assert!(PixelSize::new(MIN_PIXEL_SIZE).is_ok());
        assert!(PixelSize::new(MAX_PIXEL_SIZE).is_ok());
        assert!(PixelSize::new(MAX_PIXEL_SIZE + 1).is_err());
    }

    #[test]
    fn test_clamped_saturates() {
        assert_eq!(PixelSize::clamped(0).get(), MIN_PIXEL_SIZE);
        assert_eq!(PixelSize::clamped(12).get(), 12);
        assert_eq!(PixelSize::clamped(10_000).get(), MAX_PIXEL_SIZE);
    }

    #[test]
    fn test_default_is_identity_size() {
        assert_eq!(PixelSize::default().get(), 1);
    }
}
