//! Block pixelation over decoded RGBA pixels. Pure: no container format,
//! no allocation beyond the grid it is handed.

use pixelize_api::PixelSize;

/// Decoded RGBA8 pixels, row-major, 4 bytes per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelGrid {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl PixelGrid {
    pub fn new(data: Vec<u8>, width: u32, height: u32) -> Self {
        debug_assert_eq!(data.len(), width as usize * height as usize * 4);
        Self {
            data,
            width,
            height,
        }
    }

    /// RGBA of one pixel. Test and inspection helper.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let at = (y as usize * self.width as usize + x as usize) * 4;
        [
            self.data[at],
            self.data[at + 1],
            self.data[at + 2],
            self.data[at + 3],
        ]
    }
}

/// Fill every non-overlapping `size x size` tile with the RGBA of the
/// tile's top-left pixel, alpha included. Tiles overflowing the right or
/// bottom edge are clipped. Re-applying with the same size is a no-op on
/// the output (flat tiles stay flat).
pub fn pixelate(grid: &mut PixelGrid, size: PixelSize) {
    let block = size.get() as usize;
    if block == 1 {
        // Identity: every tile is its own sample.
        return;
    }

    let width = grid.width as usize;
    let height = grid.height as usize;
    let stride = width * 4;
    debug_assert_eq!(grid.data.len(), stride * height);

    for tile_y in (0..height).step_by(block) {
        for tile_x in (0..width).step_by(block) {
            let src = tile_y * stride + tile_x * 4;
            let sample = [
                grid.data[src],
                grid.data[src + 1],
                grid.data[src + 2],
                grid.data[src + 3],
            ];

            let y_end = (tile_y + block).min(height);
            let x_end = (tile_x + block).min(width);
            for y in tile_y..y_end {
                let row = y * stride;
                for x in tile_x..x_end {
                    let at = row + x * 4;
                    grid.data[at..at + 4].copy_from_slice(&sample);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size(value: u32) -> PixelSize {
        PixelSize::new(value).unwrap()
    }

    /// Grid where every pixel encodes its own coordinates, alpha ramping.
    fn coordinate_grid(width: u32, height: u32) -> PixelGrid {
        let mut data = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&[x as u8, y as u8, (x + y) as u8, 255 - y as u8]);
            }
        }
        PixelGrid::new(data, width, height)
    }

    #[test]
    fn test_size_one_is_identity() {
        let mut grid = coordinate_grid(7, 5);
        let before = grid.clone();
        pixelate(&mut grid, size(1));
        assert_eq!(grid, before);
    }

    #[test]
    fn test_tiles_take_top_left_sample() {
        let mut grid = coordinate_grid(4, 4);
        pixelate(&mut grid, size(2));
        // Tile at (2, 2) is filled with the color of pixel (2, 2).
        let sample = [2, 2, 4, 253];
        assert_eq!(grid.pixel(2, 2), sample);
        assert_eq!(grid.pixel(3, 2), sample);
        assert_eq!(grid.pixel(2, 3), sample);
        assert_eq!(grid.pixel(3, 3), sample);
        // And the first tile with pixel (0, 0), alpha included.
        assert_eq!(grid.pixel(1, 1), [0, 0, 0, 255]);
    }

    #[test]
    fn test_edge_tiles_are_clipped() {
        let mut grid = coordinate_grid(5, 5);
        pixelate(&mut grid, size(2));
        // The rightmost column belongs to clipped 1x2 tiles sampled at x=4.
        assert_eq!(grid.pixel(4, 0), [4, 0, 4, 255]);
        assert_eq!(grid.pixel(4, 1), [4, 0, 4, 255]);
        // The bottom-right corner is its own 1x1 tile.
        assert_eq!(grid.pixel(4, 4), [4, 4, 8, 251]);
    }

    #[test]
    fn test_oversized_block_flattens_everything() {
        let mut grid = coordinate_grid(6, 3);
        pixelate(&mut grid, size(64));
        for y in 0..3 {
            for x in 0..6 {
                assert_eq!(grid.pixel(x, y), [0, 0, 0, 255]);
            }
        }
    }

    #[test]
    fn test_reapplication_is_idempotent() {
        for block in [2, 3, 5, 96] {
            let mut once = coordinate_grid(13, 9);
            pixelate(&mut once, size(block));
            let mut twice = once.clone();
            pixelate(&mut twice, size(block));
            assert_eq!(twice, once, "block size {block}");
        }
    }

    #[test]
    fn test_dimensions_never_change() {
        for block in [1, 2, 7, 96] {
            let mut grid = coordinate_grid(11, 4);
            pixelate(&mut grid, size(block));
            assert_eq!((grid.width, grid.height), (11, 4));
            assert_eq!(grid.data.len(), 11 * 4 * 4);
        }
    }

    #[test]
    fn test_empty_grid_is_untouched() {
        let mut grid = PixelGrid::new(Vec::new(), 0, 0);
        pixelate(&mut grid, size(8));
        assert!(grid.data.is_empty());
    }
}
