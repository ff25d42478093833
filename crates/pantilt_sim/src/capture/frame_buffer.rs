//! Fixed-size 3-channel pixel buffers
//!
//! A [`FrameBuffer`] carries its own [`BufferLayout`]: the two conventions that
//! differ between the renderer and the sensor-feed consumer are which visual
//! row is stored first ([`RowOrder`]) and the byte order inside a pixel
//! ([`ChannelOrder`]). The dimensions never change after allocation.

use serde::{Serialize, Deserialize};

use crate::render::Extent;

/// Which visual row is stored first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RowOrder {
    /// First stored row is the bottom of the image (OpenGL read-back convention)
    BottomUp,
    /// First stored row is the top of the image (image-processing convention)
    TopDown,
}

impl RowOrder {
    /// The other convention
    pub fn flipped(self) -> Self {
        match self {
            Self::BottomUp => Self::TopDown,
            Self::TopDown => Self::BottomUp,
        }
    }
}

/// Byte order of the three channels within a pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChannelOrder {
    /// Red, green, blue
    Rgb,
    /// Blue, green, red
    Bgr,
}

impl ChannelOrder {
    /// Arrange an RGB triple in this order
    pub fn from_rgb(self, rgb: [u8; 3]) -> [u8; 3] {
        match self {
            Self::Rgb => rgb,
            Self::Bgr => [rgb[2], rgb[1], rgb[0]],
        }
    }

    /// Recover the RGB triple from a pixel stored in this order
    pub fn to_rgb(self, pixel: [u8; 3]) -> [u8; 3] {
        // Swapping R and B is an involution
        self.from_rgb(pixel)
    }
}

/// Dimensions plus storage conventions of a pixel buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferLayout {
    /// Width and height in pixels
    pub extent: Extent,
    /// Stored row order
    pub row_order: RowOrder,
    /// Stored channel order
    pub channel_order: ChannelOrder,
}

impl BufferLayout {
    /// Create a layout
    pub fn new(extent: Extent, row_order: RowOrder, channel_order: ChannelOrder) -> Self {
        Self {
            extent,
            row_order,
            channel_order,
        }
    }

    /// Number of bytes a buffer with this layout occupies
    pub fn byte_len(&self) -> usize {
        self.extent.pixel_count() * 3
    }
}

/// Fixed-size grid of 3-channel pixels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    layout: BufferLayout,
    data: Vec<u8>,
}

impl FrameBuffer {
    /// Allocate a zeroed buffer
    pub fn new(layout: BufferLayout) -> Self {
        Self {
            layout,
            data: vec![0; layout.byte_len()],
        }
    }

    /// Storage layout
    pub fn layout(&self) -> BufferLayout {
        self.layout
    }

    /// Width and height
    pub fn extent(&self) -> Extent {
        self.layout.extent
    }

    /// Width in pixels
    pub fn width(&self) -> u32 {
        self.layout.extent.width
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        self.layout.extent.height
    }

    /// Raw bytes in storage order
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Pixels in storage order
    pub fn pixels(&self) -> &[[u8; 3]] {
        bytemuck::cast_slice(&self.data)
    }

    /// Mutable pixels in storage order
    pub fn pixels_mut(&mut self) -> &mut [[u8; 3]] {
        bytemuck::cast_slice_mut(&mut self.data)
    }

    /// One stored row (`row` counts in storage order)
    pub fn stored_row(&self, row: u32) -> &[[u8; 3]] {
        let width = self.width() as usize;
        let start = row as usize * width;
        &self.pixels()[start..start + width]
    }

    /// Mutable stored row
    pub fn stored_row_mut(&mut self, row: u32) -> &mut [[u8; 3]] {
        let width = self.width() as usize;
        let start = row as usize * width;
        &mut self.pixels_mut()[start..start + width]
    }

    /// Storage row index holding visual row `visual_row` (0 = top of the image)
    pub fn storage_row_of(&self, visual_row: u32) -> u32 {
        match self.layout.row_order {
            RowOrder::TopDown => visual_row,
            RowOrder::BottomUp => self.height() - 1 - visual_row,
        }
    }

    /// Pixel as stored, addressed by visual position (row 0 = top)
    pub fn pixel(&self, x: u32, visual_row: u32) -> Option<[u8; 3]> {
        if x >= self.width() || visual_row >= self.height() {
            return None;
        }
        let row = self.storage_row_of(visual_row);
        Some(self.stored_row(row)[x as usize])
    }

    /// Pixel converted to RGB, addressed by visual position (row 0 = top)
    pub fn rgb(&self, x: u32, visual_row: u32) -> Option<[u8; 3]> {
        self.pixel(x, visual_row)
            .map(|p| self.layout.channel_order.to_rgb(p))
    }

    /// Write an RGB color at a visual position, converting to the stored channel order
    pub fn set_rgb(&mut self, x: u32, visual_row: u32, rgb: [u8; 3]) {
        if x >= self.width() || visual_row >= self.height() {
            return;
        }
        let row = self.storage_row_of(visual_row);
        let stored = self.layout.channel_order.from_rgb(rgb);
        self.stored_row_mut(row)[x as usize] = stored;
    }

    /// Mean color in RGB order, each channel in 0.0-255.0
    pub fn mean_rgb(&self) -> [f32; 3] {
        let count = self.pixels().len().max(1) as f64;
        let mut sums = [0u64; 3];
        for pixel in self.pixels() {
            let rgb = self.layout.channel_order.to_rgb(*pixel);
            for (sum, channel) in sums.iter_mut().zip(rgb) {
                *sum += u64::from(channel);
            }
        }
        sums.map(|sum| (sum as f64 / count) as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(width: u32, height: u32, rows: RowOrder, channels: ChannelOrder) -> BufferLayout {
        BufferLayout::new(Extent::new(width, height), rows, channels)
    }

    #[test]
    fn test_bottom_up_visual_top_is_last_stored_row() {
        let mut buffer = FrameBuffer::new(layout(2, 3, RowOrder::BottomUp, ChannelOrder::Rgb));
        buffer.set_rgb(1, 0, [9, 8, 7]);

        assert_eq!(buffer.stored_row(2)[1], [9, 8, 7]);
        assert_eq!(buffer.pixel(1, 0), Some([9, 8, 7]));
    }

    #[test]
    fn test_bgr_storage_swaps_red_and_blue() {
        let mut buffer = FrameBuffer::new(layout(1, 1, RowOrder::TopDown, ChannelOrder::Bgr));
        buffer.set_rgb(0, 0, [200, 100, 50]);

        assert_eq!(buffer.as_bytes(), &[50, 100, 200]);
        assert_eq!(buffer.rgb(0, 0), Some([200, 100, 50]));
    }

    #[test]
    fn test_out_of_range_access_is_none() {
        let buffer = FrameBuffer::new(layout(4, 4, RowOrder::TopDown, ChannelOrder::Rgb));
        assert_eq!(buffer.pixel(4, 0), None);
        assert_eq!(buffer.pixel(0, 4), None);
    }

    #[test]
    fn test_mean_is_reported_in_rgb() {
        let mut buffer = FrameBuffer::new(layout(2, 1, RowOrder::TopDown, ChannelOrder::Bgr));
        buffer.set_rgb(0, 0, [255, 0, 0]);
        buffer.set_rgb(1, 0, [255, 0, 100]);

        let mean = buffer.mean_rgb();
        assert_eq!(mean, [255.0, 0.0, 50.0]);
    }

    #[test]
    fn test_allocation_matches_layout() {
        let buffer = FrameBuffer::new(layout(640, 480, RowOrder::BottomUp, ChannelOrder::Bgr));
        assert_eq!(buffer.as_bytes().len(), 640 * 480 * 3);
        assert_eq!(buffer.pixels().len(), 640 * 480);
    }
}
