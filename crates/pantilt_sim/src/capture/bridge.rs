//! Renderer-to-consumer frame handoff
//!
//! The renderer reads rows back bottom row first; image consumers expect the
//! top row first. The two conventions are fixed, so the bridge resolves its
//! behaviour once at construction:
//!
//! - **Rows**: flipped whenever the row orders differ.
//! - **Channels**: never permuted per frame. The producer is asked to emit
//!   the consumer's channel order directly via [`FrameBridge::readback_order`].

use super::{BufferLayout, CaptureError, FrameBuffer};
use crate::capture::ChannelOrder;

/// Fixed conversion between two buffer layouts of equal size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameBridge {
    source: BufferLayout,
    destination: BufferLayout,
    flip_rows: bool,
}

impl FrameBridge {
    /// Bridge from `source` buffers to `destination` buffers
    ///
    /// The dimensions and channel orders of the two layouts must agree.
    pub fn new(source: BufferLayout, destination: BufferLayout) -> Result<Self, CaptureError> {
        if source.extent != destination.extent {
            return Err(CaptureError::BufferSizeMismatch {
                expected: source.extent,
                actual: destination.extent,
            });
        }
        if source.channel_order != destination.channel_order {
            return Err(CaptureError::LayoutMismatch {
                expected: destination,
                actual: source,
            });
        }

        let flip_rows = source.row_order != destination.row_order;
        log::debug!("Frame bridge {} {:?} -> {:?} ({:?}), row flip {}",
                    source.extent, source.row_order, destination.row_order,
                    destination.channel_order, flip_rows);

        Ok(Self {
            source,
            destination,
            flip_rows,
        })
    }

    /// Channel order the producer must read pixels back in
    pub fn readback_order(&self) -> ChannelOrder {
        self.destination.channel_order
    }

    /// Layout of buffers accepted as input
    pub fn source_layout(&self) -> BufferLayout {
        self.source
    }

    /// Layout of buffers produced
    pub fn destination_layout(&self) -> BufferLayout {
        self.destination
    }

    /// Whether rows are reversed
    pub fn flips_rows(&self) -> bool {
        self.flip_rows
    }

    /// Bridge for the opposite direction
    pub fn inverse(&self) -> Self {
        Self {
            source: self.destination,
            destination: self.source,
            flip_rows: self.flip_rows,
        }
    }

    /// Convert `raw` into a newly allocated buffer
    pub fn bridge(&self, raw: &FrameBuffer) -> Result<FrameBuffer, CaptureError> {
        let mut out = FrameBuffer::new(self.destination);
        self.bridge_into(raw, &mut out)?;
        Ok(out)
    }

    /// Convert `raw` into `out`
    ///
    /// Both buffers are checked against the bridge layouts before any pixel is
    /// copied; on error `out` is untouched.
    pub fn bridge_into(&self, raw: &FrameBuffer, out: &mut FrameBuffer) -> Result<(), CaptureError> {
        check_layout(self.source, raw.layout())?;
        check_layout(self.destination, out.layout())?;

        if self.flip_rows {
            let height = raw.height();
            for row in 0..height {
                out.stored_row_mut(row).copy_from_slice(raw.stored_row(height - 1 - row));
            }
        } else {
            out.pixels_mut().copy_from_slice(raw.pixels());
        }
        Ok(())
    }
}

fn check_layout(expected: BufferLayout, actual: BufferLayout) -> Result<(), CaptureError> {
    if expected.extent != actual.extent {
        Err(CaptureError::BufferSizeMismatch {
            expected: expected.extent,
            actual: actual.extent,
        })
    } else if expected != actual {
        Err(CaptureError::LayoutMismatch { expected, actual })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::RowOrder;
    use crate::render::Extent;

    fn layouts(extent: Extent) -> (BufferLayout, BufferLayout) {
        (
            BufferLayout::new(extent, RowOrder::BottomUp, ChannelOrder::Bgr),
            BufferLayout::new(extent, RowOrder::TopDown, ChannelOrder::Bgr),
        )
    }

    /// Every pixel distinct: red encodes the column, green the visual row from the top
    fn pattern(layout: BufferLayout) -> FrameBuffer {
        let mut buffer = FrameBuffer::new(layout);
        for row in 0..layout.extent.height {
            for x in 0..layout.extent.width {
                buffer.set_rgb(x, row, [x as u8, row as u8, 200]);
            }
        }
        buffer
    }

    #[test]
    fn test_flip_puts_visual_top_row_first() {
        let (source, destination) = layouts(Extent::new(4, 3));
        let bridge = FrameBridge::new(source, destination).unwrap();
        assert!(bridge.flips_rows());

        let raw = pattern(source);
        // Raw storage starts with the bottom visual row
        assert_eq!(raw.stored_row(0)[0], ChannelOrder::Bgr.from_rgb([0, 2, 200]));

        let bridged = bridge.bridge(&raw).unwrap();
        assert_eq!(bridged.stored_row(0)[0], ChannelOrder::Bgr.from_rgb([0, 0, 200]));
        // The visual image itself is unchanged
        for row in 0..3 {
            for x in 0..4 {
                assert_eq!(bridged.rgb(x, row), raw.rgb(x, row));
            }
        }
    }

    #[test]
    fn test_flip_twice_restores_original() {
        let (source, destination) = layouts(Extent::new(7, 5));
        let bridge = FrameBridge::new(source, destination).unwrap();

        let original = pattern(source);
        let there = bridge.bridge(&original).unwrap();
        let back = bridge.inverse().bridge(&there).unwrap();

        assert_eq!(back, original);
        assert_ne!(there.as_bytes(), original.as_bytes());
    }

    #[test]
    fn test_mismatched_dimensions_fail_at_construction() {
        let source = BufferLayout::new(Extent::new(640, 640), RowOrder::BottomUp, ChannelOrder::Bgr);
        let destination = BufferLayout::new(Extent::new(640, 480), RowOrder::TopDown, ChannelOrder::Bgr);

        assert_eq!(
            FrameBridge::new(source, destination),
            Err(CaptureError::BufferSizeMismatch {
                expected: Extent::new(640, 640),
                actual: Extent::new(640, 480),
            })
        );
    }

    #[test]
    fn test_channel_orders_must_agree() {
        let extent = Extent::new(2, 2);
        let source = BufferLayout::new(extent, RowOrder::BottomUp, ChannelOrder::Rgb);
        let destination = BufferLayout::new(extent, RowOrder::TopDown, ChannelOrder::Bgr);

        assert!(matches!(
            FrameBridge::new(source, destination),
            Err(CaptureError::LayoutMismatch { .. })
        ));
    }

    #[test]
    fn test_wrong_buffers_are_rejected_before_copying() {
        let (source, destination) = layouts(Extent::new(4, 4));
        let bridge = FrameBridge::new(source, destination).unwrap();

        let small = pattern(BufferLayout::new(Extent::new(4, 2), RowOrder::BottomUp, ChannelOrder::Bgr));
        let mut out = FrameBuffer::new(destination);
        assert!(matches!(
            bridge.bridge_into(&small, &mut out),
            Err(CaptureError::BufferSizeMismatch { .. })
        ));
        assert!(out.as_bytes().iter().all(|b| *b == 0));

        // Right size but already in the consumer's row order
        let flipped = pattern(destination);
        assert!(matches!(
            bridge.bridge_into(&flipped, &mut out),
            Err(CaptureError::LayoutMismatch { .. })
        ));
        assert!(out.as_bytes().iter().all(|b| *b == 0));
    }

    #[test]
    fn test_readback_order_is_consumer_order() {
        let (source, destination) = layouts(Extent::new(1, 1));
        let bridge = FrameBridge::new(source, destination).unwrap();
        assert_eq!(bridge.readback_order(), ChannelOrder::Bgr);
        assert_eq!(bridge.inverse().source_layout(), destination);
    }
}
