//! Sensor capture
//!
//! Pixel buffers, the per-tick pass scheduler and the bridge that hands
//! renderer read-backs to an image consumer.

pub mod bridge;
pub mod frame_buffer;
pub mod scheduler;

pub use bridge::FrameBridge;
pub use frame_buffer::{BufferLayout, ChannelOrder, FrameBuffer, RowOrder};
pub use scheduler::{RenderScheduler, DEFAULT_CAPTURE_EVERY};

use thiserror::Error;

use crate::render::{Extent, RenderError};

/// Capture errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    /// Target or buffer dimensions differ from the declared sensor resolution
    #[error("Buffer size mismatch: expected {expected}, got {actual}")]
    BufferSizeMismatch {
        /// Declared size
        expected: Extent,
        /// Size found
        actual: Extent,
    },

    /// Sizes agree but row or channel order does not
    #[error("Buffer layout mismatch: expected {expected:?}, got {actual:?}")]
    LayoutMismatch {
        /// Declared layout
        expected: BufferLayout,
        /// Layout found
        actual: BufferLayout,
    },

    /// Renderer failed during the sensor pass
    #[error("Render error: {0}")]
    Render(#[from] RenderError),
}
