//! Render target sizing and addressing

use serde::{Serialize, Deserialize};

/// Width and height of a target or buffer in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Extent {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Extent {
    /// Create an extent
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width divided by height
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }

    /// Total number of pixels
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Whether either dimension is zero
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl std::fmt::Display for Extent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Rectangle of a target in pixel coordinates, origin at the bottom-left
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRegion {
    /// Left column
    pub x: u32,
    /// Bottom row
    pub y: u32,
    /// Size of the region
    pub extent: Extent,
}

impl PixelRegion {
    /// Region covering a whole target of the given size
    pub fn full(extent: Extent) -> Self {
        Self { x: 0, y: 0, extent }
    }

    /// Whether the region lies inside a target of size `bounds`
    pub fn fits_within(&self, bounds: Extent) -> bool {
        u64::from(self.x) + u64::from(self.extent.width) <= u64::from(bounds.width)
            && u64::from(self.y) + u64::from(self.extent.height) <= u64::from(bounds.height)
    }
}

/// What a render target is used for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetKind {
    /// Offscreen target the sensor camera renders into
    Sensor,
    /// Interactive third-person display
    Display,
}

/// Common queries on any backend's render target
pub trait RenderSurface {
    /// Current size
    fn extent(&self) -> Extent;

    /// Role of this target
    fn kind(&self) -> TargetKind;
}
