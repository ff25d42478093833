//! Backend abstraction for the rendering collaborator
//!
//! The simulator drives any renderer through [`Renderer`]: size a target,
//! clear it, draw the scene from a [`CameraView`] and read pixels back. Each
//! backend chooses its own target type.

use thiserror::Error;

use crate::capture::{BufferLayout, ChannelOrder, FrameBuffer, RowOrder};
use crate::render::{CameraView, Extent, PixelRegion, RenderSurface, TargetKind};
use crate::scene::{Scene, VisibilityOverrides};

/// Rendering errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// Read-back region extends past the target
    #[error("Region {region:?} exceeds target of size {target}")]
    RegionOutOfBounds {
        /// Requested region
        region: PixelRegion,
        /// Size of the target read from
        target: Extent,
    },

    /// Destination buffer does not have the layout a read-back produces
    #[error("Read-back buffer mismatch: expected {expected:?}, got {actual:?}")]
    BufferSizeMismatch {
        /// Layout the read-back writes
        expected: BufferLayout,
        /// Layout of the destination buffer
        actual: BufferLayout,
    },

    /// Zero-sized target requested
    #[error("Invalid target extent {0}")]
    InvalidExtent(Extent),
}

/// Result type for renderer operations
pub type RenderResult<T> = Result<T, RenderError>;

/// Renderer driven by the simulation
pub trait Renderer {
    /// Backend-specific render target
    type Target: RenderSurface;

    /// Row order `read_pixels` produces
    fn native_row_order(&self) -> RowOrder {
        RowOrder::BottomUp
    }

    /// Allocate a target of the given size
    fn create_target(&mut self, kind: TargetKind, extent: Extent) -> RenderResult<Self::Target>;

    /// Resize a target, discarding its contents
    fn set_target_size(&mut self, target: &mut Self::Target, extent: Extent) -> RenderResult<()>;

    /// Reset color and depth of a target
    fn clear(&mut self, target: &mut Self::Target);

    /// Draw `scene` as seen by `camera`, skipping what `overrides` hides
    fn render(
        &mut self,
        scene: &Scene,
        camera: &CameraView,
        target: &mut Self::Target,
        overrides: &VisibilityOverrides,
    ) -> RenderResult<()>;

    /// Copy `region` of `target` into `out`
    ///
    /// Rows are written in [`Renderer::native_row_order`] and pixels in
    /// `order`. `out` must be exactly the size of `region` with matching
    /// row and channel order.
    fn read_pixels(
        &mut self,
        target: &Self::Target,
        region: PixelRegion,
        order: ChannelOrder,
        out: &mut FrameBuffer,
    ) -> RenderResult<()>;
}
