//! Per-tick render pass scheduling
//!
//! Every tick renders the display view; every `capture_every`-th tick also
//! renders the sensor view first. The sensor feed does not need to match the
//! display refresh rate, so it runs at a fraction of it.

use super::{CaptureError, ChannelOrder, FrameBuffer};
use crate::render::{CameraView, Extent, PixelRegion, Renderer, RenderResult, RenderSurface};
use crate::scene::{RenderLayers, Scene, VisibilityOverrides};

/// Default capture cadence: every other tick
pub const DEFAULT_CAPTURE_EVERY: u64 = 2;

/// Decides which passes run on a tick and drives them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderScheduler {
    capture_every: u64,
    sensor_extent: Extent,
}

impl RenderScheduler {
    /// Scheduler for a sensor of the given resolution
    ///
    /// A cadence of zero is treated as one (capture every tick).
    pub fn new(capture_every: u64, sensor_extent: Extent) -> Self {
        Self {
            capture_every: capture_every.max(1),
            sensor_extent,
        }
    }

    /// Ticks between sensor captures
    pub fn capture_every(&self) -> u64 {
        self.capture_every
    }

    /// Declared sensor resolution
    pub fn sensor_extent(&self) -> Extent {
        self.sensor_extent
    }

    /// Whether `tick` renders the sensor view
    pub fn should_capture(&self, tick: u64) -> bool {
        tick % self.capture_every == 0
    }

    /// Render the sensor view and read it back into `raw`
    ///
    /// Target and buffer sizes are checked before any pixel work. Helpers are
    /// hidden for this pass so they never occlude the sensor's own image.
    pub fn render_sensor_frame<R: Renderer>(
        &self,
        renderer: &mut R,
        scene: &Scene,
        view: &CameraView,
        target: &mut R::Target,
        raw: &mut FrameBuffer,
        channel_order: ChannelOrder,
    ) -> Result<(), CaptureError> {
        for actual in [target.extent(), raw.extent()] {
            if actual != self.sensor_extent {
                return Err(CaptureError::BufferSizeMismatch {
                    expected: self.sensor_extent,
                    actual,
                });
            }
        }

        renderer.clear(target);
        let overrides = VisibilityOverrides::none().hide_layers(RenderLayers::HELPERS);
        renderer.render(scene, view, target, &overrides)?;
        renderer.read_pixels(target, PixelRegion::full(self.sensor_extent), channel_order, raw)?;

        log::debug!("Sensor frame captured at {}", self.sensor_extent);
        Ok(())
    }

    /// Render the full scene, helpers included, into the display target
    pub fn render_display_frame<R: Renderer>(
        &self,
        renderer: &mut R,
        scene: &Scene,
        view: &CameraView,
        target: &mut R::Target,
    ) -> RenderResult<()> {
        renderer.clear(target);
        renderer.render(scene, view, target, &VisibilityOverrides::none())
    }
}

impl Default for RenderScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_CAPTURE_EVERY, Extent::new(640, 640))
    }
}
