//! Recording test doubles for the renderer and display collaborators

use crate::capture::{BufferLayout, ChannelOrder, FrameBuffer};
use crate::display::{DisplayError, ImageDisplay};
use crate::render::{
    CameraView, Extent, PixelRegion, RenderError, RenderResult, RenderSurface, Renderer, TargetKind,
};
use crate::scene::{RenderLayers, Scene, VisibilityOverrides};

/// One call made on a [`RecordingRenderer`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    CreateTarget(TargetKind, Extent),
    SetTargetSize(TargetKind, Extent),
    Clear(TargetKind),
    Render { kind: TargetKind, hidden: RenderLayers },
    ReadPixels { kind: TargetKind, order: ChannelOrder },
}

#[derive(Debug)]
pub struct MockTarget {
    kind: TargetKind,
    extent: Extent,
}

impl RenderSurface for MockTarget {
    fn extent(&self) -> Extent {
        self.extent
    }

    fn kind(&self) -> TargetKind {
        self.kind
    }
}

/// Renderer that records calls and writes a row-coded pattern on read-back
///
/// Stored row `r` of every read-back holds RGB `[r, x, 7]`.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub calls: Vec<Call>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, wanted: impl Fn(&Call) -> bool) -> usize {
        self.calls.iter().filter(|c| wanted(c)).count()
    }
}

impl Renderer for RecordingRenderer {
    type Target = MockTarget;

    fn create_target(&mut self, kind: TargetKind, extent: Extent) -> RenderResult<MockTarget> {
        self.calls.push(Call::CreateTarget(kind, extent));
        Ok(MockTarget { kind, extent })
    }

    fn set_target_size(&mut self, target: &mut MockTarget, extent: Extent) -> RenderResult<()> {
        self.calls.push(Call::SetTargetSize(target.kind, extent));
        target.extent = extent;
        Ok(())
    }

    fn clear(&mut self, target: &mut MockTarget) {
        self.calls.push(Call::Clear(target.kind));
    }

    fn render(
        &mut self,
        _scene: &Scene,
        _camera: &CameraView,
        target: &mut MockTarget,
        overrides: &VisibilityOverrides,
    ) -> RenderResult<()> {
        self.calls.push(Call::Render {
            kind: target.kind,
            hidden: overrides.hidden_layers(),
        });
        Ok(())
    }

    fn read_pixels(
        &mut self,
        target: &MockTarget,
        region: PixelRegion,
        order: ChannelOrder,
        out: &mut FrameBuffer,
    ) -> RenderResult<()> {
        let expected = BufferLayout::new(region.extent, self.native_row_order(), order);
        if out.layout() != expected {
            return Err(RenderError::BufferSizeMismatch {
                expected,
                actual: out.layout(),
            });
        }
        self.calls.push(Call::ReadPixels { kind: target.kind, order });

        for row in 0..out.height() {
            for (x, pixel) in out.stored_row_mut(row).iter_mut().enumerate() {
                *pixel = order.from_rgb([row as u8, x as u8, 7]);
            }
        }
        Ok(())
    }
}

/// Display that keeps copies of every frame it is shown
#[derive(Debug, Default)]
pub struct RecordingDisplay {
    pub frames: Vec<(String, FrameBuffer)>,
    pub reject: bool,
}

impl ImageDisplay for RecordingDisplay {
    fn show_image(&mut self, window: &str, frame: &FrameBuffer) -> Result<(), DisplayError> {
        if self.reject {
            return Err(DisplayError::Rejected {
                window: window.to_string(),
                reason: "test display rejects frames".to_string(),
            });
        }
        self.frames.push((window.to_string(), frame.clone()));
        Ok(())
    }
}
