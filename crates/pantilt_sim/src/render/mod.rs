//! Rendering
//!
//! Geometry and materials, cameras, render-target addressing, the
//! [`Renderer`] trait the simulation drives, and the CPU
//! [`SoftwareRenderer`] that implements it.

pub mod api;
pub mod camera;
pub mod material;
pub mod mesh;
pub mod software;
pub mod target;

pub use api::{Renderer, RenderError, RenderResult, SoftwareRendererConfig};
pub use camera::{Camera, CameraView, Projection};
pub use material::Material;
pub use mesh::{Mesh, Vertex};
pub use software::{RenderStats, SoftwareRenderer, SoftwareTarget};
pub use target::{Extent, PixelRegion, RenderSurface, TargetKind};
