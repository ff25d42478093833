//! Public rendering API
//!
//! The renderer trait the simulation drives and the configuration of the
//! bundled software backend.

pub mod render_backend;
pub mod renderer_config;

pub use render_backend::{Renderer, RenderError, RenderResult};
pub use renderer_config::SoftwareRendererConfig;
