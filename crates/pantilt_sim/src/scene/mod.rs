//! Scene management
//!
//! A strict tree of nodes with local transforms and optional geometry, plus
//! the layer and override types render passes use to filter it.

pub mod scene_graph;
pub mod visibility;

pub use scene_graph::{NodeKey, Renderable, Scene, SceneError, SceneNode};
pub use visibility::{RenderLayers, VisibilityOverrides};
