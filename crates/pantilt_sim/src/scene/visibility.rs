//! Render layers and per-pass visibility overrides
//!
//! Helpers such as the sensor frustum must show up in the third-person view
//! but never in the sensor's own image. Instead of toggling node state around
//! a render call, each pass hands the renderer a [`VisibilityOverrides`] set
//! naming what to leave out.

use bitflags::bitflags;

use super::NodeKey;

bitflags! {
    /// Layers a node belongs to
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct RenderLayers: u32 {
        /// Regular scene content
        const SCENE = 1 << 0;
        /// Visualization aids (camera frustum, gizmos)
        const HELPERS = 1 << 1;
    }
}

impl Default for RenderLayers {
    fn default() -> Self {
        Self::SCENE
    }
}

/// What a single render pass should skip
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibilityOverrides {
    hidden_layers: RenderLayers,
    hidden_nodes: Vec<NodeKey>,
}

impl Default for VisibilityOverrides {
    fn default() -> Self {
        Self::none()
    }
}

impl VisibilityOverrides {
    /// Render everything that is visible
    pub fn none() -> Self {
        Self {
            hidden_layers: RenderLayers::empty(),
            hidden_nodes: Vec::new(),
        }
    }

    /// Skip every node on any of `layers`
    pub fn hide_layers(mut self, layers: RenderLayers) -> Self {
        self.hidden_layers |= layers;
        self
    }

    /// Skip one node and its subtree
    pub fn hide_node(mut self, key: NodeKey) -> Self {
        if !self.hidden_nodes.contains(&key) {
            self.hidden_nodes.push(key);
        }
        self
    }

    /// Layers hidden by this set
    pub fn hidden_layers(&self) -> RenderLayers {
        self.hidden_layers
    }

    /// Whether a node with these layers is hidden in this pass
    pub fn hides(&self, key: NodeKey, layers: RenderLayers) -> bool {
        layers.intersects(self.hidden_layers) || self.hidden_nodes.contains(&key)
    }

    /// Whether nothing is overridden
    pub fn is_empty(&self) -> bool {
        self.hidden_layers.is_empty() && self.hidden_nodes.is_empty()
    }
}
