//! Material system for rendering

/// Surface properties for a renderable node
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// Base color (RGB, 0.0-1.0)
    pub base_color: [f32; 3],

    /// Unlit materials ignore scene lighting (helpers, debug geometry)
    pub unlit: bool,
}

impl Material {
    /// Create a new material with default properties
    pub fn new() -> Self {
        Self {
            base_color: [1.0, 1.0, 1.0], // White
            unlit: false,
        }
    }

    /// Set the base color
    pub fn with_color(mut self, r: f32, g: f32, b: f32) -> Self {
        self.base_color = [r.clamp(0.0, 1.0), g.clamp(0.0, 1.0), b.clamp(0.0, 1.0)];
        self
    }

    /// Disable lighting for this material
    pub fn unlit(mut self) -> Self {
        self.unlit = true;
        self
    }

    /// Orange housing color used by the rig base
    pub fn orange() -> Self {
        Self::new().with_color(1.0, 0.647, 0.0)
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::new()
    }
}
