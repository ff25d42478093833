//! Renderer configuration
//!
//! Settings the software renderer reads instead of hardcoding them: the
//! background color and a single directional light.

use crate::foundation::math::Vec3;

/// Configuration for the software renderer
#[derive(Debug, Clone, PartialEq)]
pub struct SoftwareRendererConfig {
    /// Background clear color [R, G, B] (0.0-1.0 range)
    pub clear_color: [f32; 3],
    /// Direction towards the light, world space
    pub light_direction: Vec3,
    /// Minimum brightness of lit surfaces (0.0-1.0)
    pub ambient: f32,
}

impl SoftwareRendererConfig {
    /// Default configuration
    pub fn new() -> Self {
        Self {
            clear_color: [0.05, 0.05, 0.08],
            light_direction: Vec3::new(0.3, 1.0, 0.2).normalize(),
            ambient: 0.35,
        }
    }

    /// Set background clear color
    pub fn with_clear_color(mut self, color: [f32; 3]) -> Self {
        self.clear_color = color;
        self
    }

    /// Set the light direction (normalized internally)
    pub fn with_light_direction(mut self, direction: Vec3) -> Self {
        if direction.norm() > f32::EPSILON {
            self.light_direction = direction.normalize();
        }
        self
    }

    /// Set ambient brightness
    pub fn with_ambient(mut self, ambient: f32) -> Self {
        self.ambient = ambient.clamp(0.0, 1.0);
        self
    }
}

impl Default for SoftwareRendererConfig {
    fn default() -> Self {
        Self::new()
    }
}
