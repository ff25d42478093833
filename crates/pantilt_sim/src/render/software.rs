//! CPU reference renderer
//!
//! A small scanline-free rasterizer that implements [`Renderer`] without a GPU
//! so the simulator runs headless and its passes can be inspected in tests.
//!
//! Pipeline per triangle: model-view-projection into clip space, clip against
//! the near plane, perspective divide, viewport mapping with row 0 at the
//! bottom of the target, then edge-function coverage at pixel centers with a
//! depth test. Shading is flat and two-sided from one directional light.

use crate::capture::{BufferLayout, ChannelOrder, FrameBuffer};
use crate::foundation::math::{Point3, Vec3, Vec4};
use crate::render::api::{Renderer, RenderError, RenderResult, SoftwareRendererConfig};
use crate::render::{CameraView, Extent, Material, PixelRegion, RenderSurface, TargetKind};
use crate::scene::{Scene, VisibilityOverrides};

/// Color and depth storage of the software renderer, bottom row first
#[derive(Debug, Clone)]
pub struct SoftwareTarget {
    kind: TargetKind,
    extent: Extent,
    color: Vec<[u8; 3]>,
    depth: Vec<f32>,
}

impl SoftwareTarget {
    fn allocate(kind: TargetKind, extent: Extent, clear: [u8; 3]) -> Self {
        Self {
            kind,
            extent,
            color: vec![clear; extent.pixel_count()],
            depth: vec![f32::INFINITY; extent.pixel_count()],
        }
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.extent.width as usize + x as usize
    }

    /// RGB color at column `x`, row `y` counted from the bottom
    pub fn color_at(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.extent.width || y >= self.extent.height {
            return None;
        }
        self.color.get(self.index(x, y)).copied()
    }

    /// Normalized device depth at a pixel, infinite where nothing was drawn
    pub fn depth_at(&self, x: u32, y: u32) -> Option<f32> {
        if x >= self.extent.width || y >= self.extent.height {
            return None;
        }
        self.depth.get(self.index(x, y)).copied()
    }
}

impl RenderSurface for SoftwareTarget {
    fn extent(&self) -> Extent {
        self.extent
    }

    fn kind(&self) -> TargetKind {
        self.kind
    }
}

/// Counters accumulated across passes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Number of `render` calls
    pub passes: u64,
    /// Triangles handed to the rasterizer
    pub triangles_submitted: u64,
    /// Triangles that covered at least one pixel
    pub triangles_drawn: u64,
}

/// CPU implementation of [`Renderer`]
#[derive(Debug, Clone)]
pub struct SoftwareRenderer {
    config: SoftwareRendererConfig,
    clear_rgb: [u8; 3],
    stats: RenderStats,
}

impl Default for SoftwareRenderer {
    fn default() -> Self {
        Self::new(SoftwareRendererConfig::default())
    }
}

impl SoftwareRenderer {
    /// Create a renderer
    pub fn new(config: SoftwareRendererConfig) -> Self {
        log::info!("Software renderer created (clear color {:?}, ambient {:.2})",
                   config.clear_color, config.ambient);
        Self {
            clear_rgb: config.clear_color.map(to_byte),
            config,
            stats: RenderStats::default(),
        }
    }

    /// Background color as bytes
    pub fn clear_rgb(&self) -> [u8; 3] {
        self.clear_rgb
    }

    /// Counters since creation
    pub fn stats(&self) -> RenderStats {
        self.stats
    }

    fn shade(&self, material: &Material, normal: Vec3) -> [u8; 3] {
        let intensity = if material.unlit {
            1.0
        } else {
            let diffuse = normal.dot(&self.config.light_direction).abs();
            self.config.ambient + (1.0 - self.config.ambient) * diffuse
        };
        material.base_color.map(|c| to_byte(c * intensity))
    }
}

impl Renderer for SoftwareRenderer {
    type Target = SoftwareTarget;

    fn create_target(&mut self, kind: TargetKind, extent: Extent) -> RenderResult<SoftwareTarget> {
        if extent.is_empty() {
            return Err(RenderError::InvalidExtent(extent));
        }
        log::debug!("Allocating {:?} target {}", kind, extent);
        Ok(SoftwareTarget::allocate(kind, extent, self.clear_rgb))
    }

    fn set_target_size(&mut self, target: &mut SoftwareTarget, extent: Extent) -> RenderResult<()> {
        if extent.is_empty() {
            return Err(RenderError::InvalidExtent(extent));
        }
        if target.extent != extent {
            log::debug!("Resizing {:?} target {} -> {}", target.kind, target.extent, extent);
            *target = SoftwareTarget::allocate(target.kind, extent, self.clear_rgb);
        }
        Ok(())
    }

    fn clear(&mut self, target: &mut SoftwareTarget) {
        target.color.fill(self.clear_rgb);
        target.depth.fill(f32::INFINITY);
    }

    fn render(
        &mut self,
        scene: &Scene,
        camera: &CameraView,
        target: &mut SoftwareTarget,
        overrides: &VisibilityOverrides,
    ) -> RenderResult<()> {
        let view_projection = camera.view_projection();
        let mut submitted = 0u64;
        let mut drawn = 0u64;

        scene.for_each_visible(overrides, |_, node, world| {
            let Some(renderable) = &node.renderable else {
                return;
            };
            let mvp = view_projection * world;

            for [a, b, c] in renderable.mesh.triangles() {
                submitted += 1;

                let corners = [a, b, c].map(|p| world.transform_point(&Point3::from(p)));
                let normal = (corners[1] - corners[0]).cross(&(corners[2] - corners[0]));
                let Some(normal) = normal.try_normalize(f32::EPSILON) else {
                    continue;
                };
                let color = self.shade(&renderable.material, normal);

                let clip = [a, b, c].map(|p| mvp * Vec4::new(p[0], p[1], p[2], 1.0));
                if rasterize(target, &clip, color) {
                    drawn += 1;
                }
            }
        });

        self.stats.passes += 1;
        self.stats.triangles_submitted += submitted;
        self.stats.triangles_drawn += drawn;
        log::trace!("{:?} pass: {} of {} triangles drawn", target.kind, drawn, submitted);
        Ok(())
    }

    fn read_pixels(
        &mut self,
        target: &SoftwareTarget,
        region: PixelRegion,
        order: ChannelOrder,
        out: &mut FrameBuffer,
    ) -> RenderResult<()> {
        if !region.fits_within(target.extent) {
            return Err(RenderError::RegionOutOfBounds {
                region,
                target: target.extent,
            });
        }
        let expected = BufferLayout::new(region.extent, self.native_row_order(), order);
        if out.layout() != expected {
            return Err(RenderError::BufferSizeMismatch {
                expected,
                actual: out.layout(),
            });
        }

        let width = region.extent.width as usize;
        for row in 0..region.extent.height {
            let start = target.index(region.x, region.y + row);
            let source = &target.color[start..start + width];
            for (dst, src) in out.stored_row_mut(row).iter_mut().zip(source) {
                *dst = order.from_rgb(*src);
            }
        }
        Ok(())
    }
}

fn to_byte(channel: f32) -> u8 {
    (channel.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Clip a triangle against the near plane (z >= -w)
///
/// Returns a convex polygon of 0, 3 or 4 vertices.
fn clip_near(triangle: &[Vec4; 3]) -> Vec<Vec4> {
    let mut polygon = Vec::with_capacity(4);
    for i in 0..3 {
        let a = triangle[i];
        let b = triangle[(i + 1) % 3];
        let da = a.z + a.w;
        let db = b.z + b.w;

        if da >= 0.0 {
            polygon.push(a);
        }
        if (da >= 0.0) != (db >= 0.0) {
            let t = da / (da - db);
            polygon.push(a + (b - a) * t);
        }
    }
    polygon
}

/// Rasterize one clip-space triangle, returns whether any pixel was written
fn rasterize(target: &mut SoftwareTarget, clip: &[Vec4; 3], color: [u8; 3]) -> bool {
    let polygon = clip_near(clip);
    if polygon.len() < 3 {
        return false;
    }

    let width = target.extent.width as f32;
    let height = target.extent.height as f32;
    // Past the near plane w >= near > 0, so the divide is safe
    let screen: Vec<Vec3> = polygon
        .iter()
        .map(|v| {
            let inv_w = 1.0 / v.w;
            Vec3::new(
                (v.x * inv_w + 1.0) * 0.5 * width,
                (v.y * inv_w + 1.0) * 0.5 * height,
                v.z * inv_w,
            )
        })
        .collect();

    let mut wrote = false;
    for i in 1..screen.len() - 1 {
        wrote |= fill_triangle(target, screen[0], screen[i], screen[i + 1], color);
    }
    wrote
}

fn edge(a: Vec3, b: Vec3, px: f32, py: f32) -> f32 {
    (b.x - a.x) * (py - a.y) - (b.y - a.y) * (px - a.x)
}

fn fill_triangle(target: &mut SoftwareTarget, a: Vec3, b: Vec3, c: Vec3, color: [u8; 3]) -> bool {
    let area = edge(a, b, c.x, c.y);
    if area.abs() < 1e-9 || !area.is_finite() {
        return false;
    }

    let width = target.extent.width as f32;
    let height = target.extent.height as f32;
    let min_x = a.x.min(b.x).min(c.x).floor().clamp(0.0, width) as u32;
    let max_x = a.x.max(b.x).max(c.x).ceil().clamp(0.0, width) as u32;
    let min_y = a.y.min(b.y).min(c.y).floor().clamp(0.0, height) as u32;
    let max_y = a.y.max(b.y).max(c.y).ceil().clamp(0.0, height) as u32;

    let mut wrote = false;
    for y in min_y..max_y {
        let py = y as f32 + 0.5;
        for x in min_x..max_x {
            let px = x as f32 + 0.5;
            let w0 = edge(b, c, px, py) / area;
            let w1 = edge(c, a, px, py) / area;
            let w2 = edge(a, b, px, py) / area;
            if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                continue;
            }

            // NDC depth is affine in screen space
            let depth = w0 * a.z + w1 * b.z + w2 * c.z;
            if !(-1.0..=1.0).contains(&depth) {
                continue;
            }

            let index = target.index(x, y);
            if depth < target.depth[index] {
                target.depth[index] = depth;
                target.color[index] = color;
                wrote = true;
            }
        }
    }
    wrote
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::RowOrder;
    use crate::foundation::math::Transform;
    use crate::render::{Mesh, Projection};
    use crate::scene::{RenderLayers, SceneNode};

    const SIZE: u32 = 32;

    fn camera() -> CameraView {
        CameraView::from_pose(&Transform::identity(), &Projection::perspective(90.0, 1.0, 0.1, 100.0))
    }

    fn cube_at(name: &str, position: Vec3, material: Material) -> SceneNode {
        SceneNode::new(name)
            .with_transform(Transform::from_position(position))
            .with_mesh(Mesh::cuboid(2.0, 2.0, 2.0), material)
    }

    fn red() -> Material {
        Material::new().with_color(1.0, 0.0, 0.0)
    }

    fn setup() -> (SoftwareRenderer, SoftwareTarget) {
        let mut renderer = SoftwareRenderer::default();
        let target = renderer
            .create_target(TargetKind::Sensor, Extent::new(SIZE, SIZE))
            .unwrap();
        (renderer, target)
    }

    #[test]
    fn test_cleared_target_reads_back_background() {
        let (mut renderer, mut target) = setup();
        renderer.clear(&mut target);

        let layout = BufferLayout::new(Extent::new(SIZE, SIZE), RowOrder::BottomUp, ChannelOrder::Bgr);
        let mut out = FrameBuffer::new(layout);
        renderer
            .read_pixels(&target, PixelRegion::full(target.extent()), ChannelOrder::Bgr, &mut out)
            .unwrap();

        let [r, g, b] = renderer.clear_rgb();
        assert!(out.pixels().iter().all(|p| *p == [b, g, r]));
    }

    #[test]
    fn test_cube_ahead_covers_center_with_lit_color() {
        let (mut renderer, mut target) = setup();
        let mut scene = Scene::new();
        scene.add_to_root(cube_at("box", Vec3::new(0.0, 0.0, -5.0), red())).unwrap();

        renderer.clear(&mut target);
        renderer.render(&scene, &camera(), &mut target, &VisibilityOverrides::none()).unwrap();

        let [r, g, b] = target.color_at(SIZE / 2, SIZE / 2).unwrap();
        assert!(r > 50 && r < 255, "lit red expected, got {}", r);
        assert_eq!((g, b), (0, 0));
        // Corners stay background
        assert_eq!(target.color_at(0, 0), Some(renderer.clear_rgb()));
        assert_eq!(renderer.stats().passes, 1);
        assert_eq!(renderer.stats().triangles_submitted, 12);
    }

    #[test]
    fn test_rows_are_stored_bottom_up() {
        let (mut renderer, mut target) = setup();
        let mut scene = Scene::new();
        scene
            .add_to_root(cube_at("high", Vec3::new(0.0, 3.0, -10.0), red().unlit()))
            .unwrap();

        renderer.clear(&mut target);
        renderer.render(&scene, &camera(), &mut target, &VisibilityOverrides::none()).unwrap();

        // Object above the view axis lands in high storage rows
        assert_eq!(target.color_at(SIZE / 2, 21), Some([255, 0, 0]));
        assert_eq!(target.color_at(SIZE / 2, 10), Some(renderer.clear_rgb()));
    }

    #[test]
    fn test_nearer_surface_wins_depth_test() {
        let (mut renderer, mut target) = setup();
        let mut scene = Scene::new();
        // Far one first so the near one must overwrite it
        scene
            .add_to_root(cube_at("far", Vec3::new(0.0, 0.0, -20.0), Material::new().with_color(0.0, 0.0, 1.0).unlit()))
            .unwrap();
        scene
            .add_to_root(cube_at("near", Vec3::new(0.0, 0.0, -5.0), red().unlit()))
            .unwrap();

        renderer.clear(&mut target);
        renderer.render(&scene, &camera(), &mut target, &VisibilityOverrides::none()).unwrap();

        assert_eq!(target.color_at(SIZE / 2, SIZE / 2), Some([255, 0, 0]));
    }

    #[test]
    fn test_hidden_layers_are_skipped() {
        let (mut renderer, mut target) = setup();
        let mut scene = Scene::new();
        scene
            .add_to_root(
                cube_at("helper", Vec3::new(0.0, 0.0, -5.0), red().unlit()).with_layers(RenderLayers::HELPERS),
            )
            .unwrap();

        renderer.clear(&mut target);
        let overrides = VisibilityOverrides::none().hide_layers(RenderLayers::HELPERS);
        renderer.render(&scene, &camera(), &mut target, &overrides).unwrap();

        assert_eq!(target.color_at(SIZE / 2, SIZE / 2), Some(renderer.clear_rgb()));
    }

    #[test]
    fn test_geometry_behind_or_through_the_camera() {
        let (mut renderer, mut target) = setup();
        let mut scene = Scene::new();
        scene.add_to_root(cube_at("behind", Vec3::new(0.0, 0.0, 5.0), red())).unwrap();
        scene
            .add_to_root(
                SceneNode::new("ground")
                    .with_transform(Transform::from_position(Vec3::new(0.0, -1.0, 0.0)))
                    .with_mesh(Mesh::ground_plane(50.0, 2), Material::new().with_color(0.0, 1.0, 0.0).unlit()),
            )
            .unwrap();

        renderer.clear(&mut target);
        renderer.render(&scene, &camera(), &mut target, &VisibilityOverrides::none()).unwrap();

        // Ground crosses the near plane and fills the lower half only
        assert_eq!(target.color_at(SIZE / 2, 2), Some([0, 255, 0]));
        assert_eq!(target.color_at(SIZE / 2, SIZE - 2), Some(renderer.clear_rgb()));
    }

    #[test]
    fn test_read_pixels_validates_region_and_buffer() {
        let (mut renderer, target) = setup();
        let extent = Extent::new(SIZE, SIZE);

        let mut wrong_size = FrameBuffer::new(BufferLayout::new(Extent::new(8, 8), RowOrder::BottomUp, ChannelOrder::Rgb));
        assert!(matches!(
            renderer.read_pixels(&target, PixelRegion::full(extent), ChannelOrder::Rgb, &mut wrong_size),
            Err(RenderError::BufferSizeMismatch { .. })
        ));

        let mut wrong_order = FrameBuffer::new(BufferLayout::new(extent, RowOrder::BottomUp, ChannelOrder::Rgb));
        assert!(matches!(
            renderer.read_pixels(&target, PixelRegion::full(extent), ChannelOrder::Bgr, &mut wrong_order),
            Err(RenderError::BufferSizeMismatch { .. })
        ));

        let region = PixelRegion { x: 4, y: 0, extent };
        assert!(matches!(
            renderer.read_pixels(&target, region, ChannelOrder::Rgb, &mut wrong_order),
            Err(RenderError::RegionOutOfBounds { .. })
        ));
    }

    #[test]
    fn test_target_sizing() {
        let mut renderer = SoftwareRenderer::default();
        assert!(matches!(
            renderer.create_target(TargetKind::Display, Extent::new(0, 4)),
            Err(RenderError::InvalidExtent(_))
        ));

        let mut target = renderer.create_target(TargetKind::Display, Extent::new(4, 4)).unwrap();
        renderer.set_target_size(&mut target, Extent::new(8, 2)).unwrap();
        assert_eq!(target.extent(), Extent::new(8, 2));
        assert_eq!(target.kind(), TargetKind::Display);
        assert_eq!(target.color_at(7, 1), Some(renderer.clear_rgb()));
        assert_eq!(target.color_at(8, 1), None);
    }
}
