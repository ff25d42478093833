//! # Cameras
//!
//! Two ways of pointing a renderer at the scene:
//!
//! - [`Camera`] is the free third-person camera defined by position, target
//!   and up vector (look-at).
//! - [`CameraView::from_pose`] turns any world-space pose (the rig-mounted
//!   sensor) into view and projection matrices. A pose camera looks down its
//!   local -Z axis with +Y up.
//!
//! Both produce a [`CameraView`], which is all a [`Renderer`](super::Renderer)
//! needs.

use nalgebra::{Isometry3, Translation3};

use crate::foundation::math::{Vec3, Mat4, Mat4Ext, Transform, utils};
use crate::render::Extent;

/// Perspective projection parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Vertical field of view in radians
    pub fov_y: f32,

    /// Aspect ratio (width / height)
    pub aspect: f32,

    /// Distance to near clipping plane
    pub near: f32,

    /// Distance to far clipping plane
    pub far: f32,
}

impl Projection {
    /// Projection from a field of view in degrees
    pub fn perspective(fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            fov_y: utils::deg_to_rad(fov_degrees),
            aspect,
            near,
            far,
        }
    }

    /// Projection whose aspect matches a target of the given size
    pub fn for_extent(fov_degrees: f32, extent: Extent, near: f32, far: f32) -> Self {
        Self::perspective(fov_degrees, extent.aspect(), near, far)
    }

    /// OpenGL-style projection matrix
    pub fn matrix(&self) -> Mat4 {
        Mat4::perspective(self.fov_y, self.aspect, self.near, self.far)
    }
}

/// Everything a renderer needs to know about the viewpoint of one pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraView {
    /// World to view space
    pub view: Mat4,

    /// View to clip space
    pub projection: Mat4,

    /// Eye position in world space
    pub eye: Vec3,
}

impl CameraView {
    /// View of a camera placed at `pose`, looking down the pose's local -Z
    ///
    /// Scale in the pose is ignored; only position and orientation define the
    /// viewpoint.
    pub fn from_pose(pose: &Transform, projection: &Projection) -> Self {
        let isometry = Isometry3::from_parts(Translation3::from(pose.position), pose.rotation);
        Self {
            view: isometry.inverse().to_homogeneous(),
            projection: projection.matrix(),
            eye: pose.position,
        }
    }

    /// Combined world to clip matrix
    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }

    /// World-space viewing direction
    pub fn forward(&self) -> Vec3 {
        // Third row of the view rotation is the camera's +Z axis in world space
        -Vec3::new(self.view[(2, 0)], self.view[(2, 1)], self.view[(2, 2)])
    }
}

/// Free look-at camera for the third-person display
#[derive(Debug, Clone)]
pub struct Camera {
    /// Camera position in world space
    pub position: Vec3,

    /// Point the camera is looking at in world space
    pub target: Vec3,

    /// Up vector for camera orientation (typically [0, 1, 0])
    pub up: Vec3,

    /// Projection parameters
    pub projection: Projection,
}

impl Camera {
    /// Create a perspective camera looking at the origin with +Y up
    pub fn perspective(position: Vec3, fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            position,
            target: Vec3::zeros(),
            up: Vec3::new(0.0, 1.0, 0.0),
            projection: Projection::perspective(fov_degrees, aspect, near, far),
        }
    }

    /// Update camera target (look-at point)
    pub fn set_target(&mut self, target: Vec3) {
        self.target = target;
        log::trace!("Display camera aimed at {:?}", target);
    }

    /// Update aspect ratio for a resized viewport
    pub fn set_aspect_ratio(&mut self, aspect: f32) {
        if (self.projection.aspect - aspect).abs() > 0.01 {
            log::info!("Camera aspect ratio changed: {:.3} -> {:.3}", self.projection.aspect, aspect);
        }
        self.projection.aspect = aspect;
    }

    /// World to view matrix
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at(self.position, self.target, self.up)
    }

    /// View to clip matrix
    pub fn projection_matrix(&self) -> Mat4 {
        self.projection.matrix()
    }

    /// Snapshot for one render pass
    pub fn view(&self) -> CameraView {
        CameraView {
            view: self.view_matrix(),
            projection: self.projection_matrix(),
            eye: self.position,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{Quat, Vec4, constants};
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn test_identity_pose_looks_down_negative_z() {
        let projection = Projection::perspective(60.0, 1.0, 0.1, 100.0);
        let view = CameraView::from_pose(&Transform::identity(), &projection);

        assert_relative_eq!(view.forward(), Vec3::new(0.0, 0.0, -1.0), epsilon = EPSILON);

        // A point straight ahead lands in the center of the screen
        let clip = view.view_projection() * Vec4::new(0.0, 0.0, -10.0, 1.0);
        assert_relative_eq!(clip.x / clip.w, 0.0, epsilon = EPSILON);
        assert_relative_eq!(clip.y / clip.w, 0.0, epsilon = EPSILON);
    }

    #[test]
    fn test_pose_view_ignores_scale_and_follows_rotation() {
        let pose = Transform::from_position_rotation(
            Vec3::new(1.0, 2.0, 3.0),
            Quat::from_axis_angle(&Vec3::y_axis(), -constants::HALF_PI),
        )
        .with_uniform_scale(4.0);
        let view = CameraView::from_pose(&pose, &Projection::perspective(60.0, 1.0, 0.1, 100.0));

        // -90° about Y turns the -Z view direction into +X
        assert_relative_eq!(view.forward(), Vec3::new(1.0, 0.0, 0.0), epsilon = EPSILON);
        assert_relative_eq!(view.eye, Vec3::new(1.0, 2.0, 3.0), epsilon = EPSILON);

        let eye_in_view = view.view * Vec4::new(1.0, 2.0, 3.0, 1.0);
        assert_relative_eq!(eye_in_view.xyz(), Vec3::zeros(), epsilon = EPSILON);
    }

    #[test]
    fn test_look_at_camera_matches_pose_camera() {
        let mut camera = Camera::perspective(Vec3::new(0.0, 0.0, 5.0), 60.0, 1.0, 0.1, 100.0);
        camera.set_target(Vec3::zeros());

        let pose_view = CameraView::from_pose(
            &Transform::from_position(Vec3::new(0.0, 0.0, 5.0)),
            &camera.projection,
        );

        assert_relative_eq!(camera.view().view, pose_view.view, epsilon = EPSILON);
    }

    #[test]
    fn test_projection_aspect_from_extent() {
        let projection = Projection::for_extent(60.0, Extent::new(800, 600), 0.01, 100.0);
        assert_relative_eq!(projection.aspect, 4.0 / 3.0, epsilon = EPSILON);
        assert_relative_eq!(projection.fov_y, constants::PI / 3.0, epsilon = EPSILON);
    }
}
