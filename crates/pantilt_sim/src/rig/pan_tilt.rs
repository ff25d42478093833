//! # Pan/Tilt Rig
//!
//! Two [`AngularActuator`]s composed through a fixed chain of scene nodes that
//! carries the sensor camera:
//!
//! ```text
//! base ── bracket (pan about Y) ── servo ── head (tilt about Z) ── sensor
//! ```
//!
//! The rig owns only the actuator state and weak [`NodeKey`] handles; the
//! scene owns the nodes. Each update writes the *absolute* actuator angles into
//! the bracket and head rotations, so the sensor's world orientation is always
//! `base ∘ pan ∘ tilt ∘ mount`.
//!
//! The sensor sits a short distance along the head's +X axis and is turned
//! -90° about Y, which points its -Z viewing axis along the head's +X.

use thiserror::Error;

use crate::assets::{AssetError, MeshSource};
use crate::core::SimulationConfig;
use crate::foundation::math::{constants, Quat, Transform, Vec3};
use crate::render::{CameraView, Extent, Material, Mesh, Projection};
use crate::scene::{NodeKey, RenderLayers, Scene, SceneError, SceneNode};

use super::AngularActuator;

/// Scene name of the static rig base
pub const BASE_NODE: &str = "pantilt_base";
/// Scene name of the pan link
pub const BRACKET_NODE: &str = "pantilt_bracket";
/// Scene name of the servo link
pub const SERVO_NODE: &str = "pantilt_servo";
/// Scene name of the tilt link
pub const HEAD_NODE: &str = "pantilt_head";
/// Scene name of the sensor camera node
pub const SENSOR_NODE: &str = "pantilt_sensor";
/// Scene name of the frustum visualization
pub const FRUSTUM_HELPER_NODE: &str = "pantilt_sensor_frustum";

/// Logical mesh names the rig loads
pub const RIG_MESHES: [&str; 3] = ["bottom", "servo", "upper"];

/// Offset of the servo link on the bracket
const SERVO_OFFSET: [f32; 3] = [0.66, 0.75, 0.0];
/// Servo assets are modelled at a tenth of scene scale
const SERVO_SCALE: f32 = 10.0;
/// Sensor position along the head's +X, head-local units
const SENSOR_OFFSET: f32 = 0.03;
/// Depth of the drawn frustum helper in world units
const FRUSTUM_HELPER_DEPTH: f32 = 1.0;

/// Rig construction and update errors
#[derive(Error, Debug)]
pub enum RigError {
    /// A rig mesh could not be loaded
    #[error("Failed to load rig mesh '{name}': {source}")]
    AssetLoad {
        /// Logical mesh name
        name: String,
        /// Underlying asset error
        #[source]
        source: AssetError,
    },

    /// Actuator rate limit is zero, negative or not finite
    #[error("Invalid maximum rate: {0}")]
    InvalidMaxRate(f32),

    /// A link node the rig relies on is gone from the scene
    #[error("Rig link '{0}' is missing from the scene")]
    MissingLink(&'static str),

    /// Scene rejected a rig node
    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),
}

/// Handles to the rig's scene nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RigLinks {
    /// Static base
    pub base: NodeKey,
    /// Pan link
    pub bracket: NodeKey,
    /// Servo link
    pub servo: NodeKey,
    /// Tilt link
    pub head: NodeKey,
    /// Sensor camera leaf
    pub sensor: NodeKey,
}

/// Rig-mounted camera
///
/// The projection is fixed when the rig is built and derives its aspect from
/// the sensor resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorCamera {
    /// Scene node carrying the camera pose
    pub node: NodeKey,
    /// Fixed projection
    pub projection: Projection,
    /// Resolution frames are rendered at
    pub resolution: Extent,
}

/// Two-axis camera rig
#[derive(Debug, Clone)]
pub struct PanTiltRig {
    pan: AngularActuator,
    tilt: AngularActuator,
    links: RigLinks,
    camera: SensorCamera,
}

impl PanTiltRig {
    /// Load the rig meshes and attach the link chain under the scene root
    ///
    /// Fails with [`RigError::AssetLoad`] when any of [`RIG_MESHES`] is
    /// unavailable; nothing is added to the scene in that case.
    pub fn build(scene: &mut Scene, meshes: &dyn MeshSource, config: &SimulationConfig) -> Result<Self, RigError> {
        let rig = &config.rig;
        let sensor = &config.sensor;

        let mut pan = AngularActuator::new(rig.max_pan_rate)?;
        let mut tilt = AngularActuator::new(rig.max_tilt_rate)?;
        pan.set_rate_command(0.0);
        tilt.set_rate_command(rig.tilt_rate);

        let [bottom, servo, upper] = RIG_MESHES.map(|name| {
            meshes.load_mesh(name).map_err(|source| RigError::AssetLoad {
                name: name.to_string(),
                source,
            })
        });
        let (bottom, servo, upper) = (bottom?, servo?, upper?);

        let housing = Mesh::cuboid(0.6, 1.0, 0.6).translated([0.0, 0.5, 0.0]);
        let grey = Material::new().with_color(0.6, 0.6, 0.65);

        let base = scene.add_to_root(
            SceneNode::new(BASE_NODE).with_transform(Transform::from_position(Vec3::from(rig.base_position))),
        )?;
        let bracket = scene.add(base, SceneNode::new(BRACKET_NODE).with_mesh(housing, Material::orange()))?;
        let servo_link = scene.add(
            bracket,
            SceneNode::new(SERVO_NODE)
                .with_transform(Transform::from_position(Vec3::from(SERVO_OFFSET)).with_uniform_scale(SERVO_SCALE))
                .with_mesh(servo, grey.clone()),
        )?;
        // Fixed servo mount plate, drawn with the servo link but not part of the chain
        scene.add(servo_link, SceneNode::new("pantilt_bottom").with_mesh(bottom, grey.clone()))?;
        let head = scene.add(
            servo_link,
            // Tilt pivots about the servo origin
            SceneNode::new(HEAD_NODE).with_mesh(upper, grey),
        )?;
        let sensor_node = scene.add(
            head,
            SceneNode::new(SENSOR_NODE).with_transform(Transform::from_position_rotation(
                Vec3::new(SENSOR_OFFSET, 0.0, 0.0),
                Quat::from_axis_angle(&Vec3::y_axis(), -constants::HALF_PI),
            )),
        )?;

        let resolution = Extent::new(sensor.width, sensor.height);
        let camera = SensorCamera {
            node: sensor_node,
            projection: Projection::for_extent(sensor.fov_degrees, resolution, sensor.near, sensor.far),
            resolution,
        };

        log::info!("Pan/tilt rig built: max rates {:.3}/{:.3} rad/s, sensor {} at {:.0}° fov",
                   rig.max_pan_rate, rig.max_tilt_rate, resolution, sensor.fov_degrees);

        Ok(Self {
            pan,
            tilt,
            links: RigLinks {
                base,
                bracket,
                servo: servo_link,
                head,
                sensor: sensor_node,
            },
            camera,
        })
    }

    /// Integrate both actuators and write their angles into the link rotations
    pub fn update(&mut self, scene: &mut Scene, delta: f32) -> Result<(), RigError> {
        let pan = self.pan.integrate(delta);
        let tilt = self.tilt.integrate(delta);

        scene
            .set_rotation(self.links.bracket, Quat::from_axis_angle(&Vec3::y_axis(), pan))
            .map_err(|_| RigError::MissingLink(BRACKET_NODE))?;
        scene
            .set_rotation(self.links.head, Quat::from_axis_angle(&Vec3::z_axis(), tilt))
            .map_err(|_| RigError::MissingLink(HEAD_NODE))?;

        log::trace!("Rig angles: pan {:.4} rad, tilt {:.4} rad", pan, tilt);
        Ok(())
    }

    /// Current pan angle in radians
    pub fn pan_angle(&self) -> f32 {
        self.pan.angle()
    }

    /// Current tilt angle in radians
    pub fn tilt_angle(&self) -> f32 {
        self.tilt.angle()
    }

    /// Command the pan rate in radians per second
    pub fn set_pan_rate(&mut self, rate: f32) {
        self.pan.set_rate_command(rate);
    }

    /// Command the tilt rate in radians per second
    pub fn set_tilt_rate(&mut self, rate: f32) {
        self.tilt.set_rate_command(rate);
    }

    /// Pan actuator
    pub fn pan_actuator(&self) -> &AngularActuator {
        &self.pan
    }

    /// Tilt actuator
    pub fn tilt_actuator(&self) -> &AngularActuator {
        &self.tilt
    }

    /// Node handles of the link chain
    pub fn links(&self) -> &RigLinks {
        &self.links
    }

    /// The rig-mounted camera
    pub fn sensor_camera(&self) -> &SensorCamera {
        &self.camera
    }

    /// World pose of the sensor camera
    pub fn sensor_pose(&self, scene: &Scene) -> Result<Transform, RigError> {
        scene
            .world_transform(self.camera.node)
            .map_err(|_| RigError::MissingLink(SENSOR_NODE))
    }

    /// View of the sensor camera for rendering
    pub fn sensor_view(&self, scene: &Scene) -> Result<CameraView, RigError> {
        let pose = self.sensor_pose(scene)?;
        Ok(CameraView::from_pose(&pose, &self.camera.projection))
    }

    /// World-space direction the sensor looks along
    pub fn sensor_forward(&self, scene: &Scene) -> Result<Vec3, RigError> {
        let pose = self.sensor_pose(scene)?;
        Ok(pose.rotation * Vec3::new(0.0, 0.0, -1.0))
    }

    /// Add a frustum visualization on the helper layer under the scene root
    ///
    /// It is positioned by [`PanTiltRig::sync_frustum_helper`].
    pub fn attach_frustum_helper(&self, scene: &mut Scene) -> Result<NodeKey, RigError> {
        let projection = &self.camera.projection;
        let mesh = Mesh::frustum(projection.fov_y, projection.aspect, FRUSTUM_HELPER_DEPTH);
        let material = Material::new().with_color(1.0, 0.9, 0.2).unlit();

        let key = scene.add_to_root(
            SceneNode::new(FRUSTUM_HELPER_NODE)
                .with_mesh(mesh, material)
                .with_layers(RenderLayers::HELPERS),
        )?;
        self.sync_frustum_helper(scene, key)?;
        Ok(key)
    }

    /// Move the frustum helper to the sensor's current pose
    pub fn sync_frustum_helper(&self, scene: &mut Scene, helper: NodeKey) -> Result<(), RigError> {
        let pose = self.sensor_pose(scene)?;
        // Scale is dropped so the helper keeps its world-unit depth
        let placement = Transform::from_position_rotation(pose.position, pose.rotation);
        scene.set_transform(helper, placement)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{MeshLibrary, ObjDirectory};
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-5;

    fn meshes() -> MeshLibrary {
        MeshLibrary::new()
            .with("bottom", Mesh::cuboid(0.06, 0.01, 0.04))
            .with("servo", Mesh::cuboid(0.04, 0.03, 0.02))
            .with("upper", Mesh::cuboid(0.04, 0.02, 0.03))
    }

    fn build() -> (Scene, PanTiltRig) {
        let mut scene = Scene::new();
        let rig = PanTiltRig::build(&mut scene, &meshes(), &SimulationConfig::default()).unwrap();
        (scene, rig)
    }

    #[test]
    fn test_rest_pose_looks_along_positive_x() {
        let (scene, rig) = build();

        let forward = rig.sensor_forward(&scene).unwrap();
        assert_relative_eq!(forward, Vec3::new(1.0, 0.0, 0.0), epsilon = EPSILON);

        // The sensor offset scales with the servo link: 0.66 + 10·0.03
        let pose = rig.sensor_pose(&scene).unwrap();
        assert_relative_eq!(pose.position, Vec3::new(0.96, 0.75, 0.0), epsilon = EPSILON);
    }

    #[test]
    fn test_tilt_pivots_about_servo_origin() {
        let (mut scene, mut rig) = build();
        let servo = scene.world_transform(rig.links().servo).unwrap();
        let head = scene.world_transform(rig.links().head).unwrap();
        assert_relative_eq!(head.position, servo.position, epsilon = EPSILON);

        rig.set_tilt_rate(0.5);
        rig.update(&mut scene, constants::PI / 2.0).unwrap();

        // The sensor swings on a 0.3 radius around the servo origin
        let swing = 0.3 * std::f32::consts::FRAC_1_SQRT_2;
        let pose = rig.sensor_pose(&scene).unwrap();
        assert_relative_eq!(pose.position, Vec3::new(0.66 + swing, 0.75 + swing, 0.0), epsilon = EPSILON);
    }

    #[test]
    fn test_quarter_pan_turns_sensor_to_negative_z() {
        let (mut scene, mut rig) = build();
        rig.set_pan_rate(constants::HALF_PI);

        // Command exceeds the 0.5 rad/s limit, one second only gets 0.5 rad
        rig.update(&mut scene, 1.0).unwrap();
        assert_relative_eq!(rig.pan_angle(), 0.5, epsilon = EPSILON);

        // π/2 is reached after π seconds in total
        rig.update(&mut scene, constants::PI - 1.0).unwrap();
        assert_relative_eq!(rig.pan_angle(), constants::HALF_PI, epsilon = EPSILON);
        let forward = rig.sensor_forward(&scene).unwrap();
        assert_relative_eq!(forward, Vec3::new(0.0, 0.0, -1.0), epsilon = EPSILON);
    }

    #[test]
    fn test_tilt_raises_the_view() {
        let (mut scene, mut rig) = build();
        rig.set_tilt_rate(0.5);
        rig.update(&mut scene, constants::PI / 2.0).unwrap();

        assert_relative_eq!(rig.tilt_angle(), constants::PI / 4.0, epsilon = EPSILON);
        let half_sqrt2 = std::f32::consts::FRAC_1_SQRT_2;
        let forward = rig.sensor_forward(&scene).unwrap();
        assert_relative_eq!(forward, Vec3::new(half_sqrt2, half_sqrt2, 0.0), epsilon = EPSILON);
    }

    #[test]
    fn test_forward_follows_pan_then_tilt() {
        let (mut scene, mut rig) = build();
        rig.set_pan_rate(0.4);
        rig.set_tilt_rate(-0.3);
        for _ in 0..7 {
            rig.update(&mut scene, 0.25).unwrap();
        }

        let (pan, tilt) = (rig.pan_angle(), rig.tilt_angle());
        let expected = Vec3::new(tilt.cos() * pan.cos(), tilt.sin(), -tilt.cos() * pan.sin());
        assert_relative_eq!(rig.sensor_forward(&scene).unwrap(), expected, epsilon = EPSILON);
    }

    #[test]
    fn test_zero_delta_updates_are_idempotent() {
        let (mut scene, mut rig) = build();
        rig.set_pan_rate(0.3);
        rig.update(&mut scene, 0.5).unwrap();
        let pose = rig.sensor_pose(&scene).unwrap();

        for _ in 0..5 {
            rig.update(&mut scene, 0.0).unwrap();
        }
        assert_eq!(rig.sensor_pose(&scene).unwrap(), pose);
        assert_eq!(rig.pan_angle(), 0.15);
    }

    #[test]
    fn test_rotations_are_absolute_not_incremental() {
        let (mut scene, mut rig) = build();
        rig.set_pan_rate(0.2);
        rig.update(&mut scene, 1.0).unwrap();
        rig.update(&mut scene, 1.0).unwrap();

        let bracket = scene.get(rig.links().bracket).unwrap();
        assert_relative_eq!(bracket.transform.rotation.angle(), 0.4, epsilon = EPSILON);
    }

    #[test]
    fn test_sensor_projection_is_fixed_from_resolution() {
        let mut config = SimulationConfig::default();
        config.sensor.width = 640;
        config.sensor.height = 480;
        let mut scene = Scene::new();
        let rig = PanTiltRig::build(&mut scene, &meshes(), &config).unwrap();

        let camera = rig.sensor_camera();
        assert_eq!(camera.resolution, Extent::new(640, 480));
        assert_relative_eq!(camera.projection.aspect, 4.0 / 3.0, epsilon = EPSILON);
        assert_relative_eq!(camera.projection.near, 0.01, epsilon = EPSILON);
        assert_relative_eq!(camera.projection.far, 100.0, epsilon = EPSILON);
        assert_eq!(scene.find(SENSOR_NODE), Some(camera.node));
    }

    #[test]
    fn test_missing_mesh_fails_without_touching_scene() {
        let partial = MeshLibrary::new().with("bottom", Mesh::cube()).with("servo", Mesh::cube());
        let mut scene = Scene::new();

        let err = PanTiltRig::build(&mut scene, &partial, &SimulationConfig::default()).unwrap_err();
        match err {
            RigError::AssetLoad { name, .. } => assert_eq!(name, "upper"),
            other => panic!("unexpected error: {}", other),
        }
        assert!(scene.is_empty());
    }

    #[test]
    fn test_invalid_rate_limit_is_rejected() {
        let mut config = SimulationConfig::default();
        config.rig.max_tilt_rate = 0.0;
        let mut scene = Scene::new();

        assert!(matches!(
            PanTiltRig::build(&mut scene, &meshes(), &config),
            Err(RigError::InvalidMaxRate(_))
        ));
    }

    #[test]
    fn test_frustum_helper_tracks_sensor() {
        let (mut scene, mut rig) = build();
        let helper = rig.attach_frustum_helper(&mut scene).unwrap();
        assert_eq!(scene.get(helper).unwrap().layers, RenderLayers::HELPERS);

        rig.set_pan_rate(0.5);
        rig.update(&mut scene, 1.0).unwrap();
        rig.sync_frustum_helper(&mut scene, helper).unwrap();

        let sensor = rig.sensor_pose(&scene).unwrap();
        let placed = scene.world_transform(helper).unwrap();
        assert_relative_eq!(placed.position, sensor.position, epsilon = EPSILON);
        assert_relative_eq!(placed.scale, Vec3::new(1.0, 1.0, 1.0), epsilon = EPSILON);
        assert!(placed.rotation.angle_to(&sensor.rotation) < EPSILON);
    }

    #[test]
    fn test_shipped_assets_load() {
        let directory = ObjDirectory::new(concat!(env!("CARGO_MANIFEST_DIR"), "/../../resources/models/pantilt"));
        let mut scene = Scene::new();

        let rig = PanTiltRig::build(&mut scene, &directory, &SimulationConfig::default()).unwrap();
        assert_eq!(scene.find(HEAD_NODE), Some(rig.links().head));
    }
}
