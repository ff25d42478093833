//! # Simulation Loop
//!
//! [`Simulation`] owns every piece of per-run state (scene, rig, clock,
//! targets and pixel buffers) and advances it one tick at a time:
//!
//! 1. advance the clock
//! 2. pan rate command from the motion profile
//! 3. integrate the rig and write link rotations
//! 4. move the frustum helper to the sensor pose
//! 5. on capture ticks: sensor pass, read-back, row flip
//! 6. display pass
//! 7. on capture ticks: hand the bridged frame to the display
//!
//! Both pixel buffers are allocated once at construction and overwritten on
//! each capture tick.

use std::time::{Duration, Instant};

use thiserror::Error;

use crate::assets::AssetError;
use crate::capture::{BufferLayout, CaptureError, FrameBridge, FrameBuffer, RenderScheduler};
use crate::config::ConfigError;
use crate::core::SimulationConfig;
use crate::display::{DisplayError, ImageDisplay};
use crate::foundation::math::Vec3;
use crate::foundation::time::{SimulationClock, TimeSource};
use crate::render::{Camera, Extent, RenderError, Renderer, TargetKind};
use crate::rig::{profile_from_config, MotionProfile, PanTiltRig, RigError};
use crate::scene::{NodeKey, Scene, SceneError};

/// Simulation errors
#[derive(Error, Debug)]
pub enum SimulationError {
    /// Configuration could not be loaded or failed validation
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Asset loading failed
    #[error("Asset error: {0}")]
    Asset(#[from] AssetError),

    /// Scene construction failed
    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),

    /// Rig construction or update failed
    #[error("Rig error: {0}")]
    Rig(#[from] RigError),

    /// Renderer failed
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// Sensor capture failed
    #[error("Capture error: {0}")]
    Capture(#[from] CaptureError),

    /// Display refused a frame
    #[error("Display error: {0}")]
    Display(#[from] DisplayError),

    /// Resize requested for a display configured as fixed-size
    #[error("Display '{0}' is not resizable")]
    DisplayNotResizable(String),
}

/// What happened during one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    /// Tick index
    pub tick: u64,
    /// Delta applied this tick
    pub delta: f32,
    /// Elapsed simulation time after this tick
    pub elapsed: f32,
    /// Whether a sensor frame was captured and shown
    pub captured: bool,
    /// Pan rate command from the motion profile
    pub pan_rate_command: f32,
    /// Pan angle after integration
    pub pan_angle: f32,
    /// Tilt angle after integration
    pub tilt_angle: f32,
}

/// The running rig simulation
pub struct Simulation<R: Renderer, D: ImageDisplay> {
    config: SimulationConfig,
    scene: Scene,
    rig: PanTiltRig,
    motion: Box<dyn MotionProfile>,
    clock: SimulationClock,
    scheduler: RenderScheduler,
    bridge: FrameBridge,
    renderer: R,
    display: D,
    display_camera: Camera,
    sensor_target: R::Target,
    display_target: R::Target,
    raw_frame: FrameBuffer,
    bridged_frame: FrameBuffer,
    frustum_helper: NodeKey,
    frames_captured: u64,
}

impl<R: Renderer, D: ImageDisplay> Simulation<R, D> {
    /// Wire up a simulation around an already-built scene and rig
    ///
    /// Allocates both render targets and both pixel buffers at the sensor
    /// resolution and adds the frustum helper to the scene.
    pub fn new(
        config: SimulationConfig,
        mut scene: Scene,
        rig: PanTiltRig,
        mut renderer: R,
        display: D,
    ) -> Result<Self, SimulationError> {
        config.validate()?;

        let sensor_extent = rig.sensor_camera().resolution;
        let configured = Extent::new(config.sensor.width, config.sensor.height);
        if sensor_extent != configured {
            return Err(CaptureError::BufferSizeMismatch {
                expected: configured,
                actual: sensor_extent,
            }
            .into());
        }

        let (consumer_rows, consumer_channels) = display.expected_layout();
        let bridge = FrameBridge::new(
            BufferLayout::new(sensor_extent, renderer.native_row_order(), consumer_channels),
            BufferLayout::new(sensor_extent, consumer_rows, consumer_channels),
        )?;
        let raw_frame = FrameBuffer::new(bridge.source_layout());
        let bridged_frame = FrameBuffer::new(bridge.destination_layout());

        let display_extent = Extent::new(config.display.width, config.display.height);
        let sensor_target = renderer.create_target(TargetKind::Sensor, sensor_extent)?;
        let display_target = renderer.create_target(TargetKind::Display, display_extent)?;

        let camera_config = &config.display_camera;
        let mut display_camera = Camera::perspective(
            Vec3::from(camera_config.position),
            camera_config.fov_degrees,
            display_extent.aspect(),
            camera_config.near,
            camera_config.far,
        );
        display_camera.set_target(Vec3::from(camera_config.target));

        let frustum_helper = rig.attach_frustum_helper(&mut scene)?;
        let scheduler = RenderScheduler::new(config.sensor.capture_every, sensor_extent);
        let motion = profile_from_config(&config.motion);

        log::info!("Simulation ready: sensor {} every {} ticks, display {} '{}'",
                   sensor_extent, scheduler.capture_every(), display_extent, config.display.title);

        Ok(Self {
            config,
            scene,
            rig,
            motion,
            clock: SimulationClock::new(),
            scheduler,
            bridge,
            renderer,
            display,
            display_camera,
            sensor_target,
            display_target,
            raw_frame,
            bridged_frame,
            frustum_helper,
            frames_captured: 0,
        })
    }

    /// Run one tick with the given frame delta in seconds
    pub fn tick(&mut self, delta: f32) -> Result<FrameReport, SimulationError> {
        let tick = self.clock.advance(delta);

        let command = self.motion.pan_rate(tick.elapsed);
        self.rig.set_pan_rate(command);
        self.rig.update(&mut self.scene, tick.delta)?;
        self.rig.sync_frustum_helper(&mut self.scene, self.frustum_helper)?;

        let captured = self.scheduler.should_capture(tick.index);
        if captured {
            let view = self.rig.sensor_view(&self.scene)?;
            self.scheduler.render_sensor_frame(
                &mut self.renderer,
                &self.scene,
                &view,
                &mut self.sensor_target,
                &mut self.raw_frame,
                self.bridge.readback_order(),
            )?;
            self.bridge.bridge_into(&self.raw_frame, &mut self.bridged_frame)?;
        }

        self.scheduler.render_display_frame(
            &mut self.renderer,
            &self.scene,
            &self.display_camera.view(),
            &mut self.display_target,
        )?;

        if captured {
            self.display.show_image(&self.config.sensor.window_name, &self.bridged_frame)?;
            self.frames_captured += 1;
        }

        log::trace!("Tick {} dt {:.4} captured {}", tick.index, tick.delta, captured);

        Ok(FrameReport {
            tick: tick.index,
            delta: tick.delta,
            elapsed: tick.elapsed,
            captured,
            pan_rate_command: command,
            pan_angle: self.rig.pan_angle(),
            tilt_angle: self.rig.tilt_angle(),
        })
    }

    /// Tick until an error occurs or `max_ticks` ticks have run
    ///
    /// Holds `run.target_fps` from the config when set. Returns the number of
    /// ticks run by this call.
    pub fn run(&mut self, time: &mut dyn TimeSource, max_ticks: Option<u64>) -> Result<u64, SimulationError> {
        let frame_budget = self
            .config
            .run
            .target_fps
            .filter(|fps| *fps > 0)
            .map(|fps| Duration::from_secs_f64(1.0 / f64::from(fps)));

        log::info!("Starting simulation loop (max ticks: {:?})", max_ticks);
        let mut ran = 0u64;

        while max_ticks.map_or(true, |max| ran < max) {
            let frame_start = Instant::now();

            let delta = time.next_delta();
            self.tick(delta)?;
            ran += 1;

            if let Some(budget) = frame_budget {
                let spent = frame_start.elapsed();
                if spent < budget {
                    std::thread::sleep(budget - spent);
                }
            }
        }

        log::info!("Simulation loop finished after {} ticks ({} sensor frames, {:.2}s simulated)",
                   ran, self.frames_captured, self.clock.elapsed());
        Ok(ran)
    }

    /// Resize the display target and adapt the display camera's aspect
    ///
    /// Fails with [`SimulationError::DisplayNotResizable`] unless
    /// `display.resizable` is set; the sensor target never changes size.
    pub fn resize_display(&mut self, extent: Extent) -> Result<(), SimulationError> {
        if !self.config.display.resizable {
            return Err(SimulationError::DisplayNotResizable(self.config.display.title.clone()));
        }
        self.renderer.set_target_size(&mut self.display_target, extent)?;
        self.display_camera.set_aspect_ratio(extent.aspect());
        Ok(())
    }

    /// Replace the pan motion profile
    pub fn set_motion_profile(&mut self, profile: Box<dyn MotionProfile>) {
        self.motion = profile;
    }

    /// Active configuration
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Scene being simulated
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// The rig
    pub fn rig(&self) -> &PanTiltRig {
        &self.rig
    }

    /// The rig, for manual tilt control
    pub fn rig_mut(&mut self) -> &mut PanTiltRig {
        &mut self.rig
    }

    /// Simulation clock
    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    /// Renderer collaborator
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Display collaborator
    pub fn display(&self) -> &D {
        &self.display
    }

    /// Third-person camera
    pub fn display_camera_mut(&mut self) -> &mut Camera {
        &mut self.display_camera
    }

    /// Last read-back in renderer layout
    pub fn raw_frame(&self) -> &FrameBuffer {
        &self.raw_frame
    }

    /// Last frame handed to the display
    pub fn bridged_frame(&self) -> &FrameBuffer {
        &self.bridged_frame
    }

    /// Offscreen sensor target
    pub fn sensor_target(&self) -> &R::Target {
        &self.sensor_target
    }

    /// Display target
    pub fn display_target(&self) -> &R::Target {
        &self.display_target
    }

    /// Scene node of the frustum helper
    pub fn frustum_helper(&self) -> NodeKey {
        self.frustum_helper
    }

    /// Sensor frames captured so far
    pub fn frames_captured(&self) -> u64 {
        self.frames_captured
    }
}
