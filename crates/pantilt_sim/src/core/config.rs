//! # Simulation Configuration
//!
//! Every tunable of the rig simulator lives here: display window, sensor
//! camera, rig limits, motion profile, third-person camera and host-loop
//! pacing. All sections are serde-serializable and default to the values of
//! the reference rig, so a config file only needs to name what it changes.
//!
//! ## Configuration Categories
//!
//! - **Display**: window title, size and whether it may be resized
//! - **Sensor**: synthetic camera resolution, projection and capture cadence
//! - **Rig**: actuator rate limits, placement and mesh asset directory
//! - **Motion**: sinusoidal pan sweep parameters
//! - **Run**: tick limit, fixed-step replay and frame pacing

use serde::{Serialize, Deserialize};

use crate::config::{Config, ConfigError};

/// Third-person display window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Window title
    pub title: String,
    /// Window width in pixels
    pub width: u32,
    /// Window height in pixels
    pub height: u32,
    /// Whether the display target may be resized after startup
    pub resizable: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            title: "Servo control".to_string(),
            width: 800,
            height: 600,
            resizable: false,
        }
    }
}

/// # Sensor Configuration
///
/// Resolution and projection of the rig-mounted camera. The projection is
/// fixed at rig construction; the offscreen target and both pixel buffers are
/// allocated at exactly `width` x `height`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    /// Sensor width in pixels
    pub width: u32,
    /// Sensor height in pixels
    pub height: u32,
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    /// Near clip distance
    pub near: f32,
    /// Far clip distance
    pub far: f32,
    /// Capture one sensor frame every this many ticks
    pub capture_every: u64,
    /// Name of the consumer window the feed is shown in
    pub window_name: String,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 640,
            fov_degrees: 60.0,
            near: 0.01,
            far: 100.0,
            capture_every: 2,
            window_name: "Sensor feed".to_string(),
        }
    }
}

/// Rig placement and actuator limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RigConfig {
    /// Maximum pan rate in radians per second
    pub max_pan_rate: f32,
    /// Maximum tilt rate in radians per second
    pub max_tilt_rate: f32,
    /// Constant tilt rate command applied at startup
    pub tilt_rate: f32,
    /// World position of the rig base
    pub base_position: [f32; 3],
    /// Directory holding `bottom.obj`, `servo.obj` and `upper.obj`
    pub asset_dir: String,
}

impl Default for RigConfig {
    fn default() -> Self {
        Self {
            max_pan_rate: 0.5,
            max_tilt_rate: 0.5,
            tilt_rate: 0.0,
            base_position: [0.0, 0.0, 0.0],
            asset_dir: "resources/models/pantilt".to_string(),
        }
    }
}

/// Sinusoidal pan sweep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Drive the pan axis at all
    pub enabled: bool,
    /// Peak pan angle of the sweep in degrees
    pub amplitude_degrees: f32,
    /// Sweep frequency in Hz
    pub frequency_hz: f32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            amplitude_degrees: 90.0,
            frequency_hz: 0.05,
        }
    }
}

/// Third-person camera placement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayCameraConfig {
    /// Camera position in world space
    pub position: [f32; 3],
    /// Look-at point in world space
    pub target: [f32; 3],
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    /// Near clip distance
    pub near: f32,
    /// Far clip distance
    pub far: f32,
}

impl Default for DisplayCameraConfig {
    fn default() -> Self {
        Self {
            position: [4.0, 3.0, -5.0],
            target: [0.0, 1.0, 0.0],
            fov_degrees: 60.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

/// Host loop behaviour
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Stop after this many ticks; run until interrupted when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_ticks: Option<u64>,
    /// Use this constant delta instead of wall-clock time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixed_delta: Option<f32>,
    /// Sleep to hold roughly this frame rate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_fps: Option<u32>,
}

/// # Complete Simulation Configuration
///
/// Top-level configuration that encompasses all subsystems.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Log level used when `RUST_LOG` is not set
    pub log_level: String,
    /// Display window
    pub display: DisplayConfig,
    /// Sensor camera
    pub sensor: SensorConfig,
    /// Rig limits and placement
    pub rig: RigConfig,
    /// Pan motion profile
    pub motion: MotionConfig,
    /// Third-person camera
    pub display_camera: DisplayCameraConfig,
    /// Host loop
    pub run: RunConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            display: DisplayConfig::default(),
            sensor: SensorConfig::default(),
            rig: RigConfig::default(),
            motion: MotionConfig::default(),
            display_camera: DisplayCameraConfig::default(),
            run: RunConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.display.width == 0 || self.display.height == 0 {
            return Err(ConfigError::Invalid("Display size must be non-zero".to_string()));
        }
        if self.sensor.width == 0 || self.sensor.height == 0 {
            return Err(ConfigError::Invalid("Sensor resolution must be non-zero".to_string()));
        }
        if self.sensor.capture_every == 0 {
            return Err(ConfigError::Invalid("capture_every must be at least 1".to_string()));
        }
        validate_fov("Sensor", self.sensor.fov_degrees)?;
        validate_fov("Display camera", self.display_camera.fov_degrees)?;
        validate_clip_planes("sensor", self.sensor.near, self.sensor.far)?;
        validate_clip_planes("display camera", self.display_camera.near, self.display_camera.far)?;

        for (axis, rate) in [("pan", self.rig.max_pan_rate), ("tilt", self.rig.max_tilt_rate)] {
            if !(rate.is_finite() && rate > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "Maximum {} rate must be positive, got {}",
                    axis, rate
                )));
            }
        }

        if !self.rig.tilt_rate.is_finite() {
            return Err(ConfigError::Invalid(format!("Tilt rate must be finite, got {}", self.rig.tilt_rate)));
        }
        if !self.rig.base_position.iter().all(|c| c.is_finite()) {
            return Err(ConfigError::Invalid(format!("Rig base position must be finite, got {:?}", self.rig.base_position)));
        }

        if !self.motion.amplitude_degrees.is_finite() {
            return Err(ConfigError::Invalid(format!(
                "Motion amplitude must be finite, got {}",
                self.motion.amplitude_degrees
            )));
        }
        if self.motion.frequency_hz < 0.0 || !self.motion.frequency_hz.is_finite() {
            return Err(ConfigError::Invalid("Motion frequency must be finite and non-negative".to_string()));
        }

        if let Some(delta) = self.run.fixed_delta {
            if !(delta.is_finite() && delta >= 0.0) {
                return Err(ConfigError::Invalid(format!("fixed_delta must be non-negative, got {}", delta)));
            }
        }

        Ok(())
    }
}

fn validate_fov(what: &str, fov_degrees: f32) -> Result<(), ConfigError> {
    if fov_degrees > 0.0 && fov_degrees < 180.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!(
            "{} field of view must be in (0, 180) degrees, got {}",
            what, fov_degrees
        )))
    }
}

fn validate_clip_planes(what: &str, near: f32, far: f32) -> Result<(), ConfigError> {
    if near > 0.0 && far > near {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!(
            "{} clip planes must satisfy 0 < near < far, got near={} far={}",
            what, near, far
        )))
    }
}

impl Config for SimulationConfig {}
