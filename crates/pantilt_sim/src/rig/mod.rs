//! Pan/tilt rig
//!
//! Rate-limited actuators, the articulated rig that carries the sensor camera,
//! and the motion profiles that drive its pan axis.

pub mod actuator;
pub mod motion;
pub mod pan_tilt;

pub use actuator::AngularActuator;
pub use motion::{profile_from_config, MotionProfile, SinusoidalSweep, Stationary};
pub use pan_tilt::{PanTiltRig, RigError, RigLinks, SensorCamera};
