//! Time-driven pan commands
//!
//! A [`MotionProfile`] maps elapsed simulation time to a pan rate command. The
//! sweep profile is the derivative of a sinusoidal angle trajectory, so the
//! command is continuous and the rig swings smoothly back and forth. Tilt is
//! never driven by a profile.

use crate::core::MotionConfig;
use crate::foundation::math::{constants, utils};

/// Source of pan rate commands
pub trait MotionProfile {
    /// Pan rate in radians per second at `elapsed` seconds
    fn pan_rate(&self, elapsed: f32) -> f32;
}

/// Sinusoidal sweep around the starting heading
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SinusoidalSweep {
    /// Peak pan angle in degrees
    pub amplitude_degrees: f32,
    /// Sweep frequency in Hz
    pub frequency_hz: f32,
}

impl SinusoidalSweep {
    /// Create a sweep
    pub fn new(amplitude_degrees: f32, frequency_hz: f32) -> Self {
        Self {
            amplitude_degrees,
            frequency_hz,
        }
    }

    /// Pan rate in degrees per second, before conversion
    pub fn pan_rate_degrees(&self, elapsed: f32) -> f32 {
        let omega = constants::TAU * self.frequency_hz;
        self.amplitude_degrees * omega * (omega * elapsed).cos()
    }

    /// Pan angle in radians an ideal follower would have at `elapsed`
    pub fn pan_angle(&self, elapsed: f32) -> f32 {
        let omega = constants::TAU * self.frequency_hz;
        utils::deg_to_rad(self.amplitude_degrees * (omega * elapsed).sin())
    }
}

impl MotionProfile for SinusoidalSweep {
    fn pan_rate(&self, elapsed: f32) -> f32 {
        utils::deg_to_rad(self.pan_rate_degrees(elapsed))
    }
}

/// Holds the pan axis still
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stationary;

impl MotionProfile for Stationary {
    fn pan_rate(&self, _elapsed: f32) -> f32 {
        0.0
    }
}

/// Profile described by a motion config section
pub fn profile_from_config(config: &MotionConfig) -> Box<dyn MotionProfile> {
    if config.enabled {
        Box::new(SinusoidalSweep::new(config.amplitude_degrees, config.frequency_hz))
    } else {
        Box::new(Stationary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-4;

    #[test]
    fn test_peak_rate_at_start() {
        let sweep = SinusoidalSweep::new(90.0, 0.05);

        // 2π · 0.05 · 90 · cos(0) = 9π degrees per second
        assert_relative_eq!(sweep.pan_rate_degrees(0.0), 9.0 * constants::PI, epsilon = EPSILON);
        assert_relative_eq!(sweep.pan_rate_degrees(0.0), 28.274_334, epsilon = EPSILON);
    }

    #[test]
    fn test_radian_conversion_applied_once() {
        let sweep = SinusoidalSweep::new(90.0, 0.05);
        let rate = sweep.pan_rate(0.0);

        // 9π° = 0.05 · π² rad
        assert_relative_eq!(rate, 9.0 * constants::PI * constants::DEG_TO_RAD, epsilon = EPSILON);
        assert_relative_eq!(rate, 0.493_480_2, epsilon = EPSILON);
        assert!(rate < 1.0, "converted twice or not at all: {}", rate);
    }

    #[test]
    fn test_rate_is_derivative_of_angle() {
        let sweep = SinusoidalSweep::new(90.0, 0.05);
        let h = 1e-2;
        for t in [0.0_f32, 1.3, 5.0, 7.7, 12.0] {
            let numeric = (sweep.pan_angle(t + h) - sweep.pan_angle(t - h)) / (2.0 * h);
            assert_relative_eq!(numeric, sweep.pan_rate(t), epsilon = 1e-3);
        }
    }

    #[test]
    fn test_quarter_period_is_a_turning_point() {
        let sweep = SinusoidalSweep::new(90.0, 0.05);
        // Period 20 s, the rate crosses zero at 5 s with the angle at its peak
        assert_relative_eq!(sweep.pan_rate(5.0), 0.0, epsilon = EPSILON);
        assert_relative_eq!(sweep.pan_angle(5.0), constants::HALF_PI, epsilon = EPSILON);
    }

    #[test]
    fn test_profile_from_config() {
        let mut config = MotionConfig::default();
        assert!(profile_from_config(&config).pan_rate(0.0) > 0.0);

        config.enabled = false;
        assert_eq!(profile_from_config(&config).pan_rate(0.0), 0.0);
        assert_eq!(Stationary.pan_rate(123.0), 0.0);
    }
}
