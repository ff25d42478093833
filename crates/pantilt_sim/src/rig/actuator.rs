//! Bounded-rate angular actuator
//!
//! One rotational degree of freedom driven by a rate command. The applied
//! rate is the command clamped to `±max_rate`; the angle is the running
//! integral of the applied rate and is never wrapped or reset.

use super::RigError;

/// Rate-limited integrator for one rotation axis
#[derive(Debug, Clone, PartialEq)]
pub struct AngularActuator {
    angle: f32,
    rate_command: f32,
    max_rate: f32,
}

impl AngularActuator {
    /// Actuator at angle zero with no command
    ///
    /// `max_rate` is in radians per second and must be positive and finite.
    pub fn new(max_rate: f32) -> Result<Self, RigError> {
        if !(max_rate.is_finite() && max_rate > 0.0) {
            return Err(RigError::InvalidMaxRate(max_rate));
        }
        Ok(Self {
            angle: 0.0,
            rate_command: 0.0,
            max_rate,
        })
    }

    /// Store a desired rate in radians per second
    ///
    /// Any value is accepted; clamping happens when integrating.
    pub fn set_rate_command(&mut self, rate: f32) {
        self.rate_command = rate;
    }

    /// Last commanded rate
    pub fn rate_command(&self) -> f32 {
        self.rate_command
    }

    /// Rate limit
    pub fn max_rate(&self) -> f32 {
        self.max_rate
    }

    /// Current absolute angle in radians
    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// Rate that integration applies, the command clamped to the limit
    pub fn effective_rate(&self) -> f32 {
        self.rate_command.clamp(-self.max_rate, self.max_rate)
    }

    /// Advance the angle by `effective_rate * delta` and return it
    ///
    /// A negative or non-finite `delta`, or a NaN command, leaves the angle
    /// untouched for this step.
    pub fn integrate(&mut self, delta: f32) -> f32 {
        if !(delta.is_finite() && delta >= 0.0) {
            log::warn!("Skipping actuator integration: invalid delta {}", delta);
            return self.angle;
        }
        if self.rate_command.is_nan() {
            log::warn!("Skipping actuator integration: rate command is NaN");
            return self.angle;
        }

        self.angle += self.effective_rate() * delta;
        self.angle
    }
}
