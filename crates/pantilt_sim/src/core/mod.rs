//! # Core Module
//!
//! Shared configuration types used by every subsystem of the simulator.

pub mod config;

pub use config::{
    SimulationConfig,
    DisplayConfig,
    SensorConfig,
    RigConfig,
    MotionConfig,
    DisplayCameraConfig,
    RunConfig,
};
