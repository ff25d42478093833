//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the simulator:
//! - Math types and operations
//! - Simulation time and frame deltas
//! - Logging utilities

pub mod math;
pub mod time;
pub mod logging;
