//! # Pan/Tilt Rig Simulator
//!
//! A two-axis servo rig carrying a synthetic camera, simulated in a small
//! scene and rendered from two viewpoints every tick.
//!
//! ## Features
//!
//! - **Rate-limited actuators**: pan and tilt integrate clamped rate commands
//! - **Kinematic chain**: base, bracket, servo, head and sensor as scene nodes
//! - **Sensor feed**: offscreen render, read-back and row-order bridging
//! - **Third-person view**: display pass with a frustum helper the sensor never sees
//! - **Headless rendering**: CPU rasterizer behind the [`render::Renderer`] trait
//! - **Configuration**: TOML or RON files with per-section defaults
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pantilt_sim::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = SimulationConfig::default();
//!     let mut scene = Scene::new();
//!     let meshes = ObjDirectory::new(&config.rig.asset_dir);
//!     let rig = PanTiltRig::build(&mut scene, &meshes, &config)?;
//!
//!     let mut sim = Simulation::new(
//!         config,
//!         scene,
//!         rig,
//!         SoftwareRenderer::default(),
//!         LogDisplay::default(),
//!     )?;
//!     sim.run(&mut WallClock::new(), Some(600))?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod core;

pub mod foundation;
pub mod config;
pub mod assets;
pub mod scene;
pub mod render;
pub mod rig;
pub mod capture;
pub mod display;
pub mod simulation;

#[cfg(test)]
mod test_support;

pub use simulation::{FrameReport, Simulation, SimulationError};

/// Common imports for simulator users
pub mod prelude {
    pub use crate::{
        FrameReport, Simulation, SimulationError,
        foundation::{
            math::{Vec3, Mat4, Quat, Transform},
            time::{FixedDeltas, SimulationClock, TimeSource, WallClock},
        },
        assets::{MeshLibrary, MeshSource, ObjDirectory},
        scene::{NodeKey, RenderLayers, Scene, SceneNode},
        render::{Camera, Extent, Material, Mesh, Renderer, SoftwareRenderer},
        rig::{AngularActuator, MotionProfile, PanTiltRig, SinusoidalSweep},
        capture::{FrameBridge, FrameBuffer, RenderScheduler},
        display::{ImageDisplay, LogDisplay},
        config::Config,
        core::config::SimulationConfig,
    };
}
