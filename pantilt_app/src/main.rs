//! Pan/tilt rig demo
//!
//! Builds a placeholder scene, mounts the rig in it and runs the simulation
//! headless: the sensor feed goes to a logging display and the third-person
//! view is rendered by the software renderer.
//!
//! Usage: `pantilt_demo [config.toml|config.ron]`

mod scene_setup;

use pantilt_sim::assets::ObjDirectory;
use pantilt_sim::config::{Config, ConfigError};
use pantilt_sim::core::SimulationConfig;
use pantilt_sim::display::LogDisplay;
use pantilt_sim::foundation::logging;
use pantilt_sim::foundation::time::{FixedDeltas, TimeSource, WallClock};
use pantilt_sim::render::SoftwareRenderer;
use pantilt_sim::rig::PanTiltRig;
use pantilt_sim::scene::{Scene, SceneError};
use pantilt_sim::{Simulation, SimulationError};
use thiserror::Error;

const DEFAULT_CONFIG_PATH: &str = "resources/config/pantilt.toml";

#[derive(Error, Debug)]
enum DemoError {
    #[error("Failed to load '{path}': {source}")]
    Config {
        path: String,
        #[source]
        source: ConfigError,
    },

    #[error("Failed to build scene: {0}")]
    Scene(#[from] SceneError),

    #[error(transparent)]
    Simulation(#[from] SimulationError),
}

fn load_config() -> Result<SimulationConfig, DemoError> {
    match std::env::args().nth(1) {
        Some(path) => SimulationConfig::load_from_file(&path).map_err(|source| DemoError::Config { path, source }),
        None if std::path::Path::new(DEFAULT_CONFIG_PATH).exists() => {
            SimulationConfig::load_from_file(DEFAULT_CONFIG_PATH).map_err(|source| DemoError::Config {
                path: DEFAULT_CONFIG_PATH.to_string(),
                source,
            })
        }
        None => Ok(SimulationConfig::default()),
    }
}

fn run() -> Result<(), DemoError> {
    let config = load_config()?;
    logging::init_with_level(&config.log_level);
    log::info!("Starting pan/tilt rig demo");

    let mut scene = Scene::new();
    scene_setup::populate(&mut scene)?;

    let meshes = ObjDirectory::new(&config.rig.asset_dir);
    let rig = PanTiltRig::build(&mut scene, &meshes, &config).map_err(SimulationError::from)?;

    let max_ticks = config.run.max_ticks;
    let mut time: Box<dyn TimeSource> = match config.run.fixed_delta {
        Some(step) => {
            log::info!("Replaying with fixed delta {:.4}s", step);
            Box::new(FixedDeltas::constant(step))
        }
        None => Box::new(WallClock::new()),
    };

    let mut sim = Simulation::new(config, scene, rig, SoftwareRenderer::default(), LogDisplay::default())?;
    let ticks = sim.run(time.as_mut(), max_ticks)?;

    let stats = sim.renderer().stats();
    log::info!("Demo finished: {} ticks, {} sensor frames shown, {} render passes, {} triangles drawn",
               ticks, sim.display().frames_shown(), stats.passes, stats.triangles_drawn);
    Ok(())
}

fn main() {
    // Set up panic hook for better error reporting
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("PANIC occurred: {:?}", panic_info);

        if let Some(location) = panic_info.location() {
            eprintln!("Panic location: {}:{}:{}", location.file(), location.line(), location.column());
        }
    }));

    if let Err(e) = run() {
        // Logging may not be up yet if the config failed to load
        logging::init_with_level("error");
        log::error!("Demo failed: {}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
