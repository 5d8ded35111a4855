use anyhow::Result;
use clap::Parser;
use kiss3d::light::Light;
use kiss3d::window::Window;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use solar_toy::gui::Simulation;
use solar_toy::model::catalog::TRACKED_BODY;
use solar_toy::model::{catalog, companion, System};

/// An animated toy solar system: a sun, a planet with a companion rock,
/// and their orbit paths. Drag to look around, scroll to zoom.
#[derive(Parser)]
struct Args {
    /// Seed for the rock deformation and the starting orbit phases.
    /// Omit it to get a fresh scene every run.
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let system = System::new(&catalog(), TRACKED_BODY, companion(), &mut rng)?;
    info!(
        bodies = system.bodies().count(),
        seeded = args.seed.is_some(),
        "built solar system"
    );

    let mut window = Window::new("Solar Toy");
    window.set_light(Light::StickToCamera);
    window.set_framerate_limit(Some(60));

    let simulation = Simulation::new(system, &mut window, &mut rng);
    window.render_loop(simulation);
    Ok(())
}
