use std::{
    path::PathBuf,
    process::ExitCode,
    time::{Duration, Instant},
};

use celestial::{utils, Config, Simulation, World};
use clap::Parser;
use log::{error, info, LevelFilter};

mod logger;

/// Headless run of the celestial simulation.
#[derive(Parser, Debug)]
#[command(name = "celestial", version)]
struct Args {
    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of bodies to scatter at start
    #[arg(short, long, default_value_t = 200)]
    bodies: usize,

    /// Radius of the disc the bodies start in
    #[arg(short, long, default_value_t = 400.0)]
    extent: f64,

    /// How long to run, in seconds
    #[arg(short, long, default_value_t = 10)]
    seconds: u64,

    /// off, error, warn, info, debug or trace
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let filter = args.log_level.parse().unwrap_or(LevelFilter::Info);
    if logger::Logger::init(filter).is_err() {
        eprintln!("logger already initialized");
    }

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> celestial::Result<()> {
    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    let mut world = World::new(&config);
    let seed = config.seed.unwrap_or_else(|| fastrand::u64(..));
    utils::uniform_field(&mut world, args.bodies, args.extent, seed)?;
    info!("seeded {} bodies (seed {})", world.len(), seed);

    let mut sim = Simulation::start(world, &config)?;
    let end = Instant::now() + Duration::from_secs(args.seconds);
    let mut next_report = Instant::now();

    while Instant::now() < end {
        let Ok(frame) = sim.frames().recv_timeout(Duration::from_millis(100)) else {
            continue;
        };
        if Instant::now() >= next_report {
            let heaviest = frame.iter().map(|b| b.radius).fold(0.0, f64::max);
            info!("{} bodies, largest radius {:.2}", frame.len(), heaviest);
            next_report += Duration::from_secs(1);
        }
    }

    sim.stop();
    info!("{} bodies left", sim.snapshot().len());
    Ok(())
}
