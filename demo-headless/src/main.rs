use clap::Parser;
use grove_sim_core::{GrowthStage, Session, SimulationConfig, WeatherEvent};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Grove ecosystem simulation demo with configurable parameters
#[derive(Parser, Debug)]
#[command(name = "grove-sim-demo")]
#[command(about = "Headless grow/burn/water ecosystem simulation", long_about = None)]
struct Args {
    /// JSON configuration file; missing fields keep their defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Master seed (overrides the configuration file)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Grid width in cells (overrides the configuration file)
    #[arg(long)]
    width: Option<usize>,

    /// Grid height in cells (overrides the configuration file)
    #[arg(long)]
    height: Option<usize>,

    /// Simulation duration in seconds
    #[arg(short, long, default_value_t = 600.0)]
    duration: f32,

    /// Frame time per update in seconds
    #[arg(long, default_value_t = 1.0 / 30.0)]
    dt: f32,

    /// Fraction of cells seeded before the run starts
    #[arg(long, default_value_t = 0.2)]
    seed_fraction: f32,

    /// Ignite the grid centre after this many seconds (negative = never)
    #[arg(short, long, default_value_t = 120.0)]
    ignite_at: f32,

    /// Report interval in seconds
    #[arg(short, long, default_value_t = 30.0)]
    report_interval: f32,

    /// Print every weather event as it is drained
    #[arg(long)]
    events: bool,
}

fn load_config(args: &Args) -> Result<SimulationConfig, String> {
    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .map_err(|e| format!("reading {}: {e}", path.display()))?;
            serde_json::from_str(&text).map_err(|e| format!("parsing {}: {e}", path.display()))?
        }
        None => SimulationConfig::default(),
    };

    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(width) = args.width {
        config.grid.width = width;
    }
    if let Some(height) = args.height {
        config.grid.height = height;
    }
    Ok(config)
}

/// Scatter seedlings over roughly `fraction` of the grid
fn sow(session: &mut Session, fraction: f32) -> usize {
    let mut rng = StdRng::seed_from_u64(session.seed());
    let (width, height) = (session.grid().width(), session.grid().height());
    let mut planted = 0;
    for y in 0..height {
        for x in 0..width {
            if rng.random::<f32>() < fraction && session.place_seed(x, y) {
                planted += 1;
            }
        }
    }
    planted
}

fn print_row(session: &Session) {
    let stats = session.stats();
    println!(
        "{:7.1} | {:12} | {:6} | {:5} | {:5} | {:5} | {:5} | {:5} | {:7} | {:5.2}",
        session.time(),
        session.phase(),
        session.season(),
        stats.count(GrowthStage::SmallPlant),
        stats.count(GrowthStage::SmallTree),
        stats.count(GrowthStage::MediumTree),
        stats.count(GrowthStage::LargeTree),
        stats.count(GrowthStage::Burnt),
        stats.burning,
        stats.mean_water
    );
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(message) => {
            error!("Could not load configuration: {}", message);
            return ExitCode::FAILURE;
        }
    };

    let mut session = match Session::new(config) {
        Ok(session) => session,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    println!("=== Grove Simulation Demo ===\n");
    println!(
        "Grid {}x{}, seed {}, {:.0}s at dt={:.3}s",
        session.grid().width(),
        session.grid().height(),
        session.seed(),
        args.duration,
        args.dt
    );
    let planted = sow(&mut session, args.seed_fraction.clamp(0.0, 1.0));
    println!("Sowed {} seedlings\n", planted);

    println!("Time(s) | Weather      | Season | Plant | STree | MTree | LTree | Burnt | Burning | Water");
    println!("--------|--------------|--------|-------|-------|-------|-------|-------|---------|------");
    print_row(&session);

    let dt = args.dt.max(1e-3);
    let centre = session.cell_center(session.grid().width() / 2, session.grid().height() / 2);
    let mut ignited = args.ignite_at < 0.0;
    let mut next_report = args.report_interval;
    let mut ticks = 0;

    while session.time() < args.duration {
        if !ignited && session.time() >= args.ignite_at {
            session.ignite_at(centre);
            ignited = true;
            info!("Ignited grid centre at t={:.1}s", session.time());
        }

        ticks += session.update(dt).len();

        let events = session.drain_events();
        if args.events {
            for event in events {
                match event {
                    WeatherEvent::PhaseStarted(phase) => {
                        println!("        > {:.1}s weather turns {}", session.time(), phase);
                    }
                    WeatherEvent::SeasonChanged { from, to } => {
                        println!("        > {:.1}s season {} -> {}", session.time(), from, to);
                    }
                    WeatherEvent::PhaseEnded(_) => {}
                }
            }
        }

        if args.report_interval > 0.0 && session.time() >= next_report {
            print_row(&session);
            next_report += args.report_interval;
        }
    }

    let stats = session.stats();
    println!("\n=== Summary ===");
    println!("Ticks run: {}", ticks);
    println!("Weather transitions: {}", session.weather().transitions());
    println!("Seasons completed: {}", session.seasons().seasons_completed());
    println!("Living plants: {}", stats.plants());
    println!("Burn scars: {}", stats.count(GrowthStage::Burnt));
    println!(
        "Mean water {:.3}, sunlight {:.3}, heat {:.3}",
        stats.mean_water, stats.mean_sunlight, stats.mean_heat
    );

    ExitCode::SUCCESS
}
