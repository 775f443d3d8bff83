use clap::Parser;
use env_logger::Env;
use fluorbed::{RunOptions, config, run};
use fluorbed_core::ControlInputs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Number of frames to simulate
    #[arg(long, default_value = "11250")]
    ticks: u64,

    /// Real-time delta per frame in milliseconds
    #[arg(long, default_value = "16")]
    frame_ms: f64,

    /// Speed multiplier applied to real time
    #[arg(long, default_value = "1")]
    speed: f64,

    /// Wastewater flow rate (m³/h)
    #[arg(long, default_value = "450")]
    flow: f64,

    /// Inlet fluoride concentration (mg/L)
    #[arg(long, default_value = "50")]
    concentration: f64,

    /// Share of high-purity product, 0 to 100
    #[arg(long, default_value = "50")]
    purity: f64,

    /// RNG seed (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Write the JSON run report to this path
    #[arg(long)]
    report: Option<PathBuf>,

    /// Log progress every N ticks (0 disables)
    #[arg(long, default_value = "1800")]
    log_every: u64,

    /// Configuration file (RON); defaults to ./fluorbed.ron when present
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let sim_config = config::load(args.config.as_deref())?;

    let inputs = ControlInputs {
        flow_rate: args.flow,
        fluoride_concentration: args.concentration,
        purity_mix: args.purity,
        speed_multiplier: args.speed,
        running: true,
    };

    let options = RunOptions {
        ticks: args.ticks,
        frame_ms: args.frame_ms,
        seed: args.seed,
        log_every: args.log_every,
    };

    let report = run(sim_config, inputs, &options)?;

    if let Some(path) = args.report {
        report.save_json(&path)?;
    }

    Ok(())
}
