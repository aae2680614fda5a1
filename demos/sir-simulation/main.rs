use clap::Parser;
use ixa_sir::log::{set_log_level, LevelFilter};
use ixa_sir::{ConsoleReport, CsvReport, ReportSink, Simulation, SimulationConfig, SirError};
use std::path::PathBuf;
use std::process::ExitCode;

/// Runs a stochastic SIR epidemic over a closed population
#[derive(Parser, Debug)]
struct Args {
    /// Optional path for a JSON simulation config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Random seed; overrides the seed in the config file
    #[arg(short, long)]
    random_seed: Option<u64>,

    /// Optional path for a CSV report of the daily counts
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Log level: off, error, warn, info, debug or trace
    #[arg(short, long, default_value = "off")]
    log_level: LevelFilter,
}

fn run(args: Args) -> Result<(), SirError> {
    set_log_level(args.log_level);

    let mut config = match &args.config {
        Some(path) => SimulationConfig::from_json_file(path)?,
        None => SimulationConfig::default(),
    };
    if args.random_seed.is_some() {
        config.seed = args.random_seed;
    }

    println!("=== SIR Epidemic Simulation ===");
    println!("{config}");
    println!();

    let simulation = Simulation::new(config)?;
    let seed = simulation.cohort().base_seed();
    let mut sink: Box<dyn ReportSink> = match &args.output {
        Some(path) => Box::new(CsvReport::create(path)?),
        None => Box::new(ConsoleReport::stdout()),
    };
    let summary = simulation.run(sink.as_mut())?;

    println!();
    println!("=== Final Statistics ===");
    println!("{summary}");
    println!("Seed: {seed}");
    Ok(())
}

fn main() -> ExitCode {
    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
