//! Cardio Sim - Entry point
//!
//! Headless cardiac action potential simulator.
//!
//! CLI Usage:
//!   cargo run -- --diagnose                       # Simulate 3 s and print a summary
//!   cargo run -- --diagnose -n 5000 --drug TTX=0.01
//!   cargo run -- --live --cell atrial --rate 2    # Real-time readout

use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use cardio_sim::{
    config::Parameters,
    export::{export_session_json, CsvExporter},
    state::SimulationSession,
    CellType, Phase,
};

/// Parsed command line
struct CliArgs {
    diagnose: bool,
    live: bool,
    duration_ms: f64,
    cell_type: Option<CellType>,
    rate_hz: Option<f64>,
    speed: Option<f64>,
    drugs: Vec<String>,
    csv: bool,
    json: bool,
    config_dir: Option<PathBuf>,
}

impl Default for CliArgs {
    fn default() -> Self {
        Self {
            diagnose: false,
            live: false,
            duration_ms: 3000.0,
            cell_type: None,
            rate_hz: None,
            speed: None,
            drugs: Vec::new(),
            csv: false,
            json: false,
            config_dir: None,
        }
    }
}

fn print_help() {
    println!("Cardio Sim");
    println!();
    println!("Usage: cardio-sim [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --diagnose, -d       Run headless and print a summary (default)");
    println!("  --live, -l           Run on the wall clock, printing each phase change");
    println!("  -n, --duration MS    Simulated duration in ms (default: 3000)");
    println!("  --cell TYPE          ventricular | atrial");
    println!("  --rate HZ            Stimulation rate in Hz");
    println!("  --speed X            Simulated ms per tick");
    println!("  --drug NAME=UM       Apply a drug (TTX, verapamil, diltiazem); repeatable");
    println!("  --config DIR         Directory containing session.json");
    println!("  --csv                Export the trace to exports/*.csv");
    println!("  --json               Export the session summary to exports/*.json");
    println!("  --help, -h           Show this help");
}

/// Take the value following a flag
fn next_value<'a>(args: &'a [String], i: &mut usize, flag: &str) -> Result<&'a str> {
    *i += 1;
    args.get(*i)
        .map(String::as_str)
        .with_context(|| format!("missing value for {}", flag))
}

/// Parse CLI arguments
fn parse_args() -> Result<CliArgs> {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs::default();

    let mut i = 1;
    while i < args.len() {
        let flag = args[i].as_str();
        match flag {
            "--diagnose" | "-d" => cli.diagnose = true,
            "--live" | "-l" => cli.live = true,
            "-n" | "--duration" => {
                cli.duration_ms = next_value(&args, &mut i, flag)?
                    .parse()
                    .context("duration must be a number of ms")?;
            }
            "--cell" => cli.cell_type = Some(next_value(&args, &mut i, flag)?.parse()?),
            "--rate" => {
                let rate = next_value(&args, &mut i, flag)?;
                cli.rate_hz = Some(rate.parse().context("rate must be a number of Hz")?);
            }
            "--speed" => {
                let speed = next_value(&args, &mut i, flag)?;
                cli.speed = Some(speed.parse().context("speed must be a number")?);
            }
            "--drug" => cli.drugs.push(next_value(&args, &mut i, flag)?.to_string()),
            "--config" => cli.config_dir = Some(PathBuf::from(next_value(&args, &mut i, flag)?)),
            "--csv" => cli.csv = true,
            "--json" => cli.json = true,
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            other => bail!("unknown argument: {} (see --help)", other),
        }
        i += 1;
    }

    Ok(cli)
}

/// Build a session from config file values overridden by CLI flags
fn build_session(cli: &CliArgs) -> Result<SimulationSession> {
    let params = match &cli.config_dir {
        Some(dir) => Parameters::load_from_dir(dir),
        None => Parameters::load_or_default(),
    };

    let mut session = SimulationSession::new(params.session)?;
    if let Some(cell_type) = cli.cell_type {
        session.set_cell_type(cell_type);
    }
    if let Some(rate) = cli.rate_hz {
        session.set_stimulation_rate(rate)?;
    }
    if let Some(speed) = cli.speed {
        session.set_speed(speed)?;
    }
    for spec in &cli.drugs {
        session.apply_drug_spec(spec)?;
    }
    Ok(session)
}

/// Run headless and print results
fn run_diagnostics(session: &mut SimulationSession, duration_ms: f64) -> Result<()> {
    println!("=== Cardio Sim - Diagnostics ===\n");

    let start_time = Instant::now();
    let produced = session.run_for(duration_ms)?;
    let elapsed = start_time.elapsed();

    println!("Samples produced: {}", produced);
    println!("Elapsed time: {:.2?}", elapsed);
    println!();
    session.metrics().print_summary();
    Ok(())
}

/// Drive the session from the wall clock until the simulated duration elapses
fn run_live(session: &mut SimulationSession, duration_ms: f64) -> Result<()> {
    let clock = Instant::now();
    let end_ms = session.time_ms() + duration_ms;
    let mut last_phase: Option<Phase> = None;

    session.start();
    while session.time_ms() < end_ms {
        let now_ms = clock.elapsed().as_secs_f64() * 1000.0;
        let fired_before = session.ticks_fired();
        match session.advance(now_ms) {
            Some(sample) => {
                if last_phase != Some(sample.phase) {
                    println!(
                        "{:8.1} ms  {:6.1} mV  {}{}",
                        sample.time_ms,
                        sample.voltage_mV,
                        sample.phase,
                        if sample.stimulated { "  [stim]" } else { "" }
                    );
                    last_phase = Some(sample.phase);
                }
            }
            // Ticks fail deterministically, so a skipped tick means no progress
            None if session.ticks_fired() > fired_before => {
                session.stop();
                bail!("simulation stalled at {:.3} ms", session.time_ms());
            }
            None => {}
        }
        thread::sleep(Duration::from_millis(1));
    }
    session.stop();

    println!();
    session.metrics().print_summary();
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = parse_args()?;
    if cli.live && cli.diagnose {
        bail!("--live and --diagnose cannot be combined");
    }
    let mut session = build_session(&cli)?;

    log::info!(
        "Session ready: {} cell, {} Hz, {}x",
        session.params().cell_type,
        session.params().stimulation_rate_hz,
        session.params().speed
    );

    if cli.live {
        run_live(&mut session, cli.duration_ms)?;
    } else {
        run_diagnostics(&mut session, cli.duration_ms)?;
    }

    if cli.csv {
        let mut exporter = CsvExporter::new(0.0)?;
        exporter.record_all(session.trace().iter())?;
        let path = exporter.finish()?;
        println!("\nTrace written to {}", path.display());
    }
    if cli.json {
        let path = export_session_json(&session.metrics())?;
        println!("Session written to {}", path.display());
    }

    Ok(())
}
