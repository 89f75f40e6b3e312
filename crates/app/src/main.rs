//! Run the competition menu against the simulated hub.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p hubrun-app -- --script 1,2,C,3
//! cargo run -p hubrun-app -- --config robot.json -v
//! ```
//!
//! Without `--script` picks are read from stdin; an empty line takes the
//! highlighted option and end of input closes the menu.

use std::error::Error;
use std::io;
use std::path::PathBuf;

use clap::{ArgAction, Parser};
use drive::RobotConfig;
use hubsim::{ConsoleMenu, ScriptedMenu, SimConfig, SimPlatform};
use log::{LevelFilter, info, warn};
use missions::{RunOutcome, boot, run_menu_loop, seasons};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

#[derive(Parser)]
#[command(name = "hubrun")]
#[command(about = "Menu-driven mission runner for a LEGO hub competition robot")]
struct Args {
    /// Robot configuration (JSON); built-in defaults when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Simulated hub tuning (JSON)
    #[arg(long)]
    sim_config: Option<PathBuf>,

    /// Comma separated menu picks, e.g. "1,2,C"
    #[arg(short, long)]
    script: Option<String>,

    /// Seed for simulated slip and gyro noise
    #[arg(long)]
    seed: Option<u64>,

    /// Season run table
    #[arg(long, default_value = seasons::submerged::NAME)]
    season: String,

    /// Print the effective robot configuration as JSON and exit
    #[arg(long)]
    dump_config: bool,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let args = Args::parse();

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let level = match args.verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    TermLogger::init(level, Config::default(), TerminalMode::Mixed, ColorChoice::Auto)?;

    let config = match &args.config {
        Some(path) => RobotConfig::load(path)?,
        None => RobotConfig::default(),
    };
    if args.dump_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    let mut sim = match &args.sim_config {
        Some(path) => SimConfig::load(path)?,
        None => SimConfig::default(),
    };
    if let Some(seed) = args.seed {
        sim.seed = seed;
    }

    let season = seasons::by_name(&args.season).ok_or_else(|| {
        format!(
            "unknown season {:?}, expected one of {:?}",
            args.season,
            seasons::SEASONS
        )
    })?;

    let platform = SimPlatform::new(sim);
    let mut platform = match &args.script {
        Some(script) => platform.with_menu(ScriptedMenu::parse(script)),
        None => platform.with_menu(ConsoleMenu::new(io::stdin().lock(), io::stderr())),
    };
    let probe = platform.probe();

    let (mut robot, mut session) = boot(&mut platform, config, &season)?;
    let reports = run_menu_loop(&mut robot, &mut session, &season)?;

    let failed = reports
        .iter()
        .filter(|r| matches!(r.outcome, RunOutcome::Failed(_)))
        .count();
    let pose = probe.pose();
    info!(
        "{} pick(s), {} failed, {:.1} s on the clock, battery {} mV",
        reports.len(),
        failed,
        probe.time_ms() / 1000.0,
        probe.battery_mv()
    );
    info!(
        "final pose x {:.0} mm, y {:.0} mm, heading {:.1} deg",
        pose.x, pose.y, pose.heading
    );
    if failed > 0 {
        warn!("{failed} run(s) stopped early, see the log above");
    }
    Ok(())
}
