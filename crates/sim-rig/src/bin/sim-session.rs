//! Runs one behavioral session against a simulated subject and prints the
//! session report as JSON.

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{value_parser, Arg, ArgAction, Command};
use session_core::{load_conditions, SessionParams};
use session_metrics::SessionMetrics;
use sim_rig::{
    demo_conditions, demo_params, LoggingStimulus, MemoryControl, SessionClock, SimulatedSubject,
    SubjectProfile,
};
use tracing::{info, Level};
use trial_fsm::{Experiment, SetupStatus};

fn init_tracing(json: bool, verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let builder = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> Result<()> {
    let matches = Command::new("sim-session")
        .about("Run a trial session against a simulated subject")
        .arg(
            Arg::new("params")
                .long("params")
                .value_name("PATH")
                .value_parser(value_parser!(PathBuf))
                .help("Session parameters JSON (defaults to a quick demo setup)"),
        )
        .arg(
            Arg::new("conditions")
                .long("conditions")
                .value_name("PATH")
                .value_parser(value_parser!(PathBuf))
                .help("JSON array of condition parameters (defaults to a staircase demo)"),
        )
        .arg(
            Arg::new("trials")
                .long("trials")
                .value_parser(value_parser!(usize))
                .default_value("50")
                .help("Send a remote stop after this many trials"),
        )
        .arg(
            Arg::new("p-correct")
                .long("p-correct")
                .value_parser(value_parser!(f64))
                .default_value("0.8")
                .help("Probability that the subject picks the correct port"),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .value_parser(value_parser!(u64))
                .help("Seed for both the condition selector and the subject"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON lines"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .action(ArgAction::SetTrue)
                .help("Log every state entry"),
        )
        .arg(
            Arg::new("metrics")
                .long("metrics")
                .action(ArgAction::SetTrue)
                .help("Print prometheus metrics after the report"),
        )
        .get_matches();

    init_tracing(matches.get_flag("json"), matches.get_flag("verbose"));

    let mut params = match matches.get_one::<PathBuf>("params") {
        Some(path) => SessionParams::from_json_file(path)
            .with_context(|| format!("loading session params from {}", path.display()))?,
        None => demo_params(),
    };
    if let Some(seed) = matches.get_one::<u64>("seed") {
        params.seed = Some(*seed);
    }
    let conditions = match matches.get_one::<PathBuf>("conditions") {
        Some(path) => load_conditions(path)
            .with_context(|| format!("loading conditions from {}", path.display()))?,
        None => demo_conditions()?,
    };
    let trials = matches.get_one::<usize>("trials").copied().unwrap_or(50);
    let profile = SubjectProfile {
        p_correct: matches.get_one::<f64>("p-correct").copied().unwrap_or(0.8),
        ..SubjectProfile::default()
    };

    let clock = SessionClock::new();
    let (control, remote) = MemoryControl::new(clock);
    info!(session = %control.session_id(), trials, "simulated session");
    let subject = SimulatedSubject::new(clock, profile, params.seed)?;
    let metrics = SessionMetrics::new(&params.setup)?;

    let watcher = remote.stop_after(trials);
    let outcome = Experiment::setup(
        control,
        subject,
        LoggingStimulus::default(),
        params,
        conditions,
    )?
    .with_observer(metrics.clone())
    .run();
    remote.set_status(SetupStatus::Exit);
    watcher
        .join()
        .map_err(|_| anyhow!("stop watcher panicked"))?;

    let report = outcome?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    if matches.get_flag("metrics") {
        print!("{}", metrics.export()?);
    }
    Ok(())
}
