//! sim-runner: headless runner for the line traffic simulator.
//!
//! Usage:
//!   sim-runner <input_file> [--max-ticks 10000] [--db trace.db] [--trace] [--json]
//!   sim-runner --generate 40 --seed 7 [--stations 8 --travel-time 1 --frequency 3 --capacity 6]

use anyhow::{bail, Result};
use railsim_core::{
    config::{LineConfig, Scenario},
    engine::{RunOutcome, SimEngine, DEFAULT_MAX_TICKS},
    generator::{GeneratorParams, ScenarioGenerator},
    passenger::FinishedTrip,
    snapshot::SimSnapshot,
    store::SimStore,
    types::Tick,
};
use std::env;

#[derive(serde::Serialize)]
struct RunReport<'a> {
    run_id:      &'a str,
    outcome:     RunOutcome,
    finish_time: Option<Tick>,
    roster:      usize,
    snapshot:    SimSnapshot,
    finished:    &'a [FinishedTrip],
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let max_ticks = parse_arg(&args, "--max-ticks", DEFAULT_MAX_TICKS);
    let json = args.iter().any(|a| a == "--json");
    let trace = args.iter().any(|a| a == "--trace");
    let db = find_value(&args, "--db");

    let scenario = load_scenario(&args)?;

    let run_id = format!("run-{}", uuid::Uuid::new_v4());
    let mut engine = SimEngine::new(scenario.config, scenario.passengers)?;
    if let Some(path) = db {
        let store = SimStore::open(path)?;
        store.migrate()?;
        store.insert_run(&run_id, env!("CARGO_PKG_VERSION"), chrono::Utc::now().timestamp())?;
        engine = engine.with_store(store, run_id.clone())?;
    }

    let outcome = engine.run(max_ticks)?;
    log::info!("{run_id} finished with {outcome:?}");

    if trace {
        for event in engine.trace() {
            println!("{}", serde_json::to_string(event)?);
        }
    }

    if json {
        let report = RunReport {
            run_id:      &run_id,
            outcome,
            finish_time: outcome.finish_time(),
            roster:      engine.roster_size(),
            snapshot:    engine.snapshot(),
            finished:    engine.finished(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&engine, &run_id, outcome);
    }

    let ticks = engine.ticks();
    if let Some(store) = engine.into_store() {
        store.record_outcome(&run_id, outcome.finish_time(), ticks)?;
    }
    Ok(())
}

fn load_scenario(args: &[String]) -> Result<Scenario> {
    if let Some(count) = find_value(args, "--generate") {
        let defaults = GeneratorParams::default();
        let line = LineConfig::new(
            parse_arg(args, "--stations", defaults.line.num_stations),
            parse_arg(args, "--travel-time", defaults.line.travel_time),
            parse_arg(args, "--frequency", defaults.line.train_frequency),
            parse_arg(args, "--capacity", defaults.line.train_capacity),
        );
        let params = GeneratorParams {
            line,
            passengers: count.parse()?,
            max_ready_time: parse_arg(args, "--max-ready", defaults.max_ready_time),
            class_b_share: parse_arg(args, "--class-b-share", defaults.class_b_share),
        };
        let seed = parse_arg(args, "--seed", 42u64);
        return Ok(ScenarioGenerator::new(params, seed)?.generate());
    }

    // First positional argument that is not a flag value.
    let mut positional = args.iter().skip(1).enumerate().filter(|(i, a)| {
        !a.starts_with("--") && (!args[*i].starts_with("--") || is_switch(&args[*i]))
    });
    match positional.next() {
        Some((_, path)) => Ok(Scenario::load(path)?),
        None => bail!("format: sim-runner <input_file> | --generate <count> --seed <seed>"),
    }
}

fn print_summary(engine: &SimEngine, run_id: &str, outcome: RunOutcome) {
    let config = engine.config();
    println!("=== RUN SUMMARY ===");
    println!("  run_id:       {run_id}");
    println!("  stations:     {}", config.num_stations);
    println!("  travel time:  {}", config.travel_time);
    println!("  frequency:    {}", config.train_frequency);
    println!("  capacity:     {}", config.train_capacity);
    println!("  passengers:   {}", engine.roster_size());
    println!("  trains:       {}", engine.trains().len());
    println!("  delivered:    {}", engine.finished().len());
    match outcome {
        RunOutcome::Completed { finish_time } => {
            println!("  finish time:  {finish_time}");
        }
        RunOutcome::DidNotConverge { time, ticks } => {
            println!("  finish time:  did not finish (stopped at t={time} after {ticks} ticks)");
        }
    }
}

/// Flags that take no value.
fn is_switch(flag: &str) -> bool {
    matches!(flag, "--json" | "--trace")
}

fn find_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2).find(|w| w[0] == flag).map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
