//! Register the plugin on the in-memory host, replay every usage example
//! and print the registration report as JSON.
//!
//! Usage: `stew-replay [config.json]`

use std::process::ExitCode;

use stew_core::{logging, register_plugin, StewConfig};
use stew_sandbox::Sandbox;

fn run() -> Result<bool, Box<dyn std::error::Error>> {
    let config = match std::env::args().nth(1) {
        Some(path) => StewConfig::from_path(path)?,
        None => StewConfig::default(),
    };
    logging::init(&config.log_level);

    let mut sandbox = Sandbox::new(config.sandbox_config());
    let report = register_plugin(&mut sandbox, &config)?;
    let outcomes = sandbox.run_examples();
    for outcome in outcomes.iter().filter(|o| !o.is_ok()) {
        if let Err(err) = &outcome.result {
            tracing::error!(action = %outcome.action, example = %outcome.example, error = %err, "example failed");
        }
    }

    println!("{}", report.to_json_pretty()?);
    Ok(outcomes.iter().all(|o| o.is_ok()))
}

fn main() -> ExitCode {
    match run() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("stew-replay: {err}");
            ExitCode::from(2)
        }
    }
}
