//! `sqsum count` / `status` / `cancel` / `health` — counting-job commands.

use std::path::Path;
use std::thread;
use std::time::Duration;

use squaresum_client::{CountJobController, CountOptions};
use squaresum_config::Settings;
use squaresum_core::{load_puzzle, present::present};
use squaresum_protocol::CountMode;

use crate::exit_codes::EXIT_JOB_FAILED;
use crate::puzzle_ops::client_for;
use crate::CliError;

pub struct CountArgs {
    pub mode: Option<CountMode>,
    pub max_seconds: Option<f64>,
    pub sample_paths: Option<u32>,
    pub multiprocessing: bool,
    pub workers: Option<u32>,
    pub watch: bool,
    pub yes: bool,
}

fn options_from(settings: &Settings, args: &CountArgs) -> CountOptions {
    let defaults = &settings.count;
    let mode = args.mode.unwrap_or(match defaults.mode.as_str() {
        "exact" => CountMode::Exact,
        "estimate" => CountMode::Estimate,
        _ => CountMode::Auto,
    });
    let max_seconds = match mode {
        // exact runs unbounded; a configured budget would be ignored
        CountMode::Exact => None,
        _ => Some(args.max_seconds.unwrap_or(defaults.max_seconds)),
    };
    CountOptions {
        mode,
        max_seconds,
        sample_paths: args.sample_paths.unwrap_or(defaults.sample_paths),
        use_multiprocessing: args.multiprocessing,
        workers: args.workers.or(defaults.workers),
    }
}

pub fn run_count(settings: &Settings, input: &Path, args: CountArgs) -> Result<(), CliError> {
    let spec = load_puzzle(input)?;
    let options = options_from(settings, &args);

    if options.mode == CountMode::Exact && !args.yes {
        return Err(CliError {
            code: crate::exit_codes::EXIT_USAGE,
            message: "exact mode counts without a time limit and may run for a very long \
                      time; pass --yes to confirm"
                .into(),
        });
    }

    let request = options.to_request(&spec)?;
    let client = client_for(settings);

    if !args.watch {
        // One-shot start; no poll loop to arm.
        let job_id = client.start_count_job(&request)?;
        println!("Started count job {job_id}.");
        println!("Follow it with `sqsum status {job_id}`.");
        return Ok(());
    }

    let controller = CountJobController::with_poll_interval(
        client,
        Duration::from_millis(settings.poll_interval_ms),
    );
    let job_id = controller.start(request)?;
    log::info!("watching count job {job_id}");

    // Echo each new presenter line until the job terminates.
    let refresh = Duration::from_millis(settings.poll_interval_ms.max(50) / 4);
    let mut last_line = String::new();
    loop {
        let (phase, snapshot) = controller.snapshot();
        if snapshot.is_some() {
            let line = present(snapshot.as_ref());
            if line != last_line {
                println!("{line}");
                last_line = line;
            }
        }
        if !phase.is_active() {
            controller.dispose();
            if phase == squaresum_client::JobPhase::Failed {
                let message = controller
                    .notice()
                    .unwrap_or_else(|| "counting job failed".into());
                return Err(CliError { code: EXIT_JOB_FAILED, message });
            }
            return Ok(());
        }
        thread::sleep(refresh);
    }
}

pub fn run_status(settings: &Settings, job_id: &str) -> Result<(), CliError> {
    let client = client_for(settings);
    let snapshot = client.job_status(job_id)?;
    println!("{}", present(Some(&snapshot)));
    Ok(())
}

pub fn run_cancel(settings: &Settings, job_id: &str) -> Result<(), CliError> {
    let client = client_for(settings);
    client.cancel_job(job_id)?;
    println!("Cancellation requested for {job_id}; the job stops once the service confirms.");
    Ok(())
}

pub fn run_health(settings: &Settings) -> Result<(), CliError> {
    let client = client_for(settings);
    let health = client.health()?;
    println!("Service at {} reports: {}.", client.api_base(), health.status);
    Ok(())
}
