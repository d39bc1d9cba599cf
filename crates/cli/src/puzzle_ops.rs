//! `sqsum validate` / `solve` / `export` — puzzle file operations.

use std::path::Path;
use std::time::Duration;

use squaresum_client::SolverClient;
use squaresum_config::Settings;
use squaresum_core::{load_puzzle, present, save_puzzle, GridState, PuzzleSpec};
use squaresum_protocol::GameMode;

use crate::CliError;

pub fn client_for(settings: &Settings) -> SolverClient {
    SolverClient::with_timeout(
        &settings.api_base,
        Duration::from_secs(settings.request_timeout_secs),
    )
}

pub fn run_validate(input: &Path) -> Result<(), CliError> {
    let spec = load_puzzle(input)?;
    println!(
        "OK: {}x{} grid, target {}, {} known cell(s).",
        spec.size,
        spec.size,
        spec.target,
        spec.known_count(),
    );
    Ok(())
}

pub fn run_solve(
    settings: &Settings,
    input: &Path,
    trace: bool,
    json: bool,
    annotate: bool,
) -> Result<(), CliError> {
    let spec = load_puzzle(input)?;
    let client = client_for(settings);
    let response = client.solve(&spec, trace)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&response).unwrap_or_default());
        return Ok(());
    }

    if annotate {
        // Overwrite the grid with the solution while keeping the
        // submit-time provenance mask for the * markers.
        let mut state = GridState::from_spec(&spec);
        let mask = state.provided_mask();
        state.apply_solution(&response.solution, &mask);
        println!("{}", present::present_annotated(&state));
    } else {
        println!("{}", present::present_solution(&response));
    }

    if trace {
        if let Some(lines) = &response.trace {
            for line in lines {
                eprintln!("trace: {line}");
            }
        }
    }

    Ok(())
}

pub fn run_export(
    size: usize,
    target: i64,
    game_mode: GameMode,
    output: &Path,
) -> Result<(), CliError> {
    let spec = PuzzleSpec::empty(size, target, game_mode);
    // Route through the validator so bad --size/--target get the same
    // message as a bad file import.
    let spec = squaresum_core::puzzle::validate_json(&spec.to_interchange_json())?;
    save_puzzle(output, &spec)?;
    println!("Wrote {}.", output.display());
    Ok(())
}
