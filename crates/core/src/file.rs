// Puzzle file import/export
//
// Interchange format: {size, target, game_mode, known_grid} with
// known_grid a size×size array of (int|null). Export then re-import
// reproduces an equivalent PuzzleSpec.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::puzzle::{validate_json, PuzzleSpec, ValidationError};

/// Load and validate a puzzle file.
pub fn load_puzzle(path: &Path) -> Result<PuzzleSpec, ValidationError> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        ValidationError::Io(format!("cannot read {}: {e}", path.display()))
    })?;

    let raw: serde_json::Value = serde_json::from_str(&contents).map_err(|_| {
        ValidationError::Shape(format!("{} is not valid JSON", path.display()))
    })?;

    validate_json(&raw)
}

/// Write a puzzle in the interchange format.
pub fn save_puzzle(path: &Path, spec: &PuzzleSpec) -> Result<(), ValidationError> {
    let file = File::create(path).map_err(|e| {
        ValidationError::Io(format!("cannot write {}: {e}", path.display()))
    })?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, &spec.to_interchange_json())
        .map_err(|e| ValidationError::Io(e.to_string()))
}
