//! Puzzle definition and validation.
//!
//! Raw, untyped input (free-text form fields or parsed JSON from a file)
//! is converted into a [`PuzzleSpec`] or rejected with a structured
//! [`ValidationError`]. Validation is all-or-nothing: a result is never
//! partially applied.
//!
//! ## Coordinate convention
//!
//! Internally rows and columns are 0-based. User-facing messages
//! (`ValidationError::Cell`) are 1-based.

use std::fmt;

use serde_json::Value;

use squaresum_protocol::GameMode;

// ── Constants ───────────────────────────────────────────────────────

/// Smallest supported grid side length.
pub const MIN_SIZE: usize = 2;
/// Largest supported grid side length.
pub const MAX_SIZE: usize = 7;
/// Smallest value any cell may hold.
pub const MIN_VALUE: u32 = 1;

// ── Error type ──────────────────────────────────────────────────────

/// Validation failure for user- or file-supplied puzzle data.
///
/// Always locally recoverable: surfaced as a message, never fatal.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Wrong JSON shape or type (missing field, non-object root, …).
    Shape(String),
    /// An integer field is outside its allowed bounds.
    Range { field: &'static str, value: i64, min: i64, max: i64 },
    /// A grid cell holds something other than empty/null or an integer ≥ 1.
    /// Coordinates are 0-based; rendered 1-based.
    Cell { row: usize, col: usize, detail: String },
    /// File read/write failure (import/export paths only).
    Io(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Shape(msg) => write!(f, "{msg}"),
            Self::Range { field, value, min, max } => {
                write!(f, "{field} must be within [{min}, {max}] (got {value})")
            }
            Self::Cell { row, col, detail } => {
                write!(f, "cell ({}, {}): {detail}", row + 1, col + 1)
            }
            Self::Io(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for ValidationError {}

// ── PuzzleSpec ──────────────────────────────────────────────────────

/// A validated, normalized puzzle definition. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct PuzzleSpec {
    pub size: usize,
    pub target: i64,
    pub game_mode: GameMode,
    /// Exactly `size × size`; `Some(v)` only for `v >= MIN_VALUE`.
    pub known_grid: Vec<Vec<Option<u32>>>,
}

impl PuzzleSpec {
    /// Interchange JSON: `{size, target, game_mode, known_grid}`.
    ///
    /// Round-trip guarantee: feeding the result back through
    /// [`validate_json`] yields an equal spec.
    pub fn to_interchange_json(&self) -> Value {
        serde_json::json!({
            "size": self.size,
            "target": self.target,
            "game_mode": self.game_mode,
            "known_grid": self.known_grid,
        })
    }

    /// An all-empty puzzle of the given dimensions. Bounds are NOT
    /// checked here; use [`validate_json`] on untrusted input.
    pub fn empty(size: usize, target: i64, game_mode: GameMode) -> Self {
        Self {
            size,
            target,
            game_mode,
            known_grid: vec![vec![None; size]; size],
        }
    }

    /// Number of caller-committed cells.
    pub fn known_count(&self) -> usize {
        self.known_grid
            .iter()
            .flatten()
            .filter(|v| v.is_some())
            .count()
    }
}

// ── JSON validation ─────────────────────────────────────────────────

/// Validate an arbitrary parsed JSON value (file import / sample load)
/// into a [`PuzzleSpec`].
///
/// Accepts `known_grid` under the alias `grid` as well. A missing grid
/// means all cells are unknown. `game_mode` defaults to `unbounded`.
pub fn validate_json(raw: &Value) -> Result<PuzzleSpec, ValidationError> {
    let obj = raw
        .as_object()
        .ok_or_else(|| ValidationError::Shape("JSON root must be an object".into()))?;

    let size = require_integer(obj.get("size"), "size")?;
    check_size_bounds(size)?;
    let size = size as usize;

    let target = require_integer(obj.get("target"), "target")?;
    check_target(target, size)?;

    let game_mode = match obj.get("game_mode") {
        None | Some(Value::Null) => GameMode::default(),
        Some(Value::String(s)) => parse_game_mode(s)?,
        Some(_) => {
            return Err(ValidationError::Shape(
                "game_mode must be one of: unbounded, bounded_by_size_squared".into(),
            ))
        }
    };

    let grid_value = obj.get("known_grid").or_else(|| obj.get("grid"));
    let known_grid = match grid_value {
        None | Some(Value::Null) => vec![vec![None; size]; size],
        Some(value) => validate_grid_json(value, size)?,
    };

    Ok(PuzzleSpec { size, target, game_mode, known_grid })
}

/// Validate structured form state: the grid arrives as free-text cell
/// strings. The input layer only admits empty-or-digits strings (see
/// `GridState::set_cell`), but the same coercion rules are enforced
/// here regardless.
pub fn validate_form(
    size: usize,
    target_text: &str,
    grid_texts: &[Vec<String>],
) -> Result<PuzzleSpec, ValidationError> {
    check_size_bounds(size as i64)?;

    let target: i64 = target_text
        .trim()
        .parse()
        .map_err(|_| ValidationError::Shape("target must be an integer".into()))?;
    check_target(target, size)?;

    if grid_texts.len() != size || grid_texts.iter().any(|row| row.len() != size) {
        return Err(ValidationError::Shape(grid_shape_message(size)));
    }

    let mut known_grid = Vec::with_capacity(size);
    for (r, row) in grid_texts.iter().enumerate() {
        let mut out = Vec::with_capacity(size);
        for (c, text) in row.iter().enumerate() {
            out.push(coerce_cell_text(text, r, c)?);
        }
        known_grid.push(out);
    }

    Ok(PuzzleSpec {
        size,
        target,
        game_mode: GameMode::default(),
        known_grid,
    })
}

// ── Internal helpers ────────────────────────────────────────────────

fn require_integer(value: Option<&Value>, field: &'static str) -> Result<i64, ValidationError> {
    match value {
        None | Some(Value::Null) => {
            Err(ValidationError::Shape(format!("JSON must include '{field}'")))
        }
        // as_i64 is None for floats like 3.5; an explicit is_i64 check
        // also rejects integral floats (3.0) and u64 overflow.
        Some(v) if v.is_i64() => Ok(v.as_i64().unwrap()),
        Some(_) => Err(ValidationError::Shape(format!("{field} must be an integer"))),
    }
}

fn check_size_bounds(size: i64) -> Result<(), ValidationError> {
    if size < MIN_SIZE as i64 || size > MAX_SIZE as i64 {
        return Err(ValidationError::Range {
            field: "size",
            value: size,
            min: MIN_SIZE as i64,
            max: MAX_SIZE as i64,
        });
    }
    Ok(())
}

fn check_target(target: i64, size: usize) -> Result<(), ValidationError> {
    if target <= size as i64 {
        return Err(ValidationError::Shape(format!(
            "target must be greater than size (target {target}, size {size})"
        )));
    }
    Ok(())
}

fn parse_game_mode(s: &str) -> Result<GameMode, ValidationError> {
    match s {
        "unbounded" => Ok(GameMode::Unbounded),
        "bounded_by_size_squared" => Ok(GameMode::BoundedBySizeSquared),
        _ => Err(ValidationError::Shape(
            "game_mode must be one of: unbounded, bounded_by_size_squared".into(),
        )),
    }
}

fn grid_shape_message(size: usize) -> String {
    format!("known_grid must be a {size}x{size} array of arrays")
}

fn validate_grid_json(value: &Value, size: usize) -> Result<Vec<Vec<Option<u32>>>, ValidationError> {
    let rows = value
        .as_array()
        .filter(|rows| rows.len() == size)
        .ok_or_else(|| ValidationError::Shape(grid_shape_message(size)))?;

    let mut grid = Vec::with_capacity(size);
    for (r, row_value) in rows.iter().enumerate() {
        let cells = row_value
            .as_array()
            .filter(|cells| cells.len() == size)
            .ok_or_else(|| ValidationError::Shape(grid_shape_message(size)))?;

        let mut out = Vec::with_capacity(size);
        for (c, cell) in cells.iter().enumerate() {
            out.push(coerce_cell_json(cell, r, c)?);
        }
        grid.push(out);
    }
    Ok(grid)
}

fn coerce_cell_json(cell: &Value, row: usize, col: usize) -> Result<Option<u32>, ValidationError> {
    match cell {
        Value::Null => Ok(None),
        // Empty string is treated like null so hand-edited files behave
        // like the form path.
        Value::String(s) if s.trim().is_empty() => Ok(None),
        Value::String(s) => coerce_cell_text(s, row, col),
        v if v.is_i64() => {
            let n = v.as_i64().unwrap();
            if n >= MIN_VALUE as i64 && n <= u32::MAX as i64 {
                Ok(Some(n as u32))
            } else {
                Err(cell_error(row, col, &n.to_string()))
            }
        }
        v => Err(cell_error(row, col, &v.to_string())),
    }
}

fn coerce_cell_text(text: &str, row: usize, col: usize) -> Result<Option<u32>, ValidationError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    match trimmed.parse::<u32>() {
        Ok(n) if n >= MIN_VALUE => Ok(Some(n)),
        _ => Err(cell_error(row, col, trimmed)),
    }
}

fn cell_error(row: usize, col: usize, got: &str) -> ValidationError {
    ValidationError::Cell {
        row,
        col,
        detail: format!("must be an integer >= {MIN_VALUE} or empty (got '{got}')"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn accepts_minimal_puzzle() {
        let spec = validate_json(&json!({"size": 3, "target": 15})).unwrap();
        assert_eq!(spec.size, 3);
        assert_eq!(spec.target, 15);
        assert_eq!(spec.game_mode, GameMode::Unbounded);
        assert_eq!(spec.known_grid, vec![vec![None; 3]; 3]);
        assert_eq!(spec.known_count(), 0);
    }

    #[test]
    fn accepts_known_grid_with_nulls_and_values() {
        let spec = validate_json(&json!({
            "size": 3,
            "target": 15,
            "known_grid": [[null, 3, null], [3, null, null], [null, null, null]],
        }))
        .unwrap();
        assert_eq!(spec.known_grid[0][1], Some(3));
        assert_eq!(spec.known_grid[1][0], Some(3));
        assert_eq!(spec.known_count(), 2);
    }

    #[test]
    fn accepts_grid_alias_on_import() {
        let spec = validate_json(&json!({
            "size": 2,
            "target": 6,
            "grid": [[1, null], [null, null]],
        }))
        .unwrap();
        assert_eq!(spec.known_grid[0][0], Some(1));
    }

    #[test]
    fn rejects_non_object_root() {
        let err = validate_json(&json!([1, 2, 3])).unwrap_err();
        assert!(matches!(err, ValidationError::Shape(_)));
    }

    #[test]
    fn rejects_missing_fields() {
        let err = validate_json(&json!({"target": 15})).unwrap_err();
        assert_eq!(err.to_string(), "JSON must include 'size'");
        let err = validate_json(&json!({"size": 3})).unwrap_err();
        assert_eq!(err.to_string(), "JSON must include 'target'");
    }

    #[test]
    fn rejects_size_out_of_range_naming_bounds() {
        let err = validate_json(&json!({"size": 10, "target": 15})).unwrap_err();
        assert_eq!(
            err,
            ValidationError::Range { field: "size", value: 10, min: 2, max: 7 },
        );
        let msg = err.to_string();
        assert!(msg.contains("[2, 7]"), "message should name the bound: {msg}");

        let err = validate_json(&json!({"size": 1, "target": 15})).unwrap_err();
        assert!(matches!(err, ValidationError::Range { .. }));
    }

    #[test]
    fn rejects_target_not_greater_than_size() {
        let err = validate_json(&json!({"size": 3, "target": 3})).unwrap_err();
        assert!(err.to_string().contains("greater than size"));
    }

    #[test]
    fn rejects_float_size_and_target() {
        assert!(validate_json(&json!({"size": 3.0, "target": 15})).is_err());
        assert!(validate_json(&json!({"size": 3, "target": 15.5})).is_err());
    }

    #[test]
    fn rejects_unknown_game_mode() {
        let err = validate_json(&json!({
            "size": 3, "target": 15, "game_mode": "diagonal_only",
        }))
        .unwrap_err();
        assert!(err.to_string().contains("unbounded"));
    }

    #[test]
    fn defaults_game_mode_when_absent_or_null() {
        let spec = validate_json(&json!({"size": 3, "target": 15, "game_mode": null})).unwrap();
        assert_eq!(spec.game_mode, GameMode::Unbounded);
        let spec = validate_json(&json!({
            "size": 3, "target": 15, "game_mode": "bounded_by_size_squared",
        }))
        .unwrap();
        assert_eq!(spec.game_mode, GameMode::BoundedBySizeSquared);
    }

    #[test]
    fn rejects_ragged_grid() {
        let err = validate_json(&json!({
            "size": 3,
            "target": 15,
            "known_grid": [[null, null, null], [null, null], [null, null, null]],
        }))
        .unwrap_err();
        assert!(err.to_string().contains("3x3"));
    }

    #[test]
    fn rejects_bad_cells_naming_one_based_coordinate() {
        let err = validate_json(&json!({
            "size": 2,
            "target": 6,
            "known_grid": [[null, 0], [null, null]],
        }))
        .unwrap_err();
        assert_eq!(
            err,
            ValidationError::Cell {
                row: 0,
                col: 1,
                detail: "must be an integer >= 1 or empty (got '0')".into(),
            },
        );
        assert!(err.to_string().starts_with("cell (1, 2)"));

        // negative, float, and non-numeric string cells
        for bad in [json!(-2), json!(2.5), json!("abc")] {
            let err = validate_json(&json!({
                "size": 2,
                "target": 6,
                "known_grid": [[null, null], [bad, null]],
            }))
            .unwrap_err();
            assert!(matches!(err, ValidationError::Cell { row: 1, col: 0, .. }));
        }
    }

    #[test]
    fn form_path_accepts_digit_strings() {
        let grid = vec![
            vec!["".into(), "3".into(), "".into()],
            vec!["3".into(), "".into(), "".into()],
            vec!["".into(), "".into(), "".into()],
        ];
        let spec = validate_form(3, "15", &grid).unwrap();
        assert_eq!(spec.known_grid[0][1], Some(3));
        assert_eq!(spec.known_count(), 2);
    }

    #[test]
    fn form_path_rejects_non_integer_target() {
        let grid = vec![vec![String::new(); 2]; 2];
        let err = validate_form(2, "lots", &grid).unwrap_err();
        assert_eq!(err.to_string(), "target must be an integer");
    }

    #[test]
    fn form_path_rejects_zero_cell() {
        let grid = vec![
            vec!["0".into(), "".into()],
            vec!["".into(), "".into()],
        ];
        let err = validate_form(2, "6", &grid).unwrap_err();
        assert!(matches!(err, ValidationError::Cell { row: 0, col: 0, .. }));
    }

    #[test]
    fn interchange_round_trip() {
        let spec = validate_json(&json!({
            "size": 3,
            "target": 15,
            "game_mode": "bounded_by_size_squared",
            "known_grid": [[null, 3, null], [3, null, null], [null, null, 7]],
        }))
        .unwrap();
        let reimported = validate_json(&spec.to_interchange_json()).unwrap();
        assert_eq!(spec, reimported);
    }

    proptest! {
        // validate accepts iff size in [2,7] and target > size.
        #[test]
        fn acceptance_envelope(size in -2i64..12, target in -5i64..40) {
            let result = validate_json(&json!({"size": size, "target": target}));
            let should_accept = (2..=7).contains(&size) && target > size;
            prop_assert_eq!(result.is_ok(), should_accept);
        }

        // Any all-empty grid of matching dimensions validates, and the
        // round trip preserves it.
        #[test]
        fn empty_grid_round_trip(size in 2usize..=7) {
            let spec = PuzzleSpec::empty(size, size as i64 * 10, GameMode::Unbounded);
            let reimported = validate_json(&spec.to_interchange_json()).unwrap();
            prop_assert_eq!(spec, reimported);
        }
    }
}
