// SquareSum core - puzzle validation, grid state, presentation

pub mod file;
pub mod grid;
pub mod present;
pub mod puzzle;

pub use file::{load_puzzle, save_puzzle};
pub use grid::{GridCell, GridState};
pub use puzzle::{PuzzleSpec, ValidationError, MAX_SIZE, MIN_SIZE, MIN_VALUE};
