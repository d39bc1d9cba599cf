//! Mutable dual-representation of the puzzle grid.
//!
//! Each cell keeps the raw text the user typed plus a provenance flag.
//! The flag tracks *authorship*, not validity: it is true iff the text
//! was non-empty when the user last set it. Solver responses never flip
//! it; `apply_solution` restores the mask captured at submission time
//! so "your value" styling survives edits made while a solve was in
//! flight.

use crate::puzzle::PuzzleSpec;

/// One cell of the editable grid.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GridCell {
    pub raw_text: String,
    pub is_user_provided: bool,
}

/// Size-tracked matrix manager for the editable grid.
#[derive(Debug, Clone)]
pub struct GridState {
    size: usize,
    cells: Vec<Vec<GridCell>>,
}

impl GridState {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![vec![GridCell::default(); size]; size],
        }
    }

    /// Build a grid pre-filled from a validated spec. Known cells are
    /// marked user-provided.
    pub fn from_spec(spec: &PuzzleSpec) -> Self {
        let mut state = Self::new(spec.size);
        for (r, row) in spec.known_grid.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                if let Some(v) = value {
                    state.set_cell(r, c, &v.to_string());
                }
            }
        }
        state
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn cell(&self, row: usize, col: usize) -> &GridCell {
        &self.cells[row][col]
    }

    /// Replace the grid with a fresh `new_size × new_size` matrix of
    /// empty cells and an all-false provided mask. Counting parameters
    /// held by the caller are meaningless across a resize and must be
    /// reset there.
    pub fn resize(&mut self, new_size: usize) {
        self.size = new_size;
        self.cells = vec![vec![GridCell::default(); new_size]; new_size];
    }

    /// Equivalent to `resize(current_size)`.
    pub fn clear(&mut self) {
        self.resize(self.size);
    }

    /// Store user-typed text for a cell. Returns `false` (no-op) when
    /// the text is non-empty and contains any non-digit character —
    /// input is constrained before it ever reaches the validator.
    pub fn set_cell(&mut self, row: usize, col: usize, raw_text: &str) -> bool {
        if !raw_text.is_empty() && !raw_text.bytes().all(|b| b.is_ascii_digit()) {
            return false;
        }
        let cell = &mut self.cells[row][col];
        cell.raw_text = raw_text.to_string();
        cell.is_user_provided = !raw_text.is_empty();
        true
    }

    /// Snapshot of the provided mask, captured at submission time.
    pub fn provided_mask(&self) -> Vec<Vec<bool>> {
        self.cells
            .iter()
            .map(|row| row.iter().map(|c| c.is_user_provided).collect())
            .collect()
    }

    /// The `Option<u32>` matrix for submission. Empty text ⇒ `None`.
    /// Callers must run the result through the validator; this method
    /// itself trusts `set_cell` to have kept cells digits-only.
    pub fn to_known_grid(&self) -> Vec<Vec<Option<u32>>> {
        self.cells
            .iter()
            .map(|row| {
                row.iter()
                    .map(|c| {
                        if c.raw_text.is_empty() {
                            None
                        } else {
                            c.raw_text.parse().ok()
                        }
                    })
                    .collect()
            })
            .collect()
    }

    /// Overwrite every cell with the solved value and restore the
    /// provided mask to `mask_at_submit` — the mask at response time is
    /// discarded, so styling reflects what was actually submitted.
    pub fn apply_solution(&mut self, solution: &[Vec<u32>], mask_at_submit: &[Vec<bool>]) {
        for r in 0..self.size {
            for c in 0..self.size {
                let cell = &mut self.cells[r][c];
                cell.raw_text = solution[r][c].to_string();
                cell.is_user_provided = mask_at_submit[r][c];
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn new_grid_is_empty_with_false_mask() {
        let state = GridState::new(3);
        assert_eq!(state.size(), 3);
        for r in 0..3 {
            for c in 0..3 {
                assert_eq!(state.cell(r, c).raw_text, "");
                assert!(!state.cell(r, c).is_user_provided);
            }
        }
    }

    #[test]
    fn set_cell_tracks_authorship() {
        let mut state = GridState::new(2);
        assert!(state.set_cell(0, 0, "12"));
        assert!(state.cell(0, 0).is_user_provided);

        // clearing a cell clears the flag
        assert!(state.set_cell(0, 0, ""));
        assert!(!state.cell(0, 0).is_user_provided);
    }

    #[test]
    fn set_cell_rejects_non_digits() {
        let mut state = GridState::new(2);
        for bad in ["a", "1a", "-3", "1.5", " 2", "2 "] {
            assert!(!state.set_cell(0, 0, bad), "should reject {bad:?}");
            assert_eq!(state.cell(0, 0).raw_text, "");
        }
    }

    #[test]
    fn resize_resets_everything() {
        let mut state = GridState::new(2);
        state.set_cell(1, 1, "9");
        state.resize(4);
        assert_eq!(state.size(), 4);
        assert!(!state.cell(1, 1).is_user_provided);
        assert_eq!(state.cell(1, 1).raw_text, "");
    }

    #[test]
    fn clear_is_resize_to_current_size() {
        let mut state = GridState::new(3);
        state.set_cell(0, 2, "5");
        state.clear();
        assert_eq!(state.size(), 3);
        assert_eq!(state.provided_mask(), vec![vec![false; 3]; 3]);
    }

    #[test]
    fn apply_solution_restores_submit_time_mask() {
        let mut state = GridState::new(2);
        state.set_cell(0, 0, "3");
        let submitted_mask = state.provided_mask();

        // user edits while the solve is in flight
        state.set_cell(0, 0, "");
        state.set_cell(1, 1, "4");

        state.apply_solution(&[vec![3, 3], vec![3, 3]], &submitted_mask);

        assert_eq!(state.cell(0, 0).raw_text, "3");
        assert!(state.cell(0, 0).is_user_provided, "submit-time mask wins");
        assert!(!state.cell(1, 1).is_user_provided, "response-time edit ignored");
        assert_eq!(state.cell(1, 0).raw_text, "3");
    }

    #[test]
    fn to_known_grid_maps_empty_to_none() {
        let mut state = GridState::new(2);
        state.set_cell(0, 1, "7");
        assert_eq!(
            state.to_known_grid(),
            vec![vec![None, Some(7)], vec![None, None]],
        );
    }

    proptest! {
        // resize(size) produces exactly size × size empty cells with an
        // all-false mask, for every supported size.
        #[test]
        fn resize_invariant(size in 2usize..=7, prior in 2usize..=7) {
            let mut state = GridState::new(prior);
            state.set_cell(0, 0, "1");
            state.resize(size);
            prop_assert_eq!(state.size(), size);
            prop_assert_eq!(state.provided_mask(), vec![vec![false; size]; size]);
            prop_assert_eq!(state.to_known_grid(), vec![vec![None; size]; size]);
        }
    }
}
