//! Gravity-filled grid of single-character pieces and the run-length scan used
//! for win detection. Row 0 is the bottom row; pieces stack upward.
use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GameError;

/// Direction pairs scanned by [`Grid::longest_run`], as `(row_step, col_step)`.
/// Each is walked forwards and backwards.
const DIRECTIONS: [(isize, isize); 4] = [
    (0, 1),  // horizontal
    (1, 0),  // vertical
    (1, 1),  // ascending diagonal
    (-1, 1), // descending diagonal
];

/// A single printable character stored in a grid cell: either a player's piece
/// or the blank marker.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(char);

impl Symbol {
    pub const fn new(ch: char) -> Self {
        Self(ch)
    }

    /// Accepts exactly one character.
    pub fn parse(text: &str) -> Result<Self, GameError> {
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => Ok(Self(ch)),
            _ => Err(GameError::InvalidPieceSymbol(text.to_string())),
        }
    }

    pub fn as_char(self) -> char {
        self.0
    }

    pub fn eq_ignore_case(self, other: Symbol) -> bool {
        self.0.to_lowercase().eq(other.0.to_lowercase())
    }
}

impl FromStr for Symbol {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Largest number of cells a grid may hold.
pub const MAX_CELLS: usize = 1 << 20;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    blank: Symbol,
    /// Row-major, row 0 first.
    cells: Vec<Symbol>,
    heights: Vec<usize>,
}

impl Grid {
    pub fn new(rows: usize, cols: usize, blank: Symbol) -> Result<Self, GameError> {
        let cells = rows
            .checked_mul(cols)
            .filter(|&n| n > 0 && n <= MAX_CELLS)
            .ok_or(GameError::InvalidDimensions { rows, cols })?;
        Ok(Self {
            rows,
            cols,
            blank,
            cells: vec![blank; cells],
            heights: vec![0; cols],
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn blank(&self) -> Symbol {
        self.blank
    }

    /// Number of pieces stacked in `column`, or `None` if out of bounds.
    pub fn column_height(&self, column: usize) -> Option<usize> {
        self.heights.get(column).copied()
    }

    pub fn is_column_in_bounds(&self, column: usize) -> bool {
        column < self.cols
    }

    /// Out-of-bounds columns are reported as not full; placement rejects them
    /// separately.
    pub fn is_column_full(&self, column: usize) -> bool {
        self.heights
            .get(column)
            .is_some_and(|&height| height >= self.rows)
    }

    /// Columns that can still take a piece, ascending.
    pub fn open_columns(&self) -> Vec<usize> {
        (0..self.cols)
            .filter(|&col| !self.is_column_full(col))
            .collect()
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<Symbol> {
        if row < self.rows && column < self.cols {
            Some(self.cells[self.index(row, column)])
        } else {
            None
        }
    }

    pub fn is_blank(&self, row: usize, column: usize) -> bool {
        self.cell(row, column) == Some(self.blank)
    }

    pub fn is_full(&self) -> bool {
        self.heights.iter().all(|&height| height == self.rows)
    }

    /// Drops `piece` into `column` and returns the row it landed on.
    pub fn place_piece(&mut self, piece: Symbol, column: usize) -> Result<usize, GameError> {
        if piece == self.blank {
            return Err(GameError::InvalidPieceSymbol(piece.to_string()));
        }
        if !self.is_column_in_bounds(column) {
            return Err(GameError::ColumnOutOfBounds {
                column: column as i64,
                cols: self.cols,
            });
        }
        if self.is_column_full(column) {
            return Err(GameError::ColumnFull { column });
        }
        let row = self.heights[column];
        let idx = self.index(row, column);
        self.cells[idx] = piece;
        self.heights[column] += 1;
        Ok(row)
    }

    /// Takes back the top piece of a column. Only the most recently placed
    /// cell of a column may be removed.
    pub fn remove_piece(&mut self, row: usize, column: usize) -> Result<Symbol, GameError> {
        let height = self
            .column_height(column)
            .filter(|_| row < self.rows)
            .ok_or(GameError::CellOutOfBounds { row, column })?;
        if row >= height {
            return Err(GameError::EmptySpotQueried { row, column });
        }
        if row + 1 != height {
            return Err(GameError::NotTopOfColumn { row, column });
        }
        Ok(self.clear_top(column))
    }

    /// Places `piece` for inspection; the guard takes it back out when dropped.
    pub fn speculate(&mut self, piece: Symbol, column: usize) -> Result<Speculation<'_>, GameError> {
        let row = self.place_piece(piece, column)?;
        Ok(Speculation {
            grid: self,
            row,
            column,
        })
    }

    /// Longest uninterrupted line of the piece at `(row, column)` across the
    /// four axes, counting the cell itself.
    pub fn longest_run(&self, row: usize, column: usize) -> Result<usize, GameError> {
        let piece = self
            .cell(row, column)
            .ok_or(GameError::CellOutOfBounds { row, column })?;
        if piece == self.blank {
            return Err(GameError::EmptySpotQueried { row, column });
        }
        Ok(DIRECTIONS
            .iter()
            .map(|&(dr, dc)| {
                1 + self.count_matches(piece, row, column, dr, dc)
                    + self.count_matches(piece, row, column, -dr, -dc)
            })
            .max()
            .unwrap_or(1))
    }

    /// Matches of `piece` stepping away from `(row, column)`, excluding the
    /// start cell. Stops at the first mismatch or the grid edge.
    fn count_matches(&self, piece: Symbol, row: usize, column: usize, dr: isize, dc: isize) -> usize {
        let mut count = 0;
        let (mut r, mut c) = (row, column);
        while let (Some(next_r), Some(next_c)) = (r.checked_add_signed(dr), c.checked_add_signed(dc)) {
            if self.cell(next_r, next_c) != Some(piece) {
                break;
            }
            count += 1;
            r = next_r;
            c = next_c;
        }
        count
    }

    fn clear_top(&mut self, column: usize) -> Symbol {
        self.heights[column] -= 1;
        let idx = self.index(self.heights[column], column);
        std::mem::replace(&mut self.cells[idx], self.blank)
    }

    fn index(&self, row: usize, column: usize) -> usize {
        row * self.cols + column
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = (self.rows - 1).max(self.cols - 1).to_string().len();
        write!(f, "{:width$}", "")?;
        for col in 0..self.cols {
            write!(f, " {col:>width$}")?;
        }
        for row in (0..self.rows).rev() {
            write!(f, "\n{row:>width$}")?;
            for col in 0..self.cols {
                write!(f, " {:>width$}", self.cells[self.index(row, col)])?;
            }
        }
        Ok(())
    }
}

/// A piece placed for inspection only. Dropping the guard removes it again, so
/// the grid comes back unchanged however the inspection ends.
pub struct Speculation<'a> {
    grid: &'a mut Grid,
    row: usize,
    column: usize,
}

impl Speculation<'_> {
    pub fn row(&self) -> usize {
        self.row
    }

    pub fn column(&self) -> usize {
        self.column
    }

    pub fn longest_run(&self) -> Result<usize, GameError> {
        self.grid.longest_run(self.row, self.column)
    }
}

impl Deref for Speculation<'_> {
    type Target = Grid;

    fn deref(&self) -> &Grid {
        &*self.grid
    }
}

impl Drop for Speculation<'_> {
    fn drop(&mut self) {
        self.grid.clear_top(self.column);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sym(ch: char) -> Symbol {
        Symbol::new(ch)
    }

    fn grid(rows: usize, cols: usize) -> Grid {
        Grid::new(rows, cols, sym('.')).unwrap()
    }

    /// Drops pieces column by column, `.` meaning skip.
    fn fill(grid: &mut Grid, columns: &[&str]) {
        for (col, stack) in columns.iter().enumerate() {
            for ch in stack.chars().filter(|&ch| ch != '.') {
                grid.place_piece(sym(ch), col).unwrap();
            }
        }
    }

    #[test]
    fn symbol_requires_one_character() {
        assert_eq!(Symbol::parse("X").unwrap(), sym('X'));
        assert!(matches!(Symbol::parse(""), Err(GameError::InvalidPieceSymbol(_))));
        assert!(matches!(Symbol::parse("XY"), Err(GameError::InvalidPieceSymbol(s)) if s == "XY"));
        assert!(sym('x').eq_ignore_case(sym('X')));
    }

    #[test]
    fn rejects_empty_dimensions() {
        assert!(matches!(
            Grid::new(0, 7, sym('.')),
            Err(GameError::InvalidDimensions { rows: 0, cols: 7 })
        ));
    }

    #[test]
    fn rejects_oversized_dimensions() {
        assert!(matches!(
            Grid::new(usize::MAX, 2, sym('.')),
            Err(GameError::InvalidDimensions { .. })
        ));
        assert!(matches!(
            Grid::new(MAX_CELLS, 2, sym('.')),
            Err(GameError::InvalidDimensions { .. })
        ));
        let g = Grid::new(MAX_CELLS, 1, sym('.')).unwrap();
        assert_eq!(g.rows(), MAX_CELLS);
    }

    #[test]
    fn pieces_stack_from_the_bottom() {
        let mut g = grid(6, 7);
        assert_eq!(g.place_piece(sym('X'), 3).unwrap(), 0);
        assert_eq!(g.place_piece(sym('O'), 3).unwrap(), 1);
        assert_eq!(g.cell(0, 3), Some(sym('X')));
        assert_eq!(g.cell(1, 3), Some(sym('O')));
        assert!(g.is_blank(2, 3));
        assert_eq!(g.column_height(3), Some(2));
    }

    #[test]
    fn column_bounds() {
        let g = grid(6, 7);
        assert!(g.is_column_in_bounds(0));
        assert!(g.is_column_in_bounds(6));
        assert!(!g.is_column_in_bounds(7));
    }

    #[test]
    fn full_column_rejects_without_mutation() {
        let mut g = grid(2, 3);
        fill(&mut g, &[".", "XO"]);
        assert!(g.is_column_full(1));
        let before = g.clone();
        assert!(matches!(
            g.place_piece(sym('X'), 1),
            Err(GameError::ColumnFull { column: 1 })
        ));
        assert_eq!(g, before);
    }

    #[test]
    fn out_of_bounds_rejects_without_mutation() {
        let mut g = grid(2, 3);
        let before = g.clone();
        assert!(matches!(
            g.place_piece(sym('X'), 3),
            Err(GameError::ColumnOutOfBounds { column: 3, cols: 3 })
        ));
        assert_eq!(g, before);
    }

    #[test]
    fn blank_symbol_is_not_a_piece() {
        let mut g = grid(2, 2);
        assert!(matches!(
            g.place_piece(sym('.'), 0),
            Err(GameError::InvalidPieceSymbol(_))
        ));
    }

    #[test]
    fn remove_restores_previous_state() {
        let mut g = grid(4, 4);
        fill(&mut g, &["XO", "X"]);
        let before = g.clone();
        let row = g.place_piece(sym('O'), 0).unwrap();
        assert_eq!(g.remove_piece(row, 0).unwrap(), sym('O'));
        assert_eq!(g, before);
    }

    #[test]
    fn remove_only_takes_the_top_piece() {
        let mut g = grid(4, 4);
        fill(&mut g, &["XO"]);
        assert!(matches!(
            g.remove_piece(0, 0),
            Err(GameError::NotTopOfColumn { row: 0, column: 0 })
        ));
        assert!(matches!(
            g.remove_piece(2, 0),
            Err(GameError::EmptySpotQueried { row: 2, column: 0 })
        ));
        assert!(matches!(
            g.remove_piece(0, 9),
            Err(GameError::CellOutOfBounds { .. })
        ));
    }

    #[test]
    fn board_full_only_when_every_column_is() {
        let mut g = grid(2, 2);
        fill(&mut g, &["XO", "O"]);
        assert!(!g.is_full());
        g.place_piece(sym('X'), 1).unwrap();
        assert!(g.is_full());
        assert!(g.open_columns().is_empty());
    }

    #[test]
    fn single_cell_grid_fills_at_once() {
        let mut g = grid(1, 1);
        let row = g.place_piece(sym('X'), 0).unwrap();
        assert!(g.is_full());
        assert_eq!(g.longest_run(row, 0).unwrap(), 1);
    }

    #[test]
    fn horizontal_run_of_four() {
        let mut g = grid(6, 7);
        for col in 0..4 {
            g.place_piece(sym('X'), col).unwrap();
        }
        assert_eq!(g.longest_run(0, 3).unwrap(), 4);
        assert_eq!(g.longest_run(0, 1).unwrap(), 4);
    }

    #[test]
    fn vertical_run() {
        let mut g = grid(6, 7);
        fill(&mut g, &["", "", "OXXX"]);
        assert_eq!(g.longest_run(3, 2).unwrap(), 3);
        assert_eq!(g.longest_run(0, 2).unwrap(), 1);
    }

    #[test]
    fn ascending_diagonal_run() {
        let mut g = grid(6, 7);
        fill(&mut g, &["X", "OX", "OOX", "OOOX"]);
        assert_eq!(g.longest_run(3, 3).unwrap(), 4);
        assert_eq!(g.longest_run(1, 1).unwrap(), 4);
    }

    #[test]
    fn descending_diagonal_run() {
        let mut g = grid(6, 7);
        fill(&mut g, &["", "", "", "OOOX", "OOX", "OX", "X"]);
        assert_eq!(g.longest_run(3, 3).unwrap(), 4);
        assert_eq!(g.longest_run(0, 6).unwrap(), 4);
    }

    #[test]
    fn mismatch_stops_the_walk() {
        let mut g = grid(6, 7);
        fill(&mut g, &["X", "X", "O", "X", "X", "X"]);
        assert_eq!(g.longest_run(0, 0).unwrap(), 2);
        assert_eq!(g.longest_run(0, 4).unwrap(), 3);
        assert_eq!(g.longest_run(0, 2).unwrap(), 1);
    }

    #[test]
    fn run_spanning_the_whole_row_reaches_both_edges() {
        let mut g = grid(1, 5);
        fill(&mut g, &["X", "X", "X", "X", "X"]);
        for col in 0..5 {
            assert_eq!(g.longest_run(0, col).unwrap(), 5);
        }
    }

    #[test]
    fn blank_origin_is_an_error() {
        let g = grid(6, 7);
        assert!(matches!(
            g.longest_run(0, 0),
            Err(GameError::EmptySpotQueried { row: 0, column: 0 })
        ));
        assert!(matches!(
            g.longest_run(6, 0),
            Err(GameError::CellOutOfBounds { .. })
        ));
    }

    #[test]
    fn speculation_is_undone_on_drop() {
        let mut g = grid(6, 7);
        fill(&mut g, &["X", "X", "X"]);
        let before = g.clone();
        {
            let trial = g.speculate(sym('X'), 3).unwrap();
            assert_eq!(trial.row(), 0);
            assert_eq!(trial.column(), 3);
            assert_eq!(trial.longest_run().unwrap(), 4);
            assert_eq!(trial.column_height(3), Some(1));
        }
        assert_eq!(g, before);
    }

    #[test]
    fn failed_speculation_leaves_grid_alone() {
        let mut g = grid(1, 2);
        fill(&mut g, &["X"]);
        let before = g.clone();
        assert!(g.speculate(sym('O'), 0).is_err());
        assert_eq!(g, before);
    }

    #[test]
    fn renders_bottom_row_last() {
        let mut g = grid(3, 4);
        fill(&mut g, &["XO", "", "O"]);
        let expected = "  0 1 2 3\n2 . . . .\n1 O . . .\n0 X . O .";
        assert_eq!(g.to_string(), expected);
    }

    #[test]
    fn renders_wide_grids_aligned() {
        let g = grid(2, 11);
        let text = g.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "    0  1  2  3  4  5  6  7  8  9 10");
        assert_eq!(lines[2], " 0  .  .  .  .  .  .  .  .  .  .  .");
    }
}
