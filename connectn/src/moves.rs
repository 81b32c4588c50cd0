use std::num::IntErrorKind;

use crate::error::GameError;
use crate::grid::{Grid, Symbol};

/// A column choice by one seat. The landing row is only known once the move
/// has been applied to a grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Move {
    seat: usize,
    piece: Symbol,
    column: i64,
    row: Option<usize>,
}

impl Move {
    /// The column is not checked here; placement does that.
    pub fn new(seat: usize, piece: Symbol, column: i64) -> Self {
        Self {
            seat,
            piece,
            column,
            row: None,
        }
    }

    /// Integers too large for `i64` saturate, so placement reports them as
    /// out of bounds rather than as malformed.
    pub fn parse_column(text: &str) -> Result<i64, GameError> {
        match text.trim().parse::<i64>() {
            Ok(column) => Ok(column),
            Err(e) => match e.kind() {
                IntErrorKind::PosOverflow => Ok(i64::MAX),
                IntErrorKind::NegOverflow => Ok(i64::MIN),
                _ => Err(GameError::MoveFormat {
                    input: text.to_string(),
                }),
            },
        }
    }

    pub fn from_text(seat: usize, piece: Symbol, text: &str) -> Result<Self, GameError> {
        Ok(Self::new(seat, piece, Self::parse_column(text)?))
    }

    pub fn seat(&self) -> usize {
        self.seat
    }

    pub fn piece(&self) -> Symbol {
        self.piece
    }

    pub fn column(&self) -> i64 {
        self.column
    }

    pub fn row(&self) -> Option<usize> {
        self.row
    }

    /// Drops the mover's piece. Grid errors pass through unchanged and leave
    /// the move unapplied.
    pub fn apply(&mut self, grid: &mut Grid) -> Result<usize, GameError> {
        let column = usize::try_from(self.column).map_err(|_| GameError::ColumnOutOfBounds {
            column: self.column,
            cols: grid.cols(),
        })?;
        let row = grid.place_piece(self.piece, column)?;
        self.row = Some(row);
        Ok(row)
    }

    /// Whether the placed piece sits in a run of at least `win_length`.
    pub fn completes_run(&self, grid: &Grid, win_length: usize) -> Result<bool, GameError> {
        let row = self.row.ok_or(GameError::PrematureMoveQuery)?;
        Ok(grid.longest_run(row, self.column as usize)? >= win_length)
    }

    /// A move ends the game when it wins or fills the board.
    pub fn ends_game(&self, grid: &Grid, win_length: usize) -> Result<bool, GameError> {
        Ok(self.completes_run(grid, win_length)? || grid.is_full())
    }
}
