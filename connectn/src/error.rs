use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GameError {
    #[error("your column needs to be between 0 and {} but is actually {column}", .cols.saturating_sub(1))]
    ColumnOutOfBounds { column: i64, cols: usize },
    #[error("you cannot play in column {column} because it is full")]
    ColumnFull { column: usize },
    #[error("there is no piece at {row},{column}")]
    EmptySpotQueried { row: usize, column: usize },
    #[error("cell {row},{column} is outside the grid")]
    CellOutOfBounds { row: usize, column: usize },
    #[error("piece may only be a single character but is actually {0:?}")]
    InvalidPieceSymbol(String),
    #[error("column needs to be an integer, {input:?} is not an integer")]
    MoveFormat { input: String },
    #[error("a move must be applied before asking whether it ends the game")]
    PrematureMoveQuery,
    #[error("{row},{column} is not the top piece of its column")]
    NotTopOfColumn { row: usize, column: usize },
    #[error("grid must have between 1 and {max} cells, got {rows}x{cols}", max = crate::grid::MAX_CELLS)]
    InvalidDimensions { rows: usize, cols: usize },
    #[error("pieces needed to win must be at least 1, got {0}")]
    InvalidWinLength(usize),
    #[error("no legal moves remain")]
    NoMoves,
    #[error("console I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

impl GameError {
    /// Errors a human can fix by typing a different column.
    pub fn is_user_correctable(&self) -> bool {
        matches!(
            self,
            GameError::ColumnOutOfBounds { .. }
                | GameError::ColumnFull { .. }
                | GameError::MoveFormat { .. }
        )
    }
}

/// Rejected name or piece during player setup.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SetupError {
    #[error("your name cannot be the empty string or whitespace")]
    EmptyName,
    #[error("you cannot use {0} for your name as someone else is already using it")]
    NameTaken(String),
    #[error("your piece cannot be the empty string or whitespace")]
    EmptyPiece,
    #[error("{0} is not a single character, your piece can only be a single character")]
    PieceTooLong(String),
    #[error("your piece cannot be the same as the blank character")]
    PieceIsBlank,
    #[error("you cannot use {piece} for your piece as {owner} is already using it")]
    PieceTaken { piece: char, owner: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("line {line_no} is not a `key: value` pair: {line:?}")]
    MalformedLine { line_no: usize, line: String },
    #[error("missing config key `{0}`")]
    MissingKey(&'static str),
    #[error("config key `{key}` must be {expected}")]
    WrongType {
        key: &'static str,
        expected: &'static str,
    },
    #[error("config validation error: {0}")]
    Validation(String),
}
