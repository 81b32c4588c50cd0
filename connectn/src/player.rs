use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::console::Console;
use crate::error::GameError;
use crate::grid::{Grid, Symbol};
use crate::moves::Move;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerKind {
    Human,
    Random,
    Lookahead,
}

impl PlayerKind {
    /// Matches any non-empty prefix of `human`, `random`, `simple` or
    /// `basic`, ignoring case and surrounding whitespace.
    pub fn from_prefix(input: &str) -> Option<Self> {
        const NAMES: [(&str, PlayerKind); 4] = [
            ("human", PlayerKind::Human),
            ("random", PlayerKind::Random),
            ("simple", PlayerKind::Lookahead),
            ("basic", PlayerKind::Lookahead),
        ];
        let wanted = input.trim().to_lowercase();
        if wanted.is_empty() {
            return None;
        }
        NAMES
            .iter()
            .find(|(name, _)| name.starts_with(&wanted))
            .map(|&(_, kind)| kind)
    }

    /// Generated display name for computer players; humans pick their own.
    pub fn default_name(self, seat: usize) -> Option<String> {
        match self {
            PlayerKind::Human => None,
            PlayerKind::Random => Some(format!("RandomAi {}", seat + 1)),
            PlayerKind::Lookahead => Some(format!("BasicAi {}", seat + 1)),
        }
    }
}

/// Picks uniformly among the columns that still have room.
#[derive(Clone, Debug)]
pub struct RandomChooser {
    rng: StdRng,
}

impl RandomChooser {
    pub fn new(rng: StdRng) -> Self {
        Self { rng }
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn choose_column(&mut self, grid: &Grid) -> Result<usize, GameError> {
        let open = grid.open_columns();
        if open.is_empty() {
            return Err(GameError::NoMoves);
        }
        Ok(open[self.rng.random_range(0..open.len())])
    }
}

/// Takes an immediate win if one exists, otherwise blocks the opponent's
/// immediate win, otherwise plays randomly. Ties go to the lowest column.
#[derive(Clone, Debug)]
pub struct LookaheadChooser {
    fallback: RandomChooser,
}

impl LookaheadChooser {
    pub fn new(fallback: RandomChooser) -> Self {
        Self { fallback }
    }

    pub fn choose_column(
        &mut self,
        grid: &mut Grid,
        piece: Symbol,
        opponent: Symbol,
        win_length: usize,
    ) -> Result<usize, GameError> {
        if let Some(col) = first_completing_column(grid, piece, win_length)? {
            return Ok(col);
        }
        if let Some(col) = first_completing_column(grid, opponent, win_length)? {
            return Ok(col);
        }
        self.fallback.choose_column(grid)
    }
}

/// Lowest open column where `piece` would complete a run of `win_length`.
/// The grid is unchanged on return.
fn first_completing_column(
    grid: &mut Grid,
    piece: Symbol,
    win_length: usize,
) -> Result<Option<usize>, GameError> {
    for col in grid.open_columns() {
        let trial = grid.speculate(piece, col)?;
        if trial.longest_run()? >= win_length {
            return Ok(Some(col));
        }
    }
    Ok(None)
}

#[derive(Clone, Debug)]
pub enum Strategy {
    /// Column typed in on the console.
    Human,
    Random(RandomChooser),
    Lookahead(LookaheadChooser),
}

#[derive(Clone, Debug)]
pub struct Player {
    name: String,
    piece: Symbol,
    opponent: Option<usize>,
    strategy: Strategy,
}

impl Player {
    pub fn new(name: impl Into<String>, piece: Symbol, strategy: Strategy) -> Self {
        Self {
            name: name.into(),
            piece,
            opponent: None,
            strategy,
        }
    }

    pub fn human(name: impl Into<String>, piece: Symbol) -> Self {
        Self::new(name, piece, Strategy::Human)
    }

    pub fn random(name: impl Into<String>, piece: Symbol, rng: StdRng) -> Self {
        Self::new(name, piece, Strategy::Random(RandomChooser::new(rng)))
    }

    pub fn lookahead(name: impl Into<String>, piece: Symbol, rng: StdRng) -> Self {
        let chooser = LookaheadChooser::new(RandomChooser::new(rng));
        Self::new(name, piece, Strategy::Lookahead(chooser))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn piece(&self) -> Symbol {
        self.piece
    }

    /// Seat index of the opposing player once the game has paired them.
    pub fn opponent(&self) -> Option<usize> {
        self.opponent
    }

    pub(crate) fn set_opponent(&mut self, seat: usize) {
        self.opponent = Some(seat);
    }

    pub fn kind(&self) -> PlayerKind {
        match self.strategy {
            Strategy::Human => PlayerKind::Human,
            Strategy::Random(_) => PlayerKind::Random,
            Strategy::Lookahead(_) => PlayerKind::Lookahead,
        }
    }

    pub fn is_human(&self) -> bool {
        self.kind() == PlayerKind::Human
    }

    /// Produces this player's next move without applying it. Computer players
    /// only ever pick open, in-bounds columns and leave `grid` as they found it.
    pub fn choose_move(
        &mut self,
        seat: usize,
        grid: &mut Grid,
        win_length: usize,
        opponent_piece: Symbol,
        console: &mut dyn Console,
    ) -> Result<Move, GameError> {
        let column = match &mut self.strategy {
            Strategy::Human => {
                let prompt = format!("{}, please enter the column you want to play in: ", self.name);
                let text = console.read_line(&prompt)?;
                return Move::from_text(seat, self.piece, &text);
            }
            Strategy::Random(chooser) => chooser.choose_column(grid)?,
            Strategy::Lookahead(chooser) => {
                chooser.choose_column(grid, self.piece, opponent_piece, win_length)?
            }
        };
        Ok(Move::new(seat, self.piece, column as i64))
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
