//! Turn loop for a two-player match.
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::GameConfig;
use crate::console::Console;
use crate::error::GameError;
use crate::grid::{Grid, Symbol};
use crate::moves::Move;
use crate::player::Player;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "lowercase")]
pub enum Outcome {
    Win { seat: usize, name: String },
    Tie,
}

pub struct Game<C> {
    grid: Grid,
    win_length: usize,
    players: [Player; 2],
    turn: usize,
    outcome: Option<Outcome>,
    console: C,
}

impl<C: Console> Game<C> {
    /// Seats the players in order and pairs each with the other as opponent.
    pub fn new(
        grid: Grid,
        win_length: usize,
        mut players: [Player; 2],
        console: C,
    ) -> Result<Self, GameError> {
        if win_length == 0 {
            return Err(GameError::InvalidWinLength(win_length));
        }
        players[0].set_opponent(1);
        players[1].set_opponent(0);
        Ok(Self {
            grid,
            win_length,
            players,
            turn: 0,
            outcome: None,
            console,
        })
    }

    pub fn from_config(
        config: &GameConfig,
        players: [Player; 2],
        console: C,
    ) -> Result<Self, GameError> {
        Self::new(config.build_grid()?, config.num_pieces_to_win, players, console)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn win_length(&self) -> usize {
        self.win_length
    }

    pub fn players(&self) -> &[Player; 2] {
        &self.players
    }

    pub fn current_seat(&self) -> usize {
        self.turn
    }

    pub fn current_player(&self) -> &Player {
        &self.players[self.turn]
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn into_console(self) -> C {
        self.console
    }

    /// Plays turns until someone wins or the board fills.
    pub fn play(&mut self) -> Result<Outcome, GameError> {
        loop {
            if let Some(outcome) = self.play_turn()? {
                return Ok(outcome);
            }
        }
    }

    /// Shows the board, gets one move from the current player and applies it.
    /// Returns the outcome once the game is over; further calls return the
    /// same outcome without touching the board.
    pub fn play_turn(&mut self) -> Result<Option<Outcome>, GameError> {
        if let Some(outcome) = &self.outcome {
            return Ok(Some(outcome.clone()));
        }
        self.console.write_line(&self.grid.to_string())?;
        let mv = self.take_turn()?;
        if !mv.ends_game(&self.grid, self.win_length)? {
            self.turn = (self.turn + 1) % self.players.len();
            return Ok(None);
        }
        let outcome = if mv.completes_run(&self.grid, self.win_length)? {
            Outcome::Win {
                seat: self.turn,
                name: self.players[self.turn].name().to_string(),
            }
        } else {
            Outcome::Tie
        };
        info!(?outcome, "game over");
        self.declare(&outcome)?;
        self.outcome = Some(outcome.clone());
        Ok(Some(outcome))
    }

    /// Asks the current player until a move lands. A human's bad column or
    /// unparsable input is reported and asked again; anything else is fatal.
    fn take_turn(&mut self) -> Result<Move, GameError> {
        let seat = self.turn;
        let opponent = self.players[seat]
            .opponent()
            .unwrap_or((seat + 1) % self.players.len());
        let opponent_piece = self.players[opponent].piece();
        loop {
            match self.attempt_move(seat, opponent_piece) {
                Ok(mv) => return Ok(mv),
                Err(err) if self.players[seat].is_human() && err.is_user_correctable() => {
                    warn!(seat, %err, "rejected move");
                    self.console.write_line(&err.to_string())?;
                }
                Err(err) => return Err(err),
            }
        }
    }

    fn attempt_move(&mut self, seat: usize, opponent_piece: Symbol) -> Result<Move, GameError> {
        let mut mv = self.players[seat].choose_move(
            seat,
            &mut self.grid,
            self.win_length,
            opponent_piece,
            &mut self.console,
        )?;
        let row = mv.apply(&mut self.grid)?;
        debug!(seat, column = mv.column(), row, "move applied");
        Ok(mv)
    }

    fn declare(&mut self, outcome: &Outcome) -> Result<(), GameError> {
        self.console.write_line(&self.grid.to_string())?;
        match outcome {
            Outcome::Win { name, .. } => self.console.write_line(&format!("{name} won the game!"))?,
            Outcome::Tie => self.console.write_line("Tie Game.")?,
        }
        Ok(())
    }
}
