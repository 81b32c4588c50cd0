//! Connect-N engine: a gravity-filled grid of configurable size, the
//! run-length scan that decides wins, human and computer players, and the
//! turn loop that runs a two-player match over a line-oriented console.
pub mod config;
pub mod console;
pub mod error;
pub mod game;
pub mod grid;
pub mod moves;
pub mod player;
pub mod setup;

pub use config::{ConfigValue, GameConfig};
pub use console::{Console, LineConsole};
pub use error::{ConfigError, GameError, SetupError};
pub use game::{Game, Outcome};
pub use grid::{Grid, Speculation, Symbol};
pub use moves::Move;
pub use player::{LookaheadChooser, Player, PlayerKind, RandomChooser, Strategy};
pub use setup::create_players;
