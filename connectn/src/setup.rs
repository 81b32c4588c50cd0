//! Interactive seating: player type, name and piece for both seats.
use once_cell::sync::Lazy;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::console::Console;
use crate::error::{GameError, SetupError};
use crate::grid::Symbol;
use crate::player::{Player, PlayerKind};

/// Printable ASCII pieces computer players draw from.
static VISIBLE_PIECES: Lazy<Vec<Symbol>> = Lazy::new(|| ('!'..='~').map(Symbol::new).collect());

fn same_piece(a: Symbol, b: Symbol, case_sensitive: bool) -> bool {
    if case_sensitive {
        a == b
    } else {
        a.eq_ignore_case(b)
    }
}

pub fn validate_name(input: &str, taken: &[Player], case_sensitive: bool) -> Result<String, SetupError> {
    let name = input.trim();
    if name.is_empty() {
        return Err(SetupError::EmptyName);
    }
    let clash = taken.iter().any(|p| {
        if case_sensitive {
            p.name() == name
        } else {
            p.name().to_lowercase() == name.to_lowercase()
        }
    });
    if clash {
        return Err(SetupError::NameTaken(name.to_string()));
    }
    Ok(name.to_string())
}

pub fn validate_piece(
    input: &str,
    blank: Symbol,
    taken: &[Player],
    case_sensitive: bool,
) -> Result<Symbol, SetupError> {
    let text = input.trim();
    if text.is_empty() {
        return Err(SetupError::EmptyPiece);
    }
    let piece = Symbol::parse(text).map_err(|_| SetupError::PieceTooLong(text.to_string()))?;
    if same_piece(piece, blank, case_sensitive) {
        return Err(SetupError::PieceIsBlank);
    }
    if let Some(owner) = taken
        .iter()
        .find(|p| same_piece(p.piece(), piece, case_sensitive))
    {
        return Err(SetupError::PieceTaken {
            piece: piece.as_char(),
            owner: owner.name().to_string(),
        });
    }
    Ok(piece)
}

/// Uniform pick among the visible pieces not clashing with the blank or a
/// taken piece.
pub fn random_piece(rng: &mut StdRng, blank: Symbol, taken: &[Player], case_sensitive: bool) -> Symbol {
    let free: Vec<Symbol> = VISIBLE_PIECES
        .iter()
        .copied()
        .filter(|&piece| {
            !same_piece(piece, blank, case_sensitive)
                && !taken.iter().any(|p| same_piece(p.piece(), piece, case_sensitive))
        })
        .collect();
    free[rng.random_range(0..free.len())]
}

/// Asks for both players' types, and names and pieces for humans.
pub fn create_players(
    console: &mut dyn Console,
    rng: &mut StdRng,
    blank: Symbol,
    case_sensitive: bool,
) -> Result<[Player; 2], GameError> {
    let first = create_player(console, rng, blank, case_sensitive, &[])?;
    let second = create_player(console, rng, blank, case_sensitive, std::slice::from_ref(&first))?;
    Ok([first, second])
}

fn create_player(
    console: &mut dyn Console,
    rng: &mut StdRng,
    blank: Symbol,
    case_sensitive: bool,
    taken: &[Player],
) -> Result<Player, GameError> {
    let seat = taken.len();
    let kind = ask_kind(console, seat)?;
    let player = match kind {
        PlayerKind::Human => {
            let name = ask(console, &format!("HumanPlayer {} enter your name: ", seat + 1), |s| {
                validate_name(s, taken, case_sensitive)
            })?;
            let piece = ask(console, &format!("HumanPlayer {} enter your piece: ", seat + 1), |s| {
                validate_piece(s, blank, taken, case_sensitive)
            })?;
            Player::human(name, piece)
        }
        PlayerKind::Random | PlayerKind::Lookahead => {
            let name = kind.default_name(seat).unwrap_or_default();
            let piece = random_piece(rng, blank, taken, case_sensitive);
            let own_rng = StdRng::from_rng(rng);
            if kind == PlayerKind::Random {
                Player::random(name, piece, own_rng)
            } else {
                Player::lookahead(name, piece, own_rng)
            }
        }
    };
    tracing::debug!(seat, name = player.name(), piece = %player.piece(), "player seated");
    Ok(player)
}

fn ask_kind(console: &mut dyn Console, seat: usize) -> Result<PlayerKind, GameError> {
    console.write_line(&format!("Choose the type for Player {}", seat + 1))?;
    loop {
        let input = console.read_line("Enter Human or Random or Simple: ")?;
        match PlayerKind::from_prefix(&input) {
            Some(kind) => return Ok(kind),
            None => console.write_line(&format!(
                "{} is not one of Human or Random or Simple. Please try again.",
                input.trim()
            ))?,
        }
    }
}

fn ask<T>(
    console: &mut dyn Console,
    prompt: &str,
    check: impl Fn(&str) -> Result<T, SetupError>,
) -> Result<T, GameError> {
    loop {
        let input = console.read_line(prompt)?;
        match check(&input) {
            Ok(value) => return Ok(value),
            Err(err) => console.write_line(&err.to_string())?,
        }
    }
}
