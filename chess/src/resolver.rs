//! Move Resolver: turns a UCI string or a pair of occupancy snapshots into
//! source and destination squares.
//!
//! Occupancy resolution never fails. Anything it cannot pin down comes back
//! as [`Resolution::Unresolvable`] and the caller decides whether that means
//! "pass the turn" or an error.

use std::fmt;

use chess_common::{format_uci_squares, Square};

use crate::board::Board;
use crate::occupancy::Occupancy;
use crate::types::Piece;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("Invalid move format: '{0}' (expected e.g. e2e4)")]
    InvalidMoveFormat(String),
}

/// A resolved move. `piece` is filled in once the source square is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub piece: Option<Piece>,
}

impl Move {
    pub fn new(from: Square, to: Square) -> Self {
        Self {
            from,
            to,
            piece: None,
        }
    }

    pub fn uci(&self) -> String {
        format_uci_squares(self.from, self.to)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.uci())
    }
}

/// Why an occupancy change could not be mapped to a single move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unresolvable {
    /// Zero or three-plus squares changed.
    ChangedSquares(usize),
    /// Two squares changed but not as one vacated plus one filled.
    MismatchedPair,
    /// One square was vacated and the piece there is not a pawn.
    NotAPawn(Square),
    /// A pawn vacated a square with no forward diagonal on the board.
    NoDiagonalTarget(Square),
    /// The vacated square is empty on the board: the snapshots are stale.
    EmptySource(Square),
}

impl fmt::Display for Unresolvable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ChangedSquares(n) => write!(f, "{n} squares changed"),
            Self::MismatchedPair => f.write_str("two squares changed in the same direction"),
            Self::NotAPawn(sq) => write!(f, "single vacated square {sq} does not hold a pawn"),
            Self::NoDiagonalTarget(sq) => write!(f, "pawn on {sq} has no capture square"),
            Self::EmptySource(sq) => write!(f, "vacated square {sq} is empty on the board"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Move(Move),
    Unresolvable(Unresolvable),
}

/// Parse a 4-character move such as `"e2e4"`. Suffixes are not accepted.
pub fn parse_uci_move(s: &str) -> Result<Move, MoveError> {
    let invalid = || MoveError::InvalidMoveFormat(s.to_string());
    let chars: Vec<char> = s.chars().collect();
    let [from_file, from_rank, to_file, to_rank] = chars[..] else {
        return Err(invalid());
    };
    let from = Square::from_chars(from_file, from_rank).ok_or_else(invalid)?;
    let to = Square::from_chars(to_file, to_rank).ok_or_else(invalid)?;
    Ok(Move::new(from, to))
}

/// Map a before/after occupancy pair onto a move on `board`.
pub fn resolve_occupancy_change(board: &Board, before: &Occupancy, after: &Occupancy) -> Resolution {
    let changed = before.changed_squares(after);
    let resolution = match changed[..] {
        [a, b] => resolve_pair(board, before, a, b),
        [only] if before.is_occupied(only) => resolve_pawn_capture(board, only),
        [only] => Resolution::Unresolvable(Unresolvable::NotAPawn(only)),
        _ => Resolution::Unresolvable(Unresolvable::ChangedSquares(changed.len())),
    };
    tracing::debug!(changed = changed.len(), ?resolution, "Resolved occupancy change");
    resolution
}

fn resolve_pair(board: &Board, before: &Occupancy, a: Square, b: Square) -> Resolution {
    let (from, to) = match (before.is_occupied(a), before.is_occupied(b)) {
        (true, false) => (a, b),
        (false, true) => (b, a),
        _ => return Resolution::Unresolvable(Unresolvable::MismatchedPair),
    };
    match board.piece_at(from) {
        Some(piece) => Resolution::Move(Move {
            from,
            to,
            piece: Some(piece),
        }),
        None => Resolution::Unresolvable(Unresolvable::EmptySource(from)),
    }
}

/// A single vacated square is read as a pawn capturing onto an already
/// occupied square: pick the first on-board forward diagonal (left, then right).
fn resolve_pawn_capture(board: &Board, from: Square) -> Resolution {
    let Some(piece) = board.piece_at(from).filter(|p| p.is_pawn()) else {
        return Resolution::Unresolvable(Unresolvable::NotAPawn(from));
    };
    let forward = piece.color.forward();
    [from.offset(forward, -1), from.offset(forward, 1)]
        .into_iter()
        .flatten()
        .next()
        .map(|to| {
            Resolution::Move(Move {
                from,
                to,
                piece: Some(piece),
            })
        })
        .unwrap_or(Resolution::Unresolvable(Unresolvable::NoDiagonalTarget(from)))
}
