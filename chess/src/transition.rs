//! State Transition Engine: previous position + move → next position.
//!
//! There is no legality checking here. The engine trusts the move, moves
//! whatever sits on the source square and keeps the clocks and castling
//! rights consistent with that.

use crate::fen::FenError;
use crate::occupancy::Occupancy;
use crate::position::{CastleSide, Position};
use crate::resolver::{
    parse_uci_move, resolve_occupancy_change, Move, MoveError, Resolution, Unresolvable,
};
use crate::types::PieceKind;
use chess_common::Square;

/// What to do with an occupancy change that does not map to one move.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DiffPolicy {
    /// Pass the turn without moving anything and log a warning.
    #[default]
    Lenient,
    /// Fail with [`TransitionError::UnresolvableDiff`].
    Strict,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionOptions {
    pub track_castling: bool,
    pub diff_policy: DiffPolicy,
}

impl Default for TransitionOptions {
    fn default() -> Self {
        Self {
            track_castling: true,
            diff_policy: DiffPolicy::Lenient,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("FEN error: {0}")]
    Fen(#[from] FenError),
    #[error(transparent)]
    Move(#[from] MoveError),
    #[error("No piece on source square {0}")]
    EmptySource(Square),
    #[error("Unresolvable occupancy change: {0}")]
    UnresolvableDiff(Unresolvable),
}

/// How an occupancy change was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Moved(Move),
    /// Degraded success: the side to move changed, the board did not.
    TurnPassed(Unresolvable),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub position: Position,
    pub outcome: Outcome,
}

/// Where the next move comes from when working at the FEN-string level.
#[derive(Debug, Clone, Copy)]
pub enum MoveSource<'a> {
    Uci(&'a str),
    Occupancy {
        before: &'a Occupancy,
        after: &'a Occupancy,
    },
}

/// Apply a resolved move and return the next position.
pub fn apply_move(
    prev: &Position,
    mv: Move,
    opts: &TransitionOptions,
) -> Result<Position, TransitionError> {
    let piece = prev
        .board
        .piece_at(mv.from)
        .ok_or(TransitionError::EmptySource(mv.from))?;
    let capture = prev.board.is_occupied(mv.to);
    let mut next = prev.clone();

    if opts.track_castling {
        match piece.kind {
            PieceKind::King => next.castling.revoke_color(piece.color),
            PieceKind::Rook if mv.from.file() == 0 => {
                next.castling.revoke(piece.color, CastleSide::QueenSide)
            }
            PieceKind::Rook if mv.from.file() == 7 => {
                next.castling.revoke(piece.color, CastleSide::KingSide)
            }
            _ => {}
        }
    }

    if piece.is_pawn() || capture {
        next.halfmove_clock = 0;
    } else {
        next.halfmove_clock = next.halfmove_clock.saturating_add(1);
    }

    next.toggle_side();

    next.board.set(mv.to, Some(piece));
    next.board.set(mv.from, None);

    tracing::debug!(
        mv = %mv,
        piece = %piece,
        capture,
        fen = %next,
        "Applied move"
    );
    Ok(next)
}

/// Parse a 4-character UCI move and apply it.
pub fn apply_uci_move(
    prev: &Position,
    mv: &str,
    opts: &TransitionOptions,
) -> Result<Position, TransitionError> {
    let mv = parse_uci_move(mv)?;
    apply_move(prev, mv, opts)
}

/// Resolve a before/after occupancy pair and apply it.
///
/// Under [`DiffPolicy::Lenient`] an unresolvable change is not an error: the
/// turn passes with the board, castling rights and halfmove clock untouched,
/// and the returned [`Outcome::TurnPassed`] says why.
pub fn apply_occupancy_change(
    prev: &Position,
    before: &Occupancy,
    after: &Occupancy,
    opts: &TransitionOptions,
) -> Result<Transition, TransitionError> {
    match resolve_occupancy_change(&prev.board, before, after) {
        Resolution::Move(mv) => Ok(Transition {
            position: apply_move(prev, mv, opts)?,
            outcome: Outcome::Moved(mv),
        }),
        Resolution::Unresolvable(reason) => match opts.diff_policy {
            DiffPolicy::Strict => Err(TransitionError::UnresolvableDiff(reason)),
            DiffPolicy::Lenient => {
                tracing::warn!(%reason, "Occupancy change unresolved, passing the turn");
                let mut position = prev.clone();
                position.toggle_side();
                Ok(Transition {
                    position,
                    outcome: Outcome::TurnPassed(reason),
                })
            }
        },
    }
}

/// FEN in, FEN out.
pub fn update_fen(
    prev_fen: &str,
    source: MoveSource<'_>,
    opts: &TransitionOptions,
) -> Result<String, TransitionError> {
    let prev = Position::from_fen(prev_fen)?;
    let next = match source {
        MoveSource::Uci(mv) => apply_uci_move(&prev, mv, opts)?,
        MoveSource::Occupancy { before, after } => {
            apply_occupancy_change(&prev, before, after, opts)?.position
        }
    };
    Ok(next.to_fen())
}
