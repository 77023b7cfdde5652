//! Conversions between fenbridge squares and `cozy_chess` types.
//!
//! `cozy_chess` counts ranks from White's side (rank 1 = index 0) while FEN
//! rows count from Black's side, so the row index is mirrored.

use cozy_chess::{File, Rank};

use crate::square::Square;

impl From<Square> for cozy_chess::Square {
    fn from(sq: Square) -> Self {
        cozy_chess::Square::new(
            File::index(sq.file() as usize),
            Rank::index(7 - sq.row() as usize),
        )
    }
}

impl From<cozy_chess::Square> for Square {
    fn from(sq: cozy_chess::Square) -> Self {
        let row = 7 - sq.rank() as u8;
        let file = sq.file() as u8;
        // Both indices come from cozy_chess enums and are always < 8.
        Square::new(row, file).unwrap_or_else(|| unreachable!("cozy square out of range"))
    }
}

/// Format a from/to pair as a 4-character UCI move (`"e2e4"`).
pub fn format_uci_squares(from: Square, to: Square) -> String {
    format!("{}{}", from, to)
}

/// Split a cozy move into fenbridge squares, dropping any promotion piece.
pub fn move_squares(mv: &cozy_chess::Move) -> (Square, Square) {
    (Square::from(mv.from), Square::from(mv.to))
}
