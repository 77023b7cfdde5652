//! Piece placement grid in FEN order.

use chess_common::Square;

use crate::types::{Piece, PieceColor, PieceKind};

const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// An 8x8 placement grid. Row 0 is rank 8, file 0 is the a-file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Board {
    squares: [[Option<Piece>; 8]; 8],
}

impl Board {
    /// The standard initial placement.
    pub fn starting() -> Self {
        let mut squares = [[None; 8]; 8];
        for (file, kind) in BACK_RANK.iter().enumerate() {
            squares[0][file] = Some(Piece::new(PieceColor::Black, *kind));
            squares[1][file] = Some(Piece::new(PieceColor::Black, PieceKind::Pawn));
            squares[6][file] = Some(Piece::new(PieceColor::White, PieceKind::Pawn));
            squares[7][file] = Some(Piece::new(PieceColor::White, *kind));
        }
        Self { squares }
    }

    pub fn from_rows(squares: [[Option<Piece>; 8]; 8]) -> Self {
        Self { squares }
    }

    pub fn rows(&self) -> &[[Option<Piece>; 8]; 8] {
        &self.squares
    }

    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.squares[sq.row() as usize][sq.file() as usize]
    }

    pub fn set(&mut self, sq: Square, piece: Option<Piece>) {
        self.squares[sq.row() as usize][sq.file() as usize] = piece;
    }

    pub fn is_occupied(&self, sq: Square) -> bool {
        self.piece_at(sq).is_some()
    }

    /// Number of occupied squares.
    pub fn piece_count(&self) -> usize {
        self.squares.iter().flatten().filter(|p| p.is_some()).count()
    }
}
