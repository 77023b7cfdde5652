//! Full FEN state: placement plus the five trailing fields.

use std::fmt;
use std::str::FromStr;

use chess_common::Square;

use crate::board::Board;
use crate::fen::{decode_board, encode_board, FenError};
use crate::types::PieceColor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastleSide {
    KingSide,
    QueenSide,
}

/// Castling availability, one flag per color and side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CastlingRights {
    bits: u8,
}

impl CastlingRights {
    const FLAGS: [(char, PieceColor, CastleSide); 4] = [
        ('K', PieceColor::White, CastleSide::KingSide),
        ('Q', PieceColor::White, CastleSide::QueenSide),
        ('k', PieceColor::Black, CastleSide::KingSide),
        ('q', PieceColor::Black, CastleSide::QueenSide),
    ];

    pub fn none() -> Self {
        Self { bits: 0 }
    }

    pub fn all() -> Self {
        Self { bits: 0b1111 }
    }

    fn bit(color: PieceColor, side: CastleSide) -> u8 {
        match (color, side) {
            (PieceColor::White, CastleSide::KingSide) => 0b0001,
            (PieceColor::White, CastleSide::QueenSide) => 0b0010,
            (PieceColor::Black, CastleSide::KingSide) => 0b0100,
            (PieceColor::Black, CastleSide::QueenSide) => 0b1000,
        }
    }

    pub fn has(self, color: PieceColor, side: CastleSide) -> bool {
        self.bits & Self::bit(color, side) != 0
    }

    pub fn grant(&mut self, color: PieceColor, side: CastleSide) {
        self.bits |= Self::bit(color, side);
    }

    pub fn revoke(&mut self, color: PieceColor, side: CastleSide) {
        self.bits &= !Self::bit(color, side);
    }

    /// Drop both sides for one color.
    pub fn revoke_color(&mut self, color: PieceColor) {
        self.revoke(color, CastleSide::KingSide);
        self.revoke(color, CastleSide::QueenSide);
    }

    pub fn is_empty(self) -> bool {
        self.bits == 0
    }
}

impl FromStr for CastlingRights {
    type Err = FenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut rights = Self::none();
        if s == "-" {
            return Ok(rights);
        }
        if s.is_empty() {
            return Err(FenError::Castling(s.to_string()));
        }
        for c in s.chars() {
            let (_, color, side) = Self::FLAGS
                .iter()
                .copied()
                .find(|(flag, _, _)| *flag == c)
                .ok_or_else(|| FenError::Castling(s.to_string()))?;
            if rights.has(color, side) {
                return Err(FenError::Castling(s.to_string()));
            }
            rights.grant(color, side);
        }
        Ok(rights)
    }
}

impl fmt::Display for CastlingRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("-");
        }
        for (flag, color, side) in Self::FLAGS {
            if self.has(color, side) {
                write!(f, "{flag}")?;
            }
        }
        Ok(())
    }
}

/// A complete chess state as carried by a FEN string.
///
/// The en passant target is not tracked: the input field is validated and
/// discarded, and `-` is always written back.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Position {
    pub(crate) board: Board,
    pub(crate) active_color: PieceColor,
    pub(crate) castling: CastlingRights,
    pub(crate) halfmove_clock: u32,
    pub(crate) fullmove_number: u32,
}

impl Position {
    /// The standard initial position with full castling rights.
    pub fn starting() -> Self {
        Self {
            board: Board::starting(),
            active_color: PieceColor::White,
            castling: CastlingRights::all(),
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    /// Parse a six-field FEN string.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let parts: Vec<&str> = fen.split_whitespace().collect();
        let [board, color, castling, en_passant, halfmove, fullmove] = parts[..] else {
            return Err(FenError::FieldCount(parts.len()));
        };

        let board = decode_board(board)?;
        let active_color = match color {
            "w" => PieceColor::White,
            "b" => PieceColor::Black,
            other => return Err(FenError::ActiveColor(other.to_string())),
        };
        let castling = castling.parse()?;
        validate_en_passant(en_passant)?;
        let halfmove_clock = halfmove
            .parse()
            .map_err(|_| FenError::HalfmoveClock(halfmove.to_string()))?;
        let fullmove_number = match fullmove.parse::<u32>() {
            Ok(n) if n >= 1 => n,
            _ => return Err(FenError::FullmoveNumber(fullmove.to_string())),
        };

        Ok(Self {
            board,
            active_color,
            castling,
            halfmove_clock,
            fullmove_number,
        })
    }

    /// Serialize to a six-field FEN string.
    pub fn to_fen(&self) -> String {
        format!(
            "{} {} {} - {} {}",
            encode_board(&self.board),
            self.active_color.fen_char(),
            self.castling,
            self.halfmove_clock,
            self.fullmove_number
        )
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn active_color(&self) -> PieceColor {
        self.active_color
    }

    pub fn castling(&self) -> CastlingRights {
        self.castling
    }

    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    /// Pass the turn without touching the board: flip the side to move and
    /// bump the fullmove number when White is next.
    pub(crate) fn toggle_side(&mut self) {
        self.active_color = self.active_color.opponent();
        if self.active_color == PieceColor::White {
            self.fullmove_number = self.fullmove_number.saturating_add(1);
        }
    }
}

impl FromStr for Position {
    type Err = FenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_fen(s)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_fen())
    }
}

fn validate_en_passant(field: &str) -> Result<(), FenError> {
    if field == "-" {
        return Ok(());
    }
    match Square::from_algebraic(field) {
        Ok(sq) if matches!(sq.rank_char(), '3' | '6') => Ok(()),
        _ => Err(FenError::EnPassant(field.to_string())),
    }
}
