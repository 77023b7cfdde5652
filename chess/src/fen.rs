//! Board Codec: the piece-placement field of a FEN string.
//!
//! `decode_board` and `encode_board` are exact inverses for canonical
//! fields, which is why adjacent digit runs such as `"44"` are rejected.

use crate::board::Board;
use crate::types::Piece;

/// Board field of the standard initial position.
pub const START_BOARD: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR";

/// Full FEN of the standard initial position.
pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FenError {
    #[error("Malformed board field '{field}': {reason}")]
    MalformedBoardField { field: String, reason: String },
    #[error("FEN must have 6 fields, found {0}")]
    FieldCount(usize),
    #[error("Invalid active color: {0}")]
    ActiveColor(String),
    #[error("Invalid castling rights: {0}")]
    Castling(String),
    #[error("Invalid en passant field: {0}")]
    EnPassant(String),
    #[error("Invalid halfmove clock: {0}")]
    HalfmoveClock(String),
    #[error("Invalid fullmove number: {0}")]
    FullmoveNumber(String),
}

fn malformed(field: &str, reason: impl Into<String>) -> FenError {
    FenError::MalformedBoardField {
        field: field.to_string(),
        reason: reason.into(),
    }
}

/// Expand a FEN board field into a placement grid.
pub fn decode_board(field: &str) -> Result<Board, FenError> {
    let ranks: Vec<&str> = field.split('/').collect();
    if ranks.len() != 8 {
        return Err(malformed(
            field,
            format!("expected 8 ranks, found {}", ranks.len()),
        ));
    }

    let mut squares = [[None; 8]; 8];
    for (row, rank_str) in ranks.iter().enumerate() {
        let rank = 8 - row;
        let mut file = 0usize;
        let mut after_digit = false;
        for c in rank_str.chars() {
            if let Some(run) = c.to_digit(10) {
                if !(1..=8).contains(&run) {
                    return Err(malformed(field, format!("invalid empty-square count '{c}'")));
                }
                if after_digit {
                    return Err(malformed(
                        field,
                        format!("rank {rank} has adjacent empty-square counts"),
                    ));
                }
                file += run as usize;
                after_digit = true;
            } else {
                let piece = Piece::from_fen_char(c)
                    .ok_or_else(|| malformed(field, format!("invalid piece character '{c}'")))?;
                if file < 8 {
                    squares[row][file] = Some(piece);
                }
                file += 1;
                after_digit = false;
            }
            if file > 8 {
                return Err(malformed(field, format!("rank {rank} has more than 8 files")));
            }
        }
        if file != 8 {
            return Err(malformed(field, format!("rank {rank} covers {file} files")));
        }
    }

    Ok(Board::from_rows(squares))
}

/// Encode a placement grid as a FEN board field.
pub fn encode_board(board: &Board) -> String {
    let mut ranks = Vec::with_capacity(8);
    for row in board.rows() {
        let mut rank = String::new();
        let mut empty = 0u8;
        for cell in row {
            match cell {
                None => empty += 1,
                Some(piece) => {
                    if empty > 0 {
                        rank.push((b'0' + empty) as char);
                        empty = 0;
                    }
                    rank.push(piece.fen_char());
                }
            }
        }
        if empty > 0 {
            rank.push((b'0' + empty) as char);
        }
        ranks.push(rank);
    }
    ranks.join("/")
}
