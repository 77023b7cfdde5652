//! Board coordinates in the FEN layout: row 0 is rank 8, row 7 is rank 1.

use std::fmt;
use std::str::FromStr;

/// A square addressed by FEN row (0 = rank 8) and file (0 = `a`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square {
    row: u8,
    file: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SquareError {
    #[error("Invalid square: {0}")]
    InvalidSquare(String),
}

impl Square {
    /// Build a square from row/file indices, `None` when either is off-board.
    pub const fn new(row: u8, file: u8) -> Option<Self> {
        if row < 8 && file < 8 {
            Some(Self { row, file })
        } else {
            None
        }
    }

    pub const fn row(self) -> u8 {
        self.row
    }

    pub const fn file(self) -> u8 {
        self.file
    }

    /// Parse algebraic notation (`"e2"`). Only lowercase files are accepted.
    pub fn from_algebraic(s: &str) -> Result<Self, SquareError> {
        let mut chars = s.chars();
        let (Some(file), Some(rank), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(SquareError::InvalidSquare(s.to_string()));
        };
        Self::from_chars(file, rank).ok_or_else(|| SquareError::InvalidSquare(s.to_string()))
    }

    /// Build a square from a file letter and a rank digit.
    pub fn from_chars(file: char, rank: char) -> Option<Self> {
        if !('a'..='h').contains(&file) || !('1'..='8').contains(&rank) {
            return None;
        }
        let file = file as u8 - b'a';
        let row = b'8' - rank as u8;
        Some(Self { row, file })
    }

    pub fn file_char(self) -> char {
        (b'a' + self.file) as char
    }

    pub fn rank_char(self) -> char {
        (b'8' - self.row) as char
    }

    /// Step by a row/file delta, `None` if the target leaves the board.
    pub fn offset(self, d_row: i8, d_file: i8) -> Option<Self> {
        let row = i16::from(self.row) + i16::from(d_row);
        let file = i16::from(self.file) + i16::from(d_file);
        if (0..8).contains(&row) && (0..8).contains(&file) {
            Some(Self {
                row: row as u8,
                file: file as u8,
            })
        } else {
            None
        }
    }

    /// All 64 squares in rank-major order, a8 first.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..8u8).flat_map(|row| (0..8u8).map(move |file| Square { row, file }))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file_char(), self.rank_char())
    }
}

impl FromStr for Square {
    type Err = SquareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_algebraic(s)
    }
}
