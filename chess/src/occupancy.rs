//! Occupied/empty snapshots of the board, as produced by a sensing board.

use std::fmt;
use std::str::FromStr;

use chess_common::Square;

use crate::board::Board;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OccupancyError {
    #[error("Invalid occupancy cell '{0}', expected 0 or 1")]
    InvalidCell(char),
    #[error("Occupancy grid must have 64 cells, found {0}")]
    CellCount(usize),
}

/// 8x8 occupancy grid in FEN row order, `true` = occupied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Occupancy {
    cells: [[bool; 8]; 8],
}

impl Occupancy {
    pub fn from_rows(cells: [[bool; 8]; 8]) -> Self {
        Self { cells }
    }

    /// Occupancy implied by a placement grid.
    pub fn from_board(board: &Board) -> Self {
        let mut cells = [[false; 8]; 8];
        for (row, rank) in board.rows().iter().enumerate() {
            for (file, cell) in rank.iter().enumerate() {
                cells[row][file] = cell.is_some();
            }
        }
        Self { cells }
    }

    pub fn is_occupied(&self, sq: Square) -> bool {
        self.cells[sq.row() as usize][sq.file() as usize]
    }

    pub fn set(&mut self, sq: Square, occupied: bool) {
        self.cells[sq.row() as usize][sq.file() as usize] = occupied;
    }

    /// Squares whose state differs from `other`, in rank-major order.
    pub fn changed_squares(&self, other: &Occupancy) -> Vec<Square> {
        Square::all()
            .filter(|sq| self.is_occupied(*sq) != other.is_occupied(*sq))
            .collect()
    }
}

impl FromStr for Occupancy {
    type Err = OccupancyError;

    /// Parse 64 `0`/`1` cells, a8 first; whitespace and `/` separators are ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut cells = [[false; 8]; 8];
        let mut count = 0usize;
        for c in s.chars().filter(|c| !c.is_whitespace() && *c != '/') {
            let occupied = match c {
                '0' => false,
                '1' => true,
                other => return Err(OccupancyError::InvalidCell(other)),
            };
            if count < 64 {
                cells[count / 8][count % 8] = occupied;
            }
            count += 1;
        }
        if count != 64 {
            return Err(OccupancyError::CellCount(count));
        }
        Ok(Self { cells })
    }
}

impl fmt::Display for Occupancy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, row) in self.cells.iter().enumerate() {
            let line: Vec<&str> = row.iter().map(|c| if *c { "1" } else { "0" }).collect();
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}
