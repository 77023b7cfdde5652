//! FEN state tracking: board codec, move resolution and state transitions.

pub mod board;
pub mod fen;
pub mod occupancy;
pub mod position;
pub mod resolver;
pub mod transition;
pub mod types;

pub use board::Board;
pub use fen::{decode_board, encode_board, FenError, START_BOARD, START_FEN};
pub use occupancy::{Occupancy, OccupancyError};
pub use position::{CastleSide, CastlingRights, Position};
pub use resolver::{
    parse_uci_move, resolve_occupancy_change, Move, MoveError, Resolution, Unresolvable,
};
pub use transition::{
    apply_move, apply_occupancy_change, apply_uci_move, update_fen, DiffPolicy, MoveSource,
    Outcome, Transition, TransitionError, TransitionOptions,
};
pub use types::{Piece, PieceColor, PieceKind};

pub use chess_common::Square;
